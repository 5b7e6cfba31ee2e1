//! Host lifecycle
//!
//! Drives the RAID resource the way a plugin host does: refresh the stored
//! record from MAAS, plan against the configuration, then create, update or
//! replace and persist the result.

use crate::error::MaasError;
use crate::maas::client::MaasClient;
use crate::maas::machines;
use crate::resource::{self, raid, Plan, RaidConfig, RaidState};
use crate::store::StateStore;
use anyhow::{Context, Result};

/// Outcome of [`apply`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub plan: Plan,
    /// State after applying; `None` only when nothing is managed
    pub state: Option<RaidState>,
}

/// Refresh the stored record from MAAS and persist it.
///
/// A RAID deleted outside this tool clears the store and yields `None`.
pub async fn refresh(client: &MaasClient, store: &StateStore) -> Result<Option<RaidState>> {
    let Some(prior) = store.load()? else {
        return Ok(None);
    };

    match raid::read(client, &prior).await {
        Ok(state) => {
            if state != prior {
                tracing::info!("RAID {} drifted from stored state", state.id);
            }
            store.save(&state)?;
            Ok(Some(state))
        }
        Err(MaasError::RaidNotFound(id)) => {
            tracing::warn!("RAID {} no longer exists, forgetting it", id);
            store.clear()?;
            Ok(None)
        }
        Err(e) => Err(e).context("Failed to refresh RAID state"),
    }
}

/// Refresh, then compare the current state with `desired`
pub async fn plan(
    client: &MaasClient,
    store: &StateStore,
    desired: &RaidConfig,
) -> Result<(Plan, Option<RaidState>)> {
    let current = refresh(client, store).await?;
    let resolved = match &current {
        Some(_) => machines::find_machine(client, &desired.machine)
            .await?
            .map(|m| m.system_id),
        None => None,
    };
    let plan = resource::plan(current.as_ref(), desired, resolved.as_deref());
    Ok((plan, current))
}

/// Bring the managed RAID in line with `desired`
pub async fn apply(client: &MaasClient, store: &StateStore, desired: &RaidConfig) -> Result<Applied> {
    let (plan, current) = plan(client, store, desired).await?;
    tracing::info!("Plan: {:?}", plan);

    let state = match plan {
        Plan::NoChange => return Ok(Applied { plan, state: current }),
        Plan::Create => raid::create(client, desired).await?,
        Plan::Update(_) => {
            let current = current.context("Update planned without current state")?;
            raid::update(client, &current, desired).await?
        }
        Plan::Replace(_) => {
            let current = current.context("Replace planned without current state")?;
            raid::delete(client, &current).await?;
            store.clear()?;
            raid::create(client, desired).await?
        }
    };

    store.save(&state)?;
    Ok(Applied {
        plan,
        state: Some(state),
    })
}
