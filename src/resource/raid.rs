//! RAID resource lifecycle
//!
//! Create, Read, Update, Delete and Import for `maas_raid`. Every operation
//! takes the MAAS client explicitly and resolves the machine the same way.

use super::delta::MembershipDelta;
use super::import::ImportId;
use super::state::{Membership, RaidConfig, RaidState};
use crate::error::{MaasError, Result};
use crate::maas::client::MaasClient;
use crate::maas::machines::resolve_machine;
use crate::maas::raids::{self, RaidsParams};

/// Create a RAID and return its reconciled state
pub async fn create(client: &MaasClient, config: &RaidConfig) -> Result<RaidState> {
    let machine = resolve_machine(client, &config.machine).await?;

    let params = RaidsParams {
        name: config.name.clone(),
        level: config.level.clone(),
        block_devices: config.membership.block_devices.clone(),
        partitions: config.membership.partitions.clone(),
        spare_devices: config.membership.spare_devices.clone(),
        spare_partitions: config.membership.spare_partitions.clone(),
    };
    let raid = raids::create_raid(client, &machine.system_id, &params).await?;
    tracing::info!("Created RAID {} ({}) on {}", raid.id, raid.name, machine.system_id);

    let created = RaidState {
        id: raid.id.to_string(),
        machine: machine.system_id,
        membership: config.membership.clone(),
        ..Default::default()
    };
    read(client, &created).await
}

/// Refresh state from MAAS.
///
/// Membership lists keep the identifier forms already in `state`.
pub async fn read(client: &MaasClient, state: &RaidState) -> Result<RaidState> {
    let machine = resolve_machine(client, &state.machine).await?;
    let raid = raids::get_raid(client, &machine.system_id, &state.id).await?;
    tracing::debug!("Read RAID {} on {}", raid.id, machine.system_id);

    Ok(RaidState::from_remote(&machine, &raid, Some(&state.membership)))
}

/// Apply a configuration to an existing RAID.
///
/// Membership changes are sent as additions and removals against what MAAS
/// currently reports. `level` and `machine` cannot change in place.
pub async fn update(client: &MaasClient, state: &RaidState, config: &RaidConfig) -> Result<RaidState> {
    if !state.level.is_empty() && state.level != config.level {
        return Err(MaasError::InvalidConfig(format!(
            "level cannot change from {} to {} without replacing the RAID",
            state.level, config.level
        )));
    }

    let machine = resolve_machine(client, &config.machine).await?;
    let raid = raids::get_raid(client, &machine.system_id, &state.id).await?;

    // Name current members the way the config does, falling back to the
    // forms recorded in state, so removals use identifiers the user knows
    let preferred = config.membership.union(&state.membership);
    let current = Membership::from_raid(&raid, Some(&preferred));
    let delta = MembershipDelta::between(&current, &config.membership);
    tracing::debug!("RAID {} membership delta: {:?}", raid.id, delta);

    let name = config.name.clone().unwrap_or_else(|| state.name.clone());
    let uuid = Some(state.uuid.clone()).filter(|u| !u.is_empty());

    let uuid_same = uuid.as_deref().map_or(true, |u| u == raid.uuid);
    if delta.is_empty() && name == raid.name && uuid_same {
        tracing::debug!("RAID {} already matches, skipping update", raid.id);
        return Ok(RaidState::from_remote(&machine, &raid, Some(&config.membership)));
    }

    let params = delta.into_params(Some(name), uuid);
    raids::update_raid(client, &machine.system_id, raid.id, &params).await?;

    let updated = RaidState {
        machine: machine.system_id,
        membership: config.membership.clone(),
        ..state.clone()
    };
    read(client, &updated).await
}

/// Delete a RAID
pub async fn delete(client: &MaasClient, state: &RaidState) -> Result<()> {
    let machine = resolve_machine(client, &state.machine).await?;
    let raid = raids::get_raid(client, &machine.system_id, &state.id).await?;
    raids::delete_raid(client, &machine.system_id, raid.id).await
}

/// Adopt an existing RAID from a `MACHINE:RAID` identifier
pub async fn import(client: &MaasClient, id: &str) -> Result<RaidState> {
    let id = ImportId::parse(id)?;
    let machine = resolve_machine(client, &id.machine).await?;
    let raid = raids::get_raid(client, &machine.system_id, &id.raid).await?;
    tracing::info!("Imported RAID {} ({}) from {}", raid.id, raid.name, machine.system_id);

    Ok(RaidState::from_remote(&machine, &raid, None))
}
