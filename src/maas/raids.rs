//! MAAS RAIDs
//!
//! RAID entities, request parameters and the collection/instance endpoints
//! under `nodes/{system_id}/`.

use super::client::MaasClient;
use super::http::{push_list, FormParams};
use crate::error::{MaasError, Result};
use serde::{Deserialize, Serialize};

/// Member type MAAS reports for partitions
const PARTITION_TYPE: &str = "partition";

/// A RAID member: either a block device or a partition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaidMember {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    /// `physical`, `virtual`, ... for block devices, `partition` for partitions
    #[serde(default, rename = "type")]
    pub kind: String,
}

impl RaidMember {
    pub fn is_partition(&self) -> bool {
        self.kind == PARTITION_TYPE
    }

    /// True if `identifier` is this member's numeric id or its name
    pub fn matches(&self, identifier: &str) -> bool {
        self.id.to_string() == identifier || (!self.name.is_empty() && self.name == identifier)
    }
}

/// RAID array as returned by MAAS
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Raid {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub devices: Vec<RaidMember>,
    #[serde(default)]
    pub spare_devices: Vec<RaidMember>,
}

impl Raid {
    /// True if `identifier` is this RAID's stringified id or its exact name
    pub fn matches(&self, identifier: &str) -> bool {
        self.id.to_string() == identifier || self.name == identifier
    }

    pub fn block_devices(&self) -> impl Iterator<Item = &RaidMember> {
        self.devices.iter().filter(|m| !m.is_partition())
    }

    pub fn partitions(&self) -> impl Iterator<Item = &RaidMember> {
        self.devices.iter().filter(|m| m.is_partition())
    }

    pub fn spare_block_devices(&self) -> impl Iterator<Item = &RaidMember> {
        self.spare_devices.iter().filter(|m| !m.is_partition())
    }

    pub fn spare_partitions(&self) -> impl Iterator<Item = &RaidMember> {
        self.spare_devices.iter().filter(|m| m.is_partition())
    }
}

/// Parameters for creating a RAID
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RaidsParams {
    pub name: Option<String>,
    pub level: String,
    pub block_devices: Vec<String>,
    pub partitions: Vec<String>,
    pub spare_devices: Vec<String>,
    pub spare_partitions: Vec<String>,
}

impl RaidsParams {
    pub fn to_form(&self) -> FormParams {
        let mut params = FormParams::new();
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            params.push(("name".to_string(), name.to_string()));
        }
        params.push(("level".to_string(), self.level.clone()));
        push_list(&mut params, "block_devices", &self.block_devices);
        push_list(&mut params, "partitions", &self.partitions);
        push_list(&mut params, "spare_devices", &self.spare_devices);
        push_list(&mut params, "spare_partitions", &self.spare_partitions);
        params
    }
}

/// Parameters for updating a RAID. Membership is expressed as deltas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RaidParams {
    pub name: Option<String>,
    pub uuid: Option<String>,
    pub add_block_devices: Vec<String>,
    pub remove_block_devices: Vec<String>,
    pub add_partitions: Vec<String>,
    pub remove_partitions: Vec<String>,
    pub add_spare_devices: Vec<String>,
    pub remove_spare_devices: Vec<String>,
    pub add_spare_partitions: Vec<String>,
    pub remove_spare_partitions: Vec<String>,
}

impl RaidParams {
    /// Form body; empty lists are left out entirely
    pub fn to_form(&self) -> FormParams {
        let mut params = FormParams::new();
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            params.push(("name".to_string(), name.to_string()));
        }
        if let Some(uuid) = self.uuid.as_deref().filter(|u| !u.is_empty()) {
            params.push(("uuid".to_string(), uuid.to_string()));
        }
        push_list(&mut params, "add_block_devices", &self.add_block_devices);
        push_list(&mut params, "remove_block_devices", &self.remove_block_devices);
        push_list(&mut params, "add_partitions", &self.add_partitions);
        push_list(&mut params, "remove_partitions", &self.remove_partitions);
        push_list(&mut params, "add_spare_devices", &self.add_spare_devices);
        push_list(&mut params, "remove_spare_devices", &self.remove_spare_devices);
        push_list(&mut params, "add_spare_partitions", &self.add_spare_partitions);
        push_list(&mut params, "remove_spare_partitions", &self.remove_spare_partitions);
        params
    }
}

/// List all RAIDs of a machine, in the order MAAS returns them
pub async fn list_raids(client: &MaasClient, system_id: &str) -> Result<Vec<Raid>> {
    let url = client.raids_url(system_id)?;
    let response = client.get(&url).await?;
    if response.is_null() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_value(response)?)
}

/// Create a RAID on a machine
pub async fn create_raid(client: &MaasClient, system_id: &str, params: &RaidsParams) -> Result<Raid> {
    tracing::info!("Creating {} RAID on {}", params.level, system_id);
    let url = client.raids_url(system_id)?;
    let response = client.post(&url, &params.to_form()).await?;
    Ok(serde_json::from_value(response)?)
}

/// Update a RAID
pub async fn update_raid(
    client: &MaasClient,
    system_id: &str,
    raid_id: i64,
    params: &RaidParams,
) -> Result<Raid> {
    tracing::info!("Updating RAID {} on {}", raid_id, system_id);
    let url = client.raid_url(system_id, raid_id)?;
    let response = client.put(&url, &params.to_form()).await?;
    Ok(serde_json::from_value(response)?)
}

/// Delete a RAID
pub async fn delete_raid(client: &MaasClient, system_id: &str, raid_id: i64) -> Result<()> {
    tracing::info!("Deleting RAID {} on {}", raid_id, system_id);
    let url = client.raid_url(system_id, raid_id)?;
    client.delete(&url).await?;
    Ok(())
}

/// First RAID whose id or name equals `identifier`. `None` when nothing matches.
pub async fn find_raid(
    client: &MaasClient,
    system_id: &str,
    identifier: &str,
) -> Result<Option<Raid>> {
    let raids = list_raids(client, system_id).await?;
    Ok(raids.into_iter().find(|r| r.matches(identifier)))
}

/// Like [`find_raid`], failing when nothing matches
pub async fn get_raid(client: &MaasClient, system_id: &str, identifier: &str) -> Result<Raid> {
    find_raid(client, system_id, identifier)
        .await?
        .ok_or_else(|| MaasError::RaidNotFound(identifier.to_string()))
}
