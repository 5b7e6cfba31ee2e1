//! MAAS Machines
//!
//! Machine listing and identifier resolution.

use super::client::MaasClient;
use crate::error::{MaasError, Result};
use serde_json::Value;

/// Machine information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Machine {
    pub system_id: String,
    pub hostname: String,
    pub fqdn: String,
}

impl From<&Value> for Machine {
    fn from(value: &Value) -> Self {
        let field = |key: &str| {
            value
                .get(key)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };

        Self {
            system_id: field("system_id"),
            hostname: field("hostname"),
            fqdn: field("fqdn"),
        }
    }
}

impl Machine {
    /// True if `identifier` is this machine's system id, hostname or FQDN
    pub fn matches(&self, identifier: &str) -> bool {
        if identifier.is_empty() {
            return false;
        }
        self.system_id == identifier || self.hostname == identifier || self.fqdn == identifier
    }
}

/// List all machines
pub async fn list_machines(client: &MaasClient) -> Result<Vec<Machine>> {
    let url = client.machines_url()?;
    let response = client.get(&url).await?;

    // Anything but an array is a decode failure, not an empty fleet
    let machines: Vec<Value> = serde_json::from_value(response)?;
    Ok(machines.iter().map(Machine::from).collect())
}

/// Find a machine by system id, hostname or FQDN. `None` when nothing matches.
pub async fn find_machine(client: &MaasClient, identifier: &str) -> Result<Option<Machine>> {
    let machines = list_machines(client).await?;
    Ok(machines.into_iter().find(|m| m.matches(identifier)))
}

/// Resolve a machine identifier, failing when nothing matches.
///
/// Every RAID lifecycle operation goes through here.
pub async fn resolve_machine(client: &MaasClient, identifier: &str) -> Result<Machine> {
    find_machine(client, identifier)
        .await?
        .ok_or_else(|| MaasError::MachineNotFound(identifier.to_string()))
}
