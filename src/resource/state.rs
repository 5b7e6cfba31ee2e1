//! RAID configuration and managed state
//!
//! [`RaidConfig`] is the desired state read from a configuration file.
//! [`RaidState`] is the reconciled record persisted between runs.

use crate::maas::machines::Machine;
use crate::maas::raids::{Raid, RaidMember};
use serde::{Deserialize, Serialize};

/// Member lists of a RAID, by role
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    #[serde(default)]
    pub block_devices: Vec<String>,
    /// Required in configuration, possibly empty
    pub partitions: Vec<String>,
    #[serde(default)]
    pub spare_devices: Vec<String>,
    #[serde(default)]
    pub spare_partitions: Vec<String>,
}

impl Membership {
    /// Membership of a remote RAID.
    ///
    /// A member is written with the identifier `preferred` already uses for
    /// it (id or name) when one matches, otherwise with its numeric id.
    /// Matched members come first in `preferred` order, the rest follow in
    /// remote order.
    pub fn from_raid(raid: &Raid, preferred: Option<&Membership>) -> Self {
        let empty = Membership::default();
        let preferred = preferred.unwrap_or(&empty);

        Self {
            block_devices: reconcile(raid.block_devices(), &preferred.block_devices),
            partitions: reconcile(raid.partitions(), &preferred.partitions),
            spare_devices: reconcile(raid.spare_block_devices(), &preferred.spare_devices),
            spare_partitions: reconcile(raid.spare_partitions(), &preferred.spare_partitions),
        }
    }

    /// Entries of `self` followed by entries of `other` not already present
    pub fn union(&self, other: &Membership) -> Membership {
        fn merge(a: &[String], b: &[String]) -> Vec<String> {
            let mut out = a.to_vec();
            out.extend(b.iter().filter(|x| !a.contains(x)).cloned());
            out
        }

        Membership {
            block_devices: merge(&self.block_devices, &other.block_devices),
            partitions: merge(&self.partitions, &other.partitions),
            spare_devices: merge(&self.spare_devices, &other.spare_devices),
            spare_partitions: merge(&self.spare_partitions, &other.spare_partitions),
        }
    }
}

fn reconcile<'a>(members: impl Iterator<Item = &'a RaidMember>, preferred: &[String]) -> Vec<String> {
    let members: Vec<&RaidMember> = members.collect();
    let mut used = vec![false; members.len()];
    let mut out = Vec::with_capacity(members.len());

    for identifier in preferred {
        let hit = members
            .iter()
            .enumerate()
            .find(|(i, m)| !used[*i] && m.matches(identifier));
        if let Some((i, _)) = hit {
            used[i] = true;
            out.push(identifier.clone());
        }
    }

    for (i, member) in members.iter().enumerate() {
        if !used[i] {
            out.push(member.id.to_string());
        }
    }

    out
}

/// Desired RAID configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaidConfig {
    /// Machine system id, hostname or FQDN
    pub machine: String,
    /// RAID level, e.g. `raid-1`
    pub level: String,
    /// Computed by MAAS when unset
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub membership: Membership,
}

/// Managed state record of one RAID
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaidState {
    pub id: String,
    /// Resolved machine system id
    pub machine: String,
    pub name: String,
    pub uuid: String,
    #[serde(default)]
    pub level: String,
    #[serde(flatten)]
    pub membership: Membership,
}

impl RaidState {
    /// Reconcile a remote RAID into state
    pub fn from_remote(machine: &Machine, raid: &Raid, preferred: Option<&Membership>) -> Self {
        Self {
            id: raid.id.to_string(),
            machine: machine.system_id.clone(),
            name: raid.name.clone(),
            uuid: raid.uuid.clone(),
            level: raid.level.clone(),
            membership: Membership::from_raid(raid, preferred),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raid() -> Raid {
        serde_json::from_value(json!({
            "id": 7,
            "name": "md0",
            "uuid": "u-1",
            "level": "raid-1",
            "devices": [
                {"id": 10, "name": "sda", "type": "physical"},
                {"id": 21, "name": "sda-part1", "type": "partition"},
                {"id": 22, "name": "sdb-part1", "type": "partition"}
            ],
            "spare_devices": [
                {"id": 23, "name": "sdc-part1", "type": "partition"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_membership_defaults_to_ids() {
        let membership = Membership::from_raid(&raid(), None);
        assert_eq!(membership.block_devices, vec!["10"]);
        assert_eq!(membership.partitions, vec!["21", "22"]);
        assert!(membership.spare_devices.is_empty());
        assert_eq!(membership.spare_partitions, vec!["23"]);
    }

    #[test]
    fn test_membership_keeps_preferred_forms_and_order() {
        let preferred = Membership {
            block_devices: vec!["sda".into()],
            partitions: vec!["sdb-part1".into(), "21".into()],
            ..Default::default()
        };
        let membership = Membership::from_raid(&raid(), Some(&preferred));
        assert_eq!(membership.block_devices, vec!["sda"]);
        assert_eq!(membership.partitions, vec!["sdb-part1", "21"]);
        assert_eq!(membership.spare_partitions, vec!["23"]);
    }

    #[test]
    fn test_membership_drops_missing_preferred() {
        let preferred = Membership {
            partitions: vec!["21".into(), "99".into()],
            ..Default::default()
        };
        let membership = Membership::from_raid(&raid(), Some(&preferred));
        assert_eq!(membership.partitions, vec!["21", "22"]);
    }

    #[test]
    fn test_union_prefers_first_forms() {
        let config = Membership {
            partitions: vec!["sda-part1".into()],
            ..Default::default()
        };
        let recorded = Membership {
            partitions: vec!["21".into(), "sdb-part1".into()],
            ..Default::default()
        };
        let merged = config.union(&recorded);
        assert_eq!(merged.partitions, vec!["sda-part1", "21", "sdb-part1"]);

        // "21" names the same member as "sda-part1" and is skipped
        let membership = Membership::from_raid(&raid(), Some(&merged));
        assert_eq!(membership.partitions, vec!["sda-part1", "sdb-part1"]);
    }

    #[test]
    fn test_config_from_yaml() {
        let config: RaidConfig = serde_yaml::from_str(
            "machine: node-1\nlevel: raid-1\npartitions: [p1, p2]\nspare_devices: [sdc]\n",
        )
        .unwrap();
        assert_eq!(config.machine, "node-1");
        assert_eq!(config.name, None);
        assert_eq!(config.membership.partitions, vec!["p1", "p2"]);
        assert_eq!(config.membership.spare_devices, vec!["sdc"]);
        assert!(config.membership.block_devices.is_empty());
    }

    #[test]
    fn test_config_requires_partitions() {
        let result: Result<RaidConfig, _> =
            serde_yaml::from_str("machine: node-1\nlevel: raid-1\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_state_serializes_flat() {
        let state = RaidState {
            id: "7".into(),
            machine: "abc123".into(),
            name: "md0".into(),
            uuid: "u-1".into(),
            level: "raid-1".into(),
            membership: Membership {
                partitions: vec!["p1".into()],
                ..Default::default()
            },
        };
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["id"], "7");
        assert_eq!(value["partitions"][0], "p1");
        let back: RaidState = serde_json::from_value(value).unwrap();
        assert_eq!(back, state);
    }
}
