//! Membership deltas
//!
//! MAAS updates RAID membership with `add_*` and `remove_*` parameters
//! rather than a full replacement list.

use super::state::Membership;
use crate::maas::raids::RaidParams;

/// Entries of `new` missing from `old`, in `new` order, without duplicates
pub fn compute_additions(old: &[String], new: &[String]) -> Vec<String> {
    difference(new, old)
}

/// Entries of `old` missing from `new`, in `old` order, without duplicates
pub fn compute_removals(old: &[String], new: &[String]) -> Vec<String> {
    difference(old, new)
}

fn difference(from: &[String], without: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in from {
        if !without.contains(item) && !out.contains(item) {
            out.push(item.clone());
        }
    }
    out
}

/// Additions and removals for every member list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipDelta {
    pub add: Membership,
    pub remove: Membership,
}

impl MembershipDelta {
    pub fn between(current: &Membership, desired: &Membership) -> Self {
        let add = Membership {
            block_devices: compute_additions(&current.block_devices, &desired.block_devices),
            partitions: compute_additions(&current.partitions, &desired.partitions),
            spare_devices: compute_additions(&current.spare_devices, &desired.spare_devices),
            spare_partitions: compute_additions(
                &current.spare_partitions,
                &desired.spare_partitions,
            ),
        };
        let remove = Membership {
            block_devices: compute_removals(&current.block_devices, &desired.block_devices),
            partitions: compute_removals(&current.partitions, &desired.partitions),
            spare_devices: compute_removals(&current.spare_devices, &desired.spare_devices),
            spare_partitions: compute_removals(
                &current.spare_partitions,
                &desired.spare_partitions,
            ),
        };

        Self { add, remove }
    }

    pub fn is_empty(&self) -> bool {
        self.add == Membership::default() && self.remove == Membership::default()
    }

    /// Update parameters carrying this delta
    pub fn into_params(self, name: Option<String>, uuid: Option<String>) -> RaidParams {
        RaidParams {
            name,
            uuid,
            add_block_devices: self.add.block_devices,
            remove_block_devices: self.remove.block_devices,
            add_partitions: self.add.partitions,
            remove_partitions: self.remove.partitions,
            add_spare_devices: self.add.spare_devices,
            remove_spare_devices: self.remove.spare_devices,
            add_spare_partitions: self.add.spare_partitions,
            remove_spare_partitions: self.remove.spare_partitions,
        }
    }
}
