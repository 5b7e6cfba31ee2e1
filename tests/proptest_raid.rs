//! Property-based tests using proptest
//!
//! These tests verify import identifier parsing and the membership delta
//! algebra using randomized inputs.

use maas_raid::resource::{compute_additions, compute_removals, ImportId, Membership, MembershipDelta};
use proptest::prelude::*;
use std::collections::BTreeSet;

/// Identifier half: an id or a name, never containing ':'
fn arb_segment() -> impl Strategy<Value = String> {
    prop_oneof!["[0-9]{1,6}", "[a-z][a-z0-9.-]{0,30}"]
}

/// A member list drawn from a small pool so lists overlap often
fn arb_members() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop_oneof!["p[0-9]", "sd[a-f]", "[0-9]{1,2}"],
        0..12,
    )
}

fn as_set(list: &[String]) -> BTreeSet<String> {
    list.iter().cloned().collect()
}

proptest! {
    /// Well-formed MACHINE:RAID ids parse back to their halves
    #[test]
    fn valid_import_ids_parse(machine in arb_segment(), raid in arb_segment()) {
        let id = format!("{}:{}", machine, raid);
        let parsed = ImportId::parse(&id).unwrap();
        prop_assert_eq!(&parsed.machine, &machine);
        prop_assert_eq!(&parsed.raid, &raid);
        prop_assert_eq!(parsed.to_string(), id);
    }

    /// Anything without a colon is rejected
    #[test]
    fn ids_without_colon_fail(id in "[^:]*") {
        prop_assert!(ImportId::parse(&id).is_err());
    }

    /// More than one colon is rejected
    #[test]
    fn ids_with_extra_colons_fail(
        a in arb_segment(),
        b in arb_segment(),
        rest in prop::collection::vec(arb_segment(), 1..3)
    ) {
        let id = format!("{}:{}:{}", a, b, rest.join(":"));
        prop_assert!(ImportId::parse(&id).is_err());
    }

    /// An empty half is rejected
    #[test]
    fn ids_with_empty_half_fail(segment in arb_segment()) {
        let leading = format!(":{}", segment);
        let trailing = format!("{}:", segment);
        prop_assert!(ImportId::parse(&leading).is_err());
        prop_assert!(ImportId::parse(&trailing).is_err());
    }

    /// Additions come from new, are absent from old, and are unique
    #[test]
    fn additions_are_new_only(old in arb_members(), new in arb_members()) {
        let added = compute_additions(&old, &new);
        let unique = as_set(&added);
        prop_assert_eq!(unique.len(), added.len());
        for item in &added {
            prop_assert!(new.contains(item));
            prop_assert!(!old.contains(item));
        }
    }

    /// Removals come from old and are absent from new
    #[test]
    fn removals_are_old_only(old in arb_members(), new in arb_members()) {
        for item in &compute_removals(&old, &new) {
            prop_assert!(old.contains(item));
            prop_assert!(!new.contains(item));
        }
    }

    /// Applying the delta to the old set yields the new set
    #[test]
    fn delta_applied_reaches_desired(old in arb_members(), new in arb_members()) {
        let mut result = as_set(&old);
        for item in compute_removals(&old, &new) {
            result.remove(&item);
        }
        result.extend(compute_additions(&old, &new));
        prop_assert_eq!(result, as_set(&new));
    }

    /// Growing a list never produces removals
    #[test]
    fn growing_emits_no_removals(old in arb_members(), extra in arb_members()) {
        let mut new = old.clone();
        new.extend(extra);
        let current = Membership { partitions: old, ..Default::default() };
        let desired = Membership { partitions: new, ..Default::default() };
        let delta = MembershipDelta::between(&current, &desired);
        prop_assert_eq!(delta.remove, Membership::default());
    }
}
