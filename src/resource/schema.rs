//! RAID resource schema
//!
//! Declares the resource attributes, validates configuration against them
//! and decides what a configuration change requires.

use super::state::{RaidConfig, RaidState};
use crate::error::{MaasError, Result};

/// Attribute value type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
    List,
}

/// One schema attribute
#[derive(Debug, Clone, Copy)]
pub struct Attribute {
    pub name: &'static str,
    pub kind: AttributeType,
    pub required: bool,
    pub computed: bool,
    /// A change requires replacing the RAID
    pub force_new: bool,
    pub description: &'static str,
}

impl Attribute {
    const fn new(name: &'static str, kind: AttributeType, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: false,
            computed: false,
            force_new: false,
            description,
        }
    }

    const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    const fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    const fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn optional(&self) -> bool {
        !self.required
    }
}

/// Resource type name
pub const RESOURCE_TYPE: &str = "maas_raid";

/// RAID levels MAAS accepts
pub const RAID_LEVELS: &[&str] = &["raid-0", "raid-1", "raid-5", "raid-6", "raid-10"];

/// The RAID resource schema
pub const RAID_SCHEMA: &[Attribute] = &[
    Attribute::new(
        "machine",
        AttributeType::String,
        "The identifier (system ID, hostname, or FQDN) of the machine for the new RAID.",
    )
    .required()
    .force_new(),
    Attribute::new("id", AttributeType::String, "The ID of the RAID.").computed(),
    Attribute::new("level", AttributeType::String, "The RAID level.")
        .required()
        .force_new(),
    Attribute::new(
        "block_devices",
        AttributeType::List,
        "Block devices (ID or name) in the RAID.",
    ),
    Attribute::new(
        "name",
        AttributeType::String,
        "The name of the RAID. Computed if not set.",
    )
    .computed(),
    Attribute::new(
        "partitions",
        AttributeType::List,
        "Partitions (ID or name) in the RAID.",
    )
    .required(),
    Attribute::new(
        "spare_partitions",
        AttributeType::List,
        "Spare partitions (ID or name) of the RAID.",
    ),
    Attribute::new(
        "spare_devices",
        AttributeType::List,
        "Spare block devices (ID or name) of the RAID.",
    ),
    Attribute::new("uuid", AttributeType::String, "UUID of the RAID.").computed(),
];

/// Look up an attribute by name
pub fn attribute(name: &str) -> Option<&'static Attribute> {
    RAID_SCHEMA.iter().find(|a| a.name == name)
}

/// Validate a configuration
pub fn validate(config: &RaidConfig) -> Result<()> {
    if config.machine.trim().is_empty() {
        return Err(MaasError::InvalidConfig("machine must not be empty".into()));
    }
    if !RAID_LEVELS.contains(&config.level.as_str()) {
        return Err(MaasError::InvalidConfig(format!(
            "unknown level {:?}, expected one of {}",
            config.level,
            RAID_LEVELS.join(", ")
        )));
    }
    if matches!(config.name.as_deref(), Some(n) if n.trim().is_empty()) {
        return Err(MaasError::InvalidConfig("name must not be empty when set".into()));
    }

    let m = &config.membership;
    for (attr, list) in [
        ("block_devices", &m.block_devices),
        ("partitions", &m.partitions),
        ("spare_devices", &m.spare_devices),
        ("spare_partitions", &m.spare_partitions),
    ] {
        for (i, item) in list.iter().enumerate() {
            if item.trim().is_empty() {
                return Err(MaasError::InvalidConfig(format!("{}[{}] is empty", attr, i)));
            }
            if list[..i].contains(item) {
                return Err(MaasError::InvalidConfig(format!(
                    "{} lists {:?} more than once",
                    attr, item
                )));
            }
        }
    }

    Ok(())
}

/// What applying a configuration requires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    Create,
    /// Delete and create again; names the force-new attributes that changed
    Replace(Vec<&'static str>),
    Update(Vec<&'static str>),
    NoChange,
}

/// Compare prior state with a configuration.
///
/// `resolved_machine` is the system id `config.machine` resolves to, when
/// known; the state stores system ids while configuration may use a
/// hostname.
pub fn plan(prior: Option<&RaidState>, config: &RaidConfig, resolved_machine: Option<&str>) -> Plan {
    let Some(prior) = prior else {
        return Plan::Create;
    };

    let mut replace = Vec::new();
    let machine_same =
        prior.machine == config.machine || resolved_machine == Some(prior.machine.as_str());
    if !machine_same {
        replace.push("machine");
    }
    if !prior.level.is_empty() && prior.level != config.level {
        replace.push("level");
    }
    if !replace.is_empty() {
        return Plan::Replace(replace);
    }

    let mut update = Vec::new();
    if matches!(config.name.as_deref(), Some(n) if n != prior.name) {
        update.push("name");
    }
    let (p, c) = (&prior.membership, &config.membership);
    for (attr, old, new) in [
        ("block_devices", &p.block_devices, &c.block_devices),
        ("partitions", &p.partitions, &c.partitions),
        ("spare_devices", &p.spare_devices, &c.spare_devices),
        ("spare_partitions", &p.spare_partitions, &c.spare_partitions),
    ] {
        let mut old: Vec<&String> = old.iter().collect();
        let mut new: Vec<&String> = new.iter().collect();
        old.sort_unstable();
        new.sort_unstable();
        if old != new {
            update.push(attr);
        }
    }

    if update.is_empty() {
        Plan::NoChange
    } else {
        Plan::Update(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::state::Membership;

    fn config() -> RaidConfig {
        RaidConfig {
            machine: "node-1".into(),
            level: "raid-1".into(),
            name: None,
            membership: Membership {
                partitions: vec!["p1".into(), "p2".into()],
                ..Default::default()
            },
        }
    }

    fn state() -> RaidState {
        RaidState {
            id: "7".into(),
            machine: "abc123".into(),
            name: "md0".into(),
            uuid: "u-1".into(),
            level: "raid-1".into(),
            membership: Membership {
                partitions: vec!["p2".into(), "p1".into()],
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_schema_flags() {
        let machine = attribute("machine").unwrap();
        assert!(machine.required && machine.force_new);
        let level = attribute("level").unwrap();
        assert!(level.required && level.force_new);
        let name = attribute("name").unwrap();
        assert!(name.optional() && name.computed);
        assert_eq!(attribute("partitions").unwrap().kind, AttributeType::List);
        assert!(attribute("uuid").unwrap().computed);
        assert!(attribute("size").is_none());
        assert_eq!(RAID_SCHEMA.len(), 9);
    }

    #[test]
    fn test_validate_accepts_minimal_config() {
        assert!(validate(&config()).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        let mut c = config();
        c.level = "raid-3".into();
        assert!(validate(&c).is_err());

        let mut c = config();
        c.machine = " ".into();
        assert!(validate(&c).is_err());

        let mut c = config();
        c.name = Some(String::new());
        assert!(validate(&c).is_err());

        let mut c = config();
        c.membership.partitions.push("p1".into());
        assert!(validate(&c).is_err());

        let mut c = config();
        c.membership.spare_devices.push("".into());
        assert!(validate(&c).is_err());
    }

    #[test]
    fn test_plan_create_without_state() {
        assert_eq!(plan(None, &config(), None), Plan::Create);
    }

    #[test]
    fn test_plan_no_change_with_resolved_machine() {
        assert_eq!(plan(Some(&state()), &config(), Some("abc123")), Plan::NoChange);
    }

    #[test]
    fn test_plan_replace_on_level_change() {
        let mut c = config();
        c.level = "raid-5".into();
        assert_eq!(
            plan(Some(&state()), &c, Some("abc123")),
            Plan::Replace(vec!["level"])
        );
    }

    #[test]
    fn test_plan_replace_on_machine_change() {
        assert_eq!(
            plan(Some(&state()), &config(), Some("other")),
            Plan::Replace(vec!["machine"])
        );
    }

    #[test]
    fn test_plan_update_on_membership_change() {
        let mut c = config();
        c.membership.partitions.push("p3".into());
        c.name = Some("md1".into());
        assert_eq!(
            plan(Some(&state()), &c, Some("abc123")),
            Plan::Update(vec!["name", "partitions"])
        );
    }
}
