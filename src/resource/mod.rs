//! RAID resource
//!
//! Maps declarative RAID configuration onto the MAAS API and reconciles the
//! responses into managed state.
//!
//! # Architecture
//!
//! - [`schema`] - Attribute table, validation and planning
//! - [`state`] - Typed configuration and the persisted state record
//! - [`delta`] - Membership additions and removals for updates
//! - [`import`] - `MACHINE:RAID` import identifiers
//! - [`raid`] - Create, Read, Update, Delete and Import
//!
//! # Example
//!
//! ```ignore
//! use maas_raid::resource::{raid, RaidConfig};
//!
//! async fn apply(client: &MaasClient, config: &RaidConfig) -> maas_raid::Result<RaidState> {
//!     raid::create(client, config).await
//! }
//! ```

pub mod delta;
pub mod import;
pub mod raid;
pub mod schema;
pub mod state;

pub use delta::{compute_additions, compute_removals, MembershipDelta};
pub use import::ImportId;
pub use schema::{plan, validate, Plan};
pub use state::{Membership, RaidConfig, RaidState};
