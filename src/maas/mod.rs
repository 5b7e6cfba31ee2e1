//! MAAS API interaction module
//!
//! This module provides the client side of the MAAS REST API used by the
//! RAID resource: authentication, HTTP transport, machines and RAIDs.
//!
//! # Module Structure
//!
//! - [`auth`] - OAuth 1.0 PLAINTEXT request signing from a MAAS API key
//! - [`client`] - Main MAAS client and URL builders
//! - [`http`] - HTTP utilities for form-encoded REST calls
//! - [`machines`] - Machine listing and identifier resolution
//! - [`raids`] - RAID entities and endpoints
//!
//! # Example
//!
//! ```ignore
//! use maas_raid::maas::{client::MaasClient, machines, raids};
//!
//! async fn example() -> maas_raid::Result<()> {
//!     let client = MaasClient::new("http://maas:5240/MAAS", "ck:tk:secret", "2.0")?;
//!     let machine = machines::resolve_machine(&client, "node-1").await?;
//!     let arrays = raids::list_raids(&client, &machine.system_id).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;
pub mod machines;
pub mod raids;
