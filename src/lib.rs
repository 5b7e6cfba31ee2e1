//! Declarative management of MAAS machine RAID arrays.
//!
//! [`maas`] wraps the MAAS REST API; [`resource`] implements the RAID
//! resource lifecycle on top of it; [`host`] refreshes, plans and applies it
//! against the record kept by [`store`]; [`config`] holds provider settings.

pub mod config;
pub mod error;
pub mod host;
pub mod maas;
pub mod resource;
pub mod store;

pub use error::{MaasError, Result};
