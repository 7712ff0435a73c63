//! `tokio-postgres`-backed catalog loading and prepared-statement probing
//! for `sqlshape-core`.
//!
//! This crate supplies the one piece `sqlshape-core` deliberately leaves
//! abstract behind [`sqlshape_core::ProbeConn`]: an actual wire connection
//! to a running Postgres server. Load a [`Catalog`] once with
//! [`catalog_loader::load_catalog`], then hand a [`probe::PgProbe`] to
//! [`sqlshape_core::analyze`] for each statement.

pub mod catalog_loader;
pub mod error;
pub mod probe;

pub use catalog_loader::load_catalog;
pub use error::PgAdapterError;
pub use probe::PgProbe;
pub use sqlshape_core::catalog::Catalog;
