//! Errors raised talking to a live backend, and their mapping onto
//! `sqlshape_core::AnalyzerError`.

use sqlshape_core::AnalyzerError;

/// Errors specific to the `tokio-postgres` adapter.
#[derive(Debug, thiserror::Error)]
pub enum PgAdapterError {
    /// The underlying wire-protocol call failed.
    #[error("postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    /// A catalog row referenced an OID the loader never saw, e.g. a domain
    /// whose base type lives in a schema outside `search_path`.
    #[error("catalog referenced unknown type oid {0}")]
    DanglingTypeOid(u32),
}

pub type Result<T> = std::result::Result<T, PgAdapterError>;

impl From<PgAdapterError> for AnalyzerError {
    fn from(err: PgAdapterError) -> Self {
        match err {
            PgAdapterError::Postgres(err) => Self::Probe(err.to_string()),
            PgAdapterError::DanglingTypeOid(oid) => {
                Self::Catalog(format!("dangling type oid {oid}"))
            }
        }
    }
}
