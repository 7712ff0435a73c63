//! A [`ProbeConn`] implementation backed by a live `tokio-postgres` client.
//!
//! `tokio-postgres`'s own `Client::prepare` already performs the extended
//! protocol's Parse+Describe in one round trip and returns an opaque
//! [`tokio_postgres::Statement`], closed automatically on drop. To satisfy
//! `sqlshape-core`'s string-handle `ProbeConn` contract, this adapter hands
//! out synthetic handles and keeps the real `Statement` in a side table;
//! `deallocate` drops it, which is this adapter's equivalent of the RAII
//! guard described in §5.
use std::collections::HashMap;

use sqlshape_core::catalog::Oid;
use sqlshape_core::probe::{ProbeConn, ProbeDescription};
use sqlshape_core::AnalyzerError;
use tokio_postgres::types::Type as PgType;
use tokio_postgres::{Client, Statement};

/// Bridges `sqlshape_core::ProbeConn`'s synchronous trait methods onto an
/// async `tokio-postgres` client via a captured runtime [`tokio::runtime::Handle`].
pub struct PgProbe {
    client: Client,
    handle: tokio::runtime::Handle,
    statements: HashMap<String, Statement>,
    next_id: u64,
}

impl PgProbe {
    #[must_use]
    pub fn new(client: Client, handle: tokio::runtime::Handle) -> Self {
        Self {
            client,
            handle,
            statements: HashMap::new(),
            next_id: 0,
        }
    }
}

fn type_to_oid(ty: &PgType) -> Oid {
    ty.oid()
}

impl ProbeConn for PgProbe {
    fn prepare(&mut self, sql: &str) -> Result<String, AnalyzerError> {
        let statement = self
            .handle
            .block_on(self.client.prepare(sql))
            .map_err(|err| AnalyzerError::Probe(err.to_string()))?;
        self.next_id += 1;
        let handle = format!("sqlshape_{}", self.next_id);
        self.statements.insert(handle.clone(), statement);
        Ok(handle)
    }

    fn describe(&mut self, handle: &str) -> Result<ProbeDescription, AnalyzerError> {
        let statement = self
            .statements
            .get(handle)
            .ok_or_else(|| AnalyzerError::Probe(format!("no such prepared statement: {handle}")))?;
        let parameter_types = statement.params().iter().map(type_to_oid).collect();
        let output_columns = statement
            .columns()
            .iter()
            .map(|column| (column.name().to_string(), type_to_oid(column.type_())))
            .collect();
        Ok(ProbeDescription {
            parameter_types,
            output_columns,
        })
    }

    fn deallocate(&mut self, handle: &str) -> Result<(), AnalyzerError> {
        self.statements.remove(handle);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_postgres::NoTls;

    /// Requires `DATABASE_URL` pointing at a live Postgres instance.
    #[test]
    #[ignore = "requires a live postgres instance via DATABASE_URL"]
    fn test_prepare_describe_deallocate_round_trip() {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let handle = runtime.handle().clone();
        let client = runtime.block_on(async {
            let (client, connection) = tokio_postgres::connect(&database_url, NoTls).await.unwrap();
            tokio::spawn(connection);
            client
        });
        let mut probe = PgProbe::new(client, handle);
        let stmt_handle = probe.prepare("SELECT $1::int4 AS n").unwrap();
        let description = probe.describe(&stmt_handle).unwrap();
        assert_eq!(description.parameter_types.len(), 1);
        assert_eq!(description.output_columns.len(), 1);
        probe.deallocate(&stmt_handle).unwrap();
        assert!(probe.describe(&stmt_handle).is_err());
    }
}
