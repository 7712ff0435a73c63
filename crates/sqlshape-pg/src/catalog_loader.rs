//! Loads a [`Catalog`] snapshot from `pg_catalog` over a live connection.

use std::collections::HashMap;

use sqlshape_core::catalog::{Catalog, Column, Enum, Oid, Table, Type, TypeKind};
use tokio_postgres::Client;
use tracing::debug;

use crate::error::Result;

const TABLES_QUERY: &str = "SELECT c.oid, n.nspname, c.relname
             FROM pg_class c
             JOIN pg_namespace n ON n.oid = c.relnamespace
             WHERE c.relkind IN ('r', 'v', 'm', 'p')
               AND n.nspname = ANY($1)";

const COLUMNS_QUERY: &str = "SELECT a.attrelid, a.attname, a.atttypid, a.attnotnull, a.atthasdef
             FROM pg_attribute a
             WHERE a.attrelid = ANY($1)
               AND a.attnum > 0
               AND NOT a.attisdropped
             ORDER BY a.attrelid, a.attnum";

const PRIMARY_KEYS_QUERY: &str = "SELECT i.indrelid,
                    array_agg(a.attname ORDER BY array_position(i.indkey::int2[], a.attnum))
             FROM pg_index i
             JOIN pg_attribute a ON a.attrelid = i.indrelid AND a.attnum = ANY(i.indkey::int2[])
             WHERE i.indisprimary AND i.indrelid = ANY($1)
             GROUP BY i.indrelid";

const TYPES_QUERY: &str = "SELECT t.oid, n.nspname, t.typname, t.typtype::text, t.typbasetype,
                    t.typnotnull, t.typelem, t.typcategory::text
             FROM pg_type t
             JOIN pg_namespace n ON n.oid = t.typnamespace
             WHERE n.nspname = ANY($1)";

const ENUMS_QUERY: &str = "SELECT e.enumtypid, e.enumlabel
             FROM pg_enum e
             WHERE e.enumtypid = ANY($1)
             ORDER BY e.enumtypid, e.enumsortorder";

/// Loads every table/view, column, primary key, type, domain and enum
/// visible under `search_path` into an in-memory [`Catalog`]. Types are
/// additionally resolved against `pg_catalog` itself, so built-in scalar
/// types come back too; tables are not, so system relations like
/// `pg_class` never show up in [`Catalog::tables`].
pub async fn load_catalog(client: &Client, search_path: Vec<String>) -> Result<Catalog> {
    let mut schemas = search_path.clone();
    if !schemas.iter().any(|s| s == "pg_catalog") {
        schemas.push("pg_catalog".to_string());
    }

    let tables = load_tables(client, &search_path).await?;
    let columns_by_table = load_columns(client, &tables).await?;
    let primary_keys = load_primary_keys(client, &tables).await?;

    let tables = tables
        .into_iter()
        .map(|(oid, schema, name)| Table {
            schema,
            name,
            columns: columns_by_table.get(&oid).cloned().unwrap_or_default(),
            primary_key: primary_keys.get(&oid).cloned().unwrap_or_default(),
        })
        .collect::<Vec<_>>();

    let types = load_types(client, &schemas).await?;
    let enums = load_enums(client, &types).await?;

    debug!(
        tables = tables.len(),
        types = types.len(),
        enums = enums.len(),
        "loaded catalog snapshot"
    );

    Ok(Catalog {
        tables,
        types,
        enums,
        search_path,
    })
}

async fn load_tables(client: &Client, schemas: &[String]) -> Result<Vec<(Oid, String, String)>> {
    let rows = client
        .query(TABLES_QUERY, &[&schemas])
        .await?;
    Ok(rows
        .iter()
        .map(|row| (row.get::<_, u32>(0), row.get(1), row.get(2)))
        .collect())
}

async fn load_columns(
    client: &Client,
    tables: &[(Oid, String, String)],
) -> Result<HashMap<Oid, Vec<Column>>> {
    let table_oids: Vec<Oid> = tables.iter().map(|(oid, _, _)| *oid).collect();
    let rows = client
        .query(COLUMNS_QUERY, &[&table_oids])
        .await?;
    let mut columns_by_table: HashMap<Oid, Vec<Column>> = HashMap::new();
    for row in rows {
        let table_oid: u32 = row.get(0);
        let not_null: bool = row.get(3);
        columns_by_table.entry(table_oid).or_default().push(Column {
            name: row.get(1),
            type_oid: row.get::<_, u32>(2),
            nullable: !not_null,
            has_default: row.get(4),
        });
    }
    Ok(columns_by_table)
}

async fn load_primary_keys(
    client: &Client,
    tables: &[(Oid, String, String)],
) -> Result<HashMap<Oid, Vec<String>>> {
    let table_oids: Vec<Oid> = tables.iter().map(|(oid, _, _)| *oid).collect();
    let rows = client
        .query(PRIMARY_KEYS_QUERY, &[&table_oids])
        .await?;
    Ok(rows
        .iter()
        .map(|row| (row.get::<_, u32>(0), row.get(1)))
        .collect())
}

async fn load_types(client: &Client, schemas: &[String]) -> Result<Vec<Type>> {
    let rows = client
        .query(TYPES_QUERY, &[&schemas])
        .await?;
    Ok(rows
        .iter()
        .map(|row| {
            let oid: u32 = row.get(0);
            let typtype: String = row.get(3);
            let base_oid: u32 = row.get(4);
            let not_null: bool = row.get(5);
            let typelem: u32 = row.get(6);
            let typcategory: String = row.get(7);
            let kind = if typcategory == "A" && typelem != 0 {
                TypeKind::Array { element: typelem }
            } else {
                match typtype.as_str() {
                    "e" => TypeKind::Enum,
                    "c" => TypeKind::Composite,
                    "d" => TypeKind::Domain {
                        base: base_oid,
                        not_null,
                    },
                    _ => TypeKind::Base,
                }
            };
            Type {
                oid,
                schema: row.get(1),
                name: row.get(2),
                kind,
            }
        })
        .collect())
}

async fn load_enums(client: &Client, types: &[Type]) -> Result<Vec<Enum>> {
    let enum_oids: Vec<Oid> = types
        .iter()
        .filter(|t| matches!(t.kind, TypeKind::Enum))
        .map(|t| t.oid)
        .collect();
    if enum_oids.is_empty() {
        return Ok(Vec::new());
    }
    let rows = client
        .query(ENUMS_QUERY, &[&enum_oids])
        .await?;
    let mut labels_by_type: HashMap<Oid, Vec<String>> = HashMap::new();
    for row in rows {
        labels_by_type
            .entry(row.get::<_, u32>(0))
            .or_default()
            .push(row.get(1));
    }
    Ok(labels_by_type
        .into_iter()
        .map(|(type_oid, labels)| Enum { type_oid, labels })
        .collect())
}
