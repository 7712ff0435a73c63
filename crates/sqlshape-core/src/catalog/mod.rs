//! The catalog data model: an immutable snapshot of the schema the
//! analyzer runs against, per §3.

mod classify;

pub use classify::{classify_function, classify_operator, is_aggregate_function, FunctionClass, OperatorClass};

use serde::{Deserialize, Serialize};

/// A Postgres type OID.
pub type Oid = u32;

/// The structural kind of a catalog type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeKind {
    Base,
    Enum,
    Composite,
    Array { element: Oid },
    /// A `CREATE DOMAIN` type. `not_null` mirrors the domain's own `NOT
    /// NULL` constraint, which a value of this type must additionally
    /// satisfy regardless of the column/expression nullability that would
    /// otherwise apply.
    Domain { base: Oid, not_null: bool },
}

/// A named scalar, composite, enum, domain or array type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Type {
    pub oid: Oid,
    pub schema: String,
    pub name: String,
    pub kind: TypeKind,
}

/// The ordered label set of an enum type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enum {
    pub type_oid: Oid,
    pub labels: Vec<String>,
}

/// A table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub type_oid: Oid,
    /// Whether the column accepts NULL (i.e. has no `NOT NULL` constraint
    /// and is not a primary key column).
    pub nullable: bool,
    pub has_default: bool,
}

/// A table (or view) definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub schema: String,
    pub name: String,
    pub columns: Vec<Column>,
    /// Column names making up the primary key, in key order. Empty if the
    /// table has none.
    pub primary_key: Vec<String>,
}

impl Table {
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    #[must_use]
    pub fn is_primary_key(&self, name: &str) -> bool {
        self.primary_key.iter().any(|pk| pk == name)
    }
}

/// An immutable snapshot of the schema visible to the analyzer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub tables: Vec<Table>,
    pub types: Vec<Type>,
    pub enums: Vec<Enum>,
    /// The schema search order used to resolve an unqualified table name,
    /// first match wins.
    pub search_path: Vec<String>,
}

impl Catalog {
    #[must_use]
    pub fn new(search_path: Vec<String>) -> Self {
        Self {
            tables: Vec::new(),
            types: Vec::new(),
            enums: Vec::new(),
            search_path,
        }
    }

    /// Resolves a (possibly unqualified) table name against `search_path`.
    #[must_use]
    pub fn find_table(&self, schema: Option<&str>, name: &str) -> Option<&Table> {
        if let Some(schema) = schema {
            return self.tables.iter().find(|t| t.schema == schema && t.name == name);
        }
        for schema in &self.search_path {
            if let Some(table) = self.tables.iter().find(|t| &t.schema == schema && t.name == name) {
                return Some(table);
            }
        }
        self.tables.iter().find(|t| t.name == name)
    }

    #[must_use]
    pub fn find_type(&self, oid: Oid) -> Option<&Type> {
        self.types.iter().find(|t| t.oid == oid)
    }

    #[must_use]
    pub fn find_type_by_name(&self, name: &str) -> Option<&Type> {
        self.types.iter().find(|t| t.name == name)
    }

    #[must_use]
    pub fn find_enum(&self, type_oid: Oid) -> Option<&Enum> {
        self.enums.iter().find(|e| e.type_oid == type_oid)
    }

    /// Resolves a type down through its domain chain to the underlying
    /// base/composite/array/enum type, and whether any domain along the
    /// way added a `NOT NULL` constraint.
    #[must_use]
    pub fn resolve_domain(&self, oid: Oid) -> (Oid, bool) {
        let mut current = oid;
        let mut not_null = false;
        while let Some(ty) = self.find_type(current) {
            match &ty.kind {
                TypeKind::Domain { base, not_null: dn } => {
                    not_null = not_null || *dn;
                    current = *base;
                }
                _ => break,
            }
        }
        (current, not_null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> Catalog {
        let mut catalog = Catalog::new(vec!["public".to_string()]);
        catalog.tables.push(Table {
            schema: "public".to_string(),
            name: "person".to_string(),
            columns: vec![
                Column {
                    name: "id".to_string(),
                    type_oid: 23,
                    nullable: false,
                    has_default: true,
                },
                Column {
                    name: "name".to_string(),
                    type_oid: 25,
                    nullable: true,
                    has_default: false,
                },
            ],
            primary_key: vec!["id".to_string()],
        });
        catalog
    }

    #[test]
    fn test_find_table_unqualified_uses_search_path() {
        let catalog = sample_catalog();
        let table = catalog.find_table(None, "person").unwrap();
        assert_eq!(table.schema, "public");
    }

    #[test]
    fn test_column_lookup_and_primary_key() {
        let catalog = sample_catalog();
        let table = catalog.find_table(None, "person").unwrap();
        assert!(table.is_primary_key("id"));
        assert!(!table.column("id").unwrap().nullable);
        assert!(table.column("name").unwrap().nullable);
    }

    #[test]
    fn test_resolve_domain_chain() {
        let mut catalog = Catalog::new(vec!["public".to_string()]);
        catalog.types.push(Type {
            oid: 100,
            schema: "public".to_string(),
            name: "email".to_string(),
            kind: TypeKind::Domain { base: 25, not_null: true },
        });
        let (base, not_null) = catalog.resolve_domain(100);
        assert_eq!(base, 25);
        assert!(not_null);
    }
}
