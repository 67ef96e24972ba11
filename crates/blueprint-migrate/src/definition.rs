//! JSON table definitions.
//!
//! A definition lists columns in declaration order and is replayed onto a
//! [`Blueprint`] through the same registrar and constraint calls a
//! hand-written migration would make:
//!
//! ```json
//! {
//!     "table": "users",
//!     "columns": [
//!         { "type": "integer", "name": "id", "auto_increment": true, "primary": true },
//!         { "type": "string", "name": "email", "size": 120, "unique": true },
//!         { "type": "enumerate", "name": "role", "values": ["admin", "member"] }
//!     ]
//! }
//! ```

use std::path::Path;

use blueprint_core::{Arg, Blueprint, DefaultValue, FieldType, SchemaError, TableOptions};
use serde::Deserialize;
use tracing::debug;

use crate::error::Result;
use crate::migration::Migration;
use crate::schema::Schema;

/// Default value as written in a definition file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DefaultSpec {
    /// A JSON number.
    Integer(i64),
    /// A JSON string.
    Text(String),
}

impl From<DefaultSpec> for DefaultValue {
    fn from(spec: DefaultSpec) -> Self {
        match spec {
            DefaultSpec::Integer(i) => Self::Integer(i),
            DefaultSpec::Text(s) => Self::Text(s),
        }
    }
}

/// One column of a definition file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColumnSpec {
    /// Registrar name, e.g. `integer`, `bigInteger` or `timestamp`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Column name.
    pub name: String,
    /// Column size.
    #[serde(default)]
    pub size: Option<u64>,
    /// Whether the column accepts NULL.
    #[serde(default)]
    pub nullable: Option<bool>,
    /// Default value.
    #[serde(default)]
    pub default: Option<DefaultSpec>,
    /// Allowed literals of an `enumerate` column.
    #[serde(default)]
    pub values: Vec<String>,
    /// Primary key flag.
    #[serde(default)]
    pub primary: bool,
    /// Unique flag.
    #[serde(default)]
    pub unique: bool,
    /// Index flag.
    #[serde(default)]
    pub indexed: bool,
    /// Auto-increment flag.
    #[serde(default)]
    pub auto_increment: bool,
}

impl ColumnSpec {
    fn args(&self, field_type: FieldType) -> blueprint_core::Result<Vec<Arg>> {
        let mut args = Vec::new();
        if let Some(size) = self.size {
            args.push(Arg::Size(size));
        }
        if let Some(nullable) = self.nullable {
            args.push(Arg::Null(nullable));
        }
        if let Some(default) = &self.default {
            args.push(Arg::Default(self.default_value(field_type, default)?));
        }
        if !self.values.is_empty() {
            args.push(Arg::Default(DefaultValue::Values(self.values.clone())));
        }
        Ok(args)
    }

    /// Integer columns only take numbers, possibly written as strings.
    fn default_value(
        &self,
        field_type: FieldType,
        default: &DefaultSpec,
    ) -> blueprint_core::Result<DefaultValue> {
        match default {
            DefaultSpec::Text(text) if field_type.is_integer() => text
                .trim()
                .parse()
                .map(DefaultValue::Integer)
                .map_err(|_| SchemaError::InvalidDefault {
                    field: self.name.clone(),
                    field_type,
                    value: text.clone(),
                }),
            _ => Ok(default.clone().into()),
        }
    }

    fn apply(&self, blueprint: &mut Blueprint) -> blueprint_core::Result<()> {
        let field_type: FieldType = self.kind.parse()?;
        let args = self.args(field_type)?;
        blueprint.register(&self.kind, self.name.as_str(), &args)?;
        if self.auto_increment {
            blueprint.auto_increment(None)?;
        }
        if self.primary {
            blueprint.primary()?;
        }
        if self.unique {
            blueprint.unique()?;
        }
        if self.indexed {
            blueprint.indexed()?;
        }
        Ok(())
    }
}

/// A table described as data.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TableDefinition {
    /// Table name.
    pub table: String,
    /// Engine override.
    #[serde(default)]
    pub engine: Option<String>,
    /// Charset override.
    #[serde(default)]
    pub charset: Option<String>,
    /// Columns in declaration order.
    pub columns: Vec<ColumnSpec>,
}

impl TableDefinition {
    /// Parses a definition from JSON text.
    ///
    /// # Errors
    ///
    /// Returns a serialization error for malformed documents.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a definition file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "Loaded table definition");
        Self::from_json(&contents)
    }

    /// Replays the definition onto a fresh blueprint.
    ///
    /// Engine and charset fall back to `options` when the definition does not
    /// override them.
    ///
    /// # Errors
    ///
    /// Returns the first blueprint error raised while applying the engine
    /// and charset overrides or replaying columns.
    pub fn blueprint(&self, options: &TableOptions) -> Result<Blueprint> {
        let mut blueprint = Blueprint::with_options(options.clone());
        blueprint.set_table_name(self.table.as_str());
        if let Some(engine) = &self.engine {
            blueprint.set_engine(engine.as_str())?;
        }
        if let Some(charset) = &self.charset {
            blueprint.set_charset(charset.as_str())?;
        }

        for column in &self.columns {
            column.apply(&mut blueprint)?;
        }
        Ok(blueprint)
    }
}

/// Creates the defined table on `up` and drops it on `down`.
#[derive(Debug, Clone)]
pub struct DefinitionMigration {
    name: String,
    definition: TableDefinition,
    options: TableOptions,
}

impl DefinitionMigration {
    /// Wraps a definition; `options` supplies engine and charset defaults.
    #[must_use]
    pub fn new(definition: TableDefinition, options: TableOptions) -> Self {
        Self {
            name: format!("create_{}", definition.table),
            definition,
            options,
        }
    }

    /// The wrapped definition.
    #[must_use]
    pub const fn definition(&self) -> &TableDefinition {
        &self.definition
    }
}

impl Migration for DefinitionMigration {
    fn name(&self) -> &str {
        &self.name
    }

    fn up(&self, schema: &mut Schema) -> Result<()> {
        let blueprint = self.definition.blueprint(&self.options)?;
        schema.create_from(&blueprint)?;
        Ok(())
    }

    fn down(&self, schema: &mut Schema) -> Result<()> {
        schema.drop(&self.definition.table);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MigrateError;

    const USERS: &str = r#"{
        "table": "users",
        "engine": "InnoDB",
        "columns": [
            { "type": "integer", "name": "id", "auto_increment": true, "primary": true },
            { "type": "string", "name": "email", "size": 120, "unique": true },
            { "type": "integer", "name": "age", "nullable": true, "default": 18 },
            { "type": "enumerate", "name": "role", "values": ["admin", "member"] },
            { "type": "timestamps", "name": "created_at" }
        ]
    }"#;

    #[test]
    fn test_replay_definition() {
        let definition = TableDefinition::from_json(USERS).unwrap();
        let blueprint = definition.blueprint(&TableOptions::default()).unwrap();

        assert_eq!(blueprint.table_name(), Some("users"));
        assert_eq!(
            blueprint.to_sql().unwrap(),
            "create table :table: (\
             `id` integer(11) not null auto_increment, primary key (`id`), \
             `age` integer(11) null default 18, \
             `email` string(120) not null unique, \
             `role` enum('admin', 'member'), \
             `created_at` timestamp not null\
             ) engine=InnoDB default charset=UTF8;"
        );
    }

    #[test]
    fn test_unknown_column_type() {
        let definition = TableDefinition::from_json(
            r#"{ "table": "t", "columns": [{ "type": "float", "name": "ratio" }] }"#,
        )
        .unwrap();

        let err = definition.blueprint(&TableOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            MigrateError::Schema(SchemaError::UnknownRegistrationMethod(method)) if method == "float"
        ));
    }

    #[test]
    fn test_text_default() {
        let definition = TableDefinition::from_json(
            r#"{ "table": "t", "columns": [{ "type": "string", "name": "nick", "default": "anon" }] }"#,
        )
        .unwrap();
        let blueprint = definition.blueprint(&TableOptions::default()).unwrap();
        assert!(blueprint
            .to_sql()
            .unwrap()
            .contains("`nick` string(255) not null default 'anon'"));
    }

    #[test]
    fn test_rejects_unsafe_engine_override() {
        let definition = TableDefinition::from_json(
            r#"{ "table": "t", "engine": "InnoDB; drop table users; --",
                 "columns": [{ "type": "integer", "name": "id" }] }"#,
        )
        .unwrap();

        let err = definition.blueprint(&TableOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            MigrateError::Schema(SchemaError::InvalidTableOption { option: "engine", .. })
        ));
    }

    #[test]
    fn test_integer_default_must_be_numeric() {
        let definition = TableDefinition::from_json(
            r#"{ "table": "t", "columns": [
                { "type": "integer", "name": "owner", "default": "0) ; drop table users; --" }
            ] }"#,
        )
        .unwrap();

        let err = definition.blueprint(&TableOptions::default()).unwrap_err();
        match err {
            MigrateError::Schema(SchemaError::InvalidDefault { field, field_type, .. }) => {
                assert_eq!(field, "owner");
                assert_eq!(field_type, FieldType::Integer);
            }
            other => panic!("Expected InvalidDefault, got {other:?}"),
        }

        let definition = TableDefinition::from_json(
            r#"{ "table": "t", "columns": [{ "type": "bigInteger", "name": "n", "default": "42" }] }"#,
        )
        .unwrap();
        let blueprint = definition.blueprint(&TableOptions::default()).unwrap();
        assert!(blueprint
            .to_sql()
            .unwrap()
            .contains("`n` biginteger(20) not null default 42"));
    }

    #[test]
    fn test_definition_migration() {
        let definition = TableDefinition::from_json(USERS).unwrap();
        let migration = DefinitionMigration::new(definition, TableOptions::default());
        assert_eq!(migration.name(), "create_users");

        let mut up = Schema::default();
        migration.up(&mut up).unwrap();
        assert!(up.statements()[0].starts_with("create table `users` ("));

        let mut down = Schema::default();
        migration.down(&mut down).unwrap();
        assert_eq!(down.statements(), ["drop table if exists `users`;"]);
    }
}
