//! Single-pass compilation of a blueprint into a `CREATE TABLE` statement.

use tracing::trace;

use crate::blueprint::Blueprint;
use crate::catalog::FieldRef;
use crate::field::{quote_literal, DefaultValue, FieldDefinition, FieldType};

/// Placeholder standing in for the table name in rendered statements.
pub const TABLE_PLACEHOLDER: &str = ":table:";

/// Quotes an identifier with back-quotes, doubling embedded back-quotes.
#[must_use]
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Walks the catalog of a blueprint once and emits one fragment per column.
///
/// Each render starts from an empty buffer, so rendering the same blueprint
/// twice yields the same statement.
#[derive(Debug)]
pub struct StatementRenderer<'a> {
    blueprint: &'a Blueprint,
    fragments: Vec<String>,
    auto_increment: Option<FieldRef>,
}

impl<'a> StatementRenderer<'a> {
    /// Creates a renderer over a blueprint.
    #[must_use]
    pub fn new(blueprint: &'a Blueprint) -> Self {
        Self {
            blueprint,
            fragments: Vec::new(),
            auto_increment: blueprint.auto_increment_target().cloned(),
        }
    }

    /// Renders the statement, or `None` if the blueprint has no columns.
    #[must_use]
    pub fn render(mut self) -> Option<String> {
        let blueprint = self.blueprint;
        for group in blueprint.catalog().groups() {
            for field in group.fields() {
                let fragment = self.field_fragment(field);
                trace!(%fragment, "Rendered field");
                self.fragments.push(fragment);
            }
        }

        if self.fragments.is_empty() {
            return None;
        }

        let options = blueprint.options();
        Some(format!(
            "create table {TABLE_PLACEHOLDER} ({}) engine={} default charset={};",
            self.fragments.join(", "),
            options.engine(),
            options.charset()
        ))
    }

    fn field_fragment(&mut self, field: &FieldDefinition) -> String {
        let name = quote_identifier(&field.name);
        let field_type = field.field_type;

        if field_type == FieldType::Enumerate {
            let values = field
                .default
                .as_ref()
                .map(DefaultValue::to_sql)
                .unwrap_or_default();
            return format!("{name} enum({values})");
        }

        let mut sql = if field_type.is_temporal() {
            format!("{name} {}", field_type.sql_name())
        } else {
            match field.size {
                Some(size) => format!("{name} {}({size})", field_type.sql_name()),
                None => format!("{name} {}", field_type.sql_name()),
            }
        };
        sql.push_str(if field.nullable { " null" } else { " not null" });

        if field_type.is_textual() {
            if let Some(default) = &field.default {
                sql.push_str(" default ");
                sql.push_str(&quoted_default(default));
            }
        } else if field_type.is_integer() {
            if let Some(default) = &field.default {
                sql.push_str(" default ");
                sql.push_str(&unquoted_default(default));
            }
            if self.take_auto_increment(field) {
                sql.push_str(" auto_increment");
            }
        }

        if field.primary {
            sql.push_str(&format!(", primary key ({name})"));
        } else if field.unique {
            sql.push_str(" unique");
        } else if field.indexed {
            sql.push_str(&format!(", index ({name})"));
        }

        sql
    }

    /// Clears the auto-increment target when `field` is the target.
    fn take_auto_increment(&mut self, field: &FieldDefinition) -> bool {
        if self
            .auto_increment
            .as_ref()
            .is_some_and(|target| target.points_to(field))
        {
            self.auto_increment = None;
            true
        } else {
            false
        }
    }
}

fn quoted_default(default: &DefaultValue) -> String {
    match default {
        DefaultValue::Integer(i) => quote_literal(&i.to_string()),
        DefaultValue::Text(s) => quote_literal(s),
        DefaultValue::Values(_) => default.to_sql(),
    }
}

fn unquoted_default(default: &DefaultValue) -> String {
    match default {
        DefaultValue::Integer(i) => i.to_string(),
        // only numeric text is emitted bare
        DefaultValue::Text(s) if s.trim().parse::<i64>().is_ok() => s.trim().to_string(),
        DefaultValue::Text(s) => quote_literal(s),
        DefaultValue::Values(_) => default.to_sql(),
    }
}
