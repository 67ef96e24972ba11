//! The table blueprint: type registrars and the constraint tracker.
//!
//! Column declarations are registered into a [`Catalog`]. Constraint calls
//! such as [`Blueprint::primary`] act on the cursor, which always points at
//! the most recently registered column.

use tracing::debug;

use crate::catalog::{Catalog, FieldRef};
use crate::error::{Result, SchemaError};
use crate::field::{Arg, DefaultValue, FieldDefinition, FieldType, Normalized};
use crate::options::TableOptions;
use crate::render::StatementRenderer;

/// Column-level constraints that can be attached after registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Constraint {
    Primary,
    Unique,
    Indexed,
}

impl Constraint {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Unique => "unique",
            Self::Indexed => "indexed",
        }
    }
}

/// Accumulates the columns, constraints and storage options of one table.
///
/// # Example
///
/// ```rust
/// use blueprint_core::{Arg, Blueprint};
///
/// let mut table = Blueprint::new();
/// table
///     .integer("id", &[])
///     .primary()?
///     .string("name", &[Arg::Size(50)]);
///
/// assert_eq!(
///     table.to_sql().as_deref(),
///     Some(
///         "create table :table: (`id` integer(11) not null, primary key (`id`), \
///          `name` string(50) not null) engine=MyIsam default charset=UTF8;"
///     )
/// );
/// # Ok::<(), blueprint_core::SchemaError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Blueprint {
    table: Option<String>,
    options: TableOptions,
    catalog: Catalog,
    cursor: Option<FieldRef>,
    primary: Option<FieldRef>,
    auto_increment: Option<FieldRef>,
}

impl Blueprint {
    /// Creates an empty blueprint with the default engine and charset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty blueprint with the given table options.
    #[must_use]
    pub fn with_options(options: TableOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Sets the table name. It is not embedded in the rendered statement.
    pub fn set_table_name(&mut self, table: impl Into<String>) -> &mut Self {
        self.table = Some(table.into());
        self
    }

    /// Sets the storage engine.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidTableOption`] if `engine` is not a plain
    /// identifier. The previous engine is kept.
    pub fn set_engine(&mut self, engine: impl Into<String>) -> Result<&mut Self> {
        self.options.set_engine(engine)?;
        Ok(self)
    }

    /// Sets the default character set.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidTableOption`] if `charset` is not a
    /// plain identifier. The previous charset is kept.
    pub fn set_charset(&mut self, charset: impl Into<String>) -> Result<&mut Self> {
        self.options.set_charset(charset)?;
        Ok(self)
    }

    /// The table name, if one was set.
    #[must_use]
    pub fn table_name(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Engine and charset.
    #[must_use]
    pub const fn options(&self) -> &TableOptions {
        &self.options
    }

    /// The declared fields.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The most recently registered field.
    #[must_use]
    pub const fn cursor(&self) -> Option<&FieldRef> {
        self.cursor.as_ref()
    }

    /// The field designated as primary key.
    #[must_use]
    pub const fn primary_key(&self) -> Option<&FieldRef> {
        self.primary.as_ref()
    }

    /// The field that receives `auto_increment`.
    #[must_use]
    pub const fn auto_increment_target(&self) -> Option<&FieldRef> {
        self.auto_increment.as_ref()
    }

    // =========================================================================
    // Type registrars
    // =========================================================================

    /// Declares an `integer` column (default width 11).
    pub fn integer(&mut self, name: impl Into<String>, args: &[Arg]) -> &mut Self {
        self.add_sized(FieldType::Integer, name, args)
    }

    /// Declares a `biginteger` column (default width 20).
    pub fn big_integer(&mut self, name: impl Into<String>, args: &[Arg]) -> &mut Self {
        self.add_sized(FieldType::BigInteger, name, args)
    }

    /// Declares a `longinteger` column (default width 20).
    pub fn long_integer(&mut self, name: impl Into<String>, args: &[Arg]) -> &mut Self {
        self.add_sized(FieldType::LongInteger, name, args)
    }

    /// Declares a `string` column (default length 255).
    ///
    /// A length above 255 declares a `text` column instead.
    pub fn string(&mut self, name: impl Into<String>, args: &[Arg]) -> &mut Self {
        let normalized = Normalized::from_args(args);
        let field_type = match normalized.size {
            Some(size) if size > FieldType::MAX_STRING_SIZE => FieldType::Text,
            _ => FieldType::String,
        };
        self.add_field(FieldDefinition::new(name, field_type).with_normalized(normalized))
    }

    /// Declares a `text` column.
    pub fn text(&mut self, name: impl Into<String>, args: &[Arg]) -> &mut Self {
        self.add_sized(FieldType::Text, name, args)
    }

    /// Declares a `character` column (default length 1).
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::SizeOutOfRange`] when the length exceeds
    /// 4294967295. The blueprint is left untouched.
    pub fn character(&mut self, name: impl Into<String>, args: &[Arg]) -> Result<&mut Self> {
        let normalized = Normalized::from_args(args);
        if let Some(size) = normalized.size {
            if size > FieldType::MAX_CHARACTER_SIZE {
                return Err(SchemaError::SizeOutOfRange {
                    field_type: FieldType::Character,
                    size,
                    max: FieldType::MAX_CHARACTER_SIZE,
                });
            }
        }
        let field = FieldDefinition::new(name, FieldType::Character).with_normalized(normalized);
        Ok(self.add_field(field))
    }

    /// Declares a `date` column. Only nullability is taken from `args`.
    pub fn date(&mut self, name: impl Into<String>, args: &[Arg]) -> &mut Self {
        self.add_temporal(FieldType::Date, name, args)
    }

    /// Declares a `datetime` column. Only nullability is taken from `args`.
    pub fn datetime(&mut self, name: impl Into<String>, args: &[Arg]) -> &mut Self {
        self.add_temporal(FieldType::Datetime, name, args)
    }

    /// Declares a `timestamp` column. Only nullability is taken from `args`.
    pub fn timestamp(&mut self, name: impl Into<String>, args: &[Arg]) -> &mut Self {
        self.add_temporal(FieldType::Timestamp, name, args)
    }

    /// Declares an `enum` column over the given literals, in order.
    pub fn enumerate<I, S>(&mut self, name: impl Into<String>, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut field = FieldDefinition::new(name, FieldType::Enumerate);
        field.default = Some(DefaultValue::Values(
            values.into_iter().map(Into::into).collect(),
        ));
        self.add_field(field)
    }

    /// Declares a column through the registrar named `method`.
    ///
    /// `method` accepts registrar names such as `integer`, `bigInteger` or
    /// `timestamp`. For `enumerate`, the allowed literals are taken from a
    /// [`DefaultValue::Values`] argument.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownRegistrationMethod`] when no registrar
    /// matches `method`, and whatever the matched registrar returns.
    pub fn register(
        &mut self,
        method: &str,
        name: impl Into<String>,
        args: &[Arg],
    ) -> Result<&mut Self> {
        let field_type: FieldType = method.parse()?;
        let this = match field_type {
            FieldType::Integer => self.integer(name, args),
            FieldType::BigInteger => self.big_integer(name, args),
            FieldType::LongInteger => self.long_integer(name, args),
            FieldType::String => self.string(name, args),
            FieldType::Text => self.text(name, args),
            FieldType::Character => self.character(name, args)?,
            FieldType::Date => self.date(name, args),
            FieldType::Datetime => self.datetime(name, args),
            FieldType::Timestamp => self.timestamp(name, args),
            FieldType::Enumerate => {
                let values = args
                    .iter()
                    .rev()
                    .find_map(|arg| match arg {
                        Arg::Default(DefaultValue::Values(values)) => Some(values.clone()),
                        _ => None,
                    })
                    .unwrap_or_default();
                self.enumerate(name, values)
            }
        };
        Ok(this)
    }

    fn add_sized(
        &mut self,
        field_type: FieldType,
        name: impl Into<String>,
        args: &[Arg],
    ) -> &mut Self {
        let normalized = Normalized::from_args(args);
        self.add_field(FieldDefinition::new(name, field_type).with_normalized(normalized))
    }

    fn add_temporal(
        &mut self,
        field_type: FieldType,
        name: impl Into<String>,
        args: &[Arg],
    ) -> &mut Self {
        let mut field = FieldDefinition::new(name, field_type);
        field.nullable = Normalized::from_args(args).nullable;
        self.add_field(field)
    }

    fn add_field(&mut self, field: FieldDefinition) -> &mut Self {
        let name = field.name.clone();
        let field_type = field.field_type;
        match self.catalog.insert(field) {
            Some(field_ref) => {
                debug!(field = %name, %field_type, "Registered field");
                self.cursor = Some(field_ref);
            }
            None => {
                debug!(field = %name, %field_type, "Field already registered, ignoring");
            }
        }
        self
    }

    // =========================================================================
    // Constraints
    // =========================================================================

    /// Marks the most recently declared column as the primary key.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NoFieldDefined`] before any column is declared,
    /// [`SchemaError::PrimaryAlreadyDefined`] if a primary key exists and
    /// [`SchemaError::InvalidConstraintTarget`] on an `enum` column.
    pub fn primary(&mut self) -> Result<&mut Self> {
        let target = self.cursor_for(Constraint::Primary)?;
        self.apply(&target, Constraint::Primary)
    }

    /// Marks the most recently declared column as unique.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NoFieldDefined`] before any column is declared.
    pub fn unique(&mut self) -> Result<&mut Self> {
        let target = self.cursor_for(Constraint::Unique)?;
        self.apply(&target, Constraint::Unique)
    }

    /// Marks the most recently declared column as indexed.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NoFieldDefined`] before any column is declared.
    pub fn indexed(&mut self) -> Result<&mut Self> {
        let target = self.cursor_for(Constraint::Indexed)?;
        self.apply(&target, Constraint::Indexed)
    }

    /// Marks the first column named `name` as the primary key.
    ///
    /// The cursor is not moved.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownField`] if no column has that name,
    /// [`SchemaError::PrimaryAlreadyDefined`] if a primary key exists and
    /// [`SchemaError::InvalidConstraintTarget`] on an `enum` column.
    pub fn primary_on(&mut self, name: &str) -> Result<&mut Self> {
        let target = self.lookup(name)?;
        self.apply(&target, Constraint::Primary)
    }

    /// Marks the first column named `name` as unique.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownField`] if no column has that name.
    pub fn unique_on(&mut self, name: &str) -> Result<&mut Self> {
        let target = self.lookup(name)?;
        self.apply(&target, Constraint::Unique)
    }

    /// Marks the first column named `name` as indexed.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownField`] if no column has that name.
    pub fn indexed_on(&mut self, name: &str) -> Result<&mut Self> {
        let target = self.lookup(name)?;
        self.apply(&target, Constraint::Indexed)
    }

    /// Designates the auto-increment column.
    ///
    /// With a cursor, the most recently declared column becomes the target.
    /// Without one, `field` is first declared as a default `integer` column.
    /// Once a target is set, further calls do nothing.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidAutoIncrementTarget`] when the cursor
    /// points outside the integer family, and [`SchemaError::NoFieldDefined`]
    /// when there is neither a cursor nor a `field` name.
    pub fn auto_increment(&mut self, field: Option<&str>) -> Result<&mut Self> {
        if self.auto_increment.is_some() {
            return Ok(self);
        }

        let target = match (self.cursor.clone(), field) {
            (Some(cursor), _) => {
                if !cursor.field_type.is_integer() {
                    return Err(SchemaError::InvalidAutoIncrementTarget(cursor.field_type));
                }
                cursor
            }
            (None, Some(name)) => {
                self.integer(name, &[]);
                FieldRef::new(FieldType::Integer, name)
            }
            (None, None) => return Err(SchemaError::NoFieldDefined("auto_increment")),
        };

        debug!(field = %target.name, "Auto-increment target set");
        self.auto_increment = Some(target);
        Ok(self)
    }

    fn cursor_for(&self, constraint: Constraint) -> Result<FieldRef> {
        self.cursor
            .clone()
            .ok_or(SchemaError::NoFieldDefined(constraint.as_str()))
    }

    fn lookup(&self, name: &str) -> Result<FieldRef> {
        self.catalog
            .find(name)
            .ok_or_else(|| SchemaError::UnknownField(name.to_string()))
    }

    fn apply(&mut self, target: &FieldRef, constraint: Constraint) -> Result<&mut Self> {
        if constraint == Constraint::Primary {
            if let Some(existing) = &self.primary {
                return Err(SchemaError::PrimaryAlreadyDefined(existing.name.clone()));
            }
            // enum columns render without a constraint clause
            if target.field_type == FieldType::Enumerate {
                return Err(SchemaError::InvalidConstraintTarget {
                    constraint: constraint.as_str(),
                    field_type: target.field_type,
                });
            }
        }

        let field = self
            .catalog
            .get_mut(target)
            .ok_or_else(|| SchemaError::UnknownField(target.name.clone()))?;
        match constraint {
            Constraint::Primary => field.primary = true,
            Constraint::Unique => field.unique = true,
            Constraint::Indexed => field.indexed = true,
        }

        if constraint == Constraint::Primary {
            self.primary = Some(target.clone());
        }
        debug!(field = %target.name, constraint = constraint.as_str(), "Constraint assigned");
        Ok(self)
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Compiles the blueprint into a `CREATE TABLE` statement.
    ///
    /// The statement contains the literal [`crate::TABLE_PLACEHOLDER`] where
    /// the table name goes. Returns `None` when no column was declared.
    /// Rendering does not modify the blueprint, so repeated calls agree.
    #[must_use]
    pub fn to_sql(&self) -> Option<String> {
        StatementRenderer::new(self).render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_follows_registration() {
        let mut table = Blueprint::new();
        assert!(table.cursor().is_none());

        table.integer("id", &[]).string("name", &[]);
        assert_eq!(
            table.cursor(),
            Some(&FieldRef::new(FieldType::String, "name"))
        );
    }

    #[test]
    fn test_duplicate_keeps_first_registration_and_cursor() {
        let mut table = Blueprint::new();
        table
            .integer("id", &[Arg::Size(5)])
            .string("name", &[])
            .integer("id", &[Arg::Size(8), true.into()]);

        let id = table
            .catalog()
            .get(&FieldRef::new(FieldType::Integer, "id"))
            .unwrap();
        assert_eq!(id.size, Some(5));
        assert!(!id.nullable);
        assert_eq!(table.catalog().len(), 2);
        assert_eq!(table.cursor().unwrap().name, "name");
    }

    #[test]
    fn test_string_promotes_to_text() {
        let mut table = Blueprint::new();
        table.string("bio", &[Arg::Size(300)]).string("nick", &[Arg::Size(255)]);

        assert!(table.catalog().group(FieldType::Text).unwrap().get("bio").is_some());
        assert!(table.catalog().group(FieldType::String).unwrap().get("nick").is_some());
    }

    #[test]
    fn test_character_size_limit() {
        let mut table = Blueprint::new();
        let err = table.character("code", &[Arg::Size(4_294_967_296)]).unwrap_err();
        assert!(matches!(err, SchemaError::SizeOutOfRange { size: 4_294_967_296, .. }));
        assert!(table.catalog().is_empty());
        assert!(table.cursor().is_none());

        table.character("code", &[Arg::Size(4_294_967_295)]).unwrap();
        assert_eq!(table.catalog().len(), 1);
    }

    #[test]
    fn test_temporal_ignores_size_and_default() {
        let mut table = Blueprint::new();
        table.date("born_on", &[Arg::Size(10), "2000-01-01".into(), true.into()]);

        let field = table
            .catalog()
            .get(&FieldRef::new(FieldType::Date, "born_on"))
            .unwrap();
        assert_eq!(field.size, None);
        assert_eq!(field.default, None);
        assert!(field.nullable);
    }

    #[test]
    fn test_primary_twice_fails() {
        let mut table = Blueprint::new();
        table.integer("id", &[]).primary().unwrap();
        table.integer("other", &[]);

        let err = table.primary().unwrap_err();
        assert_eq!(err, SchemaError::PrimaryAlreadyDefined("id".into()));
        assert!(!table
            .catalog()
            .get(&FieldRef::new(FieldType::Integer, "other"))
            .unwrap()
            .primary);
    }

    #[test]
    fn test_primary_rejects_enum_column() {
        let mut table = Blueprint::new();
        table.enumerate("status", ["on", "off"]);

        assert_eq!(
            table.primary().unwrap_err(),
            SchemaError::InvalidConstraintTarget {
                constraint: "primary",
                field_type: FieldType::Enumerate,
            }
        );
        assert!(table.primary_on("status").is_err());
        assert!(table.primary_key().is_none());

        // The rejected call does not block a real primary key
        table.integer("id", &[]).primary().unwrap();
        assert_eq!(table.primary_key().unwrap().name, "id");
        assert!(table
            .to_sql()
            .unwrap()
            .contains("`id` integer(11) not null, primary key (`id`)"));
    }

    #[test]
    fn test_constraints_need_a_field() {
        let mut table = Blueprint::new();
        assert_eq!(table.primary().unwrap_err(), SchemaError::NoFieldDefined("primary"));
        assert_eq!(table.unique().unwrap_err(), SchemaError::NoFieldDefined("unique"));
        assert_eq!(table.indexed().unwrap_err(), SchemaError::NoFieldDefined("indexed"));
    }

    #[test]
    fn test_unique_and_indexed_are_idempotent() {
        let mut table = Blueprint::new();
        table
            .string("email", &[])
            .unique()
            .unwrap()
            .unique()
            .unwrap()
            .indexed()
            .unwrap()
            .indexed()
            .unwrap();

        let field = table.catalog().fields().next().unwrap();
        assert!(field.unique);
        assert!(field.indexed);
        assert!(!field.primary);
    }

    #[test]
    fn test_constraint_follows_cursor_after_duplicate() {
        let mut table = Blueprint::new();
        table.integer("id", &[]).string("name", &[]).integer("id", &[]);
        table.primary().unwrap();

        assert_eq!(table.primary_key().unwrap().name, "name");
    }

    #[test]
    fn test_explicit_binding() {
        let mut table = Blueprint::new();
        table.integer("id", &[]).string("email", &[]).string("name", &[]);
        table.primary_on("id").unwrap().unique_on("email").unwrap();

        assert_eq!(table.primary_key(), Some(&FieldRef::new(FieldType::Integer, "id")));
        assert_eq!(table.cursor().unwrap().name, "name");
        assert_eq!(
            table.indexed_on("missing").unwrap_err(),
            SchemaError::UnknownField("missing".into())
        );
    }

    #[test]
    fn test_auto_increment_on_integer() {
        let mut table = Blueprint::new();
        table.big_integer("id", &[]).auto_increment(None).unwrap();
        assert_eq!(
            table.auto_increment_target(),
            Some(&FieldRef::new(FieldType::BigInteger, "id"))
        );

        // First assignment wins
        table.integer("age", &[]).auto_increment(None).unwrap();
        assert_eq!(table.auto_increment_target().unwrap().name, "id");
    }

    #[test]
    fn test_auto_increment_rejects_string() {
        let mut table = Blueprint::new();
        table.string("name", &[]);
        assert_eq!(
            table.auto_increment(None).unwrap_err(),
            SchemaError::InvalidAutoIncrementTarget(FieldType::String)
        );
        assert!(table.auto_increment_target().is_none());
    }

    #[test]
    fn test_auto_increment_declares_missing_field() {
        let mut table = Blueprint::new();
        table.auto_increment(Some("id")).unwrap();

        assert_eq!(
            table.auto_increment_target(),
            Some(&FieldRef::new(FieldType::Integer, "id"))
        );
        assert_eq!(table.cursor(), table.auto_increment_target());
        assert_eq!(table.catalog().len(), 1);

        let mut empty = Blueprint::new();
        assert_eq!(
            empty.auto_increment(None).unwrap_err(),
            SchemaError::NoFieldDefined("auto_increment")
        );
    }

    #[test]
    fn test_register_by_method_name() {
        let mut table = Blueprint::new();
        table
            .register("bigInteger", "id", &[])
            .unwrap()
            .register("enumerate", "status", &[DefaultValue::Values(vec!["on".into()]).into()])
            .unwrap();

        assert_eq!(table.catalog().len(), 2);
        assert_eq!(
            table.register("float", "ratio", &[]).unwrap_err(),
            SchemaError::UnknownRegistrationMethod("float".into())
        );
    }

    #[test]
    fn test_table_settings() {
        let options = TableOptions::default().with_engine("InnoDB").unwrap();
        let mut table = Blueprint::with_options(options);
        table.set_table_name("users").set_charset("utf8mb4").unwrap();

        assert_eq!(table.table_name(), Some("users"));
        assert_eq!(table.options().engine(), "InnoDB");
        assert_eq!(table.options().charset(), "utf8mb4");
    }

    #[test]
    fn test_setters_reject_unsafe_options() {
        let mut table = Blueprint::new();
        let err = table.set_engine("InnoDB; drop table users; --").unwrap_err();
        assert!(matches!(err, SchemaError::InvalidTableOption { option: "engine", .. }));
        assert!(table.set_charset("utf8 collate x").is_err());

        assert_eq!(table.options(), &TableOptions::default());
    }
}
