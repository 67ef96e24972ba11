//! Insertion-ordered field catalog.
//!
//! Fields are grouped by declared type. Both the order in which types first
//! appear and the order of fields inside a group are preserved, and that is
//! the order in which columns are emitted.

use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::field::{FieldDefinition, FieldType};

/// A weak reference to a field: its identity is the pair (type, name).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldRef {
    /// Type group holding the field.
    pub field_type: FieldType,
    /// Field name inside the group.
    pub name: String,
}

impl FieldRef {
    /// Creates a reference to a field.
    #[must_use]
    pub fn new(field_type: FieldType, name: impl Into<String>) -> Self {
        Self {
            field_type,
            name: name.into(),
        }
    }

    /// Returns true if the reference points at the given field.
    #[must_use]
    pub fn points_to(&self, field: &FieldDefinition) -> bool {
        self.field_type == field.field_type && self.name == field.name
    }
}

/// All fields declared with one column type, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldGroup {
    field_type: FieldType,
    fields: IndexMap<String, FieldDefinition>,
}

impl FieldGroup {
    fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            fields: IndexMap::new(),
        }
    }

    /// The type shared by every field of the group.
    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.values()
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.get(name)
    }

    /// Number of fields in the group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true when the group holds no field.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Ordered mapping from column type to its field group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    groups: IndexMap<FieldType, FieldGroup>,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field unless its (type, name) pair is already present.
    ///
    /// Returns the reference to the stored field when it was inserted, and
    /// `None` when an earlier registration already owns the pair.
    pub fn insert(&mut self, field: FieldDefinition) -> Option<FieldRef> {
        let field_type = field.field_type;
        let group = self
            .groups
            .entry(field_type)
            .or_insert_with(|| FieldGroup::new(field_type));

        match group.fields.entry(field.name.clone()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                let field_ref = FieldRef::new(field_type, slot.key().clone());
                slot.insert(field);
                Some(field_ref)
            }
        }
    }

    /// Resolves a reference.
    #[must_use]
    pub fn get(&self, field_ref: &FieldRef) -> Option<&FieldDefinition> {
        self.group(field_ref.field_type)
            .and_then(|g| g.get(&field_ref.name))
    }

    /// Resolves a reference for mutation.
    pub fn get_mut(&mut self, field_ref: &FieldRef) -> Option<&mut FieldDefinition> {
        self.groups
            .get_mut(&field_ref.field_type)
            .and_then(|g| g.fields.get_mut(&field_ref.name))
    }

    /// Returns the group for a type, if any field of that type exists.
    #[must_use]
    pub fn group(&self, field_type: FieldType) -> Option<&FieldGroup> {
        self.groups.get(&field_type)
    }

    /// Finds the first field with the given name, in emission order.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<FieldRef> {
        self.groups
            .values()
            .find_map(|g| g.get(name))
            .map(|f| FieldRef::new(f.field_type, f.name.clone()))
    }

    /// Groups in emission order.
    pub fn groups(&self) -> impl Iterator<Item = &FieldGroup> {
        self.groups.values()
    }

    /// Every field, group by group, in emission order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.groups.values().flat_map(FieldGroup::fields)
    }

    /// Number of declared fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.values().map(FieldGroup::len).sum()
    }

    /// Returns true when no field has been declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.values().all(FieldGroup::is_empty)
    }
}
