//! Allow-listed partial updates.
//!
//! A [`FieldSet`] is an ordered list of `(column, value)` pairs for one
//! entity. Column identifiers only ever come from the [`Column`] enums below,
//! so caller-supplied keys never reach statement text: unknown keys are
//! rejected while the set is being built, and every value is bound.

use hive_core::error::CoreError;
use hive_core::types::DbId;
use sqlx::{QueryBuilder, Sqlite};

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

/// Storage class of a mutable column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
}

/// A mutable column of one entity table.
pub trait Column: Copy + Eq + std::fmt::Debug + 'static {
    /// Entity name used in error messages.
    const ENTITY: &'static str;

    /// Columns a caller may name in an update request, in declaration order.
    const CALLER_MUTABLE: &'static [Self];

    fn name(self) -> &'static str;

    fn kind(self) -> ColumnKind;

    /// Whether `NULL` is an acceptable value.
    fn nullable(self) -> bool;

    /// Resolve a caller-supplied key against [`CALLER_MUTABLE`](Self::CALLER_MUTABLE).
    fn from_caller_key(key: &str) -> Option<Self> {
        Self::CALLER_MUTABLE.iter().copied().find(|c| c.name() == key)
    }
}

/// Mutable columns of `vendedores`. `id` and `password_hash` are not updatable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorColumn {
    Name,
    Email,
    Bio,
}

impl Column for VendorColumn {
    const ENTITY: &'static str = "Vendor";
    const CALLER_MUTABLE: &'static [Self] = &[Self::Name, Self::Email, Self::Bio];

    fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Bio => "bio",
        }
    }

    fn kind(self) -> ColumnKind {
        ColumnKind::Text
    }

    fn nullable(self) -> bool {
        matches!(self, Self::Bio)
    }
}

/// Mutable columns of `posts`.
///
/// `ImagePath` is settable only by the repository (from an image payload),
/// never directly by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicationColumn {
    Name,
    Description,
    Category,
    VendorId,
    ImagePath,
    Phone,
    Location,
}

impl Column for PublicationColumn {
    const ENTITY: &'static str = "Publication";
    const CALLER_MUTABLE: &'static [Self] = &[
        Self::Name,
        Self::Description,
        Self::Category,
        Self::VendorId,
        Self::Phone,
        Self::Location,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Category => "category",
            Self::VendorId => "vendor_id",
            Self::ImagePath => "image_path",
            Self::Phone => "phone",
            Self::Location => "location",
        }
    }

    fn kind(self) -> ColumnKind {
        match self {
            Self::VendorId => ColumnKind::Integer,
            _ => ColumnKind::Text,
        }
    }

    fn nullable(self) -> bool {
        !matches!(self, Self::Name | Self::Description | Self::VendorId)
    }
}

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// New value for one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Null,
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Null, Self::Text)
    }
}

// ---------------------------------------------------------------------------
// Field set
// ---------------------------------------------------------------------------

/// Ordered, validated set of column assignments for one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSet<C: Column> {
    entries: Vec<(C, FieldValue)>,
}

impl<C: Column> Default for FieldSet<C> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<C: Column> FieldSet<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a field set from caller-supplied `(key, json value)` pairs,
    /// keeping their order.
    ///
    /// Fails with [`CoreError::Validation`] on the first key that is not a
    /// caller-mutable column or whose value does not fit the column.
    pub fn from_json<I>(fields: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        let mut set = Self::new();
        for (key, value) in fields {
            let column = C::from_caller_key(&key).ok_or_else(|| {
                CoreError::Validation(format!(
                    "Field '{key}' cannot be updated on {}",
                    C::ENTITY
                ))
            })?;
            set.set(column, json_to_value(column, value)?)?;
        }
        Ok(set)
    }

    /// Assign `value` to `column`.
    ///
    /// Re-assigning a column replaces its value in place, keeping the
    /// original position.
    pub fn set(&mut self, column: C, value: impl Into<FieldValue>) -> Result<(), CoreError> {
        let value = value.into();
        check_value(column, &value)?;

        match self.entries.iter_mut().find(|(c, _)| *c == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column, value)),
        }
        Ok(())
    }

    pub fn get(&self, column: C) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, column: C) -> bool {
        self.get(column).is_some()
    }

    pub fn columns(&self) -> impl Iterator<Item = C> + '_ {
        self.entries.iter().map(|(c, _)| *c)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build `UPDATE <table> SET c1 = ?, c2 = ? WHERE <key_column> = ?`
    /// covering exactly the assigned columns, in assignment order.
    ///
    /// An empty set is a [`CoreError::Validation`].
    pub fn build_update(
        &self,
        table: &'static str,
        key_column: &'static str,
        id: DbId,
    ) -> Result<QueryBuilder<'static, Sqlite>, CoreError> {
        if self.entries.is_empty() {
            return Err(CoreError::Validation(format!(
                "No fields supplied to update on {}",
                C::ENTITY
            )));
        }

        let mut query = QueryBuilder::new(format!("UPDATE {table} SET "));
        for (i, (column, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                query.push(", ");
            }
            query.push(column.name()).push(" = ");
            match value {
                FieldValue::Text(text) => query.push_bind(text.clone()),
                FieldValue::Integer(n) => query.push_bind(*n),
                FieldValue::Null => query.push_bind(None::<String>),
            };
        }
        query.push(format!(" WHERE {key_column} = ")).push_bind(id);

        Ok(query)
    }
}

/// Check that `value` fits `column`: right kind, `NULL` only where allowed,
/// and no blank text in required columns.
fn check_value<C: Column>(column: C, value: &FieldValue) -> Result<(), CoreError> {
    let ok = match (column.kind(), value) {
        (_, FieldValue::Null) => column.nullable(),
        (ColumnKind::Text, FieldValue::Text(text)) => column.nullable() || !text.trim().is_empty(),
        (ColumnKind::Integer, FieldValue::Integer(_)) => true,
        _ => false,
    };

    if ok {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid value for '{}' on {}: expected {}",
            column.name(),
            C::ENTITY,
            expectation(column)
        )))
    }
}

fn expectation<C: Column>(column: C) -> &'static str {
    match (column.kind(), column.nullable()) {
        (ColumnKind::Text, true) => "a string or null",
        (ColumnKind::Text, false) => "a non-empty string",
        (ColumnKind::Integer, true) => "an integer or null",
        (ColumnKind::Integer, false) => "an integer",
    }
}

/// Convert a JSON value for `column`. Integer columns also accept numeric strings.
fn json_to_value<C: Column>(column: C, value: serde_json::Value) -> Result<FieldValue, CoreError> {
    use serde_json::Value;

    let converted = match (column.kind(), value) {
        (_, Value::Null) => Some(FieldValue::Null),
        (ColumnKind::Text, Value::String(text)) => Some(FieldValue::Text(text)),
        (ColumnKind::Integer, Value::Number(n)) => n.as_i64().map(FieldValue::Integer),
        (ColumnKind::Integer, Value::String(text)) => {
            text.trim().parse::<i64>().ok().map(FieldValue::Integer)
        }
        _ => None,
    };

    converted.ok_or_else(|| {
        CoreError::Validation(format!(
            "Invalid value for '{}' on {}: expected {}",
            column.name(),
            C::ENTITY,
            expectation(column)
        ))
    })
}
