use crate::{
    stmt::{Fields, Id, Value},
    Error, Result,
};

use indexmap::IndexMap;

/// The answer of a [`Collection`] to one [`Operation`].
///
/// [`Collection`]: super::Collection
/// [`Operation`]: super::Operation
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// A single value
    Value(Value),

    /// Named field values of one record
    Fields(Fields),

    /// Values in request order
    Values(Vec<Value>),

    /// Named field values of several records
    Rows(IndexMap<Id, Fields>),

    /// Named field values of at most one record
    Row(Option<(Id, Fields)>),

    /// A number of elements or records
    Count(u64),

    Bool(bool),

    /// A freshly allocated identifier
    Id(Id),

    /// The operation has no result
    Unit,
}

impl Response {
    pub fn into_value(self) -> Result<Value> {
        match self {
            Self::Value(value) => Ok(value),
            other => Err(other.unexpected("Value")),
        }
    }

    pub fn into_fields(self) -> Result<Fields> {
        match self {
            Self::Fields(fields) => Ok(fields),
            other => Err(other.unexpected("Fields")),
        }
    }

    pub fn into_values(self) -> Result<Vec<Value>> {
        match self {
            Self::Values(values) => Ok(values),
            other => Err(other.unexpected("Values")),
        }
    }

    pub fn into_rows(self) -> Result<IndexMap<Id, Fields>> {
        match self {
            Self::Rows(rows) => Ok(rows),
            other => Err(other.unexpected("Rows")),
        }
    }

    pub fn into_row(self) -> Result<Option<(Id, Fields)>> {
        match self {
            Self::Row(row) => Ok(row),
            other => Err(other.unexpected("Row")),
        }
    }

    pub fn into_count(self) -> Result<u64> {
        match self {
            Self::Count(count) => Ok(count),
            other => Err(other.unexpected("Count")),
        }
    }

    pub fn into_bool(self) -> Result<bool> {
        match self {
            Self::Bool(value) => Ok(value),
            other => Err(other.unexpected("Bool")),
        }
    }

    pub fn into_id(self) -> Result<Id> {
        match self {
            Self::Id(id) => Ok(id),
            other => Err(other.unexpected("Id")),
        }
    }

    pub fn into_unit(self) -> Result<()> {
        match self {
            Self::Unit => Ok(()),
            other => Err(other.unexpected("Unit")),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Value(_) => "Value",
            Self::Fields(_) => "Fields",
            Self::Values(_) => "Values",
            Self::Rows(_) => "Rows",
            Self::Row(_) => "Row",
            Self::Count(_) => "Count",
            Self::Bool(_) => "Bool",
            Self::Id(_) => "Id",
            Self::Unit => "Unit",
        }
    }

    fn unexpected(&self, expected: &str) -> Error {
        Error::invalid_result(format!("expected {expected}, got {}", self.name()))
    }
}
