use super::Operation;
use crate::stmt::{Id, Value};

#[derive(Debug, Clone)]
pub struct ArrayElement {
    pub id: Id,

    /// The list field
    pub field: String,

    pub index: usize,
}

#[derive(Debug, Clone)]
pub struct ArraySize {
    pub id: Id,

    /// The list field
    pub field: String,
}

#[derive(Debug, Clone)]
pub struct ArrayContains {
    pub id: Id,

    /// The list field
    pub field: String,

    pub item: Value,
}

#[derive(Debug, Clone)]
pub struct ArrayAppend {
    pub id: Id,

    /// The list field
    pub field: String,

    /// Values appended in order
    pub items: Vec<Value>,
}

#[derive(Debug, Clone)]
pub struct ArrayGet {
    pub id: Id,

    /// The list field
    pub field: String,

    /// Indexes to read. The response holds one value per index, in the same order.
    pub indexes: Vec<usize>,
}

impl From<ArrayElement> for Operation {
    fn from(value: ArrayElement) -> Self {
        Self::ArrayElement(value)
    }
}

impl From<ArraySize> for Operation {
    fn from(value: ArraySize) -> Self {
        Self::ArraySize(value)
    }
}

impl From<ArrayContains> for Operation {
    fn from(value: ArrayContains) -> Self {
        Self::ArrayContains(value)
    }
}

impl From<ArrayAppend> for Operation {
    fn from(value: ArrayAppend) -> Self {
        Self::ArrayAppend(value)
    }
}

impl From<ArrayGet> for Operation {
    fn from(value: ArrayGet) -> Self {
        Self::ArrayGet(value)
    }
}
