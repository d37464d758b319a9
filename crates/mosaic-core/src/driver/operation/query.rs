use super::Operation;
use crate::stmt::Filter;

#[derive(Debug, Clone)]
pub struct QueryFields {
    pub filter: Filter,

    /// Fields to return for each matching record
    pub fields: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct QueryOne {
    pub filter: Filter,

    /// Fields to return for the matching record
    pub fields: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Count {
    pub filter: Filter,
}

#[derive(Debug, Clone)]
pub struct Exists {
    pub filter: Filter,
}

impl From<QueryFields> for Operation {
    fn from(value: QueryFields) -> Self {
        Self::QueryFields(value)
    }
}

impl From<QueryOne> for Operation {
    fn from(value: QueryOne) -> Self {
        Self::QueryOne(value)
    }
}

impl From<Count> for Operation {
    fn from(value: Count) -> Self {
        Self::Count(value)
    }
}

impl From<Exists> for Operation {
    fn from(value: Exists) -> Self {
        Self::Exists(value)
    }
}
