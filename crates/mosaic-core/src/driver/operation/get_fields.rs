use super::Operation;
use crate::stmt::Id;

#[derive(Debug, Clone)]
pub struct GetFields {
    /// Record to read from
    pub id: Id,

    /// Fields to read. The response holds exactly these fields.
    pub fields: Vec<String>,
}

impl From<GetFields> for Operation {
    fn from(value: GetFields) -> Self {
        Self::GetFields(value)
    }
}
