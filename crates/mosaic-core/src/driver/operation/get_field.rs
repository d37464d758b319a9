use super::Operation;
use crate::stmt::Id;

#[derive(Debug, Clone)]
pub struct GetField {
    /// Record to read from
    pub id: Id,

    /// Field to read
    pub field: String,
}

impl From<GetField> for Operation {
    fn from(value: GetField) -> Self {
        Self::GetField(value)
    }
}
