use super::Operation;
use crate::stmt::{Fields, Id};

#[derive(Debug, Clone)]
pub struct UpdateFields {
    /// Record to update
    pub id: Id,

    /// New field values, one entry per field
    pub fields: Fields,
}

impl From<UpdateFields> for Operation {
    fn from(value: UpdateFields) -> Self {
        Self::UpdateFields(value)
    }
}
