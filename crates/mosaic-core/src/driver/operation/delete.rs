use super::Operation;
use crate::stmt::{Filter, Id};

#[derive(Debug, Clone)]
pub struct DeleteById {
    pub id: Id,
}

#[derive(Debug, Clone)]
pub struct DeleteByQuery {
    pub filter: Filter,
}

impl From<DeleteById> for Operation {
    fn from(value: DeleteById) -> Self {
        Self::DeleteById(value)
    }
}

impl From<DeleteByQuery> for Operation {
    fn from(value: DeleteByQuery) -> Self {
        Self::DeleteByQuery(value)
    }
}
