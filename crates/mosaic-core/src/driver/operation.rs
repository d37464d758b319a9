mod array;
pub use array::{ArrayAppend, ArrayContains, ArrayElement, ArrayGet, ArraySize};

mod delete;
pub use delete::{DeleteById, DeleteByQuery};

mod get_field;
pub use get_field::GetField;

mod get_fields;
pub use get_fields::GetFields;

mod query;
pub use query::{Count, Exists, QueryFields, QueryOne};

mod update_fields;
pub use update_fields::UpdateFields;

#[derive(Debug, Clone)]
pub enum Operation {
    /// Read one field of one record. Responds with [`Response::Value`].
    ///
    /// [`Response::Value`]: super::Response::Value
    GetField(GetField),

    /// Read several fields of one record. Responds with `Response::Fields`.
    GetFields(GetFields),

    /// Write several fields of one record. Responds with `Response::Unit`.
    UpdateFields(UpdateFields),

    /// Read one element of a list field. Responds with `Response::Value`.
    ArrayElement(ArrayElement),

    /// Length of a list field. Responds with `Response::Count`.
    ArraySize(ArraySize),

    /// Whether a list field contains a value. Responds with `Response::Bool`.
    ArrayContains(ArrayContains),

    /// Append values to a list field. Responds with `Response::Unit`.
    ArrayAppend(ArrayAppend),

    /// Read several elements of a list field. Responds with `Response::Values`.
    ArrayGet(ArrayGet),

    /// Allocate a fresh identifier. Responds with `Response::Id`.
    NewId,

    /// Read fields of every matching record. Responds with `Response::Rows`.
    QueryFields(QueryFields),

    /// Read fields of the first matching record. Responds with `Response::Row`.
    QueryOne(QueryOne),

    /// Count matching records. Responds with `Response::Count`.
    Count(Count),

    /// Whether any record matches. Responds with `Response::Bool`.
    Exists(Exists),

    /// Delete one record. Responds with `Response::Unit`.
    DeleteById(DeleteById),

    /// Delete every matching record. Responds with `Response::Count`.
    DeleteByQuery(DeleteByQuery),
}

impl Operation {
    /// Short name of the operation, used in logs and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetField(_) => "get_field",
            Self::GetFields(_) => "get_fields",
            Self::UpdateFields(_) => "update_fields",
            Self::ArrayElement(_) => "array_element",
            Self::ArraySize(_) => "array_size",
            Self::ArrayContains(_) => "array_contains",
            Self::ArrayAppend(_) => "array_append",
            Self::ArrayGet(_) => "array_get",
            Self::NewId => "new_id",
            Self::QueryFields(_) => "query_fields",
            Self::QueryOne(_) => "query_one",
            Self::Count(_) => "count",
            Self::Exists(_) => "exists",
            Self::DeleteById(_) => "delete_by_id",
            Self::DeleteByQuery(_) => "delete_by_query",
        }
    }
}
