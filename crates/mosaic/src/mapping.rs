mod auto;

mod builder;
pub use builder::{Builder, FieldMapping, FieldTarget, ForeignAggregateMapping};

use crate::{
    schema,
    stmt::{Type, Value},
    Context, Result,
};

use indexmap::IndexMap;
use std::{fmt, sync::Arc};

/// Computes the value of an aggregate field from the aggregate's records.
pub type Getter = Arc<dyn Fn(&mut Context<'_>) -> Result<Value> + Send + Sync>;

/// Transforms an aggregate field value into the value written to one record field.
pub type Setter = Arc<dyn Fn(Value) -> Result<Value> + Send + Sync>;

/// Where the identifier of a nested aggregate is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignAggregate {
    /// Model holding the identifier
    pub model: String,

    /// Field of `model` holding the identifier
    pub field: String,

    /// Aggregate type the identifier refers to
    pub aggregate: String,
}

/// The compiled field mapping of one aggregate type.
///
/// A mapping is produced once, when the [`Registry`](crate::Registry) is built, and is
/// read-only afterwards. Every simple field of the aggregate has a getter and every
/// aggregate-typed field has a foreign aggregate reference.
pub struct Mapping {
    schema: schema::Aggregate,

    getters: IndexMap<String, Getter>,

    /// field -> model -> record fields the getter reads
    usings: IndexMap<String, IndexMap<String, Vec<String>>>,

    /// field -> model -> record field -> setter
    setters: IndexMap<String, IndexMap<String, IndexMap<String, Setter>>>,

    foreign: IndexMap<String, ForeignAggregate>,
}

impl Mapping {
    pub fn name(&self) -> &str {
        &self.schema.name
    }

    pub fn schema(&self) -> &schema::Aggregate {
        &self.schema
    }

    pub fn field_ty(&self, field: &str) -> Option<&Type> {
        self.schema.field_by_name(field).map(|field| &field.ty)
    }

    pub fn getter(&self, field: &str) -> Option<&Getter> {
        self.getters.get(field)
    }

    /// Record fields each model contributes to computing `field`.
    pub fn usings(&self, field: &str) -> impl Iterator<Item = (&str, &[String])> + '_ {
        self.usings
            .get(field)
            .into_iter()
            .flatten()
            .map(|(model, fields)| (model.as_str(), fields.as_slice()))
    }

    pub fn setters(&self, field: &str) -> Option<&IndexMap<String, IndexMap<String, Setter>>> {
        self.setters.get(field)
    }

    pub fn foreign(&self, field: &str) -> Option<&ForeignAggregate> {
        self.foreign.get(field)
    }

    /// Returns `true` if writes to `field` are ignored.
    pub fn is_read_only(&self, field: &str) -> bool {
        self.setters
            .get(field)
            .map_or(true, |targets| targets.values().all(IndexMap::is_empty))
    }
}

impl fmt::Debug for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let setters: IndexMap<_, Vec<String>> = self
            .setters
            .iter()
            .map(|(field, models)| {
                let targets = models
                    .iter()
                    .flat_map(|(model, fields)| {
                        fields.keys().map(move |target| format!("{model}.{target}"))
                    })
                    .collect();
                (field, targets)
            })
            .collect();

        f.debug_struct("Mapping")
            .field("aggregate", &self.schema.name)
            .field("getters", &self.getters.keys().collect::<Vec<_>>())
            .field("usings", &self.usings)
            .field("setters", &setters)
            .field("foreign", &self.foreign)
            .finish()
    }
}
