mod builder;
pub use builder::Builder;

use crate::{schema, Error, Mapping, Result};

use indexmap::IndexMap;
use std::sync::Arc;

/// Every model and aggregate type known to a [`Provider`](crate::Provider).
///
/// A registry is produced by [`Builder::build`], which validates all mappings up front, and
/// is immutable afterwards. Share it behind an `Arc`, or keep a process-wide one in a
/// `std::sync::OnceLock`.
#[derive(Debug)]
pub struct Registry {
    collection_name_prefix: Option<String>,

    models: IndexMap<String, Arc<schema::Model>>,

    mappings: IndexMap<String, Arc<Mapping>>,
}

impl Registry {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn model(&self, name: &str) -> Result<&Arc<schema::Model>> {
        self.models
            .get(name)
            .ok_or_else(|| Error::unknown_model(name))
    }

    pub fn mapping(&self, aggregate: &str) -> Result<&Arc<Mapping>> {
        self.mappings
            .get(aggregate)
            .ok_or_else(|| Error::unknown_model(aggregate))
    }

    /// Name of the store collection holding records of `model`.
    pub fn collection_name(&self, model: &str) -> Result<String> {
        Ok(self
            .model(model)?
            .collection_name(self.collection_name_prefix.as_deref()))
    }

    pub fn models(&self) -> impl ExactSizeIterator<Item = &schema::Model> + '_ {
        self.models.values().map(|model| &**model)
    }

    pub fn mappings(&self) -> impl ExactSizeIterator<Item = &Mapping> + '_ {
        self.mappings.values().map(|mapping| &**mapping)
    }
}
