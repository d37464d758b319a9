use super::Registry;
use crate::{err, mapping, schema, Aggregator, Model, Result};

use indexmap::{IndexMap, IndexSet};
use std::sync::Arc;

#[derive(Default)]
pub struct Builder {
    models: Vec<schema::Model>,

    /// Mapping descriptions, checked and completed by `build`
    aggregates: Vec<mapping::Builder>,

    collection_name_prefix: Option<String>,
}

impl Builder {
    pub fn register<M: Model>(&mut self) -> &mut Self {
        self.model(M::schema())
    }

    pub fn model(&mut self, schema: schema::Model) -> &mut Self {
        self.models.push(schema);
        self
    }

    pub fn register_aggregate<A: Aggregator>(&mut self) -> &mut Self {
        self.aggregate(A::schema(), A::configure)
    }

    /// Register an aggregate type. `configure` describes its field mapping; fields it leaves
    /// out are mapped automatically when the registry is built.
    pub fn aggregate(
        &mut self,
        schema: schema::Aggregate,
        configure: impl FnOnce(&mut mapping::Builder),
    ) -> &mut Self {
        let mut mapping = mapping::Builder::new(schema);
        configure(&mut mapping);
        self.aggregates.push(mapping);
        self
    }

    /// Set the collection name prefix for all models
    pub fn collection_name_prefix(&mut self, prefix: &str) -> &mut Self {
        self.collection_name_prefix = Some(prefix.to_string());
        self
    }

    /// Validate every mapping and produce the registry.
    pub fn build(&self) -> Result<Registry> {
        let mut models = IndexMap::new();
        for model in &self.models {
            if models
                .insert(model.name.clone(), Arc::new(model.clone()))
                .is_some()
            {
                return Err(err!("model `{}` is registered more than once", model.name));
            }
        }

        let mut names = IndexSet::new();
        for aggregate in &self.aggregates {
            let name = &aggregate.schema().name;
            if models.contains_key(name) {
                return Err(err!("aggregate `{name}` has the same name as a model"));
            }
            if !names.insert(name.clone()) {
                return Err(err!("aggregate `{name}` is registered more than once"));
            }
        }

        let mut mappings = IndexMap::new();
        for aggregate in &self.aggregates {
            let mapping = aggregate.clone().build(&models, &names)?;
            mappings.insert(mapping.name().to_string(), Arc::new(mapping));
        }

        tracing::debug!(
            models = models.len(),
            aggregates = mappings.len(),
            "built registry"
        );

        Ok(Registry {
            collection_name_prefix: self.collection_name_prefix.clone(),
            models,
            mappings,
        })
    }
}
