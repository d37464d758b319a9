use super::ModelProvider;
use crate::{
    driver::Operation,
    err,
    stmt::Id,
    Aggregate, Aggregator, Database, Registry, Result,
};

use std::sync::Arc;

/// Builds and saves aggregates.
pub trait AggregateProvider: Send + Sync + 'static {
    /// The aggregate of type `aggregate` with identifier `id`.
    fn get(&self, aggregate: &str, id: &Id) -> Result<Aggregate>;

    fn save(&self, aggregate: &mut Aggregate) -> Result<()>;

    /// Save each aggregate in order, stopping at the first failure.
    fn save_all(&self, aggregates: &mut [Aggregate]) -> Result<()> {
        for aggregate in aggregates {
            self.save(aggregate)?;
        }
        Ok(())
    }
}

/// The default [`AggregateProvider`].
///
/// Aggregates are composed from one record per model their type uses. Cloning a provider is
/// cheap; clones share the registry and database.
#[derive(Debug, Clone)]
pub struct Provider {
    models: ModelProvider,
}

impl Provider {
    pub fn new(registry: Registry, db: impl Database) -> Provider {
        Provider::from_shared(Arc::new(registry), Arc::new(db))
    }

    pub fn from_shared(registry: Arc<Registry>, db: Arc<dyn Database>) -> Provider {
        Provider {
            models: ModelProvider::new(registry, db),
        }
    }

    pub fn models(&self) -> &ModelProvider {
        &self.models
    }

    pub fn registry(&self) -> &Arc<Registry> {
        self.models.registry()
    }

    /// A new aggregate of type `aggregate`.
    ///
    /// The identifier is allocated by the collection of the first model the aggregate uses
    /// and shared by every record.
    pub fn create(&self, aggregate: &str) -> Result<Aggregate> {
        let mapping = self.registry().mapping(aggregate)?;

        let first = mapping
            .schema()
            .models
            .first()
            .ok_or_else(|| err!("aggregate `{aggregate}` uses no models"))?;

        let id = self
            .models
            .collection(first)?
            .exec(Operation::NewId)?
            .into_id()?;

        self.get(aggregate, &id)
    }

    pub fn get_as<A: Aggregator>(&self, id: &Id) -> Result<A> {
        self.get(A::NAME, id).map(A::from_aggregate)
    }

    pub fn create_as<A: Aggregator>(&self) -> Result<A> {
        self.create(A::NAME).map(A::from_aggregate)
    }

    pub fn save_as<A: Aggregator>(&self, aggregate: &mut A) -> Result<()> {
        self.save(aggregate.aggregate_mut())
    }
}

impl AggregateProvider for Provider {
    fn get(&self, aggregate: &str, id: &Id) -> Result<Aggregate> {
        let mapping = self.registry().mapping(aggregate)?;

        let records = mapping
            .schema()
            .models
            .iter()
            .map(|model| self.models.get(model, id.clone()))
            .collect::<Result<Vec<_>>>()?;

        Aggregate::new(mapping.clone(), Arc::new(self.clone()), records)
    }

    fn save(&self, aggregate: &mut Aggregate) -> Result<()> {
        aggregate.commit()
    }
}
