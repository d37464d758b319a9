mod context;
pub use context::Context;

use crate::{
    err,
    mapping::{self, ForeignAggregate},
    provider::AggregateProvider,
    schema,
    stmt::{Id, Primitive, Value},
    Error, Mapping, Record, Result,
};

use indexmap::{map::Entry, IndexMap};
use std::{collections::HashSet, fmt, sync::Arc};

/// A typed view over an [`Aggregate`].
pub trait Aggregator: Sized {
    /// Aggregate type name, as used by mappings and the registry.
    const NAME: &'static str;

    fn schema() -> schema::Aggregate;

    /// Describe how fields map to records. Fields left out are mapped automatically.
    fn configure(_mapping: &mut mapping::Builder) {}

    fn from_aggregate(aggregate: Aggregate) -> Self;

    fn aggregate_mut(&mut self) -> &mut Aggregate;

    fn into_aggregate(self) -> Aggregate;
}

/// One logical object composed of several records sharing an identifier.
///
/// Field reads and writes go through the aggregate type's [`Mapping`]. Aggregate-typed
/// fields resolve to nested aggregates through the provider the first time they are
/// accessed and stay cached for the lifetime of this instance.
pub struct Aggregate {
    id: Id,

    mapping: Arc<Mapping>,

    provider: Arc<dyn AggregateProvider>,

    records: IndexMap<String, Record>,

    nested: IndexMap<String, Aggregate>,
}

impl Aggregate {
    /// Compose `records` into an aggregate.
    ///
    /// Every record must have the same identifier and belong to a distinct model used by the
    /// aggregate type.
    pub fn new(
        mapping: Arc<Mapping>,
        provider: Arc<dyn AggregateProvider>,
        records: impl IntoIterator<Item = Record>,
    ) -> Result<Aggregate> {
        let mut records = records.into_iter().peekable();

        let id = records
            .peek()
            .map(|record| record.id().clone())
            .ok_or_else(Error::identity_missing)?;

        let mut by_model = IndexMap::new();
        for record in records {
            if *record.id() != id {
                return Err(Error::identity_mismatch(&id, record.id()));
            }

            let model = record.model_name().to_string();

            if !mapping.schema().uses_model(&model) {
                let cx = err!("aggregate `{}` does not use it", mapping.name());
                return Err(Error::unknown_model(&model).context(cx));
            }

            if by_model.contains_key(&model) {
                return Err(err!(
                    "aggregate `{}` received more than one `{}` record",
                    mapping.name(),
                    model
                ));
            }

            by_model.insert(model, record);
        }

        Ok(Aggregate {
            id,
            mapping,
            provider,
            records: by_model,
            nested: IndexMap::new(),
        })
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn name(&self) -> &str {
        self.mapping.name()
    }

    pub fn mapping(&self) -> &Arc<Mapping> {
        &self.mapping
    }

    pub fn record(&self, model: &str) -> Option<&Record> {
        self.records.get(model)
    }

    pub fn record_mut(&mut self, model: &str) -> Option<&mut Record> {
        self.records.get_mut(model)
    }

    /// Compute a simple field through its getter.
    pub fn get(&mut self, field: &str) -> Result<Value> {
        let agg = self.mapping.name();

        let ty = self
            .mapping
            .field_ty(field)
            .ok_or_else(|| Error::unknown_field(agg, field))?;

        if ty.is_aggregate() {
            return Err(err!(
                "field `{agg}.{field}` is an aggregate; read it with `Aggregate::aggregate`"
            ));
        }

        let getter = self
            .mapping
            .getter(field)
            .ok_or_else(|| err!("field `{agg}.{field}` has no getter"))?;

        let mut cx = Context::new(agg, &self.id, &mut self.records);
        getter(&mut cx)
    }

    pub fn get_as<T: Primitive>(&mut self, field: &str) -> Result<T> {
        T::load(self.get(field)?)
    }

    /// Write a simple field to every record field it is mapped to.
    ///
    /// Writing a field without setters is ignored.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let agg = self.mapping.name();

        let ty = self
            .mapping
            .field_ty(field)
            .ok_or_else(|| Error::unknown_field(agg, field))?;

        if ty.is_aggregate() {
            return Err(err!(
                "field `{agg}.{field}` is an aggregate; write it with `Aggregate::set_aggregate`"
            ));
        }

        if self.mapping.is_read_only(field) {
            tracing::warn!(aggregate = agg, id = %self.id, field, "ignoring write to read-only field");
            return Ok(());
        }

        let Some(setters) = self.mapping.setters(field) else {
            return Ok(());
        };

        // Transform and type check every target before touching any record.
        let mut writes = vec![];
        for (model, targets) in setters {
            let record = context::record_mut(agg, &self.id, &mut self.records, model)?;
            for (target, setter) in targets {
                let value = setter(value.clone())?;
                record.check(target, &value)?;
                writes.push((model, target, value));
            }
        }

        for (model, target, value) in writes {
            let record = context::record_mut(agg, &self.id, &mut self.records, model)?;
            record.set(target, value)?;
        }

        Ok(())
    }

    /// The nested aggregate behind `field`, resolved through the provider on first access.
    pub fn aggregate(&mut self, field: &str) -> Result<&mut Aggregate> {
        let agg = self.mapping.name();
        let foreign = foreign_ref(&self.mapping, field)?;

        match self.nested.entry(field.to_string()) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(e) => {
                let id = foreign_id(agg, &self.id, &mut self.records, foreign)?;

                tracing::debug!(
                    aggregate = agg,
                    field,
                    nested = %foreign.aggregate,
                    %id,
                    "resolving nested aggregate"
                );

                let nested = self.provider.get(&foreign.aggregate, &id)?;
                Ok(e.insert(nested))
            }
        }
    }

    /// Replace the nested aggregate behind `field` and store its identifier in the owning
    /// record field.
    pub fn set_aggregate(&mut self, field: &str, aggregate: Aggregate) -> Result<()> {
        let agg = self.mapping.name();
        let foreign = foreign_ref(&self.mapping, field)?;

        if aggregate.name() != foreign.aggregate {
            return Err(err!(
                "field `{agg}.{field}` holds `{}` aggregates, got `{}`",
                foreign.aggregate,
                aggregate.name()
            ));
        }

        context::record_mut(agg, &self.id, &mut self.records, &foreign.model)?
            .set(&foreign.field, aggregate.id().clone())?;

        self.nested.insert(field.to_string(), aggregate);
        Ok(())
    }

    /// Commit every record, then every nested aggregate resolved so far.
    ///
    /// Commits are not atomic: when one fails, the commits before it stay applied.
    pub fn commit(&mut self) -> Result<()> {
        tracing::debug!(aggregate = self.mapping.name(), id = %self.id, "committing aggregate");

        for record in self.records.values_mut() {
            record.commit()?;
        }

        for nested in self.nested.values_mut() {
            nested.commit()?;
        }

        Ok(())
    }

    /// Load the record fields behind `fields` with one batched call per model, then preload
    /// the nested aggregates among them. An empty slice preloads every field.
    pub fn preload(&mut self, fields: &[&str]) -> Result<()> {
        let mut visited = HashSet::new();
        self.preload_visited(fields, &mut visited)
    }

    fn preload_visited(
        &mut self,
        fields: &[&str],
        visited: &mut HashSet<(String, Id)>,
    ) -> Result<()> {
        if !visited.insert((self.name().to_string(), self.id.clone())) {
            return Ok(());
        }

        let agg = self.mapping.name();

        let requested: Vec<&str> = if fields.is_empty() {
            self.mapping
                .schema()
                .fields
                .iter()
                .map(|field| field.name.as_str())
                .collect()
        } else {
            for field in fields {
                if self.mapping.field_ty(field).is_none() {
                    return Err(Error::unknown_field(agg, field));
                }
            }
            fields.to_vec()
        };

        let mut per_model: IndexMap<&str, Vec<&str>> = IndexMap::new();
        let mut nested = vec![];

        for field in &requested {
            if let Some(foreign) = self.mapping.foreign(field) {
                per_model
                    .entry(&foreign.model)
                    .or_default()
                    .push(&foreign.field);
                nested.push(field.to_string());
                continue;
            }

            for (model, used) in self.mapping.usings(field) {
                let batch = per_model.entry(model).or_default();
                for name in used {
                    if !batch.contains(&name.as_str()) {
                        batch.push(name);
                    }
                }
            }
        }

        tracing::debug!(
            aggregate = agg,
            id = %self.id,
            models = per_model.len(),
            nested = nested.len(),
            "preloading aggregate"
        );

        for (model, names) in &per_model {
            // An empty batch would ask the record to load every field.
            if names.is_empty() {
                continue;
            }
            let record = context::record_mut(agg, &self.id, &mut self.records, model)?;
            record.preload(names)?;
        }

        for field in nested {
            self.aggregate(&field)?.preload_visited(&[], visited)?;
        }

        Ok(())
    }
}

impl fmt::Debug for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aggregate")
            .field("name", &self.mapping.name())
            .field("id", &self.id)
            .field("records", &self.records)
            .field("nested", &self.nested)
            .finish()
    }
}

fn foreign_ref<'m>(mapping: &'m Mapping, field: &str) -> Result<&'m ForeignAggregate> {
    match mapping.field_ty(field) {
        None => Err(Error::unknown_field(mapping.name(), field)),
        Some(ty) if !ty.is_aggregate() => Err(err!(
            "field `{}.{}` is not an aggregate",
            mapping.name(),
            field
        )),
        Some(_) => mapping
            .foreign(field)
            .ok_or_else(|| Error::missing_foreign_aggregate(mapping.name(), field)),
    }
}

fn foreign_id(
    aggregate: &str,
    id: &Id,
    records: &mut IndexMap<String, Record>,
    foreign: &ForeignAggregate,
) -> Result<Id> {
    let record = context::record_mut(aggregate, id, records, &foreign.model)?;
    let value = record.get(&foreign.field)?;

    value.to_id().map_err(|e| {
        e.context(err!(
            "reading `{}.{}` of aggregate `{aggregate}` with id {id}",
            foreign.model,
            foreign.field
        ))
    })
}
