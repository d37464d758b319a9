use super::{auto, ForeignAggregate, Getter, Mapping, Setter};
use crate::{
    err, schema,
    stmt::{Primitive, Type, Value},
    Context, Error, Result,
};

use indexmap::{IndexMap, IndexSet};
use std::sync::Arc;

/// Collects the field mapping of one aggregate type.
///
/// Nothing is checked while the mapping is described. Field, model and type checks, and
/// automatic mapping of the fields left unconfigured, happen when the registry is built.
///
/// ```ignore
/// mapping
///     .field("ProcessorSpeed")
///     .from(|cx| cx.get("Processor", "Speed"))
///     .to("Processor", "Speed")
///     .identity()
///     .using("Processor", ["Speed"]);
///
/// mapping.foreign_aggregate("Ram").id_from("Computer", "RamId");
/// ```
#[derive(Clone)]
pub struct Builder {
    pub(super) schema: schema::Aggregate,

    pub(super) getters: IndexMap<String, Getter>,

    pub(super) usings: IndexMap<String, IndexMap<String, Vec<String>>>,

    pub(super) setters: IndexMap<String, IndexMap<String, IndexMap<String, Setter>>>,

    /// field -> (model, id field)
    pub(super) foreign: IndexMap<String, (String, String)>,
}

/// Describes one simple aggregate field.
pub struct FieldMapping<'a> {
    builder: &'a mut Builder,
    field: String,
}

/// A record field an aggregate field is written to. Finish it with a transform.
pub struct FieldTarget<'a> {
    mapping: FieldMapping<'a>,
    model: String,
    target: String,
}

/// Describes one aggregate-typed field.
pub struct ForeignAggregateMapping<'a> {
    builder: &'a mut Builder,
    field: String,
}

impl Builder {
    pub fn new(schema: schema::Aggregate) -> Builder {
        Builder {
            schema,
            getters: IndexMap::new(),
            usings: IndexMap::new(),
            setters: IndexMap::new(),
            foreign: IndexMap::new(),
        }
    }

    pub fn schema(&self) -> &schema::Aggregate {
        &self.schema
    }

    pub fn field(&mut self, name: impl Into<String>) -> FieldMapping<'_> {
        FieldMapping {
            builder: self,
            field: name.into(),
        }
    }

    pub fn foreign_aggregate(&mut self, name: impl Into<String>) -> ForeignAggregateMapping<'_> {
        ForeignAggregateMapping {
            builder: self,
            field: name.into(),
        }
    }

    pub fn getter(&mut self, field: impl Into<String>, getter: Getter) -> &mut Self {
        self.getters.insert(field.into(), getter);
        self
    }

    pub fn setter(
        &mut self,
        field: impl Into<String>,
        model: impl Into<String>,
        target: impl Into<String>,
        setter: Setter,
    ) -> &mut Self {
        self.setters
            .entry(field.into())
            .or_default()
            .entry(model.into())
            .or_default()
            .insert(target.into(), setter);
        self
    }

    /// Declare record fields the getter of `field` reads, for batched preloading.
    pub fn uses<I, S>(
        &mut self,
        field: impl Into<String>,
        model: impl Into<String>,
        fields: I,
    ) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let used = self
            .usings
            .entry(field.into())
            .or_default()
            .entry(model.into())
            .or_default();

        for name in fields {
            let name = name.into();
            if !used.contains(&name) {
                used.push(name);
            }
        }

        self
    }

    /// Map `field` straight to `model.target`: read it, write it back unchanged and preload it.
    pub fn one_to_one(
        &mut self,
        field: impl Into<String>,
        model: impl Into<String>,
        target: impl Into<String>,
    ) -> &mut Self {
        let (field, model, target) = (field.into(), model.into(), target.into());

        let getter = read_field(model.clone(), target.clone());
        let setter: Setter = Arc::new(identity);

        self.getter(field.clone(), getter)
            .setter(field.clone(), model.clone(), target.clone(), setter)
            .uses(field, model, [target])
    }

    pub fn foreign(
        &mut self,
        field: impl Into<String>,
        model: impl Into<String>,
        id_field: impl Into<String>,
    ) -> &mut Self {
        self.foreign
            .insert(field.into(), (model.into(), id_field.into()));
        self
    }

    /// Check the described mapping against the registered schemas and complete it with
    /// automatic mappings.
    pub(crate) fn build(
        mut self,
        models: &IndexMap<String, Arc<schema::Model>>,
        aggregates: &IndexSet<String>,
    ) -> Result<Mapping> {
        let mut used = vec![];
        for name in &self.schema.models {
            let Some(model) = models.get(name) else {
                let cx = err!("aggregate `{}`", self.schema.name);
                return Err(Error::unknown_model(name).context(cx));
            };
            used.push(model.clone());
        }

        let configured: IndexSet<String> = self
            .getters
            .keys()
            .chain(self.usings.keys())
            .chain(self.setters.keys())
            .chain(self.foreign.keys())
            .cloned()
            .collect();

        let mut foreign = IndexMap::new();
        for field in &configured {
            let resolved = self
                .check_field(field, &used, aggregates)
                .map_err(|e| e.context(err!("mapping `{}.{}`", self.schema.name, field)))?;

            if let Some(resolved) = resolved {
                foreign.insert(field.clone(), resolved);
            }
        }

        auto::complete(&mut self, &used)?;

        tracing::debug!(aggregate = %self.schema.name, fields = self.schema.fields.len(), "built mapping");

        Ok(Mapping {
            schema: self.schema,
            getters: self.getters,
            usings: self.usings,
            setters: self.setters,
            foreign,
        })
    }

    fn check_field(
        &self,
        name: &str,
        used: &[Arc<schema::Model>],
        aggregates: &IndexSet<String>,
    ) -> Result<Option<ForeignAggregate>> {
        let agg = &self.schema.name;
        let field = self
            .schema
            .field_by_name(name)
            .ok_or_else(|| Error::unknown_field(agg, name))?;

        let targets = self
            .usings
            .get(name)
            .into_iter()
            .flatten()
            .flat_map(|(model, fields)| fields.iter().map(move |f| (model, f)))
            .chain(
                self.setters
                    .get(name)
                    .into_iter()
                    .flatten()
                    .flat_map(|(model, fields)| fields.keys().map(move |f| (model, f))),
            );

        for (model, target) in targets {
            record_field(used, model, target)?;

            if field.ty.is_aggregate() {
                return Err(Error::incompatible_types(agg, name, model, target));
            }
        }

        if field.ty.is_aggregate() && self.getters.contains_key(name) {
            return Err(err!(
                "field is an aggregate and is read through its foreign aggregate mapping"
            ));
        }

        let Some((model, id_field)) = self.foreign.get(name) else {
            return Ok(None);
        };

        let target = record_field(used, model, id_field)?;

        let Some(aggregate) = field.ty.as_aggregate() else {
            return Err(Error::incompatible_types(agg, name, model, id_field));
        };

        if target.ty != Type::Id {
            return Err(Error::incompatible_types(agg, name, model, id_field));
        }

        if !aggregates.contains(aggregate) {
            return Err(Error::unknown_model(aggregate));
        }

        Ok(Some(ForeignAggregate {
            model: model.clone(),
            field: id_field.clone(),
            aggregate: aggregate.to_string(),
        }))
    }
}

impl<'a> FieldMapping<'a> {
    /// Compute the field from the aggregate's records.
    pub fn from<V, F>(self, getter: F) -> Self
    where
        V: Into<Value>,
        F: Fn(&mut Context<'_>) -> Result<V> + Send + Sync + 'static,
    {
        let getter = getter_fn(move |cx| getter(cx).map(Into::into));
        self.builder.getter(self.field.clone(), getter);
        self
    }

    /// Write the field to `model.target`.
    pub fn to(self, model: impl Into<String>, target: impl Into<String>) -> FieldTarget<'a> {
        FieldTarget {
            mapping: self,
            model: model.into(),
            target: target.into(),
        }
    }

    pub fn using<I, S>(self, model: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.builder.uses(self.field.clone(), model, fields);
        self
    }

    pub fn one_to_one(self, model: impl Into<String>, target: impl Into<String>) -> Self {
        self.builder.one_to_one(self.field.clone(), model, target);
        self
    }
}

impl<'a> FieldTarget<'a> {
    /// Convert the aggregate value before writing it to the record field.
    pub fn with<A, B, F>(self, transform: F) -> FieldMapping<'a>
    where
        A: Primitive,
        B: Into<Value>,
        F: Fn(A) -> B + Send + Sync + 'static,
    {
        let setter = setter_fn(move |value| Ok(transform(A::load(value)?).into()));
        self.setter(setter)
    }

    /// Write the aggregate value to the record field unchanged.
    pub fn identity(self) -> FieldMapping<'a> {
        self.setter(Arc::new(identity))
    }

    pub fn setter(self, setter: Setter) -> FieldMapping<'a> {
        let FieldTarget {
            mapping,
            model,
            target,
        } = self;

        mapping
            .builder
            .setter(mapping.field.clone(), model, target, setter);
        mapping
    }
}

impl<'a> ForeignAggregateMapping<'a> {
    /// The nested aggregate's identifier is stored in `model.field`.
    pub fn id_from(self, model: impl Into<String>, field: impl Into<String>) -> &'a mut Builder {
        self.builder.foreign(self.field, model, field)
    }
}

pub(super) fn read_field(model: String, field: String) -> Getter {
    getter_fn(move |cx| cx.get(&model, &field))
}

pub(super) fn identity(value: Value) -> Result<Value> {
    Ok(value)
}

fn getter_fn<F>(getter: F) -> Getter
where
    F: Fn(&mut Context<'_>) -> Result<Value> + Send + Sync + 'static,
{
    Arc::new(getter)
}

fn setter_fn<F>(setter: F) -> Setter
where
    F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
{
    Arc::new(setter)
}

fn record_field<'m>(
    used: &'m [Arc<schema::Model>],
    model: &str,
    field: &str,
) -> Result<&'m schema::Field> {
    let model_schema = used
        .iter()
        .find(|m| m.name == model)
        .ok_or_else(|| Error::unknown_model(model))?;

    model_schema
        .field_by_name(field)
        .ok_or_else(|| Error::unknown_field(model, field))
}
