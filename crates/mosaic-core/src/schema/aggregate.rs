use super::Field;
use crate::stmt::Type;

/// Field table of one aggregate type.
///
/// An aggregate composes one record of each model in `models`, all sharing one identifier.
/// Fields typed [`Type::Aggregate`] are nested aggregates; every other field is derived from
/// the records through the aggregate's mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    /// Name of the aggregate type, unique within a registry
    pub name: String,

    /// Names of the models composed by this aggregate, in registration order
    pub models: Vec<String>,

    /// Declared fields, in declaration order
    pub fields: Vec<Field>,
}

impl Aggregate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            models: vec![],
            fields: vec![],
        }
    }

    /// Compose records of `model` into this aggregate.
    pub fn using(mut self, model: impl Into<String>) -> Self {
        self.models.push(model.into());
        self
    }

    /// Declare a non-nullable field.
    pub fn field(mut self, name: impl Into<String>, ty: Type) -> Self {
        self.fields.push(Field::new(name, ty));
        self
    }

    /// Declare a nullable field.
    pub fn nullable_field(mut self, name: impl Into<String>, ty: Type) -> Self {
        let mut field = Field::new(name, ty);
        field.nullable = true;
        self.fields.push(field);
        self
    }

    /// Declare a field holding another aggregate.
    pub fn aggregate_field(self, name: impl Into<String>, aggregate: impl Into<String>) -> Self {
        self.field(name, Type::aggregate(aggregate))
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn uses_model(&self, model: &str) -> bool {
        self.models.iter().any(|name| name == model)
    }

    /// Fields derived from the composed records.
    pub fn simple_fields(&self) -> impl Iterator<Item = &Field> + '_ {
        self.fields.iter().filter(|field| !field.ty.is_aggregate())
    }

    /// Fields holding nested aggregates.
    pub fn aggregate_fields(&self) -> impl Iterator<Item = &Field> + '_ {
        self.fields.iter().filter(|field| field.ty.is_aggregate())
    }
}
