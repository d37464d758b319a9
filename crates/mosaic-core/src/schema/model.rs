use super::{Field, Name};
use crate::stmt::Type;

/// Field table of one record type, backed by one store collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    /// Name of the model, unique within a registry
    pub name: String,

    /// Overrides the collection name derived from the model name
    pub collection: Option<String>,

    /// Declared fields, in declaration order
    pub fields: Vec<Field>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collection: None,
            fields: vec![],
        }
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

    /// Store records of this model in `collection` instead of the derived collection name.
    pub fn collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field_by_name(name).is_some()
    }

    pub fn field_names(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.fields.iter().map(|field| field.name.as_str())
    }

    /// The collection records of this model are stored in: the explicit override, or the
    /// pluralized snake case model name behind `prefix`.
    pub fn collection_name(&self, prefix: Option<&str>) -> String {
        let base = match &self.collection {
            Some(collection) => collection.clone(),
            None => Name::new(&self.name).plural_snake_case(),
        };

        match prefix {
            Some(prefix) => format!("{prefix}{base}"),
            None => base,
        }
    }
}
