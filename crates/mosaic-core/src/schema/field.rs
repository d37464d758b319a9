use crate::stmt::Type;

/// One entry of a model's or aggregate's field table.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// The field name, unique within its model or aggregate
    pub name: String,

    /// The value type of the field
    pub ty: Type,

    /// True if the field may hold `Null`
    pub nullable: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }

    /// True if values of `source` may be stored in this field: the types are assignable and
    /// a nullable source only flows into a nullable field.
    pub fn accepts(&self, source: &Field) -> bool {
        self.ty.is_assignable_from(&source.ty) && (self.nullable || !source.nullable)
    }
}
