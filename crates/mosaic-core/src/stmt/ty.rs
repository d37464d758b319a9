/// The type of a model or aggregate field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    /// Boolean value
    Bool,

    /// Signed 64-bit integer
    I64,

    /// 64-bit floating point number
    F64,

    /// String type
    String,

    /// A record identifier
    Id,

    /// A list of a single type
    List(Box<Type>),

    /// Another aggregate, by aggregate type name. Only valid on aggregate fields.
    Aggregate(String),

    /// Accepts a value of any type
    Any,
}

impl Type {
    pub fn list(ty: impl Into<Self>) -> Self {
        Self::List(Box::new(ty.into()))
    }

    pub fn aggregate(name: impl Into<String>) -> Self {
        Self::Aggregate(name.into())
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self, Self::Aggregate(_))
    }

    pub fn as_aggregate(&self) -> Option<&str> {
        match self {
            Self::Aggregate(name) => Some(name),
            _ => None,
        }
    }

    /// Short name of the type, used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "Bool",
            Self::I64 => "I64",
            Self::F64 => "F64",
            Self::String => "String",
            Self::Id => "Id",
            Self::List(_) => "List",
            Self::Aggregate(_) => "Aggregate",
            Self::Any => "Any",
        }
    }

    /// Returns `true` if a value of type `other` can be stored in a field of this type.
    pub fn is_assignable_from(&self, other: &Type) -> bool {
        match (self, other) {
            (Self::Any, _) => true,
            (Self::List(lhs), Self::List(rhs)) => lhs.is_assignable_from(rhs),
            (lhs, rhs) => lhs == rhs,
        }
    }
}
