use super::{Fields, Value};

/// A predicate over the field values of one record, used by query operations.
///
/// Filters are data: store adapters translate them into their native query language, or
/// evaluate them directly with [`Filter::eval`].
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every record
    All,

    /// `field == value`
    Eq(String, Value),

    /// `field != value`
    Ne(String, Value),

    /// All sub-filters match
    And(Vec<Filter>),

    /// At least one sub-filter matches
    Or(Vec<Filter>),

    /// The sub-filter does not match
    Not(Box<Filter>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq(field.into(), value.into())
    }

    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Ne(field.into(), value.into())
    }

    pub fn and(self, other: Filter) -> Self {
        match self {
            Self::And(mut operands) => {
                operands.push(other);
                Self::And(operands)
            }
            lhs => Self::And(vec![lhs, other]),
        }
    }

    pub fn or(self, other: Filter) -> Self {
        match self {
            Self::Or(mut operands) => {
                operands.push(other);
                Self::Or(operands)
            }
            lhs => Self::Or(vec![lhs, other]),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Names of every field the filter reads.
    pub fn fields(&self) -> Vec<&str> {
        let mut fields = vec![];
        self.collect_fields(&mut fields);
        fields
    }

    fn collect_fields<'a>(&'a self, fields: &mut Vec<&'a str>) {
        match self {
            Self::All => {}
            Self::Eq(field, _) | Self::Ne(field, _) => {
                if !fields.contains(&field.as_str()) {
                    fields.push(field);
                }
            }
            Self::And(operands) | Self::Or(operands) => {
                for operand in operands {
                    operand.collect_fields(fields);
                }
            }
            Self::Not(operand) => operand.collect_fields(fields),
        }
    }

    /// Evaluate the filter against a record's fields. A field missing from `record` compares
    /// as `Null`.
    pub fn eval(&self, record: &Fields) -> bool {
        let lookup = |field: &str| record.get(field).unwrap_or(&Value::Null);

        match self {
            Self::All => true,
            Self::Eq(field, value) => lookup(field) == value,
            Self::Ne(field, value) => lookup(field) != value,
            Self::And(operands) => operands.iter().all(|operand| operand.eval(record)),
            Self::Or(operands) => operands.iter().any(|operand| operand.eval(record)),
            Self::Not(operand) => !operand.eval(record),
        }
    }
}
