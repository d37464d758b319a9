use super::Error;

/// Error when an aggregate's mapping configuration cannot be completed.
///
/// These are registration-time errors. They are returned while the registry is built, so no
/// instance of a misconfigured aggregate type can ever be constructed.
#[derive(Debug)]
pub(super) struct InvalidMapping {
    aggregate: Box<str>,
    field: Box<str>,
    reason: Reason,
}

#[derive(Debug)]
enum Reason {
    /// More than one record type declares a field with the aggregate field's name.
    Ambiguous { targets: Vec<Box<str>> },

    /// No record type declares a field with the aggregate field's name.
    TargetNotFound,

    /// The record field's type cannot be assigned to the aggregate field.
    IncompatibleTypes { model: Box<str>, field: Box<str> },

    /// The aggregate field is another aggregate but has no foreign id wiring.
    MissingForeignAggregate,
}

impl std::error::Error for InvalidMapping {}

impl core::fmt::Display for InvalidMapping {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let origin = format!("{}.{}", self.aggregate, self.field);

        match &self.reason {
            Reason::Ambiguous { targets } => {
                write!(
                    f,
                    "invalid mapping: field `{origin}` has ambiguous targets "
                )?;
                for (i, model) in targets.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "`{}.{}`", model, self.field)?;
                }
                Ok(())
            }
            Reason::TargetNotFound => write!(
                f,
                "invalid mapping: cannot find a suitable target for `{origin}`"
            ),
            Reason::IncompatibleTypes { model, field } => write!(
                f,
                "invalid mapping: cannot map `{origin}` to `{model}.{field}` due to type incompatibility"
            ),
            Reason::MissingForeignAggregate => write!(
                f,
                "invalid mapping: field `{origin}` is an aggregate and has no foreign aggregate mapping"
            ),
        }
    }
}

impl Error {
    /// Creates an error for an aggregate field whose name is declared by several record types.
    pub fn ambiguous_mapping<I, S>(aggregate: &str, field: &str, targets: I) -> Error
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        invalid_mapping(
            aggregate,
            field,
            Reason::Ambiguous {
                targets: targets.into_iter().map(|t| t.as_ref().into()).collect(),
            },
        )
    }

    /// Creates an error for an aggregate field with no same-named record field.
    pub fn target_not_found(aggregate: &str, field: &str) -> Error {
        invalid_mapping(aggregate, field, Reason::TargetNotFound)
    }

    /// Creates an error for an aggregate field that cannot hold the mapped record field.
    pub fn incompatible_types(
        aggregate: &str,
        field: &str,
        target_model: &str,
        target_field: &str,
    ) -> Error {
        invalid_mapping(
            aggregate,
            field,
            Reason::IncompatibleTypes {
                model: target_model.into(),
                field: target_field.into(),
            },
        )
    }

    /// Creates an error for an aggregate-typed field without foreign aggregate wiring.
    pub fn missing_foreign_aggregate(aggregate: &str, field: &str) -> Error {
        invalid_mapping(aggregate, field, Reason::MissingForeignAggregate)
    }

    /// Returns `true` if this error is any mapping configuration error.
    pub fn is_invalid_mapping(&self) -> bool {
        self.invalid_mapping_reason().is_some()
    }

    /// Returns `true` if this error is an ambiguous automatic mapping.
    pub fn is_ambiguous_mapping(&self) -> bool {
        matches!(
            self.invalid_mapping_reason(),
            Some(Reason::Ambiguous { .. })
        )
    }

    /// Returns `true` if automatic mapping found no target.
    pub fn is_target_not_found(&self) -> bool {
        matches!(self.invalid_mapping_reason(), Some(Reason::TargetNotFound))
    }

    /// Returns `true` if the mapped field types are incompatible.
    pub fn is_incompatible_types(&self) -> bool {
        matches!(
            self.invalid_mapping_reason(),
            Some(Reason::IncompatibleTypes { .. })
        )
    }

    /// Returns `true` if an aggregate-typed field lacks foreign aggregate wiring.
    pub fn is_missing_foreign_aggregate(&self) -> bool {
        matches!(
            self.invalid_mapping_reason(),
            Some(Reason::MissingForeignAggregate)
        )
    }

    fn invalid_mapping_reason(&self) -> Option<&Reason> {
        match self.root_kind() {
            super::ErrorKind::InvalidMapping(err) => Some(&err.reason),
            _ => None,
        }
    }
}

fn invalid_mapping(aggregate: &str, field: &str, reason: Reason) -> Error {
    Error::from(super::ErrorKind::InvalidMapping(InvalidMapping {
        aggregate: aggregate.into(),
        field: field.into(),
        reason,
    }))
}
