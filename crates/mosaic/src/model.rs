use crate::{schema, Record};

/// A typed view over a [`Record`].
///
/// Implementors are thin wrappers that describe their fields through [`Model::schema`] and
/// expose typed accessors over the wrapped record.
pub trait Model: Sized {
    /// Model name, as used by mappings and the registry.
    const NAME: &'static str;

    fn schema() -> schema::Model;

    fn from_record(record: Record) -> Self;

    fn into_record(self) -> Record;
}
