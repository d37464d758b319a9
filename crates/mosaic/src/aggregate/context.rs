use crate::{
    err,
    stmt::{Id, Primitive, Value},
    Error, Record, Result,
};

use indexmap::IndexMap;

/// Read access to an aggregate's records while one field is being computed.
pub struct Context<'a> {
    aggregate: &'a str,

    id: &'a Id,

    records: &'a mut IndexMap<String, Record>,
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        aggregate: &'a str,
        id: &'a Id,
        records: &'a mut IndexMap<String, Record>,
    ) -> Context<'a> {
        Context {
            aggregate,
            id,
            records,
        }
    }

    /// Identifier shared by the aggregate and all of its records.
    pub fn id(&self) -> &Id {
        self.id
    }

    /// Read `field` of the aggregate's `model` record, loading it if needed.
    pub fn get(&mut self, model: &str, field: &str) -> Result<Value> {
        let record = record_mut(self.aggregate, self.id, self.records, model)?;
        record.get(field)
    }

    pub fn get_as<T: Primitive>(&mut self, model: &str, field: &str) -> Result<T> {
        T::load(self.get(model, field)?)
    }
}

pub(super) fn record_mut<'r>(
    aggregate: &str,
    id: &Id,
    records: &'r mut IndexMap<String, Record>,
    model: &str,
) -> Result<&'r mut Record> {
    let Some(record) = records.get_mut(model) else {
        let cx = err!("aggregate `{aggregate}` with id {id}");
        return Err(Error::unknown_model(model).context(cx));
    };
    Ok(record)
}
