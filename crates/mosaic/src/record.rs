use crate::{
    driver::operation::{GetField, GetFields, UpdateFields},
    schema,
    stmt::{Fields, Id, Primitive, Value},
    Collection, Error, LazyList, Result,
};

use indexmap::IndexMap;
use std::{fmt, sync::Arc};

/// One entity stored in a single collection, loaded field by field.
///
/// Every declared field has a slot. A slot starts unloaded and is filled either by the first
/// read of that field or by [`Record::preload`]. Once loaded, a slot is authoritative: later
/// reads never go back to the store.
///
/// Writes update the slot immediately and are appended to a pending log. [`Record::commit`]
/// flushes the log as a single batched update.
pub struct Record {
    id: Id,

    schema: Arc<schema::Model>,

    collection: Arc<dyn Collection>,

    slots: IndexMap<String, Option<Value>>,

    pending: Vec<(String, Value)>,

    write_events: bool,
}

impl Record {
    pub fn new(
        id: Id,
        schema: Arc<schema::Model>,
        collection: Arc<dyn Collection>,
    ) -> Record {
        let slots = schema
            .field_names()
            .map(|name| (name.to_string(), None))
            .collect();

        Record {
            id,
            schema,
            collection,
            slots,
            pending: vec![],
            write_events: true,
        }
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn model_name(&self) -> &str {
        &self.schema.name
    }

    pub fn schema(&self) -> &schema::Model {
        &self.schema
    }

    pub fn collection(&self) -> &Arc<dyn Collection> {
        &self.collection
    }

    /// Returns `true` if the field's slot holds a value.
    pub fn is_loaded(&self, field: &str) -> bool {
        matches!(self.slots.get(field), Some(Some(_)))
    }

    /// Read a field, fetching it from the store if its slot is not loaded yet.
    pub fn get(&mut self, field: &str) -> Result<Value> {
        let slot = self
            .slots
            .get_mut(field)
            .ok_or_else(|| Error::unknown_field(&self.schema.name, field))?;

        if let Some(value) = slot {
            return Ok(value.clone());
        }

        tracing::trace!(model = %self.schema.name, id = %self.id, field, "fetching field");

        let value = self
            .collection
            .exec(
                GetField {
                    id: self.id.clone(),
                    field: field.to_string(),
                }
                .into(),
            )?
            .into_value()?;

        *slot = Some(value.clone());
        Ok(value)
    }

    pub fn get_as<T: Primitive>(&mut self, field: &str) -> Result<T> {
        T::load(self.get(field)?)
    }

    /// Write a field. The store is not touched until [`Record::commit`].
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        self.check(field, &value)?;

        if self.write_events {
            self.pending.push((field.to_string(), value.clone()));
        }

        if let Some(slot) = self.slots.get_mut(field) {
            *slot = Some(value);
        }

        Ok(())
    }

    /// Check that `value` may be written to `field` without writing it.
    pub fn check(&self, field: &str, value: &Value) -> Result<()> {
        let declared = self
            .schema
            .field_by_name(field)
            .ok_or_else(|| Error::unknown_field(&self.schema.name, field))?;

        if !value.is_a(&declared.ty) {
            let err = Error::type_conversion(value.clone(), declared.ty.name());
            let cx = crate::err!("field `{}.{}`", self.schema.name, field);
            return Err(err.context(cx));
        }

        Ok(())
    }

    /// Fetch several fields with a single store call.
    ///
    /// An empty `fields` slice fetches every declared field and replaces all slots with the
    /// fetched snapshot. Otherwise only the requested fields that are not loaded yet are
    /// fetched; when all of them are loaded the store is not called at all.
    pub fn preload(&mut self, fields: &[&str]) -> Result<()> {
        for field in fields {
            if !self.slots.contains_key(*field) {
                return Err(Error::unknown_field(&self.schema.name, field));
            }
        }

        let fetch: Vec<String> = if fields.is_empty() {
            self.slots.keys().cloned().collect()
        } else {
            let mut fetch: Vec<String> = vec![];
            for field in fields {
                if !self.is_loaded(field) && !fetch.iter().any(|f| f == field) {
                    fetch.push(field.to_string());
                }
            }
            fetch
        };

        if fetch.is_empty() {
            return Ok(());
        }

        tracing::debug!(model = %self.schema.name, id = %self.id, fields = ?fetch, "preloading fields");

        let mut values = self
            .collection
            .exec(
                GetFields {
                    id: self.id.clone(),
                    fields: fetch.clone(),
                }
                .into(),
            )?
            .into_fields()?;

        let mut fetched = Vec::with_capacity(fetch.len());
        for name in fetch {
            let Some(value) = values.swap_remove(&name) else {
                return Err(Error::invalid_result(format!(
                    "store omitted field `{}.{}` for id {}",
                    self.schema.name, name, self.id
                )));
            };
            fetched.push((name, value));
        }

        for (name, value) in fetched {
            if let Some(slot) = self.slots.get_mut(&name) {
                *slot = Some(value);
            }
        }

        Ok(())
    }

    /// Flush pending writes as one batched update.
    ///
    /// When a field was written several times, the last write wins. An empty log makes no
    /// store call. If the store call fails the log is kept so the commit can be retried.
    pub fn commit(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let mut fields = Fields::new();
        for (name, value) in &self.pending {
            fields.insert(name.clone(), value.clone());
        }

        tracing::debug!(model = %self.schema.name, id = %self.id, fields = fields.len(), "committing record");

        self.collection
            .exec(
                UpdateFields {
                    id: self.id.clone(),
                    fields,
                }
                .into(),
            )?
            .into_unit()?;

        self.pending.clear();
        Ok(())
    }

    /// Seed slots with known values without recording them as pending writes.
    pub fn initialize_fields<I, K>(&mut self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let previous = std::mem::replace(&mut self.write_events, false);

        let res = fields
            .into_iter()
            .try_for_each(|(name, value)| self.set(name.as_ref(), value));

        self.write_events = previous;
        res
    }

    pub fn set_write_events(&mut self, enabled: bool) {
        self.write_events = enabled;
    }

    pub fn write_events(&self) -> bool {
        self.write_events
    }

    pub fn has_pending_writes(&self) -> bool {
        !self.pending.is_empty()
    }

    /// A lazy view over a list-typed field of this record.
    pub fn list<T: Primitive>(&self, field: &str) -> Result<LazyList<T>> {
        let declared = self
            .schema
            .field_by_name(field)
            .ok_or_else(|| Error::unknown_field(&self.schema.name, field))?;

        if !declared.ty.is_list() {
            crate::bail!(
                "field `{}.{}` is not a list; it is declared as {}",
                self.schema.name,
                field,
                declared.ty.name()
            );
        }

        let list = LazyList::new(self.collection.clone(), self.id.clone(), field.to_string());
        Ok(list)
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("model", &self.schema.name)
            .field("id", &self.id)
            .field("slots", &self.slots)
            .field("pending", &self.pending)
            .finish()
    }
}
