use crate::{
    driver::{
        operation::{Count, DeleteById, DeleteByQuery, Exists, QueryFields, QueryOne},
        Operation,
    },
    schema,
    stmt::{Filter, Id},
    Collection, Database, Error, Model, Record, Registry, Result,
};

use std::sync::Arc;

/// Creates, finds and deletes records of registered models.
///
/// Records are created lazily: getting a record by id does not touch the store.
#[derive(Debug, Clone)]
pub struct ModelProvider {
    registry: Arc<Registry>,
    db: Arc<dyn Database>,
}

impl ModelProvider {
    pub fn new(registry: Arc<Registry>, db: Arc<dyn Database>) -> ModelProvider {
        ModelProvider { registry, db }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// The store collection holding records of `model`.
    pub fn collection(&self, model: &str) -> Result<Arc<dyn Collection>> {
        self.db.collection(&self.registry.collection_name(model)?)
    }

    /// The record of `model` with identifier `id`. Its fields load on first access.
    pub fn get(&self, model: &str, id: Id) -> Result<Record> {
        let schema = self.registry.model(model)?;
        Ok(Record::new(id, schema.clone(), self.collection(model)?))
    }

    /// A record of `model` with a freshly allocated identifier.
    pub fn create(&self, model: &str) -> Result<Record> {
        let schema = self.registry.model(model)?;
        let collection = self.collection(model)?;
        let id = collection.exec(Operation::NewId)?.into_id()?;

        tracing::debug!(model, %id, "allocated record id");

        Ok(Record::new(id, schema.clone(), collection))
    }

    /// `count` records of `model`, each with its own fresh identifier.
    pub fn create_many(&self, model: &str, count: usize) -> Result<Vec<Record>> {
        (0..count).map(|_| self.create(model)).collect()
    }

    /// Records of `model` matching `filter`, with `fields` already loaded.
    pub fn get_by_query(
        &self,
        model: &str,
        filter: Filter,
        fields: &[&str],
    ) -> Result<Vec<Record>> {
        let schema = self.registry.model(model)?;
        check_fields(schema, &filter, fields)?;

        let collection = self.collection(model)?;
        let rows = collection
            .exec(
                QueryFields {
                    filter,
                    fields: fields.iter().map(|field| field.to_string()).collect(),
                }
                .into(),
            )?
            .into_rows()?;

        tracing::debug!(model, rows = rows.len(), "queried records");

        rows.into_iter()
            .map(|(id, values)| {
                let mut record = Record::new(id, schema.clone(), collection.clone());
                record.initialize_fields(values)?;
                Ok(record)
            })
            .collect()
    }

    /// The first record of `model` matching `filter`, with `fields` already loaded.
    pub fn get_one_by_query(
        &self,
        model: &str,
        filter: Filter,
        fields: &[&str],
    ) -> Result<Option<Record>> {
        let schema = self.registry.model(model)?;
        check_fields(schema, &filter, fields)?;

        let collection = self.collection(model)?;
        let row = collection
            .exec(
                QueryOne {
                    filter,
                    fields: fields.iter().map(|field| field.to_string()).collect(),
                }
                .into(),
            )?
            .into_row()?;

        let Some((id, values)) = row else {
            return Ok(None);
        };

        let mut record = Record::new(id, schema.clone(), collection);
        record.initialize_fields(values)?;
        Ok(Some(record))
    }

    pub fn count(&self, model: &str, filter: Filter) -> Result<u64> {
        check_fields(self.registry.model(model)?, &filter, &[])?;
        self.collection(model)?
            .exec(Count { filter }.into())?
            .into_count()
    }

    pub fn exists(&self, model: &str, filter: Filter) -> Result<bool> {
        check_fields(self.registry.model(model)?, &filter, &[])?;
        self.collection(model)?
            .exec(Exists { filter }.into())?
            .into_bool()
    }

    pub fn delete(&self, model: &str, id: &Id) -> Result<()> {
        tracing::debug!(model, %id, "deleting record");
        self.collection(model)?
            .exec(DeleteById { id: id.clone() }.into())?
            .into_unit()
    }

    /// Delete every record of `model` matching `filter`, returning how many were deleted.
    pub fn delete_by_query(&self, model: &str, filter: Filter) -> Result<u64> {
        check_fields(self.registry.model(model)?, &filter, &[])?;
        self.collection(model)?
            .exec(DeleteByQuery { filter }.into())?
            .into_count()
    }

    pub fn get_model<M: Model>(&self, id: Id) -> Result<M> {
        self.get(M::NAME, id).map(M::from_record)
    }

    pub fn create_model<M: Model>(&self) -> Result<M> {
        self.create(M::NAME).map(M::from_record)
    }

    pub fn query<M: Model>(&self, filter: Filter, fields: &[&str]) -> Result<Vec<M>> {
        let records = self.get_by_query(M::NAME, filter, fields)?;
        Ok(records.into_iter().map(M::from_record).collect())
    }

    pub fn query_one<M: Model>(&self, filter: Filter, fields: &[&str]) -> Result<Option<M>> {
        Ok(self
            .get_one_by_query(M::NAME, filter, fields)?
            .map(M::from_record))
    }
}

fn check_fields(schema: &schema::Model, filter: &Filter, fields: &[&str]) -> Result<()> {
    for field in fields.iter().copied().chain(filter.fields()) {
        if !schema.has_field(field) {
            return Err(Error::unknown_field(&schema.name, field));
        }
    }
    Ok(())
}
