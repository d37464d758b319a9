use crate::{
    driver::operation::{
        ArrayAppend, ArrayContains, ArrayElement, ArrayGet, ArraySize, GetFields, UpdateFields,
    },
    stmt::{Fields, Id, Primitive, Value},
    Collection, Error, Result,
};

use std::{collections::BTreeMap, sync::Arc};

/// A lazy cache over one list-valued field of a record.
///
/// Elements are fetched one at a time until something needs the whole list, at which point
/// the list is loaded once and every pending edit is replayed over it. Edits are kept as an
/// ordered event log. A log holding only appends is committed with a single append operation;
/// anything else overwrites the field with the materialized list.
#[derive(Debug)]
pub struct LazyList<T> {
    collection: Arc<dyn Collection>,

    id: Id,

    field: String,

    /// Elements fetched individually, by index
    loaded: BTreeMap<usize, T>,

    /// The whole list with every pending event applied
    whole: Option<Vec<T>>,

    events: Vec<ListEvent<T>>,

    /// Forces the next commit to overwrite the field
    cleared: bool,
}

/// A pending edit of a [`LazyList`].
#[derive(Debug, Clone, PartialEq)]
pub enum ListEvent<T> {
    /// Replace the element at an index
    Set(usize, T),

    /// Append an element
    Add(T),

    /// Remove the first element equal to the value
    Remove(T),

    /// Insert an element before an index
    Insert(usize, T),

    /// Remove the element at an index
    RemoveAt(usize),
}

impl<T: Primitive> LazyList<T> {
    pub(crate) fn new(collection: Arc<dyn Collection>, id: Id, field: String) -> LazyList<T> {
        LazyList {
            collection,
            id,
            field,
            loaded: BTreeMap::new(),
            whole: None,
            events: vec![],
            cleared: false,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn events(&self) -> &[ListEvent<T>] {
        &self.events
    }

    pub fn is_materialized(&self) -> bool {
        self.whole.is_some()
    }

    pub fn get(&mut self, index: usize) -> Result<T> {
        if self.whole.is_none() && !self.sparse_reads_valid() {
            self.materialize()?;
        }

        if let Some(whole) = &self.whole {
            return whole
                .get(index)
                .cloned()
                .ok_or_else(|| Error::index_out_of_bounds(index, whole.len()));
        }

        if let Some(item) = self.loaded.get(&index) {
            return Ok(item.clone());
        }

        tracing::trace!(id = %self.id, field = %self.field, index, "fetching list element");

        let value = self
            .collection
            .exec(
                ArrayElement {
                    id: self.id.clone(),
                    field: self.field.clone(),
                    index,
                }
                .into(),
            )?
            .into_value()?;

        let item = T::load(value)?;
        self.loaded.insert(index, item.clone());
        Ok(item)
    }

    /// Replace the element at `index`.
    ///
    /// Before the whole list is loaded the index is not checked against the stored length.
    /// An out-of-range write is then visible to [`LazyList::get`], but every
    /// [`LazyList::commit`] fails with an index-out-of-bounds error and keeps the pending
    /// edits.
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        if let Some(whole) = &mut self.whole {
            apply(whole, &ListEvent::Set(index, value.clone()))?;
        } else {
            self.loaded.insert(index, value.clone());
        }

        self.events.push(ListEvent::Set(index, value));
        Ok(())
    }

    pub fn add(&mut self, value: T) {
        if let Some(whole) = &mut self.whole {
            whole.push(value.clone());
        }

        self.events.push(ListEvent::Add(value));
    }

    /// Record the removal of the first element equal to `value`. Always returns `true`; the
    /// store is not consulted.
    pub fn remove(&mut self, value: T) -> bool {
        if let Some(whole) = &mut self.whole {
            if let Some(pos) = whole.iter().position(|item| *item == value) {
                whole.remove(pos);
            }
        }

        self.events.push(ListEvent::Remove(value));
        true
    }

    pub fn insert(&mut self, index: usize, value: T) -> Result<()> {
        let whole = self.whole_mut()?;
        apply(whole, &ListEvent::Insert(index, value.clone()))?;
        self.events.push(ListEvent::Insert(index, value));
        Ok(())
    }

    pub fn remove_at(&mut self, index: usize) -> Result<T> {
        let whole = self.whole_mut()?;
        let removed = whole
            .get(index)
            .cloned()
            .ok_or_else(|| Error::index_out_of_bounds(index, whole.len()))?;
        whole.remove(index);
        self.events.push(ListEvent::RemoveAt(index));
        Ok(removed)
    }

    /// Drop every cached element and pending edit, leaving an empty list. The next commit
    /// overwrites the field with whatever the list holds by then.
    pub fn clear(&mut self) {
        self.loaded.clear();
        self.events.clear();
        self.whole = Some(vec![]);
        self.cleared = true;
    }

    /// Number of elements, counting pending appends and removals, without loading the list.
    pub fn count(&self) -> Result<usize> {
        if let Some(whole) = &self.whole {
            return Ok(whole.len());
        }

        let stored = self
            .collection
            .exec(
                ArraySize {
                    id: self.id.clone(),
                    field: self.field.clone(),
                }
                .into(),
            )?
            .into_count()?;

        let Ok(mut count) = usize::try_from(stored) else {
            let msg = format!("list size {stored} does not fit usize");
            return Err(Error::invalid_result(msg));
        };

        for event in &self.events {
            match event {
                ListEvent::Add(_) | ListEvent::Insert(..) => count += 1,
                ListEvent::Remove(_) | ListEvent::RemoveAt(_) => count = count.saturating_sub(1),
                ListEvent::Set(..) => {}
            }
        }

        Ok(count)
    }

    /// Asks the store whether the committed list holds `value`. Pending edits are not
    /// considered.
    pub fn contains(&self, value: &T) -> Result<bool> {
        self.collection
            .exec(
                ArrayContains {
                    id: self.id.clone(),
                    field: self.field.clone(),
                    item: value.clone().into_value(),
                }
                .into(),
            )?
            .into_bool()
    }

    pub fn index_of(&mut self, value: &T) -> Result<Option<usize>> {
        Ok(self.materialize()?.iter().position(|item| item == value))
    }

    pub fn iter(&mut self) -> Result<std::slice::Iter<'_, T>> {
        Ok(self.materialize()?.iter())
    }

    pub fn to_vec(&mut self) -> Result<Vec<T>> {
        Ok(self.materialize()?.to_vec())
    }

    /// Load the whole list once and replay pending edits over it.
    pub fn materialize(&mut self) -> Result<&[T]> {
        Ok(self.whole_mut()?.as_slice())
    }

    /// Fetch the elements at `indexes` with one store call. Elements edited locally keep
    /// their edited value.
    pub fn preload(&mut self, indexes: &[usize]) -> Result<()> {
        if indexes.is_empty() || self.whole.is_some() {
            return Ok(());
        }

        tracing::debug!(id = %self.id, field = %self.field, ?indexes, "preloading list elements");

        let values = self
            .collection
            .exec(
                ArrayGet {
                    id: self.id.clone(),
                    field: self.field.clone(),
                    indexes: indexes.to_vec(),
                }
                .into(),
            )?
            .into_values()?;

        if values.len() != indexes.len() {
            return Err(Error::invalid_result(format!(
                "requested {} list elements, got {}",
                indexes.len(),
                values.len()
            )));
        }

        for (index, value) in indexes.iter().zip(values) {
            let item = T::load(value)?;
            self.loaded.entry(*index).or_insert(item);
        }

        Ok(())
    }

    /// Returns `true` if the pending edits are all appends.
    pub fn can_commit_lazily(&self) -> bool {
        !self.cleared
            && self
                .events
                .iter()
                .all(|event| matches!(event, ListEvent::Add(_)))
    }

    pub fn has_pending_writes(&self) -> bool {
        self.cleared || !self.events.is_empty()
    }

    /// Write pending edits back: a single append when only appends are pending, otherwise a
    /// single overwrite of the field.
    pub fn commit(&mut self) -> Result<()> {
        if !self.has_pending_writes() {
            return Ok(());
        }

        let op = if self.can_commit_lazily() {
            let items: Vec<Value> = self
                .events
                .iter()
                .filter_map(|event| match event {
                    ListEvent::Add(item) => Some(item.clone().into_value()),
                    _ => None,
                })
                .collect();

            tracing::debug!(id = %self.id, field = %self.field, items = items.len(), "appending to list");

            ArrayAppend {
                id: self.id.clone(),
                field: self.field.clone(),
                items,
            }
            .into()
        } else {
            let list: Vec<Value> = self
                .materialize()?
                .iter()
                .cloned()
                .map(Primitive::into_value)
                .collect();

            tracing::debug!(id = %self.id, field = %self.field, len = list.len(), "overwriting list");

            let mut fields = Fields::new();
            fields.insert(self.field.clone(), Value::List(list));

            UpdateFields {
                id: self.id.clone(),
                fields,
            }
            .into()
        };

        self.collection.exec(op)?.into_unit()?;

        self.events.clear();
        self.cleared = false;
        Ok(())
    }

    fn sparse_reads_valid(&self) -> bool {
        !self.cleared
            && self
                .events
                .iter()
                .all(|event| matches!(event, ListEvent::Set(..)))
    }

    fn whole_mut(&mut self) -> Result<&mut Vec<T>> {
        if self.whole.is_none() {
            let list = self.load_whole()?;
            self.loaded.clear();
            self.whole = Some(list);
        }

        Ok(self.whole.get_or_insert_with(Vec::new))
    }

    fn load_whole(&self) -> Result<Vec<T>> {
        tracing::debug!(id = %self.id, field = %self.field, "loading whole list");

        let mut fields = self
            .collection
            .exec(
                GetFields {
                    id: self.id.clone(),
                    fields: vec![self.field.clone()],
                }
                .into(),
            )?
            .into_fields()?;

        let mut list = match fields.swap_remove(&self.field) {
            None => {
                return Err(Error::invalid_result(format!(
                    "store omitted list field `{}` for id {}",
                    self.field, self.id
                )));
            }
            Some(Value::Null) => vec![],
            Some(value) => Vec::<T>::load(value)?,
        };

        for event in &self.events {
            apply(&mut list, event)?;
        }

        Ok(list)
    }
}

fn apply<T: Primitive>(list: &mut Vec<T>, event: &ListEvent<T>) -> Result<()> {
    match event {
        ListEvent::Set(index, value) => {
            let len = list.len();
            let slot = list
                .get_mut(*index)
                .ok_or_else(|| Error::index_out_of_bounds(*index, len))?;
            *slot = value.clone();
        }
        ListEvent::Add(value) => list.push(value.clone()),
        ListEvent::Remove(value) => {
            if let Some(pos) = list.iter().position(|item| item == value) {
                list.remove(pos);
            }
        }
        ListEvent::Insert(index, value) => {
            if *index > list.len() {
                return Err(Error::index_out_of_bounds(*index, list.len()));
            }
            list.insert(*index, value.clone());
        }
        ListEvent::RemoveAt(index) => {
            if *index >= list.len() {
                return Err(Error::index_out_of_bounds(*index, list.len()));
            }
            list.remove(*index);
        }
    }

    Ok(())
}
