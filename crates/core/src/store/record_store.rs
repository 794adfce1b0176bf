use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::debug;

use crate::entities::{EntityId, EntityType};
use crate::errors::{Error, Result, StoreError};
use crate::events::{EntityChange, EntityChangeSink, NoOpEntityChangeSink};

/// A value that can be kept in a [`RecordStore`].
pub trait Record: Clone + Send + Sync {
    /// The entity type reported for changes to this record kind.
    const ENTITY_TYPE: EntityType;

    fn id(&self) -> EntityId;
}

struct StoreState<T> {
    live: Vec<T>,
    trash: Vec<T>,
}

/// In-memory, last-write-wins store for one kind of record.
///
/// Deleted records move to a trash list from which they can be restored.
/// Every successful mutation is reported to the event sink after the store
/// lock is released, so listeners may read the store while handling it.
pub struct RecordStore<T: Record> {
    state: RwLock<StoreState<T>>,
    event_sink: Arc<dyn EntityChangeSink>,
}

impl<T: Record> Default for RecordStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> RecordStore<T> {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState {
                live: Vec::new(),
                trash: Vec::new(),
            }),
            event_sink: Arc::new(NoOpEntityChangeSink),
        }
    }

    /// Sets the entity change sink for this store.
    pub fn with_event_sink(mut self, event_sink: Arc<dyn EntityChangeSink>) -> Self {
        self.event_sink = event_sink;
        self
    }

    /// Creates a store pre-populated with `records`, without emitting changes.
    pub fn with_records(self, records: impl IntoIterator<Item = T>) -> Result<Self> {
        {
            let mut state = self.write()?;
            for record in records {
                let id = record.id();
                if position(&state.live, &id).is_some() {
                    return Err(StoreError::already_exists(T::ENTITY_TYPE, id).into());
                }
                state.live.push(record);
            }
        }
        Ok(self)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreState<T>>> {
        self.state
            .read()
            .map_err(|e| Error::Unexpected(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState<T>>> {
        self.state
            .write()
            .map_err(|e| Error::Unexpected(e.to_string()))
    }

    pub fn add(&self, record: T) -> Result<T> {
        let id = record.id();
        {
            let mut state = self.write()?;
            if position(&state.live, &id).is_some() || position(&state.trash, &id).is_some() {
                return Err(StoreError::already_exists(T::ENTITY_TYPE, id).into());
            }
            state.live.push(record.clone());
        }

        debug!("Added {} '{}'", T::ENTITY_TYPE, id);
        self.event_sink.emit(EntityChange::added(T::ENTITY_TYPE, id));
        Ok(record)
    }

    pub fn update(&self, record: T) -> Result<T> {
        let id = record.id();
        {
            let mut state = self.write()?;
            let index = position(&state.live, &id)
                .ok_or_else(|| StoreError::not_found(T::ENTITY_TYPE, id.clone()))?;
            state.live[index] = record.clone();
        }

        debug!("Updated {} '{}'", T::ENTITY_TYPE, id);
        self.event_sink
            .emit(EntityChange::updated(T::ENTITY_TYPE, id));
        Ok(record)
    }

    /// Moves a live record to the trash and returns it.
    pub fn delete(&self, id: &EntityId) -> Result<T> {
        let removed = {
            let mut state = self.write()?;
            let index = position(&state.live, id)
                .ok_or_else(|| StoreError::not_found(T::ENTITY_TYPE, id.clone()))?;
            let removed = state.live.remove(index);
            state.trash.push(removed.clone());
            removed
        };

        debug!("Deleted {} '{}'", T::ENTITY_TYPE, id);
        self.event_sink
            .emit(EntityChange::deleted(T::ENTITY_TYPE, id.clone()));
        Ok(removed)
    }

    /// Moves a trashed record back to the live list and returns it.
    pub fn restore(&self, id: &EntityId) -> Result<T> {
        let restored = {
            let mut state = self.write()?;
            match position(&state.trash, id) {
                Some(index) => {
                    let restored = state.trash.remove(index);
                    state.live.push(restored.clone());
                    restored
                }
                None if position(&state.live, id).is_some() => {
                    return Err(StoreError::not_deleted(T::ENTITY_TYPE, id.clone()).into());
                }
                None => return Err(StoreError::not_found(T::ENTITY_TYPE, id.clone()).into()),
            }
        };

        debug!("Restored {} '{}'", T::ENTITY_TYPE, id);
        self.event_sink
            .emit(EntityChange::restored(T::ENTITY_TYPE, id.clone()));
        Ok(restored)
    }

    /// Returns a live record by id.
    pub fn get(&self, id: &EntityId) -> Result<Option<T>> {
        let state = self.read()?;
        Ok(position(&state.live, id).map(|index| state.live[index].clone()))
    }

    /// Lists live records in insertion order (restored records go last).
    pub fn list(&self) -> Result<Vec<T>> {
        Ok(self.read()?.live.clone())
    }

    /// Lists records currently in the trash, oldest deletion first.
    pub fn list_deleted(&self) -> Result<Vec<T>> {
        Ok(self.read()?.trash.clone())
    }
}

fn position<T: Record>(records: &[T], id: &EntityId) -> Option<usize> {
    records.iter().position(|record| &record.id() == id)
}
