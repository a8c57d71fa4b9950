//! Record store: uniquely-keyed records persisted by whole-file rewrite.
//!
//! Every successful mutation rewrites the store file before returning. If
//! that write fails the error is returned but the in-memory mutation is kept,
//! so the file lags behind memory until the next successful persist.

mod storage;
mod types;
mod value;

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

pub use types::{Entry, Layout, LoadOutcome, Stocked, StoreError};
pub use value::Value;

/// An in-memory collection of records of one shape, paired with its file.
#[derive(Debug, Clone)]
pub struct RecordStore<E> {
  path: PathBuf,
  layout: Layout,
  records: Vec<E>,
}

impl<E: Entry> RecordStore<E> {
  /// Create an empty store backed by `path`. Nothing is written.
  pub fn empty(path: PathBuf, layout: Layout) -> Self {
    Self {
      path,
      layout,
      records: Vec::new(),
    }
  }

  /// Load a store from `path`.
  ///
  /// - Missing file: start empty and write the empty store out.
  /// - Unparseable file: warn, start empty and overwrite the file.
  /// - Unreadable file: warn and start empty without touching the file.
  ///
  /// Never fails; problems are reported through the returned [`LoadOutcome`].
  pub fn load(path: PathBuf, layout: Layout) -> (Self, LoadOutcome) {
    let mut store = Self::empty(path, layout);

    let content = match storage::read_file(&store.path) {
      Ok(Some(content)) => content,
      Ok(None) => {
        debug!(path = %store.path.display(), kind = E::KIND, "store file missing, creating");
        store.persist_quietly();
        return (store, LoadOutcome::Created);
      }
      Err(reason) => {
        warn!(path = %store.path.display(), error = %reason, "store file unreadable");
        return (store, LoadOutcome::Unreadable { reason });
      }
    };

    match storage::decode::<E>(&content, layout) {
      Ok(records) => {
        let count = records.len();
        store.records = records;
        debug!(path = %store.path.display(), count, "loaded store");
        (store, LoadOutcome::Loaded { count })
      }
      Err(reason) => {
        warn!(
          path = %store.path.display(),
          error = %reason,
          "store file is corrupt, starting with an empty store"
        );
        store.persist_quietly();
        (store, LoadOutcome::Recovered { reason })
      }
    }
  }

  /// Read a store without creating, repairing or rewriting its file.
  ///
  /// Returns `Ok(None)` if the file does not exist.
  pub fn inspect(path: PathBuf, layout: Layout) -> Result<Option<Self>, StoreError> {
    let Some(content) = storage::read_file(&path)? else {
      return Ok(None);
    };
    let records = storage::decode::<E>(&content, layout)?;
    Ok(Some(Self { path, layout, records }))
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn layout(&self) -> Layout {
    self.layout
  }

  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  /// Records in store iteration order.
  pub fn iter(&self) -> impl Iterator<Item = &E> {
    self.records.iter()
  }

  pub fn get(&self, key: &str) -> Option<&E> {
    self.position(key).map(|i| &self.records[i])
  }

  pub fn contains(&self, key: &str) -> bool {
    self.position(key).is_some()
  }

  // Linear scan; stores are expected to stay small.
  fn position(&self, key: &str) -> Option<usize> {
    self.records.iter().position(|r| r.key() == key)
  }

  /// Add a record. Fails if its key is already present.
  pub fn insert(&mut self, record: E) -> Result<(), StoreError> {
    if self.contains(record.key()) {
      return Err(StoreError::Duplicate {
        kind: E::KIND,
        key: record.key().to_string(),
      });
    }

    info!(kind = E::KIND, key = %record.key(), "inserting record");
    self.records.push(record);
    self.persist()
  }

  /// Remove the record under `key` and return it.
  ///
  /// Fails if the key is absent or the record reports it is not removable.
  pub fn remove(&mut self, key: &str) -> Result<E, StoreError> {
    let index = self.position(key).ok_or_else(|| StoreError::not_found::<E>(key))?;
    if !self.records[index].removable() {
      return Err(StoreError::CheckedOut {
        kind: E::KIND,
        key: key.to_string(),
      });
    }

    info!(kind = E::KIND, key = %key, "removing record");
    let removed = self.records.remove(index);
    self.persist()?;
    Ok(removed)
  }

  /// Overwrite the fields set in `patch` on the record under `key`.
  pub fn update(&mut self, key: &str, patch: E::Patch) -> Result<&E, StoreError> {
    let index = self.position(key).ok_or_else(|| StoreError::not_found::<E>(key))?;
    self.records[index].apply(patch);

    info!(kind = E::KIND, key = %key, "updated record");
    self.persist()?;
    Ok(&self.records[index])
  }

  /// Mutate the record under `key` in place, then persist.
  ///
  /// The closure must not change the record's key.
  pub(crate) fn modify<R>(&mut self, key: &str, f: impl FnOnce(&mut E) -> R) -> Result<R, StoreError> {
    let result = self.edit(key, f)?;
    self.persist()?;
    Ok(result)
  }

  /// Mutate the record under `key` in place without persisting.
  ///
  /// Used when one change spans several stores: edit them all, then persist
  /// each. The closure must not change the record's key.
  pub(crate) fn edit<R>(&mut self, key: &str, f: impl FnOnce(&mut E) -> R) -> Result<R, StoreError> {
    let index = self.position(key).ok_or_else(|| StoreError::not_found::<E>(key))?;
    let result = f(&mut self.records[index]);
    debug_assert_eq!(self.records[index].key(), key);

    info!(kind = E::KIND, key = %key, "modified record");
    Ok(result)
  }

  /// Mutable access to every record without persisting.
  ///
  /// Callers must not change keys and are responsible for calling
  /// [`RecordStore::persist`] afterwards.
  pub(crate) fn records_mut(&mut self) -> impl Iterator<Item = &mut E> {
    self.records.iter_mut()
  }

  /// Records whose text `field` contains `needle`, ignoring case.
  ///
  /// An empty needle matches every record that has the field as text.
  pub fn find_by_substring(&self, field: &str, needle: &str) -> Vec<&E> {
    let needle = needle.to_lowercase();
    self.filter_text(field, |text| text.to_lowercase().contains(&needle))
  }

  /// Records whose text `field` equals `needle`, ignoring case.
  pub fn find_exact(&self, field: &str, needle: &str) -> Vec<&E> {
    let needle = needle.to_lowercase();
    self.filter_text(field, |text| text.to_lowercase() == needle)
  }

  fn filter_text(&self, field: &str, matches: impl Fn(&str) -> bool) -> Vec<&E> {
    self
      .records
      .iter()
      .filter(|r| r.field(field).as_ref().and_then(Value::as_str).is_some_and(&matches))
      .collect()
  }

  /// Rewrite the whole store file.
  pub fn persist(&self) -> Result<(), StoreError> {
    let content = storage::encode(&self.records, self.layout)?;
    storage::write_atomic(&self.path, &content)?;
    debug!(path = %self.path.display(), count = self.records.len(), "persisted store");
    Ok(())
  }

  fn persist_quietly(&self) {
    if let Err(e) = self.persist() {
      warn!(path = %self.path.display(), error = %e, "failed to write store file");
    }
  }
}

impl<E: Stocked> RecordStore<E> {
  /// Take `delta` units out of stock, returning `delta * unit_price`.
  ///
  /// Fails without mutating if the key is absent, fewer than `delta` units
  /// are in stock, or the total is not a finite number.
  pub fn apply_quantity_delta(&mut self, key: &str, delta: u32, unit_price: f64) -> Result<f64, StoreError> {
    let record = self.get(key).ok_or_else(|| StoreError::not_found::<E>(key))?;
    let available = record.quantity();
    if available < delta {
      return Err(StoreError::InsufficientQuantity {
        key: key.to_string(),
        available,
        requested: delta,
      });
    }

    let total = f64::from(delta) * unit_price;
    if !total.is_finite() {
      return Err(StoreError::Invalid {
        field: "price",
        reason: format!("{} x {} is out of range", delta, unit_price),
      });
    }

    self.modify(key, |record| record.set_quantity(available - delta))?;
    Ok(total)
  }

  /// Put `quantity` units back into stock.
  pub fn restock(&mut self, key: &str, quantity: u32) -> Result<u32, StoreError> {
    let current = self.get(key).ok_or_else(|| StoreError::not_found::<E>(key))?.quantity();
    let updated = current.checked_add(quantity).ok_or_else(|| StoreError::Invalid {
      field: "quantity",
      reason: format!("{} + {} overflows", current, quantity),
    })?;

    self.modify(key, |record| record.set_quantity(updated))?;
    Ok(updated)
  }
}
