use std::io;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::value::Value;

/// A record shape that can live in a [`RecordStore`](super::RecordStore).
///
/// Each store holds exactly one concrete record type. The key returned by
/// [`Entry::key`] is unique within a store.
pub trait Entry: Clone + Serialize + DeserializeOwned {
  /// Field-level update. Unset fields keep their current values.
  type Patch;

  /// Human-readable record kind used in messages (e.g. `"product"`).
  const KIND: &'static str;

  /// Field names in declaration order, key first.
  const FIELDS: &'static [&'static str];

  fn key(&self) -> &str;

  /// Returns the scalar value of `name`, or `None` for unknown fields.
  fn field(&self, name: &str) -> Option<Value>;

  fn apply(&mut self, patch: Self::Patch);

  /// Whether the record may currently be removed from its store.
  fn removable(&self) -> bool {
    true
  }
}

/// A record carrying a stock quantity.
pub trait Stocked: Entry {
  fn quantity(&self) -> u32;
  fn set_quantity(&mut self, quantity: u32);
}

/// Top-level shape of a persisted store file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
  /// A JSON array of record objects.
  Sequence,
  /// A JSON object mapping each key to its record object.
  Keyed,
}

/// What happened when a store was loaded.
#[derive(Debug)]
pub enum LoadOutcome {
  /// The file existed and was parsed.
  Loaded { count: usize },
  /// No file existed; an empty store was written out.
  Created,
  /// The file could not be parsed and was replaced by an empty store.
  Recovered { reason: StoreError },
  /// The file exists but could not be read; it was left untouched.
  Unreadable { reason: StoreError },
}

impl LoadOutcome {
  pub fn is_recovered(&self) -> bool {
    matches!(self, LoadOutcome::Recovered { .. })
  }
}

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("A {kind} with key '{key}' already exists")]
  Duplicate { kind: &'static str, key: String },

  #[error("No {kind} with key '{key}'")]
  NotFound { kind: &'static str, key: String },

  #[error("The {kind} '{key}' is checked out and cannot be removed")]
  CheckedOut { kind: &'static str, key: String },

  #[error("Insufficient quantity for '{key}': {available} available, {requested} requested")]
  InsufficientQuantity { key: String, available: u32, requested: u32 },

  #[error("Invalid {field}: {reason}")]
  Invalid { field: &'static str, reason: String },

  #[error("Member '{id}' still holds {count} book(s)")]
  HasLoans { id: String, count: usize },

  #[error("Book '{isbn}' is already on loan")]
  Unavailable { isbn: String },

  #[error("Member '{member}' does not hold book '{isbn}'")]
  NotLoaned { isbn: String, member: String },

  #[error("Failed to create data directory: {0}")]
  CreateDir(#[source] io::Error),

  #[error("Failed to read store file: {0}")]
  Read(#[source] io::Error),

  #[error("Failed to parse store file: {0}")]
  Parse(#[source] serde_json::Error),

  #[error("Store file is inconsistent: {0}")]
  Corrupt(String),

  #[error("Failed to serialize store: {0}")]
  Serialize(#[source] serde_json::Error),

  #[error("Failed to write store file: {0}")]
  Write(#[source] io::Error),
}

impl StoreError {
  /// Returns true for rule violations that left the store unchanged.
  pub fn is_validation(&self) -> bool {
    matches!(
      self,
      StoreError::Duplicate { .. }
        | StoreError::NotFound { .. }
        | StoreError::CheckedOut { .. }
        | StoreError::InsufficientQuantity { .. }
        | StoreError::Invalid { .. }
        | StoreError::HasLoans { .. }
        | StoreError::Unavailable { .. }
        | StoreError::NotLoaned { .. }
    )
  }

  pub(crate) fn not_found<E: Entry>(key: &str) -> Self {
    StoreError::NotFound {
      kind: E::KIND,
      key: key.to_string(),
    }
  }
}
