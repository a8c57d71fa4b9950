//! On-disk encoding of record stores.
//!
//! A store file is either a JSON array of records ([`Layout::Sequence`]) or a
//! JSON object from key to record ([`Layout::Keyed`]). Writes go through a
//! sibling `.tmp` file and a rename so a failed write never truncates the
//! previous contents.

use std::collections::{BTreeMap, HashSet};
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};

use super::types::{Entry, Layout, StoreError};

/// Reads a store file. Returns `Ok(None)` if it does not exist.
pub(crate) fn read_file(path: &Path) -> Result<Option<String>, StoreError> {
  match fs::read_to_string(path) {
    Ok(content) => Ok(Some(content)),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
    Err(e) => Err(StoreError::Read(e)),
  }
}

/// Decodes records from file content in the given layout.
pub(crate) fn decode<E: Entry>(content: &str, layout: Layout) -> Result<Vec<E>, StoreError> {
  match layout {
    Layout::Sequence => {
      let records: Vec<E> = serde_json::from_str(content).map_err(StoreError::Parse)?;
      let mut seen = HashSet::new();
      for record in &records {
        if !seen.insert(record.key()) {
          return Err(StoreError::Corrupt(format!("duplicate key '{}'", record.key())));
        }
      }
      Ok(records)
    }
    Layout::Keyed => {
      let KeyedEntries(entries) = serde_json::from_str::<KeyedEntries<E>>(content).map_err(StoreError::Parse)?;
      let mut seen = HashSet::new();
      let mut records = Vec::with_capacity(entries.len());
      for (key, record) in entries {
        if !seen.insert(key.clone()) {
          return Err(StoreError::Corrupt(format!("duplicate key '{}'", key)));
        }
        if record.key() != key {
          return Err(StoreError::Corrupt(format!(
            "entry '{}' holds a record keyed '{}'",
            key,
            record.key()
          )));
        }
        records.push(record);
      }
      Ok(records)
    }
  }
}

/// Object entries in document order, duplicates included.
struct KeyedEntries<E>(Vec<(String, E)>);

impl<'de, E: Entry> Deserialize<'de> for KeyedEntries<E> {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    deserializer.deserialize_map(KeyedVisitor(PhantomData))
  }
}

struct KeyedVisitor<E>(PhantomData<E>);

impl<'de, E: Entry> Visitor<'de> for KeyedVisitor<E> {
  type Value = KeyedEntries<E>;

  fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("an object mapping keys to records")
  }

  fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
    let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
    while let Some((key, record)) = map.next_entry::<String, E>()? {
      entries.push((key, record));
    }
    Ok(KeyedEntries(entries))
  }
}

/// Encodes records as pretty-printed JSON in the given layout.
pub(crate) fn encode<E: Entry>(records: &[E], layout: Layout) -> Result<String, StoreError> {
  match layout {
    Layout::Sequence => serde_json::to_string_pretty(records).map_err(StoreError::Serialize),
    Layout::Keyed => {
      let map: BTreeMap<&str, &E> = records.iter().map(|r| (r.key(), r)).collect();
      serde_json::to_string_pretty(&map).map_err(StoreError::Serialize)
    }
  }
}

fn temp_path(path: &Path) -> PathBuf {
  let mut name = OsString::from(path.as_os_str());
  name.push(".tmp");
  PathBuf::from(name)
}

/// Writes `content` to `path` atomically (write to temp, then rename).
pub(crate) fn write_atomic(path: &Path, content: &str) -> Result<(), StoreError> {
  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
  {
    fs::create_dir_all(parent).map_err(StoreError::CreateDir)?;
  }

  let temp = temp_path(path);
  fs::write(&temp, content).map_err(StoreError::Write)?;
  if let Err(e) = fs::rename(&temp, path) {
    let _ = fs::remove_file(&temp);
    return Err(StoreError::Write(e));
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::inventory::Product;
  use crate::library::Book;
  use tempfile::TempDir;

  fn product(id: &str) -> Product {
    Product::new(id, "Widget", 1, 1.0)
  }

  #[test]
  fn read_missing_file_is_none() {
    let temp = TempDir::new().unwrap();
    assert!(read_file(&temp.path().join("absent.json")).unwrap().is_none());
  }

  #[test]
  fn sequence_layout_writes_array() {
    let content = encode(&[product("A1"), product("B2")], Layout::Sequence).unwrap();
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert!(value.is_array());
    assert_eq!(value[0]["id"], "A1");
    assert_eq!(value[1]["id"], "B2");
  }

  #[test]
  fn keyed_layout_writes_object_by_key() {
    let book = Book::new("978", "Title", "Author", "Novel");
    let content = encode(&[book], Layout::Keyed).unwrap();
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(value["978"]["title"], "Title");
    assert_eq!(value["978"]["available"], true);
  }

  #[test]
  fn output_is_indented() {
    let content = encode(&[product("A1")], Layout::Sequence).unwrap();
    assert!(content.contains("\n  "));
  }

  #[test]
  fn sequence_duplicate_key_is_corrupt() {
    let content = encode(&[product("A1"), product("A1")], Layout::Sequence).unwrap();
    let result = decode::<Product>(&content, Layout::Sequence);
    assert!(matches!(result, Err(StoreError::Corrupt(_))));
  }

  #[test]
  fn keyed_mismatched_key_is_corrupt() {
    let content = r#"{"111": {"isbn": "222", "title": "T", "author": "A", "category": "C", "available": true}}"#;
    let result = decode::<Book>(content, Layout::Keyed);
    assert!(matches!(result, Err(StoreError::Corrupt(_))));
  }

  #[test]
  fn keyed_duplicate_key_is_corrupt() {
    let content = r#"{
      "U1": {"id": "U1", "name": "Ana", "loans": []},
      "U1": {"id": "U1", "name": "Bob", "loans": []}
    }"#;
    let result = decode::<crate::library::Member>(content, Layout::Keyed);
    assert!(matches!(result, Err(StoreError::Corrupt(ref reason)) if reason.contains("'U1'")));
  }

  #[test]
  fn keyed_decode_keeps_document_order() {
    let content = r#"{
      "B": {"isbn": "B", "title": "T", "author": "A", "category": "C", "available": true},
      "A": {"isbn": "A", "title": "T", "author": "A", "category": "C", "available": true}
    }"#;
    let books = decode::<Book>(content, Layout::Keyed).unwrap();
    let keys: Vec<&str> = books.iter().map(|b| b.key()).collect();
    assert_eq!(keys, ["B", "A"]);
  }

  #[test]
  fn wrong_layout_is_parse_error() {
    let content = encode(&[product("A1")], Layout::Sequence).unwrap();
    let result = decode::<Product>(&content, Layout::Keyed);
    assert!(matches!(result, Err(StoreError::Parse(_))));
  }

  #[test]
  fn write_atomic_creates_parent_and_leaves_no_temp() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("store.json");

    write_atomic(&path, "[]").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    assert!(!temp_path(&path).exists());
  }

  #[test]
  fn write_atomic_replaces_contents() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.json");

    write_atomic(&path, "[1]").unwrap();
    write_atomic(&path, "[2]").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "[2]");
  }

  #[test]
  fn failed_write_keeps_previous_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.json");
    write_atomic(&path, "[1]").unwrap();

    // A directory squatting on the temp path makes the write fail.
    fs::create_dir(temp_path(&path)).unwrap();
    let result = write_atomic(&path, "[2]");

    assert!(matches!(result, Err(StoreError::Write(_))));
    assert_eq!(fs::read_to_string(&path).unwrap(), "[1]");
  }
}
