//! Info command implementation.
//!
//! Shows where tally keeps its data and how many records each file holds.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use tally_lib::consts::{BOOKS_FILENAME, INVENTORY_FILENAME, MEMBERS_FILENAME};
use tally_lib::inventory::Product;
use tally_lib::library::{Book, Member};
use tally_lib::store::{Entry, Layout, RecordStore};

use crate::output::{OutputFormat, print_info, print_json, print_stat};

#[derive(Debug, Serialize)]
struct FileInfo {
  name: &'static str,
  path: String,
  records: Option<usize>,
}

pub fn cmd_info(data_dir: &Path, output: OutputFormat) -> Result<()> {
  let files = vec![
    inspect::<Product>(data_dir, INVENTORY_FILENAME, Layout::Sequence),
    inspect::<Book>(data_dir, BOOKS_FILENAME, Layout::Keyed),
    inspect::<Member>(data_dir, MEMBERS_FILENAME, Layout::Keyed),
  ];

  if output.is_json() {
    return print_json(&serde_json::json!({
      "data_dir": data_dir.display().to_string(),
      "files": files,
    }));
  }

  print_info(&format!("Data directory: {}", data_dir.display()));
  for file in &files {
    let records = match file.records {
      Some(count) => format!("{} record(s)", count),
      None => "missing or unreadable".to_string(),
    };
    print_stat(file.name, &format!("{} ({})", file.path, records));
  }
  Ok(())
}

/// Count records without creating or repairing anything.
fn inspect<E: Entry>(dir: &Path, file_name: &'static str, layout: Layout) -> FileInfo {
  let path = dir.join(file_name);
  let records = match RecordStore::<E>::inspect(path.clone(), layout) {
    Ok(store) => store.map(|store| store.len()),
    Err(e) => {
      debug!(path = %path.display(), error = %e, "could not inspect store file");
      None
    }
  };

  FileInfo {
    name: file_name,
    path: path.display().to_string(),
    records,
  }
}
