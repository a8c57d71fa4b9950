//! CLI output formatting utilities.
//!
//! Provides consistent formatting for terminal output including colored status
//! messages, record rows, and money amounts.

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;

use tally_lib::store::Entry;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
}

/// Formats a money amount with two decimals.
pub fn format_amount(amount: f64) -> String {
  format!("{:.2}", amount)
}

/// Formats a record as `field: value` pairs in declaration order.
pub fn format_record<E: Entry>(record: &E) -> String {
  E::FIELDS
    .iter()
    .filter_map(|name| record.field(name).map(|value| format!("{}: {}", name, value)))
    .collect::<Vec<_>>()
    .join(", ")
}

/// Prints records one per line, or as a JSON array.
pub fn print_records<'a, E>(records: impl IntoIterator<Item = &'a E>, empty: &str, output: OutputFormat) -> anyhow::Result<()>
where
  E: Entry + 'a,
{
  let records: Vec<&E> = records.into_iter().collect();

  if output.is_json() {
    return print_json(&records);
  }

  if records.is_empty() {
    print_info(empty);
    return Ok(());
  }

  for record in &records {
    println!("  {} {}", symbols::INFO, format_record(*record));
  }
  Ok(())
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}
