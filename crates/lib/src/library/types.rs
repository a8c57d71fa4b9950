use serde::{Deserialize, Serialize};

use crate::store::{Entry, Value};

/// A catalogued book, keyed by `isbn`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
  pub isbn: String,
  pub title: String,
  pub author: String,
  pub category: String,
  /// False while the book is on loan.
  pub available: bool,
}

impl Book {
  pub fn new(isbn: &str, title: &str, author: &str, category: &str) -> Self {
    Self {
      isbn: isbn.to_string(),
      title: title.to_string(),
      author: author.to_string(),
      category: category.to_string(),
      available: true,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookPatch {
  pub title: Option<String>,
  pub author: Option<String>,
  pub category: Option<String>,
}

impl Entry for Book {
  type Patch = BookPatch;

  const KIND: &'static str = "book";
  const FIELDS: &'static [&'static str] = &["isbn", "title", "author", "category", "available"];

  fn key(&self) -> &str {
    &self.isbn
  }

  fn field(&self, name: &str) -> Option<Value> {
    match name {
      "isbn" => Some(self.isbn.as_str().into()),
      "title" => Some(self.title.as_str().into()),
      "author" => Some(self.author.as_str().into()),
      "category" => Some(self.category.as_str().into()),
      "available" => Some(self.available.into()),
      _ => None,
    }
  }

  fn apply(&mut self, patch: BookPatch) {
    if let Some(title) = patch.title {
      self.title = title;
    }
    if let Some(author) = patch.author {
      self.author = author;
    }
    if let Some(category) = patch.category {
      self.category = category;
    }
  }

  fn removable(&self) -> bool {
    self.available
  }
}

/// A registered library member, keyed by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
  pub id: String,
  pub name: String,
  /// ISBNs currently lent to this member, in lending order.
  #[serde(default)]
  pub loans: Vec<String>,
}

impl Member {
  pub fn new(id: &str, name: &str) -> Self {
    Self {
      id: id.to_string(),
      name: name.to_string(),
      loans: Vec::new(),
    }
  }

  pub fn holds(&self, isbn: &str) -> bool {
    self.loans.iter().any(|l| l == isbn)
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberPatch {
  pub name: Option<String>,
}

impl Entry for Member {
  type Patch = MemberPatch;

  const KIND: &'static str = "member";
  const FIELDS: &'static [&'static str] = &["id", "name", "loans"];

  fn key(&self) -> &str {
    &self.id
  }

  fn field(&self, name: &str) -> Option<Value> {
    match name {
      "id" => Some(self.id.as_str().into()),
      "name" => Some(self.name.as_str().into()),
      "loans" => Some(self.loans.len().into()),
      _ => None,
    }
  }

  fn apply(&mut self, patch: MemberPatch) {
    if let Some(name) = patch.name {
      self.name = name;
    }
  }

  fn removable(&self) -> bool {
    self.loans.is_empty()
  }
}
