//! Library catalog: books, members, and the loans between them.
//!
//! Books persist to `books.json` and members to `members.json`, both as JSON
//! objects keyed by ISBN and member ID. A book's `available` flag is derived
//! from member loans whenever the library is opened.

mod types;

use std::collections::HashSet;
use std::path::Path;

use tracing::{info, warn};

use crate::consts::{BOOKS_FILENAME, MEMBERS_FILENAME};
use crate::store::{Layout, LoadOutcome, RecordStore, StoreError};

pub use types::{Book, BookPatch, Member, MemberPatch};

/// Load results for both library files.
#[derive(Debug)]
pub struct LibraryLoad {
  pub books: LoadOutcome,
  pub members: LoadOutcome,
}

#[derive(Debug)]
pub struct Library {
  books: RecordStore<Book>,
  members: RecordStore<Member>,
}

impl Library {
  /// Load both stores from `dir` and reconcile availability with loans.
  pub fn open(dir: &Path) -> (Self, LibraryLoad) {
    let (books, books_outcome) = RecordStore::load(dir.join(BOOKS_FILENAME), Layout::Keyed);
    let (members, members_outcome) = RecordStore::load(dir.join(MEMBERS_FILENAME), Layout::Keyed);

    let mut library = Self { books, members };
    // An unreadable file loads as empty; reconciling against it would drop real loans.
    let unreadable = |outcome: &LoadOutcome| matches!(outcome, LoadOutcome::Unreadable { .. });
    if unreadable(&books_outcome) || unreadable(&members_outcome) {
      warn!("skipping loan reconciliation, a library file could not be read");
    } else {
      library.reconcile();
    }

    (
      library,
      LibraryLoad {
        books: books_outcome,
        members: members_outcome,
      },
    )
  }

  /// Drop loans of unknown books and derive `available` from the remaining loans.
  fn reconcile(&mut self) {
    let known: HashSet<String> = self.books.iter().map(|b| b.isbn.clone()).collect();

    let mut members_changed = false;
    let mut lent = HashSet::new();
    for member in self.members.records_mut() {
      let before = member.loans.len();
      member.loans.retain(|isbn| known.contains(isbn));
      if member.loans.len() != before {
        warn!(member = %member.id, dropped = before - member.loans.len(), "dropping loans of unknown books");
        members_changed = true;
      }
      lent.extend(member.loans.iter().cloned());
    }

    let mut books_changed = false;
    for book in self.books.records_mut() {
      let available = !lent.contains(&book.isbn);
      if book.available != available {
        book.available = available;
        books_changed = true;
      }
    }

    if members_changed && let Err(e) = self.members.persist() {
      warn!(error = %e, "failed to persist reconciled members");
    }
    if books_changed && let Err(e) = self.books.persist() {
      warn!(error = %e, "failed to persist reconciled books");
    }
  }

  pub fn books(&self) -> impl Iterator<Item = &Book> {
    self.books.iter()
  }

  pub fn members(&self) -> impl Iterator<Item = &Member> {
    self.members.iter()
  }

  pub fn book(&self, isbn: &str) -> Option<&Book> {
    self.books.get(isbn)
  }

  pub fn member(&self, id: &str) -> Option<&Member> {
    self.members.get(id)
  }

  /// Catalogue a new book. It starts out available.
  pub fn add_book(&mut self, mut book: Book) -> Result<(), StoreError> {
    require_key("isbn", &book.isbn)?;
    book.available = true;
    self.books.insert(book)
  }

  /// Remove a book. Fails while it is on loan.
  pub fn remove_book(&mut self, isbn: &str) -> Result<Book, StoreError> {
    self.books.remove(isbn)
  }

  pub fn update_book(&mut self, isbn: &str, patch: BookPatch) -> Result<&Book, StoreError> {
    self.books.update(isbn, patch)
  }

  /// Register a new member with no loans.
  pub fn register_member(&mut self, mut member: Member) -> Result<(), StoreError> {
    require_key("id", &member.id)?;
    member.loans.clear();
    self.members.insert(member)
  }

  /// Remove a member. Fails while the member holds any book.
  pub fn deregister_member(&mut self, id: &str) -> Result<Member, StoreError> {
    let member = self.members.get(id).ok_or_else(|| StoreError::not_found::<Member>(id))?;
    if !member.loans.is_empty() {
      return Err(StoreError::HasLoans {
        id: id.to_string(),
        count: member.loans.len(),
      });
    }
    self.members.remove(id)
  }

  pub fn update_member(&mut self, id: &str, patch: MemberPatch) -> Result<&Member, StoreError> {
    self.members.update(id, patch)
  }

  /// Lend `isbn` to `member_id`.
  pub fn lend(&mut self, isbn: &str, member_id: &str) -> Result<(), StoreError> {
    let book = self.books.get(isbn).ok_or_else(|| StoreError::not_found::<Book>(isbn))?;
    if !self.members.contains(member_id) {
      return Err(StoreError::not_found::<Member>(member_id));
    }
    if !book.available {
      return Err(StoreError::Unavailable { isbn: isbn.to_string() });
    }

    self.books.edit(isbn, |book| book.available = false)?;
    self.members.edit(member_id, |member| member.loans.push(isbn.to_string()))?;
    info!(isbn = %isbn, member = %member_id, "lent book");
    self.save()
  }

  /// Take `isbn` back from `member_id`.
  pub fn give_back(&mut self, isbn: &str, member_id: &str) -> Result<(), StoreError> {
    let member = self
      .members
      .get(member_id)
      .ok_or_else(|| StoreError::not_found::<Member>(member_id))?;
    if !member.holds(isbn) {
      return Err(StoreError::NotLoaned {
        isbn: isbn.to_string(),
        member: member_id.to_string(),
      });
    }

    self
      .members
      .edit(member_id, |member| member.loans.retain(|l| l != isbn))?;
    if self.books.contains(isbn) {
      self.books.edit(isbn, |book| book.available = true)?;
    }
    info!(isbn = %isbn, member = %member_id, "returned book");
    self.save()
  }

  /// Books currently lent to `member_id`, in lending order.
  pub fn loans_of(&self, member_id: &str) -> Result<Vec<&Book>, StoreError> {
    let member = self
      .members
      .get(member_id)
      .ok_or_else(|| StoreError::not_found::<Member>(member_id))?;
    Ok(member.loans.iter().filter_map(|isbn| self.books.get(isbn)).collect())
  }

  pub fn search_title(&self, needle: &str) -> Vec<&Book> {
    self.books.find_by_substring("title", needle)
  }

  pub fn search_author(&self, needle: &str) -> Vec<&Book> {
    self.books.find_by_substring("author", needle)
  }

  /// Books whose category equals `category`, ignoring case.
  pub fn search_category(&self, category: &str) -> Vec<&Book> {
    self.books.find_exact("category", category)
  }

  /// Fill an empty library with a small sample catalog.
  ///
  /// Returns `Ok(false)` without changes if any book or member exists.
  pub fn seed_sample(&mut self) -> Result<bool, StoreError> {
    if !self.books.is_empty() || !self.members.is_empty() {
      return Ok(false);
    }

    for book in sample_books() {
      self.add_book(book)?;
    }
    self.register_member(Member::new("U001", "Ana Garcia"))?;
    info!(books = self.books.len(), members = self.members.len(), "seeded sample library");
    Ok(true)
  }

  /// Persist both files. Both writes are attempted; the first error wins.
  pub fn save(&self) -> Result<(), StoreError> {
    let books = self.books.persist();
    let members = self.members.persist();
    books.and(members)
  }
}

fn sample_books() -> Vec<Book> {
  vec![
    Book::new(
      "9780307476463",
      "One Hundred Years of Solitude",
      "Gabriel Garcia Marquez",
      "Novel",
    ),
    Book::new("9780062315007", "The Alchemist", "Paulo Coelho", "Fiction"),
    Book::new("9788420412146", "Don Quixote", "Miguel de Cervantes", "Classic"),
  ]
}

fn require_key(field: &'static str, key: &str) -> Result<(), StoreError> {
  if key.trim().is_empty() {
    return Err(StoreError::Invalid {
      field,
      reason: "must not be empty".to_string(),
    });
  }
  Ok(())
}
