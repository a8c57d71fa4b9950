//! Implementation of the `tally library` commands.

use std::path::Path;

use anyhow::{Result, bail};
use clap::{ArgGroup, Subcommand};

use tally_lib::library::{Book, BookPatch, Library, Member, MemberPatch};

use super::report_load;
use crate::output::{OutputFormat, print_info, print_records, print_success};
use crate::prompts::confirm;

#[derive(Subcommand, Debug)]
pub enum LibraryCommand {
  /// Manage the book catalog
  #[command(subcommand)]
  Book(BookCommand),

  /// Manage library members
  #[command(subcommand)]
  Member(MemberCommand),

  /// Lend a book to a member
  Lend { isbn: String, member: String },

  /// Take a book back from a member
  Return { isbn: String, member: String },

  /// List the books a member currently holds
  Loans {
    member: String,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Search books by title, author or category
  #[command(group(ArgGroup::new("by").required(true).multiple(false)))]
  Search {
    /// Case-insensitive substring of the title
    #[arg(long, group = "by")]
    title: Option<String>,

    /// Case-insensitive substring of the author
    #[arg(long, group = "by")]
    author: Option<String>,

    /// Exact category, ignoring case
    #[arg(long, group = "by")]
    category: Option<String>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Fill an empty library with a sample catalog
  Seed,
}

#[derive(Subcommand, Debug)]
pub enum BookCommand {
  /// Add a book to the catalog
  Add {
    isbn: String,
    title: String,
    author: String,
    category: String,
  },

  /// Remove a book (fails while it is on loan)
  Remove {
    isbn: String,

    /// Skip confirmation prompt
    #[arg(long)]
    force: bool,
  },

  /// Update a book's title, author or category
  Update {
    isbn: String,

    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    author: Option<String>,

    #[arg(long)]
    category: Option<String>,
  },

  /// List all books
  List {
    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },
}

#[derive(Subcommand, Debug)]
pub enum MemberCommand {
  /// Register a member
  Add { id: String, name: String },

  /// Deregister a member (fails while they hold books)
  Remove {
    id: String,

    /// Skip confirmation prompt
    #[arg(long)]
    force: bool,
  },

  /// Rename a member
  Update {
    id: String,

    #[arg(long)]
    name: String,
  },

  /// List all members
  List {
    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },
}

pub fn cmd_library(command: LibraryCommand, data_dir: &Path) -> Result<()> {
  let (mut library, load) = Library::open(data_dir);
  report_load("books", &load.books);
  report_load("members", &load.members);

  match command {
    LibraryCommand::Book(command) => cmd_book(&mut library, command)?,
    LibraryCommand::Member(command) => cmd_member(&mut library, command)?,
    LibraryCommand::Lend { isbn, member } => {
      library.lend(&isbn, &member)?;
      print_success(&format!("Lent {} to {}", isbn, member));
    }
    LibraryCommand::Return { isbn, member } => {
      library.give_back(&isbn, &member)?;
      print_success(&format!("{} returned {}", member, isbn));
    }
    LibraryCommand::Loans { member, output } => {
      let books = library.loans_of(&member)?;
      print_records(books, &format!("{} holds no books", member), output)?;
    }
    LibraryCommand::Search {
      title,
      author,
      category,
      output,
    } => {
      let found = match (title, author, category) {
        (Some(title), _, _) => library.search_title(&title),
        (_, Some(author), _) => library.search_author(&author),
        (_, _, Some(category)) => library.search_category(&category),
        (None, None, None) => bail!("Pass one of --title, --author or --category"),
      };
      print_records(found, "No books matched", output)?;
    }
    LibraryCommand::Seed => {
      if library.seed_sample()? {
        print_success("Seeded the library with a sample catalog");
      } else {
        print_info("Library already has data, nothing seeded");
      }
    }
  }

  Ok(())
}

fn cmd_book(library: &mut Library, command: BookCommand) -> Result<()> {
  match command {
    BookCommand::Add {
      isbn,
      title,
      author,
      category,
    } => {
      library.add_book(Book::new(&isbn, &title, &author, &category))?;
      print_success(&format!("Added book '{}'", title));
    }
    BookCommand::Remove { isbn, force } => {
      if library.book(&isbn).is_none() {
        bail!("No book with key '{}'", isbn);
      }
      if !confirm(&format!("Remove book {}?", isbn), force)? {
        println!("Cancelled");
        return Ok(());
      }
      let removed = library.remove_book(&isbn)?;
      print_success(&format!("Removed book '{}'", removed.title));
    }
    BookCommand::Update {
      isbn,
      title,
      author,
      category,
    } => {
      if title.is_none() && author.is_none() && category.is_none() {
        bail!("Nothing to update. Pass --title, --author or --category.");
      }
      let book = library.update_book(&isbn, BookPatch { title, author, category })?;
      print_success(&format!("Updated book {}", book.isbn));
    }
    BookCommand::List { output } => {
      print_records(library.books(), "The catalog is empty", output)?;
    }
  }
  Ok(())
}

fn cmd_member(library: &mut Library, command: MemberCommand) -> Result<()> {
  match command {
    MemberCommand::Add { id, name } => {
      library.register_member(Member::new(&id, &name))?;
      print_success(&format!("Registered member {} ({})", id, name));
    }
    MemberCommand::Remove { id, force } => {
      if library.member(&id).is_none() {
        bail!("No member with key '{}'", id);
      }
      if !confirm(&format!("Deregister member {}?", id), force)? {
        println!("Cancelled");
        return Ok(());
      }
      let removed = library.deregister_member(&id)?;
      print_success(&format!("Deregistered member {} ({})", removed.id, removed.name));
    }
    MemberCommand::Update { id, name } => {
      let member = library.update_member(&id, MemberPatch { name: Some(name) })?;
      print_success(&format!("Updated member {} ({})", member.id, member.name));
    }
    MemberCommand::List { output } => {
      print_records(library.members(), "No members registered", output)?;
    }
  }
  Ok(())
}
