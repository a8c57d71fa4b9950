//! Implementation of the `tally menu` command.
//!
//! A numbered menu loop over one store. Store errors are printed and the loop
//! continues; any other error ends the loop after a best-effort save.

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use tracing::warn;

use tally_lib::inventory::{Inventory, Product, ProductPatch};
use tally_lib::library::{Book, BookPatch, Library, Member, MemberPatch};
use tally_lib::store::StoreError;

use super::report_load;
use crate::output::{OutputFormat, format_amount, print_error, print_info, print_records, print_success, print_warning};
use crate::prompts::Prompter;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MenuStore {
  Inventory,
  Library,
}

const INVENTORY_MENU: &str = "
=== Inventory ===
1. Add product
2. Remove product
3. Update product
4. Search products
5. List products
6. Record sale
7. Process return
8. Show till
9. Save
0. Save and exit";

const LIBRARY_MENU: &str = "
=== Library ===
1. Add book
2. Remove book
3. List books
4. Register member
5. Deregister member
6. List members
7. Lend book
8. Return book
9. Books held by member
10. Search by title
11. Search by author
12. Search by category
13. Update book
14. Rename member
15. Load sample catalog
0. Save and exit";

enum Step {
  Continue,
  Exit,
}

pub fn cmd_menu(store: MenuStore, data_dir: &Path) -> Result<()> {
  let mut prompter = Prompter::stdio();
  match store {
    MenuStore::Inventory => {
      let (mut inventory, outcome) = Inventory::open(data_dir);
      report_load("inventory", &outcome);
      run_inventory(&mut inventory, &mut prompter)
    }
    MenuStore::Library => {
      let (mut library, load) = Library::open(data_dir);
      report_load("books", &load.books);
      report_load("members", &load.members);
      run_library(&mut library, &mut prompter)
    }
  }
}

/// Run the inventory menu until the user exits or input ends.
pub fn run_inventory<R: BufRead, W: Write>(inventory: &mut Inventory, prompter: &mut Prompter<R, W>) -> Result<()> {
  let result = run_loop(prompter, INVENTORY_MENU, |prompter, choice| {
    inventory_step(inventory, prompter, choice)
  });
  finish(result, || inventory.save())
}

/// Run the library menu until the user exits or input ends.
pub fn run_library<R: BufRead, W: Write>(library: &mut Library, prompter: &mut Prompter<R, W>) -> Result<()> {
  let result = run_loop(prompter, LIBRARY_MENU, |prompter, choice| {
    library_step(library, prompter, choice)
  });
  finish(result, || library.save())
}

fn run_loop<R, W, F>(prompter: &mut Prompter<R, W>, menu: &str, mut step: F) -> Result<()>
where
  R: BufRead,
  W: Write,
  F: FnMut(&mut Prompter<R, W>, &str) -> Result<Step>,
{
  loop {
    prompter.say(menu)?;
    let Some(choice) = prompter.line("Select an option")? else {
      return Ok(());
    };

    match step(prompter, choice.trim()) {
      Ok(Step::Continue) => {}
      Ok(Step::Exit) => return Ok(()),
      Err(e) => match e.downcast_ref::<StoreError>() {
        Some(store_error) => print_error(&store_error.to_string()),
        None => return Err(e),
      },
    }
  }
}

/// Save on the way out. A failed loop only attempts the save and returns the
/// original error.
fn finish(result: Result<()>, save: impl FnOnce() -> Result<(), StoreError>) -> Result<()> {
  match result {
    Ok(()) => {
      save().context("Failed to save")?;
      print_success("Saved");
      Ok(())
    }
    Err(e) => {
      if let Err(save_error) = save() {
        warn!(error = %save_error, "final save failed");
      }
      Err(e)
    }
  }
}

fn inventory_step<R: BufRead, W: Write>(
  inventory: &mut Inventory,
  prompter: &mut Prompter<R, W>,
  choice: &str,
) -> Result<Step> {
  match choice {
    "1" => {
      let id = prompter.text("Product ID")?;
      let name = prompter.text("Name")?;
      let quantity: u32 = prompter.parse("Quantity")?;
      let price: f64 = prompter.parse("Price")?;
      inventory.add(Product::new(&id, &name, quantity, price))?;
      print_success(&format!("Added product {}", id));
    }
    "2" => {
      let id = prompter.text("Product ID to remove")?;
      inventory.remove(&id)?;
      print_success(&format!("Removed product {}", id));
    }
    "3" => {
      let id = prompter.text("Product ID to update")?;
      let patch = ProductPatch {
        name: prompter.optional_text("New name (blank keeps current)")?,
        quantity: prompter.optional("New quantity (blank keeps current)")?,
        price: prompter.optional("New price (blank keeps current)")?,
      };
      inventory.update(&id, patch)?;
      print_success(&format!("Updated product {}", id));
    }
    "4" => {
      let name = prompter.text("Name to search")?;
      print_records(inventory.search(&name), "No products matched", OutputFormat::Text)?;
    }
    "5" => print_records(inventory.products(), "The inventory is empty", OutputFormat::Text)?,
    "6" => {
      let id = prompter.text("Product ID to sell")?;
      let quantity: u32 = prompter.parse("Quantity")?;
      let sale = inventory.sell(&id, quantity)?;
      print_success(&format!(
        "Sale {}: {} x {} = {}",
        sale.code,
        sale.quantity,
        sale.product_name,
        format_amount(sale.total)
      ));
    }
    "7" => {
      let code: u64 = prompter.parse("Sale code")?;
      let id = prompter.text("Product ID to return")?;
      let quantity: u32 = prompter.parse("Quantity")?;
      let refund = inventory.process_return(code, &id, quantity)?;
      print_success(&format!(
        "Return for sale {}: {} x {} = {}",
        refund.sale_code,
        refund.quantity,
        refund.product_name,
        format_amount(refund.total)
      ));
    }
    "8" => print_info(&format!("Till: {}", format_amount(inventory.till()))),
    "9" => {
      inventory.save()?;
      print_success("Inventory saved");
    }
    "0" => return Ok(Step::Exit),
    other => print_warning(&format!("Unknown option '{}'", other)),
  }
  Ok(Step::Continue)
}

fn library_step<R: BufRead, W: Write>(
  library: &mut Library,
  prompter: &mut Prompter<R, W>,
  choice: &str,
) -> Result<Step> {
  match choice {
    "1" => {
      let title = prompter.text("Title")?;
      let author = prompter.text("Author")?;
      let category = prompter.text("Category")?;
      let isbn = prompter.text("ISBN")?;
      library.add_book(Book::new(&isbn, &title, &author, &category))?;
      print_success(&format!("Added book '{}'", title));
    }
    "2" => {
      let isbn = prompter.text("ISBN to remove")?;
      library.remove_book(&isbn)?;
      print_success(&format!("Removed book {}", isbn));
    }
    "3" => print_records(library.books(), "The catalog is empty", OutputFormat::Text)?,
    "4" => {
      let name = prompter.text("Name")?;
      let id = prompter.text("Member ID")?;
      library.register_member(Member::new(&id, &name))?;
      print_success(&format!("Registered member {}", id));
    }
    "5" => {
      let id = prompter.text("Member ID to deregister")?;
      library.deregister_member(&id)?;
      print_success(&format!("Deregistered member {}", id));
    }
    "6" => print_records(library.members(), "No members registered", OutputFormat::Text)?,
    "7" => {
      let isbn = prompter.text("ISBN to lend")?;
      let member = prompter.text("Member ID")?;
      library.lend(&isbn, &member)?;
      print_success(&format!("Lent {} to {}", isbn, member));
    }
    "8" => {
      let isbn = prompter.text("ISBN to return")?;
      let member = prompter.text("Member ID")?;
      library.give_back(&isbn, &member)?;
      print_success(&format!("{} returned {}", member, isbn));
    }
    "9" => {
      let member = prompter.text("Member ID")?;
      let books = library.loans_of(&member)?;
      print_records(books, &format!("{} holds no books", member), OutputFormat::Text)?;
    }
    "10" => {
      let title = prompter.text("Title to search")?;
      print_records(library.search_title(&title), "No books matched", OutputFormat::Text)?;
    }
    "11" => {
      let author = prompter.text("Author to search")?;
      print_records(library.search_author(&author), "No books matched", OutputFormat::Text)?;
    }
    "12" => {
      let category = prompter.text("Category")?;
      print_records(library.search_category(&category), "No books matched", OutputFormat::Text)?;
    }
    "13" => {
      let isbn = prompter.text("ISBN to update")?;
      let patch = BookPatch {
        title: prompter.optional_text("New title (blank keeps current)")?,
        author: prompter.optional_text("New author (blank keeps current)")?,
        category: prompter.optional_text("New category (blank keeps current)")?,
      };
      library.update_book(&isbn, patch)?;
      print_success(&format!("Updated book {}", isbn));
    }
    "14" => {
      let id = prompter.text("Member ID")?;
      let name = prompter.text("New name")?;
      library.update_member(&id, MemberPatch { name: Some(name) })?;
      print_success(&format!("Updated member {}", id));
    }
    "15" => {
      if library.seed_sample()? {
        print_success("Seeded the library with a sample catalog");
      } else {
        print_info("Library already has data, nothing seeded");
      }
    }
    "0" => return Ok(Step::Exit),
    other => print_warning(&format!("Unknown option '{}'", other)),
  }
  Ok(Step::Continue)
}
