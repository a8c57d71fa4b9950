//! Implementation of the `tally inventory` commands.

use std::path::Path;

use anyhow::{Result, bail};
use clap::Subcommand;
use tracing::debug;

use tally_lib::inventory::{Inventory, Product, ProductPatch};

use super::report_load;
use crate::output::{OutputFormat, format_amount, print_records, print_success};
use crate::prompts::confirm;

#[derive(Subcommand, Debug)]
pub enum InventoryCommand {
  /// Add a new product
  Add {
    /// Unique product ID
    id: String,
    /// Product name
    name: String,
    /// Units in stock
    quantity: u32,
    /// Unit price
    price: f64,
  },

  /// Remove a product by ID
  Remove {
    id: String,

    /// Skip confirmation prompt
    #[arg(long)]
    force: bool,
  },

  /// Update the name, quantity or price of a product
  Update {
    id: String,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    quantity: Option<u32>,

    #[arg(long)]
    price: Option<f64>,
  },

  /// Search products by name (case-insensitive substring)
  Search {
    name: String,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// List all products
  List {
    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Sell units of a product at its current price
  Sell { id: String, quantity: u32 },

  /// Return units of a product against a sale code
  Return { code: u64, id: String, quantity: u32 },
}

pub fn cmd_inventory(command: InventoryCommand, data_dir: &Path) -> Result<()> {
  let (mut inventory, outcome) = Inventory::open(data_dir);
  report_load("inventory", &outcome);
  debug!(path = %inventory.store().path().display(), "opened inventory");

  match command {
    InventoryCommand::Add {
      id,
      name,
      quantity,
      price,
    } => {
      inventory.add(Product::new(&id, &name, quantity, price))?;
      print_success(&format!("Added product {}", id));
    }
    InventoryCommand::Remove { id, force } => {
      if inventory.get(&id).is_none() {
        bail!("No product with key '{}'", id);
      }
      if !confirm(&format!("Remove product {}?", id), force)? {
        println!("Cancelled");
        return Ok(());
      }
      let removed = inventory.remove(&id)?;
      print_success(&format!("Removed product {} ({})", removed.id, removed.name));
    }
    InventoryCommand::Update {
      id,
      name,
      quantity,
      price,
    } => {
      let patch = ProductPatch { name, quantity, price };
      if patch.is_empty() {
        bail!("Nothing to update. Pass --name, --quantity or --price.");
      }
      let product = inventory.update(&id, patch)?;
      print_success(&format!("Updated product {}", product.id));
    }
    InventoryCommand::Search { name, output } => {
      print_records(inventory.search(&name), "No products matched", output)?;
    }
    InventoryCommand::List { output } => {
      print_records(inventory.products(), "The inventory is empty", output)?;
    }
    InventoryCommand::Sell { id, quantity } => {
      let sale = inventory.sell(&id, quantity)?;
      print_success(&format!(
        "Sale {}: {} x {} = {}",
        sale.code,
        sale.quantity,
        sale.product_name,
        format_amount(sale.total)
      ));
    }
    InventoryCommand::Return { code, id, quantity } => {
      let refund = inventory.process_return(code, &id, quantity)?;
      print_success(&format!(
        "Return for sale {}: {} x {} = {}",
        refund.sale_code,
        refund.quantity,
        refund.product_name,
        format_amount(refund.total)
      ));
    }
  }

  Ok(())
}
