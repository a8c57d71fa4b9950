//! Product inventory with sales, returns and a running till.
//!
//! Products persist to `inventory.json` as a JSON array. The till and the
//! sale-code counter live only as long as the [`Inventory`] value.

mod types;

use std::path::Path;

use tracing::info;

use crate::consts::INVENTORY_FILENAME;
use crate::store::{Layout, LoadOutcome, RecordStore, StoreError};

pub use types::{Product, ProductPatch, Return, Sale};

#[derive(Debug)]
pub struct Inventory {
  store: RecordStore<Product>,
  till: f64,
  next_code: u64,
}

impl Inventory {
  /// Load the inventory from `dir`, creating the file if needed.
  pub fn open(dir: &Path) -> (Self, LoadOutcome) {
    let (store, outcome) = RecordStore::load(dir.join(INVENTORY_FILENAME), Layout::Sequence);
    (Self::from_store(store), outcome)
  }

  pub fn from_store(store: RecordStore<Product>) -> Self {
    Self {
      store,
      till: 0.0,
      next_code: 1,
    }
  }

  pub fn store(&self) -> &RecordStore<Product> {
    &self.store
  }

  pub fn products(&self) -> impl Iterator<Item = &Product> {
    self.store.iter()
  }

  pub fn get(&self, id: &str) -> Option<&Product> {
    self.store.get(id)
  }

  pub fn add(&mut self, product: Product) -> Result<(), StoreError> {
    if product.id.trim().is_empty() {
      return Err(StoreError::Invalid {
        field: "id",
        reason: "must not be empty".to_string(),
      });
    }
    validate_price(product.price)?;
    self.store.insert(product)
  }

  pub fn remove(&mut self, id: &str) -> Result<Product, StoreError> {
    self.store.remove(id)
  }

  pub fn update(&mut self, id: &str, patch: ProductPatch) -> Result<&Product, StoreError> {
    if let Some(price) = patch.price {
      validate_price(price)?;
    }
    self.store.update(id, patch)
  }

  /// Products whose name contains `name`, ignoring case.
  pub fn search(&self, name: &str) -> Vec<&Product> {
    self.store.find_by_substring("name", name)
  }

  /// Sell `quantity` units at the product's current price.
  pub fn sell(&mut self, id: &str, quantity: u32) -> Result<Sale, StoreError> {
    validate_quantity(quantity)?;
    let product = self.store.get(id).ok_or_else(|| StoreError::not_found::<Product>(id))?;
    let (price, product_name) = (product.price, product.name.clone());
    let till = self.checked_till(f64::from(quantity) * price)?;

    let total = self.store.apply_quantity_delta(id, quantity, price)?;
    self.till = till;

    let code = self.next_code;
    self.next_code += 1;
    info!(code, product = %id, quantity, total, "recorded sale");

    Ok(Sale {
      code,
      product_id: id.to_string(),
      product_name,
      quantity,
      total,
    })
  }

  /// Put `quantity` units back and refund them at the current price.
  ///
  /// `sale_code` is carried into the result for the receipt; it is not
  /// checked against earlier sales.
  pub fn process_return(&mut self, sale_code: u64, id: &str, quantity: u32) -> Result<Return, StoreError> {
    validate_quantity(quantity)?;
    let price = self.store.get(id).ok_or_else(|| StoreError::not_found::<Product>(id))?.price;
    let total = f64::from(quantity) * price;
    let till = self.checked_till(-total)?;

    self.store.restock(id, quantity)?;
    self.till = till;

    let product = self.store.get(id).ok_or_else(|| StoreError::not_found::<Product>(id))?;
    info!(sale_code, product = %id, quantity, total, "processed return");

    Ok(Return {
      sale_code,
      product_id: id.to_string(),
      product_name: product.name.clone(),
      quantity,
      total,
    })
  }

  /// The till after adding `amount`, if it stays a finite number.
  fn checked_till(&self, amount: f64) -> Result<f64, StoreError> {
    let till = self.till + amount;
    if !till.is_finite() {
      return Err(StoreError::Invalid {
        field: "till",
        reason: format!("adding {} to {} is out of range", amount, self.till),
      });
    }
    Ok(till)
  }

  /// Running total of sales minus returns for this session.
  pub fn till(&self) -> f64 {
    self.till
  }

  pub fn save(&self) -> Result<(), StoreError> {
    self.store.persist()
  }
}

fn validate_price(price: f64) -> Result<(), StoreError> {
  if !price.is_finite() || price < 0.0 {
    return Err(StoreError::Invalid {
      field: "price",
      reason: format!("{} is not a non-negative number", price),
    });
  }
  Ok(())
}

fn validate_quantity(quantity: u32) -> Result<(), StoreError> {
  if quantity == 0 {
    return Err(StoreError::Invalid {
      field: "quantity",
      reason: "must be at least 1".to_string(),
    });
  }
  Ok(())
}
