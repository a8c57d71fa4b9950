use serde::{Deserialize, Serialize};

use crate::store::{Entry, Stocked, Value};

/// A stocked product, keyed by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  pub id: String,
  pub name: String,
  pub quantity: u32,
  pub price: f64,
}

impl Product {
  pub fn new(id: &str, name: &str, quantity: u32, price: f64) -> Self {
    Self {
      id: id.to_string(),
      name: name.to_string(),
      quantity,
      price,
    }
  }
}

/// Field-level update for a [`Product`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
  pub name: Option<String>,
  pub quantity: Option<u32>,
  pub price: Option<f64>,
}

impl ProductPatch {
  pub fn is_empty(&self) -> bool {
    self.name.is_none() && self.quantity.is_none() && self.price.is_none()
  }
}

impl Entry for Product {
  type Patch = ProductPatch;

  const KIND: &'static str = "product";
  const FIELDS: &'static [&'static str] = &["id", "name", "quantity", "price"];

  fn key(&self) -> &str {
    &self.id
  }

  fn field(&self, name: &str) -> Option<Value> {
    match name {
      "id" => Some(self.id.as_str().into()),
      "name" => Some(self.name.as_str().into()),
      "quantity" => Some(self.quantity.into()),
      "price" => Some(self.price.into()),
      _ => None,
    }
  }

  fn apply(&mut self, patch: ProductPatch) {
    if let Some(name) = patch.name {
      self.name = name;
    }
    if let Some(quantity) = patch.quantity {
      self.quantity = quantity;
    }
    if let Some(price) = patch.price {
      self.price = price;
    }
  }
}

impl Stocked for Product {
  fn quantity(&self) -> u32 {
    self.quantity
  }

  fn set_quantity(&mut self, quantity: u32) {
    self.quantity = quantity;
  }
}

/// A completed sale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sale {
  pub code: u64,
  pub product_id: String,
  pub product_name: String,
  pub quantity: u32,
  pub total: f64,
}

/// A processed return against an earlier sale code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Return {
  pub sale_code: u64,
  pub product_id: String,
  pub product_name: String,
  pub quantity: u32,
  pub total: f64,
}
