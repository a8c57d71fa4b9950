//! Inventory command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn add_writes_json_array() {
  let env = TestEnv::new();

  env
    .tally_cmd()
    .args(["inventory", "add", "A1", "Widget", "10", "2.5"])
    .assert()
    .success();

  let json = env.store_json("inventory.json");
  assert_eq!(
    json,
    serde_json::json!([{ "id": "A1", "name": "Widget", "quantity": 10, "price": 2.5 }])
  );
}

#[test]
fn existing_file_is_loaded() {
  let env = TestEnv::new();
  env.write_store(
    "inventory.json",
    r#"[{ "id": "B2", "name": "Gadget", "quantity": 4, "price": 9.99 }]"#,
  );

  env
    .tally_cmd()
    .args(["inventory", "search", "gad"])
    .assert()
    .success()
    .stdout(predicate::str::contains("id: B2, name: Gadget, quantity: 4, price: 9.99"));
}

#[test]
fn search_without_match() {
  let env = TestEnv::new();

  env
    .tally_cmd()
    .args(["inventory", "search", "zzz"])
    .assert()
    .success()
    .stdout(predicate::str::contains("No products matched"));
}

#[test]
fn update_changes_only_given_fields() {
  let env = TestEnv::new();

  env
    .tally_cmd()
    .args(["inventory", "add", "A1", "Widget", "10", "2.5"])
    .assert()
    .success();

  env
    .tally_cmd()
    .args(["inventory", "update", "A1", "--price", "3"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Updated product A1"));

  let json = env.store_json("inventory.json");
  assert_eq!(json[0]["name"], "Widget");
  assert_eq!(json[0]["quantity"], 10);
  assert_eq!(json[0]["price"], 3.0);
}

#[test]
fn update_unknown_product_fails() {
  let env = TestEnv::new();

  env
    .tally_cmd()
    .args(["inventory", "update", "ZZ", "--quantity", "3"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("No product with key 'ZZ'"));
}

#[test]
fn return_restocks() {
  let env = TestEnv::new();

  env
    .tally_cmd()
    .args(["inventory", "add", "A1", "Widget", "10", "2.5"])
    .assert()
    .success();
  env.tally_cmd().args(["inventory", "sell", "A1", "4"]).assert().success();

  env
    .tally_cmd()
    .args(["inventory", "return", "1", "A1", "2"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Return for sale 1: 2 x Widget = 5.00"));

  assert_eq!(env.store_json("inventory.json")[0]["quantity"], 8);
}

#[test]
fn zero_quantity_sale_rejected() {
  let env = TestEnv::new();

  env
    .tally_cmd()
    .args(["inventory", "add", "A1", "Widget", "10", "2.5"])
    .assert()
    .success();

  env
    .tally_cmd()
    .args(["inventory", "sell", "A1", "0"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Invalid quantity"));
}

#[test]
fn malformed_number_rejected_by_parser() {
  let env = TestEnv::new();

  env
    .tally_cmd()
    .args(["inventory", "add", "A1", "Widget", "ten", "2.5"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid value"));

  assert!(!env.data_path().join("inventory.json").exists());
}
