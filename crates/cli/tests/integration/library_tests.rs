//! Library command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

fn seeded() -> TestEnv {
  let env = TestEnv::new();
  env.tally_cmd().args(["library", "seed"]).assert().success();
  env
}

#[test]
fn books_are_keyed_by_isbn() {
  let env = TestEnv::new();

  env
    .tally_cmd()
    .args(["library", "book", "add", "333", "Emma", "Jane Austen", "Classic"])
    .assert()
    .success();

  let json = env.store_json("books.json");
  assert_eq!(json["333"]["title"], "Emma");
  assert_eq!(json["333"]["available"], true);
}

#[test]
fn lend_and_return_round_trip() {
  let env = seeded();
  let isbn = first_isbn(&env);

  env.tally_cmd().args(["library", "lend", &isbn, "U001"]).assert().success();
  assert_eq!(env.store_json("books.json")[&isbn]["available"], false);
  assert_eq!(env.store_json("members.json")["U001"]["loans"][0], isbn.as_str());

  env
    .tally_cmd()
    .args(["library", "lend", &isbn, "U001"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("already on loan"));

  env
    .tally_cmd()
    .args(["library", "return", &isbn, "U001"])
    .assert()
    .success()
    .stdout(predicate::str::contains(format!("U001 returned {}", isbn)));

  assert_eq!(env.store_json("books.json")[&isbn]["available"], true);
}

#[test]
fn return_of_unheld_book_fails() {
  let env = seeded();
  let isbn = first_isbn(&env);

  env
    .tally_cmd()
    .args(["library", "return", &isbn, "U001"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("does not hold"));
}

#[test]
fn search_by_category_is_exact() {
  let env = TestEnv::new();

  env
    .tally_cmd()
    .args(["library", "book", "add", "1", "Dune", "Frank Herbert", "Sci-Fi"])
    .assert()
    .success();

  env
    .tally_cmd()
    .args(["library", "search", "--category", "sci-fi"])
    .assert()
    .success()
    .stdout(predicate::str::contains("title: Dune"));

  env
    .tally_cmd()
    .args(["library", "search", "--category", "sci"])
    .assert()
    .success()
    .stdout(predicate::str::contains("No books matched"));
}

#[test]
fn stale_availability_is_reconciled_on_open() {
  let env = TestEnv::new();
  env.write_store(
    "books.json",
    r#"{ "1": { "isbn": "1", "title": "Dune", "author": "Frank Herbert", "category": "Sci-Fi", "available": false } }"#,
  );
  env.write_store("members.json", r#"{ "U1": { "id": "U1", "name": "Ana", "loans": [] } }"#);

  env
    .tally_cmd()
    .args(["library", "book", "list"])
    .assert()
    .success()
    .stdout(predicate::str::contains("available: true"));

  assert_eq!(env.store_json("books.json")["1"]["available"], true);
}

#[test]
fn loans_for_unknown_member_fail() {
  let env = TestEnv::new();

  env
    .tally_cmd()
    .args(["library", "loans", "NOPE"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("No member with key 'NOPE'"));
}

fn first_isbn(env: &TestEnv) -> String {
  let books = env.store_json("books.json");
  books
    .as_object()
    .and_then(|map| map.keys().next().cloned())
    .expect("seeded catalog has books")
}

#[test]
fn book_and_member_updates() {
  let env = TestEnv::new();

  env
    .tally_cmd()
    .args(["library", "book", "add", "1", "Dune", "Frank Herbert", "Sci-Fi"])
    .assert()
    .success();
  env
    .tally_cmd()
    .args(["library", "member", "add", "U1", "Ana"])
    .assert()
    .success();

  env
    .tally_cmd()
    .args(["library", "book", "update", "1", "--category", "Classic"])
    .assert()
    .success();
  env
    .tally_cmd()
    .args(["library", "member", "update", "U1", "--name", "Ana Garcia"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Updated member U1 (Ana Garcia)"));

  assert_eq!(env.store_json("books.json")["1"]["category"], "Classic");
  assert_eq!(env.store_json("books.json")["1"]["title"], "Dune");
  assert_eq!(env.store_json("members.json")["U1"]["name"], "Ana Garcia");
}
