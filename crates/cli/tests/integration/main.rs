mod common;
mod env_tests;
mod inventory_tests;
mod library_tests;
