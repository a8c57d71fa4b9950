//! tally-lib: keyed record stores persisted as flat JSON files.
//!
//! - `store`: the generic [`store::RecordStore`] and its file format
//! - `inventory`: products, sales, returns and the session till
//! - `library`: books, members and loans

pub mod consts;
pub mod inventory;
pub mod library;
pub mod platform;
pub mod store;
