/// Application name used for data directories.
pub const APP_NAME: &str = "tally";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "TALLY_DATA_DIR";

/// File name of the inventory store.
pub const INVENTORY_FILENAME: &str = "inventory.json";

/// File name of the library book store.
pub const BOOKS_FILENAME: &str = "books.json";

/// File name of the library member store.
pub const MEMBERS_FILENAME: &str = "members.json";
