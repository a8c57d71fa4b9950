mod info;
mod inventory;
mod library;
mod menu;

pub use info::cmd_info;
pub use inventory::{InventoryCommand, cmd_inventory};
pub use library::{LibraryCommand, cmd_library};
pub use menu::{MenuStore, cmd_menu};

use tracing::debug;

use tally_lib::store::LoadOutcome;

use crate::output::print_warning;

/// Tell the user when a store file could not be used as-is.
pub(crate) fn report_load(name: &str, outcome: &LoadOutcome) {
  match outcome {
    LoadOutcome::Loaded { count } => debug!(store = name, count, "loaded store"),
    LoadOutcome::Created => debug!(store = name, "created empty store"),
    LoadOutcome::Recovered { reason } => {
      print_warning(&format!("The {} file was corrupt and has been reset: {}", name, reason));
    }
    LoadOutcome::Unreadable { reason } => {
      print_warning(&format!(
        "The {} file could not be read, starting empty without overwriting it: {}",
        name, reason
      ));
    }
  }
}
