mod cmd;
mod output;
mod prompts;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::{InventoryCommand, LibraryCommand, MenuStore, cmd_info, cmd_inventory, cmd_library, cmd_menu};
use output::{OutputFormat, print_error};
use tally_lib::platform::paths::resolve_data_dir;

/// tally - keep a small shop inventory or lending library in flat JSON files
#[derive(Parser)]
#[command(name = "tally")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Directory holding the store files (default: $TALLY_DATA_DIR or the platform data dir)
  #[arg(long, global = true, value_name = "DIR")]
  data_dir: Option<PathBuf>,

  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Manage products, sales and returns
  #[command(subcommand)]
  Inventory(InventoryCommand),

  /// Manage books, members and loans
  #[command(subcommand)]
  Library(LibraryCommand),

  /// Run the interactive menu for one store
  Menu {
    #[arg(value_enum)]
    store: MenuStore,
  },

  /// Show the data directory and store files
  Info {
    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let data_dir = resolve_data_dir(cli.data_dir.as_deref());

  let result = match cli.command {
    Commands::Inventory(command) => cmd_inventory(command, &data_dir),
    Commands::Library(command) => cmd_library(command, &data_dir),
    Commands::Menu { store } => cmd_menu(store, &data_dir),
    Commands::Info { output } => cmd_info(&data_dir, output),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      print_error(&format!("{:#}", e));
      ExitCode::FAILURE
    }
  }
}

fn init_tracing(verbose: bool) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
    if verbose {
      EnvFilter::new("debug")
    } else {
      EnvFilter::new("warn")
    }
  });

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(false)
    .without_time()
    .with_writer(std::io::stderr)
    .init();
}
