// layoutkeeper CLI - reconcile saved housing layouts against scene snapshots

mod exit_codes;
mod layout;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use layoutkeeper_recon::{Partition, ReconConfig, ReconError};

use exit_codes::{recon_exit_code, EXIT_CONFIG, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "lk")]
#[command(about = "Save, match and re-apply housing furniture layouts")]
#[command(version)]
struct Cli {
    /// Config file (default: <config dir>/layoutkeeper/config.toml)
    #[arg(long, global = true, env = "LK_CONFIG")]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match a saved layout against a scene snapshot and show the partitions
    #[command(after_help = "\
Examples:
  lk reconcile cottage.json --scene indoors.scene.json
  lk reconcile cottage.json --scene indoors.scene.json --json
  lk reconcile cottage.json --scene indoors.scene.json --strict")]
    Reconcile {
        /// Saved layout (JSON)
        layout: PathBuf,

        /// Scene snapshot (JSON)
        #[arg(long)]
        scene: PathBuf,

        /// Output JSON to stdout instead of the listing
        #[arg(long)]
        json: bool,

        /// Exit 3 when anything is missing, misplaced or misdyed
        #[arg(long)]
        strict: bool,
    },

    /// Move (or dye) every matched item back to its saved state
    #[command(after_help = "\
Examples:
  lk apply cottage.json --scene indoors.scene.json --output indoors.after.json
  lk apply cottage.json --scene indoors.scene.json --dyes")]
    Apply {
        layout: PathBuf,

        #[arg(long)]
        scene: PathBuf,

        /// Apply dyes instead of positions
        #[arg(long)]
        dyes: bool,

        /// Write the updated scene snapshot here
        #[arg(long)]
        output: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// Set the position (or dye) of a single item
    #[command(after_help = "\
Examples:
  lk set cottage.json --scene indoors.scene.json --list interior --index 2
  lk set cottage.json --scene indoors.scene.json --index 0 --dye")]
    Set {
        layout: PathBuf,

        #[arg(long)]
        scene: PathBuf,

        /// List the index refers to (default: the scene's own list)
        #[arg(long)]
        list: Option<ListArg>,

        /// Row in the list, as shown by `lk reconcile`
        #[arg(long)]
        index: usize,

        /// Apply the saved dye instead of the saved position
        #[arg(long)]
        dye: bool,

        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Save what is placed in the scene into a layout file
    #[command(after_help = "\
Examples:
  lk capture --scene indoors.scene.json cottage.json")]
    Capture {
        /// Layout file to update (created if missing)
        layout: PathBuf,

        #[arg(long)]
        scene: PathBuf,
    },

    /// Sort a list by name, then position, then rotation
    Sort {
        layout: PathBuf,

        #[arg(long)]
        list: ListArg,

        /// Write here instead of in place
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Empty an item list (or a fixture list)
    Clear {
        layout: PathBuf,

        #[arg(long)]
        list: ListArg,

        /// Clear the list's fixtures instead of its items
        #[arg(long)]
        fixtures: bool,

        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Shopping-list export: item counts and import link
    #[command(after_help = "\
Examples:
  lk export cottage.json
  lk export cottage.json --json")]
    Export {
        layout: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// Config helpers
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Validate a config file without running anything
    Validate {
        /// Defaults to the resolved config path
        path: Option<PathBuf>,
    },
    /// Print the resolved config path
    Path,
}

#[derive(Clone, Copy, ValueEnum)]
enum ListArg {
    Interior,
    Exterior,
    Unused,
}

impl From<ListArg> for Partition {
    fn from(arg: ListArg) -> Self {
        match arg {
            ListArg::Interior => Partition::Interior,
            ListArg::Exterior => Partition::Exterior,
            ListArg::Unused => Partition::Unused,
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn with_code(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        let hint = match &err {
            ReconError::Mode { .. } => {
                Some("open the housing furniture menu (or dye menu) and capture the scene again".to_string())
            }
            ReconError::UnboundItem { .. } => {
                Some("the item is missing from the scene; place it first".to_string())
            }
            ReconError::StaleHandle { .. } => Some("re-run reconcile against a fresh snapshot".to_string()),
            _ => None,
        };
        Self { code: recon_exit_code(&err), message: err.to_string(), hint }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .parse_default_env()
        .try_init();
}

fn load_config(path: Option<PathBuf>) -> Result<ReconConfig, CliError> {
    match path {
        // An explicit path must exist.
        Some(p) => {
            let s = std::fs::read_to_string(&p).map_err(|e| {
                CliError::with_code(EXIT_CONFIG, format!("cannot read {}: {e}", p.display()))
            })?;
            Ok(ReconConfig::from_toml(&s)?)
        }
        None => match ReconConfig::default_path() {
            Some(p) => Ok(ReconConfig::load(&p)?),
            None => Ok(ReconConfig::default()),
        },
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config;
    let config = || load_config(config_path.clone());

    match cli.command {
        Commands::Config(cmd) => layout::cmd_config(cmd, config_path.clone()),
        Commands::Reconcile { layout, scene, json, strict } => {
            layout::cmd_reconcile(&config()?, layout, scene, json, strict)
        }
        Commands::Apply { layout, scene, dyes, output, json } => {
            layout::cmd_apply(&config()?, layout, scene, dyes, output, json)
        }
        Commands::Set { layout, scene, list, index, dye, output } => {
            layout::cmd_set(&config()?, layout, scene, list.map(Partition::from), index, dye, output)
        }
        Commands::Capture { layout, scene } => layout::cmd_capture(layout, scene),
        Commands::Sort { layout, list, output } => layout::cmd_sort(layout, list.into(), output),
        Commands::Clear { layout, list, fixtures, output } => {
            layout::cmd_clear(layout, list.into(), fixtures, output)
        }
        Commands::Export { layout, json } => layout::cmd_export(&config()?, layout, json),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}
