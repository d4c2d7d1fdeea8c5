//! CLI Exit Code Registry
//!
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success                                              |
//! | 1    | General error                                        |
//! | 2    | Usage error (bad args, bad list name, bad index)     |
//! | 3    | Reconciled, but furniture is missing or out of place |
//! | 4    | Host not in the required editing mode                |
//! | 5    | Item has no live counterpart                         |
//! | 6    | Save file or scene snapshot could not be read        |
//! | 7    | Invalid config                                       |
//! | 8    | Write failed (output file, stale live handle)        |

use layoutkeeper_recon::ReconError;

pub const EXIT_SUCCESS: u8 = 0;

/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

pub const EXIT_USAGE: u8 = 2;

/// `reconcile --strict` found missing, misplaced or misdyed furniture.
pub const EXIT_LAYOUT_DRIFT: u8 = 3;

pub const EXIT_MODE: u8 = 4;

pub const EXIT_UNBOUND: u8 = 5;

pub const EXIT_IMPORT: u8 = 6;

pub const EXIT_CONFIG: u8 = 7;

pub const EXIT_WRITE: u8 = 8;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::Mode { .. } => EXIT_MODE,
        ReconError::UnboundItem { .. } => EXIT_UNBOUND,
        ReconError::NoSuchItem { .. } => EXIT_USAGE,
        ReconError::StaleHandle { .. } => EXIT_WRITE,
        ReconError::Import(_) => EXIT_IMPORT,
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_CONFIG,
        ReconError::Io(_) => EXIT_WRITE,
    }
}
