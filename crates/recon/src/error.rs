use std::fmt;

use crate::model::Partition;

/// Host capability an operation needs before it may touch the live scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Layout editing mode (any furniture menu open).
    HousingMode,
    /// Move/rotate furniture.
    EditItem,
    /// Dye furniture.
    DyeItem,
    /// Either move or dye.
    EditOrDye,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HousingMode => write!(f, "housing layout mode"),
            Self::EditItem => write!(f, "rotate/move furniture mode"),
            Self::DyeItem => write!(f, "furniture dye mode"),
            Self::EditOrDye => write!(f, "rotate/move or furniture dye mode"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReconError {
    /// Host is not in the editing mode the action requires. Nothing was mutated.
    Mode {
        action: &'static str,
        required: Capability,
    },
    /// Item has no live counterpart.
    UnboundItem { name: String },
    /// Index out of range for the list it was looked up in.
    NoSuchItem { partition: Partition, index: usize },
    /// Live handle refers to an object that has since been removed.
    StaleHandle { index: u32, generation: u32 },
    /// Save source failed to parse or return data.
    Import(String),
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (negative tolerance, bad URL, etc.).
    ConfigValidation(String),
    /// IO error (file read, etc.).
    Io(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mode { action, required } => {
                write!(f, "cannot {action}: not in {required}")
            }
            Self::UnboundItem { name } => {
                write!(f, "'{name}' has no matching furniture in the current scene")
            }
            Self::NoSuchItem { partition, index } => {
                write!(f, "no item #{index} in the {partition} list")
            }
            Self::StaleHandle { index, generation } => {
                write!(f, "live object {index}#{generation} no longer exists")
            }
            Self::Import(msg) => write!(f, "import error: {msg}"),
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
