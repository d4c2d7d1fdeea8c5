//! `layoutkeeper-recon`: housing layout reconciliation engine.
//!
//! Pure engine crate: receives a saved layout and a live scene through
//! collaborator traits, returns partitioned items with correctness flags.
//! No rendering or host bindings.

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod matcher;
pub mod model;
pub mod overlay;
pub mod scene;
pub mod session;
pub mod sort;
pub mod source;
pub mod summary;

pub use config::ReconConfig;
pub use engine::{reconcile, set_item_position};
pub use error::ReconError;
pub use model::{HousingArea, HousingItem, Partition, Partitions, Pose};
pub use scene::{LiveScene, SceneTable};
pub use session::Session;
