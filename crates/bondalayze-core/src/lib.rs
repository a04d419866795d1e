//! Domain layer for Bondalayze.
//!
//! Holds the analysis data model, the validate-and-repair rules for model
//! output, the plan gate and the collaborator traits. Nothing in this crate
//! performs network or storage I/O.

pub mod admission;
pub mod analysis;
pub mod config;
pub mod conversation;
pub mod error;
pub mod identity;
pub mod image;
pub mod model_client;
pub mod payload;
pub mod plan;
pub mod repository;
pub mod request;
pub mod usage;

pub use error::{BondaError, Result};
pub use plan::Plan;
