//! Infrastructure layer for Bondalayze.
//!
//! Configuration files, development collaborators (identity, persistence)
//! and the screenshot normalizer.

pub mod identity;
pub mod image_normalizer;
pub mod memory_repository;
pub mod paths;
pub mod storage;

pub use crate::identity::StaticTokenIdentityProvider;
pub use crate::memory_repository::{
    InMemoryAnalysisRepository, InMemoryPlanRepository, InMemorySpaceRepository,
};
pub use crate::paths::BondaPaths;
