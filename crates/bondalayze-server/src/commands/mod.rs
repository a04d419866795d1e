pub mod analyze;
pub mod normalize;
pub mod serve;
