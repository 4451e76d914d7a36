//! ARM to EER transformation.

mod analysis;
mod composite;
mod config;
mod engine;

pub use analysis::{EntityKind, classify};
pub use config::TransformConfig;
pub use engine::Transformer;
