pub mod engine;
pub mod error;
pub mod graph;
pub mod location;
pub mod matrix;
pub mod strategy;
