//! Entity Module

pub mod score;

pub use score::{Score, ScoreChanges, ScoreView};
