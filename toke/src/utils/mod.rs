//! Shared primitive types used by the scanner, tokens and logging

pub mod position;

pub use position::Position;
