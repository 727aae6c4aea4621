//! Data models for tiir.
//!
//! This module contains the record type stored by every backend, its
//! identifier, and the ordering abstraction used when listing records.

mod order;
mod text;
pub mod timestamp;

pub use order::{Comparator, Direction, sort, timestamps};
pub use text::{Editor, ID_LENGTH, Text, TextId};
