//! Core types and error definitions

pub mod error;
pub mod types;

pub use self::error::*;
pub use self::types::*;
