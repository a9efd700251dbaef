//! Kernel families for Gaussian-process force fields

pub mod composite;
mod dims;
mod helpers;
pub mod many_body;
pub mod registry;
pub mod three_body;
pub mod two_body;

pub use self::registry::*;
