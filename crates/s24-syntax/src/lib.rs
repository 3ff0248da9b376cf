//! Shared definitions for the s24 toolchain: source tokens and the error
//! taxonomy used by every other crate.

pub mod error;
pub mod token;

pub use error::*;
pub use token::*;
