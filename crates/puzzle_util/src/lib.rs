//! Typed-index collections and small error types shared across the assembly
//! solver workspace.

#[macro_use]
mod macros;
pub mod error;
pub mod ti;
