//! Data loading and validation for game content.

mod builtin;
pub mod load;
pub mod schema;

pub use builtin::*;
pub use load::*;
pub use schema::*;
