mod config;
mod db;
mod dialect;
mod error;
mod generator;
mod naming;
mod optimizer;
mod structure;
#[cfg(test)]
mod testing;
mod value;

pub use crate::config::*;
pub use crate::db::*;
pub use crate::dialect::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::naming::*;
pub use crate::optimizer::*;
pub use crate::structure::*;
pub use crate::value::*;
