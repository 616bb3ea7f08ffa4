mod hilo;
mod interface;
mod noop;
mod pooled;
mod pooled_lo;
#[cfg(test)]
mod tests;

pub use hilo::*;
pub use interface::*;
pub use noop::*;
pub use pooled::*;
pub use pooled_lo::*;
