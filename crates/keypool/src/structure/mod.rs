mod interface;
mod sequence;
mod table;

pub use interface::*;
pub use sequence::*;
pub use table::*;
