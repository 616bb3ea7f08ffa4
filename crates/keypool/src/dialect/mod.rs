mod interface;
mod mysql;
mod oracle;
mod postgres;

pub use interface::*;
pub use mysql::*;
pub use oracle::*;
pub use postgres::*;
