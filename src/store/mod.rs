pub mod file;
pub mod postgres;
pub mod traits;

pub use file::*;
pub use postgres::*;
pub use traits::*;
