pub mod error;
pub use error::crash;
pub mod eval;
pub mod logging;
pub mod version;

pub use eval::*;
