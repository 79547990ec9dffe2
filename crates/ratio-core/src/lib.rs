pub mod config;
pub mod error;
pub mod metric;
pub mod stats;
pub mod traits;
pub mod types;
pub mod value;

pub use config::*;
pub use error::*;
pub use metric::*;
pub use traits::*;
pub use types::*;
pub use value::*;
