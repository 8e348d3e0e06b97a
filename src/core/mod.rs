pub mod error;

pub use error::{BoxError, Result, ShardError};
