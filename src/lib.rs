pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod load;
pub mod logging;
pub mod pipeline;
pub mod transform;
pub mod types;

pub use config::Config;
pub use error::{EtlError, Result};
