pub mod config;
pub mod credentials;
pub mod error;
pub mod types;

pub use config::AnaidConfig;
pub use credentials::Secret;
pub use error::{AnaidError, Result};
pub use types::*;
