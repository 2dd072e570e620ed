pub mod args;
pub mod error;
pub mod kerberos;
pub mod logging;
pub mod transfer;

pub use error::{Error, Result};
