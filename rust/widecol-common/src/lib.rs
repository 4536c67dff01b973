//! Core definitions (errors, result helpers, logging), relied upon by all widecol-* crates.

pub mod error;
pub mod logging;
pub mod result;

pub use error::{Error, ErrorKind};
pub use result::Result;

pub use log;
