pub mod config;
pub mod error;
pub mod id;
pub mod validate;

pub use config::Config;
pub use error::{GtinRule, KglinkError, Result};
pub use id::IdGenerator;
pub use validate::{BatchReport, Finding, Issue, Validation, Validator};
