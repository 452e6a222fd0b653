use thiserror::Error;

/// Why a GTIN was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GtinRule {
    /// Digit count was not 8, 12, 13, or 14.
    Length(usize),
    /// The mod-10 weighted check digit did not match.
    CheckDigit,
}

impl std::fmt::Display for GtinRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GtinRule::Length(n) => {
                write!(f, "length {} (must be 8, 12, 13, or 14 digits)", n)
            }
            GtinRule::CheckDigit => write!(f, "check digit mismatch"),
        }
    }
}

/// Main error type for kglink
#[derive(Error, Debug)]
pub enum KglinkError {
    /// GTIN failed length or check-digit validation
    #[error("Invalid GTIN {gtin:?}: {rule}")]
    InvalidGtin { gtin: String, rule: GtinRule },

    /// Slug source text reduced to the empty string
    #[error("Empty input: {0:?} contains no slug characters")]
    EmptyInput(String),

    /// Entity type outside the configured recognized set
    #[error("Unrecognized entity type: {0}")]
    UnrecognizedEntityType(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenient Result type using KglinkError
pub type Result<T> = std::result::Result<T, KglinkError>;
