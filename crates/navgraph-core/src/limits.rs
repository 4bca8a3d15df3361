//! Input validation limits for security and resource protection

/// Maximum length for a search pattern (1024 chars)
pub const MAX_PATTERN_LEN: usize = 1024;

/// Maximum compiled size of a regular expression (10MB)
pub const MAX_REGEX_SIZE: usize = 10 * 1024 * 1024;

/// Maximum length for a type name (64 chars)
pub const MAX_TYPE_NAME_LEN: usize = 64;

/// Validation error type
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    PatternTooLong { len: usize, max: usize },
    TypeNameTooLong { len: usize, max: usize },
    InvalidTypeNameChar { name: String, ch: char },
    EmptyPattern,
    EmptyTypeName,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PatternTooLong { len, max } => {
                write!(f, "Pattern too long: {} chars (max {})", len, max)
            }
            Self::TypeNameTooLong { len, max } => {
                write!(f, "Type name too long: {} chars (max {})", len, max)
            }
            Self::InvalidTypeNameChar { name, ch } => {
                write!(f, "Type name '{}' contains invalid character '{}'", name, ch)
            }
            Self::EmptyPattern => write!(f, "Pattern cannot be empty"),
            Self::EmptyTypeName => write!(f, "Type name cannot be empty"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a search pattern before compiling it
pub fn validate_pattern(pattern: &str) -> Result<(), ValidationError> {
    if pattern.is_empty() {
        return Err(ValidationError::EmptyPattern);
    }
    if pattern.len() > MAX_PATTERN_LEN {
        return Err(ValidationError::PatternTooLong {
            len: pattern.len(),
            max: MAX_PATTERN_LEN,
        });
    }
    Ok(())
}

/// Validate a schema type name
pub fn validate_type_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyTypeName);
    }
    if name.len() > MAX_TYPE_NAME_LEN {
        return Err(ValidationError::TypeNameTooLong {
            len: name.len(),
            max: MAX_TYPE_NAME_LEN,
        });
    }
    if let Some(ch) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
    {
        return Err(ValidationError::InvalidTypeNameChar {
            name: name.to_string(),
            ch,
        });
    }
    Ok(())
}
