//! Error taxonomy for property queries

use thiserror::Error;

/// Errors raised while querying system properties
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SysError {
    /// Management session setup failed; the session must not be used.
    #[error("Initialization failed: {message}{}", fmt_code(.code))]
    Init { code: Option<i32>, message: String },

    /// The provider or kernel call itself failed.
    #[error("Query failed: {message}{}", fmt_code(.code))]
    Query { code: Option<i32>, message: String },

    /// The call succeeded but the requested field was absent.
    #[error("Could not find {field} in {source_name}")]
    FieldNotFound { field: String, source_name: String },

    /// The field was present but could not be read as the needed type.
    #[error("Could not parse {field} value '{value}'")]
    Parse { field: String, value: String },

    /// An external tool could not be run or printed nothing.
    #[error("External tool '{tool}' unavailable: {reason}")]
    ToolUnavailable { tool: String, reason: String },

    #[error("No system property source for platform '{platform}'")]
    Unsupported { platform: String },
}

fn fmt_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!(" (code {})", code),
        None => String::new(),
    }
}

impl SysError {
    pub(crate) fn not_found(field: impl Into<String>, source_name: impl Into<String>) -> Self {
        SysError::FieldNotFound {
            field: field.into(),
            source_name: source_name.into(),
        }
    }

    pub(crate) fn query(code: Option<i32>, message: impl Into<String>) -> Self {
        SysError::Query {
            code,
            message: message.into(),
        }
    }

    pub(crate) fn parse(field: impl Into<String>, value: impl Into<String>) -> Self {
        SysError::Parse {
            field: field.into(),
            value: value.into(),
        }
    }

    pub(crate) fn tool(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        SysError::ToolUnavailable {
            tool: tool.into(),
            reason: reason.into(),
        }
    }
}

pub type SysResult<T> = Result<T, SysError>;
