//! Error handling for the pipeline infrastructure
//!
//! Unified error type for ingestion and resource loading. Per-word anomalies
//! inside the phrase pipeline never surface here; they are logged and
//! degraded at the point of occurrence.

use thiserror::Error;

/// Common result type for infrastructure operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Unified infrastructure error.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("IO error: {operation}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed input: {context}")]
    MalformedInput { context: String },

    #[error("resource '{resource}' failed to load: {context}")]
    Resource { resource: String, context: String },

    #[error("serialization error: {context}")]
    Serialization {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl EngineError {
    /// Create an IO error with operation context.
    pub fn io<S: Into<String>>(operation: S, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }

    /// Create a malformed-input error.
    pub fn malformed<S: Into<String>>(context: S) -> Self {
        Self::MalformedInput {
            context: context.into(),
        }
    }

    /// Create a resource-loading error.
    pub fn resource<R: Into<String>, C: Into<String>>(resource: R, context: C) -> Self {
        Self::Resource {
            resource: resource.into(),
            context: context.into(),
        }
    }
}

impl From<std::io::Error> for EngineError {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            operation: "unknown".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            context: "JSON serialization".to_string(),
            source: Some(Box::new(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EngineError::malformed("token line has 7 fields, expected 10");
        assert!(err.to_string().contains("7 fields"));

        let err = EngineError::resource("en_lemma_exc.json.gz", "bad gzip header");
        assert!(err.to_string().contains("en_lemma_exc.json.gz"));
    }
}
