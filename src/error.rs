//! Error taxonomy for the engine.
//!
//! Mirrors the teacher's `AppError` shape (tagged `serde` enum, per-variant
//! `#[error(...)]`, helper constructors, a recoverability predicate) but
//! re-keyed around the five failure modes of the grouping pipeline: two
//! are fatal and abort the whole build, three are recoverable and are
//! instead folded into an [`AnalysisReport`](crate::AnalysisReport)'s
//! diagnostics list alongside a still-successful group map.

use serde::Serialize;
use thiserror::Error;

/// Top-level error for any fallible entry point into the engine.
#[derive(Error, Debug, Clone, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum EngineError {
    /// No changed files/hunks were supplied at all. Non-fatal: callers get
    /// back an empty group map plus this diagnostic rather than an error
    /// that aborts the whole pipeline.
    #[error("no changed files or hunks were supplied")]
    InputEmpty,

    /// A single file could not be parsed by the Reference-Graph Builder.
    /// Non-fatal: the file contributes no nodes and the build continues.
    #[error("failed to parse {file_id}: {message}")]
    ParseFailure { file_id: String, message: String },

    /// The Two-Version Orchestrator's shared deadline elapsed before both
    /// builders finished. Fatal: no partial graph pair is ever produced.
    #[error("reference graph build exceeded the {deadline_seconds}s deadline")]
    BuildTimeout { deadline_seconds: u64 },

    /// A builder task failed for a reason other than the deadline (panic,
    /// join error, I/O failure reading a snapshot directory). Fatal.
    #[error("builder failed: {message}")]
    BuilderFailure { message: String },

    /// A hunk or file carried an identifier the engine could not use (e.g.
    /// an empty `fileID`, or a `uniqueIndex` that fails to parse). Non-fatal:
    /// the hunk is skipped and noted as a diagnostic.
    #[error("invalid identifier: {identifier}")]
    InvalidIdentifier { identifier: String },
}

impl EngineError {
    pub fn parse_failure(file_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseFailure {
            file_id: file_id.into(),
            message: message.into(),
        }
    }

    pub fn build_timeout(deadline_seconds: u64) -> Self {
        Self::BuildTimeout { deadline_seconds }
    }

    pub fn builder_failure(message: impl Into<String>) -> Self {
        Self::BuilderFailure {
            message: message.into(),
        }
    }

    pub fn invalid_identifier(identifier: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            identifier: identifier.into(),
        }
    }

    /// `true` if the engine can fold this into a diagnostic and keep going
    /// rather than abort the whole analysis.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::InputEmpty | Self::ParseFailure { .. } | Self::InvalidIdentifier { .. } => true,
            Self::BuildTimeout { .. } | Self::BuilderFailure { .. } => false,
        }
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::builder_failure(err.to_string())
    }
}

impl From<tokio::time::error::Elapsed> for EngineError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        // The caller supplies the deadline that actually elapsed; this
        // conversion is only reached where that value isn't in scope, so
        // record it as zero and let the orchestrator construct the
        // precise variant directly where it has the real deadline.
        EngineError::build_timeout(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_tagged_shape() {
        let err = EngineError::parse_failure("f0", "unexpected token");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"type\":\"ParseFailure\""));
        assert!(json.contains("\"file_id\":\"f0\""));
    }

    #[test]
    fn recoverability_matches_taxonomy() {
        assert!(EngineError::InputEmpty.is_recoverable());
        assert!(EngineError::parse_failure("f", "x").is_recoverable());
        assert!(EngineError::invalid_identifier("bad").is_recoverable());
        assert!(!EngineError::build_timeout(600).is_recoverable());
        assert!(!EngineError::builder_failure("panic").is_recoverable());
    }
}
