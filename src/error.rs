//! Domain errors surfaced at the service boundary.
//!
//! Application plumbing (config, loading, providers) uses `anyhow`; the
//! operations callers can observe over HTTP or the CLI fail with [`FitError`]
//! so the boundary can map them to a status code.

/// Errors returned by catalog lookups, workout generation, and the coach.
#[derive(thiserror::Error, Debug)]
pub enum FitError {
    /// No record matched the identifier.
    #[error("{0}")]
    NotFound(String),
    /// Workout generation failed; no partial workout is returned.
    #[error("Error generating workout: {0}")]
    Workout(String),
    /// The coach could not answer the query.
    #[error("Error processing query: {0}")]
    Coach(String),
}

impl FitError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FitError::NotFound(_))
    }
}
