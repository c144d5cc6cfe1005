//=========================================================================
// Engine Errors
//=========================================================================
//
// Error taxonomy shared by scenes, objects and the frame driver.
//
// Contract violations (unknown save names, driving frames before the
// program started) surface here and propagate to the driver, which stops
// the frame loop. Benign absences (removing what is not there) are no-ops
// and never produce an error.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== EngineError =========================================================

/// Errors raised by the scene/object runtime.
#[derive(Debug, Error)]
pub enum EngineError {
    /// `load_scene` was asked for a snapshot that was never saved.
    #[error("no suspended scene saved under '{0}'")]
    UnknownSavedScene(String),

    /// A frame or transition was driven before `start_program`.
    #[error("no active scene: start_program has not been called")]
    NotStarted,

    /// A scene or object hook reported a failure.
    #[error("{context} failed: {message}")]
    Hook {
        context: &'static str,
        message: String,
    },

    /// Window or event loop failure in the platform layer.
    #[error("platform error: {0}")]
    Platform(String),
}

impl EngineError {
    /// Builds a [`EngineError::Hook`] from any displayable cause.
    pub fn hook(context: &'static str, message: impl std::fmt::Display) -> Self {
        Self::Hook {
            context,
            message: message.to_string(),
        }
    }
}

/// Result alias used by every hook in the crate.
pub type Result<T, E = EngineError> = std::result::Result<T, E>;

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_save_names_the_key() {
        let err = EngineError::UnknownSavedScene("paused".to_string());
        assert!(err.to_string().contains("'paused'"));
    }

    #[test]
    fn hook_error_carries_context() {
        let err = EngineError::hook("timer action", "boom");
        assert_eq!(err.to_string(), "timer action failed: boom");
    }

    #[test]
    fn engine_error_is_error_trait() {
        fn assert_error<T: std::error::Error + Send + Sync>() {}
        assert_error::<EngineError>();
    }
}
