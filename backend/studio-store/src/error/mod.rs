use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} {id} is already {status}")]
    TerminalState {
        kind: &'static str,
        id: String,
        status: &'static str,
    },

    #[error("Invalid input: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl StoreError {
    /// Stable machine-readable code, mirrors the `error.code` field the
    /// dashboard shows next to toasts.
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::TerminalState { .. } => "TERMINAL_STATE",
            StoreError::Validation(_) => "BAD_REQUEST",
            StoreError::Config(_) => "CONFIG_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_state_message() {
        let err = StoreError::TerminalState {
            kind: "report",
            id: "abc".to_string(),
            status: "resolved",
        };
        assert_eq!(err.to_string(), "report abc is already resolved");
        assert_eq!(err.code(), "TERMINAL_STATE");
    }
}
