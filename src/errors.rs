use thiserror::Error;

#[derive(Error, Debug)]
pub enum AutomationError {
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Operation timed out: {0}")]
    Timeout(String),

    #[error("Section '{name}' does not exist. Known sections: {known:?}")]
    SectionNotFound { name: String, known: Vec<String> },

    #[error("Stale element: {0}")]
    StaleElement(String),

    #[error("Retries exhausted after {attempts} attempts: {message}")]
    RetriesExhausted { attempts: u32, message: String },

    #[error("Application conflict: {0}")]
    ApplicationConflict(String),

    #[error("Unrecognized application message: {0}")]
    UnclassifiedMessage(String),

    #[error("Login failed: {0}")]
    LoginFailed(String),

    #[error("Driver error: {0}")]
    DriverError(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
