/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised when parsing core values from user input.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The class name does not match any known class.
    #[error("unknown class: \"{0}\"")]
    UnknownClass(String),

    /// The quest type name does not match any known quest type.
    #[error("unknown quest type: \"{0}\"")]
    UnknownQuestType(String),
}
