use crate::ports::PortError;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by the quest engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// No hero exists yet.
    #[error("no current hero")]
    NoHero,

    /// There is no quest in progress.
    #[error("no active quest")]
    NoActiveQuest,

    /// The quest has already been completed.
    #[error("quest already completed")]
    AlreadyCompleted,

    /// A quest is still running, so a new one cannot start.
    #[error("a quest is already in progress")]
    QuestInProgress,

    /// Quests must last at least one minute.
    #[error("invalid quest duration: {0} minutes")]
    InvalidDuration(u32),

    /// A snapshot was written by a different allocation version.
    #[error("unsupported ledger version {found} (expected {expected})")]
    UnsupportedLedgerVersion {
        /// Version this build allocates with.
        expected: u32,
        /// Version found in the snapshot.
        found: u32,
    },

    /// Rebuilding a ledger from its snapshot produced a different hash.
    #[error("ledger hash mismatch: snapshot {expected}, rebuilt {found}")]
    LedgerMismatch {
        /// Hash stored in the snapshot.
        expected: String,
        /// Hash of the rebuilt ledger.
        found: String,
    },

    /// A collaborator failed.
    #[error("{0}")]
    Port(#[from] PortError),
}
