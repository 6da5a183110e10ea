//! Error classification shared by gacha-core and the runtime.
//!
//! Each layer keeps its own `thiserror` enum next to the rules it guards
//! (e.g. [`ProgressionError`]); this module only provides the severity scale
//! and the [`GameError`] trait that lets callers decide between retrying,
//! reporting to the player, and aborting.
//!
//! [`ProgressionError`]: crate::stats::ProgressionError

/// How a failed tower or battle operation should be handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The same request may succeed later without changes
    /// (no keys yet, combat under maintenance).
    Recoverable,

    /// The request itself is wrong for the current state
    /// (empty party, stats never rolled, top floor reached).
    Validation,

    /// Stored data disagrees with itself, like a party slot pointing at a
    /// missing character.
    Internal,

    /// The operation was abandoned (zero base stats, exhausted commit
    /// retries).
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Whether the failure points at a bug or an aborted write rather than
    /// at player input.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Implemented by every error enum of the battle stack.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier of the variant, for logs and player-facing lookups.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
