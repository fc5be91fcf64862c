//! Access level classification.

use serde::{Deserialize, Serialize};

/// Ordered access levels. `Usual` is the default for new accounts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccessLevel {
    Usual,
    High,
    Administrator,
}

impl AccessLevel {
    /// Numeric form persisted by the directory.
    #[must_use]
    pub const fn level(self) -> i32 {
        match self {
            Self::Usual => 0,
            Self::High => 5,
            Self::Administrator => 999,
        }
    }

    /// Map a persisted level back; unknown values degrade to `Usual`.
    #[must_use]
    pub const fn from_level(level: i32) -> Self {
        match level {
            5 => Self::High,
            999 => Self::Administrator,
            _ => Self::Usual,
        }
    }
}

impl Default for AccessLevel {
    fn default() -> Self {
        Self::Usual
    }
}

/// True for levels allowed to read across users.
#[must_use]
pub const fn is_elevated(level: AccessLevel) -> bool {
    level.level() >= AccessLevel::High.level()
}

/// True only for the administrator level.
#[must_use]
pub const fn is_administrator(level: AccessLevel) -> bool {
    matches!(level, AccessLevel::Administrator)
}
