//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code.
/// The 8xxx range is unassigned and folds into `System`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Authentication errors (1xxx)
    Auth,
    /// Permission errors (2xxx)
    Permission,
    /// OTP and password policy errors (3xxx)
    Verification,
    /// Order errors (4xxx)
    Order,
    /// Pickup slot errors (5xxx)
    Slot,
    /// Menu and cart errors (6xxx)
    Menu,
    /// Review errors (7xxx)
    Review,
    /// System errors (8xxx, 9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            2000..3000 => Self::Permission,
            3000..4000 => Self::Verification,
            4000..5000 => Self::Order,
            5000..6000 => Self::Slot,
            6000..7000 => Self::Menu,
            7000..8000 => Self::Review,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Permission => "permission",
            Self::Verification => "verification",
            Self::Order => "order",
            Self::Slot => "slot",
            Self::Menu => "menu",
            Self::Review => "review",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}
