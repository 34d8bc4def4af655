//! Data structures for the game world
//!
//! Defines bounded text values, the mansion map and its reference content.

pub mod mansion;
pub mod map;

pub use map::*;

use crate::{GameError, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use uuid::Uuid;

/// Longest clue description, in bytes.
pub const MAX_CLUE_LEN: usize = 79;

/// Longest suspect or room name, in bytes.
pub const MAX_NAME_LEN: usize = 49;

/// Severity levels for messages shown to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Notice,
    Warning,
    Critical,
}

impl Severity {
    pub fn symbol(&self) -> &'static str {
        match self {
            Severity::Info => "ℹ",
            Severity::Notice => "◆",
            Severity::Warning => "▲",
            Severity::Critical => "⬤",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Notice => write!(f, "NOTICE"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// A unique identifier wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Id(pub Uuid);

impl Id {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for Id {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which kind of bounded text failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextKind {
    Clue,
    Suspect,
    Room,
}

impl TextKind {
    pub fn max_len(&self) -> usize {
        match self {
            TextKind::Clue => MAX_CLUE_LEN,
            TextKind::Suspect | TextKind::Room => MAX_NAME_LEN,
        }
    }
}

impl fmt::Display for TextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextKind::Clue => write!(f, "Clue"),
            TextKind::Suspect => write!(f, "Suspect name"),
            TextKind::Room => write!(f, "Room name"),
        }
    }
}

fn bounded(kind: TextKind, text: impl Into<String>) -> Result<String> {
    let text = text.into();
    if text.is_empty() {
        return Err(GameError::EmptyText(kind));
    }
    let max = kind.max_len();
    if text.len() > max {
        return Err(GameError::TooLong {
            kind,
            len: text.len(),
            max,
        });
    }
    Ok(text)
}

macro_rules! bounded_text {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn new(text: impl Into<String>) -> Result<Self> {
                bounded($kind, text).map(Self)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = GameError;

            fn try_from(text: String) -> Result<Self> {
                Self::new(text)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = GameError;

            fn try_from(text: &str) -> Result<Self> {
                Self::new(text)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> String {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

bounded_text!(
    /// The description of a clue. Compared byte for byte, case sensitive.
    ClueText,
    TextKind::Clue
);

bounded_text!(
    /// The name of a suspect.
    SuspectName,
    TextKind::Suspect
);

bounded_text!(RoomName, TextKind::Room);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clue_at_the_limit_is_accepted() {
        let text = "x".repeat(MAX_CLUE_LEN);
        assert_eq!(ClueText::new(text.clone()).unwrap().as_str(), text);
    }

    #[test]
    fn overlong_text_is_rejected_not_truncated() {
        let err = ClueText::new("x".repeat(MAX_CLUE_LEN + 1)).unwrap_err();
        assert_eq!(
            err,
            GameError::TooLong {
                kind: TextKind::Clue,
                len: MAX_CLUE_LEN + 1,
                max: MAX_CLUE_LEN,
            }
        );

        let err = SuspectName::new("y".repeat(MAX_NAME_LEN + 1)).unwrap_err();
        assert!(matches!(err, GameError::TooLong { kind: TextKind::Suspect, .. }));
    }

    #[test]
    fn limits_count_bytes() {
        // 40 two-byte characters: 80 bytes
        let text = "é".repeat(40);
        assert!(ClueText::new(text).is_err());
    }

    #[test]
    fn empty_text_is_rejected() {
        assert_eq!(RoomName::new("").unwrap_err(), GameError::EmptyText(TextKind::Room));
    }

    #[test]
    fn compares_against_plain_str() {
        let name = SuspectName::new("Freud").unwrap();
        assert_eq!(name, "Freud");
        assert_ne!(name, "freud");
    }
}
