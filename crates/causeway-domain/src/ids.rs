//! Identifier types backed by UUIDs
//!
//! Question and cause identifiers are UUIDv7, which sort chronologically.
//! User identifiers are opaque: they are issued by whatever authentication
//! layer sits in front of the engine.

use std::fmt;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u128);

        impl $name {
            /// Create an identifier from a raw u128 value
            ///
            /// This is primarily for storage layer deserialization.
            pub const fn from_value(value: u128) -> Self {
                Self(value)
            }

            /// Parse an identifier from its hyphenated UUID string form
            pub fn from_string(s: &str) -> Result<Self, String> {
                uuid::Uuid::parse_str(s)
                    .map(|u| Self(u.as_u128()))
                    .map_err(|e| format!("Invalid {} string: {}", stringify!($name), e))
            }

            /// Get the raw u128 value
            pub fn value(&self) -> u128 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", uuid::Uuid::from_u128(self.0))
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_string(s)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a question (UUIDv7)
    QuestionId
);

uuid_id!(
    /// Unique identifier for a cause (UUIDv7)
    CauseId
);

uuid_id!(
    /// Opaque identifier of the user owning or viewing a question
    UserId
);

impl QuestionId {
    /// Generate a new UUIDv7-based QuestionId
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }
}

impl Default for QuestionId {
    fn default() -> Self {
        Self::new()
    }
}

impl CauseId {
    /// Generate a new UUIDv7-based CauseId
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }
}

impl Default for CauseId {
    fn default() -> Self {
        Self::new()
    }
}

impl UserId {
    /// The nil user, used by single-user tools such as the CLI
    pub const fn local() -> Self {
        Self(0)
    }
}
