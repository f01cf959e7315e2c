//! Question module - the problem statement a causal diagram explains

use crate::{QuestionId, UserId};

/// Visibility scope of a question and its causes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Visible to the owner only
    #[default]
    Private,

    /// Visible to the owner and to privileged (supervising) users
    Supervised,
}

impl Mode {
    /// Get the mode name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Private => "private",
            Mode::Supervised => "supervised",
        }
    }

    /// Parse a mode from a string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "private" => Some(Mode::Private),
            "supervised" => Some(Mode::Supervised),
            _ => None,
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid mode: {}", s))
    }
}

/// A problem statement: the root of a "why" diagram
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    /// Unique identifier
    pub id: QuestionId,

    /// User who created the question
    pub owner: UserId,

    /// The problem statement itself
    pub text: String,

    /// Visibility scope
    pub mode: Mode,

    /// When this question was created (seconds since Unix epoch)
    pub created_at: u64,
}

impl Question {
    /// Create a new question with a fresh identifier
    pub fn new(owner: UserId, text: impl Into<String>, mode: Mode, created_at: u64) -> Self {
        Self {
            id: QuestionId::new(),
            owner,
            text: text.into(),
            mode,
            created_at,
        }
    }

    /// Whether the given user owns this question
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner == user
    }

    /// Whether a viewer may see this question
    ///
    /// Private questions are visible to their owner only. Supervised
    /// questions are additionally visible to privileged viewers.
    pub fn is_visible_to(&self, viewer: &Viewer) -> bool {
        if self.is_owned_by(viewer.id) {
            return true;
        }
        match self.mode {
            Mode::Private => false,
            Mode::Supervised => viewer.privileged,
        }
    }
}

/// The caller on whose behalf a question is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer {
    /// Authenticated user id
    pub id: UserId,

    /// Staff or administrator rights
    pub privileged: bool,
}

impl Viewer {
    /// A regular, unprivileged viewer
    pub fn user(id: UserId) -> Self {
        Self { id, privileged: false }
    }

    /// A privileged (supervising) viewer
    pub fn supervisor(id: UserId) -> Self {
        Self { id, privileged: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> UserId {
        UserId::from_value(1)
    }

    fn stranger() -> UserId {
        UserId::from_value(2)
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!(Mode::parse("PRIVATE"), Some(Mode::Private));
        assert_eq!(Mode::parse("supervised"), Some(Mode::Supervised));
        assert_eq!(Mode::parse("public"), None);
        assert!("nope".parse::<Mode>().is_err());
    }

    #[test]
    fn test_private_question_visibility() {
        let q = Question::new(owner(), "Why did the build break?", Mode::Private, 0);

        assert!(q.is_visible_to(&Viewer::user(owner())));
        assert!(!q.is_visible_to(&Viewer::user(stranger())));
        assert!(!q.is_visible_to(&Viewer::supervisor(stranger())));
    }

    #[test]
    fn test_supervised_question_visibility() {
        let q = Question::new(owner(), "Why did the build break?", Mode::Supervised, 0);

        assert!(q.is_visible_to(&Viewer::user(owner())));
        assert!(!q.is_visible_to(&Viewer::user(stranger())));
        assert!(q.is_visible_to(&Viewer::supervisor(stranger())));
    }
}
