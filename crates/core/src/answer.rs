//! The tagged answer type shared by every matcher and the router.
//!
//! Matchers never encode their outcome in message wording; they return one
//! of these variants and the presentation layer decides how to phrase
//! no-match and failure cases.

/// Outcome of one matcher attempt against one data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// A substantive text answer, ready to show to the user.
    Answered(String),

    /// The source was read successfully but produced nothing usable.
    NoMatch,

    /// The named source is missing or unreadable.
    NotFound(String),

    /// A retrieval or embedding backend failed; carries the failure detail.
    Backend(String),
}

impl Answer {
    /// Whether this outcome carries a substantive answer.
    pub fn is_answered(&self) -> bool {
        matches!(self, Answer::Answered(_))
    }

    /// Build an answer from formatted text.
    pub fn answered(text: impl Into<String>) -> Self {
        Answer::Answered(text.into())
    }
}
