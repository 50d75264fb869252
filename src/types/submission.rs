//! Submission type: the document handed to a strategy.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Number of content characters that take part in the fingerprint.
pub const FINGERPRINT_CONTENT_PREFIX: usize = 500;

/// Length of the hex fingerprint.
pub const FINGERPRINT_LEN: usize = 12;

/// A submitted document.
///
/// Immutable once built; the word count is computed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SubmissionFields")]
pub struct Submission {
    submission_id: String,
    title: String,
    content: String,
    author: String,
    word_count: usize,
}

/// Serialized form accepted on input; derived fields are recomputed.
#[derive(Deserialize)]
struct SubmissionFields {
    submission_id: String,
    title: String,
    content: String,
    author: String,
}

impl From<SubmissionFields> for Submission {
    fn from(fields: SubmissionFields) -> Self {
        Self::new(fields.submission_id, fields.title, fields.content, fields.author)
    }
}

impl Submission {
    /// Creates a new submission.
    pub fn new(
        submission_id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        let content = content.into();
        let word_count = content.split_whitespace().count();
        Self {
            submission_id: submission_id.into(),
            title: title.into(),
            content,
            author: author.into(),
            word_count,
        }
    }

    /// Creates a submission with a generated identifier.
    pub fn anonymous(
        title: impl Into<String>,
        content: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self::new(uuid::Uuid::new_v4().to_string(), title, content, author)
    }

    pub fn submission_id(&self) -> &str {
        &self.submission_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    /// Short, non-cryptographic identity used in cache keys.
    ///
    /// Derived from the id, the title and the first
    /// [`FINGERPRINT_CONTENT_PREFIX`] characters of the content. Two
    /// submissions that agree on all three collide.
    pub fn fingerprint(&self) -> String {
        let prefix: String = self
            .content
            .chars()
            .take(FINGERPRINT_CONTENT_PREFIX)
            .collect();

        let mut hasher = Sha256::new();
        hasher.update(self.submission_id.as_bytes());
        hasher.update(b":");
        hasher.update(self.title.as_bytes());
        hasher.update(b":");
        hasher.update(prefix.as_bytes());

        let mut digest = hex::encode(hasher.finalize());
        digest.truncate(FINGERPRINT_LEN);
        digest
    }
}

impl std::fmt::Display for Submission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Submission('{}', {} words)", self.title, self.word_count)
    }
}
