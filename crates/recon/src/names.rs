use serde::Serialize;

/// Normalized (first, last) name used to join the two sources.
///
/// Case and surrounding whitespace are ignored. Two different people with the
/// same name collide, and nicknames or variant spellings never match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NameKey {
    pub first: String,
    pub last: String,
}

impl NameKey {
    pub fn new(first: &str, last: &str) -> Self {
        Self {
            first: first.trim().to_lowercase(),
            last: last.trim().to_lowercase(),
        }
    }
}

impl std::fmt::Display for NameKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.first, self.last)
    }
}
