use std::fmt;

/// Name of a page fragment, derived from the URL fragment identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageToken(String);

impl PageToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Strip one leading `#`; an empty remainder yields `default`.
    pub fn from_hash(hash: &str, default: &str) -> Self {
        let stripped = hash.strip_prefix('#').unwrap_or(hash);
        if stripped.is_empty() {
            Self(default.to_string())
        } else {
            Self(stripped.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PageToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for PageToken {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PageToken {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_hash_strips_separator_and_defaults() {
        assert_eq!(PageToken::from_hash("#about", "home"), "about");
        assert_eq!(PageToken::from_hash("about", "home"), "about");
        assert_eq!(PageToken::from_hash("#", "home"), "home");
        assert_eq!(PageToken::from_hash("", "home"), "home");
        assert_eq!(PageToken::from_hash("##x", "home"), "#x");
    }
}
