//! Fragment identifier to page token translation.

use crate::{error::ShellError, token::PageToken};

/// What caused a route evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTrigger {
    InitialLoad,
    HashChange,
    /// Re-evaluation requested for a token equal to the current one, where
    /// setting the fragment identifier would not raise a change event.
    Forced,
}

#[derive(Debug, Clone)]
pub struct Router {
    default_page: String,
}

impl Router {
    pub fn new(default_page: &str) -> Result<Self, ShellError> {
        let default_page = default_page.trim();
        let default_page = default_page.strip_prefix('#').unwrap_or(default_page);
        if default_page.is_empty() {
            return Err(ShellError::InvalidDefaultPage);
        }
        Ok(Self {
            default_page: default_page.to_string(),
        })
    }

    pub fn default_page(&self) -> &str {
        &self.default_page
    }

    /// Page token for a fragment identifier (with or without `#`).
    pub fn resolve(&self, hash: &str) -> PageToken {
        PageToken::from_hash(hash, &self.default_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_with_default_substitution() {
        let router = Router::new("home").unwrap();
        assert_eq!(router.resolve(""), "home");
        assert_eq!(router.resolve("#"), "home");
        assert_eq!(router.resolve("#portfolio"), "portfolio");
    }

    #[test]
    fn rejects_empty_default() {
        assert!(matches!(Router::new("  "), Err(ShellError::InvalidDefaultPage)));
        assert!(matches!(Router::new("#"), Err(ShellError::InvalidDefaultPage)));
        assert_eq!(Router::new("#home").unwrap().default_page(), "home");
    }
}
