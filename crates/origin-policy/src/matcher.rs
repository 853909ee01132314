//! Compiled Origin Matchers

use crate::policy::{OriginPolicy, PatternType};
use crate::OriginError;
use regex::Regex;

/// Matcher compiled once when a policy is stored
///
/// URL policies compare the origin string exactly; regex policies run an
/// unanchored search, so patterns bring their own anchors where needed.
#[derive(Debug, Clone)]
pub enum CompiledMatcher {
    Exact(String),
    Pattern(Regex),
}

impl CompiledMatcher {
    /// Compile the matcher for a policy
    pub fn compile(policy: &OriginPolicy) -> Result<Self, OriginError> {
        match policy.pattern_type {
            PatternType::Url => Ok(Self::Exact(policy.origin.clone())),
            PatternType::Regex => {
                let regex = Regex::new(&policy.origin)
                    .map_err(|e| OriginError::InvalidPattern(e.to_string()))?;
                Ok(Self::Pattern(regex))
            }
        }
    }

    pub fn is_match(&self, origin: &str) -> bool {
        match self {
            Self::Exact(literal) => literal == origin,
            Self::Pattern(regex) => regex.is_match(origin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::OriginDraft;
    use chrono::Utc;

    fn policy(origin: &str, pattern_type: PatternType) -> OriginPolicy {
        OriginDraft {
            origin: origin.to_string(),
            pattern_type,
            description: "test".to_string(),
            ..Default::default()
        }
        .into_policy(Utc::now())
    }

    #[test]
    fn test_exact_match() {
        let matcher =
            CompiledMatcher::compile(&policy("https://example.com", PatternType::Url)).unwrap();
        assert!(matcher.is_match("https://example.com"));
        assert!(!matcher.is_match("https://example.com/path"));
        assert!(!matcher.is_match("https://other.com"));
    }

    #[test]
    fn test_regex_match() {
        let matcher = CompiledMatcher::compile(&policy(
            r".*\.staging\.example\.com$",
            PatternType::Regex,
        ))
        .unwrap();
        assert!(matcher.is_match("https://web.staging.example.com"));
        assert!(!matcher.is_match("https://web.example.com"));
    }

    #[test]
    fn test_alternation_pattern() {
        let matcher =
            CompiledMatcher::compile(&policy(r"https://(dev|test)\..*", PatternType::Regex))
                .unwrap();
        assert!(matcher.is_match("https://dev.example.com"));
        assert!(matcher.is_match("https://test.example.com"));
        assert!(!matcher.is_match("https://prod.example.com"));
    }

    #[test]
    fn test_invalid_pattern_fails_compile() {
        assert!(CompiledMatcher::compile(&policy("([", PatternType::Regex)).is_err());
    }
}
