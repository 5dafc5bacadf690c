//! Keyword expansion into the auth-guard matcher
//!
//! Every keyword is escaped and expanded into nine textual shapes that PHP
//! auth code usually takes (bare identifier, `$k[`, `k(`, `require ... k.php`,
//! `extends k`, `use ... k`, `$k`, `$_k` and `$k == 1`). All shapes of all
//! keywords are joined into one case-insensitive alternation.
//!
//! The generated source text is shown to users and saved in reports, so its
//! layout is stable: keyword by keyword, shape by shape.

use crate::error::{AuthScanError, Result};
use regex::{Regex, RegexBuilder};
use std::fmt;

/// Default keywords for ThinkPHP-style projects
pub const DEFAULT_KEYWORDS: &[&str] = &["session", "auth", "login", "AdminBase", "AuthBase"];

/// Ordered set of literal keywords
///
/// Keywords are stored exactly as entered. Duplicates keep their first
/// position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    /// Build a keyword set, rejecting an empty list or blank keywords
    pub fn new<I, S>(keywords: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for keyword in keywords {
            let keyword = keyword.into();
            if keyword.trim().is_empty() {
                return Err(AuthScanError::invalid_configuration(
                    "keywords must not be empty",
                ));
            }
            if !unique.contains(&keyword) {
                unique.push(keyword);
            }
        }

        if unique.is_empty() {
            return Err(AuthScanError::invalid_configuration(
                "at least one keyword is required",
            ));
        }

        Ok(Self { keywords: unique })
    }

    /// Parse a whitespace separated keyword line, e.g. `"session auth login"`
    pub fn parse(line: &str) -> Result<Self> {
        Self::new(line.split_whitespace())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.keywords
    }
}

impl Default for KeywordSet {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl fmt::Display for KeywordSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.keywords.join(" "))
    }
}

/// The nine shapes for one already-escaped keyword, in report order
fn keyword_shapes(k: &str) -> [String; 9] {
    [
        format!(r"\b{k}\b"),
        format!(r"\${k}\["),
        format!(r"{k}\("),
        format!(r"require.*{k}\.php"),
        format!(r"extends\s+{k}"),
        format!(r"use\s+.*{k}"),
        format!(r"\${k}\b"),
        format!(r"\$_{k}\b"),
        format!(r#"\${k}\s*[=!]=\s*['"]?\d['"]?"#),
    ]
}

/// Generate the alternation source text for a keyword set
pub fn build_pattern(keywords: &KeywordSet) -> String {
    keywords
        .iter()
        .flat_map(|keyword| keyword_shapes(&regex::escape(keyword)))
        .collect::<Vec<_>>()
        .join("|")
}

/// Compiled auth-guard matcher together with its source text
#[derive(Debug, Clone)]
pub struct CompiledMatcher {
    regex: Regex,
    source: String,
}

impl CompiledMatcher {
    /// Compile the matcher for a keyword set
    ///
    /// Matching is case-insensitive and unanchored. `.` also matches line
    /// breaks, so the `require ... k.php` and `use ... k` shapes may span
    /// several lines.
    pub fn compile(keywords: &KeywordSet) -> Result<Self> {
        let source = build_pattern(keywords);
        let regex = RegexBuilder::new(&source)
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()?;

        tracing::debug!(
            "Compiled auth pattern for {} keywords ({} bytes)",
            keywords.len(),
            source.len()
        );

        Ok(Self { regex, source })
    }

    /// Shorthand for [`KeywordSet::new`] followed by [`CompiledMatcher::compile`]
    pub fn from_keywords<I, S>(keywords: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::compile(&KeywordSet::new(keywords)?)
    }

    /// True when the text references any keyword in any recognized shape
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// First guard found in the text, if any
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex.find(text).map(|m| m.as_str())
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for CompiledMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(keywords: &[&str]) -> CompiledMatcher {
        CompiledMatcher::from_keywords(keywords.iter().copied()).unwrap()
    }

    #[test]
    fn test_pattern_source_single_keyword() {
        let keywords = KeywordSet::new(["auth"]).unwrap();
        assert_eq!(
            build_pattern(&keywords),
            r#"\bauth\b|\$auth\[|auth\(|require.*auth\.php|extends\s+auth|use\s+.*auth|\$auth\b|\$_auth\b|\$auth\s*[=!]=\s*['"]?\d['"]?"#
        );
    }

    #[test]
    fn test_pattern_source_keeps_keyword_order() {
        let source = matcher(&["session", "AdminBase"]).source().to_string();
        let session = source.find(r"\bsession\b").unwrap();
        let admin = source.find(r"\bAdminBase\b").unwrap();
        assert!(session < admin);
        assert!(source.starts_with(r"\bsession\b|\$session\["));
        assert!(source.ends_with(r#"\$AdminBase\s*[=!]=\s*['"]?\d['"]?"#));
        assert_eq!(source.split('|').count(), 18);

        // Same input, same text
        assert_eq!(source, matcher(&["session", "AdminBase"]).source());
    }

    #[test]
    fn test_every_shape_matches() {
        let m = matcher(&["auth"]);
        let samples = [
            "<?php\nauth;",
            "<?php\n$auth['uid'];",
            "<?php\n$this->auth();",
            "<?php\nrequire_once __DIR__ . '/common/auth.php';",
            "<?php\nclass Index extends auth_base {}",
            "<?php\nuse app\\common\\Auth;",
            "<?php\nreturn $auth;",
            "<?php\n$_auth = 1;",
            "<?php\nif ($auth != '1') exit;",
        ];
        for sample in samples {
            assert!(m.is_match(sample), "expected a match for {sample:?}");
        }
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let m = matcher(&["session", "auth"]);
        assert!(m.is_match("<?php\nif ($_SESSION['user']) { }"));
        assert!(m.is_match("<?php\nAUTH::check();"));
    }

    #[test]
    fn test_extends_base_class() {
        let m = matcher(&["AdminBase"]);
        assert!(m.is_match("<?php\nclass Foo extends AdminBase {}"));
        assert!(m.is_match("<?php\nclass Foo extends\n    adminbase {}"));
    }

    #[test]
    fn test_unrelated_code_does_not_match() {
        let m = matcher(&["auth"]);
        assert!(!m.is_match("<?php\necho \"hello\";"));
        assert!(!m.is_match("<?php\n$author = 'me';"));
    }

    #[test]
    fn test_keywords_are_escaped() {
        let m = matcher(&["is.admin"]);
        assert!(m.source().contains(r"is\.admin"));
        assert!(m.is_match("<?php\nif (is.admin) {}"));
        assert!(!m.is_match("<?php\nif (isXadmin) {}"));

        // Would be an invalid regex if it were not escaped
        assert!(CompiledMatcher::from_keywords(["check(", "[role"]).is_ok());
    }

    #[test]
    fn test_require_and_use_spans_cross_lines() {
        // Known-permissive: the span after require/use is unbounded
        let m = matcher(&["login"]);
        assert!(m.is_match("<?php\nrequire 'db.php';\n// see docs/login.php"));

        let m = matcher(&["Guard"]);
        assert!(m.is_match("<?php\nuse app\\model\\User;\n$x = new MyGuardian;"));
    }

    #[test]
    fn test_comparison_shape() {
        let m = matcher(&["isadmin"]);
        assert!(m.is_match("<?php if($isAdmin==1){}"));
        assert!(m.is_match("<?php if($isAdmin  !=  \"0\"){}"));
    }

    #[test]
    fn test_find_returns_guard_text() {
        let m = matcher(&["auth"]);
        assert_eq!(m.find("<?php\n$this->auth();"), Some("auth"));
        assert_eq!(m.find("<?php\necho 1;"), None);
    }

    #[test]
    fn test_empty_keywords_rejected() {
        let err = CompiledMatcher::from_keywords(Vec::<String>::new()).unwrap_err();
        assert!(err.is_configuration());
        assert!(KeywordSet::parse("   ").is_err());
    }

    #[test]
    fn test_blank_keyword_rejected() {
        let err = KeywordSet::new(["auth", ""]).unwrap_err();
        assert!(matches!(err, AuthScanError::InvalidConfiguration(_)));
        assert!(KeywordSet::new(["auth", "  "]).is_err());
    }

    #[test]
    fn test_keyword_set_parse_and_dedup() {
        let keywords = KeywordSet::parse("  session auth\tlogin auth ").unwrap();
        assert_eq!(keywords.as_slice(), &["session", "auth", "login"]);
        assert_eq!(keywords.to_string(), "session auth login");
    }

    #[test]
    fn test_default_keywords() {
        let keywords = KeywordSet::default();
        assert_eq!(keywords.len(), 5);
        assert_eq!(keywords.to_string(), "session auth login AdminBase AuthBase");
    }
}
