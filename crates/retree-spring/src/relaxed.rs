//! Property key matching, with and without Spring's relaxed binding.
//!
//! Under relaxed binding `spring.main.banner-mode`, `spring.main.bannerMode`,
//! `spring.main.banner_mode` and `SPRING.MAIN.BANNERMODE` are all the same
//! key. The requested key may contain `*` and `?` globs in either mode.

use globset::{Glob, GlobMatcher};

/// A compiled property key to compare candidate keys against.
#[derive(Debug, Clone)]
pub struct KeyMatcher {
    relaxed: bool,
    kind: Kind,
}

#[derive(Debug, Clone)]
enum Kind {
    Literal(String),
    Glob(GlobMatcher),
}

impl KeyMatcher {
    pub fn new(key: &str, relaxed: bool) -> KeyMatcher {
        let key = if relaxed { normalize(key) } else { key.to_string() };
        let kind = if key.contains(['*', '?']) {
            match Glob::new(&key) {
                Ok(glob) => Kind::Glob(glob.compile_matcher()),
                Err(_) => Kind::Literal(key),
            }
        } else {
            Kind::Literal(key)
        };
        KeyMatcher { relaxed, kind }
    }

    pub fn matches(&self, candidate: &str) -> bool {
        let normalized;
        let candidate = if self.relaxed {
            normalized = normalize(candidate);
            normalized.as_str()
        } else {
            candidate
        };
        match &self.kind {
            Kind::Literal(key) => key == candidate,
            Kind::Glob(glob) => glob.is_match(candidate),
        }
    }
}

/// Lower-case `key` and drop the `-` and `_` separators.
pub fn normalize(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}
