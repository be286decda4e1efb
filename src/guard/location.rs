use std::collections::BTreeMap;
use std::fmt;

use url::{form_urlencoded, Url};

/// A navigation target: path, query and history mode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: BTreeMap<String, String>,
    /// Replace the current history entry instead of pushing a new one
    pub replace: bool,
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Parse a raw target such as `/dashboard?tab=1`. Relative targets are
    /// taken from the root.
    pub fn parse(target: &str) -> Self {
        let parsed = Url::parse("http://panel.local/").and_then(|base| base.join(target));
        match parsed {
            Ok(url) => Self {
                path: url.path().to_string(),
                query: url.query_pairs().into_owned().collect(),
                replace: false,
            },
            Err(e) => {
                tracing::debug!("unparseable navigation target '{}': {}", target, e);
                Self::new(target)
            }
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn replacing(mut self) -> Self {
        self.replace = true;
        self
    }

    pub fn full_path(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish();
        format!("{}?{}", self.path, query)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_path())
    }
}

impl From<&str> for Location {
    fn from(target: &str) -> Self {
        Self::parse(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_path_and_query() {
        let loc = Location::parse("/article/list?page=2&sort=desc");
        assert_eq!(loc.path, "/article/list");
        assert_eq!(loc.query.get("page").map(String::as_str), Some("2"));
        assert_eq!(loc.query.len(), 2);
        assert!(!loc.replace);
    }

    #[test]
    fn relative_targets_start_at_root() {
        assert_eq!(Location::parse("dashboard").path, "/dashboard");
    }

    #[test]
    fn full_path_encodes_query() {
        let loc = Location::new("/login").with_query("redirect", "/permission/page");
        assert_eq!(loc.full_path(), "/login?redirect=%2Fpermission%2Fpage");
        assert_eq!(Location::parse(&loc.full_path()), loc);
    }
}
