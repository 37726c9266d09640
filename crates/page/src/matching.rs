//! Userscript `@match` patterns.
//!
//! Supports the `scheme://host/path` shape:
//! - scheme `*` matches `http` and `https`;
//! - host `*` matches any host, `*.example.com` matches the domain and its subdomains;
//! - `*` in the path matches any run of characters.

use std::fmt;

/// Why a pattern string was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchPatternError {
    MissingScheme(String),
    UnsupportedScheme(String),
    MissingPath(String),
    InvalidHost(String),
}

impl fmt::Display for MatchPatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingScheme(p) => write!(f, "match pattern `{p}` has no scheme"),
            Self::UnsupportedScheme(s) => write!(f, "unsupported scheme `{s}`"),
            Self::MissingPath(p) => write!(f, "match pattern `{p}` has no path"),
            Self::InvalidHost(h) => write!(f, "invalid host `{h}`"),
        }
    }
}

impl std::error::Error for MatchPatternError {}

/// A parsed `@match` pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchPattern {
    scheme: String,
    host: String,
    path: String,
}

impl MatchPattern {
    pub fn parse(source: &str) -> Result<Self, MatchPatternError> {
        let (scheme, rest) = source
            .split_once("://")
            .ok_or_else(|| MatchPatternError::MissingScheme(source.to_string()))?;
        if !matches!(scheme, "*" | "http" | "https") {
            return Err(MatchPatternError::UnsupportedScheme(scheme.to_string()));
        }
        let slash = rest
            .find('/')
            .ok_or_else(|| MatchPatternError::MissingPath(source.to_string()))?;
        let (host, path) = rest.split_at(slash);
        let bare = host.strip_prefix("*.").unwrap_or(host);
        if host.is_empty() || (host != "*" && bare.contains('*')) {
            return Err(MatchPatternError::InvalidHost(host.to_string()));
        }
        Ok(Self {
            scheme: scheme.to_string(),
            host: host.to_ascii_lowercase(),
            path: path.to_string(),
        })
    }

    /// `true` if `url` is covered by this pattern.
    pub fn matches(&self, url: &str) -> bool {
        let Some((scheme, rest)) = url.split_once("://") else {
            return false;
        };
        let scheme_ok = match self.scheme.as_str() {
            "*" => matches!(scheme, "http" | "https"),
            s => s == scheme,
        };
        if !scheme_ok {
            return false;
        }
        let (authority, path) = match rest.find('/') {
            Some(i) => rest.split_at(i),
            None => (rest, "/"),
        };
        let host = authority
            .rsplit_once('@')
            .map_or(authority, |(_, h)| h)
            .split(':')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        let host_ok = match self.host.strip_prefix("*.") {
            _ if self.host == "*" => true,
            Some(domain) => host == domain || host.ends_with(&format!(".{domain}")),
            None => host == self.host,
        };
        host_ok && glob_match(&self.path, path)
    }
}

impl fmt::Display for MatchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.host, self.path)
    }
}

/// `*`-only glob over the whole of `text`.
fn glob_match(pattern: &str, text: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    if parts.len() == 1 {
        return pattern == text;
    }
    let (first, last) = (parts[0], parts[parts.len() - 1]);
    if !text.starts_with(first) || text.len() < first.len() + last.len() || !text.ends_with(last) {
        return false;
    }
    let mut rest = &text[first.len()..text.len() - last.len()];
    for part in &parts[1..parts.len() - 1] {
        match rest.find(part) {
            Some(i) => rest = &rest[i + part.len()..],
            None => return false,
        }
    }
    true
}
