//! Path template matching.

use std::collections::BTreeMap;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use regex::Regex;

use crate::error::{MatcherError, Result};

/// Path parameters keyed by name.
pub type Params = BTreeMap<String, String>;

/// Characters escaped when a parameter value is written into a single segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Same as [`SEGMENT`] but keeps `/`, for wildcard tails.
const TAIL: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// A segment in a path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A literal string segment.
    Literal(String),
    /// A required parameter segment (e.g., `:id`).
    Param(String),
    /// An optional parameter segment (e.g., `:page?`).
    Optional(String),
    /// A wildcard tail (e.g., `*rest`), matches the remainder of the path.
    Wildcard(String),
}

/// A compiled path template for matching URLs.
#[derive(Debug, Clone)]
pub struct PathPattern {
    /// The original template string.
    pattern: String,
    /// Parsed segments.
    segments: Vec<PathSegment>,
    /// Compiled regex for matching.
    regex: Regex,
    /// Parameter names in capture order.
    param_names: Vec<String>,
}

impl PathPattern {
    /// Parses a path template string.
    ///
    /// Template syntax:
    /// - `/users` - Literal path
    /// - `/users/:id` - Path with parameter
    /// - `/posts/:page?` - Optional parameter
    /// - `/files/*path` - Wildcard parameter (matches rest of path)
    ///
    /// # Example
    ///
    /// ```
    /// use oxide_nav_matcher::PathPattern;
    ///
    /// let pattern = PathPattern::new("/posts/:id/comments/:comment_id").unwrap();
    /// let params = pattern.match_path("/posts/123/comments/456").unwrap();
    /// assert_eq!(params.get("id").map(String::as_str), Some("123"));
    /// assert_eq!(params.get("comment_id").map(String::as_str), Some("456"));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError::InvalidPattern`] for empty or malformed parameter
    /// names and for a wildcard that is not the last segment, and
    /// [`MatcherError::DuplicateParam`] when a name is used twice.
    pub fn new(pattern: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut param_names: Vec<String> = Vec::new();
        let mut regex_str = String::from("^");

        let parts: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
        for (index, part) in parts.iter().enumerate() {
            let segment = if let Some(name) = part.strip_prefix(':') {
                match name.strip_suffix('?') {
                    Some(name) => PathSegment::Optional(valid_name(pattern, name)?),
                    None => PathSegment::Param(valid_name(pattern, name)?),
                }
            } else if let Some(name) = part.strip_prefix('*') {
                if index + 1 != parts.len() {
                    return Err(invalid(pattern, "wildcard must be the last segment"));
                }
                PathSegment::Wildcard(valid_name(pattern, name)?)
            } else {
                PathSegment::Literal((*part).to_string())
            };

            match &segment {
                PathSegment::Literal(s) => {
                    regex_str.push('/');
                    regex_str.push_str(&regex::escape(s));
                }
                PathSegment::Param(name) => {
                    regex_str.push_str("/([^/]+)");
                    param_names.push(name.clone());
                }
                PathSegment::Optional(name) => {
                    regex_str.push_str("(?:/([^/]+))?");
                    param_names.push(name.clone());
                }
                PathSegment::Wildcard(name) => {
                    regex_str.push_str("/(.+)");
                    param_names.push(name.clone());
                }
            }
            segments.push(segment);
        }

        for (i, name) in param_names.iter().enumerate() {
            if param_names[..i].contains(name) {
                return Err(MatcherError::DuplicateParam {
                    pattern: pattern.to_string(),
                    param: name.clone(),
                });
            }
        }

        regex_str.push_str("/?$");

        let regex = Regex::new(&regex_str).map_err(|e| invalid(pattern, &e.to_string()))?;

        Ok(Self {
            pattern: pattern.to_string(),
            segments,
            regex,
            param_names,
        })
    }

    /// Attempts to match a path (without query string) against this template.
    ///
    /// Returns percent-decoded parameters if the path matches. Optional
    /// parameters that are absent from the path are absent from the result.
    /// Paths must start with `/`.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<Params> {
        if !path.starts_with('/') {
            return None;
        }
        let caps = self.regex.captures(path)?;

        let mut params = Params::new();

        for (i, name) in self.param_names.iter().enumerate() {
            if let Some(value) = caps.get(i + 1) {
                let decoded = percent_decode_str(value.as_str()).decode_utf8_lossy();
                params.insert(name.clone(), decoded.into_owned());
            }
        }

        Some(params)
    }

    /// Returns the original template string.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the parsed segments.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Returns the parameter names.
    #[must_use]
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Generates a path from parameters.
    ///
    /// Returns `None` when a required parameter is missing. Values are
    /// percent-encoded.
    ///
    /// # Example
    ///
    /// ```
    /// use oxide_nav_matcher::{Params, PathPattern};
    ///
    /// let pattern = PathPattern::new("/foo/:a/:b").unwrap();
    /// let params: Params = [("a", "1"), ("b", "2")]
    ///     .into_iter()
    ///     .map(|(k, v)| (k.to_string(), v.to_string()))
    ///     .collect();
    /// assert_eq!(pattern.reverse(&params).unwrap(), "/foo/1/2");
    /// ```
    #[must_use]
    pub fn reverse(&self, params: &Params) -> Option<String> {
        let mut path = String::new();

        for segment in &self.segments {
            match segment {
                PathSegment::Literal(s) => {
                    path.push('/');
                    path.push_str(s);
                }
                PathSegment::Param(name) => {
                    path.push('/');
                    path.extend(utf8_percent_encode(params.get(name)?, SEGMENT));
                }
                PathSegment::Optional(name) => {
                    if let Some(value) = params.get(name) {
                        path.push('/');
                        path.extend(utf8_percent_encode(value, SEGMENT));
                    }
                }
                PathSegment::Wildcard(name) => {
                    path.push('/');
                    path.extend(utf8_percent_encode(params.get(name)?, TAIL));
                }
            }
        }

        if path.is_empty() {
            path.push('/');
        }

        Some(path)
    }

    /// Returns the first required parameter absent from `params`.
    #[must_use]
    pub fn missing_param(&self, params: &Params) -> Option<&str> {
        self.segments.iter().find_map(|segment| match segment {
            PathSegment::Param(name) | PathSegment::Wildcard(name)
                if !params.contains_key(name) =>
            {
                Some(name.as_str())
            }
            _ => None,
        })
    }
}

fn valid_name(pattern: &str, name: &str) -> Result<String> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid(pattern, &format!("bad parameter name '{name}'")));
    }
    Ok(name.to_string())
}

fn invalid(pattern: &str, reason: &str) -> MatcherError {
    MatcherError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: reason.to_string(),
    }
}
