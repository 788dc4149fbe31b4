//! Text and path matching primitives shared by the text rule, the directory
//! rule and the path filter.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// How a pattern is compared against a column value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchCondition {
    #[default]
    Contains,
    NotContains,
    Equals,
    StartsWith,
    EndsWith,
}

impl MatchCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchCondition::Contains => "contains",
            MatchCondition::NotContains => "notContains",
            MatchCondition::Equals => "equals",
            MatchCondition::StartsWith => "startsWith",
            MatchCondition::EndsWith => "endsWith",
        }
    }

    fn apply(&self, text: &str, pattern: &str) -> bool {
        match self {
            MatchCondition::Contains => text.contains(pattern),
            MatchCondition::NotContains => !text.contains(pattern),
            MatchCondition::Equals => text == pattern,
            MatchCondition::StartsWith => text.starts_with(pattern),
            MatchCondition::EndsWith => text.ends_with(pattern),
        }
    }
}

/// Which part of an entry path a text rule looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextColumn {
    FolderPath,
    FileName,
    #[default]
    FullPath,
}

impl TextColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextColumn::FolderPath => "folderPath",
            TextColumn::FileName => "fileName",
            TextColumn::FullPath => "fullPath",
        }
    }
}

/// Match modes offered by the path filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PathMatchMode {
    #[default]
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
}

impl From<PathMatchMode> for MatchCondition {
    fn from(mode: PathMatchMode) -> Self {
        match mode {
            PathMatchMode::Contains => MatchCondition::Contains,
            PathMatchMode::NotContains => MatchCondition::NotContains,
            PathMatchMode::StartsWith => MatchCondition::StartsWith,
            PathMatchMode::EndsWith => MatchCondition::EndsWith,
        }
    }
}

#[derive(Debug, Clone)]
enum MatcherKind {
    /// Empty pattern: nothing matches
    Never,
    Regex(Regex),
    Literal {
        pattern: String,
        condition: MatchCondition,
        case_sensitive: bool,
    },
}

/// A pattern compiled once and applied to many values.
///
/// In regex mode the condition is ignored and a match anywhere in the value
/// counts.
#[derive(Debug, Clone)]
pub struct TextMatcher {
    kind: MatcherKind,
}

impl TextMatcher {
    pub fn new(
        pattern: &str,
        condition: MatchCondition,
        case_sensitive: bool,
        use_regex: bool,
    ) -> Result<Self, EngineError> {
        let kind = if pattern.is_empty() {
            MatcherKind::Never
        } else if use_regex {
            let regex = RegexBuilder::new(pattern)
                .case_insensitive(!case_sensitive)
                .build()
                .map_err(|e| EngineError::InvalidPattern {
                    pattern: pattern.to_string(),
                    message: e.to_string(),
                })?;
            MatcherKind::Regex(regex)
        } else {
            MatcherKind::Literal {
                pattern: if case_sensitive {
                    pattern.to_string()
                } else {
                    pattern.to_lowercase()
                },
                condition,
                case_sensitive,
            }
        };
        Ok(Self { kind })
    }

    pub fn is_match(&self, text: &str) -> bool {
        match &self.kind {
            MatcherKind::Never => false,
            MatcherKind::Regex(regex) => regex.is_match(text),
            MatcherKind::Literal {
                pattern,
                condition,
                case_sensitive: true,
            } => condition.apply(text, pattern),
            MatcherKind::Literal { pattern, condition, .. } => {
                condition.apply(&text.to_lowercase(), pattern)
            }
        }
    }
}

/// One-shot text match. An empty pattern or an invalid regex never matches.
pub fn match_text(
    text: &str,
    pattern: &str,
    condition: MatchCondition,
    case_sensitive: bool,
    use_regex: bool,
) -> bool {
    TextMatcher::new(pattern, condition, case_sensitive, use_regex)
        .map(|matcher| matcher.is_match(text))
        .unwrap_or(false)
}

fn last_separator(path: &str) -> Option<usize> {
    path.rfind(|c: char| c == '/' || c == '\\')
}

/// Extract the requested column from a path.
///
/// Paths without a separator are all file name and have an empty folder.
pub fn get_column_value(path: &str, column: TextColumn) -> &str {
    match column {
        TextColumn::FullPath => path,
        TextColumn::FileName => match last_separator(path) {
            Some(idx) => &path[idx + 1..],
            None => path,
        },
        TextColumn::FolderPath => get_directory(path),
    }
}

/// Parent directory of a path, or "" for bare names and root-level files
pub fn get_directory(path: &str) -> &str {
    match last_separator(path) {
        Some(idx) if idx > 0 => &path[..idx],
        _ => "",
    }
}

fn normalize_path(path: &str) -> String {
    path.replace('\\', "/").to_lowercase()
}

/// Whether `path` is `dir` itself or lies anywhere below it.
///
/// Separators and case are normalized, so `C:\Data\x` is inside `c:/data`.
/// An empty directory contains nothing.
pub fn is_in_directory(path: &str, dir: &str) -> bool {
    if dir.is_empty() {
        return false;
    }
    let path = normalize_path(path);
    let dir = normalize_path(dir);
    let trimmed = dir.trim_end_matches('/');

    if path == dir || path == trimmed {
        return true;
    }

    let prefix = format!("{trimmed}/");
    path.starts_with(&prefix) || get_directory(&path) == trimmed
}

pub fn is_valid_regex(pattern: &str) -> bool {
    Regex::new(pattern).is_ok()
}

/// Path filter match: literal only, false for an empty path or pattern
pub fn match_path(path: &str, pattern: &str, mode: PathMatchMode, case_sensitive: bool) -> bool {
    if path.is_empty() || pattern.is_empty() {
        return false;
    }
    match_text(path, pattern, mode.into(), case_sensitive, false)
}
