//! Layered string properties and the `.properties` text format.
//!
//! [`Properties`] is a string-to-string mapping with an optional parent
//! fallback map: lookups check the local layer first and miss through to the
//! parent chain. Parents are snapshots held behind `Arc`, so writing to a
//! child never changes its parent, and layering is cheap relative to the
//! size of a configuration map.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;

use crate::error::ConfigError;

/// Ordered string-to-string mapping with an optional parent fallback map.
///
/// Iteration and flattened views are deterministic (sorted key order).
/// Equality compares the effective flattened entries, so two maps with
/// different layer structure but the same visible values are equal.
#[derive(Debug, Clone, Default)]
pub struct Properties {
    local: BTreeMap<String, String>,
    parent: Option<Arc<Properties>>,
}

impl Properties {
    /// New empty map with no parent
    pub fn new() -> Self {
        Self::default()
    }

    /// New empty layer whose parent is a snapshot of `self`.
    ///
    /// This is the layering primitive: entries set on the child shadow the
    /// snapshot without touching it.
    pub fn child(&self) -> Self {
        Properties {
            local: BTreeMap::new(),
            parent: Some(Arc::new(self.clone())),
        }
    }

    /// Re-root the effective entries of `self` as a layer over a snapshot
    /// of `parent`.
    pub fn layer_over(self, parent: &Properties) -> Self {
        Properties {
            local: self.to_map(),
            parent: Some(Arc::new(parent.clone())),
        }
    }

    /// Look up `key`, missing through to the parent chain. First match wins.
    pub fn get(&self, key: &str) -> Option<&str> {
        match self.local.get(key) {
            Some(value) => Some(value.as_str()),
            None => self.parent.as_deref().and_then(|p| p.get(key)),
        }
    }

    /// Set `key` in the local layer only.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.local.insert(key.into(), value.into());
    }

    /// Whether `key` is set anywhere in the chain
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// The parent layer, if any
    pub fn parent(&self) -> Option<&Properties> {
        self.parent.as_deref()
    }

    /// Effective key set across the whole chain, sorted.
    pub fn names(&self) -> BTreeSet<String> {
        let mut names = match self.parent.as_deref() {
            Some(parent) => parent.names(),
            None => BTreeSet::new(),
        };
        names.extend(self.local.keys().cloned());
        names
    }

    /// Effective entries across the whole chain, sorted by key.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        let mut map = match self.parent.as_deref() {
            Some(parent) => parent.to_map(),
            None => BTreeMap::new(),
        };
        map.extend(self.local.iter().map(|(k, v)| (k.clone(), v.clone())));
        map
    }

    /// Number of effective keys
    pub fn len(&self) -> usize {
        self.names().len()
    }

    /// Whether no key is visible anywhere in the chain
    pub fn is_empty(&self) -> bool {
        self.local.is_empty() && self.parent.as_deref().is_none_or(Properties::is_empty)
    }

    /// Flatten the whole chain into a standalone map with no parent.
    ///
    /// The copy is frozen: later changes to any layer of `self` do not show
    /// through it.
    pub fn detach(&self) -> Properties {
        Properties {
            local: self.to_map(),
            parent: None,
        }
    }

    /// Extract all effective keys beginning with `prefix` followed by a dot,
    /// stripped of that prefix, into a plain unordered map.
    ///
    /// Keys not under the prefix are excluded, as is the bare `prefix.` key
    /// with nothing after the dot.
    pub fn as_map(&self, prefix: &str) -> HashMap<String, String> {
        let prefix = format!("{prefix}.");
        self.to_map()
            .into_iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(&prefix)
                    .filter(|rest| !rest.is_empty())
                    .map(|rest| (rest.to_string(), value))
            })
            .collect()
    }

    /// Parse `.properties` text into a standalone map.
    ///
    /// The format is line-oriented:
    /// - one `key=value` (or `key:value`) pair per logical line; the first
    ///   unescaped `=` or `:` separates key from value, and a line with no
    ///   separator is a key with an empty value;
    /// - surrounding whitespace of key and value is trimmed;
    /// - blank lines and lines whose first non-blank character is `#` or `!`
    ///   are comments;
    /// - a trailing `\` joins the next line, dropping its leading whitespace;
    /// - escapes `\\`, `\n`, `\t`, `\r`, `\f`, `\uXXXX` and escaped
    ///   separators are honored; an unrecognized escape keeps the escaped
    ///   character;
    /// - a later occurrence of a key overwrites an earlier one.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for a malformed `\uXXXX` escape.
    pub fn parse(text: &str) -> Result<Properties, ConfigError> {
        let mut props = Properties::new();
        let mut lines = text.lines().enumerate();

        while let Some((index, raw)) = lines.next() {
            let first = raw.trim_start();
            if first.is_empty() || first.starts_with(['#', '!']) {
                continue;
            }

            let line_number = index + 1;
            let mut logical = first.to_string();
            while ends_with_odd_backslashes(&logical) {
                logical.pop();
                match lines.next() {
                    Some((_, continuation)) => logical.push_str(continuation.trim_start()),
                    None => break,
                }
            }

            let (raw_key, raw_value) = split_pair(&logical);
            let key = unescape(raw_key.trim(), line_number)?;
            let value = unescape(raw_value.trim(), line_number)?;
            props.local.insert(key, value);
        }

        Ok(props)
    }

    /// Read and parse a `.properties` file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read and
    /// [`ConfigError::Parse`] when its content is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Properties, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Properties::parse(&text)
    }
}

impl PartialEq for Properties {
    fn eq(&self, other: &Self) -> bool {
        self.to_map() == other.to_map()
    }
}

impl Eq for Properties {}

impl FromIterator<(String, String)> for Properties {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Properties {
            local: iter.into_iter().collect(),
            parent: None,
        }
    }
}

impl From<BTreeMap<String, String>> for Properties {
    fn from(map: BTreeMap<String, String>) -> Self {
        Properties {
            local: map,
            parent: None,
        }
    }
}

/// Whether the line ends in an odd run of backslashes, i.e. an unescaped
/// continuation marker.
fn ends_with_odd_backslashes(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Split at the first unescaped `=` or `:`. A line with neither is all key.
fn split_pair(line: &str) -> (&str, &str) {
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => return (&line[..i], &line[i + 1..]),
            _ => {}
        }
    }
    (line, "")
}

fn unescape(s: &str, line: usize) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{000c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                if hex.len() < 4 {
                    return Err(ConfigError::parse(line, "truncated \\u escape"));
                }
                let code = u32::from_str_radix(&hex, 16)
                    .map_err(|_| ConfigError::parse(line, format!("bad \\u escape '\\u{hex}'")))?;
                match char::from_u32(code) {
                    Some(ch) => out.push(ch),
                    None => {
                        return Err(ConfigError::parse(
                            line,
                            format!("\\u{hex} is not a character"),
                        ));
                    }
                }
            }
            // \\, escaped separators, and anything else: the character stands
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    Ok(out)
}
