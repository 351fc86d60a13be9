//! Import group policy
//!
//! A policy is the ordered list of groups from `importGroups`. Each import goes to
//! the first group claiming it; `Remaining` is checked last whatever its position,
//! so it only receives what no other group wanted.

use crate::config::{ImportGroupOrder, ImportGroupSetting};
use crate::error::{Error, Result};
use crate::resources::Import;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use tracing::debug;

/// `http:`, `node:`, `data:` and other URL schemes
static SCHEME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]*:").expect("scheme pattern is valid"));

/// JavaScript regex flags accepted after the closing `/`
const REGEX_FLAGS: &str = "gimsuy";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKeyword {
    /// Bare package names
    Modules,
    /// Side effect imports (`import 'zone.js';`)
    Plains,
    /// Relative paths
    Workspace,
    /// Everything no other group claimed
    Remaining,
}

impl GroupKeyword {
    fn parse(identifier: &str) -> Option<Self> {
        match identifier {
            "Modules" => Some(GroupKeyword::Modules),
            "Plains" => Some(GroupKeyword::Plains),
            "Workspace" => Some(GroupKeyword::Workspace),
            "Remaining" => Some(GroupKeyword::Remaining),
            _ => None,
        }
    }

    fn matches(self, import: &Import) -> bool {
        let library = import.library_name();
        match self {
            GroupKeyword::Modules => {
                !import.is_string_import()
                    && !library.starts_with('.')
                    && !library.starts_with('/')
                    && !SCHEME_RE.is_match(library)
            }
            GroupKeyword::Plains => import.is_string_import(),
            GroupKeyword::Workspace => !import.is_string_import() && library.starts_with('.'),
            GroupKeyword::Remaining => true,
        }
    }
}

#[derive(Debug, Clone)]
pub enum GroupMatcher {
    Keyword(GroupKeyword),
    /// Matches the library name; `source` is the identifier as configured
    Regex { source: String, regex: Regex },
}

#[derive(Debug, Clone)]
pub struct ImportGroup {
    pub matcher: GroupMatcher,
    pub order: ImportGroupOrder,
}

impl ImportGroup {
    pub fn parse(setting: &ImportGroupSetting) -> Result<Self> {
        let identifier = setting.identifier().trim();
        let matcher = match GroupKeyword::parse(identifier) {
            Some(keyword) => GroupMatcher::Keyword(keyword),
            None => GroupMatcher::Regex {
                source: identifier.to_string(),
                regex: parse_regex_literal(identifier)?,
            },
        };
        Ok(Self {
            matcher,
            order: setting.order(),
        })
    }

    pub fn is_remaining(&self) -> bool {
        matches!(self.matcher, GroupMatcher::Keyword(GroupKeyword::Remaining))
    }

    pub fn matches(&self, import: &Import) -> bool {
        match &self.matcher {
            GroupMatcher::Keyword(keyword) => keyword.matches(import),
            GroupMatcher::Regex { regex, .. } => regex.is_match(import.library_name()),
        }
    }
}

/// Parse a `/pattern/flags` identifier
///
/// The closing delimiter is the last unescaped `/`, so patterns may contain `/`
/// themselves: `/(@angular|react)/core/(.*)/` is one pattern.
pub fn parse_regex_literal(identifier: &str) -> Result<Regex> {
    let invalid = || Error::InvalidImportGroup(identifier.to_string());
    let body = identifier.strip_prefix('/').ok_or_else(invalid)?;

    let bytes = body.as_bytes();
    let closing = (0..bytes.len())
        .rev()
        .find(|&i| bytes[i] == b'/' && !is_escaped(bytes, i))
        .ok_or_else(invalid)?;

    let (pattern, flags) = (&body[..closing], &body[closing + 1..]);
    if pattern.is_empty() || !flags.chars().all(|flag| REGEX_FLAGS.contains(flag)) {
        return Err(invalid());
    }

    RegexBuilder::new(pattern)
        .case_insensitive(flags.contains('i'))
        .multi_line(flags.contains('m'))
        .dot_matches_new_line(flags.contains('s'))
        .build()
        .map_err(|source| Error::InvalidGroupRegex {
            pattern: identifier.to_string(),
            source,
        })
}

/// Odd number of backslashes right before `position`
fn is_escaped(bytes: &[u8], position: usize) -> bool {
    bytes[..position]
        .iter()
        .rev()
        .take_while(|&&b| b == b'\\')
        .count()
        % 2
        == 1
}

/// Ordered groups with exactly one `Remaining`
#[derive(Debug, Clone)]
pub struct ImportGroupPolicy {
    groups: Vec<ImportGroup>,
    remaining: usize,
}

impl ImportGroupPolicy {
    /// Validate and compile the configured groups; fails before any import is touched
    pub fn parse(settings: &[ImportGroupSetting]) -> Result<Self> {
        let groups = settings
            .iter()
            .map(ImportGroup::parse)
            .collect::<Result<Vec<_>>>()?;

        let mut remaining = groups.iter().enumerate().filter(|(_, g)| g.is_remaining());
        let position = match (remaining.next(), remaining.next()) {
            (Some((position, _)), None) => position,
            (None, _) => return Err(Error::MissingRemainingGroup),
            (Some(_), Some(_)) => return Err(Error::DuplicateRemainingGroup),
        };

        debug!(
            "Parsed import group policy: {} groups, Remaining at {}",
            groups.len(),
            position
        );
        Ok(Self {
            groups,
            remaining: position,
        })
    }

    pub fn groups(&self) -> &[ImportGroup] {
        &self.groups
    }

    /// Index of the group claiming `import`
    pub fn classify(&self, import: &Import) -> usize {
        self.groups
            .iter()
            .enumerate()
            .find(|(_, group)| !group.is_remaining() && group.matches(import))
            .map(|(position, _)| position)
            .unwrap_or(self.remaining)
    }

    /// Distribute imports over the groups, keeping their relative order
    pub fn assign(&self, imports: Vec<Import>) -> Vec<Vec<Import>> {
        let mut buckets: Vec<Vec<Import>> = vec![Vec::new(); self.groups.len()];
        for import in imports {
            buckets[self.classify(&import)].push(import);
        }
        buckets
    }
}
