//! Tag scanning and value helpers shared by the actor and class readers.

use std::fmt;
use std::sync::LazyLock;

use cc_core::ClassThreshold;
use regex::Regex;

/// A bracketed tag found in note text, before interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTag {
    /// Normalised tag name: lowercase, no whitespace, `lazi` prefix removed.
    pub name: String,
    /// Everything after the name separator, trimmed.
    pub value: String,
    /// The tag exactly as written, for diagnostics.
    pub source: String,
}

/// A recognised tag whose value could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteWarning {
    /// The tag as written.
    pub tag: String,
    /// What was wrong with it.
    pub message: String,
}

impl NoteWarning {
    pub(crate) fn new(tag: &str, message: impl Into<String>) -> Self {
        let warning = Self {
            tag: tag.to_string(),
            message: message.into(),
        };
        tracing::warn!(tag = %warning.tag, "{}", warning.message);
        warning
    }
}

impl fmt::Display for NoteWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.tag, self.message)
    }
}

/// Every tag name this crate reads, with optional whitespace between words
/// and an optional `Lazi` prefix. The name is followed by `:` or a word
/// boundary; the value runs to the closing `>` and may not contain `<`.
const TAG_PATTERN: &str = r"(?i)<\s*(?P<name>(?:lazi\s*)?(?:give\s*class(?:\s*(?:disable|default))?|innate\s*skill(?:\s*base)?|learnable\s*class(?:\s*(?:base|and|or))?))\s*(?::|\b)(?P<value>[^<>]*)>";

static TAG_REGEX: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| Regex::new(TAG_PATTERN));

/// Find every recognised tag in `note`, in note order.
///
/// Anything else in the note, including other plugins' tags and stray
/// angle brackets in prose, is skipped. The colon after the name is
/// optional, so `<LaziGiveClass 3>` reads the same as `<LaziGiveClass:3>`.
pub fn scan_tags(note: &str) -> Vec<RawTag> {
    let regex = match TAG_REGEX.as_ref() {
        Ok(regex) => regex,
        Err(e) => {
            tracing::error!(error = %e, "tag pattern failed to compile");
            return Vec::new();
        }
    };
    regex
        .captures_iter(note)
        .filter_map(|caps| {
            let source = caps.get(0)?.as_str();
            Some(RawTag {
                name: normalise_name(caps.name("name")?.as_str()),
                value: caps.name("value")?.as_str().trim().to_string(),
                source: source.to_string(),
            })
        })
        .collect()
}

fn normalise_name(raw: &str) -> String {
    let name: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    match name.strip_prefix("lazi") {
        Some(stripped) => stripped.to_string(),
        None => name,
    }
}

/// Parse a comma-separated list of ids, reporting tokens that are not numbers.
pub(crate) fn parse_id_list(tag: &RawTag, value: &str, warnings: &mut Vec<NoteWarning>) -> Vec<u32> {
    value
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| match token.parse() {
            Ok(id) => Some(id),
            Err(_) => {
                warnings.push(NoteWarning::new(
                    &tag.source,
                    format!("'{token}' is not an id"),
                ));
                None
            }
        })
        .collect()
}

/// Parse exactly two comma-separated numbers.
pub(crate) fn parse_pair(value: &str) -> Option<(u32, u32)> {
    let mut parts = value.split(',').map(str::trim);
    let first = parts.next()?.parse().ok()?;
    let second = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((first, second))
}

/// Parse `|class,level||class,level|...` groups.
///
/// Malformed groups are reported and dropped; the result may be empty.
pub(crate) fn parse_threshold_groups(
    tag: &RawTag,
    value: &str,
    warnings: &mut Vec<NoteWarning>,
) -> Vec<ClassThreshold> {
    value
        .split('|')
        .map(str::trim)
        .filter(|group| !group.is_empty())
        .filter_map(|group| match parse_pair(group) {
            Some((class, level)) => Some(ClassThreshold::new(class.into(), level)),
            None => {
                warnings.push(NoteWarning::new(
                    &tag.source,
                    format!("'{group}' is not a class,level pair"),
                ));
                None
            }
        })
        .collect()
}

/// Split a value into its leading number and the remainder.
pub(crate) fn split_leading_id(value: &str) -> Option<(u32, &str)> {
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    let id = value[..end].parse().ok()?;
    Some((id, value[end..].trim()))
}
