//! Blank marker scanning for mad-lib templates.
//!
//! Two marker forms are recognised: keyed markers such as `{{BLANK_1}}`
//! (inner whitespace allowed) and runs of four or more underscores. A key
//! that appears more than once names a single blank; every underscore run
//! is its own blank.

use regex::Regex;
use std::collections::HashSet;
use std::ops::Range;
use std::sync::LazyLock;

static BLANK_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}|_{4,}").expect("blank marker pattern is valid")
});

/// One marker occurrence in a template.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct BlankMarker {
    /// Byte range of the marker in the template
    span: Range<usize>,
    /// Key of a `{{KEY}}` marker; `None` for underscore runs
    key: Option<String>,
}

impl BlankMarker {
    /// Start byte offset of the marker.
    pub fn start(&self) -> usize {
        self.span.start
    }

    /// End byte offset (exclusive) of the marker.
    pub fn end(&self) -> usize {
        self.span.end
    }
}

/// All markers in template-scan order, left to right.
pub fn scan_markers(template: &str) -> Vec<BlankMarker> {
    BLANK_MARKER
        .captures_iter(template)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(BlankMarker {
                span: whole.range(),
                key: caps.get(1).map(|key| key.as_str().to_string()),
            })
        })
        .collect()
}

/// Distinct keys of keyed markers, in order of first appearance.
pub fn template_keys(template: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    scan_markers(template)
        .into_iter()
        .filter_map(|marker| marker.key)
        .filter(|key| seen.insert(key.clone()))
        .collect()
}

/// Number of distinct blanks the template asks to be filled.
///
/// # Examples
///
/// ```
/// use huntcraft_story::distinct_blank_count;
///
/// assert_eq!(distinct_blank_count("The {{A}} met the {{B}}."), 2);
/// assert_eq!(distinct_blank_count("{{A}} and {{A}} again"), 1);
/// assert_eq!(distinct_blank_count("Find the ____ by the ______"), 2);
/// ```
pub fn distinct_blank_count(template: &str) -> usize {
    let markers = scan_markers(template);
    let underscore_runs = markers.iter().filter(|m| m.key.is_none()).count();
    let keys: HashSet<&str> = markers.iter().filter_map(|m| m.key.as_deref()).collect();
    underscore_runs + keys.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_mixed_markers() {
        let template = "A {{ BLANK_1 }} and ____ then {{BLANK_1}}.";
        let markers = scan_markers(template);
        assert_eq!(markers.len(), 3);
        assert_eq!(markers[0].key().as_deref(), Some("BLANK_1"));
        assert_eq!(&template[markers[0].start()..markers[0].end()], "{{ BLANK_1 }}");
        assert!(markers[1].key().is_none());
        assert_eq!(distinct_blank_count(template), 2);
    }

    #[test]
    fn test_short_underscores_are_text() {
        assert_eq!(distinct_blank_count("snake_case and ___ stay as text"), 0);
        assert_eq!(distinct_blank_count("{{not a key}}"), 0);
    }

    #[test]
    fn test_template_keys_first_appearance() {
        let keys = template_keys("{{B}} {{A}} {{B}} ____");
        assert_eq!(keys, vec!["B".to_string(), "A".to_string()]);
    }
}
