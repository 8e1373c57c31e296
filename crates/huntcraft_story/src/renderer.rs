//! Mad-lib rendering: fill template blanks with selected answer words.
//!
//! Rendering is a pure function of the template and the word list. Words
//! are consumed in template-scan order: the first marker takes the first
//! word, the next distinct blank the next word, and so on. A keyed marker
//! that repeats reuses the word its first occurrence took.

use crate::{LocationOptions, scan_markers};
use serde::Serialize;
use std::collections::HashMap;

/// Text shown for a blank with no word when [`UnfilledStyle::Marker`] is used.
pub const UNFILLED_MARKER: &str = "[____]";

/// How filled words are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FillStyle {
    /// The word as-is
    #[default]
    Plain,
    /// The word wrapped in `**` for host previews
    Emphasis,
}

/// How blanks without a word are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum UnfilledStyle {
    /// The original marker text
    #[default]
    Literal,
    /// [`UNFILLED_MARKER`]
    Marker,
}

/// Rendering options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RenderStyle {
    /// Filled-word style
    pub fill: FillStyle,
    /// Unfilled-blank style
    pub unfilled: UnfilledStyle,
}

impl RenderStyle {
    /// Creates a style.
    pub fn new(fill: FillStyle, unfilled: UnfilledStyle) -> Self {
        Self { fill, unfilled }
    }

    /// Bold words and visible gaps, as shown to hosts.
    pub fn host_preview() -> Self {
        Self::new(FillStyle::Emphasis, UnfilledStyle::Marker)
    }
}

/// A rendered narrative and how completely it was filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_getters::Getters)]
pub struct RenderedMadlib {
    text: String,
    /// Distinct blanks that received a word
    filled: usize,
    /// Distinct blanks left without a word
    unfilled: usize,
    /// Words left over after every blank was filled
    ignored_words: usize,
}

impl RenderedMadlib {
    /// True when every blank received a word.
    pub fn is_complete(&self) -> bool {
        self.unfilled == 0
    }
}

/// Renders with [`RenderStyle::default`].
///
/// # Examples
///
/// ```
/// use huntcraft_story::render;
///
/// let rendered = render("The {{BLANK_1}} was hidden near the {{BLANK_2}}.", &["brass key"]);
/// assert_eq!(rendered.text(), "The brass key was hidden near the {{BLANK_2}}.");
/// assert_eq!(*rendered.unfilled(), 1);
/// ```
pub fn render<W: AsRef<str>>(template: &str, words: &[W]) -> RenderedMadlib {
    render_with(template, words, RenderStyle::default())
}

/// Renders `template` with `words` in template-scan order.
///
/// Excess words are ignored, never appended.
pub fn render_with<W: AsRef<str>>(
    template: &str,
    words: &[W],
    style: RenderStyle,
) -> RenderedMadlib {
    let mut text = String::with_capacity(template.len());
    let mut keyed: HashMap<String, Option<&str>> = HashMap::new();
    let mut next_word = 0;
    let mut filled = 0;
    let mut unfilled = 0;
    let mut cursor = 0;

    for marker in scan_markers(template) {
        text.push_str(&template[cursor..marker.start()]);
        cursor = marker.end();

        let repeat = marker
            .key()
            .as_ref()
            .and_then(|key| keyed.get(key).copied());

        let word = match repeat {
            Some(word) => word,
            None => {
                let word = words.get(next_word).map(|w| w.as_ref());
                if word.is_some() {
                    next_word += 1;
                    filled += 1;
                } else {
                    unfilled += 1;
                }
                if let Some(key) = marker.key() {
                    keyed.insert(key.clone(), word);
                }
                word
            }
        };

        match (word, style.fill, style.unfilled) {
            (Some(word), FillStyle::Plain, _) => text.push_str(word),
            (Some(word), FillStyle::Emphasis, _) => {
                text.push_str("**");
                text.push_str(word);
                text.push_str("**");
            }
            (None, _, UnfilledStyle::Literal) => {
                text.push_str(&template[marker.start()..marker.end()])
            }
            (None, _, UnfilledStyle::Marker) => text.push_str(UNFILLED_MARKER),
        }
    }
    text.push_str(&template[cursor..]);

    RenderedMadlib {
        text,
        filled,
        unfilled,
        ignored_words: words.len().saturating_sub(next_word),
    }
}

/// Selected words of each stop in `order_index` order.
///
/// Stops without a selection contribute nothing, so their blank is left
/// for whichever later word reaches it in scan order.
pub fn words_for(locations: &[LocationOptions]) -> Vec<&str> {
    let mut ordered: Vec<&LocationOptions> = locations.iter().collect();
    ordered.sort_by_key(|l| *l.location().order_index());
    ordered
        .into_iter()
        .filter_map(|l| l.selected().map(|o| o.madlib_word()))
        .collect()
}
