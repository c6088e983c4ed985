use regex::Regex;
use std::sync::OnceLock;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
pub enum TriggerKind {
    #[strum(serialize = "wikilink")]
    WikiLink,
    #[strum(serialize = "tag")]
    Tag,
}

impl TriggerKind {
    /// Opening marker text.
    pub fn marker(self) -> &'static str {
        match self {
            TriggerKind::WikiLink => "[[",
            TriggerKind::Tag => "#",
        }
    }
}

/// An unfinished marker immediately before the caret.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trigger {
    pub kind: TriggerKind,
    /// Text typed after the opening marker.
    pub query: String,
    /// Byte offset of the opening `[[` or `#`.
    pub anchor: usize,
}

fn open_wiki_link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[\[([^\]]*)$").expect("open wiki-link pattern is valid"))
}

fn open_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:^|[^#A-Za-z0-9_])#([A-Za-z][A-Za-z0-9_-]*)$").expect("open tag pattern is valid")
    })
}

/// Decide whether the caret sits inside an unfinished `[[...` or `#tag`.
///
/// Wiki-links are checked first; at most one kind is reported. The result depends only
/// on `text_before_cursor`, so callers recompute it from scratch on every keystroke.
pub fn detect_trigger(text_before_cursor: &str) -> Option<Trigger> {
    if let Some(caps) = open_wiki_link_re().captures(text_before_cursor) {
        let query = caps.get(1)?;
        return Some(Trigger {
            kind: TriggerKind::WikiLink,
            query: query.as_str().to_string(),
            anchor: query.start() - 2,
        });
    }

    let caps = open_tag_re().captures(text_before_cursor)?;
    let body = caps.get(1)?;
    Some(Trigger {
        kind: TriggerKind::Tag,
        query: body.as_str().to_string(),
        anchor: body.start() - 1,
    })
}
