use crate::models::Note;
use crate::wiki::wiki_link_titles;
use regex::RegexBuilder;
use std::collections::HashSet;

const CONTEXT_CHARS: usize = 30;

/// Backlinks and outgoing links of one note, borrowed from the note collection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkGraph<'a> {
    pub backlinks: Vec<&'a Note>,
    pub outgoing: Vec<&'a Note>,
}

fn title_key(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Compute the link neighbourhood of `target` from scratch.
///
/// Titles match case-insensitively and in full. Soft-deleted notes, notes with a
/// blank title and `target` itself never appear in either list, and such a target
/// has an empty graph in both directions. Outgoing links
/// follow the order links first appear in `target.content`; backlinks follow the
/// order of `all`.
pub fn resolve_links<'a>(target: &Note, all: &'a [Note]) -> LinkGraph<'a> {
    if !target.is_linkable() {
        return LinkGraph::default();
    }

    let candidates = || all.iter().filter(move |n| n.id != target.id && n.is_linkable());

    let mut seen: HashSet<&str> = HashSet::new();
    let mut outgoing = Vec::new();
    for title in wiki_link_titles(&target.content) {
        let key = title_key(&title);
        for note in candidates().filter(|n| title_key(&n.title) == key) {
            if seen.insert(note.id.as_str()) {
                outgoing.push(note);
            }
        }
    }

    let key = title_key(&target.title);
    let backlinks = candidates()
        .filter(|n| wiki_link_titles(&n.content).iter().any(|t| title_key(t) == key))
        .collect();

    LinkGraph { backlinks, outgoing }
}

/// Short snippet of `content` around where it mentions `title`, for backlink lists.
///
/// Prefers a `[[title]]` link, falls back to a whole-word mention. Whitespace is
/// collapsed and `...` marks cut ends.
pub fn backlink_context(content: &str, title: &str) -> Option<String> {
    let title = title.trim();
    if content.is_empty() || title.is_empty() {
        return None;
    }

    let escaped = regex::escape(title);
    let link = RegexBuilder::new(&format!(r"\[\[\s*{escaped}\s*\]\]"))
        .case_insensitive(true)
        .build()
        .ok()?;
    let mention = RegexBuilder::new(&format!(r"\b{escaped}\b"))
        .case_insensitive(true)
        .build()
        .ok()?;
    let m = link.find(content).or_else(|| mention.find(content))?;

    let start = content[..m.start()]
        .char_indices()
        .rev()
        .nth(CONTEXT_CHARS - 1)
        .map(|(i, _)| i)
        .unwrap_or(0);
    let end = content[m.end()..]
        .char_indices()
        .nth(CONTEXT_CHARS)
        .map(|(i, _)| m.end() + i)
        .unwrap_or(content.len());

    let mut snippet = content[start..end].split_whitespace().collect::<Vec<_>>().join(" ");
    if start > 0 {
        snippet.insert_str(0, "...");
    }
    if end < content.len() {
        snippet.push_str("...");
    }
    Some(snippet)
}
