use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

fn wiki_link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[\[([^\]]+)\]\]").expect("wiki-link pattern is valid"))
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#([A-Za-z][A-Za-z0-9_-]*)").expect("tag pattern is valid"))
}

/// A tag may not follow `#` or an ASCII word character. Checked by hand since `regex`
/// has no look-behind, and consuming the boundary would swallow it from `#a-#b`.
fn tag_boundary_before(text: &str, hash: usize) -> bool {
    match text[..hash].chars().next_back() {
        None => true,
        Some(c) => c != '#' && c != '_' && !c.is_ascii_alphanumeric(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WikiLink {
    /// Byte span of the whole `[[...]]` marker.
    pub span: Range<usize>,
    /// Marker payload, trimmed of surrounding whitespace.
    pub title: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagRef {
    /// Byte span of `#name`.
    pub span: Range<usize>,
    pub name: String,
}

/// Find `[[Title]]` references in free text.
///
/// Rules:
/// - The title is one or more characters that are not `]`; the first `]` ends it, so
///   `[[Note [1]]` yields `Note [1` and `[[a [b] c]]` yields nothing.
/// - `[[]]` and an unclosed `[[...` are plain text.
/// - Adjacent links are separate matches, returned left to right.
pub fn extract_wiki_links(text: &str) -> Vec<WikiLink> {
    wiki_link_re()
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let inner = caps.get(1)?;
            Some(WikiLink {
                span: whole.range(),
                title: inner.as_str().trim().to_string(),
            })
        })
        .collect()
}

/// Titles only, in order of appearance. Blank titles are dropped.
pub fn wiki_link_titles(text: &str) -> Vec<String> {
    extract_wiki_links(text)
        .into_iter()
        .map(|l| l.title)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Find `#tag` markers. `##Heading`, `## Heading` and `word#tag` are not tags.
pub fn extract_tags(text: &str) -> Vec<TagRef> {
    tag_re()
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?;
            tag_boundary_before(text, whole.start()).then(|| TagRef {
                span: whole.range(),
                name: name.as_str().to_string(),
            })
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Text(String),
    WikiLink { title: String, raw: String },
    Tag { name: String },
}

impl Token {
    /// The exact source text this token was cut from.
    pub fn raw(&self) -> String {
        match self {
            Token::Text(s) => s.clone(),
            Token::WikiLink { raw, .. } => raw.clone(),
            Token::Tag { name } => format!("#{name}"),
        }
    }
}

/// Split text into plain runs and markers for read-only rendering.
///
/// Wiki-links win over tags: a `#` inside `[[...]]` stays part of the link. Joining
/// every token's [`Token::raw`] gives back the input unchanged.
pub fn tokenize(text: &str) -> Vec<Token> {
    let links = extract_wiki_links(text);
    let tags = extract_tags(text)
        .into_iter()
        .filter(|t| !links.iter().any(|l| l.span.start < t.span.end && t.span.start < l.span.end));

    let mut markers: Vec<(Range<usize>, Token)> = links
        .iter()
        .map(|l| {
            (
                l.span.clone(),
                Token::WikiLink {
                    title: l.title.clone(),
                    raw: text[l.span.clone()].to_string(),
                },
            )
        })
        .chain(tags.map(|t| (t.span, Token::Tag { name: t.name })))
        .collect();
    markers.sort_by_key(|(span, _)| span.start);

    let mut out = Vec::with_capacity(markers.len() * 2 + 1);
    let mut i = 0;
    for (span, token) in markers {
        if span.start > i {
            out.push(Token::Text(text[i..span.start].to_string()));
        }
        out.push(token);
        i = span.end;
    }
    if i < text.len() {
        out.push(Token::Text(text[i..].to_string()));
    }
    out
}

/// Stable display color for a tag without an explicit one.
pub fn tag_color(name: &str) -> String {
    let hash = name
        .encode_utf16()
        .fold(0i32, |acc, unit| (unit as i32).wrapping_add(acc.wrapping_shl(5).wrapping_sub(acc)));
    let hue = hash.unsigned_abs() % 360;
    format!("hsl({hue}, 70%, 50%)")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(text: &str) -> Vec<String> {
        extract_wiki_links(text).into_iter().map(|l| l.title).collect()
    }

    fn tag_names(text: &str) -> Vec<String> {
        extract_tags(text).into_iter().map(|t| t.name).collect()
    }

    #[test]
    fn test_links_in_order_with_spans() {
        let text = "This is [[Link One]] and [[Link Two]] in text";
        let links = extract_wiki_links(text);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].title, "Link One");
        assert_eq!(&text[links[0].span.clone()], "[[Link One]]");
        assert_eq!(links[1].title, "Link Two");
        assert!(links[0].span.end <= links[1].span.start);
    }

    #[test]
    fn test_adjacent_links_do_not_merge() {
        assert_eq!(titles("[[A]][[B]]"), vec!["A", "B"]);
        assert_eq!(titles("[[First]] [[Second]] [[Third]]"), vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_title_is_trimmed() {
        assert_eq!(titles("[[  Padded Title  ]]"), vec!["Padded Title"]);
        assert_eq!(titles("[[Note with \"quotes\" and (2024)]]"), vec!["Note with \"quotes\" and (2024)"]);
    }

    #[test]
    fn test_bracket_truncation() {
        let found = titles("[[Note [1]]");
        assert!(!found.iter().any(|t| t == "Note [1]"));
        assert_eq!(found, vec!["Note [1"]);

        assert!(titles("Text [[Link [with] brackets]] more text").is_empty());
    }

    #[test]
    fn test_empty_and_incomplete_links_do_not_match() {
        assert!(extract_wiki_links("[[]]").is_empty());
        assert!(extract_wiki_links("Text [[incomplete link without closing").is_empty());
        assert!(extract_wiki_links("[[half]").is_empty());
    }

    #[test]
    fn test_whitespace_only_link_has_blank_title() {
        assert_eq!(titles("[[   ]]"), vec![""]);
        assert!(wiki_link_titles("[[   ]] [[Real]]") == vec!["Real"]);
    }

    #[test]
    fn test_long_and_unicode_titles() {
        let long = "A".repeat(500);
        assert_eq!(titles(&format!("[[{long}]]")), vec![long]);

        let text = "voir [[Café Ünïcode]] ici";
        let links = extract_wiki_links(text);
        assert_eq!(links[0].title, "Café Ünïcode");
        assert_eq!(&text[links[0].span.clone()], "[[Café Ünïcode]]");
    }

    #[test]
    fn test_tag_boundaries() {
        assert!(tag_names("## Heading").is_empty());
        assert!(tag_names("##Heading").is_empty());
        assert_eq!(tag_names("#tag"), vec!["tag"]);
        assert_eq!(tag_names("word #tag"), vec!["tag"]);
        assert!(tag_names("word#tag").is_empty());
        assert!(tag_names("#1abc").is_empty());
    }

    #[test]
    fn test_tags_after_punctuation_and_repeated() {
        assert_eq!(tag_names("(#a)(#b), #c-d #e_f"), vec!["a", "b", "c-d", "e_f"]);
        assert_eq!(tag_names("#a #b"), vec!["a", "b"]);
        assert_eq!(tag_names("#a#b"), vec!["a"]);
        assert_eq!(tag_names("#a-#b"), vec!["a-", "b"]);
        assert_eq!(tag_names("x_#a é#b"), vec!["b"]);
        assert_eq!(tag_names("line\n#next"), vec!["next"]);
    }

    #[test]
    fn test_tag_span_covers_hash_and_name() {
        let text = "see #project-x now";
        let tags = extract_tags(text);
        assert_eq!(&text[tags[0].span.clone()], "#project-x");
    }

    #[test]
    fn test_tokenize_is_lossless() {
        let text = "Plan for [[Q1 Goals]] #work and [[C# notes]]!\n## Heading #todo";
        let tokens = tokenize(text);
        let joined: String = tokens.iter().map(Token::raw).collect();
        assert_eq!(joined, text);

        assert!(tokens.contains(&Token::WikiLink {
            title: "C# notes".to_string(),
            raw: "[[C# notes]]".to_string()
        }));
        assert!(tokens.contains(&Token::Tag { name: "work".to_string() }));
        assert!(tokens.contains(&Token::Tag { name: "todo".to_string() }));
        assert!(!tokens.contains(&Token::Tag { name: "Heading".to_string() }));
    }

    #[test]
    fn test_tokenize_plain_text() {
        assert_eq!(tokenize("no markers"), vec![Token::Text("no markers".to_string())]);
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_tag_color_is_stable_hsl() {
        assert_eq!(tag_color("rust"), tag_color("rust"));
        assert_eq!(tag_color(""), "hsl(0, 70%, 50%)");
        let c = tag_color("a-very-long-tag-name-with-many-characters");
        assert!(c.starts_with("hsl(") && c.ends_with(", 70%, 50%)"));
    }
}
