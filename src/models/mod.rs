use serde::{Deserialize, Serialize};

use crate::wiki::tag_color;

/// A note as owned by the host's storage layer.
///
/// The engine only reads `title` and `content`; rewritten content flows back to the
/// host through the editor's change callback.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Note {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub folder: String,
    pub created_at: i64,
    pub updated_at: i64,
    /// Soft-delete marker (epoch ms).
    #[serde(default)]
    pub deleted_at: Option<i64>,
}

impl Note {
    pub fn new(id: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            folder: String::new(),
            created_at: 0,
            updated_at: 0,
            deleted_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// A note can take part in the link graph only when it is live and has a title.
    pub fn is_linkable(&self) -> bool {
        !self.is_deleted() && !self.title.trim().is_empty()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Tag {
    pub id: String,
    /// Bare tag text, without the leading `#`.
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub created_at: i64,
}

impl Tag {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: None,
            created_at: 0,
        }
    }

    pub fn display_color(&self) -> String {
        self.color
            .clone()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| tag_color(&self.name))
    }
}

/// One row of the autocomplete list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Candidate {
    Note(Note),
    Tag(Tag),
    /// "Create new tag" entry carrying the typed query.
    NewTag(String),
}

impl Candidate {
    /// Text placed inside the marker on commit.
    pub fn insert_text(&self) -> &str {
        match self {
            Candidate::Note(n) => n.title.trim(),
            Candidate::Tag(t) => t.name.trim(),
            Candidate::NewTag(name) => name.trim(),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Candidate::Note(n) => n.title.clone(),
            Candidate::Tag(t) => format!("#{}", t.name),
            Candidate::NewTag(name) => format!("Create new tag \"#{name}\""),
        }
    }

    pub fn key(&self) -> String {
        match self {
            Candidate::Note(n) => format!("note:{}", n.id),
            Candidate::Tag(t) => format!("tag:{}", t.id),
            Candidate::NewTag(name) => format!("new-tag:{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_contract_deserialize() {
        let json = r#"{
            "id": "n1",
            "title": "Project Plan",
            "content": "Plan for [[Q1 Goals]]",
            "folder": "work",
            "created_at": 1700000000000,
            "updated_at": 1700000000500,
            "deleted_at": null
        }"#;
        let parsed: Note = serde_json::from_str(json).expect("note should parse");
        assert_eq!(parsed.title, "Project Plan");
        assert!(!parsed.is_deleted());
        assert!(parsed.is_linkable());
    }

    #[test]
    fn test_note_missing_optional_fields() {
        let json = r#"{"id": "n2", "title": "Inbox", "created_at": 1, "updated_at": 2}"#;
        let parsed: Note = serde_json::from_str(json).expect("note should parse");
        assert!(parsed.content.is_empty());
        assert!(parsed.deleted_at.is_none());
    }

    #[test]
    fn test_blank_title_is_not_linkable() {
        let n = Note::new("n3", "   ", "text");
        assert!(!n.is_linkable());

        let mut d = Note::new("n4", "Gone", "");
        d.deleted_at = Some(5);
        assert!(!d.is_linkable());
    }

    #[test]
    fn test_tag_display_color_falls_back_to_hash() {
        let mut t = Tag::new("t1", "rust");
        assert_eq!(t.display_color(), tag_color("rust"));
        t.color = Some("#ff0000".to_string());
        assert_eq!(t.display_color(), "#ff0000");
    }

    #[test]
    fn test_candidate_insert_text_is_trimmed() {
        let c = Candidate::Note(Note::new("n1", "  Project Plan ", ""));
        assert_eq!(c.insert_text(), "Project Plan");
        assert_eq!(Candidate::NewTag("idea".into()).insert_text(), "idea");
    }
}
