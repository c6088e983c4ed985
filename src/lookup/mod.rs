use crate::models::{Candidate, Note, Tag};
use crate::trigger::TriggerKind;
use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("candidate search failed: {0}")]
    Search(String),
    #[error("candidate source unavailable")]
    Unavailable,
}

/// Host-supplied search used to fill the autocomplete list.
///
/// Futures are not `Send`: lookups run on the UI thread next to the editor.
pub trait CandidateSource {
    fn search_notes(&self, query: &str) -> LocalBoxFuture<'_, Result<Vec<Note>, LookupError>>;
    fn search_tags(&self, query: &str) -> LocalBoxFuture<'_, Result<Vec<Tag>, LookupError>>;
}

/// Run the search matching `kind`, wrapping results as candidates.
pub async fn run_lookup<S: CandidateSource + ?Sized>(
    source: &S,
    kind: TriggerKind,
    query: &str,
) -> Result<Vec<Candidate>, LookupError> {
    match kind {
        TriggerKind::WikiLink => Ok(source
            .search_notes(query)
            .await?
            .into_iter()
            .map(Candidate::Note)
            .collect()),
        TriggerKind::Tag => Ok(source
            .search_tags(query)
            .await?
            .into_iter()
            .map(Candidate::Tag)
            .collect()),
    }
}

/// In-memory note and tag registry, usable as a local search index.
#[derive(Clone, Debug, Default)]
pub struct NoteIndex {
    notes: Vec<Note>,
    tags: Vec<Tag>,
}

impl NoteIndex {
    pub fn new(notes: Vec<Note>, tags: Vec<Tag>) -> Self {
        Self { notes, tags }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn set_notes(&mut self, notes: Vec<Note>) {
        self.notes = notes;
    }

    pub fn set_tags(&mut self, tags: Vec<Tag>) {
        self.tags = tags;
    }

    fn matching_notes(&self, query: &str) -> Vec<Note> {
        let q = query.trim().to_lowercase();
        self.notes
            .iter()
            .filter(|n| n.is_linkable())
            .filter(|n| q.is_empty() || n.title.to_lowercase().contains(&q))
            .cloned()
            .collect()
    }

    fn matching_tags(&self, query: &str) -> Vec<Tag> {
        let q = query.trim().to_lowercase();
        self.tags
            .iter()
            .filter(|t| q.is_empty() || t.name.to_lowercase().contains(&q))
            .cloned()
            .collect()
    }
}

impl CandidateSource for NoteIndex {
    fn search_notes(&self, query: &str) -> LocalBoxFuture<'_, Result<Vec<Note>, LookupError>> {
        future::ready(Ok(self.matching_notes(query))).boxed_local()
    }

    fn search_tags(&self, query: &str) -> LocalBoxFuture<'_, Result<Vec<Tag>, LookupError>> {
        future::ready(Ok(self.matching_tags(query))).boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    fn index() -> NoteIndex {
        let mut deleted = Note::new("n3", "Project Archive", "");
        deleted.deleted_at = Some(1);
        NoteIndex::new(
            vec![
                Note::new("n1", "Project Plan", ""),
                Note::new("n2", "Q1 Goals", ""),
                deleted,
                Note::new("n4", "  ", ""),
            ],
            vec![Tag::new("t1", "project"), Tag::new("t2", "Reading")],
        )
    }

    #[test]
    fn test_note_search_is_case_insensitive_substring() {
        let found = block_on(index().search_notes("PROJ")).expect("search");
        let titles: Vec<_> = found.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Project Plan"]);
    }

    #[test]
    fn test_empty_query_lists_live_notes() {
        let found = block_on(index().search_notes("")).expect("search");
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|n| !n.is_deleted()));
    }

    #[test]
    fn test_run_lookup_wraps_by_kind() {
        let idx = index();
        let tags = block_on(run_lookup(&idx, TriggerKind::Tag, "read")).expect("lookup");
        assert_eq!(tags, vec![Candidate::Tag(Tag::new("t2", "Reading"))]);

        let notes = block_on(run_lookup(&idx, TriggerKind::WikiLink, "q1")).expect("lookup");
        assert!(matches!(&notes[..], [Candidate::Note(n)] if n.id == "n2"));
    }

    #[test]
    fn test_lookup_error_display() {
        assert_eq!(
            LookupError::Search("boom".into()).to_string(),
            "candidate search failed: boom"
        );
    }
}
