use crate::config::EngineConfig;
use crate::lookup::LookupError;
use crate::models::Candidate;
use crate::offset::floor_char_boundary;
use crate::trigger::{detect_trigger, Trigger, TriggerKind};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Ready,
}

/// Keys the open menu reacts to. Parses from DOM `KeyboardEvent.key` names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::EnumString, strum::Display)]
pub enum NavKey {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not consumed; the editor should handle the key itself.
    Ignored,
    Handled,
    /// Enter on a highlighted row. Pass it to [`AutocompleteController::commit_candidate`].
    Commit(Candidate),
    Closed,
}

/// Issued when a lookup should start. Hand it back to
/// [`AutocompleteController::resolve`] with the lookup's result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupTicket {
    pub generation: u64,
    pub kind: TriggerKind,
    pub query: String,
}

/// Result of writing a candidate into the document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commit {
    pub text: String,
    /// Byte offset just after the inserted marker and its trailing space.
    pub cursor: usize,
}

/// Autocomplete state for one editing surface.
///
/// Idle → Loading when a trigger appears or its query changes, Loading → Ready when
/// the current lookup resolves, anything → Idle when the trigger closes. Each lookup
/// gets a generation number; results carrying an older generation are dropped, so
/// the last query wins regardless of arrival order.
#[derive(Clone, Debug)]
pub struct AutocompleteController {
    phase: Phase,
    trigger: Option<Trigger>,
    candidates: Vec<Candidate>,
    highlighted: usize,
    generation: u64,
    max_candidates: usize,
    offer_new_tags: bool,
}

impl Default for AutocompleteController {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl AutocompleteController {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            phase: Phase::Idle,
            trigger: None,
            candidates: Vec::new(),
            highlighted: 0,
            generation: 0,
            max_candidates: config.max_candidates.max(1),
            offer_new_tags: config.offer_new_tags,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn trigger(&self) -> Option<&Trigger> {
        self.trigger.as_ref()
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// `None` while the list is empty.
    pub fn highlighted(&self) -> Option<usize> {
        (!self.candidates.is_empty()).then_some(self.highlighted)
    }

    pub fn highlighted_candidate(&self) -> Option<&Candidate> {
        self.candidates.get(self.highlighted)
    }

    /// Re-run trigger detection for the text before the caret.
    pub fn on_input(&mut self, text_before_cursor: &str) -> Option<LookupTicket> {
        let Some(next) = detect_trigger(text_before_cursor) else {
            if self.is_open() {
                tracing::debug!("autocomplete: trigger closed");
                self.close();
            }
            return None;
        };

        if let Some(current) = self.trigger.as_mut() {
            if self.phase != Phase::Idle && current.kind == next.kind && current.query == next.query {
                current.anchor = next.anchor;
                return None;
            }
        }

        self.generation += 1;
        self.phase = Phase::Loading;
        self.candidates.clear();
        self.highlighted = 0;
        tracing::debug!(kind = %next.kind, query = %next.query, generation = self.generation, "autocomplete: lookup");

        let ticket = LookupTicket {
            generation: self.generation,
            kind: next.kind,
            query: next.query.clone(),
        };
        self.trigger = Some(next);
        Some(ticket)
    }

    /// Apply a finished lookup. Returns `false` when the result was stale and dropped.
    pub fn resolve(
        &mut self,
        ticket: &LookupTicket,
        result: Result<Vec<Candidate>, LookupError>,
    ) -> bool {
        if self.phase != Phase::Loading || ticket.generation != self.generation {
            tracing::trace!(
                generation = ticket.generation,
                current = self.generation,
                "autocomplete: dropping stale lookup"
            );
            return false;
        }

        self.candidates = match result {
            Ok(found) => self.refine(ticket, found),
            Err(e) => {
                tracing::warn!(query = %ticket.query, error = %e, "autocomplete: lookup failed");
                Vec::new()
            }
        };
        self.highlighted = 0;
        self.phase = Phase::Ready;
        true
    }

    fn refine(&self, ticket: &LookupTicket, found: Vec<Candidate>) -> Vec<Candidate> {
        let q = ticket.query.to_lowercase();
        let mut out: Vec<Candidate> = found
            .into_iter()
            .filter(|c| match c {
                Candidate::Note(n) => n.is_linkable(),
                _ => true,
            })
            .filter(|c| q.is_empty() || c.insert_text().to_lowercase().contains(&q))
            .take(self.max_candidates)
            .collect();

        let typed = ticket.query.trim();
        if ticket.kind == TriggerKind::Tag && self.offer_new_tags && !typed.is_empty() {
            let exists = out.iter().any(|c| c.insert_text().eq_ignore_ascii_case(typed));
            if !exists {
                out.push(Candidate::NewTag(typed.to_string()));
            }
        }
        out
    }

    pub fn on_key(&mut self, key: NavKey) -> KeyOutcome {
        if !self.is_open() {
            return KeyOutcome::Ignored;
        }
        match key {
            NavKey::ArrowDown => {
                if !self.candidates.is_empty() {
                    self.highlighted = (self.highlighted + 1).min(self.candidates.len() - 1);
                }
                KeyOutcome::Handled
            }
            NavKey::ArrowUp => {
                self.highlighted = self.highlighted.saturating_sub(1);
                KeyOutcome::Handled
            }
            NavKey::Enter => match self.highlighted_candidate() {
                Some(c) => KeyOutcome::Commit(c.clone()),
                None => KeyOutcome::Ignored,
            },
            NavKey::Escape => {
                self.close();
                KeyOutcome::Closed
            }
        }
    }

    /// Move the highlight, e.g. on mouse hover.
    pub fn highlight(&mut self, index: usize) {
        if !self.candidates.is_empty() {
            self.highlighted = index.min(self.candidates.len() - 1);
        }
    }

    /// Drop the trigger. Any lookup still in flight becomes stale.
    pub fn close(&mut self) {
        self.phase = Phase::Idle;
        self.trigger = None;
        self.candidates.clear();
        self.highlighted = 0;
        self.generation += 1;
    }

    /// Commit the highlighted candidate.
    pub fn commit(&mut self, text: &str, cursor: usize) -> Option<Commit> {
        let candidate = self.highlighted_candidate()?.clone();
        self.commit_candidate(text, cursor, &candidate)
    }

    /// Replace the open marker before `cursor` (byte offset) with the formed marker.
    /// Closes the menu either way.
    pub fn commit_candidate(&mut self, text: &str, cursor: usize, candidate: &Candidate) -> Option<Commit> {
        let trigger = self.trigger.clone();
        self.close();
        let trigger = trigger?;

        let commit = apply_completion(text, cursor, &trigger, candidate.insert_text());
        match &commit {
            Some(c) => tracing::debug!(kind = %trigger.kind, cursor = c.cursor, "autocomplete: committed"),
            None => tracing::debug!(kind = %trigger.kind, "autocomplete: no open marker to replace"),
        }
        commit
    }
}

/// Rewrite `text` so the nearest open marker at or before `trigger.anchor` becomes
/// `[[insert]] ` or `#insert `.
///
/// The marker is found by searching backwards from the caret, so earlier markers of
/// the same kind are left alone. Returns `None` when no open marker is found.
pub fn apply_completion(text: &str, cursor: usize, trigger: &Trigger, insert: &str) -> Option<Commit> {
    let insert = insert.trim();
    if insert.is_empty() {
        return None;
    }

    let cursor = floor_char_boundary(text, cursor);
    let marker = trigger.kind.marker();
    let limit = floor_char_boundary(text, (trigger.anchor + marker.len()).min(cursor));
    let start = text[..limit].rfind(marker)?;

    let typed = &text[start + marker.len()..cursor];
    let still_open = match trigger.kind {
        TriggerKind::WikiLink => !typed.contains(']'),
        TriggerKind::Tag => typed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
    };
    if !still_open {
        return None;
    }

    let formed = match trigger.kind {
        TriggerKind::WikiLink => format!("[[{insert}]] "),
        TriggerKind::Tag => format!("#{insert} "),
    };

    let mut next = String::with_capacity(text.len() + formed.len());
    next.push_str(&text[..start]);
    next.push_str(&formed);
    next.push_str(&text[cursor..]);

    Some(Commit {
        text: next,
        cursor: start + formed.len(),
    })
}
