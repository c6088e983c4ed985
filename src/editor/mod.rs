use crate::autocomplete::{AutocompleteController, Commit, KeyOutcome, NavKey};
use crate::components::AutocompleteMenu;
use crate::config::EngineConfig;
use crate::cursor::{DomSurface, TextSurface};
use crate::lookup::{run_lookup, CandidateSource};
use crate::models::Candidate;
use crate::offset::{byte_idx_to_utf16, utf16_to_byte_idx};
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::rc::Rc;

/// Autocomplete state for one editor instance, shared with whatever renders the menu.
///
/// Lookups run on `spawn_local`; when one finishes it is handed back to the
/// controller, which drops it if a newer query superseded it. If the editor was
/// unmounted in the meantime the signal is disposed and the result is ignored.
#[derive(Clone, Copy)]
pub struct AutocompleteHandle {
    state: RwSignal<AutocompleteController>,
    source: StoredValue<Rc<dyn CandidateSource>, LocalStorage>,
}

impl AutocompleteHandle {
    pub fn new(config: &EngineConfig, source: Rc<dyn CandidateSource>) -> Self {
        Self {
            state: RwSignal::new(AutocompleteController::new(config)),
            source: StoredValue::new_local(source),
        }
    }

    pub fn state(&self) -> RwSignal<AutocompleteController> {
        self.state
    }

    pub fn on_input(&self, text_before_cursor: &str) {
        let Some(ticket) = self.state.try_update(|c| c.on_input(text_before_cursor)).flatten() else {
            return;
        };
        let Some(source) = self.source.try_get_value() else {
            return;
        };

        let state = self.state;
        spawn_local(async move {
            let result = run_lookup(source.as_ref(), ticket.kind, &ticket.query).await;
            let _ = state.try_update(|c| c.resolve(&ticket, result));
        });
    }

    pub fn on_key(&self, key: NavKey) -> KeyOutcome {
        self.state.try_update(|c| c.on_key(key)).unwrap_or(KeyOutcome::Ignored)
    }

    pub fn highlight(&self, index: usize) {
        let _ = self.state.try_update(|c| c.highlight(index));
    }

    pub fn close(&self) {
        let _ = self.state.try_update(|c| c.close());
    }

    pub fn commit_candidate(&self, text: &str, cursor: usize, candidate: &Candidate) -> Option<Commit> {
        self.state
            .try_update(|c| c.commit_candidate(text, cursor, candidate))
            .flatten()
    }
}

/// Caret position as a byte offset into `text`, defaulting to the end.
fn caret_byte_offset(surface: &DomSurface, text: &str) -> usize {
    let caret = surface
        .caret_offset()
        .unwrap_or_else(|| text.encode_utf16().count());
    utf16_to_byte_idx(text, caret)
}

/// `contenteditable` note body with `[[` / `#` autocomplete.
///
/// The surface is plaintext-only with preserved whitespace, so Enter inserts `\n`
/// into the text itself; any `<br>` or block wrappers a browser still produces are
/// read back as line breaks by [`DomSurface`].
///
/// `on_change` receives the full document text after every edit, including the
/// rewrite produced by committing a candidate.
#[component]
pub fn NoteEditor(
    #[prop(into)] initial: String,
    handle: AutocompleteHandle,
    #[prop(into)] on_change: Callback<String>,
) -> impl IntoView {
    let root = NodeRef::<html::Div>::new();

    let surface = move || {
        root.get_untracked().map(|el| {
            let node: web_sys::Node = el.into();
            DomSurface::new(node)
        })
    };

    let sync = move || {
        let Some(surface) = surface() else {
            return;
        };
        let text = surface.plain_text();
        let cursor = caret_byte_offset(&surface, &text);
        handle.on_input(&text[..cursor]);
    };

    let commit = move |candidate: Candidate| {
        let Some(surface) = surface() else {
            return;
        };
        let text = surface.plain_text();
        let cursor = caret_byte_offset(&surface, &text);
        let Some(done) = handle.commit_candidate(&text, cursor, &candidate) else {
            return;
        };

        surface.root().set_text_content(Some(&done.text));
        if let Err(e) = surface.place_caret(byte_idx_to_utf16(&done.text, done.cursor)) {
            tracing::warn!(error = ?e, "editor: could not restore caret after commit");
        }
        on_change.run(done.text);
    };

    view! {
        <div class="linkweave-editor">
            <div
                node_ref=root
                class="linkweave-surface whitespace-pre-wrap"
                style="white-space: pre-wrap"
                contenteditable="plaintext-only"
                spellcheck="false"
                on:input=move |_| {
                    sync();
                    if let Some(surface) = surface() {
                        on_change.run(surface.plain_text());
                    }
                }
                on:click=move |_| sync()
                on:keyup=move |ev: web_sys::KeyboardEvent| {
                    if matches!(ev.key().as_str(), "ArrowLeft" | "ArrowRight" | "Home" | "End") {
                        sync();
                    }
                }
                on:keydown=move |ev: web_sys::KeyboardEvent| {
                    let Ok(key) = ev.key().parse::<NavKey>() else {
                        return;
                    };
                    match handle.on_key(key) {
                        KeyOutcome::Ignored => {}
                        KeyOutcome::Handled | KeyOutcome::Closed => ev.prevent_default(),
                        KeyOutcome::Commit(candidate) => {
                            ev.prevent_default();
                            commit(candidate);
                        }
                    }
                }
                on:blur=move |_| handle.close()
            >
                {initial}
            </div>
            <AutocompleteMenu handle=handle on_pick=Callback::new(move |c: Candidate| commit(c)) />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autocomplete::Phase;
    use crate::lookup::NoteIndex;
    use crate::models::Note;

    fn handle() -> AutocompleteHandle {
        let index = NoteIndex::new(vec![Note::new("1", "Project Plan", "")], vec![]);
        AutocompleteHandle::new(&EngineConfig::default(), Rc::new(index))
    }

    #[test]
    fn test_handle_keys_when_idle() {
        let owner = Owner::new();
        owner.with(|| {
            let h = handle();
            assert_eq!(h.on_key(NavKey::ArrowDown), KeyOutcome::Ignored);
            h.close();
            assert_eq!(h.state().get_untracked().phase(), Phase::Idle);
        });
    }

    #[test]
    fn test_handle_commit_without_trigger() {
        let owner = Owner::new();
        owner.with(|| {
            let h = handle();
            let c = Candidate::Note(Note::new("1", "Project Plan", ""));
            assert_eq!(h.commit_candidate("See [[Proj", 10, &c), None);
        });
    }
}
