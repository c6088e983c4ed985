//! Wiki-link and tag resolution for a note-taking front end.
//!
//! `[[Title]]` links and `#tag` markers are parsed out of plain note text, offered
//! through a caret-synced autocomplete while typing, and resolved into backlink and
//! outgoing-link lists. The pure pieces (grammar, trigger detection, controller,
//! graph) run anywhere; [`editor`] and [`components`] bind them to Leptos and the DOM.

pub mod api;
pub mod autocomplete;
pub mod components;
pub mod config;
pub mod cursor;
pub mod editor;
pub mod graph;
pub mod lookup;
pub mod models;
pub mod offset;
pub mod trigger;
pub mod wiki;

pub use api::{ApiClient, ApiError};
pub use autocomplete::{apply_completion, AutocompleteController, Commit, KeyOutcome, NavKey, Phase};
pub use components::{AutocompleteMenu, LinkPanel, LinkTarget, MarkedText};
pub use config::EngineConfig;
pub use editor::{AutocompleteHandle, NoteEditor};
pub use graph::{backlink_context, resolve_links, LinkGraph};
pub use lookup::{run_lookup, CandidateSource, LookupError, NoteIndex};
pub use models::{Candidate, Note, Tag};
pub use trigger::{detect_trigger, Trigger, TriggerKind};
pub use wiki::{extract_tags, extract_wiki_links, tokenize, Token};

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

/// Installs the panic hook and routes `tracing` output to the browser console.
#[cfg(target_arch = "wasm32")]
#[cfg_attr(not(test), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    // A host page may already have installed a subscriber.
    let _ = tracing_wasm::try_set_as_global_default();
    tracing::debug!("linkweave: started");
}
