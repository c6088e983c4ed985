use crate::graph::{backlink_context, resolve_links};
use crate::models::Note;
use leptos::prelude::*;

/// One entry in a link list, detached from the note collection it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkRow {
    pub id: String,
    pub title: String,
    pub context: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkRows {
    pub backlinks: Vec<LinkRow>,
    pub outgoing: Vec<LinkRow>,
}

impl LinkRows {
    pub fn build(target: &Note, all: &[Note]) -> Self {
        let graph = resolve_links(target, all);
        let backlinks = graph
            .backlinks
            .iter()
            .map(|n| LinkRow {
                id: n.id.clone(),
                title: n.title.clone(),
                context: backlink_context(&n.content, &target.title),
            })
            .collect();
        let outgoing = graph
            .outgoing
            .iter()
            .map(|n| LinkRow {
                id: n.id.clone(),
                title: n.title.clone(),
                context: None,
            })
            .collect();
        Self { backlinks, outgoing }
    }
}

fn link_section(label: &'static str, rows: Vec<LinkRow>, on_select: Callback<String>) -> impl IntoView {
    let count = rows.len();
    view! {
        <section class="flex flex-col gap-1">
            <h3 class="text-xs font-semibold uppercase text-muted-foreground">
                {label} " (" {count} ")"
            </h3>
            {if rows.is_empty() {
                view! { <p class="text-sm text-muted-foreground">"None"</p> }.into_any()
            } else {
                rows.into_iter()
                    .map(|row| {
                        let id = row.id.clone();
                        view! {
                            <button
                                class="flex flex-col items-start rounded-md px-2 py-1 text-left hover:bg-muted"
                                on:click=move |_| on_select.run(id.clone())
                            >
                                <span class="text-sm font-medium">{row.title}</span>
                                {row.context.map(|c| view! { <span class="text-xs text-muted-foreground">{c}</span> })}
                            </button>
                        }
                    })
                    .collect_view()
                    .into_any()
            }}
        </section>
    }
}

/// Backlinks and outgoing links of the selected note, recomputed whenever
/// the note or the collection changes. `on_select` receives a note id.
#[component]
pub fn LinkPanel(
    #[prop(into)] note: Signal<Option<Note>>,
    #[prop(into)] notes: Signal<Vec<Note>>,
    #[prop(into)] on_select: Callback<String>,
) -> impl IntoView {
    let rows = Memo::new(move |_| {
        note.with(|target| match target {
            Some(target) => notes.with(|all| LinkRows::build(target, all)),
            None => LinkRows::default(),
        })
    });

    view! {
        <aside class="flex flex-col gap-4 p-2" data-name="LinkPanel">
            {move || {
                let LinkRows { backlinks, outgoing } = rows.get();
                tracing::debug!(backlinks = backlinks.len(), outgoing = outgoing.len(), "links: panel refreshed");
                view! {
                    {link_section("Backlinks", backlinks, on_select)}
                    {link_section("Outgoing links", outgoing, on_select)}
                }
            }}
        </aside>
    }
}
