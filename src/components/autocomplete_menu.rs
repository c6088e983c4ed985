use crate::autocomplete::Phase;
use crate::editor::AutocompleteHandle;
use crate::models::Candidate;
use crate::wiki::tag_color;
use leptos::prelude::*;

const MENU_CLASS: &str = "absolute z-50 mt-1 w-72 max-h-64 overflow-y-auto rounded-md border bg-background p-1 text-sm shadow-md";
const ITEM_CLASS: &str = "flex cursor-default select-none items-center gap-2 rounded-sm px-2 py-1.5 data-[selected=true]:bg-muted hover:bg-muted";
const EMPTY_CLASS: &str = "px-2 py-1.5 text-muted-foreground";

fn swatch_style(candidate: &Candidate) -> String {
    match candidate {
        Candidate::Tag(t) => format!("background-color: {}", t.display_color()),
        Candidate::NewTag(name) => format!("background-color: {}", tag_color(name)),
        Candidate::Note(_) => "display: none".to_string(),
    }
}

fn item_hint(candidate: &Candidate) -> &'static str {
    match candidate {
        Candidate::Note(_) => "note",
        Candidate::Tag(_) => "tag",
        Candidate::NewTag(_) => "new",
    }
}

/// Dropdown for the open autocomplete session of `handle`. Renders nothing while idle.
///
/// Items use `mousedown` so picking one does not blur the editor first.
#[component]
pub fn AutocompleteMenu(handle: AutocompleteHandle, #[prop(into)] on_pick: Callback<Candidate>) -> impl IntoView {
    let state = handle.state();

    view! {
        <Show when=move || state.with(|c| c.is_open())>
            <div class=MENU_CLASS role="listbox" data-name="AutocompleteMenu">
                {move || {
                    state.with(|c| {
                        if c.phase() == Phase::Loading {
                            return view! { <div class=EMPTY_CLASS>"Searching..."</div> }.into_any();
                        }
                        if c.candidates().is_empty() {
                            return view! { <div class=EMPTY_CLASS>"No matches"</div> }.into_any();
                        }

                        let highlighted = c.highlighted();
                        c.candidates()
                            .iter()
                            .cloned()
                            .enumerate()
                            .map(|(i, candidate)| {
                                let selected = highlighted == Some(i);
                                let label = candidate.label();
                                let hint = item_hint(&candidate);
                                let key = candidate.key();
                                let swatch = swatch_style(&candidate);
                                view! {
                                    <div
                                        class=ITEM_CLASS
                                        role="option"
                                        aria-selected=selected.to_string()
                                        data-selected=selected.to_string()
                                        data-key=key
                                        on:mouseenter=move |_| handle.highlight(i)
                                        on:mousedown=move |ev: web_sys::MouseEvent| {
                                            ev.prevent_default();
                                            on_pick.run(candidate.clone());
                                        }
                                    >
                                        <span class="size-2 shrink-0 rounded-full" style=swatch></span>
                                        <span class="flex-1 truncate">{label}</span>
                                        <span class="text-xs text-muted-foreground">{hint}</span>
                                    </div>
                                }
                            })
                            .collect_view()
                            .into_any()
                    })
                }}
            </div>
        </Show>
    }
}
