use crate::wiki::{tag_color, tokenize, Token};
use leptos::prelude::*;

/// What a click in rendered note text points at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinkTarget {
    /// A `[[title]]` link, by trimmed title.
    Note(String),
    /// A `#name` tag, without the `#`.
    Tag(String),
}

impl LinkTarget {
    fn from_token(token: &Token) -> Option<Self> {
        match token {
            Token::WikiLink { title, .. } if !title.is_empty() => Some(LinkTarget::Note(title.clone())),
            Token::Tag { name } => Some(LinkTarget::Tag(name.clone())),
            _ => None,
        }
    }
}

const LINK_CLASS: &str = "cursor-pointer rounded px-0.5 text-primary underline-offset-2 hover:underline";
const TAG_CLASS: &str = "cursor-pointer rounded px-1 text-sm font-medium";

/// Read-only note body with clickable wiki-links and tags.
#[component]
pub fn MarkedText(
    #[prop(into)] content: Signal<String>,
    #[prop(into)] on_link_click: Callback<LinkTarget>,
) -> impl IntoView {
    let render = move |token: Token| {
        let Some(target) = LinkTarget::from_token(&token) else {
            return view! { <span>{token.raw()}</span> }.into_any();
        };

        let (class, style, text) = match &token {
            Token::Tag { name } => (TAG_CLASS, format!("color: {}", tag_color(name)), token.raw()),
            _ => (LINK_CLASS, String::new(), token.raw()),
        };
        let on_key_target = target.clone();
        view! {
            <span
                class=class
                style=style
                role="button"
                tabindex="0"
                on:click=move |_| on_link_click.run(target.clone())
                on:keydown=move |ev: web_sys::KeyboardEvent| {
                    if ev.key() == "Enter" {
                        on_link_click.run(on_key_target.clone());
                    }
                }
            >
                {text}
            </span>
        }
        .into_any()
    };

    view! {
        <div class="whitespace-pre-wrap break-words" data-name="MarkedText">
            {move || content.with(|c| tokenize(c)).into_iter().map(render).collect_view()}
        </div>
    }
}
