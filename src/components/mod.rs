pub mod autocomplete_menu;
pub mod link_panel;
pub mod marked_text;

pub use autocomplete_menu::*;
pub use link_panel::*;
pub use marked_text::*;
