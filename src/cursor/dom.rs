use super::{locate, text_content, to_linear_offset, TextSurface};
use wasm_bindgen::JsValue;

// Containers a browser may wrap lines in while editing rich `contenteditable`.
const BLOCK_TAGS: &[&str] = &[
    "DIV", "P", "LI", "UL", "OL", "PRE", "BLOCKQUOTE", "H1", "H2", "H3", "H4", "H5", "H6",
];

/// A live `contenteditable` subtree.
#[derive(Clone)]
pub struct DomSurface {
    root: web_sys::Node,
}

impl DomSurface {
    pub fn new(root: web_sys::Node) -> Self {
        Self { root }
    }

    pub fn plain_text(&self) -> String {
        text_content(self)
    }

    /// Linear offset of the window selection's focus, if it lies inside this surface.
    pub fn caret_offset(&self) -> Option<usize> {
        let selection = web_sys::window()?.get_selection().ok().flatten()?;
        let node = selection.focus_node()?;
        if !self.root.contains(Some(&node)) {
            return None;
        }
        Some(to_linear_offset(self, &node, selection.focus_offset() as usize))
    }

    /// Collapse the window selection at `offset`.
    pub fn place_caret(&self, offset: usize) -> Result<(), JsValue> {
        let Some((node, in_node)) = locate(self, offset) else {
            return Ok(());
        };
        let Some(window) = web_sys::window() else {
            return Ok(());
        };
        let Some(document) = window.document() else {
            return Ok(());
        };
        let range = document.create_range()?;
        range.set_start(&node, in_node as u32)?;
        range.collapse_with_to_start(true);
        if let Some(selection) = window.get_selection()? {
            selection.remove_all_ranges()?;
            selection.add_range(&range)?;
        }
        Ok(())
    }
}

impl TextSurface for DomSurface {
    type Node = web_sys::Node;

    fn root(&self) -> Self::Node {
        self.root.clone()
    }

    fn children(&self, node: &Self::Node) -> Vec<Self::Node> {
        let list = node.child_nodes();
        (0..list.length()).filter_map(|i| list.item(i)).collect()
    }

    fn text(&self, node: &Self::Node) -> Option<String> {
        (node.node_type() == web_sys::Node::TEXT_NODE).then(|| node.node_value().unwrap_or_default())
    }

    fn is_line_break(&self, node: &Self::Node) -> bool {
        node.node_name() == "BR"
    }

    fn is_block(&self, node: &Self::Node) -> bool {
        BLOCK_TAGS.contains(&node.node_name().as_str())
    }
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn build() -> (web_sys::Element, web_sys::Node, web_sys::Node) {
        let document = web_sys::window().unwrap().document().unwrap();
        let root = document.create_element("div").unwrap();
        let first = document.create_text_node("See ");
        let bold = document.create_element("b").unwrap();
        let inner = document.create_text_node("[[Pro");
        bold.append_child(&inner).unwrap();
        root.append_child(&first).unwrap();
        root.append_child(&bold).unwrap();
        (root, first.unchecked_into(), inner.unchecked_into())
    }

    #[wasm_bindgen_test]
    fn test_dom_offsets() {
        let (root, first, inner) = build();
        let surface = DomSurface::new(root.clone().unchecked_into());
        assert_eq!(surface.plain_text(), "See [[Pro");
        assert_eq!(to_linear_offset(&surface, &first, 2), 2);
        assert_eq!(to_linear_offset(&surface, &inner, 5), 9);

        let root_node: web_sys::Node = root.unchecked_into();
        assert_eq!(to_linear_offset(&surface, &root_node, 1), 4);
    }

    #[wasm_bindgen_test]
    fn test_line_wrappers_map_to_newlines() {
        let document = web_sys::window().unwrap().document().unwrap();
        let root = document.create_element("div").unwrap();
        let first = document.create_text_node("a");
        let line = document.create_element("div").unwrap();
        let inner = document.create_text_node("[[P");
        line.append_child(&inner).unwrap();
        root.append_child(&first).unwrap();
        root.append_child(&line).unwrap();

        let surface = DomSurface::new(root.clone().unchecked_into());
        let text = surface.plain_text();
        assert_eq!(text, "a\n[[P");

        let inner: web_sys::Node = inner.unchecked_into();
        assert_eq!(to_linear_offset(&surface, &inner, 3), text.encode_utf16().count());
        assert_eq!(to_linear_offset(&surface, &inner, 0), 2);
        let root_node: web_sys::Node = root.unchecked_into();
        assert_eq!(to_linear_offset(&surface, &root_node, 1), 1);
        assert_eq!(locate(&surface, 5), Some((inner, 3)));
    }

    #[wasm_bindgen_test]
    fn test_detached_node_maps_to_end() {
        let (root, _first, _inner) = build();
        let surface = DomSurface::new(root.unchecked_into());
        let document = web_sys::window().unwrap().document().unwrap();
        let stray: web_sys::Node = document.create_text_node("zzz").unchecked_into();
        assert_eq!(to_linear_offset(&surface, &stray, 1), 9);
    }
}
