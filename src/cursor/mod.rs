//! Caret position ↔ linear text offset.
//!
//! An editing surface is read as an ordered sequence of text leaves at the moment of
//! the query. Nothing is cached: the tree may be rebuilt between keystrokes.
//! Offsets are UTF-16 code units, the unit browsers use for selections; convert with
//! [`crate::offset`] before slicing Rust strings.

mod dom;

pub use dom::DomSurface;

/// Read-only view of a tree of text leaves.
///
/// Line structure follows what browsers produce for edited text: a `<br>` is a
/// newline unless it is the last child of its parent (a placeholder keeping an empty
/// line open), and a block container starts and ends a line.
pub trait TextSurface {
    type Node: Clone + PartialEq;

    fn root(&self) -> Self::Node;
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;
    /// `Some` for text leaves, `None` for containers.
    fn text(&self, node: &Self::Node) -> Option<String>;

    fn is_line_break(&self, _node: &Self::Node) -> bool {
        false
    }

    fn is_block(&self, _node: &Self::Node) -> bool {
        false
    }
}

fn unit_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// The surface read front to back as one string, with the leaves it came from.
struct Flattened<N> {
    text: String,
    units: usize,
    /// A block boundary was crossed; the next content starts a new line.
    pending_break: bool,
    /// The last newline opened a line nothing has claimed yet.
    fresh_line: bool,
    /// `(leaf, start, len)` in code units.
    leaves: Vec<(N, usize, usize)>,
    caret: Option<usize>,
}

impl<N> Flattened<N> {
    fn break_units(&self) -> usize {
        usize::from(self.pending_break && !self.text.is_empty() && !self.fresh_line)
    }

    fn flush_break(&mut self) {
        if self.break_units() == 1 {
            self.push("\n");
        }
        self.pending_break = false;
    }

    fn push(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.text.push_str(s);
        self.units += unit_len(s);
        self.fresh_line = s.ends_with('\n');
    }

    fn set_caret(&mut self, at: usize) {
        if self.caret.is_none() {
            self.caret = Some(at);
        }
    }
}

fn flatten<S: TextSurface>(surface: &S, caret: Option<(&S::Node, usize)>) -> Flattened<S::Node> {
    let mut flat = Flattened {
        text: String::new(),
        units: 0,
        pending_break: false,
        fresh_line: false,
        leaves: Vec::new(),
        caret: None,
    };
    visit(surface, &surface.root(), true, caret, &mut flat);
    flat
}

fn visit<S: TextSurface>(
    surface: &S,
    node: &S::Node,
    last_child: bool,
    caret: Option<(&S::Node, usize)>,
    flat: &mut Flattened<S::Node>,
) {
    let node_offset = match caret {
        Some((target, offset)) if target == node => Some(offset),
        _ => None,
    };

    if let Some(text) = surface.text(node) {
        let len = unit_len(&text);
        if len > 0 || node_offset.is_some() {
            flat.flush_break();
        }
        if let Some(offset) = node_offset {
            flat.set_caret(flat.units + offset.min(len));
        }
        flat.leaves.push((node.clone(), flat.units, len));
        flat.push(&text);
        return;
    }

    if surface.is_line_break(node) {
        flat.flush_break();
        if node_offset.is_some() {
            flat.set_caret(flat.units);
        }
        if last_child {
            // Placeholder: the line it holds open is real even when empty.
            flat.fresh_line = false;
        } else {
            flat.push("\n");
        }
        return;
    }

    let block = surface.is_block(node);
    if block {
        flat.pending_break = true;
    }
    let children = surface.children(node);
    for (i, child) in children.iter().enumerate() {
        if node_offset == Some(i) {
            flat.set_caret(flat.units + flat.break_units());
        }
        visit(surface, child, i + 1 == children.len(), caret, flat);
    }
    if node_offset.is_some() {
        flat.set_caret(flat.units);
    }
    if block {
        flat.pending_break = true;
    }
}

/// Linear offset of the caret `(node, node_offset)` within the surface's text.
///
/// For a text leaf `node_offset` counts code units (clamped to the leaf); for a
/// container it counts child nodes, as DOM carets do. A node that is not part of the
/// surface maps to the end of the document.
pub fn to_linear_offset<S: TextSurface>(surface: &S, node: &S::Node, node_offset: usize) -> usize {
    let flat = flatten(surface, Some((node, node_offset)));
    flat.caret.unwrap_or(flat.units)
}

/// Text of the whole surface in document order, line breaks included.
pub fn text_content<S: TextSurface>(surface: &S) -> String {
    flatten(surface, None).text
}

/// Text leaf and in-leaf offset for a linear offset; used to restore the caret after
/// a rewrite. Offsets past the end land at the end of the last leaf, and an offset on
/// a line without any text leaf snaps to the start of the next leaf.
pub fn locate<S: TextSurface>(surface: &S, offset: usize) -> Option<(S::Node, usize)> {
    let leaves = flatten(surface, None).leaves;
    let last = leaves.last().map(|(node, _, len)| (node.clone(), *len));
    leaves
        .into_iter()
        .find(|(_, start, len)| offset <= start + len)
        .map(|(node, start, _)| (node, offset.saturating_sub(start)))
        .or(last)
}

/// Owned in-memory surface. Nodes are addressed by their child-index path from the
/// root (the root itself is the empty path).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fragment {
    Text(String),
    /// Inline container.
    Element(Vec<Fragment>),
    /// Line-level container, like `<div>` or `<p>`.
    Block(Vec<Fragment>),
    /// `<br>`.
    Break,
}

impl Fragment {
    pub fn text(s: impl Into<String>) -> Self {
        Fragment::Text(s.into())
    }

    pub fn element(children: Vec<Fragment>) -> Self {
        Fragment::Element(children)
    }

    pub fn block(children: Vec<Fragment>) -> Self {
        Fragment::Block(children)
    }

    fn child_list(&self) -> Option<&[Fragment]> {
        match self {
            Fragment::Element(children) | Fragment::Block(children) => Some(children),
            Fragment::Text(_) | Fragment::Break => None,
        }
    }

    pub fn at(&self, path: &[usize]) -> Option<&Fragment> {
        let Some((first, rest)) = path.split_first() else {
            return Some(self);
        };
        self.child_list()?.get(*first)?.at(rest)
    }
}

impl TextSurface for Fragment {
    type Node = Vec<usize>;

    fn root(&self) -> Self::Node {
        Vec::new()
    }

    fn children(&self, node: &Self::Node) -> Vec<Self::Node> {
        let count = self.at(node).and_then(Fragment::child_list).map_or(0, <[Fragment]>::len);
        (0..count)
            .map(|i| {
                let mut path = node.clone();
                path.push(i);
                path
            })
            .collect()
    }

    fn text(&self, node: &Self::Node) -> Option<String> {
        match self.at(node) {
            Some(Fragment::Text(s)) => Some(s.clone()),
            _ => None,
        }
    }

    fn is_line_break(&self, node: &Self::Node) -> bool {
        matches!(self.at(node), Some(Fragment::Break))
    }

    fn is_block(&self, node: &Self::Node) -> bool {
        matches!(self.at(node), Some(Fragment::Block(_)))
    }
}
