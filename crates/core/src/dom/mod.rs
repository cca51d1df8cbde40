// ABOUTME: Document tree capability used by the visibility toggler and an arena implementation.
// ABOUTME: Provides the DocumentTree trait, Document, NodeId, and class-list helpers.

mod html;

/// Access to a tree of labeled nodes.
///
/// Lookups return snapshots in document order, so callers may mutate the tree
/// while walking a result without invalidating it.
pub trait DocumentTree {
    type Node: Copy;

    /// Nodes carrying every label in the whitespace-separated `names`.
    fn elements_by_class_name(&self, names: &str) -> Vec<Self::Node>;

    /// Nodes whose element kind is `tag` (ASCII case-insensitive).
    fn elements_by_tag_name(&self, tag: &str) -> Vec<Self::Node>;

    /// Concatenated text of every descendant text node.
    fn text_content(&self, node: Self::Node) -> String;

    fn class_list_contains(&self, node: Self::Node, class: &str) -> bool;

    fn class_list_add(&mut self, node: Self::Node, class: &str);

    fn class_list_remove(&mut self, node: Self::Node, class: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum NodeKind {
    Document,
    Doctype(String),
    Comment(String),
    Text(String),
    Element(Element),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Element {
    pub(crate) tag_name: String,
    pub(crate) attrs: Vec<(String, String)>,
    /// SVG or MathML; names keep their case and HTML-only serialization rules are skipped.
    pub(crate) foreign: bool,
}

impl Element {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.attrs.push((name.to_string(), value.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) kind: NodeKind,
}

/// An arena-allocated HTML document.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Document,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Parses a full HTML document.
    pub fn parse_html(source: &str) -> Self {
        html::parse_document(source)
    }

    /// Serializes the document back to HTML.
    pub fn to_html(&self) -> String {
        html::serialize(self)
    }

    pub(crate) fn push_node(&mut self, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            kind,
        });
        if let Some(parent_id) = parent {
            self.nodes[parent_id.0].children.push(id);
        }
        id
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    /// Appends an element with the given class labels under `parent`.
    pub fn create_element(&mut self, parent: NodeId, tag: &str, classes: &[&str]) -> NodeId {
        let mut attrs = Vec::new();
        if !classes.is_empty() {
            attrs.push(("class".to_string(), classes.join(" ")));
        }
        self.push_node(
            Some(parent),
            NodeKind::Element(Element {
                tag_name: tag.to_ascii_lowercase(),
                attrs,
                foreign: false,
            }),
        )
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.push_node(Some(parent), NodeKind::Text(text.to_string()))
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node).and_then(|element| element.attr(name))
    }

    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|element| element.tag_name.as_str())
    }

    /// Current class labels of `node`, in attribute order.
    pub fn classes(&self, node: NodeId) -> Vec<String> {
        class_tokens(self.attribute(node, "class"))
    }

    pub fn is_hidden(&self, node: NodeId) -> bool {
        self.class_list_contains(node, crate::toggle::HIDDEN_CLASS)
    }

    fn element(&self, node: NodeId) -> Option<&Element> {
        match &self.nodes.get(node.0)?.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(node.0)?.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Element nodes in document (pre-order) order.
    fn elements(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            if matches!(self.nodes[id.0].kind, NodeKind::Element(_)) {
                out.push(id);
            }
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        out
    }

    fn write_text(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id.0].kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Document | NodeKind::Element(_) => {
                for child in &self.nodes[id.0].children {
                    self.write_text(*child, out);
                }
            }
            NodeKind::Doctype(_) | NodeKind::Comment(_) => {}
        }
    }
}

impl DocumentTree for Document {
    type Node = NodeId;

    fn elements_by_class_name(&self, names: &str) -> Vec<NodeId> {
        let wanted = class_tokens(Some(names));
        if wanted.is_empty() {
            return Vec::new();
        }
        self.elements()
            .into_iter()
            .filter(|id| {
                let have = self.classes(*id);
                wanted.iter().all(|class| have.contains(class))
            })
            .collect()
    }

    fn elements_by_tag_name(&self, tag: &str) -> Vec<NodeId> {
        self.elements()
            .into_iter()
            .filter(|id| {
                self.tag_name(*id)
                    .is_some_and(|name| tag == "*" || name.eq_ignore_ascii_case(tag))
            })
            .collect()
    }

    fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_text(node, &mut out);
        out
    }

    fn class_list_contains(&self, node: NodeId, class: &str) -> bool {
        self.classes(node).iter().any(|c| c == class)
    }

    fn class_list_add(&mut self, node: NodeId, class: &str) {
        let mut classes = self.classes(node);
        if classes.iter().any(|c| c == class) {
            return;
        }
        classes.push(class.to_string());
        self.set_classes(node, &classes);
    }

    fn class_list_remove(&mut self, node: NodeId, class: &str) {
        let mut classes = self.classes(node);
        let before = classes.len();
        classes.retain(|c| c != class);
        if classes.len() != before {
            self.set_classes(node, &classes);
        }
    }
}

impl Document {
    fn set_classes(&mut self, node: NodeId, classes: &[String]) {
        if let Some(element) = self.element_mut(node) {
            if classes.is_empty() {
                element.attrs.retain(|(name, _)| name != "class");
            } else {
                element.set_attr("class", &classes.join(" "));
            }
        }
    }
}

fn class_tokens(class_attr: Option<&str>) -> Vec<String> {
    class_attr
        .map(|value| {
            value
                .split_ascii_whitespace()
                .map(ToOwned::to_owned)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let root = doc.root();
        let ul = doc.create_element(root, "ul", &["films"]);
        let a = doc.create_element(ul, "li", &["cinema-a", "late"]);
        doc.append_text(a, "Dune");
        let b = doc.create_element(ul, "LI", &["cinema-b"]);
        let i = doc.create_element(b, "i", &[]);
        doc.append_text(i, "Alien");
        (doc, ul, a, b)
    }

    #[test]
    fn class_lookup_requires_every_label() {
        let (doc, _, a, _) = sample();
        assert_eq!(doc.elements_by_class_name("late cinema-a"), vec![a]);
        assert!(doc.elements_by_class_name("cinema-a cinema-b").is_empty());
        assert!(doc.elements_by_class_name("   ").is_empty());
    }

    #[test]
    fn tag_lookup_is_case_insensitive_and_ordered() {
        let (doc, _, a, b) = sample();
        assert_eq!(doc.elements_by_tag_name("li"), vec![a, b]);
        assert_eq!(doc.elements_by_tag_name("LI"), vec![a, b]);
    }

    #[test]
    fn text_content_concatenates_descendants() {
        let (doc, ul, _, b) = sample();
        assert_eq!(doc.text_content(b), "Alien");
        assert_eq!(doc.text_content(ul), "DuneAlien");
    }

    #[test]
    fn parent_links_follow_creation() {
        let (doc, ul, a, _) = sample();
        assert_eq!(doc.parent(a), Some(ul));
        assert_eq!(doc.parent(ul), Some(doc.root()));
        assert_eq!(doc.parent(doc.root()), None);
    }

    #[test]
    fn class_list_add_remove_round_trip() {
        let (mut doc, _, _, b) = sample();
        doc.class_list_add(b, "hidden");
        doc.class_list_add(b, "hidden");
        assert_eq!(doc.classes(b), vec!["cinema-b", "hidden"]);
        doc.class_list_remove(b, "cinema-b");
        doc.class_list_remove(b, "hidden");
        assert!(doc.classes(b).is_empty());
        assert_eq!(doc.attribute(b, "class"), None);
    }
}
