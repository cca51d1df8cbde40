// ABOUTME: HTML parsing into the arena Document and serialization back to markup.
// ABOUTME: Parsing is delegated to scraper; serialization escapes text and attributes.

use ego_tree::NodeRef;
use scraper::{Html, Node as HtmlNode};

use super::{Document, Element, NodeId, NodeKind};
use crate::html_utils::{escape_attr, escape_text};

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Elements whose text children are emitted without escaping. The parser runs
/// with scripting enabled, so `noscript` content is raw text too.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "iframe", "noembed", "noframes", "noscript", "plaintext", "script", "style", "xmp",
];

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Elements whose first newline is eaten by the parser.
const NEWLINE_ELEMENTS: &[&str] = &["listing", "pre", "textarea"];

pub(super) fn parse_document(source: &str) -> Document {
    let parsed = Html::parse_document(source);
    let mut doc = Document::new();
    let root = doc.root();
    for child in parsed.tree.root().children() {
        import_node(&mut doc, root, child);
    }
    doc
}

fn import_node(doc: &mut Document, parent: NodeId, node: NodeRef<'_, HtmlNode>) {
    let kind = match node.value() {
        HtmlNode::Doctype(doctype) => NodeKind::Doctype(doctype.name().to_string()),
        HtmlNode::Comment(comment) => NodeKind::Comment(comment.to_string()),
        HtmlNode::Text(text) => NodeKind::Text(text.to_string()),
        HtmlNode::Element(element) => NodeKind::Element(Element {
            tag_name: element.name().to_string(),
            attrs: element
                .attrs
                .iter()
                .map(|(name, value)| {
                    (attr_name(name.prefix.as_deref(), &name.local), value.to_string())
                })
                .collect(),
            foreign: &*element.name.ns != HTML_NAMESPACE,
        }),
        HtmlNode::Document | HtmlNode::Fragment | HtmlNode::ProcessingInstruction(_) => return,
    };
    let id = doc.push_node(Some(parent), kind);
    for child in node.children() {
        import_node(doc, id, child);
    }
}

/// SVG and MathML attributes such as `xlink:href` keep their prefix.
fn attr_name(prefix: Option<&str>, local: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}:{local}"),
        None => local.to_string(),
    }
}

pub(super) fn serialize(doc: &Document) -> String {
    let mut out = String::new();
    for child in &doc.node(doc.root()).children {
        write_node(doc, *child, false, &mut out);
    }
    out
}

fn write_node(doc: &Document, id: NodeId, raw_text: bool, out: &mut String) {
    let node = doc.node(id);
    match &node.kind {
        NodeKind::Document => {
            for child in &node.children {
                write_node(doc, *child, false, out);
            }
        }
        NodeKind::Doctype(name) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            out.push('>');
        }
        NodeKind::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeKind::Text(text) => {
            if raw_text {
                out.push_str(text);
            } else {
                out.push_str(&escape_text(text));
            }
        }
        NodeKind::Element(element) => {
            out.push('<');
            out.push_str(&element.tag_name);
            for (name, value) in &element.attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&escape_attr(value));
                out.push('"');
            }
            out.push('>');

            let html_tag = (!element.foreign).then_some(element.tag_name.as_str());
            if html_tag.is_some_and(|tag| VOID_ELEMENTS.contains(&tag)) {
                return;
            }
            if html_tag.is_some_and(|tag| NEWLINE_ELEMENTS.contains(&tag))
                && starts_with_newline(doc, node.children.first().copied())
            {
                out.push('\n');
            }

            let raw = html_tag.is_some_and(|tag| RAW_TEXT_ELEMENTS.contains(&tag));
            for child in &node.children {
                write_node(doc, *child, raw, out);
            }

            out.push_str("</");
            out.push_str(&element.tag_name);
            out.push('>');
        }
    }
}

fn starts_with_newline(doc: &Document, first: Option<NodeId>) -> bool {
    first.is_some_and(|id| {
        matches!(&doc.node(id).kind, NodeKind::Text(text) if text.starts_with('\n'))
    })
}
