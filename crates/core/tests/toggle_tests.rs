// ABOUTME: Integration tests for the visibility toggler over the arena document.
// ABOUTME: Covers group and title toggling, the greeting, and flip properties via proptest.

use kinopy_core::{Document, DocumentTree, NodeId, Notifier, VisibilityToggler, GREETING};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[derive(Default)]
struct Recorder {
    messages: Vec<String>,
}

impl Notifier for Recorder {
    fn acknowledge(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}

fn toggler() -> VisibilityToggler<Recorder> {
    VisibilityToggler::new(Recorder::default())
}

fn hidden_states(doc: &Document, nodes: &[NodeId]) -> Vec<bool> {
    nodes.iter().map(|n| doc.is_hidden(*n)).collect()
}

/// Appends `<li>` items with the given titles under a fresh `<ul>`.
fn title_list(doc: &mut Document, titles: &[&str]) -> Vec<NodeId> {
    let root = doc.root();
    let ul = doc.create_element(root, "ul", &[]);
    titles
        .iter()
        .map(|title| {
            let li = doc.create_element(ul, "li", &[]);
            doc.append_text(li, title);
            li
        })
        .collect()
}

#[test]
fn test_group_toggle_hides_then_shows_every_member() {
    let mut doc = Document::new();
    let root = doc.root();
    let members: Vec<NodeId> = (0..3)
        .map(|_| doc.create_element(root, "div", &["cinemaA"]))
        .collect();
    let other = doc.create_element(root, "div", &["cinemaB"]);
    let t = toggler();

    t.toggle_by_group(&mut doc, "cinemaA");
    assert_eq!(hidden_states(&doc, &members), vec![true, true, true]);
    assert!(!doc.is_hidden(other));

    t.toggle_by_group(&mut doc, "cinemaA");
    assert_eq!(hidden_states(&doc, &members), vec![false, false, false]);
}

#[test]
fn test_group_members_flip_independently() {
    let mut doc = Document::new();
    let root = doc.root();
    let visible = doc.create_element(root, "div", &["cinemaA"]);
    let hidden = doc.create_element(root, "div", &["cinemaA", "hidden"]);

    toggler().toggle_by_group(&mut doc, "cinemaA");

    assert!(doc.is_hidden(visible));
    assert!(!doc.is_hidden(hidden));
    assert_eq!(doc.classes(hidden), vec!["cinemaA".to_string()]);
}

#[test]
fn test_group_toggle_keeps_other_labels() {
    let mut doc = Document::new();
    let root = doc.root();
    let node = doc.create_element(root, "div", &["cinema-root", "the-brattle"]);
    let t = toggler();

    t.toggle_by_group(&mut doc, "the-brattle");
    assert!(doc.class_list_contains(node, "cinema-root"));
    assert!(doc.class_list_contains(node, "hidden"));

    t.toggle_by_group(&mut doc, "the-brattle");
    assert_eq!(
        doc.classes(node),
        vec!["cinema-root".to_string(), "the-brattle".to_string()]
    );
}

#[test]
fn test_unknown_or_blank_group_changes_nothing() {
    let mut doc = Document::new();
    let root = doc.root();
    let node = doc.create_element(root, "div", &["cinemaA"]);
    let before = doc.to_html();
    let t = toggler();

    t.toggle_by_group(&mut doc, "nobody");
    t.toggle_by_group(&mut doc, "");
    t.toggle_by_group(&mut doc, "   ");

    assert!(!doc.is_hidden(node));
    assert_eq!(doc.to_html(), before);
}

#[test]
fn test_title_toggle_flips_every_exact_match() {
    let mut doc = Document::new();
    let items = title_list(&mut doc, &["Dune", "Alien", "Dune", "Dune 2"]);

    toggler().toggle_by_text(&mut doc, "Dune");

    assert_eq!(hidden_states(&doc, &items), vec![true, false, true, false]);
}

#[test]
fn test_same_titled_items_flip_independently() {
    let mut doc = Document::new();
    let root = doc.root();
    let hidden = doc.create_element(root, "li", &["hidden"]);
    doc.append_text(hidden, "Dune");
    let visible = doc.create_element(root, "li", &[]);
    doc.append_text(visible, "Dune");

    toggler().toggle_by_text(&mut doc, "Dune");

    assert!(!doc.is_hidden(hidden));
    assert!(doc.is_hidden(visible));
}

#[test]
fn test_title_match_is_exact_including_whitespace() {
    let mut doc = Document::new();
    let items = title_list(&mut doc, &["Inception ", "inception", "Inception"]);

    toggler().toggle_by_text(&mut doc, "Inception");

    assert_eq!(hidden_states(&doc, &items), vec![false, false, true]);
}

#[test]
fn test_title_toggle_reads_nested_text_and_ignores_other_elements() {
    let mut doc = Document::new();
    let root = doc.root();
    let li = doc.create_element(root, "li", &[]);
    let a = doc.create_element(li, "a", &[]);
    let i = doc.create_element(a, "i", &[]);
    doc.append_text(i, "Dune");
    let span = doc.create_element(root, "span", &[]);
    doc.append_text(span, "Dune");

    toggler().toggle_by_text(&mut doc, "Dune");

    assert!(doc.is_hidden(li));
    assert!(!doc.is_hidden(i));
    assert!(!doc.is_hidden(span));
}

#[test]
fn test_title_toggle_with_no_match_is_noop() {
    let mut doc = Document::new();
    let items = title_list(&mut doc, &["Dune"]);

    toggler().toggle_by_text(&mut doc, "Alien");

    assert_eq!(hidden_states(&doc, &items), vec![false]);
}

#[test]
fn test_notify_shows_greeting_once() {
    let mut doc = Document::new();
    let items = title_list(&mut doc, &["Dune"]);
    let mut t = toggler();

    t.notify();

    assert_eq!(t.notifier().messages, vec![GREETING.to_string()]);
    assert_eq!(GREETING, "hi!");
    assert_eq!(hidden_states(&doc, &items), vec![false]);
}

proptest! {
    #[test]
    fn prop_group_toggle_flips_members_only(
        nodes in proptest::collection::vec((any::<bool>(), any::<bool>()), 0..24)
    ) {
        let mut doc = Document::new();
        let root = doc.root();
        let ids: Vec<NodeId> = nodes
            .iter()
            .map(|&(member, hidden)| {
                let mut classes = vec![if member { "grp" } else { "other" }];
                if hidden {
                    classes.push("hidden");
                }
                doc.create_element(root, "div", &classes)
            })
            .collect();
        let before = hidden_states(&doc, &ids);
        let t = toggler();

        t.toggle_by_group(&mut doc, "grp");
        let after = hidden_states(&doc, &ids);
        for (idx, &(member, _)) in nodes.iter().enumerate() {
            prop_assert_eq!(after[idx], before[idx] != member);
        }

        t.toggle_by_group(&mut doc, "grp");
        prop_assert_eq!(hidden_states(&doc, &ids), before);
    }

    #[test]
    fn prop_title_toggle_twice_restores_state(
        picks in proptest::collection::vec(0usize..3, 0..16),
        target in 0usize..3,
    ) {
        let pool = ["Dune", "Dune 2", "Alien"];
        let titles: Vec<&str> = picks.iter().map(|&p| pool[p]).collect();
        let mut doc = Document::new();
        let items = title_list(&mut doc, &titles);
        let t = toggler();

        t.toggle_by_text(&mut doc, pool[target]);
        for (idx, &p) in picks.iter().enumerate() {
            prop_assert_eq!(doc.is_hidden(items[idx]), p == target);
        }

        t.toggle_by_text(&mut doc, pool[target]);
        prop_assert!(items.iter().all(|n| !doc.is_hidden(*n)));
    }
}
