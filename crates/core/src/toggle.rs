// ABOUTME: Visibility toggler that shows or hides document nodes via the "hidden" class.
// ABOUTME: Provides VisibilityToggler plus the Notifier capability and a console implementation.

use std::io::{BufRead, Write};

use tracing::debug;

use crate::dom::DocumentTree;

/// Class whose presence suppresses rendering of a node.
pub const HIDDEN_CLASS: &str = "hidden";

/// Element kind scanned by [`VisibilityToggler::toggle_by_text`].
pub const TITLE_ELEMENT: &str = "li";

/// Message shown by [`VisibilityToggler::notify`].
pub const GREETING: &str = "hi!";

/// A blocking, user-facing acknowledgment.
pub trait Notifier {
    /// Shows `message` and returns once the user has dismissed it.
    fn acknowledge(&mut self, message: &str);
}

/// Prints the message and blocks until a line (or EOF) arrives on the input.
pub struct ConsoleNotifier<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsoleNotifier<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: BufRead, W: Write> Notifier for ConsoleNotifier<R, W> {
    fn acknowledge(&mut self, message: &str) {
        // The dialog has no failure channel; a broken terminal simply stops blocking.
        let _ = writeln!(self.output, "{message}");
        let _ = write!(self.output, "[press Enter to dismiss] ");
        let _ = self.output.flush();
        let mut line = String::new();
        let _ = self.input.read_line(&mut line);
    }
}

/// Flips the hidden class on nodes selected by group or by exact text.
pub struct VisibilityToggler<N> {
    notifier: N,
}

impl<N: Notifier> VisibilityToggler<N> {
    pub fn new(notifier: N) -> Self {
        Self { notifier }
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Shows the greeting and blocks until it is dismissed.
    pub fn notify(&mut self) {
        self.notifier.acknowledge(GREETING);
    }

    /// Toggles every node belonging to `group`. Unknown groups are a no-op.
    pub fn toggle_by_group<D: DocumentTree>(&self, doc: &mut D, group: &str) {
        let matched = doc.elements_by_class_name(group);
        debug!(group, matched = matched.len(), "toggling group");
        for node in matched {
            flip_hidden(doc, node);
        }
    }

    /// Toggles every title element whose full text equals `title` exactly.
    pub fn toggle_by_text<D: DocumentTree>(&self, doc: &mut D, title: &str) {
        let matched: Vec<D::Node> = doc
            .elements_by_tag_name(TITLE_ELEMENT)
            .into_iter()
            .filter(|node| doc.text_content(*node) == title)
            .collect();
        debug!(title, matched = matched.len(), "toggling title");
        for node in matched {
            flip_hidden(doc, node);
        }
    }
}

fn flip_hidden<D: DocumentTree>(doc: &mut D, node: D::Node) {
    if doc.class_list_contains(node, HIDDEN_CLASS) {
        doc.class_list_remove(node, HIDDEN_CLASS);
    } else {
        doc.class_list_add(node, HIDDEN_CLASS);
    }
}
