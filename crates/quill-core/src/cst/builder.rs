//! Thin wrapper over rowan's `GreenNodeBuilder`

use rowan::{Checkpoint, GreenNode, GreenNodeBuilder};

use super::{QuillSyntaxKind, QuillSyntaxNode};

/// Incremental CST builder used by the parser and by tests that assemble trees by hand
#[derive(Debug, Default)]
pub struct CstBuilder {
    inner: GreenNodeBuilder<'static>,
}

impl CstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_node(&mut self, kind: QuillSyntaxKind) {
        self.inner.start_node(kind.into());
    }

    pub fn start_node_at(&mut self, checkpoint: Checkpoint, kind: QuillSyntaxKind) {
        self.inner.start_node_at(checkpoint, kind.into());
    }

    pub fn checkpoint(&self) -> Checkpoint {
        self.inner.checkpoint()
    }

    pub fn token(&mut self, kind: QuillSyntaxKind, text: &str) {
        self.inner.token(kind.into(), text);
    }

    pub fn finish_node(&mut self) {
        self.inner.finish_node();
    }

    pub fn finish_green(self) -> GreenNode {
        self.inner.finish()
    }

    pub fn finish(self) -> QuillSyntaxNode {
        QuillSyntaxNode::new_root(self.finish_green())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_a_tree_by_hand() {
        let mut builder = CstBuilder::new();
        builder.start_node(QuillSyntaxKind::Root);
        let checkpoint = builder.checkpoint();
        builder.token(QuillSyntaxKind::Ident, "x");
        builder.token(QuillSyntaxKind::Semicolon, ";");
        builder.start_node_at(checkpoint, QuillSyntaxKind::Member);
        builder.finish_node();
        builder.finish_node();

        let root = builder.finish();
        let member = root.first_child().unwrap();
        assert_eq!(member.kind(), QuillSyntaxKind::Member);
        assert_eq!(member.text().to_string(), "x;");
    }
}
