// Tree navigation methods for BaseExtractor

use super::extractor::BaseExtractor;
use tree_sitter::{Node, Point};

impl BaseExtractor {
    /// Position of the first ERROR or MISSING node in document order
    pub fn first_syntax_error(&self, node: &Node) -> Option<Point> {
        if !node.has_error() {
            return None;
        }
        if node.is_error() || node.is_missing() {
            return Some(node.start_position());
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if let Some(point) = self.first_syntax_error(&child) {
                return Some(point);
            }
        }
        // has_error() without a visible culprit: report the node itself
        Some(node.start_position())
    }

    /// Get field text safely
    pub fn get_field_text(&self, node: &Node, field_name: &str) -> Option<String> {
        node.child_by_field_name(field_name)
            .map(|field_node| self.get_node_text(&field_node))
    }

    /// Find first child by type
    pub fn find_child_by_type<'a>(&self, node: &Node<'a>, child_type: &str) -> Option<Node<'a>> {
        let mut cursor = node.walk();
        let found = node
            .children(&mut cursor)
            .find(|child| child.kind() == child_type);
        found
    }

    /// Find children by type
    pub fn find_children_by_type<'a>(&self, node: &Node<'a>, child_type: &str) -> Vec<Node<'a>> {
        let mut cursor = node.walk();
        node.children(&mut cursor)
            .filter(|child| child.kind() == child_type)
            .collect()
    }

    /// Type text of a `type_annotation` field, without the leading colon
    pub fn get_type_annotation(&self, node: &Node, field_name: &str) -> Option<String> {
        let annotation = node.child_by_field_name(field_name)?;
        let text = self.get_node_text(&annotation);
        let text = text.trim_start();
        let text = text.strip_prefix(':').unwrap_or(text);
        Some(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    fn parse(source: &str) -> (BaseExtractor, tree_sitter::Tree) {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
            .unwrap();
        let tree = parser.parse(source, None).unwrap();
        let base = BaseExtractor::new(
            "typescript".to_string(),
            "test.ts".to_string(),
            source.to_string(),
        );
        (base, tree)
    }

    #[test]
    fn test_valid_source_has_no_syntax_error() {
        let (base, tree) = parse("export class A { b: string; }");
        assert!(base.first_syntax_error(&tree.root_node()).is_none());
    }

    #[test]
    fn test_syntax_error_position() {
        let (base, tree) = parse("const a = 1;\nclass {{{ = ;\n");
        let point = base.first_syntax_error(&tree.root_node()).unwrap();
        assert_eq!(point.row, 1);
    }

    #[test]
    fn test_type_annotation_text() {
        let (base, tree) = parse("let a: Map<string, number>;");
        let declarator = tree
            .root_node()
            .named_child(0)
            .and_then(|n| base.find_child_by_type(&n, "variable_declarator"))
            .unwrap();
        assert_eq!(
            base.get_type_annotation(&declarator, "type").as_deref(),
            Some("Map<string, number>")
        );
    }
}
