// BaseExtractor: source text access shared by the syntax walkers

use tree_sitter::Node;

/// Shared state for a single extraction pass over one file
pub struct BaseExtractor {
    pub language: String,
    /// Path used in log output, workspace-relative when known
    pub file_path: String,
    pub content: String,
}

impl BaseExtractor {
    pub fn new(language: String, file_path: String, content: String) -> Self {
        Self {
            language,
            file_path: file_path.replace('\\', "/"),
            content,
        }
    }

    /// Get text from a tree-sitter node
    pub fn get_node_text(&self, node: &Node) -> String {
        let start_byte = node.start_byte();
        let end_byte = node.end_byte();

        // Use byte slice but handle UTF-8 boundaries properly
        let content_bytes = self.content.as_bytes();
        if start_byte < content_bytes.len() && end_byte <= content_bytes.len() {
            String::from_utf8_lossy(&content_bytes[start_byte..end_byte]).to_string()
        } else {
            String::new()
        }
    }

    /// Text of a string literal node without its quotes
    pub fn get_string_value(&self, node: &Node) -> String {
        self.get_node_text(node)
            .trim_matches(|c| c == '"' || c == '\'' || c == '`')
            .to_string()
    }
}
