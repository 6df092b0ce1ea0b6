use scraper::{ElementRef, Html, Node};

use crate::dom::{DomNode, Document};

/// Parse a full HTML page into a mutable [`Document`].
pub fn parse_document(html: &str) -> Document {
    let parsed = Html::parse_document(html);
    Document {
        root: convert_element(parsed.root_element()),
    }
}

/// Parse a markup fragment (a partial) into its top-level nodes.
pub fn parse_fragment(html: &str) -> Vec<DomNode> {
    let parsed = Html::parse_fragment(html);
    // The fragment parser wraps content in a synthetic <html> root.
    convert_element(parsed.root_element()).children
}

fn convert_element(el: ElementRef<'_>) -> DomNode {
    let mut node = DomNode::element(el.value().name.local.as_ref());
    for (name, value) in el.value().attrs() {
        node.set_attr(name, value);
    }

    for child_ref in el.children() {
        match child_ref.value() {
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child_ref) {
                    node.append_child(convert_element(child_el));
                }
            }
            Node::Text(t) => {
                let s = t.text.to_string();
                // Keep script/style content verbatim; elsewhere drop
                // whitespace-only nodes left over from markup indentation.
                if !s.trim().is_empty() || crate::dom::RAW_TEXT.contains(&node.tag.as_str()) {
                    node.append_child(DomNode::text(s));
                }
            }
            _ => {}
        }
    }

    node
}
