pub mod parser;

use std::collections::HashMap;

/// Elements that never carry children and self-close on serialization.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose text content is kept verbatim (JSON-LD must survive).
pub(crate) const RAW_TEXT: &[&str] = &["script", "style"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Element,
    Text,
}

/// Mutable document-tree node.
///
/// The rendering pipeline builds and rewrites these in place; the host page
/// is parsed into them and serialized back out after rendering.
#[derive(Debug, Clone)]
pub struct DomNode {
    pub tag: String,
    pub attributes: HashMap<String, String>,
    pub text: String,
    pub children: Vec<DomNode>,
    pub node_type: NodeType,
}

impl DomNode {
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: HashMap::new(),
            text: String::new(),
            children: Vec::new(),
            node_type: NodeType::Element,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self {
            tag: String::new(),
            attributes: HashMap::new(),
            text: content.into(),
            children: Vec::new(),
            node_type: NodeType::Text,
        }
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    /// Set the attribute only when a value is configured.
    pub fn with_attr_opt(self, name: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.with_attr(name, v),
            None => self,
        }
    }

    pub fn with_child(mut self, child: DomNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_text(self, content: impl Into<String>) -> Self {
        self.with_child(DomNode::text(content))
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        self.attributes.insert(name.to_string(), value.into());
    }

    pub fn append_child(&mut self, child: DomNode) {
        self.children.push(child);
    }

    pub fn clear_children(&mut self) {
        self.children.clear();
    }

    /// Replace all content with the given nodes.
    pub fn set_children(&mut self, children: Vec<DomNode>) {
        self.children = children;
    }

    /// Replace all content with a single text node.
    pub fn set_text_content(&mut self, content: impl Into<String>) {
        self.children = vec![DomNode::text(content)];
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|c| c.split_whitespace().any(|part| part == class))
            .unwrap_or(false)
    }

    /// Depth-first search for the first node matching the predicate.
    pub fn find<F>(&self, pred: &F) -> Option<&DomNode>
    where
        F: Fn(&DomNode) -> bool,
    {
        if pred(self) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(pred))
    }

    /// Mutable depth-first search.
    pub fn find_mut<F>(&mut self, pred: &F) -> Option<&mut DomNode>
    where
        F: Fn(&DomNode) -> bool,
    {
        if pred(self) {
            return Some(self);
        }
        for child in &mut self.children {
            if let Some(found) = child.find_mut(pred) {
                return Some(found);
            }
        }
        None
    }

    /// Visit every node in the subtree, mutably, in document order.
    pub fn for_each_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut DomNode),
    {
        f(self);
        for child in &mut self.children {
            child.for_each_mut(f);
        }
    }

    /// Collect all text content recursively, space-joined.
    pub fn collect_text(&self) -> String {
        let mut buf = String::new();
        self.collect_text_inner(&mut buf);
        buf
    }

    fn collect_text_inner(&self, buf: &mut String) {
        if !self.text.is_empty() {
            if !buf.is_empty() {
                buf.push(' ');
            }
            buf.push_str(self.text.trim());
        }
        for child in &self.children {
            child.collect_text_inner(buf);
        }
    }

    fn serialize(&self, out: &mut String) {
        match self.node_type {
            NodeType::Text => out.push_str(&escape_text(&self.text)),
            NodeType::Element => {
                out.push('<');
                out.push_str(&self.tag);
                // Sorted attribute order keeps output stable.
                let mut attrs: Vec<_> = self.attributes.iter().collect();
                attrs.sort_by(|a, b| a.0.cmp(b.0));
                for (name, value) in attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(value));
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&self.tag.as_str()) {
                    return;
                }
                if RAW_TEXT.contains(&self.tag.as_str()) {
                    for child in &self.children {
                        out.push_str(&child.text);
                    }
                } else {
                    for child in &self.children {
                        child.serialize(out);
                    }
                }
                out.push_str("</");
                out.push_str(&self.tag);
                out.push('>');
            }
        }
    }
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}

/// A parsed page: the `<html>` element and everything under it.
#[derive(Debug, Clone)]
pub struct Document {
    pub root: DomNode,
}

impl Document {
    pub fn head_mut(&mut self) -> Option<&mut DomNode> {
        self.root.find_mut(&|n: &DomNode| n.tag == "head")
    }

    pub fn body_mut(&mut self) -> Option<&mut DomNode> {
        self.root.find_mut(&|n: &DomNode| n.tag == "body")
    }

    pub fn element_by_id(&self, id: &str) -> Option<&DomNode> {
        self.root.find(&|n: &DomNode| n.attr("id") == Some(id))
    }

    pub fn element_by_id_mut(&mut self, id: &str) -> Option<&mut DomNode> {
        self.root.find_mut(&|n: &DomNode| n.attr("id") == Some(id))
    }

    pub fn first_by_class_mut(&mut self, class: &str) -> Option<&mut DomNode> {
        let class = class.to_string();
        self.root.find_mut(&move |n: &DomNode| n.has_class(&class))
    }

    /// Set the `<title>` text, creating the element under `<head>` if absent.
    pub fn set_title(&mut self, title: &str) {
        if let Some(existing) = self.root.find_mut(&|n: &DomNode| n.tag == "title") {
            existing.set_text_content(title);
        } else if let Some(head) = self.head_mut() {
            head.append_child(DomNode::element("title").with_text(title));
        }
    }

    pub fn title(&self) -> Option<String> {
        self.root
            .find(&|n: &DomNode| n.tag == "title")
            .map(|n| n.collect_text())
    }

    /// Idempotent meta upsert, keyed by `name` or `property`.
    ///
    /// Creates the tag under `<head>` when absent, otherwise replaces its
    /// `content` — repeated invocations never duplicate tags.
    pub fn upsert_meta(&mut self, key: &str, content: &str, by_property: bool) {
        let attr = if by_property { "property" } else { "name" };
        let key_owned = key.to_string();
        let attr_owned = attr.to_string();
        if let Some(tag) = self.root.find_mut(&move |n: &DomNode| {
            n.tag == "meta" && n.attr(&attr_owned) == Some(key_owned.as_str())
        }) {
            tag.set_attr("content", content);
        } else if let Some(head) = self.head_mut() {
            head.append_child(
                DomNode::element("meta")
                    .with_attr(attr, key)
                    .with_attr("content", content),
            );
        }
    }

    pub fn meta_content(&self, key: &str, by_property: bool) -> Option<&str> {
        let attr = if by_property { "property" } else { "name" };
        self.root
            .find(&|n: &DomNode| n.tag == "meta" && n.attr(attr) == Some(key))
            .and_then(|n| n.attr("content"))
    }

    /// First `<link>` whose `rel` matches, if any.
    pub fn link_by_rel_mut(&mut self, rel: &str) -> Option<&mut DomNode> {
        let rel = rel.to_string();
        self.root
            .find_mut(&move |n: &DomNode| n.tag == "link" && n.attr("rel") == Some(rel.as_str()))
    }

    pub fn has_link_with_href(&self, href: &str) -> bool {
        self.root
            .find(&|n: &DomNode| n.tag == "link" && n.attr("href") == Some(href))
            .is_some()
    }

    pub fn append_to_head(&mut self, node: DomNode) {
        if let Some(head) = self.head_mut() {
            head.append_child(node);
        }
    }

    /// Visit every `<img>` element in the tree.
    pub fn for_each_image_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut DomNode),
    {
        self.root.for_each_mut(&mut |node| {
            if node.node_type == NodeType::Element && node.tag == "img" {
                f(node);
            }
        });
    }

    /// Serialize the whole document back to HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::from("<!DOCTYPE html>\n");
        self.root.serialize(&mut out);
        out
    }
}
