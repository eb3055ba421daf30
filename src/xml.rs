//! XML utility functions for navigating and extracting data from DOM trees.
//!
//! The search API serializes records with auto-generated namespace prefixes
//! (`ns5:`, `ns6:`, ...), so matching happens on local names, optionally
//! pinned to a namespace URI where local names collide between blocks.

use roxmltree::Node;

/// Get the tag name without namespace prefix.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use kmb_harvester::xml::local_name;
///
/// let xml = r#"<root xmlns:a="urn:a"><a:item>text</a:item></root>"#;
/// let doc = Document::parse(xml).unwrap();
/// let item = doc.root_element().first_element_child().unwrap();
/// assert_eq!(local_name(item), "item");
/// ```
pub fn local_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Find the first descendant element with the given local name.
pub fn find_descendant<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &str,
) -> Option<Node<'a, 'input>> {
    node.descendants()
        .find(|n| n.is_element() && local_name(*n) == tag)
}

/// Find the first descendant element with the given namespace and local name.
pub fn find_descendant_ns<'a, 'input>(
    node: Node<'a, 'input>,
    ns: &str,
    tag: &str,
) -> Option<Node<'a, 'input>> {
    node.descendants().find(|n| {
        n.is_element() && local_name(*n) == tag && n.tag_name().namespace() == Some(ns)
    })
}

/// Iterate over all descendant elements with the given local name.
pub fn descendants_named<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.descendants()
        .filter(move |n| n.is_element() && local_name(*n) == tag)
}

/// Get an attribute value by local name, regardless of attribute namespace.
///
/// Needed for `rdf:resource`, which roxmltree only exposes through its
/// namespace-qualified form.
pub fn attribute_any_ns<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attributes()
        .find(|a| a.name() == name)
        .map(|a| a.value())
}
