//! Path queries over an XML document tree
//!
//! Paths are dotted sequences of local element names, e.g.
//! `complexContent.extension`. Each component matches direct children only.

use roxmltree::Node;

/// Strip a namespace prefix: `gml:PointPropertyType` -> `PointPropertyType`
pub fn strip_ns(name: &str) -> &str {
    name.split_once(':').map_or(name, |(_, local)| local)
}

/// All elements reached from `node` by following `path`
pub fn find_descendants<'a, 'input>(node: Node<'a, 'input>, path: &str) -> Vec<Node<'a, 'input>> {
    let mut found = Vec::new();
    let components: Vec<&str> = path.split('.').collect();
    collect(node, &components, &mut found);
    found
}

fn collect<'a, 'input>(node: Node<'a, 'input>, components: &[&str], found: &mut Vec<Node<'a, 'input>>) {
    let Some((first, rest)) = components.split_first() else {
        return;
    };
    for child in node.children().filter(|c| c.is_element()) {
        if strip_ns(child.tag_name().name()) != *first {
            continue;
        }
        if rest.is_empty() {
            found.push(child);
        } else {
            collect(child, rest, found);
        }
    }
}

/// First element reached from `node` by following `path`
pub fn find_first<'a, 'input>(node: Node<'a, 'input>, path: &str) -> Option<Node<'a, 'input>> {
    find_descendants(node, path).into_iter().next()
}

/// Keep the nodes whose attribute `attr` equals `value`
pub fn find_descendants_with_attribute<'a, 'input>(
    nodes: Vec<Node<'a, 'input>>,
    attr: &str,
    value: &str,
) -> Vec<Node<'a, 'input>> {
    nodes
        .into_iter()
        .filter(|n| n.attribute(attr).unwrap_or_default() == value)
        .collect()
}

/// First element at `path` whose attribute `attr` equals `value`
pub fn find_first_with_attribute<'a, 'input>(
    node: Node<'a, 'input>,
    path: &str,
    attr: &str,
    value: &str,
) -> Option<Node<'a, 'input>> {
    find_descendants_with_attribute(find_descendants(node, path), attr, value)
        .into_iter()
        .next()
}
