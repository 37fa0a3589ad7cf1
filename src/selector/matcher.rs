//! Selector evaluation against a `TreeCursor`
//!
//! Complex selectors are matched right to left: the last compound must match
//! the candidate, then each combinator walks to the parent (`>`) or to any
//! ancestor element (whitespace), backtracking as needed.

use super::parser::{Combinator, ComplexSelector, Compound, Filter, SelectorList};
use crate::dom::{NodeId, TreeCursor};

/// Check whether an element matches any selector in the list
pub fn matches_list<D: TreeCursor + ?Sized>(doc: &D, node: NodeId, list: &SelectorList) -> bool {
    doc.is_element(node)
        && list
            .0
            .iter()
            .any(|complex| matches_at(doc, node, complex, complex.compounds.len() - 1))
}

/// First matching element among the descendants of `scope`, in document order
pub fn first_match<D: TreeCursor + ?Sized>(
    doc: &D,
    scope: NodeId,
    list: &SelectorList,
) -> Option<NodeId> {
    doc.descendants(scope)
        .find(|&node| matches_list(doc, node, list))
}

/// All matching elements among the descendants of `scope`, in document order
pub fn all_matches<D: TreeCursor + ?Sized>(
    doc: &D,
    scope: NodeId,
    list: &SelectorList,
) -> Vec<NodeId> {
    doc.descendants(scope)
        .filter(|&node| matches_list(doc, node, list))
        .collect()
}

/// First matching element among the direct children of `parent`
pub fn first_child_match<D: TreeCursor + ?Sized>(
    doc: &D,
    parent: NodeId,
    list: &SelectorList,
) -> Option<NodeId> {
    doc.children(parent)
        .find(|&node| matches_list(doc, node, list))
}

fn matches_at<D: TreeCursor + ?Sized>(
    doc: &D,
    node: NodeId,
    complex: &ComplexSelector,
    index: usize,
) -> bool {
    if !matches_compound(doc, node, &complex.compounds[index]) {
        return false;
    }
    if index == 0 {
        return true;
    }

    match complex.combinators[index - 1] {
        Combinator::Child => parent_element(doc, node)
            .is_some_and(|parent| matches_at(doc, parent, complex, index - 1)),
        Combinator::Descendant => {
            let mut ancestor = parent_element(doc, node);
            while let Some(current) = ancestor {
                if matches_at(doc, current, complex, index - 1) {
                    return true;
                }
                ancestor = parent_element(doc, current);
            }
            false
        }
    }
}

fn parent_element<D: TreeCursor + ?Sized>(doc: &D, node: NodeId) -> Option<NodeId> {
    doc.parent(node).filter(|&p| doc.is_element(p))
}

fn matches_compound<D: TreeCursor + ?Sized>(doc: &D, node: NodeId, compound: &Compound) -> bool {
    if let Some(tag) = &compound.tag {
        let same_tag = doc
            .tag_name(node)
            .is_some_and(|name| name.eq_ignore_ascii_case(tag));
        if !same_tag {
            return false;
        }
    }
    compound
        .filters
        .iter()
        .all(|filter| matches_filter(doc, node, filter))
}

fn matches_filter<D: TreeCursor + ?Sized>(doc: &D, node: NodeId, filter: &Filter) -> bool {
    match filter {
        Filter::Id(id) => doc.attribute(node, "id") == Some(id.as_str()),
        Filter::Class(class) => doc
            .attribute(node, "class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class)),
        Filter::HasAttribute(name) => doc.attribute(node, name).is_some(),
        Filter::AttributeEquals(name, value) => doc.attribute(node, name) == Some(value.as_str()),
        Filter::NthChild(nth) => nth.accepts(element_position(doc, node, false)),
        Filter::NthOfType(nth) => nth.accepts(element_position(doc, node, true)),
        Filter::FirstChild => element_position(doc, node, false) == 1,
        Filter::LastChild => {
            let mut sibling = doc.next_sibling(node);
            while let Some(current) = sibling {
                if doc.is_element(current) {
                    return false;
                }
                sibling = doc.next_sibling(current);
            }
            true
        }
    }
}

/// 1-based position among element siblings (optionally of the same tag)
pub fn element_position<D: TreeCursor + ?Sized>(doc: &D, node: NodeId, same_type: bool) -> usize {
    let tag = doc.tag_name(node);
    let mut position = 1;
    let mut sibling = doc.prev_sibling(node);
    while let Some(current) = sibling {
        if doc.is_element(current) && (!same_type || doc.tag_name(current) == tag) {
            position += 1;
        }
        sibling = doc.prev_sibling(current);
    }
    position
}
