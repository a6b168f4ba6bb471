//! In-place patching of a region against freshly rendered markup.
//!
//! `update` on a view renders new markup, parses it, and hands both trees to
//! [`patch_children`]. Only the differences are applied to the live nodes:
//!
//! - **Keyed lists**: when every sibling on both sides carries a unique
//!   `data-key`, children are matched by key. A shared key prefix is patched
//!   in place, the remainder is reordered through a key map, new keys are
//!   inserted and vanished keys removed.
//! - **Everything else** is matched by position. Nodes with the same tag are
//!   patched recursively; a tag mismatch replaces the node, and surplus nodes
//!   on either side are inserted or removed rather than shifted onto
//!   unrelated siblings.
//!
//! Patching a text node replaces its content; patching an element replaces
//! its attribute list when it differs. Unchanged nodes are left alone, so the
//! counters in [`PatchStats`] reflect exactly what changed.

use crate::dom::Node;
use std::collections::{HashMap, HashSet};
use tracing::{trace, warn};

/// What a patch touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatchStats {
    pub text_updates: usize,
    pub attr_updates: usize,
    pub inserted: usize,
    pub removed: usize,
    pub moved: usize,
}

impl PatchStats {
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

/// Bring `current` in line with `next`.
pub fn patch_children(current: &mut Vec<Node>, next: Vec<Node>, stats: &mut PatchStats) {
    match keys_of(current).zip(keys_of(&next)) {
        Some(_) => patch_keyed(current, next, stats),
        None => patch_positional(current, next, stats),
    }
}

/// Keys of a sibling list when every node has one and none repeat.
fn keys_of(nodes: &[Node]) -> Option<Vec<String>> {
    if nodes.is_empty() {
        return None;
    }
    let keys: Vec<String> = nodes
        .iter()
        .map(|n| n.key().map(str::to_string))
        .collect::<Option<_>>()?;
    let unique: HashSet<&str> = keys.iter().map(String::as_str).collect();
    if unique.len() != keys.len() {
        warn!(
            "Duplicate data-key among {} siblings, falling back to positional patching",
            keys.len()
        );
        return None;
    }
    Some(keys)
}

fn patch_keyed(current: &mut Vec<Node>, next: Vec<Node>, stats: &mut PatchStats) {
    let mut next = next.into_iter().peekable();

    // Common prefix.
    let mut prefix = 0;
    while prefix < current.len() {
        let same = match next.peek() {
            Some(n) => n.key() == current[prefix].key(),
            None => false,
        };
        if !same {
            break;
        }
        if let Some(n) = next.next() {
            patch_node(&mut current[prefix], n, stats);
        }
        prefix += 1;
    }
    if prefix > 0 {
        trace!("Keys matched. Advancing past {} node(s).", prefix);
    }

    let rest: Vec<Node> = next.collect();
    let old_order: Vec<String> = current[prefix..]
        .iter()
        .filter_map(|n| n.key().map(str::to_string))
        .collect();
    let mut by_key: HashMap<String, Node> = current
        .drain(prefix..)
        .filter_map(|n| n.key().map(str::to_string).map(|k| (k, n)))
        .collect();

    let new_order: Vec<&str> = rest.iter().filter_map(Node::key).collect();
    let kept_new: Vec<&str> = new_order
        .iter()
        .copied()
        .filter(|k| by_key.contains_key(*k))
        .collect();
    let kept_old: Vec<&str> = old_order
        .iter()
        .map(String::as_str)
        .filter(|k| new_order.contains(k))
        .collect();
    stats.moved += kept_old
        .iter()
        .zip(&kept_new)
        .filter(|(a, b)| a != b)
        .count();

    for node in rest {
        let existing = node.key().and_then(|k| by_key.remove(k));
        match existing {
            Some(mut old) => {
                patch_node(&mut old, node, stats);
                current.push(old);
            }
            None => {
                trace!("Inserting keyed node {:?}", node.key());
                stats.inserted += 1;
                current.push(node);
            }
        }
    }

    if !by_key.is_empty() {
        trace!("Removing {} keyed node(s).", by_key.len());
        stats.removed += by_key.len();
    }
}

fn patch_positional(current: &mut Vec<Node>, next: Vec<Node>, stats: &mut PatchStats) {
    let next_len = next.len();
    if current.len() > next_len {
        stats.removed += current.len() - next_len;
        current.truncate(next_len);
    }

    let mut next = next.into_iter();
    for (slot, node) in current.iter_mut().zip(next.by_ref()) {
        patch_node(slot, node, stats);
    }

    let surplus: Vec<Node> = next.collect();
    stats.inserted += surplus.len();
    current.extend(surplus);
}

/// Patch one node in place, replacing it if the kinds or tags differ.
fn patch_node(current: &mut Node, next: Node, stats: &mut PatchStats) {
    match (current, next) {
        (Node::Text(old), Node::Text(new)) => {
            if *old != new {
                stats.text_updates += 1;
                *old = new;
            }
        }
        (Node::Element(old), Node::Element(new)) if old.tag == new.tag => {
            if old.attrs != new.attrs {
                stats.attr_updates += 1;
                old.attrs = new.attrs;
            }
            patch_children(&mut old.children, new.children, stats);
        }
        (slot, new) => {
            stats.removed += 1;
            stats.inserted += 1;
            *slot = new;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{parse_fragment, to_html};

    fn patch(old: &str, new: &str) -> (Vec<Node>, PatchStats) {
        let mut current = parse_fragment(old).unwrap();
        let mut stats = PatchStats::default();
        patch_children(&mut current, parse_fragment(new).unwrap(), &mut stats);
        (current, stats)
    }

    fn list(items: &[(&str, &str)]) -> String {
        items
            .iter()
            .map(|(k, t)| format!(r#"<li data-key="{k}">{t}</li>"#))
            .collect()
    }

    #[test]
    fn identical_markup_is_noop() {
        let markup = r#"<div class="x"><p>a</p><p>b</p></div>"#;
        let (nodes, stats) = patch(markup, markup);
        assert!(stats.is_noop());
        assert_eq!(to_html(&nodes), markup);
    }

    #[test]
    fn text_change_patches_in_place() {
        let (nodes, stats) = patch(
            r#"<span class="recipe__info-data">4</span>"#,
            r#"<span class="recipe__info-data">8</span>"#,
        );
        assert_eq!(stats.text_updates, 1);
        assert_eq!(stats.inserted, 0);
        assert_eq!(nodes[0].text_content(), "8");
    }

    #[test]
    fn attribute_change_is_counted_once_per_element() {
        let (nodes, stats) = patch(
            r##"<a class="preview__link" href="#a"></a>"##,
            r##"<a class="preview__link preview__link--active" href="#a"></a>"##,
        );
        assert_eq!(stats.attr_updates, 1);
        assert!(nodes[0].as_element().unwrap().has_class("preview__link--active"));
    }

    #[test]
    fn keyed_reorder_moves_without_rebuilding() {
        let (nodes, stats) = patch(
            &list(&[("a", "A"), ("b", "B"), ("c", "C")]),
            &list(&[("c", "C"), ("a", "A"), ("b", "B")]),
        );
        assert_eq!(stats.inserted, 0);
        assert_eq!(stats.removed, 0);
        assert_eq!(stats.text_updates, 0);
        assert!(stats.moved > 0);
        let keys: Vec<_> = nodes.iter().filter_map(Node::key).collect();
        assert_eq!(keys, ["c", "a", "b"]);
    }

    #[test]
    fn keyed_insert_and_remove() {
        let (nodes, stats) = patch(
            &list(&[("a", "A"), ("b", "B")]),
            &list(&[("a", "A"), ("c", "C")]),
        );
        assert_eq!(stats.inserted, 1);
        assert_eq!(stats.removed, 1);
        assert_eq!(stats.moved, 0);
        assert_eq!(to_html(&nodes), list(&[("a", "A"), ("c", "C")]));
    }

    #[test]
    fn keyed_patch_updates_matched_content() {
        let (nodes, stats) = patch(
            &list(&[("a", "A"), ("b", "B")]),
            &list(&[("b", "B2"), ("a", "A")]),
        );
        assert_eq!(stats.text_updates, 1);
        assert_eq!(to_html(&nodes), list(&[("b", "B2"), ("a", "A")]));
    }

    #[test]
    fn duplicate_keys_fall_back_to_positions() {
        let (nodes, stats) = patch(
            &list(&[("a", "1"), ("a", "2")]),
            &list(&[("a", "3"), ("a", "2")]),
        );
        assert_eq!(stats.text_updates, 1);
        assert_eq!(to_html(&nodes), list(&[("a", "3"), ("a", "2")]));
    }

    #[test]
    fn positional_surplus_is_inserted_not_shifted() {
        let (nodes, stats) = patch("<p>a</p>", "<p>a</p><p>b</p><p>c</p>");
        assert_eq!(stats.inserted, 2);
        assert_eq!(stats.text_updates, 0);
        assert_eq!(to_html(&nodes), "<p>a</p><p>b</p><p>c</p>");
    }

    #[test]
    fn positional_shortfall_is_removed() {
        let (nodes, stats) = patch("<p>a</p><p>b</p>", "<p>a</p>");
        assert_eq!(stats.removed, 1);
        assert_eq!(to_html(&nodes), "<p>a</p>");
    }

    #[test]
    fn tag_mismatch_replaces_node() {
        let (nodes, stats) = patch(
            r#"<div class="spinner"></div>"#,
            r#"<figure class="recipe__fig"></figure>"#,
        );
        assert_eq!(stats.removed, 1);
        assert_eq!(stats.inserted, 1);
        assert_eq!(nodes[0].as_element().unwrap().tag, "figure");
    }
}
