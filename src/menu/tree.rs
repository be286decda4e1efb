use std::collections::{HashMap, HashSet};

use serde_json::Value;

use super::item::MenuItem;

/// Build the menu tree from a flat list of records.
///
/// Records attach to the record whose `id` equals their `parentId`. A record
/// without a parent, or whose parent is not in the list, becomes a root.
/// Every sibling group is ordered ascending by `sort`. No record is dropped:
/// records caught in a parent cycle are promoted to roots.
pub fn build_menu_tree(records: Vec<MenuItem>) -> Vec<MenuItem> {
    // First pass: index by id. Duplicate ids keep their first position as the
    // attachment point.
    let mut index: HashMap<String, usize> = HashMap::with_capacity(records.len());
    for (pos, record) in records.iter().enumerate() {
        index.entry(record.id.clone()).or_insert(pos);
    }

    // Second pass: parent lookup
    let mut children_of: HashMap<usize, Vec<usize>> = HashMap::new();
    let mut roots = Vec::new();
    for (pos, record) in records.iter().enumerate() {
        match record.parent().and_then(|p| index.get(p)) {
            Some(&parent) if parent != pos => children_of.entry(parent).or_default().push(pos),
            _ => roots.push(pos),
        }
    }

    let mut slots: Vec<Option<MenuItem>> = records
        .into_iter()
        .map(|mut record| {
            record.children = Vec::new();
            Some(record)
        })
        .collect();
    let mut visited = vec![false; slots.len()];

    let mut tree: Vec<MenuItem> = roots
        .into_iter()
        .filter_map(|pos| assemble(pos, &mut slots, &children_of, &mut visited))
        .collect();

    // Anything left over sits on a cycle with no way back to a root
    for pos in 0..slots.len() {
        if visited[pos] {
            continue;
        }
        tracing::debug!("menu record {:?} is part of a parent cycle, promoting to root", slots[pos].as_ref().map(|r| &r.id));
        if let Some(node) = assemble(pos, &mut slots, &children_of, &mut visited) {
            tree.push(node);
        }
    }

    sort_siblings(&mut tree);
    tree
}

/// Build the menu tree from an untyped API payload.
///
/// Anything other than a JSON array yields an empty tree. Array elements that
/// are not menu records are skipped.
pub fn build_menu_tree_from_value(value: &Value) -> Vec<MenuItem> {
    let Some(items) = value.as_array() else {
        tracing::debug!("menu payload is not an array, building empty tree");
        return Vec::new();
    };

    let records = items
        .iter()
        .filter_map(|item| match serde_json::from_value::<MenuItem>(item.clone()) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::debug!("skipping malformed menu record: {}", e);
                None
            }
        })
        .collect();

    build_menu_tree(records)
}

/// Keep only the records whose permission code is in `permitted`.
pub fn filter_menu_records(records: &[MenuItem], permitted: &HashSet<String>) -> Vec<MenuItem> {
    records
        .iter()
        .filter(|r| permitted.contains(&r.code))
        .cloned()
        .collect()
}

/// Total number of nodes in a tree, roots included
pub fn count_nodes(tree: &[MenuItem]) -> usize {
    let mut total = 0;
    let mut pending: Vec<&MenuItem> = tree.iter().collect();
    while let Some(node) = pending.pop() {
        total += 1;
        pending.extend(node.children.iter());
    }
    total
}

/// Assemble the subtree rooted at `pos` without recursing.
///
/// A depth-first walk marks every reachable position and records the order
/// in which positions finish; nodes are then attached to their parents in
/// that order, so each child is complete before it is moved.
fn assemble(
    pos: usize,
    slots: &mut [Option<MenuItem>],
    children_of: &HashMap<usize, Vec<usize>>,
    visited: &mut [bool],
) -> Option<MenuItem> {
    if visited[pos] {
        return None;
    }
    visited[pos] = true;

    let mut finished = Vec::new();
    let mut kept: HashMap<usize, Vec<usize>> = HashMap::new();
    let mut stack = vec![(pos, 0usize)];
    while let Some((current, next)) = stack.pop() {
        let child = children_of.get(&current).and_then(|c| c.get(next)).copied();
        match child {
            Some(child) => {
                stack.push((current, next + 1));
                if !visited[child] {
                    visited[child] = true;
                    kept.entry(current).or_default().push(child);
                    stack.push((child, 0));
                }
            }
            None => finished.push(current),
        }
    }

    for current in finished {
        let Some(mut node) = slots[current].take() else {
            continue;
        };
        if let Some(child_positions) = kept.remove(&current) {
            node.children = child_positions.into_iter().filter_map(|c| slots[c].take()).collect();
            sort_siblings(&mut node.children);
        }
        slots[current] = Some(node);
    }

    slots[pos].take()
}

fn sort_siblings(nodes: &mut [MenuItem]) {
    nodes.sort_by(|a, b| a.sort.total_cmp(&b.sort));
}
