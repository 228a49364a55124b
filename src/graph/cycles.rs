//! Cycle detection over resolved nested-kit edges.

use crate::model::Subassembly;
use indexmap::IndexMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// Find cycles with an iterative three-colour depth-first search.
///
/// An edge runs from an assembly to each nested-kit item whose key names
/// another assembly. Every back edge yields one cycle, reported as the path
/// from the re-entered assembly around to itself (`[A, B, A]`). Roots are
/// visited in map order, so the result is deterministic.
#[must_use]
pub fn find_cycles(nodes: &IndexMap<String, Subassembly>) -> Vec<Vec<String>> {
    let mut marks = vec![Mark::Unvisited; nodes.len()];
    let mut cycles = Vec::new();

    let key_of = |index: usize| {
        nodes
            .get_index(index)
            .map(|(key, _)| key.clone())
            .unwrap_or_default()
    };

    for start in 0..nodes.len() {
        if marks[start] != Mark::Unvisited {
            continue;
        }
        marks[start] = Mark::OnPath;
        // (node index, position of the next item to examine)
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];

        while let Some(frame) = stack.last_mut() {
            let (node_index, from) = *frame;
            let next_edge = nodes.get_index(node_index).and_then(|(_, node)| {
                node.items
                    .iter()
                    .enumerate()
                    .skip(from)
                    .filter(|(_, item)| item.is_subassembly)
                    .find_map(|(position, item)| {
                        nodes
                            .get_index_of(item.item_key.as_str())
                            .map(|target| (position, target))
                    })
            });

            let Some((position, target)) = next_edge else {
                marks[node_index] = Mark::Done;
                stack.pop();
                continue;
            };
            frame.1 = position + 1;

            match marks[target] {
                Mark::Unvisited => {
                    marks[target] = Mark::OnPath;
                    stack.push((target, 0));
                }
                Mark::OnPath => {
                    let begin = stack
                        .iter()
                        .position(|&(index, _)| index == target)
                        .unwrap_or(0);
                    let mut path: Vec<String> =
                        stack[begin..].iter().map(|&(index, _)| key_of(index)).collect();
                    path.push(key_of(target));
                    cycles.push(path);
                }
                Mark::Done => {}
            }
        }
    }

    cycles
}
