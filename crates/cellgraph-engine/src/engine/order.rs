//! Recalculation order and circular dependency detection.
//!
//! When a cell changes, it and every cell that (transitively) depends on it
//! must be re-evaluated, each after all of its prerequisites. The order is a
//! reverse post-order of a depth-first walk along dependent edges. Nodes are
//! marked in-progress while they are on the current path; reaching an
//! in-progress node again means the edges form a cycle.
//!
//! The walk keeps its own stack, so long dependency chains cost heap, not
//! call-stack depth.

use std::collections::HashMap;
use std::collections::btree_set;

use super::graph::DependencyGraph;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// A dependency cycle, listed from the start of the walk back to the repeated name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    pub path: Vec<String>,
}

/// Names to recalculate after `start` changes, `start` first, every name
/// after all of its prerequisites that are also in the list.
pub fn cells_to_recalculate(graph: &DependencyGraph, start: &str) -> Result<Vec<String>, Cycle> {
    let mut marks: HashMap<&str, Mark> = HashMap::new();
    let mut finished: Vec<&str> = Vec::new();
    let mut stack: Vec<(&str, btree_set::Iter<'_, String>)> =
        vec![(start, graph.dependents(start).iter())];
    marks.insert(start, Mark::InProgress);

    loop {
        let Some((_, children)) = stack.last_mut() else {
            break;
        };
        match children.next() {
            Some(child) => match marks.get(child.as_str()) {
                Some(Mark::InProgress) => {
                    let mut path: Vec<String> =
                        stack.iter().map(|(name, _)| name.to_string()).collect();
                    path.push(child.clone());
                    return Err(Cycle { path });
                }
                Some(Mark::Done) => {}
                None => {
                    marks.insert(child.as_str(), Mark::InProgress);
                    stack.push((child.as_str(), graph.dependents(child).iter()));
                }
            },
            None => {
                if let Some((name, _)) = stack.pop() {
                    marks.insert(name, Mark::Done);
                    finished.push(name);
                }
            }
        }
    }

    Ok(finished.into_iter().rev().map(str::to_string).collect())
}
