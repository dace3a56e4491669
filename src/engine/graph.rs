//! Dependency graph over one task snapshot.
//!
//! Edges point from a task to the tasks it depends on; ids not present in
//! the snapshot are external and ignored. The scoring pass wants the reverse
//! view: how many tasks wait on each node, directly and transitively.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::tasks::Task;

/// A dependency cycle among the tasks in a snapshot, in detection order.
/// Reported alongside scores — never a fatal error; the caller decides
/// whether to surface or break it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DependencyCycle {
    pub ids: Vec<String>,
}

pub(crate) struct DepGraph {
    /// Reverse edges: `dependents[i]` lists the tasks that depend on task `i`.
    dependents: Vec<Vec<usize>>,
    in_cycle: Vec<bool>,
    cycles: Vec<DependencyCycle>,
    /// Longest chain of transitive dependents above each task.
    heights: Vec<usize>,
}

impl DepGraph {
    pub fn build(tasks: &[Task]) -> Self {
        let index: HashMap<&str, usize> = tasks
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id.as_str(), i))
            .collect();

        // Forward edges (task -> in-set dependencies) drive cycle detection;
        // reverse edges drive the dependent counts and layering.
        let mut deps: Vec<Vec<usize>> = vec![Vec::new(); tasks.len()];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); tasks.len()];
        for (i, task) in tasks.iter().enumerate() {
            for dep_id in &task.dependencies {
                if let Some(&j) = index.get(dep_id.as_str()) {
                    if j != i {
                        deps[i].push(j);
                        dependents[j].push(i);
                    }
                }
            }
        }

        let cycles = detect_cycles(tasks, &deps);
        let mut in_cycle = vec![false; tasks.len()];
        for cycle in &cycles {
            for id in &cycle.ids {
                if let Some(&i) = index.get(id.as_str()) {
                    in_cycle[i] = true;
                }
            }
        }

        let mut heights = vec![0usize; tasks.len()];
        let mut memo: Vec<Option<usize>> = vec![None; tasks.len()];
        for i in 0..tasks.len() {
            heights[i] = height_of(i, &dependents, &in_cycle, &mut memo);
        }

        Self {
            dependents,
            in_cycle,
            cycles,
            heights,
        }
    }

    pub fn cycles(&self) -> &[DependencyCycle] {
        &self.cycles
    }

    pub fn in_cycle(&self, i: usize) -> bool {
        self.in_cycle[i]
    }

    /// Number of tasks directly depending on task `i`.
    pub fn direct_dependents(&self, i: usize) -> usize {
        self.dependents[i].len()
    }

    /// Longest chain of transitive dependents above task `i`. Zero when
    /// nothing waits on it (or when it sits inside a cycle).
    pub fn height(&self, i: usize) -> usize {
        self.heights[i]
    }
}

/// Longest dependent chain above node `i`, memoized. Cycle members pin to
/// zero and are never recursed into, so the walk stays on the acyclic part
/// of the graph and terminates.
fn height_of(
    i: usize,
    dependents: &[Vec<usize>],
    in_cycle: &[bool],
    memo: &mut Vec<Option<usize>>,
) -> usize {
    if in_cycle[i] {
        return 0;
    }
    if let Some(h) = memo[i] {
        return h;
    }
    // Pin before recursing so re-entry terminates.
    memo[i] = Some(0);
    let mut best = 0;
    for &d in &dependents[i] {
        let above = if in_cycle[d] {
            1
        } else {
            1 + height_of(d, dependents, in_cycle, memo)
        };
        best = best.max(above);
    }
    memo[i] = Some(best);
    best
}

/// Depth-first cycle detection with a recursion stack, over the forward
/// dependency edges. Each back edge reports the cycle slice of the current
/// path.
fn detect_cycles(tasks: &[Task], deps: &[Vec<usize>]) -> Vec<DependencyCycle> {
    let mut cycles = Vec::new();
    let mut visited: HashSet<usize> = HashSet::new();
    let mut rec_stack: HashSet<usize> = HashSet::new();
    let mut path: Vec<usize> = Vec::new();

    for start in 0..tasks.len() {
        if !visited.contains(&start) {
            dfs(
                start,
                tasks,
                deps,
                &mut visited,
                &mut rec_stack,
                &mut path,
                &mut cycles,
            );
        }
    }

    cycles
}

#[allow(clippy::too_many_arguments)]
fn dfs(
    node: usize,
    tasks: &[Task],
    deps: &[Vec<usize>],
    visited: &mut HashSet<usize>,
    rec_stack: &mut HashSet<usize>,
    path: &mut Vec<usize>,
    cycles: &mut Vec<DependencyCycle>,
) {
    visited.insert(node);
    rec_stack.insert(node);
    path.push(node);

    for &next in &deps[node] {
        if !visited.contains(&next) {
            dfs(next, tasks, deps, visited, rec_stack, path, cycles);
        } else if rec_stack.contains(&next) {
            // Found a cycle
            let cycle_start = path.iter().position(|&n| n == next).unwrap();
            let ids = path[cycle_start..]
                .iter()
                .map(|&n| tasks[n].id.clone())
                .collect();
            cycles.push(DependencyCycle { ids });
        }
    }

    path.pop();
    rec_stack.remove(&node);
}

// ─── Tests ────────────────────────────────────────────────────────────────────
