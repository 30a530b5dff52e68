//! Input validation for offloading problem instances.
//!
//! Checks the structural integrity of the edge list and cost table before
//! the graph is built. Detects:
//! - Ids outside a contiguous 1-based range
//! - Missing, duplicate, or unknown cost rows
//! - Cost rows whose arity disagrees with the core count
//! - Circular dependencies (DAG validation)
//!
//! All violations are preconditions: any failure rejects the instance
//! outright, with every detected problem reported at once.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use std::collections::{HashMap, HashSet};

use crate::models::TaskId;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Referenced task ids do not form a contiguous range starting at 1.
    NonContiguousIds,
    /// A referenced task has no cost-table row.
    MissingCostRow,
    /// A task has more than one cost-table row.
    DuplicateCostRow,
    /// A cost-table row names a task absent from the edge list.
    UnknownCostRow,
    /// A cost-table row does not have one entry per core.
    CostRowArity,
    /// The dependency graph contains a cycle.
    CyclicDependency,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates an offloading problem instance.
///
/// Checks:
/// 1. Every referenced id is ≥ 1 and the ids cover `1..=N` with no gaps
/// 2. Every referenced task has exactly one cost row
/// 3. No cost row names an unreferenced task
/// 4. Every cost row has exactly `core_count` entries
/// 5. The edge list induces no cycle
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_instance(
    edges: &[(TaskId, TaskId)],
    cost_table: &[(TaskId, Vec<f64>)],
    core_count: usize,
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut referenced: HashSet<TaskId> = HashSet::new();
    let mut max_id = 0;
    for &(u, v) in edges {
        for id in [u, v] {
            if id == 0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::NonContiguousIds,
                    "Task id 0 referenced; ids are 1-based",
                ));
            } else {
                referenced.insert(id);
                max_id = max_id.max(id);
            }
        }
    }

    for id in 1..=max_id {
        if !referenced.contains(&id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonContiguousIds,
                format!("Task id {id} is missing; ids must cover 1..={max_id}"),
            ));
        }
    }

    // Cost rows: exactly one per referenced task, one entry per core
    let mut row_counts: HashMap<TaskId, usize> = HashMap::new();
    for (id, costs) in cost_table {
        *row_counts.entry(*id).or_insert(0) += 1;
        if !referenced.contains(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownCostRow,
                format!("Cost row for task {id}, which no edge references"),
            ));
        }
        if costs.len() != core_count {
            errors.push(ValidationError::new(
                ValidationErrorKind::CostRowArity,
                format!(
                    "Cost row for task {id} has {} entries, expected {core_count}",
                    costs.len()
                ),
            ));
        }
    }
    for &id in &referenced {
        match row_counts.get(&id) {
            None => errors.push(ValidationError::new(
                ValidationErrorKind::MissingCostRow,
                format!("Task {id} has no cost row"),
            )),
            Some(&count) if count > 1 => errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateCostRow,
                format!("Task {id} has {count} cost rows"),
            )),
            Some(_) => {}
        }
    }

    if let Some(cycle_err) = detect_cycles(edges) {
        errors.push(cycle_err);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Detects cycles in the dependency graph using DFS.
///
/// # Algorithm
/// Topological sort via DFS. If a back-edge is found (visiting a node
/// currently in the recursion stack), a cycle exists.
///
/// # Reference
/// Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4
fn detect_cycles(edges: &[(TaskId, TaskId)]) -> Option<ValidationError> {
    let mut adj: HashMap<TaskId, Vec<TaskId>> = HashMap::new();
    let mut all_ids: Vec<TaskId> = Vec::new();
    let mut seen: HashSet<TaskId> = HashSet::new();

    for &(u, v) in edges {
        adj.entry(u).or_default().push(v);
        for id in [u, v] {
            if seen.insert(id) {
                all_ids.push(id);
            }
        }
    }

    let mut visited = HashSet::new();
    let mut in_stack = HashSet::new();

    for &node in &all_ids {
        if !visited.contains(&node) && has_cycle_dfs(node, &adj, &mut visited, &mut in_stack) {
            return Some(ValidationError::new(
                ValidationErrorKind::CyclicDependency,
                format!("Circular dependency detected involving task {node}"),
            ));
        }
    }

    None
}

fn has_cycle_dfs(
    node: TaskId,
    adj: &HashMap<TaskId, Vec<TaskId>>,
    visited: &mut HashSet<TaskId>,
    in_stack: &mut HashSet<TaskId>,
) -> bool {
    visited.insert(node);
    in_stack.insert(node);

    if let Some(neighbors) = adj.get(&node) {
        for &next in neighbors {
            if in_stack.contains(&next) {
                return true; // Back edge → cycle
            }
            if !visited.contains(&next) && has_cycle_dfs(next, adj, visited, in_stack) {
                return true;
            }
        }
    }

    in_stack.remove(&node);
    false
}
