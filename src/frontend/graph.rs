//! Module dependency graph.
//!
//! An edge `A → B` means "A must be parsed before B", i.e. B imports A. [`DependencyGraph::resolve`] linearizes the
//! graph with Kahn's algorithm; independent modules keep the order in which they were first discovered.

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap, HashMap};

use thiserror::Error;

/// Two modules that can each reach the other. A self-import names the same module twice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("circular dependency between modules '{}' and '{}'", modules[0], modules[1])]
pub struct CircularDependencyError {
    pub modules: [String; 2],
}

impl CircularDependencyError {
    pub fn is_self_import(&self) -> bool {
        self.modules[0] == self.modules[1]
    }
}

/// Dependency graph for resolving module parse order.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// Module names, in discovery order.
    nodes: Vec<String>,
    index: HashMap<String, usize>,
    /// `dependents[a]` holds every `b` with an edge `a → b`.
    dependents: Vec<BTreeSet<usize>>,
    /// `dependencies[b]` holds every `a` with an edge `a → b`.
    dependencies: Vec<BTreeSet<usize>>,
}

impl DependencyGraph {
    /// Create a graph containing only the entry module.
    pub fn new(root: &str) -> Self {
        let mut graph = Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            dependents: Vec::new(),
            dependencies: Vec::new(),
        };
        graph.add_module(root);
        graph
    }

    /// The entry module.
    pub fn root(&self) -> &str {
        &self.nodes[0]
    }

    /// Add a module without edges. Adding a known module does nothing.
    pub fn add_module(&mut self, name: &str) -> usize {
        if let Some(&id) = self.index.get(name) {
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(name.to_string());
        self.index.insert(name.to_string(), id);
        self.dependents.push(BTreeSet::new());
        self.dependencies.push(BTreeSet::new());
        id
    }

    /// Record that `dependency` must be parsed before `dependent`. Idempotent; `dependency == dependent` is allowed
    /// and makes the graph cyclic.
    pub fn add_edge(&mut self, dependency: &str, dependent: &str) {
        let from = self.add_module(dependency);
        let to = self.add_module(dependent);
        self.dependents[from].insert(to);
        self.dependencies[to].insert(from);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.dependents.iter().map(BTreeSet::len).sum()
    }

    /// Module names in discovery order.
    pub fn modules(&self) -> impl Iterator<Item = &str> + '_ {
        self.nodes.iter().map(String::as_str)
    }

    /// Modules `name` imports.
    pub fn dependencies_of(&self, name: &str) -> impl Iterator<Item = &str> + '_ {
        self.index
            .get(name)
            .into_iter()
            .flat_map(|&id| self.dependencies[id].iter())
            .map(|&dep| self.nodes[dep].as_str())
    }

    /// Produce a parse order in which every module follows everything it imports.
    ///
    /// ## Errors
    /// [`CircularDependencyError`] naming two modules on one cycle.
    #[tracing::instrument(skip_all, fields(modules = self.nodes.len(), edges = self.edge_count()))]
    pub fn resolve(&self) -> Result<Vec<String>, CircularDependencyError> {
        let mut in_degree: Vec<usize> = self.dependencies.iter().map(BTreeSet::len).collect();
        let mut ready: BinaryHeap<Reverse<usize>> = in_degree
            .iter()
            .enumerate()
            .filter(|&(_, &deg)| deg == 0)
            .map(|(id, _)| Reverse(id))
            .collect();

        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(Reverse(id)) = ready.pop() {
            order.push(self.nodes[id].clone());
            for &dependent in &self.dependents[id] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    ready.push(Reverse(dependent));
                }
            }
        }

        if order.len() == self.nodes.len() {
            return Ok(order);
        }

        let remaining: Vec<bool> = in_degree.iter().map(|&deg| deg > 0).collect();
        let [a, b] = self.find_cycle(&remaining);
        tracing::debug!(first = %self.nodes[a], second = %self.nodes[b], "dependency cycle");
        Err(CircularDependencyError {
            modules: [self.nodes[a].clone(), self.nodes[b].clone()],
        })
    }

    /// Walk dependency edges backwards among the modules Kahn's algorithm could not place.
    ///
    /// Every such module still has an unplaced dependency, so the walk never gets stuck and must revisit a module;
    /// the revisited module and the step taken from it lie on one cycle.
    fn find_cycle(&self, remaining: &[bool]) -> [usize; 2] {
        let mut step_of: Vec<Option<usize>> = vec![None; self.nodes.len()];
        let Some(mut current) = remaining.iter().position(|&r| r) else {
            return [0, 0];
        };

        loop {
            let Some(next) = self.dependencies[current].iter().copied().find(|&dep| remaining[dep]) else {
                return [current, current];
            };
            step_of[current] = Some(next);
            if step_of[next].is_some() || next == current {
                return [next, step_of[next].unwrap_or(next)];
            }
            current = next;
        }
    }
}
