//! Dependency graph entity
//!
//! A directed graph of modules. Roots keep declaration order, children keep
//! POM order, so every traversal is deterministic. Filtering happens after
//! construction through [`DependencyGraph::retain`].

use std::collections::{BTreeMap, HashSet, VecDeque};

use crate::domain::value_objects::{Coordinate, ModuleId};

/// Label used as requester of declared (root) dependencies
pub const ROOT_REQUESTER: &str = "project";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    coordinate: Coordinate,
    /// Other files of the same version (classifier or extension variants)
    variants: Vec<Coordinate>,
    requested_by: String,
    children: Vec<ModuleId>,
}

impl GraphNode {
    pub fn coordinate(&self) -> &Coordinate {
        &self.coordinate
    }

    /// Who first asked for this module (coordinate or `project`)
    pub fn requested_by(&self) -> &str {
        &self.requested_by
    }

    pub fn children(&self) -> &[ModuleId] {
        &self.children
    }

    /// Every file to embed for this module, main coordinate first
    pub fn files(&self) -> impl Iterator<Item = &Coordinate> {
        std::iter::once(&self.coordinate).chain(self.variants.iter())
    }

    /// Tree label: the coordinate, then each variant's classifier (or extension)
    fn label(&self) -> String {
        let mut label = self.coordinate.to_string();
        for variant in &self.variants {
            label.push_str(" [+");
            label.push_str(variant.classifier().unwrap_or(variant.extension()));
            label.push(']');
        }
        label
    }

    fn add_variant(&mut self, coordinate: Coordinate) {
        if !self.files().any(|file| *file == coordinate) {
            self.variants.push(coordinate);
        }
    }
}

/// Result of inserting a module into the graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion {
    /// First time this module is seen; it needs expanding
    New,
    /// Already present with the same version (a new classifier is recorded as a variant)
    Existing,
    /// Already present with another version
    Conflict { existing: Coordinate, requested_by: String },
}

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    roots: Vec<ModuleId>,
    nodes: BTreeMap<ModuleId, GraphNode>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `coordinate` as a child of `parent` (or as a root when `None`)
    pub fn insert(&mut self, coordinate: Coordinate, parent: Option<&ModuleId>) -> Insertion {
        let id = coordinate.module().clone();
        let requester = match parent {
            Some(parent) => self
                .nodes
                .get(parent)
                .map(|n| n.coordinate.to_string())
                .unwrap_or_else(|| parent.to_string()),
            None => ROOT_REQUESTER.to_string(),
        };

        let outcome = match self.nodes.get_mut(&id) {
            Some(existing) if existing.coordinate.version() != coordinate.version() => {
                return Insertion::Conflict {
                    existing: existing.coordinate.clone(),
                    requested_by: existing.requested_by.clone(),
                };
            }
            Some(existing) => {
                existing.add_variant(coordinate);
                Insertion::Existing
            }
            None => {
                self.nodes.insert(
                    id.clone(),
                    GraphNode {
                        coordinate,
                        variants: Vec::new(),
                        requested_by: requester,
                        children: Vec::new(),
                    },
                );
                Insertion::New
            }
        };

        match parent {
            Some(parent) => {
                if let Some(node) = self.nodes.get_mut(parent) {
                    if !node.children.contains(&id) {
                        node.children.push(id);
                    }
                }
            }
            None => {
                if !self.roots.contains(&id) {
                    self.roots.push(id);
                }
            }
        }

        outcome
    }

    pub fn get(&self, id: &ModuleId) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &ModuleId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn roots(&self) -> &[ModuleId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Keep only modules accepted by `keep`, then drop what became unreachable
    ///
    /// Returns the removed modules in sorted order.
    pub fn retain(&mut self, keep: impl Fn(&ModuleId) -> bool) -> Vec<ModuleId> {
        let rejected: HashSet<ModuleId> =
            self.nodes.keys().filter(|id| !keep(id)).cloned().collect();

        self.roots.retain(|id| !rejected.contains(id));
        for node in self.nodes.values_mut() {
            node.children.retain(|id| !rejected.contains(id));
        }

        let reachable: HashSet<ModuleId> = self.breadth_first().into_iter().collect();
        let removed: Vec<ModuleId> = self
            .nodes
            .keys()
            .filter(|id| !reachable.contains(*id))
            .cloned()
            .collect();
        for id in &removed {
            self.nodes.remove(id);
        }
        removed
    }

    /// Modules in breadth-first order from the roots
    pub fn breadth_first(&self) -> Vec<ModuleId> {
        let mut order = Vec::new();
        let mut seen = HashSet::new();
        let mut queue: VecDeque<&ModuleId> = self.roots.iter().collect();
        while let Some(id) = queue.pop_front() {
            if !seen.insert(id.clone()) {
                continue;
            }
            order.push(id.clone());
            if let Some(node) = self.nodes.get(id) {
                queue.extend(node.children.iter());
            }
        }
        order
    }

    /// Coordinates to download and embed, in layering order
    pub fn artifacts(&self) -> Vec<&Coordinate> {
        self.breadth_first()
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .flat_map(|node| node.files())
            .collect()
    }

    /// Gradle-style tree; repeated subtrees are marked with `(*)`
    pub fn render_tree(&self) -> String {
        let mut out = String::new();
        let mut expanded = HashSet::new();
        for root in &self.roots {
            let Some(node) = self.nodes.get(root) else {
                continue;
            };
            out.push_str(&node.label());
            let repeated = !expanded.insert(root.clone());
            if repeated && !node.children.is_empty() {
                out.push_str(" (*)\n");
                continue;
            }
            out.push('\n');
            self.render_children(node, "", &mut expanded, &mut out);
        }
        out
    }

    fn render_children(
        &self,
        node: &GraphNode,
        prefix: &str,
        expanded: &mut HashSet<ModuleId>,
        out: &mut String,
    ) {
        for (i, child_id) in node.children.iter().enumerate() {
            let Some(child) = self.nodes.get(child_id) else {
                continue;
            };
            let last = i + 1 == node.children.len();
            out.push_str(prefix);
            out.push_str(if last { "\\--- " } else { "+--- " });
            out.push_str(&child.label());
            if !expanded.insert(child_id.clone()) {
                if !child.children.is_empty() {
                    out.push_str(" (*)");
                }
                out.push('\n');
                continue;
            }
            out.push('\n');
            let nested = format!("{}{}", prefix, if last { "     " } else { "|    " });
            self.render_children(child, &nested, expanded, out);
        }
    }
}
