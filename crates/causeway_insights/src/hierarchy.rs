//! Related-target hierarchies.
//!
//! Starting from one target, the query walks to every other target causally
//! connected to it in one direction and returns the result as a tree, while
//! filling a [`Relations`] table with every target, event, and task it
//! touched.
//!
//! # Direction
//!
//! Notifications (`next`, `error`, `complete`) flow from source to
//! destination, so a notification's sources are its preceding event.
//! Subscriptions (`subscribe`, `unsubscribe`) flow the other way: subscribing
//! downstream causes the upstream subscribe, so a subscription's sources are
//! its succeeding events. Destinations are the mirror image.
//!
//! # Termination
//!
//! The walk uses an explicit stack, so long chains cannot overflow the call
//! stack. A target already on the current path is never re-entered, so cyclic
//! compositions terminate. See [`HierarchyExpansion`] for how targets reached
//! along several paths are treated.

use std::collections::HashSet;

use causeway_foundation::{EventRef, TargetId, TargetRef};
use causeway_recorder::{CausalLog, Event, TargetView};
use serde::{Deserialize, Serialize};

use crate::config::{HierarchyExpansion, InsightsConfig};
use crate::relations::Relations;

// =============================================================================
// Direction
// =============================================================================

/// Which way to walk the causal graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Upstream: targets whose events caused this target's events.
    Sources,
    /// Downstream: targets whose events this target's events caused.
    Destinations,
}

impl Direction {
    /// Returns the events adjacent to `event` in this direction.
    #[must_use]
    pub fn related_events(self, event: &Event) -> Vec<EventRef> {
        let backwards = match self {
            Self::Sources => !event.event_type.is_subscription(),
            Self::Destinations => event.event_type.is_subscription(),
        };
        if backwards {
            event.preceding.into_iter().collect()
        } else {
            event.succeeding.clone()
        }
    }
}

// =============================================================================
// Hierarchy Nodes
// =============================================================================

/// One node of a related-target hierarchy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedHierarchyNode {
    /// The target this node names.
    pub target: TargetId,
    /// False when the target's children were not listed here, because it was
    /// already expanded elsewhere, is an ancestor, or is at the depth limit.
    pub expanded: bool,
    /// Targets adjacent to this one in the query direction.
    pub children: Vec<RelatedHierarchyNode>,
}

impl RelatedHierarchyNode {
    fn leaf(target: TargetRef) -> Self {
        Self {
            target: target.to_id(),
            expanded: false,
            children: Vec::new(),
        }
    }

    /// Visits this node and every descendant, depth first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a RelatedHierarchyNode)) {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            visit(node);
            stack.extend(node.children.iter().rev());
        }
    }

    /// Returns the number of nodes in this subtree.
    #[must_use]
    pub fn len(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_| count += 1);
        count
    }

    /// Always false: a hierarchy has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the deepest level in this subtree (the root is level 0).
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(node.children.iter().map(|c| (c, depth + 1)));
        }
        deepest
    }
}

/// Upstream and downstream hierarchies for one target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedHierarchyTree {
    /// Upstream hierarchy.
    pub sources: RelatedHierarchyNode,
    /// Downstream hierarchy.
    pub destinations: RelatedHierarchyNode,
}

// =============================================================================
// Traversal
// =============================================================================

/// Returns the distinct targets adjacent to `target` in `direction`, in the
/// order first reached, excluding `target` itself.
#[must_use]
pub fn adjacent_targets(
    log: &CausalLog,
    target: TargetView<'_>,
    direction: Direction,
) -> Vec<TargetRef> {
    let own = target.target();
    let mut seen = HashSet::new();
    let mut adjacent = Vec::new();

    for event in target.events().iter().filter_map(|&e| log.event(e)) {
        for related in direction.related_events(event) {
            let Some(related) = log.event(related) else {
                continue;
            };
            if related.target != own && seen.insert(related.target) {
                adjacent.push(related.target);
            }
        }
    }

    adjacent
}

struct Frame {
    target: TargetRef,
    pending: std::vec::IntoIter<TargetRef>,
    children: Vec<RelatedHierarchyNode>,
}

struct Collector<'a> {
    log: &'a CausalLog,
    direction: Direction,
    config: &'a InsightsConfig,
    relations: &'a mut Relations,
    expanded: HashSet<TargetRef>,
    on_path: HashSet<TargetRef>,
}

impl Collector<'_> {
    /// Records `target` and its events, and lists its neighbours.
    fn open(&mut self, target: TargetView<'_>) -> Frame {
        let reference = target.target();
        self.expanded.insert(reference);
        self.on_path.insert(reference);

        self.relations.add_target(self.log, target);
        for &event in target.events() {
            self.relations
                .add_event(self.log, event, self.config.include_event_data);
        }

        Frame {
            target: reference,
            pending: adjacent_targets(self.log, target, self.direction).into_iter(),
            children: Vec::new(),
        }
    }

    fn should_expand(&self, target: TargetRef, depth: usize) -> bool {
        if self.on_path.contains(&target) {
            return false;
        }
        if self.config.max_depth.is_some_and(|max| depth >= max) {
            return false;
        }
        match self.config.expansion {
            HierarchyExpansion::Once => !self.expanded.contains(&target),
            HierarchyExpansion::PerPath => true,
        }
    }

    fn collect(mut self, start: TargetView<'_>) -> RelatedHierarchyNode {
        let mut stack = vec![self.open(start)];
        let mut root = None;

        loop {
            let Some(frame) = stack.last_mut() else {
                break;
            };
            let Some(child) = frame.pending.next() else {
                let Some(done) = stack.pop() else {
                    break;
                };
                self.on_path.remove(&done.target);
                let node = RelatedHierarchyNode {
                    target: done.target.to_id(),
                    expanded: true,
                    children: done.children,
                };
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => root = Some(node),
                }
                continue;
            };

            let Some(view) = self.log.target(child) else {
                continue;
            };
            if self.should_expand(child, stack.len()) {
                let frame = self.open(view);
                stack.push(frame);
            } else {
                self.relations.add_target(self.log, view);
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(RelatedHierarchyNode::leaf(child));
                }
            }
        }

        root.unwrap_or_else(|| RelatedHierarchyNode::leaf(start.target()))
    }
}

/// Builds the hierarchy of targets related to `start` in `direction`,
/// recording everything touched into `relations`.
pub fn collect_related(
    log: &CausalLog,
    start: TargetView<'_>,
    direction: Direction,
    config: &InsightsConfig,
    relations: &mut Relations,
) -> RelatedHierarchyNode {
    let collector = Collector {
        log,
        direction,
        config,
        relations,
        expanded: HashSet::new(),
        on_path: HashSet::new(),
    };
    let node = collector.collect(start);
    tracing::debug!(
        target = %start.target(),
        ?direction,
        nodes = node.len(),
        depth = node.depth(),
        "collected related targets"
    );
    node
}
