//! Full state of one target: its summary, its related hierarchies, and the
//! relation tables needed to render them.

use causeway_foundation::TargetRef;
use causeway_recorder::CausalLog;
use serde::{Deserialize, Serialize};

use crate::config::InsightsConfig;
use crate::hierarchy::{Direction, RelatedHierarchyTree, collect_related};
use crate::relations::Relations;
use crate::targets::Target;

/// Answer to a state query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetState {
    /// The queried target.
    #[serde(rename = "ref")]
    pub target: Target,
    /// Everything either hierarchy touched.
    pub relations: Relations,
    /// Upstream and downstream hierarchies rooted at the target.
    pub hierarchy: RelatedHierarchyTree,
}

/// Builds the state of `target`, or `None` if the log has no such target.
///
/// Both directions share one relation table.
#[must_use]
pub fn target_state(
    log: &CausalLog,
    target: TargetRef,
    config: &InsightsConfig,
) -> Option<TargetState> {
    let view = log.target(target)?;
    let name = log.declaration(view.declaration())?.name.clone();

    let mut relations = Relations::new();
    let sources = collect_related(log, view, Direction::Sources, config, &mut relations);
    let destinations = collect_related(log, view, Direction::Destinations, config, &mut relations);

    Some(TargetState {
        target: Target {
            id: view.id(),
            target_type: view.target_type(),
            name,
        },
        relations,
        hierarchy: RelatedHierarchyTree {
            sources,
            destinations,
        },
    })
}
