//! Configuration for the query layer.

use crate::codec::Codec;

/// How the related-hierarchy query treats a target reachable along more than
/// one path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HierarchyExpansion {
    /// Expand each target once per query direction. Later occurrences appear
    /// as unexpanded leaves. Work is linear in the size of the graph.
    #[default]
    Once,

    /// Re-expand a shared target under every path that reaches it, but never
    /// re-enter a target already on the current path. Matches the tree a
    /// client would draw by hand. Size is exponential in the number of
    /// chained diamonds.
    PerPath,
}

/// Configuration for queries and the request boundary.
#[derive(Clone, Debug)]
pub struct InsightsConfig {
    /// Treatment of targets reachable along several paths.
    pub expansion: HierarchyExpansion,

    /// Deepest hierarchy level that is expanded; nodes at this depth are
    /// listed as leaves. `None` means unlimited.
    pub max_depth: Option<usize>,

    /// Whether `next`/`error` payloads are copied into the relation table.
    pub include_event_data: bool,

    /// Wire format for [`InsightsServer::handle_bytes`](crate::InsightsServer::handle_bytes).
    pub codec: Codec,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            expansion: HierarchyExpansion::Once,
            max_depth: None,
            include_event_data: true,
            codec: Codec::Json,
        }
    }
}

impl InsightsConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration that re-expands shared targets per path.
    ///
    /// Tree size grows exponentially with the number of chained diamonds
    /// (16 stacked diamonds expand to over 260,000 nodes). Pair it with
    /// [`with_max_depth`](Self::with_max_depth) on graphs with heavy fan-in.
    #[must_use]
    pub fn faithful() -> Self {
        Self {
            expansion: HierarchyExpansion::PerPath,
            ..Self::default()
        }
    }

    /// Creates a configuration for large graphs: each target expanded once,
    /// no payloads.
    #[must_use]
    pub fn compact() -> Self {
        Self {
            expansion: HierarchyExpansion::Once,
            include_event_data: false,
            ..Self::default()
        }
    }

    /// Builder method to set the expansion mode.
    #[must_use]
    pub fn with_expansion(mut self, expansion: HierarchyExpansion) -> Self {
        self.expansion = expansion;
        self
    }

    /// Builder method to cap hierarchy depth.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Builder method to include or omit event payloads.
    #[must_use]
    pub fn with_event_data(mut self, include: bool) -> Self {
        self.include_event_data = include;
        self
    }

    /// Builder method to set the wire codec.
    #[must_use]
    pub fn with_codec(mut self, codec: Codec) -> Self {
        self.codec = codec;
        self
    }
}
