#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Precedence relation between two works.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EdgeType {
    /// Successor starts after predecessor finishes.
    #[default]
    FinishStart,
    /// Successor starts after predecessor starts.
    StartStart,
    /// Successor finishes after predecessor finishes.
    FinishFinish,
    /// Successor finishes after predecessor starts.
    StartFinish,
    /// Finish-start with a mandatory lag.
    LagFinishStart,
    /// Finish-start link inside an inseparable chain.
    InseparableFinishStart,
}

impl EdgeType {
    pub fn is_inseparable(self) -> bool {
        matches!(self, EdgeType::InseparableFinishStart)
    }
}

/// Edge weight: lag (negative values allow overlap) and relation type.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GraphEdge {
    pub lag: f64,
    pub kind: EdgeType,
}

impl GraphEdge {
    pub const fn new(lag: f64, kind: EdgeType) -> Self {
        Self { lag, kind }
    }

    pub const fn finish_start() -> Self {
        Self::new(0.0, EdgeType::FinishStart)
    }

    pub const fn inseparable() -> Self {
        Self::new(0.0, EdgeType::InseparableFinishStart)
    }
}

/// Edge description by id, used to wire new works into a graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Dependency {
    pub id: String,
    pub edge: GraphEdge,
}

impl Dependency {
    pub fn new(id: impl Into<String>, lag: f64, kind: EdgeType) -> Self {
        Self {
            id: id.into(),
            edge: GraphEdge::new(lag, kind),
        }
    }

    pub fn finish_start(id: impl Into<String>) -> Self {
        Self::new(id, 0.0, EdgeType::FinishStart)
    }
}

impl From<&str> for Dependency {
    fn from(id: &str) -> Self {
        Dependency::finish_start(id)
    }
}
