//! Compact per-action decision networks.
//!
//! When each action has its own transition network but the networks differ
//! only where the action actually touches the state, storing one full
//! network per action wastes space. [`CompactNetwork`] stores one default
//! [`TransitionNetwork`] plus, per action, the sparse list of node overrides
//! ([`DiffNode`]); the network for a given action is assembled on demand as
//! a borrowing [`TransitionNetworkRef`] in O(variables + overrides) without
//! copying any table.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::network::{Node, TransitionNetwork, TransitionNetworkRef};
use crate::space::FactorSpace;

/// One node override: replace the default node of variable `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffNode {
    pub id: usize,
    pub node: Node,
}

/// A default transition network plus sparse per-action overrides.
///
/// Deserialization rejects overrides that point beyond the default network
/// or whose rows are not probability distributions; shape checks against a
/// space are re-run by [`CompactNetwork::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCompactNetwork")]
pub struct CompactNetwork {
    diffs: Vec<Vec<DiffNode>>,
    default: TransitionNetwork,
}

/// Unvalidated mirror of [`CompactNetwork`], used only as a deserialization
/// intermediate. The default network inside has already passed its own
/// row checks by the time this conversion runs.
#[derive(Deserialize)]
struct RawCompactNetwork {
    diffs: Vec<Vec<DiffNode>>,
    default: TransitionNetwork,
}

impl TryFrom<RawCompactNetwork> for CompactNetwork {
    type Error = Error;

    fn try_from(raw: RawCompactNetwork) -> Result<Self> {
        for (action, overrides) in raw.diffs.iter().enumerate() {
            for diff in overrides {
                if diff.id >= raw.default.nodes().len() {
                    return Err(Error::DiffOutOfRange {
                        action,
                        variable: diff.id,
                        network: raw.default.nodes().len(),
                    });
                }
                diff.node.validate_rows(diff.id)?;
            }
        }
        Ok(Self {
            diffs: raw.diffs,
            default: raw.default,
        })
    }
}

impl CompactNetwork {
    /// Build a compact network from a default model and per-action diffs.
    ///
    /// Every override must name a variable of the default network and its
    /// node must be a valid table for that variable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DiffOutOfRange`] for an override beyond the network,
    /// or any node-level validation error for a malformed override table.
    pub fn new(
        space: &FactorSpace,
        diffs: Vec<Vec<DiffNode>>,
        default: TransitionNetwork,
    ) -> Result<Self> {
        let compact = Self { diffs, default };
        compact.validate(space)?;
        Ok(compact)
    }

    /// Re-check the full set of invariants against a space.
    ///
    /// [`CompactNetwork::new`] runs this automatically; it is exposed for
    /// networks that arrived through deserialization, where only the
    /// space-independent checks could run.
    ///
    /// # Errors
    ///
    /// Same as [`CompactNetwork::new`].
    pub fn validate(&self, space: &FactorSpace) -> Result<()> {
        self.default.validate(space)?;
        for (action, overrides) in self.diffs.iter().enumerate() {
            for diff in overrides {
                if diff.id >= self.default.nodes().len() {
                    return Err(Error::DiffOutOfRange {
                        action,
                        variable: diff.id,
                        network: self.default.nodes().len(),
                    });
                }
                diff.node.validate(space, diff.id)?;
            }
        }
        Ok(())
    }

    /// Number of actions the diff lists cover.
    pub fn actions(&self) -> usize {
        self.diffs.len()
    }

    /// Assemble the transition network for `action`.
    ///
    /// Every slot starts as a reference to the default node, then exactly
    /// the slots named by `diffs[action]` are redirected to their overrides.
    /// The view borrows from `self` and costs O(variables + overrides).
    ///
    /// # Panics
    ///
    /// Panics if `action` is out of range.
    pub fn diff_transition(&self, action: usize) -> TransitionNetworkRef<'_> {
        let mut nodes: Vec<&Node> = self.default.nodes().iter().collect();
        for diff in &self.diffs[action] {
            nodes[diff.id] = &diff.node;
        }
        TransitionNetworkRef::new(nodes)
    }

    /// The default transition model.
    pub fn default_transition(&self) -> &TransitionNetwork {
        &self.default
    }

    /// The raw per-action override lists.
    pub fn diff_nodes(&self) -> &[Vec<DiffNode>] {
        &self.diffs
    }
}
