//! Decision networks with factored actions.
//!
//! When the action itself is described by several variables, keeping one
//! transition network per joint action explodes combinatorially. A
//! [`FactoredActionNetwork`] instead lets every state variable declare which
//! *subset* of action variables it reacts to (its action tag) and carries
//! one conditional table per joint assignment of that subset. Resolving a
//! query projects the action onto each variable's action tag, picks the
//! matching table by mixed-radix index, and proceeds exactly like a plain
//! network lookup.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::network::Node;
use crate::space::{
    FactorSpace, PartialAssignmentRef, Tag, linear_index_full, linear_index_partial,
};

/// The action-dependent tables for one state variable.
///
/// `nodes[k]` is the conditional table used when the projection of the
/// action onto `action_tag` has mixed-radix index `k` (canonical
/// enumeration order).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionNode {
    pub action_tag: Tag,
    pub nodes: Vec<Node>,
}

/// A transition model where each state variable depends on a subset of
/// action variables.
///
/// Deserialization rejects any table whose rows are not probability
/// distributions; the checks that need the state and action spaces (entry
/// count, action scopes, table counts, shapes) are re-run by
/// [`FactoredActionNetwork::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFactoredActionNetwork")]
pub struct FactoredActionNetwork {
    nodes: Vec<ActionNode>,
}

/// Unvalidated mirror of [`FactoredActionNetwork`], used only as a
/// deserialization intermediate.
#[derive(Deserialize)]
struct RawFactoredActionNetwork {
    nodes: Vec<ActionNode>,
}

impl TryFrom<RawFactoredActionNetwork> for FactoredActionNetwork {
    type Error = Error;

    fn try_from(raw: RawFactoredActionNetwork) -> Result<Self> {
        for (variable, entry) in raw.nodes.iter().enumerate() {
            for node in &entry.nodes {
                node.validate_rows(variable)?;
            }
        }
        Ok(Self { nodes: raw.nodes })
    }
}

impl FactoredActionNetwork {
    /// Build a factored-action network, validating every table eagerly.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NetworkSize`] unless there is one entry per state
    /// variable, [`Error::ActionVariableOutOfRange`] for an action tag
    /// naming a variable outside the action space,
    /// [`Error::ActionTableCount`] unless each entry carries exactly one
    /// node per joint assignment of its action tag, or any node-level
    /// validation error.
    pub fn new(
        space: &FactorSpace,
        actions: &FactorSpace,
        nodes: Vec<ActionNode>,
    ) -> Result<Self> {
        let network = Self { nodes };
        network.validate(space, actions)?;
        Ok(network)
    }

    /// Re-check the full set of invariants against the state and action
    /// spaces.
    ///
    /// [`FactoredActionNetwork::new`] runs this automatically; it is
    /// exposed for networks that arrived through deserialization, where
    /// only the space-independent row checks could run.
    ///
    /// # Errors
    ///
    /// Same as [`FactoredActionNetwork::new`].
    pub fn validate(&self, space: &FactorSpace, actions: &FactorSpace) -> Result<()> {
        if self.nodes.len() != space.len() {
            return Err(Error::NetworkSize {
                expected: space.len(),
                got: self.nodes.len(),
            });
        }
        for (variable, entry) in self.nodes.iter().enumerate() {
            for action_variable in entry.action_tag.iter() {
                if action_variable >= actions.len() {
                    return Err(Error::ActionVariableOutOfRange {
                        variable,
                        action_variable,
                        actions: actions.len(),
                    });
                }
            }
            let expected = actions.domain_size(&entry.action_tag);
            if entry.nodes.len() != expected {
                return Err(Error::ActionTableCount {
                    variable,
                    expected,
                    got: entry.nodes.len(),
                });
            }
            for node in &entry.nodes {
                node.validate(space, variable)?;
            }
        }
        Ok(())
    }

    /// Number of modeled state variables.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[ActionNode] {
        &self.nodes
    }

    /// Probability of transitioning from `s` to `s1` under full action `a`.
    ///
    /// Per variable, only the projection of `a` onto that variable's action
    /// tag matters; two actions agreeing on every referenced action tag
    /// yield identical probabilities.
    pub fn transition_probability(
        &self,
        space: &FactorSpace,
        actions: &FactorSpace,
        s: &[usize],
        a: &[usize],
        s1: &[usize],
    ) -> f64 {
        let mut probability = 1.0;
        for (variable, entry) in self.nodes.iter().enumerate() {
            let which = linear_index_full(actions, &entry.action_tag, a);
            let node = &entry.nodes[which];
            let row = linear_index_full(space, &node.tag, s);
            probability *= node.table[(row, s1[variable])];
        }
        probability
    }

    /// Probability of reaching the scoped assignment `s1` from `s` under the
    /// scoped action `a`.
    ///
    /// # Panics
    ///
    /// Panics if, for any variable named by `s1`'s tag, `s` does not cover
    /// all of its parents or `a` does not cover its whole action tag.
    pub fn partial_transition_probability(
        &self,
        space: &FactorSpace,
        actions: &FactorSpace,
        s: PartialAssignmentRef<'_>,
        a: PartialAssignmentRef<'_>,
        s1: PartialAssignmentRef<'_>,
    ) -> f64 {
        let mut probability = 1.0;
        for (variable, &value) in s1.tag.iter().zip(s1.values) {
            let entry = &self.nodes[variable];
            let which = linear_index_partial(actions, &entry.action_tag, a);
            let node = &entry.nodes[which];
            let row = linear_index_partial(space, &node.tag, s);
            probability *= node.table[(row, value)];
        }
        probability
    }
}

impl std::ops::Index<usize> for FactoredActionNetwork {
    type Output = ActionNode;

    fn index(&self, variable: usize) -> &ActionNode {
        &self.nodes[variable]
    }
}
