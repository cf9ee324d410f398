//! Dynamic transition networks: per-variable conditional tables and the
//! probability queries over them.
//!
//! A [`TransitionNetwork`] holds one [`Node`] per state variable; the node at
//! position `i` is the conditional distribution of variable `i` at the next
//! step given the current values of its parent scope. Because variables are
//! conditionally independent given their parents, a joint transition
//! probability is the product of one table lookup per variable, so queries
//! cost O(variables), never O(joint domain).
//!
//! [`TransitionNetworkRef`] is the non-owning variant: a fixed-size sequence
//! of aliases into nodes owned elsewhere, used by
//! [`CompactNetwork`](crate::compact::CompactNetwork) to assemble a
//! per-action network from a mix of default and override nodes without
//! copying tables. Its lifetime is bounded by its source.
//!
//! Both variants implement [`TransitionModel`], the capability trait
//! back-projection is generic over.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::matrix::DenseMatrix;
use crate::space::{
    FactorSpace, PartialAssignmentRef, Tag, linear_index_full, linear_index_partial,
};

/// Tolerance for checking that a table row sums to 1.
pub const ROW_SUM_TOLERANCE: f64 = 1e-9;

/// The conditional probability table of one variable given its parent scope.
///
/// Rows correspond to joint parent assignments in canonical enumeration
/// order; columns to the values of the modeled (child) variable. The child
/// is not stored: it is the node's position within its network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub tag: Tag,
    pub table: DenseMatrix,
}

impl Node {
    /// Check this node against the space, as the table for variable `child`.
    ///
    /// Verifies that every parent exists, that the table shape matches the
    /// parent domain and child cardinality, and that each row is a
    /// probability distribution (non-negative, summing to 1 within
    /// [`ROW_SUM_TOLERANCE`]).
    pub(crate) fn validate(&self, space: &FactorSpace, child: usize) -> Result<()> {
        for parent in self.tag.iter() {
            if parent >= space.len() {
                return Err(Error::ParentOutOfRange {
                    variable: child,
                    parent,
                    space: space.len(),
                });
            }
        }
        let expected_rows = space.domain_size(&self.tag);
        let expected_cols = space.cardinality(child);
        if self.table.rows() != expected_rows || self.table.cols() != expected_cols {
            return Err(Error::TableShape {
                variable: child,
                rows: self.table.rows(),
                cols: self.table.cols(),
                expected_rows,
                expected_cols,
            });
        }
        self.validate_rows(child)
    }

    /// The space-independent half of validation: every row of the table
    /// must be a probability distribution, non-negative and summing to 1
    /// within [`ROW_SUM_TOLERANCE`]. This is what deserialization enforces,
    /// since no space is available at that point.
    pub(crate) fn validate_rows(&self, variable: usize) -> Result<()> {
        for row in 0..self.table.rows() {
            let mut sum = 0.0;
            for (column, &value) in self.table.row(row).iter().enumerate() {
                if value < 0.0 {
                    return Err(Error::NegativeProbability {
                        variable,
                        row,
                        column,
                        value,
                    });
                }
                sum += value;
            }
            if (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
                return Err(Error::RowSum { variable, row, sum });
            }
        }
        Ok(())
    }
}

/// Capability trait for anything back-projection can run against: indexed
/// node lookup plus the two transition-probability query shapes.
///
/// The queries are provided methods, so the owning and borrowing network
/// variants share one implementation and one generic back-projection
/// algorithm serves both.
pub trait TransitionModel {
    /// Number of modeled variables.
    fn len(&self) -> usize;

    /// The node for variable `variable`.
    ///
    /// # Panics
    ///
    /// Panics if `variable` is out of range.
    fn node(&self, variable: usize) -> &Node;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Probability of transitioning from full assignment `s` to `s1`.
    ///
    /// The product, over every variable `i`, of
    /// `table_i[row(s restricted to parents of i)][s1[i]]`.
    fn transition_probability(&self, space: &FactorSpace, s: &[usize], s1: &[usize]) -> f64 {
        let mut probability = 1.0;
        for variable in 0..self.len() {
            let node = self.node(variable);
            let row = linear_index_full(space, &node.tag, s);
            probability *= node.table[(row, s1[variable])];
        }
        probability
    }

    /// Probability of reaching the scoped assignment `s1` from `s`.
    ///
    /// The product runs only over the variables named by `s1`'s tag; all
    /// other next-state variables are marginalized out by construction.
    ///
    /// # Panics
    ///
    /// Panics if `s` does not cover every parent of every variable in
    /// `s1`'s tag. Failing fast here is deliberate: a silently mismatched
    /// lookup would return a plausible-looking wrong probability.
    fn partial_transition_probability(
        &self,
        space: &FactorSpace,
        s: PartialAssignmentRef<'_>,
        s1: PartialAssignmentRef<'_>,
    ) -> f64 {
        let mut probability = 1.0;
        for (variable, &value) in s1.tag.iter().zip(s1.values) {
            let node = self.node(variable);
            let row = linear_index_partial(space, &node.tag, s);
            probability *= node.table[(row, value)];
        }
        probability
    }
}

/// An owning dynamic transition network: one node per state variable.
///
/// Deserialization rejects any node whose table rows are not probability
/// distributions, so a crafted or corrupted document cannot smuggle in the
/// non-stochastic tables that [`TransitionNetwork::new`] refuses. Shape
/// checks against a space need the space itself; after deserializing, call
/// [`TransitionNetwork::validate`] to re-establish those too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTransitionNetwork")]
pub struct TransitionNetwork {
    nodes: Vec<Node>,
}

/// Unvalidated mirror of [`TransitionNetwork`], used only as a
/// deserialization intermediate.
#[derive(Deserialize)]
struct RawTransitionNetwork {
    nodes: Vec<Node>,
}

impl TryFrom<RawTransitionNetwork> for TransitionNetwork {
    type Error = Error;

    fn try_from(raw: RawTransitionNetwork) -> Result<Self> {
        for (variable, node) in raw.nodes.iter().enumerate() {
            node.validate_rows(variable)?;
        }
        Ok(Self { nodes: raw.nodes })
    }
}

impl TransitionNetwork {
    /// Build a network over `space`, validating every node eagerly.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NetworkSize`] unless there is exactly one node per
    /// variable of the space, or any node-level error from validation
    /// (shape, parent range, row stochasticity).
    pub fn new(space: &FactorSpace, nodes: Vec<Node>) -> Result<Self> {
        let network = Self { nodes };
        network.validate(space)?;
        Ok(network)
    }

    /// Re-check the full set of invariants against a space.
    ///
    /// [`TransitionNetwork::new`] runs this automatically; it is exposed for
    /// networks that arrived through deserialization, where only the
    /// space-independent row checks could run.
    ///
    /// # Errors
    ///
    /// Same as [`TransitionNetwork::new`].
    pub fn validate(&self, space: &FactorSpace) -> Result<()> {
        if self.nodes.len() != space.len() {
            return Err(Error::NetworkSize {
                expected: space.len(),
                got: self.nodes.len(),
            });
        }
        for (child, node) in self.nodes.iter().enumerate() {
            node.validate(space, child)?;
        }
        Ok(())
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}

impl std::ops::Index<usize> for TransitionNetwork {
    type Output = Node;

    fn index(&self, variable: usize) -> &Node {
        &self.nodes[variable]
    }
}

impl TransitionModel for TransitionNetwork {
    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn node(&self, variable: usize) -> &Node {
        &self.nodes[variable]
    }
}

/// A non-owning transition network: aliases into nodes owned elsewhere.
///
/// Construction is cheap (no table is copied) and the borrow checker bounds
/// the view's lifetime by its source, so a view can never outlive the nodes
/// it aliases.
#[derive(Debug, Clone)]
pub struct TransitionNetworkRef<'a> {
    nodes: Vec<&'a Node>,
}

impl<'a> TransitionNetworkRef<'a> {
    /// Assemble a view from node references, one per state variable.
    ///
    /// No validation is performed: every referenced node was already
    /// validated when its owner was built.
    pub fn new(nodes: Vec<&'a Node>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[&'a Node] {
        &self.nodes
    }
}

impl std::ops::Index<usize> for TransitionNetworkRef<'_> {
    type Output = Node;

    fn index(&self, variable: usize) -> &Node {
        self.nodes[variable]
    }
}

impl TransitionModel for TransitionNetworkRef<'_> {
    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn node(&self, variable: usize) -> &Node {
        self.nodes[variable]
    }
}
