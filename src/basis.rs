//! Scope-restricted value functions and their additive, factored sums.
//!
//! A [`BasisFunction`] is a function over the joint assignment of its tag,
//! stored densely in canonical enumeration order. A [`FactoredVector`] is an
//! ordered collection of basis functions whose pointwise sum represents a
//! much larger function compactly. [`BasisMatrix`] and [`FactoredMatrix`]
//! are the action-augmented analogues: one value per (state assignment,
//! action assignment) pair.
//!
//! The additive-combination operations (`plus_equal`) preserve only one
//! observable contract: the pointwise sum of the collection is unchanged
//! whether a new term is folded into an existing one with the same scope or
//! appended as-is.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::matrix::DenseMatrix;
use crate::space::{FactorSpace, Tag, linear_index_full};

/// A value function restricted to the scope of its tag.
///
/// `values[k]` is the value at the k-th joint assignment of `tag` in
/// canonical enumeration order (first tag variable least significant).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasisFunction {
    pub tag: Tag,
    pub values: Vec<f64>,
}

impl BasisFunction {
    /// Build a basis function, checking the value layout against the space.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BasisLength`] if `values.len()` is not the domain
    /// size of `tag`.
    pub fn new(space: &FactorSpace, tag: Tag, values: Vec<f64>) -> Result<Self> {
        let expected = space.domain_size(&tag);
        if values.len() != expected {
            return Err(Error::BasisLength {
                tag: tag.ids().to_vec(),
                expected,
                got: values.len(),
            });
        }
        Ok(Self { tag, values })
    }

    /// Evaluate at a full assignment by projecting it onto the tag.
    pub fn value_at(&self, space: &FactorSpace, full: &[usize]) -> f64 {
        self.values[linear_index_full(space, &self.tag, full)]
    }
}

/// An additive, factored decomposition of a value function.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactoredVector {
    pub bases: Vec<BasisFunction>,
}

impl FactoredVector {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bases: Vec::with_capacity(capacity),
        }
    }

    /// Merge a term into the sum.
    ///
    /// Folds elementwise into an existing basis with an identical tag (the
    /// canonical layouts then coincide), otherwise appends the term.
    pub fn plus_equal(&mut self, term: BasisFunction) {
        if let Some(existing) = self.bases.iter_mut().find(|b| b.tag == term.tag) {
            for (dst, src) in existing.values.iter_mut().zip(&term.values) {
                *dst += src;
            }
        } else {
            self.bases.push(term);
        }
    }

    /// Evaluate the pointwise sum at a full assignment.
    pub fn value_at(&self, space: &FactorSpace, full: &[usize]) -> f64 {
        self.bases.iter().map(|b| b.value_at(space, full)).sum()
    }
}

/// An action-augmented basis function: one value per (state, action) pair.
///
/// Rows follow the canonical enumeration of `tag` over the state space,
/// columns the canonical enumeration of `action_tag` over the action space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasisMatrix {
    pub tag: Tag,
    pub action_tag: Tag,
    pub values: DenseMatrix,
}

impl BasisMatrix {
    /// Build a basis matrix, checking its shape against both spaces.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BasisMatrixShape`] on a shape mismatch.
    pub fn new(
        space: &FactorSpace,
        actions: &FactorSpace,
        tag: Tag,
        action_tag: Tag,
        values: DenseMatrix,
    ) -> Result<Self> {
        let expected_rows = space.domain_size(&tag);
        let expected_cols = actions.domain_size(&action_tag);
        if values.rows() != expected_rows || values.cols() != expected_cols {
            return Err(Error::BasisMatrixShape {
                tag: tag.ids().to_vec(),
                action_tag: action_tag.ids().to_vec(),
                rows: values.rows(),
                cols: values.cols(),
                expected_rows,
                expected_cols,
            });
        }
        Ok(Self {
            tag,
            action_tag,
            values,
        })
    }

    /// Evaluate at a full state and full action assignment.
    pub fn value_at(
        &self,
        space: &FactorSpace,
        actions: &FactorSpace,
        s: &[usize],
        a: &[usize],
    ) -> f64 {
        let row = linear_index_full(space, &self.tag, s);
        let col = linear_index_full(actions, &self.action_tag, a);
        self.values[(row, col)]
    }
}

/// An additive, factored decomposition of an action-augmented value function.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactoredMatrix {
    pub bases: Vec<BasisMatrix>,
}

impl FactoredMatrix {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bases: Vec::with_capacity(capacity),
        }
    }

    /// Merge a term into the sum; folds on matching (tag, action tag).
    pub fn plus_equal(&mut self, term: BasisMatrix) {
        if let Some(existing) = self
            .bases
            .iter_mut()
            .find(|b| b.tag == term.tag && b.action_tag == term.action_tag)
        {
            for row in 0..existing.values.rows() {
                for col in 0..existing.values.cols() {
                    existing.values[(row, col)] += term.values[(row, col)];
                }
            }
        } else {
            self.bases.push(term);
        }
    }

    /// Evaluate the pointwise sum at a full state and action assignment.
    pub fn value_at(
        &self,
        space: &FactorSpace,
        actions: &FactorSpace,
        s: &[usize],
        a: &[usize],
    ) -> f64 {
        self.bases
            .iter()
            .map(|b| b.value_at(space, actions, s, a))
            .sum()
    }
}
