//! Back-projection: propagating a scope-restricted value function backward
//! through a transition model.
//!
//! Given a model T and a function f over "next" variables, back-projection
//! computes g(x) = Σ_{x'} P(x' | x) · f(x'), where x ranges only over the
//! union of the parent scopes of the variables f depends on, never over the
//! full joint state. The cost of one term is
//! O(|domain(output scope)| · |domain(f's scope)|), independent of the total
//! number of variables; this locality is the entire point of the factored
//! representation.
//!
//! The scalar algorithm is generic over [`TransitionModel`], so it serves
//! the owning network, the borrowing network, and anything a caller builds
//! that exposes the same capability. The action-augmented variants run
//! against a [`FactoredActionNetwork`] and produce one value per
//! (state assignment, action assignment) pair. Additive collections are
//! handled term by term and recombined: back-projection is linear in the
//! value function, so superposition holds exactly.

use crate::basis::{BasisFunction, BasisMatrix, FactoredMatrix, FactoredVector};
use crate::factored_action::FactoredActionNetwork;
use crate::matrix::DenseMatrix;
use crate::network::TransitionModel;
use crate::space::{DomainIterator, FactorSpace, Tag};

/// Back-project one basis function through a transition model.
///
/// The output's tag is the merge of the parent tags of every variable the
/// basis depends on; its values are laid out in that tag's canonical
/// enumeration order, like every other dense array in this crate.
///
/// The output domain is enumerated in the same canonical order used for
/// indexing, so the k-th enumerated assignment lands at slot k: every slot
/// is written exactly once and the buffer needs no zero fill. The inner
/// cursor walks f's scope in lockstep with `basis.values`' layout; children
/// outside that scope are marginalized away inside the partial probability
/// query.
///
/// # Examples
///
/// ```
/// use factored_dbn::{
///     BasisFunction, DenseMatrix, FactorSpace, Node, Tag, TransitionNetwork, back_project,
/// };
///
/// let space = FactorSpace::new(vec![2, 2])?;
/// let network = TransitionNetwork::new(
///     &space,
///     vec![
///         Node {
///             tag: Tag::empty(),
///             table: DenseMatrix::from_rows(vec![vec![0.5, 0.5]])?,
///         },
///         Node {
///             tag: Tag::new(vec![0])?,
///             table: DenseMatrix::from_rows(vec![vec![0.9, 0.1], vec![0.2, 0.8]])?,
///         },
///     ],
/// )?;
///
/// // Expected next-step value of a function of variable 1, as a function of
/// // variable 1's parent (variable 0).
/// let f = BasisFunction::new(&space, Tag::new(vec![1])?, vec![10.0, 20.0])?;
/// let g = back_project(&space, &network, &f);
/// assert_eq!(g.tag.ids(), &[0]);
/// assert_eq!(g.values, vec![0.9 * 10.0 + 0.1 * 20.0, 0.2 * 10.0 + 0.8 * 20.0]);
/// # Ok::<(), factored_dbn::Error>(())
/// ```
pub fn back_project<M: TransitionModel>(
    space: &FactorSpace,
    model: &M,
    basis: &BasisFunction,
) -> BasisFunction {
    let mut tag = Tag::empty();
    for variable in basis.tag.iter() {
        tag = tag.merge(&model.node(variable).tag);
    }

    let mut values = Vec::with_capacity(space.domain_size(&tag));

    let mut domain = DomainIterator::new(space, &tag);
    let mut child_domain = DomainIterator::new(space, &basis.tag);

    while domain.is_valid() {
        let mut accumulated = 0.0;
        let mut i = 0;
        while child_domain.is_valid() {
            accumulated += basis.values[i]
                * model.partial_transition_probability(space, domain.current(), child_domain.current());
            i += 1;
            child_domain.advance();
        }
        values.push(accumulated);

        domain.advance();
        child_domain.reset();
    }

    BasisFunction { tag, values }
}

/// Back-project an additive collection of basis functions.
///
/// Each term is back-projected independently and merged into the result;
/// valid because transition probability is linear in the propagated
/// function.
pub fn back_project_sum<M: TransitionModel>(
    space: &FactorSpace,
    model: &M,
    function: &FactoredVector,
) -> FactoredVector {
    let mut result = FactoredVector::with_capacity(function.bases.len());
    for basis in &function.bases {
        result.plus_equal(back_project(space, model, basis));
    }
    result
}

/// Back-project one basis function through a factored-action network,
/// producing an action-augmented result.
///
/// The output's state tag merges the parent tags of every table of every
/// referenced variable (over all of its action choices); the action tag
/// merges the referenced variables' action tags. One value is produced per
/// (state assignment, action assignment) pair, state outer and action
/// inner, which is exactly row-major order for the result matrix; as in
/// the scalar case, every cell is written exactly once with no zero fill.
pub fn back_project_action(
    space: &FactorSpace,
    actions: &FactorSpace,
    network: &FactoredActionNetwork,
    basis: &BasisFunction,
) -> BasisMatrix {
    let mut tag = Tag::empty();
    let mut action_tag = Tag::empty();
    for variable in basis.tag.iter() {
        let entry = &network[variable];
        action_tag = action_tag.merge(&entry.action_tag);
        for node in &entry.nodes {
            tag = tag.merge(&node.tag);
        }
    }

    let rows = space.domain_size(&tag);
    let cols = actions.domain_size(&action_tag);
    let mut data = Vec::with_capacity(rows * cols);

    let mut state_domain = DomainIterator::new(space, &tag);
    let mut action_domain = DomainIterator::new(actions, &action_tag);
    let mut child_domain = DomainIterator::new(space, &basis.tag);

    while state_domain.is_valid() {
        while action_domain.is_valid() {
            let mut accumulated = 0.0;
            let mut i = 0;
            while child_domain.is_valid() {
                accumulated += basis.values[i]
                    * network.partial_transition_probability(
                        space,
                        actions,
                        state_domain.current(),
                        action_domain.current(),
                        child_domain.current(),
                    );
                i += 1;
                child_domain.advance();
            }
            data.push(accumulated);

            action_domain.advance();
            child_domain.reset();
        }
        state_domain.advance();
        action_domain.reset();
    }

    let values = DenseMatrix::from_raw(rows, cols, data)
        .expect("domain enumeration produces exactly rows * cols values");
    BasisMatrix {
        tag,
        action_tag,
        values,
    }
}

/// Back-project an additive collection through a factored-action network,
/// summing the per-term matrices.
pub fn back_project_action_sum(
    space: &FactorSpace,
    actions: &FactorSpace,
    network: &FactoredActionNetwork,
    function: &FactoredVector,
) -> FactoredMatrix {
    let mut result = FactoredMatrix::with_capacity(function.bases.len());
    for basis in &function.bases {
        result.plus_equal(back_project_action(space, actions, network, basis));
    }
    result
}
