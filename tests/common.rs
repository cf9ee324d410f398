//! Common test utilities for the factored-dbn test suite.
//!
//! Provides seeded random construction of factor spaces, stochastic
//! networks, and basis functions, plus brute-force joint enumeration used
//! as the oracle the factored algorithms are checked against.

use factored_dbn::{
    ActionNode, BasisFunction, DenseMatrix, FactorSpace, FactoredActionNetwork, Node, Tag,
    TransitionNetwork,
};
use rand::{Rng, rngs::StdRng};

/// A space of `variables` variables with random cardinalities in
/// `2..=max_cardinality`.
pub fn random_space(rng: &mut StdRng, variables: usize, max_cardinality: usize) -> FactorSpace {
    let cardinalities = (0..variables)
        .map(|_| rng.random_range(2..=max_cardinality))
        .collect();
    FactorSpace::new(cardinalities).expect("random cardinalities are positive")
}

/// A random scope: each variable of the space is included with probability
/// one half (ids stay sorted by construction).
pub fn random_tag(rng: &mut StdRng, space: &FactorSpace) -> Tag {
    let ids = (0..space.len()).filter(|_| rng.random_bool(0.5)).collect();
    Tag::new(ids).expect("filtering an increasing range keeps it increasing")
}

/// A node for `child` over a random parent scope, with every row a random
/// distribution.
pub fn random_node(rng: &mut StdRng, space: &FactorSpace, child: usize) -> Node {
    let tag = random_tag(rng, space);
    node_with_tag(rng, space, child, tag)
}

/// A node for `child` with the given parent scope and random stochastic rows.
pub fn node_with_tag(rng: &mut StdRng, space: &FactorSpace, child: usize, tag: Tag) -> Node {
    let rows = space.domain_size(&tag);
    let cols = space.cardinality(child);
    let table = (0..rows).map(|_| random_distribution(rng, cols)).collect();
    Node {
        tag,
        table: DenseMatrix::from_rows(table).expect("rows share a length"),
    }
}

/// A full random transition network over the space.
pub fn random_network(rng: &mut StdRng, space: &FactorSpace) -> TransitionNetwork {
    let nodes = (0..space.len())
        .map(|child| random_node(rng, space, child))
        .collect();
    TransitionNetwork::new(space, nodes).expect("randomly generated rows are stochastic")
}

/// A random factored-action network: every variable gets a random action
/// tag, and one random stochastic table per joint assignment of it.
pub fn random_action_network(
    rng: &mut StdRng,
    space: &FactorSpace,
    actions: &FactorSpace,
) -> FactoredActionNetwork {
    let nodes = (0..space.len())
        .map(|variable| {
            let action_tag = random_tag(rng, actions);
            let tables = (0..actions.domain_size(&action_tag))
                .map(|_| {
                    let tag = random_tag(rng, space);
                    node_with_tag(rng, space, variable, tag)
                })
                .collect();
            ActionNode {
                action_tag,
                nodes: tables,
            }
        })
        .collect();
    FactoredActionNetwork::new(space, actions, nodes).expect("random tables are stochastic")
}

/// A basis function over a random non-empty scope, with values in [0, 10).
pub fn random_basis(rng: &mut StdRng, space: &FactorSpace) -> BasisFunction {
    let mut tag = random_tag(rng, space);
    if tag.is_empty() {
        tag = Tag::new(vec![rng.random_range(0..space.len())]).expect("single id is sorted");
    }
    let values = (0..space.domain_size(&tag))
        .map(|_| rng.random::<f64>() * 10.0)
        .collect();
    BasisFunction::new(space, tag, values).expect("values sized to the tag's domain")
}

/// Every full assignment of the space, in canonical order.
pub fn full_assignments(space: &FactorSpace) -> Vec<Vec<usize>> {
    let mut assignments = Vec::with_capacity(space.joint_size());
    let mut current = vec![0; space.len()];
    loop {
        assignments.push(current.clone());
        let mut variable = 0;
        loop {
            if variable == space.len() {
                return assignments;
            }
            current[variable] += 1;
            if current[variable] < space.cardinality(variable) {
                break;
            }
            current[variable] = 0;
            variable += 1;
        }
    }
}

fn random_distribution(rng: &mut StdRng, len: usize) -> Vec<f64> {
    let mut weights: Vec<f64> = (0..len).map(|_| rng.random::<f64>() + 1e-3).collect();
    let total: f64 = weights.iter().sum();
    weights.iter_mut().for_each(|w| *w /= total);
    weights
}
