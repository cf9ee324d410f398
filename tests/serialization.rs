//! Serde round-trips for the model types, and rejection of documents that
//! break their invariants.
//!
//! Networks and basis functions are plain value objects; serializing and
//! deserializing one must give back a structurally identical model that
//! answers every query identically. Deserialization is also a construction
//! path, so it must refuse the same malformed inputs the constructors
//! refuse: tables whose rows are not probability distributions must not be
//! able to enter through a document and then return plausible-looking wrong
//! probabilities.

mod common;

use common::{
    full_assignments, random_action_network, random_basis, random_network, random_space,
};
use factored_dbn::{
    BasisMatrix, CompactNetwork, DiffNode, FactoredActionNetwork, TransitionModel,
    TransitionNetwork, back_project_action,
};
use rand::{SeedableRng, rngs::StdRng};

#[test]
fn transition_network_round_trips_through_json() {
    let mut rng = StdRng::seed_from_u64(59);
    let space = random_space(&mut rng, 4, 3);
    let network = random_network(&mut rng, &space);

    let json = serde_json::to_string(&network).expect("network serializes");
    let restored: TransitionNetwork = serde_json::from_str(&json).expect("network deserializes");

    assert_eq!(network, restored);
    for s in full_assignments(&space).iter().take(8) {
        for s1 in full_assignments(&space).iter().take(8) {
            assert_eq!(
                network.transition_probability(&space, s, s1),
                restored.transition_probability(&space, s, s1),
            );
        }
    }
}

#[test]
fn basis_function_round_trips_through_json() {
    let mut rng = StdRng::seed_from_u64(61);
    let space = random_space(&mut rng, 4, 3);
    let basis = random_basis(&mut rng, &space);

    let json = serde_json::to_string(&basis).expect("basis serializes");
    let restored = serde_json::from_str(&json).expect("basis deserializes");
    assert_eq!(basis, restored);
}

#[test]
fn compact_network_round_trips_through_json() {
    let mut rng = StdRng::seed_from_u64(67);
    let space = random_space(&mut rng, 3, 3);
    let default = random_network(&mut rng, &space);
    let diffs = vec![
        vec![],
        vec![DiffNode {
            id: 1,
            node: default[1].clone(),
        }],
    ];
    let compact = CompactNetwork::new(&space, diffs, default).unwrap();

    let json = serde_json::to_string(&compact).expect("compact network serializes");
    let restored: CompactNetwork = serde_json::from_str(&json).expect("compact deserializes");
    assert_eq!(compact, restored);
}

#[test]
fn factored_action_network_round_trips_through_json() {
    let mut rng = StdRng::seed_from_u64(71);
    let space = random_space(&mut rng, 3, 3);
    let actions = random_space(&mut rng, 2, 3);
    let network = random_action_network(&mut rng, &space, &actions);

    let json = serde_json::to_string(&network).expect("factored-action network serializes");
    let restored: FactoredActionNetwork =
        serde_json::from_str(&json).expect("factored-action network deserializes");

    assert_eq!(network, restored);
    restored
        .validate(&space, &actions)
        .expect("a round-tripped network still satisfies every invariant");
    for s in full_assignments(&space).iter().take(4) {
        for a in full_assignments(&actions).iter().take(4) {
            for s1 in full_assignments(&space).iter().take(4) {
                assert_eq!(
                    network.transition_probability(&space, &actions, s, a, s1),
                    restored.transition_probability(&space, &actions, s, a, s1),
                );
            }
        }
    }
}

#[test]
fn basis_matrix_round_trips_through_json() {
    let mut rng = StdRng::seed_from_u64(73);
    let space = random_space(&mut rng, 3, 2);
    let actions = random_space(&mut rng, 2, 2);
    let network = random_action_network(&mut rng, &space, &actions);
    let basis = random_basis(&mut rng, &space);
    let matrix = back_project_action(&space, &actions, &network, &basis);

    let json = serde_json::to_string(&matrix).expect("basis matrix serializes");
    let restored: BasisMatrix = serde_json::from_str(&json).expect("basis matrix deserializes");
    assert_eq!(matrix, restored);
}

#[test]
fn deserialization_rejects_non_stochastic_rows() {
    // A table row summing to 5 must be refused at the door, exactly as the
    // validating constructor would refuse it.
    let json = r#"{"nodes":[{"tag":[],"table":{"rows":1,"cols":2,"data":[4.0,1.0]}}]}"#;
    let result: Result<TransitionNetwork, _> = serde_json::from_str(json);
    assert!(
        result.is_err(),
        "a non-stochastic table must not deserialize into a network"
    );

    let negative = r#"{"nodes":[{"tag":[],"table":{"rows":1,"cols":2,"data":[1.5,-0.5]}}]}"#;
    let result: Result<TransitionNetwork, _> = serde_json::from_str(negative);
    assert!(
        result.is_err(),
        "a negative probability must not deserialize into a network"
    );
}

#[test]
fn deserialization_rejects_malformed_scopes_and_shapes() {
    // Data length disagreeing with the declared matrix shape.
    let bad_shape = r#"{"nodes":[{"tag":[],"table":{"rows":2,"cols":2,"data":[1.0,0.0]}}]}"#;
    let result: Result<TransitionNetwork, _> = serde_json::from_str(bad_shape);
    assert!(result.is_err(), "shape/data mismatch must be rejected");

    // An unsorted parent scope.
    let bad_tag =
        r#"{"nodes":[{"tag":[1,0],"table":{"rows":4,"cols":2,"data":[1.0,0.0,1.0,0.0,1.0,0.0,1.0,0.0]}}]}"#;
    let result: Result<TransitionNetwork, _> = serde_json::from_str(bad_tag);
    assert!(result.is_err(), "an unsorted tag must be rejected");
}

#[test]
fn deserialization_rejects_tampered_compact_and_action_networks() {
    let mut rng = StdRng::seed_from_u64(79);
    let space = random_space(&mut rng, 3, 2);
    let actions = random_space(&mut rng, 2, 2);

    // An override pointing beyond the default network.
    let default = random_network(&mut rng, &space);
    let compact = CompactNetwork::new(
        &space,
        vec![vec![DiffNode {
            id: 1,
            node: default[1].clone(),
        }]],
        default,
    )
    .unwrap();
    let tampered = serde_json::to_string(&compact)
        .expect("compact network serializes")
        .replace(r#""id":1"#, r#""id":9"#);
    let result: Result<CompactNetwork, _> = serde_json::from_str(&tampered);
    assert!(
        result.is_err(),
        "an out-of-range override id must be rejected"
    );

    // A factored-action table whose rows were corrupted in transit.
    let network = random_action_network(&mut rng, &space, &actions);
    let json = serde_json::to_string(&network).expect("factored-action network serializes");
    let corrupted = json.replacen("0.", "7.", 1);
    let result: Result<FactoredActionNetwork, _> = serde_json::from_str(&corrupted);
    assert!(
        result.is_err(),
        "a corrupted probability entry must be rejected"
    );
}
