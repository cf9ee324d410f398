//! Factored stochastic transition models and back-projection
//!
//! This crate is the computational core of factored-MDP planning: it
//! represents a transition model over a state described by independent
//! variables ("factors") as one conditional table per variable, and
//! propagates scope-restricted value functions backward through that model
//! without ever materializing the joint state space.
//!
//! It provides:
//! - Factor spaces, scopes (tags), and canonical partial-assignment
//!   enumeration
//! - Owning and borrowing dynamic transition networks with exact
//!   probability queries
//! - Compact per-action networks (default model plus sparse overrides)
//! - Factored-action networks, where each state variable reacts to its own
//!   subset of action variables
//! - The back-projection family: scalar basis functions, additive factored
//!   sums, and their action-augmented matrix counterparts
//!
//! Everything is immutable after construction, pure, and single-threaded;
//! all tables are validated as stochastic matrices when a network is built.

pub mod backprojection;
pub mod basis;
pub mod compact;
pub mod error;
pub mod factored_action;
pub mod matrix;
pub mod network;
pub mod space;

pub use backprojection::{
    back_project, back_project_action, back_project_action_sum, back_project_sum,
};
pub use basis::{BasisFunction, BasisMatrix, FactoredMatrix, FactoredVector};
pub use compact::{CompactNetwork, DiffNode};
pub use error::{Error, Result};
pub use factored_action::{ActionNode, FactoredActionNetwork};
pub use matrix::DenseMatrix;
pub use network::{Node, ROW_SUM_TOLERANCE, TransitionModel, TransitionNetwork, TransitionNetworkRef};
pub use space::{
    DomainIterator, FactorSpace, PartialAssignment, PartialAssignmentRef, Tag, linear_index_full,
    linear_index_partial,
};
