//! Shared test fixtures for the cpf-repository workspace.
//!
//! A dev-dependency only, never published.
//!
//! - [`solution`]: [`TestSolution`] builder for a solution directory with
//!   plugin system folders and repository content

pub mod solution;

pub use solution::TestSolution;
