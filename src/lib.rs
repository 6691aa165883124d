//! A small library for first-order logic theorem proving through analytic
//! tableaux. As of now, the library supports:
//!  - An immutable, structurally shared algebra of symbols, terms and
//!    formulas, with capture-avoiding substitution and cached free-variable
//!    sets.
//!  - A deterministic formula simplifier applying a fixed rewrite system.
//!  - Robinson unification with occurs check.
//!  - A tableau refutation engine over systems of goals, with uniform
//!    notation expansions, structural disequality propagation and an
//!    equality/inequality congruence layer.
//!  - Theories with a growing theorem cache answering entailment queries.
//!  - A reader and a pretty-printer for a small textual formula syntax, with
//!    a scope-stacked symbol dictionary.

pub mod analysis;
pub mod errors;
pub mod load_inputs;
pub mod preprocessing;
pub mod printing;
pub mod proving;
pub mod result_print;
pub mod syntax;

/// **(internal)** Several complex end-to-end scenarios for the proving
/// procedure.
#[cfg(test)]
mod _test_proving;
