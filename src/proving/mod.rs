//! Components regarding the tableau proof search, including the main
//! refutation algorithm.

pub mod goal;
pub mod tableau;
pub mod theory;
pub mod unification;
pub mod uniform;
