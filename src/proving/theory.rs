//! The theory façade: an axiom set with a growing cache of proved theorems.

use crate::proving::goal::{Goal, System};
use crate::proving::tableau::conclude_contradiction;
use crate::syntax::formula::Formula;

use std::collections::BTreeSet;

/// A first-order theory: an immutable axiom set and a monotonically growing
/// cache of formulas already proved from it.
///
/// The cache is the only mutable state; a `Theory` is therefore not meant to
/// be shared while proving, but independent instances are independent.
#[derive(Clone, Debug)]
pub struct Theory {
    axioms: BTreeSet<Formula>,
    theorems: BTreeSet<Formula>,
}

impl Theory {
    /// Create a theory from its axioms. The theorem cache starts out as the
    /// axioms themselves.
    pub fn new(axioms: BTreeSet<Formula>) -> Theory {
        let theorems = axioms.clone();
        Theory { axioms, theorems }
    }

    /// Get the axioms of the theory.
    pub fn axioms(&self) -> &BTreeSet<Formula> {
        &self.axioms
    }

    /// Get every formula proved so far, including the axioms.
    pub fn theorems(&self) -> &BTreeSet<Formula> {
        &self.theorems
    }

    /// Check whether the formula has already been proved (or is an axiom).
    pub fn contains(&self, formula: &Formula) -> bool {
        self.theorems.contains(formula)
    }

    /// Decide whether the theory proves the given formula.
    ///
    /// A cached formula is proved immediately. Otherwise the simplified
    /// negation of the conjecture joins the current theorem set in a single
    /// goal, and the tableau engine searches for a refutation; on success the
    /// formula enters the cache, so later searches can build on it.
    pub fn draw(&mut self, formula: &Formula) -> bool {
        if self.contains(formula) {
            return true;
        }

        let mut goal: Goal = self.theorems.iter().cloned().collect();
        goal.insert(Formula::mk_negation(formula.clone()).simplify());

        let mut system = System::new();
        system.insert(goal);

        if conclude_contradiction(&system) {
            self.theorems.insert(formula.clone());
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use crate::proving::theory::Theory;
    use crate::syntax::formula::Formula;
    use crate::syntax::symbol::{fresh_constant, fresh_relation};
    use crate::syntax::term::Term;
    use std::collections::BTreeSet;

    #[test]
    /// Test that an axiom is proved from the cache without any search.
    fn axiom_is_cached() {
        let p = Formula::mk_relation(fresh_relation(0), vec![]).unwrap();
        let mut theory = Theory::new(BTreeSet::from([p.clone()]));

        assert!(theory.contains(&p));
        assert!(theory.draw(&p));
    }

    #[test]
    /// Test that a proved formula enters the cache and the theorem set grows
    /// monotonically.
    fn cache_grows_monotonically() {
        let r = fresh_relation(1);
        let c = Term::mk_constant(fresh_constant()).unwrap();
        let atom = Formula::mk_relation(r, vec![c]).unwrap();
        let tautology = Formula::mk_disjunction(vec![
            atom.clone(),
            Formula::mk_negation(atom.clone()),
        ]);

        let mut theory = Theory::new(BTreeSet::new());
        let before = theory.theorems().len();
        assert!(!theory.contains(&tautology));
        assert!(theory.draw(&tautology));
        assert!(theory.contains(&tautology));
        assert_eq!(theory.theorems().len(), before + 1);

        // a second draw is answered from the cache
        assert!(theory.draw(&tautology));
    }

    #[test]
    /// Test that an unprovable formula is rejected and not cached.
    fn unprovable_formula_rejected() {
        let p = Formula::mk_relation(fresh_relation(0), vec![]).unwrap();
        let q = Formula::mk_relation(fresh_relation(0), vec![]).unwrap();

        let mut theory = Theory::new(BTreeSet::from([p]));
        assert!(!theory.draw(&q));
        assert!(!theory.contains(&q));
    }
}
