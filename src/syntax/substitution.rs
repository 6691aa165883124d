//! Finite mappings from variables to terms.

use crate::syntax::symbol::Variable;
use crate::syntax::term::Term;

use std::collections::BTreeMap;

/// A finite mapping from variables to terms.
///
/// Variables outside the domain are mapped to themselves. Application to
/// terms is homomorphic ([Term::substitute]); application to formulas is
/// capture-avoiding ([crate::syntax::formula::Formula::substitute]).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Substitution {
    data: BTreeMap<Variable, Term>,
}

impl Substitution {
    /// Create a substitution from an explicit variable-to-term mapping.
    pub fn new(data: BTreeMap<Variable, Term>) -> Substitution {
        Substitution { data }
    }

    /// Create an empty (identity) substitution.
    pub fn empty() -> Substitution {
        Substitution::default()
    }

    /// Create a substitution mapping a single variable to a term.
    pub fn single(variable: Variable, term: Term) -> Substitution {
        Substitution {
            data: BTreeMap::from([(variable, term)]),
        }
    }

    /// Get the underlying mapping.
    pub fn data(&self) -> &BTreeMap<Variable, Term> {
        &self.data
    }

    /// Check whether the domain of this substitution is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the image of a variable: the mapped term if the variable is in the
    /// domain, the variable itself otherwise.
    pub fn value_of(&self, variable: &Variable) -> Term {
        match self.data.get(variable) {
            Some(term) => term.clone(),
            None => Term::mk_variable(*variable),
        }
    }

    /// Compose this substitution with `other`: apply `self` to every term in
    /// the range of `other`, then extend with the bindings of `self` whose
    /// variables are not in the domain of `other`.
    ///
    /// The result maps `x` to `self(other(x))` for every `x` bound by either
    /// side, which is the composition the unification loop folds bindings
    /// with.
    pub fn compose(&self, other: &Substitution) -> Substitution {
        let mut data = BTreeMap::new();
        for (variable, term) in &other.data {
            data.insert(*variable, term.substitute(self));
        }
        for (variable, term) in &self.data {
            if !other.data.contains_key(variable) {
                data.insert(*variable, term.clone());
            }
        }
        Substitution { data }
    }
}

#[cfg(test)]
mod tests {
    use crate::syntax::substitution::Substitution;
    use crate::syntax::symbol::{fresh_constant, fresh_operation, Variable};
    use crate::syntax::term::Term;

    #[test]
    /// Test the identity behavior outside the domain.
    fn identity_outside_domain() {
        let x = Variable::fresh();
        let y = Variable::fresh();
        let c = Term::mk_constant(fresh_constant()).unwrap();

        let substitution = Substitution::single(x, c.clone());
        assert_eq!(substitution.value_of(&x), c);
        assert_eq!(substitution.value_of(&y), Term::mk_variable(y));
    }

    #[test]
    /// Test that composition applies the left substitution to the range of
    /// the right one and keeps non-overlapping bindings.
    fn composition() {
        let f = fresh_operation(1);
        let x = Variable::fresh();
        let y = Variable::fresh();
        let z = Variable::fresh();
        let c = Term::mk_constant(fresh_constant()).unwrap();

        // right maps x to f(y), left maps y to c and z to c
        let right = Substitution::single(x, Term::mk_operation(f, vec![Term::mk_variable(y)]).unwrap());
        let left = Substitution::new(
            [(y, c.clone()), (z, c.clone())].into_iter().collect(),
        );

        let composed = left.compose(&right);
        let expected_x = Term::mk_operation(f, vec![c.clone()]).unwrap();
        assert_eq!(composed.value_of(&x), expected_x);
        assert_eq!(composed.value_of(&y), c);
        assert_eq!(composed.value_of(&z), c);
    }
}
