//! Robinson unification over term pairs with occurs check.

use crate::syntax::substitution::Substitution;
use crate::syntax::symbol::SymbolKind;
use crate::syntax::term::Term;

/// Try to unify every pair in the given work list simultaneously.
///
/// Returns the accumulated most general unifier, or `None` when some pair is
/// not unifiable (clashing root symbols, or a variable occurring inside the
/// term it should be bound to).
///
/// Whenever a binding `x -> t` is produced it is applied both to the range of
/// the accumulated substitution and to the remaining work list, so a returned
/// substitution really maps both sides of every input pair to the same term.
pub fn unify_pairs(mut conditions: Vec<(Term, Term)>) -> Option<Substitution> {
    let mut result = Substitution::empty();

    while let Some((u, v)) = conditions.pop() {
        if u == v {
            continue;
        }

        // orient a variable to the left if either side is one
        let (variable, term) = if let Some(x) = u.as_variable() {
            (x, v)
        } else if let Some(x) = v.as_variable() {
            (x, u)
        } else {
            // two constants, or distinct root symbols, cannot unify
            if u.kind() == SymbolKind::Constant
                || v.kind() == SymbolKind::Constant
                || u.symbol() != v.symbol()
            {
                return None;
            }
            // same operation symbol, push the argument pairs
            for (left, right) in u.args().iter().zip(v.args()) {
                conditions.push((left.clone(), right.clone()));
            }
            continue;
        };

        // occurs check
        if term.is_free_variable(&variable) {
            return None;
        }

        let binding = Substitution::single(variable, term);
        for pair in conditions.iter_mut() {
            let rewritten = (pair.0.substitute(&binding), pair.1.substitute(&binding));
            *pair = rewritten;
        }
        result = binding.compose(&result);
    }

    Some(result)
}

/// Try to unify a single pair of terms.
pub fn unify(u: &Term, v: &Term) -> Option<Substitution> {
    unify_pairs(vec![(u.clone(), v.clone())])
}
