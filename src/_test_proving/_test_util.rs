use crate::preprocessing::dictionary::Dictionary;
use crate::preprocessing::parser::parse_fol_formula;
use crate::proving::theory::Theory;
use crate::syntax::formula::Formula;

use std::collections::BTreeSet;

/// Parse a formula, panicking on syntax errors (tests use valid syntax).
pub fn parse(formula: &str, dictionary: &mut Dictionary) -> Formula {
    parse_fol_formula(formula, dictionary).unwrap()
}

/// Build a theory from axiom strings, resolving all symbols through the
/// given dictionary so that conjectures can share them.
pub fn theory_from(axioms: &[&str], dictionary: &mut Dictionary) -> Theory {
    let mut axiom_set = BTreeSet::new();
    for axiom in axioms {
        axiom_set.insert(parse(axiom, dictionary));
    }
    Theory::new(axiom_set)
}
