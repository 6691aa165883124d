use crate::_test_proving::_test_util::{parse, theory_from};
use crate::preprocessing::dictionary::Dictionary;
use crate::proving::theory::Theory;
use crate::syntax::formula::{Formula, FormulaNode};
use crate::syntax::substitution::Substitution;
use crate::syntax::symbol::{fresh_relation, Symbol, Variable};
use crate::syntax::term::Term;

use std::collections::{BTreeMap, BTreeSet};

/// Evaluate a propositional formula over nullary relation atoms under the
/// given truth assignment. Implication chains are read transitively and an
/// equivalence holds when all members agree, matching the semantics the
/// simplifier and the classifier use.
fn evaluate(formula: &Formula, assignment: &BTreeMap<Symbol, bool>) -> bool {
    match formula.node() {
        FormulaNode::False => false,
        FormulaNode::True => true,
        FormulaNode::Relation(symbol, _) => assignment[symbol],
        FormulaNode::Negation(inner) => !evaluate(inner, assignment),
        FormulaNode::Conjunction(formulas) => {
            formulas.iter().all(|f| evaluate(f, assignment))
        }
        FormulaNode::Disjunction(formulas) => {
            formulas.iter().any(|f| evaluate(f, assignment))
        }
        FormulaNode::Implication(formulas) => formulas
            .windows(2)
            .all(|pair| !evaluate(&pair[0], assignment) || evaluate(&pair[1], assignment)),
        FormulaNode::Equivalence(formulas) => {
            let values: Vec<bool> = formulas.iter().map(|f| evaluate(f, assignment)).collect();
            values.windows(2).all(|pair| pair[0] == pair[1])
        }
        _ => panic!("quantified formula in a propositional evaluation"),
    }
}

/// Check propositional validity by enumerating all truth assignments of the
/// given atoms.
fn is_valid(formula: &Formula, atom_symbols: &[Symbol]) -> bool {
    for valuation in 0..(1u32 << atom_symbols.len()) {
        let assignment: BTreeMap<Symbol, bool> = atom_symbols
            .iter()
            .enumerate()
            .map(|(i, symbol)| (*symbol, ((valuation >> i) & 1) == 1))
            .collect();
        if !evaluate(formula, &assignment) {
            return false;
        }
    }
    true
}

#[test]
/// Test that, over the empty axiom set, `draw` agrees with truth-table
/// validity on random propositional formulas.
fn draw_decides_propositional_validity() {
    let atom_symbols = vec![fresh_relation(0), fresh_relation(0), fresh_relation(0)];
    let mut atoms: Vec<Formula> = atom_symbols
        .iter()
        .map(|symbol| Formula::mk_relation(*symbol, vec![]).unwrap())
        .collect();
    atoms.push(Formula::mk_true());
    atoms.push(Formula::mk_false());

    for seed in 0..60 {
        let formula = Formula::new_random_boolean(3, &atoms, seed);
        let valid = is_valid(&formula, &atom_symbols);

        let mut theory = Theory::new(BTreeSet::new());
        assert_eq!(
            theory.draw(&formula),
            valid,
            "verdict disagrees with the truth table for seed {seed}: {formula}"
        );
    }
}

#[test]
/// Test the free-variable witness property on parsed formulas: substituting
/// a fresh constant for a variable changes the formula exactly when the
/// variable is free.
fn free_variable_substitution_witness() {
    let mut dictionary = Dictionary::new();
    let formula = parse("forall (v_x) r_r(v_x, v_y)", &mut dictionary);

    let y = Variable::try_from(dictionary.lookup_by_name("v_y").unwrap()).unwrap();
    assert!(formula.is_free_variable(&y));

    let witness = parse("c_w = c_w", &mut dictionary);
    let c = witness.terms()[0].clone();

    let changed = formula.substitute(&Substitution::single(y, c.clone()));
    assert_ne!(formula, changed);
    assert!(!changed.is_free_variable(&y));

    // the bound variable is not free, so substituting it changes nothing
    let x_binder = formula.variables()[0];
    let unchanged = formula.substitute(&Substitution::single(x_binder, c));
    assert_eq!(formula, unchanged);
}

#[test]
/// Test that no substituted variable gets captured: after substituting a
/// term containing the binder's name-sake, the binder is renamed apart.
fn substitution_capture_avoidance_end_to_end() {
    let mut dictionary = Dictionary::new();
    let formula = parse("forall (v_x) (r_p(v_x) imp r_q(v_y))", &mut dictionary);

    let x = formula.variables()[0];
    let y = Variable::try_from(dictionary.lookup_by_name("v_y").unwrap()).unwrap();

    let substituted = formula.substitute(&Substitution::single(y, Term::mk_variable(x)));
    // x is now free in the substituted formula, so the binder was renamed
    assert!(substituted.is_free_variable(&x));
    assert_ne!(substituted.variables()[0], x);
}

#[test]
/// Test that the theorem cache grows monotonically across several draws and
/// answers repeated queries.
fn theorem_cache_monotonicity() {
    let mut dictionary = Dictionary::new();
    let mut theory = theory_from(&["c_a = c_b", "c_b = c_c"], &mut dictionary);

    let mut sizes = vec![theory.theorems().len()];
    for conjecture in ["c_a = c_c", "c_b = c_a", "c_a = c_a"] {
        let formula = parse(conjecture, &mut dictionary);
        assert!(theory.draw(&formula));
        assert!(theory.contains(&formula));
        sizes.push(theory.theorems().len());
    }
    assert!(sizes.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
/// Test that simplification does not change a verdict on the scenario
/// formulas.
fn simplified_conjectures_agree() {
    let mut dictionary = Dictionary::new();
    let mut theory = theory_from(
        &["forall (v_x) (r_p(v_x) imp r_q(v_x))", "r_p(c_a)"],
        &mut dictionary,
    );

    for (conjecture, expected) in [("r_q(c_a)", true), ("r_q(c_b)", false)] {
        let formula = parse(conjecture, &mut dictionary);
        let mut fresh_theory = theory.clone();
        assert_eq!(theory.draw(&formula), expected);
        assert_eq!(fresh_theory.draw(&formula.simplify()), expected);
    }
}
