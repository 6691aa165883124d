use crate::_test_proving::_test_util::{parse, theory_from};
use crate::preprocessing::dictionary::Dictionary;

/// Run a batch of <conjecture, expected verdict> pairs against one theory.
fn compare_verdicts_with_expected(
    axioms: &[&str],
    test_tuples: Vec<(&str, bool)>,
) {
    let mut dictionary = Dictionary::new();
    let mut theory = theory_from(axioms, &mut dictionary);

    for (conjecture, expected) in test_tuples {
        let formula = parse(conjecture, &mut dictionary);
        assert_eq!(
            theory.draw(&formula),
            expected,
            "unexpected verdict for {conjecture}"
        );
    }
}

#[test]
/// Test that the excluded middle is proved from no axioms at all.
fn scenario_excluded_middle() {
    compare_verdicts_with_expected(&[], vec![("r_p(c_c) or not r_p(c_c)", true)]);
}

#[test]
/// Test that an axiom is answered from the cache without any search.
fn scenario_axiom_from_cache() {
    let mut dictionary = Dictionary::new();
    let mut theory = theory_from(&["r_p(c_c)"], &mut dictionary);

    let conjecture = parse("r_p(c_c)", &mut dictionary);
    // already cached before any drawing happened
    assert!(theory.contains(&conjecture));
    assert!(theory.draw(&conjecture));
}

#[test]
/// Test modus ponens through a universally quantified implication.
fn scenario_modus_ponens() {
    compare_verdicts_with_expected(
        &["forall (v_x) (r_p(v_x) imp r_q(v_x))", "r_p(c_a)"],
        vec![("r_q(c_a)", true)],
    );
}

#[test]
/// Test that equality chains close through equivalence classes.
fn scenario_equality_transitivity() {
    compare_verdicts_with_expected(
        &["c_a = c_b", "c_b = c_c"],
        vec![("c_a = c_c", true), ("c_a = c_d", false)],
    );
}

#[test]
/// Test structural disequality propagation from an operation disequality to
/// its arguments.
fn scenario_structural_disequality() {
    compare_verdicts_with_expected(
        &["f_f(c_a) neq f_f(c_b)"],
        vec![("c_a neq c_b", true)],
    );
}

#[test]
/// Test that an unrelated fact is not derivable and the search terminates.
fn scenario_unrelated_fact() {
    compare_verdicts_with_expected(&["r_p(c_c)"], vec![("r_q(c_c)", false)]);
}

#[test]
/// Test that the simplifier normalizes a negated conjunction the same way as
/// the directly written disjunction.
fn scenario_simplifier_normal_form() {
    let mut dictionary = Dictionary::new();
    let negated = parse("not (r_a and not r_b)", &mut dictionary);
    let disjunction = parse("not r_a or r_b", &mut dictionary);
    assert_eq!(negated.simplify(), disjunction.simplify());
}

#[test]
/// Test the remaining tautology spot checks of the supported calculus.
fn scenario_tautologies() {
    compare_verdicts_with_expected(
        &[],
        vec![
            ("r_a and r_b imp r_a", true),
            ("(forall (v_x) r_p(v_x)) imp r_p(c_c)", true),
            ("c_a = c_b imp c_b = c_a", true),
            ("c_a = c_b and c_b = c_c imp c_a = c_c", true),
        ],
    );
}

#[test]
/// Test that non-tautologies are rejected on an empty axiom set.
fn scenario_non_tautologies() {
    compare_verdicts_with_expected(
        &[],
        vec![
            ("r_p(c_c)", false),
            ("r_a imp r_b", false),
            ("c_a = c_b", false),
        ],
    );
}

#[test]
/// Test a proof requiring both a quantifier instantiation and equality
/// reasoning at once.
fn scenario_quantifier_with_equality() {
    compare_verdicts_with_expected(
        &["forall (v_x) v_x = c_e"],
        vec![("c_a = c_e", true)],
    );
}

#[test]
/// Test drawing an existential conclusion from a concrete witness.
fn scenario_existential_witness() {
    compare_verdicts_with_expected(
        &["r_p(c_a)"],
        vec![("exists (v_x) r_p(v_x)", true)],
    );
}
