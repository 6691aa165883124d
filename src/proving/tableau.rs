//! The tableau refutation engine.
//!
//! The engine drives a [System] of [Goal]s to closure: literal reduction and
//! alpha/gamma/delta expansions rewrite goals in place, beta expansions split
//! a goal into siblings, structural disequality propagation derives argument
//! disequalities, and an equivalence-class analysis over the equality atoms
//! witnesses equality/inequality contradictions. Remaining goals are attacked
//! by unifying terms a disequality forbids from being equal and recursing on
//! the substituted residual system.

use crate::proving::goal::{remove_supergoals, Goal, System};
use crate::proving::unification::{unify, unify_pairs};
use crate::proving::uniform::{uniform_expansion, UniformClass, UniformExpansion};
use crate::syntax::formula::{Formula, FormulaNode};
use crate::syntax::substitution::Substitution;
use crate::syntax::symbol::{fresh_constant, SymbolKind, Variable};
use crate::syntax::term::Term;

use std::collections::{BTreeMap, BTreeSet};

/// Perform one literal-reduction step anywhere in the system: a goal holding
/// `false` is closed and removed, a `true` member is dropped, and a reducible
/// literal (double negation, negated unit, negated binary equality) is
/// replaced by its reduced form. Returns whether a rewrite happened.
fn try_literal(goals: &mut System) -> bool {
    let mut close: Option<Goal> = None;
    let mut rewrite: Option<(Goal, Formula, Formula)> = None;

    'scan: for goal in goals.iter() {
        for formula in goal.iter() {
            let expansion = uniform_expansion(formula);
            if expansion.class != UniformClass::Literal {
                continue;
            }
            let reduced = &expansion.children[0];
            if reduced.kind() == SymbolKind::False {
                close = Some(goal.clone());
                break 'scan;
            }
            if reduced.kind() == SymbolKind::True || reduced != formula {
                rewrite = Some((goal.clone(), formula.clone(), reduced.clone()));
                break 'scan;
            }
        }
    }

    if let Some(goal) = close {
        goals.remove(&goal);
        return true;
    }
    if let Some((goal, original, reduced)) = rewrite {
        let mut rewritten = goal.clone();
        rewritten.remove(&original);
        if reduced.kind() != SymbolKind::True {
            rewritten.insert(reduced);
        }
        goals.remove(&goal);
        goals.insert(rewritten);
        return true;
    }
    false
}

/// Perform one non-branching expansion step anywhere in the system: an alpha
/// formula is replaced by its children, a gamma formula by its body with
/// every bound variable mapped to a fresh variable, and a delta formula by
/// its body with every bound variable mapped to a fresh Skolem constant.
fn try_alpha_gamma_delta(goals: &mut System) -> bool {
    let mut action: Option<(Goal, Formula, UniformExpansion)> = None;

    'scan: for goal in goals.iter() {
        for formula in goal.iter() {
            let expansion = uniform_expansion(formula);
            if matches!(
                expansion.class,
                UniformClass::Alpha | UniformClass::Gamma | UniformClass::Delta
            ) {
                action = Some((goal.clone(), formula.clone(), expansion));
                break 'scan;
            }
        }
    }

    let Some((goal, formula, expansion)) = action else {
        return false;
    };
    let mut rewritten = goal.clone();
    rewritten.remove(&formula);
    match expansion.class {
        UniformClass::Alpha => {
            for child in expansion.children {
                rewritten.insert(child);
            }
        }
        UniformClass::Gamma => {
            let instantiation: BTreeMap<_, _> = expansion
                .bound
                .iter()
                .map(|variable| (*variable, Term::mk_variable(Variable::fresh())))
                .collect();
            rewritten.insert(
                expansion.children[0].substitute(&Substitution::new(instantiation)),
            );
        }
        UniformClass::Delta => {
            let instantiation: BTreeMap<_, _> = expansion
                .bound
                .iter()
                .map(|variable| {
                    (*variable, Term::mk_constant(fresh_constant()).unwrap())
                })
                .collect();
            rewritten.insert(
                expansion.children[0].substitute(&Substitution::new(instantiation)),
            );
        }
        _ => unreachable!(), // only alpha/gamma/delta actions are collected
    }
    goals.remove(&goal);
    goals.insert(rewritten);
    true
}

/// Perform one branching expansion step: the first beta formula found is
/// removed from its goal and every child spawns a sibling goal holding the
/// residual plus that child.
fn try_beta(goals: &mut System) -> bool {
    let mut action: Option<(Goal, Formula, Vec<Formula>)> = None;

    'scan: for goal in goals.iter() {
        for formula in goal.iter() {
            let expansion = uniform_expansion(formula);
            if expansion.class == UniformClass::Beta {
                action = Some((goal.clone(), formula.clone(), expansion.children));
                break 'scan;
            }
        }
    }

    let Some((goal, formula, children)) = action else {
        return false;
    };
    let mut residual = goal.clone();
    residual.remove(&formula);
    goals.remove(&goal);
    for child in children {
        let mut sibling = residual.clone();
        sibling.insert(child);
        goals.insert(sibling);
    }
    true
}

/// Drive every goal of the system to literal-only form. Literal reductions
/// are preferred, then non-branching expansions, and beta splits only happen
/// once nothing else applies; each step performs one rewrite and the loop
/// repeats until quiescent.
pub fn system_to_literals(goals: &mut System) {
    while !goals.is_empty() {
        if try_literal(goals) {
            continue;
        }
        if try_alpha_gamma_delta(goals) {
            continue;
        }
        if try_beta(goals) {
            continue;
        }
        break;
    }
}

/// Check whether some disequality atom of the goal mentions both terms (at
/// two different positions), i.e. already asserts them distinct.
pub fn contains_inequality(goal: &Goal, t1: &Term, t2: &Term) -> bool {
    for formula in goal.iter() {
        if let FormulaNode::Disequality(terms) = formula.node() {
            let mut found1 = false;
            let mut found2 = false;
            for term in terms {
                if !found1 && term == t1 {
                    if found2 {
                        return true;
                    }
                    found1 = true;
                } else if !found2 && term == t2 {
                    if found1 {
                        return true;
                    }
                    found2 = true;
                }
            }
        }
    }
    false
}

/// Expand one structural disequality consequence of the goal.
///
/// Returns `None` when no rule applies, and otherwise the set of goals that
/// replaces this goal in the system:
/// - a disequality listing the same term twice closes the goal (empty set);
/// - two applications of the same operation asserted distinct spawn one
///   sibling goal per argument position, each adding that argument pair's
///   disequality;
/// - a negated relation atom together with a positive atom of the same
///   relation closes the goal when they are identical, and otherwise spawns
///   the per-position sibling goals in the same way.
fn produce_goal_inequalities(goal: &Goal) -> Option<BTreeSet<Goal>> {
    for formula in goal.iter() {
        match formula.node() {
            FormulaNode::Disequality(terms) => {
                let unique: BTreeSet<Term> = terms.iter().cloned().collect();
                if unique.len() < terms.len() {
                    // some term is asserted distinct from itself
                    return Some(BTreeSet::new());
                }
                let unique: Vec<&Term> = unique.iter().collect();
                for (position, t1) in unique.iter().enumerate() {
                    if t1.kind() != SymbolKind::Operation {
                        continue;
                    }
                    for t2 in unique.iter().skip(position + 1) {
                        if t2.symbol() != t1.symbol() {
                            continue;
                        }
                        let arity = t1.args().len();
                        let implied = (0..arity).any(|l| {
                            contains_inequality(goal, &t1.args()[l], &t2.args()[l])
                        });
                        if implied {
                            continue;
                        }
                        let mut result = BTreeSet::new();
                        for l in 0..arity {
                            let mut sibling = goal.clone();
                            sibling.insert(Formula::mk_disequality(vec![
                                t1.args()[l].clone(),
                                t2.args()[l].clone(),
                            ]));
                            result.insert(sibling);
                        }
                        return Some(result);
                    }
                }
            }
            FormulaNode::Negation(negated) => {
                let FormulaNode::Relation(symbol, negated_terms) = negated.node() else {
                    continue;
                };
                for candidate in goal.iter() {
                    let FormulaNode::Relation(candidate_symbol, candidate_terms) =
                        candidate.node()
                    else {
                        continue;
                    };
                    if candidate_symbol != symbol {
                        continue;
                    }
                    if candidate == negated {
                        // R and not R on identical arguments
                        return Some(BTreeSet::new());
                    }
                    let implied = negated_terms
                        .iter()
                        .zip(candidate_terms)
                        .any(|(t1, t2)| contains_inequality(goal, t1, t2));
                    if implied {
                        continue;
                    }
                    let mut result = BTreeSet::new();
                    for (t1, t2) in negated_terms.iter().zip(candidate_terms) {
                        let mut sibling = goal.clone();
                        sibling.insert(Formula::mk_disequality(vec![t1.clone(), t2.clone()]));
                        result.insert(sibling);
                    }
                    return Some(result);
                }
            }
            _ => {}
        }
    }
    None
}

/// Expand structural disequality consequences across the whole system until
/// quiescent, pruning subsumed goals after every step.
pub fn produce_inequalities(goals: &mut System) {
    loop {
        let mut fired: Option<(Goal, BTreeSet<Goal>)> = None;
        for goal in goals.iter() {
            if let Some(replacement) = produce_goal_inequalities(goal) {
                fired = Some((goal.clone(), replacement));
                break;
            }
        }
        let Some((goal, replacement)) = fired else {
            break;
        };
        goals.remove(&goal);
        for sibling in replacement {
            goals.insert(sibling);
        }
        remove_supergoals(goals);
    }
}

/// Partition every term mentioned by an equality or disequality atom of the
/// goal into equivalence classes: each equality merges the classes of all its
/// terms, and disequality terms are seeded as singletons when absent.
///
/// The witness is purely syntactic; congruence under operation symbols is
/// only propagated through the structural disequality rule of
/// [produce_inequalities].
pub fn equivalence_classes(goal: &Goal) -> Vec<BTreeSet<Term>> {
    let mut classes: Vec<BTreeSet<Term>> = Vec::new();
    for formula in goal.iter() {
        match formula.node() {
            FormulaNode::Equality(terms) => {
                let mut merged: BTreeSet<Term> = terms.iter().cloned().collect();
                let mut kept = Vec::new();
                for class in classes {
                    if class.iter().any(|term| merged.contains(term)) {
                        merged.extend(class);
                    } else {
                        kept.push(class);
                    }
                }
                classes = kept;
                classes.push(merged);
            }
            FormulaNode::Disequality(terms) => {
                for term in terms {
                    if !classes.iter().any(|class| class.contains(term)) {
                        classes.push(BTreeSet::from([term.clone()]));
                    }
                }
            }
            _ => {}
        }
    }
    classes
}

/// Check whether two terms of one equivalence class are asserted distinct by
/// some disequality atom of the goal.
fn has_equality_inequality_contradiction(goal: &Goal) -> bool {
    for class in equivalence_classes(goal) {
        let terms: Vec<&Term> = class.iter().collect();
        for (position, &t1) in terms.iter().enumerate() {
            for &t2 in &terms[position..] {
                if contains_inequality(goal, t1, t2) {
                    return true;
                }
            }
        }
    }
    false
}

/// Close (remove) every goal whose equivalence classes contradict one of its
/// disequality atoms.
pub fn remove_equality_inequality_contradictions(goals: &mut System) {
    let retained: System = goals
        .iter()
        .filter(|goal| !has_equality_inequality_contradiction(goal))
        .cloned()
        .collect();
    *goals = retained;
}

/// Substitute through every goal except the first one; under the branch's
/// unifier the first goal is already closed.
fn substituted_rest(goals: &System, substitution: &Substitution) -> System {
    goals
        .iter()
        .skip(1)
        .map(|goal| goal.substitute(substitution))
        .collect()
}

/// Decide whether the system is refutable: every goal can be closed.
///
/// The reduction pipeline (supergoal pruning, expansion to literals,
/// disequality propagation, equivalence-class contradictions) runs to a fixed
/// point; if open goals remain, the first goal's disequality atoms drive a
/// unification search, recursing on the substituted residual system for every
/// successful unifier.
pub fn conclude_contradiction(system: &System) -> bool {
    let mut goals = system.clone();

    remove_supergoals(&mut goals);
    system_to_literals(&mut goals);
    remove_supergoals(&mut goals);
    produce_inequalities(&mut goals);
    remove_supergoals(&mut goals);
    remove_equality_inequality_contradictions(&mut goals);

    if goals.is_empty() {
        return true;
    }

    let goal = goals.first().unwrap().clone();
    let classes = equivalence_classes(&goal);

    // first, try to unify the two sides of a disequality directly
    for formula in goal.iter() {
        if let FormulaNode::Disequality(terms) = formula.node() {
            for k in 1..terms.len() {
                for l in 0..k {
                    if let Some(unifier) = unify(&terms[k], &terms[l]) {
                        if conclude_contradiction(&substituted_rest(&goals, &unifier)) {
                            return true;
                        }
                    }
                }
            }
        }
    }

    // then, try to pull both sides of a disequality into one equivalence
    // class
    for formula in goal.iter() {
        if let FormulaNode::Disequality(terms) = formula.node() {
            for k in 1..terms.len() {
                for l in 0..k {
                    for class in &classes {
                        for first in class {
                            for second in class {
                                let task = vec![
                                    (terms[k].clone(), first.clone()),
                                    (terms[l].clone(), second.clone()),
                                ];
                                if let Some(unifier) = unify_pairs(task) {
                                    if conclude_contradiction(&substituted_rest(
                                        &goals, &unifier,
                                    )) {
                                        return true;
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    false
}
