//! The uniform-notation classifier of analytic tableaux.
//!
//! Every formula falls into one of five classes: non-branching conjunctive
//! expansions (alpha), branching disjunctive expansions (beta), universal
//! instantiations (gamma), existential Skolemizations (delta), or literals.
//! The classifier also produces the expansion's children and, for gamma and
//! delta, the variables to instantiate.
//!
//! The k-ary implication chain is read transitively (as in the simplifier):
//! a positive chain is the conjunction of its adjacent binary links, and a
//! k-ary equivalence is the conjunction of its cyclic binary links.

use crate::syntax::formula::{Formula, FormulaNode};
use crate::syntax::symbol::Variable;
use crate::syntax::term::Term;

/// Enum of the uniform-notation classes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UniformClass {
    /// An atom, a negated atom, or a reduced literal (double negation and
    /// negated units collapse to their reduced child).
    Literal,
    /// A non-branching expansion: all children join the current goal.
    Alpha,
    /// A branching expansion: each child spawns a sibling goal.
    Beta,
    /// A universal formula, instantiated with fresh free variables.
    Gamma,
    /// An existential formula, instantiated with fresh Skolem constants.
    Delta,
}

/// The result of classifying a formula: its class, the produced children, and
/// the bound variables of a quantified expansion.
#[derive(Clone, Debug)]
pub struct UniformExpansion {
    pub class: UniformClass,
    pub children: Vec<Formula>,
    pub bound: Vec<Variable>,
}

impl UniformExpansion {
    fn literal(formula: Formula) -> UniformExpansion {
        UniformExpansion {
            class: UniformClass::Literal,
            children: vec![formula],
            bound: Vec::new(),
        }
    }

    fn alpha(children: Vec<Formula>) -> UniformExpansion {
        UniformExpansion {
            class: UniformClass::Alpha,
            children,
            bound: Vec::new(),
        }
    }

    fn beta(children: Vec<Formula>) -> UniformExpansion {
        UniformExpansion {
            class: UniformClass::Beta,
            children,
            bound: Vec::new(),
        }
    }

    fn quantified(class: UniformClass, child: Formula, bound: Vec<Variable>) -> UniformExpansion {
        UniformExpansion {
            class,
            children: vec![child],
            bound,
        }
    }
}

/// The adjacent binary links of an implication chain.
fn chain_links(formulas: &[Formula]) -> Vec<Formula> {
    formulas
        .windows(2)
        .map(|pair| Formula::mk_implication(vec![pair[0].clone(), pair[1].clone()]))
        .collect()
}

/// The cyclic binary links of a k-ary equivalence; for two members these are
/// exactly the two directions of the equivalence.
fn cycle_links(formulas: &[Formula]) -> Vec<Formula> {
    let mut links = chain_links(formulas);
    if formulas.len() >= 2 {
        links.push(Formula::mk_implication(vec![
            formulas[formulas.len() - 1].clone(),
            formulas[0].clone(),
        ]));
    }
    links
}

/// Adjacent disequalities negating an n-ary equality chain.
fn adjacent_disequalities(terms: &[Term]) -> Vec<Formula> {
    terms
        .windows(2)
        .map(|pair| Formula::mk_disequality(vec![pair[0].clone(), pair[1].clone()]))
        .collect()
}

/// Pairwise equalities negating an n-ary disequality.
fn pairwise_equalities(terms: &[Term]) -> Vec<Formula> {
    let mut result = Vec::new();
    for (i, first) in terms.iter().enumerate() {
        for second in terms.iter().skip(i + 1) {
            result.push(Formula::mk_equality(vec![first.clone(), second.clone()]));
        }
    }
    result
}

/// Classify a formula into its uniform-notation class, producing the
/// expansion children and the bound variables where applicable.
pub fn uniform_expansion(formula: &Formula) -> UniformExpansion {
    match formula.node() {
        FormulaNode::False
        | FormulaNode::True
        | FormulaNode::Equality(_)
        | FormulaNode::Disequality(_)
        | FormulaNode::Relation(_, _) => UniformExpansion::literal(formula.clone()),

        FormulaNode::Conjunction(formulas) => UniformExpansion::alpha(formulas.clone()),
        FormulaNode::Disjunction(formulas) => UniformExpansion::beta(formulas.clone()),

        FormulaNode::Implication(formulas) if formulas.len() == 2 => UniformExpansion::beta(vec![
            Formula::mk_negation(formulas[0].clone()),
            formulas[1].clone(),
        ]),
        FormulaNode::Implication(formulas) => UniformExpansion::alpha(chain_links(formulas)),

        FormulaNode::Equivalence(formulas) => UniformExpansion::alpha(cycle_links(formulas)),

        FormulaNode::Universal(binders, body) => UniformExpansion::quantified(
            UniformClass::Gamma,
            body.clone(),
            binders.clone(),
        ),
        FormulaNode::Existential(binders, body) => UniformExpansion::quantified(
            UniformClass::Delta,
            body.clone(),
            binders.clone(),
        ),

        FormulaNode::Negation(inner) => match inner.node() {
            FormulaNode::False => UniformExpansion::literal(Formula::mk_true()),
            FormulaNode::True => UniformExpansion::literal(Formula::mk_false()),

            FormulaNode::Equality(terms) if terms.len() <= 1 => {
                // the equality itself is vacuously true
                UniformExpansion::literal(Formula::mk_false())
            }
            FormulaNode::Equality(terms) if terms.len() == 2 => {
                UniformExpansion::literal(Formula::mk_disequality(terms.clone()))
            }
            FormulaNode::Equality(terms) => {
                UniformExpansion::beta(adjacent_disequalities(terms))
            }

            FormulaNode::Disequality(terms) if terms.len() <= 1 => {
                UniformExpansion::literal(Formula::mk_false())
            }
            FormulaNode::Disequality(terms) if terms.len() == 2 => {
                UniformExpansion::literal(Formula::mk_equality(terms.clone()))
            }
            FormulaNode::Disequality(terms) => {
                UniformExpansion::beta(pairwise_equalities(terms))
            }

            FormulaNode::Relation(_, _) => UniformExpansion::literal(formula.clone()),
            FormulaNode::Negation(body) => UniformExpansion::literal(body.clone()),

            FormulaNode::Conjunction(formulas) => UniformExpansion::beta(
                formulas.iter().map(|f| Formula::mk_negation(f.clone())).collect(),
            ),
            FormulaNode::Disjunction(formulas) => UniformExpansion::alpha(
                formulas.iter().map(|f| Formula::mk_negation(f.clone())).collect(),
            ),

            FormulaNode::Implication(formulas) if formulas.len() == 2 => {
                UniformExpansion::alpha(vec![
                    formulas[0].clone(),
                    Formula::mk_negation(formulas[1].clone()),
                ])
            }
            FormulaNode::Implication(formulas) => UniformExpansion::beta(
                chain_links(formulas)
                    .into_iter()
                    .map(Formula::mk_negation)
                    .collect(),
            ),

            FormulaNode::Equivalence(formulas) => UniformExpansion::beta(
                cycle_links(formulas)
                    .into_iter()
                    .map(Formula::mk_negation)
                    .collect(),
            ),

            FormulaNode::Universal(binders, body) => UniformExpansion::quantified(
                UniformClass::Delta,
                Formula::mk_negation(body.clone()),
                binders.clone(),
            ),
            FormulaNode::Existential(binders, body) => UniformExpansion::quantified(
                UniformClass::Gamma,
                Formula::mk_negation(body.clone()),
                binders.clone(),
            ),
        },
    }
}
