//! The formula simplifier: a fixed rewrite system applied bottom-up to a
//! normal form.
//!
//! The rewrite rules cover degenerate equalities and disequalities, negation
//! pushing, flattening and deduplication of conjunction and disjunction,
//! implication-chain contraction, equivalence contraction, and quantifier
//! binder pruning and merging. One call rewrites to a fixed point:
//! `simplify(simplify(f))` is structurally identical to `simplify(f)`.

use crate::syntax::formula::{Formula, FormulaNode};
use crate::syntax::symbol::{SymbolKind, Variable};
use crate::syntax::term::Term;

use std::collections::{BTreeMap, BTreeSet};

impl Formula {
    /// Reduce this formula to its simplified normal form.
    pub fn simplify(&self) -> Formula {
        match self.node() {
            FormulaNode::False | FormulaNode::True | FormulaNode::Relation(_, _) => self.clone(),
            FormulaNode::Equality(terms) => self.simplify_equality(terms),
            FormulaNode::Disequality(terms) => self.simplify_disequality(terms),
            FormulaNode::Negation(formula) => simplify_negation(formula),
            FormulaNode::Conjunction(formulas) => {
                simplify_junction(SymbolKind::Conjunction, formulas)
            }
            FormulaNode::Disjunction(formulas) => {
                simplify_junction(SymbolKind::Disjunction, formulas)
            }
            FormulaNode::Implication(formulas) => simplify_implication(formulas),
            FormulaNode::Equivalence(formulas) => simplify_equivalence(formulas),
            FormulaNode::Universal(binders, formula) => {
                simplify_quantifier(SymbolKind::Universal, binders, formula)
            }
            FormulaNode::Existential(binders, formula) => {
                simplify_quantifier(SymbolKind::Existential, binders, formula)
            }
        }
    }

    /// An equality of zero or one term is vacuously true; duplicated terms
    /// are removed.
    fn simplify_equality(&self, terms: &[Term]) -> Formula {
        if terms.len() <= 1 {
            return Formula::mk_true();
        }
        let unique: BTreeSet<Term> = terms.iter().cloned().collect();
        if unique.len() == terms.len() {
            return self.clone();
        }
        if unique.len() <= 1 {
            return Formula::mk_true();
        }
        Formula::mk_equality(unique.into_iter().collect())
    }

    /// A disequality of zero or one term is vacuously true; two structurally
    /// equal terms make it false.
    fn simplify_disequality(&self, terms: &[Term]) -> Formula {
        if terms.len() <= 1 {
            return Formula::mk_true();
        }
        let unique: BTreeSet<Term> = terms.iter().cloned().collect();
        if unique.len() < terms.len() {
            return Formula::mk_false();
        }
        self.clone()
    }
}

/// Simplify a negation by cases on its simplified body.
fn simplify_negation(formula: &Formula) -> Formula {
    let arg = formula.simplify();
    match arg.node() {
        FormulaNode::False => Formula::mk_true(),
        FormulaNode::True => Formula::mk_false(),
        FormulaNode::Equality(terms) if terms.len() == 2 => {
            Formula::mk_disequality(terms.clone())
        }
        FormulaNode::Disequality(terms) if terms.len() == 2 => {
            Formula::mk_equality(terms.clone())
        }
        FormulaNode::Negation(inner) => inner.clone(),
        FormulaNode::Conjunction(formulas) => Formula::mk_disjunction(
            formulas
                .iter()
                .map(|f| Formula::mk_negation(f.clone()).simplify())
                .collect(),
        )
        .simplify(),
        FormulaNode::Disjunction(formulas) => Formula::mk_conjunction(
            formulas
                .iter()
                .map(|f| Formula::mk_negation(f.clone()).simplify())
                .collect(),
        )
        .simplify(),
        FormulaNode::Implication(formulas) if formulas.len() == 2 => {
            Formula::mk_conjunction(vec![
                formulas[0].clone(),
                Formula::mk_negation(formulas[1].clone()).simplify(),
            ])
            .simplify()
        }
        FormulaNode::Universal(binders, inner) => Formula::mk_existential(
            binders.clone(),
            Formula::mk_negation(inner.clone()).simplify(),
        )
        .simplify(),
        FormulaNode::Existential(binders, inner) => Formula::mk_universal(
            binders.clone(),
            Formula::mk_negation(inner.clone()).simplify(),
        )
        .simplify(),
        _ => Formula::mk_negation(arg),
    }
}

/// Simplify a conjunction or disjunction: simplify and flatten same-connective
/// children, deduplicate, absorb the identity unit and annihilate on the
/// opposite one.
fn simplify_junction(kind: SymbolKind, formulas: &[Formula]) -> Formula {
    let is_conjunction = kind == SymbolKind::Conjunction;
    let mut args: BTreeSet<Formula> = BTreeSet::new();

    for formula in formulas {
        let formula = formula.simplify();
        if formula.kind() == kind {
            // flatten a nested same-connective child
            for inner in formula.subformulas() {
                args.insert(inner.clone());
            }
        } else if matches!(formula.node(), FormulaNode::True | FormulaNode::False) {
            let is_true = matches!(formula.node(), FormulaNode::True);
            if is_conjunction != is_true {
                // false in a conjunction, true in a disjunction
                return formula;
            }
            // the opposite unit is the identity, drop it
        } else {
            args.insert(formula);
        }
    }

    if args.is_empty() {
        return if is_conjunction {
            Formula::mk_true()
        } else {
            Formula::mk_false()
        };
    }
    if args.len() == 1 {
        return args.into_iter().next().unwrap();
    }
    if is_conjunction {
        Formula::mk_conjunction(args.into_iter().collect())
    } else {
        Formula::mk_disjunction(args.into_iter().collect())
    }
}

/// Simplify an implication chain `f1 imp f2 imp ... imp fk`.
///
/// The chain is read transitively, so a true link implies every later member
/// and a false link negates every earlier one; a true link before a false one
/// collapses the whole chain to false. Members strictly between the last
/// false and the first true link are bracketed into equivalence classes:
/// a repeated member closes a cycle, so everything in between is mutually
/// equivalent and collapses into a single equivalence block.
fn simplify_implication(formulas: &[Formula]) -> Formula {
    let fs: Vec<Formula> = formulas.iter().map(|f| f.simplify()).collect();

    let mut last_false = None;
    let mut first_true = None;
    for (i, f) in fs.iter().enumerate() {
        match f.node() {
            FormulaNode::False => last_false = Some(i),
            FormulaNode::True => {
                if first_true.is_none() {
                    first_true = Some(i);
                }
            }
            _ => {}
        }
    }

    if let (Some(true_position), Some(false_position)) = (first_true, last_false) {
        if true_position < false_position {
            return Formula::mk_false();
        }
    }

    let begin = last_false.map_or(0, |position| position + 1);
    let end = first_true.unwrap_or(fs.len());

    let mut conjuncts = Vec::new();
    if let Some(position) = first_true {
        // everything after a true link is implied outright
        for f in &fs[position + 1..] {
            if !matches!(f.node(), FormulaNode::True) {
                conjuncts.push(f.clone());
            }
        }
    }
    if let Some(position) = last_false {
        // everything before a false link is refuted
        for f in &fs[..position] {
            if !matches!(f.node(), FormulaNode::False) {
                conjuncts.push(Formula::mk_negation(f.clone()).simplify());
            }
        }
    }

    // bracket the middle members into equivalence classes: a duplicate at
    // position i merges every class back to the first occurrence's class
    let middle = &fs[begin..end];
    let mut first_occurrence: BTreeMap<Formula, usize> = BTreeMap::new();
    let mut representers: Vec<usize> = Vec::new();
    for (i, f) in middle.iter().enumerate() {
        if let Some(&k) = first_occurrence.get(f) {
            let value = representers[k];
            for representer in representers.iter_mut().skip(value + 1) {
                *representer = value;
            }
            representers.push(value);
        } else {
            first_occurrence.insert(f.clone(), i);
            representers.push(i);
        }
    }

    let mut groups: BTreeMap<usize, BTreeSet<Formula>> = BTreeMap::new();
    for (i, f) in middle.iter().enumerate() {
        groups.entry(representers[i]).or_default().insert(f.clone());
    }

    let mut blocks = Vec::new();
    for group in groups.values() {
        if group.len() == 1 {
            blocks.push(group.iter().next().unwrap().clone());
        } else {
            blocks.push(Formula::mk_equivalence(group.iter().cloned().collect()));
        }
    }

    if last_false.is_none() && first_true.is_none() && blocks.len() == fs.len() {
        // nothing collapsed, the chain is already in normal form
        return Formula::mk_implication(blocks);
    }

    match blocks.len() {
        0 => {}
        1 => {
            // a single surviving block constrains nothing unless it is a
            // merged equivalence cycle
            let only_group = groups.values().next().unwrap();
            if only_group.len() > 1 {
                conjuncts.push(blocks.into_iter().next().unwrap());
            }
        }
        _ => conjuncts.push(Formula::mk_implication(blocks).simplify()),
    }

    Formula::mk_conjunction(conjuncts).simplify()
}

/// Simplify an equivalence: true members are identities, a false member
/// negates all others, duplicates collapse.
fn simplify_equivalence(formulas: &[Formula]) -> Formula {
    let mut has_true = false;
    let mut has_false = false;
    let mut args: BTreeSet<Formula> = BTreeSet::new();

    for formula in formulas {
        let formula = formula.simplify();
        match formula.node() {
            FormulaNode::True => has_true = true,
            FormulaNode::False => has_false = true,
            _ => {
                args.insert(formula);
            }
        }
    }

    if has_false && has_true {
        return Formula::mk_false();
    }
    if has_false {
        // everything must be equivalent to false
        let negated = args
            .iter()
            .map(|f| Formula::mk_negation(f.clone()).simplify())
            .collect();
        return Formula::mk_conjunction(negated).simplify();
    }
    if has_true {
        // everything must be equivalent to true
        return Formula::mk_conjunction(args.into_iter().collect()).simplify();
    }
    if args.len() <= 1 {
        return Formula::mk_true();
    }
    Formula::mk_equivalence(args.into_iter().collect())
}

/// Simplify a quantified formula: intersect the binder list with the free
/// variables of the simplified body, merge a same-kind quantified body, and
/// degenerate to the body when no binder remains.
fn simplify_quantifier(kind: SymbolKind, binders: &[Variable], formula: &Formula) -> Formula {
    let body = formula.simplify();
    let body_free = body.free_variables();

    let mut variables: Vec<Variable> = binders
        .iter()
        .filter(|variable| body_free.contains(*variable))
        .copied()
        .collect();

    if body.kind() == kind {
        // merge directly nested quantifiers of the same kind
        for variable in body.variables() {
            if !variables.contains(variable) {
                variables.push(*variable);
            }
        }
        let inner = body.subformulas()[0].clone();
        return match kind {
            SymbolKind::Universal => Formula::mk_universal(variables, inner),
            _ => Formula::mk_existential(variables, inner),
        };
    }

    if variables.is_empty() {
        return body;
    }
    match kind {
        SymbolKind::Universal => Formula::mk_universal(variables, body),
        _ => Formula::mk_existential(variables, body),
    }
}
