//! The pretty-printer for terms and formulas, parameterized by a table of
//! connective glyphs.
//!
//! Brackets follow a small precedence table (the lower, the tighter): atoms,
//! negation and quantifiers bind at level 0, conjunction and disjunction at
//! level 1, implication and equivalence at level 2. A bracket is inserted
//! when an inner connective's precedence is at least the outer one and the
//! inner connective is binary. The output is for human consumption only.

use crate::preprocessing::dictionary::Dictionary;
use crate::syntax::formula::{Formula, FormulaNode};
use crate::syntax::symbol::{Symbol, SymbolKind, Variable};
use crate::syntax::term::{Term, TermNode};

use std::fmt;

/// The table of glyphs used for the logical connectives and punctuation.
#[derive(Clone, Debug)]
pub struct Symbolic {
    pub false_symbol: String,
    pub true_symbol: String,
    pub equality_symbol: String,
    pub disequality_symbol: String,
    pub negation_symbol: String,
    pub conjunction_symbol: String,
    pub disjunction_symbol: String,
    pub implication_symbol: String,
    pub equivalence_symbol: String,
    pub universal_quantifier: String,
    pub existential_quantifier: String,
    pub left_bracket: String,
    pub right_bracket: String,
    pub separator_symbol: String,
}

impl Default for Symbolic {
    fn default() -> Symbolic {
        Symbolic {
            false_symbol: "⊥".to_string(),
            true_symbol: "⊤".to_string(),
            equality_symbol: "=".to_string(),
            disequality_symbol: "≠".to_string(),
            negation_symbol: "¬".to_string(),
            conjunction_symbol: "∧".to_string(),
            disjunction_symbol: "∨".to_string(),
            implication_symbol: "⇒".to_string(),
            equivalence_symbol: "⇔".to_string(),
            universal_quantifier: "∀".to_string(),
            existential_quantifier: "∃".to_string(),
            left_bracket: "(".to_string(),
            right_bracket: ")".to_string(),
            separator_symbol: ",".to_string(),
        }
    }
}

/// Pretty-printer for terms and formulas. Symbol names are resolved through
/// a [Dictionary]; symbols without a name get a generated one from their kind
/// prefix and identity.
#[derive(Clone, Debug, Default)]
pub struct Writer {
    pub symbolic: Symbolic,
}

impl Writer {
    /// The display name of a symbol: its dictionary name, or a generated
    /// `v_<id>`/`c_<id>`/`f_<id>`/`r_<id>` fallback.
    pub fn symbol_name(&self, symbol: &Symbol, dictionary: &Dictionary) -> String {
        if let Some(name) = dictionary.lookup_by_symbol(symbol) {
            return name.to_string();
        }
        match symbol.kind() {
            SymbolKind::Variable => format!("v_{}", symbol.id()),
            SymbolKind::Constant => format!("c_{}", symbol.id()),
            SymbolKind::Operation => format!("f_{}", symbol.id()),
            SymbolKind::Relation => format!("r_{}", symbol.id()),
            _ => format!("s_{}", symbol.id()),
        }
    }

    /// The precedence level of a root connective (the lower, the tighter).
    fn precedence(kind: SymbolKind) -> i32 {
        match kind {
            SymbolKind::Conjunction | SymbolKind::Disjunction => 1,
            SymbolKind::Implication | SymbolKind::Equivalence => 2,
            _ => 0,
        }
    }

    /// Brackets are needed when the nested connective binds no tighter than
    /// the outer one and is binary.
    fn brackets_needed(kind: SymbolKind, nested_kind: SymbolKind) -> bool {
        Writer::precedence(nested_kind) >= Writer::precedence(kind)
            && Writer::precedence(nested_kind) > 0
    }

    fn write_bracketed(&self, kind: SymbolKind, nested: &Formula, dictionary: &Dictionary) -> String {
        let text = self.write_formula(nested, dictionary);
        if Writer::brackets_needed(kind, nested.kind()) {
            format!("{}{}{}", self.symbolic.left_bracket, text, self.symbolic.right_bracket)
        } else {
            text
        }
    }

    /// Render a term to text.
    pub fn write_term(&self, term: &Term, dictionary: &Dictionary) -> String {
        match term.node() {
            TermNode::Variable(variable) => self.symbol_name(&variable.symbol(), dictionary),
            TermNode::Constant(symbol) => self.symbol_name(symbol, dictionary),
            TermNode::Operation(symbol, args) => {
                let rendered: Vec<String> =
                    args.iter().map(|arg| self.write_term(arg, dictionary)).collect();
                format!(
                    "{}{}{}{}",
                    self.symbol_name(symbol, dictionary),
                    self.symbolic.left_bracket,
                    rendered.join(&format!("{} ", self.symbolic.separator_symbol)),
                    self.symbolic.right_bracket,
                )
            }
        }
    }

    fn write_term_chain(&self, terms: &[Term], infix: &str, dictionary: &Dictionary) -> String {
        let rendered: Vec<String> = terms
            .iter()
            .map(|term| self.write_term(term, dictionary))
            .collect();
        rendered.join(&format!(" {infix} "))
    }

    fn write_quantifier(
        &self,
        glyph: &str,
        variables: &[Variable],
        body: &Formula,
        dictionary: &Dictionary,
    ) -> String {
        let names: Vec<String> = variables
            .iter()
            .map(|variable| self.symbol_name(&variable.symbol(), dictionary))
            .collect();
        format!(
            "{}{}{}{} {}",
            glyph,
            self.symbolic.left_bracket,
            names.join(&format!("{} ", self.symbolic.separator_symbol)),
            self.symbolic.right_bracket,
            self.write_bracketed(SymbolKind::Universal, body, dictionary),
        )
    }

    /// Render a formula to text.
    pub fn write_formula(&self, formula: &Formula, dictionary: &Dictionary) -> String {
        let kind = formula.kind();
        match formula.node() {
            FormulaNode::False => self.symbolic.false_symbol.clone(),
            FormulaNode::True => self.symbolic.true_symbol.clone(),
            FormulaNode::Equality(terms) => {
                self.write_term_chain(terms, &self.symbolic.equality_symbol, dictionary)
            }
            FormulaNode::Disequality(terms) => {
                self.write_term_chain(terms, &self.symbolic.disequality_symbol, dictionary)
            }
            FormulaNode::Relation(symbol, terms) => {
                if terms.is_empty() {
                    return self.symbol_name(symbol, dictionary);
                }
                let rendered: Vec<String> = terms
                    .iter()
                    .map(|term| self.write_term(term, dictionary))
                    .collect();
                format!(
                    "{}{}{}{}",
                    self.symbol_name(symbol, dictionary),
                    self.symbolic.left_bracket,
                    rendered.join(&format!("{} ", self.symbolic.separator_symbol)),
                    self.symbolic.right_bracket,
                )
            }
            FormulaNode::Negation(inner) => format!(
                "{}{}",
                self.symbolic.negation_symbol,
                self.write_bracketed(kind, inner, dictionary),
            ),
            FormulaNode::Conjunction(formulas) => {
                self.write_junction(kind, formulas, &self.symbolic.conjunction_symbol, dictionary)
            }
            FormulaNode::Disjunction(formulas) => {
                self.write_junction(kind, formulas, &self.symbolic.disjunction_symbol, dictionary)
            }
            FormulaNode::Implication(formulas) => {
                self.write_junction(kind, formulas, &self.symbolic.implication_symbol, dictionary)
            }
            FormulaNode::Equivalence(formulas) => {
                self.write_junction(kind, formulas, &self.symbolic.equivalence_symbol, dictionary)
            }
            FormulaNode::Universal(variables, body) => self.write_quantifier(
                &self.symbolic.universal_quantifier,
                variables,
                body,
                dictionary,
            ),
            FormulaNode::Existential(variables, body) => self.write_quantifier(
                &self.symbolic.existential_quantifier,
                variables,
                body,
                dictionary,
            ),
        }
    }

    fn write_junction(
        &self,
        kind: SymbolKind,
        formulas: &[Formula],
        infix: &str,
        dictionary: &Dictionary,
    ) -> String {
        let rendered: Vec<String> = formulas
            .iter()
            .map(|formula| self.write_bracketed(kind, formula, dictionary))
            .collect();
        rendered.join(&format!(" {infix} "))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            Writer::default().write_term(self, &Dictionary::new())
        )
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            Writer::default().write_formula(self, &Dictionary::new())
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::preprocessing::dictionary::Dictionary;
    use crate::preprocessing::parser::parse_fol_formula;
    use crate::printing::Writer;

    fn written(formula: &str, dictionary: &mut Dictionary) -> String {
        let parsed = parse_fol_formula(formula, dictionary).unwrap();
        Writer::default().write_formula(&parsed, dictionary)
    }

    #[test]
    /// Test glyph rendering and named symbols.
    fn write_connectives() {
        let mut dictionary = Dictionary::new();
        assert_eq!(
            written("r_p and not r_q", &mut dictionary),
            "r_p ∧ ¬r_q"
        );
        assert_eq!(
            written("c_a = c_b imp r_p", &mut dictionary),
            "c_a = c_b ⇒ r_p"
        );
        assert_eq!(
            written("f_f(c_a) neq f_f(c_b)", &mut dictionary),
            "f_f(c_a) ≠ f_f(c_b)"
        );
    }

    #[test]
    /// Test that brackets appear exactly where an inner binary connective
    /// binds no tighter than the outer one.
    fn write_brackets() {
        let mut dictionary = Dictionary::new();

        // tighter inside looser needs no brackets
        assert_eq!(
            written("(r_p and r_q) imp r_s", &mut dictionary),
            "r_p ∧ r_q ⇒ r_s"
        );
        // looser inside tighter is bracketed
        assert_eq!(
            written("(r_p imp r_q) and r_s", &mut dictionary),
            "(r_p ⇒ r_q) ∧ r_s"
        );
        // equal precedence is bracketed
        assert_eq!(
            written("(r_p and r_q) or r_s", &mut dictionary),
            "(r_p ∧ r_q) ∨ r_s"
        );
        // negation brackets binary children only
        assert_eq!(
            written("not (r_p or r_q)", &mut dictionary),
            "¬(r_p ∨ r_q)"
        );
        assert_eq!(written("not not r_p", &mut dictionary), "¬¬r_p");
    }

    #[test]
    /// Test quantifier rendering with binder lists.
    fn write_quantifiers() {
        let mut dictionary = Dictionary::new();
        assert_eq!(
            written("forall (v_x, v_y) r_r(v_x, v_y)", &mut dictionary),
            "∀(v_x, v_y) r_r(v_x, v_y)"
        );

        // a fresh dictionary, so the binder names resolve to the new symbols
        let mut dictionary = Dictionary::new();
        assert_eq!(
            written("exists (v_x) (r_p(v_x) and r_q(v_x))", &mut dictionary),
            "∃(v_x) (r_p(v_x) ∧ r_q(v_x))"
        );
    }
}
