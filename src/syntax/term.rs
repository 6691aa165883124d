//! Immutable first-order terms with structural comparison and cached
//! free-variable sets.
//!
//! Terms are reference-counted trees: cloning a [Term] only bumps a reference
//! count and arbitrarily many terms may share the same sub-structure. Equality
//! and ordering are structural, never pointer-based (although a shared pointer
//! is used as a shortcut where it proves equality).

use crate::errors::LogicError;
use crate::syntax::symbol::{Symbol, SymbolKind, Variable};
use crate::syntax::substitution::Substitution;

use std::cell::OnceCell;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Enum of the possible shapes of a term tree node.
#[derive(Clone, Debug)]
pub enum TermNode {
    /// A variable leaf.
    Variable(Variable),
    /// A constant leaf.
    Constant(Symbol),
    /// An application of an operation symbol to argument terms. The number of
    /// arguments always equals the arity of the symbol.
    Operation(Symbol, Vec<Term>),
}

#[derive(Debug)]
struct TermData {
    node: TermNode,
    free_variables: OnceCell<BTreeSet<Variable>>,
}

/// A first-order term - a variable, a constant, or an operation applied to
/// argument terms.
#[derive(Clone, Debug)]
pub struct Term {
    data: Rc<TermData>,
}

impl Term {
    fn from_node(node: TermNode) -> Term {
        Term {
            data: Rc::new(TermData {
                node,
                free_variables: OnceCell::new(),
            }),
        }
    }

    /// Create a term consisting of a single variable.
    pub fn mk_variable(variable: Variable) -> Term {
        Term::from_node(TermNode::Variable(variable))
    }

    /// Create a term consisting of a single constant symbol.
    ///
    /// Returns an error if the symbol is not a constant.
    pub fn mk_constant(symbol: Symbol) -> Result<Term, LogicError> {
        if symbol.kind() != SymbolKind::Constant {
            return Err(LogicError::InvalidKind {
                expected: SymbolKind::Constant,
                found: symbol.kind(),
            });
        }
        Ok(Term::from_node(TermNode::Constant(symbol)))
    }

    /// Create an operation term applying `symbol` to `args`.
    ///
    /// Returns an error if the symbol is not an operation, or if the number of
    /// arguments disagrees with its declared arity.
    pub fn mk_operation(symbol: Symbol, args: Vec<Term>) -> Result<Term, LogicError> {
        if symbol.kind() != SymbolKind::Operation {
            return Err(LogicError::InvalidKind {
                expected: SymbolKind::Operation,
                found: symbol.kind(),
            });
        }
        if args.len() != symbol.arity() {
            return Err(LogicError::ArityMismatch {
                expected: symbol.arity(),
                found: args.len(),
            });
        }
        Ok(Term::from_node(TermNode::Operation(symbol, args)))
    }

    /// Get the node data of this term.
    pub fn node(&self) -> &TermNode {
        &self.data.node
    }

    /// Get the symbol at the root of this term.
    pub fn symbol(&self) -> Symbol {
        match self.node() {
            TermNode::Variable(variable) => variable.symbol(),
            TermNode::Constant(symbol) => *symbol,
            TermNode::Operation(symbol, _) => *symbol,
        }
    }

    /// Get the kind of the symbol at the root of this term.
    pub fn kind(&self) -> SymbolKind {
        self.symbol().kind()
    }

    /// Get the argument terms (empty for variable and constant leaves).
    pub fn args(&self) -> &[Term] {
        match self.node() {
            TermNode::Operation(_, args) => args,
            _ => &[],
        }
    }

    /// If this term is a variable leaf, get that variable.
    pub fn as_variable(&self) -> Option<Variable> {
        match self.node() {
            TermNode::Variable(variable) => Some(*variable),
            _ => None,
        }
    }

    /// Check whether `variable` occurs (free) in this term.
    pub fn is_free_variable(&self, variable: &Variable) -> bool {
        match self.node() {
            TermNode::Variable(v) => v == variable,
            TermNode::Constant(_) => false,
            TermNode::Operation(_, args) => args.iter().any(|arg| arg.is_free_variable(variable)),
        }
    }

    /// Get the set of variables occurring in this term. The set is computed
    /// on first use and cached inside the term.
    pub fn free_variables(&self) -> &BTreeSet<Variable> {
        self.data.free_variables.get_or_init(|| {
            let mut result = BTreeSet::new();
            match self.node() {
                TermNode::Variable(variable) => {
                    result.insert(*variable);
                }
                TermNode::Constant(_) => {}
                TermNode::Operation(_, args) => {
                    for arg in args {
                        result.extend(arg.free_variables().iter().copied());
                    }
                }
            }
            result
        })
    }

    /// Apply a substitution to this term, homomorphically replacing every
    /// variable leaf by its image.
    pub fn substitute(&self, substitution: &Substitution) -> Term {
        match self.node() {
            TermNode::Variable(variable) => substitution.value_of(variable),
            TermNode::Constant(_) => self.clone(),
            TermNode::Operation(symbol, args) => {
                let new_args = args.iter().map(|arg| arg.substitute(substitution)).collect();
                // arity is unchanged, the original term was already checked
                Term::from_node(TermNode::Operation(*symbol, new_args))
            }
        }
    }

    /// Compare two terms lexicographically over (root symbol, argument count,
    /// arguments).
    pub fn compare(&self, other: &Term) -> Ordering {
        if Rc::ptr_eq(&self.data, &other.data) {
            return Ordering::Equal;
        }
        self.symbol()
            .cmp(&other.symbol())
            .then_with(|| self.args().len().cmp(&other.args().len()))
            .then_with(|| {
                for (left, right) in self.args().iter().zip(other.args()) {
                    let result = left.compare(right);
                    if result != Ordering::Equal {
                        return result;
                    }
                }
                Ordering::Equal
            })
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Term) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for Term {}

impl PartialOrd for Term {
    fn partial_cmp(&self, other: &Term) -> Option<Ordering> {
        Some(self.compare(other))
    }
}

impl Ord for Term {
    fn cmp(&self, other: &Term) -> Ordering {
        self.compare(other)
    }
}

impl Hash for Term {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // combines the root identity with the hashes of all arguments, so
        // structurally equal terms hash equally
        self.symbol().id().hash(state);
        for arg in self.args() {
            arg.hash(state);
        }
    }
}
