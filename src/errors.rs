//! Error types raised by the term/formula algebra and by the formula reader.

use crate::syntax::symbol::SymbolKind;
use thiserror::Error;

/// Errors raised by the core term and formula constructors.
///
/// The simplifier and the tableau engine never raise - they return normal-form
/// formulas and plain `bool` verdicts respectively.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum LogicError {
    /// Construction of a term or relation whose argument count disagrees with
    /// the declared arity of its symbol.
    #[error("wrong arity, expected {expected} arguments but {found} found")]
    ArityMismatch { expected: usize, found: usize },
    /// A coercion that violates a kind invariant, such as treating a relation
    /// symbol as an operation.
    #[error("invalid symbol kind, expected {expected:?} but {found:?} found")]
    InvalidKind {
        expected: SymbolKind,
        found: SymbolKind,
    },
    /// Bug guard for internally reachable cases that must never happen on
    /// valid inputs. Signals a programming error, not a user error.
    #[error("malformed formula")]
    MalformedFormula,
}

/// Errors raised while tokenizing or parsing a formula string.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ParseError {
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),
    #[error("name is expected")]
    NameExpected,
    #[error("name '{0}' does not declare a symbol kind (expected a v_/c_/f_/r_ prefix)")]
    UnknownKindPrefix(String),
    #[error("variable is expected, but '{0}' found")]
    VariableExpected(String),
    #[error("term is expected")]
    TermExpected,
    #[error("formula is expected")]
    FormulaExpected,
    #[error("wrong arity for '{name}', expected {expected} but {found} found")]
    WrongArity {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("'{name}' is already declared with a different symbol kind")]
    SymbolKindClash { name: String },
    #[error("variable '{0}' is bound twice in one binder list")]
    DuplicateBinder(String),
    #[error("'=' and 'neq' cannot be chained together without parentheses")]
    MixedEqualityChain,
    #[error("'{0}' and '{1}' cannot be mixed without parentheses")]
    MixedConnectives(String, String),
    #[error("unexpected token {0}")]
    UnexpectedToken(String),
}
