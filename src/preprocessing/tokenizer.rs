//! Tokenizer for the textual formula syntax.
//!
//! The syntax uses keywords for the connectives (`not`, `and`, `or`, `imp`,
//! `equ`, `neq`, `forall`, `exists`, `true`, `false`), `=` for equality, and
//! names with a kind-declaring prefix (`v_x`, `c_a`, `f_add`, `r_less`) for
//! user symbols. Parenthesized blocks nest as a single token.

use crate::errors::ParseError;

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

/// Enum of all possible tokens occurring in a formula string.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FolToken {
    /// The negation keyword `not`.
    Not,
    /// The conjunction keyword `and`.
    And,
    /// The disjunction keyword `or`.
    Or,
    /// The implication keyword `imp`.
    Imp,
    /// The equivalence keyword `equ`.
    Equ,
    /// The infix equality `=`.
    Equal,
    /// The infix disequality keyword `neq`.
    Neq,
    /// The universal quantifier keyword `forall`.
    Forall,
    /// The existential quantifier keyword `exists`.
    Exists,
    /// The `true` constant.
    True,
    /// The `false` constant.
    False,
    /// The separator of binder lists and argument lists.
    Comma,
    /// A user symbol name with its kind-declaring prefix.
    Name(String),
    /// A block of tokens inside parentheses.
    Tokens(Vec<FolToken>),
}

/// Check whether the character can be part of a name.
fn is_valid_in_name(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Collect the rest of a name starting with `first`.
fn collect_name(input_chars: &mut Peekable<Chars>, first: char) -> String {
    let mut name = String::new();
    name.push(first);
    while let Some(c) = input_chars.peek() {
        if !is_valid_in_name(*c) {
            break;
        }
        name.push(*c);
        input_chars.next();
    }
    name
}

/// Try to tokenize a formula string.
pub fn try_tokenize_formula(formula: &str) -> Result<Vec<FolToken>, ParseError> {
    try_tokenize_recursive(&mut formula.chars().peekable(), true)
}

/// Process a peekable iterator of characters into a vector of [FolToken]s;
/// a parenthesized block becomes a single nested [FolToken::Tokens].
fn try_tokenize_recursive(
    input_chars: &mut Peekable<Chars>,
    top_level: bool,
) -> Result<Vec<FolToken>, ParseError> {
    let mut output = Vec::new();

    while let Some(c) = input_chars.next() {
        match c {
            c if c.is_whitespace() => {} // skip whitespace
            ',' => output.push(FolToken::Comma),
            '=' => output.push(FolToken::Equal),
            '(' => {
                let tokens = try_tokenize_recursive(input_chars, false)?;
                output.push(FolToken::Tokens(tokens));
            }
            ')' => {
                if top_level {
                    return Err(ParseError::UnexpectedCharacter(')'));
                }
                return Ok(output);
            }
            c if is_valid_in_name(c) => {
                let name = collect_name(input_chars, c);
                output.push(match name.as_str() {
                    "not" => FolToken::Not,
                    "and" => FolToken::And,
                    "or" => FolToken::Or,
                    "imp" => FolToken::Imp,
                    "equ" => FolToken::Equ,
                    "neq" => FolToken::Neq,
                    "forall" => FolToken::Forall,
                    "exists" => FolToken::Exists,
                    "true" => FolToken::True,
                    "false" => FolToken::False,
                    _ => FolToken::Name(name),
                });
            }
            _ => return Err(ParseError::UnexpectedCharacter(c)),
        }
    }

    if !top_level {
        // a parenthesized block was never closed
        return Err(ParseError::UnexpectedEnd);
    }
    Ok(output)
}

impl fmt::Display for FolToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FolToken::Not => write!(f, "not"),
            FolToken::And => write!(f, "and"),
            FolToken::Or => write!(f, "or"),
            FolToken::Imp => write!(f, "imp"),
            FolToken::Equ => write!(f, "equ"),
            FolToken::Equal => write!(f, "="),
            FolToken::Neq => write!(f, "neq"),
            FolToken::Forall => write!(f, "forall"),
            FolToken::Exists => write!(f, "exists"),
            FolToken::True => write!(f, "true"),
            FolToken::False => write!(f, "false"),
            FolToken::Comma => write!(f, ","),
            FolToken::Name(name) => write!(f, "{name}"),
            FolToken::Tokens(tokens) => {
                write!(f, "(")?;
                for (i, token) in tokens.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{token}")?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::ParseError;
    use crate::preprocessing::tokenizer::{try_tokenize_formula, FolToken};

    #[test]
    /// Test tokenization of a formula with keywords, names and nesting.
    fn tokenize_formula() {
        let tokens = try_tokenize_formula("forall (v_x) r_p(v_x, c_a) imp true").unwrap();
        assert_eq!(
            tokens,
            vec![
                FolToken::Forall,
                FolToken::Tokens(vec![FolToken::Name("v_x".to_string())]),
                FolToken::Name("r_p".to_string()),
                FolToken::Tokens(vec![
                    FolToken::Name("v_x".to_string()),
                    FolToken::Comma,
                    FolToken::Name("c_a".to_string()),
                ]),
                FolToken::Imp,
                FolToken::True,
            ]
        );
    }

    #[test]
    /// Test that keywords are only recognized as whole names.
    fn keyword_prefixes_are_names() {
        let tokens = try_tokenize_formula("r_nothing and notx").unwrap();
        assert_eq!(
            tokens,
            vec![
                FolToken::Name("r_nothing".to_string()),
                FolToken::And,
                FolToken::Name("notx".to_string()),
            ]
        );
    }

    #[test]
    /// Test tokenizer error cases: stray characters and unbalanced
    /// parentheses.
    fn tokenize_errors() {
        assert_eq!(
            try_tokenize_formula("r_p & r_q").unwrap_err(),
            ParseError::UnexpectedCharacter('&')
        );
        assert_eq!(
            try_tokenize_formula("(r_p").unwrap_err(),
            ParseError::UnexpectedEnd
        );
        assert_eq!(
            try_tokenize_formula("r_p)").unwrap_err(),
            ParseError::UnexpectedCharacter(')')
        );
    }

    #[test]
    /// Test that the display of a token list can be tokenized back.
    fn token_display_round_trip() {
        let tokens = try_tokenize_formula("c_a = c_b or (not r_p)").unwrap();
        let printed = tokens
            .iter()
            .map(|token| token.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(try_tokenize_formula(&printed).unwrap(), tokens);
    }
}
