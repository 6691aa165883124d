//! Recursive-descent parser from formula tokens to [Formula] trees.
//!
//! The operator precedence is the following (the lower, the stronger):
//!  - terms, atoms and `=`/`neq` chains: 1
//!  - negation: 2
//!  - `and` / `or` (one level, mixing requires parentheses): 3
//!  - `imp` / `equ` (one level, mixing requires parentheses): 4
//!  - quantifiers, binding everything up to the enclosing parenthesis: 5
//!
//! Chains of the same separator build the k-ary connectives directly, so
//! `c_a = c_b = c_c` is one ternary equality and `r_p imp r_q imp r_r` is one
//! ternary implication chain.
//!
//! Names declare the kind of the symbol they introduce through their prefix
//! (`v_` variable, `c_` constant, `f_` operation, `r_` relation) and are
//! resolved through a [Dictionary]; the first use fixes the arity, and any
//! later use with a different kind or arity is an error. Every formula is
//! parsed inside a fresh dictionary scope which is merged down on success and
//! discarded on failure, so a failed parse leaves no half-created symbols
//! behind.

use crate::errors::ParseError;
use crate::preprocessing::dictionary::Dictionary;
use crate::preprocessing::tokenizer::{try_tokenize_formula, FolToken};
use crate::syntax::formula::Formula;
use crate::syntax::symbol::{
    fresh_constant, fresh_operation, fresh_relation, fresh_variable, Symbol, SymbolKind, Variable,
};
use crate::syntax::term::Term;

/// Parse a formula string into a formula tree, resolving and creating
/// symbols through the given dictionary.
pub fn parse_fol_formula(
    formula: &str,
    dictionary: &mut Dictionary,
) -> Result<Formula, ParseError> {
    let tokens = try_tokenize_formula(formula)?;

    dictionary.push();
    let result = parse_fol_tokens(&tokens, dictionary);
    if result.is_ok() {
        dictionary.merge_top_two();
    } else {
        dictionary.pop();
    }
    result
}

/// Parse a token slice into a formula tree using recursive steps.
pub fn parse_fol_tokens(
    tokens: &[FolToken],
    dictionary: &mut Dictionary,
) -> Result<Formula, ParseError> {
    parse_1_quantifier(tokens, dictionary)
}

/// Which symbol kind a name declares through its prefix.
fn declared_kind(name: &str) -> Result<SymbolKind, ParseError> {
    if name.starts_with("v_") {
        Ok(SymbolKind::Variable)
    } else if name.starts_with("c_") {
        Ok(SymbolKind::Constant)
    } else if name.starts_with("f_") {
        Ok(SymbolKind::Operation)
    } else if name.starts_with("r_") {
        Ok(SymbolKind::Relation)
    } else {
        Err(ParseError::UnknownKindPrefix(name.to_string()))
    }
}

/// Resolve a name to its symbol, creating and registering a fresh symbol of
/// the declared kind on first use. The first use fixes the arity.
fn resolve_symbol(
    dictionary: &mut Dictionary,
    name: &str,
    kind: SymbolKind,
    arity: usize,
) -> Result<Symbol, ParseError> {
    if let Some(symbol) = dictionary.lookup_by_name(name) {
        if symbol.kind() != kind {
            return Err(ParseError::SymbolKindClash {
                name: name.to_string(),
            });
        }
        if symbol.arity() != arity {
            return Err(ParseError::WrongArity {
                name: name.to_string(),
                expected: symbol.arity(),
                found: arity,
            });
        }
        return Ok(symbol);
    }

    let symbol = match kind {
        SymbolKind::Variable => fresh_variable().symbol(),
        SymbolKind::Constant => fresh_constant(),
        SymbolKind::Operation => fresh_operation(arity),
        _ => fresh_relation(arity),
    };
    dictionary.insert(name, symbol);
    Ok(symbol)
}

/// Split a token slice into the chunks between separators selected by
/// `is_separator`, returning the chunks and the separators themselves.
fn split_top_level<'a>(
    tokens: &'a [FolToken],
    is_separator: fn(&FolToken) -> bool,
) -> (Vec<&'a [FolToken]>, Vec<&'a FolToken>) {
    let mut chunks = Vec::new();
    let mut separators = Vec::new();
    let mut start = 0;
    for (position, token) in tokens.iter().enumerate() {
        if is_separator(token) {
            chunks.push(&tokens[start..position]);
            separators.push(token);
            start = position + 1;
        }
    }
    chunks.push(&tokens[start..]);
    (chunks, separators)
}

/// Recursive parsing step 1: a leading quantifier with its parenthesized
/// binder list, binding everything that follows it.
fn parse_1_quantifier(
    tokens: &[FolToken],
    dictionary: &mut Dictionary,
) -> Result<Formula, ParseError> {
    let universal = match tokens.first() {
        Some(FolToken::Forall) => true,
        Some(FolToken::Exists) => false,
        _ => return parse_2_imp_equ(tokens, dictionary),
    };

    let Some(FolToken::Tokens(binder_tokens)) = tokens.get(1) else {
        return Err(ParseError::NameExpected);
    };

    // binder variables live in their own scope which shadows outer bindings;
    // the scope is merged down on success so created symbols persist
    dictionary.push();
    let result = parse_quantifier_body(binder_tokens, &tokens[2..], dictionary, universal);
    if result.is_ok() {
        dictionary.merge_top_two();
    } else {
        dictionary.pop();
    }
    result
}

fn parse_quantifier_body(
    binder_tokens: &[FolToken],
    body_tokens: &[FolToken],
    dictionary: &mut Dictionary,
    universal: bool,
) -> Result<Formula, ParseError> {
    let mut variables = Vec::new();
    let (chunks, _) = split_top_level(binder_tokens, |token| matches!(token, FolToken::Comma));
    for chunk in chunks {
        let [FolToken::Name(name)] = chunk else {
            return Err(ParseError::NameExpected);
        };
        if declared_kind(name)? != SymbolKind::Variable {
            return Err(ParseError::VariableExpected(name.clone()));
        }
        let variable = fresh_variable();
        if !dictionary.insert(name, variable.symbol()) {
            return Err(ParseError::DuplicateBinder(name.clone()));
        }
        variables.push(variable);
    }
    if variables.is_empty() {
        return Err(ParseError::NameExpected);
    }

    let body = parse_1_quantifier(body_tokens, dictionary)?;
    Ok(if universal {
        Formula::mk_universal(variables, body)
    } else {
        Formula::mk_existential(variables, body)
    })
}

/// Recursive parsing step 2: `imp` / `equ` chains.
fn parse_2_imp_equ(
    tokens: &[FolToken],
    dictionary: &mut Dictionary,
) -> Result<Formula, ParseError> {
    let (chunks, separators) = split_top_level(tokens, |token| {
        matches!(token, FolToken::Imp | FolToken::Equ)
    });
    if separators.is_empty() {
        return parse_3_con_dis(tokens, dictionary);
    }
    if separators.iter().any(|t| matches!(t, FolToken::Imp))
        && separators.iter().any(|t| matches!(t, FolToken::Equ))
    {
        return Err(ParseError::MixedConnectives(
            "imp".to_string(),
            "equ".to_string(),
        ));
    }

    let mut children = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        children.push(parse_1_quantifier(chunk, dictionary)?);
    }
    Ok(if matches!(separators[0], FolToken::Imp) {
        Formula::mk_implication(children)
    } else {
        Formula::mk_equivalence(children)
    })
}

/// Recursive parsing step 3: `and` / `or` chains.
fn parse_3_con_dis(
    tokens: &[FolToken],
    dictionary: &mut Dictionary,
) -> Result<Formula, ParseError> {
    let (chunks, separators) = split_top_level(tokens, |token| {
        matches!(token, FolToken::And | FolToken::Or)
    });
    if separators.is_empty() {
        return parse_4_unary(tokens, dictionary);
    }
    if separators.iter().any(|t| matches!(t, FolToken::And))
        && separators.iter().any(|t| matches!(t, FolToken::Or))
    {
        return Err(ParseError::MixedConnectives(
            "and".to_string(),
            "or".to_string(),
        ));
    }

    let mut children = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        children.push(parse_4_unary(chunk, dictionary)?);
    }
    Ok(if matches!(separators[0], FolToken::And) {
        Formula::mk_conjunction(children)
    } else {
        Formula::mk_disjunction(children)
    })
}

/// Recursive parsing step 4: negation, atoms, equality chains, parenthesized
/// sub-formulas and nested quantifiers.
fn parse_4_unary(tokens: &[FolToken], dictionary: &mut Dictionary) -> Result<Formula, ParseError> {
    match tokens.first() {
        None => return Err(ParseError::FormulaExpected),
        Some(FolToken::Not) => {
            return Ok(Formula::mk_negation(parse_4_unary(
                &tokens[1..],
                dictionary,
            )?));
        }
        Some(FolToken::Forall | FolToken::Exists) => {
            return parse_1_quantifier(tokens, dictionary);
        }
        _ => {}
    }

    // an equality or disequality chain of terms
    let (chunks, separators) = split_top_level(tokens, |token| {
        matches!(token, FolToken::Equal | FolToken::Neq)
    });
    if !separators.is_empty() {
        if separators.iter().any(|t| matches!(t, FolToken::Equal))
            && separators.iter().any(|t| matches!(t, FolToken::Neq))
        {
            return Err(ParseError::MixedEqualityChain);
        }
        let mut terms = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            terms.push(parse_term_tokens(chunk, dictionary)?);
        }
        return Ok(if matches!(separators[0], FolToken::Equal) {
            Formula::mk_equality(terms)
        } else {
            Formula::mk_disequality(terms)
        });
    }

    // a single atom
    match tokens {
        [FolToken::True] => Ok(Formula::mk_true()),
        [FolToken::False] => Ok(Formula::mk_false()),
        [FolToken::Tokens(inner)] => parse_fol_tokens(inner, dictionary),
        [FolToken::Name(name)] => parse_relation(name, &[], dictionary),
        [FolToken::Name(name), FolToken::Tokens(argument_tokens)] => {
            parse_relation(name, argument_tokens, dictionary)
        }
        [_one] => Err(ParseError::FormulaExpected),
        [.., last] => Err(ParseError::UnexpectedToken(last.to_string())),
        [] => Err(ParseError::FormulaExpected),
    }
}

/// Parse a relation atom from its name and (possibly empty) argument list.
fn parse_relation(
    name: &str,
    argument_tokens: &[FolToken],
    dictionary: &mut Dictionary,
) -> Result<Formula, ParseError> {
    if declared_kind(name)? != SymbolKind::Relation {
        return Err(ParseError::FormulaExpected);
    }
    let terms = parse_term_list(argument_tokens, dictionary)?;
    let symbol = resolve_symbol(dictionary, name, SymbolKind::Relation, terms.len())?;
    // the constructor cannot fail: the kind and arity were just checked
    Ok(Formula::mk_relation(symbol, terms).unwrap())
}

/// Parse a comma-separated term list.
fn parse_term_list(
    tokens: &[FolToken],
    dictionary: &mut Dictionary,
) -> Result<Vec<Term>, ParseError> {
    if tokens.is_empty() {
        return Ok(Vec::new());
    }
    let (chunks, _) = split_top_level(tokens, |token| matches!(token, FolToken::Comma));
    let mut terms = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        terms.push(parse_term_tokens(chunk, dictionary)?);
    }
    Ok(terms)
}

/// Parse a single term: a variable or constant name, an operation
/// application, or a parenthesized term.
fn parse_term_tokens(
    tokens: &[FolToken],
    dictionary: &mut Dictionary,
) -> Result<Term, ParseError> {
    match tokens {
        [FolToken::Tokens(inner)] => parse_term_tokens(inner, dictionary),
        [FolToken::Name(name)] => match declared_kind(name)? {
            SymbolKind::Variable => {
                let symbol = resolve_symbol(dictionary, name, SymbolKind::Variable, 0)?;
                // the resolved symbol is a variable by construction
                Ok(Term::mk_variable(Variable::try_from(symbol).unwrap()))
            }
            SymbolKind::Constant => {
                let symbol = resolve_symbol(dictionary, name, SymbolKind::Constant, 0)?;
                Ok(Term::mk_constant(symbol).unwrap())
            }
            _ => Err(ParseError::TermExpected),
        },
        [FolToken::Name(name), FolToken::Tokens(argument_tokens)] => {
            if declared_kind(name)? != SymbolKind::Operation {
                return Err(ParseError::TermExpected);
            }
            let args = parse_term_list(argument_tokens, dictionary)?;
            let symbol = resolve_symbol(dictionary, name, SymbolKind::Operation, args.len())?;
            Ok(Term::mk_operation(symbol, args).unwrap())
        }
        _ => Err(ParseError::TermExpected),
    }
}
