//! Parser for propositional formulas, generated by pest from `formula.pest`.
//!
//! ```text
//! implication := term (('->' | '→') term)*
//! term        := factor (('\/' | '∨') factor)*
//! factor      := primary (('/\' | '∧') primary)*
//! primary     := ('!' | '¬') primary | '(' implication ')' | constant | variable
//! ```
//!
//! Input is first split into a flat token stream, so an unknown character is reported
//! before any grammatical error. A grammatical error is then described in terms of the
//! tokens around the position where pest gave up.

use std::str::FromStr;

use itertools::Itertools;
use pest::Parser;
use pest::error::{Error as GrammarError, InputLocation};
use pest::iterators::{Pair, Pairs};
use thiserror::Error;

use super::expression::Expression;
use super::operator::BinaryOperator;

mod grammar {
    use pest_derive::Parser;

    #[derive(Parser)]
    #[grammar = "language/formula.pest"]
    pub(super) struct FormulaParser;
}

use grammar::{FormulaParser, Rule};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown character '{character}' at offset {offset}")]
    UnknownCharacter { character: char, offset: usize },
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("expected closing parenthesis")]
    MissingClosingParenthesis,
    #[error("unexpected token: {0}")]
    UnexpectedToken(String),
    #[error("unexpected tokens after expression: {0}")]
    TrailingTokens(String),
}

/// Parses `input` into an [`Expression`], normalizing ASCII connectives to their
/// Unicode forms.
pub fn parse(input: &str) -> Result<Expression, ParseError> {
    let tokens = tokenize(input)?;

    match FormulaParser::parse(Rule::formula, input) {
        Ok(mut pairs) => {
            let formula = next_pair(&mut pairs)?;
            build(next_pair(&mut formula.into_inner())?)
        }
        Err(error) => Err(diagnose(&error, &tokens)),
    }
}

impl FromStr for Expression {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

#[derive(Clone, Copy, Debug)]
struct Token<'input> {
    rule: Rule,
    lexeme: &'input str,
    offset: usize,
}

impl Token<'_> {
    fn ends_operand(&self) -> bool {
        matches!(self.rule, Rule::variable | Rule::constant | Rule::rparen)
    }
}

fn tokenize(input: &str) -> Result<Vec<Token<'_>>, ParseError> {
    let pairs = FormulaParser::parse(Rule::tokens, input)
        .map_err(|error| ParseError::UnexpectedToken(error.to_string()))?;

    let mut tokens = Vec::new();
    for pair in pairs.flat_map(|pair| pair.into_inner()) {
        let offset = pair.as_span().start();
        match pair.as_rule() {
            Rule::EOI => {}
            Rule::unknown => {
                if let Some(character) = pair.as_str().chars().next() {
                    return Err(ParseError::UnknownCharacter { character, offset });
                }
            }
            rule => tokens.push(Token {
                rule,
                lexeme: pair.as_str(),
                offset,
            }),
        }
    }
    Ok(tokens)
}

/// Translates the position pest stopped at into a [`ParseError`].
fn diagnose(error: &GrammarError<Rule>, tokens: &[Token<'_>]) -> ParseError {
    let offset = match error.location {
        InputLocation::Pos(offset) => offset,
        InputLocation::Span((start, _)) => start,
    };
    let (read, rest) = tokens.split_at(tokens.partition_point(|token| token.offset < offset));

    let awaiting_operand = read.last().is_none_or(|token| !token.ends_operand());
    let open_parentheses: isize = read
        .iter()
        .map(|token| match token.rule {
            Rule::lparen => 1,
            Rule::rparen => -1,
            _ => 0,
        })
        .sum();

    match rest.first() {
        None if awaiting_operand => ParseError::UnexpectedEnd,
        None => ParseError::MissingClosingParenthesis,
        Some(token) if awaiting_operand => ParseError::UnexpectedToken(token.lexeme.to_string()),
        Some(_) if open_parentheses > 0 => ParseError::MissingClosingParenthesis,
        Some(_) => ParseError::TrailingTokens(rest.iter().map(|token| token.lexeme).join(" ")),
    }
}

fn next_pair<'input>(pairs: &mut Pairs<'input, Rule>) -> Result<Pair<'input, Rule>, ParseError> {
    pairs.next().ok_or(ParseError::UnexpectedEnd)
}

fn binary_operator(pair: &Pair<'_, Rule>) -> Result<BinaryOperator, ParseError> {
    match pair.as_rule() {
        Rule::and_op => Ok(BinaryOperator::And),
        Rule::or_op => Ok(BinaryOperator::Or),
        Rule::implies_op => Ok(BinaryOperator::Implies),
        _ => Err(ParseError::UnexpectedToken(pair.as_str().to_string())),
    }
}

fn build(pair: Pair<'_, Rule>) -> Result<Expression, ParseError> {
    match pair.as_rule() {
        Rule::implication | Rule::term | Rule::factor => build_chain(pair),
        Rule::primary => build_primary(pair),
        _ => Err(ParseError::UnexpectedToken(pair.as_str().to_string())),
    }
}

/// Folds `operand (operator operand)*` to the left.
fn build_chain(pair: Pair<'_, Rule>) -> Result<Expression, ParseError> {
    let mut inner = pair.into_inner();
    let first = build(next_pair(&mut inner)?)?;

    inner.tuples().try_fold(first, |left, (operator, operand)| {
        Ok(Expression::binary(binary_operator(&operator)?, left, build(operand)?))
    })
}

fn build_primary(pair: Pair<'_, Rule>) -> Result<Expression, ParseError> {
    let mut inner = pair.into_inner();
    let first = next_pair(&mut inner)?;

    match first.as_rule() {
        Rule::not_op => Ok(Expression::not(build(next_pair(&mut inner)?)?)),
        Rule::lparen => build(next_pair(&mut inner)?),
        Rule::constant => Ok(Expression::Constant(matches!(first.as_str(), "true" | "⊤"))),
        Rule::variable => Ok(Expression::Variable(first.as_str().to_string())),
        _ => Err(ParseError::UnexpectedToken(first.as_str().to_string())),
    }
}
