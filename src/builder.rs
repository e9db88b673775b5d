//! Incremental tree construction.
//!
//! Tokens are consumed left to right, one operand (and its trailing operator)
//! per step. Precedence is handled by restructuring the partial tree locally
//! instead of recursing through a grammar: the open operand slot is never
//! deeper than `root.right.right`.

use crate::ast::Expression;
use crate::error::ParseError;
use crate::matcher::matching_close_index;
use crate::token::{Operator, Token};

/// Maximum number of nested parenthesis groups.
pub const MAX_DEPTH: usize = 256;

/// A tree that still awaits its last operand.
///
/// Shape is `left operator _`, or `left operator (open_left open_op _)` when
/// a multiplicative node was opened below an additive root.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialTree {
    left: Expression,
    operator: Operator,
    open: Option<(Expression, Operator)>,
}

impl PartialTree {
    pub fn new(left: Expression, operator: Operator) -> Self {
        PartialTree {
            left,
            operator,
            open: None,
        }
    }

    /// Fills the rightmost pending slot with `operand`.
    pub fn complete(self, operand: Expression) -> Expression {
        let right = match self.open {
            Some((left, operator)) => Expression::binary(left, operator, operand),
            None => operand,
        };
        Expression::binary(self.left, self.operator, right)
    }

    /// Adds `operand` followed by `operator` to the tree.
    pub fn merge(self, operand: Expression, operator: Operator) -> Self {
        if !operator.is_multiplicative() {
            return PartialTree::new(self.complete(operand), operator);
        }

        let PartialTree {
            left,
            operator: root_operator,
            open,
        } = self;
        match open {
            // a*b / c and a/b * c both close the open node first
            Some((open_left, open_operator)) => PartialTree {
                left,
                operator: root_operator,
                open: Some((
                    Expression::binary(open_left, open_operator, operand),
                    operator,
                )),
            },
            None if root_operator.is_multiplicative() => PartialTree::new(
                Expression::binary(left, root_operator, operand),
                operator,
            ),
            None => PartialTree {
                left,
                operator: root_operator,
                open: Some((operand, operator)),
            },
        }
    }

    /// The tree as an `Expression`, with `Empty` in the pending slot.
    pub fn to_expression(&self) -> Expression {
        self.clone().complete(Expression::Empty)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BuildState<'a> {
    InProgress {
        root: Option<PartialTree>,
        tokens: &'a [Token],
    },
    Done(Expression),
    Failed(ParseError),
}

impl<'a> BuildState<'a> {
    pub fn start(tokens: &'a [Token]) -> Self {
        BuildState::InProgress { root: None, tokens }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, BuildState::InProgress { .. })
    }

    /// Performs a single transition. Terminal states are returned unchanged.
    ///
    /// Every transition out of `InProgress` either terminates or consumes at
    /// least one token.
    pub fn step(self) -> Self {
        self.advance(0)
    }

    fn advance(self, depth: usize) -> Self {
        match self {
            BuildState::InProgress { root, tokens } => {
                transition(root, tokens, depth).unwrap_or_else(BuildState::Failed)
            }
            terminal => terminal,
        }
    }
}

/// Builds the expression tree for `tokens`.
///
/// An empty token slice yields `Expression::Empty`.
pub fn build_ast(tokens: &[Token]) -> Result<Expression, ParseError> {
    build_nested(tokens, 0)
}

fn build_nested(tokens: &[Token], depth: usize) -> Result<Expression, ParseError> {
    if depth > MAX_DEPTH {
        return Err(ParseError::NestedTooDeeply);
    }

    let mut state = BuildState::start(tokens);
    // len + 1 transitions always reach a terminal state
    for _ in 0..=tokens.len() {
        if state.is_terminal() {
            break;
        }
        state = state.advance(depth);
    }

    match state {
        BuildState::Done(root) => Ok(root),
        BuildState::Failed(err) => Err(err),
        BuildState::InProgress { .. } => Err(ParseError::UnexpectedEnd),
    }
}

fn transition<'a>(
    root: Option<PartialTree>,
    tokens: &'a [Token],
    depth: usize,
) -> Result<BuildState<'a>, ParseError> {
    match tokens {
        [] => match root {
            None => Ok(BuildState::Done(Expression::Empty)),
            Some(_) => Err(ParseError::UnexpectedEnd),
        },
        [Token::Minus, Token::Number(value), rest @ ..] => {
            consume(root, Expression::Number(-value), rest)
        }
        [Token::Minus, Token::LeftParen, rest @ ..] => {
            let (inner, rest) = group(rest, depth)?;
            consume(root, Expression::NegatedParenthesis(Box::new(inner)), rest)
        }
        [Token::Minus, other, ..] => Err(ParseError::InvalidAfterUnaryMinus(*other)),
        [Token::Minus] => Err(ParseError::UnexpectedEnd),
        [Token::Number(value), rest @ ..] => consume(root, Expression::Number(*value), rest),
        [Token::LeftParen, rest @ ..] => {
            let (inner, rest) = group(rest, depth)?;
            consume(root, Expression::Parenthesis(Box::new(inner)), rest)
        }
        [other, ..] => Err(ParseError::UnexpectedToken(*other)),
    }
}

/// Parses the group whose opener was just consumed. Returns the group's tree
/// and the tokens after its closer.
fn group(tokens: &[Token], depth: usize) -> Result<(Expression, &[Token]), ParseError> {
    let close = matching_close_index(tokens).ok_or(ParseError::UnmatchedParenthesis)?;
    if close == 0 {
        return Err(ParseError::EmptyParenthesis);
    }
    let inner = build_nested(&tokens[..close], depth + 1)?;
    Ok((inner, &tokens[close + 1..]))
}

/// Merges a freshly parsed operand, and the operator after it if any.
fn consume<'a>(
    root: Option<PartialTree>,
    operand: Expression,
    rest: &'a [Token],
) -> Result<BuildState<'a>, ParseError> {
    let Some((&next, after)) = rest.split_first() else {
        let tree = match root {
            Some(root) => root.complete(operand),
            None => operand,
        };
        return Ok(BuildState::Done(tree));
    };

    let operator = next.operator().ok_or(ParseError::UnexpectedToken(next))?;
    let root = match root {
        Some(root) => root.merge(operand, operator),
        None => PartialTree::new(operand, operator),
    };
    Ok(BuildState::InProgress {
        root: Some(root),
        tokens: after,
    })
}
