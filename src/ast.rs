use std::fmt;
use std::mem;

use crate::token::Operator;

/// Expression tree produced by the builder.
///
/// Operator chains lean left, so trees can be as deep as the input is long.
/// Dropping and printing walk the tree with an explicit stack.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Number(f64),
    /// Explicitly grouped sub-expression; evaluates like its content.
    Parenthesis(Box<Expression>),
    /// A group preceded by unary minus.
    NegatedParenthesis(Box<Expression>),
    BinaryOp {
        left: Box<Expression>,
        operator: Operator,
        right: Box<Expression>,
    },
    /// Operand slot not filled yet. Only exists while a tree is being built.
    Empty,
}

impl Expression {
    pub fn binary(left: Expression, operator: Operator, right: Expression) -> Self {
        Expression::BinaryOp {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }

    /// A binary node whose right operand is still to come.
    pub fn pending(left: Expression, operator: Operator) -> Self {
        Expression::binary(left, operator, Expression::Empty)
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        matches!(self, Expression::Empty)
    }

    /// True if an `Empty` slot is reachable anywhere in the tree.
    #[cfg(test)]
    pub(crate) fn has_empty(&self) -> bool {
        let mut nodes = vec![self];
        while let Some(node) = nodes.pop() {
            match node {
                Expression::Empty => return true,
                Expression::Number(_) => {}
                Expression::Parenthesis(inner) | Expression::NegatedParenthesis(inner) => {
                    nodes.push(inner)
                }
                Expression::BinaryOp { left, right, .. } => {
                    nodes.push(left);
                    nodes.push(right);
                }
            }
        }
        false
    }

    fn has_children(&self) -> bool {
        !matches!(self, Expression::Number(_) | Expression::Empty)
    }

    /// Moves the non-leaf children of `self` onto `detached`, leaving `Empty`.
    fn detach_children(&mut self, detached: &mut Vec<Expression>) {
        let mut detach = |child: &mut Box<Expression>| {
            if child.has_children() {
                detached.push(mem::replace(&mut **child, Expression::Empty));
            }
        };
        match self {
            Expression::Parenthesis(inner) | Expression::NegatedParenthesis(inner) => {
                detach(inner)
            }
            Expression::BinaryOp { left, right, .. } => {
                detach(left);
                detach(right);
            }
            Expression::Number(_) | Expression::Empty => {}
        }
    }
}

impl Drop for Expression {
    fn drop(&mut self) {
        let mut detached = Vec::new();
        self.detach_children(&mut detached);
        // every popped node has its children detached before it is dropped
        while let Some(mut node) = detached.pop() {
            node.detach_children(&mut detached);
        }
    }
}

enum Piece<'a> {
    Node(&'a Expression),
    Text(&'static str),
    Operator(Operator),
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut pieces = vec![Piece::Node(self)];

        while let Some(piece) = pieces.pop() {
            match piece {
                Piece::Text(text) => f.write_str(text)?,
                Piece::Operator(operator) => write!(f, " {operator} ")?,
                Piece::Node(Expression::Number(value)) => write!(f, "{value}")?,
                Piece::Node(Expression::Empty) => f.write_str("X")?,
                Piece::Node(Expression::Parenthesis(inner)) => {
                    pieces.extend([Piece::Text(")"), Piece::Node(inner), Piece::Text("(")])
                }
                Piece::Node(Expression::NegatedParenthesis(inner)) => {
                    pieces.extend([Piece::Text(")"), Piece::Node(inner), Piece::Text("-(")])
                }
                Piece::Node(Expression::BinaryOp {
                    left,
                    operator,
                    right,
                }) => pieces.extend([
                    Piece::Text(" }"),
                    Piece::Node(right),
                    Piece::Operator(*operator),
                    Piece::Node(left),
                    Piece::Text("{ "),
                ]),
            }
        }

        Ok(())
    }
}
