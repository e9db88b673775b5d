use thiserror::Error;

use crate::token::Token;

/// Raised by the tokenizer when a character cannot extend a numeral.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("unexpected character '{character}'{}", numeral_context(.fragment))]
pub struct LexError {
    /// The character that was rejected.
    pub character: char,
    /// The numeral buffer accumulated before it (may be empty).
    pub fragment: String,
}

fn numeral_context(fragment: &str) -> String {
    if fragment.is_empty() {
        String::new()
    } else {
        format!(" in numeral '{fragment}'")
    }
}

/// Malformed token sequences detected while building the tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unmatched parenthesis")]
    UnmatchedParenthesis,
    #[error("empty parenthesis")]
    EmptyParenthesis,
    #[error("invalid token after unary minus: '{0}'")]
    InvalidAfterUnaryMinus(Token),
    #[error("unexpected token '{0}'")]
    UnexpectedToken(Token),
    #[error("expression nested too deeply")]
    NestedTooDeeply,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,
    /// The operation's result does not fit in a finite `f64`.
    #[error("result of {0} is not finite")]
    Overflow(String),
}

/// Everything `calculate` can fail with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("evaluation error: {0}")]
    Evaluation(#[from] EvalError),
    #[error("no valid calculation literals found")]
    EmptyInput,
}
