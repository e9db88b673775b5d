use std::fmt;

use crate::error::LexError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Number(f64),
    LeftParen,
    RightParen,
    Plus,
    Minus,
    Multiply,
    Divide,
}

/// The subset of tokens allowed as the operator of a binary node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Plus,
    Minus,
    Multiply,
    Divide,
}

impl Operator {
    pub fn symbol(self) -> char {
        match self {
            Operator::Plus => '+',
            Operator::Minus => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }

    /// `*` and `/`, which bind tighter than `+` and `-`.
    pub fn is_multiplicative(self) -> bool {
        matches!(self, Operator::Multiply | Operator::Divide)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl Token {
    fn from_symbol(c: char) -> Option<Self> {
        match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Multiply),
            '/' => Some(Token::Divide),
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            _ => None,
        }
    }

    pub fn operator(self) -> Option<Operator> {
        match self {
            Token::Plus => Some(Operator::Plus),
            Token::Minus => Some(Operator::Minus),
            Token::Multiply => Some(Operator::Multiply),
            Token::Divide => Some(Operator::Divide),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Number(value) => write!(f, "{value}"),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Multiply => write!(f, "*"),
            Token::Divide => write!(f, "/"),
        }
    }
}

/// Splits `input` into tokens. Whitespace is dropped before scanning, so it
/// never separates two digits.
///
/// Characters that are not operators or parentheses are accumulated into a
/// numeral; every character appended must leave the numeral parseable as a
/// finite `f64`, otherwise that character is reported.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut numeral = String::new();
    let mut pending = None;

    for c in input.chars().filter(|c| !c.is_whitespace()) {
        if let Some(token) = Token::from_symbol(c) {
            if let Some(value) = pending.take() {
                tokens.push(Token::Number(value));
                numeral.clear();
            }
            tokens.push(token);
            continue;
        }

        numeral.push(c);
        match parse_numeral(&numeral) {
            Some(value) => pending = Some(value),
            None => {
                numeral.pop();
                return Err(LexError {
                    character: c,
                    fragment: numeral,
                });
            }
        }
    }

    if let Some(value) = pending {
        tokens.push(Token::Number(value));
    }
    Ok(tokens)
}

fn parse_numeral(numeral: &str) -> Option<f64> {
    numeral.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Renders tokens with spaced binary operators, e.g. `2 * -(3 + 4)`.
pub fn format_tokens(tokens: &[Token]) -> String {
    let mut result = String::new();
    let mut previous: Option<Token> = None;
    let mut attach_next = true;

    for &token in tokens {
        if !attach_next && token != Token::RightParen {
            result.push(' ');
        }
        result.push_str(&token.to_string());

        let unary_minus = token == Token::Minus
            && previous.map_or(true, |p| p.operator().is_some() || p == Token::LeftParen);
        attach_next = token == Token::LeftParen || unary_minus;
        previous = Some(token);
    }

    result
}
