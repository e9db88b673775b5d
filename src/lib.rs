//! Arithmetic expression calculator.
//!
//! Input goes through the tokenizer, the incremental tree builder and the
//! evaluator:
//!
//! ```
//! assert_eq!(rustcalc::calculate("2*(3+(4/(1+1)))/(9+1)"), Ok(1.0));
//! ```

pub mod ast;
pub mod builder;
pub mod error;
pub mod evaluator;
pub mod matcher;
pub mod token;

pub use ast::Expression;
pub use builder::{build_ast, BuildState};
pub use error::{CalcError, EvalError, LexError, ParseError};
pub use evaluator::{evaluate, evaluate_traced, EvaluationTrace, Step};
pub use matcher::matching_close_index;
pub use token::{format_tokens, tokenize, Operator, Token};

/// Everything produced while calculating one input.
#[derive(Debug)]
pub struct Calculation {
    pub tokens: Vec<Token>,
    pub tree: Expression,
    pub result: f64,
}

/// Evaluates `input`, failing with the first lex, parse or evaluation error.
pub fn calculate(input: &str) -> Result<f64, CalcError> {
    calculate_traced(input, &mut EvaluationTrace::new(false))
}

pub fn calculate_traced(input: &str, trace: &mut EvaluationTrace) -> Result<f64, CalcError> {
    run_calculation(input, trace).map(|calculation| calculation.result)
}

/// Runs the whole pipeline and keeps the intermediate tokens and tree.
pub fn run_calculation(input: &str, trace: &mut EvaluationTrace) -> Result<Calculation, CalcError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(CalcError::EmptyInput);
    }
    let tree = build_ast(&tokens)?;
    let result = evaluate_traced(&tree, trace)?;
    Ok(Calculation {
        tokens,
        tree,
        result,
    })
}
