use crate::ast::Expression;
use crate::error::EvalError;
use crate::token::Operator;

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub operation: String,
    pub result: f64,
}

/// Records the operations performed while evaluating, when `detailed_mode` is on.
#[derive(Debug, Default)]
pub struct EvaluationTrace {
    pub steps: Vec<Step>,
    pub detailed_mode: bool,
}

impl EvaluationTrace {
    pub fn new(detailed_mode: bool) -> Self {
        EvaluationTrace {
            steps: Vec::new(),
            detailed_mode,
        }
    }

    pub fn add_step(&mut self, operation: String, result: f64) {
        if self.detailed_mode {
            self.steps.push(Step { operation, result });
        }
    }
}

pub fn evaluate(expr: &Expression) -> Result<f64, EvalError> {
    evaluate_traced(expr, &mut EvaluationTrace::new(false))
}

enum Task<'a> {
    Visit(&'a Expression),
    Negate,
    Apply(Operator),
}

/// Evaluates `expr`, left operand before right operand.
///
/// The tree is walked with an explicit stack, so long operator chains do not
/// grow the call stack.
///
/// # Panics
///
/// If `expr` still contains an `Empty` slot. Finished trees from the builder
/// never do.
pub fn evaluate_traced(expr: &Expression, trace: &mut EvaluationTrace) -> Result<f64, EvalError> {
    let mut tasks = vec![Task::Visit(expr)];
    let mut values = Vec::new();

    while let Some(task) = tasks.pop() {
        match task {
            Task::Visit(Expression::Number(value)) => values.push(*value),
            Task::Visit(Expression::Parenthesis(inner)) => tasks.push(Task::Visit(inner)),
            Task::Visit(Expression::NegatedParenthesis(inner)) => {
                tasks.push(Task::Negate);
                tasks.push(Task::Visit(inner));
            }
            Task::Visit(Expression::BinaryOp {
                left,
                operator,
                right,
            }) => {
                tasks.push(Task::Apply(*operator));
                tasks.push(Task::Visit(right));
                tasks.push(Task::Visit(left));
            }
            Task::Visit(Expression::Empty) => panic!("empty operand slot reached the evaluator"),
            Task::Negate => {
                let value = pop_operand(&mut values);
                let result = -value;
                trace.add_step(format!("-({value})"), result);
                values.push(result);
            }
            Task::Apply(operator) => {
                let right = pop_operand(&mut values);
                let left = pop_operand(&mut values);
                let result = apply(operator, left, right)?;
                trace.add_step(format!("{left} {operator} {right}"), result);
                values.push(result);
            }
        }
    }

    Ok(pop_operand(&mut values))
}

// Every Negate/Apply task is queued behind the visits producing its operands.
fn pop_operand(values: &mut Vec<f64>) -> f64 {
    values.pop().expect("operand evaluated before its operator")
}

fn apply(operator: Operator, left: f64, right: f64) -> Result<f64, EvalError> {
    let result = match operator {
        Operator::Plus => left + right,
        Operator::Minus => left - right,
        Operator::Multiply => left * right,
        Operator::Divide if right == 0.0 => return Err(EvalError::DivisionByZero),
        Operator::Divide => left / right,
    };
    if !result.is_finite() {
        return Err(EvalError::Overflow(format!("{left} {operator} {right}")));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(value: f64) -> Expression {
        Expression::Number(value)
    }

    #[test]
    fn evaluates_simple_tree() {
        let tree = Expression::binary(num(1.0), Operator::Plus, num(2.0));
        assert_eq!(evaluate(&tree), Ok(3.0));
    }

    #[test]
    fn evaluates_each_operator() {
        let apply = |operator| evaluate(&Expression::binary(num(3.0), operator, num(2.0)));
        assert_eq!(apply(Operator::Minus), Ok(1.0));
        assert_eq!(apply(Operator::Multiply), Ok(6.0));
        assert_eq!(apply(Operator::Divide), Ok(1.5));
    }

    #[test]
    fn evaluates_nested_tree() {
        let tree = Expression::binary(
            Expression::binary(num(1.0), Operator::Plus, num(2.0)),
            Operator::Minus,
            num(2.0),
        );
        assert_eq!(evaluate(&tree), Ok(1.0));
    }

    #[test]
    fn groups_evaluate_like_their_content() {
        let inner = Expression::binary(num(4.0), Operator::Minus, num(1.5));
        assert_eq!(
            evaluate(&Expression::Parenthesis(Box::new(inner.clone()))),
            Ok(2.5)
        );
        assert_eq!(
            evaluate(&Expression::NegatedParenthesis(Box::new(inner))),
            Ok(-2.5)
        );
    }

    #[test]
    fn division_by_zero_fails() {
        let tree = Expression::binary(num(1.0), Operator::Divide, num(0.0));
        assert_eq!(evaluate(&tree), Err(EvalError::DivisionByZero));

        let zero = Expression::binary(num(2.0), Operator::Minus, num(2.0));
        let tree = Expression::binary(num(1.0), Operator::Divide, zero);
        assert_eq!(evaluate(&tree), Err(EvalError::DivisionByZero));

        let tree = Expression::binary(num(1.0), Operator::Divide, num(-0.0));
        assert_eq!(evaluate(&tree), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn trace_records_operations_in_order() {
        let tree = Expression::binary(
            Expression::binary(num(1.0), Operator::Plus, num(2.0)),
            Operator::Multiply,
            Expression::NegatedParenthesis(Box::new(num(3.0))),
        );
        let mut trace = EvaluationTrace::new(true);
        assert_eq!(evaluate_traced(&tree, &mut trace), Ok(-9.0));

        let operations: Vec<_> = trace.steps.iter().map(|s| s.operation.as_str()).collect();
        assert_eq!(operations, ["1 + 2", "-(3)", "3 * -3"]);
        assert_eq!(trace.steps.last().map(|s| s.result), Some(-9.0));
    }

    #[test]
    fn trace_is_silent_unless_detailed() {
        let tree = Expression::binary(num(1.0), Operator::Plus, num(2.0));
        let mut trace = EvaluationTrace::new(false);
        evaluate_traced(&tree, &mut trace).unwrap();
        assert!(trace.steps.is_empty());
    }

    #[test]
    fn overflow_fails() {
        let tree = Expression::binary(num(1e300), Operator::Multiply, num(1e300));
        assert!(matches!(evaluate(&tree), Err(EvalError::Overflow(_))));

        let tree = Expression::binary(num(f64::MAX), Operator::Plus, num(f64::MAX));
        assert!(matches!(evaluate(&tree), Err(EvalError::Overflow(_))));
    }

    #[test]
    fn long_chain_evaluates_without_recursion() {
        let tree = (1..100_000).fold(num(1.0), |tree, _| {
            Expression::binary(tree, Operator::Plus, num(1.0))
        });
        assert_eq!(evaluate(&tree), Ok(100_000.0));

        let mut tree = num(3.0);
        for _ in 0..50_000 {
            tree = Expression::NegatedParenthesis(Box::new(Expression::Parenthesis(Box::new(tree))));
        }
        assert_eq!(evaluate(&tree), Ok(3.0));
    }

    #[test]
    #[should_panic(expected = "empty operand slot")]
    fn empty_slot_is_a_contract_violation() {
        let tree = Expression::pending(num(1.0), Operator::Plus);
        let _ = evaluate(&tree);
    }
}
