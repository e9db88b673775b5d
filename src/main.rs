use std::env;
use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use rustcalc::{format_tokens, run_calculation, CalcError, EvaluationTrace};

const USAGE: &str = "Usage: rustcalc [--details] [--tree] \"3 * 3 + 4\"";

#[derive(Default)]
struct Options {
    details: bool,
    tree: bool,
    expression: Option<String>,
}

fn main() -> Result<()> {
    let options = parse_args(env::args().skip(1))?;

    match options.expression.as_deref() {
        Some(expression) => {
            let output = render(expression, options.details, options.tree)
                .with_context(|| format!("cannot calculate \"{expression}\""))?;
            print!("{output}");
            Ok(())
        }
        None => run_interactive(options.tree),
    }
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<Options> {
    let mut options = Options::default();

    for arg in args {
        match arg.as_str() {
            "--details" | "-d" => options.details = true,
            "--tree" | "-t" => options.tree = true,
            "--help" | "-h" => {
                println!("{USAGE}");
                println!("Without an expression, reads one expression per line from stdin.");
                std::process::exit(0);
            }
            flag if flag.starts_with("--") => bail!("unknown option '{flag}'\n{USAGE}"),
            _ if options.expression.is_some() => {
                bail!("invalid number of arguments\n{USAGE}")
            }
            _ => options.expression = Some(arg),
        }
    }

    Ok(options)
}

/// Calculates `input` and renders the result, the tree and the step trace.
fn render(input: &str, details: bool, tree: bool) -> Result<String, CalcError> {
    let mut trace = EvaluationTrace::new(details);
    let calculation = run_calculation(input, &mut trace)?;

    let mut output = format!(
        "{} = {}\n",
        format_tokens(&calculation.tokens),
        calculation.result
    );
    if tree {
        output.push_str(&format!("  Tree: {}\n", calculation.tree));
    }
    if details && !trace.steps.is_empty() {
        output.push_str("  Step-by-step evaluation:\n");
        for (i, step) in trace.steps.iter().enumerate() {
            output.push_str(&format!("  Step {}: {} = {}\n", i + 1, step.operation, step.result));
        }
    }
    Ok(output)
}

fn run_interactive(tree: bool) -> Result<()> {
    println!("Rust Console Calculator");
    println!("Supports: +, -, *, /, parentheses and unary minus");
    println!("Add 'details' before an expression for step-by-step evaluation, 'q' to quit");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("\nExpression: ");
        stdout.flush().context("failed to flush stdout")?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).context("failed to read input")? == 0 {
            return Ok(());
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input.to_lowercase().as_str(), "q" | "quit" | "exit") {
            println!("Goodbye!");
            return Ok(());
        }

        let (details, expression) = match input.strip_prefix("details ") {
            Some(rest) => (true, rest.trim()),
            None => (false, input),
        };

        match render(expression, details, tree) {
            Ok(output) => print!("  {output}"),
            Err(e) => println!("  {expression} = Error: {e}"),
        }
    }
}
