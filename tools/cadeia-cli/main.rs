use cadeia::prelude::*;
use clap::Parser;
use std::fs;
use std::io::{self, Write};

/// A live expression pipeline and evaluation engine CLI
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The expression to evaluate, optionally wrapped in {{ ... }}
    expression: Option<String>,

    /// Path to a JSON file loaded into the $json root
    #[arg(long)]
    json: Option<String>,

    /// Path to a JSON file loaded into the $node root
    #[arg(long)]
    node: Option<String>,

    /// Path to a JSON file loaded into the $env root
    #[arg(long)]
    env: Option<String>,

    /// Run in interactive mode to evaluate expressions in a loop
    #[arg(short = 'i', long, help = "Run in interactive 'human' mode")]
    human: bool,
}

fn main() {
    let cli = Cli::parse();

    let mut context = ContextModel::new();
    load_root(&mut context, RootName::Json, cli.json.as_deref());
    load_root(&mut context, RootName::Node, cli.node.as_deref());
    load_root(&mut context, RootName::Env, cli.env.as_deref());

    for root in RootName::ALL {
        if let Some(error) = context.root_error(root) {
            eprintln!("Warning: '{}' root does not parse: {}", root, error);
        }
    }

    let executor = ExpressionExecutor::new(Arc::new(MethodRegistry::new()));

    if cli.human {
        run_interactive(&executor, &context);
    } else {
        let expression = cli.expression.unwrap_or_else(|| {
            exit_with_error("An expression is required in non-interactive mode.")
        });
        let outcome = executor.execute(&expression, &context);
        print_outcome(&outcome);
        if outcome.is_error {
            std::process::exit(1);
        }
    }
}

fn load_root(context: &mut ContextModel, root: RootName, path: Option<&str>) {
    let Some(path) = path else {
        return;
    };
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read '{}' file '{}': {}", root, path, e))
    });
    context.set_root_text(root, &text);
}

fn run_interactive(executor: &ExpressionExecutor, context: &ContextModel) {
    println!("--- Cadeia Interactive Mode ---");
    println!("Enter an expression per line (e.g. $json?.pedidos?.length).");
    println!("An empty line exits.\n");

    loop {
        let line = prompt_for_input("expression");
        if line.is_empty() {
            break;
        }
        let outcome = executor.execute(&line, context);
        print_outcome(&outcome);
    }
}

fn print_outcome(outcome: &ExecutionOutcome) {
    if outcome.is_error {
        println!("  -> {}", outcome.rendered());
    } else {
        println!("  -> Result: {}", outcome.value);
    }
}

/// A helper function to prompt the user and read a line of input.
fn prompt_for_input(prompt_text: &str) -> String {
    let mut line = String::new();
    print!("> {}: ", prompt_text);
    io::stdout().flush().expect("Failed to flush stdout");

    io::stdin()
        .read_line(&mut line)
        .expect("Failed to read line");
    line.trim().to_string()
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
