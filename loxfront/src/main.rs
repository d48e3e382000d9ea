use std::fs;

use clap::{Parser, Subcommand, ValueEnum};

use loxfront::diagnostics::Diagnostics;
use loxfront::error::FrontendError;
use loxfront::ir::printer;
use loxfront::parser::{self, ParserConfig, config::DEFAULT_MAX_DEPTH, lexer};

#[derive(Parser)]
#[command(name = "loxfront")]
#[command(about = "Scanner and parser inspection for Lox sources", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tokens of a source file
    Tokens {
        input: String,
    },

    /// Parse a source file and print its syntax tree
    Ast {
        input: String,

        /// How to render the tree
        #[arg(short, long, value_enum, default_value_t = Format::Sexpr)]
        format: Format,

        /// Deepest nesting accepted before a statement is abandoned
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Fully parenthesized, e.g. (+ 1 (* 3 2))
    Sexpr,
    /// Source text that parses back to the same tree
    Source,
    /// Rust debug output
    Debug,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Tokens { input } => {
            let source = read_source(&input)?;
            let mut diagnostics = Diagnostics::new();

            for token in lexer::tokenize(&source, &mut diagnostics) {
                println!("{}", token);
            }

            report(&input, &diagnostics)?;
        }
        Commands::Ast { input, format, max_depth } => {
            let source = read_source(&input)?;
            let config = ParserConfig::default().with_max_depth(max_depth);
            let output = parser::parse_with_config(&source, &config);

            match format {
                Format::Sexpr => println!("{}", printer::sexpr_program(&output.statements)),
                Format::Source => println!("{}", printer::source_program(&output.statements)),
                Format::Debug => println!("{:#?}", output.statements),
            }

            report(&input, &output.diagnostics)?;
        }
    }

    Ok(())
}

fn read_source(path: &str) -> Result<String, FrontendError> {
    Ok(fs::read_to_string(path)?)
}

fn report(path: &str, diagnostics: &Diagnostics) -> Result<(), FrontendError> {
    if diagnostics.is_empty() {
        return Ok(());
    }

    eprint!("{}", diagnostics);
    Err(FrontendError::Rejected {
        path: path.to_string(),
        count: diagnostics.len(),
    })
}
