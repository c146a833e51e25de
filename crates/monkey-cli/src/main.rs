//! Monkey CLI - tokenizer and parser front end for the Monkey language.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use monkey::{Lexer, ParserError, parse, tokenize};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

const PROMPT: &str = "-> ";

#[derive(Parser)]
#[command(name = "monkey")]
#[command(version)]
#[command(about = "Monkey language lexer and parser", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Starts the interactive prompt (default)
    Repl {
        /// Print the parsed program instead of tokens
        #[arg(long)]
        parse: bool,
    },

    /// Shows file tokens
    Lex {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Shows the parsed program of a file
    Parse {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(command: Option<Commands>) -> Result<(), String> {
    match command {
        None => start_repl(false),
        Some(Commands::Repl { parse }) => start_repl(parse),
        Some(Commands::Lex { input }) => lex_file(&input),
        Some(Commands::Parse { input }) => parse_file(&input),
    }
}

fn read_source(path: &Path) -> Result<String, String> {
    tracing::info!(path = %path.display(), "reading source");
    fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))
}

fn lex_file(path: &Path) -> Result<(), String> {
    let source = read_source(path)?;

    for token in tokenize(&source) {
        println!(
            "{:>4}:{:<4} {}",
            token.start.line_number(),
            token.start.column_number(),
            token
        );
    }
    Ok(())
}

fn parse_file(path: &Path) -> Result<(), String> {
    let source = read_source(path)?;

    match parse(&source) {
        Ok(program) => {
            println!("{}", program);
            Ok(())
        }
        Err(errors) => {
            for error in errors.errors() {
                eprint!(
                    "{}",
                    render_error(&source, &path.display().to_string(), error)
                );
            }
            Err(format!(
                "{} parse error(s) in {}",
                errors.errors().len(),
                path.display()
            ))
        }
    }
}

/// Render an error with the source line it points at and a caret below
/// the offending column.
fn render_error(source: &str, filename: &str, error: &ParserError) -> String {
    let pos = error.pos();
    let line = pos.line_in(source);
    let gutter = pos.line_number().to_string();
    let pad = " ".repeat(gutter.len());

    let mut out = format!("error: {}\n", error);
    out.push_str(&format!(
        "{}--> {}:{}:{}\n",
        pad,
        filename,
        pos.line_number(),
        pos.column_number()
    ));
    out.push_str(&format!("{} |\n", pad));
    out.push_str(&format!("{} | {}\n", gutter, line));
    out.push_str(&format!(
        "{} | {}^\n",
        pad,
        " ".repeat(pos.column_number().saturating_sub(1))
    ));
    out
}

fn greeting() -> String {
    let user = env::var("USER").unwrap_or_else(|_| "there".to_string());
    format!("Hello {}! This is the Monkey programming language!", user)
}

fn start_repl(parse_mode: bool) -> Result<(), String> {
    println!("{}", greeting());
    println!("Feel free to type in commands. Type 'exit' or Ctrl+D to quit");

    let mut rl = DefaultEditor::new().map_err(|e| format!("Failed to create editor: {}", e))?;

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed == "exit" {
                    println!("Goodbye!");
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }
                rl.add_history_entry(trimmed).ok(); // Ignore history errors

                if parse_mode {
                    print_program(&line);
                } else {
                    print_tokens(&line);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(e) => {
                return Err(format!("Readline error: {}", e));
            }
        }
    }

    Ok(())
}

fn print_tokens(line: &str) {
    for token in Lexer::new(line) {
        println!("{}", token);
    }
}

fn print_program(line: &str) {
    match parse(line) {
        Ok(program) => println!("{}", program),
        Err(errors) => {
            eprintln!("Woops! We ran into some monkey business here!");
            for error in errors.errors() {
                eprintln!("\t{}", error);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_to_repl() {
        let cli = Cli::try_parse_from(["monkey"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_cli_subcommands() {
        let cli = Cli::try_parse_from(["monkey", "-vv", "parse", "prog.mk"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Some(Commands::Parse { ref input }) if input == Path::new("prog.mk")
        ));

        let cli = Cli::try_parse_from(["monkey", "repl", "--parse"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Repl { parse: true })));

        let cli = Cli::try_parse_from(["monkey", "lex", "a.mk", "-v"]).unwrap();
        assert_eq!(cli.verbose, 1);
        assert!(matches!(cli.command, Some(Commands::Lex { .. })));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = parse_file(Path::new("/nonexistent/monkey/source.mk")).unwrap_err();
        assert!(err.starts_with("Failed to read /nonexistent/monkey/source.mk"));
    }

    #[test]
    fn test_render_error_points_at_column() {
        let source = "let x = 1;\nlet y 2;\n";
        let errors = parse(source).unwrap_err();
        let expected = [
            "error: expected next token to be =, got INT at line 2, column 7",
            " --> prog.mk:2:7",
            "  |",
            "2 | let y 2;",
            "  |       ^",
            "",
        ]
        .join("\n");
        assert_eq!(render_error(source, "prog.mk", &errors.errors()[0]), expected);
    }

    #[test]
    fn test_greeting_mentions_monkey() {
        assert!(greeting().contains("This is the Monkey programming language!"));
    }
}
