use std::io::Write;

use clap::{Args, Parser, Subcommand};

use imp::interpreter::Interpreter;
use imp::tokenizer::TokenType;

#[derive(Debug, Parser)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn command(&self) -> &Command {
        self.command.as_ref().unwrap_or(&Command::Repl)
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a script
    Run(FileArgs),
    /// Interactive prompt
    Repl,
    /// Dump the token stream for a script
    Tokens(FileArgs),
    /// Dump the parsed tree for a script
    Ast(FileArgs),
}

#[derive(Debug, Args)]
struct FileArgs {
    file: String,
}

fn main() {
    let args = Cli::parse();

    match args.command() {
        Command::Repl => {
            repl_command();
        }
        Command::Run(args) => {
            run_command(args);
        }
        Command::Tokens(args) => {
            tokens_command(args);
        }
        Command::Ast(args) => {
            ast_command(args);
        }
    }
}

fn repl_command() {
    println!("imp repl");
    println!("EOF to exit. (Ctrl+D on *nix, Ctrl+Z on Windows)");

    let mut interpreter = Interpreter::default();
    let mut input = String::new();

    loop {
        print!("> ");
        std::io::stdout()
            .flush()
            .expect("should be able to flush stdout");

        let read = std::io::stdin()
            .read_line(&mut input)
            .expect("should be able to read line from stdin");

        if read == 0 {
            break;
        }

        // Variables persist across lines; errors don't end the session.
        if let Err(e) = interpret(input.trim(), &mut interpreter) {
            println!("Error: {}", e);
        }

        input.clear()
    }
}

fn run_command(args: &FileArgs) {
    let source = read_source(&args.file);
    let mut interpreter = Interpreter::default();
    if let Err(e) = interpret(&source, &mut interpreter) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn tokens_command(args: &FileArgs) {
    let source = read_source(&args.file);
    let mut tokenizer = imp::tokenizer::Tokenizer::new(&source);
    let mut line = 0;
    loop {
        let token = match tokenizer.token() {
            Ok(token) => token,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        };

        if token.line != line {
            print!("{:4} ", token.line);
            line = token.line;
        } else {
            print!("   | ");
        }
        println!("{:<12} {}", format!("{:?}", token.token_type), token.lexeme);

        if token.token_type == TokenType::Eof {
            break;
        }
    }
}

fn ast_command(args: &FileArgs) {
    let source = read_source(&args.file);
    let root = imp::tokenizer::tokens(&source)
        .map_err(InterpretError::from)
        .and_then(|tokens| imp::parser::parse(tokens).map_err(InterpretError::from));
    match root {
        Ok(root) => println!("{root}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

fn read_source(file: &str) -> String {
    std::fs::read_to_string(file).expect("should be able to read source file")
}

#[derive(Debug, thiserror::Error)]
enum InterpretError {
    #[error(transparent)]
    Tokenize(#[from] imp::tokenizer::TokenizeError),
    #[error(transparent)]
    Parse(#[from] imp::parser::ParseError),
    #[error(transparent)]
    Runtime(#[from] imp::interpreter::RuntimeError),
}

fn interpret(source: &str, interpreter: &mut Interpreter) -> Result<(), InterpretError> {
    let tokens = imp::tokenizer::tokens(source)?;
    let root = imp::parser::parse(tokens)?;
    interpreter.interpret(&root)?;
    Ok(())
}
