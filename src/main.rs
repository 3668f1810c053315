use clap::{App, Arg};
use rmonkey::ast::AstPrinter;
use rmonkey::evaluator::Evaluator;
use std::fs;
use std::io::{self, BufRead, Write};
use std::process;

enum InterpretResult {
    Ok,
    CompileError,
    RuntimeError,
}

struct Options {
    print_ast: bool,
}

fn main() {
    let matches = App::new("rmonkey")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Tree-walking interpreter for a small expression language")
        .arg(
            Arg::with_name("trace")
                .long("trace")
                .help("Prints every top-level statement and its value to stderr"),
        )
        .arg(
            Arg::with_name("print-ast")
                .long("print-ast")
                .help("Prints the parsed program to stderr before evaluating it"),
        )
        .arg(
            Arg::with_name("script")
                .index(1)
                .help("Script to run; starts a prompt when omitted"),
        )
        .get_matches();

    let options = Options {
        print_ast: matches.is_present("print-ast"),
    };
    let mut evaluator = Evaluator::new();
    evaluator.trace = matches.is_present("trace");

    match matches.value_of("script") {
        Some(file) => run_file(file, &options, &mut evaluator),
        None => {
            if let Err(e) = run_prompt(&options, &mut evaluator) {
                eprintln!("{}", e);
                process::exit(74);
            }
        }
    }
}

fn run_file(file: &str, options: &Options, evaluator: &mut Evaluator) {
    let contents = match fs::read_to_string(file) {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("Could not read '{}': {}", file, e);
            process::exit(74);
        }
    };
    match run(&contents, options, evaluator) {
        InterpretResult::CompileError => process::exit(65),
        InterpretResult::RuntimeError => process::exit(70),
        InterpretResult::Ok => (),
    }
}

fn run_prompt(options: &Options, evaluator: &mut Evaluator) -> io::Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    loop {
        print!(">> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            println!();
            return Ok(());
        }
        if line.trim().is_empty() {
            continue;
        }
        // A single evaluator keeps the same singletons for the whole session.
        run(&line, options, evaluator);
    }
}

fn run(source: &str, options: &Options, evaluator: &mut Evaluator) -> InterpretResult {
    let print_ast = options.print_ast;
    let result = rmonkey::interpret_with(source, evaluator, |program| {
        if print_ast {
            eprintln!("{}", AstPrinter {}.print(program));
        }
    });
    match result {
        Err(errors) => {
            for e in &errors {
                eprintln!("[line {}] Parse Error: {}", e.line(), e);
            }
            InterpretResult::CompileError
        }
        Ok(value) => {
            println!("{}", value);
            if value.is_error() {
                InterpretResult::RuntimeError
            } else {
                InterpretResult::Ok
            }
        }
    }
}
