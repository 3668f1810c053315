pub mod ast;
pub mod evaluator;
pub mod object;
pub mod parser;
pub mod scanner;
pub mod token;

use ast::Program;
use evaluator::Evaluator;
use object::Object;
use parser::ParseError;
use std::rc::Rc;

/// Parses and evaluates `source` with an existing evaluator. Syntax errors
/// stop before evaluation; runtime errors come back as `Object::Error`.
pub fn interpret(source: &str, evaluator: &mut Evaluator) -> Result<Rc<Object>, Vec<ParseError>> {
    interpret_with(source, evaluator, |_| ())
}

/// Same as [`interpret`], handing the parsed program to `inspect` before it
/// is evaluated. Not called when parsing fails.
pub fn interpret_with<F: FnOnce(&Program)>(
    source: &str,
    evaluator: &mut Evaluator,
    inspect: F,
) -> Result<Rc<Object>, Vec<ParseError>> {
    let (program, errors) = parser::parse(source);
    if !errors.is_empty() {
        return Err(errors);
    }
    inspect(&program);
    Ok(evaluator.eval(&program))
}
