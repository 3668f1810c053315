use crate::ast::{BlockStatement, Expression, Program, Statement, Visitor};
use crate::object::{Object, ObjectType};
use crate::token::TokenType;
use std::error::Error;
use std::fmt;
use std::fmt::Formatter;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeError {
    TypeMismatch {
        left: ObjectType,
        operator: TokenType,
        right: ObjectType,
    },
    UnknownPrefixOperator {
        operator: TokenType,
        right: ObjectType,
    },
    UnknownInfixOperator {
        left: ObjectType,
        operator: TokenType,
        right: ObjectType,
    },
    DivisionByZero,
    IntegerOverflow(String),
    IdentifierNotFound(String),
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::TypeMismatch {
                left,
                operator,
                right,
            } => write!(f, "type mismatch: {} {} {}", left, operator, right),
            RuntimeError::UnknownPrefixOperator { operator, right } => {
                write!(f, "unknown operator: {}{}", operator, right)
            }
            RuntimeError::UnknownInfixOperator {
                left,
                operator,
                right,
            } => write!(f, "unknown operator: {} {} {}", left, operator, right),
            RuntimeError::DivisionByZero => write!(f, "division by zero"),
            RuntimeError::IntegerOverflow(expr) => write!(f, "integer overflow: {}", expr),
            RuntimeError::IdentifierNotFound(name) => write!(f, "identifier not found: {}", name),
        }
    }
}

impl Error for RuntimeError {}

/// Anything that stops a sequence of statements early.
#[derive(Debug)]
pub enum Interrupt {
    Return(Rc<Object>),
    Error(RuntimeError),
}

impl From<RuntimeError> for Interrupt {
    fn from(e: RuntimeError) -> Interrupt {
        Interrupt::Error(e)
    }
}

pub type EvalResult = Result<Rc<Object>, Interrupt>;

/// Any tree node that can be handed to [`Evaluator::eval`].
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Program(&'a Program),
    Statement(&'a Statement),
    Block(&'a BlockStatement),
    Expression(&'a Expression),
}

impl<'a> From<&'a Program> for Node<'a> {
    fn from(n: &'a Program) -> Node<'a> {
        Node::Program(n)
    }
}

impl<'a> From<&'a Statement> for Node<'a> {
    fn from(n: &'a Statement) -> Node<'a> {
        Node::Statement(n)
    }
}

impl<'a> From<&'a BlockStatement> for Node<'a> {
    fn from(n: &'a BlockStatement) -> Node<'a> {
        Node::Block(n)
    }
}

impl<'a> From<&'a Expression> for Node<'a> {
    fn from(n: &'a Expression) -> Node<'a> {
        Node::Expression(n)
    }
}

pub struct Evaluator {
    true_object: Rc<Object>,
    false_object: Rc<Object>,
    null_object: Rc<Object>,
    pub trace: bool,
}

impl Default for Evaluator {
    fn default() -> Evaluator {
        Evaluator::new()
    }
}

impl Evaluator {
    pub fn new() -> Evaluator {
        Evaluator {
            true_object: Rc::new(Object::Boolean(true)),
            false_object: Rc::new(Object::Boolean(false)),
            null_object: Rc::new(Object::Null),
            trace: false,
        }
    }

    /// Reduces a node to a value. Runtime errors come back as
    /// `Object::Error`. A `return` is unwrapped at program level; evaluating
    /// a statement or block it escapes from yields `Object::ReturnValue`.
    pub fn eval<'a, N: Into<Node<'a>>>(&mut self, node: N) -> Rc<Object> {
        let result = match node.into() {
            Node::Program(program) => self.eval_program(program),
            Node::Statement(stmt) => stmt.accept(self),
            Node::Block(block) => self.eval_block(block),
            Node::Expression(expr) => expr.accept(self),
        };
        match result {
            Ok(value) => value,
            Err(Interrupt::Return(value)) => Rc::new(Object::ReturnValue(value)),
            Err(Interrupt::Error(e)) => Rc::new(Object::Error(e.to_string())),
        }
    }

    pub fn null(&self) -> Rc<Object> {
        Rc::clone(&self.null_object)
    }

    pub fn boolean(&self, value: bool) -> Rc<Object> {
        if value {
            Rc::clone(&self.true_object)
        } else {
            Rc::clone(&self.false_object)
        }
    }

    // Only the null and false singletons are falsy; integer zero is truthy.
    fn is_truthy(&self, obj: &Rc<Object>) -> bool {
        if Rc::ptr_eq(obj, &self.null_object) {
            false
        } else if Rc::ptr_eq(obj, &self.true_object) {
            true
        } else if Rc::ptr_eq(obj, &self.false_object) {
            false
        } else {
            true
        }
    }

    fn eval_program(&mut self, program: &Program) -> EvalResult {
        let mut result = self.null();
        for stmt in &program.statements {
            let outcome = stmt.accept(self);
            if self.trace {
                trace_statement(stmt, &outcome);
            }
            result = match outcome {
                Ok(value) => value,
                Err(Interrupt::Return(value)) => return Ok(value),
                Err(e) => return Err(e),
            };
        }
        Ok(result)
    }

    // Returns and errors leave the block still wrapped so enclosing blocks
    // stop too; only the program unwraps a return.
    fn eval_block(&mut self, block: &BlockStatement) -> EvalResult {
        let mut result = self.null();
        for stmt in &block.statements {
            result = stmt.accept(self)?;
        }
        Ok(result)
    }

    fn eval_prefix(&self, operator: TokenType, right: Rc<Object>) -> EvalResult {
        match (operator, &*right) {
            (TokenType::Bang, _) => Ok(self.boolean(!self.is_truthy(&right))),
            (TokenType::Minus, Object::Integer(x)) => match x.checked_neg() {
                Some(value) => Ok(Rc::new(Object::Integer(value))),
                None => Err(RuntimeError::IntegerOverflow(format!("-{}", x)).into()),
            },
            _ => Err(RuntimeError::UnknownPrefixOperator {
                operator,
                right: right.object_type(),
            }
            .into()),
        }
    }

    fn eval_infix(&self, operator: TokenType, left: Rc<Object>, right: Rc<Object>) -> EvalResult {
        let left_type = left.object_type();
        let right_type = right.object_type();
        if left_type != right_type {
            return Err(RuntimeError::TypeMismatch {
                left: left_type,
                operator,
                right: right_type,
            }
            .into());
        }
        if let (Object::Integer(l), Object::Integer(r)) = (&*left, &*right) {
            return self.eval_integer_infix(operator, *l, *r);
        }
        // Identity comparison, valid because booleans and null are singletons.
        match operator {
            TokenType::EqualEqual => Ok(self.boolean(Rc::ptr_eq(&left, &right))),
            TokenType::BangEqual => Ok(self.boolean(!Rc::ptr_eq(&left, &right))),
            _ => Err(RuntimeError::UnknownInfixOperator {
                left: left_type,
                operator,
                right: right_type,
            }
            .into()),
        }
    }

    fn eval_integer_infix(&self, operator: TokenType, l: i64, r: i64) -> EvalResult {
        let value = match operator {
            TokenType::Plus => l.checked_add(r),
            TokenType::Minus => l.checked_sub(r),
            TokenType::Asterisk => l.checked_mul(r),
            TokenType::Slash => {
                if r == 0 {
                    return Err(RuntimeError::DivisionByZero.into());
                }
                l.checked_div(r)
            }
            TokenType::Less => return Ok(self.boolean(l < r)),
            TokenType::Greater => return Ok(self.boolean(l > r)),
            TokenType::EqualEqual => return Ok(self.boolean(l == r)),
            TokenType::BangEqual => return Ok(self.boolean(l != r)),
            _ => {
                return Err(RuntimeError::UnknownInfixOperator {
                    left: ObjectType::Integer,
                    operator,
                    right: ObjectType::Integer,
                }
                .into())
            }
        };
        match value {
            Some(value) => Ok(Rc::new(Object::Integer(value))),
            None => Err(RuntimeError::IntegerOverflow(format!("{} {} {}", l, operator, r)).into()),
        }
    }

    fn eval_if(
        &mut self,
        condition: &Expression,
        consequence: &BlockStatement,
        alternative: &Option<BlockStatement>,
    ) -> EvalResult {
        let condition = condition.accept(self)?;
        if self.is_truthy(&condition) {
            self.eval_block(consequence)
        } else if let Some(alternative) = alternative {
            self.eval_block(alternative)
        } else {
            Ok(self.null())
        }
    }
}

fn trace_statement(stmt: &Statement, outcome: &EvalResult) {
    match outcome {
        Ok(value) => eprintln!("[trace] {} => {}", stmt, value),
        Err(Interrupt::Return(value)) => eprintln!("[trace] {} => return {}", stmt, value),
        Err(Interrupt::Error(e)) => eprintln!("[trace] {} => error: {}", stmt, e),
    }
}

impl Visitor<Expression> for Evaluator {
    type Output = EvalResult;
    fn visit(&mut self, expr: &Expression) -> EvalResult {
        match expr {
            Expression::Identifier(ident) => {
                Err(RuntimeError::IdentifierNotFound(ident.name.clone()).into())
            }
            Expression::IntegerLiteral(x) => Ok(Rc::new(Object::Integer(*x))),
            Expression::BooleanLiteral(x) => Ok(self.boolean(*x)),
            Expression::Prefix { operator, operand } => {
                let right = operand.accept(self)?;
                self.eval_prefix(*operator, right)
            }
            Expression::Infix {
                operator,
                left,
                right,
            } => {
                // Right first, so its error wins when both sides fail.
                let right = right.accept(self)?;
                let left = left.accept(self)?;
                self.eval_infix(*operator, left, right)
            }
            Expression::If {
                condition,
                consequence,
                alternative,
            } => self.eval_if(condition, consequence, alternative),
        }
    }
}

impl Visitor<Statement> for Evaluator {
    type Output = EvalResult;
    fn visit(&mut self, stmt: &Statement) -> EvalResult {
        match stmt {
            // Nothing to bind into yet; the value is still evaluated so its
            // errors surface.
            Statement::Let { value, .. } => {
                value.accept(self)?;
                Ok(self.null())
            }
            Statement::Return { value } => Err(Interrupt::Return(value.accept(self)?)),
            Statement::Expression { value } => value.accept(self),
            Statement::Block(block) => self.eval_block(block),
        }
    }
}

#[cfg(test)]
mod evaluator_tests {
    use crate::ast::{BlockStatement, Statement};
    use crate::evaluator::Evaluator;
    use crate::object::Object;
    use crate::parser;
    use std::rc::Rc;

    fn eval(source: &str) -> Rc<Object> {
        let (program, errors) = parser::parse(source);
        assert!(errors.is_empty(), "{}: {:?}", source, errors);
        Evaluator::new().eval(&program)
    }

    fn assert_integer(source: &str, expected: i64) {
        assert_eq!(*eval(source), Object::Integer(expected), "{}", source);
    }

    fn assert_boolean(source: &str, expected: bool) {
        assert_eq!(*eval(source), Object::Boolean(expected), "{}", source);
    }

    fn assert_error(source: &str, expected: &str) {
        assert_eq!(
            *eval(source),
            Object::Error(expected.to_string()),
            "{}",
            source
        );
    }

    #[test]
    fn integer_expressions() {
        let cases = [
            ("5", 5),
            ("-10", -10),
            ("5 + 5 + 5 + 5 - 10", 10),
            ("2 * 2 * 2 * 2 * 2", 32),
            ("-50 + 100 + -50", 0),
            ("5 * 2 + 10", 20),
            ("5 + 2 * 10", 25),
            ("50 / 2 * 2 + 10", 60),
            ("2 * (5 + 10)", 30),
            ("3 * 3 * 3 + 10", 37),
            ("(5 + 10 * 2 + 15 / 3) * 2 + -10", 50),
        ];
        for (source, expected) in cases.iter() {
            assert_integer(source, *expected);
        }
    }

    #[test]
    fn division_truncates_toward_zero() {
        assert_integer("7 / 2", 3);
        assert_integer("-7 / 2", -3);
        assert_integer("7 / -2", -3);
        assert_integer("-7 / -2", 3);
    }

    #[test]
    fn arithmetic_matches_host() {
        let operands = [-17i64, -3, -1, 1, 2, 5, 1000];
        for a in operands.iter() {
            for b in operands.iter() {
                assert_integer(&format!("{} + {}", a, b), a + b);
                assert_integer(&format!("{} - {}", a, b), a - b);
                assert_integer(&format!("{} * {}", a, b), a * b);
                assert_integer(&format!("{} / {}", a, b), a / b);
                let eq = *eval(&format!("{} == {}", a, b)) == Object::Boolean(true);
                let ne = *eval(&format!("{} != {}", a, b)) == Object::Boolean(true);
                assert_eq!(eq, a == b);
                assert_ne!(eq, ne);
            }
        }
    }

    #[test]
    fn boolean_expressions() {
        let cases = [
            ("true", true),
            ("false", false),
            ("1 < 2", true),
            ("1 > 2", false),
            ("1 < 1", false),
            ("1 == 1", true),
            ("1 != 1", false),
            ("1 == 2", false),
            ("true == true", true),
            ("false == false", true),
            ("true == false", false),
            ("true != false", true),
            ("(1 < 2) == true", true),
            ("(1 > 2) == true", false),
            ("(1 < 2) == (3 < 4)", true),
        ];
        for (source, expected) in cases.iter() {
            assert_boolean(source, *expected);
        }
    }

    #[test]
    fn booleans_are_singletons() {
        let mut evaluator = Evaluator::new();
        let (program, _) = parser::parse("1 < 2");
        let a = evaluator.eval(&program);
        let (program, _) = parser::parse("true");
        let b = evaluator.eval(&program);
        assert!(Rc::ptr_eq(&a, &b));

        let (program, _) = parser::parse("5");
        let x = evaluator.eval(&program);
        let y = evaluator.eval(&program);
        assert!(!Rc::ptr_eq(&x, &y));
        assert_eq!(x, y);
    }

    #[test]
    fn bang_operator() {
        let cases = [
            ("!true", false),
            ("!false", true),
            ("!5", false),
            ("!0", false),
            ("!!true", true),
            ("!!false", false),
            ("!!5", true),
            ("!!0", true),
        ];
        for (source, expected) in cases.iter() {
            assert_boolean(source, *expected);
        }
    }

    #[test]
    fn if_else_expressions() {
        assert_integer("if (true) { 10 }", 10);
        assert_eq!(*eval("if (false) { 10 }"), Object::Null);
        assert_integer("if (1) { 10 }", 10);
        assert_integer("if (1 < 2) { 10 }", 10);
        assert_eq!(*eval("if (1 > 2) { 10 }"), Object::Null);
        assert_integer("if (1 > 2) { 10 } else { 20 }", 20);
        assert_integer("if (1 < 2) { 10 } else { 20 }", 10);
        assert_eq!(*eval("if (true) { }"), Object::Null);
    }

    #[test]
    fn integer_zero_is_truthy() {
        assert_integer("if (0) { 1 } else { 2 }", 1);
    }

    #[test]
    fn return_statements() {
        assert_integer("return 10;", 10);
        assert_integer("return 10; 9;", 10);
        assert_integer("return 2 * 5; 9;", 10);
        assert_integer("9; return 2 * 5; 9;", 10);
        assert_integer("if (true) { return 5; 1 / 0; }", 5);
        assert_integer(
            "if (10 > 1) { if (10 > 1) { return 10; } return 1; }",
            10,
        );
    }

    #[test]
    fn block_keeps_return_wrapped() {
        let (program, errors) = parser::parse("if (true) { return 5; 10; }");
        assert!(errors.is_empty());
        let block: &BlockStatement = match &program.statements[0] {
            Statement::Expression {
                value: crate::ast::Expression::If { consequence, .. },
            } => consequence,
            other => panic!("unexpected statement {:?}", other),
        };
        let mut evaluator = Evaluator::new();
        assert_eq!(
            *evaluator.eval(block),
            Object::ReturnValue(Rc::new(Object::Integer(5)))
        );
        assert_eq!(*evaluator.eval(&program), Object::Integer(5));
    }

    #[test]
    fn error_handling() {
        let cases = [
            ("5 + true;", "type mismatch: INTEGER + BOOLEAN"),
            ("5 + true; 5;", "type mismatch: INTEGER + BOOLEAN"),
            ("-true", "unknown operator: -BOOLEAN"),
            ("true + false;", "unknown operator: BOOLEAN + BOOLEAN"),
            ("5; true + false; 5", "unknown operator: BOOLEAN + BOOLEAN"),
            (
                "if (10 > 1) { true + false; }",
                "unknown operator: BOOLEAN + BOOLEAN",
            ),
            (
                "if (10 > 1) { if (10 > 1) { return true + false; } return 1; }",
                "unknown operator: BOOLEAN + BOOLEAN",
            ),
            ("true < false", "unknown operator: BOOLEAN < BOOLEAN"),
            ("-(true + 1)", "type mismatch: BOOLEAN + INTEGER"),
            ("foobar", "identifier not found: foobar"),
            ("(true + 1) + (1 + true)", "type mismatch: INTEGER + BOOLEAN"),
            ("a + b", "identifier not found: b"),
            ("let x = 1 + true; 5", "type mismatch: INTEGER + BOOLEAN"),
        ];
        for (source, expected) in cases.iter() {
            assert_error(source, expected);
        }
    }

    #[test]
    fn host_faults_become_errors() {
        assert_error("10 / 0", "division by zero");
        assert_error("if (true) { 1 / (2 - 2) }", "division by zero");
        assert_error(
            "9223372036854775807 + 1",
            "integer overflow: 9223372036854775807 + 1",
        );
        assert_error(
            "-9223372036854775807 - 2",
            "integer overflow: -9223372036854775807 - 2",
        );
        assert_error(
            "-(-9223372036854775807 - 1)",
            "integer overflow: --9223372036854775808",
        );
    }

    #[test]
    fn let_and_empty_programs_yield_null() {
        assert_eq!(*eval("let x = 5;"), Object::Null);
        assert_eq!(*eval(""), Object::Null);
    }
}
