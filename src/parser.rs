use crate::ast::{BlockStatement, Expression, Identifier, Program, Statement};
use crate::scanner::Scanner;
use crate::token::{Token, TokenType};
use std::error::Error;
use std::fmt;
use std::fmt::Formatter;
use std::mem;

#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    UnexpectedToken {
        expected: TokenType,
        got: TokenType,
        line: usize,
    },
    NoPrefixRule {
        tokentype: TokenType,
        line: usize,
    },
    InvalidInteger {
        literal: String,
        line: usize,
    },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::UnexpectedToken { line, .. } => *line,
            ParseError::NoPrefixRule { line, .. } => *line,
            ParseError::InvalidInteger { line, .. } => *line,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedToken { expected, got, .. } => write!(
                f,
                "expected next token to be {}, got {} instead",
                expected, got
            ),
            ParseError::NoPrefixRule { tokentype, .. } => {
                write!(f, "no prefix parse function for token kind {}", tokentype)
            }
            ParseError::InvalidInteger { literal, .. } => {
                write!(f, "could not parse {} as integer", literal)
            }
        }
    }
}

impl Error for ParseError {}

#[derive(Debug, PartialEq, PartialOrd, Clone, Copy)]
enum Precedence {
    Lowest,
    Equals,      // == !=
    LessGreater, // < >
    Sum,         // + -
    Product,     // * /
    Prefix,      // -x !x
    Call,        // f(x)
}

struct ParseRule {
    prefix: Option<fn(&mut Parser) -> Option<Expression>>,
    infix: Option<fn(&mut Parser, Expression) -> Option<Expression>>,
    precedence: Precedence,
}

impl ParseRule {
    fn get_rule(tt: TokenType) -> &'static ParseRule {
        &RULES[u8::from(tt) as usize]
    }
}

macro_rules! prefix_fn {
    (None) => {
        None
    };
    ($method:ident) => {
        Some(|p: &mut Parser| p.$method())
    };
}

macro_rules! infix_fn {
    (None) => {
        None
    };
    ($method:ident) => {
        Some(|p: &mut Parser, left: Expression| p.$method(left))
    };
}

macro_rules! mkrules {
    ($($prefix:tt, $infix:tt, $precedence:tt) ; +) => {
        &[
        $(
            ParseRule {
                prefix: prefix_fn!($prefix),
                infix: infix_fn!($infix),
                precedence: Precedence::$precedence
            }
        ),+
        ]
    };
}

// One row per TokenType, in declaration order.
#[rustfmt::skip]
static RULES : &[ParseRule] = mkrules!(
    None,          None,  Lowest;      // Illegal
    None,          None,  Lowest;      // EOF
    identifier,    None,  Lowest;      // Identifier
    integer,       None,  Lowest;      // Int
    None,          None,  Lowest;      // String
    None,          None,  Lowest;      // Assign
    None,          infix, Sum;         // Plus
    prefix,        infix, Sum;         // Minus
    prefix,        None,  Lowest;      // Bang
    None,          infix, Product;     // Asterisk
    None,          infix, Product;     // Slash
    None,          infix, LessGreater; // Less
    None,          infix, LessGreater; // Greater
    None,          infix, Equals;      // EqualEqual
    None,          infix, Equals;      // BangEqual
    None,          None,  Lowest;      // Comma
    None,          None,  Lowest;      // Semicolon
    grouping,      None,  Call;        // LeftParen
    None,          None,  Lowest;      // RightParen
    None,          None,  Lowest;      // LeftBrace
    None,          None,  Lowest;      // RightBrace
    None,          None,  Lowest;      // Function
    None,          None,  Lowest;      // Let
    boolean,       None,  Lowest;      // True
    boolean,       None,  Lowest;      // False
    if_expression, None,  Lowest;      // If
    None,          None,  Lowest;      // Else
    None,          None,  Lowest       // Return
);

/// Parses a whole source string, returning the program together with every
/// syntax error found along the way.
pub fn parse(source: &str) -> (Program, Vec<ParseError>) {
    let mut parser = Parser::new(source);
    let program = parser.parse_program();
    (program, parser.errors)
}

pub struct Parser<'a> {
    scanner: Scanner<'a>,
    current: Token,
    peek: Token,
    errors: Vec<ParseError>,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Parser<'a> {
        let mut scanner = Scanner::new(source);
        let current = scanner.next_token();
        let peek = scanner.next_token();
        Parser {
            scanner,
            current,
            peek,
            errors: Vec::new(),
            depth: 0,
        }
    }
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }
    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::default();
        while !self.current.is(TokenType::EOF) {
            match self.statement() {
                Some(stmt) => program.statements.push(stmt),
                None => self.synchronize(),
            }
            self.next_token();
        }
        program
    }
    fn next_token(&mut self) {
        let next = self.scanner.next_token();
        self.current = mem::replace(&mut self.peek, next);
    }
    fn expect_peek(&mut self, tt: TokenType) -> bool {
        if self.peek.is(tt) {
            self.next_token();
            true
        } else {
            self.errors.push(ParseError::UnexpectedToken {
                expected: tt,
                got: self.peek.tokentype,
                line: self.peek.line,
            });
            false
        }
    }
    fn peek_precedence(&self) -> Precedence {
        ParseRule::get_rule(self.peek.tokentype).precedence
    }
    fn current_precedence(&self) -> Precedence {
        ParseRule::get_rule(self.current.tokentype).precedence
    }
    // Skips the rest of a malformed statement. A `}` only ends the skip
    // inside a block, and is never stepped over there.
    fn synchronize(&mut self) {
        let in_block = self.depth > 0;
        loop {
            match self.current.tokentype {
                TokenType::Semicolon | TokenType::EOF => return,
                TokenType::RightBrace if in_block => return,
                _ => (),
            }
            match self.peek.tokentype {
                TokenType::Let | TokenType::Return | TokenType::EOF => return,
                TokenType::RightBrace if in_block => return,
                _ => (),
            }
            self.next_token();
        }
    }
    fn statement(&mut self) -> Option<Statement> {
        match self.current.tokentype {
            TokenType::Let => self.let_statement(),
            TokenType::Return => self.return_statement(),
            _ => self.expression_statement(),
        }
    }
    fn let_statement(&mut self) -> Option<Statement> {
        if !self.expect_peek(TokenType::Identifier) {
            return None;
        }
        let name = Identifier {
            name: self.current.literal.clone(),
        };
        if !self.expect_peek(TokenType::Assign) {
            return None;
        }
        self.next_token();
        let value = self.expression(Precedence::Lowest)?;
        if self.peek.is(TokenType::Semicolon) {
            self.next_token();
        }
        Some(Statement::Let { name, value })
    }
    fn return_statement(&mut self) -> Option<Statement> {
        self.next_token();
        let value = self.expression(Precedence::Lowest)?;
        if self.peek.is(TokenType::Semicolon) {
            self.next_token();
        }
        Some(Statement::Return { value })
    }
    fn expression_statement(&mut self) -> Option<Statement> {
        let value = self.expression(Precedence::Lowest)?;
        if self.peek.is(TokenType::Semicolon) {
            self.next_token();
        }
        Some(Statement::Expression { value })
    }
    fn expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let prefix = match ParseRule::get_rule(self.current.tokentype).prefix {
            Some(f) => f,
            None => {
                self.errors.push(ParseError::NoPrefixRule {
                    tokentype: self.current.tokentype,
                    line: self.current.line,
                });
                return None;
            }
        };
        let mut left = prefix(self)?;
        while precedence < self.peek_precedence() {
            let infix = match ParseRule::get_rule(self.peek.tokentype).infix {
                Some(f) => f,
                None => return Some(left),
            };
            self.next_token();
            left = infix(self, left)?;
        }
        Some(left)
    }
    fn identifier(&mut self) -> Option<Expression> {
        Some(Expression::Identifier(Identifier {
            name: self.current.literal.clone(),
        }))
    }
    fn integer(&mut self) -> Option<Expression> {
        match self.current.literal.parse::<i64>() {
            Ok(value) => Some(Expression::IntegerLiteral(value)),
            Err(_) => {
                self.errors.push(ParseError::InvalidInteger {
                    literal: self.current.literal.clone(),
                    line: self.current.line,
                });
                None
            }
        }
    }
    fn boolean(&mut self) -> Option<Expression> {
        Some(Expression::BooleanLiteral(self.current.is(TokenType::True)))
    }
    fn grouping(&mut self) -> Option<Expression> {
        self.next_token();
        let expr = self.expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenType::RightParen) {
            return None;
        }
        Some(expr)
    }
    fn prefix(&mut self) -> Option<Expression> {
        let operator = self.current.tokentype;
        self.next_token();
        let operand = self.expression(Precedence::Prefix)?;
        Some(Expression::Prefix {
            operator,
            operand: Box::new(operand),
        })
    }
    fn infix(&mut self, left: Expression) -> Option<Expression> {
        let operator = self.current.tokentype;
        let precedence = self.current_precedence();
        self.next_token();
        let right = self.expression(precedence)?;
        Some(Expression::Infix {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }
    fn if_expression(&mut self) -> Option<Expression> {
        if !self.expect_peek(TokenType::LeftParen) {
            return None;
        }
        self.next_token();
        let condition = self.expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenType::RightParen) {
            return None;
        }
        if !self.expect_peek(TokenType::LeftBrace) {
            return None;
        }
        let consequence = self.block()?;
        let mut alternative = None;
        if self.peek.is(TokenType::Else) {
            self.next_token();
            if !self.expect_peek(TokenType::LeftBrace) {
                return None;
            }
            alternative = Some(self.block()?);
        }
        Some(Expression::If {
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }
    // Expects the current token to be `{` and leaves the parser on the
    // matching `}`.
    fn block(&mut self) -> Option<BlockStatement> {
        self.depth += 1;
        let block = self.block_statements();
        self.depth -= 1;
        block
    }
    fn block_statements(&mut self) -> Option<BlockStatement> {
        let mut statements = Vec::new();
        self.next_token();
        while !self.current.is(TokenType::RightBrace) {
            if self.current.is(TokenType::EOF) {
                self.errors.push(ParseError::UnexpectedToken {
                    expected: TokenType::RightBrace,
                    got: TokenType::EOF,
                    line: self.current.line,
                });
                return None;
            }
            match self.statement() {
                Some(stmt) => statements.push(stmt),
                None => {
                    self.synchronize();
                    if self.current.is(TokenType::RightBrace) {
                        break;
                    }
                }
            }
            self.next_token();
        }
        Some(BlockStatement { statements })
    }
}
