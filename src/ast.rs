use crate::token::TokenType;
use std::fmt;
use std::fmt::Formatter;

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    IntegerLiteral(i64),
    BooleanLiteral(bool),
    Prefix {
        operator: TokenType,
        operand: Box<Expression>,
    },
    Infix {
        operator: TokenType,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    If {
        condition: Box<Expression>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Let { name: Identifier, value: Expression },
    Return { value: Expression },
    Expression { value: Expression },
    Block(BlockStatement),
}

/// Root of the tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

pub trait Visitor<T> {
    type Output;
    fn visit(&mut self, n: &T) -> Self::Output;
}

impl Expression {
    pub fn accept<V: Visitor<Expression>>(&self, v: &mut V) -> V::Output {
        v.visit(self)
    }
    /// Literal text of the token the expression starts with.
    pub fn token_literal(&self) -> String {
        match self {
            Expression::Identifier(ident) => ident.name.clone(),
            Expression::IntegerLiteral(x) => x.to_string(),
            Expression::BooleanLiteral(x) => x.to_string(),
            Expression::Prefix { operator, .. } => operator.to_string(),
            Expression::Infix { operator, .. } => operator.to_string(),
            Expression::If { .. } => String::from("if"),
        }
    }
}

impl Statement {
    pub fn accept<V: Visitor<Statement>>(&self, v: &mut V) -> V::Output {
        v.visit(self)
    }
    pub fn token_literal(&self) -> String {
        match self {
            Statement::Let { .. } => String::from("let"),
            Statement::Return { .. } => String::from("return"),
            Statement::Expression { value } => value.token_literal(),
            Statement::Block(block) => block.token_literal(),
        }
    }
}

impl BlockStatement {
    pub fn token_literal(&self) -> String {
        String::from("{")
    }
}

impl Program {
    pub fn token_literal(&self) -> String {
        self.statements
            .first()
            .map_or_else(String::new, |s| s.token_literal())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(x) => write!(f, "{}", x),
            Expression::IntegerLiteral(x) => write!(f, "{}", x),
            Expression::BooleanLiteral(x) => write!(f, "{}", x),
            Expression::Prefix { operator, operand } => write!(f, "({}{})", operator, operand),
            Expression::Infix {
                operator,
                left,
                right,
            } => write!(f, "({} {} {})", left, operator, right),
            Expression::If {
                condition,
                consequence,
                alternative,
            } => {
                write!(f, "if{} {}", condition, consequence)?;
                if let Some(alternative) = alternative {
                    write!(f, "else {}", alternative)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let { name, value } => write!(f, "let {} = {};", name, value),
            Statement::Return { value } => write!(f, "return {};", value),
            Statement::Expression { value } => write!(f, "{}", value),
            Statement::Block(block) => write!(f, "{}", block),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

/// Renders the tree as S-expressions, one top-level statement per line.
pub struct AstPrinter {}

impl AstPrinter {
    pub fn print(&mut self, program: &Program) -> String {
        program
            .statements
            .iter()
            .map(|stmt| stmt.accept(self))
            .collect::<Vec<String>>()
            .join("\n")
    }
    fn parenthesize(&mut self, name: &str, args: Vec<&Expression>) -> String {
        let mut x = String::from("(");
        x.push_str(name);
        for arg in args {
            x.push_str(" ");
            x.push_str(arg.accept(self).as_str());
        }
        x.push_str(")");
        x
    }
    fn block(&mut self, block: &BlockStatement) -> String {
        let mut x = String::from("(block");
        for stmt in &block.statements {
            x.push_str(" ");
            x.push_str(stmt.accept(self).as_str());
        }
        x.push_str(")");
        x
    }
}

impl Visitor<Expression> for AstPrinter {
    type Output = String;
    fn visit(&mut self, n: &Expression) -> String {
        match n {
            Expression::Identifier(x) => x.name.clone(),
            Expression::IntegerLiteral(x) => x.to_string(),
            Expression::BooleanLiteral(x) => x.to_string(),
            Expression::Prefix { operator, operand } => {
                self.parenthesize(&operator.to_string(), vec![&**operand])
            }
            Expression::Infix {
                operator,
                left,
                right,
            } => self.parenthesize(&operator.to_string(), vec![&**left, &**right]),
            Expression::If {
                condition,
                consequence,
                alternative,
            } => {
                let mut x = format!("(if {} {}", condition.accept(self), self.block(consequence));
                if let Some(alternative) = alternative {
                    x.push_str(" ");
                    x.push_str(self.block(alternative).as_str());
                }
                x.push_str(")");
                x
            }
        }
    }
}

impl Visitor<Statement> for AstPrinter {
    type Output = String;
    fn visit(&mut self, n: &Statement) -> String {
        match n {
            Statement::Let { name, value } => format!("(let {} {})", name, value.accept(self)),
            Statement::Return { value } => self.parenthesize("return", vec![value]),
            Statement::Expression { value } => value.accept(self),
            Statement::Block(block) => self.block(block),
        }
    }
}

#[cfg(test)]
mod ast_tests {
    use crate::ast::{AstPrinter, BlockStatement, Expression, Identifier, Program, Statement};
    use crate::token::TokenType;

    fn int(x: i64) -> Box<Expression> {
        Box::new(Expression::IntegerLiteral(x))
    }

    #[test]
    fn basic_ast_test() {
        let expression = Expression::Infix {
            operator: TokenType::Asterisk,
            left: Box::new(Expression::Prefix {
                operator: TokenType::Minus,
                operand: int(123),
            }),
            right: int(45),
        };
        let mut visitor = AstPrinter {};
        assert_eq!(expression.accept(&mut visitor), "(* (- 123) 45)");
        assert_eq!(expression.to_string(), "((-123) * 45)");
        assert_eq!(expression.token_literal(), "*");
    }

    #[test]
    fn statements_display() {
        let program = Program {
            statements: vec![
                Statement::Let {
                    name: Identifier {
                        name: String::from("my_var"),
                    },
                    value: Expression::Identifier(Identifier {
                        name: String::from("another_var"),
                    }),
                },
                Statement::Return {
                    value: Expression::BooleanLiteral(true),
                },
            ],
        };
        assert_eq!(program.to_string(), "let my_var = another_var;return true;");
        assert_eq!(program.token_literal(), "let");
    }

    #[test]
    fn if_printing() {
        let expression = Expression::If {
            condition: Box::new(Expression::Infix {
                operator: TokenType::Less,
                left: int(1),
                right: int(2),
            }),
            consequence: BlockStatement {
                statements: vec![Statement::Expression {
                    value: Expression::IntegerLiteral(10),
                }],
            },
            alternative: Some(BlockStatement {
                statements: vec![Statement::Return {
                    value: Expression::IntegerLiteral(20),
                }],
            }),
        };
        assert_eq!(expression.to_string(), "if(1 < 2) 10else return 20;");
        let mut visitor = AstPrinter {};
        assert_eq!(
            expression.accept(&mut visitor),
            "(if (< 1 2) (block 10) (block (return 20)))"
        );
    }
}
