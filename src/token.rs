use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum_macros::{Display, EnumIter};

// The ordinal of each kind indexes the parser's rule table, so new kinds
// need a matching row there.
#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum TokenType {
    #[strum(to_string = "ILLEGAL")] Illegal,
    #[strum(to_string = "EOF")] EOF,

    // Identifiers and literals.
    #[strum(to_string = "IDENT")] Identifier,
    #[strum(to_string = "INT")] Int,
    #[strum(to_string = "STRING")] String,

    // Operators.
    #[strum(to_string = "=")] Assign,
    #[strum(to_string = "+")] Plus,
    #[strum(to_string = "-")] Minus,
    #[strum(to_string = "!")] Bang,
    #[strum(to_string = "*")] Asterisk,
    #[strum(to_string = "/")] Slash,
    #[strum(to_string = "<")] Less,
    #[strum(to_string = ">")] Greater,
    #[strum(to_string = "==")] EqualEqual,
    #[strum(to_string = "!=")] BangEqual,

    // Delimiters.
    #[strum(to_string = ",")] Comma,
    #[strum(to_string = ";")] Semicolon,
    #[strum(to_string = "(")] LeftParen,
    #[strum(to_string = ")")] RightParen,
    #[strum(to_string = "{")] LeftBrace,
    #[strum(to_string = "}")] RightBrace,

    // Keywords.
    #[strum(to_string = "FUNCTION")] Function,
    #[strum(to_string = "LET")] Let,
    #[strum(to_string = "TRUE")] True,
    #[strum(to_string = "FALSE")] False,
    #[strum(to_string = "IF")] If,
    #[strum(to_string = "ELSE")] Else,
    #[strum(to_string = "RETURN")] Return,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub tokentype: TokenType,
    pub literal: String,
    pub line: usize,
}

impl Token {
    pub fn new(tokentype: TokenType, literal: &str, line: usize) -> Token {
        Token {
            tokentype,
            literal: literal.to_string(),
            line,
        }
    }
    pub fn is(&self, tokentype: TokenType) -> bool {
        self.tokentype == tokentype
    }
}
