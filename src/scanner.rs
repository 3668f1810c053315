use crate::token::{Token, TokenType};
use phf::phf_map;
use std::iter::Peekable;
use std::str::CharIndices;

// Note: current becomes self.iter.peek()?.0
pub struct Scanner<'a> {
    source: &'a str,
    iter: Peekable<CharIndices<'a>>,
    start: usize,
    line: usize,
}

/// Scans the whole source up front. The returned vector always ends with
/// exactly one EOF token.
pub fn scan_tokens(source: &str) -> Vec<Token> {
    let mut scanner = Scanner::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = scanner.next_token();
        let done = token.is(TokenType::EOF);
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Scanner<'a> {
        Scanner {
            source,
            iter: source.char_indices().peekable(),
            start: 0,
            line: 1,
        }
    }

    /// Produces the next token. Once the input is exhausted every call
    /// returns an EOF token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();
        self.start = self.current();
        let c = match self.iter.next() {
            None => return Token::new(TokenType::EOF, "", self.line),
            Some((_, c)) => c,
        };
        match c {
            '=' => {
                if self.next_if('=') {
                    self.token(TokenType::EqualEqual)
                } else {
                    self.token(TokenType::Assign)
                }
            }
            '!' => {
                if self.next_if('=') {
                    self.token(TokenType::BangEqual)
                } else {
                    self.token(TokenType::Bang)
                }
            }
            '+' => self.token(TokenType::Plus),
            '-' => self.token(TokenType::Minus),
            '*' => self.token(TokenType::Asterisk),
            '/' => self.token(TokenType::Slash),
            '<' => self.token(TokenType::Less),
            '>' => self.token(TokenType::Greater),
            ',' => self.token(TokenType::Comma),
            ';' => self.token(TokenType::Semicolon),
            '(' => self.token(TokenType::LeftParen),
            ')' => self.token(TokenType::RightParen),
            '{' => self.token(TokenType::LeftBrace),
            '}' => self.token(TokenType::RightBrace),
            '"' => self.string(),
            '0'..='9' => self.number(),
            'a'..='z' | 'A'..='Z' | '_' => self.identifier(),
            _ => self.token(TokenType::Illegal),
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some((_, c)) = self.iter.peek() {
            match c {
                ' ' | '\r' | '\t' => {
                    self.iter.next();
                }
                '\n' => {
                    self.line += 1;
                    self.iter.next();
                }
                '/' => {
                    let mut lookahead = self.iter.clone();
                    lookahead.next();
                    match lookahead.peek() {
                        Some((_, '/')) => {
                            while let Some((_, c)) = self.iter.peek() {
                                if *c == '\n' {
                                    break;
                                }
                                self.iter.next();
                            }
                        }
                        _ => return,
                    }
                }
                _ => return,
            }
        }
    }
    fn current(&mut self) -> usize {
        match self.iter.peek() {
            None => self.source.len(),
            Some((idx, _)) => *idx,
        }
    }
    fn token(&mut self, tokentype: TokenType) -> Token {
        let current = self.current();
        Token::new(tokentype, &self.source[self.start..current], self.line)
    }
    fn next_if(&mut self, expected: char) -> bool {
        if let Some((_, c)) = self.iter.peek() {
            if *c == expected {
                self.iter.next();
                return true;
            }
        }
        false
    }
    fn string(&mut self) -> Token {
        let line = self.line;
        while let Some((_, c)) = self.iter.peek() {
            match c {
                '"' => break,
                '\n' => {
                    self.line += 1;
                    self.iter.next();
                }
                _ => {
                    self.iter.next();
                }
            }
        }
        if self.iter.next().is_none() {
            return Token::new(TokenType::Illegal, &self.source[self.start..], line);
        }
        let current = self.current();
        Token::new(
            TokenType::String,
            &self.source[self.start + 1..current - 1],
            line,
        )
    }
    fn number(&mut self) -> Token {
        while let Some((_, '0'..='9')) = self.iter.peek() {
            self.iter.next();
        }
        self.token(TokenType::Int)
    }
    fn identifier(&mut self) -> Token {
        while let Some((_, c)) = self.iter.peek() {
            match c {
                '0'..='9' | 'a'..='z' | 'A'..='Z' | '_' => {
                    self.iter.next();
                }
                _ => break,
            }
        }
        let current = self.current();
        match KEYWORDS.get(&self.source[self.start..current]) {
            None => self.token(TokenType::Identifier),
            Some(x) => self.token(*x),
        }
    }
}

static KEYWORDS: phf::Map<&'static str, TokenType> = phf_map! {
    "else" => TokenType::Else,
    "false" => TokenType::False,
    "fn" => TokenType::Function,
    "if" => TokenType::If,
    "let" => TokenType::Let,
    "return" => TokenType::Return,
    "true" => TokenType::True,
};
