use std::{iter::Peekable, str::Chars};

use crate::token_stream::TokenStream;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenType {
    // Literals
    Identifier,
    Number,

    // Operators. The lexeme distinguishes "+" from "==" etc.
    Operator,
    Assign,

    // Punctuation
    Semicolon,
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,

    // Keywords
    If,
    Else,
    While,
    Print,

    // End of input
    Eof,

    // Never produced by the tokenizer; unrecognized characters are errors
    Unknown,
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenType::Identifier => write!(f, "identifier"),
            TokenType::Number => write!(f, "number"),
            TokenType::Operator => write!(f, "operator"),
            TokenType::Assign => write!(f, "\"=\""),
            TokenType::Semicolon => write!(f, "\";\""),
            TokenType::LeftParen => write!(f, "\"(\""),
            TokenType::RightParen => write!(f, "\")\""),
            TokenType::LeftBrace => write!(f, "\"{{\""),
            TokenType::RightBrace => write!(f, "\"}}\""),
            TokenType::If => write!(f, "\"if\""),
            TokenType::Else => write!(f, "\"else\""),
            TokenType::While => write!(f, "\"while\""),
            TokenType::Print => write!(f, "\"print\""),
            TokenType::Eof => write!(f, "end of input"),
            TokenType::Unknown => write!(f, "unknown token"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub token_type: TokenType,
    pub lexeme: String,
    pub line: usize,
}

impl Token {
    pub fn new(token_type: TokenType, lexeme: impl Into<String>, line: usize) -> Self {
        Self {
            token_type,
            lexeme: lexeme.into(),
            line,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenizeError {
    #[error("unknown character '{character}' at line {line}")]
    UnknownCharacter { character: char, line: usize },
}

/// Tokenizes the whole source, ending with a single `Eof` token.
pub fn tokens(source: &str) -> Result<TokenStream, TokenizeError> {
    let mut tokenizer = Tokenizer::new(source);
    let mut tokens = TokenStream::new();

    loop {
        let token = tokenizer.token()?;
        let done = token.token_type == TokenType::Eof;
        tokens.enqueue(token);
        if done {
            break;
        }
    }

    Ok(tokens)
}

pub struct Tokenizer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
        }
    }

    pub fn token(&mut self) -> Result<Token, TokenizeError> {
        self.skip_whitespace();

        // The token's line is where it begins, not where it ends.
        let line = self.line;

        let Some(&c) = self.chars.peek() else {
            return Ok(Token::new(TokenType::Eof, "", line));
        };

        match c {
            c if c.is_ascii_alphabetic() || c == '_' => Ok(self.identifier(line)),
            c if c.is_ascii_digit() => Ok(self.number(line)),
            '+' | '-' | '*' | '/' | '%' => {
                self.advance();
                Ok(Token::new(TokenType::Operator, c, line))
            }
            '=' => {
                self.advance();
                if self.advance_if('=') {
                    Ok(Token::new(TokenType::Operator, "==", line))
                } else {
                    Ok(Token::new(TokenType::Assign, "=", line))
                }
            }
            '!' => {
                self.advance();
                if self.advance_if('=') {
                    Ok(Token::new(TokenType::Operator, "!=", line))
                } else {
                    Ok(Token::new(TokenType::Operator, "!", line))
                }
            }
            '<' | '>' => {
                self.advance();
                if self.advance_if('=') {
                    Ok(Token::new(TokenType::Operator, format!("{c}="), line))
                } else {
                    Ok(Token::new(TokenType::Operator, c, line))
                }
            }
            ';' => {
                self.advance();
                Ok(Token::new(TokenType::Semicolon, ";", line))
            }
            '(' => {
                self.advance();
                Ok(Token::new(TokenType::LeftParen, "(", line))
            }
            ')' => {
                self.advance();
                Ok(Token::new(TokenType::RightParen, ")", line))
            }
            '{' => {
                self.advance();
                Ok(Token::new(TokenType::LeftBrace, "{", line))
            }
            '}' => {
                self.advance();
                Ok(Token::new(TokenType::RightBrace, "}", line))
            }
            _ => Err(TokenizeError::UnknownCharacter { character: c, line }),
        }
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c == Some('\n') {
            self.line += 1;
        }
        c
    }

    fn advance_if(&mut self, expected: char) -> bool {
        if self.chars.peek() == Some(&expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.chars.peek().is_some_and(|c| c.is_whitespace()) {
            self.advance();
        }
    }

    fn identifier(&mut self, line: usize) -> Token {
        let mut lexeme = String::new();
        while let Some(&c) = self.chars.peek() {
            if !c.is_ascii_alphanumeric() && c != '_' {
                break;
            }
            lexeme.push(c);
            self.advance();
        }

        let token_type = match lexeme.as_str() {
            "if" => TokenType::If,
            "else" => TokenType::Else,
            "while" => TokenType::While,
            "print" => TokenType::Print,
            _ => TokenType::Identifier,
        };

        Token::new(token_type, lexeme, line)
    }

    fn number(&mut self, line: usize) -> Token {
        let mut lexeme = String::new();
        while let Some(&c) = self.chars.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            lexeme.push(c);
            self.advance();
        }
        Token::new(TokenType::Number, lexeme, line)
    }
}
