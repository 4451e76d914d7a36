//! Tokenizer for the ARM notation.
//!
//! Every token carries the line and column it starts at, so load errors
//! point back into the source.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

/// 1-based source location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Entity,     // entity
    Pk,         // pk
    PrimaryKey, // primary_key
    Ident(String),
    Str(String),

    LBrace, // {
    RBrace, // }
    LParen, // (
    RParen, // )
    Comma,  // ,
    Colon,  // :
    Dot,    // .

    Eof,
}

impl Token {
    fn keyword(word: &str) -> Option<Token> {
        match word {
            "entity" => Some(Token::Entity),
            "pk" => Some(Token::Pk),
            "primary_key" => Some(Token::PrimaryKey),
            _ => None,
        }
    }
}

/// Words the lexer reserves; names spelled like these must be quoted.
pub const KEYWORDS: [&str; 3] = ["entity", "pk", "primary_key"];

/// True if `word` lexes as a single identifier token.
pub fn is_identifier(word: &str) -> bool {
    !word.is_empty() && word.chars().all(is_word_char) && !KEYWORDS.contains(&word)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub pos: Position,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexError {
    #[error("{pos}: unexpected character {ch:?}")]
    UnexpectedChar { ch: char, pos: Position },
    #[error("{pos}: string is never closed")]
    UnterminatedString { pos: Position },
}

pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    fn pos(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Whitespace and `#` line comments.
    fn skip_trivia(&mut self) {
        let mut in_comment = false;
        while let Some(&c) = self.chars.peek() {
            match c {
                '\n' => in_comment = false,
                '#' => in_comment = true,
                c if in_comment || c.is_whitespace() => {}
                _ => return,
            }
            self.bump();
        }
    }

    fn word(&mut self, first: char) -> Token {
        let mut word = String::from(first);
        while let Some(&c) = self.chars.peek().filter(|c| is_word_char(**c)) {
            word.push(c);
            self.bump();
        }
        Token::keyword(&word).unwrap_or(Token::Ident(word))
    }

    /// Body of a `"..."` literal; `\n`, `\t` and `\<c>` escapes.
    fn quoted(&mut self, start: Position) -> Result<Token, LexError> {
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(Token::Str(text)),
                Some('\\') => match self.bump() {
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some(c) => text.push(c),
                    None => break,
                },
                Some(c) => text.push(c),
                None => break,
            }
        }
        Err(LexError::UnterminatedString { pos: start })
    }

    pub fn next_token(&mut self) -> Result<Spanned, LexError> {
        self.skip_trivia();
        let pos = self.pos();

        let Some(c) = self.bump() else {
            return Ok(Spanned {
                token: Token::Eof,
                pos,
            });
        };

        let token = match c {
            '{' => Token::LBrace,
            '}' => Token::RBrace,
            '(' => Token::LParen,
            ')' => Token::RParen,
            ',' => Token::Comma,
            ':' => Token::Colon,
            '.' => Token::Dot,
            '"' => self.quoted(pos)?,
            c if is_word_char(c) => self.word(c),
            ch => return Err(LexError::UnexpectedChar { ch, pos }),
        };

        Ok(Spanned { token, pos })
    }

    /// All tokens, ending with [`Token::Eof`].
    pub fn tokenize(mut self) -> Result<Vec<Spanned>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let spanned = self.next_token()?;
            let done = spanned.token == Token::Eof;
            tokens.push(spanned);
            if done {
                return Ok(tokens);
            }
        }
    }
}
