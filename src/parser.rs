//! Loader for the ARM notation.
//!
//! ```text
//! entity Movie {
//!     MovieID pk
//!     Name: string
//!     Address.City: "varchar(40)"
//!     "first-name"
//!     primary_key(MovieID)
//! }
//! ```

use crate::arm::{ArmEntity, ArmModel};
use crate::error::ModelError;
use crate::lexer::{LexError, Lexer, Position, Spanned, Token};
use crate::model::{Attribute, DEFAULT_DATA_TYPE};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Lex error: {0}")]
    Lex(#[from] LexError),
    #[error("Model error: {0}")]
    Model(#[from] ModelError),
    #[error("{pos}: unexpected token {found:?}, expected {expected}")]
    Unexpected {
        found: Token,
        expected: &'static str,
        pos: Position,
    },
}

pub struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
}

impl Parser {
    pub fn new(input: &str) -> Result<Self, ParseError> {
        let tokens = Lexer::new(input).tokenize()?;
        Ok(Self { tokens, pos: 0 })
    }

    /// Token `offset` places ahead; the trailing `Eof` repeats forever.
    fn spanned_at(&self, offset: usize) -> &Spanned {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[(self.pos + offset).min(last)]
    }

    fn peek(&self) -> &Token {
        &self.spanned_at(0).token
    }

    fn peek_at(&self, offset: usize) -> &Token {
        &self.spanned_at(offset).token
    }

    fn advance(&mut self) -> Spanned {
        let spanned = self.spanned_at(0).clone();
        self.pos += 1;
        spanned
    }

    fn unexpected(spanned: Spanned, expected: &'static str) -> ParseError {
        ParseError::Unexpected {
            found: spanned.token,
            expected,
            pos: spanned.pos,
        }
    }

    fn expect(&mut self, expected: Token, what: &'static str) -> Result<(), ParseError> {
        let spanned = self.advance();
        if spanned.token == expected {
            Ok(())
        } else {
            Err(Self::unexpected(spanned, what))
        }
    }

    /// Bare identifier or quoted name.
    fn expect_name(&mut self) -> Result<String, ParseError> {
        match self.advance() {
            Spanned {
                token: Token::Ident(s) | Token::Str(s),
                ..
            } => Ok(s),
            spanned => Err(Self::unexpected(spanned, "name")),
        }
    }

    /// Parse a whole ARM model. Any failure aborts; nothing partial is returned.
    pub fn parse(&mut self) -> Result<ArmModel, ParseError> {
        let mut model = ArmModel::new();

        while *self.peek() != Token::Eof {
            if *self.peek() == Token::Entity {
                self.advance();
                model.add_arm_entity(self.parse_entity()?)?;
            } else if self.at_attribute_outside_entity() {
                return Err(ModelError::TypeMismatch {
                    expected: "entity",
                    found: "attribute",
                }
                .into());
            } else {
                let spanned = self.advance();
                return Err(Self::unexpected(spanned, "entity"));
            }
        }

        Ok(model)
    }

    /// `Name: type`, `Name pk` or `Name.Part` at top level.
    fn at_attribute_outside_entity(&self) -> bool {
        matches!(self.peek(), Token::Ident(_) | Token::Str(_))
            && matches!(self.peek_at(1), Token::Colon | Token::Dot | Token::Pk)
    }

    fn parse_entity(&mut self) -> Result<ArmEntity, ParseError> {
        let name = self.expect_name()?;
        self.expect(Token::LBrace, "{")?;

        let mut entity = ArmEntity::new(name);

        while *self.peek() != Token::RBrace {
            match self.peek() {
                Token::PrimaryKey => {
                    self.advance();
                    for key in self.parse_primary_key()? {
                        entity.add_primary_key(key)?;
                    }
                }
                Token::Eof => {
                    let spanned = self.advance();
                    return Err(Self::unexpected(spanned, "}"));
                }
                _ => self.parse_attribute(&mut entity)?,
            }
        }

        self.expect(Token::RBrace, "}")?;
        Ok(entity)
    }

    fn parse_attribute(&mut self, entity: &mut ArmEntity) -> Result<(), ParseError> {
        let name = self.parse_path()?;

        let data_type = if *self.peek() == Token::Colon {
            self.advance();
            match self.advance() {
                Spanned {
                    token: Token::Ident(s) | Token::Str(s),
                    ..
                } => s,
                spanned => return Err(Self::unexpected(spanned, "data type")),
            }
        } else {
            DEFAULT_DATA_TYPE.to_string()
        };

        // `pk` followed by `:` starts the next attribute, named pk
        let is_key = *self.peek() == Token::Pk && *self.peek_at(1) != Token::Colon;
        if is_key {
            self.advance();
        }

        entity.add_attribute(Attribute::with_type(name.clone(), data_type))?;
        if is_key {
            entity.add_primary_key(name)?;
        }
        Ok(())
    }

    /// Dotted attribute name: `Address.City`, or one quoted name. A leading
    /// bare `pk` is accepted as a name.
    fn parse_path(&mut self) -> Result<String, ParseError> {
        let mut path = match self.advance() {
            Spanned {
                token: Token::Ident(s) | Token::Str(s),
                ..
            } => s,
            Spanned { token: Token::Pk, .. } => "pk".to_string(),
            spanned => return Err(Self::unexpected(spanned, "attribute name")),
        };
        while *self.peek() == Token::Dot {
            self.advance();
            path.push('.');
            path.push_str(&self.expect_name()?);
        }
        Ok(path)
    }

    fn parse_primary_key(&mut self) -> Result<Vec<String>, ParseError> {
        self.expect(Token::LParen, "(")?;
        let mut list = vec![self.parse_path()?];
        while *self.peek() == Token::Comma {
            self.advance();
            list.push(self.parse_path()?);
        }
        self.expect(Token::RParen, ")")?;
        Ok(list)
    }
}

/// Load an ARM model from notation source.
pub fn parse_arm(source: &str) -> Result<ArmModel, ParseError> {
    Parser::new(source)?.parse()
}
