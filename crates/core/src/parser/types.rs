use super::Parser;
use crate::ast::Type;
use crate::error::Diagnostic;
use crate::lexer::Token;

impl<'a> Parser<'a> {
    /// `name [< generic >] [?]` — type positions accept any word, since the
    /// primitive names are themselves reserved words.
    pub(super) fn parse_type(&mut self) -> Result<Type, Diagnostic> {
        let name = self.take_word()?;
        let mut generic = None;
        if self.peek() == &Token::Lt {
            self.advance();
            generic = Some(Box::new(self.parse_type()?));
            self.expect(&Token::Gt, "'>' closing generic")?;
        }
        let nullable = if self.peek() == &Token::Question {
            self.advance();
            true
        } else {
            false
        };
        Ok(Type {
            name,
            nullable,
            generic,
        })
    }
}
