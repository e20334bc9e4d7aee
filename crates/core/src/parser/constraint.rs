//! Constraint declarations. Three syntaxes — inline, block, hybrid — all
//! produce the same node shape, indistinguishable downstream.

use super::Parser;
use crate::ast::{Constraint, Expression, Severity};
use crate::error::Diagnostic;
use crate::lexer::Token;

impl<'a> Parser<'a> {
    pub(super) fn parse_constraint(&mut self) -> Result<Constraint, Diagnostic> {
        self.advance(); // constraint
        let mut overrideable = false;
        if self.is_word("overrideable") {
            self.advance();
            overrideable = true;
        }

        // Block form: `constraint name { field: ... }`
        if matches!(self.peek(), Token::Word(_)) && self.peek_at(1) == &Token::LBrace {
            let name = self.declared_name("constraint")?;
            let mut constraint = self.parse_constraint_block(name)?;
            constraint.overrideable = overrideable;
            return Ok(constraint);
        }

        // Inline head: `name[:severity] expression`. A head with no colon
        // reads the whole tail as the expression, reusing its leading
        // identifier as the constraint name (`constraint amount > 0`).
        let (name, severity, expression) =
            if matches!(self.peek(), Token::Word(_)) && self.peek_at(1) == &Token::Colon {
                let name = self.declared_name("constraint")?;
                self.advance(); // :
                let severity = match self.peek() {
                    Token::Word(w) => Severity::from_keyword(w),
                    _ => None,
                };
                let severity = match severity {
                    Some(severity) => {
                        self.advance();
                        severity
                    }
                    None => Severity::default(),
                };
                let expression = self.parse_expression()?;
                (name, severity, expression)
            } else {
                let name = match self.peek() {
                    Token::Word(w) => w.clone(),
                    _ => String::from("constraint"),
                };
                let expression = self.parse_expression()?;
                (name, Severity::default(), expression)
            };

        let message = if matches!(self.peek(), Token::Str(_)) {
            Some(self.take_str()?)
        } else {
            None
        };

        let mut constraint = Constraint {
            name,
            severity,
            expression,
            message,
            code: None,
            message_template: None,
            details_mapping: None,
            override_policy_ref: None,
            overrideable,
        };

        // Hybrid form: a trailing block supplying presentation fields (the
        // expression already came from the head)
        if self.peek() == &Token::LBrace {
            self.advance();
            loop {
                self.skip_separators();
                match self.peek() {
                    Token::RBrace => break,
                    Token::Eof => return Err(self.err("unterminated constraint block")),
                    _ => {}
                }
                let key = self.take_word()?;
                self.expect_colon()?;
                match key.as_str() {
                    "messageTemplate" => {
                        constraint.message_template = Some(self.take_str()?);
                    }
                    "details" => {
                        constraint.details_mapping = Some(self.parse_config_block()?);
                    }
                    "overridePolicy" => {
                        constraint.override_policy_ref = Some(self.take_word()?);
                    }
                    other => {
                        return Err(self.err(format!("unknown constraint field '{}'", other)))
                    }
                }
            }
            self.expect_rbrace()?;
        }
        Ok(constraint)
    }

    /// `{ expression: ...; severity: ...; code: ...; messageTemplate: ...;
    /// details: {...}; overridePolicy: ... }` — every field optional,
    /// severity defaulting to `block`.
    fn parse_constraint_block(&mut self, name: String) -> Result<Constraint, Diagnostic> {
        self.expect_lbrace()?;
        let mut expression = None;
        let mut severity = Severity::default();
        let mut code = None;
        let mut message_template = None;
        let mut details_mapping = None;
        let mut override_policy_ref = None;
        loop {
            self.skip_separators();
            match self.peek() {
                Token::RBrace => break,
                Token::Eof => return Err(self.err("unterminated constraint block")),
                _ => {}
            }
            let key = self.take_word()?;
            self.expect_colon()?;
            match key.as_str() {
                "expression" => {
                    expression = Some(self.parse_expression()?);
                }
                "severity" => {
                    let word = self.take_word()?;
                    severity = Severity::from_keyword(&word)
                        .ok_or_else(|| self.err(format!("unknown severity '{}'", word)))?;
                }
                "code" => {
                    code = Some(if matches!(self.peek(), Token::Str(_)) {
                        self.take_str()?
                    } else {
                        self.take_word()?
                    });
                }
                "messageTemplate" => {
                    message_template = Some(self.take_str()?);
                }
                "details" => {
                    details_mapping = Some(self.parse_config_block()?);
                }
                "overridePolicy" => {
                    override_policy_ref = Some(self.take_word()?);
                }
                other => return Err(self.err(format!("unknown constraint field '{}'", other))),
            }
        }
        self.expect_rbrace()?;
        Ok(Constraint {
            name,
            severity,
            expression: expression.unwrap_or_else(Expression::null_literal),
            message: None,
            code,
            message_template,
            details_mapping,
            override_policy_ref,
            overrideable: false,
        })
    }
}
