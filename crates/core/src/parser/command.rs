//! Command and behavior declarations: parameters, guards, action bodies.

use super::Parser;
use crate::ast::*;
use crate::error::Diagnostic;
use crate::lexer::Token;

impl<'a> Parser<'a> {
    /// `command name(params) [returns Type] { body }` or
    /// `command name(params) => action`.
    pub(super) fn parse_command(&mut self) -> Result<Command, Diagnostic> {
        self.advance(); // command
        let name = self.declared_name("command")?;
        let mut command = Command {
            name,
            ..Default::default()
        };

        self.expect_lparen()?;
        while self.peek() != &Token::RParen {
            let parameter = self.parse_parameter()?;
            command.parameters.push(parameter);
            if self.peek() == &Token::Comma {
                self.advance();
            }
        }
        self.expect_rparen()?;

        if self.is_word("returns") {
            self.advance();
            command.returns = Some(self.parse_type()?);
        }

        if self.peek() == &Token::FatArrow {
            // `name() => action` sugar for a single-action body
            self.advance();
            let action = self.parse_action()?;
            command.actions.push(action);
        } else {
            self.expect_lbrace()?;
            loop {
                self.skip_separators();
                match self.peek().clone() {
                    Token::RBrace => break,
                    Token::Eof => return Err(self.err("unterminated command body")),
                    Token::Word(w) if w == "when" || w == "guard" => {
                        self.advance();
                        let guard = self.parse_expression()?;
                        command.guards.push(guard);
                    }
                    Token::Word(w) if w == "constraint" => {
                        let constraint = self.parse_constraint()?;
                        command.constraints.push(constraint);
                    }
                    Token::Word(w) if ActionKind::from_keyword(&w).is_some() => {
                        let action = self.parse_action()?;
                        command.actions.push(action);
                    }
                    other => {
                        return Err(
                            self.err(format!("expected an action or guard, got {:?}", other))
                        )
                    }
                }
            }
            self.expect_rbrace()?;
        }

        // emits mirrors every emit action, in order
        for action in &command.actions {
            if action.kind == ActionKind::Emit {
                if let Some(event) = &action.target {
                    command.emits.push(event.clone());
                }
            }
        }
        Ok(command)
    }

    /// `[optional] name: Type [= default]`
    fn parse_parameter(&mut self) -> Result<Parameter, Diagnostic> {
        let mut required = true;
        if self.is_word("optional") {
            self.advance();
            required = false;
        }
        let name = self.declared_name("parameter")?;
        self.expect_colon()?;
        let data_type = self.parse_type()?;
        let default_value = if self.peek() == &Token::Assign {
            self.advance();
            Some(self.parse_expression()?)
        } else {
            None
        };
        Ok(Parameter {
            name,
            data_type,
            required,
            default_value,
        })
    }

    /// `on trigger[(params)] [when guard] { actions }` — `behavior on` is a
    /// synonym for `on`. Inline form: `on trigger => action`.
    pub(super) fn parse_behavior(&mut self) -> Result<Behavior, Diagnostic> {
        if self.is_word("behavior") {
            self.advance();
            self.expect_word("on")?;
        } else {
            self.advance(); // on
        }
        // The trigger names an event; it is a reference, not a declaration
        let event = self.take_word()?;
        let mut parameters = Vec::new();
        if self.peek() == &Token::LParen {
            self.advance();
            while self.peek() != &Token::RParen {
                parameters.push(self.take_word()?);
                if self.peek() == &Token::Comma {
                    self.advance();
                }
            }
            self.expect_rparen()?;
        }

        let mut guards = Vec::new();
        while self.is_word("when") || self.is_word("guard") {
            self.advance();
            guards.push(self.parse_expression()?);
        }

        let actions = if self.peek() == &Token::FatArrow {
            self.advance();
            vec![self.parse_action()?]
        } else {
            self.parse_action_block()?
        };

        Ok(Behavior {
            name: event.clone(),
            trigger: Trigger { event, parameters },
            guards,
            actions,
        })
    }

    fn parse_action_block(&mut self) -> Result<Vec<Action>, Diagnostic> {
        self.expect_lbrace()?;
        let mut actions = Vec::new();
        loop {
            self.skip_separators();
            match self.peek() {
                Token::RBrace => break,
                Token::Eof => return Err(self.err("unterminated action block")),
                _ => actions.push(self.parse_action()?),
            }
        }
        self.expect_rbrace()?;
        Ok(actions)
    }

    /// One action: `mutate target = expr`, `emit Event`,
    /// `compute [target =] expr`, `effect expr`, `publish expr`,
    /// `persist [expr]`.
    pub(super) fn parse_action(&mut self) -> Result<Action, Diagnostic> {
        let word = match self.peek() {
            Token::Word(w) => w.clone(),
            other => return Err(self.err(format!("expected an action, got {:?}", other))),
        };
        let kind = ActionKind::from_keyword(&word)
            .ok_or_else(|| self.err(format!("expected an action, got '{}'", word)))?;
        self.advance();

        match kind {
            ActionKind::Mutate => {
                let target = self.take_word()?;
                self.expect(&Token::Assign, "'='")?;
                let expression = self.parse_expression()?;
                Ok(Action {
                    kind,
                    target: Some(target),
                    expression,
                })
            }
            ActionKind::Emit => {
                let event = self.take_word()?;
                Ok(Action {
                    kind,
                    target: Some(event),
                    expression: Expression::null_literal(),
                })
            }
            ActionKind::Compute => {
                let mut target = None;
                if matches!(self.peek(), Token::Word(_)) && self.peek_at(1) == &Token::Assign {
                    target = Some(self.take_word()?);
                    self.advance(); // =
                }
                let expression = self.parse_expression()?;
                Ok(Action {
                    kind,
                    target,
                    expression,
                })
            }
            ActionKind::Effect | ActionKind::Publish => {
                let expression = self.parse_expression()?;
                Ok(Action {
                    kind,
                    target: None,
                    expression,
                })
            }
            ActionKind::Persist => {
                let expression = if self.starts_expression() {
                    self.parse_expression()?
                } else {
                    // Bare `persist` carries a null-literal expression
                    Expression::null_literal()
                };
                Ok(Action {
                    kind,
                    target: None,
                    expression,
                })
            }
        }
    }

    /// Would the current token begin an expression rather than the next
    /// body member? Used only by the optional-payload `persist` action.
    fn starts_expression(&self) -> bool {
        match self.peek() {
            Token::RBrace | Token::Eof | Token::Comma | Token::Semicolon => false,
            Token::Word(w) => {
                ActionKind::from_keyword(w).is_none()
                    && !matches!(w.as_str(), "when" | "guard" | "constraint")
            }
            _ => true,
        }
    }
}
