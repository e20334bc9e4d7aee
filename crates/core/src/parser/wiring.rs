//! Runtime-wiring declarations: policies, stores, events, flows, effects,
//! exposures, compositions.

use indexmap::IndexMap;

use super::Parser;
use crate::ast::*;
use crate::error::Diagnostic;
use crate::lexer::Token;

impl<'a> Parser<'a> {
    /// `policy name [action]: expression ["message"]` — the action keyword
    /// is also accepted directly after the colon. Omitted action is `all`.
    pub(super) fn parse_policy(&mut self) -> Result<Policy, Diagnostic> {
        self.advance(); // policy
        let name = self.declared_name("policy")?;
        let mut action = None;
        if let Token::Word(w) = self.peek() {
            action = PolicyAction::from_keyword(w);
            if action.is_some() {
                self.advance();
            }
        }
        self.expect_colon()?;
        if action.is_none() {
            if let Token::Word(w) = self.peek() {
                action = PolicyAction::from_keyword(w);
                if action.is_some() {
                    self.advance();
                }
            }
        }
        let expression = self.parse_expression()?;
        let message = if matches!(self.peek(), Token::Str(_)) {
            Some(self.take_str()?)
        } else {
            None
        };
        Ok(Policy {
            name,
            action: action.unwrap_or_default(),
            expression,
            message,
        })
    }

    /// `store Entity in target [{ key: value, ... }]`
    pub(super) fn parse_store(&mut self) -> Result<Store, Diagnostic> {
        self.advance(); // store
        let entity = self.take_word()?;
        self.expect_word("in")?;
        let target_word = self.take_word()?;
        let target = StoreTarget::from_keyword(&target_word)
            .ok_or_else(|| self.err(format!("unknown store target '{}'", target_word)))?;
        let config = if self.peek() == &Token::LBrace {
            Some(self.parse_config_block()?)
        } else {
            None
        };
        Ok(Store {
            entity,
            target,
            config,
        })
    }

    /// `event Name: {fields}` | `event Name: Type` | `event Name: "channel"`
    pub(super) fn parse_event(&mut self) -> Result<Event, Diagnostic> {
        self.advance(); // event
        let name = self.declared_name("event")?;
        self.expect_colon()?;
        let mut channel = name.clone();
        let payload = match self.peek().clone() {
            Token::Str(_) => {
                channel = self.take_str()?;
                EventPayload::Fields { fields: Vec::new() }
            }
            Token::LBrace => {
                self.advance();
                let mut fields = Vec::new();
                loop {
                    self.skip_separators();
                    match self.peek() {
                        Token::RBrace => break,
                        Token::Eof => return Err(self.err("unterminated event payload")),
                        _ => {}
                    }
                    let field_name = self.take_word()?;
                    self.expect_colon()?;
                    let data_type = self.parse_type()?;
                    fields.push(EventField {
                        name: field_name,
                        data_type,
                    });
                }
                self.expect_rbrace()?;
                EventPayload::Fields { fields }
            }
            _ => EventPayload::Type(self.parse_type()?),
        };
        Ok(Event {
            name,
            channel,
            payload,
        })
    }

    /// `flow name([label:] InputType) -> OutputType { step [when cond]: target ... }`
    pub(super) fn parse_flow(&mut self) -> Result<Flow, Diagnostic> {
        self.advance(); // flow
        let name = self.declared_name("flow")?;
        self.expect_lparen()?;
        // Optional parameter label; only the type is recorded
        if matches!(self.peek(), Token::Word(_)) && self.peek_at(1) == &Token::Colon {
            self.advance();
            self.advance();
        }
        let input = self.parse_type()?;
        self.expect_rparen()?;
        self.expect(&Token::ThinArrow, "'->'")?;
        let output = self.parse_type()?;

        self.expect_lbrace()?;
        let mut steps = Vec::new();
        loop {
            self.skip_separators();
            match self.peek() {
                Token::RBrace => break,
                Token::Eof => return Err(self.err("unterminated flow body")),
                _ => {}
            }
            let step_name = self.take_word()?;
            let condition = if self.is_word("when") {
                self.advance();
                Some(self.parse_expression()?)
            } else {
                None
            };
            self.expect_colon()?;
            let target = self.take_word()?;
            steps.push(FlowStep {
                name: step_name,
                condition,
                target,
            });
        }
        self.expect_rbrace()?;
        Ok(Flow {
            name,
            input,
            output,
            steps,
        })
    }

    /// `effect name: kind { key: value, ... }`
    pub(super) fn parse_effect(&mut self) -> Result<Effect, Diagnostic> {
        self.advance(); // effect
        let name = self.declared_name("effect")?;
        self.expect_colon()?;
        let kind_word = self.take_word()?;
        let kind = EffectKind::from_keyword(&kind_word)
            .ok_or_else(|| self.err(format!("unknown effect kind '{}'", kind_word)))?;
        let config = if self.peek() == &Token::LBrace {
            self.parse_config_block()?
        } else {
            IndexMap::new()
        };
        Ok(Effect { name, kind, config })
    }

    /// `expose Entity as protocol [server] ["name"] [{ middleware: x; ops }]`
    pub(super) fn parse_expose(&mut self) -> Result<Exposure, Diagnostic> {
        self.advance(); // expose
        let entity = self.take_word()?;
        self.expect_word("as")?;
        let protocol_word = self.take_word()?;
        let protocol = Protocol::from_keyword(&protocol_word)
            .ok_or_else(|| self.err(format!("unknown protocol '{}'", protocol_word)))?;
        let mut generate_server = false;
        if self.is_word("server") {
            self.advance();
            generate_server = true;
        }
        let name = if matches!(self.peek(), Token::Str(_)) {
            self.take_str()?
        } else {
            entity.to_lowercase()
        };

        let mut operations = Vec::new();
        let mut middleware = Vec::new();
        if self.peek() == &Token::LBrace {
            self.advance();
            loop {
                self.skip_separators();
                match self.peek() {
                    Token::RBrace => break,
                    Token::Eof => return Err(self.err("unterminated expose body")),
                    _ => {}
                }
                if self.is_word("middleware") {
                    self.advance();
                    self.expect_colon()?;
                    middleware.push(self.take_word()?);
                    while self.peek() == &Token::Comma {
                        self.advance();
                        middleware.push(self.take_word()?);
                    }
                } else {
                    let word = self.take_word()?;
                    let operation = Operation::from_keyword(&word)
                        .ok_or_else(|| self.err(format!("unknown operation '{}'", word)))?;
                    operations.push(operation);
                }
            }
            self.expect_rbrace()?;
        }
        Ok(Exposure {
            entity,
            protocol,
            name,
            generate_server,
            operations,
            middleware,
        })
    }

    /// `compose Name { Component [as alias] ...
    ///   connect From.output -> To.input [with transform] ... }`
    pub(super) fn parse_compose(&mut self) -> Result<Composition, Diagnostic> {
        self.advance(); // compose
        let name = self.declared_name("composition")?;
        self.expect_lbrace()?;
        let mut composition = Composition {
            name,
            ..Default::default()
        };
        loop {
            self.skip_separators();
            match self.peek() {
                Token::RBrace => break,
                Token::Eof => return Err(self.err("unterminated compose body")),
                _ => {}
            }
            if self.is_word("connect") {
                self.advance();
                let from_component = self.take_word()?;
                self.expect(&Token::Dot, "'.'")?;
                let output = self.take_word()?;
                self.expect(&Token::ThinArrow, "'->'")?;
                let to_component = self.take_word()?;
                self.expect(&Token::Dot, "'.'")?;
                let input = self.take_word()?;
                let transform = if self.is_word("with") {
                    self.advance();
                    Some(self.take_word()?)
                } else {
                    None
                };
                composition.connections.push(Connection {
                    from: ConnectionFrom {
                        component: from_component,
                        output,
                    },
                    to: ConnectionTo {
                        component: to_component,
                        input,
                    },
                    transform,
                });
            } else {
                let entity = self.take_word()?;
                let alias = if self.is_word("as") {
                    self.advance();
                    Some(self.take_word()?)
                } else {
                    None
                };
                composition.components.push(Component { entity, alias });
            }
        }
        self.expect_rbrace()?;
        Ok(composition)
    }

    /// `{ key: value, ... }` — the shared literal-or-nested-object config
    /// grammar. Values are ordinary expressions; keys accept any word.
    pub(super) fn parse_config_block(&mut self) -> Result<IndexMap<String, Expression>, Diagnostic> {
        self.expect_lbrace()?;
        let mut config = IndexMap::new();
        loop {
            self.skip_separators();
            match self.peek() {
                Token::RBrace => break,
                Token::Eof => return Err(self.err("unterminated config block")),
                _ => {}
            }
            let key = self.take_word()?;
            self.expect_colon()?;
            let value = self.parse_expression()?;
            config.insert(key, value);
        }
        self.expect_rbrace()?;
        Ok(config)
    }
}
