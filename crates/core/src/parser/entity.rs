//! Entity declarations: properties, computed properties, relationships,
//! behaviors, constraints, nested commands and policies, store binding.

use super::{expressions, Parser};
use crate::ast::*;
use crate::error::Diagnostic;
use crate::lexer::{self, Token};

impl<'a> Parser<'a> {
    pub(super) fn parse_entity(&mut self) -> Result<Entity, Diagnostic> {
        self.advance(); // entity
        let name = self.declared_name("entity")?;
        self.expect_lbrace()?;
        let mut entity = Entity {
            name,
            ..Default::default()
        };
        loop {
            self.skip_separators();
            match self.peek().clone() {
                Token::RBrace => break,
                Token::Eof => return Err(self.err("unterminated entity body")),
                Token::Word(w) => match w.as_str() {
                    "property" => {
                        let property = self.parse_property()?;
                        entity.properties.push(property);
                    }
                    "computed" | "derived" => {
                        let computed = self.parse_computed_property()?;
                        entity.computed_properties.push(computed);
                    }
                    "hasMany" | "hasOne" | "belongsTo" | "ref" => {
                        let relationship = self.parse_relationship()?;
                        entity.relationships.push(relationship);
                    }
                    "on" | "behavior" => {
                        let behavior = self.parse_behavior()?;
                        entity.behaviors.push(behavior);
                    }
                    "constraint" => {
                        let constraint = self.parse_constraint()?;
                        entity.constraints.push(constraint);
                    }
                    "command" => {
                        let command = self.parse_command()?;
                        entity.commands.push(command);
                    }
                    "policy" => {
                        let policy = self.parse_policy()?;
                        entity.policies.push(policy);
                    }
                    "store" => {
                        // Bare `store <target>` binds the enclosing entity
                        self.advance();
                        let target = self.take_word()?;
                        match StoreTarget::from_keyword(&target) {
                            Some(target) => entity.store = Some(target),
                            None => {
                                return Err(
                                    self.err(format!("unknown store target '{}'", target))
                                )
                            }
                        }
                    }
                    other => {
                        return Err(self.err(format!("unexpected '{}' in entity body", other)))
                    }
                },
                other => {
                    return Err(self.err(format!("expected an entity member, got {:?}", other)))
                }
            }
        }
        self.expect_rbrace()?;
        Ok(entity)
    }

    /// `property [modifier...] name: Type [= default]` — the word before
    /// the colon is the name; everything between `property` and it is an
    /// ordered modifier list, kept exactly as written.
    fn parse_property(&mut self) -> Result<Property, Diagnostic> {
        self.advance(); // property
        let mut modifiers = Vec::new();
        let name = loop {
            let line = self.cur_line();
            let col = self.cur_col();
            let word = self.take_word()?;
            if self.peek() == &Token::Colon {
                if lexer::is_reserved_word(&word) {
                    self.report(Diagnostic::error(
                        format!("Reserved word '{}' cannot be used as property name", word),
                        line,
                        col,
                    ));
                }
                break word;
            }
            match PropertyModifier::from_keyword(&word) {
                Some(modifier) => modifiers.push(modifier),
                None => {
                    return Err(self.err(format!("unknown property modifier '{}'", word)));
                }
            }
        };
        self.expect_colon()?;
        let data_type = self.parse_type()?;
        let default_value = if self.peek() == &Token::Assign {
            self.advance();
            Some(self.parse_expression()?)
        } else {
            None
        };
        Ok(Property {
            name,
            data_type,
            modifiers,
            default_value,
        })
    }

    /// `computed name: Type = expression` (`derived` is a synonym).
    fn parse_computed_property(&mut self) -> Result<ComputedProperty, Diagnostic> {
        self.advance(); // computed | derived
        let name = self.declared_name("computed property")?;
        self.expect_colon()?;
        let data_type = self.parse_type()?;
        self.expect(&Token::Assign, "'='")?;
        let expression = self.parse_expression()?;
        let dependencies = expressions::collect_dependencies(&expression);
        Ok(ComputedProperty {
            name,
            data_type,
            expression,
            dependencies,
        })
    }

    /// `hasMany|hasOne|belongsTo|ref name: Target [through X] [with Y]`
    fn parse_relationship(&mut self) -> Result<Relationship, Diagnostic> {
        let kind_word = self.take_word()?;
        let kind = RelationshipKind::from_keyword(&kind_word)
            .ok_or_else(|| self.err(format!("unknown relationship kind '{}'", kind_word)))?;
        let name = self.declared_name("relationship")?;
        self.expect_colon()?;
        let target = self.take_word()?;
        let mut through = None;
        let mut foreign_key = None;
        loop {
            if self.is_word("through") {
                self.advance();
                through = Some(self.take_word()?);
            } else if self.is_word("with") {
                self.advance();
                foreign_key = Some(self.take_word()?);
            } else {
                break;
            }
        }
        Ok(Relationship {
            kind,
            name,
            target,
            through,
            foreign_key,
        })
    }
}
