//! Recursive-descent parser for Manifest source text.
//!
//! The parser is total: it never fails for malformed input. Structural
//! errors abandon the declaration being parsed, record one diagnostic, and
//! resynchronize at the next top-level keyword; reserved-word collisions
//! record a diagnostic and keep the declaration so collection lengths stay
//! stable for downstream tooling.

use crate::ast::*;
use crate::error::Diagnostic;
use crate::lexer::{self, Spanned, Token};

mod command;
mod constraint;
mod entity;
mod expressions;
mod types;
mod wiring;

/// Result of a single parse call: the best-effort AST plus every
/// diagnostic collected along the way.
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub program: Program,
    pub errors: Vec<Diagnostic>,
}

/// Parse one source string into a [`Program`] and a diagnostic batch.
/// Deterministic for identical input; never panics or returns early.
pub fn parse(source: &str) -> ParseResult {
    let (tokens, diagnostics) = lexer::tokenize(source);
    let mut p = Parser::new(&tokens);
    p.diagnostics = diagnostics;
    let program = p.parse_program();
    ParseResult {
        program,
        errors: p.diagnostics,
    }
}

// ──────────────────────────────────────────────
// Parser
// ──────────────────────────────────────────────

pub(crate) struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Spanned]) -> Self {
        Parser {
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
        }
    }

    fn cur(&self) -> &Spanned {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub(super) fn peek(&self) -> &Token {
        &self.cur().token
    }

    /// Look `n` tokens past the current one without consuming anything.
    pub(super) fn peek_at(&self, n: usize) -> &Token {
        let i = (self.pos + n).min(self.tokens.len() - 1);
        &self.tokens[i].token
    }

    pub(super) fn cur_line(&self) -> u32 {
        self.cur().line
    }

    pub(super) fn cur_col(&self) -> u32 {
        self.cur().col
    }

    pub(super) fn advance(&mut self) -> &Spanned {
        let t = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        t
    }

    pub(super) fn err(&self, msg: impl Into<String>) -> Diagnostic {
        Diagnostic::error(msg, self.cur_line(), self.cur_col())
    }

    /// Record a non-fatal diagnostic and keep parsing.
    pub(super) fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub(super) fn is_word(&self, w: &str) -> bool {
        matches!(self.peek(), Token::Word(x) if x == w)
    }

    pub(super) fn take_word(&mut self) -> Result<String, Diagnostic> {
        if let Token::Word(w) = self.peek().clone() {
            self.advance();
            Ok(w)
        } else {
            Err(self.err(format!("expected identifier, got {:?}", self.peek())))
        }
    }

    pub(super) fn take_str(&mut self) -> Result<String, Diagnostic> {
        if let Token::Str(s) = self.peek().clone() {
            self.advance();
            Ok(s)
        } else {
            Err(self.err(format!("expected string literal, got {:?}", self.peek())))
        }
    }

    pub(super) fn expect(&mut self, token: &Token, what: &str) -> Result<(), Diagnostic> {
        if self.peek() == token {
            self.advance();
            Ok(())
        } else {
            Err(self.err(format!("expected {}, got {:?}", what, self.peek())))
        }
    }

    pub(super) fn expect_word(&mut self, expected: &str) -> Result<(), Diagnostic> {
        if self.is_word(expected) {
            self.advance();
            Ok(())
        } else {
            Err(self.err(format!("expected '{}', got {:?}", expected, self.peek())))
        }
    }

    pub(super) fn expect_colon(&mut self) -> Result<(), Diagnostic> {
        self.expect(&Token::Colon, "':'")
    }

    pub(super) fn expect_lbrace(&mut self) -> Result<(), Diagnostic> {
        self.expect(&Token::LBrace, "'{'")
    }

    pub(super) fn expect_rbrace(&mut self) -> Result<(), Diagnostic> {
        self.expect(&Token::RBrace, "'}'")
    }

    pub(super) fn expect_lparen(&mut self) -> Result<(), Diagnostic> {
        self.expect(&Token::LParen, "'('")
    }

    pub(super) fn expect_rparen(&mut self) -> Result<(), Diagnostic> {
        self.expect(&Token::RParen, "')'")
    }

    /// Consume a declaration-level identifier, reporting a reserved-word
    /// collision as a non-fatal diagnostic. The offending name is kept so
    /// the declaration still lands in its collection.
    pub(super) fn declared_name(&mut self, what: &str) -> Result<String, Diagnostic> {
        let line = self.cur_line();
        let col = self.cur_col();
        let name = self.take_word()?;
        if lexer::is_reserved_word(&name) {
            self.report(Diagnostic::error(
                format!("Reserved word '{}' cannot be used as {} name", name, what),
                line,
                col,
            ));
        }
        Ok(name)
    }

    /// Skip stray `,` / `;` separators inside a block body.
    pub(super) fn skip_separators(&mut self) {
        while matches!(self.peek(), Token::Comma | Token::Semicolon) {
            self.advance();
        }
    }
}

// ──────────────────────────────────────────────
// Program assembly and recovery
// ──────────────────────────────────────────────

fn is_declaration_keyword(word: &str) -> bool {
    matches!(
        word,
        "entity"
            | "command"
            | "policy"
            | "store"
            | "event"
            | "module"
            | "flow"
            | "effect"
            | "expose"
            | "compose"
    )
}

impl<'a> Parser<'a> {
    fn parse_program(&mut self) -> Program {
        let mut program = Program::default();
        while self.peek() != &Token::Eof {
            self.skip_separators();
            if self.peek() == &Token::Eof {
                break;
            }
            let before = self.pos;
            if let Err(diagnostic) = self.parse_top_level(&mut program) {
                self.report(diagnostic);
                self.recover_to_next_declaration();
                if self.pos == before {
                    self.advance();
                }
            }
        }
        program
    }

    fn parse_top_level(&mut self, program: &mut Program) -> Result<(), Diagnostic> {
        match self.peek().clone() {
            Token::Word(w) => match w.as_str() {
                "module" => {
                    let module = self.parse_module()?;
                    program.modules.push(module);
                }
                "entity" => {
                    let entity = self.parse_entity()?;
                    program.entities.push(entity);
                }
                "command" => {
                    let command = self.parse_command()?;
                    program.commands.push(command);
                }
                "policy" => {
                    let policy = self.parse_policy()?;
                    program.policies.push(policy);
                }
                "store" => {
                    let store = self.parse_store()?;
                    program.stores.push(store);
                }
                "event" => {
                    let event = self.parse_event()?;
                    program.events.push(event);
                }
                "flow" => {
                    let flow = self.parse_flow()?;
                    program.flows.push(flow);
                }
                "effect" => {
                    let effect = self.parse_effect()?;
                    program.effects.push(effect);
                }
                "expose" => {
                    let exposure = self.parse_expose()?;
                    program.exposures.push(exposure);
                }
                "compose" => {
                    let composition = self.parse_compose()?;
                    program.compositions.push(composition);
                }
                other => {
                    return Err(self.err(format!("unknown top-level declaration '{}'", other)))
                }
            },
            other => {
                return Err(self.err(format!("expected a declaration keyword, got {:?}", other)))
            }
        }
        Ok(())
    }

    /// Skip tokens until the next top-level declaration keyword at brace
    /// depth zero, or past the closing `}` of the broken declaration.
    fn recover_to_next_declaration(&mut self) {
        let mut depth: i32 = 0;
        loop {
            match self.peek() {
                Token::Eof => break,
                Token::LBrace => {
                    depth += 1;
                    self.advance();
                }
                Token::RBrace => {
                    if depth <= 0 {
                        // Consume the brace that ends the broken declaration
                        self.advance();
                        break;
                    }
                    depth -= 1;
                    self.advance();
                }
                Token::Word(w) if depth == 0 && is_declaration_keyword(w) => break,
                _ => {
                    self.advance();
                }
            }
        }
    }

    // ── Modules ──────────────────────────────────

    /// `module Name { entity... command... policy... store... event... }`
    fn parse_module(&mut self) -> Result<Module, Diagnostic> {
        self.advance(); // module
        let name = self.declared_name("module")?;
        self.expect_lbrace()?;
        let mut module = Module {
            name,
            ..Default::default()
        };
        while self.peek() != &Token::RBrace {
            self.skip_separators();
            if matches!(self.peek(), Token::RBrace | Token::Eof) {
                break;
            }
            let before = self.pos;
            if let Err(diagnostic) = self.parse_module_member(&mut module) {
                self.report(diagnostic);
                self.recover_to_next_declaration();
                // Guarantee progress when recovery halts on the very token
                // that failed (e.g. a non-member declaration keyword).
                if self.pos == before {
                    self.advance();
                }
            }
        }
        self.expect_rbrace()?;
        Ok(module)
    }

    fn parse_module_member(&mut self, module: &mut Module) -> Result<(), Diagnostic> {
        match self.peek().clone() {
            Token::Word(w) => match w.as_str() {
                "entity" => {
                    let entity = self.parse_entity()?;
                    module.entities.push(entity);
                }
                "command" => {
                    let command = self.parse_command()?;
                    module.commands.push(command);
                }
                "policy" => {
                    let policy = self.parse_policy()?;
                    module.policies.push(policy);
                }
                "store" => {
                    let store = self.parse_store()?;
                    module.stores.push(store);
                }
                "event" => {
                    let event = self.parse_event()?;
                    module.events.push(event);
                }
                other => {
                    return Err(self.err(format!("unexpected '{}' in module body", other)));
                }
            },
            other => {
                return Err(self.err(format!("expected a module member, got {:?}", other)));
            }
        }
        Ok(())
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source_yields_empty_program_and_no_errors() {
        let result = parse("");
        assert!(result.program.entities.is_empty());
        assert!(result.program.commands.is_empty());
        assert!(result.program.modules.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn unknown_top_level_keyword_is_skipped_with_one_diagnostic() {
        let result = parse("widget Foo {}\nentity User {}");
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].message.contains("widget"));
        assert_eq!(result.program.entities.len(), 1);
    }

    #[test]
    fn malformed_declaration_does_not_block_later_ones() {
        let src = "entity Broken {\n  property name\n}\nentity Good {}\ncommand greet() {}";
        let result = parse(src);
        assert!(!result.errors.is_empty());
        // Broken is dropped, Good survives
        assert_eq!(result.program.entities.len(), 1);
        assert_eq!(result.program.entities[0].name, "Good");
        assert_eq!(result.program.commands.len(), 1);
    }

    #[test]
    fn reserved_entity_name_keeps_placeholder() {
        let result = parse("entity entity {}");
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].message.contains("Reserved word"));
        assert_eq!(result.program.entities.len(), 1);
    }

    #[test]
    fn module_recovers_locally_and_keeps_later_members() {
        let src = "module App {\n  entity Broken {\n    property name\n  }\n  entity Good {}\n}";
        let result = parse(src);
        assert!(!result.errors.is_empty());
        assert_eq!(result.program.modules.len(), 1);
        assert_eq!(result.program.modules[0].entities.len(), 1);
        assert_eq!(result.program.modules[0].entities[0].name, "Good");
    }

    #[test]
    fn parse_is_deterministic() {
        let src = r#"
            entity User {
              property name: string = "x"
              computed label: string = name + "!"
            }
            store User in postgres { tableName: "users" }
        "#;
        let a = parse(src);
        let b = parse(src);
        assert_eq!(a.program, b.program);
        assert_eq!(a.errors, b.errors);
    }
}
