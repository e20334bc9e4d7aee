//! Precedence-climbing expression parser.
//!
//! Shared by every declaration rule that embeds an expression: property and
//! parameter defaults, guards, constraint bodies, action payloads, config
//! values, connection transforms. Knows nothing about declarations.
//!
//! Levels, loosest to tightest: conditional → logical (`&&`/`and`,
//! `||`/`or`) → equality → keyword-relational (`is`/`in`/`contains`) →
//! comparison → additive → multiplicative → unary → postfix → primary.

use super::Parser;
use crate::ast::{Expression, LiteralType, LiteralValue, ObjectProperty};
use crate::error::Diagnostic;
use crate::lexer::Token;

impl<'a> Parser<'a> {
    pub(super) fn parse_expression(&mut self) -> Result<Expression, Diagnostic> {
        self.parse_conditional()
    }

    fn parse_conditional(&mut self) -> Result<Expression, Diagnostic> {
        let condition = self.parse_logical()?;
        if self.peek() == &Token::Question {
            self.advance();
            // Right-associative: the consequent may itself be a conditional
            let consequent = self.parse_conditional()?;
            self.expect(&Token::Colon, "':' in conditional")?;
            let alternate = self.parse_conditional()?;
            return Ok(Expression::Conditional {
                condition: Box::new(condition),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            });
        }
        Ok(condition)
    }

    fn parse_logical(&mut self) -> Result<Expression, Diagnostic> {
        let mut left = self.parse_equality()?;
        loop {
            let operator = match self.peek() {
                Token::AndAnd => "&&",
                Token::OrOr => "||",
                Token::Word(w) if w == "and" => "and",
                Token::Word(w) if w == "or" => "or",
                _ => break,
            };
            self.advance();
            let right = self.parse_equality()?;
            left = Expression::BinaryOp {
                operator: operator.to_owned(),
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expression, Diagnostic> {
        let mut left = self.parse_keyword_relational()?;
        loop {
            let operator = match self.peek() {
                Token::Eq => "==",
                Token::Neq => "!=",
                _ => break,
            };
            self.advance();
            let right = self.parse_keyword_relational()?;
            left = Expression::BinaryOp {
                operator: operator.to_owned(),
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_keyword_relational(&mut self) -> Result<Expression, Diagnostic> {
        let mut left = self.parse_comparison()?;
        loop {
            let operator = match self.peek() {
                Token::Word(w) if w == "is" => "is",
                Token::Word(w) if w == "in" => "in",
                Token::Word(w) if w == "contains" => "contains",
                _ => break,
            };
            self.advance();
            let right = self.parse_comparison()?;
            left = Expression::BinaryOp {
                operator: operator.to_owned(),
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expression, Diagnostic> {
        let mut left = self.parse_additive()?;
        loop {
            let operator = match self.peek() {
                Token::Lt => "<",
                Token::Gt => ">",
                Token::Lte => "<=",
                Token::Gte => ">=",
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            left = Expression::BinaryOp {
                operator: operator.to_owned(),
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expression, Diagnostic> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let operator = match self.peek() {
                Token::Plus => "+",
                Token::Minus => "-",
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Expression::BinaryOp {
                operator: operator.to_owned(),
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expression, Diagnostic> {
        let mut left = self.parse_unary()?;
        loop {
            let operator = match self.peek() {
                Token::Star => "*",
                Token::Slash => "/",
                Token::Percent => "%",
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Expression::BinaryOp {
                operator: operator.to_owned(),
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expression, Diagnostic> {
        let operator = match self.peek() {
            Token::Bang => Some("!"),
            Token::Minus => Some("-"),
            Token::Word(w) if w == "not" => Some("not"),
            _ => None,
        };
        if let Some(operator) = operator {
            self.advance();
            let operand = self.parse_unary()?;
            return Ok(Expression::UnaryOp {
                operator: operator.to_owned(),
                operand: Box::new(operand),
            });
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expression, Diagnostic> {
        let mut expression = self.parse_primary()?;
        loop {
            match self.peek() {
                Token::Dot | Token::QuestionDot => {
                    let optional = self.peek() == &Token::QuestionDot;
                    self.advance();
                    // Property names are exempt from reserved-word checks
                    let property = self.take_word()?;
                    expression = Expression::MemberAccess {
                        object: Box::new(expression),
                        property,
                        optional,
                    };
                }
                Token::LParen => {
                    self.advance();
                    let mut arguments = Vec::new();
                    while self.peek() != &Token::RParen {
                        arguments.push(self.parse_expression()?);
                        if self.peek() == &Token::Comma {
                            self.advance();
                        }
                    }
                    self.expect_rparen()?;
                    expression = Expression::Call {
                        callee: Box::new(expression),
                        arguments,
                    };
                }
                _ => break,
            }
        }
        Ok(expression)
    }

    fn parse_primary(&mut self) -> Result<Expression, Diagnostic> {
        match self.peek().clone() {
            Token::Number(n) => {
                self.advance();
                Ok(Expression::Literal {
                    value: LiteralValue::Number(n),
                    data_type: LiteralType::Number,
                })
            }
            Token::Str(s) => {
                self.advance();
                Ok(Expression::Literal {
                    value: LiteralValue::Str(s),
                    data_type: LiteralType::String,
                })
            }
            Token::Word(w) if w == "true" || w == "false" => {
                self.advance();
                Ok(Expression::Literal {
                    value: LiteralValue::Bool(w == "true"),
                    data_type: LiteralType::Boolean,
                })
            }
            Token::Word(w) if w == "null" => {
                self.advance();
                Ok(Expression::null_literal())
            }
            Token::Word(w) => {
                self.advance();
                Ok(Expression::Identifier { name: w })
            }
            Token::LParen => {
                if self.lambda_ahead() {
                    return self.parse_lambda();
                }
                self.advance();
                let expression = self.parse_expression()?;
                self.expect_rparen()?;
                Ok(expression)
            }
            Token::LBracket => {
                self.advance();
                let mut elements = Vec::new();
                while self.peek() != &Token::RBracket {
                    elements.push(self.parse_expression()?);
                    if self.peek() == &Token::Comma {
                        self.advance();
                    }
                }
                self.expect(&Token::RBracket, "']'")?;
                Ok(Expression::Array { elements })
            }
            Token::LBrace => {
                self.advance();
                let mut properties = Vec::new();
                while self.peek() != &Token::RBrace {
                    // Keys may be any word token, keywords included
                    let key = self.take_word()?;
                    self.expect_colon()?;
                    let value = self.parse_expression()?;
                    properties.push(ObjectProperty { key, value });
                    if self.peek() == &Token::Comma {
                        self.advance();
                    }
                }
                self.expect_rbrace()?;
                Ok(Expression::Object { properties })
            }
            other => Err(self.err(format!("expected expression, got {:?}", other))),
        }
    }

    /// Bounded lookahead from a `(`: does `( ident-list ) =>` follow?
    fn lambda_ahead(&self) -> bool {
        debug_assert_eq!(self.peek(), &Token::LParen);
        let mut i = 1;
        if self.peek_at(i) == &Token::RParen {
            return self.peek_at(i + 1) == &Token::FatArrow;
        }
        loop {
            match self.peek_at(i) {
                Token::Word(_) => i += 1,
                _ => return false,
            }
            match self.peek_at(i) {
                Token::Comma => i += 1,
                Token::RParen => return self.peek_at(i + 1) == &Token::FatArrow,
                _ => return false,
            }
        }
    }

    fn parse_lambda(&mut self) -> Result<Expression, Diagnostic> {
        self.advance(); // (
        let mut parameters = Vec::new();
        while self.peek() != &Token::RParen {
            parameters.push(self.take_word()?);
            if self.peek() == &Token::Comma {
                self.advance();
            }
        }
        self.expect_rparen()?;
        self.expect(&Token::FatArrow, "'=>'")?;
        let body = self.parse_expression()?;
        Ok(Expression::Lambda {
            parameters,
            body: Box::new(body),
        })
    }
}

// ──────────────────────────────────────────────
// Dependency extraction
// ──────────────────────────────────────────────

/// Identifier names referenced by an expression, in first-appearance order,
/// deduplicated. Member-access chains contribute only their root; the
/// reserved roots `self`/`this`/`user`/`context` and lambda parameters are
/// excluded.
pub(super) fn collect_dependencies(expression: &Expression) -> Vec<String> {
    let mut names = Vec::new();
    walk(expression, &mut names);
    let mut dependencies: Vec<String> = Vec::new();
    for name in names {
        if is_reserved_root(&name) || dependencies.contains(&name) {
            continue;
        }
        dependencies.push(name);
    }
    dependencies
}

fn is_reserved_root(name: &str) -> bool {
    matches!(name, "self" | "this" | "user" | "context")
}

fn walk(expression: &Expression, out: &mut Vec<String>) {
    match expression {
        Expression::Literal { .. } => {}
        Expression::Identifier { name } => out.push(name.clone()),
        // Only the root of a member chain is a dependency
        Expression::MemberAccess { object, .. } => walk(object, out),
        Expression::Call { callee, arguments } => {
            walk(callee, out);
            for argument in arguments {
                walk(argument, out);
            }
        }
        Expression::Array { elements } => {
            for element in elements {
                walk(element, out);
            }
        }
        Expression::Object { properties } => {
            for property in properties {
                walk(&property.value, out);
            }
        }
        Expression::BinaryOp { left, right, .. } => {
            walk(left, out);
            walk(right, out);
        }
        Expression::UnaryOp { operand, .. } => walk(operand, out),
        Expression::Conditional {
            condition,
            consequent,
            alternate,
        } => {
            walk(condition, out);
            walk(consequent, out);
            walk(alternate, out);
        }
        Expression::Lambda { parameters, body } => {
            let mut inner = Vec::new();
            walk(body, &mut inner);
            out.extend(inner.into_iter().filter(|n| !parameters.contains(n)));
        }
    }
}
