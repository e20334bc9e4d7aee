//! manifest-core: parsing frontend for the Manifest declarative language.
//!
//! Turns raw source text into a typed [`Program`] plus a batch of
//! diagnostics. The pipeline is lexer → token stream → recursive-descent
//! declaration parser (with a precedence-climbing expression sub-parser) →
//! program assembly with error recovery.
//!
//! # Public API
//!
//! Key types are re-exported at the crate root for convenience:
//!
//! - [`parse()`] — parse one source string; total over all inputs, never
//!   an error for malformed text
//! - [`ParseResult`] — the best-effort [`Program`] plus its [`Diagnostic`]
//!   batch
//! - AST types: [`Program`], [`Entity`], [`Command`], [`Expression`], ...
//!
//! Parsing is synchronous and CPU-bound; one call holds no state beyond
//! its own cursor, so independent calls may run on independent threads.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;

// ── Convenience re-exports: key types ────────────────────────────────

pub use ast::{
    Action, ActionKind, Behavior, Command, Component, ComputedProperty, Connection,
    ConnectionFrom, ConnectionTo, Constraint, Effect, EffectKind, Entity, Event, EventField,
    EventPayload, Exposure, Expression, Flow, FlowStep, LiteralType, LiteralValue, Module,
    ObjectProperty, Operation, Parameter, Policy, PolicyAction, Program, Property,
    PropertyModifier, Protocol, Relationship, RelationshipKind, Severity, Store, StoreTarget,
    Trigger, Type,
};
pub use error::{Diagnostic, DiagnosticSeverity, Location};
pub use parser::{parse, ParseResult};
