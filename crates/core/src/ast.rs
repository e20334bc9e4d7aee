//! AST types for the Manifest frontend.
//!
//! These types are produced by the parser and consumed by downstream
//! tooling (persistence binding, runtime evaluation, server generation).
//! They live here so consumers can import them without depending on the
//! parser. Serialization mirrors the language's JSON vocabulary: camelCase
//! field names, expression nodes tagged with `"type"`.

use indexmap::IndexMap;
use serde::Serialize;

// ──────────────────────────────────────────────
// Program root
// ──────────────────────────────────────────────

/// The root of a parsed source file. Collection order is insertion order
/// and is observable by callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Program {
    pub modules: Vec<Module>,
    pub entities: Vec<Entity>,
    pub commands: Vec<Command>,
    pub policies: Vec<Policy>,
    pub stores: Vec<Store>,
    pub events: Vec<Event>,
    pub flows: Vec<Flow>,
    pub effects: Vec<Effect>,
    pub exposures: Vec<Exposure>,
    pub compositions: Vec<Composition>,
}

// ──────────────────────────────────────────────
// Entities
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub name: String,
    pub properties: Vec<Property>,
    pub computed_properties: Vec<ComputedProperty>,
    pub relationships: Vec<Relationship>,
    pub behaviors: Vec<Behavior>,
    pub constraints: Vec<Constraint>,
    pub commands: Vec<Command>,
    pub policies: Vec<Policy>,
    /// Bare in-entity `store <target>` binding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreTarget>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub name: String,
    pub data_type: Type,
    /// Modifier keywords exactly as written, order preserved.
    pub modifiers: Vec<PropertyModifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyModifier {
    Required,
    Unique,
    Indexed,
    Private,
    Readonly,
    Optional,
}

impl PropertyModifier {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "required" => Some(PropertyModifier::Required),
            "unique" => Some(PropertyModifier::Unique),
            "indexed" => Some(PropertyModifier::Indexed),
            "private" => Some(PropertyModifier::Private),
            "readonly" => Some(PropertyModifier::Readonly),
            "optional" => Some(PropertyModifier::Optional),
            _ => None,
        }
    }
}

/// `computed` and `derived` are synonyms producing this one shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedProperty {
    pub name: String,
    pub data_type: Type,
    pub expression: Expression,
    /// Identifier names the expression references, excluding the reserved
    /// roots `self`/`this`/`user`/`context`.
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub kind: RelationshipKind,
    pub name: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub through: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationshipKind {
    HasMany,
    HasOne,
    BelongsTo,
    Ref,
}

impl RelationshipKind {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "hasMany" => Some(RelationshipKind::HasMany),
            "hasOne" => Some(RelationshipKind::HasOne),
            "belongsTo" => Some(RelationshipKind::BelongsTo),
            "ref" => Some(RelationshipKind::Ref),
            _ => None,
        }
    }
}

// ──────────────────────────────────────────────
// Commands and behaviors
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Command {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub guards: Vec<Expression>,
    pub actions: Vec<Action>,
    pub constraints: Vec<Constraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returns: Option<Type>,
    /// Event names, populated in parallel with every `emit` action.
    pub emits: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    pub data_type: Type,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Action {
    pub kind: ActionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub expression: Expression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Mutate,
    Emit,
    Compute,
    Effect,
    Publish,
    Persist,
}

impl ActionKind {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "mutate" => Some(ActionKind::Mutate),
            "emit" => Some(ActionKind::Emit),
            "compute" => Some(ActionKind::Compute),
            "effect" => Some(ActionKind::Effect),
            "publish" => Some(ActionKind::Publish),
            "persist" => Some(ActionKind::Persist),
            _ => None,
        }
    }
}

/// A lifecycle-triggered action block (`on beforeCreate { ... }`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Behavior {
    pub name: String,
    pub trigger: Trigger,
    pub guards: Vec<Expression>,
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trigger {
    pub event: String,
    pub parameters: Vec<String>,
}

// ──────────────────────────────────────────────
// Constraints and policies
// ──────────────────────────────────────────────

/// One node shape for all three constraint syntaxes (inline, block, hybrid).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraint {
    pub name: String,
    pub severity: Severity,
    pub expression: Expression,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details_mapping: Option<IndexMap<String, Expression>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_policy_ref: Option<String>,
    pub overrideable: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Ok,
    Warn,
    #[default]
    Block,
}

impl Severity {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "ok" => Some(Severity::Ok),
            "warn" => Some(Severity::Warn),
            "block" => Some(Severity::Block),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Policy {
    pub name: String,
    pub action: PolicyAction,
    pub expression: Expression,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyAction {
    Read,
    Write,
    Delete,
    Execute,
    #[default]
    All,
    Override,
}

impl PolicyAction {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "read" => Some(PolicyAction::Read),
            "write" => Some(PolicyAction::Write),
            "delete" => Some(PolicyAction::Delete),
            "execute" => Some(PolicyAction::Execute),
            "all" => Some(PolicyAction::All),
            "override" => Some(PolicyAction::Override),
            _ => None,
        }
    }
}

// ──────────────────────────────────────────────
// Runtime wiring
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Store {
    pub entity: String,
    pub target: StoreTarget,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<IndexMap<String, Expression>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StoreTarget {
    Memory,
    LocalStorage,
    Postgres,
    Supabase,
}

impl StoreTarget {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "memory" => Some(StoreTarget::Memory),
            "localStorage" => Some(StoreTarget::LocalStorage),
            "postgres" => Some(StoreTarget::Postgres),
            "supabase" => Some(StoreTarget::Supabase),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub name: String,
    /// Defaults to `name`; overridable with a trailing string literal.
    pub channel: String,
    pub payload: EventPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EventPayload {
    Fields { fields: Vec<EventField> },
    Type(Type),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventField {
    pub name: String,
    pub data_type: Type,
}

/// A named scope holding the same declaration kinds as the top level.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Module {
    pub name: String,
    pub entities: Vec<Entity>,
    pub commands: Vec<Command>,
    pub policies: Vec<Policy>,
    pub stores: Vec<Store>,
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Flow {
    pub name: String,
    pub input: Type,
    pub output: Type,
    pub steps: Vec<FlowStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowStep {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Expression>,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Effect {
    pub name: String,
    pub kind: EffectKind,
    pub config: IndexMap<String, Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    Http,
    Storage,
    Timer,
    Event,
    Custom,
}

impl EffectKind {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "http" => Some(EffectKind::Http),
            "storage" => Some(EffectKind::Storage),
            "timer" => Some(EffectKind::Timer),
            "event" => Some(EffectKind::Event),
            "custom" => Some(EffectKind::Custom),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Exposure {
    pub entity: String,
    pub protocol: Protocol,
    /// Defaults to the lower-cased entity name.
    pub name: String,
    pub generate_server: bool,
    pub operations: Vec<Operation>,
    pub middleware: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Rest,
    Graphql,
    Websocket,
    Function,
}

impl Protocol {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "rest" => Some(Protocol::Rest),
            "graphql" => Some(Protocol::Graphql),
            "websocket" => Some(Protocol::Websocket),
            "function" => Some(Protocol::Function),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl Operation {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "create" => Some(Operation::Create),
            "read" => Some(Operation::Read),
            "update" => Some(Operation::Update),
            "delete" => Some(Operation::Delete),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Composition {
    pub name: String,
    pub components: Vec<Component>,
    pub connections: Vec<Connection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Component {
    pub entity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connection {
    pub from: ConnectionFrom,
    pub to: ConnectionTo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionFrom {
    pub component: String,
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionTo {
    pub component: String,
    pub input: String,
}

// ──────────────────────────────────────────────
// Types
// ──────────────────────────────────────────────

/// A type annotation: a primitive or entity name, a `?` nullable suffix,
/// and an optional generic argument (`list<T>`, `map<T>`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Type {
    pub name: String,
    pub nullable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generic: Option<Box<Type>>,
}

impl Type {
    pub fn simple(name: impl Into<String>) -> Self {
        Type {
            name: name.into(),
            nullable: false,
            generic: None,
        }
    }
}

// ──────────────────────────────────────────────
// Expressions
// ──────────────────────────────────────────────

/// The closed expression union. Operator spellings are carried as the
/// literal source strings (`"+"`, `"&&"`, `"and"`, `"is"`, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Expression {
    Literal {
        value: LiteralValue,
        #[serde(rename = "dataType")]
        data_type: LiteralType,
    },
    Identifier {
        name: String,
    },
    MemberAccess {
        object: Box<Expression>,
        property: String,
        optional: bool,
    },
    Call {
        callee: Box<Expression>,
        arguments: Vec<Expression>,
    },
    Array {
        elements: Vec<Expression>,
    },
    Object {
        properties: Vec<ObjectProperty>,
    },
    BinaryOp {
        operator: String,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    UnaryOp {
        operator: String,
        operand: Box<Expression>,
    },
    Conditional {
        condition: Box<Expression>,
        consequent: Box<Expression>,
        alternate: Box<Expression>,
    },
    Lambda {
        parameters: Vec<String>,
        body: Box<Expression>,
    },
}

impl Expression {
    pub fn null_literal() -> Self {
        Expression::Literal {
            value: LiteralValue::Null,
            data_type: LiteralType::Null,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LiteralType {
    Number,
    String,
    Boolean,
    Null,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectProperty {
    pub key: String,
    pub value: Expression,
}
