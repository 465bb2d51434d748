//! Argument definitions and the pipeline that builds them.
//!
//! Every leaf field of the flattened schema becomes one
//! [`ArgumentDefinition`]. The definition starts out holding only the
//! field's provenance, shape and native default; the stages in [`STAGES`]
//! then fill in the rest, each returning a new value:
//!
//! 1. `required` is set when the field has no default;
//! 2. defaulted booleans become flip flags;
//! 3. remaining fields are resolved into an instantiator and metadata;
//! 4. help text is composed from docs and the default;
//! 5. the default is rendered into parser tokens.

use tracing::{debug, trace};

use crate::error::{ArgsError, ArgsResult};
use crate::resolve::{Arity, Instantiator, resolve};
use crate::schema::{FieldDescriptor, LeafField, RecordRef, SchemaArena, TypeShape};
use crate::ArgValue;

mod boolean;
pub(crate) mod defaults;
mod help;
mod namespace;

pub use defaults::{DefaultKind, render_scalar};
pub use namespace::{DestinationKey, long_flag};

use namespace::Namespace;

/// How flag presence maps to a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Tokens are converted by the instantiator.
    None,
    /// Presence sets `true`; the default is `false`.
    FlipToTrue,
    /// Presence sets `false`; the default is `true`.
    FlipToFalse,
}

/// Everything the parser needs to know about one leaf field.
#[derive(Debug, Clone)]
pub struct ArgumentDefinition {
    pub(crate) prefix: String,
    pub(crate) field_name: &'static str,
    pub(crate) owner: &'static str,
    pub(crate) doc: Option<&'static str>,
    pub(crate) shape: TypeShape,
    pub(crate) substitutions: Vec<(&'static str, TypeShape)>,
    pub(crate) name: String,
    pub(crate) destination: DestinationKey,
    pub(crate) instantiator: Option<Instantiator>,
    pub(crate) display_type: Option<TypeShape>,
    pub(crate) default: Option<ArgValue>,
    pub(crate) default_tokens: Option<DefaultKind>,
    pub(crate) required: bool,
    pub(crate) optional: bool,
    pub(crate) action: Action,
    pub(crate) arity: Option<Arity>,
    pub(crate) choices: Option<Vec<String>>,
    pub(crate) value_hint: Option<Vec<String>>,
    pub(crate) help: String,
}

impl ArgumentDefinition {
    /// Unprocessed definition for `field`, declared by `owner` under `prefix`.
    ///
    /// An [`ArgValue::Absent`] default is the same as no default.
    pub(crate) fn seed(
        prefix: &str,
        field: &FieldDescriptor,
        owner: &'static str,
        substitutions: &[(&'static str, TypeShape)],
    ) -> Self {
        let default = field
            .default
            .as_ref()
            .map(crate::schema::DefaultSource::produce)
            .filter(|value| *value != ArgValue::Absent);
        Self {
            prefix: prefix.to_owned(),
            field_name: field.name,
            owner,
            doc: field.doc,
            shape: field.shape.clone(),
            substitutions: substitutions.to_vec(),
            name: field.name.to_owned(),
            destination: DestinationKey::new(prefix, field.name),
            instantiator: None,
            display_type: None,
            default,
            default_tokens: None,
            required: false,
            optional: false,
            action: Action::None,
            arity: None,
            choices: None,
            value_hint: None,
            help: String::new(),
        }
    }

    /// Replaces the native default with one declared by an enclosing record.
    pub(crate) fn with_inherited_default(mut self, value: ArgValue) -> Self {
        self.default = Some(value).filter(|value| *value != ArgValue::Absent);
        self
    }

    /// Dotted namespace inherited from enclosing records.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Identifier of the field in its record.
    #[must_use]
    pub const fn field_name(&self) -> &'static str {
        self.field_name
    }

    /// Name of the record declaring the field.
    #[must_use]
    pub const fn owner(&self) -> &'static str {
        self.owner
    }

    /// Visible name; `no_<field>` for flip-to-false booleans.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key the parsed value is stored under.
    #[must_use]
    pub const fn destination(&self) -> &DestinationKey {
        &self.destination
    }

    /// Long flag without the leading `--`.
    #[must_use]
    pub fn long(&self) -> String {
        long_flag(&self.prefix, &self.name)
    }

    /// Flag as typed on the command line.
    #[must_use]
    pub fn flag(&self) -> String {
        format!("--{}", self.long())
    }

    /// Converts tokens into a value; `None` for flip flags.
    #[must_use]
    pub const fn instantiator(&self) -> Option<&Instantiator> {
        self.instantiator.as_ref()
    }

    /// Resolved type with transparent layers removed; `None` for flip flags.
    #[must_use]
    pub const fn display_type(&self) -> Option<&TypeShape> {
        self.display_type.as_ref()
    }

    /// Native default value.
    #[must_use]
    pub const fn default(&self) -> Option<&ArgValue> {
        self.default.as_ref()
    }

    /// Default rendered into parser tokens.
    #[must_use]
    pub const fn default_tokens(&self) -> Option<&DefaultKind> {
        self.default_tokens.as_ref()
    }

    /// Whether the flag must be supplied.
    #[must_use]
    pub const fn required(&self) -> bool {
        self.required
    }

    /// Whether an omitted flag reconstructs as `None`.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.optional
    }

    /// Flip protocol, if any.
    #[must_use]
    pub const fn action(&self) -> Action {
        self.action
    }

    /// Token count; `None` for flip flags.
    #[must_use]
    pub const fn arity(&self) -> Option<Arity> {
        self.arity
    }

    /// Closed set of accepted tokens.
    #[must_use]
    pub fn choices(&self) -> Option<&[String]> {
        self.choices.as_deref()
    }

    /// Value names for usage strings; never set together with choices.
    #[must_use]
    pub fn value_hint(&self) -> Option<&[String]> {
        self.value_hint.as_deref()
    }

    /// Composed help string.
    #[must_use]
    pub fn help(&self) -> &str {
        &self.help
    }
}

/// One step of the definition pipeline.
pub type Stage = fn(ArgumentDefinition) -> ArgsResult<ArgumentDefinition>;

/// The pipeline, in application order.
pub const STAGES: &[(&str, Stage)] = &[
    ("required", mark_required_without_default),
    ("boolean", boolean::specialise_boolean_flags),
    ("resolve", resolve_instantiator),
    ("help", help::compose_help_text),
    ("defaults", defaults::render_default_tokens),
];

fn mark_required_without_default(mut def: ArgumentDefinition) -> ArgsResult<ArgumentDefinition> {
    def.required = def.default.is_none();
    Ok(def)
}

fn resolve_instantiator(mut def: ArgumentDefinition) -> ArgsResult<ArgumentDefinition> {
    if def.action != Action::None {
        return Ok(def);
    }
    let resolved = resolve(&def.shape, &def.substitutions).map_err(|err| {
        ArgsError::UnsupportedType {
            field: def.destination.to_string(),
            shape: err.to_string(),
        }
    })?;
    let metadata = resolved.metadata;
    def.instantiator = Some(resolved.instantiator);
    def.display_type = Some(resolved.display_type);
    def.arity = Some(metadata.arity);
    def.optional = metadata.is_optional;
    def.required = def.required && !metadata.is_optional;
    def.value_hint = if metadata.choices.is_some() {
        None
    } else {
        metadata.value_hint
    };
    def.choices = metadata.choices;
    Ok(def)
}

/// Runs every stage over a seeded definition.
///
/// # Errors
///
/// Propagates the first stage failure.
pub fn run_pipeline(seed: ArgumentDefinition) -> ArgsResult<ArgumentDefinition> {
    STAGES.iter().try_fold(seed, |def, (label, stage)| {
        trace!(destination = %def.destination, stage = *label, "applying definition stage");
        stage(def)
    })
}

/// The definitions for every leaf of a record, in declaration order.
#[derive(Debug)]
pub struct DefinitionSet {
    arena: SchemaArena,
    definitions: Vec<ArgumentDefinition>,
}

impl DefinitionSet {
    /// Flattens `root` and builds a definition for each leaf field.
    ///
    /// # Errors
    ///
    /// Returns [`ArgsError::CyclicSchema`], [`ArgsError::UnsupportedType`]
    /// or [`ArgsError::DestinationCollision`] for records that cannot be
    /// expressed as a command line.
    pub fn build(root: RecordRef) -> ArgsResult<Self> {
        let arena = SchemaArena::build(root)?;
        let mut namespace = Namespace::default();
        let mut definitions = Vec::new();
        for (_, leaf) in arena.leaves() {
            let def = run_pipeline(seed_from_leaf(&arena, leaf))?;
            namespace.claim(&def.destination, &def.long())?;
            definitions.push(def);
        }
        debug!(
            record = root.id,
            definitions = definitions.len(),
            "built argument definitions"
        );
        Ok(Self { arena, definitions })
    }

    /// Definitions in depth-first field order.
    #[must_use]
    pub fn definitions(&self) -> &[ArgumentDefinition] {
        &self.definitions
    }

    /// Definition stored under `destination`.
    #[must_use]
    pub fn get(&self, destination: &str) -> Option<&ArgumentDefinition> {
        self.definitions
            .iter()
            .find(|def| def.destination.as_str() == destination)
    }

    /// Flattened record tree the definitions were built from.
    #[must_use]
    pub const fn arena(&self) -> &SchemaArena {
        &self.arena
    }

    /// Doc comment of the root record.
    #[must_use]
    pub fn description(&self) -> Option<&'static str> {
        self.arena.schema(self.arena.root()).and_then(|schema| schema.doc)
    }
}

fn seed_from_leaf(arena: &SchemaArena, leaf: &LeafField) -> ArgumentDefinition {
    let (owner, substitutions) = arena
        .schema(leaf.node)
        .map_or(("", &[][..]), |schema| {
            (schema.name, schema.substitutions.as_slice())
        });
    let seed = ArgumentDefinition::seed(&leaf.prefix, &leaf.descriptor, owner, substitutions);
    match &leaf.inherited {
        Some(value) => seed.with_inherited_default(value.clone()),
        None => seed,
    }
}
