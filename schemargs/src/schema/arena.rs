//! Flattened view of a record and every record nested inside it.
//!
//! Nodes live in a single arena and refer to their parents by index. The
//! arena is built once per parse: the nesting graph is first checked for
//! cycles, then every record is visited depth-first in field order.
//!
//! A default declared on a nested-record field is split into its fields and
//! handed down, so `#[schemargs(default = Inner { y: 5 })]` defaults
//! `--inner.y` to 5.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use super::{DefaultSource, FieldDescriptor, RecordRef, RecordSchema};
use crate::definition::DestinationKey;
use crate::error::{ArgsError, ArgsResult};
use crate::resolve::{FieldClass, classify};
use crate::value::{ArgValue, ValueError};

/// Index of a record node in a [`SchemaArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Index of a leaf field in a [`SchemaArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LeafId(usize);

#[derive(Debug, Clone, Copy)]
enum Child {
    Leaf(LeafId),
    Record(NodeId),
}

#[derive(Debug)]
struct RecordNode {
    schema: RecordSchema,
    prefix: String,
    parent: Option<NodeId>,
    children: Vec<(&'static str, Child)>,
}

/// A leaf field together with its position in the nesting tree.
#[derive(Debug, Clone)]
pub struct LeafField {
    /// Record that declares the field.
    pub node: NodeId,
    /// Dotted namespace of the declaring record, e.g. `"b."`.
    pub prefix: String,
    /// The field itself.
    pub descriptor: FieldDescriptor,
    /// Default taken from an enclosing record field's declared default.
    ///
    /// It wins over the field's own default.
    pub inherited: Option<ArgValue>,
}

impl LeafField {
    /// Key under which the field's value is gathered.
    #[must_use]
    pub fn destination(&self) -> DestinationKey {
        DestinationKey::new(&self.prefix, self.descriptor.name)
    }
}

/// Record nodes and leaf fields reachable from a root record.
#[derive(Debug)]
pub struct SchemaArena {
    nodes: Vec<RecordNode>,
    leaves: Vec<LeafField>,
}

impl SchemaArena {
    /// Flattens `root` and every record nested inside it.
    ///
    /// # Errors
    ///
    /// Returns [`ArgsError::CyclicSchema`] when a record contains itself,
    /// directly or transitively, and [`ArgsError::UnsupportedType`] when a
    /// field cannot be classified.
    pub fn build(root: RecordRef) -> ArgsResult<Self> {
        check_acyclic(root)?;
        let mut arena = Self {
            nodes: Vec::new(),
            leaves: Vec::new(),
        };
        arena.visit((root.schema)(), String::new(), None, None)?;
        debug!(
            record = root.id,
            records = arena.nodes.len(),
            leaves = arena.leaves.len(),
            "flattened record schema"
        );
        Ok(arena)
    }

    fn visit(
        &mut self,
        schema: RecordSchema,
        prefix: String,
        parent: Option<NodeId>,
        inherited: Option<&BTreeMap<String, ArgValue>>,
    ) -> ArgsResult<NodeId> {
        let id = NodeId(self.nodes.len());
        self.nodes.push(RecordNode {
            schema: schema.clone(),
            prefix: prefix.clone(),
            parent,
            children: Vec::new(),
        });
        for field in schema.fields {
            let class = classify(&field.shape, &schema.substitutions).map_err(|err| {
                ArgsError::UnsupportedType {
                    field: format!("{prefix}{}", field.name),
                    shape: err.to_string(),
                }
            })?;
            let overridden = inherited
                .and_then(|values| values.get(field.name))
                .cloned();
            let child = match class {
                FieldClass::Excluded => continue,
                FieldClass::Record(record) => {
                    let nested = format!("{prefix}{}.", field.name);
                    let defaults = overridden
                        .or_else(|| field.default.as_ref().map(DefaultSource::produce))
                        .and_then(|value| match value {
                            ArgValue::Record(values) => Some(values),
                            _ => None,
                        });
                    Child::Record(self.visit((record.schema)(), nested, Some(id), defaults.as_ref())?)
                }
                FieldClass::Leaf => {
                    let leaf = LeafId(self.leaves.len());
                    self.leaves.push(LeafField {
                        node: id,
                        prefix: prefix.clone(),
                        descriptor: field.clone(),
                        inherited: overridden,
                    });
                    Child::Leaf(leaf)
                }
            };
            if let Some(node) = self.nodes.get_mut(id.0) {
                node.children.push((field.name, child));
            }
        }
        Ok(id)
    }

    /// The root record node.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Schema of the record at `node`.
    #[must_use]
    pub fn schema(&self, node: NodeId) -> Option<&RecordSchema> {
        self.nodes.get(node.0).map(|record| &record.schema)
    }

    /// Dotted namespace of the record at `node`.
    #[must_use]
    pub fn prefix(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node.0).map(|record| record.prefix.as_str())
    }

    /// Record that contains `node`, if it is nested.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|record| record.parent)
    }

    /// Leaf fields in depth-first field order.
    pub fn leaves(&self) -> impl Iterator<Item = (LeafId, &LeafField)> {
        self.leaves
            .iter()
            .enumerate()
            .map(|(idx, leaf)| (LeafId(idx), leaf))
    }

    /// Leaf field at `id`.
    #[must_use]
    pub fn leaf(&self, id: LeafId) -> Option<&LeafField> {
        self.leaves.get(id.0)
    }

    /// Rebuilds the root record's value from leaf values keyed by destination.
    ///
    /// Nested records are assembled bottom-up so each record's value holds
    /// exactly its own constructor fields.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::MissingField`] when a leaf has no value.
    pub fn assemble(
        &self,
        mut values: HashMap<DestinationKey, ArgValue>,
    ) -> Result<ArgValue, ValueError> {
        self.assemble_node(self.root(), &mut values)
    }

    fn assemble_node(
        &self,
        node: NodeId,
        values: &mut HashMap<DestinationKey, ArgValue>,
    ) -> Result<ArgValue, ValueError> {
        let Some(record) = self.nodes.get(node.0) else {
            return Err(ValueError::MissingField {
                record: "<root>",
                field: "<record>",
            });
        };
        let mut fields = BTreeMap::new();
        for (name, child) in &record.children {
            let value = match *child {
                Child::Record(nested) => self.assemble_node(nested, values)?,
                Child::Leaf(leaf) => self
                    .leaf(leaf)
                    .and_then(|field| values.remove(&field.destination()))
                    .ok_or(ValueError::MissingField {
                        record: record.schema.name,
                        field: *name,
                    })?,
            };
            fields.insert((*name).to_owned(), value);
        }
        Ok(ArgValue::Record(fields))
    }
}

/// Depth-first search over record identities.
fn check_acyclic(root: RecordRef) -> ArgsResult<()> {
    let mut path = Vec::new();
    let mut done = HashSet::new();
    walk(root, &mut path, &mut done)
}

fn walk(
    record: RecordRef,
    path: &mut Vec<(&'static str, &'static str)>,
    done: &mut HashSet<&'static str>,
) -> ArgsResult<()> {
    if done.contains(record.id) {
        return Ok(());
    }
    let schema = (record.schema)();
    if let Some(start) = path.iter().position(|(id, _)| *id == record.id) {
        let cycle = path
            .iter()
            .skip(start)
            .map(|(_, name)| *name)
            .chain(std::iter::once(schema.name))
            .collect::<Vec<_>>()
            .join(" -> ");
        return Err(ArgsError::CyclicSchema { cycle });
    }
    path.push((record.id, schema.name));
    for field in &schema.fields {
        if let Ok(FieldClass::Record(nested)) = classify(&field.shape, &schema.substitutions) {
            walk(nested, path, done)?;
        }
    }
    path.pop();
    done.insert(record.id);
    Ok(())
}
