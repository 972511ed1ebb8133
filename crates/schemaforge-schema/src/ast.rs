use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Extension metadata attached to nodes and properties (`x-*` style keys).
pub type Extensions = BTreeMap<String, serde_json::Value>;

/// Extension key overriding the generated member name of a property.
pub const PROPERTY_NAME_EXTENSION: &str = "name";

/// Extension key overriding the type name hint of a node.
pub const TYPE_NAME_EXTENSION: &str = "typeName";

/// Identity of a node inside a [`SchemaGraph`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A resolved schema graph: every reference already points at a node id,
/// property order is declaration order, and base-type chains are acyclic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchemaGraph {
    pub root: NodeId,
    pub nodes: Vec<SchemaNode>,
}

impl SchemaGraph {
    pub fn new() -> Self {
        Self {
            root: NodeId(0),
            nodes: Vec::new(),
        }
    }

    /// Appends a node to the arena and returns its id.
    pub fn add(&mut self, node: SchemaNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = root;
    }

    pub fn node(&self, id: NodeId) -> Option<&SchemaNode> {
        self.nodes.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SchemaNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }

    /// Follows `Reference` nodes until a non-reference node is reached.
    ///
    /// Chains are bounded by the arena size, so a cyclic chain that slipped
    /// past [`SchemaGraph::validate`] terminates instead of spinning.
    pub fn dereference(&self, id: NodeId) -> NodeId {
        let mut current = id;
        for _ in 0..=self.nodes.len() {
            match self.node(current).map(|node| &node.kind) {
                Some(NodeKind::Reference { target }) => current = *target,
                _ => break,
            }
        }
        current
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.node(self.root).is_none() {
            return Err(crate::SchemaError::MissingRoot(self.root));
        }

        for (id, node) in self.iter() {
            for target in node.kind.children() {
                if self.node(target).is_none() {
                    return Err(crate::SchemaError::UndefinedReference { node: id, target });
                }
            }
        }

        for (id, node) in self.iter() {
            if let NodeKind::Reference { .. } = node.kind {
                self.check_reference_chain(id)?;
            }
        }

        for (id, node) in self.iter() {
            if let NodeKind::Object(shape) = &node.kind {
                if shape.base.is_some() {
                    self.check_base_chain(id)?;
                }
            }
        }

        Ok(())
    }

    fn check_reference_chain(&self, start: NodeId) -> crate::Result<()> {
        let mut seen = HashSet::new();
        let mut current = start;
        while let Some(NodeKind::Reference { target }) = self.node(current).map(|n| &n.kind) {
            if !seen.insert(current) {
                return Err(crate::SchemaError::ReferenceCycle(start));
            }
            current = *target;
        }
        Ok(())
    }

    fn check_base_chain(&self, start: NodeId) -> crate::Result<()> {
        let mut seen = HashSet::new();
        let mut current = start;
        loop {
            if !seen.insert(current) {
                return Err(crate::SchemaError::InheritanceCycle(start));
            }
            let base = match self.node(current).map(|n| &n.kind) {
                Some(NodeKind::Object(shape)) => shape.base,
                _ => None,
            };
            let Some(base) = base else {
                return Ok(());
            };
            let resolved = self.dereference(base);
            match self.node(resolved).map(|n| &n.kind) {
                Some(NodeKind::Object(_)) => current = resolved,
                _ => {
                    return Err(crate::SchemaError::InvalidBaseType {
                        node: current,
                        base,
                    })
                }
            }
        }
    }
}

impl Default for SchemaGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    #[serde(flatten)]
    pub kind: NodeKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_hint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: Extensions,
}

impl SchemaNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            name_hint: None,
            description: None,
            extensions: Extensions::new(),
        }
    }

    pub fn with_name(mut self, name_hint: impl Into<String>) -> Self {
        self.name_hint = Some(name_hint.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_extension(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extensions.insert(key.into(), value);
        self
    }

    pub fn extension_str(&self, key: &str) -> Option<&str> {
        self.extensions.get(key).and_then(serde_json::Value::as_str)
    }

    /// The name this node declares for itself: the `typeName` extension wins
    /// over the plain name hint.
    pub fn declared_name(&self) -> Option<&str> {
        self.extension_str(TYPE_NAME_EXTENSION)
            .or(self.name_hint.as_deref())
            .filter(|name| !name.trim().is_empty())
    }

    /// Description with surrounding whitespace removed; blank counts as none.
    pub fn description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NodeKind {
    Object(ObjectShape),
    Enumeration {
        #[serde(default)]
        values: Vec<serde_json::Value>,
    },
    Union {
        #[serde(default)]
        variants: Vec<NodeId>,
    },
    Primitive {
        #[serde(rename = "type")]
        primitive: PrimitiveType,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        format: Option<String>,
    },
    Array {
        items: NodeId,
    },
    Reference {
        target: NodeId,
    },
}

impl NodeKind {
    pub fn object(properties: Vec<PropertyDecl>) -> Self {
        NodeKind::Object(ObjectShape {
            properties,
            ..ObjectShape::default()
        })
    }

    pub fn enumeration<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<serde_json::Value>,
    {
        NodeKind::Enumeration {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn union(variants: Vec<NodeId>) -> Self {
        NodeKind::Union { variants }
    }

    pub fn primitive(primitive: PrimitiveType) -> Self {
        NodeKind::Primitive {
            primitive,
            format: None,
        }
    }

    pub fn formatted(primitive: PrimitiveType, format: impl Into<String>) -> Self {
        NodeKind::Primitive {
            primitive,
            format: Some(format.into()),
        }
    }

    /// Every node id this kind points at, in declaration order.
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            NodeKind::Object(shape) => {
                let mut ids: Vec<NodeId> = shape.base.into_iter().collect();
                ids.extend(shape.properties.iter().map(|p| p.schema));
                if let Some(discriminator) = &shape.discriminator {
                    ids.extend(discriminator.mapping.iter().map(|m| m.target));
                }
                ids
            }
            NodeKind::Union { variants } => variants.clone(),
            NodeKind::Array { items } => vec![*items],
            NodeKind::Reference { target } => vec![*target],
            NodeKind::Enumeration { .. } | NodeKind::Primitive { .. } => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectShape {
    #[serde(default)]
    pub properties: Vec<PropertyDecl>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<NodeId>,

    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Discriminator>,
}

/// A declared member of an object node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDecl {
    pub name: String,
    pub schema: NodeId,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub nullable: bool,

    /// The property's type node was declared inline at this property rather
    /// than referenced from a shared definition.
    #[serde(default)]
    pub inline: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: Extensions,
}

impl PropertyDecl {
    pub fn new(name: impl Into<String>, schema: NodeId) -> Self {
        Self {
            name: name.into(),
            schema,
            required: false,
            nullable: false,
            inline: false,
            description: None,
            extensions: Extensions::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn inline(mut self) -> Self {
        self.inline = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_extension(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extensions.insert(key.into(), value);
        self
    }

    /// Explicit member name from the `name` extension, if any.
    pub fn name_override(&self) -> Option<&str> {
        self.extensions
            .get(PROPERTY_NAME_EXTENSION)
            .and_then(serde_json::Value::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// Identifies which concrete subtype an instance of a polymorphic type is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Discriminator {
    pub property_name: String,

    #[serde(default)]
    pub mapping: Vec<DiscriminatorMapping>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscriminatorMapping {
    pub value: String,
    pub target: NodeId,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    String,
    Integer,
    Number,
    Boolean,
    Any,
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveType::String => write!(f, "string"),
            PrimitiveType::Integer => write!(f, "integer"),
            PrimitiveType::Number => write!(f, "number"),
            PrimitiveType::Boolean => write!(f, "boolean"),
            PrimitiveType::Any => write!(f, "any"),
        }
    }
}
