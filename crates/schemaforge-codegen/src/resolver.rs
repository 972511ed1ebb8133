use crate::base::Features;
use crate::csharp;
use crate::error::{FaultKind, GenerationFault};
use crate::naming;
use crate::Language;
use schemaforge_schema::{NodeId, NodeKind, SchemaGraph};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Assigns collision-free type names to schema nodes and renders type
/// references.
///
/// One resolver lives for exactly one generation run. Every node gets at
/// most one name, and no two nodes share one.
#[derive(Debug)]
pub struct TypeResolver {
    language: Language,
    nullable_annotations: bool,
    names: HashMap<NodeId, String>,
    assigned: HashSet<String>,
    faults: Vec<GenerationFault>,
}

impl TypeResolver {
    pub fn new(language: Language, nullable_annotations: bool) -> Self {
        Self {
            language,
            nullable_annotations,
            names: HashMap::new(),
            assigned: language
                .reserved_type_names()
                .iter()
                .map(|name| name.to_string())
                .collect(),
            faults: Vec::new(),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Drains the faults of union variants that were rendered as the top
    /// type instead of failing the whole reference.
    pub fn take_faults(&mut self) -> Vec<GenerationFault> {
        std::mem::take(&mut self.faults)
    }

    /// The name already assigned to `id`, if any.
    pub fn name_of(&self, id: NodeId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    /// Names `id` from `hint` unless it already has a name.
    ///
    /// Returns `None` when no identifier can be derived from the hint.
    pub fn resolve_name(&mut self, id: NodeId, hint: &str) -> Option<String> {
        if let Some(name) = self.names.get(&id) {
            return Some(name.clone());
        }

        let candidate = naming::type_identifier(hint)?;
        let name = if self.assigned.contains(&candidate) {
            naming::with_free_suffix(&candidate, 2, |c| self.assigned.contains(c))
        } else {
            candidate
        };

        debug!("Resolved {} to type name {}", id, name);
        self.assigned.insert(name.clone());
        self.names.insert(id, name.clone());
        Some(name)
    }

    /// Names the node behind `id`. References are followed, so a reference
    /// and its target share a name. The node's own declared name wins over
    /// the contextual `hint`.
    pub fn resolve(
        &mut self,
        graph: &SchemaGraph,
        id: NodeId,
        hint: Option<&str>,
    ) -> Result<String, GenerationFault> {
        let target = graph.dereference(id);
        if let Some(name) = self.names.get(&target) {
            return Ok(name.clone());
        }

        let declared = graph.node(target).and_then(|node| node.declared_name());
        declared
            .into_iter()
            .chain(hint)
            .find_map(|candidate| self.resolve_name(target, candidate))
            .ok_or_else(|| GenerationFault::new(target, hint, FaultKind::Unnamed))
    }

    /// Renders the type reference used where `id` appears as a member,
    /// variant, or item type, naming any nested type along the way.
    ///
    /// Inline value unions are recorded in `features` so the matching
    /// helpers get synthesized. A variant that cannot be rendered becomes
    /// the top type and its fault is kept for [`TypeResolver::take_faults`].
    pub fn resolve_type(
        &mut self,
        graph: &SchemaGraph,
        id: NodeId,
        hint: Option<&str>,
        nullable: bool,
        features: &mut Features,
    ) -> Result<String, GenerationFault> {
        let target = graph.dereference(id);
        let Some(node) = graph.node(target) else {
            return Err(GenerationFault::new(target, hint, FaultKind::Unnamed));
        };

        let (type_name, is_value_type) = match &node.kind {
            NodeKind::Primitive { primitive, format } => {
                let (name, is_value_type) = csharp::primitive_type(*primitive, format.as_deref());
                (name.to_string(), is_value_type)
            }
            NodeKind::Array { items } => {
                let item_hint = hint.map(|h| format!("{}Item", h));
                let item = self.resolve_type(graph, *items, item_hint.as_deref(), false, features)?;
                (csharp::collection_type(&item), false)
            }
            NodeKind::Union { variants } if variants.is_empty() => {
                return Err(GenerationFault::new(target, hint, FaultKind::EmptyUnion));
            }
            NodeKind::Union { variants }
                if node.declared_name().is_none() && self.name_of(target).is_none() =>
            {
                let mut arguments = Vec::with_capacity(variants.len());
                for (index, variant) in variants.iter().enumerate() {
                    let case_hint = hint.map(|h| format!("{}Case{}", h, index + 1));
                    let argument = match self.resolve_type(
                        graph,
                        *variant,
                        case_hint.as_deref(),
                        false,
                        features,
                    ) {
                        Ok(argument) => argument,
                        Err(fault) => {
                            self.faults.push(fault);
                            self.any_type(false)
                        }
                    };
                    arguments.push(argument);
                }
                features.value_unions.insert(variants.len());
                features.abstract_unions.insert(variants.len());
                (csharp::value_union_type(&arguments), false)
            }
            NodeKind::Enumeration { .. } => (self.resolve(graph, target, hint)?, true),
            NodeKind::Object(_) | NodeKind::Union { .. } => {
                (self.resolve(graph, target, hint)?, false)
            }
            NodeKind::Reference { .. } => (csharp::ANY_TYPE.to_string(), false),
        };

        Ok(csharp::nullable_type(
            type_name,
            is_value_type,
            nullable,
            self.nullable_annotations,
        ))
    }

    /// The top type, spelled with the run's nullability rules.
    pub fn any_type(&self, nullable: bool) -> String {
        csharp::nullable_type(
            csharp::ANY_TYPE.to_string(),
            false,
            nullable,
            self.nullable_annotations,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use schemaforge_schema::{PrimitiveType, PropertyDecl, SchemaNode};
    use std::collections::BTreeSet;

    fn resolver() -> TypeResolver {
        TypeResolver::new(Language::CSharp, false)
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let mut graph = SchemaGraph::new();
        let person = graph.add(SchemaNode::new(NodeKind::object(vec![])).with_name("person"));

        let mut resolver = resolver();
        assert_eq!(resolver.resolve(&graph, person, None).unwrap(), "Person");
        assert_eq!(resolver.resolve(&graph, person, Some("Other")).unwrap(), "Person");
    }

    #[test]
    fn test_distinct_nodes_get_suffixed_names() {
        let mut graph = SchemaGraph::new();
        let first = graph.add(SchemaNode::new(NodeKind::object(vec![])).with_name("Person"));
        let second = graph.add(SchemaNode::new(NodeKind::object(vec![])).with_name("Person"));
        let third = graph.add(SchemaNode::new(NodeKind::object(vec![])));

        let mut resolver = resolver();
        assert_eq!(resolver.resolve(&graph, first, None).unwrap(), "Person");
        assert_eq!(resolver.resolve(&graph, second, None).unwrap(), "Person2");
        assert_eq!(resolver.resolve(&graph, third, Some("person")).unwrap(), "Person3");
    }

    #[test]
    fn test_reserved_names_are_never_assigned() {
        let mut graph = SchemaGraph::new();
        let node = graph.add(SchemaNode::new(NodeKind::object(vec![])).with_name("OneOf"));

        let mut resolver = resolver();
        assert_eq!(resolver.resolve(&graph, node, None).unwrap(), "OneOf2");
    }

    #[test]
    fn test_reference_shares_target_name() {
        let mut graph = SchemaGraph::new();
        let target = graph.add(SchemaNode::new(NodeKind::object(vec![])).with_name("Address"));
        let reference = graph.add(SchemaNode::new(NodeKind::Reference { target }));

        let mut resolver = resolver();
        assert_eq!(resolver.resolve(&graph, reference, Some("Home")).unwrap(), "Address");
        assert_eq!(resolver.name_of(target), Some("Address"));
    }

    #[test]
    fn test_unnamed_node_is_a_fault() {
        let mut graph = SchemaGraph::new();
        let node = graph.add(SchemaNode::new(NodeKind::object(vec![])));

        let mut resolver = resolver();
        let fault = resolver.resolve(&graph, node, Some("$$")).unwrap_err();
        assert_eq!(fault.node, node);
        assert_eq!(fault.kind, FaultKind::Unnamed);
        assert_eq!(fault.hint.as_deref(), Some("$$"));
    }

    #[test]
    fn test_type_references() {
        let mut graph = SchemaGraph::new();
        let text = graph.add(SchemaNode::new(NodeKind::primitive(PrimitiveType::String)));
        let count = graph.add(SchemaNode::new(NodeKind::primitive(PrimitiveType::Integer)));
        let tags = graph.add(SchemaNode::new(NodeKind::Array { items: text }));
        let either = graph.add(SchemaNode::new(NodeKind::union(vec![text, count])));
        let color = graph.add(SchemaNode::new(NodeKind::enumeration(["red", "green"])));

        let mut resolver = resolver();
        let mut features = Features::default();

        assert_eq!(
            resolver.resolve_type(&graph, count, None, true, &mut features).unwrap(),
            "int?"
        );
        assert_eq!(
            resolver.resolve_type(&graph, text, None, true, &mut features).unwrap(),
            "string"
        );
        assert_eq!(
            resolver.resolve_type(&graph, tags, Some("tags"), false, &mut features).unwrap(),
            "System.Collections.Generic.ICollection<string>"
        );
        assert_eq!(
            resolver.resolve_type(&graph, either, Some("value"), false, &mut features).unwrap(),
            "OneOf<string, int>"
        );
        assert_eq!(
            resolver.resolve_type(&graph, color, Some("color"), true, &mut features).unwrap(),
            "Color?"
        );

        assert!(features.value_unions.contains(&2));
        assert!(features.abstract_unions.contains(&2));
    }

    #[test]
    fn test_nullable_annotations_mark_reference_types() {
        let mut graph = SchemaGraph::new();
        let text = graph.add(SchemaNode::new(NodeKind::primitive(PrimitiveType::String)));
        let owner =
            graph.add(SchemaNode::new(NodeKind::object(vec![PropertyDecl::new("x", text)])));

        let mut resolver = TypeResolver::new(Language::CSharp, true);
        let mut features = Features::default();
        assert_eq!(
            resolver.resolve_type(&graph, text, None, true, &mut features).unwrap(),
            "string?"
        );
        assert_eq!(
            resolver.resolve_type(&graph, owner, Some("owner"), true, &mut features).unwrap(),
            "Owner?"
        );
        assert_eq!(resolver.any_type(true), "object?");
    }

    #[test]
    fn test_empty_union_is_a_fault() {
        let mut graph = SchemaGraph::new();
        let empty = graph.add(SchemaNode::new(NodeKind::union(vec![])));
        let list = graph.add(SchemaNode::new(NodeKind::Array { items: empty }));

        let mut resolver = resolver();
        let mut features = Features::default();
        let fault = resolver
            .resolve_type(&graph, list, Some("choices"), false, &mut features)
            .unwrap_err();
        assert_eq!(fault.node, empty);
        assert_eq!(fault.kind, FaultKind::EmptyUnion);
        assert!(features.value_unions.is_empty());
    }

    #[test]
    fn test_faulted_variant_keeps_its_siblings() {
        let mut graph = SchemaGraph::new();
        let text = graph.add(SchemaNode::new(NodeKind::primitive(PrimitiveType::String)));
        let count = graph.add(SchemaNode::new(NodeKind::primitive(PrimitiveType::Integer)));
        let cat = graph.add(SchemaNode::new(NodeKind::object(vec![])).with_name("Cat"));
        let either = graph.add(SchemaNode::new(NodeKind::union(vec![text, count])));
        let empty = graph.add(SchemaNode::new(NodeKind::union(vec![])));
        let pet = graph.add(SchemaNode::new(NodeKind::union(vec![cat, either, empty])));

        let mut resolver = resolver();
        let mut features = Features::default();
        assert_eq!(
            resolver.resolve_type(&graph, pet, Some("pet"), false, &mut features).unwrap(),
            "OneOf<Cat, OneOf<string, int>, object>"
        );
        assert_eq!(resolver.name_of(cat), Some("Cat"));
        assert_eq!(features.value_unions, BTreeSet::from([2, 3]));

        let faults = resolver.take_faults();
        assert_eq!(
            faults,
            vec![GenerationFault::new(empty, Some("petCase3"), FaultKind::EmptyUnion)]
        );
        assert!(resolver.take_faults().is_empty());
    }

    proptest! {
        #[test]
        fn distinct_nodes_never_share_a_name(
            hints in proptest::collection::vec("[A-Za-z]{1,3}", 1..40)
        ) {
            let mut graph = SchemaGraph::new();
            let ids: Vec<NodeId> = hints
                .iter()
                .map(|hint| {
                    graph.add(SchemaNode::new(NodeKind::object(vec![])).with_name(hint.clone()))
                })
                .collect();

            let mut resolver = resolver();
            let names: Vec<String> = ids
                .iter()
                .map(|id| resolver.resolve(&graph, *id, None).unwrap())
                .collect();

            let unique: HashSet<&String> = names.iter().collect();
            prop_assert_eq!(unique.len(), names.len());

            for (id, name) in ids.iter().zip(&names) {
                prop_assert_eq!(&resolver.resolve(&graph, *id, Some("Other")).unwrap(), name);
            }
        }
    }
}
