//! The base generation walk: one contract artifact per reachable named node,
//! plus the record of features those artifacts depend on.

use crate::artifact::{ArtifactCategory, ArtifactKind, CodeArtifact};
use crate::config::GenerationSettings;
use crate::csharp;
use crate::error::{FaultKind, GenerationFault, Result};
use crate::model::{
    ClassModel, DiscriminatorMappingModel, DiscriminatorModel, EnumMemberModel, EnumModel,
    NamedUnionModel, PropertyModel, UnionVariantModel,
};
use crate::naming;
use crate::resolver::TypeResolver;
use crate::templates::render_model;
use crate::Language;
use schemaforge_schema::{NodeId, NodeKind, ObjectShape, PrimitiveType, SchemaGraph, SchemaNode};
use serde_json::Value;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, warn};

/// What the base artifacts need from post-processing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Features {
    /// Some class carries a discriminator.
    pub inheritance: bool,
    /// Some member is a plain date.
    pub date_format: bool,
    /// Arities of inline value unions.
    pub value_unions: BTreeSet<usize>,
    /// Arities of every union, inline or named.
    pub abstract_unions: BTreeSet<usize>,
}

#[derive(Debug)]
pub struct BaseOutput {
    pub artifacts: Vec<CodeArtifact>,
    pub features: Features,
    pub faults: Vec<GenerationFault>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Root,
    Nested,
}

type Children = Vec<(NodeId, Option<String>)>;

pub struct BaseGenerator<'a> {
    graph: &'a SchemaGraph,
    settings: &'a GenerationSettings,
    language: Language,
    resolver: TypeResolver,
    features: Features,
    artifacts: Vec<CodeArtifact>,
    faults: Vec<GenerationFault>,
    visited: HashSet<NodeId>,
    inline_nodes: HashSet<NodeId>,
}

impl<'a> BaseGenerator<'a> {
    pub fn new(
        graph: &'a SchemaGraph,
        settings: &'a GenerationSettings,
        language: Language,
    ) -> Self {
        let inline_nodes = graph
            .nodes
            .iter()
            .filter_map(|node| match &node.kind {
                NodeKind::Object(shape) => Some(shape),
                _ => None,
            })
            .flat_map(|shape| shape.properties.iter())
            .filter(|property| property.inline)
            .map(|property| graph.dereference(property.schema))
            .collect();

        Self {
            graph,
            settings,
            language,
            resolver: TypeResolver::new(language, settings.nullable_annotations),
            features: Features::default(),
            artifacts: Vec::new(),
            faults: Vec::new(),
            visited: HashSet::new(),
            inline_nodes,
        }
    }

    pub fn generate(mut self) -> Result<BaseOutput> {
        let root = self.graph.root;
        let root_hint = self.settings.root_type_name.clone();
        self.visit(root, root_hint.as_deref(), Position::Root)?;

        debug!(
            "Base generation produced {} artifacts and {} faults",
            self.artifacts.len(),
            self.faults.len()
        );

        Ok(BaseOutput {
            artifacts: self.artifacts,
            features: self.features,
            faults: self.faults,
        })
    }

    fn visit(&mut self, id: NodeId, hint: Option<&str>, position: Position) -> Result<()> {
        let graph = self.graph;
        let target = graph.dereference(id);
        if !self.visited.insert(target) {
            return Ok(());
        }
        let Some(node) = graph.node(target) else {
            return Ok(());
        };

        let children = match &node.kind {
            NodeKind::Enumeration { values } => {
                let Some(name) = self.name(target, hint) else {
                    return Ok(());
                };
                self.generate_enum(node, &name, values)?;
                Vec::new()
            }
            NodeKind::Union { variants } if variants.is_empty() => {
                self.report(GenerationFault::new(target, hint, FaultKind::EmptyUnion));
                Vec::new()
            }
            NodeKind::Union { variants } if self.is_named_union(target, node, position) => {
                let Some(name) = self.name(target, hint) else {
                    return Ok(());
                };
                self.generate_named_union(target, node, &name, variants)?
            }
            NodeKind::Union { variants } => variants
                .iter()
                .enumerate()
                .map(|(index, variant)| (*variant, hint.map(|h| format!("{}Case{}", h, index + 1))))
                .collect(),
            NodeKind::Object(shape) => {
                let Some(name) = self.name(target, hint) else {
                    return Ok(());
                };
                self.generate_class(target, node, shape, &name)?
            }
            NodeKind::Array { items } => vec![(*items, hint.map(|h| format!("{}Item", h)))],
            NodeKind::Primitive { .. } | NodeKind::Reference { .. } => Vec::new(),
        };

        for (child, child_hint) in children {
            self.visit(child, child_hint.as_deref(), Position::Nested)?;
        }
        Ok(())
    }

    /// Nested unions without a declared name are rendered inline and get no
    /// artifact of their own.
    fn is_named_union(&self, target: NodeId, node: &SchemaNode, position: Position) -> bool {
        position == Position::Root
            || node.declared_name().is_some()
            || self.resolver.name_of(target).is_some()
    }

    fn name(&mut self, target: NodeId, hint: Option<&str>) -> Option<String> {
        match self.resolver.resolve(self.graph, target, hint) {
            Ok(name) => Some(name),
            Err(fault) => {
                self.report(fault);
                None
            }
        }
    }

    fn report(&mut self, fault: GenerationFault) {
        let seen = self
            .faults
            .iter()
            .any(|known| known.node == fault.node && known.kind == fault.kind);
        if !seen {
            warn!("Skipping {}", fault);
            self.faults.push(fault);
        }
    }

    /// Renders a member or variant type, reporting every fault met on the
    /// way. `None` when the reference itself cannot be rendered.
    fn member_type(&mut self, id: NodeId, hint: &str, nullable: bool) -> Option<String> {
        let resolved = self.resolver.resolve_type(
            self.graph,
            id,
            Some(hint),
            nullable,
            &mut self.features,
        );
        for fault in self.resolver.take_faults() {
            self.report(fault);
        }
        match resolved {
            Ok(type_name) => Some(type_name),
            Err(fault) => {
                self.report(fault);
                None
            }
        }
    }

    fn render<M: serde::Serialize>(&self, template: &str, model: &M) -> Result<String> {
        render_model(
            self.settings.template_factory.as_ref(),
            self.language,
            template,
            model,
        )
    }

    fn generate_class(
        &mut self,
        target: NodeId,
        node: &SchemaNode,
        shape: &ObjectShape,
        type_name: &str,
    ) -> Result<Children> {
        let graph = self.graph;
        let mut children = Vec::new();

        let base_name = match shape.base {
            Some(base) => {
                let hint = format!("{}Base", type_name);
                match self.resolver.resolve(graph, base, Some(&hint)) {
                    Ok(base_name) => {
                        children.push((base, Some(hint)));
                        Some(base_name)
                    }
                    Err(fault) => {
                        self.report(fault);
                        None
                    }
                }
            }
            None => None,
        };

        let discriminator_property = inherited_discriminator(graph, target);

        let mut properties = Vec::with_capacity(shape.properties.len());
        for property in &shape.properties {
            if discriminator_property == Some(property.name.as_str()) {
                continue;
            }

            let nullable = property.nullable || !property.required;
            let property_type = match self.member_type(property.schema, &property.name, nullable) {
                Some(property_type) => {
                    children.push((property.schema, Some(property.name.clone())));
                    property_type
                }
                None => self.resolver.any_type(nullable),
            };

            let schema = graph.node(graph.dereference(property.schema));
            let date_format = matches!(
                schema.map(|n| &n.kind),
                Some(NodeKind::Primitive { primitive: PrimitiveType::String, format })
                    if csharp::is_date_format(PrimitiveType::String, format.as_deref())
            );
            self.features.date_format |= date_format;

            let description = property.description().or_else(|| {
                if property.inline {
                    schema.and_then(SchemaNode::description)
                } else {
                    None
                }
            });

            properties.push(PropertyModel {
                raw_name: property.name.clone(),
                name: naming::sanitize(&property.name, property.name_override()),
                owner: type_name.to_string(),
                json_name: csharp::string_literal(&property.name),
                type_name: property_type,
                required: property.required,
                nullable: property.nullable,
                description: csharp::doc_lines(description),
                date_format,
            });
        }
        resolve_member_collisions(type_name, &mut properties);

        let discriminator = match &shape.discriminator {
            Some(discriminator) => {
                self.features.inheritance = true;
                let mut mappings = Vec::with_capacity(discriminator.mapping.len());
                for mapping in &discriminator.mapping {
                    match self.resolver.resolve(graph, mapping.target, Some(&mapping.value)) {
                        Ok(subtype) => {
                            children.push((mapping.target, Some(mapping.value.clone())));
                            mappings.push(DiscriminatorMappingModel {
                                value: csharp::string_literal(&mapping.value),
                                type_name: subtype,
                            });
                        }
                        Err(fault) => self.report(fault),
                    }
                }
                Some(DiscriminatorModel {
                    property_name: csharp::string_literal(&discriminator.property_name),
                    mappings,
                })
            }
            None => None,
        };

        let model = ClassModel {
            type_name: type_name.to_string(),
            base_name: base_name.clone(),
            is_abstract: shape.is_abstract,
            description: csharp::doc_lines(node.description()),
            discriminator,
            properties,
        };
        let code = self.render(csharp::CLASS_TEMPLATE, &model)?;

        debug!("Generated class {}", type_name);
        self.artifacts.push(
            CodeArtifact::new(
                type_name,
                ArtifactKind::Class,
                ArtifactCategory::Contract,
                self.language,
                code,
            )
            .with_base_type(base_name),
        );

        Ok(children)
    }

    fn generate_enum(
        &mut self,
        node: &SchemaNode,
        type_name: &str,
        values: &[Value],
    ) -> Result<()> {
        let literals: Vec<&Value> = values.iter().filter(|value| !value.is_null()).collect();
        let is_string_enum = literals.is_empty() || literals.iter().any(|value| !value.is_i64());

        let mut used = HashSet::from([type_name.to_string()]);
        let mut numbers = HashSet::new();
        let mut members = Vec::with_capacity(literals.len());
        for (index, value) in literals.iter().enumerate() {
            let (raw, literal, number) = match value.as_i64() {
                Some(number) if !is_string_enum => {
                    // a repeated number is the same member
                    if !numbers.insert(number) {
                        continue;
                    }
                    let raw = if number < 0 {
                        format!("Minus{}", number.unsigned_abs())
                    } else {
                        number.to_string()
                    };
                    (raw, number.to_string(), number)
                }
                _ => {
                    let text = value
                        .as_str()
                        .map(str::to_string)
                        .unwrap_or_else(|| value.to_string());
                    (text.clone(), text, index as i64)
                }
            };

            let mut name = naming::sanitize(&raw, None);
            if used.contains(&name) {
                // digits appended to a numeric name would read as another number
                let base = if is_string_enum { name } else { format!("{}_", name) };
                name = naming::with_free_suffix(&base, 2, |c| used.contains(c));
            }
            used.insert(name.clone());

            members.push(EnumMemberModel {
                name,
                value: csharp::string_literal(&literal),
                number,
            });
        }

        let model = EnumModel {
            type_name: type_name.to_string(),
            description: csharp::doc_lines(node.description()),
            is_string_enum,
            members,
        };
        let code = self.render(csharp::ENUM_TEMPLATE, &model)?;

        debug!("Generated enum {}", type_name);
        self.artifacts.push(CodeArtifact::new(
            type_name,
            ArtifactKind::Enum,
            ArtifactCategory::Contract,
            self.language,
            code,
        ));
        Ok(())
    }

    fn generate_named_union(
        &mut self,
        target: NodeId,
        node: &SchemaNode,
        type_name: &str,
        variants: &[NodeId],
    ) -> Result<Children> {
        let graph = self.graph;
        let mut children = Vec::new();
        let mut case_names = HashSet::new();
        let mut variant_models = Vec::with_capacity(variants.len());

        for (index, variant) in variants.iter().enumerate() {
            let case_hint = graph
                .node(graph.dereference(*variant))
                .and_then(SchemaNode::declared_name)
                .map(str::to_string)
                .unwrap_or_else(|| format!("{}Case{}", type_name, index + 1));

            let variant_type = match self.member_type(*variant, &case_hint, false) {
                Some(variant_type) => {
                    children.push((*variant, Some(case_hint.clone())));
                    variant_type
                }
                None => self.resolver.any_type(false),
            };

            let mut case_name = naming::sanitize(&case_hint, None);
            if case_names.contains(&case_name) {
                case_name = naming::with_free_suffix(&case_name, 2, |c| case_names.contains(c));
            }
            case_names.insert(case_name.clone());

            variant_models.push(UnionVariantModel {
                type_name: variant_type,
                case_name,
            });
        }

        let arity = variants.len();
        self.features.abstract_unions.insert(arity);

        // an inline union's description belongs to the property declaring it
        let description = if self.inline_nodes.contains(&target) {
            Vec::new()
        } else {
            csharp::doc_lines(node.description())
        };

        let type_arguments = variant_models
            .iter()
            .map(|variant| variant.type_name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let model = NamedUnionModel {
            type_name: type_name.to_string(),
            description,
            arity,
            type_arguments,
            variants: variant_models,
        };
        let code = self.render(csharp::NAMED_UNION_TEMPLATE, &model)?;

        debug!("Generated union {} with {} cases", type_name, arity);
        self.artifacts.push(
            CodeArtifact::new(
                type_name,
                ArtifactKind::Class,
                ArtifactCategory::Contract,
                self.language,
                code,
            )
            .with_base_type(Some(csharp::abstract_union_name(arity))),
        );

        Ok(children)
    }
}

/// The discriminator property declared by `id` or its nearest ancestor.
fn inherited_discriminator(graph: &SchemaGraph, id: NodeId) -> Option<&str> {
    let mut current = Some(graph.dereference(id));
    // bounded: validated graphs have acyclic base chains
    for _ in 0..graph.len() {
        let shape = match graph.node(current?).map(|node| &node.kind) {
            Some(NodeKind::Object(shape)) => shape,
            _ => return None,
        };
        if let Some(discriminator) = &shape.discriminator {
            return Some(discriminator.property_name.as_str());
        }
        current = shape.base.map(|base| graph.dereference(base));
    }
    None
}

/// Renames members that clash with their owning type or an earlier sibling,
/// appending the smallest positive integer not used by any member.
pub fn resolve_member_collisions(type_name: &str, properties: &mut [PropertyModel]) {
    let declared: HashSet<String> = properties.iter().map(|p| p.name.clone()).collect();
    let mut used: HashSet<String> = HashSet::new();

    for property in properties.iter_mut() {
        if property.name == type_name || used.contains(&property.name) {
            property.name = naming::with_free_suffix(&property.name, 1, |candidate| {
                candidate == type_name || used.contains(candidate) || declared.contains(candidate)
            });
        }
        used.insert(property.name.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemaforge_schema::{Discriminator, DiscriminatorMapping, PropertyDecl};

    fn run(graph: &SchemaGraph) -> BaseOutput {
        let settings = GenerationSettings::new().unwrap();
        BaseGenerator::new(graph, &settings, Language::CSharp)
            .generate()
            .unwrap()
    }

    fn names(output: &BaseOutput) -> Vec<&str> {
        output.artifacts.iter().map(|a| a.type_name()).collect()
    }

    fn string(graph: &mut SchemaGraph) -> NodeId {
        graph.add(SchemaNode::new(NodeKind::primitive(PrimitiveType::String)))
    }

    fn property(name: &str) -> PropertyModel {
        PropertyModel {
            raw_name: name.to_string(),
            name: naming::sanitize(name, None),
            owner: "Person".to_string(),
            json_name: csharp::string_literal(name),
            type_name: "string".to_string(),
            required: false,
            nullable: false,
            description: Vec::new(),
            date_format: false,
        }
    }

    #[test]
    fn test_property_named_like_its_type_is_suffixed() {
        let mut graph = SchemaGraph::new();
        let text = string(&mut graph);
        let person = graph.add(
            SchemaNode::new(NodeKind::object(vec![PropertyDecl::new("Person", text)]))
                .with_name("Person"),
        );
        graph.set_root(person);

        let output = run(&graph);
        assert_eq!(names(&output), vec!["Person"]);
        let code = output.artifacts[0].code();
        assert!(code.contains("public string Person1 { get; set; }"));
        assert!(code.contains("JsonProperty(\"Person\""));
    }

    #[test]
    fn test_member_collisions() {
        let mut properties = vec![
            property("Person"),
            property("person1"),
            property("first_name"),
            property("firstName"),
        ];
        resolve_member_collisions("Person", &mut properties);
        let names: Vec<&str> = properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Person2", "Person1", "FirstName", "FirstName1"]);
    }

    #[test]
    fn test_discovery_is_depth_first_pre_order() {
        let mut graph = SchemaGraph::new();
        let text = string(&mut graph);
        let address = graph.add(SchemaNode::new(NodeKind::object(vec![PropertyDecl::new(
            "street", text,
        )])));
        let customer = graph.add(
            SchemaNode::new(NodeKind::object(vec![PropertyDecl::new("address", address)]))
                .with_name("Customer"),
        );
        let product = graph.add(SchemaNode::new(NodeKind::object(vec![])).with_name("Product"));
        let items = graph.add(SchemaNode::new(NodeKind::Array { items: product }));
        let order = graph.add(
            SchemaNode::new(NodeKind::object(vec![
                PropertyDecl::new("customer", customer),
                PropertyDecl::new("lines", items),
                PropertyDecl::new("billing", customer),
            ]))
            .with_name("Order"),
        );
        graph.set_root(order);

        let output = run(&graph);
        assert_eq!(names(&output), vec!["Order", "Customer", "Address", "Product"]);
        let order = output.artifacts[0].code();
        assert!(order.contains(
            "public System.Collections.Generic.ICollection<Product> Lines { get; set; }"
        ));
        assert!(output.faults.is_empty());
    }

    #[test]
    fn test_inline_union_description_is_suppressed() {
        let mut graph = SchemaGraph::new();
        let text = string(&mut graph);
        let cat = graph.add(SchemaNode::new(NodeKind::object(vec![])).with_name("Cat"));
        let dog = graph.add(SchemaNode::new(NodeKind::object(vec![])).with_name("Dog"));
        let pet = graph.add(
            SchemaNode::new(NodeKind::union(vec![cat, dog]))
                .with_name("Pet")
                .with_description("Any pet."),
        );
        let owner = graph.add(
            SchemaNode::new(NodeKind::object(vec![
                PropertyDecl::new("name", text),
                PropertyDecl::new("pet", pet).inline(),
            ]))
            .with_name("Owner"),
        );
        graph.set_root(owner);

        let output = run(&graph);
        assert_eq!(names(&output), vec!["Owner", "Pet", "Cat", "Dog"]);

        let union = &output.artifacts[1];
        assert!(!union.code().contains("<summary>"));
        assert!(union.code().contains("public partial class Pet : OneOfBase<Cat, Dog>"));
        assert_eq!(union.base_type_name(), Some("OneOfBase`2"));
        assert!(output.artifacts[0].code().contains("/// Any pet."));
        assert!(output.features.abstract_unions.contains(&2));
        assert!(output.features.value_unions.is_empty());
    }

    #[test]
    fn test_referenced_union_keeps_its_description() {
        let mut graph = SchemaGraph::new();
        let cat = graph.add(SchemaNode::new(NodeKind::object(vec![])).with_name("Cat"));
        let dog = graph.add(SchemaNode::new(NodeKind::object(vec![])).with_name("Dog"));
        let pet = graph.add(
            SchemaNode::new(NodeKind::union(vec![cat, dog]))
                .with_name("Pet")
                .with_description("Any pet."),
        );
        let owner = graph.add(
            SchemaNode::new(NodeKind::object(vec![PropertyDecl::new("pet", pet)]))
                .with_name("Owner"),
        );
        graph.set_root(owner);

        let output = run(&graph);
        assert!(output.artifacts[1].code().contains("/// Any pet."));
    }

    #[test]
    fn test_unnamed_union_is_inlined() {
        let mut graph = SchemaGraph::new();
        let text = string(&mut graph);
        let number = graph.add(SchemaNode::new(NodeKind::primitive(PrimitiveType::Number)));
        let value = graph.add(SchemaNode::new(NodeKind::union(vec![text, number])));
        let cell = graph.add(
            SchemaNode::new(NodeKind::object(vec![PropertyDecl::new("value", value).required()]))
                .with_name("Cell"),
        );
        graph.set_root(cell);

        let output = run(&graph);
        assert_eq!(names(&output), vec!["Cell"]);
        assert!(output.artifacts[0]
            .code()
            .contains("public OneOf<string, double> Value { get; set; }"));
        assert_eq!(output.features.value_unions, BTreeSet::from([2]));
    }

    #[test]
    fn test_empty_union_is_reported_and_siblings_continue() {
        let mut graph = SchemaGraph::new();
        let text = string(&mut graph);
        let empty = graph.add(SchemaNode::new(NodeKind::union(vec![])).with_name("Nothing"));
        let tag = graph.add(SchemaNode::new(NodeKind::object(vec![])).with_name("Tag"));
        let holder = graph.add(
            SchemaNode::new(NodeKind::object(vec![
                PropertyDecl::new("broken", empty),
                PropertyDecl::new("label", text),
                PropertyDecl::new("tag", tag),
            ]))
            .with_name("Holder"),
        );
        graph.set_root(holder);

        let output = run(&graph);
        assert_eq!(names(&output), vec!["Holder", "Tag"]);
        assert_eq!(output.faults.len(), 1);
        assert_eq!(output.faults[0].node, empty);
        assert_eq!(output.faults[0].kind, FaultKind::EmptyUnion);

        let code = output.artifacts[0].code();
        assert!(code.contains("public object Broken { get; set; }"));
        assert!(code.contains("public string Label { get; set; }"));
    }

    #[test]
    fn test_unnamed_root_is_a_fault() {
        let mut graph = SchemaGraph::new();
        let root = graph.add(SchemaNode::new(NodeKind::object(vec![])));
        graph.set_root(root);

        let output = run(&graph);
        assert!(output.artifacts.is_empty());
        assert_eq!(output.faults, vec![GenerationFault::new(root, None, FaultKind::Unnamed)]);

        let settings = GenerationSettings::new().unwrap().with_root_type_name("Document");
        let output = BaseGenerator::new(&graph, &settings, Language::CSharp)
            .generate()
            .unwrap();
        assert_eq!(names(&output), vec!["Document"]);
    }

    #[test]
    fn test_discriminator_sets_inheritance() {
        let mut graph = SchemaGraph::new();
        let text = string(&mut graph);
        let shape = graph.add(SchemaNode::new(NodeKind::Object(ObjectShape {
            properties: vec![
                PropertyDecl::new("kind", text).required(),
                PropertyDecl::new("area", text),
            ],
            is_abstract: true,
            discriminator: Some(Discriminator {
                property_name: "kind".to_string(),
                mapping: vec![DiscriminatorMapping {
                    value: "circle".to_string(),
                    target: NodeId(2),
                }],
            }),
            ..ObjectShape::default()
        }))
        .with_name("Shape"));
        graph.add(SchemaNode::new(NodeKind::Object(ObjectShape {
            properties: vec![PropertyDecl::new("kind", text), PropertyDecl::new("radius", text)],
            base: Some(shape),
            ..ObjectShape::default()
        })));
        graph.set_root(shape);

        let output = run(&graph);
        assert_eq!(names(&output), vec!["Shape", "Circle"]);
        assert!(output.features.inheritance);

        let base = output.artifacts[0].code();
        assert!(base.contains(
            "[Newtonsoft.Json.JsonConverter(typeof(JsonInheritanceConverter), \"kind\")]"
        ));
        assert!(base.contains("[JsonInheritanceAttribute(\"circle\", typeof(Circle))]"));
        assert!(base.contains("public abstract partial class Shape"));
        assert!(!base.contains(" Kind "));

        let circle = &output.artifacts[1];
        assert_eq!(circle.base_type_name(), Some("Shape"));
        assert!(circle.code().contains("public partial class Circle : Shape"));
        assert!(!circle.code().contains(" Kind "));
    }

    #[test]
    fn test_date_property_uses_converter() {
        let mut graph = SchemaGraph::new();
        let date = graph.add(SchemaNode::new(NodeKind::formatted(PrimitiveType::String, "date")));
        let event = graph.add(
            SchemaNode::new(NodeKind::object(vec![PropertyDecl::new("day", date).required()]))
                .with_name("Event"),
        );
        graph.set_root(event);

        let output = run(&graph);
        assert!(output.features.date_format);
        let code = output.artifacts[0].code();
        assert!(code.contains("[Newtonsoft.Json.JsonConverter(typeof(DateFormatConverter))]"));
        assert!(code.contains("public System.DateTime Day { get; set; }"));
    }

    #[test]
    fn test_enums() {
        let mut graph = SchemaGraph::new();
        let status = graph.add(
            SchemaNode::new(NodeKind::enumeration(["open", "in-progress", "open!"]))
                .with_name("Status"),
        );
        let level =
            graph.add(SchemaNode::new(NodeKind::enumeration([1, 2, -1, 1])).with_name("Level"));
        let ticket = graph.add(
            SchemaNode::new(NodeKind::object(vec![
                PropertyDecl::new("status", status).required(),
                PropertyDecl::new("level", level),
            ]))
            .with_name("Ticket"),
        );
        graph.set_root(ticket);

        let output = run(&graph);
        assert_eq!(names(&output), vec!["Ticket", "Status", "Level"]);

        let ticket = output.artifacts[0].code();
        assert!(ticket.contains("public Status Status { get; set; }"));
        assert!(ticket.contains("public Level? Level { get; set; }"));

        let status = output.artifacts[1].code();
        assert!(status
            .contains("[System.Runtime.Serialization.EnumMember(Value = \"in-progress\")]"));
        assert!(status.contains("InProgress = 1,"));
        assert!(status.contains("Open2 = 2,"));

        let level = output.artifacts[2].code();
        assert!(!level.contains("EnumMember"));
        assert!(level.contains("_1 = 1,"));
        assert!(level.contains("Minus1 = -1,"));
        assert_eq!(level.matches("= 1,").count(), 1);
        assert!(!level.contains("_12"));
    }
}
