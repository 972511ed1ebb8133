//! C# specifics: type mapping, literals, and the post-processing passes that
//! turn base artifacts into one compilation unit.

use crate::artifact::{ArtifactCategory, ArtifactKind, CodeArtifact};
use crate::base::Features;
use crate::config::GenerationSettings;
use crate::error::Result;
use crate::model::{DateFormatConverterModel, FileModel, UnionHelperModel};
use crate::templates::render_model;
use crate::Language;
use schemaforge_schema::PrimitiveType;
use serde_json::json;
use tracing::debug;

pub const FILE_TEMPLATE: &str = "File";
pub const CLASS_TEMPLATE: &str = "Class";
pub const ENUM_TEMPLATE: &str = "Enum";
pub const NAMED_UNION_TEMPLATE: &str = "OneOfNamed";
pub const VALUE_UNION_TEMPLATE: &str = "OneOfAnonymous";
pub const ABSTRACT_UNION_TEMPLATE: &str = "OneOfBase";

pub const ONE_OF: &str = "OneOf";
pub const ONE_OF_BASE: &str = "OneOfBase";
pub const ONE_OF_CONVERTER: &str = "OneOfConverter";
pub const JSON_INHERITANCE_ATTRIBUTE: &str = "JsonInheritanceAttribute";
pub const JSON_INHERITANCE_CONVERTER: &str = "JsonInheritanceConverter";
pub const DATE_FORMAT_CONVERTER: &str = "DateFormatConverter";

pub const RESERVED_TYPE_NAMES: &[&str] = &[
    ONE_OF,
    ONE_OF_BASE,
    ONE_OF_CONVERTER,
    JSON_INHERITANCE_ATTRIBUTE,
    JSON_INHERITANCE_CONVERTER,
    DATE_FORMAT_CONVERTER,
];

/// The top type; used for `any` and for members whose type could not be
/// generated.
pub const ANY_TYPE: &str = "object";

const LANGUAGE: Language = Language::CSharp;

/// Artifact name of the value-union helper of the given arity, in CLR
/// metadata notation.
pub fn value_union_name(arity: usize) -> String {
    format!("{}`{}", ONE_OF, arity)
}

pub fn abstract_union_name(arity: usize) -> String {
    format!("{}`{}", ONE_OF_BASE, arity)
}

/// Maps a primitive to a built-in type. The flag tells whether the type is
/// a value type, which decides how nullability is spelled.
pub fn primitive_type(primitive: PrimitiveType, format: Option<&str>) -> (&'static str, bool) {
    match (primitive, format) {
        (PrimitiveType::String, Some("date-time")) => ("System.DateTimeOffset", true),
        (PrimitiveType::String, Some("date")) => ("System.DateTime", true),
        (PrimitiveType::String, Some("time" | "duration" | "time-span")) => {
            ("System.TimeSpan", true)
        }
        (PrimitiveType::String, Some("uuid" | "guid")) => ("System.Guid", true),
        (PrimitiveType::String, Some("uri")) => ("System.Uri", false),
        (PrimitiveType::String, Some("byte" | "binary")) => ("byte[]", false),
        (PrimitiveType::String, _) => ("string", false),
        (PrimitiveType::Integer, Some("int64")) => ("long", true),
        (PrimitiveType::Integer, _) => ("int", true),
        (PrimitiveType::Number, Some("decimal")) => ("decimal", true),
        (PrimitiveType::Number, Some("float")) => ("float", true),
        (PrimitiveType::Number, _) => ("double", true),
        (PrimitiveType::Boolean, _) => ("bool", true),
        (PrimitiveType::Any, _) => (ANY_TYPE, false),
    }
}

/// Plain dates need the date-format converter; everything else round-trips
/// with the serializer defaults.
pub fn is_date_format(primitive: PrimitiveType, format: Option<&str>) -> bool {
    primitive == PrimitiveType::String && format == Some("date")
}

pub fn collection_type(item_type: &str) -> String {
    format!("System.Collections.Generic.ICollection<{}>", item_type)
}

pub fn value_union_type(type_arguments: &[String]) -> String {
    format!("{}<{}>", ONE_OF, type_arguments.join(", "))
}

pub fn nullable_type(
    type_name: String,
    is_value_type: bool,
    nullable: bool,
    nullable_annotations: bool,
) -> String {
    if nullable && (is_value_type || nullable_annotations) {
        format!("{}?", type_name)
    } else {
        type_name
    }
}

/// Quotes `value` as a regular C# string literal.
pub fn string_literal(value: &str) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push('"');
    for c in value.chars() {
        match c {
            '"' => literal.push_str("\\\""),
            '\\' => literal.push_str("\\\\"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\t' => literal.push_str("\\t"),
            '\0' => literal.push_str("\\0"),
            c if c.is_control() => literal.push_str(&format!("\\u{:04x}", c as u32)),
            c => literal.push(c),
        }
    }
    literal.push('"');
    literal
}

/// Splits a description into XML-escaped lines for a `<summary>` block.
pub fn doc_lines(text: Option<&str>) -> Vec<String> {
    let Some(text) = text else {
        return Vec::new();
    };
    text.lines()
        .map(|line| {
            line.trim_end()
                .replace('&', "&amp;")
                .replace('<', "&lt;")
                .replace('>', "&gt;")
        })
        .collect()
}

/// Pass A: one value-union helper per distinct inline arity and one
/// abstract-union helper per distinct arity of any union.
pub fn synthesize_union_helpers(
    features: &Features,
    settings: &GenerationSettings,
) -> Result<Vec<CodeArtifact>> {
    let mut helpers = Vec::new();

    for &arity in &features.value_unions {
        let code = render_model(
            settings.template_factory.as_ref(),
            LANGUAGE,
            VALUE_UNION_TEMPLATE,
            &UnionHelperModel::new(arity),
        )?;
        helpers.push(
            CodeArtifact::new(
                value_union_name(arity),
                ArtifactKind::UnionHelper,
                ArtifactCategory::Utility,
                LANGUAGE,
                code,
            )
            .with_base_type(Some(abstract_union_name(arity))),
        );
    }

    for &arity in &features.abstract_unions {
        let code = render_model(
            settings.template_factory.as_ref(),
            LANGUAGE,
            ABSTRACT_UNION_TEMPLATE,
            &UnionHelperModel::new(arity),
        )?;
        helpers.push(CodeArtifact::new(
            abstract_union_name(arity),
            ArtifactKind::UnionHelper,
            ArtifactCategory::Utility,
            LANGUAGE,
            code,
        ));
    }

    debug!("Synthesized {} union helpers", helpers.len());
    Ok(helpers)
}

/// Pass B: utilities demanded by the feature record. The union converter is
/// needed exactly when Pass A produced helpers. Excluded names are skipped.
pub fn inject_utilities(
    features: &Features,
    has_union_helpers: bool,
    settings: &GenerationSettings,
) -> Result<Vec<CodeArtifact>> {
    let mut wanted: Vec<(&str, serde_json::Value)> = Vec::new();

    if features.inheritance {
        wanted.push((JSON_INHERITANCE_ATTRIBUTE, json!({})));
        wanted.push((JSON_INHERITANCE_CONVERTER, json!({})));
    }
    if features.date_format {
        let model = DateFormatConverterModel {
            date_format: string_literal(&settings.date_format),
        };
        wanted.push((DATE_FORMAT_CONVERTER, serde_json::to_value(model)?));
    }
    if has_union_helpers {
        wanted.push((ONE_OF_CONVERTER, json!({})));
    }

    let mut utilities = Vec::new();
    for (name, model) in wanted {
        if settings.is_excluded(name) {
            debug!("Skipping excluded utility {}", name);
            continue;
        }
        let code = settings.template_factory.render(LANGUAGE, name, &model)?;
        utilities.push(CodeArtifact::new(
            name,
            ArtifactKind::Utility,
            ArtifactCategory::Utility,
            LANGUAGE,
            code,
        ));
    }

    Ok(utilities)
}

/// Pass C: renders all artifacts, in order, into a single file.
pub fn generate_file(artifacts: &[CodeArtifact], settings: &GenerationSettings) -> Result<String> {
    let types_code = artifacts
        .iter()
        .map(|artifact| artifact.code().trim())
        .filter(|code| !code.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");

    let model = FileModel {
        namespace: settings.namespace.clone(),
        nullable_annotations: settings.nullable_annotations,
        types_code,
    };
    let code = render_model(
        settings.template_factory.as_ref(),
        LANGUAGE,
        FILE_TEMPLATE,
        &model,
    )?;

    Ok(trim_white_spaces(&code))
}

/// Collapses runs of blank lines, drops blank lines that directly follow an
/// opening brace or precede a closing one, and strips trailing whitespace.
pub fn trim_white_spaces(code: &str) -> String {
    let lines: Vec<&str> = code.lines().map(str::trim_end).collect();
    let mut kept: Vec<&str> = Vec::with_capacity(lines.len());

    for (index, line) in lines.iter().enumerate() {
        if line.is_empty() {
            let after_open = kept
                .last()
                .map_or(true, |previous| previous.is_empty() || previous.ends_with('{'));
            let before_close = lines[index + 1..]
                .iter()
                .find(|next| !next.is_empty())
                .map_or(true, |next| next.trim_start().starts_with('}'));
            if after_open || before_close {
                continue;
            }
        }
        kept.push(line);
    }

    let mut result = kept.join("\n");
    result.push('\n');
    result
}
