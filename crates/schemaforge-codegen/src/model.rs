//! Template models handed to the template renderer.

use serde::Serialize;

/// A member of a generated class.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PropertyModel {
    /// Member name as declared in the schema.
    pub raw_name: String,
    /// Sanitized identifier; never equal to `owner`.
    pub name: String,
    pub owner: String,
    /// `raw_name` as a target-language string literal.
    pub json_name: String,
    pub type_name: String,
    pub required: bool,
    pub nullable: bool,
    pub description: Vec<String>,
    pub date_format: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassModel {
    pub type_name: String,
    pub base_name: Option<String>,
    pub is_abstract: bool,
    pub description: Vec<String>,
    pub discriminator: Option<DiscriminatorModel>,
    pub properties: Vec<PropertyModel>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscriminatorModel {
    pub property_name: String,
    pub mappings: Vec<DiscriminatorMappingModel>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscriminatorMappingModel {
    pub value: String,
    pub type_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnumModel {
    pub type_name: String,
    pub description: Vec<String>,
    pub is_string_enum: bool,
    pub members: Vec<EnumMemberModel>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EnumMemberModel {
    pub name: String,
    /// The literal as a target-language string literal.
    pub value: String,
    pub number: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NamedUnionModel {
    pub type_name: String,
    pub description: Vec<String>,
    pub arity: usize,
    pub type_arguments: String,
    pub variants: Vec<UnionVariantModel>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UnionVariantModel {
    pub type_name: String,
    pub case_name: String,
}

/// Model shared by both union helper families; only the arity varies.
#[derive(Debug, Clone, Serialize)]
pub struct UnionHelperModel {
    pub arity: usize,
    pub parameters: Vec<String>,
    pub type_parameters: String,
}

impl UnionHelperModel {
    pub fn new(arity: usize) -> Self {
        let parameters: Vec<String> = (0..arity).map(|index| format!("T{}", index)).collect();
        let type_parameters = parameters.join(", ");
        Self {
            arity,
            parameters,
            type_parameters,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DateFormatConverterModel {
    pub date_format: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileModel {
    pub namespace: Option<String>,
    pub nullable_annotations: bool,
    pub types_code: String,
}
