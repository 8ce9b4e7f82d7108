//! In-memory descriptor tree.
//!
//! These types mirror the subset of `google/protobuf/descriptor.proto` that a
//! symbol context consumes. They are plain data: producing them from bytes is
//! the codec's job, turning them into definitions is the context's job.

use crate::error::{ApiError, ApiResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, JsonSchema)]
pub struct FileDescriptorSet {
    pub file: Vec<FileDescriptorProto>,
}

impl FileDescriptorSet {
    pub fn new(file: Vec<FileDescriptorProto>) -> Self {
        Self { file }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, JsonSchema)]
pub struct FileDescriptorProto {
    pub name: Option<String>,
    pub package: Option<String>,
    pub dependency: Vec<String>,
    pub message_type: Vec<DescriptorProto>,
    pub enum_type: Vec<EnumDescriptorProto>,
    pub service: Vec<ServiceDescriptorProto>,
    pub extension: Vec<FieldDescriptorProto>,
    pub syntax: Option<String>,
}

impl FileDescriptorProto {
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        let package = package.into();
        Self {
            name: Some(name.into()),
            package: (!package.is_empty()).then_some(package),
            ..Default::default()
        }
    }

    pub fn with_message(mut self, message: DescriptorProto) -> Self {
        self.message_type.push(message);
        self
    }

    pub fn with_enum(mut self, enumeration: EnumDescriptorProto) -> Self {
        self.enum_type.push(enumeration);
        self
    }

    pub fn with_service(mut self, service: ServiceDescriptorProto) -> Self {
        self.service.push(service);
        self
    }

    pub fn with_extension(mut self, extension: FieldDescriptorProto) -> Self {
        self.extension.push(extension);
        self
    }

    /// Package name, or the empty (root) scope.
    pub fn package(&self) -> &str {
        self.package.as_deref().unwrap_or("")
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, JsonSchema)]
pub struct DescriptorProto {
    pub name: Option<String>,
    pub field: Vec<FieldDescriptorProto>,
    pub extension: Vec<FieldDescriptorProto>,
    pub nested_type: Vec<DescriptorProto>,
    pub enum_type: Vec<EnumDescriptorProto>,
}

impl DescriptorProto {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_field(mut self, field: FieldDescriptorProto) -> Self {
        self.field.push(field);
        self
    }

    pub fn with_nested(mut self, nested: DescriptorProto) -> Self {
        self.nested_type.push(nested);
        self
    }

    pub fn with_enum(mut self, enumeration: EnumDescriptorProto) -> Self {
        self.enum_type.push(enumeration);
        self
    }

    pub fn with_extension(mut self, extension: FieldDescriptorProto) -> Self {
        self.extension.push(extension);
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, JsonSchema)]
pub struct FieldDescriptorProto {
    pub name: Option<String>,
    pub number: Option<i32>,
    pub label: Option<Label>,
    #[serde(rename = "type")]
    pub r#type: Option<FieldType>,
    /// Referenced type as written; may be relative or start with `.`.
    pub type_name: Option<String>,
    pub extendee: Option<String>,
    pub default_value: Option<String>,
    pub json_name: Option<String>,
}

impl FieldDescriptorProto {
    /// A scalar field.
    pub fn scalar(name: impl Into<String>, number: i32, ty: FieldType) -> Self {
        Self {
            name: Some(name.into()),
            number: Some(number),
            label: Some(Label::Optional),
            r#type: Some(ty),
            ..Default::default()
        }
    }

    /// A field whose type is a named message or enum.
    ///
    /// `ty` may be `None`, in which case the kind is inferred when the
    /// reference is resolved.
    pub fn named(
        name: impl Into<String>,
        number: i32,
        ty: Option<FieldType>,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            number: Some(number),
            label: Some(Label::Optional),
            r#type: ty,
            type_name: Some(type_name.into()),
            ..Default::default()
        }
    }

    pub fn repeated(mut self) -> Self {
        self.label = Some(Label::Repeated);
        self
    }

    pub fn extending(mut self, extendee: impl Into<String>) -> Self {
        self.extendee = Some(extendee.into());
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, JsonSchema)]
pub struct EnumDescriptorProto {
    pub name: Option<String>,
    pub value: Vec<EnumValueDescriptorProto>,
}

impl EnumDescriptorProto {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: Vec::new(),
        }
    }

    pub fn with_value(mut self, name: impl Into<String>, number: i32) -> Self {
        self.value.push(EnumValueDescriptorProto {
            name: Some(name.into()),
            number: Some(number),
        });
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, JsonSchema)]
pub struct EnumValueDescriptorProto {
    pub name: Option<String>,
    pub number: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, JsonSchema)]
pub struct ServiceDescriptorProto {
    pub name: Option<String>,
    pub method: Vec<MethodDescriptorProto>,
}

impl ServiceDescriptorProto {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            method: Vec::new(),
        }
    }

    pub fn with_method(
        mut self,
        name: impl Into<String>,
        input_type: impl Into<String>,
        output_type: impl Into<String>,
    ) -> Self {
        self.method.push(MethodDescriptorProto {
            name: Some(name.into()),
            input_type: Some(input_type.into()),
            output_type: Some(output_type.into()),
            ..Default::default()
        });
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, JsonSchema)]
pub struct MethodDescriptorProto {
    pub name: Option<String>,
    pub input_type: Option<String>,
    pub output_type: Option<String>,
    pub client_streaming: Option<bool>,
    pub server_streaming: Option<bool>,
}

/// `FieldDescriptorProto.Type`
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Double,
    Float,
    Int64,
    Uint64,
    Int32,
    Fixed64,
    Fixed32,
    Bool,
    String,
    Group,
    Message,
    Bytes,
    Uint32,
    Enum,
    Sfixed32,
    Sfixed64,
    Sint32,
    Sint64,
}

impl FieldType {
    pub fn from_i32(value: i32) -> ApiResult<Self> {
        let ty = match value {
            1 => FieldType::Double,
            2 => FieldType::Float,
            3 => FieldType::Int64,
            4 => FieldType::Uint64,
            5 => FieldType::Int32,
            6 => FieldType::Fixed64,
            7 => FieldType::Fixed32,
            8 => FieldType::Bool,
            9 => FieldType::String,
            10 => FieldType::Group,
            11 => FieldType::Message,
            12 => FieldType::Bytes,
            13 => FieldType::Uint32,
            14 => FieldType::Enum,
            15 => FieldType::Sfixed32,
            16 => FieldType::Sfixed64,
            17 => FieldType::Sint32,
            18 => FieldType::Sint64,
            other => return Err(ApiError::UnknownFieldType(other)),
        };
        Ok(ty)
    }

    pub fn as_i32(&self) -> i32 {
        match self {
            FieldType::Double => 1,
            FieldType::Float => 2,
            FieldType::Int64 => 3,
            FieldType::Uint64 => 4,
            FieldType::Int32 => 5,
            FieldType::Fixed64 => 6,
            FieldType::Fixed32 => 7,
            FieldType::Bool => 8,
            FieldType::String => 9,
            FieldType::Group => 10,
            FieldType::Message => 11,
            FieldType::Bytes => 12,
            FieldType::Uint32 => 13,
            FieldType::Enum => 14,
            FieldType::Sfixed32 => 15,
            FieldType::Sfixed64 => 16,
            FieldType::Sint32 => 17,
            FieldType::Sint64 => 18,
        }
    }

    /// Message, group and enum fields name their type through `type_name`.
    pub fn is_named(&self) -> bool {
        matches!(self, FieldType::Message | FieldType::Group | FieldType::Enum)
    }
}

/// `FieldDescriptorProto.Label`
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    #[default]
    Optional,
    Required,
    Repeated,
}

impl Label {
    pub fn from_i32(value: i32) -> ApiResult<Self> {
        match value {
            1 => Ok(Label::Optional),
            2 => Ok(Label::Required),
            3 => Ok(Label::Repeated),
            other => Err(ApiError::UnknownLabel(other)),
        }
    }

    pub fn as_i32(&self) -> i32 {
        match self {
            Label::Optional => 1,
            Label::Required => 2,
            Label::Repeated => 3,
        }
    }
}
