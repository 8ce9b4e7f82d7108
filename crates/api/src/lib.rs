pub mod defs;
pub mod descriptor;
pub mod error;
pub mod kind;

// Re-export commonly used types
pub use defs::{Definition, EnumDef, EnumValueDef, FieldDef, MessageDef, MethodDef, ServiceDef};
pub use descriptor::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FieldType, FileDescriptorProto, FileDescriptorSet, Label, MethodDescriptorProto,
    ServiceDescriptorProto,
};
pub use error::{ApiError, ApiResult};
pub use kind::SymbolKind;
