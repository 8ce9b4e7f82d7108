//! The descriptor types a context knows before anything is registered.
//!
//! These live in the private table. They describe the same subset of
//! `descriptor.proto` that the wire decoder understands, and go through the
//! same staging and resolution as user batches.

use super::builder::{self, BatchReport};
use crate::error::Result;
use crate::symtab::{StringTable, SymbolEntry};
use protoscope_api::{
    DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FieldType, FileDescriptorProto,
    FileDescriptorSet, MessageDef,
};
use protoscope_codec::fields::*;
use std::sync::Arc;

pub const DESCRIPTOR_FILE: &str = "google/protobuf/descriptor.proto";
pub const DESCRIPTOR_PACKAGE: &str = "google.protobuf";
pub const FILE_DESCRIPTOR_SET: &str = "google.protobuf.FileDescriptorSet";

const TYPE_NAMES: [&str; 18] = [
    "TYPE_DOUBLE",
    "TYPE_FLOAT",
    "TYPE_INT64",
    "TYPE_UINT64",
    "TYPE_INT32",
    "TYPE_FIXED64",
    "TYPE_FIXED32",
    "TYPE_BOOL",
    "TYPE_STRING",
    "TYPE_GROUP",
    "TYPE_MESSAGE",
    "TYPE_BYTES",
    "TYPE_UINT32",
    "TYPE_ENUM",
    "TYPE_SFIXED32",
    "TYPE_SFIXED64",
    "TYPE_SINT32",
    "TYPE_SINT64",
];

fn string(name: &str, number: u32) -> FieldDescriptorProto {
    FieldDescriptorProto::scalar(name, number as i32, FieldType::String)
}

fn repeated(name: &str, number: u32, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto::named(name, number as i32, Some(FieldType::Message), type_name)
        .repeated()
}

pub(crate) fn descriptor_set() -> FileDescriptorSet {
    let file_set = DescriptorProto::new("FileDescriptorSet").with_field(repeated(
        "file",
        file_descriptor_set::FILE,
        "FileDescriptorProto",
    ));

    let file = {
        use file_descriptor_proto as f;
        DescriptorProto::new("FileDescriptorProto")
            .with_field(string("name", f::NAME))
            .with_field(string("package", f::PACKAGE))
            .with_field(string("dependency", f::DEPENDENCY).repeated())
            .with_field(repeated("message_type", f::MESSAGE_TYPE, "DescriptorProto"))
            .with_field(repeated("enum_type", f::ENUM_TYPE, "EnumDescriptorProto"))
            .with_field(repeated("service", f::SERVICE, "ServiceDescriptorProto"))
            .with_field(repeated("extension", f::EXTENSION, "FieldDescriptorProto"))
            .with_field(string("syntax", f::SYNTAX))
    };

    let message = {
        use descriptor_proto as d;
        DescriptorProto::new("DescriptorProto")
            .with_field(string("name", d::NAME))
            .with_field(repeated("field", d::FIELD, "FieldDescriptorProto"))
            .with_field(repeated("nested_type", d::NESTED_TYPE, "DescriptorProto"))
            .with_field(repeated("enum_type", d::ENUM_TYPE, "EnumDescriptorProto"))
            .with_field(repeated("extension", d::EXTENSION, "FieldDescriptorProto"))
    };

    let field = {
        use field_descriptor_proto as f;
        let types = TYPE_NAMES
            .iter()
            .zip(1..)
            .fold(EnumDescriptorProto::new("Type"), |e, (name, n)| {
                e.with_value(*name, n)
            });
        let labels = EnumDescriptorProto::new("Label")
            .with_value("LABEL_OPTIONAL", 1)
            .with_value("LABEL_REQUIRED", 2)
            .with_value("LABEL_REPEATED", 3);
        DescriptorProto::new("FieldDescriptorProto")
            .with_enum(types)
            .with_enum(labels)
            .with_field(string("name", f::NAME))
            .with_field(string("extendee", f::EXTENDEE))
            .with_field(FieldDescriptorProto::scalar(
                "number",
                f::NUMBER as i32,
                FieldType::Int32,
            ))
            .with_field(FieldDescriptorProto::named(
                "label",
                f::LABEL as i32,
                Some(FieldType::Enum),
                "Label",
            ))
            .with_field(FieldDescriptorProto::named(
                "type",
                f::TYPE as i32,
                Some(FieldType::Enum),
                "Type",
            ))
            .with_field(string("type_name", f::TYPE_NAME))
            .with_field(string("default_value", f::DEFAULT_VALUE))
            .with_field(string("json_name", f::JSON_NAME))
    };

    let enumeration = DescriptorProto::new("EnumDescriptorProto")
        .with_field(string("name", enum_descriptor_proto::NAME))
        .with_field(repeated(
            "value",
            enum_descriptor_proto::VALUE,
            "EnumValueDescriptorProto",
        ));

    let enum_value = DescriptorProto::new("EnumValueDescriptorProto")
        .with_field(string("name", enum_value_descriptor_proto::NAME))
        .with_field(FieldDescriptorProto::scalar(
            "number",
            enum_value_descriptor_proto::NUMBER as i32,
            FieldType::Int32,
        ));

    let service = DescriptorProto::new("ServiceDescriptorProto")
        .with_field(string("name", service_descriptor_proto::NAME))
        .with_field(repeated(
            "method",
            service_descriptor_proto::METHOD,
            "MethodDescriptorProto",
        ));

    let method = {
        use method_descriptor_proto as m;
        DescriptorProto::new("MethodDescriptorProto")
            .with_field(string("name", m::NAME))
            .with_field(string("input_type", m::INPUT_TYPE))
            .with_field(string("output_type", m::OUTPUT_TYPE))
            .with_field(FieldDescriptorProto::scalar(
                "client_streaming",
                m::CLIENT_STREAMING as i32,
                FieldType::Bool,
            ))
            .with_field(FieldDescriptorProto::scalar(
                "server_streaming",
                m::SERVER_STREAMING as i32,
                FieldType::Bool,
            ))
    };

    let file_proto = FileDescriptorProto::new(DESCRIPTOR_FILE, DESCRIPTOR_PACKAGE)
        .with_message(file_set)
        .with_message(file)
        .with_message(message)
        .with_message(field)
        .with_message(enumeration)
        .with_message(enum_value)
        .with_message(service)
        .with_message(method);

    FileDescriptorSet::new(vec![file_proto])
}

/// Builds the private table and picks out the `FileDescriptorSet` message.
pub(crate) fn private_table() -> Result<(StringTable<SymbolEntry>, Option<Arc<MessageDef>>)> {
    let set = descriptor_set();
    let mut table = StringTable::new();
    let (entries, report): (_, BatchReport) =
        builder::prepare(&table, &set)?;
    table
        .absorb(entries)
        .map_err(|dup| crate::error::ContextError::DuplicateDefinition {
            name: dup.0.to_string(),
        })?;
    tracing::trace!("Bootstrapped {} descriptor types", report.symbols());

    let fds = table
        .lookup(FILE_DESCRIPTOR_SET)
        .and_then(|entry| entry.as_message())
        .cloned();
    Ok((table, fds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use protoscope_api::{Definition, SymbolKind};

    #[test]
    fn bootstrap_registers_descriptor_types() {
        let (table, fds) = private_table().unwrap();
        // 8 messages, 2 nested enums
        assert_eq!(table.len(), 10);

        let fds = fds.unwrap();
        assert_eq!(fds.full_name(), FILE_DESCRIPTOR_SET);
        let file = fds.field_by_number(1).unwrap();
        assert_eq!(
            file.type_name.as_deref(),
            Some("google.protobuf.FileDescriptorProto")
        );
        assert!(file.is_repeated());

        let ty = table.lookup("google.protobuf.FieldDescriptorProto.Type").unwrap();
        assert_eq!(ty.kind(), SymbolKind::Enum);
        let ty = ty.as_enum().unwrap();
        assert_eq!(ty.values.len(), 18);
        assert_eq!(
            ty.value_by_number(11).map(|v| v.name.as_str()),
            Some("TYPE_MESSAGE")
        );
    }
}
