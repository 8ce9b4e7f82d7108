use crate::fields::*;
use crate::wire::Writer;
use protoscope_api::{
    DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FileDescriptorProto,
    FileDescriptorSet, MethodDescriptorProto, ServiceDescriptorProto,
};

/// Serializes a descriptor set in field-number order, as protoc does.
pub fn encode_set(set: &FileDescriptorSet) -> Vec<u8> {
    let mut w = Writer::new();
    for file in &set.file {
        w.write_message(file_descriptor_set::FILE, |w| encode_file(w, file));
    }
    w.into_bytes()
}

fn encode_file(w: &mut Writer, file: &FileDescriptorProto) {
    use file_descriptor_proto as f;
    w.write_string(f::NAME, file.name.as_deref());
    w.write_string(f::PACKAGE, file.package.as_deref());
    for dep in &file.dependency {
        w.write_string(f::DEPENDENCY, Some(dep));
    }
    for message in &file.message_type {
        w.write_message(f::MESSAGE_TYPE, |w| encode_message(w, message));
    }
    for enumeration in &file.enum_type {
        w.write_message(f::ENUM_TYPE, |w| encode_enum(w, enumeration));
    }
    for service in &file.service {
        w.write_message(f::SERVICE, |w| encode_service(w, service));
    }
    for extension in &file.extension {
        w.write_message(f::EXTENSION, |w| encode_field(w, extension));
    }
    w.write_string(f::SYNTAX, file.syntax.as_deref());
}

fn encode_message(w: &mut Writer, message: &DescriptorProto) {
    use descriptor_proto as d;
    w.write_string(d::NAME, message.name.as_deref());
    for field in &message.field {
        w.write_message(d::FIELD, |w| encode_field(w, field));
    }
    for nested in &message.nested_type {
        w.write_message(d::NESTED_TYPE, |w| encode_message(w, nested));
    }
    for enumeration in &message.enum_type {
        w.write_message(d::ENUM_TYPE, |w| encode_enum(w, enumeration));
    }
    for extension in &message.extension {
        w.write_message(d::EXTENSION, |w| encode_field(w, extension));
    }
}

fn encode_field(w: &mut Writer, field: &FieldDescriptorProto) {
    use field_descriptor_proto as f;
    w.write_string(f::NAME, field.name.as_deref());
    w.write_string(f::EXTENDEE, field.extendee.as_deref());
    w.write_int32(f::NUMBER, field.number);
    w.write_int32(f::LABEL, field.label.map(|l| l.as_i32()));
    w.write_int32(f::TYPE, field.r#type.map(|t| t.as_i32()));
    w.write_string(f::TYPE_NAME, field.type_name.as_deref());
    w.write_string(f::DEFAULT_VALUE, field.default_value.as_deref());
    w.write_string(f::JSON_NAME, field.json_name.as_deref());
}

fn encode_enum(w: &mut Writer, enumeration: &EnumDescriptorProto) {
    w.write_string(enum_descriptor_proto::NAME, enumeration.name.as_deref());
    for value in &enumeration.value {
        w.write_message(enum_descriptor_proto::VALUE, |w| {
            w.write_string(enum_value_descriptor_proto::NAME, value.name.as_deref());
            w.write_int32(enum_value_descriptor_proto::NUMBER, value.number);
        });
    }
}

fn encode_service(w: &mut Writer, service: &ServiceDescriptorProto) {
    w.write_string(service_descriptor_proto::NAME, service.name.as_deref());
    for method in &service.method {
        w.write_message(service_descriptor_proto::METHOD, |w| {
            encode_method(w, method)
        });
    }
}

fn encode_method(w: &mut Writer, method: &MethodDescriptorProto) {
    use method_descriptor_proto as m;
    w.write_string(m::NAME, method.name.as_deref());
    w.write_string(m::INPUT_TYPE, method.input_type.as_deref());
    w.write_string(m::OUTPUT_TYPE, method.output_type.as_deref());
    w.write_bool(m::CLIENT_STREAMING, method.client_streaming);
    w.write_bool(m::SERVER_STREAMING, method.server_streaming);
}
