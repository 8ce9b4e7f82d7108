use protoscope_api::{
    DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FieldType, FileDescriptorProto,
    FileDescriptorSet, Label, ServiceDescriptorProto,
};
use protoscope_codec::{DecodeError, DescriptorParser, WireDecoder, encode_set};

fn sample_set() -> FileDescriptorSet {
    let outer = DescriptorProto::new("Outer")
        .with_field(FieldDescriptorProto::scalar("id", 1, FieldType::Int64))
        .with_field(
            FieldDescriptorProto::named("inner", 2, Some(FieldType::Message), "Inner").repeated(),
        )
        .with_nested(
            DescriptorProto::new("Inner")
                .with_field(FieldDescriptorProto::scalar("delta", -1, FieldType::Sint32)),
        )
        .with_enum(
            EnumDescriptorProto::new("State")
                .with_value("UNKNOWN", 0)
                .with_value("NEGATIVE", -3),
        );

    let mut file = FileDescriptorProto::new("sample.proto", "acme.v1")
        .with_message(outer)
        .with_service(ServiceDescriptorProto::new("Lookup").with_method(
            "Get",
            ".acme.v1.Outer",
            ".acme.v1.Outer.Inner",
        ))
        .with_extension(
            FieldDescriptorProto::scalar("tag", 100, FieldType::String).extending("Outer"),
        );
    file.dependency.push("google/protobuf/descriptor.proto".to_string());
    file.syntax = Some("proto2".to_string());
    file.service[0].method[0].server_streaming = Some(true);

    FileDescriptorSet::new(vec![file])
}

#[test]
fn decoding_encoded_set_reproduces_tree() {
    let set = sample_set();
    let bytes = encode_set(&set);
    let decoded = WireDecoder::default().parse_set(&bytes).unwrap();
    assert_eq!(decoded, set);

    let inner = &decoded.file[0].message_type[0].field[1];
    assert_eq!(inner.label, Some(Label::Repeated));
    assert_eq!(decoded.file[0].message_type[0].enum_type[0].value[1].number, Some(-3));
}

#[test]
fn unknown_fields_are_skipped() {
    let mut bytes = encode_set(&sample_set());
    // Append a file with options (field 8) and source_code_info (field 9) only.
    let file = [0x42, 0x02, 0x08, 0x01, 0x4a, 0x00];
    bytes.push(0x0a);
    bytes.push(file.len() as u8);
    bytes.extend_from_slice(&file);

    let decoded = WireDecoder::default().parse_set(&bytes).unwrap();
    assert_eq!(decoded.file.len(), 2);
    assert_eq!(decoded.file[1], FileDescriptorProto::default());
}

#[test]
fn truncated_input_fails() {
    let bytes = encode_set(&sample_set());
    let err = WireDecoder::default()
        .parse_set(&bytes[..bytes.len() - 3])
        .unwrap_err();
    assert!(matches!(err, DecodeError::LengthOverflow { offset: 1, .. }));
}

#[test]
fn invalid_utf8_name_fails() {
    // file { name: [0xff] }
    let bytes = [0x0a, 0x03, 0x0a, 0x01, 0xff];
    let err = WireDecoder::default().parse_set(&bytes).unwrap_err();
    assert_eq!(err, DecodeError::InvalidUtf8 { field: 1 });
}
