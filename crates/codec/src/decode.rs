use crate::error::{DecodeError, Result};
use crate::fields::*;
use crate::wire::{Reader, WireType};
use protoscope_api::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FieldType, FileDescriptorProto, FileDescriptorSet, Label, MethodDescriptorProto,
    ServiceDescriptorProto,
};

/// Default bound on message nesting, matching common protobuf runtimes.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Decodes a serialized `FileDescriptorSet`.
pub fn decode_set(bytes: &[u8], max_depth: usize) -> Result<FileDescriptorSet> {
    let mut decoder = Decoder {
        depth: 0,
        max_depth,
    };
    decoder.file_descriptor_set(Reader::new(bytes))
}

struct Decoder {
    depth: usize,
    max_depth: usize,
}

/// Rejects a key whose wire type does not fit the field's declared type.
fn expect(field: u32, actual: WireType, expected: WireType) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(DecodeError::InvalidWireType {
            field,
            wire_type: actual.bits(),
        })
    }
}

impl Decoder {
    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(DecodeError::TooDeep {
                limit: self.max_depth,
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn file_descriptor_set(&mut self, mut r: Reader<'_>) -> Result<FileDescriptorSet> {
        let mut set = FileDescriptorSet::default();
        while let Some((field, wt)) = r.read_key()? {
            match field {
                file_descriptor_set::FILE => {
                    expect(field, wt, WireType::LengthDelimited)?;
                    let nested = r.read_nested()?;
                    set.file.push(self.file(nested)?);
                }
                _ => r.skip(field, wt, self.max_depth)?,
            }
        }
        Ok(set)
    }

    fn file(&mut self, mut r: Reader<'_>) -> Result<FileDescriptorProto> {
        self.enter()?;
        let mut file = FileDescriptorProto::default();
        while let Some((field, wt)) = r.read_key()? {
            use file_descriptor_proto as f;
            match field {
                f::NAME => {
                    expect(field, wt, WireType::LengthDelimited)?;
                    file.name = Some(r.read_string(field)?);
                }
                f::PACKAGE => {
                    expect(field, wt, WireType::LengthDelimited)?;
                    file.package = Some(r.read_string(field)?);
                }
                f::DEPENDENCY => {
                    expect(field, wt, WireType::LengthDelimited)?;
                    file.dependency.push(r.read_string(field)?);
                }
                f::MESSAGE_TYPE => {
                    expect(field, wt, WireType::LengthDelimited)?;
                    let nested = r.read_nested()?;
                    file.message_type.push(self.message(nested)?);
                }
                f::ENUM_TYPE => {
                    expect(field, wt, WireType::LengthDelimited)?;
                    let nested = r.read_nested()?;
                    file.enum_type.push(self.enumeration(nested)?);
                }
                f::SERVICE => {
                    expect(field, wt, WireType::LengthDelimited)?;
                    let nested = r.read_nested()?;
                    file.service.push(self.service(nested)?);
                }
                f::EXTENSION => {
                    expect(field, wt, WireType::LengthDelimited)?;
                    let nested = r.read_nested()?;
                    file.extension.push(self.field(nested)?);
                }
                f::SYNTAX => {
                    expect(field, wt, WireType::LengthDelimited)?;
                    file.syntax = Some(r.read_string(field)?);
                }
                _ => r.skip(field, wt, self.max_depth)?,
            }
        }
        self.leave();
        Ok(file)
    }

    fn message(&mut self, mut r: Reader<'_>) -> Result<DescriptorProto> {
        self.enter()?;
        let mut message = DescriptorProto::default();
        while let Some((field, wt)) = r.read_key()? {
            use descriptor_proto as d;
            match field {
                d::NAME => {
                    expect(field, wt, WireType::LengthDelimited)?;
                    message.name = Some(r.read_string(field)?);
                }
                d::FIELD => {
                    expect(field, wt, WireType::LengthDelimited)?;
                    let nested = r.read_nested()?;
                    message.field.push(self.field(nested)?);
                }
                d::NESTED_TYPE => {
                    expect(field, wt, WireType::LengthDelimited)?;
                    let nested = r.read_nested()?;
                    message.nested_type.push(self.message(nested)?);
                }
                d::ENUM_TYPE => {
                    expect(field, wt, WireType::LengthDelimited)?;
                    let nested = r.read_nested()?;
                    message.enum_type.push(self.enumeration(nested)?);
                }
                d::EXTENSION => {
                    expect(field, wt, WireType::LengthDelimited)?;
                    let nested = r.read_nested()?;
                    message.extension.push(self.field(nested)?);
                }
                _ => r.skip(field, wt, self.max_depth)?,
            }
        }
        self.leave();
        Ok(message)
    }

    fn field(&mut self, mut r: Reader<'_>) -> Result<FieldDescriptorProto> {
        self.enter()?;
        let mut out = FieldDescriptorProto::default();
        while let Some((field, wt)) = r.read_key()? {
            use field_descriptor_proto as f;
            match field {
                f::NAME => {
                    expect(field, wt, WireType::LengthDelimited)?;
                    out.name = Some(r.read_string(field)?);
                }
                f::EXTENDEE => {
                    expect(field, wt, WireType::LengthDelimited)?;
                    out.extendee = Some(r.read_string(field)?);
                }
                f::NUMBER => {
                    expect(field, wt, WireType::Varint)?;
                    out.number = Some(r.read_int32()?);
                }
                f::LABEL => {
                    expect(field, wt, WireType::Varint)?;
                    let value = r.read_int32()?;
                    out.label = Some(
                        Label::from_i32(value)
                            .map_err(|_| DecodeError::InvalidEnumValue { field, value })?,
                    );
                }
                f::TYPE => {
                    expect(field, wt, WireType::Varint)?;
                    let value = r.read_int32()?;
                    out.r#type = Some(
                        FieldType::from_i32(value)
                            .map_err(|_| DecodeError::InvalidEnumValue { field, value })?,
                    );
                }
                f::TYPE_NAME => {
                    expect(field, wt, WireType::LengthDelimited)?;
                    out.type_name = Some(r.read_string(field)?);
                }
                f::DEFAULT_VALUE => {
                    expect(field, wt, WireType::LengthDelimited)?;
                    out.default_value = Some(r.read_string(field)?);
                }
                f::JSON_NAME => {
                    expect(field, wt, WireType::LengthDelimited)?;
                    out.json_name = Some(r.read_string(field)?);
                }
                _ => r.skip(field, wt, self.max_depth)?,
            }
        }
        self.leave();
        Ok(out)
    }

    fn enumeration(&mut self, mut r: Reader<'_>) -> Result<EnumDescriptorProto> {
        self.enter()?;
        let mut out = EnumDescriptorProto::default();
        while let Some((field, wt)) = r.read_key()? {
            match field {
                enum_descriptor_proto::NAME => {
                    expect(field, wt, WireType::LengthDelimited)?;
                    out.name = Some(r.read_string(field)?);
                }
                enum_descriptor_proto::VALUE => {
                    expect(field, wt, WireType::LengthDelimited)?;
                    let nested = r.read_nested()?;
                    out.value.push(self.enum_value(nested)?);
                }
                _ => r.skip(field, wt, self.max_depth)?,
            }
        }
        self.leave();
        Ok(out)
    }

    fn enum_value(&mut self, mut r: Reader<'_>) -> Result<EnumValueDescriptorProto> {
        self.enter()?;
        let mut out = EnumValueDescriptorProto::default();
        while let Some((field, wt)) = r.read_key()? {
            match field {
                enum_value_descriptor_proto::NAME => {
                    expect(field, wt, WireType::LengthDelimited)?;
                    out.name = Some(r.read_string(field)?);
                }
                enum_value_descriptor_proto::NUMBER => {
                    expect(field, wt, WireType::Varint)?;
                    out.number = Some(r.read_int32()?);
                }
                _ => r.skip(field, wt, self.max_depth)?,
            }
        }
        self.leave();
        Ok(out)
    }

    fn service(&mut self, mut r: Reader<'_>) -> Result<ServiceDescriptorProto> {
        self.enter()?;
        let mut out = ServiceDescriptorProto::default();
        while let Some((field, wt)) = r.read_key()? {
            match field {
                service_descriptor_proto::NAME => {
                    expect(field, wt, WireType::LengthDelimited)?;
                    out.name = Some(r.read_string(field)?);
                }
                service_descriptor_proto::METHOD => {
                    expect(field, wt, WireType::LengthDelimited)?;
                    let nested = r.read_nested()?;
                    out.method.push(self.method(nested)?);
                }
                _ => r.skip(field, wt, self.max_depth)?,
            }
        }
        self.leave();
        Ok(out)
    }

    fn method(&mut self, mut r: Reader<'_>) -> Result<MethodDescriptorProto> {
        self.enter()?;
        let mut out = MethodDescriptorProto::default();
        while let Some((field, wt)) = r.read_key()? {
            use method_descriptor_proto as m;
            match field {
                m::NAME => {
                    expect(field, wt, WireType::LengthDelimited)?;
                    out.name = Some(r.read_string(field)?);
                }
                m::INPUT_TYPE => {
                    expect(field, wt, WireType::LengthDelimited)?;
                    out.input_type = Some(r.read_string(field)?);
                }
                m::OUTPUT_TYPE => {
                    expect(field, wt, WireType::LengthDelimited)?;
                    out.output_type = Some(r.read_string(field)?);
                }
                m::CLIENT_STREAMING => {
                    expect(field, wt, WireType::Varint)?;
                    out.client_streaming = Some(r.read_bool()?);
                }
                m::SERVER_STREAMING => {
                    expect(field, wt, WireType::Varint)?;
                    out.server_streaming = Some(r.read_bool()?);
                }
                _ => r.skip(field, wt, self.max_depth)?,
            }
        }
        self.leave();
        Ok(out)
    }
}
