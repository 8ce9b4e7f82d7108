//! Field numbers from `google/protobuf/descriptor.proto`.

pub mod file_descriptor_set {
    pub const FILE: u32 = 1;
}

pub mod file_descriptor_proto {
    pub const NAME: u32 = 1;
    pub const PACKAGE: u32 = 2;
    pub const DEPENDENCY: u32 = 3;
    pub const MESSAGE_TYPE: u32 = 4;
    pub const ENUM_TYPE: u32 = 5;
    pub const SERVICE: u32 = 6;
    pub const EXTENSION: u32 = 7;
    pub const SYNTAX: u32 = 12;
}

pub mod descriptor_proto {
    pub const NAME: u32 = 1;
    pub const FIELD: u32 = 2;
    pub const NESTED_TYPE: u32 = 3;
    pub const ENUM_TYPE: u32 = 4;
    pub const EXTENSION: u32 = 6;
}

pub mod field_descriptor_proto {
    pub const NAME: u32 = 1;
    pub const EXTENDEE: u32 = 2;
    pub const NUMBER: u32 = 3;
    pub const LABEL: u32 = 4;
    pub const TYPE: u32 = 5;
    pub const TYPE_NAME: u32 = 6;
    pub const DEFAULT_VALUE: u32 = 7;
    pub const JSON_NAME: u32 = 10;
}

pub mod enum_descriptor_proto {
    pub const NAME: u32 = 1;
    pub const VALUE: u32 = 2;
}

pub mod enum_value_descriptor_proto {
    pub const NAME: u32 = 1;
    pub const NUMBER: u32 = 2;
}

pub mod service_descriptor_proto {
    pub const NAME: u32 = 1;
    pub const METHOD: u32 = 2;
}

pub mod method_descriptor_proto {
    pub const NAME: u32 = 1;
    pub const INPUT_TYPE: u32 = 2;
    pub const OUTPUT_TYPE: u32 = 3;
    pub const CLIENT_STREAMING: u32 = 5;
    pub const SERVER_STREAMING: u32 = 6;
}
