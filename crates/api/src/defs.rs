//! Definition objects referenced from a symbol table.
//!
//! A definition is built once, when its batch commits, and is immutable
//! afterwards. Every type reference it carries has already been resolved to a
//! fully-qualified name (without the leading `.`).

use crate::descriptor::{FieldType, Label};
use crate::kind::SymbolKind;
use smol_str::SmolStr;

/// Common surface of every definition a symbol can point at.
pub trait Definition: Send + Sync {
    fn full_name(&self) -> &str;
    fn kind(&self) -> SymbolKind;

    /// The last component of the fully-qualified name.
    fn name(&self) -> &str {
        let full = self.full_name();
        full.rsplit('.').next().unwrap_or(full)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageDef {
    pub full_name: SmolStr,
    /// Name of the `.proto` file that declared this message.
    pub file: SmolStr,
    pub fields: Vec<FieldDef>,
    pub nested_types: Vec<SmolStr>,
    pub nested_enums: Vec<SmolStr>,
}

impl MessageDef {
    pub fn field_by_name(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_by_number(&self, number: i32) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.number == number)
    }
}

impl Definition for MessageDef {
    fn full_name(&self) -> &str {
        &self.full_name
    }

    fn kind(&self) -> SymbolKind {
        SymbolKind::Message
    }
}

/// A message field, or an extension when `extendee` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: SmolStr,
    pub full_name: SmolStr,
    pub number: i32,
    pub label: Label,
    pub field_type: FieldType,
    /// Resolved message or enum type for named fields.
    pub type_name: Option<SmolStr>,
    /// Resolved message this extension extends.
    pub extendee: Option<SmolStr>,
    pub default_value: Option<String>,
}

impl FieldDef {
    pub fn is_extension(&self) -> bool {
        self.extendee.is_some()
    }

    pub fn is_repeated(&self) -> bool {
        self.label == Label::Repeated
    }
}

impl Definition for FieldDef {
    fn full_name(&self) -> &str {
        &self.full_name
    }

    fn kind(&self) -> SymbolKind {
        SymbolKind::Extension
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDef {
    pub full_name: SmolStr,
    pub file: SmolStr,
    pub values: Vec<EnumValueDef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumValueDef {
    pub name: SmolStr,
    pub number: i32,
}

impl EnumDef {
    pub fn value_by_name(&self, name: &str) -> Option<&EnumValueDef> {
        self.values.iter().find(|v| v.name == name)
    }

    /// First value declared with `number`; aliases share numbers.
    pub fn value_by_number(&self, number: i32) -> Option<&EnumValueDef> {
        self.values.iter().find(|v| v.number == number)
    }

    pub fn default_value(&self) -> Option<&EnumValueDef> {
        self.values.first()
    }
}

impl Definition for EnumDef {
    fn full_name(&self) -> &str {
        &self.full_name
    }

    fn kind(&self) -> SymbolKind {
        SymbolKind::Enum
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDef {
    pub full_name: SmolStr,
    pub file: SmolStr,
    pub methods: Vec<MethodDef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDef {
    pub name: SmolStr,
    pub input_type: SmolStr,
    pub output_type: SmolStr,
    pub client_streaming: bool,
    pub server_streaming: bool,
}

impl ServiceDef {
    pub fn method(&self, name: &str) -> Option<&MethodDef> {
        self.methods.iter().find(|m| m.name == name)
    }
}

impl Definition for ServiceDef {
    fn full_name(&self) -> &str {
        &self.full_name
    }

    fn kind(&self) -> SymbolKind {
        SymbolKind::Service
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_name_is_last_component() {
        let def = EnumDef {
            full_name: "pkg.Outer.Color".into(),
            file: "a.proto".into(),
            values: vec![
                EnumValueDef { name: "RED".into(), number: 0 },
                EnumValueDef { name: "CRIMSON".into(), number: 0 },
            ],
        };
        assert_eq!(def.name(), "Color");
        assert_eq!(def.value_by_number(0).map(|v| v.name.as_str()), Some("RED"));
        assert_eq!(def.default_value().map(|v| v.number), Some(0));
    }

    #[test]
    fn root_level_name_has_no_separator() {
        let def = ServiceDef {
            full_name: "Greeter".into(),
            file: "g.proto".into(),
            methods: Vec::new(),
        };
        assert_eq!(def.name(), "Greeter");
    }
}
