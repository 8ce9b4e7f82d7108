//! Two-pass registration of a descriptor batch.
//!
//! `stage` declares every name the batch defines, rejecting duplicates against
//! the committed table and within the batch. `build` then resolves every type
//! reference against committed + staged names, so definitions may refer to
//! types that appear later in the same batch. Nothing is committed here; the
//! caller absorbs the returned table while still holding the write lock.

use crate::error::{ContextError, Result};
use crate::resolver::{self, SymbolSource, qualify};
use crate::symtab::{StringTable, SymbolEntry};
use protoscope_api::{
    DescriptorProto, EnumDef, EnumDescriptorProto, EnumValueDef, FieldDef, FieldDescriptorProto,
    FieldType, FileDescriptorSet, MessageDef, MethodDef, ServiceDef, ServiceDescriptorProto,
    SymbolKind,
};
use serde::Serialize;
use smol_str::SmolStr;
use std::sync::Arc;

/// What a successful registration added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub files: usize,
    pub messages: usize,
    pub enums: usize,
    pub services: usize,
    pub extensions: usize,
}

impl BatchReport {
    pub fn symbols(&self) -> usize {
        self.messages + self.enums + self.services + self.extensions
    }

    fn count(&mut self, kind: SymbolKind) {
        match kind {
            SymbolKind::Message => self.messages += 1,
            SymbolKind::Enum => self.enums += 1,
            SymbolKind::Service => self.services += 1,
            SymbolKind::Extension => self.extensions += 1,
        }
    }
}

enum Pending<'a> {
    Message {
        full_name: String,
        file: &'a str,
        proto: &'a DescriptorProto,
    },
    Enum {
        full_name: String,
        file: &'a str,
        proto: &'a EnumDescriptorProto,
    },
    Service {
        full_name: String,
        file: &'a str,
        proto: &'a ServiceDescriptorProto,
    },
    Extension {
        scope: String,
        proto: &'a FieldDescriptorProto,
    },
}

/// A name a reference resolved to, committed or staged.
#[derive(Debug, Clone)]
struct Target {
    full_name: SmolStr,
    kind: SymbolKind,
}

/// Committed symbols overlaid with the names staged by this batch.
struct BatchScope<'b> {
    committed: &'b StringTable<SymbolEntry>,
    staged: &'b StringTable<SymbolKind>,
}

impl SymbolSource for BatchScope<'_> {
    type Entry = Target;

    fn find(&self, full_name: &str) -> Option<Target> {
        let kind = match self.committed.lookup(full_name) {
            Some(entry) => entry.kind(),
            None => *self.staged.lookup(full_name)?,
        };
        Some(Target {
            full_name: full_name.into(),
            kind,
        })
    }
}

pub(crate) struct BatchBuilder<'a> {
    committed: &'a StringTable<SymbolEntry>,
    staged: StringTable<SymbolKind>,
    pending: Vec<Pending<'a>>,
    files: usize,
}

fn required_name<'n>(name: Option<&'n str>, what: &str, scope: &str) -> Result<&'n str> {
    match name {
        Some(name) if !name.is_empty() && !name.contains(resolver::SEPARATOR) => Ok(name),
        Some(name) => Err(ContextError::InvalidDescriptor(format!(
            "{what} name '{name}' in scope '{scope}' is not a valid identifier"
        ))),
        None => Err(ContextError::InvalidDescriptor(format!(
            "{what} in scope '{scope}' has no name"
        ))),
    }
}

impl<'a> BatchBuilder<'a> {
    pub(crate) fn new(committed: &'a StringTable<SymbolEntry>) -> Self {
        Self {
            committed,
            staged: StringTable::new(),
            pending: Vec::new(),
            files: 0,
        }
    }

    /// First pass: declare every name in `set`.
    pub(crate) fn stage(&mut self, set: &'a FileDescriptorSet) -> Result<()> {
        for file in &set.file {
            let file_name = file.name.as_deref().unwrap_or("");
            let package = file.package();
            for message in &file.message_type {
                self.stage_message(file_name, package, message)?;
            }
            for enumeration in &file.enum_type {
                self.stage_enum(file_name, package, enumeration)?;
            }
            for service in &file.service {
                let name = required_name(service.name.as_deref(), "service", package)?;
                let full_name = qualify(package, name);
                self.declare(&full_name, SymbolKind::Service)?;
                self.pending.push(Pending::Service {
                    full_name,
                    file: file_name,
                    proto: service,
                });
            }
            for extension in &file.extension {
                self.stage_extension(package, extension)?;
            }
            self.files += 1;
        }
        Ok(())
    }

    fn declare(&mut self, full_name: &str, kind: SymbolKind) -> Result<()> {
        if self.committed.contains_key(full_name) {
            return Err(ContextError::DuplicateDefinition {
                name: full_name.to_string(),
            });
        }
        self.staged
            .insert(full_name, kind)
            .map_err(|dup| ContextError::DuplicateDefinition {
                name: dup.0.to_string(),
            })
    }

    fn stage_message(
        &mut self,
        file: &'a str,
        scope: &str,
        proto: &'a DescriptorProto,
    ) -> Result<()> {
        let name = required_name(proto.name.as_deref(), "message", scope)?;
        let full_name = qualify(scope, name);
        self.declare(&full_name, SymbolKind::Message)?;

        for nested in &proto.nested_type {
            self.stage_message(file, &full_name, nested)?;
        }
        for enumeration in &proto.enum_type {
            self.stage_enum(file, &full_name, enumeration)?;
        }
        for extension in &proto.extension {
            self.stage_extension(&full_name, extension)?;
        }

        self.pending.push(Pending::Message {
            full_name,
            file,
            proto,
        });
        Ok(())
    }

    fn stage_enum(
        &mut self,
        file: &'a str,
        scope: &str,
        proto: &'a EnumDescriptorProto,
    ) -> Result<()> {
        let name = required_name(proto.name.as_deref(), "enum", scope)?;
        let full_name = qualify(scope, name);
        self.declare(&full_name, SymbolKind::Enum)?;
        self.pending.push(Pending::Enum {
            full_name,
            file,
            proto,
        });
        Ok(())
    }

    fn stage_extension(&mut self, scope: &str, proto: &'a FieldDescriptorProto) -> Result<()> {
        let name = required_name(proto.name.as_deref(), "extension", scope)?;
        let full_name = qualify(scope, name);
        if proto.extendee.is_none() {
            return Err(ContextError::InvalidDescriptor(format!(
                "extension '{full_name}' has no extendee"
            )));
        }
        self.declare(&full_name, SymbolKind::Extension)?;
        self.pending.push(Pending::Extension {
            scope: scope.to_string(),
            proto,
        });
        Ok(())
    }

    /// Second pass: resolve references and build the definitions.
    pub(crate) fn build(self) -> Result<(StringTable<SymbolEntry>, BatchReport)> {
        let scope = BatchScope {
            committed: self.committed,
            staged: &self.staged,
        };
        let mut entries = StringTable::new();
        let mut report = BatchReport {
            files: self.files,
            ..Default::default()
        };

        for pending in &self.pending {
            let entry = match pending {
                Pending::Message {
                    full_name,
                    file,
                    proto,
                } => SymbolEntry::Message(Arc::new(
                    self.build_message(&scope, full_name, file, proto)?,
                )),
                Pending::Enum {
                    full_name,
                    file,
                    proto,
                } => SymbolEntry::Enum(Arc::new(build_enum(full_name, file, proto)?)),
                Pending::Service {
                    full_name,
                    file,
                    proto,
                } => SymbolEntry::Service(Arc::new(
                    self.build_service(&scope, full_name, file, proto)?,
                )),
                Pending::Extension {
                    scope: container,
                    proto,
                } => SymbolEntry::Extension(Arc::new(
                    self.build_field(&scope, container, container, proto)?,
                )),
            };
            report.count(entry.kind());
            let key = SmolStr::from(entry.full_name());
            entries
                .insert(key, entry)
                .map_err(|dup| ContextError::DuplicateDefinition {
                    name: dup.0.to_string(),
                })?;
        }

        Ok((entries, report))
    }

    fn resolve(
        &self,
        scope: &BatchScope<'_>,
        base: &str,
        referrer: &str,
        reference: &str,
    ) -> Result<Target> {
        resolver::resolve(scope, base, reference).ok_or_else(|| {
            ContextError::UnresolvedReference {
                referrer: referrer.to_string(),
                reference: reference.to_string(),
            }
        })
    }

    fn resolve_message(
        &self,
        scope: &BatchScope<'_>,
        base: &str,
        referrer: &str,
        reference: &str,
    ) -> Result<SmolStr> {
        let target = self.resolve(scope, base, referrer, reference)?;
        if target.kind != SymbolKind::Message {
            return Err(ContextError::KindMismatch {
                referrer: referrer.to_string(),
                reference: reference.to_string(),
                expected: "message",
                found: target.kind,
            });
        }
        Ok(target.full_name)
    }

    fn build_message(
        &self,
        scope: &BatchScope<'_>,
        full_name: &str,
        file: &str,
        proto: &DescriptorProto,
    ) -> Result<MessageDef> {
        let fields = proto
            .field
            .iter()
            .map(|field| self.build_field(scope, full_name, full_name, field))
            .collect::<Result<Vec<_>>>()?;

        let nested_types = proto
            .nested_type
            .iter()
            .filter_map(|m| m.name.as_deref())
            .map(|name| SmolStr::from(qualify(full_name, name)))
            .collect();
        let nested_enums = proto
            .enum_type
            .iter()
            .filter_map(|e| e.name.as_deref())
            .map(|name| SmolStr::from(qualify(full_name, name)))
            .collect();

        Ok(MessageDef {
            full_name: full_name.into(),
            file: file.into(),
            fields,
            nested_types,
            nested_enums,
        })
    }

    /// Builds a message field or an extension declared in `container`.
    ///
    /// References are resolved from `base`: the enclosing message for fields
    /// and message-scoped extensions, the package for top-level extensions.
    fn build_field(
        &self,
        scope: &BatchScope<'_>,
        base: &str,
        container: &str,
        proto: &FieldDescriptorProto,
    ) -> Result<FieldDef> {
        let name = required_name(proto.name.as_deref(), "field", container)?;
        let full_name = qualify(container, name);
        let number = proto.number.ok_or_else(|| {
            ContextError::InvalidDescriptor(format!("field '{full_name}' has no number"))
        })?;

        let (field_type, type_name) = match (proto.type_name.as_deref(), proto.r#type) {
            (Some(""), _) => {
                return Err(ContextError::InvalidDescriptor(format!(
                    "field '{full_name}' has an empty type_name"
                )));
            }
            (Some(reference), declared) => {
                if let Some(ty) = declared.filter(|ty| !ty.is_named()) {
                    return Err(ContextError::InvalidDescriptor(format!(
                        "field '{full_name}' has scalar type {ty:?} but names type '{reference}'"
                    )));
                }
                let target = self.resolve(scope, base, &full_name, reference)?;
                let field_type = match (declared, target.kind) {
                    (Some(ty @ (FieldType::Message | FieldType::Group)), SymbolKind::Message) => ty,
                    (Some(FieldType::Enum), SymbolKind::Enum) => FieldType::Enum,
                    (None, SymbolKind::Message) => FieldType::Message,
                    (None, SymbolKind::Enum) => FieldType::Enum,
                    (declared, found) => {
                        let expected = match declared {
                            Some(FieldType::Enum) => "enum",
                            Some(_) => "message",
                            None => "message or enum",
                        };
                        return Err(ContextError::KindMismatch {
                            referrer: full_name,
                            reference: reference.to_string(),
                            expected,
                            found,
                        });
                    }
                };
                (field_type, Some(target.full_name))
            }
            (None, Some(ty)) if !ty.is_named() => (ty, None),
            (None, Some(ty)) => {
                return Err(ContextError::InvalidDescriptor(format!(
                    "field '{full_name}' has type {ty:?} but no type_name"
                )));
            }
            (None, None) => {
                return Err(ContextError::InvalidDescriptor(format!(
                    "field '{full_name}' has neither type nor type_name"
                )));
            }
        };

        let extendee = match proto.extendee.as_deref() {
            Some(extendee) => Some(self.resolve_message(scope, base, &full_name, extendee)?),
            None => None,
        };

        Ok(FieldDef {
            name: name.into(),
            full_name: full_name.into(),
            number,
            label: proto.label.unwrap_or_default(),
            field_type,
            type_name,
            extendee,
            default_value: proto.default_value.clone(),
        })
    }

    fn build_service(
        &self,
        scope: &BatchScope<'_>,
        full_name: &str,
        file: &str,
        proto: &ServiceDescriptorProto,
    ) -> Result<ServiceDef> {
        let mut methods = Vec::with_capacity(proto.method.len());
        for method in &proto.method {
            let name = required_name(method.name.as_deref(), "method", full_name)?;
            let referrer = qualify(full_name, name);
            let input = method.input_type.as_deref().ok_or_else(|| {
                ContextError::InvalidDescriptor(format!("method '{referrer}' has no input type"))
            })?;
            let output = method.output_type.as_deref().ok_or_else(|| {
                ContextError::InvalidDescriptor(format!("method '{referrer}' has no output type"))
            })?;
            methods.push(MethodDef {
                name: name.into(),
                input_type: self.resolve_message(scope, full_name, &referrer, input)?,
                output_type: self.resolve_message(scope, full_name, &referrer, output)?,
                client_streaming: method.client_streaming.unwrap_or(false),
                server_streaming: method.server_streaming.unwrap_or(false),
            });
        }

        Ok(ServiceDef {
            full_name: full_name.into(),
            file: file.into(),
            methods,
        })
    }
}

fn build_enum(full_name: &str, file: &str, proto: &EnumDescriptorProto) -> Result<EnumDef> {
    let values = proto
        .value
        .iter()
        .map(|v| {
            Ok(EnumValueDef {
                name: required_name(v.name.as_deref(), "enum value", full_name)?.into(),
                number: v.number.unwrap_or(0),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(EnumDef {
        full_name: full_name.into(),
        file: file.into(),
        values,
    })
}

/// Stages, validates and builds `set` against `committed` in one go.
pub(crate) fn prepare(
    committed: &StringTable<SymbolEntry>,
    set: &FileDescriptorSet,
) -> Result<(StringTable<SymbolEntry>, BatchReport)> {
    let mut builder = BatchBuilder::new(committed);
    builder.stage(set)?;
    builder.build()
}
