use protoscope_api::{Definition, EnumDef, FieldDef, MessageDef, ServiceDef, SymbolKind};
use std::sync::Arc;

/// One named symbol and the definition it stands for.
///
/// Cloning an entry clones the `Arc`, so a caller may keep a definition alive
/// past the context that registered it.
#[derive(Debug, Clone)]
pub enum SymbolEntry {
    Message(Arc<MessageDef>),
    Enum(Arc<EnumDef>),
    Service(Arc<ServiceDef>),
    Extension(Arc<FieldDef>),
}

impl SymbolEntry {
    pub fn kind(&self) -> SymbolKind {
        self.definition().kind()
    }

    pub fn full_name(&self) -> &str {
        self.definition().full_name()
    }

    pub fn definition(&self) -> &dyn Definition {
        match self {
            SymbolEntry::Message(def) => def.as_ref(),
            SymbolEntry::Enum(def) => def.as_ref(),
            SymbolEntry::Service(def) => def.as_ref(),
            SymbolEntry::Extension(def) => def.as_ref(),
        }
    }

    pub fn as_message(&self) -> Option<&Arc<MessageDef>> {
        match self {
            SymbolEntry::Message(def) => Some(def),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&Arc<EnumDef>> {
        match self {
            SymbolEntry::Enum(def) => Some(def),
            _ => None,
        }
    }

    pub fn as_service(&self) -> Option<&Arc<ServiceDef>> {
        match self {
            SymbolEntry::Service(def) => Some(def),
            _ => None,
        }
    }

    pub fn as_extension(&self) -> Option<&Arc<FieldDef>> {
        match self {
            SymbolEntry::Extension(def) => Some(def),
            _ => None,
        }
    }

    /// Whether both entries point at the very same definition object.
    pub fn same_definition(&self, other: &SymbolEntry) -> bool {
        match (self, other) {
            (SymbolEntry::Message(a), SymbolEntry::Message(b)) => Arc::ptr_eq(a, b),
            (SymbolEntry::Enum(a), SymbolEntry::Enum(b)) => Arc::ptr_eq(a, b),
            (SymbolEntry::Service(a), SymbolEntry::Service(b)) => Arc::ptr_eq(a, b),
            (SymbolEntry::Extension(a), SymbolEntry::Extension(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
