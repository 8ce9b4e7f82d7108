//! The shared symbol context.
//!
//! A `Context` is a cheap-to-clone handle; every clone shares one namespace.
//! Cloning is the "ref" and dropping the "unref": the tables and any
//! descriptor sets the context parsed itself are released when the last
//! handle goes away.
//!
//! All reads take the lock in shared mode. Registration takes it exclusively
//! for validation and commit together, so readers observe either none or all
//! of a batch. Parsing and file I/O happen before the lock is taken.

mod bootstrap;
mod builder;

pub use bootstrap::{DESCRIPTOR_FILE, DESCRIPTOR_PACKAGE, FILE_DESCRIPTOR_SET};
pub use builder::BatchReport;

use crate::config::ContextConfig;
use crate::error::{ContextError, Result};
use crate::resolver;
use crate::symtab::{StringTable, SymbolEntry};
use protoscope_api::{FileDescriptorSet, MessageDef};
use protoscope_codec::{DescriptorParser, WireDecoder};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Clone)]
pub struct Context {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    config: ContextConfig,
    parser: Arc<dyn DescriptorParser>,
    state: RwLock<ContextState>,
    /// `google.protobuf.FileDescriptorSet`, also present in the private table.
    descriptor_set_def: Option<Arc<MessageDef>>,
}

#[derive(Default)]
struct ContextState {
    symtab: StringTable<SymbolEntry>,
    /// Internal symbols, never visible to `lookup`/`resolve`.
    psymtab: StringTable<SymbolEntry>,
    /// Descriptor sets parsed by the context itself.
    owned: Vec<Arc<FileDescriptorSet>>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("symbols", &self.len())
            .field("refs", &self.ref_count())
            .finish()
    }
}

impl Context {
    pub fn new() -> Self {
        Self::with_config(ContextConfig::default())
    }

    pub fn with_config(config: ContextConfig) -> Self {
        let parser = Arc::new(WireDecoder::new(config.max_decode_depth));
        Self::with_parser(config, parser)
    }

    /// Creates a context that hands raw bytes to `parser`.
    pub fn with_parser(config: ContextConfig, parser: Arc<dyn DescriptorParser>) -> Self {
        let (psymtab, descriptor_set_def) = if config.bootstrap_descriptor_types {
            let bootstrapped = bootstrap::private_table();
            debug_assert!(
                bootstrapped.is_ok(),
                "descriptor bootstrap failed: {:?}",
                bootstrapped.as_ref().err()
            );
            match bootstrapped {
                Ok(bootstrapped) => bootstrapped,
                Err(e) => {
                    tracing::error!("Failed to bootstrap descriptor types: {}", e);
                    (StringTable::new(), None)
                }
            }
        } else {
            (StringTable::new(), None)
        };

        Self {
            inner: Arc::new(ContextInner {
                config,
                parser,
                state: RwLock::new(ContextState {
                    psymtab,
                    ..Default::default()
                }),
                descriptor_set_def,
            }),
        }
    }

    pub fn config(&self) -> &ContextConfig {
        &self.inner.config
    }

    /// Number of live handles to this context.
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Whether two handles share one namespace.
    pub fn ptr_eq(&self, other: &Context) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // Commit only inserts entries validated beforehand, so a panic while the
    // lock was held cannot leave a half-registered batch behind.
    fn read(&self) -> RwLockReadGuard<'_, ContextState> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ContextState> {
        self.inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // ---- Read side ----

    /// Exact-name lookup in the public table.
    pub fn lookup(&self, symbol: &str) -> Option<SymbolEntry> {
        self.read().symtab.lookup(symbol).cloned()
    }

    /// Resolves `reference` as written inside the symbol named `base`.
    pub fn resolve(&self, base: &str, reference: &str) -> Option<SymbolEntry> {
        let state = self.read();
        resolver::resolve(&state.symtab, base, reference)
    }

    /// Calls `f` for every public symbol while holding the read lock.
    ///
    /// `f` must be quick and must not block or call back into this context:
    /// writers wait for it, and re-entering the lock may deadlock.
    pub fn enumerate(&self, f: impl FnMut(&str, &SymbolEntry)) {
        self.read().symtab.enumerate(f);
    }

    pub fn len(&self) -> usize {
        self.read().symtab.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().symtab.is_empty()
    }

    /// Exact-name lookup in the private table.
    pub fn private_lookup(&self, symbol: &str) -> Option<SymbolEntry> {
        self.read().psymtab.lookup(symbol).cloned()
    }

    /// The bootstrapped `google.protobuf.FileDescriptorSet` message, if any.
    pub fn descriptor_set_def(&self) -> Option<Arc<MessageDef>> {
        self.inner.descriptor_set_def.clone()
    }

    /// Number of descriptor sets the context parsed and now owns.
    pub fn owned_batch_count(&self) -> usize {
        self.read().owned.len()
    }

    // ---- Write side ----

    /// Registers every definition in `set`, or none of them.
    ///
    /// The context copies what it needs; `set` stays with the caller.
    pub fn add_definitions(&self, set: &FileDescriptorSet) -> Result<BatchReport> {
        let mut state = self.write();
        self.register(&mut state, set)
    }

    /// Parses `bytes` and registers the result, keeping the parsed set.
    pub fn parse_and_add(&self, bytes: &[u8]) -> Result<BatchReport> {
        let set = self.inner.parser.parse_set(bytes).map_err(|e| {
            tracing::warn!("Failed to parse descriptor set: {}", e);
            ContextError::from(e)
        })?;

        let mut state = self.write();
        let report = self.register(&mut state, &set)?;
        state.owned.push(Arc::new(set));
        Ok(report)
    }

    pub fn parse_and_add_file(&self, path: &Path) -> Result<BatchReport> {
        let bytes = std::fs::read(path)?;
        tracing::debug!("Read {} bytes from {}", bytes.len(), path.display());
        self.parse_and_add(&bytes)
    }

    fn register(&self, state: &mut ContextState, set: &FileDescriptorSet) -> Result<BatchReport> {
        let prepared = builder::prepare(&state.symtab, set);
        let (entries, report) = match prepared {
            Ok(prepared) => prepared,
            Err(e) => {
                tracing::warn!("Rejected descriptor batch: {}", e);
                return Err(e);
            }
        };

        state
            .symtab
            .absorb(entries)
            .map_err(|dup| ContextError::DuplicateDefinition {
                name: dup.0.to_string(),
            })?;

        tracing::debug!(
            "Registered {} symbols from {} files ({} total)",
            report.symbols(),
            report.files,
            state.symtab.len()
        );
        Ok(report)
    }
}

impl Drop for ContextInner {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        tracing::debug!(
            "Releasing context: {} symbols, {} owned descriptor sets",
            state.symtab.len(),
            state.owned.len()
        );
    }
}
