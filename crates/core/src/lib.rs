pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod resolver;
pub mod symtab;

pub use config::ContextConfig;
pub use context::{BatchReport, Context};
pub use error::{ContextError, Result};
pub use symtab::{StringTable, SymbolEntry};
