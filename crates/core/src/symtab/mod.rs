mod entry;
mod table;

pub use entry::SymbolEntry;
pub use table::{DuplicateKey, StringTable};
