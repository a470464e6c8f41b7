pub mod editor;
pub mod error;
pub mod host;
pub mod parser;
pub mod serializer;
pub mod store;
mod validate;

// Convenience re-exports so callers only need `use sshed_core::*` or individual items.
pub use editor::{Editor, HostFields};
pub use error::{ConfigError, ErrorKind, Result};
pub use host::{HostCollection, HostRecord, Options};
pub use parser::parse;
pub use serializer::{ExportFormat, export, import, stringify};
pub use store::{FileStore, MemoryStore, Store};
