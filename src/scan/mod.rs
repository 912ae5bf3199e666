mod walker;

pub use walker::{list_source_files, SourceFile};
