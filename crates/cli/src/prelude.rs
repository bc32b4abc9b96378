pub use anstream::eprintln;
pub use anstream::println;
pub use color_eyre::eyre::{eyre, Result};
pub use std::format as f;

pub fn new_table() -> prettytable::Table {
    let mut table = prettytable::Table::new();

    let format = prettytable::format::FormatBuilder::new()
        .padding(1, 1)
        .build();

    table.set_format(format);

    table
}

/// Open a PDF, naming the file in the error.
pub fn open_document(path: &std::path::Path) -> Result<pdfscan::ParsedDocument> {
    pdfscan::ParsedDocument::open(path).map_err(|e| eyre!("{}: {}", path.display(), e))
}
