// Spreadsheet I/O: one-way xlsx import into the in-memory dataset, and
// on-demand snapshot export. The source file is never written back.

pub mod xlsx;

pub use xlsx::{export, export_to_file, load, load_from_bytes, ImportReport};
