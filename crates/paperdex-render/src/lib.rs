//! paperdex-render — static, searchable HTML view of a reference database.

mod page;
mod style;

pub use page::{COLUMNS, encode_path, render};
