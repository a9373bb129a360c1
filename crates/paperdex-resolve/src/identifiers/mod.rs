pub mod doi;
pub mod infer;
pub mod isbn;

pub use doi::Doi;
pub use infer::infer_identifier;
pub use isbn::Isbn;
