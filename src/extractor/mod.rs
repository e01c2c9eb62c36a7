// Extractor module: canonical attributes out of noisy product text.

pub mod dictionaries;
pub mod parse;

pub use parse::{extract, normalize_text};
