// Matcher module: noise filtering and best-candidate selection.

pub mod filters;
pub mod select;

pub use select::select_best;
