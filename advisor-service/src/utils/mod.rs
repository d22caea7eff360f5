pub mod validation;

pub use validation::{parse_validated, ValidatedJson};
