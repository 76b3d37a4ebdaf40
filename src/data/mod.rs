pub mod cases;

pub use cases::{parse_test_cases, LiteralKind};
