pub mod evaluation;
pub mod execution;
pub mod prediction;
