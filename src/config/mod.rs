pub mod traits;
pub mod problem;
pub mod prediction;
pub mod interpreter;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use problem::{ProblemConfig, ProblemKind};
pub use prediction::PredictionConfig;
pub use interpreter::InterpreterConfig;
