pub mod context;
pub mod parallel;
pub mod regression;
pub mod traits;

pub use context::EvaluationContext;
pub use parallel::{evaluate_population, predict_population};
pub use regression::{PushEvaluator, RegressionProblem};
pub use traits::{Evaluator, Problem};
