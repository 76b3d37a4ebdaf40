use crate::error::Result;
use crate::types::{TestCase, TestCaseSet, Value};

/// Scores one candidate on one fitness case.
///
/// Implementations must reset all execution state at the start of every
/// call, so a single instance can be reused sequentially. Concurrent callers
/// need one instance each.
pub trait Evaluator {
    type Candidate: ?Sized;

    /// Returns the signed error `actual - expected`.
    fn score(&mut self, candidate: &Self::Candidate, input: Value, expected: Value) -> f64;
}

/// A problem supplies fitness cases and the evaluators that score them.
pub trait Problem: Send + Sync {
    type Evaluator: Evaluator + Send;

    fn load_test_cases(&self, text: &str) -> Result<TestCaseSet>;

    /// A fresh evaluator. Called once per context and once per parallel worker.
    fn configure_evaluator(&self) -> Self::Evaluator;

    fn evaluate_one(
        &self,
        evaluator: &mut Self::Evaluator,
        candidate: &<Self::Evaluator as Evaluator>::Candidate,
        case: &TestCase,
    ) -> f64 {
        evaluator.score(candidate, case.input, case.expected)
    }
}
