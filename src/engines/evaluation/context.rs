use super::traits::Evaluator;
use crate::types::TestCaseSet;
use std::sync::{Arc, Mutex, PoisonError};

/// Fitness cases paired with the evaluator that scores them.
///
/// Predictors hold the context through an `Arc`. The shared evaluator sits
/// behind a mutex so calls through the context are serialized; parallel
/// callers bring their own evaluator via the `_with` methods.
#[derive(Debug)]
pub struct EvaluationContext<E> {
    test_cases: Arc<TestCaseSet>,
    evaluator: Mutex<E>,
}

impl<E: Evaluator> EvaluationContext<E> {
    pub fn new(test_cases: impl Into<Arc<TestCaseSet>>, evaluator: E) -> Self {
        Self {
            test_cases: test_cases.into(),
            evaluator: Mutex::new(evaluator),
        }
    }

    pub fn test_cases(&self) -> &TestCaseSet {
        &self.test_cases
    }

    pub fn shared_test_cases(&self) -> Arc<TestCaseSet> {
        Arc::clone(&self.test_cases)
    }

    pub fn case_count(&self) -> usize {
        self.test_cases.len()
    }

    /// Runs `f` with exclusive access to the shared evaluator.
    pub fn with_evaluator<R>(&self, f: impl FnOnce(&mut E) -> R) -> R {
        // Every score resets the evaluator, so a poisoned lock is still usable.
        let mut evaluator = self.evaluator.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut *evaluator)
    }

    /// Signed error of `candidate` on case `index`, or `None` if there is no such case.
    pub fn score_case(&self, candidate: &E::Candidate, index: usize) -> Option<f64> {
        self.with_evaluator(|evaluator| self.score_case_with(evaluator, candidate, index))
    }

    pub fn score_case_with(
        &self,
        evaluator: &mut E,
        candidate: &E::Candidate,
        index: usize,
    ) -> Option<f64> {
        self.test_cases
            .get(index)
            .map(|case| evaluator.score(candidate, case.input, case.expected))
    }

    /// Mean absolute error over every case.
    pub fn evaluate_full(&self, candidate: &E::Candidate) -> f64 {
        self.with_evaluator(|evaluator| self.evaluate_full_with(evaluator, candidate))
    }

    pub fn evaluate_full_with(&self, evaluator: &mut E, candidate: &E::Candidate) -> f64 {
        if self.test_cases.is_empty() {
            return 0.0;
        }
        let total: f64 = self
            .test_cases
            .iter()
            .map(|case| evaluator.score(candidate, case.input, case.expected).abs())
            .sum();
        total / self.test_cases.len() as f64
    }
}
