use super::sample::SampleIndices;
use crate::engines::evaluation::{EvaluationContext, Evaluator};
use crate::error::{PushfitError, Result};
use log::debug;
use rand::Rng;
use std::fmt;
use std::sync::Arc;

/// Estimates a candidate's fitness. Lower is better; zero is a perfect score.
pub trait FitnessPredictor<C: ?Sized> {
    fn predict_fitness(&self, candidate: &C) -> Result<f64>;
}

/// Predicts fitness as the mean absolute error over a fixed sample of cases.
///
/// The context is shared infrastructure: clones copy the sample indices but
/// point at the same context.
pub struct SamplingPredictor<E> {
    sample_size: usize,
    samples: Option<SampleIndices>,
    context: Option<Arc<EvaluationContext<E>>>,
}

impl<E: Evaluator> SamplingPredictor<E> {
    pub fn unbound(sample_size: usize) -> Self {
        Self {
            sample_size,
            samples: None,
            context: None,
        }
    }

    /// Bound to a context; indices still have to be supplied.
    pub fn with_context(context: Arc<EvaluationContext<E>>, sample_size: usize) -> Self {
        Self {
            sample_size,
            samples: None,
            context: Some(context),
        }
    }

    pub fn with_samples(
        context: Arc<EvaluationContext<E>>,
        indices: &[usize],
        sample_size: usize,
    ) -> Result<Self> {
        let mut predictor = Self::unbound(sample_size);
        predictor.bind(context, indices)?;
        Ok(predictor)
    }

    /// Replaces context and indices together. On error nothing changes.
    pub fn bind(&mut self, context: Arc<EvaluationContext<E>>, indices: &[usize]) -> Result<()> {
        let samples = SampleIndices::from_slice(indices, self.sample_size)?;
        self.samples = Some(samples);
        self.context = Some(context);
        Ok(())
    }

    /// Binds to `context` with indices drawn uniformly from its cases.
    pub fn randomize<R: Rng>(&mut self, context: Arc<EvaluationContext<E>>, rng: &mut R) {
        let samples = SampleIndices::random(self.sample_size, context.case_count(), rng);
        self.samples = Some(samples);
        self.context = Some(context);
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    pub fn samples(&self) -> Option<&SampleIndices> {
        self.samples.as_ref()
    }

    pub fn context(&self) -> Option<&Arc<EvaluationContext<E>>> {
        self.context.as_ref()
    }

    pub fn is_bound(&self) -> bool {
        self.samples.is_some() && self.context.is_some()
    }

    /// Like [`FitnessPredictor::predict_fitness`] but scores with a
    /// caller-owned evaluator instead of the context's shared one.
    pub fn predict_with(&self, candidate: &E::Candidate, evaluator: &mut E) -> Result<f64> {
        let (samples, context) = self.checked()?;
        Ok(mean_absolute_error(samples, |index| {
            context.score_case_with(evaluator, candidate, index)
        }))
    }

    fn checked(&self) -> Result<(&SampleIndices, &EvaluationContext<E>)> {
        match (&self.samples, &self.context) {
            (Some(samples), Some(context)) => {
                samples.validate(context.case_count())?;
                Ok((samples, context))
            }
            _ => Err(PushfitError::UnboundPredictor),
        }
    }
}

// Indices are validated before this runs, so a missing case is unreachable.
fn mean_absolute_error<F>(samples: &SampleIndices, mut score: F) -> f64
where
    F: FnMut(usize) -> Option<f64>,
{
    if samples.is_empty() {
        return 0.0;
    }
    let total: f64 = samples
        .iter()
        .filter_map(|&index| score(index))
        .map(f64::abs)
        .sum();
    let fitness = total / samples.len() as f64;
    debug!("Predicted fitness {} over samples {}", fitness, samples);
    fitness
}

impl<E: Evaluator> FitnessPredictor<E::Candidate> for SamplingPredictor<E> {
    fn predict_fitness(&self, candidate: &E::Candidate) -> Result<f64> {
        let (samples, context) = self.checked()?;
        Ok(context.with_evaluator(|evaluator| {
            mean_absolute_error(samples, |index| {
                context.score_case_with(evaluator, candidate, index)
            })
        }))
    }
}

impl<E> Clone for SamplingPredictor<E> {
    fn clone(&self) -> Self {
        Self {
            sample_size: self.sample_size,
            samples: self.samples.clone(),
            context: self.context.clone(),
        }
    }
}

impl<E> fmt::Debug for SamplingPredictor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SamplingPredictor")
            .field("sample_size", &self.sample_size)
            .field("samples", &self.samples)
            .field("bound", &self.context.is_some())
            .finish()
    }
}

impl<E> fmt::Display for SamplingPredictor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.samples {
            Some(samples) => write!(f, "{}", samples),
            None => write!(f, "[unbound]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TestCase, TestCaseSet, Value};

    struct Constant;

    impl Evaluator for Constant {
        type Candidate = f64;

        fn score(&mut self, candidate: &f64, _input: Value, expected: Value) -> f64 {
            candidate - expected.as_f64()
        }
    }

    fn context() -> Arc<EvaluationContext<Constant>> {
        let cases = TestCaseSet::new(
            [1, 5, 9]
                .into_iter()
                .map(|e| TestCase::new(Value::Integer(0), Value::Integer(e)))
                .collect(),
        );
        Arc::new(EvaluationContext::new(cases, Constant))
    }

    #[test]
    fn test_mean_of_absolute_errors() {
        let predictor = SamplingPredictor::with_samples(context(), &[0, 1], 2).unwrap();
        // errors +2 and -2 must not cancel
        assert_eq!(predictor.predict_fitness(&3.0).unwrap(), 2.0);
    }

    #[test]
    fn test_repeated_indices_weigh_twice() {
        let predictor = SamplingPredictor::with_samples(context(), &[2, 2, 0], 3).unwrap();
        assert_eq!(predictor.predict_fitness(&9.0).unwrap(), 8.0 / 3.0);
    }

    #[test]
    fn test_context_only_is_unbound() {
        let predictor = SamplingPredictor::with_context(context(), 2);
        assert!(!predictor.is_bound());
        assert!(matches!(
            predictor.predict_fitness(&0.0),
            Err(PushfitError::UnboundPredictor)
        ));
    }

    #[test]
    fn test_failed_bind_changes_nothing() {
        let mut predictor = SamplingPredictor::with_samples(context(), &[1, 1], 2).unwrap();
        assert!(predictor.bind(context(), &[0]).is_err());
        assert_eq!(predictor.samples().unwrap().as_slice(), &[1, 1]);
    }

    #[test]
    fn test_predict_with_matches_shared_evaluator() {
        let predictor = SamplingPredictor::with_samples(context(), &[0, 1, 2], 3).unwrap();
        let mut own = Constant;
        assert_eq!(
            predictor.predict_with(&4.0, &mut own).unwrap(),
            predictor.predict_fitness(&4.0).unwrap()
        );
    }

    #[test]
    fn test_display_lists_samples() {
        let predictor = SamplingPredictor::with_samples(context(), &[2, 0], 2).unwrap();
        assert_eq!(predictor.to_string(), "[2 0]");
        assert_eq!(SamplingPredictor::<Constant>::unbound(2).to_string(), "[unbound]");
    }
}
