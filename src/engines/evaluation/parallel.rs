use super::context::EvaluationContext;
use super::traits::{Evaluator, Problem};
use crate::engines::prediction::SamplingPredictor;
use crate::error::Result;
use rayon::prelude::*;

/// True fitness of every candidate. Each rayon worker gets its own evaluator
/// from `problem`; the context's shared evaluator is left untouched.
pub fn evaluate_population<P, C>(
    problem: &P,
    context: &EvaluationContext<P::Evaluator>,
    candidates: &[C],
) -> Vec<f64>
where
    P: Problem,
    P::Evaluator: Evaluator<Candidate = C>,
    C: Sync,
{
    candidates
        .par_iter()
        .map_init(
            || problem.configure_evaluator(),
            |evaluator, candidate| context.evaluate_full_with(evaluator, candidate),
        )
        .collect()
}

/// Predicted fitness of every candidate under one predictor.
pub fn predict_population<P, C>(
    problem: &P,
    predictor: &SamplingPredictor<P::Evaluator>,
    candidates: &[C],
) -> Result<Vec<f64>>
where
    P: Problem,
    P::Evaluator: Evaluator<Candidate = C>,
    C: Sync,
{
    candidates
        .par_iter()
        .map_init(
            || problem.configure_evaluator(),
            |evaluator, candidate| predictor.predict_with(candidate, evaluator),
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProblemKind;
    use crate::engines::evaluation::RegressionProblem;
    use crate::engines::execution::Program;
    use std::sync::Arc;

    fn setup() -> (RegressionProblem, Arc<EvaluationContext<crate::engines::evaluation::PushEvaluator>>) {
        let problem = RegressionProblem::new(ProblemKind::IntegerRegression, 100, 1.0e9);
        let cases = problem.load_test_cases("[[0 0][1 2][2 4][3 6]]").unwrap();
        let context = Arc::new(EvaluationContext::new(cases, problem.configure_evaluator()));
        (problem, context)
    }

    fn population() -> Vec<Program> {
        ["( integer.dup integer.+ )", "( 1 integer.+ )", "( )", "( integer.pop )"]
            .iter()
            .map(|source| Program::parse(source).unwrap())
            .collect()
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let (problem, context) = setup();
        let candidates = population();

        let parallel = evaluate_population(&problem, &context, &candidates);
        let sequential: Vec<f64> = candidates.iter().map(|c| context.evaluate_full(c)).collect();
        assert_eq!(parallel, sequential);
        assert_eq!(parallel[0], 0.0);
        assert_eq!(parallel[3], 1.0e9);
    }

    #[test]
    fn test_parallel_prediction_matches_sequential() {
        use crate::engines::prediction::FitnessPredictor;

        let (problem, context) = setup();
        let predictor = SamplingPredictor::with_samples(context, &[3, 1, 1], 3).unwrap();
        let candidates = population();

        let parallel = predict_population(&problem, &predictor, &candidates).unwrap();
        for (candidate, predicted) in candidates.iter().zip(&parallel) {
            assert_eq!(predictor.predict_fitness(candidate).unwrap(), *predicted);
        }
    }

    #[test]
    fn test_unbound_predictor_fails_whole_population() {
        let (problem, _) = setup();
        let predictor = SamplingPredictor::unbound(3);
        assert!(predict_population(&problem, &predictor, &population()).is_err());
    }
}
