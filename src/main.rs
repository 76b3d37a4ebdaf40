use anyhow::{bail, Context, Result};
use log::info;
use pushfit::config::{AppConfig, ConfigManager};
use pushfit::engines::evaluation::{
    evaluate_population, predict_population, EvaluationContext, Problem, PushEvaluator,
    RegressionProblem,
};
use pushfit::engines::execution::{Program, RandomCodeGenerator};
use pushfit::engines::prediction::SamplingPredictor;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

const USAGE: &str = "usage: pushfit <config.toml> [program]\n       pushfit --describe";

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("--describe") => {
            println!("{}", AppConfig::default().manifests_json()?);
            Ok(())
        }
        Some(path) => run(path, args.get(1).map(String::as_str)),
        None => bail!(USAGE),
    }
}

fn run(path: &str, program: Option<&str>) -> Result<()> {
    let manager = ConfigManager::new();
    manager
        .load_layered(path)
        .with_context(|| format!("Failed to load {}", path))?;
    let config = manager.get()?;

    let problem = RegressionProblem::from_config(&config.problem, &config.interpreter);
    let cases = problem
        .load_test_cases(&config.problem.test_cases)
        .context("Failed to set up fitness cases")?;
    info!("Loaded {} fitness cases for {:?}", cases.len(), problem.kind());
    let context = Arc::new(EvaluationContext::new(cases, problem.configure_evaluator()));

    let mut rng = match config.prediction.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let candidates: Vec<Program> = match program {
        Some(text) => vec![Program::parse(text).context("Failed to parse program")?],
        None => {
            let generator = RandomCodeGenerator::from_config(&config.interpreter)?;
            (0..config.interpreter.population_size)
                .map(|_| generator.random_program(&mut rng))
                .collect()
        }
    };

    let predictors: Vec<SamplingPredictor<PushEvaluator>> = (0..config.prediction.predictor_count)
        .map(|_| {
            let mut predictor = SamplingPredictor::unbound(config.prediction.sample_size);
            predictor.randomize(Arc::clone(&context), &mut rng);
            predictor
        })
        .collect();
    for (i, predictor) in predictors.iter().enumerate() {
        info!("Predictor #{} samples {}", i, predictor);
    }

    let fitness = evaluate_population(&problem, &context, &candidates);
    let predictions = predictors
        .iter()
        .map(|predictor| predict_population(&problem, predictor, &candidates))
        .collect::<pushfit::Result<Vec<_>>>()?;

    for (i, candidate) in candidates.iter().enumerate() {
        let predicted: Vec<String> = predictions
            .iter()
            .map(|row| format!("{:.3}", row[i]))
            .collect();
        println!(
            "#{:<3} fitness {:>12.3}  predicted [{}]  {}",
            i,
            fitness[i],
            predicted.join(" "),
            candidate
        );
    }

    Ok(())
}
