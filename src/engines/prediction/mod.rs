pub mod predictor;
pub mod sample;

pub use predictor::{FitnessPredictor, SamplingPredictor};
pub use sample::SampleIndices;
