use super::instructions::Instruction;
use super::program::{Atom, Program};
use crate::config::InterpreterConfig;
use crate::error::{PushfitError, Result};
use rand::seq::SliceRandom;
use rand::Rng;

/// Source of one random atom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AtomGenerator {
    Instruction(Instruction),
    Boolean(bool),
    IntegerErc,
    FloatErc,
}

/// Generates random Push programs from an enabled instruction set plus
/// ephemeral random constants.
#[derive(Debug, Clone)]
pub struct RandomCodeGenerator {
    generators: Vec<AtomGenerator>,
    min_random_int: i64,
    max_random_int: i64,
    random_int_resolution: i64,
    min_random_float: f64,
    max_random_float: f64,
    random_float_resolution: f64,
    max_random_code_size: usize,
}

impl RandomCodeGenerator {
    /// Builds a generator from instruction names. Besides plain instruction
    /// names this accepts `integer.erc`, `float.erc`, `true`, `false` and
    /// `registered.<type>`, which enables every instruction of that type.
    pub fn from_config(config: &InterpreterConfig) -> Result<Self> {
        let mut generators = Vec::new();
        for name in &config.instructions {
            generators.extend(resolve(name)?);
        }
        Ok(Self {
            generators,
            min_random_int: config.min_random_int,
            max_random_int: config.max_random_int,
            random_int_resolution: config.random_int_resolution.max(1),
            min_random_float: config.min_random_float,
            max_random_float: config.max_random_float,
            random_float_resolution: config.random_float_resolution,
            max_random_code_size: config.max_random_code_size.max(1),
        })
    }

    pub fn generators(&self) -> &[AtomGenerator] {
        &self.generators
    }

    pub fn random_atom<R: Rng>(&self, rng: &mut R) -> Atom {
        match self.generators.choose(rng) {
            Some(AtomGenerator::Instruction(instruction)) => Atom::Instruction(*instruction),
            Some(AtomGenerator::Boolean(b)) => Atom::Boolean(*b),
            Some(AtomGenerator::IntegerErc) => Atom::Integer(self.random_int(rng)),
            Some(AtomGenerator::FloatErc) => Atom::Float(self.random_float(rng)),
            None => Atom::Instruction(Instruction::ExecNoop),
        }
    }

    /// A random program whose size is drawn from `1..=max_random_code_size`.
    pub fn random_program<R: Rng>(&self, rng: &mut R) -> Program {
        let size = rng.gen_range(1..=self.max_random_code_size);
        self.random_code(size, rng)
    }

    /// A random program of `size` points.
    pub fn random_code<R: Rng>(&self, size: usize, rng: &mut R) -> Program {
        let mut program = Program::default();
        for count in self.size_distribution(size.saturating_sub(1), rng) {
            if count == 1 {
                program.push(self.random_atom(rng));
            } else {
                program.push(Atom::List(self.random_code(count, rng)));
            }
        }
        program
    }

    // Splits `count` points into randomly sized chunks, then shuffles them.
    fn size_distribution<R: Rng>(&self, count: usize, rng: &mut R) -> Vec<usize> {
        let mut sizes = Vec::new();
        let mut remaining = count;
        while remaining > 0 {
            let this_size = if remaining < 2 {
                1
            } else {
                rng.gen_range(1..=remaining)
            };
            sizes.push(this_size);
            remaining -= this_size;
        }
        sizes.shuffle(rng);
        sizes
    }

    fn random_int<R: Rng>(&self, rng: &mut R) -> i64 {
        if self.max_random_int <= self.min_random_int {
            return self.min_random_int;
        }
        // i128 so the span of any i64 range fits
        let span = self.max_random_int as i128 - self.min_random_int as i128;
        let r = rng.gen_range(0..span);
        let snapped = r - r % self.random_int_resolution as i128;
        (snapped + self.min_random_int as i128) as i64
    }

    fn random_float<R: Rng>(&self, rng: &mut R) -> f64 {
        let mut r = rng.gen::<f64>() * (self.max_random_float - self.min_random_float);
        if self.random_float_resolution > 0.0 {
            r -= r % self.random_float_resolution;
        }
        r + self.min_random_float
    }
}

fn resolve(name: &str) -> Result<Vec<AtomGenerator>> {
    match name {
        "integer.erc" => return Ok(vec![AtomGenerator::IntegerErc]),
        "float.erc" => return Ok(vec![AtomGenerator::FloatErc]),
        "true" => return Ok(vec![AtomGenerator::Boolean(true)]),
        "false" => return Ok(vec![AtomGenerator::Boolean(false)]),
        _ => {}
    }

    if let Some(kind) = name.strip_prefix("registered.") {
        let prefix = format!("{}.", kind);
        let mut generators: Vec<AtomGenerator> = Instruction::all()
            .into_iter()
            .filter(|instruction| instruction.to_string().starts_with(&prefix))
            .map(AtomGenerator::Instruction)
            .collect();
        if generators.is_empty() {
            return Err(PushfitError::Configuration(format!(
                "Unknown instruction \"{}\" in instruction set",
                name
            )));
        }
        match kind {
            "integer" => generators.push(AtomGenerator::IntegerErc),
            "float" => generators.push(AtomGenerator::FloatErc),
            "boolean" => generators.extend([
                AtomGenerator::Boolean(true),
                AtomGenerator::Boolean(false),
            ]),
            _ => {}
        }
        return Ok(generators);
    }

    name.parse::<Instruction>()
        .map(|instruction| vec![AtomGenerator::Instruction(instruction)])
        .map_err(|e| PushfitError::Configuration(format!("{} in instruction set", e)))
}
