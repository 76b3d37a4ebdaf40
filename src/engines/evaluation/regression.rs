use super::traits::{Evaluator, Problem};
use crate::config::{InterpreterConfig, ProblemConfig, ProblemKind};
use crate::data::{parse_test_cases, LiteralKind};
use crate::engines::execution::interpreter::DEFAULT_MAX_POINTS_IN_PROGRAM;
use crate::engines::execution::{Interpreter, Program};
use crate::error::Result;
use crate::types::{TestCaseSet, Value};
use log::{debug, warn};

/// Runs Push programs on a single numeric input and reads the answer from
/// the top of the primary stack.
#[derive(Debug, Clone)]
pub struct PushEvaluator {
    interpreter: Interpreter,
    primary: LiteralKind,
    execution_limit: usize,
    failure_error: f64,
}

impl PushEvaluator {
    pub fn new(
        primary: LiteralKind,
        execution_limit: usize,
        failure_error: f64,
        max_points_in_program: usize,
    ) -> Self {
        Self {
            interpreter: Interpreter::new(max_points_in_program),
            primary,
            execution_limit,
            failure_error,
        }
    }

    /// Clears every stack, then pushes `input` onto the primary stack and the
    /// input stack.
    pub fn prepare(&mut self, input: Value) {
        self.interpreter.clear_stacks();
        match self.primary {
            LiteralKind::Integer => {
                let value = match input {
                    Value::Integer(i) => i,
                    Value::Float(f) => f as i64,
                };
                self.interpreter.int_stack_mut().push(value);
            }
            LiteralKind::Float => self.interpreter.float_stack_mut().push(input.as_f64()),
        }
        self.interpreter.input_stack_mut().push(input);
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    pub fn primary(&self) -> LiteralKind {
        self.primary
    }

    pub fn failure_error(&self) -> f64 {
        self.failure_error
    }

    // Integer results subtract in i128 so large values keep unit differences.
    fn error_against(&self, expected: Value) -> Option<f64> {
        match self.primary {
            LiteralKind::Integer => {
                let actual = *self.interpreter.int_stack().top()?;
                Some(match expected {
                    Value::Integer(e) => (actual as i128 - e as i128) as f64,
                    Value::Float(e) => actual as f64 - e,
                })
            }
            LiteralKind::Float => {
                let actual = *self.interpreter.float_stack().top()?;
                Some(actual - expected.as_f64())
            }
        }
    }
}

impl Evaluator for PushEvaluator {
    type Candidate = Program;

    fn score(&mut self, candidate: &Program, input: Value, expected: Value) -> f64 {
        self.prepare(input);

        let outcome = self.interpreter.execute(candidate, self.execution_limit);
        if outcome.exhausted {
            debug!(
                "Step budget of {} exhausted for input {}",
                self.execution_limit, input
            );
        }

        let error = self.error_against(expected);
        match error {
            Some(error) if error.is_finite() => {
                debug!("Input {} expected {} error {}", input, expected, error);
                error
            }
            Some(error) => {
                warn!(
                    "Non-finite error {} for input {}, using {}",
                    error, input, self.failure_error
                );
                self.failure_error
            }
            None => {
                warn!(
                    "Empty result stack for input {}, using {}",
                    input, self.failure_error
                );
                self.failure_error
            }
        }
    }
}

impl ProblemKind {
    pub fn literal_kind(&self) -> LiteralKind {
        match self {
            ProblemKind::IntegerRegression => LiteralKind::Integer,
            ProblemKind::FloatRegression => LiteralKind::Float,
        }
    }
}

/// Symbolic regression over a single integer or float input.
#[derive(Debug, Clone)]
pub struct RegressionProblem {
    kind: ProblemKind,
    execution_limit: usize,
    failure_error: f64,
    max_points_in_program: usize,
}

impl RegressionProblem {
    pub fn new(kind: ProblemKind, execution_limit: usize, failure_error: f64) -> Self {
        Self {
            kind,
            execution_limit,
            failure_error,
            max_points_in_program: DEFAULT_MAX_POINTS_IN_PROGRAM,
        }
    }

    pub fn from_config(problem: &ProblemConfig, interpreter: &InterpreterConfig) -> Self {
        Self {
            kind: problem.kind,
            execution_limit: problem.execution_limit,
            failure_error: problem.failure_error,
            max_points_in_program: interpreter.max_points_in_program,
        }
    }

    pub fn kind(&self) -> ProblemKind {
        self.kind
    }
}

impl Problem for RegressionProblem {
    type Evaluator = PushEvaluator;

    fn load_test_cases(&self, text: &str) -> Result<TestCaseSet> {
        parse_test_cases(text, self.kind.literal_kind())
    }

    fn configure_evaluator(&self) -> PushEvaluator {
        PushEvaluator::new(
            self.kind.literal_kind(),
            self.execution_limit,
            self.failure_error,
            self.max_points_in_program,
        )
    }
}
