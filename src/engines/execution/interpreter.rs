use super::instructions::{Instruction, StackKind, StackOp};
use super::program::{Atom, Program};
use super::stack::{PushStack, StackOps};
use crate::types::Value;
use std::fmt;

pub const DEFAULT_MAX_POINTS_IN_PROGRAM: usize = 100;

/// How a bounded run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionOutcome {
    /// Instructions executed during this run.
    pub steps: usize,
    /// True when the step budget ran out with work still on the exec stack.
    pub exhausted: bool,
}

/// A Push interpreter with one stack per type.
///
/// The interpreter never fails: instructions lacking arguments are no-ops, and
/// a run stops either when the exec stack empties or when the step budget is
/// spent. Callers reset state with [`Interpreter::clear_stacks`] between runs.
#[derive(Debug, Clone)]
pub struct Interpreter {
    int_stack: PushStack<i64>,
    float_stack: PushStack<f64>,
    bool_stack: PushStack<bool>,
    name_stack: PushStack<String>,
    exec_stack: PushStack<Atom>,
    input_stack: PushStack<Value>,
    max_points_in_program: usize,
    executions: u64,
    total_steps: u64,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_POINTS_IN_PROGRAM)
    }
}

impl Interpreter {
    pub fn new(max_points_in_program: usize) -> Self {
        Self {
            int_stack: PushStack::new(),
            float_stack: PushStack::new(),
            bool_stack: PushStack::new(),
            name_stack: PushStack::new(),
            exec_stack: PushStack::new(),
            input_stack: PushStack::new(),
            max_points_in_program,
            executions: 0,
            total_steps: 0,
        }
    }

    /// Empties every stack, the input stack included.
    pub fn clear_stacks(&mut self) {
        self.int_stack.clear();
        self.float_stack.clear();
        self.bool_stack.clear();
        self.name_stack.clear();
        self.exec_stack.clear();
        self.input_stack.clear();
    }

    /// Runs `program` for at most `max_steps` instructions.
    pub fn execute(&mut self, program: &Program, max_steps: usize) -> ExecutionOutcome {
        self.executions += 1;
        self.exec_stack.push(Atom::List(program.clone()));
        self.step(max_steps)
    }

    /// Continues whatever is on the exec stack for at most `max_steps` instructions.
    pub fn step(&mut self, max_steps: usize) -> ExecutionOutcome {
        let mut steps = 0;
        while steps < max_steps {
            let Some(atom) = self.exec_stack.pop() else {
                break;
            };
            self.execute_atom(atom);
            steps += 1;
        }
        self.total_steps += steps as u64;
        ExecutionOutcome {
            steps,
            exhausted: !self.exec_stack.is_empty(),
        }
    }

    pub fn int_stack(&self) -> &PushStack<i64> {
        &self.int_stack
    }

    pub fn int_stack_mut(&mut self) -> &mut PushStack<i64> {
        &mut self.int_stack
    }

    pub fn float_stack(&self) -> &PushStack<f64> {
        &self.float_stack
    }

    pub fn float_stack_mut(&mut self) -> &mut PushStack<f64> {
        &mut self.float_stack
    }

    pub fn bool_stack(&self) -> &PushStack<bool> {
        &self.bool_stack
    }

    pub fn name_stack(&self) -> &PushStack<String> {
        &self.name_stack
    }

    pub fn exec_stack(&self) -> &PushStack<Atom> {
        &self.exec_stack
    }

    pub fn input_stack(&self) -> &PushStack<Value> {
        &self.input_stack
    }

    pub fn input_stack_mut(&mut self) -> &mut PushStack<Value> {
        &mut self.input_stack
    }

    /// Number of programs started with [`Interpreter::execute`].
    pub fn executions(&self) -> u64 {
        self.executions
    }

    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    fn execute_atom(&mut self, atom: Atom) {
        match atom {
            Atom::List(program) => {
                for inner in program.into_iter().rev() {
                    self.exec_stack.push(inner);
                }
            }
            Atom::Integer(i) => self.int_stack.push(i),
            Atom::Float(f) => self.float_stack.push(f),
            Atom::Boolean(b) => self.bool_stack.push(b),
            Atom::Name(name) => self.name_stack.push(name),
            Atom::Instruction(instruction) => self.execute_instruction(instruction),
        }
    }

    fn execute_instruction(&mut self, instruction: Instruction) {
        match instruction {
            Instruction::IntBinary(op) => {
                if let Some((b, a)) = pop_pair(&mut self.int_stack) {
                    self.int_stack.push(op.apply_int(b, a));
                }
            }
            Instruction::IntCompare(cmp) => {
                if let Some((b, a)) = pop_pair(&mut self.int_stack) {
                    self.bool_stack.push(cmp.test(b, a));
                }
            }
            Instruction::IntAbs => {
                if let Some(a) = self.int_stack.pop() {
                    self.int_stack.push(a.wrapping_abs());
                }
            }
            Instruction::IntNeg => {
                if let Some(a) = self.int_stack.pop() {
                    self.int_stack.push(a.wrapping_neg());
                }
            }
            Instruction::IntFromFloat => {
                if let Some(f) = self.float_stack.pop() {
                    self.int_stack.push(f as i64);
                }
            }
            Instruction::IntFromBoolean => {
                if let Some(b) = self.bool_stack.pop() {
                    self.int_stack.push(b as i64);
                }
            }
            Instruction::FloatBinary(op) => {
                if let Some((b, a)) = pop_pair(&mut self.float_stack) {
                    self.float_stack.push(op.apply_float(b, a));
                }
            }
            Instruction::FloatCompare(cmp) => {
                if let Some((b, a)) = pop_pair(&mut self.float_stack) {
                    self.bool_stack.push(cmp.test(b, a));
                }
            }
            Instruction::FloatUnary(func) => {
                if let Some(a) = self.float_stack.pop() {
                    self.float_stack.push(func.apply(a));
                }
            }
            Instruction::FloatFromInteger => {
                if let Some(i) = self.int_stack.pop() {
                    self.float_stack.push(i as f64);
                }
            }
            Instruction::FloatFromBoolean => {
                if let Some(b) = self.bool_stack.pop() {
                    self.float_stack.push(if b { 1.0 } else { 0.0 });
                }
            }
            Instruction::BoolBinary(op) => {
                if let Some((b, a)) = pop_pair(&mut self.bool_stack) {
                    self.bool_stack.push(op.apply(b, a));
                }
            }
            Instruction::BoolNot => {
                if let Some(a) = self.bool_stack.pop() {
                    self.bool_stack.push(!a);
                }
            }
            Instruction::BoolFromInteger => {
                if let Some(i) = self.int_stack.pop() {
                    self.bool_stack.push(i != 0);
                }
            }
            Instruction::BoolFromFloat => {
                if let Some(f) = self.float_stack.pop() {
                    self.bool_stack.push(f != 0.0);
                }
            }
            Instruction::Stack(kind, op) => self.stack_instruction(kind, op),
            Instruction::ExecNoop => {}
            Instruction::ExecIf => self.exec_if(),
            Instruction::ExecDoRange => self.exec_do_range(),
            Instruction::ExecDoTimes => self.exec_do_loop(true),
            Instruction::ExecDoCount => self.exec_do_loop(false),
            Instruction::ExecK => {
                if self.exec_stack.len() > 1 {
                    self.exec_stack.swap();
                    self.exec_stack.discard();
                }
            }
            Instruction::ExecS => self.exec_s(),
            Instruction::ExecY => {
                if let Some(a) = self.exec_stack.pop() {
                    let recurse = Program::new(vec![
                        Atom::Instruction(Instruction::ExecY),
                        a.clone(),
                    ]);
                    self.exec_stack.push(Atom::List(recurse));
                    self.exec_stack.push(a);
                }
            }
            Instruction::InputIndex => {
                if self.input_stack.is_empty() {
                    return;
                }
                if let Some(index) = self.int_stack.pop() {
                    let last = self.input_stack.len() as i64 - 1;
                    self.push_input(index.clamp(0, last) as usize);
                }
            }
            Instruction::InputInAll => {
                for index in 0..self.input_stack.len() {
                    self.push_input(index);
                }
            }
            Instruction::InputInAllRev => {
                for index in (0..self.input_stack.len()).rev() {
                    self.push_input(index);
                }
            }
        }
    }

    fn stack_mut(&mut self, kind: StackKind) -> &mut dyn StackOps {
        match kind {
            StackKind::Integer => &mut self.int_stack,
            StackKind::Float => &mut self.float_stack,
            StackKind::Boolean => &mut self.bool_stack,
            StackKind::Name => &mut self.name_stack,
            StackKind::Exec => &mut self.exec_stack,
            StackKind::Input => &mut self.input_stack,
        }
    }

    fn stack_instruction(&mut self, kind: StackKind, op: StackOp) {
        match op {
            StackOp::Pop => self.stack_mut(kind).discard(),
            StackOp::Swap => self.stack_mut(kind).swap(),
            StackOp::Dup => self.stack_mut(kind).dup(),
            StackOp::Rot => self.stack_mut(kind).rot(),
            StackOp::Flush => self.stack_mut(kind).flush(),
            StackOp::Depth => {
                let depth = self.stack_mut(kind).depth();
                self.int_stack.push(depth as i64);
            }
            StackOp::Yank | StackOp::YankDup | StackOp::Shove => {
                let Some(index) = self.int_stack.pop() else {
                    return;
                };
                if self.stack_mut(kind).depth() == 0 {
                    self.int_stack.push(index);
                    return;
                }
                let stack = self.stack_mut(kind);
                match op {
                    StackOp::Yank => stack.yank(index),
                    StackOp::YankDup => stack.yank_dup(index),
                    _ => stack.shove(index),
                }
            }
        }
    }

    fn exec_if(&mut self) {
        if self.exec_stack.len() < 2 {
            return;
        }
        let Some(condition) = self.bool_stack.pop() else {
            return;
        };
        if let Some((if_false, if_true)) = pop_pair(&mut self.exec_stack) {
            self.exec_stack.push(if condition { if_true } else { if_false });
        }
    }

    fn exec_do_range(&mut self) {
        if self.exec_stack.is_empty() || self.int_stack.len() < 2 {
            return;
        }
        let (Some((start, stop)), Some(code)) =
            (pop_pair(&mut self.int_stack), self.exec_stack.pop())
        else {
            return;
        };

        self.int_stack.push(start);
        if start != stop {
            let next = if start < stop { start + 1 } else { start - 1 };
            let recurse = Program::new(vec![
                Atom::Integer(next),
                Atom::Integer(stop),
                Atom::Instruction(Instruction::ExecDoRange),
                code.clone(),
            ]);
            self.exec_stack.push(Atom::List(recurse));
        }
        self.exec_stack.push(code);
    }

    // exec.do*times discards the loop counter before each body run; exec.do*count keeps it.
    fn exec_do_loop(&mut self, discard_counter: bool) {
        if self.exec_stack.is_empty() {
            return;
        }
        match self.int_stack.top() {
            Some(&count) if count > 0 => {}
            _ => return,
        }
        let (Some(count), Some(body)) = (self.int_stack.pop(), self.exec_stack.pop()) else {
            return;
        };

        let body = if discard_counter {
            let mut wrapped = vec![Atom::Instruction(Instruction::Stack(
                StackKind::Integer,
                StackOp::Pop,
            ))];
            match body {
                Atom::List(program) => wrapped.extend(program),
                other => wrapped.push(other),
            }
            Atom::List(Program::new(wrapped))
        } else {
            body
        };

        let range = Program::new(vec![
            Atom::Integer(0),
            Atom::Integer(count - 1),
            Atom::Instruction(Instruction::ExecDoRange),
            body,
        ]);
        self.exec_stack.push(Atom::List(range));
    }

    fn exec_s(&mut self) {
        if self.exec_stack.len() < 3 {
            return;
        }
        let (Some(a), Some(b), Some(c)) = (
            self.exec_stack.pop(),
            self.exec_stack.pop(),
            self.exec_stack.pop(),
        ) else {
            return;
        };
        let list_bc = Program::new(vec![b.clone(), c.clone()]);
        if list_bc.points() > self.max_points_in_program {
            self.exec_stack.push(c);
            self.exec_stack.push(b);
            self.exec_stack.push(a);
        } else {
            self.exec_stack.push(Atom::List(list_bc));
            self.exec_stack.push(c);
            self.exec_stack.push(a);
        }
    }

    // Pushes the input at `index` (counted from the bottom) onto its type's stack.
    fn push_input(&mut self, index: usize) {
        match self.input_stack.iter().nth(index).copied() {
            Some(Value::Integer(i)) => self.int_stack.push(i),
            Some(Value::Float(f)) => self.float_stack.push(f),
            None => {}
        }
    }
}

// Pops the top two items as (second, top) so binary operators read left to right.
fn pop_pair<T: Clone>(stack: &mut PushStack<T>) -> Option<(T, T)> {
    if stack.len() < 2 {
        return None;
    }
    let top = stack.pop()?;
    let second = stack.pop()?;
    Some((second, top))
}

impl fmt::Display for Interpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "exec stack: {}", self.exec_stack)?;
        writeln!(f, "int stack: {}", self.int_stack)?;
        writeln!(f, "float stack: {}", self.float_stack)?;
        writeln!(f, "boolean stack: {}", self.bool_stack)?;
        writeln!(f, "name stack: {}", self.name_stack)?;
        writeln!(f, "input stack: {}", self.input_stack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str) -> Interpreter {
        let mut interpreter = Interpreter::default();
        let program = Program::parse(source).unwrap();
        interpreter.execute(&program, 1000);
        interpreter
    }

    #[test]
    fn test_basic_arithmetic() {
        let interpreter = run("( 5 10 integer.+ )");
        assert_eq!(interpreter.int_stack().top(), Some(&15));
    }

    #[test]
    fn test_operand_order() {
        let interpreter = run("( 10 4 integer.- 9.0 3.0 float./ )");
        assert_eq!(interpreter.int_stack().top(), Some(&6));
        assert_eq!(interpreter.float_stack().top(), Some(&3.0));
    }

    #[test]
    fn test_division_by_zero_safety() {
        let interpreter = run("( 10 0 integer./ 1.0 0.0 float.% )");
        assert_eq!(interpreter.int_stack().top(), Some(&0));
        assert_eq!(interpreter.float_stack().top(), Some(&0.0));
    }

    #[test]
    fn test_missing_arguments_are_noops() {
        let interpreter = run("( 3 integer.* float.+ boolean.not exec.if )");
        assert_eq!(interpreter.int_stack().len(), 1);
        assert!(interpreter.float_stack().is_empty());
        assert!(interpreter.bool_stack().is_empty());
    }

    #[test]
    fn test_comparisons_push_booleans() {
        let interpreter = run("( 5 10 integer.< 2.0 1.0 float.< )");
        assert_eq!(
            interpreter.bool_stack().iter().copied().collect::<Vec<_>>(),
            vec![true, false]
        );
    }

    #[test]
    fn test_exec_if_picks_branch() {
        let interpreter = run("( true exec.if 1 2 )");
        assert_eq!(interpreter.int_stack().iter().copied().collect::<Vec<_>>(), vec![1]);

        let interpreter = run("( false exec.if 1 2 )");
        assert_eq!(interpreter.int_stack().iter().copied().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_do_range_pushes_each_index() {
        let interpreter = run("( 0 3 exec.do*range exec.noop )");
        assert_eq!(
            interpreter.int_stack().iter().copied().collect::<Vec<_>>(),
            vec![0, 1, 2, 3]
        );
    }

    #[test]
    fn test_do_times_discards_counter() {
        // 1 doubled three times
        let interpreter = run("( 1 3 exec.do*times ( 2 integer.* ) )");
        assert_eq!(interpreter.int_stack().iter().copied().collect::<Vec<_>>(), vec![8]);
    }

    #[test]
    fn test_do_count_keeps_counter() {
        let interpreter = run("( 3 exec.do*count exec.noop )");
        assert_eq!(
            interpreter.int_stack().iter().copied().collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_exec_k_drops_second_item() {
        let interpreter = run("( exec.k 1 2 3 )");
        assert_eq!(interpreter.int_stack().iter().copied().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_exec_s_respects_point_limit() {
        let mut interpreter = Interpreter::new(2);
        let program = Program::parse("( exec.s 1 2 3 )").unwrap();
        interpreter.execute(&program, 100);
        assert_eq!(
            interpreter.int_stack().iter().copied().collect::<Vec<_>>(),
            vec![1, 2, 3]
        );

        let interpreter = run("( exec.s 1 2 3 )");
        assert_eq!(
            interpreter.int_stack().iter().copied().collect::<Vec<_>>(),
            vec![1, 3, 2, 3]
        );
    }

    #[test]
    fn test_exec_y_is_bounded_by_step_budget() {
        let mut interpreter = Interpreter::default();
        let program = Program::parse("( exec.y ( 1 integer.+ ) )").unwrap();
        interpreter.int_stack_mut().push(0);
        let outcome = interpreter.execute(&program, 50);
        assert_eq!(outcome.steps, 50);
        assert!(outcome.exhausted);
        assert!(interpreter.int_stack().top().is_some());
    }

    #[test]
    fn test_stack_instructions_use_integer_index() {
        let interpreter = run("( 1.0 2.0 3.0 2 float.yank )");
        assert_eq!(
            interpreter.float_stack().iter().copied().collect::<Vec<_>>(),
            vec![2.0, 3.0, 1.0]
        );
        assert!(interpreter.int_stack().is_empty());
    }

    #[test]
    fn test_yank_on_empty_stack_restores_index() {
        let interpreter = run("( 4 float.yank )");
        assert_eq!(interpreter.int_stack().iter().copied().collect::<Vec<_>>(), vec![4]);
    }

    #[test]
    fn test_stackdepth_and_dup() {
        let interpreter = run("( 7 integer.dup integer.stackdepth )");
        assert_eq!(
            interpreter.int_stack().iter().copied().collect::<Vec<_>>(),
            vec![7, 7, 2]
        );
    }

    #[test]
    fn test_input_instructions_read_input_stack() {
        let mut interpreter = Interpreter::default();
        interpreter.input_stack_mut().push(Value::Integer(4));
        interpreter.input_stack_mut().push(Value::Float(0.5));
        let program = Program::parse("( input.inall 9 input.index input.stackdepth )").unwrap();
        interpreter.execute(&program, 100);
        assert_eq!(
            interpreter.int_stack().iter().copied().collect::<Vec<_>>(),
            vec![4, 2]
        );
        assert_eq!(
            interpreter.float_stack().iter().copied().collect::<Vec<_>>(),
            vec![0.5, 0.5]
        );
    }

    #[test]
    fn test_names_go_to_name_stack() {
        let interpreter = run("( foo bar name.swap )");
        assert_eq!(interpreter.name_stack().top().map(String::as_str), Some("foo"));
    }

    #[test]
    fn test_clear_stacks_resets_everything() {
        let mut interpreter = run("( 1 2.0 true foo exec.y exec.noop )");
        interpreter.input_stack_mut().push(Value::Integer(1));
        interpreter.clear_stacks();
        assert!(interpreter.int_stack().is_empty());
        assert!(interpreter.float_stack().is_empty());
        assert!(interpreter.bool_stack().is_empty());
        assert!(interpreter.name_stack().is_empty());
        assert!(interpreter.exec_stack().is_empty());
        assert!(interpreter.input_stack().is_empty());
    }

    #[test]
    fn test_counters_accumulate() {
        let mut interpreter = Interpreter::default();
        let program = Program::parse("( 1 2 integer.+ )").unwrap();
        interpreter.execute(&program, 100);
        interpreter.execute(&program, 100);
        assert_eq!(interpreter.executions(), 2);
        // list expansion plus three atoms, twice
        assert_eq!(interpreter.total_steps(), 8);
    }
}
