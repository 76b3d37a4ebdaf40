pub mod instructions;
pub mod interpreter;
pub mod program;
pub mod random;
pub mod stack;

pub use instructions::{Instruction, StackKind, StackOp};
pub use interpreter::{ExecutionOutcome, Interpreter};
pub use program::{Atom, Program};
pub use random::RandomCodeGenerator;
pub use stack::{PushStack, StackOps};
