use crate::engines::execution::{Atom, Program};
use crate::error::{PushfitError, Result};
use crate::types::{TestCase, TestCaseSet, Value};
use log::info;

/// Scalar type expected in a fitness-case list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Integer,
    Float,
}

/// Parses a nested list such as `[[1 2][3 5]]` into fitness cases.
///
/// Each inner list contributes `(input expected)` from its first two
/// elements; further elements are ignored. Integer cases require integer
/// literals, float cases accept either and widen to float.
pub fn parse_test_cases(text: &str, kind: LiteralKind) -> Result<TestCaseSet> {
    let case_list = Program::parse(text)?;
    let mut cases = Vec::with_capacity(case_list.len());

    for (index, atom) in case_list.iter().enumerate() {
        let fields = match atom {
            Atom::List(fields) if fields.len() >= 2 => fields,
            other => {
                return Err(PushfitError::MalformedCase {
                    index,
                    text: other.to_string(),
                })
            }
        };

        let input = literal(fields.get(0), kind, index, "input")?;
        let expected = literal(fields.get(1), kind, index, "output")?;

        info!(";; Fitness case #{} input: {} output: {}", index, input, expected);
        cases.push(TestCase::new(input, expected));
    }

    Ok(TestCaseSet::new(cases))
}

fn literal(atom: Option<&Atom>, kind: LiteralKind, index: usize, field: &str) -> Result<Value> {
    let value = match (kind, atom) {
        (LiteralKind::Integer, Some(Atom::Integer(i))) => Some(Value::Integer(*i)),
        (LiteralKind::Float, Some(Atom::Integer(i))) => Some(Value::Float(*i as f64)),
        (LiteralKind::Float, Some(Atom::Float(f))) => Some(Value::Float(*f)),
        _ => None,
    };

    value.ok_or_else(|| PushfitError::LiteralFormat {
        index,
        field: field.to_string(),
        literal: atom.map(ToString::to_string).unwrap_or_default(),
    })
}
