use super::instructions::Instruction;
use crate::error::{PushfitError, Result};
use std::fmt;

/// Deepest list nesting `Program::parse` accepts. Points, display and drop
/// all recurse over nested lists.
pub const MAX_NESTING_DEPTH: usize = 1000;

/// A single element of a Push program.
#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Instruction(Instruction),
    Name(String),
    List(Program),
}

impl Atom {
    /// Classifies a bare token: integer, float, boolean, instruction, then name.
    pub fn from_token(token: &str) -> Atom {
        if let Ok(i) = token.parse::<i64>() {
            return Atom::Integer(i);
        }
        if looks_numeric(token) {
            if let Ok(f) = token.parse::<f64>() {
                return Atom::Float(f);
            }
        }
        match token {
            "true" => Atom::Boolean(true),
            "false" => Atom::Boolean(false),
            _ => match token.parse::<Instruction>() {
                Ok(instruction) => Atom::Instruction(instruction),
                Err(_) => Atom::Name(token.to_string()),
            },
        }
    }

    /// Number of points this atom contributes to a program's size.
    pub fn points(&self) -> usize {
        match self {
            Atom::List(program) => program.points(),
            _ => 1,
        }
    }
}

// Keeps names such as "inf" or "nan" from being read as floats.
fn looks_numeric(token: &str) -> bool {
    token
        .chars()
        .next()
        .map(|c| c.is_ascii_digit() || c == '-' || c == '+' || c == '.')
        .unwrap_or(false)
        && token.chars().any(|c| c.is_ascii_digit())
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Integer(i) => write!(f, "{}", i),
            Atom::Float(x) => {
                if x.fract() == 0.0 && x.is_finite() {
                    write!(f, "{:.1}", x)
                } else {
                    write!(f, "{}", x)
                }
            }
            Atom::Boolean(b) => write!(f, "{}", b),
            Atom::Instruction(instruction) => write!(f, "{}", instruction),
            Atom::Name(name) => write!(f, "{}", name),
            Atom::List(program) => write!(f, "{}", program),
        }
    }
}

/// An ordered Push list. Candidates evolved by the GA are programs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    atoms: Vec<Atom>,
}

impl Program {
    pub fn new(atoms: Vec<Atom>) -> Self {
        Self { atoms }
    }

    /// Parses Push source text. Outer delimiters are optional: when the whole
    /// text is a single list, that list is the program.
    pub fn parse(text: &str) -> Result<Program> {
        let mut frames: Vec<(char, Vec<Atom>)> = vec![(' ', Vec::new())];

        for token in tokenize(text) {
            match token {
                Token::Open(bracket) => {
                    if frames.len() > MAX_NESTING_DEPTH {
                        return Err(PushfitError::Parse(format!(
                            "lists nested deeper than {}",
                            MAX_NESTING_DEPTH
                        )));
                    }
                    frames.push((bracket, Vec::new()));
                }
                Token::Close(bracket) => {
                    if frames.len() < 2 {
                        return Err(PushfitError::Parse(format!(
                            "unexpected '{}' in \"{}\"",
                            bracket, text
                        )));
                    }
                    let (open, atoms) = frames.pop().unwrap_or_default();
                    if closing_for(open) != Some(bracket) {
                        return Err(PushfitError::Parse(format!(
                            "'{}' closed by '{}' in \"{}\"",
                            open, bracket, text
                        )));
                    }
                    if let Some((_, parent)) = frames.last_mut() {
                        parent.push(Atom::List(Program::new(atoms)));
                    }
                }
                Token::Word(word) => {
                    if let Some((_, current)) = frames.last_mut() {
                        current.push(Atom::from_token(word));
                    }
                }
            }
        }

        if frames.len() != 1 {
            return Err(PushfitError::Parse(format!("unclosed list in \"{}\"", text)));
        }

        let (_, mut atoms) = frames.pop().unwrap_or_default();
        if atoms.len() == 1 && matches!(atoms[0], Atom::List(_)) {
            if let Some(Atom::List(inner)) = atoms.pop() {
                return Ok(inner);
            }
        }
        Ok(Program::new(atoms))
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    pub fn push(&mut self, atom: Atom) {
        self.atoms.push(atom);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Atom> {
        self.atoms.iter()
    }

    /// Total size counting the list itself and every nested atom.
    pub fn points(&self) -> usize {
        1 + self.atoms.iter().map(Atom::points).sum::<usize>()
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Atom;
    type IntoIter = std::slice::Iter<'a, Atom>;

    fn into_iter(self) -> Self::IntoIter {
        self.atoms.iter()
    }
}

impl IntoIterator for Program {
    type Item = Atom;
    type IntoIter = std::vec::IntoIter<Atom>;

    fn into_iter(self) -> Self::IntoIter {
        self.atoms.into_iter()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for atom in &self.atoms {
            write!(f, " {}", atom)?;
        }
        write!(f, " )")
    }
}

enum Token<'a> {
    Open(char),
    Close(char),
    Word(&'a str),
}

fn closing_for(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '[' => Some(']'),
        _ => None,
    }
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        let delimiter = matches!(c, '(' | ')' | '[' | ']');
        if c.is_whitespace() || delimiter {
            if let Some(s) = start.take() {
                tokens.push(Token::Word(&text[s..i]));
            }
            match c {
                '(' | '[' => tokens.push(Token::Open(c)),
                ')' | ']' => tokens.push(Token::Close(c)),
                _ => {}
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        tokens.push(Token::Word(&text[s..]));
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::execution::instructions::BinaryOp;

    #[test]
    fn test_parse_flat_program() {
        let program = Program::parse("( 2 3 integer.+ )").unwrap();
        assert_eq!(program.len(), 3);
        assert_eq!(program.get(0), Some(&Atom::Integer(2)));
        assert_eq!(
            program.get(2),
            Some(&Atom::Instruction(Instruction::IntBinary(BinaryOp::Add)))
        );
    }

    #[test]
    fn test_outer_delimiters_are_optional() {
        let wrapped = Program::parse("(1 2.5 true)").unwrap();
        let bare = Program::parse("1 2.5 true").unwrap();
        assert_eq!(wrapped, bare);
        assert_eq!(bare.get(1), Some(&Atom::Float(2.5)));
        assert_eq!(bare.get(2), Some(&Atom::Boolean(true)));
    }

    #[test]
    fn test_square_brackets_nest() {
        let program = Program::parse("[[1 2][3 5]]").unwrap();
        assert_eq!(program.len(), 2);
        match program.get(1) {
            Some(Atom::List(inner)) => {
                assert_eq!(inner.get(0), Some(&Atom::Integer(3)));
                assert_eq!(inner.get(1), Some(&Atom::Integer(5)));
            }
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_tokens_become_names() {
        let program = Program::parse("foo inf").unwrap();
        assert_eq!(program.get(0), Some(&Atom::Name("foo".to_string())));
        assert_eq!(program.get(1), Some(&Atom::Name("inf".to_string())));
    }

    #[test]
    fn test_mismatched_brackets_fail() {
        assert!(matches!(Program::parse("( 1 ]"), Err(PushfitError::Parse(_))));
        assert!(matches!(Program::parse("( 1 2"), Err(PushfitError::Parse(_))));
        assert!(matches!(Program::parse("1 )"), Err(PushfitError::Parse(_))));
    }

    #[test]
    fn test_nesting_depth_is_limited() {
        let depth = MAX_NESTING_DEPTH;
        let ok = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        assert!(Program::parse(&ok).is_ok());

        let deep = format!("{}1{}", "(".repeat(100_000), ")".repeat(100_000));
        assert!(matches!(Program::parse(&deep), Err(PushfitError::Parse(_))));
    }

    #[test]
    fn test_points_count_nested_lists() {
        let program = Program::parse("( 1 ( 2 3 ) )").unwrap();
        assert_eq!(program.points(), 5);
    }

    #[test]
    fn test_display_uses_parentheses() {
        let program = Program::parse("[1 [2.0 exec.noop]]").unwrap();
        assert_eq!(program.to_string(), "( 1 ( 2.0 exec.noop ) )");
    }
}
