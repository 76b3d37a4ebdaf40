use std::fmt;

/// A typed Push stack. The top of the stack is the end of the vector.
#[derive(Debug, Clone, PartialEq)]
pub struct PushStack<T> {
    items: Vec<T>,
}

impl<T> Default for PushStack<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Clone> PushStack<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: T) {
        self.items.push(value);
    }

    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    pub fn top(&self) -> Option<&T> {
        self.items.last()
    }

    /// Item `depth` positions below the top; `peek(0)` is the top.
    pub fn peek(&self, depth: usize) -> Option<&T> {
        self.items
            .len()
            .checked_sub(depth + 1)
            .and_then(|i| self.items.get(i))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    // Maps a Push depth index onto a vector position, clamping into range.
    fn position_for(&self, index: i64) -> Option<usize> {
        let len = self.items.len();
        if len == 0 {
            return None;
        }
        let depth = index.clamp(0, len as i64 - 1) as usize;
        Some(len - depth - 1)
    }
}

/// Stack manipulation shared by every Push stack, independent of item type.
pub trait StackOps {
    fn depth(&self) -> usize;
    fn flush(&mut self);
    fn discard(&mut self);
    fn dup(&mut self);
    fn swap(&mut self);
    fn rot(&mut self);
    fn shove(&mut self, index: i64);
    fn yank(&mut self, index: i64);
    fn yank_dup(&mut self, index: i64);
}

impl<T: Clone> StackOps for PushStack<T> {
    fn depth(&self) -> usize {
        self.items.len()
    }

    fn flush(&mut self) {
        self.items.clear();
    }

    fn discard(&mut self) {
        self.items.pop();
    }

    fn dup(&mut self) {
        if let Some(top) = self.items.last().cloned() {
            self.items.push(top);
        }
    }

    fn swap(&mut self) {
        let len = self.items.len();
        if len > 1 {
            self.items.swap(len - 1, len - 2);
        }
    }

    fn rot(&mut self) {
        let len = self.items.len();
        if len > 2 {
            let third = self.items.remove(len - 3);
            self.items.push(third);
        }
    }

    fn shove(&mut self, index: i64) {
        if let Some(position) = self.position_for(index) {
            if let Some(top) = self.items.pop() {
                self.items.insert(position, top);
            }
        }
    }

    fn yank(&mut self, index: i64) {
        if let Some(position) = self.position_for(index) {
            let item = self.items.remove(position);
            self.items.push(item);
        }
    }

    fn yank_dup(&mut self, index: i64) {
        if let Some(position) = self.position_for(index) {
            let item = self.items[position].clone();
            self.items.push(item);
        }
    }
}

impl<T: fmt::Display> fmt::Display for PushStack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, item) in self.items.iter().rev().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack_of(values: &[i64]) -> PushStack<i64> {
        let mut stack = PushStack::new();
        for v in values {
            stack.push(*v);
        }
        stack
    }

    #[test]
    fn test_peek_counts_from_top() {
        let stack = stack_of(&[1, 2, 3]);
        assert_eq!(stack.peek(0), Some(&3));
        assert_eq!(stack.peek(2), Some(&1));
        assert_eq!(stack.peek(3), None);
    }

    #[test]
    fn test_rot_brings_third_item_up() {
        let mut stack = stack_of(&[1, 2, 3]);
        stack.rot();
        assert_eq!(stack.iter().copied().collect::<Vec<_>>(), vec![2, 3, 1]);
    }

    #[test]
    fn test_shove_buries_top_item() {
        let mut stack = stack_of(&[1, 2, 3, 4]);
        stack.shove(2);
        assert_eq!(stack.iter().copied().collect::<Vec<_>>(), vec![1, 4, 2, 3]);
    }

    #[test]
    fn test_yank_clamps_index() {
        let mut stack = stack_of(&[1, 2, 3]);
        stack.yank(99);
        assert_eq!(stack.iter().copied().collect::<Vec<_>>(), vec![2, 3, 1]);

        let mut stack = stack_of(&[1, 2, 3]);
        stack.yank(-5);
        assert_eq!(stack.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_yank_dup_copies_item() {
        let mut stack = stack_of(&[7, 8, 9]);
        stack.yank_dup(1);
        assert_eq!(stack.iter().copied().collect::<Vec<_>>(), vec![7, 8, 9, 8]);
    }

    #[test]
    fn test_ops_on_empty_stack_are_noops() {
        let mut stack: PushStack<i64> = PushStack::new();
        stack.dup();
        stack.swap();
        stack.rot();
        stack.shove(1);
        stack.yank(1);
        stack.yank_dup(0);
        stack.discard();
        assert!(stack.is_empty());
    }

    #[test]
    fn test_display_lists_top_first() {
        let stack = stack_of(&[1, 2, 3]);
        assert_eq!(stack.to_string(), "[3 2 1]");
    }
}
