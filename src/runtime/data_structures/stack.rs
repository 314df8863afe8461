use std::fmt::{self, Display, Formatter};

/// The value of a single stack cell.
pub type Cell = i64;

/// The canonical true flag, all bits set.
pub const TRUE: Cell = -1;

/// The canonical false flag.
pub const FALSE: Cell = 0;

/// Any non-zero cell counts as true when tested.
pub fn is_true(value: Cell) -> bool {
    value != FALSE
}

/// Convert a boolean into its canonical cell representation.
pub fn to_flag(value: bool) -> Cell {
    if value { TRUE } else { FALSE }
}

/// Render a cell in the given radix.  Negative values keep their sign, so -255 in radix 16 is
/// `-ff`.  Radixes outside of 2..=36 are treated as decimal.
pub fn format_in_radix(value: Cell, radix: u32) -> String {
    let magnitude = format_unsigned_in_radix(value.unsigned_abs(), radix);

    if value < 0 {
        format!("-{}", magnitude)
    } else {
        magnitude
    }
}

/// Render the raw bits of a cell as an unsigned number in the given radix, lowercase digits.
pub fn format_unsigned_in_radix(value: u64, radix: u32) -> String {
    if !(2..=36).contains(&radix) || radix == 10 {
        return value.to_string();
    }

    let mut magnitude = value;
    let mut digits = Vec::new();

    loop {
        let digit = (magnitude % radix as u64) as u32;

        digits.push(char::from_digit(digit, radix).unwrap_or('?'));
        magnitude /= radix as u64;

        if magnitude == 0 {
            break;
        }
    }

    digits.iter().rev().collect()
}

/// A LIFO stack of integer cells.  The machine holds two of these, the data stack and the return
/// stack.
///
/// The stack itself never raises errors, operations that can fail return None and leave the stack
/// untouched.  The interpreter turns those into stack underflow errors with a proper location.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct Stack {
    items: Vec<Cell>,
    max_depth: usize,
}

impl Stack {
    pub fn new() -> Stack {
        Stack {
            items: Vec::with_capacity(20),
            max_depth: 0,
        }
    }

    /// The number of cells currently on the stack.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The deepest the stack has been since it was created.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn push(&mut self, value: Cell) {
        self.items.push(value);

        if self.items.len() > self.max_depth {
            self.max_depth = self.items.len();
        }
    }

    pub fn pop(&mut self) -> Option<Cell> {
        self.items.pop()
    }

    /// Pop `count` cells in one go, returned top first.  If there are not enough cells nothing is
    /// popped at all.
    pub fn pop_n(&mut self, count: usize) -> Option<Vec<Cell>> {
        if count > self.items.len() {
            return None;
        }

        let split = self.items.len() - count;
        let mut popped = self.items.split_off(split);

        popped.reverse();
        Some(popped)
    }

    pub fn peek(&self) -> Option<Cell> {
        self.items.last().copied()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Iterate over the cells from the bottom of the stack to the top.
    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.items.iter()
    }

    /// Render the stack from bottom to top in the given radix, prefixed by its depth.  An empty
    /// stack renders as `<0> EMPTY`.
    pub fn dump(&self, radix: u32) -> String {
        if self.items.is_empty() {
            return "<0> EMPTY".to_string();
        }

        let cells: Vec<String> = self
            .items
            .iter()
            .map(|cell| format_in_radix(*cell, radix))
            .collect();

        format!("<{}> {}", self.items.len(), cells.join(" "))
    }
}

impl Display for Stack {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.dump(10))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pushed_values_pop_in_reverse_order() {
        let mut stack = Stack::new();

        for value in [3, -7, 0, i64::MAX, i64::MIN] {
            stack.push(value);
            assert_eq!(stack.peek(), Some(value));
        }

        assert_eq!(stack.pop(), Some(i64::MIN));
        assert_eq!(stack.pop(), Some(i64::MAX));
        assert_eq!(stack.pop_n(3), Some(vec![0, -7, 3]));
        assert!(stack.is_empty());
        assert_eq!(stack.max_depth(), 5);
    }

    #[test]
    fn short_pop_n_leaves_the_stack_alone() {
        let mut stack = Stack::new();

        stack.push(1);
        stack.push(2);

        assert_eq!(stack.pop_n(3), None);
        assert_eq!(stack.len(), 2);
        assert_eq!(Stack::new().pop(), None);
    }

    #[test]
    fn dump_uses_the_requested_radix() {
        let mut stack = Stack::new();

        assert_eq!(stack.dump(10), "<0> EMPTY");

        stack.push(255);
        stack.push(-16);

        assert_eq!(stack.dump(10), "<2> 255 -16");
        assert_eq!(stack.dump(16), "<2> ff -10");
        assert_eq!(stack.dump(2), "<2> 11111111 -10000");
    }

    #[test]
    fn radix_formatting_handles_the_extremes() {
        assert_eq!(format_in_radix(0, 16), "0");
        assert_eq!(format_in_radix(i64::MIN, 16), "-8000000000000000");
        assert_eq!(format_in_radix(8, 8), "10");
        assert_eq!(format_unsigned_in_radix(u64::MAX, 16), "ffffffffffffffff");
        assert_eq!(format_unsigned_in_radix((-1_i64) as u64, 10), "18446744073709551615");
    }
}
