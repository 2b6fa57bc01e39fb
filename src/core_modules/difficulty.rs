// THEORY:
// The two caller-facing knobs, difficulty and difference count, are plain integers at
// the boundary and are never rejected: anything out of range is clamped. Wrapping them
// in newtypes means the clamping happens exactly once, at construction, and everything
// downstream can rely on the range without re-checking it.

pub const MIN_DIFFICULTY: u8 = 1;
pub const MAX_DIFFICULTY: u8 = 10;
pub const MIN_DIFF_COUNT: u8 = 5;
pub const MAX_DIFF_COUNT: u8 = 10;

/// How subtle the generated differences are: 1 is most obvious, 10 most subtle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Difficulty(u8);

impl Difficulty {
    pub fn new(value: i32) -> Self {
        Self(value.clamp(MIN_DIFFICULTY as i32, MAX_DIFFICULTY as i32) as u8)
    }

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    /// `11 - difficulty`, the multiplier most transforms scale their strength by.
    /// Ranges from 10 at the easiest setting down to 1 at the hardest.
    #[inline]
    pub fn inverse(self) -> u8 {
        MAX_DIFFICULTY + 1 - self.0
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self(MIN_DIFFICULTY)
    }
}

/// Number of differences to synthesise in one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DiffCount(u8);

impl DiffCount {
    pub fn new(value: i32) -> Self {
        Self(value.clamp(MIN_DIFF_COUNT as i32, MAX_DIFF_COUNT as i32) as u8)
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0 as usize
    }
}

impl Default for DiffCount {
    fn default() -> Self {
        Self(MIN_DIFF_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_is_clamped() {
        assert_eq!(Difficulty::new(-3).get(), 1);
        assert_eq!(Difficulty::new(0).get(), 1);
        assert_eq!(Difficulty::new(7).get(), 7);
        assert_eq!(Difficulty::new(42).get(), 10);
    }

    #[test]
    fn inverse_spans_ten_to_one() {
        assert_eq!(Difficulty::new(1).inverse(), 10);
        assert_eq!(Difficulty::new(10).inverse(), 1);
    }

    #[test]
    fn diff_count_is_clamped() {
        assert_eq!(DiffCount::new(1).get(), 5);
        assert_eq!(DiffCount::new(8).get(), 8);
        assert_eq!(DiffCount::new(100).get(), 10);
    }
}
