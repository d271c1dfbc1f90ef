use serde::{Deserialize, Serialize};

/// Inclusive range of calendar years (AD).
///
/// Records carry `start <= end`; a reversed range never overlaps anything.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub const fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub const fn year(year: i32) -> Self {
        Self {
            start: year,
            end: year,
        }
    }

    /// Window of `width` years beginning at `start` (`start..=start + width`).
    pub const fn starting_at(start: i32, width: i32) -> Self {
        Self {
            start,
            end: start.saturating_add(width),
        }
    }

    /// Inclusive overlap: `self.start <= other.end && self.end >= other.start`.
    pub fn overlaps(&self, other: &YearRange) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }

    pub fn is_instant(&self) -> bool {
        self.start == self.end
    }

    /// `"46 AD"` for a single year, `"46-48 AD"` otherwise.
    pub fn label(&self) -> String {
        if self.is_instant() {
            format!("{} AD", self.start)
        } else {
            format!("{}-{} AD", self.start, self.end)
        }
    }
}
