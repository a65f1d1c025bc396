//! Canonical character classes. A [ClassSet] is a sorted list of disjoint, non-adjacent
//! inclusive ranges of `char`, so two classes denote the same set of characters if and only
//! if they are structurally equal. All constructors normalize their input; the set operations
//! preserve the canonical form.

use std::cmp::{max, min, Ordering};
use std::fmt;

/// An inclusive range of characters, `start..=end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassRange {
    start: char,
    end: char,
}

impl ClassRange {
    /// Gets the first character of this range
    pub fn start(&self) -> char {
        self.start
    }

    /// Gets the last character of this range
    pub fn end(&self) -> char {
        self.end
    }
}

/// A set of characters in canonical form: a sorted list of disjoint inclusive ranges where
/// no two ranges are adjacent. The full alphabet is all of `char`, that is, every Unicode
/// scalar value.
///
/// ```
/// use pyre::regex::class::ClassSet;
///
/// let lower = ClassSet::range('a', 'z');
/// let upper = ClassSet::range('A', 'Z');
/// let letters = lower.union(&upper);
/// assert!(letters.contains('q'));
/// assert!(!letters.contains('0'));
/// assert_eq!(letters.complement().complement(), letters);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassSet {
    ranges: Vec<ClassRange>,
}

/// The character following `c`, skipping the surrogate gap
fn char_succ(c: char) -> Option<char> {
    let mut next = c as u32 + 1;
    if next == 0xD800 {
        next = 0xE000;
    }
    char::from_u32(next)
}

/// The character preceding `c`, skipping the surrogate gap
fn char_pred(c: char) -> Option<char> {
    let mut prev = (c as u32).checked_sub(1)?;
    if prev == 0xDFFF {
        prev = 0xD7FF;
    }
    char::from_u32(prev)
}

impl ClassSet {
    /// The empty set of characters
    pub fn empty() -> Self {
        Self { ranges: Vec::new() }
    }

    /// The full alphabet: every `char`
    pub fn full() -> Self {
        Self::range('\0', char::MAX)
    }

    /// The set containing exactly `c`
    pub fn single(c: char) -> Self {
        Self::range(c, c)
    }

    /// The set `low..=high`. An inverted range is empty.
    pub fn range(low: char, high: char) -> Self {
        if low > high {
            Self::empty()
        } else {
            Self {
                ranges: vec![ClassRange {
                    start: low,
                    end: high,
                }],
            }
        }
    }

    /// Builds a set from arbitrary inclusive ranges, merging overlapping and adjacent ones.
    /// Inverted ranges are ignored.
    pub fn from_ranges(ranges: impl IntoIterator<Item = (char, char)>) -> Self {
        let mut ranges: Vec<ClassRange> = ranges
            .into_iter()
            .filter(|(low, high)| low <= high)
            .map(|(low, high)| ClassRange {
                start: low,
                end: high,
            })
            .collect();
        ranges.sort();
        let mut merged: Vec<ClassRange> = Vec::with_capacity(ranges.len());
        for range in ranges {
            match merged.last_mut() {
                Some(last) if char_succ(last.end).map_or(true, |next| range.start <= next) => {
                    last.end = max(last.end, range.end);
                }
                _ => merged.push(range),
            }
        }
        Self { ranges: merged }
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.ranges == [ClassRange {
            start: '\0',
            end: char::MAX,
        }]
    }

    /// Gets the ranges of this set, sorted and disjoint
    pub fn ranges(&self) -> &[ClassRange] {
        self.ranges.as_slice()
    }

    /// The smallest character of the set, if any. Any member is a valid representative of
    /// the set for derivative purposes; this one is cheap to get at.
    pub fn first(&self) -> Option<char> {
        self.ranges.first().map(|range| range.start)
    }

    /// Checks if `c` is a member of this set
    pub fn contains(&self, c: char) -> bool {
        self.ranges
            .binary_search_by(|range| {
                if range.end < c {
                    Ordering::Less
                } else if range.start > c {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                }
            })
            .is_ok()
    }

    /// The union of two sets
    pub fn union(&self, other: &Self) -> Self {
        Self::from_ranges(
            self.ranges
                .iter()
                .chain(&other.ranges)
                .map(|range| (range.start, range.end)),
        )
    }

    /// The intersection of two sets. Intersecting two canonical sets cannot create
    /// adjacent ranges, so the result needs no re-normalization.
    pub fn intersect(&self, other: &Self) -> Self {
        let mut ranges = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < self.ranges.len() && j < other.ranges.len() {
            let a = self.ranges[i];
            let b = other.ranges[j];
            let start = max(a.start, b.start);
            let end = min(a.end, b.end);
            if start <= end {
                ranges.push(ClassRange { start, end });
            }
            if a.end <= b.end {
                i += 1;
            } else {
                j += 1;
            }
        }
        Self { ranges }
    }

    /// The complement of this set against the full alphabet
    pub fn complement(&self) -> Self {
        let mut ranges = Vec::with_capacity(self.ranges.len() + 1);
        let mut next_start = Some('\0');
        for range in &self.ranges {
            if let Some(start) = next_start {
                if start < range.start {
                    let end = char_pred(range.start)
                        .expect("a character above the minimum has a predecessor");
                    ranges.push(ClassRange { start, end });
                }
            }
            next_start = char_succ(range.end);
        }
        if let Some(start) = next_start {
            ranges.push(ClassRange {
                start,
                end: char::MAX,
            });
        }
        Self { ranges }
    }

    /// The characters in this set but not in `other`
    pub fn difference(&self, other: &Self) -> Self {
        self.intersect(&other.complement())
    }
}

fn fmt_char(f: &mut fmt::Formatter<'_>, c: char) -> fmt::Result {
    match c {
        '\n' => f.write_str("\\n"),
        '\t' => f.write_str("\\t"),
        '\r' => f.write_str("\\r"),
        c if c.is_ascii_graphic() || (!c.is_ascii() && !c.is_control()) => {
            write!(f, "{c}")
        }
        c => write!(f, "\\u{{{:x}}}", c as u32),
    }
}

impl fmt::Display for ClassSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_full() {
            return f.write_str("Σ");
        }
        if let [range] = self.ranges.as_slice() {
            if range.start == range.end {
                return fmt_char(f, range.start);
            }
        }
        f.write_str("[")?;
        for range in &self.ranges {
            fmt_char(f, range.start)?;
            if range.start != range.end {
                f.write_str("-")?;
                fmt_char(f, range.end)?;
            }
        }
        f.write_str("]")
    }
}
