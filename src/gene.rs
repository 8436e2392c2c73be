//! Coding-sequence gene records produced by the feature-table parser.

use serde::Serialize;
use std::fmt;

pub const UNKNOWN: &str = "unknown";

/// A 1-based, inclusive `(start, end)` coordinate pair.
pub type BaseRange = (usize, usize);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Strand {
    #[default]
    #[serde(rename = "+")]
    Forward,
    #[serde(rename = "-")]
    Reverse,
}

impl Strand {
    pub fn sign(self) -> char {
        match self {
            Self::Forward => '+',
            Self::Reverse => '-',
        }
    }

    pub fn is_reverse(self) -> bool {
        self == Self::Reverse
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.sign())
    }
}

/// One coding sequence. Always carries at least one range; instances are
/// never modified after construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Gene {
    name: String,
    function: String,
    ranges: Vec<BaseRange>,
    strand: Strand,
}

impl Gene {
    /// Returns `None` when `ranges` is empty.
    pub fn new(
        name: impl Into<String>,
        function: impl Into<String>,
        ranges: Vec<BaseRange>,
        strand: Strand,
    ) -> Option<Self> {
        if ranges.is_empty() {
            return None;
        }
        Some(Self {
            name: name.into(),
            function: function.into(),
            ranges,
            strand,
        })
    }

    /// Single forward-strand range.
    pub fn single(
        name: impl Into<String>,
        function: impl Into<String>,
        start: usize,
        end: usize,
    ) -> Self {
        Self {
            name: name.into(),
            function: function.into(),
            ranges: vec![(start, end)],
            strand: Strand::Forward,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    pub fn ranges(&self) -> &[BaseRange] {
        &self.ranges
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    pub fn start(&self) -> usize {
        self.ranges[0].0
    }

    pub fn end(&self) -> usize {
        self.ranges[self.ranges.len() - 1].1
    }

    /// Total number of bases covered by all ranges, saturating at `usize::MAX`.
    pub fn length(&self) -> usize {
        self.ranges.iter().fold(0usize, |total, (start, end)| {
            total.saturating_add(end.saturating_sub(*start).saturating_add(1))
        })
    }

    pub fn is_spliced(&self) -> bool {
        self.ranges.len() > 1
    }
}
