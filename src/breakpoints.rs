use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BreakpointError {
    #[error("No breakpoints given")]
    Empty,

    #[error("Invalid breakpoint: {0:?}")]
    InvalidToken(String),

    #[error("Breakpoints are 1-based page numbers, 0 is not allowed")]
    Zero,

    #[error("Breakpoint {index} exceeds total pages {page_count}")]
    OutOfRange { index: u32, page_count: u32 },

    #[error("Breakpoints must be strictly increasing ({previous} followed by {next})")]
    NotIncreasing { previous: u32, next: u32 },

    #[error("No sections found in the document outline")]
    NoSections,

    #[error("Cannot number {count} files starting at {start}")]
    NumberingOverflow { start: u32, count: usize },
}

/// Half-open range of 1-based pages `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, page: u32) -> bool {
        self.start <= page && page < self.end
    }

    /// Last page in the span, inclusive
    pub fn last(&self) -> u32 {
        self.end - 1
    }
}

/// A validated breakpoint list with the closing sentinel already appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breakpoints {
    points: Vec<u32>,
    page_count: u32,
}

impl Breakpoints {
    /// Check `points` against the page count and close them with the
    /// sentinel `page_count + 1`.
    ///
    /// Every value must lie in `[1, page_count]` and the sequence must be
    /// strictly increasing, so no span can come out empty.
    pub fn validate(points: &[u32], page_count: u32) -> Result<Self, BreakpointError> {
        if points.is_empty() {
            return Err(BreakpointError::Empty);
        }

        let mut previous: Option<u32> = None;
        for &index in points {
            if index == 0 {
                return Err(BreakpointError::Zero);
            }
            if index > page_count {
                return Err(BreakpointError::OutOfRange { index, page_count });
            }
            if let Some(previous) = previous {
                if index <= previous {
                    return Err(BreakpointError::NotIncreasing {
                        previous,
                        next: index,
                    });
                }
            }
            previous = Some(index);
        }

        let mut points = points.to_vec();
        points.push(page_count + 1);

        Ok(Breakpoints { points, page_count })
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Pages before the first breakpoint, which no output file contains
    pub fn leading_pages(&self) -> Option<Span> {
        let first = self.points[0];
        (first > 1).then_some(Span {
            start: 1,
            end: first,
        })
    }

    /// Breakpoints including the sentinel
    pub fn as_slice(&self) -> &[u32] {
        &self.points
    }

    pub fn spans(&self) -> Vec<Span> {
        spans(&self.points)
    }
}

/// Pair up adjacent breakpoints into spans. `points` is expected to already
/// contain the closing sentinel.
pub fn spans(points: &[u32]) -> Vec<Span> {
    points
        .windows(2)
        .map(|pair| Span {
            start: pair[0],
            end: pair[1],
        })
        .collect()
}

/// Number of the `i`-th output file (0-based) when numbering starts at
/// `start`.
pub fn file_number(start: u32, i: usize, count: usize) -> Result<u32, BreakpointError> {
    u32::try_from(i)
        .ok()
        .and_then(|i| start.checked_add(i))
        .ok_or(BreakpointError::NumberingOverflow { start, count })
}

/// Parse a comma-separated breakpoint list like "1,5,7,10"
pub fn parse_indices(s: &str) -> Result<Vec<u32>, BreakpointError> {
    if s.trim().is_empty() {
        return Err(BreakpointError::Empty);
    }

    s.split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<u32>()
                .map_err(|_| BreakpointError::InvalidToken(part.to_string()))
        })
        .collect()
}
