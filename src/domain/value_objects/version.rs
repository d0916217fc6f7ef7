//! Version Value Object
//!
//! Maven-flavoured version ordering, used by the `newest` conflict policy.
//! Segments are split on `.` and `-`; numeric segments compare numerically,
//! qualifiers compare by well-known rank and then alphabetically, and a
//! release sorts after any of its pre-release qualifiers.

use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Number(u64),
    Qualifier(String),
}

/// A comparable version string
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    segments: Vec<Segment>,
}

impl Version {
    pub fn parse(raw: &str) -> Self {
        let segments = raw
            .split(['.', '-'])
            .filter(|s| !s.is_empty())
            .flat_map(split_digit_boundaries)
            .map(|s| match s.parse::<u64>() {
                Ok(n) => Segment::Number(n),
                Err(_) => Segment::Qualifier(s.to_ascii_lowercase()),
            })
            .collect::<Vec<_>>();
        Self {
            raw: raw.to_string(),
            segments: trim_trailing_zeros(segments),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Ranges (`[1.0,2.0)`) and dynamic versions cannot be pinned
    pub fn is_range(raw: &str) -> bool {
        raw.starts_with('[')
            || raw.starts_with('(')
            || raw.contains(',')
            || raw.ends_with('+')
            || raw.eq_ignore_ascii_case("latest.release")
            || raw.eq_ignore_ascii_case("latest.integration")
    }
}

/// `rc1` -> `rc`, `1`
fn split_digit_boundaries(segment: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let bytes = segment.as_bytes();
    for i in 1..bytes.len() {
        if bytes[i].is_ascii_digit() != bytes[i - 1].is_ascii_digit() {
            parts.push(&segment[start..i]);
            start = i;
        }
    }
    parts.push(&segment[start..]);
    parts
}

fn trim_trailing_zeros(mut segments: Vec<Segment>) -> Vec<Segment> {
    while matches!(segments.last(), Some(Segment::Number(0))) && segments.len() > 1 {
        segments.pop();
    }
    segments
}

fn qualifier_rank(q: &str) -> i32 {
    match q {
        "alpha" | "a" => 1,
        "beta" | "b" => 2,
        "milestone" | "m" => 3,
        "rc" | "cr" => 4,
        "snapshot" => 5,
        "ga" | "final" | "release" => 6,
        "sp" => 7,
        _ => 0,
    }
}

fn compare_segment(a: Option<&Segment>, b: Option<&Segment>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (Some(Segment::Number(x)), Some(Segment::Number(y))) => x.cmp(y),
        (Some(Segment::Number(_)), Some(Segment::Qualifier(_))) => Ordering::Greater,
        (Some(Segment::Qualifier(_)), Some(Segment::Number(_))) => Ordering::Less,
        (Some(Segment::Qualifier(x)), Some(Segment::Qualifier(y))) => qualifier_rank(x)
            .cmp(&qualifier_rank(y))
            .then_with(|| x.cmp(y)),
        // 1.0 > 1.0-rc1, 1.0-sp1 > 1.0, 1.0.1 > 1.0
        (Some(Segment::Number(n)), None) => {
            if *n == 0 {
                Ordering::Equal
            } else {
                Ordering::Greater
            }
        }
        (None, Some(Segment::Number(n))) => {
            if *n == 0 {
                Ordering::Equal
            } else {
                Ordering::Less
            }
        }
        (Some(Segment::Qualifier(q)), None) => {
            if qualifier_rank(q) >= qualifier_rank("sp") {
                Ordering::Greater
            } else {
                Ordering::Less
            }
        }
        (None, Some(Segment::Qualifier(q))) => {
            if qualifier_rank(q) >= qualifier_rank("sp") {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        }
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        for i in 0..len {
            let ord = compare_segment(self.segments.get(i), other.segments.get(i));
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
