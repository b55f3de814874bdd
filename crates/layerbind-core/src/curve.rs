//! Piecewise-linear curves
//!
//! A curve maps an input (load, elapsed time, attempt number...) to an output
//! value by linear interpolation between control points, clamping outside the
//! first and last point. Curves are configured from strings:
//!
//! - `"0.5"`: a constant curve
//! - `"0:1; 10:2.5; 60:8"`: control points `x:y`, `x` strictly increasing
//!
//! A curve field that has no override receives [`Curve::unconfigured`], which
//! evaluates to nothing and lets callers fall back to their own behavior.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Errors produced when parsing a curve literal.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CurveError {
    #[error("curve literal is empty")]
    Empty,

    #[error("invalid control point '{0}', expected x:y")]
    InvalidPoint(String),

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("control points must have strictly increasing x ({previous} then {next})")]
    NotIncreasing { previous: f64, next: f64 },
}

/// One control point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
}

/// A piecewise-linear curve. No points means "not configured".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Curve {
    points: Vec<CurvePoint>,
}

impl Curve {
    /// The curve applied to curve fields that have no override.
    pub const fn unconfigured() -> Self {
        Self { points: Vec::new() }
    }

    /// A curve with the same output everywhere.
    pub fn constant(y: f64) -> Self {
        Self {
            points: vec![CurvePoint { x: 0.0, y }],
        }
    }

    /// Build a curve from control points ordered by strictly increasing `x`.
    pub fn from_points(points: Vec<CurvePoint>) -> Result<Self, CurveError> {
        if points.is_empty() {
            return Err(CurveError::Empty);
        }
        for pair in points.windows(2) {
            if pair[1].x <= pair[0].x {
                return Err(CurveError::NotIncreasing {
                    previous: pair[0].x,
                    next: pair[1].x,
                });
            }
        }
        Ok(Self { points })
    }

    pub fn is_configured(&self) -> bool {
        !self.points.is_empty()
    }

    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    /// Evaluate at `x`. Returns `None` for an unconfigured curve.
    pub fn evaluate(&self, x: f64) -> Option<f64> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        if x <= first.x {
            return Some(first.y);
        }
        if x >= last.x {
            return Some(last.y);
        }
        let upper = self.points.iter().position(|p| p.x >= x)?;
        let (a, b) = (self.points[upper - 1], self.points[upper]);
        let t = (x - a.x) / (b.x - a.x);
        Some(a.y + t * (b.y - a.y))
    }

    /// Evaluate at `x`, or return `fallback` when unconfigured.
    pub fn evaluate_or(&self, x: f64, fallback: f64) -> f64 {
        self.evaluate(x).unwrap_or(fallback)
    }
}

fn parse_number(text: &str) -> Result<f64, CurveError> {
    let trimmed = text.trim();
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| CurveError::InvalidNumber(trimmed.to_string()))
}

impl FromStr for Curve {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CurveError::Empty);
        }
        if !trimmed.contains(':') {
            return parse_number(trimmed).map(Self::constant);
        }

        let points = trimmed
            .split(';')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                let (x, y) = segment
                    .split_once(':')
                    .ok_or_else(|| CurveError::InvalidPoint(segment.to_string()))?;
                Ok(CurvePoint {
                    x: parse_number(x)?,
                    y: parse_number(y)?,
                })
            })
            .collect::<Result<Vec<_>, CurveError>>()?;

        Self::from_points(points)
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.points.is_empty() {
            return f.write_str("unconfigured");
        }
        let parts: Vec<String> = self.points.iter().map(|p| format!("{}:{}", p.x, p.y)).collect();
        f.write_str(&parts.join("; "))
    }
}

impl Serialize for Curve {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
