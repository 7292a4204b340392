use itertools::Itertools;

/// Anything a path can be built from. Implementations decide the unit:
/// geographic points measure in meters, screen points in pixels.
pub trait Metric {
    fn distance_to(&self, other: &Self) -> f64;
}

/// Sum of the distances between consecutive points. Zero for fewer than two
/// points.
pub fn cumulative_distance<P, F>(points: &[P], distance: F) -> f64
where
    F: Fn(&P, &P) -> f64,
{
    points
        .iter()
        .tuple_windows()
        .map(|(previous, current)| distance(previous, current))
        .sum()
}

/// Straight line distance between the first and the last point.
///
/// Returns `None` when there are fewer than two points: a path that does not
/// exist has no chord. Callers that need a percentage go through
/// [`straightness_ratio`], which maps that case to 100.
pub fn chord_distance<P, F>(points: &[P], distance: F) -> Option<f64>
where
    F: Fn(&P, &P) -> f64,
{
    match points {
        [first, .., last] => Some(distance(first, last)),
        _ => None,
    }
}

/// Chord over cumulative distance in percent, clamped to `[0, 100]`.
///
/// Fewer than three points, or a path that never moved, count as trivially
/// straight and yield 100.
pub fn straightness_ratio<P, F>(points: &[P], distance: F) -> f64
where
    F: Fn(&P, &P) -> f64,
{
    if points.len() < 3 {
        return 100.0;
    }
    let travelled = cumulative_distance(points, &distance);
    if travelled == 0.0 {
        return 100.0;
    }
    let chord = chord_distance(points, &distance).unwrap_or(travelled);
    (chord / travelled * 100.0).clamp(0.0, 100.0)
}

/// Append-only point sequence that keeps its travelled distance up to date
/// in constant time per appended point.
#[derive(Debug, Clone)]
pub struct LivePath<P> {
    points: Vec<P>,
    cumulative: f64,
}

impl<P> Default for LivePath<P> {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            cumulative: 0.0,
        }
    }
}

impl<P: Metric> LivePath<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `point` and returns the distance it added.
    pub fn push(&mut self, point: P) -> f64 {
        let step = self
            .points
            .last()
            .map(|last| last.distance_to(&point))
            .unwrap_or(0.0);
        self.cumulative += step;
        self.points.push(point);
        step
    }

    pub fn points(&self) -> &[P] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&P> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&P> {
        self.points.last()
    }

    pub fn cumulative(&self) -> f64 {
        self.cumulative
    }

    pub fn chord(&self) -> Option<f64> {
        chord_distance(&self.points, P::distance_to)
    }

    pub fn straightness(&self) -> f64 {
        straightness_ratio(&self.points, P::distance_to)
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.cumulative = 0.0;
    }

    /// Hands the points over, leaving an empty path behind.
    pub fn take(&mut self) -> Vec<P> {
        self.cumulative = 0.0;
        std::mem::take(&mut self.points)
    }
}
