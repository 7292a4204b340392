use model::point::ScreenPoint;
use serde::Serialize;

pub const PATH_STROKE: &str = "#3b82f6";
pub const PATH_WIDTH: f64 = 3.0;
pub const START_FILL: &str = "#22c55e";
pub const CURRENT_FILL: &str = "#ef4444";
pub const MARKER_RADIUS: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn centre(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LineCap {
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LineJoin {
    Round,
}

/// One instruction for a 2D canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawCommand {
    #[serde(rename_all = "camelCase")]
    Clear { width: f64, height: f64 },
    #[serde(rename_all = "camelCase")]
    Polyline {
        points: Vec<(f64, f64)>,
        stroke: &'static str,
        line_width: f64,
        cap: LineCap,
        join: LineJoin,
    },
    #[serde(rename_all = "camelCase")]
    Circle {
        x: f64,
        y: f64,
        radius: f64,
        fill: &'static str,
    },
}

/// Full-view drawing surface for the walked path. Every frame starts from a
/// cleared surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathTracer {
    surface: Viewport,
}

impl PathTracer {
    pub fn new(viewport: Viewport) -> Self {
        Self { surface: viewport }
    }

    pub fn surface(&self) -> Viewport {
        self.surface
    }

    pub fn resize(&mut self, viewport: Viewport) {
        if self.surface != viewport {
            log::debug!(
                "path surface resized to {}x{}",
                viewport.width,
                viewport.height
            );
            self.surface = viewport;
        }
    }

    pub fn draw(&self, points: &[ScreenPoint]) -> Vec<DrawCommand> {
        let mut commands = vec![DrawCommand::Clear {
            width: self.surface.width,
            height: self.surface.height,
        }];
        let [first, .., last] = points else {
            return commands;
        };
        commands.push(DrawCommand::Polyline {
            points: points.iter().map(|point| (point.x, point.y)).collect(),
            stroke: PATH_STROKE,
            line_width: PATH_WIDTH,
            cap: LineCap::Round,
            join: LineJoin::Round,
        });
        commands.push(DrawCommand::Circle {
            x: first.x,
            y: first.y,
            radius: MARKER_RADIUS,
            fill: START_FILL,
        });
        commands.push(DrawCommand::Circle {
            x: last.x,
            y: last.y,
            radius: MARKER_RADIUS,
            fill: CURRENT_FILL,
        });
        commands
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StraightnessTier {
    Good,
    Medium,
    Poor,
}

impl StraightnessTier {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio > 90.0 {
            StraightnessTier::Good
        } else if ratio > 70.0 {
            StraightnessTier::Medium
        } else {
            StraightnessTier::Poor
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StraightnessBadge {
    pub ratio: f64,
    pub text: String,
    pub tier: StraightnessTier,
}

impl StraightnessBadge {
    pub fn new(ratio: f64) -> Self {
        Self {
            ratio,
            text: format!("{:.1}%", ratio),
            tier: StraightnessTier::from_ratio(ratio),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceBadge {
    pub meters: f64,
    pub text: String,
}

impl DistanceBadge {
    pub fn new(meters: f64) -> Self {
        Self {
            meters,
            text: format!("{:.2}m", meters),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taps(coords: &[(f64, f64)]) -> Vec<ScreenPoint> {
        coords
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| ScreenPoint::new(x, y, i as i64))
            .collect()
    }

    #[test]
    fn single_point_only_clears() {
        let tracer = PathTracer::new(Viewport::new(390.0, 844.0));
        let commands = tracer.draw(&taps(&[(10.0, 10.0)]));
        assert_eq!(
            commands,
            vec![DrawCommand::Clear {
                width: 390.0,
                height: 844.0
            }]
        );
    }

    #[test]
    fn frame_has_path_and_both_markers() {
        let tracer = PathTracer::new(Viewport::new(100.0, 100.0));
        let commands = tracer.draw(&taps(&[(1.0, 2.0), (3.0, 4.0), (5.0, 6.0)]));
        assert_eq!(commands.len(), 4);
        match &commands[1] {
            DrawCommand::Polyline {
                points,
                stroke,
                line_width,
                ..
            } => {
                assert_eq!(points.len(), 3);
                assert_eq!(*stroke, "#3b82f6");
                assert_eq!(*line_width, 3.0);
            }
            other => panic!("expected polyline, got {:?}", other),
        }
        assert_eq!(
            commands[2],
            DrawCommand::Circle {
                x: 1.0,
                y: 2.0,
                radius: 6.0,
                fill: "#22c55e"
            }
        );
        assert_eq!(
            commands[3],
            DrawCommand::Circle {
                x: 5.0,
                y: 6.0,
                radius: 6.0,
                fill: "#ef4444"
            }
        );
    }

    #[test]
    fn clear_follows_resize() {
        let mut tracer = PathTracer::new(Viewport::new(100.0, 100.0));
        tracer.resize(Viewport::new(844.0, 390.0));
        assert_eq!(
            tracer.draw(&[])[0],
            DrawCommand::Clear {
                width: 844.0,
                height: 390.0
            }
        );
    }

    #[test]
    fn tiers_split_at_ninety_and_seventy() {
        assert_eq!(StraightnessTier::from_ratio(90.1), StraightnessTier::Good);
        assert_eq!(StraightnessTier::from_ratio(90.0), StraightnessTier::Medium);
        assert_eq!(StraightnessTier::from_ratio(70.1), StraightnessTier::Medium);
        assert_eq!(StraightnessTier::from_ratio(70.0), StraightnessTier::Poor);
        assert_eq!(StraightnessBadge::new(87.654).text, "87.7%");
    }

    #[test]
    fn commands_serialize_with_an_op_tag() {
        let json = serde_json::to_value(DrawCommand::Clear {
            width: 1.0,
            height: 2.0,
        })
        .unwrap();
        assert_eq!(json["op"], "clear");
        assert_eq!(DistanceBadge::new(1.234).text, "1.23m");
    }
}
