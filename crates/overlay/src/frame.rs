use analysis::{LivePath, PixelScale};
use model::point::ScreenPoint;
use serde::Serialize;

use crate::guide::{GuideLines, GuideOverlay, PulseAnimation, PulseSample};
use crate::tool::{Tool, ToolSet};
use crate::trace::{DistanceBadge, DrawCommand, PathTracer, StraightnessBadge, Viewport};

/// Offset of the settings panel from the top left corner.
const PANEL_MARGIN: f64 = 16.0;
const PANEL_COLLAPSED_SIZE: f64 = 48.0;
const PANEL_EXPANDED_WIDTH: f64 = 320.0;
const PANEL_EXPANDED_HEIGHT: f64 = 520.0;

/// What a capture session hands to the renderer for one frame.
#[derive(Debug, Clone, Copy)]
pub struct OverlayInput<'a> {
    pub walking_path: &'a LivePath<ScreenPoint>,
    pub scale: PixelScale,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingMarker {
    pub x: f64,
    pub y: f64,
    pub pulse: PulseSample,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPanel {
    pub expanded: bool,
    pub bounds: Rect,
}

/// Everything the overlay shows for one frame. Elements of disabled tools
/// are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayFrame {
    pub tracking_marker: Option<TrackingMarker>,
    pub guide_lines: Option<GuideOverlay>,
    pub distance: Option<DistanceBadge>,
    pub path: Option<Vec<DrawCommand>>,
    pub straightness: Option<StraightnessBadge>,
    pub settings: SettingsPanel,
}

impl OverlayFrame {
    /// Whether a tap at `(x, y)` lands on the settings panel. Every other
    /// overlay element lets taps through to the capture surface.
    pub fn captures_pointer(&self, x: f64, y: f64) -> bool {
        self.settings.bounds.contains(x, y)
    }
}

/// Overlay configuration that lives as long as the camera view: enabled
/// tools, guide width, panel state and the path surface.
#[derive(Debug, Clone)]
pub struct OverlayRenderer {
    pub tools: ToolSet,
    pub guides: GuideLines,
    pub pulse: PulseAnimation,
    settings_expanded: bool,
    tracer: PathTracer,
}

impl OverlayRenderer {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            tools: ToolSet::new(),
            guides: GuideLines::default(),
            pulse: PulseAnimation::default(),
            settings_expanded: false,
            tracer: PathTracer::new(viewport),
        }
    }

    pub fn toggle_tool(&mut self, tool: Tool) -> bool {
        self.tools.toggle(tool)
    }

    pub fn toggle_settings(&mut self) -> bool {
        self.settings_expanded = !self.settings_expanded;
        self.settings_expanded
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.tracer.resize(viewport);
    }

    pub fn viewport(&self) -> Viewport {
        self.tracer.surface()
    }

    pub fn settings_panel(&self) -> SettingsPanel {
        let (width, height) = if self.settings_expanded {
            (PANEL_EXPANDED_WIDTH, PANEL_EXPANDED_HEIGHT)
        } else {
            (PANEL_COLLAPSED_SIZE, PANEL_COLLAPSED_SIZE)
        };
        SettingsPanel {
            expanded: self.settings_expanded,
            bounds: Rect {
                x: PANEL_MARGIN,
                y: PANEL_MARGIN,
                width,
                height,
            },
        }
    }

    pub fn render(&self, input: OverlayInput<'_>, elapsed_secs: f64) -> OverlayFrame {
        let viewport = self.viewport();
        let path = input.walking_path;

        let tracking_marker = self.tools.is_enabled(Tool::TrackingPoint).then(|| {
            let (x, y) = viewport.centre();
            TrackingMarker {
                x,
                y,
                pulse: self.pulse.sample(elapsed_secs),
            }
        });
        let guide_lines = self
            .tools
            .is_enabled(Tool::GuideLines)
            .then(|| self.guides.layout(viewport.width));
        let distance = (self.tools.is_enabled(Tool::LiveMeasurement) && path.len() >= 2)
            .then(|| DistanceBadge::new(input.scale.to_meters(path.cumulative())));
        let path_commands = self
            .tools
            .is_enabled(Tool::PathTracker)
            .then(|| self.tracer.draw(path.points()));
        let straightness = (self.tools.is_enabled(Tool::StraightnessChecker) && path.len() >= 3)
            .then(|| StraightnessBadge::new(path.straightness()));

        OverlayFrame {
            tracking_marker,
            guide_lines,
            distance,
            path: path_commands,
            straightness,
            settings: self.settings_panel(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::StraightnessTier;

    fn walked(coords: &[(f64, f64)]) -> LivePath<ScreenPoint> {
        let mut path = LivePath::new();
        for (i, &(x, y)) in coords.iter().enumerate() {
            path.push(ScreenPoint::new(x, y, i as i64));
        }
        path
    }

    fn input(path: &LivePath<ScreenPoint>) -> OverlayInput<'_> {
        OverlayInput {
            walking_path: path,
            scale: PixelScale::default(),
        }
    }

    #[test]
    fn disabled_tools_render_nothing() {
        let renderer = OverlayRenderer::new(Viewport::new(390.0, 844.0));
        let path = walked(&[(0.0, 0.0), (0.0, 500.0), (0.0, 1000.0)]);
        let frame = renderer.render(input(&path), 0.0);
        assert!(frame.tracking_marker.is_none());
        assert!(frame.guide_lines.is_none());
        assert!(frame.distance.is_none());
        assert!(frame.path.is_none());
        assert!(frame.straightness.is_none());
    }

    #[test]
    fn badges_wait_for_enough_points() {
        let mut renderer = OverlayRenderer::new(Viewport::new(390.0, 844.0));
        renderer.tools = ToolSet::all();

        let one = walked(&[(10.0, 10.0)]);
        let frame = renderer.render(input(&one), 0.0);
        assert!(frame.distance.is_none());
        assert!(frame.straightness.is_none());
        assert_eq!(frame.path.as_ref().map(Vec::len), Some(1));

        let two = walked(&[(0.0, 0.0), (300.0, 400.0)]);
        let frame = renderer.render(input(&two), 0.0);
        assert_eq!(frame.distance.unwrap().text, "0.50m");
        assert!(frame.straightness.is_none());

        let three = walked(&[(0.0, 0.0), (0.0, 500.0), (0.0, 1000.0)]);
        let frame = renderer.render(input(&three), 0.0);
        let badge = frame.straightness.unwrap();
        assert_eq!(badge.text, "100.0%");
        assert_eq!(badge.tier, StraightnessTier::Good);
        assert_eq!(frame.distance.unwrap().text, "1.00m");
    }

    #[test]
    fn marker_sits_in_the_centre() {
        let mut renderer = OverlayRenderer::new(Viewport::new(400.0, 800.0));
        renderer.toggle_tool(Tool::TrackingPoint);
        let path = walked(&[]);
        let marker = renderer.render(input(&path), 0.0).tracking_marker.unwrap();
        assert_eq!((marker.x, marker.y), (200.0, 400.0));
        assert_eq!(marker.pulse.scale, 1.0);
    }

    #[test]
    fn only_the_settings_panel_swallows_taps() {
        let mut renderer = OverlayRenderer::new(Viewport::new(390.0, 844.0));
        renderer.tools = ToolSet::all();
        let path = walked(&[(0.0, 0.0), (50.0, 50.0), (100.0, 0.0)]);

        let frame = renderer.render(input(&path), 0.0);
        assert!(frame.captures_pointer(20.0, 20.0));
        assert!(!frame.captures_pointer(195.0, 422.0));
        assert!(!frame.captures_pointer(200.0, 30.0));

        renderer.toggle_settings();
        let frame = renderer.render(input(&path), 0.0);
        assert!(frame.settings.expanded);
        assert!(frame.captures_pointer(200.0, 30.0));
        assert!(!frame.captures_pointer(360.0, 422.0));
    }
}
