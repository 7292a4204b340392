use serde::Serialize;
use utility::format::interpolate;

/// Two dashed vertical guides around the horizontal centre of the view.
///
/// The width is a screen-space spacing. Its `cm` label is text only and
/// carries no calibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuideLines {
    width: u32,
}

impl GuideLines {
    pub const DEFAULT_WIDTH: u32 = 15;
    pub const MIN_WIDTH: u32 = 5;
    pub const MAX_WIDTH: u32 = 50;

    pub fn new(width: u32) -> Self {
        Self {
            width: width.clamp(Self::MIN_WIDTH, Self::MAX_WIDTH),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn set_width(&mut self, width: u32) {
        *self = Self::new(width);
    }

    pub fn label(&self) -> String {
        format!("{}cm", self.width)
    }

    pub fn layout(&self, viewport_width: f64) -> GuideOverlay {
        let centre = viewport_width / 2.0;
        let half = f64::from(self.width) / 2.0;
        GuideOverlay {
            left_x: centre - half,
            right_x: centre + half,
            label: self.label(),
        }
    }
}

impl Default for GuideLines {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WIDTH)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideOverlay {
    pub left_x: f64,
    pub right_x: f64,
    pub label: String,
}

/// Keyframed pulse of the tracking marker: scale 1, 1.2, 1 and opacity
/// 0.8, 1, 0.8 over two seconds, eased in and out, repeating forever.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseAnimation {
    pub scale: [f64; 3],
    pub opacity: [f64; 3],
    pub period_secs: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PulseSample {
    pub scale: f64,
    pub opacity: f64,
}

impl Default for PulseAnimation {
    fn default() -> Self {
        Self {
            scale: [1.0, 1.2, 1.0],
            opacity: [0.8, 1.0, 0.8],
            period_secs: 2.0,
        }
    }
}

impl PulseAnimation {
    pub fn sample(&self, elapsed_secs: f64) -> PulseSample {
        let phase = (elapsed_secs.max(0.0) % self.period_secs) / self.period_secs;
        let (segment, progress) = if phase < 0.5 {
            (0, phase * 2.0)
        } else {
            (1, (phase - 0.5) * 2.0)
        };
        let eased = ease_in_out(progress);
        PulseSample {
            scale: interpolate(self.scale[segment], self.scale[segment + 1], eased),
            opacity: interpolate(self.opacity[segment], self.opacity[segment + 1], eased),
        }
    }
}

fn ease_in_out(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_defaults_and_clamps() {
        assert_eq!(GuideLines::default().width(), 15);
        assert_eq!(GuideLines::new(2).width(), 5);
        assert_eq!(GuideLines::new(80).width(), 50);
        let mut guides = GuideLines::default();
        guides.set_width(30);
        assert_eq!(guides.label(), "30cm");
    }

    #[test]
    fn guides_are_symmetric_about_the_centre() {
        let layout = GuideLines::new(20).layout(400.0);
        assert_eq!(layout.left_x, 190.0);
        assert_eq!(layout.right_x, 210.0);
        assert_eq!(layout.label, "20cm");
    }

    #[test]
    fn pulse_peaks_halfway_and_repeats() {
        let pulse = PulseAnimation::default();
        let start = pulse.sample(0.0);
        assert_eq!(start.scale, 1.0);
        assert_eq!(start.opacity, 0.8);

        let peak = pulse.sample(1.0);
        assert!((peak.scale - 1.2).abs() < 1e-9);
        assert!((peak.opacity - 1.0).abs() < 1e-9);

        let again = pulse.sample(5.0);
        assert!((again.scale - peak.scale).abs() < 1e-9);

        let rising = pulse.sample(0.5);
        assert!(rising.scale > 1.0 && rising.scale < 1.2);
    }
}
