/// Vibration feedback for the events of a capture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticPattern {
    ToolToggle,
    Tap,
    Start,
    GpsFix,
    Stop,
    Success,
    CameraFailure,
    WatchError,
    StartFailure,
}

impl HapticPattern {
    /// Alternating vibrate and pause durations in milliseconds.
    pub fn durations(&self) -> &'static [u32] {
        match self {
            HapticPattern::ToolToggle => &[50],
            HapticPattern::Tap => &[30],
            HapticPattern::Start => &[50],
            HapticPattern::GpsFix => &[100],
            HapticPattern::Stop => &[200],
            HapticPattern::Success => &[50, 50, 50],
            HapticPattern::CameraFailure | HapticPattern::WatchError => &[100, 50, 100],
            HapticPattern::StartFailure => &[100, 50, 100, 50, 100],
        }
    }
}

/// Fire and forget. Devices without a vibration motor ignore the call.
pub trait Haptics: Send + Sync {
    fn vibrate(&self, durations: &[u32]);

    fn play(&self, pattern: HapticPattern) {
        self.vibrate(pattern.durations());
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoHaptics;

impl Haptics for NoHaptics {
    fn vibrate(&self, _durations: &[u32]) {}
}
