use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tool {
    TrackingPoint,
    GuideLines,
    LiveMeasurement,
    PathTracker,
    StraightnessChecker,
}

impl Tool {
    pub const ALL: [Tool; 5] = [
        Tool::TrackingPoint,
        Tool::GuideLines,
        Tool::LiveMeasurement,
        Tool::PathTracker,
        Tool::StraightnessChecker,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Tool::TrackingPoint => "tracking-point",
            Tool::GuideLines => "guide-lines",
            Tool::LiveMeasurement => "live-measurement",
            Tool::PathTracker => "path-tracker",
            Tool::StraightnessChecker => "straightness-checker",
        }
    }

    pub fn descriptor(&self) -> ToolDescriptor {
        let (name_key, description_key, accent, overlay) = match self {
            Tool::TrackingPoint => (
                "camera.tracking",
                "camera.tracking.description",
                "#ef4444",
                true,
            ),
            Tool::GuideLines => (
                "camera.guidelines",
                "camera.guidelines.description",
                "#3b82f6",
                true,
            ),
            Tool::LiveMeasurement => (
                "camera.measurement",
                "camera.measurement.description",
                "#22c55e",
                true,
            ),
            Tool::PathTracker => (
                "camera.tracker",
                "camera.tracker.description",
                "#a855f7",
                true,
            ),
            Tool::StraightnessChecker => (
                "camera.straightness",
                "camera.straightness.description",
                "#eab308",
                false,
            ),
        };
        ToolDescriptor {
            tool: *self,
            name_key,
            description_key,
            accent,
            overlay,
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTool(pub String);

impl fmt::Display for UnknownTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown overlay tool: {}", self.0)
    }
}

impl std::error::Error for UnknownTool {}

impl FromStr for Tool {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tool::ALL
            .into_iter()
            .find(|tool| tool.id() == s)
            .ok_or_else(|| UnknownTool(s.to_owned()))
    }
}

/// What the settings panel lists for a tool. Names are translation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub tool: Tool,
    pub name_key: &'static str,
    pub description_key: &'static str,
    pub accent: &'static str,
    pub overlay: bool,
}

pub fn descriptors() -> Vec<ToolDescriptor> {
    Tool::ALL.iter().map(Tool::descriptor).collect()
}

/// The enabled tools. Each one toggles independently of the others.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolSet {
    enabled: BTreeSet<Tool>,
}

impl ToolSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Tool::ALL.into_iter().collect()
    }

    /// Flips `tool` and returns whether it is enabled afterwards.
    pub fn toggle(&mut self, tool: Tool) -> bool {
        let enabled = if self.enabled.remove(&tool) {
            false
        } else {
            self.enabled.insert(tool)
        };
        log::debug!("overlay tool {} {}", tool, if enabled { "on" } else { "off" });
        enabled
    }

    pub fn enable(&mut self, tool: Tool) {
        self.enabled.insert(tool);
    }

    pub fn disable(&mut self, tool: Tool) {
        self.enabled.remove(&tool);
    }

    pub fn is_enabled(&self, tool: Tool) -> bool {
        self.enabled.contains(&tool)
    }

    pub fn iter(&self) -> impl Iterator<Item = Tool> + '_ {
        self.enabled.iter().copied()
    }
}

impl FromIterator<Tool> for ToolSet {
    fn from_iter<I: IntoIterator<Item = Tool>>(iter: I) -> Self {
        Self {
            enabled: iter.into_iter().collect(),
        }
    }
}
