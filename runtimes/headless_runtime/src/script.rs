use std::path::Path;

use anyhow::Context;
use cgmath::{vec3, Quaternion};
use serde::Deserialize;
use xr_interaction::{ControllerId, GestureEvent, RigidTransform};

/// One line of a replay script.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Tracked controller pose in physical space.
    Pose(PoseStep),
    Event(GestureEvent),
    /// Run this many frames.
    Tick(u32),
    SessionStart,
    SessionEnd,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PoseStep {
    pub controller: ControllerId,
    pub position: [f32; 3],
    /// `[w, x, y, z]`
    #[serde(default = "identity_orientation")]
    pub orientation: [f32; 4],
}

fn identity_orientation() -> [f32; 4] {
    [1.0, 0.0, 0.0, 0.0]
}

impl PoseStep {
    pub fn rigid_transform(&self) -> RigidTransform {
        let [x, y, z] = self.position;
        let [w, qx, qy, qz] = self.orientation;
        RigidTransform::new(vec3(x, y, z), Quaternion::new(w, qx, qy, qz))
    }
}

pub fn parse(content: &str) -> anyhow::Result<Vec<Step>> {
    Ok(serde_json::from_str(content)?)
}

pub fn load(path: &Path) -> anyhow::Result<Vec<Step>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading script {}", path.display()))?;
    parse(&content).with_context(|| format!("parsing script {}", path.display()))
}
