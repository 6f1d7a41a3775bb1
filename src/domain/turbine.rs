// Turbine domain model
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TurbineId(String);

impl TurbineId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TurbineId {
    fn default() -> Self {
        Self::new("Turbine-1")
    }
}

impl fmt::Display for TurbineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Turbine {
    pub id: TurbineId,
    pub name: String,
}

impl Turbine {
    pub fn new(id: TurbineId) -> Self {
        let name = Self::format_name(id.as_str());
        Self { id, name }
    }

    fn format_name(id: &str) -> String {
        // "Turbine-2" -> "Turbine 2", "north_ridge_" -> "north ridge"
        id.trim_end_matches(['_', '-'])
            .replace(['_', '-'], " ")
    }
}

/// Rotor/nacelle parameters consumed by the turbine animation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationParams {
    pub rotor_speed: f64,
    pub yaw: f64,
    pub pitch: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_name() {
        let turbine = Turbine::new(TurbineId::new("Turbine-2"));
        assert_eq!(turbine.name, "Turbine 2");

        let turbine = Turbine::new(TurbineId::new("north_ridge_"));
        assert_eq!(turbine.name, "north ridge");
    }
}
