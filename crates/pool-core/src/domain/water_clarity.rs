//! Visual water clarity assessment

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterClarity {
    Clear,
    Cloudy,
    Algae,
}

impl WaterClarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaterClarity::Clear => "clear",
            WaterClarity::Cloudy => "cloudy",
            WaterClarity::Algae => "algae",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "clear" => Some(WaterClarity::Clear),
            "cloudy" => Some(WaterClarity::Cloudy),
            "algae" => Some(WaterClarity::Algae),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WaterClarity::Clear => "Berrak",
            WaterClarity::Cloudy => "Bulanık",
            WaterClarity::Algae => "Yosun Var",
        }
    }
}

impl Default for WaterClarity {
    fn default() -> Self {
        WaterClarity::Clear
    }
}
