//! Raw reading input as received from the form, and its validation.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use validator::{Validate, ValidationError, ValidationErrors};

use super::reading::Measurements;
use super::water_clarity::WaterClarity;
use crate::error::DomainError;

/// Field order used to pick which violation to report first.
const FIELD_ORDER: [&str; 5] = [
    "ph_level",
    "chlorine_ppm",
    "alkalinity_ppm",
    "temperature_celsius",
    "water_clarity",
];

const CLARITY_REASON: &str = "must be one of clear, cloudy, algae";

/// Unvalidated submission payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ReadingData {
    #[validate(range(min = 0.0, max = 14.0, message = "must be between 0 and 14"))]
    pub ph_level: f64,

    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub chlorine_ppm: f64,

    #[validate(range(min = 0, message = "must not be negative"))]
    pub alkalinity_ppm: i32,

    pub temperature_celsius: f64,

    pub water_clarity: String,

    #[serde(default)]
    pub notes: String,
}

impl ReadingData {
    /// Checks every field and produces typed measurements.
    ///
    /// Fields are walked in form order and the first violation wins. Range
    /// rules come from the derive; finiteness is checked per field since NaN
    /// slips through range comparisons.
    pub fn validate_measurements(&self) -> Result<Measurements, DomainError> {
        let range_errors = self.validate().err();
        let field_errors = range_errors
            .as_ref()
            .map(ValidationErrors::field_errors)
            .unwrap_or_default();

        for field in FIELD_ORDER {
            if let Some(reason) = self.field_violation(field, &field_errors) {
                return Err(DomainError::validation(field, reason));
            }
        }
        if let Some(errors) = range_errors {
            return Err(DomainError::validation("reading", errors.to_string()));
        }

        let water_clarity = WaterClarity::from_str(&self.water_clarity).ok_or_else(|| {
            DomainError::validation("water_clarity", CLARITY_REASON)
        })?;

        Ok(Measurements {
            ph_level: self.ph_level,
            chlorine_ppm: self.chlorine_ppm,
            alkalinity_ppm: self.alkalinity_ppm,
            temperature_celsius: self.temperature_celsius,
            water_clarity,
            notes: self.notes.clone(),
        })
    }

    fn field_violation(
        &self,
        field: &str,
        field_errors: &HashMap<Cow<'static, str>, &Vec<ValidationError>>,
    ) -> Option<String> {
        let finite = match field {
            "ph_level" => self.ph_level.is_finite(),
            "chlorine_ppm" => self.chlorine_ppm.is_finite(),
            "temperature_celsius" => self.temperature_celsius.is_finite(),
            _ => true,
        };
        if !finite {
            return Some("must be a finite number".to_string());
        }

        if let Some(list) = field_errors.get(field) {
            return Some(
                list.first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "invalid value".to_string()),
            );
        }

        if field == "water_clarity" && WaterClarity::from_str(&self.water_clarity).is_none() {
            return Some(CLARITY_REASON.to_string());
        }
        None
    }
}

impl Default for ReadingData {
    /// Form defaults for a fresh inspection.
    fn default() -> Self {
        Self {
            ph_level: 7.2,
            chlorine_ppm: 1.0,
            alkalinity_ppm: 100,
            temperature_celsius: 26.0,
            water_clarity: WaterClarity::Clear.as_str().to_string(),
            notes: String::new(),
        }
    }
}

impl From<&Measurements> for ReadingData {
    fn from(m: &Measurements) -> Self {
        Self {
            ph_level: m.ph_level,
            chlorine_ppm: m.chlorine_ppm,
            alkalinity_ppm: m.alkalinity_ppm,
            temperature_celsius: m.temperature_celsius,
            water_clarity: m.water_clarity.as_str().to_string(),
            notes: m.notes.clone(),
        }
    }
}
