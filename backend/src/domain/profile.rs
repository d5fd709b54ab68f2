//! Health profile attached to a user account.
//!
//! All fields are independently optional: an absent field is omitted from
//! the stored JSON, never defaulted. Updates arrive as a partial patch and
//! are validated as a whole before any field is applied.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Inclusive height range in centimetres.
pub const HEIGHT_RANGE: (f64, f64) = (50.0, 250.0);
/// Inclusive weight range in kilograms.
pub const WEIGHT_RANGE: (f64, f64) = (20.0, 300.0);
/// Inclusive age range in years.
pub const AGE_RANGE: (i32, i32) = (1, 150);

/// Fixed two-value gender enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Parse the wire representation used by the profile-update payload.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            _ => None,
        }
    }
}

/// Health and demographic attributes used for meal recommendations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Profile {
    /// Height in centimetres.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Weight in kilograms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Age in whole years.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
}

impl Profile {
    /// Merge a validated patch into this profile. Fields absent from the
    /// patch are left unchanged.
    pub fn apply(&mut self, update: &ProfileUpdate) {
        if let Some(height) = update.height {
            self.height = Some(height);
        }
        if let Some(weight) = update.weight {
            self.weight = Some(weight);
        }
        if let Some(age) = update.age {
            self.age = Some(age);
        }
        if let Some(gender) = update.gender {
            self.gender = Some(gender);
        }
    }
}

/// A single rejected field in a profile-update request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileFieldError {
    pub field: &'static str,
    pub code: &'static str,
    pub message: String,
}

impl ProfileFieldError {
    fn out_of_range(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            code: "out_of_range",
            message: message.into(),
        }
    }
}

/// Validated partial update for a [`Profile`].
///
/// Construct via [`ProfileUpdate::from_parts`], which rejects the whole
/// request if any supplied field is out of range. No partial application of
/// invalid input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    height: Option<f64>,
    weight: Option<f64>,
    age: Option<i32>,
    gender: Option<Gender>,
}

impl ProfileUpdate {
    /// Validate raw payload values into a patch, collecting every field
    /// error rather than stopping at the first.
    pub fn from_parts(
        height: Option<f64>,
        weight: Option<f64>,
        age: Option<f64>,
        gender: Option<&str>,
    ) -> Result<Self, Vec<ProfileFieldError>> {
        let mut errors = Vec::new();

        let height = height.and_then(|value| {
            validate_range("height", value, HEIGHT_RANGE, &mut errors)
        });
        let weight = weight.and_then(|value| {
            validate_range("weight", value, WEIGHT_RANGE, &mut errors)
        });
        let age = age.and_then(|value| validate_age(value, &mut errors));
        let gender = gender.and_then(|value| {
            let parsed = Gender::parse(value);
            if parsed.is_none() {
                errors.push(ProfileFieldError {
                    field: "gender",
                    code: "invalid_enum",
                    message: "gender must be one of: male, female".to_owned(),
                });
            }
            parsed
        });

        if errors.is_empty() {
            Ok(Self {
                height,
                weight,
                age,
                gender,
            })
        } else {
            Err(errors)
        }
    }

    /// True when no field is supplied; merging such a patch only refreshes
    /// the update timestamp.
    pub fn is_empty(&self) -> bool {
        self.height.is_none() && self.weight.is_none() && self.age.is_none() && self.gender.is_none()
    }
}

fn validate_range(
    field: &'static str,
    value: f64,
    (min, max): (f64, f64),
    errors: &mut Vec<ProfileFieldError>,
) -> Option<f64> {
    if value >= min && value <= max {
        Some(value)
    } else {
        errors.push(ProfileFieldError::out_of_range(
            field,
            format!("{field} must be between {min} and {max}"),
        ));
        None
    }
}

fn validate_age(value: f64, errors: &mut Vec<ProfileFieldError>) -> Option<i32> {
    let (min, max) = AGE_RANGE;
    if value.fract() != 0.0 {
        errors.push(ProfileFieldError {
            field: "age",
            code: "not_integral",
            message: "age must be a whole number".to_owned(),
        });
        return None;
    }
    if value >= f64::from(min) && value <= f64::from(max) {
        #[allow(clippy::cast_possible_truncation, reason = "bounded by AGE_RANGE above")]
        let age = value as i32;
        Some(age)
    } else {
        errors.push(ProfileFieldError::out_of_range(
            "age",
            format!("age must be between {min} and {max}"),
        ));
        None
    }
}
