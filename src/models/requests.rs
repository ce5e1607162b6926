//! Request DTOs for the property API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use super::{NewProperty, Price, PropertyPatch};

/// Maximum length of `title` and `location`, in characters.
pub const MAX_TEXT_LENGTH: usize = 200;

/// Request body for `POST /properties/` and `PUT /properties/{id}/`
#[derive(Debug, Clone, Deserialize)]
pub struct PropertyRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    pub location: String,
}

impl PropertyRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        check_text("title", &self.title).or_else(|| check_text("location", &self.location))
    }

    pub fn into_new_property(self) -> NewProperty {
        NewProperty {
            title: self.title.trim().to_string(),
            description: self.description,
            price: self.price,
            location: self.location.trim().to_string(),
        }
    }
}

/// Request body for `PATCH /properties/{id}/`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropertyPatchRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub location: Option<String>,
}

impl PropertyPatchRequest {
    pub fn validate(&self) -> Option<String> {
        self.title
            .as_deref()
            .and_then(|title| check_text("title", title))
            .or_else(|| {
                self.location
                    .as_deref()
                    .and_then(|location| check_text("location", location))
            })
    }

    pub fn into_patch(self) -> PropertyPatch {
        PropertyPatch {
            title: self.title.map(|t| t.trim().to_string()),
            description: self.description,
            price: self.price,
            location: self.location.map(|l| l.trim().to_string()),
        }
    }
}

fn check_text(field: &str, value: &str) -> Option<String> {
    if value.trim().is_empty() {
        return Some(format!("{} cannot be empty", field));
    }
    if value.chars().count() > MAX_TEXT_LENGTH {
        return Some(format!(
            "{} exceeds maximum length of {} characters",
            field, MAX_TEXT_LENGTH
        ));
    }
    None
}
