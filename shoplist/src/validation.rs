//! Checks callers run on user input before dispatching.
//!
//! The reducer accepts whatever it is given, including empty names. Input
//! forms are expected to pass text through these functions first.

use crate::types::{ItemDraft, ItemPatch};
use thiserror::Error;

/// Rejected user input
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Name was empty or only whitespace
    #[error("name cannot be empty")]
    EmptyName,

    /// Quantity was empty or only whitespace
    #[error("quantity cannot be empty")]
    EmptyQuantity,
}

/// Trims a list or item name, rejecting blank input
///
/// # Errors
///
/// Returns [`ValidationError::EmptyName`] if nothing is left after trimming.
pub fn validate_name(input: &str) -> Result<String, ValidationError> {
    non_blank(input).ok_or(ValidationError::EmptyName)
}

/// Trims a quantity, rejecting blank input
///
/// # Errors
///
/// Returns [`ValidationError::EmptyQuantity`] if nothing is left after trimming.
pub fn validate_quantity(input: &str) -> Result<String, ValidationError> {
    non_blank(input).ok_or(ValidationError::EmptyQuantity)
}

fn non_blank(input: &str) -> Option<String> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl ItemDraft {
    /// Builds a draft from raw form input
    ///
    /// # Errors
    ///
    /// Returns the first blank field, name before quantity.
    pub fn validated(name: &str, quantity: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            name: validate_name(name)?,
            quantity: validate_quantity(quantity)?,
        })
    }
}

impl ItemPatch {
    /// Trims the text fields this patch sets
    ///
    /// # Errors
    ///
    /// Returns an error if a field that is set is blank.
    pub fn validated(self) -> Result<Self, ValidationError> {
        Ok(Self {
            name: self.name.as_deref().map(validate_name).transpose()?,
            quantity: self.quantity.as_deref().map(validate_quantity).transpose()?,
            purchased: self.purchased,
        })
    }
}
