//! Form payloads posted by the shell's pages and their validation rules.

use data_access::{calculate_totals, CreateOrder, Totals, UpdateOrder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use validator::{Validate, ValidationError, ValidationErrors};

/// First error message per field, ready for display next to its input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(HashMap<String, String>);

impl FieldErrors {
    pub fn message(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&ValidationErrors> for FieldErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let mut fields = FieldErrors::default();
        for (field, field_errors) in errors.field_errors() {
            if let Some(first) = field_errors.first() {
                let message = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid {}", field));
                fields.insert(&field, message);
            }
        }
        fields
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignInForm {
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Enter a valid email address")
    )]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[serde(default, rename = "returnUrl")]
    pub return_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignUpForm {
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Enter a valid email address")
    )]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[serde(default, rename = "confirmPassword")]
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
    #[serde(default, rename = "returnUrl")]
    pub return_url: Option<String>,
}

/// Raw order form values as posted. Kept as strings so a rejected
/// submission re-renders exactly what the operator typed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderFormInput {
    #[serde(default)]
    pub customer: String,
    #[serde(default)]
    pub nb_days: String,
    #[serde(default)]
    pub tjm: String,
    #[serde(default)]
    pub taux_tva: String,
}

impl Default for OrderFormInput {
    fn default() -> Self {
        Self {
            customer: String::new(),
            nb_days: "1".to_string(),
            tjm: "0".to_string(),
            taux_tva: "20".to_string(),
        }
    }
}

/// Validated order fields.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderFields {
    pub customer: String,
    pub nb_days: i32,
    pub tjm: Decimal,
    pub taux_tva: Decimal,
}

#[derive(Debug, Validate)]
struct OrderCandidate {
    #[validate(length(min = 2, message = "Customer name must be at least 2 characters"))]
    customer: String,
    #[validate(
        required(message = "Number of days is required"),
        range(min = 1, message = "Number of days must be at least 1"),
        custom(function = "day_count")
    )]
    nb_days: Option<i32>,
    #[validate(
        required(message = "Daily rate is required"),
        custom(function = "daily_rate")
    )]
    tjm: Option<Decimal>,
    #[validate(
        required(message = "VAT rate is required"),
        custom(function = "percentage")
    )]
    taux_tva: Option<Decimal>,
}

const MAX_DAYS: i32 = 3650;
const MAX_DAILY_RATE: i64 = 1_000_000;

fn day_count(value: i32) -> Result<(), ValidationError> {
    if value > MAX_DAYS {
        let mut error = ValidationError::new("max_days");
        error.message = Some("Number of days cannot exceed 3650".into());
        return Err(error);
    }
    Ok(())
}

fn daily_rate(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut error = ValidationError::new("non_negative");
        error.message = Some("Daily rate cannot be negative".into());
        return Err(error);
    }
    if *value > Decimal::from(MAX_DAILY_RATE) {
        let mut error = ValidationError::new("max_daily_rate");
        error.message = Some("Daily rate cannot exceed 1000000".into());
        return Err(error);
    }
    Ok(())
}

fn percentage(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO || *value > Decimal::ONE_HUNDRED {
        let mut error = ValidationError::new("percentage");
        error.message = Some("VAT rate must be between 0 and 100".into());
        return Err(error);
    }
    Ok(())
}

fn parse_optional<T: FromStr>(raw: &str) -> Result<Option<T>, ()> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed.parse::<T>().map(Some).map_err(|_| ())
}

impl OrderFormInput {
    /// Check the submission, returning per-field messages on rejection.
    pub fn validate_fields(&self) -> Result<OrderFields, FieldErrors> {
        let mut errors = FieldErrors::default();

        let nb_days = parse_optional::<i32>(&self.nb_days).unwrap_or_else(|_| {
            errors.insert("nb_days", "Number of days must be a whole number");
            None
        });
        let tjm = parse_optional::<Decimal>(&self.tjm).unwrap_or_else(|_| {
            errors.insert("tjm", "Daily rate must be a number");
            None
        });
        let taux_tva = parse_optional::<Decimal>(&self.taux_tva).unwrap_or_else(|_| {
            errors.insert("taux_tva", "VAT rate must be a number");
            None
        });

        let candidate = OrderCandidate {
            customer: self.customer.trim().to_string(),
            nb_days,
            tjm,
            taux_tva,
        };

        if let Err(validation) = candidate.validate() {
            // Parse failures take precedence over "required"
            for (field, message) in FieldErrors::from(&validation).0 {
                errors.insert(&field, message);
            }
        }

        match (candidate.nb_days, candidate.tjm, candidate.taux_tva) {
            (Some(nb_days), Some(tjm), Some(taux_tva)) if errors.is_empty() => Ok(OrderFields {
                customer: candidate.customer,
                nb_days,
                tjm,
                taux_tva,
            }),
            _ => Err(errors),
        }
    }

    /// Totals for the live preview. Missing or unparsable numbers count as zero.
    /// `None` when the totals are too large to represent.
    pub fn preview_totals(&self) -> Option<Totals> {
        let nb_days = parse_optional::<i32>(&self.nb_days)
            .ok()
            .flatten()
            .unwrap_or_default();
        let tjm = parse_optional::<Decimal>(&self.tjm)
            .ok()
            .flatten()
            .unwrap_or_default();
        let taux_tva = parse_optional::<Decimal>(&self.taux_tva)
            .ok()
            .flatten()
            .unwrap_or_default();
        calculate_totals(nb_days, tjm, taux_tva).ok()
    }
}

impl From<&UpdateOrder> for OrderFormInput {
    fn from(order: &UpdateOrder) -> Self {
        Self {
            customer: order.customer.clone(),
            nb_days: order.nb_days.to_string(),
            tjm: order.tjm.normalize().to_string(),
            taux_tva: order.taux_tva.normalize().to_string(),
        }
    }
}

impl OrderFields {
    pub fn into_create(self) -> CreateOrder {
        CreateOrder {
            customer: self.customer,
            nb_days: self.nb_days,
            tjm: self.tjm,
            taux_tva: self.taux_tva,
        }
    }

    pub fn into_update(self, id: i64) -> UpdateOrder {
        UpdateOrder {
            id,
            customer: self.customer,
            nb_days: self.nb_days,
            tjm: self.tjm,
            taux_tva: self.taux_tva,
        }
    }
}
