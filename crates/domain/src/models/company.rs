//! Company and company tail number domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use shared::validation::normalize_code;

/// An operator that owns or charters aircraft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating a company.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    #[serde(default)]
    pub id: Option<Uuid>,

    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: String,

    #[validate(length(max = 200, message = "Contact name cannot exceed 200 characters"))]
    pub contact_name: Option<String>,

    #[validate(email(message = "Invalid contact email"))]
    pub contact_email: Option<String>,

    #[validate(length(max = 50, message = "Contact phone cannot exceed 50 characters"))]
    pub contact_phone: Option<String>,
}

impl NewCompany {
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self
    }
}

/// Request payload for updating a company. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompanyChanges {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: Option<String>,

    #[validate(length(max = 200, message = "Contact name cannot exceed 200 characters"))]
    pub contact_name: Option<String>,

    #[validate(email(message = "Invalid contact email"))]
    pub contact_email: Option<String>,

    #[validate(length(max = 50, message = "Contact phone cannot exceed 50 characters"))]
    pub contact_phone: Option<String>,
}

impl Company {
    /// Returns a copy with the submitted changes applied.
    pub fn with_changes(&self, changes: &CompanyChanges) -> Company {
        let mut updated = self.clone();
        if let Some(ref name) = changes.name {
            updated.name = name.trim().to_string();
        }
        if changes.contact_name.is_some() {
            updated.contact_name = changes.contact_name.clone();
        }
        if changes.contact_email.is_some() {
            updated.contact_email = changes.contact_email.clone();
        }
        if changes.contact_phone.is_some() {
            updated.contact_phone = changes.contact_phone.clone();
        }
        updated
    }
}

/// A tail number registered to a company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyTail {
    pub id: Uuid,
    pub company_id: Uuid,
    pub tail_number: String,
    pub created_at: DateTime<Utc>,
}

/// Request payload for registering a tail number with a company.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewCompanyTail {
    #[serde(default)]
    pub id: Option<Uuid>,

    #[validate(custom(function = "shared::validation::validate_tail_number"))]
    pub tail_number: String,
}

impl NewCompanyTail {
    pub fn normalized(mut self) -> Self {
        self.tail_number = normalize_code(&self.tail_number);
        self
    }
}
