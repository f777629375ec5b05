use serde::Deserialize;
use utoipa::ToSchema;

use super::{limit, require};
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCustomerRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub postal_code: String,
}

impl CreateCustomerRequest {
    pub fn validate(&self) -> AppResult<()> {
        require("first_name", &self.first_name, 100)?;
        require("last_name", &self.last_name, 100)?;
        require("email", &self.email, 200)?;
        check_email(&self.email)?;
        require("phone_number", &self.phone_number, 20)?;
        check_phone(&self.phone_number)?;
        require("address", &self.address, 500)?;
        limit("city", &self.city, 100)?;
        limit("country", &self.country, 100)?;
        limit("postal_code", &self.postal_code, 20)
    }
}

/// Everything but the email, which stays fixed once registered.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCustomerRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub postal_code: String,
}

impl UpdateCustomerRequest {
    pub fn validate(&self) -> AppResult<()> {
        require("first_name", &self.first_name, 100)?;
        require("last_name", &self.last_name, 100)?;
        require("phone_number", &self.phone_number, 20)?;
        check_phone(&self.phone_number)?;
        require("address", &self.address, 500)?;
        limit("city", &self.city, 100)?;
        limit("country", &self.country, 100)?;
        limit("postal_code", &self.postal_code, 20)
    }
}

fn check_email(email: &str) -> AppResult<()> {
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if valid {
        Ok(())
    } else {
        Err(AppError::BadRequest("email is not a valid address".into()))
    }
}

fn check_phone(phone: &str) -> AppResult<()> {
    let valid = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '+' | '(' | ')'));
    if valid {
        Ok(())
    } else {
        Err(AppError::BadRequest("phone_number is not a valid number".into()))
    }
}
