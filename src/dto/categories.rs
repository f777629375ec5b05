use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{limit, require};
use crate::error::AppResult;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub parent_category_id: Option<Uuid>,
}

impl CreateCategoryRequest {
    pub fn validate(&self) -> AppResult<()> {
        require("name", &self.name, 100)?;
        limit("description", &self.description, 500)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub parent_category_id: Option<Uuid>,
    pub is_active: bool,
}

impl UpdateCategoryRequest {
    pub fn validate(&self) -> AppResult<()> {
        require("name", &self.name, 100)?;
        limit("description", &self.description, 500)
    }
}
