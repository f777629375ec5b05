use sea_orm::entity::prelude::*;

use crate::audit;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub description: String,
    pub parent_category_id: Option<Uuid>,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: Option<DateTimeWithTimeZone>,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentCategoryId",
        to = "Column::Id",
        on_delete = "Restrict"
    )]
    ParentCategory,
    #[sea_orm(has_many = "super::products::Entity")]
    Products,
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// A root category when `parent_category_id` is `None`.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parent_category_id: Option<Uuid>,
    ) -> Self {
        Self {
            id: Uuid::nil(),
            name: name.into(),
            description: description.into(),
            parent_category_id,
            is_active: true,
            is_deleted: false,
            created_at: audit::now(),
            updated_at: None,
            deleted_at: None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_category_id.is_none()
    }
}
