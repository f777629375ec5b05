use sea_orm::ColumnTrait;
use uuid::Uuid;

use crate::{
    dto::categories::{CreateCategoryRequest, UpdateCategoryRequest},
    entity::{
        Products,
        categories::{self, Column},
        products,
    },
    error::{AppError, AppResult},
    models::{Category, Product},
    repository::{
        CategoryInclude, Filter, ListQuery, Loaded, Sort, products::ProductRelations,
    },
    response::{ApiResponse, Meta},
    routes::params::{CategoryQuery, normalize_page},
    state::AppState,
    unit_of_work::UnitOfWork,
};

const DETAIL: [CategoryInclude; 2] = [CategoryInclude::Parent, CategoryInclude::SubCategories];

pub async fn list_categories(
    state: &AppState,
    query: CategoryQuery,
) -> AppResult<ApiResponse<Vec<Category>>> {
    let (page_index, page_size) = normalize_page(query.page_index, query.page_size);
    let mut filter = Filter::all();

    if let Some(search) = query.q.as_deref().filter(|s| !s.is_empty()) {
        filter = filter.and(Column::Name.contains(search));
    }
    if let Some(is_active) = query.is_active {
        filter = filter.and(Column::IsActive.eq(is_active));
    }

    let mut list_query = ListQuery::new()
        .filter(filter)
        .sort(Sort::asc(Column::Name))
        .page(page_index, page_size);
    for include in DETAIL {
        list_query = list_query.include(include);
    }

    let page = state.unit_of_work().categories().get_list(list_query).await?;
    Ok(ApiResponse::page("Categories", page.map(Category::from)))
}

pub async fn list_root_categories(state: &AppState) -> AppResult<ApiResponse<Vec<Category>>> {
    let items = state.unit_of_work().categories().root_categories().await?;
    Ok(ApiResponse::success(
        "Root categories",
        items.into_iter().map(Category::from).collect(),
        Some(Meta::empty()),
    ))
}

pub async fn list_active_categories(state: &AppState) -> AppResult<ApiResponse<Vec<Category>>> {
    let items = state.unit_of_work().categories().active_categories().await?;
    Ok(ApiResponse::success(
        "Active categories",
        items.into_iter().map(Category::from).collect(),
        Some(Meta::empty()),
    ))
}

pub async fn get_category(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Category>> {
    let category = state
        .unit_of_work()
        .categories()
        .find_by_id(id, &DETAIL, false)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Category", category.into(), None))
}

pub async fn list_sub_categories(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<Vec<Category>>> {
    let uow = state.unit_of_work();
    ensure_exists(&uow, id).await?;
    let items = uow.categories().sub_categories(id).await?;
    Ok(ApiResponse::success(
        "Sub-categories",
        items.into_iter().map(Category::from).collect(),
        Some(Meta::empty()),
    ))
}

/// Live products of one category, each carrying the category it belongs to.
pub async fn list_category_products(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<Vec<Product>>> {
    let category = state
        .unit_of_work()
        .categories()
        .with_products(id)
        .await?
        .ok_or(AppError::NotFound)?;

    let Loaded { model, related } = category;
    let items = related
        .products
        .into_iter()
        .map(|product| {
            Product::from(Loaded::<Products> {
                model: product,
                related: ProductRelations {
                    category: Some(model.clone()),
                },
            })
        })
        .collect();

    Ok(ApiResponse::success("Products", items, Some(Meta::empty())))
}

pub async fn create_category(
    state: &AppState,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    payload.validate()?;
    let uow = state.unit_of_work();

    if let Some(parent_id) = payload.parent_category_id {
        ensure_parent(&uow, parent_id).await?;
    }
    ensure_name_free(&uow, &payload.name, None).await?;

    let category = uow
        .categories()
        .add(categories::Model::new(
            payload.name,
            payload.description,
            payload.parent_category_id,
        ))
        .await;
    uow.save_changes()
        .await
        .map_err(AppError::constraint_as_conflict)?;
    tracing::info!(category_id = %category.id, "category created");

    let created = reload(&uow, category.id).await?;
    Ok(ApiResponse::success("Category created", created, Some(Meta::empty())))
}

pub async fn update_category(
    state: &AppState,
    id: Uuid,
    payload: UpdateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    payload.validate()?;
    let uow = state.unit_of_work();

    let mut category = uow
        .categories()
        .find_by_id(id, &[], false)
        .await?
        .ok_or(AppError::NotFound)?
        .into_model();

    if let Some(parent_id) = payload.parent_category_id {
        if parent_id == id {
            return Err(AppError::BadRequest(
                "a category cannot be its own parent".into(),
            ));
        }
        ensure_parent(&uow, parent_id).await?;
    }
    if category.name != payload.name {
        ensure_name_free(&uow, &payload.name, Some(id)).await?;
    }

    category.name = payload.name;
    category.description = payload.description;
    category.parent_category_id = payload.parent_category_id;
    category.is_active = payload.is_active;

    uow.categories().update(category).await;
    uow.save_changes()
        .await
        .map_err(AppError::constraint_as_conflict)?;

    let updated = reload(&uow, id).await?;
    Ok(ApiResponse::success("Updated", updated, Some(Meta::empty())))
}

/// Soft delete. Refused while live sub-categories or products still hang off the category.
pub async fn delete_category(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let uow = state.unit_of_work();
    let category = uow
        .categories()
        .find_by_id(id, &[], false)
        .await?
        .ok_or(AppError::NotFound)?;

    let has_children = uow
        .categories()
        .exists(Some(Filter::new(Column::ParentCategoryId.eq(id))), false)
        .await?;
    let has_products = uow
        .products()
        .exists(Some(Filter::new(products::Column::CategoryId.eq(id))), false)
        .await?;
    if has_children || has_products {
        return Err(AppError::Conflict(
            "category still has sub-categories or products".into(),
        ));
    }

    uow.categories().delete(category.into_model(), false).await;
    uow.save_changes().await?;
    tracing::info!(category_id = %id, "category deleted");

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}

async fn ensure_exists(uow: &UnitOfWork, id: Uuid) -> AppResult<()> {
    let exists = uow
        .categories()
        .exists(Some(Filter::new(Column::Id.eq(id))), false)
        .await?;
    if exists { Ok(()) } else { Err(AppError::NotFound) }
}

async fn ensure_parent(uow: &UnitOfWork, parent_id: Uuid) -> AppResult<()> {
    ensure_exists(uow, parent_id).await.map_err(|err| match err {
        AppError::NotFound => {
            AppError::BadRequest(format!("parent category {parent_id} does not exist"))
        }
        other => other,
    })
}

async fn ensure_name_free(uow: &UnitOfWork, name: &str, except: Option<Uuid>) -> AppResult<()> {
    let mut filter = Filter::new(Column::Name.eq(name));
    if let Some(id) = except {
        filter = filter.and(Column::Id.ne(id));
    }
    if uow.categories().exists(Some(filter), false).await? {
        return Err(AppError::Conflict(format!("category {name} already exists")));
    }
    Ok(())
}

async fn reload(uow: &UnitOfWork, id: Uuid) -> AppResult<Category> {
    uow.categories()
        .find_by_id(id, &DETAIL, false)
        .await?
        .map(Category::from)
        .ok_or(AppError::NotFound)
}
