use sea_orm::{ColumnTrait, Condition};
use uuid::Uuid;

use crate::{
    dto::customers::{CreateCustomerRequest, UpdateCustomerRequest},
    entity::customers::{self, Column},
    error::{AppError, AppResult},
    models::{Customer, CustomerWithOrders},
    repository::{Filter, ListQuery, Sort},
    response::{ApiResponse, Meta},
    routes::params::{CustomerQuery, normalize_page},
    state::AppState,
};

pub async fn list_customers(
    state: &AppState,
    query: CustomerQuery,
) -> AppResult<ApiResponse<Vec<Customer>>> {
    let (page_index, page_size) = normalize_page(query.page_index, query.page_size);
    let mut filter = Filter::all();

    if let Some(search) = query.q.as_deref().filter(|s| !s.is_empty()) {
        filter = filter.and(
            Condition::any()
                .add(Column::FirstName.contains(search))
                .add(Column::LastName.contains(search))
                .add(Column::Email.contains(search)),
        );
    }
    if let Some(country) = query.country.as_deref() {
        filter = filter.and(Column::Country.eq(country));
    }
    if let Some(city) = query.city.as_deref() {
        filter = filter.and(Column::City.eq(city));
    }

    let page = state
        .unit_of_work()
        .customers()
        .get_list(
            ListQuery::new()
                .filter(filter)
                .sort(Sort::asc(Column::LastName).then_asc(Column::FirstName))
                .page(page_index, page_size),
        )
        .await?;

    Ok(ApiResponse::page("Customers", page.map(Customer::from)))
}

pub async fn get_customer(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Customer>> {
    let customer = state
        .unit_of_work()
        .customers()
        .find_by_id(id, &[], false)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Customer", customer.into(), None))
}

pub async fn get_customer_by_email(
    state: &AppState,
    email: &str,
) -> AppResult<ApiResponse<Customer>> {
    let customer = state
        .unit_of_work()
        .customers()
        .by_email(email)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Customer", customer.into(), None))
}

pub async fn get_customer_with_orders(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<CustomerWithOrders>> {
    let customer = state
        .unit_of_work()
        .customers()
        .with_orders(id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Customer", customer.into(), None))
}

pub async fn list_active_customers(state: &AppState) -> AppResult<ApiResponse<Vec<Customer>>> {
    let items = state.unit_of_work().customers().active_customers().await?;
    Ok(ApiResponse::success(
        "Active customers",
        items.into_iter().map(Customer::from).collect(),
        Some(Meta::empty()),
    ))
}

pub async fn create_customer(
    state: &AppState,
    payload: CreateCustomerRequest,
) -> AppResult<ApiResponse<Customer>> {
    payload.validate()?;
    let uow = state.unit_of_work();

    if !uow.customers().is_email_unique(&payload.email).await? {
        return Err(AppError::Conflict(format!(
            "email {} is already registered",
            payload.email
        )));
    }

    let customer = uow
        .customers()
        .add(
            customers::Model::new(payload.first_name, payload.last_name, payload.email)
                .with_phone_number(payload.phone_number)
                .with_address(
                    payload.address,
                    payload.city,
                    payload.country,
                    payload.postal_code,
                ),
        )
        .await;
    uow.save_changes()
        .await
        .map_err(AppError::constraint_as_conflict)?;
    tracing::info!(customer_id = %customer.id, "customer created");

    let created = uow
        .customers()
        .find_by_id(customer.id, &[], false)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success(
        "Customer created",
        created.into(),
        Some(Meta::empty()),
    ))
}

pub async fn update_customer(
    state: &AppState,
    id: Uuid,
    payload: UpdateCustomerRequest,
) -> AppResult<ApiResponse<Customer>> {
    payload.validate()?;
    let uow = state.unit_of_work();

    let customer = uow
        .customers()
        .find_by_id(id, &[], false)
        .await?
        .ok_or(AppError::NotFound)?
        .into_model();

    let customer = customers::Model {
        first_name: payload.first_name,
        last_name: payload.last_name,
        ..customer
    }
    .with_phone_number(payload.phone_number)
    .with_address(
        payload.address,
        payload.city,
        payload.country,
        payload.postal_code,
    );

    uow.customers().update(customer).await;
    uow.save_changes()
        .await
        .map_err(AppError::constraint_as_conflict)?;

    let updated = uow
        .customers()
        .find_by_id(id, &[], false)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Updated", updated.into(), Some(Meta::empty())))
}

/// Soft delete. Orders keep pointing at the row, so it is never removed physically.
pub async fn delete_customer(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let uow = state.unit_of_work();
    let customer = uow
        .customers()
        .find_by_id(id, &[], false)
        .await?
        .ok_or(AppError::NotFound)?;

    uow.customers().delete(customer.into_model(), false).await;
    uow.save_changes().await?;
    tracing::info!(customer_id = %id, "customer deleted");

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}
