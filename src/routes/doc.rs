use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        categories::{CreateCategoryRequest, UpdateCategoryRequest},
        customers::{CreateCustomerRequest, UpdateCustomerRequest},
        orders::{CreateOrderItemRequest, CreateOrderRequest, UpdateOrderStatusRequest},
        products::{CreateProductRequest, UpdateProductRequest},
    },
    entity::enums::{Currency, OrderStatus, PaymentMethod},
    models::{Category, Customer, CustomerWithOrders, Order, OrderItem, Product},
    response::{ApiResponse, Meta},
    routes::{categories, customers, health, orders, params, products},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::list_products,
        products::list_active_products,
        products::list_low_stock,
        products::get_product_by_sku,
        products::list_by_currency,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        categories::list_categories,
        categories::list_root_categories,
        categories::list_active_categories,
        categories::get_category,
        categories::list_sub_categories,
        categories::list_category_products,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        customers::list_customers,
        customers::list_active_customers,
        customers::get_customer_by_email,
        customers::get_customer,
        customers::list_customer_orders,
        customers::get_customer_with_orders,
        customers::create_customer,
        customers::update_customer,
        customers::delete_customer,
        orders::list_orders,
        orders::get_order_by_number,
        orders::list_orders_by_status,
        orders::list_orders_by_date_range,
        orders::get_order,
        orders::create_order,
        orders::update_order_status,
        orders::delete_order
    ),
    components(
        schemas(
            Product,
            Category,
            Customer,
            CustomerWithOrders,
            Order,
            OrderItem,
            Currency,
            OrderStatus,
            PaymentMethod,
            CreateProductRequest,
            UpdateProductRequest,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            CreateCustomerRequest,
            UpdateCustomerRequest,
            CreateOrderItemRequest,
            CreateOrderRequest,
            UpdateOrderStatusRequest,
            params::ProductQuery,
            params::CategoryQuery,
            params::CustomerQuery,
            params::OrderListQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<Order>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Product catalogue endpoints"),
        (name = "Categories", description = "Category tree endpoints"),
        (name = "Customers", description = "Customer endpoints"),
        (name = "Orders", description = "Order endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
