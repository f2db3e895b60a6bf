use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_auth_types::identity::Identity;

use crate::error::StoreServiceError;
use crate::handlers::account::UserResponse;
use crate::handlers::address::AddressResponse;
use crate::handlers::catalog::ProductResponse;
use crate::handlers::order::{OrderDetailResponse, OrderResponse};
use crate::state::AppState;
use crate::usecase::admin::{
    AdminGetOrderUseCase, AdminListOrdersUseCase, AdminListProductsUseCase,
    CreateProductUseCase, DashboardUseCase, DeleteProductUseCase, GetCustomerUseCase,
    ListCustomersUseCase, ProductInput, UpdateOrderStatusUseCase, UpdateProductUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct DashboardResponse {
    pub product_count: u64,
    pub order_count: u64,
    pub customer_count: u64,
    #[serde(serialize_with = "bazaar_core::serde::to_money")]
    pub revenue: Decimal,
    pub recent_orders: Vec<OrderResponse>,
}

#[derive(Serialize)]
pub struct CustomerDetailResponse {
    pub user: UserResponse,
    pub orders: Vec<OrderResponse>,
    pub addresses: Vec<AddressResponse>,
}

// ── GET /admin/dashboard ─────────────────────────────────────────────────────

pub async fn get_dashboard(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, StoreServiceError> {
    let usecase = DashboardUseCase {
        dashboard: state.dashboard_repo(),
    };
    let summary = usecase.execute(identity.actor()).await?;
    Ok(Json(DashboardResponse {
        product_count: summary.product_count,
        order_count: summary.order_count,
        customer_count: summary.customer_count,
        revenue: summary.revenue,
        recent_orders: summary.recent_orders.into_iter().map(Into::into).collect(),
    }))
}

// ── Products ─────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    #[serde(default)]
    pub image_url: Option<String>,
    pub category_id: Uuid,
    #[serde(default)]
    pub featured: bool,
}

impl From<ProductRequest> for ProductInput {
    fn from(body: ProductRequest) -> Self {
        Self {
            name: body.name,
            description: body.description,
            price: body.price,
            stock: body.stock,
            image_url: body.image_url,
            category_id: body.category_id,
            featured: body.featured,
        }
    }
}

pub async fn list_products(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, StoreServiceError> {
    let usecase = AdminListProductsUseCase {
        products: state.product_repo(),
    };
    let products = usecase.execute(identity.actor()).await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

pub async fn create_product(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<ProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), StoreServiceError> {
    let usecase = CreateProductUseCase {
        categories: state.category_repo(),
        products: state.product_repo(),
    };
    let product = usecase.execute(identity.actor(), body.into()).await?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

pub async fn update_product(
    identity: Identity,
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(body): Json<ProductRequest>,
) -> Result<Json<ProductResponse>, StoreServiceError> {
    let usecase = UpdateProductUseCase {
        categories: state.category_repo(),
        products: state.product_repo(),
    };
    let product = usecase
        .execute(identity.actor(), product_id, body.into())
        .await?;
    Ok(Json(product.into()))
}

pub async fn delete_product(
    identity: Identity,
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<StatusCode, StoreServiceError> {
    let usecase = DeleteProductUseCase {
        products: state.product_repo(),
    };
    usecase.execute(identity.actor(), product_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── Orders ───────────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct OrderListQuery {
    pub status: Option<String>,
}

pub async fn list_orders(
    identity: Identity,
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<Vec<OrderResponse>>, StoreServiceError> {
    let usecase = AdminListOrdersUseCase {
        orders: state.order_repo(),
    };
    let status = query.status.as_deref().filter(|s| !s.is_empty());
    let orders = usecase.execute(identity.actor(), status).await?;
    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

pub async fn get_order(
    identity: Identity,
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderDetailResponse>, StoreServiceError> {
    let usecase = AdminGetOrderUseCase {
        orders: state.order_repo(),
        addresses: state.address_repo(),
    };
    let detail = usecase.execute(identity.actor(), order_id).await?;
    Ok(Json(detail.into()))
}

#[derive(Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

pub async fn update_order_status(
    identity: Identity,
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(body): Json<UpdateOrderStatusRequest>,
) -> Result<Json<OrderResponse>, StoreServiceError> {
    let usecase = UpdateOrderStatusUseCase {
        orders: state.order_repo(),
    };
    let order = usecase
        .execute(identity.actor(), order_id, &body.status)
        .await?;
    Ok(Json(order.into()))
}

// ── Users ────────────────────────────────────────────────────────────────────

pub async fn list_customers(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, StoreServiceError> {
    let usecase = ListCustomersUseCase {
        users: state.user_repo(),
    };
    let users = usecase.execute(identity.actor()).await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

pub async fn get_customer(
    identity: Identity,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<CustomerDetailResponse>, StoreServiceError> {
    let usecase = GetCustomerUseCase {
        users: state.user_repo(),
        orders: state.order_repo(),
        addresses: state.address_repo(),
    };
    let detail = usecase.execute(identity.actor(), user_id).await?;
    Ok(Json(CustomerDetailResponse {
        user: detail.user.into(),
        orders: detail.orders.into_iter().map(Into::into).collect(),
        addresses: detail.addresses.into_iter().map(Into::into).collect(),
    }))
}
