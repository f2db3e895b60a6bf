use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_auth_types::identity::Identity;
use bazaar_domain::order::{OrderStatus, PaymentMethod};

use crate::domain::types::{Order, OrderDetail, OrderItem};
use crate::error::StoreServiceError;
use crate::handlers::address::AddressResponse;
use crate::state::AppState;
use crate::usecase::checkout::{
    CheckoutInput, CheckoutUseCase, GetOrderUseCase, ListMyOrdersUseCase, PayOrderUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: Uuid,
    pub order_number: String,
    #[serde(serialize_with = "bazaar_core::serde::to_money")]
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub user_id: Uuid,
    pub address_id: Uuid,
    #[serde(serialize_with = "bazaar_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            order_number: order.order_number,
            total_amount: order.total_amount,
            status: order.status,
            payment_method: order.payment_method,
            user_id: order.user_id,
            address_id: order.address_id,
            created_at: order.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct OrderItemResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    #[serde(serialize_with = "bazaar_core::serde::to_money")]
    pub price: Decimal,
    #[serde(serialize_with = "bazaar_core::serde::to_money")]
    pub line_total: Decimal,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        let line_total = item.line_total();
        Self {
            id: item.id,
            product_id: item.product_id,
            product_name: item.product_name,
            quantity: item.quantity,
            price: item.price,
            line_total,
        }
    }
}

#[derive(Serialize)]
pub struct OrderDetailResponse {
    pub order: OrderResponse,
    pub items: Vec<OrderItemResponse>,
    pub address: Option<AddressResponse>,
}

impl From<OrderDetail> for OrderDetailResponse {
    fn from(detail: OrderDetail) -> Self {
        Self {
            order: detail.order.into(),
            items: detail.items.into_iter().map(Into::into).collect(),
            address: detail.address.map(Into::into),
        }
    }
}

#[derive(Serialize)]
pub struct PaymentResponse {
    pub order: OrderResponse,
    pub message: &'static str,
}

// ── POST /checkout ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CheckoutRequest {
    pub address_id: Uuid,
    pub payment_method: String,
}

pub async fn checkout(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), StoreServiceError> {
    let usecase = CheckoutUseCase {
        cart: state.cart_repo(),
        addresses: state.address_repo(),
        orders: state.order_repo(),
    };
    let order = usecase
        .execute(
            identity.actor(),
            CheckoutInput {
                address_id: body.address_id,
                payment_method: body.payment_method,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(order.into())))
}

// ── POST /orders/{id}/payment ────────────────────────────────────────────────

pub async fn pay_order(
    identity: Identity,
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<PaymentResponse>, StoreServiceError> {
    let usecase = PayOrderUseCase {
        orders: state.order_repo(),
    };
    let outcome = usecase.execute(identity.actor(), order_id).await?;
    Ok(Json(PaymentResponse {
        order: outcome.order.into(),
        message: outcome.message,
    }))
}

// ── GET /orders ──────────────────────────────────────────────────────────────

pub async fn list_my_orders(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderResponse>>, StoreServiceError> {
    let usecase = ListMyOrdersUseCase {
        orders: state.order_repo(),
    };
    let orders = usecase.execute(identity.actor()).await?;
    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

// ── GET /orders/{id} ─────────────────────────────────────────────────────────

pub async fn get_order(
    identity: Identity,
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderDetailResponse>, StoreServiceError> {
    let usecase = GetOrderUseCase {
        orders: state.order_repo(),
        addresses: state.address_repo(),
    };
    let detail = usecase.execute(identity.actor(), order_id).await?;
    Ok(Json(detail.into()))
}
