use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_auth_types::identity::Identity;

use crate::domain::types::{CartItem, CartLine};
use crate::error::StoreServiceError;
use crate::state::AppState;
use crate::usecase::cart::{
    AddToCartInput, AddToCartUseCase, Cart, CartUpdate, RemoveCartItemUseCase,
    UpdateCartItemUseCase, ViewCartUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct CartLineResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    #[serde(serialize_with = "bazaar_core::serde::to_money")]
    pub unit_price: Decimal,
    pub quantity: i32,
    #[serde(serialize_with = "bazaar_core::serde::to_money")]
    pub line_total: Decimal,
}

impl From<CartLine> for CartLineResponse {
    fn from(line: CartLine) -> Self {
        let line_total = line.line_total();
        Self {
            id: line.item.id,
            product_id: line.product.id,
            product_name: line.product.name,
            unit_price: line.product.price,
            quantity: line.item.quantity,
            line_total,
        }
    }
}

#[derive(Serialize)]
pub struct CartResponse {
    pub items: Vec<CartLineResponse>,
    #[serde(serialize_with = "bazaar_core::serde::to_money")]
    pub total: Decimal,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        Self {
            items: cart.lines.into_iter().map(Into::into).collect(),
            total: cart.total,
        }
    }
}

#[derive(Serialize)]
pub struct CartItemResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        Self {
            id: item.id,
            product_id: item.product_id,
            quantity: item.quantity,
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CartUpdateResponse {
    Updated { quantity: i32 },
    Clamped { quantity: i32, warning: String },
    Removed,
}

impl From<CartUpdate> for CartUpdateResponse {
    fn from(update: CartUpdate) -> Self {
        match update {
            CartUpdate::Updated { quantity } => Self::Updated { quantity },
            CartUpdate::Clamped {
                quantity,
                available,
            } => Self::Clamped {
                quantity,
                warning: format!("Sorry, only {available} items available in stock"),
            },
            CartUpdate::Removed => Self::Removed,
        }
    }
}

// ── GET /cart ────────────────────────────────────────────────────────────────

pub async fn get_cart(
    identity: Option<Identity>,
    State(state): State<AppState>,
) -> Result<Json<CartResponse>, StoreServiceError> {
    let Some(identity) = identity else {
        return Ok(Json(Cart::empty().into()));
    };
    let usecase = ViewCartUseCase {
        cart: state.cart_repo(),
    };
    let cart = usecase.execute(identity.actor()).await?;
    Ok(Json(cart.into()))
}

// ── POST /cart/items ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AddToCartRequest {
    pub product_id: Uuid,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

pub async fn add_cart_item(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<AddToCartRequest>,
) -> Result<(StatusCode, Json<CartItemResponse>), StoreServiceError> {
    let usecase = AddToCartUseCase {
        cart: state.cart_repo(),
        products: state.product_repo(),
    };
    let item = usecase
        .execute(
            identity.actor(),
            AddToCartInput {
                product_id: body.product_id,
                quantity: body.quantity,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(item.into())))
}

// ── PATCH /cart/items/{id} ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateCartItemRequest {
    pub quantity: i32,
}

pub async fn update_cart_item(
    identity: Identity,
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(body): Json<UpdateCartItemRequest>,
) -> Result<Json<CartUpdateResponse>, StoreServiceError> {
    let usecase = UpdateCartItemUseCase {
        cart: state.cart_repo(),
        products: state.product_repo(),
    };
    let update = usecase
        .execute(identity.actor(), item_id, body.quantity)
        .await?;
    Ok(Json(update.into()))
}

// ── DELETE /cart/items/{id} ──────────────────────────────────────────────────

pub async fn remove_cart_item(
    identity: Identity,
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> Result<StatusCode, StoreServiceError> {
    let usecase = RemoveCartItemUseCase {
        cart: state.cart_repo(),
    };
    usecase.execute(identity.actor(), item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
