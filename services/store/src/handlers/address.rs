use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_auth_types::identity::Identity;

use crate::domain::types::Address;
use crate::error::StoreServiceError;
use crate::state::AppState;
use crate::usecase::address::{
    AddressInput, CreateAddressUseCase, DeleteAddressUseCase, ListAddressesUseCase,
    UpdateAddressUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct AddressResponse {
    pub id: Uuid,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub phone: String,
    pub is_default: bool,
    #[serde(serialize_with = "bazaar_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Address> for AddressResponse {
    fn from(address: Address) -> Self {
        Self {
            id: address.id,
            address_line1: address.address_line1,
            address_line2: address.address_line2,
            city: address.city,
            state: address.state,
            pincode: address.pincode,
            phone: address.phone,
            is_default: address.is_default,
            created_at: address.created_at,
        }
    }
}

// ── Request body ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AddressRequest {
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub phone: String,
    #[serde(default)]
    pub is_default: bool,
}

impl From<AddressRequest> for AddressInput {
    fn from(body: AddressRequest) -> Self {
        Self {
            address_line1: body.address_line1,
            address_line2: body.address_line2,
            city: body.city,
            state: body.state,
            pincode: body.pincode,
            phone: body.phone,
            is_default: body.is_default,
        }
    }
}

// ── GET /addresses ───────────────────────────────────────────────────────────

pub async fn list_addresses(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<AddressResponse>>, StoreServiceError> {
    let usecase = ListAddressesUseCase {
        addresses: state.address_repo(),
    };
    let addresses = usecase.execute(identity.actor()).await?;
    Ok(Json(addresses.into_iter().map(Into::into).collect()))
}

// ── POST /addresses ──────────────────────────────────────────────────────────

pub async fn create_address(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<AddressRequest>,
) -> Result<(StatusCode, Json<AddressResponse>), StoreServiceError> {
    let usecase = CreateAddressUseCase {
        addresses: state.address_repo(),
    };
    let address = usecase.execute(identity.actor(), body.into()).await?;
    Ok((StatusCode::CREATED, Json(address.into())))
}

// ── PUT /addresses/{id} ──────────────────────────────────────────────────────

pub async fn update_address(
    identity: Identity,
    State(state): State<AppState>,
    Path(address_id): Path<Uuid>,
    Json(body): Json<AddressRequest>,
) -> Result<Json<AddressResponse>, StoreServiceError> {
    let usecase = UpdateAddressUseCase {
        addresses: state.address_repo(),
    };
    let address = usecase
        .execute(identity.actor(), address_id, body.into())
        .await?;
    Ok(Json(address.into()))
}

// ── DELETE /addresses/{id} ───────────────────────────────────────────────────

pub async fn delete_address(
    identity: Identity,
    State(state): State<AppState>,
    Path(address_id): Path<Uuid>,
) -> Result<StatusCode, StoreServiceError> {
    let usecase = DeleteAddressUseCase {
        addresses: state.address_repo(),
    };
    usecase.execute(identity.actor(), address_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
