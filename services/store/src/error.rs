use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use bazaar_domain::user::AccessDenied;

/// Store service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum StoreServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("invalid PIN code")]
    InvalidPincode,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("forbidden")]
    Forbidden,
    #[error("product not found")]
    ProductNotFound,
    #[error("category not found")]
    CategoryNotFound,
    #[error("cart item not found")]
    CartItemNotFound,
    #[error("order not found")]
    OrderNotFound,
    #[error("address not found")]
    AddressNotFound,
    #[error("user not found")]
    UserNotFound,
    #[error("user already exists")]
    UserAlreadyExists,
    #[error("insufficient stock")]
    InsufficientStock,
    #[error("cart is empty")]
    EmptyCart,
    #[error("no saved address")]
    NoAddress,
    #[error("address is used by an order")]
    AddressInUse,
    #[error("product is referenced by an order")]
    ProductReferenced,
    #[error("invalid order status")]
    InvalidStatus,
    #[error("payment already processed")]
    PaymentAlreadyProcessed,
    #[error("cart changed during checkout")]
    CartChanged,
    #[error("order number already taken")]
    OrderNumberTaken,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl StoreServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::InvalidPincode => "INVALID_PINCODE",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Forbidden => "FORBIDDEN",
            Self::ProductNotFound => "PRODUCT_NOT_FOUND",
            Self::CategoryNotFound => "CATEGORY_NOT_FOUND",
            Self::CartItemNotFound => "CART_ITEM_NOT_FOUND",
            Self::OrderNotFound => "ORDER_NOT_FOUND",
            Self::AddressNotFound => "ADDRESS_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::UserAlreadyExists => "USER_ALREADY_EXISTS",
            Self::InsufficientStock => "INSUFFICIENT_STOCK",
            Self::EmptyCart => "EMPTY_CART",
            Self::NoAddress => "NO_ADDRESS",
            Self::AddressInUse => "ADDRESS_IN_USE",
            Self::ProductReferenced => "PRODUCT_REFERENCED",
            Self::InvalidStatus => "INVALID_STATUS",
            Self::PaymentAlreadyProcessed => "PAYMENT_ALREADY_PROCESSED",
            Self::CartChanged => "CART_CHANGED",
            Self::OrderNumberTaken => "ORDER_NUMBER_TAKEN",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidPincode => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::ProductNotFound
            | Self::CategoryNotFound
            | Self::CartItemNotFound
            | Self::OrderNotFound
            | Self::AddressNotFound
            | Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::UserAlreadyExists
            | Self::InsufficientStock
            | Self::EmptyCart
            | Self::NoAddress
            | Self::AddressInUse
            | Self::ProductReferenced
            | Self::InvalidStatus
            | Self::PaymentAlreadyProcessed
            | Self::CartChanged
            | Self::OrderNumberTaken => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AccessDenied> for StoreServiceError {
    fn from(_: AccessDenied) -> Self {
        Self::Forbidden
    }
}

impl IntoResponse for StoreServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
