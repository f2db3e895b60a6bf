use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use bazaar_domain::user::Actor;

use crate::domain::repository::{CartRepository, ProductRepository};
use crate::domain::types::{CartItem, CartLine, cart_total};
use crate::error::StoreServiceError;

// ── ViewCart ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Cart {
    pub lines: Vec<CartLine>,
    pub total: Decimal,
}

impl Cart {
    pub fn empty() -> Self {
        Self {
            lines: Vec::new(),
            total: Decimal::ZERO,
        }
    }
}

pub struct ViewCartUseCase<C: CartRepository> {
    pub cart: C,
}

impl<C: CartRepository> ViewCartUseCase<C> {
    pub async fn execute(&self, actor: Actor) -> Result<Cart, StoreServiceError> {
        let lines = self.cart.list_lines(actor.user_id).await?;
        let total = cart_total(&lines);
        Ok(Cart { lines, total })
    }
}

// ── AddToCart ────────────────────────────────────────────────────────────────

pub struct AddToCartInput {
    pub product_id: Uuid,
    pub quantity: i32,
}

pub struct AddToCartUseCase<C: CartRepository, P: ProductRepository> {
    pub cart: C,
    pub products: P,
}

impl<C: CartRepository, P: ProductRepository> AddToCartUseCase<C, P> {
    /// Add to the cart, merging into an existing line for the same product.
    pub async fn execute(
        &self,
        actor: Actor,
        input: AddToCartInput,
    ) -> Result<CartItem, StoreServiceError> {
        if input.quantity <= 0 {
            return Err(StoreServiceError::validation("quantity must be at least 1"));
        }
        let product = self
            .products
            .find_by_id(input.product_id)
            .await?
            .ok_or(StoreServiceError::ProductNotFound)?;

        let existing = self
            .cart
            .find_by_product(actor.user_id, product.id)
            .await?;
        let current = existing.as_ref().map_or(0, |item| item.quantity);
        let combined = current
            .checked_add(input.quantity)
            .ok_or(StoreServiceError::InsufficientStock)?;
        if combined > product.stock {
            return Err(StoreServiceError::InsufficientStock);
        }

        match existing {
            Some(mut item) => {
                // Another request changed or removed the line since it was read.
                if !self
                    .cart
                    .compare_and_set_quantity(item.id, item.quantity, combined)
                    .await?
                {
                    return Err(StoreServiceError::CartChanged);
                }
                item.quantity = combined;
                Ok(item)
            }
            None => {
                let item = CartItem {
                    id: Uuid::now_v7(),
                    user_id: actor.user_id,
                    product_id: product.id,
                    quantity: combined,
                    created_at: Utc::now(),
                };
                self.cart.insert(&item).await?;
                Ok(item)
            }
        }
    }
}

// ── UpdateCartItem ───────────────────────────────────────────────────────────

/// Outcome of a cart quantity update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartUpdate {
    Updated { quantity: i32 },
    /// Requested more than in stock; the line now holds `quantity`.
    /// A `quantity` of 0 means the line was removed.
    Clamped { quantity: i32, available: i32 },
    Removed,
}

pub struct UpdateCartItemUseCase<C: CartRepository, P: ProductRepository> {
    pub cart: C,
    pub products: P,
}

impl<C: CartRepository, P: ProductRepository> UpdateCartItemUseCase<C, P> {
    pub async fn execute(
        &self,
        actor: Actor,
        item_id: Uuid,
        quantity: i32,
    ) -> Result<CartUpdate, StoreServiceError> {
        let item = self
            .cart
            .find_by_id(item_id)
            .await?
            .ok_or(StoreServiceError::CartItemNotFound)?;
        actor.ensure_owner(item.user_id)?;

        if quantity <= 0 {
            if !self.cart.delete(item.id).await? {
                return Err(StoreServiceError::CartItemNotFound);
            }
            return Ok(CartUpdate::Removed);
        }

        let product = self
            .products
            .find_by_id(item.product_id)
            .await?
            .ok_or(StoreServiceError::ProductNotFound)?;

        if quantity <= product.stock {
            if !self
                .cart
                .compare_and_set_quantity(item.id, item.quantity, quantity)
                .await?
            {
                return Err(StoreServiceError::CartChanged);
            }
            return Ok(CartUpdate::Updated { quantity });
        }

        let available = product.stock.max(0);
        let applied = if available == 0 {
            self.cart.delete(item.id).await?
        } else {
            self.cart
                .compare_and_set_quantity(item.id, item.quantity, available)
                .await?
        };
        if !applied {
            return Err(StoreServiceError::CartChanged);
        }
        tracing::debug!(
            cart_item_id = %item.id,
            requested = quantity,
            available,
            "clamped cart quantity to stock"
        );
        Ok(CartUpdate::Clamped {
            quantity: available,
            available,
        })
    }
}

// ── RemoveCartItem ───────────────────────────────────────────────────────────

pub struct RemoveCartItemUseCase<C: CartRepository> {
    pub cart: C,
}

impl<C: CartRepository> RemoveCartItemUseCase<C> {
    pub async fn execute(&self, actor: Actor, item_id: Uuid) -> Result<(), StoreServiceError> {
        let item = self
            .cart
            .find_by_id(item_id)
            .await?
            .ok_or(StoreServiceError::CartItemNotFound)?;
        actor.ensure_owner(item.user_id)?;
        if !self.cart.delete(item.id).await? {
            return Err(StoreServiceError::CartItemNotFound);
        }
        Ok(())
    }
}
