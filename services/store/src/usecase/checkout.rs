use chrono::Utc;
use rand::RngExt;
use uuid::Uuid;

use bazaar_domain::order::{OrderStatus, PaymentMethod};
use bazaar_domain::user::Actor;

use crate::domain::repository::{AddressRepository, CartRepository, OrderRepository};
use crate::domain::types::{DraftLine, Order, OrderDetail, OrderDraft, cart_total};
use crate::error::StoreServiceError;

pub const ORDER_NUMBER_LEN: usize = 10;
const ORDER_NUMBER_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Placement attempts before a run of order-number collisions is treated as a fault.
pub const MAX_PLACE_ATTEMPTS: u32 = 5;

/// Random order number over `A-Z0-9`.
pub fn generate_order_number() -> String {
    let mut rng = rand::rng();
    (0..ORDER_NUMBER_LEN)
        .map(|_| ORDER_NUMBER_CHARSET[rng.random_range(0..ORDER_NUMBER_CHARSET.len())] as char)
        .collect()
}

// ── Checkout ─────────────────────────────────────────────────────────────────

pub struct CheckoutInput {
    pub address_id: Uuid,
    pub payment_method: String,
}

pub struct CheckoutUseCase<C: CartRepository, A: AddressRepository, O: OrderRepository> {
    pub cart: C,
    pub addresses: A,
    pub orders: O,
}

impl<C: CartRepository, A: AddressRepository, O: OrderRepository> CheckoutUseCase<C, A, O> {
    /// Turn the actor's cart into a `Pending` order.
    pub async fn execute(
        &self,
        actor: Actor,
        input: CheckoutInput,
    ) -> Result<Order, StoreServiceError> {
        let lines = self.cart.list_lines(actor.user_id).await?;
        if lines.is_empty() {
            return Err(StoreServiceError::EmptyCart);
        }
        if self.addresses.list_by_user(actor.user_id).await?.is_empty() {
            return Err(StoreServiceError::NoAddress);
        }
        let address = self
            .addresses
            .find_by_id(input.address_id)
            .await?
            .ok_or(StoreServiceError::AddressNotFound)?;
        actor.ensure_owner(address.user_id)?;
        let payment_method = PaymentMethod::parse(&input.payment_method)
            .ok_or_else(|| StoreServiceError::validation("unsupported payment method"))?;

        let total_amount = cart_total(&lines);
        let draft_lines: Vec<DraftLine> = lines
            .iter()
            .map(|line| DraftLine {
                cart_item_id: line.item.id,
                product_id: line.product.id,
                quantity: line.item.quantity,
                price: line.product.price,
            })
            .collect();

        for attempt in 1..=MAX_PLACE_ATTEMPTS {
            let draft = OrderDraft {
                id: Uuid::now_v7(),
                order_number: generate_order_number(),
                user_id: actor.user_id,
                address_id: address.id,
                payment_method,
                total_amount,
                lines: draft_lines.clone(),
                created_at: Utc::now(),
            };
            match self.orders.place(&draft).await {
                Ok(order) => {
                    tracing::info!(
                        order_id = %order.id,
                        order_number = %order.order_number,
                        user_id = %actor.user_id,
                        total = %order.total_amount,
                        "order placed"
                    );
                    return Ok(order);
                }
                Err(StoreServiceError::OrderNumberTaken) => {
                    tracing::warn!(attempt, "order number collision, retrying");
                }
                Err(e) => return Err(e),
            }
        }
        Err(anyhow::anyhow!("order number collided {MAX_PLACE_ATTEMPTS} times").into())
    }
}

// ── PayOrder ─────────────────────────────────────────────────────────────────

pub struct PaymentOutcome {
    pub order: Order,
    pub message: &'static str,
}

pub struct PayOrderUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> PayOrderUseCase<O> {
    /// Accept payment for a `Pending` order and move it to `Processing`.
    pub async fn execute(
        &self,
        actor: Actor,
        order_id: Uuid,
    ) -> Result<PaymentOutcome, StoreServiceError> {
        let mut order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or(StoreServiceError::OrderNotFound)?;
        actor.ensure_owner(order.user_id)?;
        if order.status != OrderStatus::Pending {
            return Err(StoreServiceError::PaymentAlreadyProcessed);
        }
        let swapped = self
            .orders
            .compare_and_set_status(order.id, OrderStatus::Pending, OrderStatus::Processing)
            .await?;
        if !swapped {
            return Err(StoreServiceError::PaymentAlreadyProcessed);
        }
        order.status = OrderStatus::Processing;
        let message = order.payment_method.confirmation_message();
        Ok(PaymentOutcome { order, message })
    }
}

// ── ListMyOrders ─────────────────────────────────────────────────────────────

pub struct ListMyOrdersUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> ListMyOrdersUseCase<O> {
    pub async fn execute(&self, actor: Actor) -> Result<Vec<Order>, StoreServiceError> {
        self.orders.list_by_user(actor.user_id).await
    }
}

// ── GetOrder ─────────────────────────────────────────────────────────────────

pub struct GetOrderUseCase<O: OrderRepository, A: AddressRepository> {
    pub orders: O,
    pub addresses: A,
}

impl<O: OrderRepository, A: AddressRepository> GetOrderUseCase<O, A> {
    /// Order detail for its owner or any admin.
    pub async fn execute(
        &self,
        actor: Actor,
        order_id: Uuid,
    ) -> Result<OrderDetail, StoreServiceError> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or(StoreServiceError::OrderNotFound)?;
        actor.ensure_owner_or_admin(order.user_id)?;
        load_detail(&self.orders, &self.addresses, order).await
    }
}

pub(crate) async fn load_detail<O: OrderRepository, A: AddressRepository>(
    orders: &O,
    addresses: &A,
    order: Order,
) -> Result<OrderDetail, StoreServiceError> {
    let items = orders.list_items(order.id).await?;
    let address = addresses.find_by_id(order.address_id).await?;
    Ok(OrderDetail {
        order,
        items,
        address,
    })
}
