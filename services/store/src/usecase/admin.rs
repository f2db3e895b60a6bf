use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use bazaar_domain::order::OrderStatus;
use bazaar_domain::user::Actor;

use crate::domain::repository::{
    AddressRepository, CategoryRepository, DashboardRepository, OrderRepository,
    ProductRepository, UserRepository,
};
use crate::domain::types::{
    CustomerDetail, DashboardSummary, Order, OrderDetail, Product, User,
};
use crate::error::StoreServiceError;
use crate::usecase::checkout::load_detail;

/// Orders shown on the dashboard.
pub const RECENT_ORDERS: u64 = 5;

const MAX_PRODUCT_NAME_LEN: usize = 100;
const MAX_IMAGE_URL_LEN: usize = 500;

// ── Dashboard ────────────────────────────────────────────────────────────────

pub struct DashboardUseCase<D: DashboardRepository> {
    pub dashboard: D,
}

impl<D: DashboardRepository> DashboardUseCase<D> {
    pub async fn execute(&self, actor: Actor) -> Result<DashboardSummary, StoreServiceError> {
        actor.ensure_admin()?;
        self.dashboard.summary(RECENT_ORDERS).await
    }
}

// ── Products ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub image_url: Option<String>,
    pub category_id: Uuid,
    pub featured: bool,
}

impl ProductInput {
    fn validate(&self) -> Result<(), StoreServiceError> {
        let name_len = self.name.trim().chars().count();
        if name_len == 0 || name_len > MAX_PRODUCT_NAME_LEN {
            return Err(StoreServiceError::validation(
                "name must be 1 to 100 characters",
            ));
        }
        if self.price.is_sign_negative() {
            return Err(StoreServiceError::validation("price must not be negative"));
        }
        if self.stock < 0 {
            return Err(StoreServiceError::validation("stock must not be negative"));
        }
        if self
            .image_url
            .as_ref()
            .is_some_and(|url| url.chars().count() > MAX_IMAGE_URL_LEN)
        {
            return Err(StoreServiceError::validation(
                "image_url must be at most 500 characters",
            ));
        }
        Ok(())
    }

    fn apply(self, product: &mut Product) {
        product.name = self.name.trim().to_owned();
        product.description = self.description.filter(|d| !d.trim().is_empty());
        product.price = self.price.round_dp(2);
        product.stock = self.stock;
        product.image_url = self.image_url.filter(|url| !url.trim().is_empty());
        product.category_id = self.category_id;
        product.featured = self.featured;
    }
}

pub struct AdminListProductsUseCase<P: ProductRepository> {
    pub products: P,
}

impl<P: ProductRepository> AdminListProductsUseCase<P> {
    pub async fn execute(&self, actor: Actor) -> Result<Vec<Product>, StoreServiceError> {
        actor.ensure_admin()?;
        self.products.list_all().await
    }
}

pub struct CreateProductUseCase<C: CategoryRepository, P: ProductRepository> {
    pub categories: C,
    pub products: P,
}

impl<C: CategoryRepository, P: ProductRepository> CreateProductUseCase<C, P> {
    pub async fn execute(
        &self,
        actor: Actor,
        input: ProductInput,
    ) -> Result<Product, StoreServiceError> {
        actor.ensure_admin()?;
        input.validate()?;
        if self.categories.find_by_id(input.category_id).await?.is_none() {
            return Err(StoreServiceError::CategoryNotFound);
        }
        let mut product = Product {
            id: Uuid::now_v7(),
            name: String::new(),
            description: None,
            price: Decimal::ZERO,
            stock: 0,
            image_url: None,
            featured: false,
            category_id: input.category_id,
            created_at: Utc::now(),
        };
        input.apply(&mut product);
        self.products.create(&product).await?;
        tracing::info!(product_id = %product.id, "product created");
        Ok(product)
    }
}

pub struct UpdateProductUseCase<C: CategoryRepository, P: ProductRepository> {
    pub categories: C,
    pub products: P,
}

impl<C: CategoryRepository, P: ProductRepository> UpdateProductUseCase<C, P> {
    pub async fn execute(
        &self,
        actor: Actor,
        product_id: Uuid,
        input: ProductInput,
    ) -> Result<Product, StoreServiceError> {
        actor.ensure_admin()?;
        let mut product = self
            .products
            .find_by_id(product_id)
            .await?
            .ok_or(StoreServiceError::ProductNotFound)?;
        input.validate()?;
        if self.categories.find_by_id(input.category_id).await?.is_none() {
            return Err(StoreServiceError::CategoryNotFound);
        }
        input.apply(&mut product);
        if !self.products.update(&product).await? {
            return Err(StoreServiceError::ProductNotFound);
        }
        Ok(product)
    }
}

pub struct DeleteProductUseCase<P: ProductRepository> {
    pub products: P,
}

impl<P: ProductRepository> DeleteProductUseCase<P> {
    pub async fn execute(&self, actor: Actor, product_id: Uuid) -> Result<(), StoreServiceError> {
        actor.ensure_admin()?;
        let product = self
            .products
            .find_by_id(product_id)
            .await?
            .ok_or(StoreServiceError::ProductNotFound)?;
        self.products.delete(product.id).await?;
        tracing::info!(product_id = %product.id, "product deleted");
        Ok(())
    }
}

// ── Orders ───────────────────────────────────────────────────────────────────

pub struct AdminListOrdersUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> AdminListOrdersUseCase<O> {
    /// All orders, newest first. `status` must be an exact status literal.
    pub async fn execute(
        &self,
        actor: Actor,
        status: Option<&str>,
    ) -> Result<Vec<Order>, StoreServiceError> {
        actor.ensure_admin()?;
        let status = status
            .map(|s| OrderStatus::parse(s).ok_or(StoreServiceError::InvalidStatus))
            .transpose()?;
        self.orders.list(status).await
    }
}

pub struct AdminGetOrderUseCase<O: OrderRepository, A: AddressRepository> {
    pub orders: O,
    pub addresses: A,
}

impl<O: OrderRepository, A: AddressRepository> AdminGetOrderUseCase<O, A> {
    pub async fn execute(
        &self,
        actor: Actor,
        order_id: Uuid,
    ) -> Result<OrderDetail, StoreServiceError> {
        actor.ensure_admin()?;
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or(StoreServiceError::OrderNotFound)?;
        load_detail(&self.orders, &self.addresses, order).await
    }
}

pub struct UpdateOrderStatusUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> UpdateOrderStatusUseCase<O> {
    /// Move an order along its lifecycle. Setting the current status is a no-op.
    pub async fn execute(
        &self,
        actor: Actor,
        order_id: Uuid,
        status: &str,
    ) -> Result<Order, StoreServiceError> {
        actor.ensure_admin()?;
        let target = match OrderStatus::parse(status) {
            Some(OrderStatus::Pending) | None => return Err(StoreServiceError::InvalidStatus),
            Some(target) => target,
        };
        let mut order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or(StoreServiceError::OrderNotFound)?;
        if order.status == target {
            return Ok(order);
        }
        if !order.status.can_transition_to(target) {
            return Err(StoreServiceError::InvalidStatus);
        }
        let swapped = self
            .orders
            .compare_and_set_status(order.id, order.status, target)
            .await?;
        if !swapped {
            return Err(StoreServiceError::InvalidStatus);
        }
        tracing::info!(
            order_id = %order.id,
            from = %order.status,
            to = %target,
            admin_id = %actor.user_id,
            "order status updated"
        );
        order.status = target;
        Ok(order)
    }
}

// ── Users ────────────────────────────────────────────────────────────────────

pub struct ListCustomersUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> ListCustomersUseCase<U> {
    pub async fn execute(&self, actor: Actor) -> Result<Vec<User>, StoreServiceError> {
        actor.ensure_admin()?;
        self.users.list_customers().await
    }
}

pub struct GetCustomerUseCase<U: UserRepository, O: OrderRepository, A: AddressRepository> {
    pub users: U,
    pub orders: O,
    pub addresses: A,
}

impl<U: UserRepository, O: OrderRepository, A: AddressRepository> GetCustomerUseCase<U, O, A> {
    pub async fn execute(
        &self,
        actor: Actor,
        user_id: Uuid,
    ) -> Result<CustomerDetail, StoreServiceError> {
        actor.ensure_admin()?;
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(StoreServiceError::UserNotFound)?;
        let orders = self.orders.list_by_user(user.id).await?;
        let addresses = self.addresses.list_by_user(user.id).await?;
        Ok(CustomerDetail {
            user,
            orders,
            addresses,
        })
    }
}
