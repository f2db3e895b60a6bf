#![allow(async_fn_in_trait)]

use uuid::Uuid;

use bazaar_domain::order::OrderStatus;
use bazaar_domain::pagination::PageRequest;
use bazaar_domain::user::UserRole;

use crate::domain::types::{
    Address, CartItem, CartLine, Category, DashboardSummary, Order, OrderDraft, OrderItem,
    Product, ProductFilter, User,
};
use crate::error::StoreServiceError;

/// Repository for storefront accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreServiceError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreServiceError>;

    /// Insert a new user. A taken email yields `UserAlreadyExists`.
    async fn create(&self, user: &User) -> Result<(), StoreServiceError>;

    /// Change a user's role. Returns `true` if a row was updated.
    async fn set_role(&self, id: Uuid, role: UserRole) -> Result<bool, StoreServiceError>;

    /// All users with the customer role, newest first.
    async fn list_customers(&self) -> Result<Vec<User>, StoreServiceError>;
}

pub trait CategoryRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Category>, StoreServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, StoreServiceError>;
}

/// Repository for catalog products.
pub trait ProductRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreServiceError>;

    /// One page of a category's products plus the total match count.
    async fn list_by_category(
        &self,
        category_id: Uuid,
        filter: ProductFilter,
        page: PageRequest,
    ) -> Result<(Vec<Product>, u64), StoreServiceError>;

    async fn list_featured(&self, limit: u64) -> Result<Vec<Product>, StoreServiceError>;

    /// Products in the same category as `product`, excluding it.
    async fn list_related(
        &self,
        product: &Product,
        limit: u64,
    ) -> Result<Vec<Product>, StoreServiceError>;

    /// Every product, newest first.
    async fn list_all(&self) -> Result<Vec<Product>, StoreServiceError>;

    async fn create(&self, product: &Product) -> Result<(), StoreServiceError>;

    /// Overwrite the editable fields. Returns `true` if a row was updated.
    async fn update(&self, product: &Product) -> Result<bool, StoreServiceError>;

    /// Delete a product and every cart line pointing at it, atomically.
    ///
    /// Fails with `ProductReferenced` when an order item references it, and
    /// leaves both the product and carts untouched in that case.
    async fn delete(&self, id: Uuid) -> Result<(), StoreServiceError>;
}

/// Repository for cart lines.
pub trait CartRepository: Send + Sync {
    /// A user's cart lines joined with their products, oldest first.
    async fn list_lines(&self, user_id: Uuid) -> Result<Vec<CartLine>, StoreServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CartItem>, StoreServiceError>;

    async fn find_by_product(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<CartItem>, StoreServiceError>;

    async fn insert(&self, item: &CartItem) -> Result<(), StoreServiceError>;

    /// Set `to` only if the stored quantity is still `from`. Returns `true` on success.
    async fn compare_and_set_quantity(
        &self,
        id: Uuid,
        from: i32,
        to: i32,
    ) -> Result<bool, StoreServiceError>;

    /// Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreServiceError>;
}

/// Repository for saved shipping addresses.
pub trait AddressRepository: Send + Sync {
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Address>, StoreServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Address>, StoreServiceError>;

    /// Insert an address. When it is the default, the user's other defaults
    /// are cleared in the same transaction.
    async fn create(&self, address: &Address) -> Result<(), StoreServiceError>;

    /// Overwrite an address, with the same default handling as `create`.
    async fn update(&self, address: &Address) -> Result<(), StoreServiceError>;

    /// Whether any order ships to this address.
    async fn is_referenced(&self, id: Uuid) -> Result<bool, StoreServiceError>;

    /// Delete an address. A referencing order yields `AddressInUse`.
    async fn delete(&self, id: Uuid) -> Result<(), StoreServiceError>;
}

/// Repository for orders and their lines.
pub trait OrderRepository: Send + Sync {
    /// Persist `draft` in one transaction: insert the order and its items,
    /// decrement stock conditionally, and clear the consumed cart lines.
    ///
    /// Errors: `OrderNumberTaken` on a number collision, `InsufficientStock`
    /// when a conditional decrement matches no row, `CartChanged` when a
    /// cart line disappeared mid-flight. Nothing is written on error.
    async fn place(&self, draft: &OrderDraft) -> Result<Order, StoreServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, StoreServiceError>;

    async fn list_items(&self, order_id: Uuid) -> Result<Vec<OrderItem>, StoreServiceError>;

    /// A user's orders, newest first.
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, StoreServiceError>;

    /// All orders, newest first, optionally filtered by status.
    async fn list(&self, status: Option<OrderStatus>) -> Result<Vec<Order>, StoreServiceError>;

    /// Set `to` only if the stored status is still `from`. Returns `true` on success.
    async fn compare_and_set_status(
        &self,
        id: Uuid,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<bool, StoreServiceError>;
}

/// Aggregate counts for the admin dashboard.
pub trait DashboardRepository: Send + Sync {
    async fn summary(&self, recent: u64) -> Result<DashboardSummary, StoreServiceError>;
}

/// Password hashing port.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plain: &str) -> Result<String, StoreServiceError>;

    /// Constant-time check of `plain` against a stored PHC string.
    fn verify(&self, plain: &str, hash: &str) -> bool;
}
