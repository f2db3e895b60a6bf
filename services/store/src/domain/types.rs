use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use bazaar_domain::order::{OrderStatus, PaymentMethod};
use bazaar_domain::user::UserRole;

/// Storefront account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub image_url: Option<String>,
    pub featured: bool,
    pub category_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Sort options for category product listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductSortBy {
    #[default]
    PriceAsc,
    PriceDesc,
    Newest,
}

impl ProductSortBy {
    pub fn from_kebab_case(s: &str) -> Option<Self> {
        match s {
            "price-asc" => Some(Self::PriceAsc),
            "price-desc" => Some(Self::PriceDesc),
            "newest" => Some(Self::Newest),
            _ => None,
        }
    }
}

/// Inclusive price bounds plus ordering for a category listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductFilter {
    pub min_price: Decimal,
    pub max_price: Decimal,
    pub sort_by: ProductSortBy,
}

pub const DEFAULT_MIN_PRICE: Decimal = Decimal::ZERO;
pub const DEFAULT_MAX_PRICE: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            min_price: DEFAULT_MIN_PRICE,
            max_price: DEFAULT_MAX_PRICE,
            sort_by: ProductSortBy::default(),
        }
    }
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        product.price >= self.min_price && product.price <= self.max_price
    }
}

/// One line in a user's cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

/// A cart line joined with its product.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub item: CartItem,
    pub product: Product,
}

impl CartLine {
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.item.quantity)
    }
}

pub fn cart_total(lines: &[CartLine]) -> Decimal {
    lines.iter().map(CartLine::line_total).sum()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub id: Uuid,
    pub user_id: Uuid,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub phone: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub user_id: Uuid,
    pub address_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Order line with the unit price frozen at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub price: Decimal,
}

impl OrderItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// An order with its lines and shipping address.
#[derive(Debug, Clone)]
pub struct OrderDetail {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub address: Option<Address>,
}

/// Everything the store needs to place an order atomically.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub id: Uuid,
    pub order_number: String,
    pub user_id: Uuid,
    pub address_id: Uuid,
    pub payment_method: PaymentMethod,
    pub total_amount: Decimal,
    pub lines: Vec<DraftLine>,
    pub created_at: DateTime<Utc>,
}

/// Snapshot of one cart line taken at checkout.
#[derive(Debug, Clone)]
pub struct DraftLine {
    pub cart_item_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: Decimal,
}

#[derive(Debug, Clone)]
pub struct DashboardSummary {
    pub product_count: u64,
    pub order_count: u64,
    pub customer_count: u64,
    pub revenue: Decimal,
    pub recent_orders: Vec<Order>,
}

/// A customer with their order history and saved addresses.
#[derive(Debug, Clone)]
pub struct CustomerDetail {
    pub user: User,
    pub orders: Vec<Order>,
    pub addresses: Vec<Address>,
}
