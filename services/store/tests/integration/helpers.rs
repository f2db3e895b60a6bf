use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use bazaar_domain::order::OrderStatus;
use bazaar_domain::pagination::PageRequest;
use bazaar_domain::user::{Actor, UserRole};
use bazaar_store::domain::repository::{
    AddressRepository, CartRepository, CategoryRepository, DashboardRepository, OrderRepository,
    PasswordHasher, ProductRepository, UserRepository,
};
use bazaar_store::domain::types::{
    Address, CartItem, CartLine, Category, DashboardSummary, Order, OrderDraft, OrderItem,
    Product, ProductFilter, ProductSortBy, User,
};
use bazaar_store::error::StoreServiceError;

// ── InMemoryStore ────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct StoreData {
    pub users: Vec<User>,
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
    pub cart: Vec<CartItem>,
    pub addresses: Vec<Address>,
    pub orders: Vec<Order>,
    pub order_items: Vec<OrderItem>,
    /// Upcoming `place` calls that report an order-number collision.
    pub forced_collisions: u32,
    pub place_attempts: u32,
}

/// One shared in-memory database implementing every repository trait.
///
/// Each operation runs under a single lock, so multi-step writes are atomic
/// the way the sea-orm transactions are.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    pub data: Arc<Mutex<StoreData>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) -> MutexGuard<'_, StoreData> {
        self.data.lock().unwrap()
    }

    pub fn add_user(&self, name: &str, role: UserRole) -> User {
        let user = User {
            id: Uuid::now_v7(),
            name: name.to_owned(),
            email: format!("{}@example.com", name.to_lowercase()),
            password_hash: FakeHasher.hash("secret1").unwrap(),
            role,
            created_at: Utc::now(),
        };
        self.lock().users.push(user.clone());
        user
    }

    pub fn add_category(&self, name: &str) -> Category {
        let category = Category {
            id: Uuid::now_v7(),
            name: name.to_owned(),
            description: None,
        };
        self.lock().categories.push(category.clone());
        category
    }

    pub fn add_product(&self, category: &Category, name: &str, price: Decimal, stock: i32) -> Product {
        let mut data = self.lock();
        // Strictly increasing timestamps keep "newest" ordering deterministic.
        let created_at = Utc::now() + Duration::milliseconds(data.products.len() as i64);
        let product = Product {
            id: Uuid::now_v7(),
            name: name.to_owned(),
            description: None,
            price,
            stock,
            image_url: None,
            featured: false,
            category_id: category.id,
            created_at,
        };
        data.products.push(product.clone());
        product
    }

    pub fn add_address(&self, user: &User, is_default: bool) -> Address {
        let address = Address {
            id: Uuid::now_v7(),
            user_id: user.id,
            address_line1: "12 MG Road".to_owned(),
            address_line2: None,
            city: "Bengaluru".to_owned(),
            state: "Karnataka".to_owned(),
            pincode: "560001".to_owned(),
            phone: "9876543210".to_owned(),
            is_default,
            created_at: Utc::now(),
        };
        self.lock().addresses.push(address.clone());
        address
    }

    pub fn add_cart_item(&self, user: &User, product: &Product, quantity: i32) -> CartItem {
        let item = CartItem {
            id: Uuid::now_v7(),
            user_id: user.id,
            product_id: product.id,
            quantity,
            created_at: Utc::now(),
        };
        self.lock().cart.push(item.clone());
        item
    }

    pub fn product(&self, id: Uuid) -> Option<Product> {
        self.lock().products.iter().find(|p| p.id == id).cloned()
    }

    pub fn address(&self, id: Uuid) -> Option<Address> {
        self.lock().addresses.iter().find(|a| a.id == id).cloned()
    }

    pub fn order(&self, id: Uuid) -> Option<Order> {
        self.lock().orders.iter().find(|o| o.id == id).cloned()
    }

    pub fn cart_of(&self, user_id: Uuid) -> Vec<CartItem> {
        self.lock()
            .cart
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn set_order_status(&self, id: Uuid, status: OrderStatus) {
        if let Some(order) = self.lock().orders.iter_mut().find(|o| o.id == id) {
            order.status = status;
        }
    }
}

fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> chrono::DateTime<Utc>) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreServiceError> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreServiceError> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn create(&self, user: &User) -> Result<(), StoreServiceError> {
        let mut data = self.lock();
        if data.users.iter().any(|u| u.email == user.email) {
            return Err(StoreServiceError::UserAlreadyExists);
        }
        data.users.push(user.clone());
        Ok(())
    }

    async fn set_role(&self, id: Uuid, role: UserRole) -> Result<bool, StoreServiceError> {
        let mut data = self.lock();
        match data.users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.role = role;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_customers(&self) -> Result<Vec<User>, StoreServiceError> {
        let mut users: Vec<User> = self
            .lock()
            .users
            .iter()
            .filter(|u| u.role == UserRole::Customer)
            .cloned()
            .collect();
        newest_first(&mut users, |u| u.created_at);
        Ok(users)
    }
}

impl CategoryRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<Category>, StoreServiceError> {
        let mut categories = self.lock().categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, StoreServiceError> {
        Ok(self.lock().categories.iter().find(|c| c.id == id).cloned())
    }
}

impl ProductRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreServiceError> {
        Ok(self.product(id))
    }

    async fn list_by_category(
        &self,
        category_id: Uuid,
        filter: ProductFilter,
        page: PageRequest,
    ) -> Result<(Vec<Product>, u64), StoreServiceError> {
        let mut matches: Vec<Product> = self
            .lock()
            .products
            .iter()
            .filter(|p| p.category_id == category_id && filter.matches(p))
            .cloned()
            .collect();
        match filter.sort_by {
            ProductSortBy::PriceAsc => matches.sort_by(|a, b| a.price.cmp(&b.price)),
            ProductSortBy::PriceDesc => matches.sort_by(|a, b| b.price.cmp(&a.price)),
            ProductSortBy::Newest => newest_first(&mut matches, |p| p.created_at),
        }
        let total = matches.len() as u64;
        let page = page.clamped();
        let items = matches
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.per_page as usize)
            .collect();
        Ok((items, total))
    }

    async fn list_featured(&self, limit: u64) -> Result<Vec<Product>, StoreServiceError> {
        Ok(self
            .lock()
            .products
            .iter()
            .filter(|p| p.featured)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn list_related(
        &self,
        product: &Product,
        limit: u64,
    ) -> Result<Vec<Product>, StoreServiceError> {
        Ok(self
            .lock()
            .products
            .iter()
            .filter(|p| p.category_id == product.category_id && p.id != product.id)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Product>, StoreServiceError> {
        let mut products = self.lock().products.clone();
        newest_first(&mut products, |p| p.created_at);
        Ok(products)
    }

    async fn create(&self, product: &Product) -> Result<(), StoreServiceError> {
        self.lock().products.push(product.clone());
        Ok(())
    }

    async fn update(&self, product: &Product) -> Result<bool, StoreServiceError> {
        let mut data = self.lock();
        match data.products.iter_mut().find(|p| p.id == product.id) {
            Some(stored) => {
                *stored = product.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreServiceError> {
        let mut data = self.lock();
        if data.order_items.iter().any(|i| i.product_id == id) {
            return Err(StoreServiceError::ProductReferenced);
        }
        if !data.products.iter().any(|p| p.id == id) {
            return Err(StoreServiceError::ProductNotFound);
        }
        data.cart.retain(|c| c.product_id != id);
        data.products.retain(|p| p.id != id);
        Ok(())
    }
}

impl CartRepository for InMemoryStore {
    async fn list_lines(&self, user_id: Uuid) -> Result<Vec<CartLine>, StoreServiceError> {
        let data = self.lock();
        Ok(data
            .cart
            .iter()
            .filter(|c| c.user_id == user_id)
            .filter_map(|item| {
                let product = data.products.iter().find(|p| p.id == item.product_id)?;
                Some(CartLine {
                    item: item.clone(),
                    product: product.clone(),
                })
            })
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CartItem>, StoreServiceError> {
        Ok(self.lock().cart.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_product(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<CartItem>, StoreServiceError> {
        Ok(self
            .lock()
            .cart
            .iter()
            .find(|c| c.user_id == user_id && c.product_id == product_id)
            .cloned())
    }

    async fn insert(&self, item: &CartItem) -> Result<(), StoreServiceError> {
        let mut data = self.lock();
        if data
            .cart
            .iter()
            .any(|c| c.user_id == item.user_id && c.product_id == item.product_id)
        {
            return Err(StoreServiceError::CartChanged);
        }
        data.cart.push(item.clone());
        Ok(())
    }

    async fn compare_and_set_quantity(
        &self,
        id: Uuid,
        from: i32,
        to: i32,
    ) -> Result<bool, StoreServiceError> {
        let mut data = self.lock();
        match data.cart.iter_mut().find(|c| c.id == id && c.quantity == from) {
            Some(item) => {
                item.quantity = to;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreServiceError> {
        let mut data = self.lock();
        let before = data.cart.len();
        data.cart.retain(|c| c.id != id);
        Ok(data.cart.len() < before)
    }
}

impl AddressRepository for InMemoryStore {
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Address>, StoreServiceError> {
        Ok(self
            .lock()
            .addresses
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Address>, StoreServiceError> {
        Ok(self.address(id))
    }

    async fn create(&self, address: &Address) -> Result<(), StoreServiceError> {
        let mut data = self.lock();
        if address.is_default {
            for other in data.addresses.iter_mut().filter(|a| a.user_id == address.user_id) {
                other.is_default = false;
            }
        }
        data.addresses.push(address.clone());
        Ok(())
    }

    async fn update(&self, address: &Address) -> Result<(), StoreServiceError> {
        let mut data = self.lock();
        if !data.addresses.iter().any(|a| a.id == address.id) {
            return Err(StoreServiceError::AddressNotFound);
        }
        if address.is_default {
            for other in data.addresses.iter_mut().filter(|a| a.user_id == address.user_id) {
                other.is_default = false;
            }
        }
        if let Some(stored) = data.addresses.iter_mut().find(|a| a.id == address.id) {
            *stored = address.clone();
        }
        Ok(())
    }

    async fn is_referenced(&self, id: Uuid) -> Result<bool, StoreServiceError> {
        Ok(self.lock().orders.iter().any(|o| o.address_id == id))
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreServiceError> {
        let mut data = self.lock();
        if data.orders.iter().any(|o| o.address_id == id) {
            return Err(StoreServiceError::AddressInUse);
        }
        let before = data.addresses.len();
        data.addresses.retain(|a| a.id != id);
        if data.addresses.len() == before {
            return Err(StoreServiceError::AddressNotFound);
        }
        Ok(())
    }
}

impl OrderRepository for InMemoryStore {
    async fn place(&self, draft: &OrderDraft) -> Result<Order, StoreServiceError> {
        let mut data = self.lock();
        data.place_attempts += 1;
        if data.forced_collisions > 0 {
            data.forced_collisions -= 1;
            return Err(StoreServiceError::OrderNumberTaken);
        }
        if data.orders.iter().any(|o| o.order_number == draft.order_number) {
            return Err(StoreServiceError::OrderNumberTaken);
        }

        // Work on copies and commit only if every line succeeds.
        let mut products = data.products.clone();
        let mut cart = data.cart.clone();
        let mut items = Vec::with_capacity(draft.lines.len());
        for line in &draft.lines {
            let product = products
                .iter_mut()
                .find(|p| p.id == line.product_id && p.stock >= line.quantity)
                .ok_or(StoreServiceError::InsufficientStock)?;
            product.stock -= line.quantity;

            let position = cart
                .iter()
                .position(|c| {
                    c.id == line.cart_item_id
                        && c.user_id == draft.user_id
                        && c.quantity == line.quantity
                })
                .ok_or(StoreServiceError::CartChanged)?;
            cart.remove(position);

            items.push(OrderItem {
                id: Uuid::now_v7(),
                order_id: draft.id,
                product_id: line.product_id,
                product_name: product.name.clone(),
                quantity: line.quantity,
                price: line.price,
            });
        }

        let order = Order {
            id: draft.id,
            order_number: draft.order_number.clone(),
            total_amount: draft.total_amount,
            status: OrderStatus::Pending,
            payment_method: draft.payment_method,
            user_id: draft.user_id,
            address_id: draft.address_id,
            created_at: draft.created_at,
        };
        data.products = products;
        data.cart = cart;
        data.order_items.extend(items);
        data.orders.push(order.clone());
        Ok(order)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, StoreServiceError> {
        Ok(self.order(id))
    }

    async fn list_items(&self, order_id: Uuid) -> Result<Vec<OrderItem>, StoreServiceError> {
        Ok(self
            .lock()
            .order_items
            .iter()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, StoreServiceError> {
        let mut orders: Vec<Order> = self
            .lock()
            .orders
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut orders, |o| o.created_at);
        Ok(orders)
    }

    async fn list(&self, status: Option<OrderStatus>) -> Result<Vec<Order>, StoreServiceError> {
        let mut orders: Vec<Order> = self
            .lock()
            .orders
            .iter()
            .filter(|o| status.is_none_or(|s| o.status == s))
            .cloned()
            .collect();
        newest_first(&mut orders, |o| o.created_at);
        Ok(orders)
    }

    async fn compare_and_set_status(
        &self,
        id: Uuid,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<bool, StoreServiceError> {
        let mut data = self.lock();
        match data.orders.iter_mut().find(|o| o.id == id && o.status == from) {
            Some(order) => {
                order.status = to;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl DashboardRepository for InMemoryStore {
    async fn summary(&self, recent: u64) -> Result<DashboardSummary, StoreServiceError> {
        let data = self.lock();
        let mut recent_orders = data.orders.clone();
        newest_first(&mut recent_orders, |o| o.created_at);
        recent_orders.truncate(recent as usize);
        Ok(DashboardSummary {
            product_count: data.products.len() as u64,
            order_count: data.orders.len() as u64,
            customer_count: data
                .users
                .iter()
                .filter(|u| u.role != UserRole::Admin)
                .count() as u64,
            revenue: data.orders.iter().map(|o| o.total_amount).sum(),
            recent_orders,
        })
    }
}

// ── InterleavedCart ──────────────────────────────────────────────────────────

/// Cart repository that runs `interleave` right after a line is read, standing
/// in for another request touching the same line between read and write.
#[derive(Clone)]
pub struct InterleavedCart {
    pub store: InMemoryStore,
    pub interleave: fn(&InMemoryStore, &CartItem),
}

impl InterleavedCart {
    fn after_read(&self, item: Option<CartItem>) -> Option<CartItem> {
        if let Some(item) = &item {
            (self.interleave)(&self.store, item);
        }
        item
    }
}

impl CartRepository for InterleavedCart {
    async fn list_lines(&self, user_id: Uuid) -> Result<Vec<CartLine>, StoreServiceError> {
        self.store.list_lines(user_id).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CartItem>, StoreServiceError> {
        let item = CartRepository::find_by_id(&self.store, id).await?;
        Ok(self.after_read(item))
    }

    async fn find_by_product(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<CartItem>, StoreServiceError> {
        let item = self.store.find_by_product(user_id, product_id).await?;
        Ok(self.after_read(item))
    }

    async fn insert(&self, item: &CartItem) -> Result<(), StoreServiceError> {
        self.store.insert(item).await
    }

    async fn compare_and_set_quantity(
        &self,
        id: Uuid,
        from: i32,
        to: i32,
    ) -> Result<bool, StoreServiceError> {
        self.store.compare_and_set_quantity(id, from, to).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreServiceError> {
        CartRepository::delete(&self.store, id).await
    }
}

pub fn remove_line(store: &InMemoryStore, item: &CartItem) {
    store.lock().cart.retain(|c| c.id != item.id);
}

pub fn bump_line(store: &InMemoryStore, item: &CartItem) {
    if let Some(line) = store.lock().cart.iter_mut().find(|c| c.id == item.id) {
        line.quantity += 1;
    }
}

// ── FakeHasher ───────────────────────────────────────────────────────────────

/// Reversible stand-in for Argon2 so tests stay fast.
#[derive(Clone, Copy, Default)]
pub struct FakeHasher;

impl PasswordHasher for FakeHasher {
    fn hash(&self, plain: &str) -> Result<String, StoreServiceError> {
        Ok(format!("hashed:{plain}"))
    }

    fn verify(&self, plain: &str, hash: &str) -> bool {
        hash.strip_prefix("hashed:") == Some(plain)
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn actor(user: &User) -> Actor {
    Actor::new(user.id, user.role)
}

pub fn rupees(amount: i64) -> Decimal {
    Decimal::new(amount, 0)
}
