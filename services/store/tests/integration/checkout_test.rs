use bazaar_domain::order::OrderStatus;
use bazaar_domain::user::UserRole;
use bazaar_store::domain::types::{Address, Product, User};
use bazaar_store::error::StoreServiceError;
use bazaar_store::usecase::checkout::{
    CheckoutInput, CheckoutUseCase, GetOrderUseCase, ListMyOrdersUseCase, MAX_PLACE_ATTEMPTS,
    PayOrderUseCase,
};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::helpers::{InMemoryStore, actor, rupees};

type Checkout = CheckoutUseCase<InMemoryStore, InMemoryStore, InMemoryStore>;

fn checkout_usecase(store: &InMemoryStore) -> Checkout {
    CheckoutUseCase {
        cart: store.clone(),
        addresses: store.clone(),
        orders: store.clone(),
    }
}

fn input(address: &Address, payment_method: &str) -> CheckoutInput {
    CheckoutInput {
        address_id: address.id,
        payment_method: payment_method.to_owned(),
    }
}

/// A customer with one address and a two-line cart totalling 1,250.
fn shopper(store: &InMemoryStore) -> (User, Address, Product, Product) {
    let user = store.add_user("Asha", UserRole::Customer);
    let address = store.add_address(&user, true);
    let books = store.add_category("Books");
    let novel = store.add_product(&books, "Novel", rupees(250), 5);
    let atlas = store.add_product(&books, "Atlas", rupees(750), 2);
    store.add_cart_item(&user, &novel, 2);
    store.add_cart_item(&user, &atlas, 1);
    (user, address, novel, atlas)
}

#[tokio::test]
async fn should_place_pending_order_from_cart() {
    let store = InMemoryStore::new();
    let (user, address, novel, atlas) = shopper(&store);

    let order = checkout_usecase(&store)
        .execute(actor(&user), input(&address, "upi"))
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total_amount, rupees(1250));
    assert_eq!(order.order_number.len(), 10);
    assert_eq!(order.address_id, address.id);
    assert!(store.cart_of(user.id).is_empty());
    assert_eq!(store.product(novel.id).unwrap().stock, 3);
    assert_eq!(store.product(atlas.id).unwrap().stock, 1);

    let data = store.lock();
    let items: Vec<_> = data
        .order_items
        .iter()
        .filter(|i| i.order_id == order.id)
        .collect();
    assert_eq!(items.len(), 2);
    let novel_line = items.iter().find(|i| i.product_id == novel.id).unwrap();
    assert_eq!(novel_line.quantity, 2);
    assert_eq!(novel_line.price, rupees(250));
}

#[tokio::test]
async fn should_freeze_unit_price_at_checkout() {
    let store = InMemoryStore::new();
    let (user, address, novel, _) = shopper(&store);

    let order = checkout_usecase(&store)
        .execute(actor(&user), input(&address, "card"))
        .await
        .unwrap();
    for product in store.lock().products.iter_mut() {
        product.price = Decimal::new(1, 0);
    }

    let data = store.lock();
    let line = data
        .order_items
        .iter()
        .find(|i| i.order_id == order.id && i.product_id == novel.id)
        .unwrap();
    assert_eq!(line.price, rupees(250));
}

#[tokio::test]
async fn should_reject_empty_cart_without_side_effects() {
    let store = InMemoryStore::new();
    let user = store.add_user("Asha", UserRole::Customer);
    let address = store.add_address(&user, true);

    let result = checkout_usecase(&store)
        .execute(actor(&user), input(&address, "cod"))
        .await;

    assert!(matches!(result, Err(StoreServiceError::EmptyCart)));
    assert!(store.lock().orders.is_empty());
    assert_eq!(store.lock().place_attempts, 0);
}

#[tokio::test]
async fn should_require_a_saved_address() {
    let store = InMemoryStore::new();
    let user = store.add_user("Asha", UserRole::Customer);
    let books = store.add_category("Books");
    let book = store.add_product(&books, "Novel", rupees(250), 5);
    store.add_cart_item(&user, &book, 1);

    let result = checkout_usecase(&store)
        .execute(
            actor(&user),
            CheckoutInput {
                address_id: Uuid::now_v7(),
                payment_method: "cod".to_owned(),
            },
        )
        .await;

    assert!(matches!(result, Err(StoreServiceError::NoAddress)));
}

#[tokio::test]
async fn should_reject_unknown_or_foreign_address() {
    let store = InMemoryStore::new();
    let (user, _, _, _) = shopper(&store);
    let stranger = store.add_user("Ravi", UserRole::Customer);
    let foreign = store.add_address(&stranger, true);
    let uc = checkout_usecase(&store);

    let unknown = uc
        .execute(
            actor(&user),
            CheckoutInput {
                address_id: Uuid::now_v7(),
                payment_method: "cod".to_owned(),
            },
        )
        .await;
    let not_mine = uc.execute(actor(&user), input(&foreign, "cod")).await;

    assert!(matches!(unknown, Err(StoreServiceError::AddressNotFound)));
    assert!(matches!(not_mine, Err(StoreServiceError::Forbidden)));
    assert!(store.lock().orders.is_empty());
}

#[tokio::test]
async fn should_reject_unsupported_payment_method() {
    let store = InMemoryStore::new();
    let (user, address, _, _) = shopper(&store);

    let result = checkout_usecase(&store)
        .execute(actor(&user), input(&address, "bitcoin"))
        .await;

    assert!(matches!(result, Err(StoreServiceError::Validation(_))));
    assert_eq!(store.cart_of(user.id).len(), 2);
}

#[tokio::test]
async fn should_roll_back_everything_on_insufficient_stock() {
    let store = InMemoryStore::new();
    let (user, address, novel, atlas) = shopper(&store);
    // Another buyer drained the atlas after it was added to the cart.
    store
        .lock()
        .products
        .iter_mut()
        .find(|p| p.id == atlas.id)
        .unwrap()
        .stock = 0;

    let result = checkout_usecase(&store)
        .execute(actor(&user), input(&address, "cod"))
        .await;

    assert!(matches!(result, Err(StoreServiceError::InsufficientStock)));
    assert!(store.lock().orders.is_empty());
    assert!(store.lock().order_items.is_empty());
    assert_eq!(store.product(novel.id).unwrap().stock, 5);
    assert_eq!(store.cart_of(user.id).len(), 2);
}

#[tokio::test]
async fn should_retry_order_number_collisions() {
    let store = InMemoryStore::new();
    let (user, address, _, _) = shopper(&store);
    store.lock().forced_collisions = 2;

    let order = checkout_usecase(&store)
        .execute(actor(&user), input(&address, "cod"))
        .await
        .unwrap();

    assert_eq!(store.lock().place_attempts, 3);
    assert_eq!(store.lock().orders.len(), 1);
    assert_eq!(store.lock().orders[0].id, order.id);
}

#[tokio::test]
async fn should_give_up_after_repeated_collisions() {
    let store = InMemoryStore::new();
    let (user, address, _, _) = shopper(&store);
    store.lock().forced_collisions = MAX_PLACE_ATTEMPTS;

    let result = checkout_usecase(&store)
        .execute(actor(&user), input(&address, "cod"))
        .await;

    assert!(matches!(result, Err(StoreServiceError::Internal(_))));
    assert_eq!(store.lock().place_attempts, MAX_PLACE_ATTEMPTS);
    assert!(store.lock().orders.is_empty());
    assert_eq!(store.cart_of(user.id).len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn should_never_oversell_under_concurrent_checkouts() {
    const BUYERS: usize = 10;
    const STOCK: i32 = 3;

    let store = InMemoryStore::new();
    let books = store.add_category("Books");
    let book = store.add_product(&books, "Limited Edition", rupees(999), STOCK);

    let mut handles = Vec::with_capacity(BUYERS);
    for i in 0..BUYERS {
        let user = store.add_user(&format!("Buyer{i}"), UserRole::Customer);
        let address = store.add_address(&user, true);
        store.add_cart_item(&user, &book, 1);
        let uc = checkout_usecase(&store);
        handles.push(tokio::spawn(async move {
            uc.execute(actor(&user), input(&address, "cod")).await
        }));
    }

    let mut placed = 0;
    let mut sold_out = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => placed += 1,
            Err(StoreServiceError::InsufficientStock) => sold_out += 1,
            Err(e) => panic!("unexpected error: {e:?}"),
        }
    }

    assert_eq!(placed, STOCK as usize);
    assert_eq!(sold_out, BUYERS - STOCK as usize);
    assert_eq!(store.product(book.id).unwrap().stock, 0);
    assert_eq!(store.lock().orders.len(), STOCK as usize);
}

// ── Payment ──────────────────────────────────────────────────────────────────

async fn placed_order(store: &InMemoryStore, payment_method: &str) -> (User, Uuid) {
    let (user, address, _, _) = shopper(store);
    let order = checkout_usecase(store)
        .execute(actor(&user), input(&address, payment_method))
        .await
        .unwrap();
    (user, order.id)
}

#[tokio::test]
async fn should_move_paid_order_to_processing() {
    let store = InMemoryStore::new();
    let (user, order_id) = placed_order(&store, "cod").await;

    let outcome = PayOrderUseCase {
        orders: store.clone(),
    }
    .execute(actor(&user), order_id)
    .await
    .unwrap();

    assert_eq!(outcome.order.status, OrderStatus::Processing);
    assert_eq!(
        outcome.message,
        "Your order has been placed successfully. Payment will be collected on delivery."
    );
    assert_eq!(store.order(order_id).unwrap().status, OrderStatus::Processing);
}

#[tokio::test]
async fn should_confirm_prepaid_methods() {
    let store = InMemoryStore::new();
    let (user, order_id) = placed_order(&store, "netbanking").await;

    let outcome = PayOrderUseCase {
        orders: store.clone(),
    }
    .execute(actor(&user), order_id)
    .await
    .unwrap();

    assert_eq!(outcome.message, "Payment successful! Your order has been placed.");
}

#[tokio::test]
async fn should_reject_second_payment() {
    let store = InMemoryStore::new();
    let (user, order_id) = placed_order(&store, "card").await;
    let uc = PayOrderUseCase {
        orders: store.clone(),
    };
    uc.execute(actor(&user), order_id).await.unwrap();

    let again = uc.execute(actor(&user), order_id).await;

    assert!(matches!(again, Err(StoreServiceError::PaymentAlreadyProcessed)));
    assert_eq!(store.order(order_id).unwrap().status, OrderStatus::Processing);
}

#[tokio::test]
async fn should_forbid_paying_someone_elses_order() {
    let store = InMemoryStore::new();
    let (_, order_id) = placed_order(&store, "upi").await;
    let stranger = store.add_user("Ravi", UserRole::Customer);
    let admin = store.add_user("Root", UserRole::Admin);
    let uc = PayOrderUseCase {
        orders: store.clone(),
    };

    let by_stranger = uc.execute(actor(&stranger), order_id).await;
    let by_admin = uc.execute(actor(&admin), order_id).await;

    assert!(matches!(by_stranger, Err(StoreServiceError::Forbidden)));
    assert!(matches!(by_admin, Err(StoreServiceError::Forbidden)));
    assert_eq!(store.order(order_id).unwrap().status, OrderStatus::Pending);
}

#[tokio::test]
async fn should_return_order_not_found_on_payment() {
    let store = InMemoryStore::new();
    let user = store.add_user("Asha", UserRole::Customer);

    let result = PayOrderUseCase {
        orders: store.clone(),
    }
    .execute(actor(&user), Uuid::now_v7())
    .await;

    assert!(matches!(result, Err(StoreServiceError::OrderNotFound)));
}

// ── Order views ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_show_order_detail_to_owner_and_admin_only() {
    let store = InMemoryStore::new();
    let (user, order_id) = placed_order(&store, "cod").await;
    let stranger = store.add_user("Ravi", UserRole::Customer);
    let admin = store.add_user("Root", UserRole::Admin);
    let uc = GetOrderUseCase {
        orders: store.clone(),
        addresses: store.clone(),
    };

    let mine = uc.execute(actor(&user), order_id).await.unwrap();
    let as_admin = uc.execute(actor(&admin), order_id).await.unwrap();
    let theirs = uc.execute(actor(&stranger), order_id).await;

    assert_eq!(mine.items.len(), 2);
    assert!(mine.address.is_some());
    assert_eq!(as_admin.order.id, order_id);
    assert!(matches!(theirs, Err(StoreServiceError::Forbidden)));
}

#[tokio::test]
async fn should_list_only_own_orders() {
    let store = InMemoryStore::new();
    let (user, order_id) = placed_order(&store, "cod").await;
    let (other, _) = placed_order(&store, "cod").await;

    let mine = ListMyOrdersUseCase {
        orders: store.clone(),
    }
    .execute(actor(&user))
    .await
    .unwrap();

    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, order_id);
    assert_ne!(mine[0].user_id, other.id);
}
