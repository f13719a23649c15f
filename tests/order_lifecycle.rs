//! Order lifecycle and stock reconciliation tests
//! Run: cargo test --test order_lifecycle

use inventory_server::db::models::{
    CustomerCreate, LineItem, OrderCreate, OrderStatus, OrderUpdate, Product, ProductCreate,
};
use inventory_server::db::repository::{
    CustomerRepository, OrderFilter, OrderRepository, ProductRepository, RepoError,
};
use surrealdb::engine::local::{Db, RocksDb};
use surrealdb::{RecordId, Surreal};

async fn test_db() -> (Surreal<Db>, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let db: Surreal<Db> = Surreal::new::<RocksDb>(tmp.path()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    (db, tmp)
}

async fn seed_product(db: &Surreal<Db>, name: &str, quantity: i64) -> RecordId {
    let repo = ProductRepository::new(db.clone());
    let product = repo
        .create(ProductCreate {
            name: name.to_string(),
            description: None,
            category: None,
            buying_price: Some(5.0),
            selling_price: Some(10.0),
            quantity: Some(quantity),
            in_stock: None,
            image_url: None,
        })
        .await
        .unwrap();
    product.id.unwrap()
}

async fn seed_customer(db: &Surreal<Db>, name: &str, phone: &str) -> RecordId {
    let repo = CustomerRepository::new(db.clone());
    let customer = repo
        .create(CustomerCreate {
            name: name.to_string(),
            email: None,
            phone: phone.to_string(),
            address: None,
            company: None,
            status: None,
        })
        .await
        .unwrap();
    customer.id.unwrap()
}

async fn quantity_of(db: &Surreal<Db>, id: &RecordId) -> i64 {
    let product: Option<Product> = db.select(id.clone()).await.unwrap();
    product.unwrap().quantity
}

fn item(product: &RecordId, name: &str, quantity: i64) -> LineItem {
    LineItem {
        product: Some(product.clone()),
        name: name.to_string(),
        quantity,
        price: 10.0,
    }
}

fn order_create(customer: RecordId, items: Vec<LineItem>, total: f64) -> OrderCreate {
    OrderCreate {
        customer: Some(customer),
        products: Some(items),
        total_amount: Some(total),
        status: None,
        payment_status: None,
        notes: None,
    }
}

fn empty_update() -> OrderUpdate {
    OrderUpdate {
        customer: None,
        products: None,
        total_amount: None,
        status: None,
        payment_status: None,
        notes: None,
        order_date: None,
    }
}

#[tokio::test]
async fn create_deducts_stock_and_sets_defaults() {
    let (db, _guard) = test_db().await;
    let product = seed_product(&db, "Keyboard", 10).await;
    let customer = seed_customer(&db, "Alice Smith", "9000000001").await;

    let repo = OrderRepository::new(db.clone());
    let order = repo
        .create_order(order_create(
            customer,
            vec![item(&product, "Keyboard", 3)],
            30.0,
        ))
        .await
        .unwrap();

    assert_eq!(quantity_of(&db, &product).await, 7);
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(order.order_date.is_some());
    assert_eq!(order.total_amount, 30.0);
}

#[tokio::test]
async fn create_requires_customer_and_products() {
    let (db, _guard) = test_db().await;
    let product = seed_product(&db, "Mouse", 5).await;
    let customer = seed_customer(&db, "Bob", "9000000002").await;
    let repo = OrderRepository::new(db.clone());

    let missing_customer = OrderCreate {
        customer: None,
        ..order_create(customer.clone(), vec![item(&product, "Mouse", 1)], 10.0)
    };
    let err = repo.create_order(missing_customer).await.unwrap_err();
    assert!(matches!(err, RepoError::Validation(ref m) if m == "Customer and products are required"));

    let empty_items = order_create(customer, vec![], 0.0);
    let err = repo.create_order(empty_items).await.unwrap_err();
    assert!(matches!(err, RepoError::Validation(ref m) if m == "Customer and products are required"));

    // Nothing was deducted and nothing was stored
    assert_eq!(quantity_of(&db, &product).await, 5);
    let (orders, total) = repo.find_detailed_page(OrderFilter::default()).await.unwrap();
    assert!(orders.is_empty());
    assert_eq!(total, 0);
}

#[tokio::test]
async fn create_rejects_insufficient_stock_without_storing() {
    let (db, _guard) = test_db().await;
    let product = seed_product(&db, "Webcam", 2).await;
    let customer = seed_customer(&db, "Carol", "9000000003").await;
    let repo = OrderRepository::new(db.clone());

    let err = repo
        .create_order(order_create(customer, vec![item(&product, "Webcam", 5)], 50.0))
        .await
        .unwrap_err();

    assert!(
        matches!(err, RepoError::InsufficientStock(ref m) if m == "Insufficient stock for product: Webcam")
    );
    assert_eq!(quantity_of(&db, &product).await, 2);

    let (orders, _) = repo.find_detailed_page(OrderFilter::default()).await.unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn create_keeps_earlier_deductions_when_a_later_item_fails() {
    let (db, _guard) = test_db().await;
    let plenty = seed_product(&db, "Cable", 10).await;
    let scarce = seed_product(&db, "Dock", 1).await;
    let customer = seed_customer(&db, "Dave", "9000000004").await;
    let repo = OrderRepository::new(db.clone());

    let err = repo
        .create_order(order_create(
            customer,
            vec![item(&plenty, "Cable", 3), item(&scarce, "Dock", 5)],
            80.0,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::InsufficientStock(_)));

    // The first item's deduction is not rolled back
    assert_eq!(quantity_of(&db, &plenty).await, 7);
    assert_eq!(quantity_of(&db, &scarce).await, 1);
}

#[tokio::test]
async fn cancel_restores_stock() {
    let (db, _guard) = test_db().await;
    let product = seed_product(&db, "Monitor", 10).await;
    let customer = seed_customer(&db, "Erin", "9000000005").await;
    let repo = OrderRepository::new(db.clone());

    let order = repo
        .create_order(order_create(customer, vec![item(&product, "Monitor", 3)], 30.0))
        .await
        .unwrap();
    assert_eq!(quantity_of(&db, &product).await, 7);

    let id = order.id.unwrap().to_string();
    let cancelled = repo
        .update_order(
            &id,
            OrderUpdate {
                status: Some(OrderStatus::Cancelled),
                ..empty_update()
            },
        )
        .await
        .unwrap();

    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(quantity_of(&db, &product).await, 10);
}

#[tokio::test]
async fn uncancel_deducts_again() {
    let (db, _guard) = test_db().await;
    let product = seed_product(&db, "Desk", 10).await;
    let customer = seed_customer(&db, "Frank", "9000000006").await;
    let repo = OrderRepository::new(db.clone());

    let order = repo
        .create_order(order_create(customer, vec![item(&product, "Desk", 3)], 30.0))
        .await
        .unwrap();
    let id = order.id.unwrap().to_string();

    repo.update_order(
        &id,
        OrderUpdate {
            status: Some(OrderStatus::Cancelled),
            ..empty_update()
        },
    )
    .await
    .unwrap();
    assert_eq!(quantity_of(&db, &product).await, 10);

    let reopened = repo
        .update_order(
            &id,
            OrderUpdate {
                status: Some(OrderStatus::Pending),
                ..empty_update()
            },
        )
        .await
        .unwrap();

    assert_eq!(reopened.status, OrderStatus::Pending);
    assert_eq!(quantity_of(&db, &product).await, 7);
}

#[tokio::test]
async fn uncancel_with_insufficient_stock_stays_cancelled() {
    let (db, _guard) = test_db().await;
    let product = seed_product(&db, "Chair", 3).await;
    let customer = seed_customer(&db, "Grace", "9000000007").await;
    let repo = OrderRepository::new(db.clone());

    let order = repo
        .create_order(order_create(
            customer.clone(),
            vec![item(&product, "Chair", 3)],
            30.0,
        ))
        .await
        .unwrap();
    let id = order.id.unwrap().to_string();

    repo.update_order(
        &id,
        OrderUpdate {
            status: Some(OrderStatus::Cancelled),
            ..empty_update()
        },
    )
    .await
    .unwrap();
    assert_eq!(quantity_of(&db, &product).await, 3);

    // Someone else takes most of the restored stock
    repo.create_order(order_create(customer, vec![item(&product, "Chair", 2)], 20.0))
        .await
        .unwrap();
    assert_eq!(quantity_of(&db, &product).await, 1);

    let err = repo
        .update_order(
            &id,
            OrderUpdate {
                status: Some(OrderStatus::Pending),
                ..empty_update()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::InsufficientStock(_)));

    // The merge never ran: the order is still cancelled, stock untouched
    let unchanged = repo.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(unchanged.status, OrderStatus::Cancelled);
    assert_eq!(quantity_of(&db, &product).await, 1);
}

#[tokio::test]
async fn replacing_items_nets_the_difference() {
    let (db, _guard) = test_db().await;
    let product = seed_product(&db, "Lamp", 10).await;
    let customer = seed_customer(&db, "Heidi", "9000000008").await;
    let repo = OrderRepository::new(db.clone());

    let order = repo
        .create_order(order_create(customer, vec![item(&product, "Lamp", 5)], 50.0))
        .await
        .unwrap();
    assert_eq!(quantity_of(&db, &product).await, 5);

    let id = order.id.unwrap().to_string();
    let updated = repo
        .update_order(
            &id,
            OrderUpdate {
                products: Some(vec![item(&product, "Lamp", 2)]),
                total_amount: Some(20.0),
                ..empty_update()
            },
        )
        .await
        .unwrap();

    // Old items restored (+5), new deducted (-2)
    assert_eq!(quantity_of(&db, &product).await, 8);
    assert_eq!(updated.products.len(), 1);
    assert_eq!(updated.products[0].quantity, 2);
}

#[tokio::test]
async fn replacement_failure_rolls_back_to_previous_items() {
    let (db, _guard) = test_db().await;
    let product = seed_product(&db, "Shelf", 10).await;
    let customer = seed_customer(&db, "Ivan", "9000000009").await;
    let repo = OrderRepository::new(db.clone());

    let order = repo
        .create_order(order_create(customer, vec![item(&product, "Shelf", 5)], 50.0))
        .await
        .unwrap();
    assert_eq!(quantity_of(&db, &product).await, 5);

    let id = order.id.unwrap().to_string();
    let err = repo
        .update_order(
            &id,
            OrderUpdate {
                products: Some(vec![item(&product, "Shelf", 100)]),
                ..empty_update()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::InsufficientStock(_)));

    // Rollback re-deducted the old items; the order still holds them
    assert_eq!(quantity_of(&db, &product).await, 5);
    let unchanged = repo.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(unchanged.products[0].quantity, 5);
}

#[tokio::test]
async fn delete_does_not_restock() {
    let (db, _guard) = test_db().await;
    let product = seed_product(&db, "Router", 10).await;
    let customer = seed_customer(&db, "Judy", "9000000010").await;
    let repo = OrderRepository::new(db.clone());

    let order = repo
        .create_order(order_create(customer, vec![item(&product, "Router", 4)], 40.0))
        .await
        .unwrap();
    assert_eq!(quantity_of(&db, &product).await, 6);

    let id = order.id.unwrap().to_string();
    repo.delete_order(&id).await.unwrap();

    assert_eq!(quantity_of(&db, &product).await, 6);
    assert!(repo.find_by_id(&id).await.unwrap().is_none());

    let err = repo.delete_order(&id).await.unwrap_err();
    assert!(matches!(err, RepoError::NotFound(ref m) if m == "Order not found"));
}

#[tokio::test]
async fn notes_only_update_leaves_stock_alone() {
    let (db, _guard) = test_db().await;
    let product = seed_product(&db, "Stand", 10).await;
    let customer = seed_customer(&db, "Ken", "9000000011").await;
    let repo = OrderRepository::new(db.clone());

    let order = repo
        .create_order(order_create(customer, vec![item(&product, "Stand", 3)], 30.0))
        .await
        .unwrap();
    let id = order.id.unwrap().to_string();

    let updated = repo
        .update_order(
            &id,
            OrderUpdate {
                notes: Some("Deliver after 6pm".to_string()),
                ..empty_update()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.notes.as_deref(), Some("Deliver after 6pm"));
    assert_eq!(updated.status, OrderStatus::Pending);
    assert_eq!(quantity_of(&db, &product).await, 7);
}

#[tokio::test]
async fn listing_filters_by_status_and_resolves_customers() {
    let (db, _guard) = test_db().await;
    let product = seed_product(&db, "Paper", 100).await;
    let alice = seed_customer(&db, "Alice Smith", "9000000012").await;
    let bob = seed_customer(&db, "Bob Jones", "9000000013").await;
    let repo = OrderRepository::new(db.clone());

    repo.create_order(order_create(alice.clone(), vec![item(&product, "Paper", 1)], 10.0))
        .await
        .unwrap();
    repo.create_order(order_create(alice, vec![item(&product, "Paper", 2)], 20.0))
        .await
        .unwrap();
    repo.create_order(OrderCreate {
        status: Some(OrderStatus::Completed),
        ..order_create(bob, vec![item(&product, "Paper", 3)], 30.0)
    })
    .await
    .unwrap();

    let (all, total) = repo
        .find_detailed_page(OrderFilter {
            page: 1,
            limit: 10,
            ..OrderFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(total, 3);
    assert_eq!(all.len(), 3);
    assert!(all.iter().all(|o| o.customer.is_some()));

    // "All" disables the filter
    let (_, total) = repo
        .find_detailed_page(OrderFilter {
            status: Some("All".to_string()),
            page: 1,
            limit: 10,
            ..OrderFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(total, 3);

    let (completed, total) = repo
        .find_detailed_page(OrderFilter {
            status: Some("completed".to_string()),
            page: 1,
            limit: 10,
            ..OrderFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(completed[0].customer.as_ref().unwrap().name, "Bob Jones");

    let (by_name, total) = repo
        .find_detailed_page(OrderFilter {
            search: Some("alice".to_string()),
            page: 1,
            limit: 10,
            ..OrderFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(total, 2);
    assert!(by_name.iter().all(|o| o.customer.as_ref().unwrap().name == "Alice Smith"));
}

#[tokio::test]
async fn listing_finds_an_order_by_its_id() {
    let (db, _guard) = test_db().await;
    let product = seed_product(&db, "Ink", 10).await;
    let customer = seed_customer(&db, "Laura", "9000000014").await;
    let repo = OrderRepository::new(db.clone());

    let order = repo
        .create_order(order_create(customer, vec![item(&product, "Ink", 1)], 10.0))
        .await
        .unwrap();
    let id = order.id.unwrap().to_string();

    let (found, total) = repo
        .find_detailed_page(OrderFilter {
            search: Some(id.clone()),
            page: 1,
            limit: 10,
            ..OrderFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(total, 1, "searching the full id should match: {id}");
    assert_eq!(found[0].id.as_ref().unwrap().to_string(), id);
}

#[tokio::test]
async fn order_stock_math_never_touches_in_stock_flag() {
    let (db, _guard) = test_db().await;
    let product = seed_product(&db, "Toner", 3).await;
    let customer = seed_customer(&db, "Mallory", "9000000015").await;
    let repo = OrderRepository::new(db.clone());

    repo.create_order(order_create(customer, vec![item(&product, "Toner", 3)], 30.0))
        .await
        .unwrap();

    let stored: Option<Product> = db.select(product.clone()).await.unwrap();
    let stored = stored.unwrap();
    assert_eq!(stored.quantity, 0);
    // The flag is catalog/movement territory; order math leaves it stale
    assert!(stored.in_stock);
}
