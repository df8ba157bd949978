//! Order placement and status changes
//!
//! Placement resolves every referenced entity through an [`OrderLookup`],
//! checks the business rules, prices the order and writes it, all inside a
//! single transaction. Nothing is written when any rule fails.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{Customer, Order, OrderCreate, OrderQuote, Product, Restaurant};
use shared::order::{InvalidTransition, OrderStatus};
use sqlx::{PgConnection, PgPool};
use thiserror::Error;

use crate::db;
use crate::db::orders::NewOrder;
use crate::error::ServiceError;

pub const MAX_NOTES_LEN: usize = 500;
pub const MAX_ORDER_NUMBER_LEN: usize = 50;
/// Line items accepted in one order
pub const MAX_ORDER_ITEMS: usize = 100;

/// Entity referenced by an order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Customer,
    Restaurant,
    Product,
    Order,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Entity::Customer => "Customer",
            Entity::Restaurant => "Restaurant",
            Entity::Product => "Product",
            Entity::Order => "Order",
        })
    }
}

/// Why an order could not be placed or changed
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("{entity} {id} not found")]
    NotFound { entity: Entity, id: i64 },

    #[error("{entity} {id} is inactive")]
    Inactive { entity: Entity, id: i64 },

    #[error("Product {0} is unavailable")]
    Unavailable(i64),

    #[error("Product {product_id} does not belong to restaurant {restaurant_id}")]
    WrongRestaurant { product_id: i64, restaurant_id: i64 },

    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    #[error("Order must contain at least one product")]
    Empty,

    #[error("Order number {0} is already in use")]
    DuplicateNumber(String),

    #[error("{0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl OrderError {
    fn not_found(entity: Entity, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}

impl From<OrderError> for ServiceError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::Storage(db_err) => db_err.into(),
            other => ServiceError::App(business_error(other)),
        }
    }
}

/// Map a business-rule failure to its API error
fn business_error(e: OrderError) -> AppError {
    let message = e.to_string();
    match e {
        OrderError::NotFound { entity, id } => {
            let code = match entity {
                Entity::Customer => ErrorCode::CustomerNotFound,
                Entity::Restaurant => ErrorCode::RestaurantNotFound,
                Entity::Product => ErrorCode::ProductNotFound,
                Entity::Order => ErrorCode::OrderNotFound,
            };
            AppError::with_message(code, message).with_detail("id", id)
        }
        OrderError::Inactive { entity, id } => {
            let code = match entity {
                Entity::Restaurant => ErrorCode::RestaurantInactive,
                _ => ErrorCode::CustomerInactive,
            };
            AppError::with_message(code, message).with_detail("id", id)
        }
        OrderError::Unavailable(id) => {
            AppError::with_message(ErrorCode::ProductUnavailable, message).with_detail("id", id)
        }
        OrderError::WrongRestaurant {
            product_id,
            restaurant_id,
        } => AppError::with_message(ErrorCode::ProductWrongRestaurant, message)
            .with_detail("product_id", product_id)
            .with_detail("restaurant_id", restaurant_id),
        OrderError::InvalidTransition(t) => {
            AppError::with_message(ErrorCode::OrderInvalidTransition, message)
                .with_detail("from", t.from.as_str())
                .with_detail("to", t.to.as_str())
        }
        OrderError::Empty => AppError::new(ErrorCode::OrderEmpty),
        OrderError::DuplicateNumber(number) => {
            AppError::with_message(ErrorCode::AlreadyExists, message)
                .with_detail("order_number", number)
        }
        OrderError::Validation(msg) => AppError::validation(msg),
        OrderError::Storage(_) => AppError::new(ErrorCode::InternalError),
    }
}

/// Read access to the entities an order references
#[async_trait]
pub trait OrderLookup: Send {
    async fn customer(&mut self, id: i64) -> Result<Option<Customer>, OrderError>;
    async fn restaurant(&mut self, id: i64) -> Result<Option<Restaurant>, OrderError>;
    async fn product(&mut self, id: i64) -> Result<Option<Product>, OrderError>;
}

/// Lookup reading through an open connection or transaction
pub struct PgLookup<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> PgLookup<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl OrderLookup for PgLookup<'_> {
    async fn customer(&mut self, id: i64) -> Result<Option<Customer>, OrderError> {
        Ok(db::customers::find_by_id(&mut *self.conn, id).await?)
    }

    async fn restaurant(&mut self, id: i64) -> Result<Option<Restaurant>, OrderError> {
        Ok(db::restaurants::find_by_id(&mut *self.conn, id).await?)
    }

    async fn product(&mut self, id: i64) -> Result<Option<Product>, OrderError> {
        Ok(db::products::find_by_id(&mut *self.conn, id).await?)
    }
}

/// Sum of product prices plus the delivery fee
pub fn order_total(prices: impl IntoIterator<Item = Decimal>, delivery_fee: Decimal) -> Decimal {
    prices.into_iter().sum::<Decimal>() + delivery_fee
}

/// Validate the references of an order and price it
///
/// Checks run in order: customer, restaurant, then each product in request
/// order. The first failing rule is returned.
pub async fn price_order<L: OrderLookup + ?Sized>(
    lookup: &mut L,
    request: &OrderCreate,
) -> Result<OrderQuote, OrderError> {
    if request.product_ids.is_empty() {
        return Err(OrderError::Empty);
    }
    if request.product_ids.len() > MAX_ORDER_ITEMS {
        return Err(OrderError::Validation(format!(
            "an order holds at most {MAX_ORDER_ITEMS} products"
        )));
    }

    let customer = lookup
        .customer(request.customer_id)
        .await?
        .ok_or_else(|| OrderError::not_found(Entity::Customer, request.customer_id))?;
    if !customer.active {
        return Err(OrderError::Inactive {
            entity: Entity::Customer,
            id: customer.id,
        });
    }

    let restaurant = lookup
        .restaurant(request.restaurant_id)
        .await?
        .ok_or_else(|| OrderError::not_found(Entity::Restaurant, request.restaurant_id))?;
    if !restaurant.active {
        return Err(OrderError::Inactive {
            entity: Entity::Restaurant,
            id: restaurant.id,
        });
    }

    // Repeated ids are separate line items; fetch each product once
    let mut resolved: HashMap<i64, Decimal> = HashMap::new();
    let mut prices = Vec::with_capacity(request.product_ids.len());
    for &product_id in &request.product_ids {
        let price = match resolved.get(&product_id) {
            Some(price) => *price,
            None => {
                let product = lookup
                    .product(product_id)
                    .await?
                    .ok_or_else(|| OrderError::not_found(Entity::Product, product_id))?;
                if !product.available {
                    return Err(OrderError::Unavailable(product_id));
                }
                if product.restaurant_id != restaurant.id {
                    return Err(OrderError::WrongRestaurant {
                        product_id,
                        restaurant_id: restaurant.id,
                    });
                }
                resolved.insert(product_id, product.price);
                product.price
            }
        };
        prices.push(price);
    }

    let subtotal: Decimal = prices.iter().copied().sum();
    Ok(OrderQuote {
        subtotal,
        delivery_fee: restaurant.delivery_fee,
        total: order_total(prices, restaurant.delivery_fee),
    })
}

/// Build the order to persist: validated, priced, and CONFIRMED
pub async fn assemble_order<L: OrderLookup + ?Sized>(
    lookup: &mut L,
    request: &OrderCreate,
    now: i64,
) -> Result<NewOrder, OrderError> {
    let notes = normalize_notes(request.notes.as_deref())?;
    let order_number = match request.order_number.as_deref().map(str::trim) {
        Some("") => return Err(OrderError::Validation("order_number must not be empty".into())),
        Some(n) if n.chars().count() > MAX_ORDER_NUMBER_LEN => {
            return Err(OrderError::Validation(format!(
                "order_number is too long (max {MAX_ORDER_NUMBER_LEN})"
            )));
        }
        Some(n) => n.to_string(),
        None => generate_order_number(),
    };

    let quote = price_order(lookup, request).await?;

    Ok(NewOrder {
        order_number,
        ordered_at: request.ordered_at.unwrap_or(now),
        status: OrderStatus::Confirmed,
        total: quote.total,
        notes,
        customer_id: request.customer_id,
        restaurant_id: request.restaurant_id,
        product_ids: request.product_ids.clone(),
    })
}

fn normalize_notes(notes: Option<&str>) -> Result<Option<String>, OrderError> {
    match notes.map(str::trim) {
        None | Some("") => Ok(None),
        Some(n) if n.chars().count() > MAX_NOTES_LEN => Err(OrderError::Validation(format!(
            "notes is too long (max {MAX_NOTES_LEN})"
        ))),
        Some(n) => Ok(Some(n.to_string())),
    }
}

pub fn generate_order_number() -> String {
    format!("ORD-{}", shared::util::snowflake_id())
}

/// Place an order atomically
pub async fn create_order(pool: &PgPool, request: &OrderCreate) -> Result<Order, OrderError> {
    let mut tx = pool.begin().await?;

    let new_order = {
        let mut lookup = PgLookup::new(&mut tx);
        assemble_order(&mut lookup, request, shared::util::now_millis()).await?
    };

    if db::orders::number_exists(&mut *tx, &new_order.order_number).await? {
        return Err(OrderError::DuplicateNumber(new_order.order_number));
    }

    let order = db::orders::insert(&mut tx, &new_order).await?;
    tx.commit().await?;

    tracing::info!(
        order_id = order.id,
        order_number = %order.order_number,
        customer_id = order.customer_id,
        restaurant_id = order.restaurant_id,
        total = %order.total,
        "Order placed"
    );
    Ok(order)
}

/// Price an order without writing anything
pub async fn quote_order(pool: &PgPool, request: &OrderCreate) -> Result<OrderQuote, OrderError> {
    let mut conn = pool.acquire().await?;
    let mut lookup = PgLookup::new(&mut conn);
    price_order(&mut lookup, request).await
}

/// Move an order to `next` if the status graph allows it
///
/// The order row stays locked from the check until commit, so concurrent
/// changes to the same order apply one after the other.
pub async fn update_status(
    pool: &PgPool,
    order_id: i64,
    next: OrderStatus,
) -> Result<Order, OrderError> {
    let mut tx = pool.begin().await?;

    let current = db::orders::lock_status(&mut tx, order_id)
        .await?
        .ok_or_else(|| OrderError::not_found(Entity::Order, order_id))?;
    current.transition_to(next)?;

    let order = db::orders::set_status(&mut tx, order_id, next).await?;
    tx.commit().await?;

    tracing::info!(order_id, from = %current, to = %next, "Order status changed");
    Ok(order)
}

/// Cancel an order through the status graph
pub async fn cancel_order(pool: &PgPool, order_id: i64) -> Result<Order, OrderError> {
    update_status(pool, order_id, OrderStatus::Canceled).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    fn money(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    /// In-memory catalog standing in for the database
    #[derive(Default)]
    struct Catalog {
        customers: HashMap<i64, Customer>,
        restaurants: HashMap<i64, Restaurant>,
        products: HashMap<i64, Product>,
        product_reads: usize,
    }

    #[async_trait]
    impl OrderLookup for Catalog {
        async fn customer(&mut self, id: i64) -> Result<Option<Customer>, OrderError> {
            Ok(self.customers.get(&id).cloned())
        }

        async fn restaurant(&mut self, id: i64) -> Result<Option<Restaurant>, OrderError> {
            Ok(self.restaurants.get(&id).cloned())
        }

        async fn product(&mut self, id: i64) -> Result<Option<Product>, OrderError> {
            self.product_reads += 1;
            Ok(self.products.get(&id).cloned())
        }
    }

    fn customer(id: i64, active: bool) -> Customer {
        Customer {
            id,
            name: format!("Customer {id}"),
            email: format!("c{id}@example.com"),
            phone: None,
            address: None,
            active,
            registered_at: 0,
        }
    }

    fn restaurant(id: i64, fee: &str, active: bool) -> Restaurant {
        Restaurant {
            id,
            name: format!("Restaurant {id}"),
            category: "Italiana".into(),
            address: "Rua X, 100".into(),
            phone: None,
            delivery_fee: money(fee),
            rating: None,
            active,
            created_at: 0,
        }
    }

    fn product(id: i64, price: &str, restaurant_id: i64, available: bool) -> Product {
        Product {
            id,
            name: format!("Product {id}"),
            description: "Test product".into(),
            price: money(price),
            category: "Italiana".into(),
            available,
            restaurant_id,
        }
    }

    /// C1/C2 active, C3 inactive; R1 (fee 5.00), R2 (fee 8.00), R3 inactive
    fn catalog() -> Catalog {
        let mut c = Catalog::default();
        for cu in [customer(1, true), customer(2, true), customer(3, false)] {
            c.customers.insert(cu.id, cu);
        }
        for r in [
            restaurant(1, "5.00", true),
            restaurant(2, "8.00", true),
            restaurant(3, "3.00", false),
        ] {
            c.restaurants.insert(r.id, r);
        }
        for p in [
            product(1, "30.00", 1, true),
            product(2, "35.00", 1, true),
            product(3, "25.00", 2, true),
            product(4, "20.00", 2, false),
            product(5, "6.00", 1, true),
            product(6, "12.00", 3, true),
        ] {
            c.products.insert(p.id, p);
        }
        c
    }

    fn request(customer_id: i64, restaurant_id: i64, product_ids: &[i64]) -> OrderCreate {
        OrderCreate {
            customer_id,
            restaurant_id,
            product_ids: product_ids.to_vec(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_confirmed_order_total_includes_delivery_fee() {
        let mut lookup = catalog();
        let order = assemble_order(&mut lookup, &request(1, 1, &[1, 5]), 1_000)
            .await
            .unwrap();

        assert_eq!(order.total, money("41.00"));
        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(order.product_ids, vec![1, 5]);
        assert_eq!(order.ordered_at, 1_000);
        assert!(order.order_number.starts_with("ORD-"));
    }

    #[tokio::test]
    async fn test_client_supplied_number_and_time_are_kept() {
        let mut lookup = catalog();
        let req = OrderCreate {
            order_number: Some("  PED100 ".into()),
            ordered_at: Some(42),
            notes: Some("  Sem cebola  ".into()),
            ..request(2, 2, &[3])
        };
        let order = assemble_order(&mut lookup, &req, 1_000).await.unwrap();

        assert_eq!(order.order_number, "PED100");
        assert_eq!(order.ordered_at, 42);
        assert_eq!(order.notes.as_deref(), Some("Sem cebola"));
        assert_eq!(order.total, money("33.00"));
    }

    #[tokio::test]
    async fn test_inactive_customer_always_rejected() {
        // Valid restaurant and products, and also an inactive restaurant
        for (restaurant_id, products) in [(1, vec![1, 5]), (2, vec![3]), (3, vec![6])] {
            let mut lookup = catalog();
            let err = assemble_order(&mut lookup, &request(3, restaurant_id, &products), 0)
                .await
                .unwrap_err();
            assert!(
                matches!(
                    err,
                    OrderError::Inactive {
                        entity: Entity::Customer,
                        id: 3
                    }
                ),
                "{err:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_missing_references() {
        let mut lookup = catalog();
        let err = price_order(&mut lookup, &request(99, 1, &[1])).await.unwrap_err();
        assert!(matches!(
            err,
            OrderError::NotFound {
                entity: Entity::Customer,
                id: 99
            }
        ));

        let err = price_order(&mut lookup, &request(1, 99, &[1])).await.unwrap_err();
        assert!(matches!(
            err,
            OrderError::NotFound {
                entity: Entity::Restaurant,
                id: 99
            }
        ));

        let err = price_order(&mut lookup, &request(1, 1, &[1, 99])).await.unwrap_err();
        assert!(matches!(
            err,
            OrderError::NotFound {
                entity: Entity::Product,
                id: 99
            }
        ));
    }

    #[tokio::test]
    async fn test_inactive_restaurant() {
        let mut lookup = catalog();
        let err = price_order(&mut lookup, &request(1, 3, &[6])).await.unwrap_err();
        assert!(matches!(
            err,
            OrderError::Inactive {
                entity: Entity::Restaurant,
                id: 3
            }
        ));
    }

    #[tokio::test]
    async fn test_unavailable_product() {
        let mut lookup = catalog();
        let err = price_order(&mut lookup, &request(1, 2, &[3, 4])).await.unwrap_err();
        assert!(matches!(err, OrderError::Unavailable(4)));
    }

    #[tokio::test]
    async fn test_product_from_other_restaurant() {
        let mut lookup = catalog();
        let err = price_order(&mut lookup, &request(1, 1, &[1, 3])).await.unwrap_err();
        assert!(matches!(
            err,
            OrderError::WrongRestaurant {
                product_id: 3,
                restaurant_id: 1
            }
        ));
    }

    #[tokio::test]
    async fn test_empty_order_rejected_before_lookups() {
        let mut lookup = catalog();
        let err = price_order(&mut lookup, &request(99, 99, &[])).await.unwrap_err();
        assert!(matches!(err, OrderError::Empty));
    }

    #[tokio::test]
    async fn test_line_item_cap() {
        let mut lookup = catalog();
        let full = vec![1; MAX_ORDER_ITEMS];
        let quote = price_order(&mut lookup, &request(1, 1, &full)).await.unwrap();
        assert_eq!(quote.subtotal, money("3000.00"));

        let over = vec![1; MAX_ORDER_ITEMS + 1];
        let reads = lookup.product_reads;
        let err = price_order(&mut lookup, &request(1, 1, &over)).await.unwrap_err();
        assert!(matches!(err, OrderError::Validation(_)));
        assert_eq!(lookup.product_reads, reads);
    }

    #[tokio::test]
    async fn test_repeated_product_counts_per_line_item() {
        let mut lookup = catalog();
        let quote = price_order(&mut lookup, &request(1, 1, &[1, 1, 5])).await.unwrap();

        assert_eq!(quote.subtotal, money("66.00"));
        assert_eq!(quote.delivery_fee, money("5.00"));
        assert_eq!(quote.total, money("71.00"));
        assert_eq!(lookup.product_reads, 2);
    }

    #[tokio::test]
    async fn test_total_equals_prices_plus_fee_for_every_subset() {
        let prices = [("30.00", 1), ("35.00", 2), ("6.00", 5)];
        for mask in 1..(1 << prices.len()) {
            let picked: Vec<_> = prices
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << *i) != 0)
                .map(|(_, p)| *p)
                .collect();
            let ids: Vec<i64> = picked.iter().map(|(_, id)| *id).collect();
            let expected = order_total(picked.iter().map(|(p, _)| money(p)), money("5.00"));

            let mut lookup = catalog();
            let quote = price_order(&mut lookup, &request(1, 1, &ids)).await.unwrap();
            assert_eq!(quote.total, expected, "products {ids:?}");
        }
    }

    #[tokio::test]
    async fn test_blank_order_number_rejected() {
        let mut lookup = catalog();
        let req = OrderCreate {
            order_number: Some("   ".into()),
            ..request(1, 1, &[1])
        };
        let err = assemble_order(&mut lookup, &req, 0).await.unwrap_err();
        assert!(matches!(err, OrderError::Validation(_)));
    }

    #[tokio::test]
    async fn test_notes_too_long() {
        let mut lookup = catalog();
        let req = OrderCreate {
            notes: Some("x".repeat(MAX_NOTES_LEN + 1)),
            ..request(1, 1, &[1])
        };
        let err = assemble_order(&mut lookup, &req, 0).await.unwrap_err();
        assert!(matches!(err, OrderError::Validation(_)));
    }

    #[test]
    fn test_error_mapping() {
        let cases = [
            (
                OrderError::not_found(Entity::Customer, 1),
                ErrorCode::CustomerNotFound,
                StatusCode::NOT_FOUND,
            ),
            (
                OrderError::not_found(Entity::Order, 1),
                ErrorCode::OrderNotFound,
                StatusCode::NOT_FOUND,
            ),
            (
                OrderError::Inactive {
                    entity: Entity::Customer,
                    id: 3,
                },
                ErrorCode::CustomerInactive,
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                OrderError::Inactive {
                    entity: Entity::Restaurant,
                    id: 3,
                },
                ErrorCode::RestaurantInactive,
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                OrderError::Unavailable(4),
                ErrorCode::ProductUnavailable,
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                OrderError::WrongRestaurant {
                    product_id: 3,
                    restaurant_id: 1,
                },
                ErrorCode::ProductWrongRestaurant,
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                OrderStatus::Preparing
                    .transition_to(OrderStatus::Delivered)
                    .unwrap_err()
                    .into(),
                ErrorCode::OrderInvalidTransition,
                StatusCode::CONFLICT,
            ),
            (OrderError::Empty, ErrorCode::OrderEmpty, StatusCode::BAD_REQUEST),
            (
                OrderError::DuplicateNumber("PED001".into()),
                ErrorCode::AlreadyExists,
                StatusCode::CONFLICT,
            ),
            (
                OrderError::Storage(sqlx::Error::PoolClosed),
                ErrorCode::InternalError,
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, code, status) in cases {
            let app: AppError = ServiceError::from(err).into();
            assert_eq!(app.code, code);
            assert_eq!(app.http_status(), status);
        }
    }

    #[test]
    fn test_transition_error_message() {
        let err: OrderError = OrderStatus::Delivered
            .transition_to(OrderStatus::Canceled)
            .unwrap_err()
            .into();
        let app: AppError = ServiceError::from(err).into();
        assert_eq!(
            app.message,
            "cannot change order status from DELIVERED to CANCELED"
        );
        let details = app.details.unwrap();
        assert_eq!(details["from"], "DELIVERED");
        assert_eq!(details["to"], "CANCELED");
    }
}
