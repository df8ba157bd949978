//! Demo data for development databases

use rust_decimal::Decimal;
use shared::models::{CustomerCreate, ProductCreate, RestaurantCreate};
use shared::order::OrderStatus;
use sqlx::PgPool;

use crate::db;
use crate::db::orders::NewOrder;
use crate::services::order::order_total;

const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

fn customer(name: &str, email: &str, phone: &str, address: &str) -> CustomerCreate {
    CustomerCreate {
        name: name.into(),
        email: email.into(),
        phone: Some(phone.into()),
        address: Some(address.into()),
    }
}

fn product(name: &str, description: &str, price: Decimal, category: &str, restaurant_id: i64) -> ProductCreate {
    ProductCreate {
        name: name.into(),
        description: description.into(),
        price,
        category: category.into(),
        restaurant_id,
    }
}

/// Insert the demo catalog and two orders when no customer exists yet
///
/// Returns whether anything was inserted.
pub async fn seed_if_empty(pool: &PgPool) -> Result<bool, sqlx::Error> {
    if !db::customers::is_empty(pool).await? {
        tracing::debug!("Database already has customers, skipping demo data");
        return Ok(false);
    }

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let thiago = db::customers::create(
        &mut *tx,
        &customer("Thiago", "thiago@email.com", "11999999999", "Rua A, 123"),
        true,
        now,
    )
    .await?;
    let ana = db::customers::create(
        &mut *tx,
        &customer("Ana", "ana@email.com", "11988888888", "Rua B, 456"),
        true,
        now,
    )
    .await?;
    db::customers::create(
        &mut *tx,
        &customer("Carlos", "carlos@email.com", "11977777777", "Rua C, 789"),
        false,
        now,
    )
    .await?;

    let pizza_place = db::restaurants::create(
        &mut *tx,
        &RestaurantCreate {
            name: "Pizza Place".into(),
            category: "Italiana".into(),
            address: "Rua X, 100".into(),
            phone: Some("1111-1111".into()),
            delivery_fee: Decimal::new(500, 2),
            rating: Some(Decimal::new(45, 1)),
        },
        now,
    )
    .await?;
    let sushi_house = db::restaurants::create(
        &mut *tx,
        &RestaurantCreate {
            name: "Sushi House".into(),
            category: "Japonesa".into(),
            address: "Rua Y, 200".into(),
            phone: Some("2222-2222".into()),
            delivery_fee: Decimal::new(800, 2),
            rating: Some(Decimal::new(48, 1)),
        },
        now,
    )
    .await?;

    let margherita = db::products::create(
        &mut *tx,
        &product(
            "Pizza Margherita",
            "Molho de tomate, mussarela e manjericão",
            Decimal::new(3000, 2),
            "Italiana",
            pizza_place.id,
        ),
        true,
    )
    .await?;
    db::products::create(
        &mut *tx,
        &product(
            "Pizza Calabresa",
            "Calabresa fatiada com cebola",
            Decimal::new(3500, 2),
            "Italiana",
            pizza_place.id,
        ),
        true,
    )
    .await?;
    let salmon = db::products::create(
        &mut *tx,
        &product(
            "Sushi Salmão",
            "Oito peças de sushi de salmão",
            Decimal::new(2500, 2),
            "Japonesa",
            sushi_house.id,
        ),
        true,
    )
    .await?;
    db::products::create(
        &mut *tx,
        &product(
            "Temaki",
            "Temaki de salmão com cream cheese",
            Decimal::new(2000, 2),
            "Japonesa",
            sushi_house.id,
        ),
        false,
    )
    .await?;
    let guarana = db::products::create(
        &mut *tx,
        &product(
            "Guaraná",
            "Refrigerante lata 350ml",
            Decimal::new(600, 2),
            "Bebida",
            pizza_place.id,
        ),
        true,
    )
    .await?;

    db::orders::insert(
        &mut tx,
        &NewOrder {
            order_number: "PED001".into(),
            ordered_at: now,
            status: OrderStatus::Confirmed,
            total: order_total([margherita.price, guarana.price], pizza_place.delivery_fee),
            notes: Some("Sem cebola".into()),
            customer_id: thiago.id,
            restaurant_id: pizza_place.id,
            product_ids: vec![margherita.id, guarana.id],
        },
    )
    .await?;
    db::orders::insert(
        &mut tx,
        &NewOrder {
            order_number: "PED002".into(),
            ordered_at: now - DAY_MILLIS,
            status: OrderStatus::Preparing,
            total: order_total([salmon.price], sushi_house.delivery_fee),
            notes: None,
            customer_id: ana.id,
            restaurant_id: sushi_house.id,
            product_ids: vec![salmon.id],
        },
    )
    .await?;

    tx.commit().await?;
    tracing::info!("Demo data loaded: 3 customers, 2 restaurants, 5 products, 2 orders");
    Ok(true)
}
