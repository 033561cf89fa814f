//! Seed the database with a small demo dataset.
//!
//! Goes through the same service layer the HTTP handlers use, so seeded
//! rows pass the exact validation rules applied to API input.

use tracing::info;

use crm_server::db;
use crm_server::services::{
    self, CreateCustomerInput, CreateOrderInput, CreateProductInput,
};

use super::migrate;

/// Seed customers, products, and orders.
///
/// With `wipe` set, existing rows are deleted first (join table before
/// orders, then customers and products).
///
/// # Errors
///
/// Returns an error if the database is unreachable or any seed row fails
/// validation or persistence.
pub async fn run(wipe: bool) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = migrate::database_url()?;
    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    if wipe {
        info!("Wiping existing rows");
        sqlx::query("DELETE FROM order_product")
            .execute(&pool)
            .await?;
        sqlx::query("DELETE FROM customer_order")
            .execute(&pool)
            .await?;
        sqlx::query("DELETE FROM customer").execute(&pool).await?;
        sqlx::query("DELETE FROM product").execute(&pool).await?;
    }

    let alice = services::create_customer(
        &pool,
        CreateCustomerInput {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            phone: Some("+1234567890".to_string()),
        },
    )
    .await?;

    let bob = services::create_customer(
        &pool,
        CreateCustomerInput {
            name: "Bob".to_string(),
            email: "bob@example.com".to_string(),
            phone: Some("123-456-7890".to_string()),
        },
    )
    .await?;

    let carol = services::create_customer(
        &pool,
        CreateCustomerInput {
            name: "Carol".to_string(),
            email: "carol@example.com".to_string(),
            phone: None,
        },
    )
    .await?;

    info!(
        customers = 3,
        alice = %alice.id,
        bob = %bob.id,
        carol = %carol.id,
        "Customers seeded"
    );

    let laptop = services::create_product(
        &pool,
        CreateProductInput {
            name: "Laptop".to_string(),
            price: "999.99".to_string(),
            stock: Some(10),
            description: None,
        },
    )
    .await?;

    let mouse = services::create_product(
        &pool,
        CreateProductInput {
            name: "Mouse".to_string(),
            price: "25.50".to_string(),
            stock: Some(50),
            description: None,
        },
    )
    .await?;

    let keyboard = services::create_product(
        &pool,
        CreateProductInput {
            name: "Keyboard".to_string(),
            price: "45.75".to_string(),
            stock: Some(30),
            description: None,
        },
    )
    .await?;

    info!(products = 3, "Products seeded");

    let order1 = services::create_order(
        &pool,
        CreateOrderInput {
            customer_id: alice.id,
            product_ids: vec![laptop.id, mouse.id],
            order_date: None,
        },
    )
    .await?;

    let order2 = services::create_order(
        &pool,
        CreateOrderInput {
            customer_id: bob.id,
            product_ids: vec![keyboard.id],
            order_date: None,
        },
    )
    .await?;

    info!(
        orders = 2,
        order1_total = %order1.total_amount,
        order2_total = %order2.total_amount,
        "Orders seeded"
    );

    info!("Seeding complete!");
    Ok(())
}
