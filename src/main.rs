use std::collections::BTreeMap;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use bigdecimal::BigDecimal;
use dotenvy::dotenv;

use storefront_core::{
    money, CartStore, Category, CheckoutConfig, CheckoutWorkflow, DeliveryInfo,
    InMemoryOrderRepository, InMemoryProductRepository, NewProduct, OrderRepository,
    PaymentDetails, ProductRepository,
};

fn sample_catalog() -> Vec<NewProduct> {
    let nutrition = |calories: &str, protein: &str| {
        let mut facts = BTreeMap::new();
        facts.insert("calories".to_string(), calories.to_string());
        facts.insert("protein".to_string(), protein.to_string());
        Some(facts)
    };

    vec![
        NewProduct {
            name: "Classic Burger".to_string(),
            description: "Beef patty with lettuce, tomato and house sauce".to_string(),
            category: Category::Meals,
            price: BigDecimal::from_str("8.50").expect("valid price"),
            nutrition: nutrition("540", "28g"),
            ingredients: Some(vec![
                "beef".to_string(),
                "brioche bun".to_string(),
                "lettuce".to_string(),
                "tomato".to_string(),
            ]),
            image: "burger.jpg".to_string(),
        },
        NewProduct {
            name: "Sweet Potato Fries".to_string(),
            description: "Crispy fries with smoked paprika".to_string(),
            category: Category::Snacks,
            price: BigDecimal::from_str("3.75").expect("valid price"),
            nutrition: nutrition("310", "3g"),
            ingredients: Some(vec!["sweet potato".to_string(), "paprika".to_string()]),
            image: "fries.jpg".to_string(),
        },
        NewProduct {
            name: "Fresh Lemonade".to_string(),
            description: "Squeezed to order".to_string(),
            category: Category::Beverages,
            price: BigDecimal::from_str("2.50").expect("valid price"),
            nutrition: None,
            ingredients: None,
            image: "lemonade.jpg".to_string(),
        },
    ]
}

fn checkout_config_from_env() -> CheckoutConfig {
    let defaults = CheckoutConfig::default();
    let tax_rate = env::var("TAX_RATE")
        .map(|v| BigDecimal::from_str(&v).expect("TAX_RATE must be a valid decimal"))
        .unwrap_or(defaults.tax_rate);
    let delivery_fee = env::var("DELIVERY_FEE")
        .map(|v| BigDecimal::from_str(&v).expect("DELIVERY_FEE must be a valid decimal"))
        .unwrap_or(defaults.delivery_fee);
    CheckoutConfig {
        tax_rate,
        delivery_fee,
    }
}

/// Demo composition root: seeds the catalog, walks a browse → cart →
/// checkout flow against the in-memory repositories, and prints the
/// confirmation payload.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let catalog = InMemoryProductRepository::with_latency(Duration::from_millis(300));
    for product in sample_catalog() {
        catalog.create(product).await?;
    }

    let order_repo = InMemoryOrderRepository::with_latency(Duration::from_millis(500));
    let workflow = CheckoutWorkflow::new(order_repo, checkout_config_from_env());
    let mut cart = CartStore::new();

    let products = catalog.get_all().await?;
    log::info!("catalog loaded: {} products", products.len());

    for product in &products {
        let quantity = if product.category == Category::Meals {
            2
        } else {
            1
        };
        cart.add_item(product.clone(), quantity);
    }
    cart.remove_item(products[2].id);
    cart.set_quantity(products[1].id, 3);

    log::info!(
        "cart: {} items, total {}",
        cart.state().item_count,
        money::round_display(&cart.state().total)
    );

    let delivery = DeliveryInfo {
        name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        phone: "555-0100".to_string(),
        address: "1 Analytical Way".to_string(),
        city: "London".to_string(),
        zip_code: "E1 6AN".to_string(),
    };
    let payment = PaymentDetails::Card {
        number: "4111111111111111".to_string(),
        expiry: "12/27".to_string(),
        cvv: "123".to_string(),
    };

    let order = workflow.submit(cart.state(), delivery, payment).await?;
    // Only a successful submit clears the cart.
    cart.clear();

    let confirmation = workflow.repo().get_by_id(order.id).await?;
    println!("{}", serde_json::to_string_pretty(&confirmation)?);

    workflow.clear_current_order().await;
    Ok(())
}
