use std::collections::BTreeMap;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// Menu category a product belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Meals,
    Snacks,
    Beverages,
}

/// A catalog product. Owned by the product repository; the cart stores a
/// denormalized copy of it per line, so later catalog edits never alter
/// lines already in a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category: Category,
    /// Non-negative unit price in decimal currency units.
    pub price: BigDecimal,
    pub nutrition: Option<BTreeMap<String, String>>,
    pub ingredients: Option<Vec<String>>,
    pub image: String,
}

/// Payload for creating a product; the repository assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub category: Category,
    pub price: BigDecimal,
    pub nutrition: Option<BTreeMap<String, String>>,
    pub ingredients: Option<Vec<String>>,
    pub image: String,
}

impl NewProduct {
    pub fn into_product(self, id: i64) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            category: self.category,
            price: self.price,
            nutrition: self.nutrition,
            ingredients: self.ingredients,
            image: self.image,
        }
    }
}

/// Partial update for a product; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub price: Option<BigDecimal>,
    pub nutrition: Option<BTreeMap<String, String>>,
    pub ingredients: Option<Vec<String>>,
    pub image: Option<String>,
}

impl Product {
    pub fn apply_patch(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(nutrition) = patch.nutrition {
            self.nutrition = Some(nutrition);
        }
        if let Some(ingredients) = patch.ingredients {
            self.ingredients = Some(ingredients);
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
    }
}
