// src/services/stock_service.rs

use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::ProductRepository,
    models::product::{Product, ProductChanges},
};

#[derive(Clone)]
pub struct StockService {
    product_repo: ProductRepository,
}

impl StockService {
    pub fn new(product_repo: ProductRepository) -> Self {
        Self { product_repo }
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        self.product_repo.list().await
    }

    pub async fn create_product(
        &self,
        name: &str,
        category: &str,
        price: Decimal,
        stock: i32,
        image_url: Option<&str>,
    ) -> Result<Product, AppError> {
        let product = self.product_repo
            .create(name, category, price, stock, image_url)
            .await?;
        tracing::info!("📦 Produto {} cadastrado com estoque {}", product.id, product.stock);
        Ok(product)
    }

    pub async fn update_product(&self, id: i32, changes: &ProductChanges) -> Result<Product, AppError> {
        self.product_repo
            .update(id, changes)
            .await?
            .ok_or(AppError::ProductNotFound)
    }
}
