// src/services/production_service.rs

use crate::{
    common::error::AppError,
    db::{ProductRepository, ProductionRepository},
    models::{
        production::{Production, ProductionWithProduct},
        status::Status,
    },
};

#[derive(Clone)]
pub struct ProductionService {
    production_repo: ProductionRepository,
    product_repo: ProductRepository,
}

impl ProductionService {
    pub fn new(production_repo: ProductionRepository, product_repo: ProductRepository) -> Self {
        Self { production_repo, product_repo }
    }

    pub async fn list(&self) -> Result<Vec<ProductionWithProduct>, AppError> {
        let rows = self.production_repo.list_with_product().await?;
        Ok(rows.into_iter().map(ProductionWithProduct::from).collect())
    }

    pub async fn plan(&self, product_id: i32, quantity_planned: i32) -> Result<Production, AppError> {
        self.product_repo
            .find_by_id(product_id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        let production = self.production_repo.create(product_id, quantity_planned).await?;
        tracing::info!(
            "🏭 Produção {} planejada: produto {} x{}",
            production.id, product_id, quantity_planned
        );
        Ok(production)
    }

    pub async fn update_status(
        &self,
        id: i32,
        status: Option<Status>,
        quantity_produced: Option<i32>,
    ) -> Result<Production, AppError> {
        self.production_repo
            .update_status(id, status, quantity_produced)
            .await?
            .ok_or(AppError::ProductionNotFound)
    }
}
