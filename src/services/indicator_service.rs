// src/services/indicator_service.rs

use crate::{common::error::AppError, db::IndicatorRepository, models::indicator::Indicators};

#[derive(Clone)]
pub struct IndicatorService {
    indicator_repo: IndicatorRepository,
}

impl IndicatorService {
    pub fn new(indicator_repo: IndicatorRepository) -> Self {
        Self { indicator_repo }
    }

    pub async fn get_indicators(&self) -> Result<Indicators, AppError> {
        self.indicator_repo.get_indicators().await
    }
}
