// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use super::{ensure, observe, Observed};
use crate::error::Result;
use crate::models::Congregation;
use crate::repositories::{CongregationRepository, Entity};

fn sort_by_name(mut congregations: Vec<Congregation>) -> Result<Vec<Congregation>> {
    congregations.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    Ok(congregations)
}

#[derive(Clone)]
pub struct SaveCongregation {
    repository: CongregationRepository,
}

impl SaveCongregation {
    pub fn new(repository: CongregationRepository) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, mut congregation: Congregation) -> Result<Congregation> {
        ensure(
            !congregation.name.trim().is_empty(),
            "Congregation name cannot be blank.",
        )?;
        ensure(
            !congregation.district_id.trim().is_empty(),
            "District ID cannot be blank.",
        )?;
        let district_id = congregation.district_id.clone();
        let id = self.repository.save(&district_id, &congregation).await?;
        congregation.set_id(id);
        Ok(congregation)
    }
}

#[derive(Clone)]
pub struct DeleteCongregation {
    repository: CongregationRepository,
}

impl DeleteCongregation {
    pub fn new(repository: CongregationRepository) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, district_id: &str, congregation_id: &str) -> Result<()> {
        ensure(
            !congregation_id.trim().is_empty(),
            "Congregation ID cannot be blank.",
        )?;
        self.repository.delete(district_id, congregation_id).await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct GetCongregation {
    repository: CongregationRepository,
}

impl GetCongregation {
    pub fn new(repository: CongregationRepository) -> Self {
        Self { repository }
    }

    pub async fn execute(
        &self,
        district_id: &str,
        congregation_id: &str,
    ) -> Result<Option<Congregation>> {
        ensure(
            !congregation_id.trim().is_empty(),
            "Congregation ID cannot be blank.",
        )?;
        Ok(self.repository.get(district_id, congregation_id).await?)
    }
}

/// Congregations of one district, in store order.
#[derive(Clone)]
pub struct GetCongregations {
    repository: CongregationRepository,
}

impl GetCongregations {
    pub fn new(repository: CongregationRepository) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, district_id: &str) -> Result<Vec<Congregation>> {
        ensure(
            !district_id.trim().is_empty(),
            "District ID cannot be blank.",
        )?;
        Ok(self.repository.list(district_id).await?)
    }
}

#[derive(Clone)]
pub struct GetAllCongregations {
    repository: CongregationRepository,
}

impl GetAllCongregations {
    pub fn new(repository: CongregationRepository) -> Self {
        Self { repository }
    }

    pub async fn execute(&self) -> Result<Vec<Congregation>> {
        sort_by_name(self.repository.list_all().await?)
    }
}

#[derive(Clone)]
pub struct ObserveAllCongregations {
    repository: CongregationRepository,
}

impl ObserveAllCongregations {
    pub fn new(repository: CongregationRepository) -> Self {
        Self { repository }
    }

    pub async fn execute(&self) -> Result<Observed<Congregation>> {
        Ok(observe(self.repository.watch_all().await?, sort_by_name))
    }
}
