// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use super::{ensure, observe, Observed};
use crate::error::Result;
use crate::models::District;
use crate::repositories::{DistrictRepository, Entity};

fn sort_by_id(mut districts: Vec<District>) -> Result<Vec<District>> {
    districts.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(districts)
}

#[derive(Clone)]
pub struct SaveDistrict {
    repository: DistrictRepository,
}

impl SaveDistrict {
    pub fn new(repository: DistrictRepository) -> Self {
        Self { repository }
    }

    /// Returns the district with its stored id.
    pub async fn execute(&self, mut district: District) -> Result<District> {
        ensure(
            !district.name.trim().is_empty(),
            "District name cannot be blank.",
        )?;
        let id = self.repository.save(&district).await?;
        district.set_id(id);
        Ok(district)
    }
}

#[derive(Clone)]
pub struct DeleteDistrict {
    repository: DistrictRepository,
}

impl DeleteDistrict {
    pub fn new(repository: DistrictRepository) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, district_id: &str) -> Result<()> {
        ensure(
            !district_id.trim().is_empty(),
            "District ID cannot be blank.",
        )?;
        self.repository.delete(district_id).await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct GetDistrict {
    repository: DistrictRepository,
}

impl GetDistrict {
    pub fn new(repository: DistrictRepository) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, district_id: &str) -> Result<Option<District>> {
        ensure(
            !district_id.trim().is_empty(),
            "District ID cannot be blank.",
        )?;
        Ok(self.repository.get(district_id).await?)
    }
}

#[derive(Clone)]
pub struct GetDistricts {
    repository: DistrictRepository,
}

impl GetDistricts {
    pub fn new(repository: DistrictRepository) -> Self {
        Self { repository }
    }

    /// All districts ordered by id; `active_only` drops inactive ones.
    pub async fn execute(&self, active_only: bool) -> Result<Vec<District>> {
        let districts = if active_only {
            self.repository.active_districts().await?
        } else {
            self.repository.list().await?
        };
        sort_by_id(districts)
    }
}

#[derive(Clone)]
pub struct ObserveDistricts {
    repository: DistrictRepository,
}

impl ObserveDistricts {
    pub fn new(repository: DistrictRepository) -> Self {
        Self { repository }
    }

    pub async fn execute(&self) -> Result<Observed<District>> {
        Ok(observe(self.repository.watch().await?, sort_by_id))
    }
}
