// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use super::{ensure, observe, Observed};
use crate::error::Result;
use crate::models::CongregationEvent;
use crate::repositories::{CongregationEventRepository, Entity};

/// Events without a date come first, then by date, then by id.
fn sort_by_date(mut events: Vec<CongregationEvent>) -> Result<Vec<CongregationEvent>> {
    events.sort_by(|a, b| a.date().cmp(&b.date()).then_with(|| a.id.cmp(&b.id)));
    Ok(events)
}

#[derive(Clone)]
pub struct SaveCongregationEvent {
    repository: CongregationEventRepository,
}

impl SaveCongregationEvent {
    pub fn new(repository: CongregationEventRepository) -> Self {
        Self { repository }
    }

    /// The event is stored under `district_id` and its own congregation id.
    pub async fn execute(
        &self,
        district_id: &str,
        mut event: CongregationEvent,
    ) -> Result<CongregationEvent> {
        ensure(
            !event.congregation_id.trim().is_empty(),
            "Congregation ID cannot be blank.",
        )?;
        event.date_string = event
            .date_string
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        if let Some(date) = &event.date_string {
            ensure(
                event.date().is_some(),
                &format!("Event date '{date}' must be a valid YYYY-MM-DD date."),
            )?;
        }
        let congregation_id = event.congregation_id.clone();
        let id = self
            .repository
            .save(district_id, &congregation_id, &event)
            .await?;
        event.set_id(id);
        Ok(event)
    }
}

#[derive(Clone)]
pub struct DeleteCongregationEvent {
    repository: CongregationEventRepository,
}

impl DeleteCongregationEvent {
    pub fn new(repository: CongregationEventRepository) -> Self {
        Self { repository }
    }

    pub async fn execute(
        &self,
        district_id: &str,
        congregation_id: &str,
        event_id: &str,
    ) -> Result<()> {
        ensure(!event_id.trim().is_empty(), "Event ID cannot be blank.")?;
        self.repository
            .delete(district_id, congregation_id, event_id)
            .await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct GetEventById {
    repository: CongregationEventRepository,
}

impl GetEventById {
    pub fn new(repository: CongregationEventRepository) -> Self {
        Self { repository }
    }

    pub async fn execute(
        &self,
        district_id: &str,
        congregation_id: &str,
        event_id: &str,
    ) -> Result<Option<CongregationEvent>> {
        ensure(!event_id.trim().is_empty(), "Event ID cannot be blank.")?;
        Ok(self
            .repository
            .get(district_id, congregation_id, event_id)
            .await?)
    }
}

#[derive(Clone)]
pub struct GetCongregationEvents {
    repository: CongregationEventRepository,
}

impl GetCongregationEvents {
    pub fn new(repository: CongregationEventRepository) -> Self {
        Self { repository }
    }

    pub async fn execute(
        &self,
        district_id: &str,
        congregation_id: &str,
    ) -> Result<Vec<CongregationEvent>> {
        sort_by_date(self.repository.list(district_id, congregation_id).await?)
    }
}

#[derive(Clone)]
pub struct ObserveEventsForCongregation {
    repository: CongregationEventRepository,
}

impl ObserveEventsForCongregation {
    pub fn new(repository: CongregationEventRepository) -> Self {
        Self { repository }
    }

    pub async fn execute(
        &self,
        district_id: &str,
        congregation_id: &str,
    ) -> Result<Observed<CongregationEvent>> {
        let stream = self.repository.watch(district_id, congregation_id).await?;
        Ok(observe(stream, sort_by_date))
    }
}

/// Events of every congregation.
#[derive(Clone)]
pub struct ObserveAllEvents {
    repository: CongregationEventRepository,
}

impl ObserveAllEvents {
    pub fn new(repository: CongregationEventRepository) -> Self {
        Self { repository }
    }

    pub async fn execute(&self) -> Result<Observed<CongregationEvent>> {
        Ok(observe(self.repository.watch_all().await?, sort_by_date))
    }

    pub async fn snapshot(&self) -> Result<Vec<CongregationEvent>> {
        sort_by_date(self.repository.list_all().await?)
    }
}
