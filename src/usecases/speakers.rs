// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use super::{ensure, observe, Observed};
use crate::error::Result;
use crate::models::{Congregation, Speaker};
use crate::repositories::{Entity, SpeakerRepository};

fn ensure_location(speaker: &Speaker) -> Result<()> {
    ensure(
        !speaker.district_id.trim().is_empty() && !speaker.congregation_id.trim().is_empty(),
        "District ID and congregation ID cannot be blank.",
    )
}

#[derive(Clone)]
pub struct SaveSpeaker {
    repository: SpeakerRepository,
}

impl SaveSpeaker {
    pub fn new(repository: SpeakerRepository) -> Self {
        Self { repository }
    }

    /// Save at the location named by the speaker's own district and
    /// congregation ids.
    pub async fn execute(&self, mut speaker: Speaker) -> Result<Speaker> {
        ensure(
            !speaker.last_name.trim().is_empty(),
            "Speaker last name cannot be blank.",
        )?;
        ensure_location(&speaker)?;

        let (district_id, congregation_id) =
            (speaker.district_id.clone(), speaker.congregation_id.clone());
        let id = self
            .repository
            .save(&district_id, &congregation_id, &speaker)
            .await?;
        speaker.set_id(id);
        Ok(speaker)
    }

    /// Save as a member of `congregation`, overriding the speaker's location.
    pub async fn execute_in(&self, speaker: Speaker, congregation: &Congregation) -> Result<Speaker> {
        self.execute(Speaker {
            district_id: congregation.district_id.clone(),
            congregation_id: congregation.id.clone(),
            ..speaker
        })
        .await
    }
}

/// Move a speaker to the congregation named in its ids, keeping its id.
#[derive(Clone)]
pub struct MoveSpeaker {
    repository: SpeakerRepository,
}

impl MoveSpeaker {
    pub fn new(repository: SpeakerRepository) -> Self {
        Self { repository }
    }

    /// The old document is deleted only after the write at the new location
    /// succeeded, and only when the location actually changed.
    pub async fn execute(
        &self,
        speaker: &Speaker,
        old_district_id: &str,
        old_congregation_id: &str,
    ) -> Result<()> {
        ensure_location(speaker)?;
        ensure(
            !speaker.id.trim().is_empty(),
            "Cannot move a speaker without an existing ID.",
        )?;

        let moved = speaker.district_id != old_district_id
            || speaker.congregation_id != old_congregation_id;

        self.repository
            .save(&speaker.district_id, &speaker.congregation_id, speaker)
            .await?;

        if moved && !old_district_id.trim().is_empty() && !old_congregation_id.trim().is_empty() {
            self.repository
                .delete(old_district_id, old_congregation_id, &speaker.id)
                .await?;
            tracing::info!(
                speaker_id = %speaker.id,
                from = %format!("{old_district_id}/{old_congregation_id}"),
                to = %format!("{}/{}", speaker.district_id, speaker.congregation_id),
                "Moved speaker"
            );
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct DeleteSpeaker {
    repository: SpeakerRepository,
}

impl DeleteSpeaker {
    pub fn new(repository: SpeakerRepository) -> Self {
        Self { repository }
    }

    pub async fn execute(
        &self,
        district_id: &str,
        congregation_id: &str,
        speaker_id: &str,
    ) -> Result<()> {
        ensure(!speaker_id.trim().is_empty(), "Speaker ID cannot be blank.")?;
        self.repository
            .delete(district_id, congregation_id, speaker_id)
            .await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct GetSpeaker {
    repository: SpeakerRepository,
}

impl GetSpeaker {
    pub fn new(repository: SpeakerRepository) -> Self {
        Self { repository }
    }

    pub async fn execute(
        &self,
        district_id: &str,
        congregation_id: &str,
        speaker_id: &str,
    ) -> Result<Option<Speaker>> {
        ensure(!speaker_id.trim().is_empty(), "Speaker ID cannot be blank.")?;
        Ok(self
            .repository
            .get(district_id, congregation_id, speaker_id)
            .await?)
    }
}

/// Speakers of one congregation.
#[derive(Clone)]
pub struct GetSpeakers {
    repository: SpeakerRepository,
}

impl GetSpeakers {
    pub fn new(repository: SpeakerRepository) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, district_id: &str, congregation_id: &str) -> Result<Vec<Speaker>> {
        Ok(self.repository.list(district_id, congregation_id).await?)
    }
}

/// Speakers of every congregation.
#[derive(Clone)]
pub struct GetAllSpeakers {
    repository: SpeakerRepository,
}

impl GetAllSpeakers {
    pub fn new(repository: SpeakerRepository) -> Self {
        Self { repository }
    }

    pub async fn execute(&self) -> Result<Vec<Speaker>> {
        Ok(self.repository.list_all().await?)
    }

    pub async fn observe(&self) -> Result<Observed<Speaker>> {
        Ok(observe(self.repository.watch_all().await?, Ok))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::error::AppError;
    use std::sync::Arc;

    fn speaker(id: &str, district_id: &str, congregation_id: &str) -> Speaker {
        Speaker {
            id: id.to_string(),
            district_id: district_id.to_string(),
            congregation_id: congregation_id.to_string(),
            first_name: "Max".to_string(),
            last_name: "Muster".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_save_requires_last_name_and_location() {
        let store = Arc::new(MemoryStore::new());
        let save = SaveSpeaker::new(SpeakerRepository::new(store.clone()));

        let mut nameless = speaker("", "D1", "C1");
        nameless.last_name = String::new();
        assert!(matches!(
            save.execute(nameless).await,
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            save.execute(speaker("", "D1", " ")).await,
            Err(AppError::BadRequest(_))
        ));
        assert_eq!(store.operation_count(), 0);
    }

    #[tokio::test]
    async fn test_save_in_congregation_overrides_location() {
        let store = Arc::new(MemoryStore::new());
        let repository = SpeakerRepository::new(store);
        let congregation = Congregation {
            id: "C9".to_string(),
            district_id: "D9".to_string(),
            name: "Süd".to_string(),
            ..Default::default()
        };

        let saved = SaveSpeaker::new(repository.clone())
            .execute_in(speaker("", "D1", "C1"), &congregation)
            .await
            .unwrap();
        assert_eq!(saved.district_id, "D9");
        assert!(repository.get("D9", "C9", &saved.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_move_keeps_id_and_removes_old_document() {
        let store = Arc::new(MemoryStore::new());
        let repository = SpeakerRepository::new(store);
        repository
            .save("D1", "C1", &speaker("S1", "D1", "C1"))
            .await
            .unwrap();

        MoveSpeaker::new(repository.clone())
            .execute(&speaker("S1", "D2", "C2"), "D1", "C1")
            .await
            .unwrap();

        assert!(repository.get("D1", "C1", "S1").await.unwrap().is_none());
        let moved = repository.get("D2", "C2", "S1").await.unwrap().unwrap();
        assert_eq!(moved.congregation_id, "C2");
    }

    #[tokio::test]
    async fn test_move_to_same_location_only_saves() {
        let store = Arc::new(MemoryStore::new());
        let repository = SpeakerRepository::new(store);
        let mut s = speaker("S1", "D1", "C1");
        repository.save("D1", "C1", &s).await.unwrap();

        s.phone = "0123".to_string();
        MoveSpeaker::new(repository.clone())
            .execute(&s, "D1", "C1")
            .await
            .unwrap();

        let loaded = repository.get("D1", "C1", "S1").await.unwrap().unwrap();
        assert_eq!(loaded.phone, "0123");
    }

    #[tokio::test]
    async fn test_move_without_id_fails() {
        let store = Arc::new(MemoryStore::new());
        let err = MoveSpeaker::new(SpeakerRepository::new(store.clone()))
            .execute(&speaker("", "D2", "C2"), "D1", "C1")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m.contains("existing ID")));
        assert_eq!(store.operation_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_write_keeps_old_document() {
        let store = Arc::new(MemoryStore::new());
        let repository = SpeakerRepository::new(store.clone());
        repository
            .save("D1", "C1", &speaker("S1", "D1", "C1"))
            .await
            .unwrap();

        store.fail_with("offline");
        assert!(MoveSpeaker::new(repository.clone())
            .execute(&speaker("S1", "D2", "C2"), "D1", "C1")
            .await
            .is_err());
        store.recover();

        assert!(repository.get("D1", "C1", "S1").await.unwrap().is_some());
        assert!(repository.get("D2", "C2", "S1").await.unwrap().is_none());
    }
}
