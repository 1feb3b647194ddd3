// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use super::{ensure, observe, Observed};
use crate::error::{AppError, Result};
use crate::models::Speech;
use crate::repositories::{Entity, SpeechRepository};

/// Order by the integer value of `number`. One unparseable number fails the
/// whole list.
fn sort_by_number(speeches: Vec<Speech>) -> Result<Vec<Speech>> {
    let mut keyed = speeches
        .into_iter()
        .map(|speech| match speech.parsed_number() {
            Ok(n) => Ok((n, speech)),
            Err(e) => Err(AppError::InvalidData(format!(
                "speech '{}' has non-numeric number '{}': {}",
                speech.id, speech.number, e
            ))),
        })
        .collect::<Result<Vec<_>>>()?;
    keyed.sort_by_key(|(n, _)| *n);
    Ok(keyed.into_iter().map(|(_, speech)| speech).collect())
}

#[derive(Clone)]
pub struct SaveSpeech {
    repository: SpeechRepository,
}

impl SaveSpeech {
    pub fn new(repository: SpeechRepository) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, mut speech: Speech) -> Result<Speech> {
        ensure(
            !speech.number.trim().is_empty(),
            "Speech number cannot be blank.",
        )?;
        ensure(
            !speech.subject.trim().is_empty(),
            "Speech subject cannot be blank.",
        )?;
        let id = self.repository.save(&speech).await?;
        speech.set_id(id);
        Ok(speech)
    }
}

#[derive(Clone)]
pub struct DeleteSpeech {
    repository: SpeechRepository,
}

impl DeleteSpeech {
    pub fn new(repository: SpeechRepository) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, speech_id: &str) -> Result<()> {
        ensure(!speech_id.trim().is_empty(), "Speech ID cannot be blank.")?;
        self.repository.delete(speech_id).await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct GetSpeeches {
    repository: SpeechRepository,
}

impl GetSpeeches {
    pub fn new(repository: SpeechRepository) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, active_only: bool) -> Result<Vec<Speech>> {
        let speeches = if active_only {
            self.repository.active_speeches().await?
        } else {
            self.repository.list().await?
        };
        sort_by_number(speeches)
    }
}

#[derive(Clone)]
pub struct ObserveSpeeches {
    repository: SpeechRepository,
}

impl ObserveSpeeches {
    pub fn new(repository: SpeechRepository) -> Self {
        Self { repository }
    }

    pub async fn execute(&self) -> Result<Observed<Speech>> {
        Ok(observe(self.repository.watch().await?, sort_by_number))
    }
}
