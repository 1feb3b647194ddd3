// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! One small operation per user-facing action.
//!
//! Every operation validates its input before any I/O and reports failure
//! as an [`AppError`]; nothing here panics on bad data.

pub mod auth;
pub mod congregations;
pub mod districts;
pub mod events;
pub mod speakers;
pub mod speeches;
pub mod users;

use crate::error::{AppError, Result};
use crate::repositories::{EntityStream, Repositories};
use futures_util::stream::BoxStream;
use futures_util::StreamExt;

/// Live, already ordered snapshots.
pub type Observed<T> = BoxStream<'static, Result<Vec<T>>>;

pub(crate) fn ensure(condition: bool, message: &str) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(AppError::bad_request(message))
    }
}

/// Map repository snapshots through `arrange` (sorting, filtering).
pub(crate) fn observe<T, F>(stream: EntityStream<T>, arrange: F) -> Observed<T>
where
    T: Send + 'static,
    F: Fn(Vec<T>) -> Result<Vec<T>> + Send + 'static,
{
    stream
        .map(move |snapshot| match snapshot {
            Ok(items) => arrange(items),
            Err(e) => Err(AppError::from(e)),
        })
        .boxed()
}

/// The data operations the HTTP API exposes, built once per store.
#[derive(Clone)]
pub struct UseCases {
    pub save_district: districts::SaveDistrict,
    pub delete_district: districts::DeleteDistrict,
    pub get_district: districts::GetDistrict,
    pub get_districts: districts::GetDistricts,
    pub observe_districts: districts::ObserveDistricts,

    pub save_congregation: congregations::SaveCongregation,
    pub delete_congregation: congregations::DeleteCongregation,
    pub get_congregation: congregations::GetCongregation,
    pub get_congregations: congregations::GetCongregations,
    pub get_all_congregations: congregations::GetAllCongregations,
    pub observe_all_congregations: congregations::ObserveAllCongregations,

    pub save_speaker: speakers::SaveSpeaker,
    pub move_speaker: speakers::MoveSpeaker,
    pub delete_speaker: speakers::DeleteSpeaker,
    pub get_speaker: speakers::GetSpeaker,
    pub get_speakers: speakers::GetSpeakers,
    pub get_all_speakers: speakers::GetAllSpeakers,

    pub save_speech: speeches::SaveSpeech,
    pub delete_speech: speeches::DeleteSpeech,
    pub get_speeches: speeches::GetSpeeches,
    pub observe_speeches: speeches::ObserveSpeeches,

    pub save_event: events::SaveCongregationEvent,
    pub delete_event: events::DeleteCongregationEvent,
    pub get_event: events::GetEventById,
    pub get_events: events::GetCongregationEvents,
    pub observe_events: events::ObserveEventsForCongregation,
    pub observe_all_events: events::ObserveAllEvents,

    pub get_user: users::GetUser,
    pub list_users: users::ListUsers,
    pub update_user_access: users::UpdateUserAccess,
}

impl UseCases {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            save_district: districts::SaveDistrict::new(repos.districts.clone()),
            delete_district: districts::DeleteDistrict::new(repos.districts.clone()),
            get_district: districts::GetDistrict::new(repos.districts.clone()),
            get_districts: districts::GetDistricts::new(repos.districts.clone()),
            observe_districts: districts::ObserveDistricts::new(repos.districts.clone()),

            save_congregation: congregations::SaveCongregation::new(repos.congregations.clone()),
            delete_congregation: congregations::DeleteCongregation::new(
                repos.congregations.clone(),
            ),
            get_congregation: congregations::GetCongregation::new(repos.congregations.clone()),
            get_congregations: congregations::GetCongregations::new(repos.congregations.clone()),
            get_all_congregations: congregations::GetAllCongregations::new(
                repos.congregations.clone(),
            ),
            observe_all_congregations: congregations::ObserveAllCongregations::new(
                repos.congregations.clone(),
            ),

            save_speaker: speakers::SaveSpeaker::new(repos.speakers.clone()),
            move_speaker: speakers::MoveSpeaker::new(repos.speakers.clone()),
            delete_speaker: speakers::DeleteSpeaker::new(repos.speakers.clone()),
            get_speaker: speakers::GetSpeaker::new(repos.speakers.clone()),
            get_speakers: speakers::GetSpeakers::new(repos.speakers.clone()),
            get_all_speakers: speakers::GetAllSpeakers::new(repos.speakers.clone()),

            save_speech: speeches::SaveSpeech::new(repos.speeches.clone()),
            delete_speech: speeches::DeleteSpeech::new(repos.speeches.clone()),
            get_speeches: speeches::GetSpeeches::new(repos.speeches.clone()),
            observe_speeches: speeches::ObserveSpeeches::new(repos.speeches.clone()),

            save_event: events::SaveCongregationEvent::new(repos.events.clone()),
            delete_event: events::DeleteCongregationEvent::new(repos.events.clone()),
            get_event: events::GetEventById::new(repos.events.clone()),
            get_events: events::GetCongregationEvents::new(repos.events.clone()),
            observe_events: events::ObserveEventsForCongregation::new(repos.events.clone()),
            observe_all_events: events::ObserveAllEvents::new(repos.events.clone()),

            get_user: users::GetUser::new(repos.users.clone()),
            list_users: users::ListUsers::new(repos.users.clone()),
            update_user_access: users::UpdateUserAccess::new(repos.users.clone()),
        }
    }
}
