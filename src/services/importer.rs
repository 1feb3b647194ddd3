// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bulk import of districts, congregations, speakers and speeches from the
//! semicolon-separated circuit export.
//!
//! Column layout (0-based):
//!
//! | cols  | field                                        |
//! |-------|----------------------------------------------|
//! | 0, 1  | district id, name                            |
//! | 2, 3  | congregation id, name                        |
//! | 4-8   | address: street, number, suffix, zip, city   |
//! | 11    | congregation active (`WAHR`)                 |
//! | 12-17 | speaker id, last, first, mobile, phone, mail |
//! | 18    | speaker congregation id                      |
//! | 19    | spiritual status (1 elder, 2 servant)        |
//! | 20    | speaker active                               |
//! | 23-25 | speech number, subject, active               |

use crate::models::{Congregation, District, Speaker, Speech, SpiritualStatus};
use crate::repositories::{RepositoryError, Repositories};
use serde::Serialize;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;

const MIN_COLUMNS: usize = 20;
const TRUE_MARKER: &str = "WAHR";

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Everything parsed from one file, deduplicated by id.
#[derive(Debug, Default, Clone)]
pub struct ImportBatch {
    pub districts: Vec<District>,
    pub congregations: Vec<Congregation>,
    pub speakers: Vec<Speaker>,
    pub speeches: Vec<Speech>,
    /// Distinct speech numbers that are not plain numbers
    pub rejected_speech_numbers: Vec<String>,
    pub rows: usize,
    /// Rows with too few columns
    pub short_rows: usize,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub districts: usize,
    pub congregations: usize,
    pub speakers: usize,
    pub speeches: usize,
    pub skipped_congregations: usize,
    pub skipped_speakers: usize,
    pub skipped_speeches: usize,
}

/// Speeches are keyed and ordered by number, so only plain numbers qualify.
fn is_speech_number(number: &str) -> bool {
    number.parse::<u32>().is_ok()
}

/// Trimmed, lossily decoded view of one row.
struct Row<'a>(&'a csv::ByteRecord);

impl Row<'_> {
    fn get(&self, index: usize) -> String {
        self.0
            .get(index)
            .map(|field| String::from_utf8_lossy(field).trim().to_string())
            .unwrap_or_default()
    }

    fn flag(&self, index: usize) -> bool {
        self.get(index).eq_ignore_ascii_case(TRUE_MARKER)
    }

    fn joined(&self, indices: &[usize], sep: &str) -> String {
        indices
            .iter()
            .map(|&i| self.get(i))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(sep)
    }

    /// "street number suffix, zip city" without dangling separators.
    fn address(&self) -> String {
        [self.joined(&[4, 5, 6], " "), self.joined(&[7, 8], " ")]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn spiritual_status(&self) -> SpiritualStatus {
        match self.get(19).parse::<u32>() {
            Ok(1) => SpiritualStatus::Elder,
            Ok(2) => SpiritualStatus::MinisterialServant,
            _ => SpiritualStatus::Unknown,
        }
    }
}

pub fn parse_file(path: &Path) -> Result<ImportBatch, ImportError> {
    let file = std::fs::File::open(path).map_err(|source| ImportError::Open {
        path: path.display().to_string(),
        source,
    })?;
    parse_csv(file)
}

/// Parse the export. The header row is skipped; the first occurrence of
/// each id wins.
pub fn parse_csv<R: Read>(reader: R) -> Result<ImportBatch, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);

    let mut districts: BTreeMap<String, District> = BTreeMap::new();
    let mut congregations: BTreeMap<String, Congregation> = BTreeMap::new();
    let mut speakers: BTreeMap<String, Speaker> = BTreeMap::new();
    let mut speeches: BTreeMap<String, Speech> = BTreeMap::new();
    let mut rejected_speech_numbers: BTreeSet<String> = BTreeSet::new();
    let mut batch = ImportBatch::default();

    let mut record = csv::ByteRecord::new();
    while reader.read_byte_record(&mut record)? {
        batch.rows += 1;
        if record.len() < MIN_COLUMNS {
            batch.short_rows += 1;
            continue;
        }
        let row = Row(&record);

        let district_id = row.get(0);
        if !district_id.is_empty() {
            districts
                .entry(district_id.clone())
                .or_insert_with(|| District {
                    id: district_id.clone(),
                    name: row.get(1),
                    ..Default::default()
                });
        }

        let congregation_id = row.get(2);
        if !congregation_id.is_empty() {
            congregations
                .entry(congregation_id.clone())
                .or_insert_with(|| Congregation {
                    id: congregation_id.clone(),
                    district_id: district_id.clone(),
                    name: row.get(3),
                    address: row.address(),
                    active: row.flag(11),
                    ..Default::default()
                });
        }

        let speaker_id = row.get(12);
        let speech_number = row.get(23);

        if !speaker_id.is_empty() {
            let speaker = match speakers.entry(speaker_id.clone()) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => entry.insert(Speaker {
                    id: speaker_id.clone(),
                    last_name: row.get(13),
                    first_name: row.get(14),
                    mobile: row.get(15),
                    phone: row.get(16),
                    email: row.get(17),
                    congregation_id: row.get(18),
                    spiritual_status: row.spiritual_status(),
                    active: row.flag(20),
                    ..Default::default()
                }),
            };
            if is_speech_number(&speech_number)
                && !speaker.speech_number_ids.contains(&speech_number)
            {
                speaker.speech_number_ids.push(speech_number.clone());
            }
        }

        if is_speech_number(&speech_number) {
            speeches
                .entry(speech_number.clone())
                .or_insert_with(|| Speech {
                    id: speech_number.clone(),
                    number: speech_number.clone(),
                    subject: row.get(24),
                    active: row.flag(25),
                });
        } else if !speech_number.is_empty() && rejected_speech_numbers.insert(speech_number.clone())
        {
            tracing::warn!(row = batch.rows, number = %speech_number, "Skipping non-numeric speech number");
        }
    }

    batch.districts = districts.into_values().collect();
    batch.congregations = congregations.into_values().collect();
    batch.speakers = speakers.into_values().collect();
    batch.speeches = speeches.into_values().collect();
    batch.rejected_speech_numbers = rejected_speech_numbers.into_iter().collect();

    tracing::info!(
        rows = batch.rows,
        short_rows = batch.short_rows,
        districts = batch.districts.len(),
        congregations = batch.congregations.len(),
        speakers = batch.speakers.len(),
        speeches = batch.speeches.len(),
        rejected_speech_numbers = batch.rejected_speech_numbers.len(),
        "Parsed import file"
    );
    Ok(batch)
}

/// Upsert the batch with its explicit ids. Stops at the first failed write.
pub async fn write_batch(
    repos: &Repositories,
    batch: &ImportBatch,
    with_speeches: bool,
) -> Result<ImportReport, ImportError> {
    let mut report = ImportReport::default();

    for district in &batch.districts {
        repos.districts.save(district).await?;
        report.districts += 1;
    }

    let mut locations: BTreeMap<&str, &str> = BTreeMap::new();
    for congregation in &batch.congregations {
        if congregation.district_id.is_empty() {
            tracing::warn!(name = %congregation.name, "Skipping congregation without district");
            report.skipped_congregations += 1;
            continue;
        }
        repos
            .congregations
            .save(&congregation.district_id, congregation)
            .await?;
        locations.insert(&congregation.id, &congregation.district_id);
        report.congregations += 1;
    }

    for speaker in &batch.speakers {
        let Some(&district_id) = locations.get(speaker.congregation_id.as_str()) else {
            tracing::warn!(
                speaker_id = %speaker.id,
                congregation_id = %speaker.congregation_id,
                "Skipping speaker without known congregation"
            );
            report.skipped_speakers += 1;
            continue;
        };
        let placed = Speaker {
            district_id: district_id.to_string(),
            ..speaker.clone()
        };
        repos
            .speakers
            .save(district_id, &speaker.congregation_id, &placed)
            .await?;
        report.speakers += 1;
    }

    if with_speeches {
        report.skipped_speeches = batch.rejected_speech_numbers.len();
        for speech in &batch.speeches {
            if !is_speech_number(&speech.number) {
                tracing::warn!(number = %speech.number, "Skipping non-numeric speech number");
                report.skipped_speeches += 1;
                continue;
            }
            repos.speeches.save(speech).await?;
            report.speeches += 1;
        }
    }

    tracing::info!(?report, "Import written");
    Ok(report)
}
