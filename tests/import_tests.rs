// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! CSV import into the repositories.

use speech_planning::db::MemoryStore;
use speech_planning::models::SpiritualStatus;
use speech_planning::repositories::Repositories;
use speech_planning::services::importer;
use std::io::Write;
use std::sync::Arc;

mod common;

const EXPORT: &str = "\
KreisNr;Kreis;VersNr;Versammlung;Strasse;Nr;Zusatz;PLZ;Ort;Frei1;Frei2;VersAktiv;RednerNr;Name;Vorname;Mobil;Telefon;Mail;RednerVers;Status;RednerAktiv;Frei3;Frei4;VortragNr;Thema;VortragAktiv
D1;DistrictName;C1;CongName;Street;1;;12345;City;;;WAHR;S1;Last;First;0170;;first@example.org;C1;2;WAHR;;;100;Subject;WAHR
D1;DistrictName;C1;CongName;Street;1;;12345;City;;;WAHR;S1;Last;First;0170;;first@example.org;C1;2;WAHR;;;7;Other;falsch
D1;DistrictName;C2;Orphan;;;;;;;;FALSCH;S2;Nobody;;;;;C404;;WAHR;;;;;
too;short
";

#[tokio::test]
async fn test_import_file_end_to_end() {
    let dir = std::env::temp_dir().join(format!("speech-import-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("export.csv");
    std::fs::File::create(&path)
        .unwrap()
        .write_all(EXPORT.as_bytes())
        .unwrap();

    let batch = importer::parse_file(&path).unwrap();
    assert_eq!(batch.rows, 4);
    assert_eq!(batch.short_rows, 1);

    let repos = Repositories::new(Arc::new(MemoryStore::new()));
    let report = importer::write_batch(&repos, &batch, true).await.unwrap();
    assert_eq!(report.districts, 1);
    assert_eq!(report.congregations, 2);
    assert_eq!(report.speakers, 1);
    assert_eq!(report.skipped_speakers, 1);
    assert_eq!(report.speeches, 2);

    let district = repos.districts.get("D1").await.unwrap().unwrap();
    assert_eq!(district.name, "DistrictName");

    let congregation = repos.congregations.get("D1", "C1").await.unwrap().unwrap();
    assert_eq!(congregation.name, "CongName");
    assert_eq!(congregation.address, "Street 1, 12345 City");
    assert!(congregation.active);

    let orphan_home = repos.congregations.get("D1", "C2").await.unwrap().unwrap();
    assert!(!orphan_home.active);

    let speaker = repos.speakers.get("D1", "C1", "S1").await.unwrap().unwrap();
    assert_eq!(speaker.district_id, "D1");
    assert_eq!(speaker.last_name, "Last");
    assert_eq!(speaker.spiritual_status, SpiritualStatus::MinisterialServant);
    assert!(speaker.active);
    assert_eq!(speaker.speech_number_ids, vec!["100", "7"]);

    let inactive = repos.speeches.get("7").await.unwrap().unwrap();
    assert!(!inactive.active);

    // Re-importing upserts instead of duplicating
    importer::write_batch(&repos, &batch, true).await.unwrap();
    assert_eq!(repos.speakers.list_all().await.unwrap().len(), 1);
    assert_eq!(repos.congregations.list_all().await.unwrap().len(), 2);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_missing_file_reports_path() {
    let err = importer::parse_file(std::path::Path::new("/nonexistent/export.csv")).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/export.csv"));
}
