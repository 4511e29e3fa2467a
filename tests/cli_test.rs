#![cfg(feature = "cli")]

use std::fs;
use tempfile::tempdir;

use deck_upload::config::PanelConfig;
use deck_upload::form::SortColumn;
use deck_upload::preview::{check_submission, preview_reply};
use deck_upload::sample::{SAMPLE_HEADERS, sample_rows, sample_workbook, write_sample_workbook};
use deck_upload::selection::SelectedFile;

#[test]
fn test_preview_of_saved_reply() {
    let body = r#"{
        "success": true,
        "message": "2 fichiers générés",
        "files": ["ville_Paris.pptx", "ville_Lyon.pptx"],
        "files_details": [
            {"filename": "ville_Paris.pptx", "lines": 3},
            {"filename": "ville_Lyon.pptx", "lines": 1}
        ],
        "stats": {
            "total_rows": 4, "total_st_fo": 2, "primary_count": 2,
            "primary_label": "ville", "stats_title": "Répartition par ville",
            "primary_stats": {"Lyon": {"lines": 1, "st_fo": 1, "files": 1},
                              "Paris": {"lines": 3, "st_fo": 1, "files": 1}},
            "sort_column": "ville", "show_details": true,
            "file_count": 2, "file_size": "6.0 KB"
        }
    }"#;

    let out = preview_reply(body, &PanelConfig::default());
    assert!(out.starts_with("2 fichiers générés\n"));
    assert!(out.contains("Lignes totales : 4"));
    assert!(out.contains("ST FO : 2"));
    assert!(out.contains("Nombre de villes : 2"));
    assert!(out.contains("🏙️ Paris : 3 lignes | 1 ST FO | 1 fichier"));
    assert!(out.find("Paris :").unwrap() < out.find("Lyon :").unwrap());
    assert!(!out.contains("📋 Répartition"));
    assert!(out.contains("📄 ville_Lyon.pptx (1 ligne) -> /download/ville_Lyon.pptx/"));
    println!("✓ Preview prints summary, breakdown and links");
}

#[test]
fn test_preview_of_failure() {
    let out = preview_reply(r#"{"success": false, "error": "Fichier vide"}"#, &PanelConfig::default());
    assert_eq!(out, "Erreur: Fichier vide\n");
}

#[test]
fn test_check_lists_parts() {
    let out = check_submission(
        SelectedFile::new("visites.xlsx", vec![0; 2048]),
        SortColumn::Ville,
        "2024-06-01",
        "",
        "Audit",
        &PanelConfig::default(),
    )
    .unwrap();

    assert!(out.contains("Fichier : visites.xlsx (2.0 KB)"));
    assert!(out.contains("dateDebut : valide"));
    assert!(out.contains("dateFin : -"));
    assert!(out.contains("POST /upload/"));
    assert!(out.contains("file = visites.xlsx (2048 octets)"));
    assert!(out.contains(r#"sort_column = "ville""#));
    assert!(out.contains(r#"date_fin = """#));
}

#[test]
fn test_check_reports_inverted_dates() {
    let out = check_submission(
        SelectedFile::new("visites.xlsx", vec![1]),
        SortColumn::CodeSite,
        "2024-06-10",
        "2024-06-01",
        "",
        &PanelConfig::default(),
    )
    .unwrap();
    assert!(out.contains("dateDebut : invalide"));
    assert!(out.contains("dateFin : invalide"));
    assert!(out.contains("Erreur: "));
    assert!(!out.contains("POST"));
}

#[test]
fn test_check_rejects_non_excel() {
    let result = check_submission(
        SelectedFile::new("visites.csv", vec![1]),
        SortColumn::CodeSite,
        "",
        "",
        "",
        &PanelConfig::default(),
    );
    assert!(result.is_err());
}

#[test]
fn test_sample_rows() {
    assert_eq!(sample_rows(false).len(), 8);
    let rich = sample_rows(true);
    assert_eq!(rich.len(), 27);
    let gaps = rich.iter().filter(|row| row.iter().any(|v| v.is_empty())).count();
    assert_eq!(gaps, 3);
    assert_eq!(SAMPLE_HEADERS[0], "code site");
}

#[test]
fn test_sample_workbook_file() {
    let bytes = sample_workbook(false).unwrap();
    assert!(bytes.starts_with(b"PK"), "xlsx is a zip archive");

    let dir = tempdir().unwrap();
    let path = dir.path().join("test_sites.xlsx");
    let written = write_sample_workbook(&path, true).unwrap();
    assert_eq!(fs::metadata(&path).unwrap().len() as usize, written);
    println!("✓ Sample workbook written ({} bytes)", written);
}
