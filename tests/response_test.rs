use deck_upload::response::{PrimaryDetail, PrimaryEntry, UploadResponse};

const DETAILED_REPLY: &str = r#"{
    "success": true,
    "message": "3 fichiers PowerPoint générés",
    "files": ["ville_Paris.pptx", "ville_Lyon.pptx", "ville_Lille.pptx"],
    "files_details": [
        {"filename": "ville_Paris.pptx", "lines": 12},
        {"filename": "ville_Lyon.pptx", "lines": 1},
        {"filename": "ville_Lille.pptx", "lines": 4}
    ],
    "stats": {
        "total_rows": 17,
        "total_st_fo": 3,
        "primary_count": 3,
        "primary_stats": {
            "Paris": {"lines": 12, "st_fo": 2, "files": 1},
            "Lyon": {"lines": 1, "st_fo": 1, "files": 1},
            "Lille": {"lines": 4, "st_fo": 1, "files": 1}
        },
        "primary_label": "ville",
        "stats_title": "Répartition par ville",
        "sort_column": "ville",
        "sort_stats": {},
        "group_count": 0,
        "show_details": true,
        "file_size": "8.2 KB",
        "file_count": 3
    }
}"#;

const BASIC_REPLY: &str = r#"{
    "success": true,
    "files": ["code site_SITE001.pptx"],
    "stats": {
        "total_rows": 8,
        "primary_count": 4,
        "primary_stats": {},
        "primary_label": "code site",
        "stats_title": "",
        "sort_column": "code site",
        "sort_stats": {"SITE001": 3, "SITE002": 2},
        "show_details": false,
        "file_size": "5.1 KB",
        "file_count": 1
    }
}"#;

#[test]
fn test_detailed_reply() {
    let result = UploadResponse::parse(DETAILED_REPLY)
        .unwrap()
        .into_result("fallback")
        .unwrap();

    assert!(result.files.iter().all(|f| f.lines.is_some()));
    assert_eq!(result.message.as_deref(), Some("3 fichiers PowerPoint générés"));
    assert_eq!(result.stats.total_st_fo, Some(3));
    assert_eq!(result.files.len(), 3);
    assert_eq!(result.files[1].lines, Some(1));

    // Key order as sent by the server
    let keys: Vec<&str> = result.stats.primary_stats.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["Paris", "Lyon", "Lille"]);
    assert_eq!(
        result.stats.primary_stats.0[0].1,
        PrimaryEntry::Detailed(PrimaryDetail {
            lines: 12,
            st_fo: 2,
            files: 1
        })
    );
    println!("✓ Detailed reply keeps file line counts and key order");
}

#[test]
fn test_basic_reply() {
    let result = UploadResponse::parse(BASIC_REPLY)
        .unwrap()
        .into_result("fallback")
        .unwrap();

    assert_eq!(result.stats.total_st_fo, None);
    assert_eq!(result.stats.group_count, None);
    assert_eq!(result.files.len(), 1);
    assert_eq!(result.files[0].name, "code site_SITE001.pptx");
    assert_eq!(result.files[0].lines, None);
    assert!(!result.stats.show_details);
    println!("✓ Basic reply falls back to name-only files");
}

#[test]
fn test_empty_details_fall_back_to_files() {
    let body = r#"{"success": true, "files": ["a.pptx"], "files_details": [], "stats": {}}"#;
    let result = UploadResponse::parse(body).unwrap().into_result("x").unwrap();
    assert_eq!(result.files[0].name, "a.pptx");
    assert_eq!(result.files[0].lines, None);
}

#[test]
fn test_bare_primary_counts() {
    let body = r#"{"success": true, "stats": {"primary_stats": {"A": 5, "B": 9}}}"#;
    let result = UploadResponse::parse(body).unwrap().into_result("x").unwrap();
    let entries = &result.stats.primary_stats.0;
    assert_eq!(entries[0], ("A".to_string(), PrimaryEntry::Count(5)));
    assert_eq!(entries[1].1.lines(), 9);
}

#[test]
fn test_failure_messages() {
    let server = UploadResponse::parse(r#"{"error": "Colonne de tri \"x\" non trouvée"}"#)
        .unwrap()
        .into_result("fallback")
        .unwrap_err();
    assert_eq!(server, "Colonne de tri \"x\" non trouvée");

    let silent = UploadResponse::parse(r#"{"success": false}"#)
        .unwrap()
        .into_result("Une erreur est survenue")
        .unwrap_err();
    assert_eq!(silent, "Une erreur est survenue");

    let empty = UploadResponse::parse(r#"{"success": false, "error": ""}"#)
        .unwrap()
        .into_result("fallback")
        .unwrap_err();
    assert_eq!(empty, "fallback");
    println!("✓ Server failures surface the message or the fallback");
}

#[test]
fn test_success_without_stats() {
    let err = UploadResponse::parse(r#"{"success": true, "files": []}"#)
        .unwrap()
        .into_result("fallback")
        .unwrap_err();
    assert!(err.starts_with("Erreur de connexion: "));
    assert!(err.contains("stats"));
}

#[test]
fn test_null_maps_are_empty() {
    let body = r#"{"success": true, "stats": {"primary_stats": null, "sort_stats": null}}"#;
    let result = UploadResponse::parse(body).unwrap().into_result("x").unwrap();
    assert!(result.stats.primary_stats.is_empty());
    assert!(result.stats.sort_stats.is_empty());
}
