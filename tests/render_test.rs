use deck_upload::config::PanelConfig;
use deck_upload::render::{Display, NodeUpdate, Target, ViewState, render, results_view};
use deck_upload::response::UploadResponse;
use deck_upload::templates::Templates;
use deck_upload::visibility::{Panel, Visibility};

fn parse(body: &str) -> deck_upload::UploadResult {
    UploadResponse::parse(body)
        .unwrap()
        .into_result("fallback")
        .unwrap()
}

fn render_result(body: &str) -> Vec<NodeUpdate> {
    let result = parse(body);
    let config = PanelConfig::default();
    let view = ViewState {
        file_name: Some("visites.xlsx".to_string()),
        visibility: Visibility::compute(true, &Panel::Results(Box::new(result.clone()))),
        results: Some(results_view(&result, &config)),
        ..ViewState::default()
    };
    render(&view, &Templates::new().unwrap()).unwrap()
}

fn text_of<'a>(updates: &'a [NodeUpdate], id: &str) -> Option<&'a str> {
    updates.iter().find_map(|u| match u {
        NodeUpdate::SetText {
            target: Target::Id(t),
            text,
        } if *t == id => Some(text.as_str()),
        _ => None,
    })
}

fn html_of<'a>(updates: &'a [NodeUpdate], id: &str) -> Option<&'a str> {
    updates.iter().find_map(|u| match u {
        NodeUpdate::SetHtml {
            target: Target::Id(t),
            html,
        } if *t == id => Some(html.as_str()),
        _ => None,
    })
}

fn display_of(updates: &[NodeUpdate], target: Target) -> Option<Display> {
    updates.iter().find_map(|u| match u {
        NodeUpdate::SetDisplay { target: t, display } if *t == target => Some(*display),
        _ => None,
    })
}

#[test]
fn test_hidden_details() {
    let updates = render_result(
        r#"{"success": true, "files": [], "stats": {
            "primary_stats": {"A": 1}, "show_details": false, "sort_column": "code site"
        }}"#,
    );
    assert_eq!(display_of(&updates, Target::DetailsPanel), Some(Display::None));
    assert!(html_of(&updates, "primaryList").is_none());
    assert!(html_of(&updates, "sortList").is_none());
    println!("✓ show_details=false hides the details panel");
}

#[test]
fn test_primary_rows_largest_first() {
    let updates = render_result(
        r#"{"success": true, "files": [], "stats": {
            "primary_label": "DR", "stats_title": "Répartition par DR",
            "primary_stats": {"A": 5, "B": 9}, "show_details": true, "sort_column": "DR IAM"
        }}"#,
    );
    assert_eq!(display_of(&updates, Target::DetailsPanel), Some(Display::Grid));
    let html = html_of(&updates, "primaryList").unwrap();
    let b = html.find("🏢 B").unwrap();
    let a = html.find("🏢 A").unwrap();
    assert!(b < a, "B (9) should come before A (5): {}", html);
    assert!(html.contains("9 lignes"));
    assert_eq!(text_of(&updates, "primaryTitle"), Some("🏢 Répartition par DR"));
    println!("✓ Primary breakdown is sorted by line count");
}

#[test]
fn test_ties_keep_server_order() {
    let updates = render_result(
        r#"{"success": true, "files": [], "stats": {
            "primary_stats": {"Zeta": 2, "Alpha": 2, "Mid": 3}, "show_details": true
        }}"#,
    );
    let html = html_of(&updates, "primaryList").unwrap();
    let mid = html.find("Mid").unwrap();
    let zeta = html.find("Zeta").unwrap();
    let alpha = html.find("Alpha").unwrap();
    assert!(mid < zeta && zeta < alpha, "{}", html);
}

#[test]
fn test_redundant_sort_card_hidden() {
    for column in ["ville", "DR IAM", "ST FO"] {
        let body = format!(
            r#"{{"success": true, "files": [], "stats": {{
                "primary_label": "ville", "primary_stats": {{"Paris": 3}},
                "sort_stats": {{"Paris": 3}}, "show_details": true, "sort_column": "{}"
            }}}}"#,
            column
        );
        let updates = render_result(&body);
        assert_eq!(
            display_of(&updates, Target::SortCard),
            Some(Display::None),
            "{} should hide the sort card",
            column
        );
        assert!(html_of(&updates, "sortList").is_none());
    }

    let updates = render_result(
        r#"{"success": true, "files": [], "stats": {
            "primary_stats": {}, "sort_stats": {"SITE001": 1, "SITE002": 4},
            "show_details": true, "sort_column": "code site"
        }}"#,
    );
    assert_eq!(display_of(&updates, Target::SortCard), Some(Display::Block));
    assert_eq!(text_of(&updates, "sortTitle"), Some("📋 Répartition par code site"));
    let html = html_of(&updates, "sortList").unwrap();
    assert!(html.find("SITE002").unwrap() < html.find("SITE001").unwrap());
    assert!(html.contains("1 ligne<"));
    println!("✓ Sort card only for non-redundant columns");
}

#[test]
fn test_name_only_file_row() {
    let updates = render_result(r#"{"success": true, "files": ["out1.xlsx"], "stats": {}}"#);
    let html = html_of(&updates, "filesList").unwrap();
    assert!(html.contains("📄 out1.xlsx"));
    assert!(html.contains(r#"href="/download/out1.xlsx/""#));
    assert!(!html.contains("file-lines"));
    assert_eq!(text_of(&updates, "totalStFo"), Some("-"));
    println!("✓ Basic file rows link to the download endpoint");
}

#[test]
fn test_detailed_file_row() {
    let updates = render_result(
        r#"{"success": true, "files": ["x"], "stats": {"total_st_fo": 4},
            "files_details": [{"filename": "code site_A 1.pptx", "lines": 1}]}"#,
    );
    let html = html_of(&updates, "filesList").unwrap();
    assert!(html.contains(r#"<span class="file-lines">1 ligne</span>"#));
    assert!(html.contains("/download/code%20site_A%201.pptx/"));
    assert_eq!(text_of(&updates, "totalStFo"), Some("4"));
}

#[test]
fn test_names_are_escaped() {
    let updates = render_result(
        r#"{"success": true, "files": ["<b>x</b>.pptx"], "stats": {
            "primary_stats": {"<script>alert(1)</script>": 1}, "show_details": true
        }}"#,
    );
    let primary = html_of(&updates, "primaryList").unwrap();
    assert!(!primary.contains("<script>"));
    assert!(primary.contains("&lt;script&gt;"));
    let files = html_of(&updates, "filesList").unwrap();
    assert!(!files.contains("<b>"));
}

#[test]
fn test_summary_texts() {
    let updates = render_result(
        r#"{"success": true, "files": [], "stats": {
            "total_rows": 27, "primary_count": 2, "primary_label": "ville",
            "file_count": 2, "file_size": "9.0 KB"
        }}"#,
    );
    assert_eq!(text_of(&updates, "totalRows"), Some("27"));
    assert_eq!(text_of(&updates, "primaryCount"), Some("2"));
    assert_eq!(text_of(&updates, "primaryLabel"), Some("Nombre de villes"));
    assert_eq!(text_of(&updates, "fileCount"), Some("2"));
    assert_eq!(text_of(&updates, "fileSize"), Some("9.0 KB"));
}

#[test]
fn test_idle_view_hides_every_section() {
    let updates = render(&ViewState::default(), &Templates::new().unwrap()).unwrap();
    for id in ["fileSelected", "sortSection", "loading", "statsSection", "results", "error"] {
        assert_eq!(
            display_of(&updates, Target::Id(id)),
            Some(Display::None),
            "{} should be hidden",
            id
        );
    }
    assert!(updates.contains(&NodeUpdate::ClearValue {
        target: Target::Id("fileInput")
    }));
}

#[test]
fn test_field_group_classes() {
    use deck_upload::validator::{FieldId, FieldMarks, Validity};

    let view = ViewState {
        marks: FieldMarks {
            date_start: Validity::Invalid,
            date_end: Validity::Valid,
            purpose: Validity::Unmarked,
        },
        ..ViewState::default()
    };
    let updates = render(&view, &Templates::new().unwrap()).unwrap();
    let class_of = |field: FieldId, class: &str| {
        updates.iter().find_map(|u| match u {
            NodeUpdate::SetClass {
                target: Target::FieldGroup(f),
                class: c,
                on,
            } if *f == field && *c == class => Some(*on),
            _ => None,
        })
    };

    assert_eq!(class_of(FieldId::DateStart, "invalid"), Some(true));
    assert_eq!(class_of(FieldId::DateStart, "valid"), Some(false));
    assert_eq!(class_of(FieldId::DateEnd, "valid"), Some(true));
    assert_eq!(class_of(FieldId::DateEnd, "invalid"), Some(false));
    assert_eq!(class_of(FieldId::Purpose, "valid"), Some(false));
    assert_eq!(class_of(FieldId::Purpose, "invalid"), Some(false));
    println!("✓ Field groups carry the class of their marker");
}
