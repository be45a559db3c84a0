use std::path::PathBuf;

use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "cardsheet_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn defaults_match_print_conventions() {
    let s = Settings::default();
    assert_eq!(s.dpi, 300.0);
    assert_eq!(s.margin_mm, 6.35);
    assert_eq!(s.min_spacing_mm, 1.0);
    assert_eq!(s.default_sheet, "A4");
    assert!(!s.persist_files);
    s.validate().unwrap();
}

#[test]
fn missing_file_loads_defaults() {
    let s = Settings::load(Path::new("/nonexistent/cardsheet/settings.json")).unwrap();
    assert_eq!(s, Settings::default());
}

#[test]
fn partial_json_fills_in_defaults() {
    let s: Settings =
        serde_json::from_str(r#"{ "dpi": 600, "sheets": { "Postcard": { "width": 100, "height": 148 } } }"#)
            .unwrap();
    assert_eq!(s.dpi, 600.0);
    assert_eq!(s.margin_mm, DEFAULT_MARGIN_MM);
    assert_eq!(s.catalog().get("postcard"), Some(Dimension::new(100.0, 148.0)));
}

#[test]
fn save_then_load_preserves_values() {
    let dir = temp_dir("settings_save");
    let path = dir.join("cardsheet.json");
    let mut s = Settings {
        margin_mm: 3.0,
        persist_files: true,
        ..Settings::default()
    };
    s.sheets
        .insert("A4".to_string(), Dimension::new(200.0, 287.0));
    s.save(&path).unwrap();

    let loaded = Settings::load(&path).unwrap();
    assert_eq!(loaded, s);
    assert_eq!(loaded.sheet(None).unwrap().paper, Dimension::new(200.0, 287.0));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn malformed_file_is_a_serde_error() {
    let dir = temp_dir("settings_bad");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("cardsheet.json");
    std::fs::write(&path, "{ not json").unwrap();
    let err = Settings::load(&path).unwrap_err();
    assert!(matches!(err, CardsheetError::Serde(_)));
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn validation_rejects_bad_numbers() {
    for s in [
        Settings {
            dpi: 0.0,
            ..Settings::default()
        },
        Settings {
            margin_mm: -1.0,
            ..Settings::default()
        },
        Settings {
            min_spacing_mm: f64::NAN,
            ..Settings::default()
        },
    ] {
        assert!(matches!(s.validate(), Err(CardsheetError::InvalidInput(_))));
    }
}

#[test]
fn sheet_resolution() {
    let s = Settings::default();
    let letter = s.sheet(Some("Letter")).unwrap();
    assert_eq!(letter.paper, Dimension::new(215.9, 279.4));
    assert_eq!(letter.margin, DEFAULT_MARGIN_MM);
    assert!(matches!(
        s.sheet(Some("Napkin")),
        Err(CardsheetError::InvalidInput(_))
    ));
    assert_eq!(s.sheet_for(Dimension::new(1.0, 2.0)).margin, DEFAULT_MARGIN_MM);
}
