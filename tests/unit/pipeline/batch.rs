use super::*;
use crate::pdf::reader::page_count_file;

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

fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    std::fs::create_dir_all(dir).unwrap();
    let path = dir.join(format!("{name}.png"));
    image::RgbImage::from_pixel(width, height, image::Rgb([120, 30, 200]))
        .save(&path)
        .unwrap();
    path
}

fn a6() -> (Settings, SheetSpec) {
    let settings = Settings::default();
    let sheet = settings.sheet(Some("A6")).unwrap();
    (settings, sheet)
}

#[test]
fn writes_one_pdf_per_image_named_by_stem() {
    let dir = temp_dir("batch_sheets");
    let images = vec![
        write_png(&dir.join("in"), "alpha", 300, 450),
        write_png(&dir.join("in"), "beta", 450, 300),
    ];
    let (settings, sheet) = a6();
    let out_dir = dir.join("out");

    let outputs = generate_sheets(&images, &sheet, &settings, &out_dir).unwrap();
    assert_eq!(outputs.len(), 2);
    assert_eq!(outputs[0].pdf, out_dir.join("alpha.pdf"));
    assert_eq!(outputs[1].pdf, out_dir.join("beta.pdf"));
    for out in &outputs {
        assert!(out.total > 0);
        assert_eq!(page_count_file(&out.pdf).unwrap(), 1);
    }

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn same_sized_images_share_one_layout() {
    let dir = temp_dir("batch_cache");
    let images = vec![
        write_png(&dir, "one", 200, 300),
        write_png(&dir, "two", 200, 300),
    ];
    let (settings, sheet) = a6();
    let mut cache = LayoutCache::new();

    generate_sheets_with_cache(&images, &sheet, &settings, &dir.join("out"), &mut cache).unwrap();
    assert_eq!(cache.misses(), 1);
    assert_eq!(cache.hits(), 1);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn oversized_image_is_rejected() {
    let dir = temp_dir("batch_oversize");
    // 30 x 30 inches at 10 dpi
    let images = vec![write_png(&dir, "poster", 300, 300)];
    let (_, sheet) = a6();
    let settings = Settings {
        dpi: 10.0,
        ..Settings::default()
    };
    let out_dir = dir.join("out");

    let err = generate_sheets(&images, &sheet, &settings, &out_dir).unwrap_err();
    match err {
        CardsheetError::InvalidInput(msg) => assert!(msg.contains("does not fit on sheet")),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!out_dir.join("poster.pdf").exists());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_image_stops_the_batch() {
    let dir = temp_dir("batch_missing");
    let (settings, sheet) = a6();
    let err = generate_sheets(&[dir.join("ghost.png")], &sheet, &settings, &dir).unwrap_err();
    assert!(matches!(err, CardsheetError::NotFound(_)));
}

#[test]
fn duplex_pairs_by_position_and_truncates() {
    let dir = temp_dir("batch_duplex");
    let fronts: Vec<PathBuf> = ["f1", "f2", "f3"]
        .iter()
        .map(|n| write_png(&dir.join("front"), n, 300, 450))
        .collect();
    let backs: Vec<PathBuf> = ["b1", "b2"]
        .iter()
        .map(|n| write_png(&dir.join("back"), n, 300, 450))
        .collect();
    let (settings, sheet) = a6();
    let out_dir = dir.join("out");

    let written = generate_duplex(&fronts, &backs, &sheet, &settings, &out_dir).unwrap();
    assert_eq!(
        written,
        vec![out_dir.join("f1&b1.pdf"), out_dir.join("f2&b2.pdf")]
    );
    for path in &written {
        assert_eq!(page_count_file(path).unwrap(), 2);
    }
    assert!(!out_dir.join("f3.pdf").exists());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn invalid_settings_fail_before_any_work() {
    let dir = temp_dir("batch_settings");
    let settings = Settings {
        dpi: -1.0,
        ..Settings::default()
    };
    let sheet = Settings::default().sheet(None).unwrap();
    let err = generate_duplex(&[], &[], &sheet, &settings, &dir).unwrap_err();
    assert!(matches!(err, CardsheetError::InvalidInput(_)));
}
