//! End-to-end library tests: load settings, plan a pass, apply the edits,
//! write the document back, and run a second pass over the result.

use autostamp::{
    apply_edits, load_from_path, plan, write_document, ConfigResolver, DocumentKind, DocumentView,
    ResolvedConfig, Settings, TimeSource,
};
use chrono::{DateTime, Local, TimeZone};
use std::fs;
use std::path::Path;

struct FixedTime {
    now: DateTime<Local>,
    created: Option<DateTime<Local>>,
}

impl FixedTime {
    fn new() -> Self {
        Self {
            now: Local.with_ymd_and_hms(2024, 6, 1, 12, 30, 0).unwrap(),
            created: Some(Local.with_ymd_and_hms(2020, 1, 1, 10, 0, 0).unwrap()),
        }
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> DateTime<Local> {
        self.now
    }

    fn created(&self, _path: &Path) -> Option<DateTime<Local>> {
        self.created
    }
}

fn test_config() -> ResolvedConfig {
    ResolvedConfig::compile(&Settings {
        suffix: Some(" by tester".to_string()),
        ..Settings::default()
    })
}

#[test]
fn full_pass_stamps_all_fields_and_writes_atomically() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    fs::write(&path, "Created: \nLast-Modified: \n\nbody text\n").unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let doc = DocumentView::over(&path, DocumentKind::from_path(&path), &text);
    let edits = plan(&doc, &test_config(), &FixedTime::new());
    assert_eq!(edits.len(), 2);

    let stamped = apply_edits(&text, &edits).unwrap();
    write_document(&path, &stamped).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "Created: 2020/01/01 10:00:00 by tester\n\
         Last-Modified: 2024/06/01 12:30:00 by tester\n\
         \n\
         body text\n"
    );
}

#[test]
fn second_pass_refreshes_modified_but_not_birth() {
    let config = test_config();
    let first_time = FixedTime::new();

    let original = "Created: \nLast-Modified: \n";
    let doc = DocumentView::over(Path::new("notes.txt"), DocumentKind::Plain, original);
    let once = apply_edits(original, &plan(&doc, &config, &first_time)).unwrap();

    // Later save: wall clock moved, creation instant did not.
    let second_time = FixedTime {
        now: Local.with_ymd_and_hms(2025, 2, 3, 8, 0, 0).unwrap(),
        ..FixedTime::new()
    };
    let doc = DocumentView::over(Path::new("notes.txt"), DocumentKind::Plain, &once);
    let twice = apply_edits(&once, &plan(&doc, &config, &second_time)).unwrap();

    assert_eq!(
        twice,
        "Created: 2020/01/01 10:00:00 by tester\n\
         Last-Modified: 2025/02/03 08:00:00 by tester\n"
    );
}

#[test]
fn tex_document_gets_creation_directive_from_placeholder() {
    let text = "% Created with autostamp\n\\date{XXX-DATE-WHEN-CREATED-XXX}\n";
    let doc = DocumentView::over(Path::new("paper.tex"), DocumentKind::from_path(Path::new("paper.tex")), text);

    let stamped = apply_edits(text, &plan(&doc, &test_config(), &FixedTime::new())).unwrap();
    assert_eq!(
        stamped,
        "% Created with autostamp\n\\date{\\DTMdate{2020-01-01}}\n"
    );
}

#[test]
fn settings_file_drives_the_pass() {
    let dir = tempfile::tempdir().unwrap();
    let settings_path = dir.path().join("autostamp.toml");
    fs::write(
        &settings_path,
        r#"
filename_pattern = "\\.md$"
line_limit = 2
format = "yyyy-MM-dd"
suffix = ""
"#,
    )
    .unwrap();

    let settings = load_from_path(&settings_path).unwrap();
    let mut resolver = ConfigResolver::new(settings);
    let config = resolver.snapshot();
    assert!(config.warnings.is_empty());

    let text = "Created: \nsecond\nCreated: \n";
    let time = FixedTime::new();

    // Matching filename, but only the first two lines are in the window.
    let doc = DocumentView::over(Path::new("readme.md"), DocumentKind::Plain, text);
    let edits = plan(&doc, &config, &time);
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].span.line, 0);
    assert_eq!(edits[0].new_text, "2020-01-01");

    // Non-matching filename is ignored entirely.
    let doc = DocumentView::over(Path::new("readme.txt"), DocumentKind::Plain, text);
    assert!(plan(&doc, &config, &time).is_empty());
}

#[test]
fn iso_fallback_is_used_when_format_is_empty() {
    let config = ResolvedConfig::compile(&Settings {
        format: String::new(),
        suffix: Some(String::new()),
        ..Settings::default()
    });

    let text = "Last-Modified: \n";
    let doc = DocumentView::over(Path::new("notes.txt"), DocumentKind::Plain, text);
    let time = FixedTime::new();
    let edits = plan(&doc, &config, &time);

    assert_eq!(edits.len(), 1);
    let parsed = DateTime::parse_from_rfc3339(&edits[0].new_text).unwrap();
    assert_eq!(parsed.with_timezone(&Local), time.now);
}

#[test]
fn documents_without_creation_metadata_still_save() {
    struct NoMetadata;

    impl TimeSource for NoMetadata {
        fn now(&self) -> DateTime<Local> {
            Local.with_ymd_and_hms(2024, 6, 1, 12, 30, 0).unwrap()
        }

        fn created(&self, _path: &Path) -> Option<DateTime<Local>> {
            None
        }
    }

    let text = "Created: \nLast-Modified: \n";
    let doc = DocumentView::over(Path::new("unsaved.txt"), DocumentKind::Plain, text);
    let stamped = apply_edits(text, &plan(&doc, &test_config(), &NoMetadata)).unwrap();

    assert_eq!(
        stamped,
        "Created: \nLast-Modified: 2024/06/01 12:30:00 by tester\n"
    );
}
