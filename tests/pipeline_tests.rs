//! End-to-end pipeline tests: real .xlsx files in, real .xlsx files out

use httpmock::prelude::*;
use pretty_assertions::assert_eq;
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use xlsx_translate::excel::ExcelImporter;
use xlsx_translate::pipeline::{translate_excel_file, ColumnTranslator, TranslationJob};
use xlsx_translate::translator::{DeeplConfig, DeeplTranslator, OpenAiConfig, OpenAiTranslator};
use xlsx_translate::{
    CellValue, FailurePolicy, Table, TranslateError, TranslateResult, TranslationRequest,
};

// ═══════════════════════════════════════════════════════════════════════════
// HELPERS
// ═══════════════════════════════════════════════════════════════════════════

/// en column only: "Hello", <empty>, "Good morning"
fn scenario_workbook(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("nl_translations.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Sheet1").unwrap();
    sheet.write_string(0, 0, "en").unwrap();
    sheet.write_string(1, 0, "Hello").unwrap();
    sheet.write_string(3, 0, "Good morning").unwrap();
    workbook.save(&path).unwrap();
    path
}

/// id / en / in_stock columns with mixed cell types
fn mixed_workbook(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("products.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Products").unwrap();
    sheet.write_string(0, 0, "id").unwrap();
    sheet.write_string(0, 1, "en").unwrap();
    sheet.write_string(0, 2, "in_stock").unwrap();

    sheet.write_number(1, 0, 1).unwrap();
    sheet.write_string(1, 1, "Apple").unwrap();
    sheet.write_boolean(1, 2, true).unwrap();

    sheet.write_number(2, 0, 2).unwrap();
    sheet.write_number(2, 1, 42).unwrap();
    sheet.write_boolean(2, 2, false).unwrap();

    sheet.write_number(3, 0, 3).unwrap();
    sheet.write_string(3, 1, "Pear").unwrap();
    sheet.write_boolean(3, 2, true).unwrap();
    workbook.save(&path).unwrap();
    path
}

fn dutch(req: &TranslationRequest) -> TranslateResult<String> {
    match req.text.as_str() {
        "Hello" => Ok("Hallo".to_string()),
        "Good morning" => Ok("Goedemorgen".to_string()),
        "Apple" => Ok("Appel".to_string()),
        "Pear" => Ok("Peer".to_string()),
        other => Err(TranslateError::Translation(format!("unexpected '{}'", other))),
    }
}

fn read(path: &Path, sheet: &str) -> Table {
    ExcelImporter::new(path).import_sheet(sheet).unwrap()
}

fn no_output(dir: &TempDir) -> bool {
    std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .all(|e| !e.file_name().to_string_lossy().contains("_translated"))
}

// ═══════════════════════════════════════════════════════════════════════════
// HAPPY PATH
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_english_to_dutch_workbook() {
    let dir = TempDir::new().unwrap();
    let input = scenario_workbook(&dir);

    let output = translate_excel_file(&input, "Sheet1", "en", "English", "Dutch", &dutch).unwrap();

    assert_eq!(output, dir.path().join("nl_translations_translated.xlsx"));
    let table = read(&output, "Sheet1");
    assert_eq!(table.headers, vec!["en", "en_nl"]);
    assert_eq!(
        table.rows,
        vec![
            vec![CellValue::from("Hello"), CellValue::from("Hallo")],
            vec![CellValue::Empty, CellValue::Empty],
            vec![CellValue::from("Good morning"), CellValue::from("Goedemorgen")],
        ]
    );
}

#[test]
fn test_input_file_is_not_modified() {
    let dir = TempDir::new().unwrap();
    let input = scenario_workbook(&dir);
    let before = read(&input, "Sheet1");

    translate_excel_file(&input, "Sheet1", "en", "English", "Dutch", &dutch).unwrap();

    assert_eq!(read(&input, "Sheet1"), before);
}

#[test]
fn test_other_columns_and_non_text_cells_survive() {
    let dir = TempDir::new().unwrap();
    let input = mixed_workbook(&dir);

    let job = TranslationJob::new(&input, "Products", "en", "en", "nl");
    let outcome = ColumnTranslator::new(&dutch).translate_file(&job).unwrap();

    let before = read(&input, "Products");
    let after = read(&outcome.output_path, "Products");

    assert_eq!(after.sheet, "Products");
    assert_eq!(after.headers, vec!["id", "en", "in_stock", "en_nl"]);
    assert_eq!(after.row_count(), before.row_count());
    for (old, new) in before.rows.iter().zip(&after.rows) {
        assert_eq!(&new[..3], &old[..]);
    }
    assert_eq!(
        after.column("en_nl").unwrap(),
        vec![
            &CellValue::from("Appel"),
            &CellValue::Number(42.0),
            &CellValue::from("Peer"),
        ]
    );
    assert_eq!(outcome.stats.translated, 2);
    assert_eq!(outcome.stats.passed_through, 1);
}

#[test]
fn test_explicit_output_path() {
    let dir = TempDir::new().unwrap();
    let input = scenario_workbook(&dir);
    let output = dir.path().join("out").join("dutch.xlsx");
    std::fs::create_dir_all(output.parent().unwrap()).unwrap();

    let job = TranslationJob::new(&input, "Sheet1", "en", "English", "Dutch").with_output(&output);
    let outcome = ColumnTranslator::new(&dutch).translate_file(&job).unwrap();

    assert_eq!(outcome.output_path, output);
    assert!(output.exists());
}

#[test]
fn test_dry_run_plan() {
    let dir = TempDir::new().unwrap();
    let input = scenario_workbook(&dir);

    let job = TranslationJob::new(&input, "Sheet1", "en", "English", "Dutch");
    let report = ColumnTranslator::plan(&job).unwrap();

    assert_eq!(report.rows, 3);
    assert_eq!(report.cells_to_translate, 2);
    assert_eq!(report.column_name, "en_nl");
    assert!(no_output(&dir));
}

// ═══════════════════════════════════════════════════════════════════════════
// FAILURES
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_missing_input_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("missing.xlsx");

    let err = translate_excel_file(&input, "Sheet1", "en", "English", "Dutch", &dutch).unwrap_err();

    assert!(matches!(err, TranslateError::NotFound(_)));
    assert!(no_output(&dir));
}

#[test]
fn test_missing_sheet() {
    let dir = TempDir::new().unwrap();
    let input = scenario_workbook(&dir);

    let err = translate_excel_file(&input, "Blad1", "en", "English", "Dutch", &dutch).unwrap_err();

    match err {
        TranslateError::Schema(msg) => assert!(msg.contains("Blad1") && msg.contains("Sheet1")),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(no_output(&dir));
}

#[test]
fn test_missing_column() {
    let dir = TempDir::new().unwrap();
    let input = scenario_workbook(&dir);

    let err = translate_excel_file(&input, "Sheet1", "fr", "French", "Dutch", &dutch).unwrap_err();

    assert!(matches!(err, TranslateError::Schema(_)));
    assert!(no_output(&dir));
}

#[test]
fn test_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("data.csv");
    std::fs::write(&input, "en\nHello\n").unwrap();

    let err = translate_excel_file(&input, "Sheet1", "en", "English", "Dutch", &dutch).unwrap_err();
    assert!(matches!(err, TranslateError::UnsupportedFormat(_)));
}

#[test]
fn test_abort_policy_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = scenario_workbook(&dir);
    let failing = |req: &TranslationRequest| -> TranslateResult<String> {
        match req.text.as_str() {
            "Hello" => Ok("Hallo".to_string()),
            _ => Err(TranslateError::Translation("503 Service Unavailable".to_string())),
        }
    };

    let job = TranslationJob::new(&input, "Sheet1", "en", "English", "Dutch");
    let err = ColumnTranslator::new(&failing)
        .with_policy(FailurePolicy::Abort)
        .translate_file(&job)
        .unwrap_err();

    assert!(matches!(err, TranslateError::Translation(_)));
    assert!(no_output(&dir));
}

#[test]
fn test_pass_through_policy_writes_original_text() {
    let dir = TempDir::new().unwrap();
    let input = scenario_workbook(&dir);
    let failing = |req: &TranslationRequest| -> TranslateResult<String> {
        match req.text.as_str() {
            "Hello" => Ok("Hallo".to_string()),
            _ => Err(TranslateError::Translation("503 Service Unavailable".to_string())),
        }
    };

    let job = TranslationJob::new(&input, "Sheet1", "en", "English", "Dutch");
    let outcome = ColumnTranslator::new(&failing)
        .with_policy(FailurePolicy::PassThrough)
        .translate_file(&job)
        .unwrap();

    assert_eq!(outcome.stats.failed, 1);
    let table = read(&outcome.output_path, "Sheet1");
    assert_eq!(table.cell(0, "en_nl"), Some(&CellValue::from("Hallo")));
    assert_eq!(table.cell(2, "en_nl"), Some(&CellValue::from("Good morning")));
}

#[test]
fn test_pass_through_policy_does_not_hide_unknown_language() {
    let dir = TempDir::new().unwrap();
    let input = scenario_workbook(&dir);
    let translator = DeeplTranslator::new(DeeplConfig::new("key:fx")).unwrap();

    let job = TranslationJob::new(&input, "Sheet1", "en", "en", "Elvish");
    let err = ColumnTranslator::new(&translator)
        .with_policy(FailurePolicy::PassThrough)
        .translate_file(&job)
        .unwrap_err();

    assert!(matches!(err, TranslateError::Config(_)));
    assert!(no_output(&dir));
}

// ═══════════════════════════════════════════════════════════════════════════
// REAL ADAPTER AGAINST A MOCK SERVER
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_openai_adapter_through_pipeline() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .header("authorization", "Bearer sk-test");
        then.status(200).json_body(serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": "\"Appel\"" } }]
        }));
    });

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fruit.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "en").unwrap();
    sheet.write_string(1, 0, "Apple").unwrap();
    sheet.write_number(2, 0, 7).unwrap();
    workbook.save(&path).unwrap();

    let translator =
        OpenAiTranslator::new(OpenAiConfig::new("sk-test").with_base_url(server.base_url()))
            .unwrap();
    let output =
        translate_excel_file(&path, "Sheet1", "en", "English", "Dutch", &translator).unwrap();

    mock.assert();
    let table = read(&output, "Sheet1");
    assert_eq!(
        table.column("en_nl").unwrap(),
        vec![&CellValue::from("Appel"), &CellValue::Number(7.0)]
    );
}
