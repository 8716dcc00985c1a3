//! End-to-end tests over synthetic survey exports
//!
//! Load → label → filter → aggregate, the way the dashboard service chains
//! the core components.

mod helpers;

use esr_common::filter::{self, DurationRange, FilterSelection, FilterSpec};
use esr_common::labeler;
use esr_common::loader;
use esr_common::schema::{self, ESTIME_DE_SOI};
use esr_common::stats;
use esr_common::{Error, Table, Value};
use helpers::{survey_csv, survey_xlsx, Respondent};
use std::io::Write;

fn load(rows: &[Respondent]) -> Table {
    let raw = loader::load_bytes(survey_csv(rows).as_bytes(), Some("survey.csv")).unwrap();
    let labeled = labeler::apply_labels(&raw).unwrap();
    labeler::with_satisfaction_groups(&labeled).unwrap()
}

fn five_es_totals() -> Vec<Respondent> {
    [20.0, 25.0, 30.0, 35.0, 40.0]
        .into_iter()
        .map(Respondent::with_es_total)
        .collect()
}

// ========================================
// Loading
// ========================================

#[test]
fn test_load_fixture_shape() {
    let table = load(&five_es_totals());
    assert_eq!(table.len(), 5);
    for column in schema::required_columns() {
        assert!(table.has_column(column), "missing {}", column);
    }
    assert!(table.has_column("Genre_label"));
    assert!(table.has_column(schema::SATISFACTION_GROUP_COLUMN));
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(survey_csv(&five_es_totals()).as_bytes()).unwrap();

    let table = loader::load_path(file.path()).unwrap();
    assert_eq!(table.len(), 5);
}

fn workbook_rows() -> Vec<Respondent> {
    let mut rows = five_es_totals();
    rows[1] = rows[1].clone().genre(2);
    rows[4] = rows[4].clone().duration(None);
    rows
}

fn assert_workbook_table(table: &Table) {
    assert_eq!(table.len(), 5);
    // padded header cells are trimmed
    for column in schema::required_columns() {
        assert!(table.has_column(column), "missing {}", column);
    }
    assert!(table.has_column("Item21"));

    // codes stored as text read as numbers
    let age = table.require("Age").unwrap();
    assert!(age.iter().all(|v| *v == Value::Number(1.0)));

    let duration = table.require(schema::DURATION_COLUMN).unwrap();
    assert_eq!(duration.get(0), Some(&Value::Number(12.0)));
    assert_eq!(duration.get(4), Some(&Value::Missing));

    let es = stats::dimension_statistics(table, &ESTIME_DE_SOI).unwrap();
    assert_eq!(es.total.count, 5);
    assert_eq!(es.total.mean, 30.0);
    assert_eq!(es.item_mean.mean, 3.0);

    let labeled = labeler::apply_labels(table).unwrap();
    let women = filter::apply(&labeled, &FilterSpec::new().allow("Genre", [1i64])).unwrap();
    assert_eq!(women.len(), 4);
    let genre = labeled.require("Genre_label").unwrap();
    assert_eq!(genre.get(1), Some(&Value::from("Homme")));
}

#[test]
fn test_load_workbook_with_title_row() {
    let bytes = survey_xlsx(&workbook_rows(), true).unwrap();
    let table = loader::load_bytes(&bytes, Some("Etudes_relations_amoureuses.xlsx")).unwrap();
    assert_workbook_table(&table);
}

#[test]
fn test_load_workbook_with_empty_title_row() {
    // the used range starts on the header; row numbers must still line up
    let bytes = survey_xlsx(&workbook_rows(), false).unwrap();
    let table = loader::load_bytes(&bytes, Some("survey.xlsx")).unwrap();
    assert_workbook_table(&table);
}

#[test]
fn test_load_workbook_without_name() {
    for with_titles in [true, false] {
        let bytes = survey_xlsx(&workbook_rows(), with_titles).unwrap();
        assert_eq!(
            loader::SourceFormat::detect(&bytes, None),
            loader::SourceFormat::Workbook
        );
        let unnamed = loader::load_bytes(&bytes, None).unwrap();
        let named = loader::load_bytes(&bytes, Some("survey.xlsx")).unwrap();
        assert_eq!(unnamed, named);
        assert_workbook_table(&unnamed);
    }
}

#[test]
fn test_workbook_matches_delimited_export() {
    let rows = workbook_rows();
    let from_xlsx = loader::load_bytes(&survey_xlsx(&rows, true).unwrap(), None).unwrap();
    let from_csv = loader::load_bytes(survey_csv(&rows).as_bytes(), Some("survey.csv")).unwrap();
    assert_eq!(from_xlsx, from_csv);
}

#[test]
fn test_load_semicolon_decimal_comma() {
    let text = survey_csv(&five_es_totals())
        .replace(',', ";")
        .replace("2.5", "2,5");
    let table = loader::load_bytes(text.as_bytes(), None).unwrap();
    let item = table.require("Item 8").unwrap();
    assert_eq!(item.get(1).and_then(|v| v.as_f64()), Some(2.5));
}

#[test]
fn test_load_rejects_missing_required_column() {
    let text = survey_csv(&five_es_totals()).replace("Total GC", "Total XX");
    let err = loader::load_bytes(text.as_bytes(), Some("survey.csv")).unwrap_err();
    match err {
        Error::MalformedInput(msg) => {
            assert!(msg.contains("Total GC"), "{}", msg);
            assert!(msg.contains("2 header rows"), "{}", msg);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_load_rejects_duplicate_header() {
    let text = survey_csv(&five_es_totals()).replace("Item4", "Item6");
    let err = loader::load_bytes(text.as_bytes(), Some("survey.csv")).unwrap_err();
    assert!(matches!(err, Error::MalformedInput(msg) if msg.contains("duplicate")));
}

#[test]
fn test_load_rejects_non_survey_bytes() {
    let err = loader::load_bytes(&[0xff, 0xfe, 0x00, 0x81], Some("upload.bin")).unwrap_err();
    assert!(matches!(err, Error::MalformedInput(_)));
}

#[test]
fn test_optional_duration_column() {
    let text = survey_csv(&five_es_totals()).replace(",Item5,", ",Notes,");
    let raw = loader::load_bytes(text.as_bytes(), Some("survey.csv")).unwrap();
    assert!(!raw.has_column(schema::DURATION_COLUMN));

    // duration range is skipped, not an error
    let spec = FilterSpec::new().with_duration(DurationRange::new(0.0, 1.0).unwrap());
    assert_eq!(filter::apply(&raw, &spec).unwrap().len(), 5);
    assert!(filter::duration_bounds(&raw).is_none());
}

// ========================================
// Labeling
// ========================================

#[test]
fn test_labeling_is_idempotent() {
    let table = load(&five_es_totals());
    let again = labeler::apply_labels(&table).unwrap();
    assert_eq!(again, table);
}

#[test]
fn test_unmapped_code_goes_to_unlabeled_bucket() {
    let rows = vec![
        Respondent::default().genre(1),
        Respondent::default().genre(9),
        Respondent::default().genre(2),
    ];
    let table = load(&rows);

    let warnings = labeler::missing_mappings(&table);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].column, "Genre");
    assert_eq!(warnings[0].value, "9");
    assert_eq!(warnings[0].rows, 1);

    let counts = stats::label_counts(&table, "Genre_label").unwrap();
    assert_eq!(counts.last().map(|c| (c.label.clone(), c.count)), Some((None, 1)));
}

// ========================================
// Filtering
// ========================================

#[test]
fn test_empty_selection_keeps_everything() {
    let table = load(&five_es_totals());
    let spec = FilterSelection::default().to_spec().unwrap();
    assert!(spec.is_unconstrained());
    assert_eq!(filter::apply(&table, &spec).unwrap(), table);
}

#[test]
fn test_selection_from_json() {
    let rows = vec![
        Respondent::default().genre(1).duration(Some(6.0)),
        Respondent::default().genre(2).duration(Some(24.0)),
        Respondent::default().genre(1).duration(Some(48.0)),
        Respondent::default().genre(1).duration(None),
    ];
    let table = load(&rows);

    let selection: FilterSelection =
        serde_json::from_str(r#"{"genre": [1], "duration": {"min": 0, "max": 30}}"#).unwrap();
    let filtered = filter::apply(&table, &selection.to_spec().unwrap()).unwrap();
    // row with missing duration is excluded by the active range
    assert_eq!(filtered.len(), 1);
}

#[test]
fn test_selection_rejects_unknown_code() {
    let selection: FilterSelection = serde_json::from_str(r#"{"etude": [7]}"#).unwrap();
    assert!(matches!(selection.to_spec(), Err(Error::InvalidInput(_))));
}

#[test]
fn test_duration_bounds_are_observed_extremes() {
    let rows = vec![
        Respondent::default().duration(Some(3.5)),
        Respondent::default().duration(Some(60.0)),
        Respondent::default().duration(None),
    ];
    let bounds = filter::duration_bounds(&load(&rows)).unwrap();
    assert_eq!(bounds, DurationRange { min: 3.5, max: 60.0 });
}

// ========================================
// Aggregation
// ========================================

#[test]
fn test_aggregation_consistency() {
    let rows = vec![Respondent::default(); 3];
    let table = load(&rows);

    let es = stats::dimension_statistics(&table, &ESTIME_DE_SOI).unwrap();
    assert_eq!(es.total.count, 3);
    assert_eq!(es.total.mean, 30.0);
    assert_eq!(es.total.std_dev, 0.0);
    assert_eq!(es.item_mean.mean, 3.0);

    let naive: f64 = table
        .require("Total ES")
        .unwrap()
        .numbers()
        .sum::<f64>()
        / 3.0;
    assert_eq!(es.total.mean, naive);
}

#[test]
fn test_round_trip_scenario() {
    let table = load(&five_es_totals());

    let items = stats::item_statistics(&table, &["Item 8"]).unwrap();
    let s = items[0].stats;
    assert_eq!(s.count, 5);
    assert_eq!(s.mean, 3.0);
    assert_eq!(s.median, 3.0);
    assert_eq!(s.min, 2.0);
    assert_eq!(s.max, 4.0);
    // deviations -1, -0.5, 0, 0.5, 1 → sample variance 2.5 / 4
    assert!((s.std_dev - 0.625f64.sqrt()).abs() < 1e-12);

    let es = stats::dimension_statistics(&table, &ESTIME_DE_SOI).unwrap();
    assert_eq!(es.total.mean, 30.0);
    assert_eq!(es.total.count, 5);
    assert_eq!(es.total.median, 30.0);
}

#[test]
fn test_grouped_completeness_by_gender() {
    let rows = vec![
        Respondent::default().genre(2),
        Respondent::default().genre(1),
        Respondent::default().genre(3),
        Respondent::default().genre(1),
        Respondent::default().genre(2),
    ];
    let table = load(&rows);

    let grouped = stats::grouped_dimension_totals(&table, "Genre_label").unwrap();
    let keys: Vec<Option<&str>> = grouped.groups.iter().map(|g| g.key.as_deref()).collect();
    assert_eq!(keys, vec![Some("Femme"), Some("Homme"), Some("Autre")]);
    assert_eq!(grouped.groups.iter().map(|g| g.rows).sum::<usize>(), 5);
    assert_eq!(grouped.groups[0].values.len(), 4);
}

#[test]
fn test_grouped_by_satisfaction_group() {
    let rows = vec![
        Respondent::default().satisfaction(4),
        Respondent::default().satisfaction(1),
        Respondent::default().satisfaction(2),
    ];
    let table = load(&rows);

    let grouped =
        stats::grouped_dimension_totals(&table, schema::SATISFACTION_GROUP_COLUMN).unwrap();
    assert_eq!(grouped.group(Some("Insatisfait")).map(|g| g.rows), Some(2));
    assert_eq!(grouped.group(Some("Satisfait")).map(|g| g.rows), Some(1));
    assert_eq!(grouped.groups[0].key.as_deref(), Some("Insatisfait"));
}

#[test]
fn test_empty_selection_result_is_safe() {
    let table = load(&five_es_totals());
    let spec = FilterSpec::new().allow("Genre", [3i64]);
    let empty = filter::apply(&table, &spec).unwrap();
    assert!(empty.is_empty());

    let items = stats::item_statistics(&empty, &schema::all_items()).unwrap();
    assert!(items.iter().all(|i| i.stats.count == 0 && i.stats.mean.is_nan()));

    let dims = stats::all_dimension_statistics(&empty).unwrap();
    assert!(dims.iter().all(|d| d.total.is_empty() && d.item_mean.is_empty()));

    let corr = stats::correlation_matrix(&empty).unwrap();
    assert!(corr.values.iter().flatten().all(|v| v.is_nan()));

    let grouped = stats::grouped_dimension_totals(&empty, "Etude_label").unwrap();
    assert!(grouped.groups.is_empty());

    let overview = stats::overview(&empty).unwrap();
    assert_eq!(overview.participants, 0);
    assert!(overview.totals.iter().all(|t| t.stats.count == 0));
}

#[test]
fn test_correlation_matrix_symmetry() {
    let rows = vec![
        Respondent::default().items([2.0, 3.0, 4.0, 1.0]),
        Respondent::default().items([3.0, 3.5, 2.0, 2.0]),
        Respondent::default().items([4.0, 5.0, 1.0, 3.0]),
        Respondent::default().items([2.5, 2.0, 3.0, 5.0]),
    ];
    let corr = stats::correlation_matrix(&load(&rows)).unwrap();

    assert_eq!(corr.labels[0], "Estime de Soi");
    assert_eq!(corr.columns[0], "Total ES");
    for i in 0..corr.size() {
        assert_eq!(corr.get(i, i), 1.0);
        for j in 0..corr.size() {
            assert_eq!(corr.get(i, j).to_bits(), corr.get(j, i).to_bits());
            assert!((-1.0..=1.0).contains(&corr.get(i, j)));
        }
    }
}

#[test]
fn test_item_means_ranking() {
    let table = load(&five_es_totals());
    let ranked = stats::item_means_ranked(&table, &schema::VALORISATION).unwrap();
    assert_eq!(ranked.len(), 5);
    assert!(ranked.iter().any(|m| m.item == "Item21"));
    assert!(ranked.iter().all(|m| m.label.is_some()));
}

#[test]
fn test_demographic_summary() {
    let rows = vec![
        Respondent::default().genre(1),
        Respondent::default().genre(1),
        Respondent {
            cohabitation: 2,
            ..Respondent::default().genre(2)
        },
    ];
    let summary = stats::demographic_summary(&load(&rows)).unwrap();
    assert_eq!(summary.participants, 3);
    assert_eq!(summary.genre[0].label.as_deref(), Some("Femme"));
    assert_eq!(summary.genre[0].count, 2);
    let share = summary.cohabitation_share.unwrap();
    assert!((share - 200.0 / 3.0).abs() < 1e-9);
    assert_eq!(summary.mean_duration, Some(12.0));
}

// ========================================
// Export
// ========================================

#[test]
fn test_means_csv_determinism() {
    let table = load(&five_es_totals());
    let spec = FilterSpec::new().allow("Genre", [1i64]);
    let filtered = filter::apply(&table, &spec).unwrap();

    let first = stats::means_csv(&stats::means_table(&filtered)).unwrap();
    let second = stats::means_csv(&stats::means_table(&filtered)).unwrap();
    assert_eq!(first, second);

    let text = String::from_utf8(first).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("Variable,Mean,StdDev,N"));
    assert_eq!(lines.next(), Some("Item 8,3.00,0.79,5"));
    assert!(text.contains("Total ES,30.00,7.91,5"));
    assert!(text.contains("Item5 (Durée relation),12.00,0.00,5"));
    // 27 items + 4 totals + duration
    assert_eq!(text.lines().count(), 1 + 27 + 4 + 1);
}
