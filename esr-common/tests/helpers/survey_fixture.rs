//! Synthetic survey exports
//!
//! Produces the delimited layout of the real workbook: a section-title row,
//! the 39-column header row, then one line per respondent. Every item of a
//! dimension carries the same value, so each total is that value times the
//! item count.

use esr_common::schema::{self, DIMENSIONS};

#[derive(Debug, Clone)]
pub struct Respondent {
    pub age: i64,
    pub genre: i64,
    pub etude: i64,
    pub situation: i64,
    pub duration: Option<f64>,
    pub cohabitation: i64,
    pub satisfaction: i64,
    /// Item value per dimension, in `DIMENSIONS` order
    pub items: [f64; 4],
}

impl Default for Respondent {
    fn default() -> Self {
        Self {
            age: 1,
            genre: 1,
            etude: 1,
            situation: 1,
            duration: Some(12.0),
            cohabitation: 1,
            satisfaction: 3,
            items: [3.0; 4],
        }
    }
}

impl Respondent {
    /// Respondent whose Self-Esteem items sum to `total`
    pub fn with_es_total(total: f64) -> Self {
        let mut r = Self::default();
        r.items[0] = total / schema::ESTIME_DE_SOI.items.len() as f64;
        r
    }

    pub fn genre(mut self, code: i64) -> Self {
        self.genre = code;
        self
    }

    pub fn etude(mut self, code: i64) -> Self {
        self.etude = code;
        self
    }

    pub fn satisfaction(mut self, code: i64) -> Self {
        self.satisfaction = code;
        self
    }

    pub fn duration(mut self, months: Option<f64>) -> Self {
        self.duration = months;
        self
    }

    pub fn items(mut self, items: [f64; 4]) -> Self {
        self.items = items;
        self
    }
}

pub fn header() -> Vec<String> {
    let mut cols: Vec<String> = [
        schema::ID_COLUMN,
        "Age",
        "Genre",
        "Etude",
        "Item4",
        "Item5",
        "Item6",
        "Item7",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    cols.extend(schema::all_items().into_iter().map(String::from));
    cols.extend(schema::total_columns().into_iter().map(String::from));
    cols
}

/// Section titles above the header, as in the real workbook
pub fn titles() -> Vec<String> {
    let mut titles = vec![String::new(); header().len()];
    titles[0] = "Participant".to_string();
    titles[8] = "Questionnaire".to_string();
    titles
}

/// Cells of the `index`-th respondent, in header order
pub fn record(index: usize, r: &Respondent) -> Vec<String> {
    let mut line: Vec<String> = vec![
        format!("P{:03}", index + 1),
        r.age.to_string(),
        r.genre.to_string(),
        r.etude.to_string(),
        r.situation.to_string(),
        r.duration.map(|d| d.to_string()).unwrap_or_default(),
        r.cohabitation.to_string(),
        r.satisfaction.to_string(),
    ];
    for (dim, value) in DIMENSIONS.iter().zip(r.items) {
        line.extend(dim.items.iter().map(|_| value.to_string()));
    }
    for (dim, value) in DIMENSIONS.iter().zip(r.items) {
        line.push((value * dim.items.len() as f64).to_string());
    }
    line
}

/// Delimited export of `rows`, comma separated
pub fn survey_csv(rows: &[Respondent]) -> String {
    let mut out = String::new();
    out.push_str(&titles().join(","));
    out.push('\n');
    out.push_str(&header().join(","));
    out.push('\n');

    for (i, r) in rows.iter().enumerate() {
        out.push_str(&record(i, r).join(","));
        out.push('\n');
    }
    out
}
