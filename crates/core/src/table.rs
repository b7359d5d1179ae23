//! The patient table: what the controller renders into.

use crate::render::{self, Element};
use carelytics_api::PatientRecord;

/// One rendered row. Selecting it fills the form; its delete control targets [`PatientRow::id`].
#[derive(Clone, Debug, PartialEq)]
pub struct PatientRow {
    pub id: String,
    pub record: PatientRecord,
}

impl PatientRow {
    pub fn new(id: impl Into<String>, record: PatientRecord) -> Self {
        Self {
            id: id.into(),
            record,
        }
    }

    /// The five text columns: id, name, city, bmi, verdict. Missing derived values are blank.
    pub fn cells(&self) -> [String; 5] {
        [
            self.id.clone(),
            self.record.name.clone(),
            self.record.city.clone(),
            self.record
                .bmi
                .map(|bmi| bmi.to_string())
                .unwrap_or_default(),
            self.record.verdict.clone().unwrap_or_default(),
        ]
    }
}

/// Handle on the table body.
pub trait TableView {
    fn clear(&mut self);
    fn append_row(&mut self, row: PatientRow);
    /// Looks a row up among those currently rendered.
    fn row(&self, id: &str) -> Option<&PatientRow>;
}

/// A table that keeps its rows and can serialise them as HTML or plain text.
#[derive(Clone, Debug, Default)]
pub struct RenderedTable {
    rows: Vec<PatientRow>,
}

impl RenderedTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[PatientRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The `<tbody>` element holding every row.
    pub fn to_element(&self) -> Element {
        render::table_body(&self.rows)
    }

    pub fn to_html(&self) -> String {
        self.to_element().render()
    }

    pub fn to_text(&self) -> String {
        render::text_table(&self.rows)
    }
}

impl TableView for RenderedTable {
    fn clear(&mut self) {
        self.rows.clear();
    }

    fn append_row(&mut self, row: PatientRow) {
        self.rows.push(row);
    }

    fn row(&self, id: &str) -> Option<&PatientRow> {
        self.rows.iter().find(|row| row.id == id)
    }
}
