//! The edit form: seven named input fields.

use carelytics_api::PatientRecord;

/// One input of the edit form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldId {
    Pid,
    Name,
    City,
    Age,
    Gender,
    Height,
    Weight,
}

impl FieldId {
    /// Every field, in payload order.
    pub const ALL: [FieldId; 7] = [
        FieldId::Pid,
        FieldId::Name,
        FieldId::City,
        FieldId::Age,
        FieldId::Gender,
        FieldId::Height,
        FieldId::Weight,
    ];

    /// The element id the host page gives this input.
    pub fn element_id(self) -> &'static str {
        match self {
            FieldId::Pid => "pid",
            FieldId::Name => "name",
            FieldId::City => "city",
            FieldId::Age => "age",
            FieldId::Gender => "gender",
            FieldId::Height => "height",
            FieldId::Weight => "weight",
        }
    }

    /// The JSON key this input is submitted under.
    pub fn payload_key(self) -> &'static str {
        match self {
            FieldId::Pid => "id",
            other => other.element_id(),
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, FieldId::Age | FieldId::Height | FieldId::Weight)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.element_id())
    }
}

impl std::str::FromStr for FieldId {
    type Err = String;

    /// Accepts either the element id (`pid`) or the payload key (`id`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        FieldId::ALL
            .into_iter()
            .find(|f| f.element_id() == s || f.payload_key() == s)
            .ok_or_else(|| format!("unknown field: {s}"))
    }
}

/// Read/write access to the form inputs.
///
/// Values are raw text exactly as typed; trimming and parsing happen when a request is built.
pub trait FormFields {
    fn value(&self, field: FieldId) -> String;
    fn set_value(&mut self, field: FieldId, value: String);
}

/// In-memory form inputs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormState {
    values: [String; 7],
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter, handy for tests and CLI flags.
    pub fn with(mut self, field: FieldId, value: impl Into<String>) -> Self {
        self.set_value(field, value.into());
        self
    }

    pub fn clear(&mut self) {
        self.values = Default::default();
    }
}

impl FormFields for FormState {
    fn value(&self, field: FieldId) -> String {
        self.values[field.index()].clone()
    }

    fn set_value(&mut self, field: FieldId, value: String) {
        self.values[field.index()] = value;
    }
}

/// Copy a record into the form, identifier included. No validation.
pub fn fill_form<F: FormFields + ?Sized>(form: &mut F, id: &str, patient: &PatientRecord) {
    form.set_value(FieldId::Pid, id.to_string());
    form.set_value(FieldId::Name, patient.name.clone());
    form.set_value(FieldId::City, patient.city.clone());
    form.set_value(FieldId::Age, patient.age.to_string());
    form.set_value(FieldId::Gender, patient.gender.clone());
    form.set_value(FieldId::Height, patient.height.to_string());
    form.set_value(FieldId::Weight, patient.weight.to_string());
}
