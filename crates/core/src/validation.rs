//! Turning form input into request bodies.
//!
//! Strings are trimmed and must be non-empty. Numeric inputs must parse to a finite number;
//! blank, unparseable and NaN input all count as missing.

use crate::error::ValidationError;
use crate::form::{FieldId, FormFields};
use carelytics_api::{NewPatient, PatientUpdate};
use carelytics_types::{FiniteNumber, NonEmptyText};

fn text<F: FormFields + ?Sized>(form: &F, field: FieldId) -> Option<NonEmptyText> {
    NonEmptyText::new(form.value(field)).ok()
}

fn number<F: FormFields + ?Sized>(form: &F, field: FieldId) -> Option<FiniteNumber> {
    FiniteNumber::parse(form.value(field)).ok()
}

fn required_text<F: FormFields + ?Sized>(
    form: &F,
    field: FieldId,
) -> Result<NonEmptyText, ValidationError> {
    text(form, field).ok_or(ValidationError::MissingField(field.payload_key()))
}

fn required_number<F: FormFields + ?Sized>(
    form: &F,
    field: FieldId,
) -> Result<FiniteNumber, ValidationError> {
    number(form, field).ok_or(ValidationError::MissingField(field.payload_key()))
}

/// Build the `/create` body.
///
/// Fields are checked in payload order (id, name, city, age, gender, height, weight) and the
/// first failure is reported.
pub fn new_patient_from_form<F: FormFields + ?Sized>(
    form: &F,
) -> Result<NewPatient, ValidationError> {
    Ok(NewPatient {
        id: required_text(form, FieldId::Pid)?,
        name: required_text(form, FieldId::Name)?,
        city: required_text(form, FieldId::City)?,
        age: required_number(form, FieldId::Age)?,
        gender: required_text(form, FieldId::Gender)?,
        height: required_number(form, FieldId::Height)?,
        weight: required_number(form, FieldId::Weight)?,
    })
}

/// Build the `/edit/{id}` target and partial body.
///
/// # Errors
///
/// - [`ValidationError::MissingIdentifier`] if `pid` is blank
/// - [`ValidationError::NothingToUpdate`] if no other field holds a usable value
pub fn update_from_form<F: FormFields + ?Sized>(
    form: &F,
) -> Result<(NonEmptyText, PatientUpdate), ValidationError> {
    let id = text(form, FieldId::Pid).ok_or(ValidationError::MissingIdentifier)?;

    let update = PatientUpdate {
        name: text(form, FieldId::Name),
        city: text(form, FieldId::City),
        gender: text(form, FieldId::Gender),
        age: number(form, FieldId::Age),
        height: number(form, FieldId::Height),
        weight: number(form, FieldId::Weight),
    };

    if update.is_empty() {
        return Err(ValidationError::NothingToUpdate);
    }

    Ok((id, update))
}
