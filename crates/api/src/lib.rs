//! # Carelytics API
//!
//! Client side of the patient server's HTTP contract.
//!
//! Contains:
//! - Wire models for the listing, create and edit endpoints (`models`)
//! - The endpoint table (`endpoints`)
//! - The [`PatientApi`] seam and its `reqwest` implementation [`HttpPatientApi`]
//!
//! Used by `carelytics-core`, which owns the table controller. Nothing here touches the view.

#![warn(rust_2018_idioms)]

pub mod client;
pub mod endpoints;
pub mod error;
pub mod models;

pub use client::{HttpPatientApi, PatientApi};
pub use endpoints::Endpoint;
pub use error::{ApiError, ApiResult};
pub use models::{NewPatient, PatientDirectory, PatientRecord, PatientUpdate};
pub use reqwest::{StatusCode, Url};
