//! The four routes of the patient server.

use reqwest::Method;

/// One call against the patient server.
///
/// Record identifiers travel as a single path segment; callers pass them raw and
/// [`HttpPatientApi`](crate::HttpPatientApi) percent-encodes them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint<'a> {
    /// `GET /view`
    View,
    /// `POST /create`
    Create,
    /// `PUT /edit/{id}`
    Edit(&'a str),
    /// `DELETE /delete/{id}`
    Delete(&'a str),
}

impl<'a> Endpoint<'a> {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::View => Method::GET,
            Endpoint::Create => Method::POST,
            Endpoint::Edit(_) => Method::PUT,
            Endpoint::Delete(_) => Method::DELETE,
        }
    }

    /// Short operation name used in logs and error messages.
    pub fn operation(&self) -> &'static str {
        match self {
            Endpoint::View => "view",
            Endpoint::Create => "create",
            Endpoint::Edit(_) => "edit",
            Endpoint::Delete(_) => "delete",
        }
    }

    /// The record identifier carried in the path, if any.
    pub fn identifier(&self) -> Option<&'a str> {
        match *self {
            Endpoint::View | Endpoint::Create => None,
            Endpoint::Edit(id) | Endpoint::Delete(id) => Some(id),
        }
    }

    /// Unencoded path segments, in order.
    pub fn segments(&self) -> Vec<&'a str> {
        match *self {
            Endpoint::View => vec!["view"],
            Endpoint::Create => vec!["create"],
            Endpoint::Edit(id) => vec!["edit", id],
            Endpoint::Delete(id) => vec!["delete", id],
        }
    }
}

impl std::fmt::Display for Endpoint<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} /{}", self.method(), self.segments().join("/"))
    }
}
