//! HTTP access to the patient server.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::Serialize;

use crate::endpoints::Endpoint;
use crate::error::{ApiError, ApiResult};
use crate::models::{NewPatient, PatientDirectory, PatientUpdate};

/// The four calls the table controller makes against the patient server.
///
/// Implementations only report what happened on the wire. Deciding which failures a
/// user gets to see is the controller's job.
#[async_trait]
pub trait PatientApi: Send + Sync {
    /// `GET /view`. Non-2xx and undecodable bodies are errors.
    async fn list_patients(&self) -> ApiResult<PatientDirectory>;

    /// `POST /create`. Non-2xx is an error; the response body is ignored.
    async fn create_patient(&self, patient: &NewPatient) -> ApiResult<()>;

    /// `PUT /edit/{id}`. Non-2xx is an error; the response body is ignored.
    async fn update_patient(&self, id: &str, update: &PatientUpdate) -> ApiResult<()>;

    /// `DELETE /delete/{id}`. Any status is returned as-is; only transport failures are errors.
    async fn delete_patient(&self, id: &str) -> ApiResult<StatusCode>;
}

/// [`PatientApi`] over `reqwest`.
///
/// Built without a request timeout: a call waits for the server as long as the
/// connection stays open.
#[derive(Clone, Debug)]
pub struct HttpPatientApi {
    client: Client,
    base_url: Url,
}

impl HttpPatientApi {
    /// Creates a client rooted at `base_url` (e.g. `http://127.0.0.1:8000`).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `base_url` cannot carry a path (such as `mailto:` URLs), or
    /// - the underlying HTTP client cannot be built.
    pub fn new(base_url: Url) -> ApiResult<Self> {
        let client = Client::builder().build().map_err(ApiError::ClientBuild)?;
        Self::with_client(client, base_url)
    }

    /// Creates a client rooted at `base_url` that shares an existing `reqwest::Client`.
    pub fn with_client(client: Client, base_url: Url) -> ApiResult<Self> {
        if base_url.cannot_be_a_base() {
            return Err(ApiError::CannotBeABase(base_url.to_string()));
        }
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for `endpoint`, with the record identifier percent-encoded.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidIdentifier`] for an empty, `.` or `..` identifier. URL path
    /// normalisation would turn those into a different route.
    pub fn url(&self, endpoint: &Endpoint<'_>) -> ApiResult<Url> {
        if let Some(id) = endpoint.identifier() {
            if matches!(id, "" | "." | "..") {
                return Err(ApiError::InvalidIdentifier(id.to_string()));
            }
        }
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ApiError::CannotBeABase(self.base_url.to_string()))?;
            segments.pop_if_empty();
            segments.extend(endpoint.segments());
        }
        Ok(url)
    }

    fn request(&self, endpoint: &Endpoint<'_>) -> ApiResult<RequestBuilder> {
        let url = self.url(endpoint)?;
        Ok(self.client.request(endpoint.method(), url))
    }

    async fn send(&self, endpoint: &Endpoint<'_>, request: RequestBuilder) -> ApiResult<Response> {
        tracing::debug!("-> {}", endpoint);
        let response = request.send().await.map_err(|source| ApiError::Transport {
            operation: endpoint.operation(),
            source,
        })?;
        tracing::debug!("<- {} {}", endpoint, response.status());
        Ok(response)
    }

    async fn send_json<B: Serialize + Sync>(
        &self,
        endpoint: &Endpoint<'_>,
        body: &B,
    ) -> ApiResult<()> {
        let request = self.request(endpoint)?.json(body);
        let response = self.send(endpoint, request).await?;
        ensure_success(endpoint, response.status())
    }
}

fn ensure_success(endpoint: &Endpoint<'_>, status: StatusCode) -> ApiResult<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(ApiError::Status {
            operation: endpoint.operation(),
            status,
        })
    }
}

#[async_trait]
impl PatientApi for HttpPatientApi {
    async fn list_patients(&self) -> ApiResult<PatientDirectory> {
        let endpoint = Endpoint::View;
        let request = self.request(&endpoint)?;
        let response = self.send(&endpoint, request).await?;
        ensure_success(&endpoint, response.status())?;
        response
            .json::<PatientDirectory>()
            .await
            .map_err(|source| ApiError::Decode {
                operation: endpoint.operation(),
                source,
            })
    }

    async fn create_patient(&self, patient: &NewPatient) -> ApiResult<()> {
        self.send_json(&Endpoint::Create, patient).await
    }

    async fn update_patient(&self, id: &str, update: &PatientUpdate) -> ApiResult<()> {
        self.send_json(&Endpoint::Edit(id), update).await
    }

    async fn delete_patient(&self, id: &str) -> ApiResult<StatusCode> {
        let endpoint = Endpoint::Delete(id);
        let request = self.request(&endpoint)?;
        let response = self.send(&endpoint, request).await?;
        Ok(response.status())
    }
}
