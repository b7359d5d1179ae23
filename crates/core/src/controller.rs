//! The patient table controller.
//!
//! Wires the form, the table and the alert channel to the patient server. Every action is one
//! request/response round trip, and every successful mutation is followed by a full reload from
//! `/view`; nothing is merged locally.
//!
//! ## Which failures the user sees
//!
//! | Failure                                   | Alert            | Reload |
//! |-------------------------------------------|------------------|--------|
//! | Form validation                           | yes, no request  | no     |
//! | `/create`, `/edit` non-2xx or transport   | `Add failed` / `Update failed` | no |
//! | `/view`                                   | no               | n/a    |
//! | `/delete`                                 | no               | always |
//!
//! Every path still returns a [`ControllerResult`] and is logged, so callers and tests can
//! observe the silent ones.

use crate::error::{ControllerError, ControllerResult};
use crate::form::{self, FormFields};
use crate::notify::Notifier;
use crate::table::{PatientRow, TableView};
use crate::validation;
use carelytics_api::{PatientApi, PatientRecord, StatusCode};

/// The view handles the controller drives.
#[derive(Debug, Default)]
pub struct PageHandles<T, F, N> {
    pub table: T,
    pub form: F,
    pub notifier: N,
}

impl<T, F, N> PageHandles<T, F, N> {
    pub fn new(table: T, form: F, notifier: N) -> Self {
        Self {
            table,
            form,
            notifier,
        }
    }
}

pub struct PatientTableController<A, T, F, N> {
    api: A,
    page: PageHandles<T, F, N>,
}

impl<A, T, F, N> PatientTableController<A, T, F, N>
where
    A: PatientApi,
    T: TableView,
    F: FormFields,
    N: Notifier,
{
    pub fn new(api: A, page: PageHandles<T, F, N>) -> Self {
        Self { api, page }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn page(&self) -> &PageHandles<T, F, N> {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut PageHandles<T, F, N> {
        &mut self.page
    }

    fn alert(&mut self, error: &ControllerError) {
        self.page.notifier.alert(&error.to_string());
    }

    /// Fetch `/view` and re-render every row.
    ///
    /// On failure the table is left as it was and nothing is alerted.
    ///
    /// # Returns
    /// The number of rows rendered.
    pub async fn load_patients(&mut self) -> ControllerResult<usize> {
        let directory = self.api.list_patients().await.map_err(|e| {
            tracing::warn!("failed to load patients: {}", e);
            ControllerError::LoadFailed(e)
        })?;

        let count = directory.len();
        self.page.table.clear();
        for (id, record) in directory {
            self.page.table.append_row(PatientRow::new(id, record));
        }

        tracing::info!("rendered {} patients", count);
        Ok(count)
    }

    /// Copy a record into the form.
    pub fn fill_form(&mut self, id: &str, patient: &PatientRecord) {
        form::fill_form(&mut self.page.form, id, patient);
    }

    /// Select a rendered row for editing.
    ///
    /// # Errors
    /// [`ControllerError::UnknownRow`] if `id` is not in the current table; the form is unchanged.
    pub fn select_row(&mut self, id: &str) -> ControllerResult<()> {
        let row = self
            .page
            .table
            .row(id)
            .cloned()
            .ok_or_else(|| ControllerError::UnknownRow(id.to_string()))?;
        self.fill_form(&row.id, &row.record);
        Ok(())
    }

    /// Create a patient from the form, then reload.
    ///
    /// # Returns
    /// The number of rows rendered by the reload.
    pub async fn add_patient(&mut self) -> ControllerResult<usize> {
        let patient = match validation::new_patient_from_form(&self.page.form) {
            Ok(patient) => patient,
            Err(e) => {
                let err = ControllerError::from(e);
                self.alert(&err);
                return Err(err);
            }
        };

        tracing::info!("creating patient {}", patient.id);
        if let Err(e) = self.api.create_patient(&patient).await {
            tracing::error!("create patient {} failed: {}", patient.id, e);
            let err = ControllerError::AddFailed(e);
            self.alert(&err);
            return Err(err);
        }

        self.load_patients().await
    }

    /// Send the filled-in form fields as a partial edit, then reload.
    ///
    /// # Returns
    /// The number of rows rendered by the reload.
    pub async fn update_patient(&mut self) -> ControllerResult<usize> {
        let (id, update) = match validation::update_from_form(&self.page.form) {
            Ok(parts) => parts,
            Err(e) => {
                let err = ControllerError::from(e);
                self.alert(&err);
                return Err(err);
            }
        };

        tracing::info!("updating patient {}", id);
        if let Err(e) = self.api.update_patient(id.as_str(), &update).await {
            tracing::error!("update patient {} failed: {}", id, e);
            let err = ControllerError::UpdateFailed(e);
            self.alert(&err);
            return Err(err);
        }

        self.load_patients().await
    }

    /// Delete a patient, then reload whatever the outcome.
    ///
    /// # Returns
    /// The status the server answered the delete with, success or not.
    ///
    /// # Errors
    /// - [`ControllerError::DeleteFailed`] if the delete request never got a response
    /// - [`ControllerError::LoadFailed`] if the reload failed
    pub async fn delete_patient(&mut self, id: &str) -> ControllerResult<StatusCode> {
        tracing::info!("deleting patient {}", id);
        let outcome = self.api.delete_patient(id).await;
        match &outcome {
            Ok(status) if status.is_success() => {}
            Ok(status) => tracing::warn!("delete patient {} returned HTTP {}", id, status),
            Err(e) => tracing::warn!("delete patient {} failed: {}", id, e),
        }

        let reload = self.load_patients().await;
        let status = outcome.map_err(ControllerError::DeleteFailed)?;
        reload?;
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{FieldId, FormState};
    use crate::notify::AlertLog;
    use crate::table::RenderedTable;
    use async_trait::async_trait;
    use carelytics_api::{
        ApiError, ApiResult, NewPatient, PatientDirectory, PatientUpdate,
    };
    use std::sync::Mutex;

    const ANN: &str = r#"{"p1": {"name":"Ann","city":"NYC","age":30,"gender":"F","height":165,"weight":60,"bmi":22.0,"verdict":"normal"}}"#;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        View,
        Create(serde_json::Value),
        Edit(String, serde_json::Value),
        Delete(String),
    }

    /// In-process stand-in for the patient server that records every call.
    struct FakeApi {
        calls: Mutex<Vec<Call>>,
        listing: Mutex<PatientDirectory>,
        create_status: StatusCode,
        edit_status: StatusCode,
        delete_status: StatusCode,
        view_status: StatusCode,
    }

    impl FakeApi {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                listing: Mutex::new(PatientDirectory::new()),
                create_status: StatusCode::CREATED,
                edit_status: StatusCode::OK,
                delete_status: StatusCode::OK,
                view_status: StatusCode::OK,
            }
        }

        fn with_listing(self, json: &str) -> Self {
            *self.listing.lock().unwrap() = serde_json::from_str(json).unwrap();
            self
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }

        fn check(operation: &'static str, status: StatusCode) -> ApiResult<()> {
            if status.is_success() {
                Ok(())
            } else {
                Err(ApiError::Status { operation, status })
            }
        }
    }

    #[async_trait]
    impl PatientApi for FakeApi {
        async fn list_patients(&self) -> ApiResult<PatientDirectory> {
            self.record(Call::View);
            Self::check("view", self.view_status)?;
            Ok(self.listing.lock().unwrap().clone())
        }

        async fn create_patient(&self, patient: &NewPatient) -> ApiResult<()> {
            self.record(Call::Create(serde_json::to_value(patient).unwrap()));
            Self::check("create", self.create_status)
        }

        async fn update_patient(&self, id: &str, update: &PatientUpdate) -> ApiResult<()> {
            self.record(Call::Edit(
                id.to_string(),
                serde_json::to_value(update).unwrap(),
            ));
            Self::check("edit", self.edit_status)
        }

        async fn delete_patient(&self, id: &str) -> ApiResult<StatusCode> {
            self.record(Call::Delete(id.to_string()));
            Ok(self.delete_status)
        }
    }

    type TestController = PatientTableController<FakeApi, RenderedTable, FormState, AlertLog>;

    fn controller(api: FakeApi, form: FormState) -> TestController {
        PatientTableController::new(
            api,
            PageHandles::new(RenderedTable::new(), form, AlertLog::new()),
        )
    }

    fn complete_form() -> FormState {
        FormState::new()
            .with(FieldId::Pid, "p2")
            .with(FieldId::Name, "Bo")
            .with(FieldId::City, "LA")
            .with(FieldId::Age, "41")
            .with(FieldId::Gender, "male")
            .with(FieldId::Height, "1.8")
            .with(FieldId::Weight, "80")
    }

    #[tokio::test]
    async fn test_load_renders_one_row_per_record() {
        let mut c = controller(FakeApi::new().with_listing(ANN), FormState::new());
        let rows = c.load_patients().await.expect("load succeeds");
        assert_eq!(rows, 1);
        assert_eq!(c.page().table.len(), 1);
        assert_eq!(c.page().table.rows()[0].id, "p1");
        assert_eq!(c.api().calls(), vec![Call::View]);
    }

    #[tokio::test]
    async fn test_load_failure_keeps_table_and_does_not_alert() {
        let mut api = FakeApi::new().with_listing(ANN);
        let mut c = controller(FakeApi::new().with_listing(ANN), FormState::new());
        c.load_patients().await.unwrap();

        api.view_status = StatusCode::INTERNAL_SERVER_ERROR;
        let mut failing = controller(api, FormState::new());
        failing.page_mut().table = c.page().table.clone();

        let err = failing.load_patients().await.expect_err("view fails");
        assert!(matches!(err, ControllerError::LoadFailed(_)));
        assert_eq!(failing.page().table.len(), 1);
        assert!(failing.page().notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn test_select_row_fills_form_from_rendered_record() {
        let mut c = controller(FakeApi::new().with_listing(ANN), FormState::new());
        c.load_patients().await.unwrap();
        c.select_row("p1").expect("row is rendered");

        let form = &c.page().form;
        let expected = [
            (FieldId::Pid, "p1"),
            (FieldId::Name, "Ann"),
            (FieldId::City, "NYC"),
            (FieldId::Age, "30"),
            (FieldId::Gender, "F"),
            (FieldId::Height, "165"),
            (FieldId::Weight, "60"),
        ];
        for (field, value) in expected {
            assert_eq!(form.value(field), value, "field {field}");
        }
    }

    #[tokio::test]
    async fn test_select_unknown_row_leaves_form_untouched() {
        let form = FormState::new().with(FieldId::Name, "typed");
        let mut c = controller(FakeApi::new().with_listing(ANN), form.clone());
        c.load_patients().await.unwrap();

        let err = c.select_row("nope").expect_err("not rendered");
        assert!(matches!(err, ControllerError::UnknownRow(id) if id == "nope"));
        assert_eq!(c.page().form, form);
    }

    #[tokio::test]
    async fn test_add_posts_full_payload_then_reloads() {
        let mut c = controller(FakeApi::new(), complete_form());
        c.add_patient().await.expect("add succeeds");

        assert_eq!(
            c.api().calls(),
            vec![
                Call::Create(serde_json::json!({
                    "id": "p2", "name": "Bo", "city": "LA", "age": 41,
                    "gender": "male", "height": 1.8, "weight": 80
                })),
                Call::View,
            ]
        );
        assert!(c.page().notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn test_add_with_missing_field_sends_nothing_and_names_first_field() {
        let form = complete_form()
            .with(FieldId::Gender, "")
            .with(FieldId::Weight, "x");
        let mut c = controller(FakeApi::new(), form);

        let err = c.add_patient().await.expect_err("gender missing");
        assert!(matches!(err, ControllerError::Validation(_)));
        assert!(c.api().calls().is_empty());
        assert_eq!(
            c.page().notifier.messages(),
            ["Invalid or missing field: gender".to_string()]
        );
    }

    #[tokio::test]
    async fn test_add_rejected_by_server_alerts_and_skips_reload() {
        let mut api = FakeApi::new();
        api.create_status = StatusCode::BAD_REQUEST;
        let mut c = controller(api, complete_form());

        let err = c.add_patient().await.expect_err("server rejects");
        assert!(matches!(err, ControllerError::AddFailed(ref e) if e.status() == Some(StatusCode::BAD_REQUEST)));
        assert_eq!(c.api().calls().len(), 1);
        assert_eq!(c.page().notifier.messages(), ["Add failed".to_string()]);
    }

    #[tokio::test]
    async fn test_update_sends_only_filled_fields() {
        let form = FormState::new()
            .with(FieldId::Pid, "p1")
            .with(FieldId::City, "Leeds")
            .with(FieldId::Age, "31");
        let mut c = controller(FakeApi::new(), form);
        c.update_patient().await.expect("update succeeds");

        assert_eq!(
            c.api().calls(),
            vec![
                Call::Edit("p1".into(), serde_json::json!({"city": "Leeds", "age": 31})),
                Call::View,
            ]
        );
    }

    #[tokio::test]
    async fn test_update_with_blank_form_sends_nothing() {
        let mut c = controller(FakeApi::new(), FormState::new());
        let err = c.update_patient().await.expect_err("no pid");
        assert!(matches!(err, ControllerError::Validation(_)));
        assert!(c.api().calls().is_empty());
        assert_eq!(
            c.page().notifier.messages(),
            ["Patient ID required for update".to_string()]
        );

        let mut c = controller(FakeApi::new(), FormState::new().with(FieldId::Pid, "p1"));
        c.update_patient().await.expect_err("nothing filled");
        assert!(c.api().calls().is_empty());
        assert_eq!(c.page().notifier.messages(), ["Nothing to update".to_string()]);
    }

    #[tokio::test]
    async fn test_update_rejected_by_server_alerts_and_skips_reload() {
        let mut api = FakeApi::new();
        api.edit_status = StatusCode::NOT_FOUND;
        let form = FormState::new()
            .with(FieldId::Pid, "ghost")
            .with(FieldId::Name, "X");
        let mut c = controller(api, form);

        c.update_patient().await.expect_err("unknown id");
        assert_eq!(c.api().calls().len(), 1);
        assert_eq!(c.page().notifier.messages(), ["Update failed".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_reloads_whatever_the_status() {
        for status in [StatusCode::OK, StatusCode::NOT_FOUND, StatusCode::INTERNAL_SERVER_ERROR] {
            let mut api = FakeApi::new().with_listing(ANN);
            api.delete_status = status;
            let mut c = controller(api, FormState::new());

            let returned = c.delete_patient("p1").await.expect("reload succeeds");
            assert_eq!(returned, status);
            assert_eq!(
                c.api().calls(),
                vec![Call::Delete("p1".into()), Call::View]
            );
            assert!(c.page().notifier.messages().is_empty());
        }
    }
}
