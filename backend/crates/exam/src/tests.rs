//! Unit tests for Exam crate
//!
//! Use cases and routes run against an in-memory repository implementing the
//! same traits as `PgExamRepository`.

#[cfg(test)]
pub(crate) mod fake {
    use chrono::{DateTime, Utc};
    use kernel::id::{ApplicationId, ExamId, UserId};
    use kernel::pagination::PageQuery;
    use kernel::summary::UserSummary;
    use std::collections::{HashMap, HashSet};
    use std::sync::{Arc, Mutex};

    use crate::domain::entity::{Application, ApplicationView, Exam, FormConfig};
    use crate::domain::repository::{
        ApplicationFilter, ApplicationRepository, ExamRepository, ExamView, FormConfigRepository,
    };
    use crate::domain::value_object::{ApplicationStatus, ExamStatus};
    use crate::error::{ExamError, ExamResult};

    #[derive(Default)]
    pub struct MemState {
        pub exams: HashMap<ExamId, Exam>,
        pub configs: HashMap<ExamId, FormConfig>,
        pub applications: HashMap<ApplicationId, Application>,
        /// Exams with issued certificates
        pub certified: HashSet<ExamId>,
    }

    impl MemState {
        fn active_count(&self, exam_id: &ExamId) -> i64 {
            self.applications
                .values()
                .filter(|a| &a.exam_id == exam_id && a.status.is_active())
                .count() as i64
        }

        fn view(&self, exam: &Exam) -> ExamView {
            ExamView {
                exam: exam.clone(),
                application_count: self.active_count(&exam.exam_id),
            }
        }

        fn application_view(&self, app: &Application) -> Option<ApplicationView> {
            let exam = self.exams.get(&app.exam_id)?;
            Some(ApplicationView {
                application: app.clone(),
                user: user_summary(app.user_id),
                exam: exam.summary(),
            })
        }
    }

    pub fn user_summary(user_id: UserId) -> UserSummary {
        UserSummary {
            id: user_id,
            username: format!("user-{}", &user_id.to_string()[..8]),
            email: format!("{user_id}@example.com"),
            role: "student".to_string(),
        }
    }

    #[derive(Clone, Default)]
    pub struct InMemoryExams {
        pub state: Arc<Mutex<MemState>>,
    }

    impl InMemoryExams {
        pub fn mark_certified(&self, exam_id: ExamId) {
            self.state.lock().unwrap().certified.insert(exam_id);
        }
    }

    fn paginate<T>(items: Vec<T>, page: PageQuery) -> (Vec<T>, i64) {
        let total = items.len() as i64;
        let items = items
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        (items, total)
    }

    impl ExamRepository for InMemoryExams {
        async fn create_exam(&self, exam: &Exam) -> ExamResult<()> {
            let mut state = self.state.lock().unwrap();
            if state.exams.values().any(|e| e.exam_code == exam.exam_code) {
                return Err(ExamError::ExamCodeTaken);
            }
            state.exams.insert(exam.exam_id, exam.clone());
            Ok(())
        }

        async fn find_exam(&self, exam_id: &ExamId) -> ExamResult<Option<ExamView>> {
            let state = self.state.lock().unwrap();
            Ok(state.exams.get(exam_id).map(|e| state.view(e)))
        }

        async fn list_exams(
            &self,
            status: Option<ExamStatus>,
            page: PageQuery,
        ) -> ExamResult<(Vec<ExamView>, i64)> {
            let state = self.state.lock().unwrap();
            let mut exams: Vec<&Exam> = state
                .exams
                .values()
                .filter(|e| status.is_none_or(|s| e.status == s))
                .collect();
            exams.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            let views = exams.into_iter().map(|e| state.view(e)).collect();
            Ok(paginate(views, page))
        }

        async fn update_exam(&self, exam: &Exam) -> ExamResult<()> {
            let mut state = self.state.lock().unwrap();
            state.exams.insert(exam.exam_id, exam.clone());
            Ok(())
        }

        async fn delete_exam(&self, exam_id: &ExamId) -> ExamResult<bool> {
            let mut state = self.state.lock().unwrap();
            if state.certified.contains(exam_id) {
                return Err(ExamError::ExamHasCertificates);
            }
            if state.exams.remove(exam_id).is_none() {
                return Ok(false);
            }
            state.configs.remove(exam_id);
            state.applications.retain(|_, a| &a.exam_id != exam_id);
            Ok(true)
        }
    }

    impl FormConfigRepository for InMemoryExams {
        async fn find_form_config(&self, exam_id: &ExamId) -> ExamResult<Option<FormConfig>> {
            Ok(self.state.lock().unwrap().configs.get(exam_id).cloned())
        }

        async fn save_form_config(&self, config: &FormConfig) -> ExamResult<FormConfig> {
            let mut state = self.state.lock().unwrap();
            let saved = match state.configs.get(&config.exam_id) {
                Some(existing) => FormConfig {
                    created_at: existing.created_at,
                    ..config.clone()
                },
                None => config.clone(),
            };
            state.configs.insert(config.exam_id, saved.clone());
            Ok(saved)
        }
    }

    impl ApplicationRepository for InMemoryExams {
        async fn submit_application(
            &self,
            application: &Application,
            now: DateTime<Utc>,
        ) -> ExamResult<()> {
            let mut state = self.state.lock().unwrap();
            let exam = state
                .exams
                .get(&application.exam_id)
                .ok_or(ExamError::ExamNotFound)?;

            if state.applications.values().any(|a| {
                a.exam_id == application.exam_id
                    && a.user_id == application.user_id
                    && a.status.is_active()
            }) {
                return Err(ExamError::AlreadyApplied);
            }
            exam.ensure_accepts_registration(now, state.active_count(&application.exam_id))?;

            state
                .applications
                .insert(application.application_id, application.clone());
            Ok(())
        }

        async fn find_application(
            &self,
            application_id: &ApplicationId,
        ) -> ExamResult<Option<ApplicationView>> {
            let state = self.state.lock().unwrap();
            Ok(state
                .applications
                .get(application_id)
                .and_then(|a| state.application_view(a)))
        }

        async fn list_applications(
            &self,
            filter: ApplicationFilter,
            page: PageQuery,
        ) -> ExamResult<(Vec<ApplicationView>, i64)> {
            let state = self.state.lock().unwrap();
            let mut apps: Vec<&Application> = state
                .applications
                .values()
                .filter(|a| filter.user_id.is_none_or(|u| a.user_id == u))
                .filter(|a| filter.exam_id.is_none_or(|e| a.exam_id == e))
                .filter(|a| filter.status.is_none_or(|s| a.status == s))
                .collect();
            apps.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
            let views = apps
                .into_iter()
                .filter_map(|a| state.application_view(a))
                .collect();
            Ok(paginate(views, page))
        }

        async fn update_pending_application(&self, application: &Application) -> ExamResult<bool> {
            let mut state = self.state.lock().unwrap();
            match state.applications.get_mut(&application.application_id) {
                Some(stored) if stored.status == ApplicationStatus::Pending => {
                    *stored = application.clone();
                    Ok(true)
                }
                _ => Ok(false),
            }
        }

        async fn delete_pending_application(
            &self,
            application_id: &ApplicationId,
        ) -> ExamResult<bool> {
            let mut state = self.state.lock().unwrap();
            match state.applications.get(application_id) {
                Some(stored) if stored.status == ApplicationStatus::Pending => {
                    state.applications.remove(application_id);
                    Ok(true)
                }
                _ => Ok(false),
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod support {
    use chrono::{DateTime, Duration, Utc};
    use kernel::id::{ExamId, UserId};
    use kernel::principal::Principal;
    use kernel::role::UserRole;
    use std::sync::Arc;

    use super::fake::InMemoryExams;
    use crate::application::{CreateExamInput, CreateExamUseCase};
    use crate::domain::value_object::ExamStatus;

    pub fn student() -> Principal {
        Principal::new(UserId::new(), kernel::id::SessionId::new(), UserRole::Student)
    }

    pub fn admin() -> Principal {
        Principal::new(UserId::new(), kernel::id::SessionId::new(), UserRole::Admin)
    }

    pub fn exam_input(code: &str, now: DateTime<Utc>, max_applicants: u32) -> CreateExamInput {
        CreateExamInput {
            name: format!("Exam {code}"),
            exam_code: code.to_string(),
            start_time: now + Duration::days(30),
            end_time: now + Duration::days(30) + Duration::hours(2),
            registration_start: now - Duration::days(1),
            registration_end: now + Duration::days(10),
            location: Some("Hall B".to_string()),
            exam_type: Some("written".to_string()),
            organizer: None,
            description: None,
            status: Some(ExamStatus::Published),
            max_applicants: Some(max_applicants),
            contact_phone: None,
            contact_email: None,
        }
    }

    pub async fn published_exam(repo: &Arc<InMemoryExams>, code: &str, max: u32) -> ExamId {
        CreateExamUseCase::new(repo.clone())
            .execute(exam_input(code, Utc::now(), max))
            .await
            .unwrap()
            .exam
            .exam_id
    }
}

#[cfg(test)]
mod use_case_tests {
    use chrono::{Duration, Utc};
    use kernel::pagination::PageQuery;
    use serde_json::json;
    use std::sync::Arc;

    use super::fake::InMemoryExams;
    use super::support::*;
    use crate::application::*;
    use crate::domain::entity::ExamChanges;
    use crate::domain::value_object::{ApplicationStatus, ExamStatus};
    use crate::error::ExamError;

    fn repo() -> Arc<InMemoryExams> {
        Arc::new(InMemoryExams::default())
    }

    fn submit(exam_id: kernel::id::ExamId) -> SubmitApplicationInput {
        SubmitApplicationInput {
            exam_id,
            application_data: json!({"name": "Chen Jing", "id_number": "X1234"}),
        }
    }

    #[tokio::test]
    async fn test_create_exam_normalizes_code_and_rejects_duplicates() {
        let repo = repo();
        let view = CreateExamUseCase::new(repo.clone())
            .execute(exam_input("cpa2026", Utc::now(), 0))
            .await
            .unwrap();
        assert_eq!(view.exam.exam_code.as_str(), "CPA2026");
        assert_eq!(view.application_count, 0);

        let err = CreateExamUseCase::new(repo.clone())
            .execute(exam_input("CPA2026", Utc::now(), 0))
            .await
            .unwrap_err();
        assert!(matches!(err, ExamError::ExamCodeTaken));
    }

    #[tokio::test]
    async fn test_create_exam_defaults_to_draft() {
        let repo = repo();
        let mut input = exam_input("DRAFT1", Utc::now(), 0);
        input.status = None;
        let view = CreateExamUseCase::new(repo.clone())
            .execute(input)
            .await
            .unwrap();
        assert_eq!(view.exam.status, ExamStatus::Draft);
    }

    #[tokio::test]
    async fn test_list_exams_filters_by_status() {
        let repo = repo();
        published_exam(&repo, "PUB1", 0).await;
        let mut draft = exam_input("DRAFT2", Utc::now(), 0);
        draft.status = Some(ExamStatus::Draft);
        CreateExamUseCase::new(repo.clone())
            .execute(draft)
            .await
            .unwrap();

        let all = ListExamsUseCase::new(repo.clone())
            .execute(None, PageQuery::default())
            .await
            .unwrap();
        assert_eq!(all.total, 2);

        let published = ListExamsUseCase::new(repo.clone())
            .execute(Some(ExamStatus::Published), PageQuery::default())
            .await
            .unwrap();
        assert_eq!(published.total, 1);
        assert_eq!(published.items[0].exam.exam_code.as_str(), "PUB1");
    }

    #[tokio::test]
    async fn test_update_exam_missing_and_immutable_code() {
        let repo = repo();
        let exam_id = published_exam(&repo, "UPD1", 0).await;

        let err = UpdateExamUseCase::new(repo.clone())
            .execute(kernel::id::ExamId::new(), ExamChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ExamError::ExamNotFound));

        let err = UpdateExamUseCase::new(repo.clone())
            .execute(
                exam_id,
                ExamChanges {
                    exam_code: Some("OTHER".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ExamError::ExamCodeImmutable));

        let view = UpdateExamUseCase::new(repo.clone())
            .execute(
                exam_id,
                ExamChanges {
                    status: Some(ExamStatus::Closed),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(view.exam.status, ExamStatus::Closed);
    }

    #[tokio::test]
    async fn test_delete_exam_cascades_and_respects_certificates() {
        let repo = repo();
        let exam_id = published_exam(&repo, "DEL1", 0).await;
        SubmitApplicationUseCase::new(repo.clone())
            .execute(&student(), submit(exam_id), Utc::now())
            .await
            .unwrap();

        let certified = published_exam(&repo, "DEL2", 0).await;
        repo.mark_certified(certified);
        let err = DeleteExamUseCase::new(repo.clone())
            .execute(certified)
            .await
            .unwrap_err();
        assert!(matches!(err, ExamError::ExamHasCertificates));

        DeleteExamUseCase::new(repo.clone())
            .execute(exam_id)
            .await
            .unwrap();
        assert!(repo.state.lock().unwrap().applications.is_empty());

        let err = DeleteExamUseCase::new(repo.clone())
            .execute(exam_id)
            .await
            .unwrap_err();
        assert!(matches!(err, ExamError::ExamNotFound));
    }

    #[tokio::test]
    async fn test_form_config_default_then_saved() {
        let repo = repo();
        let exam_id = published_exam(&repo, "FORM1", 0).await;

        let view = GetFormConfigUseCase::new(repo.clone())
            .execute(exam_id)
            .await
            .unwrap();
        assert!(view.is_default);
        assert!(view.updated_at.is_none());
        assert!(view.config["fields"].is_array());

        let config = json!({"fields": [{"name": "school", "type": "text"}]});
        SaveFormConfigUseCase::new(repo.clone())
            .execute(exam_id, config.clone())
            .await
            .unwrap();

        let view = GetFormConfigUseCase::new(repo.clone())
            .execute(exam_id)
            .await
            .unwrap();
        assert!(!view.is_default);
        assert_eq!(view.config, config);

        let err = GetFormConfigUseCase::new(repo.clone())
            .execute(kernel::id::ExamId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ExamError::ExamNotFound));
    }

    #[tokio::test]
    async fn test_capacity_admits_up_to_max() {
        let repo = repo();
        let exam_id = published_exam(&repo, "CAP2", 2).await;
        let uc = SubmitApplicationUseCase::new(repo.clone());

        uc.execute(&student(), submit(exam_id), Utc::now())
            .await
            .unwrap();
        let second = uc
            .execute(&student(), submit(exam_id), Utc::now())
            .await
            .unwrap();
        assert_eq!(second.application.status, ApplicationStatus::Pending);

        let err = uc
            .execute(&student(), submit(exam_id), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, ExamError::ExamFull));
    }

    #[tokio::test]
    async fn test_rejected_applications_free_capacity() {
        let repo = repo();
        let exam_id = published_exam(&repo, "CAP1", 1).await;
        let candidate = student();

        let first = SubmitApplicationUseCase::new(repo.clone())
            .execute(&candidate, submit(exam_id), Utc::now())
            .await
            .unwrap();
        ReviewApplicationUseCase::new(repo.clone())
            .execute(
                first.application.application_id,
                ReviewDecision::Reject {
                    reason: Some("Blurry photo".to_string()),
                },
            )
            .await
            .unwrap();

        // Same candidate may apply again after a rejection
        SubmitApplicationUseCase::new(repo.clone())
            .execute(&candidate, submit(exam_id), Utc::now())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_registration_window_and_status() {
        let repo = repo();
        let exam_id = published_exam(&repo, "WIN1", 0).await;
        let uc = SubmitApplicationUseCase::new(repo.clone());

        let err = uc
            .execute(&student(), submit(exam_id), Utc::now() - Duration::days(3))
            .await
            .unwrap_err();
        assert!(matches!(err, ExamError::RegistrationNotStarted));

        let err = uc
            .execute(&student(), submit(exam_id), Utc::now() + Duration::days(11))
            .await
            .unwrap_err();
        assert!(matches!(err, ExamError::RegistrationEnded));

        let mut draft = exam_input("WIN2", Utc::now(), 0);
        draft.status = Some(ExamStatus::Draft);
        let draft_id = CreateExamUseCase::new(repo.clone())
            .execute(draft)
            .await
            .unwrap()
            .exam
            .exam_id;
        let err = uc
            .execute(&student(), submit(draft_id), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, ExamError::ExamNotPublished));

        let err = uc
            .execute(&student(), submit(kernel::id::ExamId::new()), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, ExamError::ExamNotFound));
    }

    #[tokio::test]
    async fn test_duplicate_active_application() {
        let repo = repo();
        let exam_id = published_exam(&repo, "DUP1", 0).await;
        let candidate = student();
        let uc = SubmitApplicationUseCase::new(repo.clone());

        uc.execute(&candidate, submit(exam_id), Utc::now())
            .await
            .unwrap();
        let err = uc
            .execute(&candidate, submit(exam_id), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, ExamError::AlreadyApplied));
        assert_eq!(err.kind().status_code(), 409);
    }

    #[tokio::test]
    async fn test_review_twice_conflicts() {
        let repo = repo();
        let exam_id = published_exam(&repo, "REV1", 0).await;
        let view = SubmitApplicationUseCase::new(repo.clone())
            .execute(&student(), submit(exam_id), Utc::now())
            .await
            .unwrap();
        let id = view.application.application_id;
        let review = ReviewApplicationUseCase::new(repo.clone());

        let approved = review
            .execute(
                id,
                ReviewDecision::Approve {
                    admission_ticket_path: Some("tickets/rev1.pdf".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(approved.application.status, ApplicationStatus::Approved);
        assert_eq!(
            approved.application.admission_ticket_path.as_deref(),
            Some("tickets/rev1.pdf")
        );

        let err = review
            .execute(id, ReviewDecision::Reject { reason: None })
            .await
            .unwrap_err();
        assert!(matches!(err, ExamError::ApplicationNotPending));
    }

    #[tokio::test]
    async fn test_only_owner_edits_and_withdraws() {
        let repo = repo();
        let exam_id = published_exam(&repo, "OWN1", 0).await;
        let owner = student();
        let view = SubmitApplicationUseCase::new(repo.clone())
            .execute(&owner, submit(exam_id), Utc::now())
            .await
            .unwrap();
        let id = view.application.application_id;

        let err = UpdateApplicationUseCase::new(repo.clone())
            .execute(&admin(), id, json!({"name": "Someone else"}))
            .await
            .unwrap_err();
        assert_eq!(err.kind().status_code(), 403);

        let updated = UpdateApplicationUseCase::new(repo.clone())
            .execute(&owner, id, json!({"name": "Chen J."}))
            .await
            .unwrap();
        assert_eq!(updated.application.application_data["name"], "Chen J.");

        let err = WithdrawApplicationUseCase::new(repo.clone())
            .execute(&student(), id)
            .await
            .unwrap_err();
        assert_eq!(err.kind().status_code(), 403);

        WithdrawApplicationUseCase::new(repo.clone())
            .execute(&owner, id)
            .await
            .unwrap();
        let err = GetApplicationUseCase::new(repo.clone())
            .execute(&owner, id)
            .await
            .unwrap_err();
        assert!(matches!(err, ExamError::ApplicationNotFound));
    }

    #[tokio::test]
    async fn test_reviewed_application_is_frozen() {
        let repo = repo();
        let exam_id = published_exam(&repo, "FRZ1", 0).await;
        let owner = student();
        let id = SubmitApplicationUseCase::new(repo.clone())
            .execute(&owner, submit(exam_id), Utc::now())
            .await
            .unwrap()
            .application
            .application_id;
        ReviewApplicationUseCase::new(repo.clone())
            .execute(
                id,
                ReviewDecision::Approve {
                    admission_ticket_path: None,
                },
            )
            .await
            .unwrap();

        let err = UpdateApplicationUseCase::new(repo.clone())
            .execute(&owner, id, json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ExamError::ApplicationNotPending));

        let err = WithdrawApplicationUseCase::new(repo.clone())
            .execute(&owner, id)
            .await
            .unwrap_err();
        assert!(matches!(err, ExamError::ApplicationNotPending));
    }

    #[tokio::test]
    async fn test_view_and_list_scoping() {
        let repo = repo();
        let exam_id = published_exam(&repo, "VIEW1", 0).await;
        let owner = student();
        let id = SubmitApplicationUseCase::new(repo.clone())
            .execute(&owner, submit(exam_id), Utc::now())
            .await
            .unwrap()
            .application
            .application_id;
        SubmitApplicationUseCase::new(repo.clone())
            .execute(&student(), submit(exam_id), Utc::now())
            .await
            .unwrap();

        assert!(
            GetApplicationUseCase::new(repo.clone())
                .execute(&admin(), id)
                .await
                .is_ok()
        );
        let err = GetApplicationUseCase::new(repo.clone())
            .execute(&student(), id)
            .await
            .unwrap_err();
        assert_eq!(err.kind().status_code(), 403);

        let mine = ListMyApplicationsUseCase::new(repo.clone())
            .execute(&owner, None, PageQuery::default())
            .await
            .unwrap();
        assert_eq!(mine.total, 1);

        let all = ListExamApplicationsUseCase::new(repo.clone())
            .execute(exam_id, Some(ApplicationStatus::Pending), PageQuery::default())
            .await
            .unwrap();
        assert_eq!(all.total, 2);

        let exam = GetExamUseCase::new(repo.clone())
            .execute(exam_id)
            .await
            .unwrap();
        assert_eq!(exam.application_count, 2);
    }
}

#[cfg(test)]
mod router_tests {
    use axum::body::{Body, to_bytes};
    use axum::extract::Request;
    use axum::http::{Method, StatusCode, header};
    use axum::middleware::{self, Next};
    use axum::response::Response;
    use axum::Router;
    use chrono::Utc;
    use kernel::principal::Principal;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::fake::InMemoryExams;
    use super::support::*;
    use crate::application::{SubmitApplicationInput, SubmitApplicationUseCase};
    use crate::presentation::{ExamAppState, exam_routes};

    /// Stands in for the auth guard: trusts the principal it was built with
    fn as_principal(router: Router, principal: Principal) -> Router {
        router.route_layer(middleware::from_fn(
            move |mut request: Request, next: Next| async move {
                request.extensions_mut().insert(principal);
                next.run(request).await
            },
        ))
    }

    fn app(state: &ExamAppState<InMemoryExams>, principal: Principal) -> Router {
        let groups = exam_routes(state.clone());
        Router::new()
            .merge(groups.public)
            .merge(as_principal(groups.member, principal))
            .merge(as_principal(groups.admin, principal))
    }

    fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = axum::http::Request::builder().method(method).uri(uri);
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn state() -> ExamAppState<InMemoryExams> {
        ExamAppState::new(InMemoryExams::default())
    }

    #[tokio::test]
    async fn test_create_exam_returns_201() {
        let state = state();
        let now = Utc::now();
        let body = json!({
            "name": "Bookkeeping Basics",
            "exam_code": "bk01",
            "start_time": now + chrono::Duration::days(20),
            "end_time": now + chrono::Duration::days(20) + chrono::Duration::hours(2),
            "registration_start": now,
            "registration_end": now + chrono::Duration::days(5),
            "status": "published",
            "max_applicants": 50
        });

        let response = app(&state, admin())
            .oneshot(request(Method::POST, "/exams", Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let json = json_body(response).await;
        assert_eq!(json["exam_code"], "BK01");
        assert_eq!(json["status"], "published");
        assert_eq!(json["application_count"], 0);
    }

    #[tokio::test]
    async fn test_malformed_body_is_400_with_error() {
        let response = app(&state(), admin())
            .oneshot(request(Method::POST, "/exams", Some(json!({"name": 1}))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_unknown_exam_is_404() {
        let uri = format!("/exams/{}", kernel::id::ExamId::new());
        let response = app(&state(), student())
            .oneshot(request(Method::GET, &uri, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app(&state(), student())
            .oneshot(request(Method::GET, "/exams/not-a-uuid", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_public_form_config_falls_back_to_default() {
        let state = state();
        let exam_id = published_exam(&state.repo, "FC1", 0).await;

        let response = app(&state, student())
            .oneshot(request(
                Method::GET,
                &format!("/exams/{exam_id}/form-config"),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["is_default"], true);
        assert!(json["updated_at"].is_null());
    }

    #[tokio::test]
    async fn test_submit_and_duplicate_over_http() {
        let state = state();
        let exam_id = published_exam(&state.repo, "HTTP1", 0).await;
        let candidate = student();
        let body = json!({"exam_id": exam_id, "application_data": {"name": "Wu"}});

        let response = app(&state, candidate)
            .oneshot(request(Method::POST, "/applications", Some(body.clone())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = json_body(response).await;
        assert_eq!(json["status"], "pending");
        assert_eq!(json["exam"]["exam_code"], "HTTP1");
        assert_eq!(json["user"]["id"], candidate.user_id.to_string());

        let response = app(&state, candidate)
            .oneshot(request(Method::POST, "/applications", Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_approve_without_body_and_reject_after_is_409() {
        let state = state();
        let exam_id = published_exam(&state.repo, "HTTP2", 0).await;
        let id = SubmitApplicationUseCase::new(state.repo.clone())
            .execute(
                &student(),
                SubmitApplicationInput {
                    exam_id,
                    application_data: json!({}),
                },
                Utc::now(),
            )
            .await
            .unwrap()
            .application
            .application_id;

        let response = app(&state, admin())
            .oneshot(request(
                Method::POST,
                &format!("/applications/{id}/approve"),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "approved");

        let response = app(&state, admin())
            .oneshot(request(
                Method::POST,
                &format!("/applications/{id}/reject"),
                Some(json!({"reason": "late"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_withdraw_returns_204() {
        let state = state();
        let exam_id = published_exam(&state.repo, "HTTP3", 0).await;
        let owner = student();
        let id = SubmitApplicationUseCase::new(state.repo.clone())
            .execute(
                &owner,
                SubmitApplicationInput {
                    exam_id,
                    application_data: json!({}),
                },
                Utc::now(),
            )
            .await
            .unwrap()
            .application
            .application_id;

        let response = app(&state, owner)
            .oneshot(request(
                Method::DELETE,
                &format!("/applications/{id}"),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}

#[cfg(test)]
mod error_tests {
    use crate::error::ExamError;
    use kernel::error::app_error::AppError;

    #[test]
    fn test_status_codes() {
        assert_eq!(ExamError::ExamNotFound.kind().status_code(), 404);
        assert_eq!(ExamError::ExamFull.kind().status_code(), 409);
        assert_eq!(ExamError::RegistrationEnded.kind().status_code(), 400);
        assert_eq!(ExamError::ExamHasCertificates.kind().status_code(), 409);
        assert_eq!(
            ExamError::Internal("boom".into()).kind().status_code(),
            500
        );
    }

    #[test]
    fn test_app_error_passthrough() {
        let err: ExamError = AppError::forbidden("nope").into();
        let app = err.to_app_error();
        assert_eq!(app.status_code(), 403);
        assert_eq!(app.message(), "nope");
    }
}
