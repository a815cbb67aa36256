//! HTTP Handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use kernel::extract::{Json, Path, Query};
use kernel::id::{ApplicationId, ExamId};
use kernel::pagination::Page;
use kernel::principal::Principal;
use std::sync::Arc;

use crate::application::*;
use crate::domain::repository::{ApplicationRepository, ExamRepository, FormConfigRepository};
use crate::error::ExamResult;
use crate::presentation::dto::*;

/// Everything the exam handlers need from storage
pub trait ExamStore:
    ExamRepository + FormConfigRepository + ApplicationRepository + Clone + Send + Sync + 'static
{
}

impl<T> ExamStore for T where
    T: ExamRepository + FormConfigRepository + ApplicationRepository + Clone + Send + Sync + 'static
{
}

/// Shared state for exam handlers
#[derive(Clone)]
pub struct ExamAppState<R>
where
    R: ExamStore,
{
    pub repo: Arc<R>,
}

impl<R> ExamAppState<R>
where
    R: ExamStore,
{
    pub fn new(repo: R) -> Self {
        Self {
            repo: Arc::new(repo),
        }
    }
}

// ============================================================================
// Exams
// ============================================================================

/// GET /api/exams
pub async fn list_exams<R: ExamStore>(
    State(state): State<ExamAppState<R>>,
    Query(query): Query<ExamListQuery>,
) -> ExamResult<Json<Page<ExamResponse>>> {
    let page = ListExamsUseCase::new(state.repo.clone())
        .execute(query.status, query.page_query())
        .await?;
    Ok(Json(page.map(ExamResponse::from)))
}

/// GET /api/exams/{id}
pub async fn get_exam<R: ExamStore>(
    State(state): State<ExamAppState<R>>,
    Path(exam_id): Path<ExamId>,
) -> ExamResult<Json<ExamResponse>> {
    let view = GetExamUseCase::new(state.repo.clone())
        .execute(exam_id)
        .await?;
    Ok(Json(view.into()))
}

/// POST /api/exams
pub async fn create_exam<R: ExamStore>(
    State(state): State<ExamAppState<R>>,
    Json(req): Json<CreateExamRequest>,
) -> ExamResult<impl IntoResponse> {
    let view = CreateExamUseCase::new(state.repo.clone())
        .execute(CreateExamInput {
            name: req.name,
            exam_code: req.exam_code,
            start_time: req.start_time,
            end_time: req.end_time,
            registration_start: req.registration_start,
            registration_end: req.registration_end,
            location: req.location,
            exam_type: req.exam_type,
            organizer: req.organizer,
            description: req.description,
            status: req.status,
            max_applicants: req.max_applicants,
            contact_phone: req.contact_phone,
            contact_email: req.contact_email,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ExamResponse::from(view))))
}

/// PUT /api/exams/{id}
pub async fn update_exam<R: ExamStore>(
    State(state): State<ExamAppState<R>>,
    Path(exam_id): Path<ExamId>,
    Json(req): Json<UpdateExamRequest>,
) -> ExamResult<Json<ExamResponse>> {
    let view = UpdateExamUseCase::new(state.repo.clone())
        .execute(exam_id, req.into())
        .await?;
    Ok(Json(view.into()))
}

/// DELETE /api/exams/{id}
pub async fn delete_exam<R: ExamStore>(
    State(state): State<ExamAppState<R>>,
    Path(exam_id): Path<ExamId>,
) -> ExamResult<StatusCode> {
    DeleteExamUseCase::new(state.repo.clone())
        .execute(exam_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Form configuration
// ============================================================================

/// GET /api/exams/{id}/form-config
pub async fn get_form_config<R: ExamStore>(
    State(state): State<ExamAppState<R>>,
    Path(exam_id): Path<ExamId>,
) -> ExamResult<Json<FormConfigResponse>> {
    let view = GetFormConfigUseCase::new(state.repo.clone())
        .execute(exam_id)
        .await?;
    Ok(Json(view.into()))
}

/// POST /api/exams/{id}/form-config
pub async fn save_form_config<R: ExamStore>(
    State(state): State<ExamAppState<R>>,
    Path(exam_id): Path<ExamId>,
    Json(req): Json<SaveFormConfigRequest>,
) -> ExamResult<Json<FormConfigResponse>> {
    let view = SaveFormConfigUseCase::new(state.repo.clone())
        .execute(exam_id, req.config)
        .await?;
    Ok(Json(view.into()))
}

// ============================================================================
// Applications (candidate)
// ============================================================================

/// POST /api/applications
pub async fn submit_application<R: ExamStore>(
    State(state): State<ExamAppState<R>>,
    principal: Principal,
    Json(req): Json<SubmitApplicationRequest>,
) -> ExamResult<impl IntoResponse> {
    let view = SubmitApplicationUseCase::new(state.repo.clone())
        .execute(
            &principal,
            SubmitApplicationInput {
                exam_id: req.exam_id,
                application_data: req.application_data,
            },
            Utc::now(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ApplicationResponse::from(view))))
}

/// GET /api/applications
pub async fn list_my_applications<R: ExamStore>(
    State(state): State<ExamAppState<R>>,
    principal: Principal,
    Query(query): Query<ApplicationListQuery>,
) -> ExamResult<Json<Page<ApplicationResponse>>> {
    let page = ListMyApplicationsUseCase::new(state.repo.clone())
        .execute(&principal, query.status, query.page_query())
        .await?;
    Ok(Json(page.map(ApplicationResponse::from)))
}

/// GET /api/applications/{id}
pub async fn get_application<R: ExamStore>(
    State(state): State<ExamAppState<R>>,
    principal: Principal,
    Path(application_id): Path<ApplicationId>,
) -> ExamResult<Json<ApplicationResponse>> {
    let view = GetApplicationUseCase::new(state.repo.clone())
        .execute(&principal, application_id)
        .await?;
    Ok(Json(view.into()))
}

/// PUT /api/applications/{id}
pub async fn update_application<R: ExamStore>(
    State(state): State<ExamAppState<R>>,
    principal: Principal,
    Path(application_id): Path<ApplicationId>,
    Json(req): Json<UpdateApplicationRequest>,
) -> ExamResult<Json<ApplicationResponse>> {
    let view = UpdateApplicationUseCase::new(state.repo.clone())
        .execute(&principal, application_id, req.application_data)
        .await?;
    Ok(Json(view.into()))
}

/// DELETE /api/applications/{id}
pub async fn withdraw_application<R: ExamStore>(
    State(state): State<ExamAppState<R>>,
    principal: Principal,
    Path(application_id): Path<ApplicationId>,
) -> ExamResult<StatusCode> {
    WithdrawApplicationUseCase::new(state.repo.clone())
        .execute(&principal, application_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Applications (admin)
// ============================================================================

/// GET /api/exams/{id}/applications
pub async fn list_exam_applications<R: ExamStore>(
    State(state): State<ExamAppState<R>>,
    Path(exam_id): Path<ExamId>,
    Query(query): Query<ApplicationListQuery>,
) -> ExamResult<Json<Page<ApplicationResponse>>> {
    let page = ListExamApplicationsUseCase::new(state.repo.clone())
        .execute(exam_id, query.status, query.page_query())
        .await?;
    Ok(Json(page.map(ApplicationResponse::from)))
}

/// POST /api/applications/{id}/approve
pub async fn approve_application<R: ExamStore>(
    State(state): State<ExamAppState<R>>,
    Path(application_id): Path<ApplicationId>,
    body: Option<Json<ApproveApplicationRequest>>,
) -> ExamResult<Json<ApplicationResponse>> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let view = ReviewApplicationUseCase::new(state.repo.clone())
        .execute(
            application_id,
            ReviewDecision::Approve {
                admission_ticket_path: req.admission_ticket_path,
            },
        )
        .await?;
    Ok(Json(view.into()))
}

/// POST /api/applications/{id}/reject
pub async fn reject_application<R: ExamStore>(
    State(state): State<ExamAppState<R>>,
    Path(application_id): Path<ApplicationId>,
    body: Option<Json<RejectApplicationRequest>>,
) -> ExamResult<Json<ApplicationResponse>> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let view = ReviewApplicationUseCase::new(state.repo.clone())
        .execute(application_id, ReviewDecision::Reject { reason: req.reason })
        .await?;
    Ok(Json(view.into()))
}
