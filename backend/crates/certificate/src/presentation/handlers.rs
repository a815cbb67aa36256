//! HTTP Handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use kernel::extract::{Json, Path, Query};
use kernel::id::{CertificateId, ExamId, RenewalApplicationId, TemplateId};
use kernel::pagination::Page;
use kernel::principal::Principal;
use std::sync::Arc;

use crate::application::*;
use crate::domain::entity::{NewTemplate, RenewalDecision};
use crate::domain::repository::{CertificateRepository, RenewalRepository, TemplateRepository};
use crate::error::CertificateResult;
use crate::presentation::dto::*;

/// Everything the certificate handlers need from storage
pub trait CertificateStore:
    CertificateRepository + RenewalRepository + TemplateRepository + Clone + Send + Sync + 'static
{
}

impl<T> CertificateStore for T where
    T: CertificateRepository
        + RenewalRepository
        + TemplateRepository
        + Clone
        + Send
        + Sync
        + 'static
{
}

/// Shared state for certificate handlers
#[derive(Clone)]
pub struct CertificateAppState<R>
where
    R: CertificateStore,
{
    pub repo: Arc<R>,
    pub config: Arc<CertificateConfig>,
}

impl<R> CertificateAppState<R>
where
    R: CertificateStore,
{
    pub fn new(repo: R, config: CertificateConfig) -> Self {
        Self {
            repo: Arc::new(repo),
            config: Arc::new(config),
        }
    }
}

// ============================================================================
// Certificates
// ============================================================================

/// POST /api/certificates/generate
pub async fn generate_certificates<R: CertificateStore>(
    State(state): State<CertificateAppState<R>>,
    Json(req): Json<GenerateCertificatesRequest>,
) -> CertificateResult<impl IntoResponse> {
    let outcome = GenerateCertificatesUseCase::new(state.repo.clone(), state.config.clone())
        .execute(
            GenerateCertificatesInput {
                exam_id: req.exam_id,
                user_ids: req.user_ids,
                template_id: req.template_id,
                certificate_type: req.certificate_type,
                expiry_months: req.expiry_months,
            },
            Utc::now(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(GenerationResponse::from(outcome))))
}

/// POST /api/certificates/import
pub async fn import_certificates<R: CertificateStore>(
    State(state): State<CertificateAppState<R>>,
    Json(req): Json<ImportCertificatesRequest>,
) -> CertificateResult<Json<ImportOutcome>> {
    let rows = req.certificates.into_iter().map(ImportRow::from).collect();
    let outcome = ImportCertificatesUseCase::new(state.repo.clone(), state.config.clone())
        .execute(rows, Utc::now())
        .await?;
    Ok(Json(outcome))
}

/// GET /api/certificates/my-certificates
pub async fn list_my_certificates<R: CertificateStore>(
    State(state): State<CertificateAppState<R>>,
    principal: Principal,
    Query(query): Query<CertificateListQuery>,
) -> CertificateResult<Json<Page<CertificateResponse>>> {
    let page = ListMyCertificatesUseCase::new(state.repo.clone())
        .execute(&principal, query.status, query.page_query())
        .await?;
    Ok(Json(page.map(CertificateResponse::from)))
}

/// GET /api/certificates/{id}
pub async fn get_certificate<R: CertificateStore>(
    State(state): State<CertificateAppState<R>>,
    principal: Principal,
    Path(certificate_id): Path<CertificateId>,
) -> CertificateResult<Json<CertificateResponse>> {
    let view = GetCertificateUseCase::new(state.repo.clone())
        .execute(&principal, certificate_id)
        .await?;
    Ok(Json(view.into()))
}

/// GET /api/certificates/exams/{id}/certificates
pub async fn list_exam_certificates<R: CertificateStore>(
    State(state): State<CertificateAppState<R>>,
    Path(exam_id): Path<ExamId>,
    Query(query): Query<CertificateListQuery>,
) -> CertificateResult<Json<Page<CertificateResponse>>> {
    let page = ListExamCertificatesUseCase::new(state.repo.clone())
        .execute(
            exam_id,
            query.status,
            query.certificate_type,
            query.page_query(),
        )
        .await?;
    Ok(Json(page.map(CertificateResponse::from)))
}

/// POST /api/certificates/{id}/revoke
pub async fn revoke_certificate<R: CertificateStore>(
    State(state): State<CertificateAppState<R>>,
    Path(certificate_id): Path<CertificateId>,
) -> CertificateResult<Json<CertificateResponse>> {
    let view = RevokeCertificateUseCase::new(state.repo.clone())
        .execute(certificate_id, Utc::now())
        .await?;
    Ok(Json(view.into()))
}

// ============================================================================
// Renewal Applications
// ============================================================================

/// POST /api/certificates/renewal-application
pub async fn submit_renewal<R: CertificateStore>(
    State(state): State<CertificateAppState<R>>,
    principal: Principal,
    Json(req): Json<SubmitRenewalRequest>,
) -> CertificateResult<impl IntoResponse> {
    let view = SubmitRenewalUseCase::new(state.repo.clone())
        .execute(
            &principal,
            SubmitRenewalInput {
                original_certificate_id: req.original_certificate_id,
                application_type: req.application_type,
                reason: req.reason,
                supporting_documents: req.supporting_documents,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(RenewalResponse::from(view))))
}

/// GET /api/certificates/renewal-applications
pub async fn list_renewals<R: CertificateStore>(
    State(state): State<CertificateAppState<R>>,
    principal: Principal,
    Query(query): Query<RenewalListQuery>,
) -> CertificateResult<Json<Page<RenewalResponse>>> {
    let page = ListRenewalsUseCase::new(state.repo.clone())
        .execute(&principal, query.status, query.page_query())
        .await?;
    Ok(Json(page.map(RenewalResponse::from)))
}

/// GET /api/certificates/renewal-applications/{id}
pub async fn get_renewal<R: CertificateStore>(
    State(state): State<CertificateAppState<R>>,
    principal: Principal,
    Path(renewal_application_id): Path<RenewalApplicationId>,
) -> CertificateResult<Json<RenewalResponse>> {
    let view = GetRenewalUseCase::new(state.repo.clone())
        .execute(&principal, renewal_application_id)
        .await?;
    Ok(Json(view.into()))
}

/// POST /api/certificates/renewal-applications/{id}/review
pub async fn review_renewal<R: CertificateStore>(
    State(state): State<CertificateAppState<R>>,
    principal: Principal,
    Path(renewal_application_id): Path<RenewalApplicationId>,
    Json(req): Json<ReviewRenewalRequest>,
) -> CertificateResult<Json<RenewalResponse>> {
    let decision = RenewalDecision::parse(&req.action)?;
    let view = ReviewRenewalUseCase::new(state.repo.clone(), state.config.clone())
        .execute(
            &principal,
            renewal_application_id,
            decision,
            req.comment,
            Utc::now(),
        )
        .await?;
    Ok(Json(view.into()))
}

// ============================================================================
// Templates
// ============================================================================

/// GET /api/certificates/templates
pub async fn list_templates<R: CertificateStore>(
    State(state): State<CertificateAppState<R>>,
) -> CertificateResult<Json<Vec<TemplateResponse>>> {
    let templates = ListTemplatesUseCase::new(state.repo.clone())
        .execute()
        .await?;
    Ok(Json(templates.into_iter().map(TemplateResponse::from).collect()))
}

/// GET /api/certificates/templates/{id}
pub async fn get_template<R: CertificateStore>(
    State(state): State<CertificateAppState<R>>,
    principal: Principal,
    Path(template_id): Path<TemplateId>,
) -> CertificateResult<Json<TemplateResponse>> {
    let template = GetTemplateUseCase::new(state.repo.clone())
        .execute(&principal, template_id)
        .await?;
    Ok(Json(template.into()))
}

/// POST /api/certificates/templates
pub async fn create_template<R: CertificateStore>(
    State(state): State<CertificateAppState<R>>,
    Json(req): Json<CreateTemplateRequest>,
) -> CertificateResult<impl IntoResponse> {
    let template = CreateTemplateUseCase::new(state.repo.clone())
        .execute(NewTemplate {
            name: req.name,
            description: req.description,
            template_type: req.template_type,
            template_config: req.template_config,
            template_file_path: req.template_file_path,
            is_default: req.is_default,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(TemplateResponse::from(template))))
}

/// PUT /api/certificates/templates/{id}
pub async fn update_template<R: CertificateStore>(
    State(state): State<CertificateAppState<R>>,
    Path(template_id): Path<TemplateId>,
    Json(req): Json<UpdateTemplateRequest>,
) -> CertificateResult<Json<TemplateResponse>> {
    let template = UpdateTemplateUseCase::new(state.repo.clone())
        .execute(template_id, req.into())
        .await?;
    Ok(Json(template.into()))
}

/// DELETE /api/certificates/templates/{id}
pub async fn delete_template<R: CertificateStore>(
    State(state): State<CertificateAppState<R>>,
    Path(template_id): Path<TemplateId>,
) -> CertificateResult<StatusCode> {
    DeleteTemplateUseCase::new(state.repo.clone())
        .execute(template_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
