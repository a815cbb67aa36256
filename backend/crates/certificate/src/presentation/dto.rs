//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::id::{CertificateId, ExamId, RenewalApplicationId, TemplateId, UserId};
use kernel::pagination::PageQuery;
use kernel::summary::{ExamSummary, UserSummary};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::{GenerationOutcome, ImportRow};
use crate::domain::entity::{CertificateView, RenewalView, Template, TemplateChanges};
use crate::domain::value_object::{
    CertificateStatus, CertificateType, RenewalStatus, RenewalType,
};

// ============================================================================
// Certificates
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CertificateListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<CertificateStatus>,
    pub certificate_type: Option<CertificateType>,
}

impl CertificateListQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery::new(self.page, self.per_page)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateCertificatesRequest {
    pub exam_id: ExamId,
    pub user_ids: Option<Vec<UserId>>,
    pub template_id: Option<TemplateId>,
    #[serde(default)]
    pub certificate_type: CertificateType,
    pub expiry_months: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationResponse {
    pub generated_count: usize,
    pub skipped_count: usize,
    pub certificates: Vec<CertificateResponse>,
}

impl From<GenerationOutcome> for GenerationResponse {
    fn from(outcome: GenerationOutcome) -> Self {
        Self {
            generated_count: outcome.certificates.len(),
            skipped_count: outcome.skipped_count,
            certificates: outcome
                .certificates
                .into_iter()
                .map(CertificateResponse::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportCertificatesRequest {
    #[serde(default)]
    pub certificates: Vec<ImportCertificateRow>,
}

/// Fields are taken as text and validated per row
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportCertificateRow {
    pub certificate_number: Option<String>,
    pub user_id: Option<String>,
    pub exam_id: Option<String>,
    pub certificate_type: Option<String>,
    pub status: Option<String>,
    pub issue_date: Option<String>,
    pub expiry_date: Option<String>,
    pub certificate_data: Option<Value>,
}

impl From<ImportCertificateRow> for ImportRow {
    fn from(row: ImportCertificateRow) -> Self {
        Self {
            certificate_number: row.certificate_number,
            user_id: row.user_id,
            exam_id: row.exam_id,
            certificate_type: row.certificate_type,
            status: row.status,
            issue_date: row.issue_date,
            expiry_date: row.expiry_date,
            certificate_data: row.certificate_data,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CertificateResponse {
    pub id: CertificateId,
    pub certificate_number: String,
    pub user_id: UserId,
    pub exam_id: ExamId,
    pub certificate_type: CertificateType,
    pub status: CertificateStatus,
    pub issue_date: DateTime<Utc>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub original_certificate_id: Option<CertificateId>,
    pub original_certificate_number: Option<String>,
    pub renewal_reason: Option<String>,
    pub template_id: Option<TemplateId>,
    pub certificate_data: Value,
    pub certificate_file_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user: UserSummary,
    pub exam: ExamSummary,
}

impl From<CertificateView> for CertificateResponse {
    fn from(view: CertificateView) -> Self {
        let cert = view.certificate;
        Self {
            id: cert.certificate_id,
            certificate_number: cert.certificate_number.to_string(),
            user_id: cert.user_id,
            exam_id: cert.exam_id,
            certificate_type: cert.certificate_type,
            status: cert.status,
            issue_date: cert.issue_date,
            expiry_date: cert.expiry_date,
            original_certificate_id: cert.original_certificate_id,
            original_certificate_number: cert.original_certificate_number,
            renewal_reason: cert.renewal_reason,
            template_id: cert.template_id,
            certificate_data: cert.certificate_data,
            certificate_file_path: cert.certificate_file_path,
            created_at: cert.created_at,
            updated_at: cert.updated_at,
            user: view.user,
            exam: view.exam,
        }
    }
}

// ============================================================================
// Renewal Applications
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenewalListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<RenewalStatus>,
}

impl RenewalListQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery::new(self.page, self.per_page)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitRenewalRequest {
    pub original_certificate_id: CertificateId,
    pub application_type: RenewalType,
    #[serde(default)]
    pub reason: String,
    pub supporting_documents: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewRenewalRequest {
    /// `approve` or `reject`
    pub action: String,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenewalResponse {
    pub id: RenewalApplicationId,
    pub user_id: UserId,
    pub original_certificate_id: CertificateId,
    pub original_certificate_number: String,
    pub application_type: RenewalType,
    pub reason: String,
    pub supporting_documents: Option<Value>,
    pub status: RenewalStatus,
    pub reviewer_id: Option<UserId>,
    pub review_comment: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub new_certificate_id: Option<CertificateId>,
    pub new_certificate_number: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user: UserSummary,
}

impl From<RenewalView> for RenewalResponse {
    fn from(view: RenewalView) -> Self {
        let app = view.application;
        Self {
            id: app.renewal_application_id,
            user_id: app.user_id,
            original_certificate_id: app.original_certificate_id,
            original_certificate_number: view.original_certificate_number,
            application_type: app.application_type,
            reason: app.reason,
            supporting_documents: app.supporting_documents,
            status: app.status,
            reviewer_id: app.reviewer_id,
            review_comment: app.review_comment,
            reviewed_at: app.reviewed_at,
            new_certificate_id: app.new_certificate_id,
            new_certificate_number: view.new_certificate_number,
            submitted_at: app.submitted_at,
            updated_at: app.updated_at,
            user: view.user,
        }
    }
}

// ============================================================================
// Templates
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTemplateRequest {
    pub name: String,
    pub description: Option<String>,
    pub template_type: Option<String>,
    #[serde(default)]
    pub template_config: Value,
    pub template_file_path: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTemplateRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub template_type: Option<String>,
    pub template_config: Option<Value>,
    pub template_file_path: Option<String>,
    pub is_default: Option<bool>,
    pub is_active: Option<bool>,
}

impl From<UpdateTemplateRequest> for TemplateChanges {
    fn from(req: UpdateTemplateRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            template_type: req.template_type,
            template_config: req.template_config,
            template_file_path: req.template_file_path,
            is_default: req.is_default,
            is_active: req.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateResponse {
    pub id: TemplateId,
    pub name: String,
    pub description: Option<String>,
    pub template_type: String,
    pub template_config: Value,
    pub template_file_path: Option<String>,
    pub is_default: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Template> for TemplateResponse {
    fn from(template: Template) -> Self {
        Self {
            id: template.template_id,
            name: template.name,
            description: template.description,
            template_type: template.template_type,
            template_config: template.template_config,
            template_file_path: template.template_file_path,
            is_default: template.is_default,
            is_active: template.is_active,
            created_at: template.created_at,
            updated_at: template.updated_at,
        }
    }
}
