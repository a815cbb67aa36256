//! Form Configuration Use Cases

use chrono::{DateTime, Utc};
use kernel::id::ExamId;
use serde_json::Value;
use std::sync::Arc;

use crate::domain::entity::{FormConfig, default_form_config};
use crate::domain::repository::{ExamRepository, FormConfigRepository};
use crate::error::{ExamError, ExamResult};

/// Form configuration as served; `is_default` when nothing is stored
#[derive(Debug, Clone)]
pub struct FormConfigView {
    pub exam_id: ExamId,
    pub config: Value,
    pub is_default: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<FormConfig> for FormConfigView {
    fn from(config: FormConfig) -> Self {
        Self {
            exam_id: config.exam_id,
            config: config.config,
            is_default: false,
            updated_at: Some(config.updated_at),
        }
    }
}

pub struct GetFormConfigUseCase<R>
where
    R: ExamRepository + FormConfigRepository,
{
    repo: Arc<R>,
}

impl<R> GetFormConfigUseCase<R>
where
    R: ExamRepository + FormConfigRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, exam_id: ExamId) -> ExamResult<FormConfigView> {
        if self.repo.find_exam(&exam_id).await?.is_none() {
            return Err(ExamError::ExamNotFound);
        }

        Ok(match self.repo.find_form_config(&exam_id).await? {
            Some(config) => config.into(),
            None => FormConfigView {
                exam_id,
                config: default_form_config(),
                is_default: true,
                updated_at: None,
            },
        })
    }
}

pub struct SaveFormConfigUseCase<R>
where
    R: ExamRepository + FormConfigRepository,
{
    repo: Arc<R>,
}

impl<R> SaveFormConfigUseCase<R>
where
    R: ExamRepository + FormConfigRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, exam_id: ExamId, config: Value) -> ExamResult<FormConfigView> {
        if self.repo.find_exam(&exam_id).await?.is_none() {
            return Err(ExamError::ExamNotFound);
        }

        let config = FormConfig::new(exam_id, config)?;
        let saved = self.repo.save_form_config(&config).await?;

        tracing::info!(exam_id = %exam_id, "Form configuration saved");

        Ok(saved.into())
    }
}
