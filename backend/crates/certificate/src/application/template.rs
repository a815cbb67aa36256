//! Template Use Cases

use kernel::id::TemplateId;
use kernel::principal::Principal;
use std::sync::Arc;

use crate::domain::entity::{NewTemplate, Template, TemplateChanges};
use crate::domain::repository::TemplateRepository;
use crate::error::{CertificateError, CertificateResult};

pub struct ListTemplatesUseCase<R>
where
    R: TemplateRepository,
{
    repo: Arc<R>,
}

impl<R> ListTemplatesUseCase<R>
where
    R: TemplateRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self) -> CertificateResult<Vec<Template>> {
        self.repo.list_active_templates().await
    }
}

pub struct GetTemplateUseCase<R>
where
    R: TemplateRepository,
{
    repo: Arc<R>,
}

impl<R> GetTemplateUseCase<R>
where
    R: TemplateRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Deactivated templates are visible to admins only
    pub async fn execute(
        &self,
        principal: &Principal,
        template_id: TemplateId,
    ) -> CertificateResult<Template> {
        match self.repo.find_template(&template_id).await? {
            Some(template) if template.is_active || principal.is_admin() => Ok(template),
            _ => Err(CertificateError::TemplateNotFound),
        }
    }
}

pub struct CreateTemplateUseCase<R>
where
    R: TemplateRepository,
{
    repo: Arc<R>,
}

impl<R> CreateTemplateUseCase<R>
where
    R: TemplateRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: NewTemplate) -> CertificateResult<Template> {
        let template = Template::create(input)?;
        self.repo.create_template(&template).await?;

        tracing::info!(
            template_id = %template.template_id,
            template_type = %template.template_type,
            is_default = template.is_default,
            "Template created"
        );

        Ok(template)
    }
}

pub struct UpdateTemplateUseCase<R>
where
    R: TemplateRepository,
{
    repo: Arc<R>,
}

impl<R> UpdateTemplateUseCase<R>
where
    R: TemplateRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        template_id: TemplateId,
        changes: TemplateChanges,
    ) -> CertificateResult<Template> {
        let mut template = self
            .repo
            .find_template(&template_id)
            .await?
            .ok_or(CertificateError::TemplateNotFound)?;

        template.apply(changes)?;
        self.repo.update_template(&template).await?;

        tracing::info!(template_id = %template_id, "Template updated");
        Ok(template)
    }
}

/// Deletion deactivates; certificates keep pointing at the template
pub struct DeleteTemplateUseCase<R>
where
    R: TemplateRepository,
{
    repo: Arc<R>,
}

impl<R> DeleteTemplateUseCase<R>
where
    R: TemplateRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, template_id: TemplateId) -> CertificateResult<()> {
        let mut template = self
            .repo
            .find_template(&template_id)
            .await?
            .filter(|t| t.is_active)
            .ok_or(CertificateError::TemplateNotFound)?;

        template.deactivate();
        self.repo.update_template(&template).await?;

        tracing::info!(template_id = %template_id, "Template deactivated");
        Ok(())
    }
}
