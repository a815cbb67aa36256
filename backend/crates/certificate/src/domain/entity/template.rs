//! Certificate Template Entity
//!
//! Named layout configuration. At most one active template per
//! `template_type` is the default; deletion only deactivates.

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::TemplateId;
use serde_json::Value;

const NAME_MAX_LENGTH: usize = 100;
const TYPE_MAX_LENGTH: usize = 50;
pub const DEFAULT_TEMPLATE_TYPE: &str = "exam";

#[derive(Debug, Clone)]
pub struct Template {
    pub template_id: TemplateId,
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

pub struct NewTemplate {
    pub name: String,
    pub description: Option<String>,
    pub template_type: Option<String>,
    pub template_config: Value,
    pub template_file_path: Option<String>,
    pub is_default: bool,
}

/// Partial update; `None` leaves a field alone
#[derive(Debug, Clone, Default)]
pub struct TemplateChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub template_type: Option<String>,
    pub template_config: Option<Value>,
    pub template_file_path: Option<String>,
    pub is_default: Option<bool>,
    pub is_active: Option<bool>,
}

impl Template {
    pub fn create(new: NewTemplate) -> AppResult<Self> {
        let now = Utc::now();
        Ok(Self {
            template_id: TemplateId::new(),
            name: validate_name(&new.name)?,
            description: non_blank(new.description),
            template_type: validate_type(new.template_type.as_deref())?,
            template_config: validate_config(new.template_config)?,
            template_file_path: non_blank(new.template_file_path),
            is_default: new.is_default,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply(&mut self, changes: TemplateChanges) -> AppResult<()> {
        let name = changes.name.as_deref().map(validate_name).transpose()?;
        let template_type = changes
            .template_type
            .as_deref()
            .map(|t| validate_type(Some(t)))
            .transpose()?;
        let config = changes.template_config.map(validate_config).transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(template_type) = template_type {
            self.template_type = template_type;
        }
        if let Some(config) = config {
            self.template_config = config;
        }
        if changes.description.is_some() {
            self.description = non_blank(changes.description);
        }
        if changes.template_file_path.is_some() {
            self.template_file_path = non_blank(changes.template_file_path);
        }
        if let Some(active) = changes.is_active {
            self.is_active = active;
        }
        if let Some(default) = changes.is_default {
            self.is_default = default;
        }
        if !self.is_active {
            self.is_default = false;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.is_default = false;
        self.updated_at = Utc::now();
    }
}

fn validate_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("Template name is required"));
    }
    if name.chars().count() > NAME_MAX_LENGTH {
        return Err(AppError::bad_request(format!(
            "Template name must be at most {NAME_MAX_LENGTH} characters"
        )));
    }
    Ok(name.to_string())
}

fn validate_type(template_type: Option<&str>) -> AppResult<String> {
    let template_type = template_type
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TEMPLATE_TYPE);
    if template_type.chars().count() > TYPE_MAX_LENGTH {
        return Err(AppError::bad_request(format!(
            "template_type must be at most {TYPE_MAX_LENGTH} characters"
        )));
    }
    Ok(template_type.to_string())
}

fn validate_config(config: Value) -> AppResult<Value> {
    match config {
        Value::Null => Ok(Value::Object(Default::default())),
        Value::Object(_) => Ok(config),
        _ => Err(AppError::bad_request("template_config must be a JSON object")),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
