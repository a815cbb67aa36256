//! Registration Form Configuration
//!
//! Per-exam description of the fields candidates fill in. Stored as an
//! opaque JSON object; exams without one use [`default_form_config`].

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::ExamId;
use serde_json::{Value, json};

#[derive(Debug, Clone)]
pub struct FormConfig {
    pub exam_id: ExamId,
    pub config: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FormConfig {
    pub fn new(exam_id: ExamId, config: Value) -> AppResult<Self> {
        if !config.is_object() {
            return Err(AppError::bad_request("config must be a JSON object"));
        }
        let now = Utc::now();
        Ok(Self {
            exam_id,
            config,
            created_at: now,
            updated_at: now,
        })
    }
}

pub fn default_form_config() -> Value {
    json!({
        "fields": [
            {"name": "name", "label": "Full name", "type": "text", "required": true},
            {"name": "gender", "label": "Gender", "type": "select", "required": true,
             "options": ["male", "female"]},
            {"name": "phone", "label": "Phone", "type": "text", "required": true},
            {"name": "email", "label": "Email", "type": "email", "required": true},
            {"name": "id_type", "label": "ID document type", "type": "select", "required": true,
             "options": ["national_id", "passport", "other"]},
            {"name": "id_number", "label": "ID document number", "type": "text", "required": true},
            {"name": "address", "label": "Address", "type": "text", "required": false},
            {"name": "remarks", "label": "Remarks", "type": "textarea", "required": false}
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_required_identity_fields() {
        let config = default_form_config();
        let fields = config["fields"].as_array().unwrap();
        assert_eq!(fields.len(), 8);
        assert!(fields.iter().any(|f| f["name"] == "id_number" && f["required"] == true));
    }

    #[test]
    fn test_config_must_be_object() {
        assert!(FormConfig::new(ExamId::new(), json!("fields")).is_err());
        assert!(FormConfig::new(ExamId::new(), json!({"fields": []})).is_ok());
    }
}
