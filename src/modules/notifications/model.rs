use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// In-app notification targeting a (user_id, user_type) pair. The recipient
/// identity is conventional; no foreign key backs it.
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub user_type: String,
    pub title: String,
    pub message: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub notification_type: String,
    pub is_read: bool,
    pub related_id: Option<i64>,
    pub related_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub fn validate_user_type(value: &str) -> Result<(), ValidationError> {
    if value == "student" || value == "teacher" {
        Ok(())
    } else {
        let mut err = ValidationError::new("user_type");
        err.message = Some("user_type must be 'student' or 'teacher'".into());
        Err(err)
    }
}

fn validate_audience(value: &str) -> Result<(), ValidationError> {
    if matches!(value, "all" | "students" | "teachers" | "class") {
        Ok(())
    } else {
        let mut err = ValidationError::new("audience");
        err.message = Some("audience must be one of: all, students, teachers, class".into());
        Err(err)
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateNotificationDto {
    pub user_id: i64,
    #[validate(custom(function = "validate_user_type"))]
    pub user_type: String,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub message: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50))]
    pub notification_type: String,
    pub related_id: Option<i64>,
    pub related_type: Option<String>,
}

/// Fan-out creation. `class` resolves the class's enrolled students at call
/// time; membership changes afterwards do not retarget anything.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct BulkNotificationDto {
    #[validate(custom(function = "validate_audience"))]
    pub audience: String,
    pub class_id: Option<i64>,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub message: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50))]
    pub notification_type: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BulkCreateResponse {
    pub created: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UnreadCountResponse {
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_dto(user_type: &str) -> CreateNotificationDto {
        CreateNotificationDto {
            user_id: 1,
            user_type: user_type.to_string(),
            title: "Hello".to_string(),
            message: "World".to_string(),
            notification_type: "system".to_string(),
            related_id: None,
            related_type: None,
        }
    }

    #[test]
    fn test_user_type_validation() {
        assert!(create_dto("student").validate().is_ok());
        assert!(create_dto("teacher").validate().is_ok());
        assert!(create_dto("admin").validate().is_err());
        assert!(create_dto("").validate().is_err());
    }

    #[test]
    fn test_audience_validation() {
        let mut dto = BulkNotificationDto {
            audience: "all".to_string(),
            class_id: None,
            title: "t".to_string(),
            message: "m".to_string(),
            notification_type: "announcement".to_string(),
        };
        assert!(dto.validate().is_ok());

        dto.audience = "everyone".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_type_field_rename() {
        let json = serde_json::json!({
            "user_id": 1,
            "user_type": "student",
            "title": "t",
            "message": "m",
            "type": "grade"
        });
        let dto: CreateNotificationDto = serde_json::from_value(json).unwrap();
        assert_eq!(dto.notification_type, "grade");
    }
}
