//! Self-service registration payloads, validated before they are sent.

use serde::Serialize;

use crate::errors::{ApiError, ApiResult};

/// Personal details shared by student and teacher registrations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PersonalDetails {
    pub school_slug: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

impl PersonalDetails {
    pub fn validate(&self) -> ApiResult<()> {
        let fields = [
            ("school", &self.school_slug),
            ("email", &self.email),
            ("password", &self.password),
            ("first name", &self.first_name),
            ("last name", &self.last_name),
            ("phone", &self.phone),
        ];
        let missing: Vec<&str> = fields
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            return Err(ApiError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }
        if !self.email.contains('@') {
            return Err(ApiError::Validation("email address is not valid".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentRegistration {
    #[serde(flatten)]
    pub details: PersonalDetails,
    pub class_id: i64,
}

impl StudentRegistration {
    pub fn validate(&self) -> ApiResult<()> {
        self.details.validate()?;
        if self.class_id <= 0 {
            return Err(ApiError::Validation("a class must be selected".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeacherRegistration {
    #[serde(flatten)]
    pub details: PersonalDetails,
    pub subject_ids: Vec<i64>,
}

impl TeacherRegistration {
    pub fn validate(&self) -> ApiResult<()> {
        self.details.validate()?;
        if self.subject_ids.is_empty() {
            return Err(ApiError::Validation(
                "at least one subject must be selected".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> PersonalDetails {
        PersonalDetails {
            school_slug: "lycee-victor-hugo".into(),
            email: "ada@example.com".into(),
            password: "secret".into(),
            first_name: "Ada".into(),
            last_name: "Obi".into(),
            phone: "0600000000".into(),
        }
    }

    #[test]
    fn test_missing_fields_are_listed() {
        let mut details = details();
        details.first_name = "  ".into();
        details.phone.clear();

        let err = details.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing required fields: first name, phone"
        );
    }

    #[test]
    fn test_student_requires_class() {
        let registration = StudentRegistration {
            details: details(),
            class_id: 0,
        };
        assert!(matches!(
            registration.validate(),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn test_teacher_requires_subject() {
        let mut registration = TeacherRegistration {
            details: details(),
            subject_ids: vec![],
        };
        assert!(registration.validate().is_err());

        registration.subject_ids.push(4);
        assert!(registration.validate().is_ok());
    }

    #[test]
    fn test_student_payload_is_flat() {
        let registration = StudentRegistration {
            details: details(),
            class_id: 3,
        };
        let value = serde_json::to_value(&registration).unwrap();
        assert_eq!(value["school_slug"], "lycee-victor-hugo");
        assert_eq!(value["first_name"], "Ada");
        assert_eq!(value["class_id"], 3);
        assert!(value.get("details").is_none());
    }
}
