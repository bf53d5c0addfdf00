use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::{
    error::FieldErrors,
    models::{
        receipt::{MAX_RECEIPT_BYTES, ReceiptUpload},
        registration::{Course, NewRegistration},
    },
};

pub const COURSE_REQUIRED: &str = "Please select a course.";
pub const RECEIPT_REQUIRED: &str = "Payment receipt is required.";
pub const RECEIPT_TOO_LARGE: &str = "File size must be less than 5MB.";
pub const RECEIPT_WRONG_TYPE: &str = "Only PDF, JPEG, and PNG files are allowed.";

/// Raw registration form fields, as submitted
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationForm {
    #[validate(length(min = 3, message = "Full name must be at least 3 characters."))]
    pub full_name: String,

    #[validate(length(min = 2, message = "Department is required."))]
    pub department: String,

    #[validate(length(min = 5, message = "Matric/Registration number is required."))]
    pub matric_number: String,

    #[validate(email(message = "Please enter a valid email."))]
    pub email: String,

    #[validate(length(min = 10, message = "Please enter a valid WhatsApp number."))]
    pub whatsapp_number: String,

    pub course: String,
}

impl RegistrationForm {
    fn trimmed(&self) -> Self {
        Self {
            full_name: self.full_name.trim().to_string(),
            department: self.department.trim().to_string(),
            matric_number: self.matric_number.trim().to_string(),
            email: self.email.trim().to_string(),
            whatsapp_number: self.whatsapp_number.trim().to_string(),
            course: self.course.trim().to_string(),
        }
    }
}

/// Registration that passed validation, with the receipt it came with
#[derive(Debug, Clone)]
pub struct ValidatedSubmission {
    pub record: NewRegistration,
    pub receipt: ReceiptUpload,
}

/// Check a submitted form and receipt.
///
/// Pure: every failing field is reported, keyed by its wire name.
pub fn validate_registration(
    form: &RegistrationForm,
    receipt: Option<ReceiptUpload>,
) -> Result<ValidatedSubmission, FieldErrors> {
    let form = form.trimmed();
    let mut errors = FieldErrors::new();

    if let Err(report) = form.validate() {
        for (field, field_errors) in report.field_errors() {
            let messages = errors.entry(wire_name(&field)).or_default();
            for error in field_errors.iter() {
                let message = match &error.message {
                    Some(message) => message.to_string(),
                    None => error.code.to_string(),
                };
                messages.push(message);
            }
        }
    }

    let course = form.course.parse::<Course>().ok();
    if course.is_none() {
        push(&mut errors, "course", COURSE_REQUIRED);
    }

    match &receipt {
        Some(upload) => {
            for message in receipt_errors(upload) {
                push(&mut errors, "receipt", message);
            }
        }
        None => push(&mut errors, "receipt", RECEIPT_REQUIRED),
    }

    match (course, receipt) {
        (Some(course), Some(receipt)) if errors.is_empty() => Ok(ValidatedSubmission {
            record: NewRegistration {
                full_name: form.full_name,
                department: form.department,
                matric_number: form.matric_number,
                email: form.email,
                whatsapp_number: form.whatsapp_number,
                course,
            },
            receipt,
        }),
        _ => Err(errors),
    }
}

fn receipt_errors(receipt: &ReceiptUpload) -> Vec<&'static str> {
    let mut messages = Vec::new();
    if receipt.is_empty() {
        messages.push(RECEIPT_REQUIRED);
    }
    if receipt.len() > MAX_RECEIPT_BYTES {
        messages.push(RECEIPT_TOO_LARGE);
    }
    if receipt.allowed_mime().is_none() {
        messages.push(RECEIPT_WRONG_TYPE);
    }
    messages
}

fn push(errors: &mut FieldErrors, field: &str, message: &str) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.to_string());
}

/// snake_case struct field to camelCase wire name
fn wire_name(field: &str) -> String {
    let mut name = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            name.extend(c.to_uppercase());
            upper = false;
        } else {
            name.push(c);
        }
    }
    name
}

#[cfg(test)]
mod tests {
    use rstest::*;

    use super::*;

    #[fixture]
    fn form() -> RegistrationForm {
        RegistrationForm {
            full_name: "Jane Doe".to_string(),
            department: "Computer Science".to_string(),
            matric_number: "CSC1901".to_string(),
            email: "jane@x.com".to_string(),
            whatsapp_number: "08012345678".to_string(),
            course: "AI/ML".to_string(),
        }
    }

    fn pdf(size: usize) -> ReceiptUpload {
        ReceiptUpload::new(
            "receipt.pdf".to_string(),
            "application/pdf".to_string(),
            vec![0x25; size],
        )
    }

    #[rstest]
    fn accepts_valid_submission(form: RegistrationForm) {
        let submission = validate_registration(&form, Some(pdf(2 * 1024 * 1024))).unwrap();
        assert_eq!(submission.record.full_name, "Jane Doe");
        assert_eq!(submission.record.course, Course::AiMl);
        assert_eq!(submission.receipt.len(), 2 * 1024 * 1024);
    }

    #[rstest]
    fn trims_surrounding_whitespace(mut form: RegistrationForm) {
        form.full_name = "  Jane Doe ".to_string();
        let submission = validate_registration(&form, Some(pdf(10))).unwrap();
        assert_eq!(submission.record.full_name, "Jane Doe");
    }

    #[rstest]
    #[case("A", false)]
    #[case("ABC1", false)]
    #[case("ABC12", true)]
    fn matric_number_boundary(mut form: RegistrationForm, #[case] matric: &str, #[case] ok: bool) {
        form.matric_number = matric.to_string();
        let result = validate_registration(&form, Some(pdf(10)));
        match result {
            Ok(_) => assert!(ok),
            Err(errors) => {
                assert!(!ok);
                assert_eq!(
                    errors["matricNumber"],
                    vec!["Matric/Registration number is required."]
                );
                assert_eq!(errors.len(), 1);
            }
        }
    }

    #[rstest]
    #[case("Web Development")]
    #[case("Data Science")]
    #[case("Cybersecurity")]
    #[case("Cloud Computing")]
    #[case("UI/UX")]
    #[case("AI/ML")]
    fn every_offered_course_passes(mut form: RegistrationForm, #[case] course: &str) {
        form.course = course.to_string();
        assert!(validate_registration(&form, Some(pdf(10))).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("Blockchain")]
    #[case("ai/ml")]
    fn other_courses_fail(mut form: RegistrationForm, #[case] course: &str) {
        form.course = course.to_string();
        let errors = validate_registration(&form, Some(pdf(10))).unwrap_err();
        assert_eq!(errors["course"], vec![COURSE_REQUIRED]);
    }

    #[rstest]
    fn reports_every_failing_field(form: RegistrationForm) {
        let bad = RegistrationForm {
            full_name: "Jo".to_string(),
            department: "C".to_string(),
            email: "not-an-email".to_string(),
            whatsapp_number: "0801".to_string(),
            ..form
        };
        let errors = validate_registration(&bad, None).unwrap_err();
        let fields: Vec<&str> = errors.keys().map(String::as_str).collect();
        assert_eq!(
            fields,
            vec!["department", "email", "fullName", "receipt", "whatsappNumber"]
        );
        assert_eq!(errors["email"], vec!["Please enter a valid email."]);
        assert_eq!(errors["receipt"], vec![RECEIPT_REQUIRED]);
    }

    #[rstest]
    fn rejects_empty_receipt(form: RegistrationForm) {
        let errors = validate_registration(&form, Some(pdf(0))).unwrap_err();
        assert_eq!(errors["receipt"], vec![RECEIPT_REQUIRED]);
    }

    #[rstest]
    fn size_limit_is_inclusive(form: RegistrationForm) {
        assert!(validate_registration(&form, Some(pdf(MAX_RECEIPT_BYTES))).is_ok());
        let errors = validate_registration(&form, Some(pdf(MAX_RECEIPT_BYTES + 1))).unwrap_err();
        assert_eq!(errors["receipt"], vec![RECEIPT_TOO_LARGE]);
    }

    #[rstest]
    #[case("image/png", true)]
    #[case("image/jpeg", true)]
    #[case("application/pdf", true)]
    #[case("image/gif", false)]
    #[case("application/msword", false)]
    #[case("", false)]
    fn receipt_type_must_be_allowed(
        form: RegistrationForm,
        #[case] content_type: &str,
        #[case] ok: bool,
    ) {
        let receipt = ReceiptUpload::new("r".to_string(), content_type.to_string(), vec![1; 16]);
        let result = validate_registration(&form, Some(receipt));
        match result {
            Ok(_) => assert!(ok),
            Err(errors) => {
                assert!(!ok);
                assert_eq!(errors["receipt"], vec![RECEIPT_WRONG_TYPE]);
            }
        }
    }

    #[test]
    fn wire_names_are_camel_case() {
        assert_eq!(wire_name("whatsapp_number"), "whatsappNumber");
        assert_eq!(wire_name("email"), "email");
    }
}
