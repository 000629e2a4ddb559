//! Frequently asked questions.

use serde::{Deserialize, Serialize};

use erp_assistant_core::{Department, FaqId};

use super::{ValidationError, required};

/// A stored FAQ entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Faq {
    pub id: FaqId,
    pub question: String,
    pub answer: String,
    pub department: Department,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Body of `POST /faqs` before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateFaqRequest {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub department: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A validated FAQ awaiting an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFaq {
    pub question: String,
    pub answer: String,
    pub department: Department,
    pub tags: Vec<String>,
}

impl NewFaq {
    /// Attach the id assigned by the store.
    #[must_use]
    pub fn with_id(self, id: FaqId) -> Faq {
        Faq {
            id,
            question: self.question,
            answer: self.answer,
            department: self.department,
            tags: self.tags,
        }
    }
}

impl TryFrom<CreateFaqRequest> for NewFaq {
    type Error = ValidationError;

    fn try_from(req: CreateFaqRequest) -> Result<Self, Self::Error> {
        let question = required("question", req.question.as_deref())?;
        let answer = required("answer", req.answer.as_deref())?;
        let department = Department::parse(&required("department", req.department.as_deref())?)?;

        // Duplicate and blank tags are dropped; order of first appearance is kept.
        let mut tags: Vec<String> = Vec::with_capacity(req.tags.len());
        for tag in req.tags {
            let tag = tag.trim();
            if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }

        Ok(Self {
            question,
            answer,
            department,
            tags,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request() -> CreateFaqRequest {
        CreateFaqRequest {
            question: Some("  How do I apply for leave? ".to_string()),
            answer: Some("Use the HR portal.".to_string()),
            department: Some("hr".to_string()),
            tags: vec!["leave".to_string(), " leave ".to_string(), String::new()],
        }
    }

    #[test]
    fn test_validates_and_normalizes() {
        let faq = NewFaq::try_from(request()).unwrap();
        assert_eq!(faq.question, "How do I apply for leave?");
        assert_eq!(faq.department, Department::Hr);
        assert_eq!(faq.tags, vec!["leave"]);
    }

    #[test]
    fn test_blank_question_rejected() {
        let mut req = request();
        req.question = Some("   ".to_string());
        assert_eq!(
            NewFaq::try_from(req).unwrap_err(),
            ValidationError::Required("question")
        );
    }

    #[test]
    fn test_unknown_department_rejected() {
        let mut req = request();
        req.department = Some("Legal".to_string());
        let err = NewFaq::try_from(req).unwrap_err();
        assert!(err.to_string().starts_with("department must be one of"));
    }

    #[test]
    fn test_faq_wire_format() {
        let faq = NewFaq::try_from(request()).unwrap().with_id(FaqId::new(4));
        let json = serde_json::to_value(&faq).unwrap();
        assert_eq!(json["id"], 4);
        assert_eq!(json["department"], "HR");
        assert_eq!(json["tags"][0], "leave");
    }
}
