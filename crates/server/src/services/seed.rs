//! Sample data for a fresh store.

use tracing::{info, instrument};

use erp_assistant_core::{Department, Role, Username};

use crate::db::Repositories;
use crate::models::{NewFaq, User, ValidationError};
use crate::services::auth::hash_password;
use crate::services::data::DataError;

const SAMPLE_FAQS: &[(&str, &str, Department, &[&str])] = &[
    (
        "How do I request vacation time?",
        "Login to the HR portal, navigate to 'Time Off', and submit a new request with your desired dates.",
        Department::Hr,
        &["vacation", "time off", "leave"],
    ),
    (
        "What is the current sales target?",
        "The Q1 sales target is $1M, with individual targets available in your Sales Dashboard.",
        Department::Sales,
        &["targets", "goals", "performance"],
    ),
    (
        "How do I submit an expense report?",
        "Use the Finance Portal to create a new expense report, attach receipts, and submit for approval.",
        Department::Finance,
        &["expenses", "reimbursement", "reports"],
    ),
    (
        "How does IDMS handle Input Tax Credit (ITC)?",
        "IDMS maintains a ledger of ITC claims and reconciles them with GSTR-2A data to ensure accurate tax credits.",
        Department::Finance,
        &["ITC", "Tax Credits", "Reconciliation"],
    ),
];

const DEMO_USERS: &[(&str, &str, Department, Role)] = &[
    ("admin", "admin123", Department::Admin, Role::Admin),
    ("hr_user", "password123", Department::Hr, Role::User),
    ("sales_user", "password123", Department::Sales, Role::User),
    ("finance_user", "password123", Department::Finance, Role::User),
];

/// Insert the sample FAQs when the FAQ collection is empty, and the demo
/// users that do not exist yet when `with_users` is set.
///
/// # Errors
///
/// Returns `DataError` if the store fails or a password cannot be hashed.
#[instrument(skip(repos))]
pub async fn seed_sample_data(repos: &Repositories, with_users: bool) -> Result<(), DataError> {
    if repos.faqs.count().await? == 0 {
        for (question, answer, department, tags) in SAMPLE_FAQS {
            repos
                .faqs
                .create(NewFaq {
                    question: (*question).to_string(),
                    answer: (*answer).to_string(),
                    department: *department,
                    tags: tags.iter().map(|t| (*t).to_string()).collect(),
                })
                .await?;
        }
        info!(count = SAMPLE_FAQS.len(), "Seeded sample FAQs");
    }

    if with_users {
        for (name, password, department, role) in DEMO_USERS {
            let username = Username::parse(name).map_err(ValidationError::from)?;
            if repos.users.find_credentials(&username).await?.is_some() {
                continue;
            }
            let user = User {
                username,
                department: *department,
                role: *role,
            };
            repos.users.create(&user, &hash_password(password)?).await?;
            info!(username = name, "Seeded demo user");
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let repos = Repositories::in_memory();
        seed_sample_data(&repos, false).await.unwrap();
        seed_sample_data(&repos, false).await.unwrap();

        let faqs = repos.faqs.list().await.unwrap();
        assert_eq!(faqs.len(), SAMPLE_FAQS.len());
        assert_eq!(faqs[0].question, "How do I request vacation time?");
        assert!(repos.users.list().await.unwrap().is_empty());
    }
}
