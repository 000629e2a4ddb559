//! Bulk data commands.

use std::io::Write;
use std::path::Path;

use erp_assistant_server::models::DataImport;
use erp_assistant_server::services::{DataService, KnowledgeBase};

use super::{CliError, repositories};

async fn service() -> Result<DataService, CliError> {
    let repos = repositories().await?;
    let knowledge = KnowledgeBase::new(repos.faqs.clone());
    Ok(DataService::new(repos, knowledge))
}

/// Write the export as pretty JSON to `output`, or stdout.
pub async fn export(output: Option<&Path>) -> Result<(), CliError> {
    let export = service().await?.export().await?;
    let json = serde_json::to_string_pretty(&export)?;

    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            tracing::info!(
                "Exported {} users, {} FAQs, {} escalations to {}",
                export.users.len(),
                export.faqs.len(),
                export.escalations.len(),
                path.display()
            );
        }
        None => writeln!(std::io::stdout().lock(), "{json}")?,
    }
    Ok(())
}

/// Replace FAQs and non-admin users from an export file.
pub async fn import(file: &Path) -> Result<(), CliError> {
    let data: DataImport = serde_json::from_str(&std::fs::read_to_string(file)?)?;
    let summary = service().await?.import(data).await?;

    tracing::info!(
        "Imported {} users and {} FAQs (imported users get the default password)",
        summary.users,
        summary.faqs
    );
    Ok(())
}
