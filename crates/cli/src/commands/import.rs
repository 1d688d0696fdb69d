use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use storefront_core::{
    CustomerApi, CustomerImporter, ImportError, ImportNotice, ImportStatus, RejectedRecord,
};

use crate::commands::{block_on, load_config, remote_api, CommandResult};

const COMMAND: &str = "import";

#[derive(Debug, Serialize)]
struct ImportReport<'a> {
    command: &'static str,
    status: &'static str,
    file_name: &'a str,
    success_count: usize,
    failure_count: usize,
    rejected: &'a [RejectedRecord],
    notice: ImportNotice,
}

pub fn run(path: &Path) -> CommandResult {
    let config = match load_config(COMMAND) {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    match remote_api(COMMAND, &config) {
        Ok(api) => run_with(api, path),
        Err(failure) => failure,
    }
}

pub fn run_with(api: Arc<dyn CustomerApi>, path: &Path) -> CommandResult {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(error) => {
            return CommandResult::failure(
                COMMAND,
                "file_read",
                format!("could not read `{}`: {error}", path.display()),
                3,
            );
        }
    };
    let file_name =
        path.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default();

    let importer = CustomerImporter::new(api);
    let result = match block_on(COMMAND, importer.import(&bytes, &file_name)) {
        Ok(result) => result,
        Err(failure) => return failure,
    };
    let notice = ImportNotice::from_result(&result);

    match result {
        Ok(outcome) => {
            let exit_code = match outcome.status() {
                ImportStatus::Succeeded | ImportStatus::PartiallySucceeded { .. } => 0,
                ImportStatus::NoData | ImportStatus::Failed => 4,
            };
            CommandResult::report(
                exit_code,
                &ImportReport {
                    command: COMMAND,
                    status: outcome.status().as_str(),
                    file_name: &file_name,
                    success_count: outcome.success_count(),
                    failure_count: outcome.failure_count(),
                    rejected: outcome.rejected(),
                    notice,
                },
            )
        }
        Err(error) => {
            let headline = notice.error.unwrap_or_else(|| "import failed".to_string());
            CommandResult::failure(COMMAND, error_class(&error), format!("{headline} ({error})"), 3)
        }
    }
}

fn error_class(error: &ImportError) -> &'static str {
    match error {
        ImportError::NoFileSupplied => "no_file_supplied",
        ImportError::WrongFileType { .. } => "wrong_file_type",
        ImportError::InvalidFormat(_) => "invalid_format",
    }
}
