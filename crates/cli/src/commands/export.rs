use std::fs;
use std::path::Path;
use std::sync::Arc;

use storefront_core::exchange::export_failure_message;
use storefront_core::{CustomerApi, CustomerExporter};

use crate::commands::{block_on, load_config, remote_api, CommandResult};

const COMMAND: &str = "export";

pub fn run(output_dir: &Path) -> CommandResult {
    let config = match load_config(COMMAND) {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    match remote_api(COMMAND, &config) {
        Ok(api) => run_with(api, output_dir),
        Err(failure) => failure,
    }
}

pub fn run_with(api: Arc<dyn CustomerApi>, output_dir: &Path) -> CommandResult {
    let exporter = CustomerExporter::new(api);
    let artifact = match block_on(COMMAND, exporter.export()) {
        Ok(Ok(artifact)) => artifact,
        Ok(Err(error)) => {
            return CommandResult::failure(
                COMMAND,
                "export_failed",
                export_failure_message(&error),
                5,
            );
        }
        Err(failure) => return failure,
    };

    let target = output_dir.join(&artifact.file_name);
    let written = fs::create_dir_all(output_dir).and_then(|()| fs::write(&target, &artifact.bytes));
    if let Err(error) = written {
        return CommandResult::failure(
            COMMAND,
            "file_write",
            format!("could not write `{}`: {error}", target.display()),
            5,
        );
    }

    CommandResult::success(
        COMMAND,
        format!("exported {} customers to {}", artifact.record_count, target.display()),
    )
}
