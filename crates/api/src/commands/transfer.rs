//! Export, import and reset of the tracker record

use std::path::Path;

use lapse_domain::{LoadReport, Result};
use lapse_infra::export::{self, ExportFormat};

use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

/// Render the whole record as JSON or CSV
pub fn export_record(ctx: &AppContext, format: ExportFormat) -> Result<String> {
    execute_command("data::export", || export::render(ctx.sessions.record(), format))
}

/// Replace every project, session and the timer with the contents of `path`
///
/// Malformed elements are dropped and counted in the returned report.
pub fn import_file(ctx: &mut AppContext, path: &Path) -> Result<LoadReport> {
    execute_command("data::import", || {
        let value = export::read_import(path)?;
        Ok(ctx.sessions.replace_all(&value))
    })
}

/// Remove all projects and sessions and stop the timer
pub fn clear_all(ctx: &mut AppContext) -> Result<()> {
    execute_command("data::clear", || {
        ctx.sessions.clear_all();
        Ok(())
    })
}
