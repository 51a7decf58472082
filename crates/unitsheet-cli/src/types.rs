use std::path::PathBuf;

use unitsheet_cli::pipeline::RunOutput;

#[derive(Debug)]
pub struct RunResult {
    pub output: RunOutput,
    /// Where the snapshot was written; `None` on a dry run.
    pub output_path: Option<PathBuf>,
    pub has_previous: bool,
}

impl RunResult {
    /// A run fails when mandatory fields are left unmapped.
    pub fn has_errors(&self) -> bool {
        self.output.summary.mapping.unmapped_mandatory > 0
    }
}
