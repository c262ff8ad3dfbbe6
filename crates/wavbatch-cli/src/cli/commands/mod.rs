//! CLI command handlers, one file per subcommand.

mod fetch;
mod preflight;
mod resume;
mod run;
mod session;
mod status;

pub use fetch::run_fetch;
pub use resume::run_resume;
pub use run::run_start;
pub use status::run_status;
