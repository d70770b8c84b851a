pub mod convert;
pub mod diff;
pub mod info;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Convert code lists between formats
    Convert(convert::ConvertArgs),
    /// Compare two code lists
    Diff(diff::DiffArgs),
    /// Show the contents of a code list
    Info(info::InfoArgs),
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Convert(convert) => convert.handle(),
            Commands::Diff(diff) => diff.handle(),
            Commands::Info(info) => info.handle(),
        }
    }
}

/// The policy chosen with a `--continue-on-mismatch` flag
pub(crate) fn mismatch_policy(continue_on_mismatch: bool) -> gecko_list::MismatchPolicy {
    if continue_on_mismatch {
        gecko_list::MismatchPolicy::Continue
    } else {
        gecko_list::MismatchPolicy::Abort
    }
}
