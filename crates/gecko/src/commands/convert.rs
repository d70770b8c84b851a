use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use gecko_dol::{DolImage, PatchOptions};
use gecko_gct::GctWriterOptions;
use gecko_ini::IniWriterOptions;
use gecko_list::{CodeList, Diagnostics, InvalidCodePolicy};
use gecko_txt::{LineEnding, TxtWriterOptions};
use miette::{miette, Context, IntoDiagnostic, Result};
use tracing::{info, warn};

use crate::format::{load_all, Format};

#[derive(Args)]
pub struct ConvertArgs {
    /// Input code lists, merged in order
    #[arg(short, long, value_name = "FILE", num_args = 1.., required = true)]
    input: Vec<PathBuf>,

    /// The file to create
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Executable to patch when writing a DOL
    #[arg(long, value_name = "FILE")]
    image: Option<PathBuf>,

    /// Import inputs naming another game, keeping the first game id
    #[arg(long, default_value_t = false)]
    continue_on_mismatch: bool,

    /// Drop the rest of a code at an invalid line instead of failing
    #[arg(long, default_value_t = false)]
    truncate_invalid: bool,

    /// Only write enabled codes to GCT and DOL outputs
    #[arg(long, default_value_t = false)]
    enabled_only: bool,

    /// Append names and comments to GCT outputs
    #[arg(long, default_value_t = false)]
    extended: bool,

    /// Carry over settings kept from INI inputs
    #[arg(long, default_value_t = false)]
    include_scrap: bool,

    /// Write `\n` line breaks in TXT outputs
    #[arg(long, default_value_t = false)]
    lf: bool,

    /// Order top level categories by name and codes by size before writing
    #[arg(long, default_value_t = false)]
    sort: bool,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl ConvertArgs {
    fn on_invalid(&self) -> InvalidCodePolicy {
        if self.truncate_invalid {
            InvalidCodePolicy::Truncate
        } else {
            InvalidCodePolicy::Abort
        }
    }

    fn encode(&self, list: &CodeList, format: Format, out: &mut Vec<u8>) -> Result<Diagnostics> {
        let diagnostics = match format {
            Format::Txt => {
                let line_ending = if self.lf { LineEnding::Lf } else { LineEnding::CrLf };
                gecko_txt::encode(
                    list,
                    out,
                    TxtWriterOptions::builder().line_ending(line_ending).build(),
                )?;
                Diagnostics::new()
            }
            Format::Ini => gecko_ini::encode(
                list,
                out,
                IniWriterOptions::builder()
                    .include_scrap(self.include_scrap)
                    .build(),
            )?,
            Format::Gct => gecko_gct::encode(
                list,
                out,
                GctWriterOptions::builder()
                    .enabled_only(self.enabled_only)
                    .extended(self.extended)
                    .on_invalid(self.on_invalid())
                    .build(),
            )?,
            Format::Dol => {
                let path = self.image.as_ref().ok_or_else(|| {
                    miette!(
                        help = "pass the executable the code handler was injected into with --image",
                        "writing a DOL needs a base image"
                    )
                })?;
                let f = File::open(path)
                    .into_diagnostic()
                    .context(format!("path: {}", path.display()))?;
                let image = DolImage::new(f)?;
                gecko_dol::patch(
                    &image,
                    list,
                    out,
                    PatchOptions::builder()
                        .enabled_only(self.enabled_only)
                        .on_invalid(self.on_invalid())
                        .build(),
                )?
            }
            Format::Xml => {
                return Err(miette!(
                    help = "convert to .txt, .ini, .gct or .dol instead",
                    "code databases can only be read"
                ))
            }
        };
        Ok(diagnostics)
    }

    pub fn handle(&self) -> Result<()> {
        let format = Format::from_path(&self.output)?;
        let policy = super::mismatch_policy(self.continue_on_mismatch);

        let (mut list, mut diagnostics) = load_all(self.input.iter().map(PathBuf::as_path), policy)?;
        if self.sort {
            list.sort_by_size();
        }

        // everything is encoded before the target is created, so a failure leaves no file behind
        let mut data = Vec::new();
        diagnostics.extend(self.encode(&list, format, &mut data)?);

        info!("writing {}", self.output.display());
        let mut out = if !self.overwrite {
            File::create_new(&self.output)
                .into_diagnostic()
                .context(format!("creating {}", &self.output.display()))?
        } else {
            File::create(&self.output)
                .into_diagnostic()
                .context(format!("creating {}", &self.output.display()))?
        };
        out.write_all(&data).into_diagnostic()?;

        if !diagnostics.is_empty() {
            warn!("finished with {} warnings", diagnostics.len());
        }
        Ok(())
    }
}
