//! Picking a codec from a file name.

use std::fs::File;
use std::path::Path;

use clap::ValueEnum;
use gecko_list::{CodeList, Diagnostics, MismatchPolicy};
use miette::{miette, Context, IntoDiagnostic, Result};
use tracing::info;

/// The supported file formats
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Text code list
    Txt,
    /// Dolphin game settings
    Ini,
    /// Gecko code table
    Gct,
    /// Executable with an injected code table
    Dol,
    /// Code database, read only
    Xml,
}

impl Format {
    /// Guess the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "txt" => Ok(Self::Txt),
            "ini" => Ok(Self::Ini),
            "gct" => Ok(Self::Gct),
            "dol" => Ok(Self::Dol),
            "xml" => Ok(Self::Xml),
            _ => Err(miette!(
                help = "use a .txt, .ini, .gct, .dol or .xml extension",
                "unable to tell the format of {}",
                path.display()
            )),
        }
    }
}

/// Decode `path` and append its codes to `list`.
pub fn load(path: &Path, list: &mut CodeList, policy: MismatchPolicy) -> Result<Diagnostics> {
    let format = Format::from_path(path)?;
    info!("reading {} as {:?}", path.display(), format);

    let open = || {
        File::open(path)
            .into_diagnostic()
            .context(format!("path: {}", path.display()))
    };

    let diagnostics = match format {
        Format::Txt => gecko_txt::decode_into(open()?, list, policy)?,
        Format::Ini => gecko_ini::decode_path(path, list, policy)?,
        Format::Gct => gecko_gct::decode_into(open()?, list, policy)?,
        Format::Dol => gecko_dol::decode_into(open()?, list)?,
        Format::Xml => gecko_xml::decode_into(open()?, list, policy)?,
    };
    Ok(diagnostics)
}

/// Decode every path into one list.
pub fn load_all<'a>(
    paths: impl IntoIterator<Item = &'a Path>,
    policy: MismatchPolicy,
) -> Result<(CodeList, Diagnostics)> {
    let mut list = CodeList::new();
    let mut diagnostics = Diagnostics::new();
    for path in paths {
        diagnostics.extend(load(path, &mut list, policy)?);
    }
    Ok((list, diagnostics))
}
