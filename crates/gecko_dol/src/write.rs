//! Types for replacing the code table of a DOL executable
//!

use std::io::Write;

use bon::Builder;
use gecko_gct::GctWriterOptions;
use gecko_list::{CodeList, Diagnostics, InvalidCodePolicy};
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::read::DolImage;

/// Options for how the code table should be written into the executable
#[derive(Debug, Default, Clone, Copy, Builder)]
pub struct PatchOptions {
    /// Only write codes marked as enabled
    #[builder(default)]
    pub enabled_only: bool,

    /// What to do with a code line that is not valid hex
    #[builder(default)]
    pub on_invalid: InvalidCodePolicy,
}

/// Write a copy of `image` whose embedded table holds the codes of `list`.
///
/// The new table starts where the old one did and may grow up to the end of its section.
/// Any bytes of the old table past the new one are zeroed.
#[instrument(skip_all, err)]
pub fn patch<W: Write>(
    image: &DolImage,
    list: &CodeList,
    mut writer: W,
    options: PatchOptions,
) -> Result<Diagnostics> {
    let embedded = image.find_table()?;

    let mut table = Vec::new();
    let diagnostics = gecko_gct::encode(
        list,
        &mut table,
        GctWriterOptions::builder()
            .enabled_only(options.enabled_only)
            .on_invalid(options.on_invalid)
            .build(),
    )?;

    if table.len() > embedded.capacity() {
        return Err(Error::TableTooLarge {
            needed: table.len(),
            available: embedded.capacity(),
        });
    }

    let mut data = image.as_bytes().to_vec();
    let new_end = embedded.start + table.len();
    data[embedded.start..new_end].copy_from_slice(&table);
    if new_end < embedded.end {
        data[new_end..embedded.end].fill(0);
    }
    debug!(
        "table at {:#X} now {} bytes, was {}",
        embedded.start,
        table.len(),
        embedded.end - embedded.start
    );

    writer.write_all(&data)?;
    writer.flush()?;
    Ok(diagnostics)
}
