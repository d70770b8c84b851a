//! Decoding of the text based formats.

use encoding_rs::{Encoding, WINDOWS_1252};
use tracing::debug;

/// Decode raw bytes, honouring a byte order mark and falling back to Windows-1252 when the
/// data is not valid UTF-8.
///
/// ```
/// use gecko_list::text::decode;
///
/// assert_eq!(decode(b"Caf\xe9"), "Café");
/// assert_eq!(decode("Café".as_bytes()), "Café");
/// ```
pub fn decode(raw: &[u8]) -> String {
    if let Some((encoding, bom_length)) = Encoding::for_bom(raw) {
        let (text, _) = encoding.decode_without_bom_handling(&raw[bom_length..]);
        return text.into_owned();
    }

    match std::str::from_utf8(raw) {
        Ok(text) => text.to_string(),
        Err(_) => {
            debug!("input is not utf-8, decoding as windows-1252");
            let (text, _, _) = WINDOWS_1252.decode(raw);
            text.into_owned()
        }
    }
}
