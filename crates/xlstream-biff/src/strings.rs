use std::collections::BTreeSet;
use std::sync::{Mutex, OnceLock};

use encoding_rs::{
    Encoding, BIG5, EUC_KR, GBK, SHIFT_JIS, UTF_8, WINDOWS_1250, WINDOWS_1251, WINDOWS_1252,
    WINDOWS_1253, WINDOWS_1254, WINDOWS_1255, WINDOWS_1256, WINDOWS_1257, WINDOWS_1258,
    WINDOWS_874,
};

use crate::records::CodecError;

// BIFF8 string option flags used by ShortXLUnicodeString and
// XLUnicodeStringNoCch. See [MS-XLS] 2.5.293 and 2.5.296.
pub(crate) const STR_FLAG_HIGH_BYTE: u8 = 0x01;
const STR_FLAG_EXT: u8 = 0x04;
const STR_FLAG_RICH_TEXT: u8 = 0x08;

fn encoding_for_codepage(codepage: u16) -> Option<&'static Encoding> {
    Some(match codepage as u32 {
        874 => WINDOWS_874,
        932 => SHIFT_JIS,
        936 => GBK,
        949 => EUC_KR,
        950 => BIG5,
        1250 => WINDOWS_1250,
        1251 => WINDOWS_1251,
        1252 => WINDOWS_1252,
        1253 => WINDOWS_1253,
        1254 => WINDOWS_1254,
        1255 => WINDOWS_1255,
        1256 => WINDOWS_1256,
        1257 => WINDOWS_1257,
        1258 => WINDOWS_1258,
        65001 => UTF_8,
        _ => return None,
    })
}

pub(crate) fn decode_ansi(codepage: u16, bytes: &[u8]) -> String {
    if let Some(encoding) = encoding_for_codepage(codepage) {
        let (cow, _, _) = encoding.decode(bytes);
        return cow.into_owned();
    }

    warn_unsupported_codepage(codepage);

    // Lossless byte-to-Unicode mapping: keeps ASCII (and embedded NULs)
    // intact even when the codepage isn't supported by `encoding_rs`.
    bytes.iter().copied().map(char::from).collect()
}

fn warn_unsupported_codepage(codepage: u16) {
    static WARNED: OnceLock<Mutex<BTreeSet<u16>>> = OnceLock::new();

    let warned = WARNED.get_or_init(|| Mutex::new(BTreeSet::new()));
    let mut warned = match warned.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };

    if warned.insert(codepage) {
        log::warn!(
            "unsupported CODEPAGE {codepage}; decoding 8-bit strings using lossless byte-to-Unicode mapping"
        );
    }
}

fn decode_utf16le(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

/// Decode an `XLUnicodeStringNoCch` whose character count comes from the
/// owning record's header.
///
/// Embedded NUL characters are preserved; they are significant for NAME
/// records. Returns the value, whether it was stored wide (UTF-16LE), and the
/// number of payload bytes consumed (flags byte + char bytes).
pub(crate) fn decode_string_no_cch(
    input: &[u8],
    cch: usize,
    codepage: u16,
) -> Result<(String, bool, usize), CodecError> {
    let Some((&flags, rest)) = input.split_first() else {
        return Err(CodecError::TruncatedString);
    };
    let wide = flags & STR_FLAG_HIGH_BYTE != 0;
    let char_bytes = if wide {
        cch.checked_mul(2).ok_or(CodecError::TruncatedString)?
    } else {
        cch
    };
    let chars = rest.get(..char_bytes).ok_or(CodecError::TruncatedString)?;

    let value = if wide {
        decode_utf16le(chars)
    } else {
        decode_ansi(codepage, chars)
    };
    Ok((value, wide, 1 + char_bytes))
}

/// Encode an `XLUnicodeStringNoCch`. Returns the bytes (flags byte + chars)
/// and the character count for the owning record's `cch` field.
///
/// Wide strings store UTF-16LE code units; compressed strings store one byte
/// per character and reject characters above U+00FF.
pub(crate) fn encode_string_no_cch(value: &str, wide: bool) -> Result<(Vec<u8>, usize), CodecError> {
    if wide {
        let units: Vec<u16> = value.encode_utf16().collect();
        let mut out = Vec::with_capacity(1 + units.len() * 2);
        out.push(STR_FLAG_HIGH_BYTE);
        for unit in &units {
            out.extend_from_slice(&unit.to_le_bytes());
        }
        Ok((out, units.len()))
    } else {
        let mut out = Vec::with_capacity(1 + value.len());
        out.push(0);
        let mut cch = 0usize;
        for c in value.chars() {
            let code = u32::from(c);
            if code > 0xFF {
                return Err(CodecError::UnencodableChar { c });
            }
            out.push(code as u8);
            cch += 1;
        }
        Ok((out, cch))
    }
}

/// Decode a `ShortXLUnicodeString` (`[cch: u8][flags: u8][chars...]`), used
/// by `BoundSheet8` sheet names. Rich-text and ext payloads are skipped, not
/// interpreted. Returns the value and the bytes consumed.
pub(crate) fn decode_short_string(
    input: &[u8],
    codepage: u16,
) -> Result<(String, usize), CodecError> {
    if input.len() < 2 {
        return Err(CodecError::TruncatedString);
    }
    let cch = input[0] as usize;
    let flags = input[1];
    let mut offset = 2usize;

    let richtext_runs = if flags & STR_FLAG_RICH_TEXT != 0 {
        let bytes = input
            .get(offset..offset + 2)
            .ok_or(CodecError::TruncatedString)?;
        offset += 2;
        u16::from_le_bytes([bytes[0], bytes[1]]) as usize
    } else {
        0
    };

    let ext_size = if flags & STR_FLAG_EXT != 0 {
        let bytes = input
            .get(offset..offset + 4)
            .ok_or(CodecError::TruncatedString)?;
        offset += 4;
        u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize
    } else {
        0
    };

    let wide = flags & STR_FLAG_HIGH_BYTE != 0;
    let char_bytes = if wide {
        cch.checked_mul(2).ok_or(CodecError::TruncatedString)?
    } else {
        cch
    };
    let chars = input
        .get(offset..offset + char_bytes)
        .ok_or(CodecError::TruncatedString)?;
    offset += char_bytes;

    let value = if wide {
        decode_utf16le(chars)
    } else {
        decode_ansi(codepage, chars)
    };

    let trailing = richtext_runs
        .checked_mul(4)
        .and_then(|n| n.checked_add(ext_size))
        .ok_or(CodecError::TruncatedString)?;
    let end = offset
        .checked_add(trailing)
        .ok_or(CodecError::TruncatedString)?;
    if input.len() < end {
        return Err(CodecError::TruncatedString);
    }

    Ok((value, end))
}

/// Encode a `ShortXLUnicodeString`: compressed when every character fits in
/// 8 bits, wide UTF-16LE otherwise.
pub(crate) fn encode_short_string(value: &str) -> Result<Vec<u8>, CodecError> {
    let compressed = value.chars().all(|c| u32::from(c) <= 0xFF);
    let (body, cch) = encode_string_no_cch(value, !compressed)?;
    let cch = u8::try_from(cch).map_err(|_| CodecError::StringTooLong { len: cch })?;

    let mut out = Vec::with_capacity(1 + body.len());
    out.push(cch);
    out.extend_from_slice(&body);
    Ok(out)
}
