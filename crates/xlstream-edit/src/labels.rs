//! Auto-open label detection and obfuscation.

use log::debug;
use xlstream_biff::{Lbl, BUILTIN_AUTO_OPEN_NAME, RECORD_NAME};

use crate::error::StreamError;
use crate::stream::WorkbookStream;

/// Normalized prefix the host application treats as an auto-open trigger.
pub const AUTO_OPEN_PREFIX: &str = "auto_open";

/// Replacement name: matches the trigger once NULs are stripped and case is
/// folded, but defeats a byte-level scan for the literal name. Stored wide so
/// the embedded NULs survive encoding.
const OBFUSCATED_AUTO_OPEN: &str = "Au\0To_OpEn\0\0\0\0\0";

impl WorkbookStream {
    /// Every defined-name record the host application would treat as an
    /// auto-open trigger, in stream order.
    ///
    /// A label qualifies either as the built-in auto-open name (the
    /// `fBuiltin` flag plus the one-byte name id 0x01) or by its normalized
    /// name starting with [`AUTO_OPEN_PREFIX`]. Normalization strips NULs,
    /// so an already obfuscated label is still reported.
    pub fn auto_launch_labels(&self) -> Result<Vec<Lbl>, StreamError> {
        let codepage = self.codepage();
        let mut labels = Vec::new();
        for record in self.records_of_type(RECORD_NAME) {
            let lbl = Lbl::from_record(&record, codepage)?;
            let is_auto_open = (lbl.is_builtin() && lbl.name() == BUILTIN_AUTO_OPEN_NAME)
                || lbl.normalized_name().starts_with(AUTO_OPEN_PREFIX);
            if is_auto_open {
                labels.push(lbl);
            }
        }
        Ok(labels)
    }

    /// Rewrite the first canonically named auto-open label so a byte-level
    /// scan no longer finds the trigger name, while the host application
    /// still resolves and runs it.
    ///
    /// Only canonical spellings qualify as targets: the built-in form, or a
    /// raw name (no NUL stripping) whose case-folded value starts with the
    /// trigger prefix. The rewrite renames the label to a NUL-interleaved
    /// wide spelling and clears `fBuiltin`; the renamed record is longer, so
    /// sheet offsets are repaired before the stream is returned.
    pub fn obfuscate_auto_open(&self) -> Result<WorkbookStream, StreamError> {
        let codepage = self.codepage();
        let target = self
            .records_of_type(RECORD_NAME)
            .into_iter()
            .map(|record| Lbl::from_record(&record, codepage))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .find(|lbl| {
                (lbl.is_builtin() && lbl.name() == BUILTIN_AUTO_OPEN_NAME)
                    || lbl.name().to_lowercase().starts_with(AUTO_OPEN_PREFIX)
            })
            .ok_or(StreamError::NoAutoOpenLabel)?;

        debug!(
            "obfuscating auto-open label {:?} (builtin: {})",
            target.name(),
            target.is_builtin()
        );

        let replacement = target
            .with_name(OBFUSCATED_AUTO_OPEN, true)?
            .with_builtin(false);

        self.replace(target.record(), replacement.into_record())?
            .fix_sheet_offsets()
    }
}
