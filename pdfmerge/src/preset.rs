//! Ghostscript compression presets.
//!
//! Ghostscript exposes quality/size trade-offs through the `-dPDFSETTINGS`
//! switch. [`CompressionPreset`] is the closed set of values this crate will
//! forward, plus [`CompressionPreset::None`], which leaves the switch out.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PdfMergeError;

/// Compression preset applied to the merged PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionPreset {
    /// No `-dPDFSETTINGS` switch; Ghostscript uses its built-in behavior.
    None,
    /// Low resolution, smallest output (`/screen`).
    Screen,
    /// Medium resolution (`/ebook`).
    Ebook,
    /// High resolution for printing (`/printer`).
    Printer,
    /// Color-preserving, highest resolution (`/prepress`).
    Prepress,
    /// Ghostscript's general-purpose preset (`/default`).
    #[default]
    Default,
}

impl CompressionPreset {
    const ALL: [CompressionPreset; 6] = [
        Self::None,
        Self::Screen,
        Self::Ebook,
        Self::Printer,
        Self::Prepress,
        Self::Default,
    ];

    /// All supported presets, in declaration order.
    pub fn all() -> &'static [CompressionPreset] {
        &Self::ALL
    }

    /// Lower-case names accepted by [`FromStr`], in declaration order.
    pub fn names() -> impl Iterator<Item = &'static str> {
        Self::ALL.iter().map(|preset| preset.name())
    }

    /// Name used on the command line and in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Screen => "screen",
            Self::Ebook => "ebook",
            Self::Printer => "printer",
            Self::Prepress => "prepress",
            Self::Default => "default",
        }
    }

    /// Value passed to `-dPDFSETTINGS`, or `None` if the switch is omitted.
    pub fn token(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Screen => Some("/screen"),
            Self::Ebook => Some("/ebook"),
            Self::Printer => Some("/printer"),
            Self::Prepress => Some("/prepress"),
            Self::Default => Some("/default"),
        }
    }

    /// The full `-dPDFSETTINGS=<token>` argument, if any.
    pub fn pdf_settings_arg(&self) -> Option<String> {
        self.token().map(|token| format!("-dPDFSETTINGS={token}"))
    }
}

impl FromStr for CompressionPreset {
    type Err = PdfMergeError;

    /// Parse a preset from its name or its raw Ghostscript token.
    ///
    /// Matching is case-insensitive and tolerates a leading `/`, so both
    /// `ebook` and `/ebook` resolve to [`CompressionPreset::Ebook`]. The
    /// empty string is the raw token of [`CompressionPreset::None`].
    fn from_str(s: &str) -> crate::Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Self::None);
        }

        let name = trimmed
            .strip_prefix('/')
            .unwrap_or(trimmed)
            .to_lowercase();

        Self::ALL
            .iter()
            .copied()
            .find(|preset| preset.name() == name)
            .ok_or_else(|| {
                PdfMergeError::invalid_argument(format!(
                    "Invalid compression level: {s}. Must be one of: {}",
                    Self::names().collect::<Vec<_>>().join(", ")
                ))
            })
    }
}

impl fmt::Display for CompressionPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
