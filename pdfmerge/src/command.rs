//! Ghostscript command-line construction.
//!
//! The argument vector is fully determined by the job configuration:
//!
//! ```text
//! <tool> -dBATCH -dNOPAUSE -q -sDEVICE=pdfwrite [-dPDFSETTINGS=<token>] -sOutputFile=<out> <inputs...>
//! ```

use serde::{Serialize, Serializer};
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::preset::CompressionPreset;

/// Switches that precede the optional compression switch.
pub const BASE_ARGS: [&str; 4] = ["-dBATCH", "-dNOPAUSE", "-q", "-sDEVICE=pdfwrite"];

/// A program and its arguments, ready to be spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: OsString,
    args: Vec<OsString>,
}

impl CommandLine {
    /// Create a command line from a program and its arguments.
    pub fn new<P, I, A>(program: P, args: I) -> Self
    where
        P: Into<OsString>,
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Build the Ghostscript merge command.
    ///
    /// # Arguments
    ///
    /// * `tool` - Ghostscript binary, invoked as the first argument
    /// * `preset` - Compression preset; [`CompressionPreset::None`] omits the switch
    /// * `output` - Fully resolved output path
    /// * `inputs` - Input files, in merge order
    pub fn ghostscript(
        tool: &Path,
        preset: CompressionPreset,
        output: &Path,
        inputs: &[PathBuf],
    ) -> Self {
        let mut args: Vec<OsString> = BASE_ARGS.iter().map(OsString::from).collect();

        if let Some(settings) = preset.pdf_settings_arg() {
            args.push(settings.into());
        }

        let mut output_arg = OsString::from("-sOutputFile=");
        output_arg.push(output.as_os_str());
        args.push(output_arg);

        args.extend(inputs.iter().map(|input| input.as_os_str().to_os_string()));

        Self::new(tool.as_os_str(), args)
    }

    /// The program to spawn.
    pub fn program(&self) -> &OsStr {
        &self.program
    }

    /// Arguments passed to the program.
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// The full argument vector, program first.
    pub fn argv(&self) -> Vec<&OsStr> {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(OsString::as_os_str))
            .collect()
    }

    /// The argument vector as lossily-decoded strings.
    pub fn to_string_vec(&self) -> Vec<String> {
        self.argv()
            .into_iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_vec().join(" "))
    }
}

impl Serialize for CommandLine {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_string_vec().serialize(serializer)
    }
}
