//! Command-line parsing.

use std::path::PathBuf;

use crate::error::{CliError, Result};

pub const USAGE: &str = "usage: band-split <input.wav> <output.wav> [--bands <prefix>]

Splits a 16-bit PCM WAV file at 8, 16, 32 or 48 kHz into frequency bands
10 ms at a time and merges the bands back into <output.wav>. With --bands,
every band is also written to <prefix>_band<k>.wav.

Log verbosity follows RUST_LOG (default: info).";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub input: PathBuf,
    pub output: PathBuf,
    pub bands_prefix: Option<PathBuf>,
}

impl Args {
    /// Parses the arguments that follow the program name.
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut positional = Vec::new();
        let mut bands_prefix = None;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Err(CliError::Usage(USAGE.to_string())),
                "--bands" | "-b" => {
                    let prefix = args
                        .next()
                        .ok_or_else(|| CliError::Usage(format!("{arg} needs a value\n\n{USAGE}")))?;
                    bands_prefix = Some(PathBuf::from(prefix));
                }
                flag if flag.starts_with('-') && flag.len() > 1 => {
                    return Err(CliError::Usage(format!("unknown option {flag}\n\n{USAGE}")));
                }
                _ => positional.push(PathBuf::from(arg)),
            }
        }

        let [input, output]: [PathBuf; 2] = positional.try_into().map_err(|got: Vec<PathBuf>| {
            CliError::Usage(format!("expected 2 paths, got {}\n\n{USAGE}", got.len()))
        })?;

        Ok(Self {
            input,
            output,
            bands_prefix,
        })
    }

    /// Path of the file band `band` is written to, if bands are requested.
    pub fn band_path(&self, band: usize) -> Option<PathBuf> {
        let prefix = self.bands_prefix.as_ref()?;
        let mut name = prefix.as_os_str().to_owned();
        name.push(format!("_band{band}.wav"));
        Some(PathBuf::from(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args> {
        Args::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn two_paths() {
        let args = parse(&["in.wav", "out.wav"]).unwrap();
        assert_eq!(args.input, PathBuf::from("in.wav"));
        assert_eq!(args.output, PathBuf::from("out.wav"));
        assert_eq!(args.bands_prefix, None);
        assert_eq!(args.band_path(0), None);
    }

    #[test]
    fn bands_prefix_anywhere() {
        let args = parse(&["--bands", "dump/split", "in.wav", "out.wav"]).unwrap();
        assert_eq!(args.bands_prefix, Some(PathBuf::from("dump/split")));
        assert_eq!(args.band_path(2), Some(PathBuf::from("dump/split_band2.wav")));

        let args = parse(&["in.wav", "out.wav", "-b", "x"]).unwrap();
        assert_eq!(args.band_path(0), Some(PathBuf::from("x_band0.wav")));
    }

    #[test]
    fn missing_bands_value() {
        let err = parse(&["in.wav", "out.wav", "--bands"]).unwrap_err();
        assert!(matches!(err, CliError::Usage(msg) if msg.starts_with("--bands needs a value")));
    }

    #[test]
    fn wrong_number_of_paths() {
        for args in [&["in.wav"][..], &["a", "b", "c"][..], &[][..]] {
            let err = parse(args).unwrap_err();
            assert!(matches!(err, CliError::Usage(msg) if msg.starts_with("expected 2 paths")));
        }
    }

    #[test]
    fn unknown_option() {
        let err = parse(&["--frobnicate", "in.wav", "out.wav"]).unwrap_err();
        assert!(matches!(err, CliError::Usage(msg) if msg.contains("--frobnicate")));
    }

    #[test]
    fn help_prints_usage() {
        let err = parse(&["--help"]).unwrap_err();
        assert!(matches!(err, CliError::Usage(msg) if msg == USAGE));
    }

    #[test]
    fn dash_alone_is_a_path() {
        let args = parse(&["-", "out.wav"]).unwrap();
        assert_eq!(args.input, PathBuf::from("-"));
    }
}
