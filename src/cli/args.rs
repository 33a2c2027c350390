use std::path::PathBuf;

use clap::{Parser, Subcommand};

use linebreak::Format;

#[derive(Debug, Parser)]
#[command(
    name = "linebreak",
    version,
    about = "Detect and convert Unix, Mac and DOS line breaks"
)]
pub struct CliArgs {
    /// Log progress to stderr
    #[arg(long, global = true, default_value_t = false)]
    pub log: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the line break format of each file
    Detect {
        #[arg(required = true, allow_hyphen_values = true)]
        files: Vec<PathBuf>,
    },
    /// Convert each file to Unix (LF) line breaks
    Unix {
        #[arg(required = true, allow_hyphen_values = true)]
        files: Vec<PathBuf>,
    },
    /// Convert each file to classic Mac (CR) line breaks
    Mac {
        #[arg(required = true, allow_hyphen_values = true)]
        files: Vec<PathBuf>,
    },
    /// Convert each file to DOS (CRLF) line breaks
    Dos {
        #[arg(required = true, allow_hyphen_values = true)]
        files: Vec<PathBuf>,
    },
}

impl Command {
    pub fn files(&self) -> &[PathBuf] {
        match self {
            Command::Detect { files }
            | Command::Unix { files }
            | Command::Mac { files }
            | Command::Dos { files } => files,
        }
    }

    /// Conversion target, `None` for `detect`.
    pub fn target(&self) -> Option<Format> {
        match self {
            Command::Detect { .. } => None,
            Command::Unix { .. } => Some(Format::Unix),
            Command::Mac { .. } => Some(Format::Mac),
            Command::Dos { .. } => Some(Format::Dos),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbs_map_to_targets() {
        for (verb, target) in [
            ("detect", None),
            ("unix", Some(Format::Unix)),
            ("mac", Some(Format::Mac)),
            ("dos", Some(Format::Dos)),
        ] {
            let args = CliArgs::try_parse_from(["linebreak", verb, "a.txt", "b.txt"]).unwrap();
            assert_eq!(args.command.target(), target);
            assert_eq!(
                args.command.files(),
                [PathBuf::from("a.txt"), PathBuf::from("b.txt")]
            );
            assert!(!args.log);
        }
    }

    #[test]
    fn log_flag_after_verb() {
        let args = CliArgs::try_parse_from(["linebreak", "dos", "--log", "a.txt"]).unwrap();
        assert!(args.log);
    }

    #[test]
    fn file_names_may_start_with_hyphen() {
        let args = CliArgs::try_parse_from(["linebreak", "detect", "-notes.txt", "b.txt"]).unwrap();
        assert_eq!(
            args.command.files(),
            [PathBuf::from("-notes.txt"), PathBuf::from("b.txt")]
        );

        let args = CliArgs::try_parse_from(["linebreak", "mac", "a.txt", "-x.txt"]).unwrap();
        assert_eq!(
            args.command.files(),
            [PathBuf::from("a.txt"), PathBuf::from("-x.txt")]
        );
    }

    #[test]
    fn rejects_incomplete_invocations() {
        assert!(CliArgs::try_parse_from(["linebreak"]).is_err());
        assert!(CliArgs::try_parse_from(["linebreak", "unix"]).is_err());
        assert!(CliArgs::try_parse_from(["linebreak", "win", "a.txt"]).is_err());
    }
}
