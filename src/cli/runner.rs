use std::{io::Write, path::Path};

use tracing::{debug, info, warn};

use linebreak::{convert_file, detect_file, FileError, Format};

use super::args::CliArgs;

/// Per-run tally of processed files.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub succeeded: usize,
    pub failed: usize,
}

fn cause(err: &FileError) -> String {
    err.io_error().to_string()
}

fn detect_one<W: Write>(path: &Path, out: &mut W) -> std::io::Result<bool> {
    match detect_file(path) {
        Ok(format) => {
            writeln!(
                out,
                "Format of {} was detected to be: {format}",
                path.display()
            )?;
            Ok(true)
        }
        Err(err) => {
            warn!(path = %path.display(), error = %cause(&err), "detection failed");
            writeln!(
                out,
                "Failed to detect line break format, {err} ({})",
                cause(&err)
            )?;
            Ok(false)
        }
    }
}

fn convert_one<W: Write>(path: &Path, target: Format, out: &mut W) -> std::io::Result<bool> {
    match convert_file(path, target) {
        Ok(()) => Ok(true),
        Err(err) => {
            warn!(path = %path.display(), %target, error = %err, "conversion failed");
            writeln!(
                out,
                "Failed to convert file at path: {} ({})",
                path.display(),
                cause(&err)
            )?;
            Ok(false)
        }
    }
}

/// Run the parsed command over every file argument, writing the report to `out`.
///
/// A failing file never stops the remaining ones. The only error returned is
/// a failure to write the report itself.
pub fn run<W: Write>(args: &CliArgs, out: &mut W) -> std::io::Result<Summary> {
    let target = args.command.target();
    let mut summary = Summary::default();

    for path in args.command.files() {
        debug!(path = %path.display(), ?target, "processing file");
        let ok = match target {
            None => detect_one(path, out)?,
            Some(target) => convert_one(path, target, out)?,
        };
        if ok {
            summary.succeeded += 1;
        } else {
            summary.failed += 1;
        }
    }

    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::Parser;

    use super::*;

    fn run_with(argv: &[&str]) -> (Summary, String) {
        let args = CliArgs::try_parse_from(argv).unwrap();
        let mut out = Vec::new();
        let summary = run(&args, &mut out).unwrap();
        (summary, String::from_utf8(out).unwrap())
    }

    #[test]
    fn detect_reports_each_file() {
        let dir = tempfile::tempdir().unwrap();
        let unix = dir.path().join("unix.txt");
        let dos = dir.path().join("dos.txt");
        let mac = dir.path().join("mac.txt");
        fs::write(&unix, b"a\nb").unwrap();
        fs::write(&dos, b"a\r\nb").unwrap();
        fs::write(&mac, b"a\rb").unwrap();

        let (summary, out) = run_with(&[
            "linebreak",
            "detect",
            unix.to_str().unwrap(),
            dos.to_str().unwrap(),
            mac.to_str().unwrap(),
        ]);

        assert_eq!(
            summary,
            Summary {
                succeeded: 3,
                failed: 0
            }
        );
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(
            lines,
            [
                format!("Format of {} was detected to be: Unix", unix.display()),
                format!("Format of {} was detected to be: DOS", dos.display()),
                format!("Format of {} was detected to be: Mac", mac.display()),
            ]
        );
    }

    #[test]
    fn detect_continues_after_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        let present = dir.path().join("present.txt");
        fs::write(&present, b"x\r\n").unwrap();

        let (summary, out) = run_with(&[
            "linebreak",
            "detect",
            missing.to_str().unwrap(),
            present.to_str().unwrap(),
        ]);

        assert_eq!(
            summary,
            Summary {
                succeeded: 1,
                failed: 1
            }
        );
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(&format!(
            "Failed to detect line break format, can't open file at path: {}",
            missing.display()
        )));
        assert_eq!(
            lines[1],
            format!("Format of {} was detected to be: DOS", present.display())
        );
    }

    #[test]
    fn convert_rewrites_files_and_reports_failures() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        let file = dir.path().join("file.txt");
        fs::write(&file, b"A\r\nB\nC\rD").unwrap();

        let (summary, out) = run_with(&[
            "linebreak",
            "dos",
            missing.to_str().unwrap(),
            file.to_str().unwrap(),
        ]);

        assert_eq!(
            summary,
            Summary {
                succeeded: 1,
                failed: 1
            }
        );
        assert!(out.starts_with(&format!(
            "Failed to convert file at path: {}",
            missing.display()
        )));
        assert_eq!(out.lines().count(), 1);
        assert_eq!(fs::read(&file).unwrap(), b"A\r\nB\r\nC\r\nD");
    }

    #[test]
    fn successful_conversion_prints_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, b"one\r\ntwo\r\n").unwrap();

        let (summary, out) = run_with(&["linebreak", "mac", file.to_str().unwrap()]);

        assert_eq!(summary.failed, 0);
        assert!(out.is_empty());
        assert_eq!(fs::read(&file).unwrap(), b"one\rtwo\r");
    }
}
