//! Writing generated combos to spray-list files.
//!
//! - `kerbrute`: one file of `user:pass` lines
//! - `netexec`: `<stem>_user<ext>` and `<stem>_pass<ext>` with one value per line
//!
//! Existing files are never overwritten; `_1`, `_2`, ... is appended to the
//! file stem until an unused name is found.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{info, warn};

use crate::batch::SprayCombo;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Kerbrute,
    Netexec,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kerbrute" => Ok(OutputFormat::Kerbrute),
            "netexec" => Ok(OutputFormat::Netexec),
            _ => Err(format!("unknown output format '{s}', expected kerbrute or netexec")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Kerbrute => write!(f, "kerbrute"),
            OutputFormat::Netexec => write!(f, "netexec"),
        }
    }
}

/// Insert `suffix` between the file stem and the extension.
fn with_stem_suffix(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match path.extension() {
        Some(ext) => format!("{stem}{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}{suffix}"),
    };
    path.with_file_name(file_name)
}

/// First of `path`, `<stem>_1<ext>`, `<stem>_2<ext>`, ... that does not exist.
pub fn unused_path(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }
    warn!(path = %path.display(), "file already exists, appending number");
    (1..)
        .map(|n| with_stem_suffix(path, &format!("_{n}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| path.to_path_buf())
}

/// Open a fresh file at [`unused_path`] and return it with the path used.
pub fn create_output(path: &Path) -> io::Result<(BufWriter<File>, PathBuf)> {
    let path = unused_path(path);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    info!(path = %path.display(), "created output file");
    Ok((BufWriter::new(file), path))
}

/// Writes combos in one of the supported formats.
#[derive(Debug)]
pub enum SprayWriter {
    Kerbrute {
        combos: BufWriter<File>,
        path: PathBuf,
    },
    Netexec {
        users: BufWriter<File>,
        users_path: PathBuf,
        passwords: BufWriter<File>,
        passwords_path: PathBuf,
    },
}

impl SprayWriter {
    /// Create the output file(s) for `format` based on `path`.
    pub fn create(path: &Path, format: OutputFormat) -> io::Result<Self> {
        match format {
            OutputFormat::Kerbrute => {
                let (combos, path) = create_output(path)?;
                Ok(SprayWriter::Kerbrute { combos, path })
            }
            OutputFormat::Netexec => {
                let (users, users_path) = create_output(&with_stem_suffix(path, "_user"))?;
                let (passwords, passwords_path) =
                    create_output(&with_stem_suffix(path, "_pass"))?;
                Ok(SprayWriter::Netexec {
                    users,
                    users_path,
                    passwords,
                    passwords_path,
                })
            }
        }
    }

    pub fn write_combo(&mut self, combo: &SprayCombo) -> io::Result<()> {
        match self {
            SprayWriter::Kerbrute { combos, .. } => writeln!(combos, "{combo}"),
            SprayWriter::Netexec {
                users, passwords, ..
            } => {
                writeln!(users, "{}", combo.username)?;
                writeln!(passwords, "{}", combo.password)
            }
        }
    }

    /// Flush everything and return the paths that were written.
    pub fn finish(self) -> io::Result<Vec<PathBuf>> {
        match self {
            SprayWriter::Kerbrute { mut combos, path } => {
                combos.flush()?;
                Ok(vec![path])
            }
            SprayWriter::Netexec {
                mut users,
                users_path,
                mut passwords,
                passwords_path,
            } => {
                users.flush()?;
                passwords.flush()?;
                Ok(vec![users_path, passwords_path])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn combos() -> Vec<SprayCombo> {
        vec![
            SprayCombo {
                username: "jsmith".to_string(),
                password: "htimS2024!".to_string(),
            },
            SprayCombo {
                username: "mmuster".to_string(),
                password: "retsuM2024!".to_string(),
            },
        ]
    }

    fn write_all(path: &Path, format: OutputFormat) -> Vec<PathBuf> {
        let mut writer = SprayWriter::create(path, format).unwrap();
        for combo in combos() {
            writer.write_combo(&combo).unwrap();
        }
        writer.finish().unwrap()
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("Kerbrute".parse::<OutputFormat>(), Ok(OutputFormat::Kerbrute));
        assert_eq!("NETEXEC".parse::<OutputFormat>(), Ok(OutputFormat::Netexec));
        assert!("hydra".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_kerbrute_output() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_all(&dir.path().join("spray.txt"), OutputFormat::Kerbrute);
        assert_eq!(paths, vec![dir.path().join("spray.txt")]);
        assert_eq!(
            fs::read_to_string(&paths[0]).unwrap(),
            "jsmith:htimS2024!\nmmuster:retsuM2024!\n"
        );
    }

    #[test]
    fn test_netexec_output() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_all(&dir.path().join("spray.txt"), OutputFormat::Netexec);
        assert_eq!(
            paths,
            vec![
                dir.path().join("spray_user.txt"),
                dir.path().join("spray_pass.txt")
            ]
        );
        assert_eq!(fs::read_to_string(&paths[0]).unwrap(), "jsmith\nmmuster\n");
        assert_eq!(
            fs::read_to_string(&paths[1]).unwrap(),
            "htimS2024!\nretsuM2024!\n"
        );
    }

    #[test]
    fn test_existing_files_are_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spray.txt");
        fs::write(&path, "keep me\n").unwrap();
        fs::write(dir.path().join("spray_1.txt"), "and me\n").unwrap();

        let paths = write_all(&path, OutputFormat::Kerbrute);
        assert_eq!(paths, vec![dir.path().join("spray_2.txt")]);
        assert_eq!(fs::read_to_string(&path).unwrap(), "keep me\n");
    }

    #[test]
    fn test_stem_suffix_without_extension() {
        assert_eq!(
            with_stem_suffix(Path::new("out/list"), "_user"),
            PathBuf::from("out/list_user")
        );
    }
}
