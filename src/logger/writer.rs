//! Size-rotating file writer

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;

use crate::logger::config::{FileConfig, RotationConfig};
use crate::logger::error::LoggerError;

/// File writer with size-based rotation.
///
/// Clones share the same underlying file so every layer built from one
/// writer rotates in lockstep. A failed write switches the writer to stderr
/// for the rest of the process.
#[derive(Clone)]
pub struct RotatingFileWriter {
    state: Arc<Mutex<WriterState>>,
    path: PathBuf,
    rotation: RotationConfig,
}

struct WriterState {
    file: BufWriter<File>,
    current_size: u64,
    fallback_mode: bool,
}

impl RotatingFileWriter {
    pub fn new(config: &FileConfig) -> Result<Self, LoggerError> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = open_log_file(&config.path, config.append)?;
        let current_size = if config.append {
            std::fs::metadata(&config.path).map(|m| m.len()).unwrap_or(0)
        } else {
            0
        };

        Ok(Self {
            state: Arc::new(Mutex::new(WriterState {
                file,
                current_size,
                fallback_mode: false,
            })),
            path: config.path.clone(),
            rotation: config.rotation.clone(),
        })
    }

    fn write_locked(&self, state: &mut WriterState, buf: &[u8]) -> io::Result<usize> {
        if state.fallback_mode {
            return io::stderr().write(buf);
        }

        if state.current_size + buf.len() as u64 > self.rotation.max_size && state.current_size > 0 {
            let rotated = state
                .file
                .flush()
                .and_then(|_| rotate_files(&self.path, self.rotation.max_files))
                .and_then(|_| open_log_file(&self.path, false));
            match rotated {
                Ok(file) => {
                    state.file = file;
                    state.current_size = 0;
                }
                Err(e) => return Self::fall_back(state, buf, e),
            }
        }

        match state.file.write(buf) {
            Ok(written) => {
                state.current_size += written as u64;
                Ok(written)
            }
            Err(e) => Self::fall_back(state, buf, e),
        }
    }

    fn fall_back(state: &mut WriterState, buf: &[u8], error: io::Error) -> io::Result<usize> {
        state.fallback_mode = true;
        eprintln!("[logger] file write failed, falling back to stderr: {error}");
        io::stderr().write(buf)
    }
}

impl<'a> MakeWriter<'a> for RotatingFileWriter {
    type Writer = RotatingWriterGuard;

    fn make_writer(&'a self) -> Self::Writer {
        RotatingWriterGuard {
            writer: self.clone(),
        }
    }
}

pub struct RotatingWriterGuard {
    writer: RotatingFileWriter,
}

impl Write for RotatingWriterGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self
            .writer
            .state
            .lock()
            .map_err(|_| io::Error::other("Failed to acquire writer lock"))?;
        self.writer.write_locked(&mut state, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut state = self
            .writer
            .state
            .lock()
            .map_err(|_| io::Error::other("Failed to acquire writer lock"))?;
        if state.fallback_mode {
            return io::stderr().flush();
        }
        state.file.flush()
    }
}

impl Drop for RotatingWriterGuard {
    fn drop(&mut self) {
        if let Ok(mut state) = self.writer.state.lock() {
            let _ = state.file.flush();
        }
    }
}

fn rotated_path(path: &Path, index: usize) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".{index}"));
    PathBuf::from(name)
}

/// Shifts `path.N-1` to `path.N` down to `path` itself, dropping the oldest.
fn rotate_files(path: &Path, max_files: usize) -> io::Result<()> {
    let oldest = rotated_path(path, max_files);
    if oldest.exists() {
        std::fs::remove_file(&oldest)?;
    }

    for index in (1..max_files).rev() {
        let from = rotated_path(path, index);
        if from.exists() {
            std::fs::rename(&from, rotated_path(path, index + 1))?;
        }
    }

    if path.exists() {
        std::fs::rename(path, rotated_path(path, 1))?;
    }
    Ok(())
}

fn open_log_file(path: &Path, append: bool) -> io::Result<BufWriter<File>> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)?;

    Ok(BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::config::LogFormat;
    use tempfile::TempDir;

    fn file_config(dir: &TempDir, max_size: u64, max_files: usize) -> FileConfig {
        FileConfig {
            enabled: true,
            path: dir.path().join("nested").join("service.log"),
            append: false,
            format: LogFormat::Full,
            rotation: RotationConfig {
                max_size,
                max_files,
            },
        }
    }

    #[test]
    fn test_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let config = file_config(&dir, 1024, 2);

        let writer = RotatingFileWriter::new(&config).unwrap();
        let mut guard = writer.make_writer();
        guard.write_all(b"hello\n").unwrap();
        drop(guard);

        let content = std::fs::read_to_string(&config.path).unwrap();
        assert_eq!(content, "hello\n");
    }

    #[test]
    fn test_rotates_when_size_exceeded() {
        let dir = TempDir::new().unwrap();
        let config = file_config(&dir, 10, 2);
        let writer = RotatingFileWriter::new(&config).unwrap();

        for line in ["first-line\n", "second-line\n", "third-line\n"] {
            let mut guard = writer.make_writer();
            guard.write_all(line.as_bytes()).unwrap();
        }

        let current = std::fs::read_to_string(&config.path).unwrap();
        let previous = std::fs::read_to_string(rotated_path(&config.path, 1)).unwrap();
        let oldest = std::fs::read_to_string(rotated_path(&config.path, 2)).unwrap();
        assert_eq!(current, "third-line\n");
        assert_eq!(previous, "second-line\n");
        assert_eq!(oldest, "first-line\n");
    }

    #[test]
    fn test_rotation_drops_files_beyond_limit() {
        let dir = TempDir::new().unwrap();
        let config = file_config(&dir, 4, 1);
        let writer = RotatingFileWriter::new(&config).unwrap();

        for line in ["aaaa\n", "bbbb\n", "cccc\n"] {
            let mut guard = writer.make_writer();
            guard.write_all(line.as_bytes()).unwrap();
        }

        assert!(rotated_path(&config.path, 1).exists());
        assert!(!rotated_path(&config.path, 2).exists());
        let previous = std::fs::read_to_string(rotated_path(&config.path, 1)).unwrap();
        assert_eq!(previous, "bbbb\n");
    }
}
