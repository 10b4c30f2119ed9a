use std::{
    fs::File,
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;

/// Destination for JSON output: standard output or a file.
#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    /// Writes `value` as pretty JSON to `output_path`.
    ///
    /// # Arguments
    ///
    /// * `value` - Value to serialize
    /// * `output_path` - Target file; `None` or `-` selects standard output
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be created or the value cannot be written
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        output.write_json(value)
    }

    /// Opens the destination named by `output_path`, where `-` means stdout.
    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) if path.as_os_str() != "-" => Output::open(path),
            _ => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_owned(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self)
            .with_context(|| format!("Failed to write newline to {}", self.display_path()))?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

/// Reads and deserializes a JSON file.
///
/// # Arguments
///
/// * `file_kind` - What the file holds (`config`, `report`), used in error messages
/// * `path` - Path to the JSON file
///
/// # Returns
///
/// The deserialized value
///
/// # Errors
///
/// Returns error if the file cannot be opened or parsed
pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {file_kind} file: {}", path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse {file_kind} JSON file: {}", path.display()))?;

    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::{env, fs, process};

    use oxisnake_training::genetic::GeneticAlgorithmParams;

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("oxisnake-{}-{name}", process::id()))
    }

    #[test]
    fn test_save_and_read_json() {
        let path = temp_path("params.json");
        let params = GeneticAlgorithmParams {
            population_size: 12,
            ..GeneticAlgorithmParams::default()
        };
        Output::save_json(&params, Some(path.clone())).unwrap();
        let read: GeneticAlgorithmParams = read_json_file("config", &path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(read, params);
    }

    #[test]
    fn test_dash_selects_stdout() {
        let output = Output::from_output_path(Some(PathBuf::from("-"))).unwrap();
        assert_eq!(output.display_path(), "stdout");
        drop(output);
        let output = Output::from_output_path(None).unwrap();
        assert!(matches!(output, Output::Stdout { .. }));
    }

    #[test]
    fn test_read_missing_file_names_kind() {
        let path = temp_path("missing.json");
        let err = read_json_file::<GeneticAlgorithmParams, _>("config", &path).unwrap_err();
        assert!(err.to_string().contains("Failed to open config file"));
    }

    #[test]
    fn test_read_invalid_json() {
        let path = temp_path("invalid.json");
        fs::write(&path, "{ not json").unwrap();
        let err = read_json_file::<GeneticAlgorithmParams, _>("config", &path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(err.to_string().contains("Failed to parse config JSON file"));
    }
}
