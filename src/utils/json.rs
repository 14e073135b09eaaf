use std::fs;
use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonFileError {
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub fn load_json<T, P>(path: P) -> Result<T, JsonFileError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| JsonFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| JsonFileError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `data` as pretty-printed JSON, replacing the file if it exists.
pub fn save_json<T, P>(data: &T, path: P) -> Result<(), JsonFileError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let serialized = serde_json::to_string_pretty(data).map_err(|source| JsonFileError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, serialized).map_err(|source| JsonFileError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::{JsonFileError, load_json, save_json};

    #[test]
    fn malformed_json_names_the_file() {
        let path = std::env::temp_dir().join(format!("verum-json-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();

        let result: Result<Vec<u32>, _> = load_json(&path);
        std::fs::remove_file(&path).unwrap();

        let error = result.unwrap_err();
        assert!(matches!(error, JsonFileError::Json { .. }));
        assert!(error.to_string().contains("verum-json-"));
    }

    #[test]
    fn save_then_load() {
        let path =
            std::env::temp_dir().join(format!("verum-json-save-{}.json", std::process::id()));
        save_json(&vec![3u32, 1, 4], &path).unwrap();

        let loaded: Vec<u32> = load_json(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, vec![3, 1, 4]);
    }
}
