//! Config file loading.

use std::path::Path;

use log::debug;

use crate::error::{NosepassError, Result};
use crate::parser;
use crate::schema::Schema;

/// File name of the config under the home directory.
pub const CONFIG_FILE_NAME: &str = ".nosepass";

/// Read the raw config file.
pub fn read_config(path: &Path) -> Result<Vec<u8>> {
    debug!("reading configuration from {}", path.display());
    std::fs::read(path).map_err(|e| {
        NosepassError::ConfigIo(format!(
            "failed to open configuration file {}: {}",
            path.display(),
            e
        ))
    })
}

/// Read the config at `path` and resolve the schema for `site`.
pub fn load_schema(path: &Path, site: &str) -> Result<Schema> {
    let config = read_config(path)?;
    parser::resolve(&config, site)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_load_schema_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp config");
        writeln!(file, "default count=8 set=a-c rounds=4").expect("write config");
        writeln!(file, "example increment=2").expect("write config");

        let schema = load_schema(file.path(), "example").expect("should load");
        assert_eq!(schema.count(), 8);
        assert_eq!(schema.alphabet().as_str(), "abc");
        assert_eq!(schema.increment(), 2);
    }

    #[test]
    fn test_missing_file_is_config_io() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let result = load_schema(&dir.path().join("missing"), "example");
        match result {
            Err(NosepassError::ConfigIo(message)) => {
                assert!(message.contains("failed to open configuration file"));
            }
            other => panic!("expected ConfigIo, got {:?}", other),
        }
    }
}
