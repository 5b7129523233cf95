//! Properties file loading

use crate::{ArgumentError, Result, DEFAULT_PROPERTIES_FILE};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::info;

/// `<directory of the executable>/../etc/kmc_sdls_test_app.properties`
pub fn default_properties_path() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    exe_dir.join("..").join("etc").join(DEFAULT_PROPERTIES_FILE)
}

/// Configuration lines: trailing whitespace trimmed, blanks and `#` comments
/// dropped, order kept.
pub fn parse_properties(reader: impl BufRead) -> std::io::Result<Vec<String>> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim_end();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        lines.push(line.to_string());
    }
    Ok(lines)
}

/// Read all configuration lines from a properties file
pub fn load_properties(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    info!("Loading properties from {:?}", path);

    let to_err = |source| ArgumentError::Properties {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(to_err)?;
    let lines = parse_properties(BufReader::new(file)).map_err(to_err)?;

    info!("Loaded {} configuration lines", lines.len());
    Ok(lines)
}
