// src/config.rs

use crate::error::ProfileError;
use crate::game::search::SearchConfig;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const PROFILES_DIR: &str = "profiles";

fn profile_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.json", name))
}

/// Writes `config` to `<dir>/<name>.json`, creating `dir` if needed.
pub fn save_profile(dir: &Path, name: &str, config: &SearchConfig) -> Result<(), ProfileError> {
    fs::create_dir_all(dir)?;
    let json = serde_json::to_string_pretty(config)?;
    fs::File::create(profile_path(dir, name))?.write_all(json.as_bytes())?;
    Ok(())
}

/// Loads a profile. Missing fields take their defaults; the result is
/// validated before it is returned.
pub fn load_profile(dir: &Path, name: &str) -> Result<SearchConfig, ProfileError> {
    let json = fs::read_to_string(profile_path(dir, name))?;
    let config: SearchConfig = serde_json::from_str(&json)?;
    config.validate().map_err(|source| ProfileError::Invalid {
        name: name.to_string(),
        source,
    })?;
    Ok(config)
}

/// Names of the `.json` profiles in `dir`, sorted.
pub fn get_profiles(dir: &Path) -> Result<Vec<String>, ProfileError> {
    let mut profiles = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        if let Some(name) = path.file_stem().and_then(|s| s.to_str()) {
            profiles.push(name.to_string());
        }
    }
    profiles.sort();
    Ok(profiles)
}
