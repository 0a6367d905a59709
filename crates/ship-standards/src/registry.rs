//! Profile lookup by name or path.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::embedded::{builtin_names, builtin_source};
use crate::error::{ProfileError, Result};
use crate::profile::Profile;

/// Environment variable naming a directory of extra `<name>.toml` profiles.
pub const PROFILE_DIR_ENV_VAR: &str = "SHIP_PROFILE_DIR";

/// Where a profile comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileSource {
    Builtin,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileEntry {
    pub name: String,
    pub source: ProfileSource,
}

/// Directory named by `SHIP_PROFILE_DIR`, if set.
pub fn profile_dir() -> Option<PathBuf> {
    std::env::var_os(PROFILE_DIR_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Resolve a profile using `SHIP_PROFILE_DIR` for extra profiles.
pub fn load_profile(name_or_path: &str) -> Result<Profile> {
    load_profile_from(name_or_path, profile_dir().as_deref())
}

/// Resolve a profile.
///
/// Resolution order:
/// 1. an explicit path (anything ending in `.toml` or containing a separator)
/// 2. `<dir>/<name>.toml` when `dir` is given
/// 3. a built-in profile
pub fn load_profile_from(name_or_path: &str, dir: Option<&Path>) -> Result<Profile> {
    let as_path = Path::new(name_or_path);
    if name_or_path.ends_with(".toml") || as_path.components().count() > 1 {
        return load_profile_file(as_path);
    }
    if let Some(dir) = dir {
        let candidate = dir.join(format!("{name_or_path}.toml"));
        if candidate.is_file() {
            return load_profile_file(&candidate);
        }
    }
    if let Some(source) = builtin_source(name_or_path) {
        debug!(profile = name_or_path, "using built-in profile");
        return Profile::from_toml_str(source, name_or_path);
    }
    let available = list_profiles(dir)
        .unwrap_or_default()
        .into_iter()
        .map(|entry| entry.name)
        .collect();
    Err(ProfileError::UnknownProfile {
        name: name_or_path.to_string(),
        available,
    })
}

pub fn load_profile_file(path: &Path) -> Result<Profile> {
    let text = fs::read_to_string(path).map_err(|source| ProfileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "loading profile file");
    Profile::from_toml_str(&text, &path.display().to_string())
}

/// Built-in profiles followed by the `.toml` files in `dir`, sorted by name.
pub fn list_profiles(dir: Option<&Path>) -> Result<Vec<ProfileEntry>> {
    let mut entries: Vec<ProfileEntry> = builtin_names()
        .map(|name| ProfileEntry {
            name: name.to_string(),
            source: ProfileSource::Builtin,
        })
        .collect();
    let Some(dir) = dir else {
        return Ok(entries);
    };
    let read_dir = fs::read_dir(dir).map_err(|source| ProfileError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut files = Vec::new();
    for entry in read_dir {
        let path = entry
            .map_err(|source| ProfileError::Io {
                path: dir.to_path_buf(),
                source,
            })?
            .path();
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str())
            && is_toml
        {
            files.push(ProfileEntry {
                name: stem.to_string(),
                source: ProfileSource::File(path.clone()),
            });
        }
    }
    files.sort_by(|a, b| a.name.cmp(&b.name));
    entries.extend(files);
    Ok(entries)
}
