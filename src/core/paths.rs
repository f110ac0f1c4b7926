use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Base caretaker config directory (~/.config/caretaker/ on Unix-likes)
pub fn caretaker() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected("APPDATA environment variable not set on Windows")
        })?;
        Ok(PathBuf::from(appdata).join("caretaker"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected("HOME environment variable not set on Unix-like system")
        })?;
        Ok(PathBuf::from(home).join(".config").join("caretaker"))
    }
}

/// Projects directory (one JSON file per project)
pub fn projects() -> Result<PathBuf> {
    Ok(caretaker()?.join("projects"))
}

/// Site alias registry file
pub fn aliases() -> Result<PathBuf> {
    Ok(caretaker()?.join("aliases.json"))
}
