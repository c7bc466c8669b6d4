//! Per-user application data locations

use std::path::{Path, PathBuf};

/// Directory name under the local app-data folder
pub const APP_DIR_NAME: &str = "Nioh3AffixEditor";

/// Files kept in the application data directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    root: PathBuf,
}

impl AppPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        AppPaths {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// `<local data dir>/Nioh3AffixEditor`, when the platform has one
    pub fn discover() -> Option<Self> {
        dirs::data_local_dir().map(|dir| AppPaths::new(dir.join(APP_DIR_NAME)))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    pub fn affix_table(&self) -> PathBuf {
        self.root.join("affix_id_table.csv")
    }

    pub fn skill_table(&self) -> PathBuf {
        self.root.join("underworld_skill_table.csv")
    }

    pub fn preset(&self) -> PathBuf {
        self.root.join("affix_preset.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        let paths = AppPaths::new("/tmp/app");
        assert_eq!(paths.root(), Path::new("/tmp/app"));
        assert!(paths.affix_table().ends_with("affix_id_table.csv"));
        assert!(paths.skill_table().ends_with("underworld_skill_table.csv"));
        assert!(paths.preset().ends_with("affix_preset.json"));
        assert!(paths.config_file().ends_with("config.toml"));
    }

    #[test]
    fn test_discover_uses_app_dir_name() {
        if let Some(paths) = AppPaths::discover() {
            assert!(paths.root().ends_with(APP_DIR_NAME));
        }
    }
}
