//! Batch-wide ingest options.

use serde::{Deserialize, Serialize};

use super::BatchError;

/// Flags fixed for a whole batch, built once per invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestOptions {
    /// Add torrents in paused state.
    pub pause: bool,
    /// Skip hash checking when adding.
    pub skip_checking: bool,
    /// Enable sequential download (backends without support ignore it).
    pub sequential_download: bool,
    /// Fixed category (may be empty).
    pub category: String,
    /// Derive the category from the resolved site.
    pub category_auto: bool,
    /// Fixed save path (empty = client default).
    pub save_path: String,
    /// Fixed tags, appended after the derived ones.
    pub tags: Vec<String>,
    /// Site used when none can be derived from the input.
    pub default_site: String,
    /// Rename added local files with the `.added` suffix.
    pub rename_added: bool,
    /// Delete added local files.
    pub delete_added: bool,
    /// Name the single added torrent this way in the client.
    pub rename_to: String,
}

/// Where the batch items come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestMode {
    /// Site ids and site URLs.
    Remote,
    /// Local files, stdin and plain torrent URLs.
    Local,
}

/// Named option presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Remote ingest with auto-category.
    Add2,
    /// Local ingest of `*.torrent` with auto-category, deleting added files.
    AddLocal2,
}

impl Profile {
    pub fn mode(&self) -> IngestMode {
        match self {
            Profile::Add2 => IngestMode::Remote,
            Profile::AddLocal2 => IngestMode::Local,
        }
    }

    /// Inputs used when the profile is invoked without any.
    pub fn default_inputs(&self) -> &'static [&'static str] {
        match self {
            Profile::Add2 => &[],
            Profile::AddLocal2 => &["*.torrent"],
        }
    }

    pub fn apply(&self, options: &mut IngestOptions) {
        options.category_auto = true;
        if let Profile::AddLocal2 = self {
            options.delete_added = true;
        }
    }
}

impl IngestOptions {
    /// Return these options with a profile applied.
    pub fn with_profile(mut self, profile: Profile) -> Self {
        profile.apply(&mut self);
        self
    }

    /// Parse a comma-separated tag list, dropping empty entries.
    pub fn parse_tags(value: &str) -> Vec<String> {
        value
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Reject mutually exclusive options before any item is processed.
    pub fn validate(&self, mode: IngestMode, item_count: usize) -> Result<(), BatchError> {
        if self.rename_added && self.delete_added {
            return Err(BatchError::ConfigConflict(
                "--rename-added and --delete-added flags are NOT compatible".to_string(),
            ));
        }
        if !self.rename_to.is_empty() {
            if mode != IngestMode::Local {
                return Err(BatchError::ConfigConflict(
                    "--rename can only be used with local torrents".to_string(),
                ));
            }
            if item_count > 1 {
                return Err(BatchError::ConfigConflict(
                    "--rename flag can only be used with exact one torrent file arg".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags() {
        assert_eq!(IngestOptions::parse_tags("x,y"), vec!["x", "y"]);
        assert_eq!(IngestOptions::parse_tags(" x , ,y,"), vec!["x", "y"]);
        assert!(IngestOptions::parse_tags("").is_empty());
    }

    #[test]
    fn test_rename_and_delete_conflict() {
        let options = IngestOptions {
            rename_added: true,
            delete_added: true,
            ..Default::default()
        };
        assert!(matches!(
            options.validate(IngestMode::Local, 1),
            Err(BatchError::ConfigConflict(_))
        ));
    }

    #[test]
    fn test_rename_to_requires_single_local_item() {
        let options = IngestOptions {
            rename_to: "New Name".to_string(),
            ..Default::default()
        };
        assert!(options.validate(IngestMode::Local, 1).is_ok());
        assert!(options.validate(IngestMode::Local, 2).is_err());
        assert!(options.validate(IngestMode::Remote, 1).is_err());
    }

    #[test]
    fn test_profiles() {
        let add2 = IngestOptions::default().with_profile(Profile::Add2);
        assert!(add2.category_auto);
        assert!(!add2.delete_added);
        assert_eq!(Profile::Add2.mode(), IngestMode::Remote);

        let local2 = IngestOptions {
            category: "Z".to_string(),
            ..Default::default()
        }
        .with_profile(Profile::AddLocal2);
        assert!(local2.category_auto);
        assert!(local2.delete_added);
        assert_eq!(local2.category, "Z");
        assert_eq!(Profile::AddLocal2.default_inputs(), &["*.torrent"]);
    }

    #[test]
    fn test_profile_can_conflict_with_rename_added() {
        let options = IngestOptions {
            rename_added: true,
            ..Default::default()
        }
        .with_profile(Profile::AddLocal2);
        assert!(options.validate(IngestMode::Local, 3).is_err());
    }
}
