//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

use ptingest_core::config::DEFAULT_CONFIG_FILE;
use ptingest_core::{IngestOptions, Profile};

/// Add torrents from tracker sites or local files to a download client.
#[derive(Parser, Debug)]
#[command(name = "ptingest")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file
    #[arg(long, env = "PTINGEST_CONFIG", default_value = DEFAULT_CONFIG_FILE, global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add site torrents to client by id (`site.id`) or URL
    #[command(name = "add")]
    Add(AddArgs),

    /// Same as `add --add-category-auto`
    #[command(name = "add2")]
    Add2(AddArgs),

    /// Add local .torrent files (or `-` for stdin) to client
    #[command(name = "addlocal")]
    AddLocal(AddLocalArgs),

    /// Same as `addlocal --add-category-auto --delete-added`, defaulting to `*.torrent`
    #[command(name = "addlocal2")]
    AddLocal2(AddLocalArgs),

    /// Set category of torrents in client
    #[command(name = "setcategory")]
    SetCategory(SetCategoryArgs),
}

/// Flags shared by every add command.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct AddFlags {
    /// Skip hash checking when adding torrents
    #[arg(long)]
    pub skip_check: bool,

    /// Add torrents to client in paused state
    #[arg(long)]
    pub add_paused: bool,

    /// Automatically set category of added torrents to their site name
    #[arg(long)]
    pub add_category_auto: bool,

    /// Enable sequential download (qBittorrent only)
    #[arg(long)]
    pub sequential_download: bool,

    /// Set category of added torrents
    #[arg(long, default_value = "")]
    pub add_category: String,

    /// Set save path of added torrents
    #[arg(long, default_value = "")]
    pub add_save_path: String,

    /// Set default site of torrents
    #[arg(long, default_value = "")]
    pub site: String,

    /// Add tags to added torrents (comma-separated)
    #[arg(long, default_value = "")]
    pub add_tags: String,
}

impl AddFlags {
    pub fn to_options(&self) -> IngestOptions {
        IngestOptions {
            pause: self.add_paused,
            skip_checking: self.skip_check,
            sequential_download: self.sequential_download,
            category: self.add_category.clone(),
            category_auto: self.add_category_auto,
            save_path: self.add_save_path.clone(),
            tags: IngestOptions::parse_tags(&self.add_tags),
            default_site: self.site.clone(),
            ..Default::default()
        }
    }
}

#[derive(ClapArgs, Debug)]
pub struct AddArgs {
    /// Name of the configured download client
    pub client: String,

    /// Torrent ids (`site.id` or bare id with --site) or site URLs
    #[arg(required = true)]
    pub ids: Vec<String>,

    #[command(flatten)]
    pub flags: AddFlags,
}

#[derive(ClapArgs, Debug)]
pub struct AddLocalArgs {
    /// Name of the configured download client
    pub client: String,

    /// Torrent files (wildcards allowed), `-` for stdin, or torrent URLs
    pub files: Vec<String>,

    #[command(flatten)]
    pub flags: AddFlags,

    /// Rename successfully added files with a `.added` suffix
    #[arg(long)]
    pub rename_added: bool,

    /// Delete successfully added files
    #[arg(long)]
    pub delete_added: bool,

    /// Rename the added torrent in client (single file only)
    #[arg(long, default_value = "")]
    pub rename: String,
}

impl AddLocalArgs {
    pub fn to_options(&self) -> IngestOptions {
        IngestOptions {
            rename_added: self.rename_added,
            delete_added: self.delete_added,
            rename_to: self.rename.clone(),
            ..self.flags.to_options()
        }
    }

    /// Inputs to expand, falling back to the profile's defaults.
    pub fn inputs(&self, profile: Option<Profile>) -> Vec<String> {
        if self.files.is_empty() {
            if let Some(profile) = profile {
                return profile
                    .default_inputs()
                    .iter()
                    .map(|s| s.to_string())
                    .collect();
            }
        }
        self.files.clone()
    }
}

#[derive(ClapArgs, Debug)]
pub struct SetCategoryArgs {
    /// Name of the configured download client
    pub client: String,

    /// Category to set (empty string removes it)
    pub category: String,

    /// Info hashes, or state filters: _all, _active, _done, _completed,
    /// _downloading, _seeding, _paused, _error
    #[arg(required = true)]
    pub targets: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_add_parses_ids_and_flags() {
        let args = Args::try_parse_from([
            "ptingest",
            "add",
            "local",
            "alpha.1",
            "https://beta.example/details.php?id=2",
            "--add-category",
            "Z",
            "--add-tags",
            "x,y",
            "--add-paused",
            "--site",
            "beta",
        ])
        .unwrap();

        let Command::Add(add) = args.command else {
            panic!("expected add");
        };
        assert_eq!(add.client, "local");
        assert_eq!(add.ids.len(), 2);

        let options = add.flags.to_options();
        assert_eq!(options.category, "Z");
        assert_eq!(options.tags, vec!["x", "y"]);
        assert!(options.pause);
        assert!(!options.category_auto);
        assert_eq!(options.default_site, "beta");
    }

    #[test]
    fn test_cli_add_requires_ids() {
        let result = Args::try_parse_from(["ptingest", "add", "local"]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_cli_addlocal_flags() {
        let args = Args::try_parse_from([
            "ptingest",
            "addlocal",
            "local",
            "a.torrent",
            "--rename-added",
            "--rename",
            "New Name",
            "--skip-check",
            "--sequential-download",
        ])
        .unwrap();

        let Command::AddLocal(local) = args.command else {
            panic!("expected addlocal");
        };
        let options = local.to_options();
        assert!(options.rename_added);
        assert!(!options.delete_added);
        assert_eq!(options.rename_to, "New Name");
        assert!(options.skip_checking);
        assert!(options.sequential_download);
    }

    #[test]
    fn test_cli_addlocal2_defaults_to_wildcard() {
        let args = Args::try_parse_from(["ptingest", "addlocal2", "local"]).unwrap();
        let Command::AddLocal2(local) = args.command else {
            panic!("expected addlocal2");
        };
        assert_eq!(local.inputs(Some(Profile::AddLocal2)), vec!["*.torrent"]);
        assert!(local.inputs(None).is_empty());
    }

    #[test]
    fn test_cli_setcategory() {
        let args =
            Args::try_parse_from(["ptingest", "setcategory", "local", "tv", "_seeding", "abc"])
                .unwrap();
        let Command::SetCategory(set) = args.command else {
            panic!("expected setcategory");
        };
        assert_eq!(set.category, "tv");
        assert_eq!(set.targets, vec!["_seeding", "abc"]);
    }

    #[test]
    fn test_cli_global_flags() {
        let args = Args::try_parse_from([
            "ptingest",
            "-vv",
            "--config",
            "/etc/ptingest.toml",
            "add",
            "local",
            "1",
        ])
        .unwrap();
        assert_eq!(args.verbose, 2);
        assert_eq!(args.config, PathBuf::from("/etc/ptingest.toml"));
    }

    #[test]
    fn test_cli_unknown_command() {
        let result = Args::try_parse_from(["ptingest", "remove", "local"]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::InvalidSubcommand
        );
    }
}
