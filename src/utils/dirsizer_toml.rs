//! Load `.dirsizer.toml` (CLI only). Lib callers pass [`SizerOpts`](crate::SizerOpts) directly.

use serde::Deserialize;
use std::path::Path;

use crate::Opts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DirsizerToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsSection {
    workers: Option<usize>,
    channel_cap: Option<usize>,
    follow_links: Option<bool>,
    exclude: Option<Vec<String>>,
    timeout: Option<u64>,
    verbose: Option<bool>,
}

/// Load the config at `path`, or `.dirsizer.toml` in `dir` when `path` is None.
/// Returns None if the file is missing or unreadable; a malformed file is logged and ignored.
pub(crate) fn load_dirsizer_toml(dir: &Path, path: Option<&Path>) -> Option<DirsizerToml> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => dir.join(PackagePaths::get().config_filename()),
    };
    let s = std::fs::read_to_string(&path).ok()?;
    parse_dirsizer_toml(&s)
        .map_err(|e| log::warn!("{}: {}", path.display(), e))
        .ok()
}

pub(crate) fn parse_dirsizer_toml(s: &str) -> Result<DirsizerToml, toml::de::Error> {
    toml::from_str(s)
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($section:expr, $opts:expr, $file_field:ident => $opts_field:ident) => {
        if let Some(v) = $section.$file_field {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before applying CLI flags.
pub(crate) fn apply_file_to_opts(file: &DirsizerToml, opts: &mut Opts) {
    let section = &file.settings;
    if section.workers.is_some() {
        opts.workers = section.workers;
    }
    if section.channel_cap.is_some() {
        opts.channel_cap = section.channel_cap;
    }
    if section.timeout.is_some() {
        opts.timeout_secs = section.timeout;
    }
    apply_file_opt!(section, opts, follow_links => follow_links);
    apply_file_opt!(section, opts, verbose => verbose);
    if let Some(ref v) = section.exclude {
        opts.exclude = v.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_full_settings() {
        let file = parse_dirsizer_toml(
            r#"
            [settings]
            workers = 3
            channel_cap = 16
            follow_links = true
            exclude = ["node_modules", "*.log"]
            timeout = 30
            verbose = true
            "#,
        )
        .unwrap();
        let mut opts = Opts::default();
        apply_file_to_opts(&file, &mut opts);
        assert_eq!(opts.workers, Some(3));
        assert_eq!(opts.channel_cap, Some(16));
        assert!(opts.follow_links);
        assert_eq!(opts.exclude, vec!["node_modules", "*.log"]);
        assert_eq!(opts.timeout_secs, Some(30));
        assert!(opts.verbose);
    }

    #[test]
    fn test_missing_fields_leave_opts_alone() {
        let file = parse_dirsizer_toml("[settings]\nworkers = 2\n").unwrap();
        let mut opts = Opts {
            follow_links: true,
            exclude: vec!["target".to_string()],
            ..Opts::default()
        };
        apply_file_to_opts(&file, &mut opts);
        assert_eq!(opts.workers, Some(2));
        assert!(opts.follow_links);
        assert_eq!(opts.exclude, vec!["target"]);
    }

    #[test]
    fn test_empty_file_is_valid() {
        let file = parse_dirsizer_toml("").unwrap();
        let mut opts = Opts::default();
        apply_file_to_opts(&file, &mut opts);
        assert!(opts.workers.is_none());
    }

    #[test]
    fn test_bad_type_is_error() {
        assert!(parse_dirsizer_toml("[settings]\nworkers = \"many\"\n").is_err());
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let dir = std::env::temp_dir().join("dirsizer-no-such-dir-for-config");
        assert!(load_dirsizer_toml(&dir, None).is_none());
    }
}
