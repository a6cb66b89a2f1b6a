use clap::Parser;
use std::path::PathBuf;

struct DefaultArgs;

impl DefaultArgs {
    pub const DIR: &'static str = ".";
}

/// Concurrent directory size aggregator.
#[derive(Clone, Parser)]
#[command(name = "dirsizer")]
#[command(about = "Sum the sizes of all files under a directory using a pool of workers.")]
pub struct Cli {
    /// Directory to size. Default: current directory.
    #[arg(value_name = "DIR", default_value = DefaultArgs::DIR)]
    pub dir: PathBuf,

    /// Directory worker count. Default: derived from available threads and the FD limit.
    #[arg(long, short = 'w', value_parser = clap::value_parser!(usize))]
    pub workers: Option<usize>,

    /// Capacity of the file channel between directory workers and the aggregator.
    #[arg(long, value_parser = clap::value_parser!(usize))]
    pub channel_cap: Option<usize>,

    /// Give up after this many seconds.
    #[arg(long, short = 't', value_parser = clap::value_parser!(u64))]
    pub timeout: Option<u64>,

    /// Follow symbolic links.
    #[arg(long, short = 'f', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub follow_links: Option<bool>,

    /// Exclude patterns (glob syntax). Can specify multiple: -e pattern1 pattern2 pattern3
    #[arg(long, short = 'e', num_args = 1..)]
    pub exclude: Vec<String>,

    /// Print only the total byte count.
    #[arg(long, short = 'b')]
    pub bytes: bool,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// Config file. Default: `.dirsizer.toml` in DIR.
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["dirsizer"]);
        assert_eq!(cli.dir, PathBuf::from("."));
        assert!(cli.workers.is_none());
        assert!(cli.follow_links.is_none());
        assert!(!cli.bytes);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "dirsizer", "/data", "-w", "8", "-t", "5", "-f", "-b", "-e", "*.log", "target",
        ]);
        assert_eq!(cli.dir, PathBuf::from("/data"));
        assert_eq!(cli.workers, Some(8));
        assert_eq!(cli.timeout, Some(5));
        assert_eq!(cli.follow_links, Some(true));
        assert!(cli.bytes);
        assert_eq!(cli.exclude, vec!["*.log", "target"]);
    }

    #[test]
    fn test_explicit_false() {
        let cli = Cli::parse_from(["dirsizer", "--follow-links", "false"]);
        assert_eq!(cli.follow_links, Some(false));
    }
}
