use campus_core::session::DEFAULT_ACCESS_CODE;
use clap::Parser;
use std::path::PathBuf;

/// A TUI for browsing and managing campus events
#[derive(Parser, Debug)]
#[clap(version)]
pub struct Config {
    /// Where should we store data?
    #[clap(long)]
    data_dir: Option<PathBuf>,

    /// The code that unlocks the admin panel. This is a convenience gate, not
    /// a security boundary: anyone who can read your shell history has it.
    #[clap(long, default_value = DEFAULT_ACCESS_CODE)]
    pub access_code: String,

    /// Keep everything in memory and forget it on exit
    #[clap(long)]
    pub in_memory: bool,
}

impl Config {
    /// Get either the configured or a default data directory. If no data
    /// directory can be found (e.g. because `$HOME` is unset) we will use the
    /// current directory.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(|| {
                directories::ProjectDirs::from("edu", "campus", "campus-events")
                    .map(|dirs| dirs.data_local_dir().to_owned())
            })
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::parse_from(["campus"]);

        assert_eq!(config.access_code, DEFAULT_ACCESS_CODE);
        assert!(!config.in_memory);
    }

    #[test]
    fn explicit_data_dir_wins() {
        let config = Config::parse_from(["campus", "--data-dir", "/tmp/events"]);

        assert_eq!(config.data_dir(), PathBuf::from("/tmp/events"));
    }

    #[test]
    fn access_code_flag() {
        let config = Config::parse_from(["campus", "--access-code", "sesame", "--in-memory"]);

        assert_eq!(config.access_code, "sesame");
        assert!(config.in_memory);
    }
}
