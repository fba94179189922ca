//! CLI argument parsing module for peercheck

use crate::config::{
    EngineConfig, FileConfig, DEFAULT_FRAMEWORK_PACKAGE, DEFAULT_JOBS, DEFAULT_REGISTRY_TIMEOUT,
    DEFAULT_TARGET_MAJOR,
};
use crate::manifest::ExclusionRules;
use crate::registry::NPM_REGISTRY_URL;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::time::Duration;

/// Parse a count that must be at least 1
fn parse_positive(s: &str) -> Result<usize, String> {
    let n: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid number: {}", s))?;
    if n == 0 {
        return Err("must be at least 1".to_string());
    }
    Ok(n)
}

/// Framework compatibility checker for npm dependencies
#[derive(Parser, Debug, Clone)]
#[command(
    name = "peercheck",
    version,
    about = "Check npm dependencies against a target framework major"
)]
pub struct CliArgs {
    /// Project directory or package.json (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    // Target options
    /// Target framework major version
    #[arg(short, long, default_value_t = DEFAULT_TARGET_MAJOR)]
    pub target: u64,

    /// Framework core package whose peer range is checked
    #[arg(long)]
    pub framework: Option<String>,

    /// Include pre-release versions
    #[arg(long)]
    pub include_prerelease: bool,

    // Scan options
    /// Probe only the newest N versions of each package (0 disables)
    #[arg(long, value_name = "N")]
    pub fast: Option<usize>,

    /// Probe every candidate version instead of stopping early
    #[arg(long)]
    pub exhaustive: bool,

    /// Number of packages checked concurrently
    #[arg(short, long, default_value_t = DEFAULT_JOBS, value_parser = parse_positive)]
    pub jobs: usize,

    // Registry options
    /// Registry base URL
    #[arg(long, value_name = "URL")]
    pub registry: Option<String>,

    /// Deadline for each registry request, in seconds
    #[arg(long, value_name = "SECS", value_parser = parse_positive)]
    pub timeout: Option<usize>,

    // Package filters
    /// Exclude specific packages (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub exclude: Vec<String>,

    /// Skip devDependencies
    #[arg(long)]
    pub no_dev: bool,

    /// Config file (default: peercheck.toml next to package.json)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    // Output options
    /// Output results as CSV
    #[arg(long, conflicts_with = "json")]
    pub csv: bool,

    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - summary only, no progress bar
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl CliArgs {
    /// Framework core package, falling back to the default
    pub fn framework_package(&self) -> &str {
        self.framework
            .as_deref()
            .unwrap_or(DEFAULT_FRAMEWORK_PACKAGE)
    }

    /// Merge flags over the config file
    pub fn engine_config(&self, file: &FileConfig) -> EngineConfig {
        let registry_timeout = self
            .timeout
            .map(|secs| Duration::from_secs(secs as u64))
            .or_else(|| file.registry_timeout())
            .unwrap_or(DEFAULT_REGISTRY_TIMEOUT);

        EngineConfig {
            target_major: self.target,
            framework_package: self.framework_package().to_string(),
            fast_limit: self.fast,
            exhaustive: self.exhaustive,
            include_prerelease: self.include_prerelease,
            jobs: self.jobs,
            registry_timeout,
            heuristics: file.heuristics.clone(),
        }
    }

    /// Registry base URL: flag, then config file, then npm
    pub fn registry_url(&self, file: &FileConfig) -> String {
        self.registry
            .clone()
            .or_else(|| file.registry.url.clone())
            .unwrap_or_else(|| NPM_REGISTRY_URL.to_string())
    }

    /// Exclusion rules for the framework plus configured and CLI names
    pub fn exclusion_rules(&self, file: &FileConfig) -> ExclusionRules {
        ExclusionRules::for_framework(self.framework_package())
            .with_namespaces(file.exclusions.namespaces.clone())
            .with_exclude(self.exclude.clone())
            .with_allow(file.exclusions.allow.clone())
    }

    /// Whether the progress bar should be drawn
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.no_progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::DefaultVerdict;
    use clap::Parser;
    use std::path::Path;

    fn file_config(content: &str) -> FileConfig {
        FileConfig::parse(content, Path::new("peercheck.toml")).unwrap()
    }

    #[test]
    fn test_default_args() {
        let args = CliArgs::parse_from(["peercheck"]);
        assert_eq!(args.path, PathBuf::from("."));
        assert_eq!(args.target, 20);
        assert!(args.framework.is_none());
        assert!(args.fast.is_none());
        assert!(!args.exhaustive);
        assert!(!args.include_prerelease);
        assert_eq!(args.jobs, 8);
        assert!(args.registry.is_none());
        assert!(args.timeout.is_none());
        assert!(args.exclude.is_empty());
        assert!(!args.no_dev);
        assert!(args.config.is_none());
        assert!(!args.csv);
        assert!(!args.json);
        assert!(!args.verbose);
        assert!(!args.quiet);
        assert!(args.show_progress());
    }

    #[test]
    fn test_path_argument() {
        let args = CliArgs::parse_from(["peercheck", "/some/path/package.json"]);
        assert_eq!(args.path, PathBuf::from("/some/path/package.json"));
    }

    #[test]
    fn test_target_flags() {
        let args = CliArgs::parse_from(["peercheck", "-t", "17"]);
        assert_eq!(args.target, 17);

        let args = CliArgs::parse_from(["peercheck", "--target", "18"]);
        assert_eq!(args.target, 18);
    }

    #[test]
    fn test_jobs_must_be_positive() {
        let args = CliArgs::parse_from(["peercheck", "-j", "3"]);
        assert_eq!(args.jobs, 3);

        assert!(CliArgs::try_parse_from(["peercheck", "--jobs", "0"]).is_err());
        assert!(CliArgs::try_parse_from(["peercheck", "--jobs", "many"]).is_err());
    }

    #[test]
    fn test_timeout_must_be_positive() {
        let args = CliArgs::parse_from(["peercheck", "--timeout", "5"]);
        assert_eq!(args.timeout, Some(5));
        assert!(CliArgs::try_parse_from(["peercheck", "--timeout", "0"]).is_err());
    }

    #[test]
    fn test_csv_conflicts_with_json() {
        assert!(CliArgs::try_parse_from(["peercheck", "--csv", "--json"]).is_err());
        assert!(CliArgs::parse_from(["peercheck", "--csv"]).csv);
    }

    #[test]
    fn test_exclude_multiple() {
        let args = CliArgs::parse_from(["peercheck", "--exclude", "foo", "--exclude", "bar"]);
        assert_eq!(args.exclude, vec!["foo", "bar"]);
    }

    #[test]
    fn test_show_progress() {
        assert!(!CliArgs::parse_from(["peercheck", "-q"]).show_progress());
        assert!(!CliArgs::parse_from(["peercheck", "--no-progress"]).show_progress());
    }

    #[test]
    fn test_engine_config_defaults() {
        let args = CliArgs::parse_from(["peercheck"]);
        assert_eq!(
            args.engine_config(&FileConfig::default()),
            EngineConfig::default()
        );
    }

    #[test]
    fn test_engine_config_from_flags() {
        let args = CliArgs::parse_from([
            "peercheck",
            "-t",
            "17",
            "--framework",
            "@nestjs/core",
            "--fast",
            "5",
            "--exhaustive",
            "--include-prerelease",
            "-j",
            "2",
        ]);
        let config = args.engine_config(&FileConfig::default());
        assert_eq!(config.target_major, 17);
        assert_eq!(config.framework_package, "@nestjs/core");
        assert_eq!(config.fast_limit, Some(5));
        assert!(config.exhaustive);
        assert!(config.include_prerelease);
        assert_eq!(config.jobs, 2);
    }

    #[test]
    fn test_timeout_precedence() {
        let file = file_config("[registry]\ntimeout_secs = 12\n");

        let args = CliArgs::parse_from(["peercheck"]);
        assert_eq!(
            args.engine_config(&file).registry_timeout,
            Duration::from_secs(12)
        );

        let args = CliArgs::parse_from(["peercheck", "--timeout", "3"]);
        assert_eq!(
            args.engine_config(&file).registry_timeout,
            Duration::from_secs(3)
        );
    }

    #[test]
    fn test_heuristics_come_from_file() {
        let file = file_config("[heuristics]\ndefault = \"assume_incompatible\"\n");
        let args = CliArgs::parse_from(["peercheck"]);
        assert_eq!(
            args.engine_config(&file).heuristics.default_verdict,
            DefaultVerdict::AssumeIncompatible
        );
    }

    #[test]
    fn test_registry_url_precedence() {
        let file = file_config("[registry]\nurl = \"https://npm.internal\"\n");

        let args = CliArgs::parse_from(["peercheck"]);
        assert_eq!(args.registry_url(&FileConfig::default()), NPM_REGISTRY_URL);
        assert_eq!(args.registry_url(&file), "https://npm.internal");

        let args = CliArgs::parse_from(["peercheck", "--registry", "http://localhost:4873"]);
        assert_eq!(args.registry_url(&file), "http://localhost:4873");
    }

    #[test]
    fn test_exclusion_rules() {
        let file = file_config(
            "[exclusions]\nnamespaces = [\"@internal/\"]\nallow = [\"@angular/cdk\"]\n",
        );
        let args = CliArgs::parse_from(["peercheck", "--exclude", "zone.js"]);
        let rules = args.exclusion_rules(&file);

        assert!(!rules.should_process_package("@angular/core"));
        assert!(!rules.should_process_package("@angular/router"));
        assert!(rules.should_process_package("@angular/cdk"));
        assert!(!rules.should_process_package("@internal/tools"));
        assert!(!rules.should_process_package("zone.js"));
        assert!(rules.should_process_package("rxjs"));
    }
}
