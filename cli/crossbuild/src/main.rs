//! crossbuild: compile one source file for every OS/architecture pair in a
//! build style, one external compiler run per pair.

mod commands;
mod config;
mod source;

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use crossbuild_matrix::{resolve, Selector};
use tracing::debug;

use config::{CrossbuildConfig, Overrides, Settings};

const STYLE_HELP: &str = "\
Styles:
  all     every operating system
  pc      windows, linux, darwin
  unix    aix, freebsd, illumos, netbsd, openbsd, plan9, solaris
  mobile  android, ios
  web     js, wasip1
  p2p     dragonfly

Unknown styles fall back to pc; unknown operating systems are ignored.
Defaults can be set in a crossbuild.toml [build] section.";

#[derive(Debug, Parser)]
#[command(
    name = "crossbuild",
    version,
    about = "Cross-compile a source file for a matrix of operating systems and architectures",
    after_help = STYLE_HELP
)]
struct Cli {
    /// Source file to build (default: the only .go file in the current directory)
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    file: Option<PathBuf>,
    /// Build style: all, pc, unix, mobile, web, p2p [default: pc]
    #[arg(short = 's', long, value_name = "STYLE")]
    style: Option<String>,
    /// Build only this operating system, whatever the style
    #[arg(short = 'o', long = "os", value_name = "OS")]
    os: Option<String>,
    /// Version tag, used as the output directory [default: 1.0]
    #[arg(short = 'v', long = "tag", value_name = "VERSION")]
    tag: Option<String>,
    /// Compiler program to invoke [default: go]
    #[arg(short = 'c', long, value_name = "CMD")]
    compiler: Option<String>,
    /// Kill a target's compiler after this many seconds (0: no limit)
    #[arg(short = 't', long, value_name = "SECS")]
    timeout: Option<u64>,
    /// Print the resolved build matrix and exit without building
    #[arg(short = 'l', long)]
    list: bool,
    /// With --list, print JSON
    #[arg(long, requires = "list")]
    json: bool,
    /// Only log errors
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    quiet: bool,
    /// Log debug detail, including every compiler invocation
    #[arg(long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            compiler: self.compiler.clone(),
            style: self.style.clone(),
            version: self.tag.clone(),
            timeout: self.timeout,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    init_tracing(cli.quiet, cli.verbose)?;
    let cwd = std::env::current_dir()?;
    execute(&cwd, &cli)
}

/// Everything after process setup, rooted at `work_dir`.
fn execute(work_dir: &Path, cli: &Cli) -> anyhow::Result<()> {
    let file_config = match CrossbuildConfig::find_and_load(work_dir)? {
        Some((config, dir)) => {
            debug!(dir = %dir.display(), "loaded {}", config::CONFIG_FILE);
            Some(config)
        }
        None => None,
    };
    let settings = Settings::resolve(&cli.overrides(), file_config.as_ref());

    let selector = Selector::normalize(&settings.style, cli.os.as_deref().unwrap_or(""));
    let pairs = resolve(&selector);
    debug!(?selector, targets = pairs.len(), "resolved build matrix");

    if cli.list {
        return commands::list::run(&selector, &pairs, cli.json);
    }

    let source = source::locate(work_dir, cli.file.as_deref())?;
    commands::build::run(work_dir, &source, &settings, &pairs)
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("CROSSBUILD_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

#[cfg(test)]
mod cli_tests {
    use clap::CommandFactory;

    use super::*;
    use crossbuild_matrix::Style;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("crossbuild").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn short_flags() {
        let cli = parse(&["-f", "app.go", "-s", "unix", "-o", "linux", "-v", "2.0"]);
        assert_eq!(cli.file.as_deref(), Some(Path::new("app.go")));
        assert_eq!(cli.style.as_deref(), Some("unix"));
        assert_eq!(cli.os.as_deref(), Some("linux"));
        assert_eq!(cli.tag.as_deref(), Some("2.0"));
    }

    #[test]
    fn no_flags_leaves_defaults_to_settings() {
        let cli = parse(&[]);
        let settings = Settings::resolve(&cli.overrides(), None);
        assert_eq!(settings.style, "pc");
        assert_eq!(settings.version, "1.0");
        assert!(!cli.list);
    }

    #[test]
    fn help_is_not_an_error_exit() {
        let err = Cli::try_parse_from(["crossbuild", "-h"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        assert_eq!(err.exit_code(), 0);
    }

    #[test]
    fn json_requires_list() {
        assert!(Cli::try_parse_from(["crossbuild", "--json"]).is_err());
        assert!(parse(&["--list", "--json"]).json);
    }

    #[test]
    fn bogus_style_is_accepted() {
        let cli = parse(&["-s", "bogus"]);
        let settings = Settings::resolve(&cli.overrides(), None);
        assert_eq!(Selector::normalize(&settings.style, "").style, Style::Pc);
    }

    #[test]
    fn style_help_describes_every_style() {
        for style in Style::ALL {
            let line = format!("{:<7} {}", style.as_str(), style.description());
            assert!(STYLE_HELP.contains(&line), "missing: {line}");
        }
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("crossbuild").chain(args.iter().copied())).unwrap()
    }

    /// A project directory with one source file and a fake compiler.
    ///
    /// Run with `-c sh`: `sh build -o OUT SRC` executes ./build as a script,
    /// which fails for `fail_arch` and otherwise writes the target to OUT.
    fn project(fail_arch: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.go"), "package main\n").unwrap();
        std::fs::write(
            dir.path().join("build"),
            format!(
                "if [ \"$GOARCH\" = \"{fail_arch}\" ]; then echo unsupported >&2; exit 1; fi\n\
                 echo \"$GOOS/$GOARCH\" > \"$2\"\n"
            ),
        )
        .unwrap();
        dir
    }

    #[cfg(unix)]
    #[test]
    fn builds_explicit_os() {
        let dir = project("none");
        execute(dir.path(), &cli(&["-c", "sh", "-o", "darwin", "-v", "2.0"])).unwrap();

        let out = dir.path().join("2.0");
        let amd64 = std::fs::read_to_string(out.join("app_darwin_amd64")).unwrap();
        assert_eq!(amd64.trim(), "darwin/amd64");
        assert!(out.join("app_darwin_arm64").is_file());
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn windows_outputs_get_exe() {
        let dir = project("none");
        execute(dir.path(), &cli(&["-c", "sh", "-o", "WINDOWS"])).unwrap();
        for arch in ["386", "amd64", "arm", "arm64"] {
            assert!(
                dir.path()
                    .join(format!("1.0/app_windows_{arch}.exe"))
                    .is_file(),
                "{arch}"
            );
        }
    }

    #[cfg(unix)]
    #[test]
    fn failed_pairs_do_not_fail_the_run() {
        let dir = project("arm");
        execute(dir.path(), &cli(&["-c", "sh", "-s", "unix"])).unwrap();

        let out = dir.path().join("1.0");
        assert!(out.join("app_freebsd_amd64").is_file());
        assert!(!out.join("app_freebsd_arm").exists());
        assert!(out.join("app_solaris_amd64").is_file());
        assert!(!out.join("app_openbsd_arm").exists());
        assert!(out.join("app_openbsd_arm64").is_file());
    }

    #[cfg(unix)]
    #[test]
    fn huge_timeout_still_builds() {
        let dir = project("none");
        let max = u64::MAX.to_string();
        execute(dir.path(), &cli(&["-c", "sh", "-o", "ios", "-t", &max])).unwrap();
        assert!(dir.path().join("1.0/app_ios_arm64").is_file());
    }

    #[cfg(unix)]
    #[test]
    fn config_file_supplies_defaults() {
        let dir = project("none");
        std::fs::write(
            dir.path().join(config::CONFIG_FILE),
            "[build]\ncompiler = \"sh\"\nstyle = \"web\"\nversion = \"0.9\"\n",
        )
        .unwrap();
        execute(dir.path(), &cli(&[])).unwrap();
        assert!(dir.path().join("0.9/app_js_wasm").is_file());
        assert!(dir.path().join("0.9/app_wasip1_wasm").is_file());
    }

    #[test]
    fn list_needs_no_source() {
        let dir = tempfile::tempdir().unwrap();
        execute(dir.path(), &cli(&["--list", "-s", "all"])).unwrap();
        execute(dir.path(), &cli(&["-l", "--json", "-o", "ios"])).unwrap();
        assert!(!dir.path().join("1.0").exists());
    }

    #[test]
    fn missing_source_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = execute(dir.path(), &cli(&["-c", "sh"])).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<source::SourceError>(),
            Some(source::SourceError::NoCandidates { .. })
        ));
        assert!(!dir.path().join("1.0").exists());
    }

    #[test]
    fn ambiguous_source_is_fatal() {
        let dir = project("none");
        std::fs::write(dir.path().join("other.go"), "package main\n").unwrap();
        let err = execute(dir.path(), &cli(&["-c", "sh"])).unwrap_err();
        assert!(err.to_string().contains("other.go"));
    }

    #[test]
    fn malformed_config_is_fatal() {
        let dir = project("none");
        std::fs::write(dir.path().join(config::CONFIG_FILE), "[build\n").unwrap();
        let err = execute(dir.path(), &cli(&["-c", "sh"])).unwrap_err();
        assert!(format!("{err:#}").contains(config::CONFIG_FILE));
    }
}
