use anyhow::Result;
use bpm::commands;
use bpm::package::PackageSpec;
use clap::Parser;
use std::path::PathBuf;

/// bpm - a minimal local package manager
///
/// Installs package sources described by a cloned package index into a
/// versioned directory tree and records them in a flat ledger.
///
/// Examples:
///   bpm refresh              # Re-clone the package index
///   bpm install foo          # Install the index's latest version of foo
///   bpm install foo 1.2.0    # Install a specific version
///   bpm locate foo bar=0.3   # Print install folders
#[derive(Parser, Debug)]
#[command(author, version = env!("BPM_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (overrides lookup; also via BPM_CONFIG)
    #[arg(
        long = "config",
        short = 'c',
        env = "BPM_CONFIG",
        value_name = "PATH",
        global = true
    )]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Re-clone the package index from the configured URL
    Refresh,

    /// Install a package from the index
    Install(PackageArgs),

    /// Remove an installed package version
    Uninstall(PackageArgs),

    /// Print the install folder of installed packages
    #[command(visible_alias = "pkgdirs")]
    Locate(LocateArgs),

    /// List installed packages
    List,
}

#[derive(clap::Args, Debug)]
pub struct PackageArgs {
    /// Package name
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Version to act on (defaults to "latest")
    #[arg(value_name = "VERSION")]
    pub version: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct LocateArgs {
    /// Packages in the format "name" or "name=version"
    #[arg(value_name = "NAME[=VERSION]", required = true)]
    pub packages: Vec<PackageSpec>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
    let runtime = bpm::runtime::RealRuntime;

    match cli.command {
        Commands::Refresh => commands::refresh(runtime, cli.config)?,
        Commands::Install(args) => {
            commands::install(runtime, &args.name, args.version.as_deref(), cli.config)?
        }
        Commands::Uninstall(args) => {
            commands::uninstall(runtime, &args.name, args.version.as_deref(), cli.config)?
        }
        Commands::Locate(args) => commands::locate(runtime, &args.packages, cli.config)?,
        Commands::List => commands::list(runtime, cli.config)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_install_parsing() {
        let cli = Cli::try_parse_from(["bpm", "install", "foo"]).unwrap();
        match cli.command {
            Commands::Install(args) => {
                assert_eq!(args.name, "foo");
                assert_eq!(args.version, None);
            }
            _ => panic!("Expected Install command"),
        }
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_install_with_version_parsing() {
        let cli = Cli::try_parse_from(["bpm", "install", "foo", "1.2.0"]).unwrap();
        match cli.command {
            Commands::Install(args) => {
                assert_eq!(args.name, "foo");
                assert_eq!(args.version.as_deref(), Some("1.2.0"));
            }
            _ => panic!("Expected Install command"),
        }
    }

    #[test]
    fn test_cli_uninstall_parsing() {
        let cli = Cli::try_parse_from(["bpm", "uninstall", "foo", "latest"]).unwrap();
        match cli.command {
            Commands::Uninstall(args) => {
                assert_eq!(args.name, "foo");
                assert_eq!(args.version.as_deref(), Some("latest"));
            }
            _ => panic!("Expected Uninstall command"),
        }
    }

    #[test]
    fn test_cli_locate_parsing() {
        let cli = Cli::try_parse_from(["bpm", "locate", "foo", "bar=0.3"]).unwrap();
        match cli.command {
            Commands::Locate(args) => {
                assert_eq!(
                    args.packages,
                    vec![
                        PackageSpec::new("foo", None),
                        PackageSpec::new("bar", Some("0.3".into()))
                    ]
                );
            }
            _ => panic!("Expected Locate command"),
        }
    }

    #[test]
    fn test_cli_pkgdirs_alias() {
        let cli = Cli::try_parse_from(["bpm", "pkgdirs", "foo"]).unwrap();
        assert!(matches!(cli.command, Commands::Locate(_)));
    }

    #[test]
    fn test_cli_locate_requires_package() {
        assert!(Cli::try_parse_from(["bpm", "locate"]).is_err());
    }

    #[test]
    fn test_cli_locate_rejects_empty_version() {
        assert!(Cli::try_parse_from(["bpm", "locate", "foo="]).is_err());
    }

    #[test]
    fn test_cli_global_config_parsing() {
        let cli =
            Cli::try_parse_from(["bpm", "list", "--config", "/etc/bpm.toml", "-v"]).unwrap();
        assert!(matches!(cli.command, Commands::List));
        assert_eq!(cli.config, Some(PathBuf::from("/etc/bpm.toml")));
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_no_subcommand_fails() {
        assert!(Cli::try_parse_from(["bpm", "foo"]).is_err());
    }
}
