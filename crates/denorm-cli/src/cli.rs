use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "denorm",
    about = "Rebuild nested objects from a normalized record store",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format for `types`; `build` always prints JSON
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build objects of one type and print them as JSON, whatever `--format` says
    Build(BuildArgs),
    /// List the types in a store with their record counts
    Types(TypesArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// Entity type to build
    pub type_name: String,
    /// Ids to build, in order (all ids of the type when omitted)
    pub ids: Vec<String>,
    /// Normalized store, as a JSON file
    #[arg(short, long)]
    pub store: PathBuf,
    /// TOML file with build options; flags below override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Resolve relationships while building
    #[arg(long)]
    pub eager: bool,
    /// Leave link-only relationships out instead of failing
    #[arg(long)]
    pub ignore_links: bool,
    /// Keep relationships back to a type already on the path as references
    #[arg(long)]
    pub no_circular: bool,
    /// Add a `type` field to every object
    #[arg(long)]
    pub include_type: bool,
    /// Attach record and relationship meta
    #[arg(long)]
    pub include_meta: bool,
    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args)]
pub struct TypesArgs {
    /// Normalized store, as a JSON file
    #[arg(short, long)]
    pub store: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_build_all() {
        let cli = Cli::try_parse_from(["denorm", "build", "people", "--store", "s.json"]).unwrap();
        if let Command::Build(args) = cli.command {
            assert_eq!(args.type_name, "people");
            assert!(args.ids.is_empty());
            assert_eq!(args.store, PathBuf::from("s.json"));
            assert!(!args.eager);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_build_ids_and_flags() {
        let cli = Cli::try_parse_from([
            "denorm", "build", "people", "2", "1", "-s", "s.json", "--eager", "--no-circular",
            "--include-type", "--include-meta", "--ignore-links", "--pretty",
        ])
        .unwrap();
        if let Command::Build(args) = cli.command {
            assert_eq!(args.ids, vec!["2", "1"]);
            assert!(args.eager);
            assert!(args.no_circular);
            assert!(args.include_type);
            assert!(args.include_meta);
            assert!(args.ignore_links);
            assert!(args.pretty);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_build_config() {
        let cli = Cli::try_parse_from(["denorm", "build", "t", "-s", "s.json", "-c", "o.toml"])
            .unwrap();
        if let Command::Build(args) = cli.command {
            assert_eq!(args.config, Some(PathBuf::from("o.toml")));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn build_requires_store() {
        assert!(Cli::try_parse_from(["denorm", "build", "people"]).is_err());
    }

    #[test]
    fn parse_types() {
        let cli = Cli::try_parse_from(["denorm", "types", "--store", "s.json"]).unwrap();
        assert!(matches!(cli.command, Command::Types(_)));
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["denorm", "--verbose", "types", "-s", "s.json"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn parse_json_format() {
        let cli = Cli::try_parse_from(["denorm", "--format", "json", "types", "-s", "x"]).unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
    }
}
