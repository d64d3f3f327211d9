use anyhow::Context;
use colored::Colorize;
use serde_json::{Map, Value};

use denorm_build::{BuildOptions, Denormalizer};
use denorm_store::NormalizedStore;
use denorm_types::IdSelector;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Build(args) => cmd_build(args),
        Command::Types(args) => cmd_types(args, cli.format),
    }
}

fn cmd_build(args: BuildArgs) -> anyhow::Result<()> {
    let output = build_json(&args)?;
    let text = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{text}");
    Ok(())
}

fn cmd_types(args: TypesArgs, format: OutputFormat) -> anyhow::Result<()> {
    let store = load_store(&args.store)?;
    match format {
        OutputFormat::Json => {
            let counts: Map<String, Value> = store
                .type_names()
                .map(|t| (t.to_string(), Value::from(store.count(t))))
                .collect();
            println!("{}", Value::Object(counts));
        }
        OutputFormat::Text => {
            if store.type_names().next().is_none() {
                println!("No types.");
            }
            for type_name in store.type_names() {
                let count = format!("({} records)", store.count(type_name));
                println!("{} {}", type_name.bold(), count.dimmed());
            }
        }
    }
    Ok(())
}

fn load_store(path: &std::path::Path) -> anyhow::Result<NormalizedStore> {
    NormalizedStore::from_path(path).with_context(|| format!("loading store {}", path.display()))
}

/// Options from the config file (if any), with command-line flags on top.
fn resolve_options(args: &BuildArgs) -> anyhow::Result<BuildOptions> {
    let mut options = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading options {}", path.display()))?;
            BuildOptions::from_toml_str(&text)?
        }
        None => BuildOptions::default(),
    };
    options.eager |= args.eager;
    options.ignore_links |= args.ignore_links;
    options.include_type |= args.include_type;
    options.include_meta |= args.include_meta;
    if args.no_circular {
        options.allow_circular = false;
    }
    Ok(options)
}

fn build_json(args: &BuildArgs) -> anyhow::Result<Value> {
    let store = load_store(&args.store)?;
    let options = resolve_options(args)?;
    let selector = if args.ids.is_empty() {
        IdSelector::All
    } else {
        IdSelector::many(args.ids.iter().map(String::as_str))
    };

    let mut denorm = Denormalizer::with_options(&store, options);
    let built = denorm.build(&args.type_name, selector)?;
    let output = denorm.built_to_json(&built)?;
    tracing::debug!(objects = denorm.cache().len(), stats = ?denorm.stats(), "build finished");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    fn store_file() -> NamedTempFile {
        write_temp(
            &json!({
                "people": {
                    "1": {"id": "1", "attributes": {"name": "x"},
                          "relationships": {"friend": {"data": {"type": "people", "id": "2"}}}},
                    "2": {"id": "2", "attributes": {"name": "y"},
                          "relationships": {"friend": {"data": {"type": "people", "id": "1"}}}}
                }
            })
            .to_string(),
        )
    }

    fn build_args(argv: &[&str]) -> BuildArgs {
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Build(args) => args,
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn builds_requested_ids_in_order() {
        let store = store_file();
        let path = store.path().to_str().unwrap();
        let args = build_args(&["denorm", "build", "people", "2", "-s", path]);
        let out = build_json(&args).unwrap();
        assert_eq!(
            out,
            json!([{"id": "2", "name": "y",
                    "friend": {"id": "1", "name": "x", "friend": {"type": "people", "id": "2"}}}])
        );
    }

    #[test]
    fn no_circular_flag_suppresses() {
        let store = store_file();
        let path = store.path().to_str().unwrap();
        let args = build_args(&[
            "denorm", "build", "people", "1", "-s", path, "--no-circular", "--include-type",
        ]);
        let out = build_json(&args).unwrap();
        assert_eq!(
            out,
            json!([{"id": "1", "name": "x", "type": "people",
                    "friend": {"type": "people", "id": "2"}}])
        );
    }

    #[test]
    fn config_file_sets_defaults_and_flags_override() {
        let config = write_temp("includeType = true\nallowCircular = true\n");
        let store = store_file();
        let args = build_args(&[
            "denorm", "build", "people", "-s", store.path().to_str().unwrap(),
            "-c", config.path().to_str().unwrap(), "--eager", "--no-circular",
        ]);
        let options = resolve_options(&args).unwrap();
        assert!(options.include_type);
        assert!(options.eager);
        assert!(!options.allow_circular);
    }

    #[test]
    fn bad_config_is_reported() {
        let config = write_temp("eager = 3\n");
        let store = store_file();
        let args = build_args(&[
            "denorm", "build", "people", "-s", store.path().to_str().unwrap(),
            "-c", config.path().to_str().unwrap(),
        ]);
        assert!(resolve_options(&args).is_err());
    }

    #[test]
    fn build_output_is_json_in_every_format() {
        let store = store_file();
        let path = store.path().to_str().unwrap();
        let text = build_args(&["denorm", "--format", "text", "build", "people", "1", "-s", path]);
        let json = build_args(&["denorm", "build", "people", "1", "-s", path, "--format", "json"]);
        let out = build_json(&text).unwrap();
        assert_eq!(out, build_json(&json).unwrap());
        assert_eq!(out[0]["name"], json!("x"));
    }

    #[test]
    fn unknown_type_prints_null() {
        let store = store_file();
        let args = build_args(&["denorm", "build", "robots", "-s", store.path().to_str().unwrap()]);
        assert_eq!(build_json(&args).unwrap(), Value::Null);
    }

    #[test]
    fn missing_store_file_fails() {
        let args = build_args(&["denorm", "build", "people", "-s", "/nonexistent/store.json"]);
        let err = build_json(&args).unwrap_err();
        assert!(err.to_string().contains("loading store"));
    }
}
