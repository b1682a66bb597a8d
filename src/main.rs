use anyhow::Result;
use clap::{Parser, Subcommand};
use depot::areas::store::Store;
use depot::commands::{self, PackageSpec};
use depot::config::StoreConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "depot",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A local content-addressable data package store",
    long_about = "depot manages a local repository of versioned data packages: \
    named trees of content-addressed objects with mutable tags pointing at \
    immutable snapshots. This tool administers the store itself; building \
    packages from user files is left to front ends.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a package store",
        long_about = "This command creates the store directory layout at the primary store \
        location or at the specified path (whose basename must be the reserved store \
        directory name)."
    )]
    Init {
        #[arg(index = 1, help = "The path to the store root")]
        path: Option<String>,
    },
    #[command(
        name = "ls",
        about = "List installed packages",
        long_about = "This command lists every package instance in the primary store, one \
        line per tag, with untagged instances shown against an empty tag."
    )]
    Ls,
    #[command(
        name = "rm",
        about = "Remove a package and reclaim its objects",
        long_about = "This command removes every instance of a package from the primary \
        store, then prunes the objects that no remaining package references."
    )]
    Rm {
        #[arg(index = 1, help = "The package to remove, as [team:]user/package")]
        spec: String,
    },
    #[command(
        name = "prune",
        about = "Delete objects unreferenced by any package",
        long_about = "This command sweeps the whole object directory and deletes every \
        object no package instance references, including orphans left behind by \
        interrupted installs."
    )]
    Prune,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = StoreConfig::from_env();

    match &cli.command {
        Commands::Init { path } => {
            let root = match path {
                Some(path) => PathBuf::from(path),
                None => config.primary().to_path_buf(),
            };
            let store = Store::open(&root)?;

            commands::init::init(&store, &mut std::io::stdout())?
        }
        Commands::Ls => {
            let store = Store::open(config.primary())?;

            commands::ls::ls(&store, &mut std::io::stdout())?
        }
        Commands::Rm { spec } => {
            let spec = PackageSpec::try_parse(spec)?;
            let store = Store::open(config.primary())?;

            commands::rm::rm(&store, &spec, &mut std::io::stdout())?
        }
        Commands::Prune => {
            let store = Store::open(config.primary())?;

            commands::prune::prune(&store, &mut std::io::stdout())?
        }
    }

    Ok(())
}
