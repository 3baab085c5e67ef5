use anyhow::anyhow;
use bbimport::{config::Config, store::BackendCsv};
use clap::Parser;
use homedir::my_home;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Command;

fn base_path() -> anyhow::Result<String> {
    if let Ok(base_path) = std::env::var("BB_BASE_PATH") {
        return Ok(base_path);
    }

    let home = my_home()
        .map_err(|err| anyhow!("couldnt find home dir: {err:?}"))?
        .ok_or_else(|| anyhow!("couldnt find home dir"))?;
    Ok(format!("{}/.local/share/bbimport", home.to_string_lossy()))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Args::parse();

    let base_path = base_path()?;
    let config = Config::load_with(&base_path)?;
    let store = BackendCsv::load(&format!("{}/bookmarks.csv", config.base_path()))?;

    match args.command {
        Command::Import {
            file,
            owner,
            dry_run,
        } => cli::handle_import(&file, &owner, dry_run, &config, &store),
        Command::Tree { owner, root } => cli::handle_tree(&owner, root, &store),
        Command::Folder {
            target,
            owner,
            substring,
        } => cli::handle_folder(&target, &owner, substring, &config, &store),
        Command::Mkdir {
            parent,
            name,
            owner,
        } => cli::handle_mkdir(&parent, &name, &owner, &store),
        Command::RenameFolder {
            path,
            new_name,
            owner,
        } => cli::handle_rename_folder(&path, &new_name, &owner, &store),
        Command::RmFolder { path, owner, yes } => cli::handle_rm_folder(&path, &owner, yes, &store),
    }
}
