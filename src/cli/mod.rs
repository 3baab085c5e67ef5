use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod handlers;

pub use handlers::*;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Import a browser bookmark export (the "Bookmark File" HTML format)
    Import {
        /// Exported bookmarks.html
        file: PathBuf,

        /// Owner key stamped on every record
        #[clap(short, long)]
        owner: String,

        /// Parse and print the result without storing anything
        #[clap(long, default_value = "false")]
        dry_run: bool,
    },
    /// Print the folder tree
    Tree {
        #[clap(short, long)]
        owner: String,

        /// Only print the folder at this path (e.g. ",Work,Projects,")
        #[clap(short, long)]
        root: Option<String>,
    },
    /// Print the records inside one folder
    Folder {
        /// Folder name or path
        target: String,

        #[clap(short, long)]
        owner: String,

        /// Match any path containing the target, ignoring case.
        /// This is how older deployments behaved.
        #[clap(long, default_value = "false")]
        substring: bool,
    },
    /// Create an empty folder
    Mkdir {
        /// Parent folder path, "," for the top level
        parent: String,

        /// New folder name
        name: String,

        #[clap(short, long)]
        owner: String,
    },
    /// Rename a folder, moving everything inside it
    RenameFolder {
        /// Folder path
        path: String,

        new_name: String,

        #[clap(short, long)]
        owner: String,
    },
    /// Delete a folder with all its bookmarks
    RmFolder {
        /// Folder path
        path: String,

        #[clap(short, long)]
        owner: String,

        /// Auto confirm
        #[clap(short, long, default_value = "false")]
        yes: bool,
    },
}
