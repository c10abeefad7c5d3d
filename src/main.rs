use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mirror::{commands, core::config::Config, utils::fs::parse_octal_mode};

#[derive(Parser)]
#[clap(name = "mirror")]
#[clap(about = "Mirrors remote files using HTTP")]
#[clap(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Mirror root holding the database and downloaded files (default: ~/.mirror)
    #[clap(long, global = true, env = "MIRROR_HOME")]
    root: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[clap(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download a file and start tracking it
    #[clap(visible_aliases = ["addf", "add", "a"])]
    AddFile {
        url: String,
        /// Where to save the file (default: <root>/bin/<remote name>)
        #[clap(short, long)]
        filename: Option<PathBuf>,
        /// chmod-style octal mode applied after download [default: 755]
        #[clap(short, long, value_parser = parse_mode)]
        mode: Option<u32>,
        /// Arbitrary shell script to run after installation
        #[clap(short, long, visible_alias = "post")]
        post_install: Option<String>,
    },
    /// Download an archive and track one member of it
    #[clap(visible_aliases = ["add-ar", "adda"])]
    AddArchive {
        url: String,
        /// Path of the file or directory inside the archive
        archive_filename: String,
        /// Where to save the member (default: <root>/bin/<archive filename>)
        #[clap(short, long)]
        filename: Option<PathBuf>,
        /// chmod-style octal mode applied after extraction [default: 755]
        #[clap(short, long, value_parser = parse_mode)]
        mode: Option<u32>,
        /// Arbitrary shell script to run after installation
        #[clap(short, long, visible_alias = "post")]
        post_install: Option<String>,
    },
    /// List tracked mirrors
    #[clap(visible_aliases = ["list-files", "ls", "l"])]
    List {
        /// Print entries as JSON
        #[clap(long)]
        json: bool,
    },
    /// Re-download every tracked mirror
    #[clap(visible_aliases = ["update-files", "u"])]
    Update,
    /// Stop tracking a mirror
    #[clap(visible_aliases = ["remove-file", "rm", "r"])]
    Remove {
        filename: PathBuf,
        /// Treat FILENAME as a glob pattern
        #[clap(short, long)]
        glob: bool,
        /// Also delete the matching files from disk
        #[clap(long)]
        purge: bool,
    },
    /// Delete the database and every downloaded file
    DeleteDb {
        /// Skip the confirmation prompt
        #[clap(short, long)]
        yes: bool,
    },
    /// Open the database in the sqlite3 shell
    #[clap(visible_alias = "sqlite")]
    SqliteShell,
}

fn parse_mode(value: &str) -> std::result::Result<u32, String> {
    parse_octal_mode(value).map_err(|e| e.to_string())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_level(true)
                .with_target(false),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = Config::load(cli.root.as_deref()).and_then(|config| match cli.command {
        Commands::AddFile {
            url,
            filename,
            mode,
            post_install,
        } => commands::add::add_file(
            config,
            &url,
            filename.as_deref(),
            mode,
            post_install.as_deref(),
        ),
        Commands::AddArchive {
            url,
            archive_filename,
            filename,
            mode,
            post_install,
        } => commands::add::add_archive(
            config,
            &url,
            &archive_filename,
            filename.as_deref(),
            mode,
            post_install.as_deref(),
        ),
        Commands::List { json } => commands::list::list_files(config, json),
        Commands::Update => commands::update::update_files(config),
        Commands::Remove {
            filename,
            glob,
            purge,
        } => commands::remove::remove_file(config, &filename, glob, purge),
        Commands::DeleteDb { yes } => commands::delete_db::delete_db(&config, yes),
        Commands::SqliteShell => commands::sqlite::sqlite_shell(&config),
    });

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    Ok(())
}
