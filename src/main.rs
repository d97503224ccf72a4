use std::fs::File;
use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use readnext::Backend;
use readnext::cli;
use readnext::core::config::{self, CliOverrides};
use readnext::storage::build_store;
use readnext::tui;

#[derive(Parser)]
#[command(name = "readnext", about = "A prioritized reading list for the terminal")]
struct Args {
    /// Storage backend (overrides config and READNEXT_BACKEND)
    #[arg(short, long, value_enum)]
    backend: Option<Backend>,

    /// JSON file for the local backend
    #[arg(long)]
    data_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Add a book to the end of the list
    Add {
        /// Book title
        title: String,
    },
    /// Print the reading list
    List {
        /// Include books without high priority
        #[arg(short, long)]
        all: bool,
    },
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to readnext.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("readnext.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().map_err(io::Error::other)?;
    let overrides = CliOverrides {
        backend: args.backend,
        data_file: args.data_file,
    };
    let resolved = config::resolve(&file_config, &overrides);

    log::info!(
        "readnext starting up with backend: {}",
        resolved.backend.name()
    );

    let store = build_store(&resolved).map_err(io::Error::other)?;

    match args.command {
        Some(Command::Add { title }) => match cli::add(store.as_ref(), &title)
            .await
            .map_err(io::Error::other)?
        {
            Some(book) => println!("{}", book.id),
            None => eprintln!("Nothing added: title is empty"),
        },
        Some(Command::List { all }) => {
            let listing = cli::list(store.as_ref(), all)
                .await
                .map_err(io::Error::other)?;
            print!("{listing}");
        }
        None => tui::run(store, resolved.default_tab)?,
    }

    Ok(())
}
