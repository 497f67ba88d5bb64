//! bookshelf CLI
//!
//! Terminal frontend for the REST book collection. For the backend, use
//! `bookshelf-server`.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use bookshelf::{
    controller::{AlwaysConfirm, BookController},
    error::Result,
    models::{BookPatch, Config},
    render::{render_banner, render_book, render_table},
    services::{BookApi, HttpBookApi},
    shell::{Console, run_shell},
};
use clap::{Args, Parser, Subcommand};

/// bookshelf - manage a book collection
#[derive(Parser, Debug)]
#[command(name = "bookshelf", version, about = "Manage a REST book collection")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "bookshelf.toml")]
    config: PathBuf,

    /// Base URL of the book API (overrides config and BOOKSHELF_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all books
    List,

    /// Show one book
    Show { id: u64 },

    /// Add a book
    Add(AddArgs),

    /// Change fields of a book
    Update(UpdateArgs),

    /// Delete a book
    Delete {
        id: u64,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Interactive session
    Shell,

    /// Validate configuration
    Validate,
}

#[derive(Args, Debug)]
struct AddArgs {
    #[arg(long, default_value = "")]
    title: String,

    #[arg(long, default_value = "")]
    author: String,

    /// Publication year
    #[arg(long, default_value = "")]
    year: String,

    #[arg(long, default_value = "")]
    isbn: String,
}

#[derive(Args, Debug)]
struct UpdateArgs {
    id: u64,

    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    author: Option<String>,

    /// Publication year
    #[arg(long, conflicts_with = "clear_year")]
    year: Option<i32>,

    /// Remove the publication year
    #[arg(long)]
    clear_year: bool,

    #[arg(long, conflicts_with = "clear_isbn")]
    isbn: Option<String>,

    /// Remove the ISBN
    #[arg(long)]
    clear_isbn: bool,
}

impl UpdateArgs {
    fn patch(&self) -> BookPatch {
        BookPatch {
            title: self.title.clone(),
            author: self.author.clone(),
            isbn: if self.clear_isbn {
                Some(None)
            } else {
                self.isbn.clone().map(Some)
            },
            publication_year: if self.clear_year {
                Some(None)
            } else {
                self.year.map(Some)
            },
        }
    }
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Print the outcome of a one-shot command and pick the exit code.
fn finish<A: BookApi>(controller: &BookController<A>) -> ExitCode {
    match controller.error() {
        Some(error) => {
            eprintln!("{}", render_banner(error));
            ExitCode::FAILURE
        }
        None => ExitCode::SUCCESS,
    }
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config).with_process_env();
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    log::debug!("Using API at {}", config.api.base_url);

    if let Command::Validate = cli.command {
        if let Err(e) = config.validate() {
            log::error!("Config validation failed: {}", e);
            return Err(e);
        }
        println!("✓ Config OK");
        println!("    API:     {}", config.api.base_url);
        println!("    Timeout: {}s", config.api.timeout_secs);
        println!("    Server:  {}:{}", config.server.host, config.server.port);
        return Ok(ExitCode::SUCCESS);
    }

    let api = HttpBookApi::new(&config.api)?;
    let mut controller = BookController::new(api);

    match cli.command {
        Command::List => {
            if controller.refresh().await {
                println!("{}", render_table(controller.books()));
            }
        }

        Command::Show { id } => {
            if let Some(book) = controller.show(id).await {
                println!("{}", render_book(&book));
            }
        }

        Command::Add(args) => {
            controller.set_title(args.title);
            controller.set_author(args.author);
            controller.set_publication_year(args.year);
            controller.set_isbn(args.isbn);
            if controller.submit().await {
                println!("Book added.");
                println!("{}", render_table(controller.books()));
            }
        }

        Command::Update(args) => {
            if let Some(book) = controller.update(args.id, &args.patch()).await {
                println!("{}", render_book(&book));
            }
        }

        Command::Delete { id, yes } => {
            let deleted = if yes {
                controller.delete(id, &mut AlwaysConfirm).await
            } else {
                let mut console = Console::new(io::stdin().lock(), io::stdout());
                controller.delete(id, &mut console).await
            };
            if deleted {
                println!("Book {id} deleted.");
            }
        }

        Command::Shell => {
            let mut console = Console::new(io::stdin().lock(), io::stdout());
            run_shell(&mut controller, &mut console).await?;
            return Ok(ExitCode::SUCCESS);
        }

        Command::Validate => {}
    }

    Ok(finish(&controller))
}
