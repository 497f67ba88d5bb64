// src/shell.rs

//! Interactive line-oriented frontend.
//!
//! Keeps one `BookController` alive for the whole session, the way a page
//! stays open between user actions. A failed command only shows the error
//! banner; the session continues.

use std::io::{self, BufRead, Write};

use crate::controller::{BookController, Confirm};
use crate::error::Result;
use crate::render::{render_banner, render_book, render_table};
use crate::services::BookApi;

const HELP: &str = "\
Commands:
  list            show all books
  add             add a book (prompts for each field)
  show <id>       show one book
  delete <id>     delete a book (asks for confirmation)
  help            show this help
  quit            leave the shell";

/// Line input and output for the shell.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Read one line without its line ending. `None` at end of input.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Print `prompt` and read the answer.
    pub fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        self.read_line()
    }

    /// Print one block of text followed by a newline.
    pub fn print(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    /// Give back the output sink.
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Confirm for Console<R, W> {
    fn confirm(&mut self, prompt: &str) -> bool {
        match self.ask(&format!("{prompt} [y/N] ")) {
            Ok(Some(answer)) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            _ => false,
        }
    }
}

/// Run the shell until `quit` or end of input.
pub async fn run_shell<A, R, W>(
    controller: &mut BookController<A>,
    console: &mut Console<R, W>,
) -> Result<()>
where
    A: BookApi,
    R: BufRead,
    W: Write,
{
    console.print("Book library. Type 'help' for commands.")?;
    controller.refresh().await;
    show_list(controller, console)?;
    show_banner(controller, console)?;

    while let Some(line) = console.ask("> ")? {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let arg = words.next();

        match command {
            "quit" | "exit" => break,
            "help" => console.print(HELP)?,
            "list" | "ls" => {
                controller.refresh().await;
                show_list(controller, console)?;
            }
            "add" => {
                if !fill_form(controller, console)? {
                    break;
                }
                if controller.submit().await {
                    console.print("Book added.")?;
                    show_list(controller, console)?;
                } else if !controller.form().is_blank() {
                    console.print("The form was kept; run 'add' again to correct it.")?;
                }
            }
            "show" => match parse_id(arg) {
                Some(id) => {
                    if let Some(book) = controller.show(id).await {
                        console.print(&render_book(&book))?;
                    }
                }
                None => console.print("Usage: show <id>")?,
            },
            "delete" | "rm" => match parse_id(arg) {
                Some(id) => {
                    if controller.delete(id, &mut *console).await {
                        console.print("Book deleted.")?;
                        show_list(controller, console)?;
                    }
                }
                None => console.print("Usage: delete <id>")?,
            },
            other => console.print(&format!("Unknown command '{other}'. Type 'help'."))?,
        }

        show_banner(controller, console)?;
    }

    Ok(())
}

fn parse_id(arg: Option<&str>) -> Option<u64> {
    arg.and_then(|s| s.parse().ok())
}

/// Prompt for every form field, offering the kept value as default.
///
/// Returns `false` when input ended.
fn fill_form<A, R, W>(
    controller: &mut BookController<A>,
    console: &mut Console<R, W>,
) -> Result<bool>
where
    A: BookApi,
    R: BufRead,
    W: Write,
{
    let form = controller.form().clone();
    let fields = [
        ("Title", form.title),
        ("Author", form.author),
        ("Publication year", form.publication_year),
        ("ISBN", form.isbn),
    ];

    let mut answers = Vec::with_capacity(fields.len());
    for (label, current) in fields {
        let prompt = if current.is_empty() {
            format!("{label}: ")
        } else {
            format!("{label} [{current}]: ")
        };
        let Some(answer) = console.ask(&prompt)? else {
            return Ok(false);
        };
        answers.push(if answer.is_empty() { current } else { answer });
    }

    let mut answers = answers.into_iter();
    controller.set_title(answers.next().unwrap_or_default());
    controller.set_author(answers.next().unwrap_or_default());
    controller.set_publication_year(answers.next().unwrap_or_default());
    controller.set_isbn(answers.next().unwrap_or_default());
    Ok(true)
}

fn show_list<A, R, W>(controller: &BookController<A>, console: &mut Console<R, W>) -> Result<()>
where
    A: BookApi,
    R: BufRead,
    W: Write,
{
    if controller.error().is_none() {
        console.print(&render_table(controller.books()))?;
    }
    Ok(())
}

fn show_banner<A, R, W>(controller: &mut BookController<A>, console: &mut Console<R, W>) -> Result<()>
where
    A: BookApi,
    R: BufRead,
    W: Write,
{
    if let Some(error) = controller.error() {
        let banner = render_banner(error);
        console.print(&banner)?;
        controller.clear_error();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use async_trait::async_trait;

    use super::*;
    use crate::error::AppError;
    use crate::models::{Book, BookPatch, NewBook};
    use crate::storage::{BookStorage, MemoryStorage};

    /// `BookApi` served straight from a storage backend.
    struct StorageApi(MemoryStorage);

    #[async_trait]
    impl BookApi for StorageApi {
        async fn list_books(&self) -> Result<Vec<Book>> {
            self.0.list().await
        }
        async fn get_book(&self, id: u64) -> Result<Book> {
            self.0.get(id).await
        }
        async fn create_book(&self, book: &NewBook) -> Result<Option<Book>> {
            self.0.insert(book.clone()).await.map(Some)
        }
        async fn update_book(&self, id: u64, patch: &BookPatch) -> Result<Book> {
            self.0.update(id, patch).await
        }
        async fn delete_book(&self, id: u64) -> Result<()> {
            self.0.delete(id).await
        }
    }

    /// `BookApi` whose every call fails with a server error.
    struct DownApi;

    #[async_trait]
    impl BookApi for DownApi {
        async fn list_books(&self) -> Result<Vec<Book>> {
            Err(AppError::status(500, "Internal Server Error"))
        }
        async fn get_book(&self, _id: u64) -> Result<Book> {
            Err(AppError::status(500, "Internal Server Error"))
        }
        async fn create_book(&self, _book: &NewBook) -> Result<Option<Book>> {
            Err(AppError::status(500, "Internal Server Error"))
        }
        async fn update_book(&self, _id: u64, _patch: &BookPatch) -> Result<Book> {
            Err(AppError::status(500, "Internal Server Error"))
        }
        async fn delete_book(&self, _id: u64) -> Result<()> {
            Err(AppError::status(500, "Internal Server Error"))
        }
    }

    async fn run(script: &str) -> (BookController<StorageApi>, String) {
        let mut controller = BookController::new(StorageApi(MemoryStorage::new()));
        let mut console = Console::new(Cursor::new(script.to_string()), Vec::new());
        run_shell(&mut controller, &mut console).await.unwrap();
        let output = String::from_utf8(console.into_output()).unwrap();
        (controller, output)
    }

    #[tokio::test]
    async fn test_add_then_list() {
        let (controller, output) = run("add\nDune\nFrank Herbert\n1965\n\nquit\n").await;
        assert_eq!(controller.books().len(), 1);
        assert_eq!(controller.books()[0].publication_year, Some(1965));
        assert!(output.contains("Book added."));
        assert!(output.contains("Dune"));
    }

    #[tokio::test]
    async fn test_invalid_add_keeps_form() {
        let (controller, output) = run("add\nDune\n\n\n\n").await;
        assert!(controller.books().is_empty());
        assert_eq!(controller.form().title, "Dune");
        assert!(output.contains("Error! Please fill in at least the title and the author."));
    }

    #[tokio::test]
    async fn test_kept_form_is_offered_again() {
        let (controller, output) = run("add\nDune\n\n\n\nadd\n\nFrank Herbert\n\n\n").await;
        assert!(output.contains("Title [Dune]: "));
        assert_eq!(controller.books().len(), 1);
        assert_eq!(controller.books()[0].title, "Dune");
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let script = "add\nA\nB\n\n\ndelete 1\nn\nlist\ndelete 1\ny\n";
        let (controller, output) = run(script).await;
        assert!(output.contains("Really delete the book with ID 1? [y/N] "));
        assert!(controller.books().is_empty());
        assert_eq!(output.matches("Book deleted.").count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_id_shows_banner() {
        let (_, output) = run("show 42\n").await;
        assert!(output.contains("Error! Book 42 not found"));
    }

    #[tokio::test]
    async fn test_usage_and_unknown_command() {
        let (_, output) = run("delete\nfrobnicate\nhelp\n").await;
        assert!(output.contains("Usage: delete <id>"));
        assert!(output.contains("Unknown command 'frobnicate'"));
        assert!(output.contains("Commands:"));
    }

    #[tokio::test]
    async fn test_initial_load_failure_shows_banner() {
        let mut controller = BookController::new(DownApi);
        let mut console = Console::new(Cursor::new(String::new()), Vec::new());
        run_shell(&mut controller, &mut console).await.unwrap();
        let output = String::from_utf8(console.into_output()).unwrap();
        assert!(output.contains("Error! Error 500: Internal Server Error"));
        assert!(!output.contains("No books yet."));
    }
}
