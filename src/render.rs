// src/render.rs

//! Plain-text views of the book collection.

use unicode_segmentation::UnicodeSegmentation;

use crate::models::Book;

/// Shown instead of a table when the collection is empty.
pub const EMPTY_LIST: &str = "No books yet.";

const HEADERS: [&str; 5] = ["Title", "Author", "Year", "ISBN", "ID"];

/// Placeholder for an absent optional field.
const NONE: &str = "-";

/// Render the collection as an aligned table, one line per book.
pub fn render_table(books: &[Book]) -> String {
    if books.is_empty() {
        return EMPTY_LIST.to_string();
    }

    let rows: Vec<[String; 5]> = books.iter().map(row).collect();

    let mut widths = HEADERS.map(width);
    for cells in &rows {
        for (w, cell) in widths.iter_mut().zip(cells) {
            *w = (*w).max(width(cell));
        }
    }

    let mut out = String::new();
    out.push_str(&line(&HEADERS.map(str::to_string), &widths));
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    for cells in &rows {
        out.push('\n');
        out.push_str(&line(cells, &widths));
    }
    out
}

/// Render one book as a key/value block.
pub fn render_book(book: &Book) -> String {
    format!(
        "ID:     {}\nTitle:  {}\nAuthor: {}\nYear:   {}\nISBN:   {}",
        book.id,
        book.title,
        book.author,
        year(book),
        book.isbn.as_deref().unwrap_or(NONE)
    )
}

/// Render the page-level error banner.
pub fn render_banner(error: &str) -> String {
    format!("Error! {error}")
}

fn row(book: &Book) -> [String; 5] {
    [
        book.title.clone(),
        book.author.clone(),
        year(book),
        book.isbn.clone().unwrap_or_else(|| NONE.to_string()),
        book.id.to_string(),
    ]
}

fn year(book: &Book) -> String {
    book.publication_year
        .map(|y| y.to_string())
        .unwrap_or_else(|| NONE.to_string())
}

fn width(s: &str) -> usize {
    s.graphemes(true).count()
}

fn line(cells: &[String; 5], widths: &[usize; 5]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| format!("{}{}", cell, " ".repeat(w - width(cell))))
        .collect();
    padded.join("  ").trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: u64, title: &str, year: Option<i32>, isbn: Option<&str>) -> Book {
        Book {
            id,
            title: title.to_string(),
            author: "Author".to_string(),
            isbn: isbn.map(str::to_string),
            publication_year: year,
        }
    }

    #[test]
    fn test_empty_list_message() {
        assert_eq!(render_table(&[]), EMPTY_LIST);
    }

    #[test]
    fn test_one_line_per_book() {
        let books = vec![
            book(1, "Dune", Some(1965), None),
            book(2, "Hobbit", None, Some("9780261102217")),
            book(3, "Emma", Some(1815), None),
        ];
        let table = render_table(&books);
        // header + rule + rows
        assert_eq!(table.lines().count(), 2 + books.len());
    }

    #[test]
    fn test_absent_fields_render_as_dash() {
        let table = render_table(&[book(1, "Dune", None, None)]);
        let last = table.lines().last().unwrap();
        assert_eq!(last.split_whitespace().collect::<Vec<_>>(), ["Dune", "Author", "-", "-", "1"]);
    }

    #[test]
    fn test_columns_align_with_accents() {
        let books = vec![
            book(1, "Pán prstenů", None, None),
            book(2, "Dune", None, None),
        ];
        let table = render_table(&books);
        let lines: Vec<&str> = table.lines().collect();
        let author_col = |l: &str| l.graphemes(true).position(|g| g == "A").unwrap();
        assert_eq!(author_col(lines[2]), author_col(lines[3]));
    }

    #[test]
    fn test_render_book() {
        let text = render_book(&book(9, "Dune", Some(1965), None));
        assert!(text.contains("Title:  Dune"));
        assert!(text.contains("Year:   1965"));
        assert!(text.contains("ISBN:   -"));
    }
}
