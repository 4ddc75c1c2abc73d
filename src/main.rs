use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use booktrack::{Book, BookStatus, BookStore, Library, READ_NOTE_TEMPLATE};

#[derive(Parser)]
#[command(name = "booktrack", version, about = "Track books to read and books you have read")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a book to the reading list (or straight to the read list)
    Add {
        title: String,
        #[arg(long, default_value = "")]
        author: String,
        /// Note text; read books default to the reflection template
        #[arg(long)]
        note: Option<String>,
        /// Add as already read instead of to-read
        #[arg(long)]
        read: bool,
        /// Image file to import as the cover
        #[arg(long)]
        cover: Option<PathBuf>,
    },
    /// Show the two lists (or one of them)
    List {
        /// Only the read list
        #[arg(long, conflicts_with = "to_read")]
        read: bool,
        /// Only the to-read list
        #[arg(long)]
        to_read: bool,
    },
    /// Show one book in full, note included
    Show { id: String },
    /// Change a book's title, author or note
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        note: Option<String>,
    },
    /// Mark a to-read book as read
    Done {
        id: String,
        /// Note about the book; defaults to the reflection template
        #[arg(long)]
        note: Option<String>,
    },
    /// Delete a book
    Rm { id: String },
    /// Set or remove a book's cover image
    Cover {
        id: String,
        /// Image file to import
        #[arg(required_unless_present = "remove")]
        image: Option<PathBuf>,
        /// Drop the cover instead of setting one
        #[arg(long)]
        remove: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "booktrack=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let store = BookStore::open_default().context("could not open the book store")?;
    let library = Library::new(store);

    run(&library, Cli::parse().command)
}

fn run(library: &Library, command: Command) -> Result<()> {
    match command {
        Command::Add { title, author, note, read, cover } => {
            let title = clean_title(&title)?;
            let status = if read { BookStatus::Read } else { BookStatus::ToRead };
            let note = note.unwrap_or_else(|| {
                if read { READ_NOTE_TEMPLATE.to_string() } else { String::new() }
            });

            let mut book = Book::new(title, author, note, status);
            if let Some(image) = cover {
                book.cover_filename = Some(library.store().import_cover(&image, None)?);
            }

            library.upsert(book.clone())?;
            println!("📚 Added \"{}\" ({})", book.title, short_id(book.id));
        }

        Command::List { read, to_read } => {
            if !read {
                print_list(library, BookStatus::ToRead, "To read")?;
            }
            if !to_read {
                print_list(library, BookStatus::Read, "Read")?;
            }
        }

        Command::Show { id } => {
            let book = find_book(library, &id)?;
            println!("{}", book.title);
            if !book.author.is_empty() {
                println!("by {}", book.author);
            }
            println!("status: {}", if book.is_read() { "read" } else { "to read" });
            println!("id: {}", book.id);
            match &book.cover_filename {
                Some(name) => println!("cover: {}", library.store().cover_path(name).display()),
                None => println!("cover: none"),
            }
            if !book.note.is_empty() {
                println!("\n{}", book.note);
            }
        }

        Command::Edit { id, title, author, note } => {
            if title.is_none() && author.is_none() && note.is_none() {
                bail!("nothing to change; pass --title, --author or --note");
            }

            let mut book = find_book(library, &id)?;
            if let Some(title) = title {
                book.title = clean_title(&title)?;
            }
            if let Some(author) = author {
                book.author = author;
            }
            if let Some(note) = note {
                book.note = note;
            }

            library.upsert(book.clone())?;
            println!("Updated \"{}\"", book.title);
        }

        Command::Done { id, note } => {
            let book = find_book(library, &id)?;
            let updated = library
                .mark_read(book.id, note.as_deref())?
                .context("book disappeared between lookup and update")?;
            println!("✅ Marked \"{}\" as read", updated.title);
        }

        Command::Rm { id } => {
            let book = find_book(library, &id)?;
            library.remove(book.id)?;
            println!("Removed \"{}\"", book.title);
        }

        Command::Cover { id, image, remove } => {
            let mut book = find_book(library, &id)?;
            if remove {
                // Clearing the reference is enough: the sweep after the
                // save deletes the now-orphaned file.
                book.cover_filename = None;
                library.upsert(book.clone())?;
                println!("Removed cover from \"{}\"", book.title);
            } else {
                let image = image.expect("clap enforces image unless --remove");
                let filename = library
                    .store()
                    .import_cover(&image, book.cover_filename.as_deref())?;
                book.cover_filename = Some(filename);
                library.upsert(book.clone())?;
                println!("Set cover for \"{}\"", book.title);
            }
        }
    }

    Ok(())
}

fn print_list(library: &Library, status: BookStatus, heading: &str) -> Result<()> {
    let books = library.list(status)?;
    println!("{} ({})", heading, books.len());
    for book in books {
        if book.author.is_empty() {
            println!("  {}  {}", short_id(book.id), book.title);
        } else {
            println!("  {}  {} — {}", short_id(book.id), book.title, book.author);
        }
    }
    Ok(())
}

/// Trimmed, non-empty title or an error; empty titles never reach the store.
fn clean_title(raw: &str) -> Result<String> {
    let title = raw.trim();
    if title.is_empty() {
        bail!("the title must not be empty");
    }
    Ok(title.to_string())
}

fn short_id(id: Uuid) -> String {
    id.to_string()[..8].to_string()
}

/// Look a book up by full id or unambiguous id prefix.
fn find_book(library: &Library, id: &str) -> Result<Book> {
    if let Ok(id) = Uuid::parse_str(id) {
        return library
            .find(id)?
            .with_context(|| format!("no book with id {id}"));
    }

    let needle = id.to_lowercase();
    let matches: Vec<Book> = library
        .books()?
        .into_iter()
        .filter(|b| b.id.to_string().starts_with(&needle))
        .collect();

    match matches.len() {
        0 => bail!("no book with id starting \"{id}\""),
        1 => Ok(matches.into_iter().next().expect("len checked")),
        n => bail!("id \"{id}\" is ambiguous ({n} matches); use more characters"),
    }
}
