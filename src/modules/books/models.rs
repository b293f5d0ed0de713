use std::fmt;

use bookshelf_db::{apply_migrations, Db, DbError, Migration};
use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

/// Creates the `books` table; existing tables are left untouched.
const CREATE_BOOKS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS books (
        id     BIGSERIAL PRIMARY KEY,
        title  TEXT,
        author TEXT,
        year   BIGINT
    );
"#;

/// A persisted book. The wire form is identical to the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    /// Assigned by the database on insert
    pub id: i64,
    pub title: String,
    pub author: String,
    pub year: i64,
}

/// Request body for creating a book.
///
/// Only a JSON object is accepted. Keys match field names ignoring ASCII
/// case and the last occurrence wins. `null` leaves a field untouched,
/// absent fields take their zero value and unknown keys are skipped. An
/// `id` is type-checked as an unsigned integer, then discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub year: i64,
}

impl<'de> Deserialize<'de> for NewBook {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(NewBookVisitor)
    }
}

struct NewBookVisitor;

impl<'de> Visitor<'de> for NewBookVisitor {
    type Value = NewBook;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON object describing a book")
    }

    fn visit_map<A>(self, mut map: A) -> Result<NewBook, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut book = NewBook::default();

        while let Some(key) = map.next_key::<String>()? {
            if key.eq_ignore_ascii_case("title") {
                if let Some(title) = map.next_value::<Option<String>>()? {
                    book.title = title;
                }
            } else if key.eq_ignore_ascii_case("author") {
                if let Some(author) = map.next_value::<Option<String>>()? {
                    book.author = author;
                }
            } else if key.eq_ignore_ascii_case("year") {
                if let Some(year) = map.next_value::<Option<i64>>()? {
                    book.year = year;
                }
            } else if key.eq_ignore_ascii_case("id") {
                map.next_value::<Option<u64>>()?;
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }

        Ok(book)
    }
}

#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub message: &'static str,
    pub book: Book,
}

#[derive(Debug, Serialize)]
pub struct BooksResponse {
    pub message: &'static str,
    pub books: Vec<Book>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Schema migrations owned by the books module.
pub fn migrations() -> Vec<Migration> {
    vec![Migration {
        id: "001_create_books",
        up: CREATE_BOOKS_TABLE,
    }]
}

/// Make sure the `books` table exists. Safe to call on every startup.
pub async fn ensure_schema(db: &Db) -> Result<(), DbError> {
    apply_migrations(db, "books", &migrations()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn book_serializes_all_four_fields() {
        let book = Book {
            id: 1,
            title: "A".into(),
            author: "B".into(),
            year: 1999,
        };
        assert_eq!(
            serde_json::to_value(&book).unwrap(),
            json!({"id": 1, "title": "A", "author": "B", "year": 1999})
        );
    }

    #[test]
    fn new_book_ignores_id_and_unknown_fields() {
        let book: NewBook = serde_json::from_value(json!({
            "id": 42,
            "title": "Dune",
            "author": "Frank Herbert",
            "year": 1965,
            "isbn": "978-0441013593"
        }))
        .unwrap();

        assert_eq!(
            book,
            NewBook {
                title: "Dune".into(),
                author: "Frank Herbert".into(),
                year: 1965,
            }
        );
    }

    #[test]
    fn new_book_defaults_missing_fields() {
        let book: NewBook = serde_json::from_str(r#"{"title": "Untitled"}"#).unwrap();
        assert_eq!(book.author, "");
        assert_eq!(book.year, 0);
    }

    #[test]
    fn year_has_no_range_check() {
        let book: NewBook = serde_json::from_str(r#"{"year": -500}"#).unwrap();
        assert_eq!(book.year, -500);
    }

    #[test]
    fn mistyped_field_is_rejected() {
        assert!(serde_json::from_str::<NewBook>(r#"{"year": "soon"}"#).is_err());
        assert!(serde_json::from_str::<NewBook>(r#"{"year": 1999.5}"#).is_err());
    }

    #[test]
    fn arrays_are_not_books() {
        assert!(serde_json::from_str::<NewBook>("[]").is_err());
        assert!(serde_json::from_str::<NewBook>(r#"["A", "B", 1999]"#).is_err());
        assert!(serde_json::from_str::<NewBook>(r#""A""#).is_err());
    }

    #[test]
    fn id_must_still_be_an_unsigned_integer() {
        assert!(serde_json::from_str::<NewBook>(r#"{"id": "x"}"#).is_err());
        assert!(serde_json::from_str::<NewBook>(r#"{"id": -1}"#).is_err());
        assert!(serde_json::from_str::<NewBook>(r#"{"id": null, "title": "A"}"#).is_ok());
    }

    #[test]
    fn null_fields_keep_zero_values() {
        let book: NewBook =
            serde_json::from_str(r#"{"title": null, "author": "B", "year": null}"#).unwrap();
        assert_eq!(
            book,
            NewBook {
                title: String::new(),
                author: "B".into(),
                year: 0,
            }
        );
    }

    #[test]
    fn null_does_not_clear_an_earlier_value() {
        let book: NewBook = serde_json::from_str(r#"{"title": "A", "title": null}"#).unwrap();
        assert_eq!(book.title, "A");
    }

    #[test]
    fn keys_match_ignoring_case() {
        let book: NewBook =
            serde_json::from_str(r#"{"Title": "Emma", "AUTHOR": "Austen", "Year": 1815}"#)
                .unwrap();
        assert_eq!(
            book,
            NewBook {
                title: "Emma".into(),
                author: "Austen".into(),
                year: 1815,
            }
        );
    }

    #[test]
    fn last_duplicate_key_wins() {
        let book: NewBook =
            serde_json::from_str(r#"{"title": "First", "Title": "Second", "year": 1, "year": 2}"#)
                .unwrap();
        assert_eq!(book.title, "Second");
        assert_eq!(book.year, 2);
    }

    #[test]
    fn books_migration_is_idempotent_sql() {
        let migrations = migrations();
        assert_eq!(migrations.len(), 1);
        assert!(migrations[0].up.contains("CREATE TABLE IF NOT EXISTS books"));
    }
}
