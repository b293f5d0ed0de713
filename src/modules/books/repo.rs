//! Book repository.
//!
//! Ids arrive as path text and are cast by PostgreSQL (`$1::bigint`), so a
//! non-numeric id fails inside the database like any other query error.

use bookshelf_db::{Db, DbError};

use super::models::{Book, NewBook};

const BOOK_COLUMNS: &str = "id, COALESCE(title, '') AS title, \
     COALESCE(author, '') AS author, COALESCE(year, 0) AS year";

pub struct BookRepo<'a> {
    db: &'a Db,
}

impl<'a> BookRepo<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// Insert a row and return it with its assigned id.
    pub async fn create(&self, book: &NewBook) -> Result<Book, DbError> {
        let sql = format!(
            "INSERT INTO books (title, author, year) VALUES ($1, $2, $3) RETURNING {BOOK_COLUMNS}"
        );
        let book = sqlx::query_as::<_, Book>(&sql)
            .bind(&book.title)
            .bind(&book.author)
            .bind(book.year)
            .fetch_one(self.db)
            .await?;

        Ok(book)
    }

    /// Every row, in no particular order.
    pub async fn list(&self) -> Result<Vec<Book>, DbError> {
        let sql = format!("SELECT {BOOK_COLUMNS} FROM books");
        let books = sqlx::query_as::<_, Book>(&sql).fetch_all(self.db).await?;

        Ok(books)
    }

    pub async fn find(&self, id: &str) -> Result<Option<Book>, DbError> {
        let sql = format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = $1::bigint LIMIT 1");
        let book = sqlx::query_as::<_, Book>(&sql)
            .bind(id)
            .fetch_optional(self.db)
            .await?;

        Ok(book)
    }

    /// Delete by primary key, returning the number of rows removed.
    pub async fn delete(&self, id: &str) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1::bigint")
            .bind(id)
            .execute(self.db)
            .await?;

        Ok(result.rows_affected())
    }
}
