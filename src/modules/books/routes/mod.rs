//! HTTP handlers for the books module.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use bookshelf_db::Db;
use bookshelf_http::AppError;

use super::models::{BookResponse, BooksResponse, MessageResponse, NewBook};
use super::repo::BookRepo;

/// Routes mounted under `/api`.
pub fn router(db: Db) -> Router {
    Router::new()
        .route("/create_books", post(create_book))
        .route("/get_all_books", get(get_all_books))
        .route("/get_book/{id}", get(get_book_by_id))
        .route("/delete_book/{id}", delete(delete_book))
        .with_state(db)
}

/// POST /api/create_books
pub async fn create_book(
    State(db): State<Db>,
    payload: Result<Json<NewBook>, JsonRejection>,
) -> Result<Json<BookResponse>, AppError> {
    let Json(new_book) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "create_books body rejected");
        AppError::unprocessable("Cannot parse JSON")
    })?;

    let book = BookRepo::new(&db).create(&new_book).await.map_err(|error| {
        tracing::warn!(%error, "failed to insert book");
        AppError::bad_request("Cannot create book")
    })?;

    tracing::info!(book_id = book.id, "book created");
    Ok(Json(BookResponse {
        message: "Book created successfully",
        book,
    }))
}

/// GET /api/get_all_books
pub async fn get_all_books(State(db): State<Db>) -> Result<Json<BooksResponse>, AppError> {
    let books = BookRepo::new(&db).list().await.map_err(|error| {
        tracing::warn!(%error, "failed to list books");
        AppError::bad_request("Cannot get books")
    })?;

    Ok(Json(BooksResponse {
        message: "Books fetched successfully",
        books,
    }))
}

/// GET /api/get_book/{id}
///
/// A missing row and a failed query both answer 400 "Cannot find book".
pub async fn get_book_by_id(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<BookResponse>, AppError> {
    if id.is_empty() {
        return Err(AppError::bad_request("ID is required"));
    }

    let book = match BookRepo::new(&db).find(&id).await {
        Ok(Some(book)) => book,
        Ok(None) => {
            tracing::debug!(book_id = %id, "book not found");
            return Err(AppError::bad_request("Cannot find book"));
        }
        Err(error) => {
            tracing::warn!(book_id = %id, %error, "failed to fetch book");
            return Err(AppError::bad_request("Cannot find book"));
        }
    };

    Ok(Json(BookResponse {
        message: "Book fetched successfully",
        book,
    }))
}

/// DELETE /api/delete_book/{id}
///
/// Deleting an id with no row still succeeds.
pub async fn delete_book(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    if id.is_empty() {
        return Err(AppError::bad_request("ID is required"));
    }

    let removed = BookRepo::new(&db).delete(&id).await.map_err(|error| {
        tracing::warn!(book_id = %id, %error, "failed to delete book");
        AppError::bad_request("Cannot delete book")
    })?;

    tracing::info!(book_id = %id, removed, "book delete processed");
    Ok(Json(MessageResponse {
        message: "Book deleted successfully",
    }))
}
