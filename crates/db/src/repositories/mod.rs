//! Repository layer.
//!
//! Each repository wraps a shared connection and maps store errors into
//! [`photoshare_common::AppError`].

mod comment;
mod photo;
mod rating;
mod tag;
mod user;

pub use comment::CommentRepository;
pub use photo::{NewPhoto, PhotoRepository};
pub use rating::RatingRepository;
pub use tag::TagRepository;
pub use user::{NewUser, UserRepository};
