//! Database entities.
//!
//! One module per table. Relations are declared from the foreign keys; the
//! reverse side of a relation is a query, never a cached collection.

#![allow(missing_docs)]

pub mod comment;
pub mod photo;
pub mod photo_tag;
pub mod rating;
pub mod tag;
pub mod user;

pub use comment::Entity as Comment;
pub use photo::Entity as Photo;
pub use photo_tag::Entity as PhotoTag;
pub use rating::Entity as Rating;
pub use tag::Entity as Tag;
pub use user::{Entity as User, Role};
