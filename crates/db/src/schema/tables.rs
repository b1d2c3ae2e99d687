//! Table definitions for the photo-sharing schema.

use sea_orm_migration::prelude::*;

use super::registry::{SchemaError, SchemaRegistry, TableSpec};

/// Column length limits enforced by `varchar(n)`.
#[allow(missing_docs)]
pub mod limits {
    pub const TAG_NAME: u32 = 30;
    pub const USER_NAME: u32 = 30;
    pub const USERNAME: u32 = 50;
    pub const EMAIL: u32 = 150;
    pub const PASSWORD: u32 = 255;
    pub const TOKEN: u32 = 255;
    pub const AVATAR_PATH: u32 = 250;
    pub const PHOTO_PATH: u32 = 250;
    pub const TRANSFORM_PATH: u32 = 250;
    pub const PHOTO_DESCRIPTION: u32 = 250;
    pub const COMMENT: u32 = 255;
}

impl SchemaRegistry {
    /// The full photoshare schema, registered parents first.
    pub fn photoshare() -> Result<Self, SchemaError> {
        let mut registry = Self::new();
        registry.register_enum(Role::Table, [Role::Admin, Role::Moderator, Role::User])?;
        registry.register(tags())?;
        registry.register(users())?;
        registry.register(photos())?;
        registry.register(comments())?;
        registry.register(photo_tags())?;
        registry.register(ratings())?;
        Ok(registry)
    }
}

fn serial_id<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn required(column: impl IntoIden, len: u32) -> ColumnDef {
    ColumnDef::new(column).string_len(len).not_null().to_owned()
}

fn optional(column: impl IntoIden, len: u32) -> ColumnDef {
    ColumnDef::new(column).string_len(len).null().to_owned()
}

fn tags() -> TableSpec {
    TableSpec::new(Tags::Table)
        .column(serial_id(Tags::Id))
        .column(required(Tags::Name, limits::TAG_NAME).unique_key().to_owned())
}

fn users() -> TableSpec {
    TableSpec::new(Users::Table)
        .column(
            ColumnDef::new(Users::Id)
                .uuid()
                .not_null()
                .default(Expr::cust("gen_random_uuid()"))
                .primary_key()
                .to_owned(),
        )
        .column(optional(Users::Name, limits::USER_NAME))
        .column(required(Users::Username, limits::USERNAME).unique_key().to_owned())
        .column(required(Users::Email, limits::EMAIL).unique_key().to_owned())
        .column(required(Users::Password, limits::PASSWORD))
        .column(optional(Users::RefreshToken, limits::TOKEN))
        .column(
            ColumnDef::new(Users::Role)
                .enumeration(Role::Table, [Role::Admin, Role::Moderator, Role::User])
                .not_null()
                .default("user")
                .to_owned(),
        )
        .column(
            ColumnDef::new(Users::Confirmed)
                .boolean()
                .not_null()
                .default(false)
                .to_owned(),
        )
        .column(
            ColumnDef::new(Users::Banned)
                .boolean()
                .not_null()
                .default(false)
                .to_owned(),
        )
        .column(ColumnDef::new(Users::BannedAt).date().null().to_owned())
        .column(optional(Users::Avatar, limits::AVATAR_PATH))
        .with_timestamps()
}

fn photos() -> TableSpec {
    TableSpec::new(Photos::Table)
        .column(serial_id(Photos::Id))
        .column(required(Photos::Path, limits::PHOTO_PATH))
        .column(required(Photos::Description, limits::PHOTO_DESCRIPTION))
        .column(optional(Photos::PathTransform, limits::TRANSFORM_PATH))
        .column(ColumnDef::new(Photos::UserId).uuid().not_null().to_owned())
        .column(required(Photos::PublicPhotoId, limits::PHOTO_PATH))
        .with_timestamps()
        .cascade_to(Photos::UserId, Users::Table, Users::Id)
}

fn comments() -> TableSpec {
    TableSpec::new(Comments::Table)
        .column(serial_id(Comments::Id))
        .column(required(Comments::Opinion, limits::COMMENT))
        .column(ColumnDef::new(Comments::UserId).uuid().not_null().to_owned())
        .column(ColumnDef::new(Comments::PhotoId).integer().not_null().to_owned())
        .with_timestamps()
        .cascade_to(Comments::PhotoId, Photos::Table, Photos::Id)
        .cascade_to(Comments::UserId, Users::Table, Users::Id)
}

// TODO: decide whether (photo_id, tag_id) should be unique; duplicates are
// currently accepted and callers dedupe.
fn photo_tags() -> TableSpec {
    TableSpec::new(PhotoM2mTag::Table)
        .column(serial_id(PhotoM2mTag::Id))
        .column(ColumnDef::new(PhotoM2mTag::PhotoId).integer().null().to_owned())
        .column(ColumnDef::new(PhotoM2mTag::TagId).integer().null().to_owned())
        .cascade_to(PhotoM2mTag::PhotoId, Photos::Table, Photos::Id)
        .cascade_to(PhotoM2mTag::TagId, Tags::Table, Tags::Id)
}

fn ratings() -> TableSpec {
    TableSpec::new(Ratings::Table)
        .column(serial_id(Ratings::Id))
        .column(ColumnDef::new(Ratings::Rating).integer().not_null().to_owned())
        .column(ColumnDef::new(Ratings::PhotoId).integer().not_null().to_owned())
        .column(ColumnDef::new(Ratings::UserId).uuid().not_null().to_owned())
        .with_timestamps()
        .cascade_to(Ratings::PhotoId, Photos::Table, Photos::Id)
        .cascade_to(Ratings::UserId, Users::Table, Users::Id)
}

#[derive(Iden)]
enum Role {
    Table,
    Admin,
    Moderator,
    User,
}

#[derive(Iden)]
enum Tags {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Name,
    Username,
    Email,
    Password,
    RefreshToken,
    Role,
    Confirmed,
    Banned,
    BannedAt,
    Avatar,
}

#[derive(Iden)]
enum Photos {
    Table,
    Id,
    Path,
    Description,
    PathTransform,
    UserId,
    PublicPhotoId,
}

#[derive(Iden)]
enum Comments {
    Table,
    Id,
    Opinion,
    UserId,
    PhotoId,
}

#[derive(Iden)]
enum PhotoM2mTag {
    #[iden = "photo_m2m_tag"]
    Table,
    Id,
    PhotoId,
    TagId,
}

#[derive(Iden)]
enum Ratings {
    Table,
    Id,
    Rating,
    PhotoId,
    UserId,
}
