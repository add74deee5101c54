//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations, which are managed
//! outside this workspace. `diesel print-schema` against a migrated database
//! regenerates them.

diesel::table! {
    /// CMS accounts.
    ///
    /// `email` carries a unique index. `role` holds `admin`, `editor`, or
    /// `user`.
    users (id) {
        id -> Uuid,
        email -> Varchar,
        name -> Varchar,
        /// Argon2 PHC string. Never selected outside credential checks.
        password_hash -> Varchar,
        role -> Varchar,
        avatar -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Portfolio projects. `slug` carries a unique index.
    projects (id) {
        id -> Uuid,
        title -> Varchar,
        slug -> Varchar,
        summary -> Text,
        content -> Text,
        /// `draft` or `published`.
        status -> Varchar,
        featured -> Bool,
        cover_image -> Nullable<Varchar>,
        tags -> Array<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Key/value site settings with JSON values.
    settings (key) {
        key -> Varchar,
        value -> Jsonb,
        updated_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, projects, settings);
