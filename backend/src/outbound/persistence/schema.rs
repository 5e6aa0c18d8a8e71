//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// One row per successful deal claim. Rows are never updated or deleted.
    claimed_deals (id) {
        id -> Uuid,
        /// Identity provider user id.
        user_id -> Uuid,
        user_email -> Varchar,
        restaurant_id -> Varchar,
        restaurant_name -> Varchar,
        deal_title -> Varchar,
        deal_description -> Text,
        confirmation_code -> Varchar,
        expires_at -> Timestamptz,
        claimed_at -> Timestamptz,
    }
}

diesel::table! {
    /// Newsletter subscribers, one row per normalised email.
    newsletter_subscriptions (email) {
        email -> Varchar,
        subscribed_at -> Timestamptz,
    }
}
