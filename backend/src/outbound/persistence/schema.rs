//! Diesel table definitions for the storefront schema.
//!
//! Must match `migrations/` exactly; regenerate with `diesel print-schema`
//! after changing a migration.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Int4,
        name -> Text,
        /// Stored lowercase; unique.
        email -> Text,
        /// Argon2 PHC string.
        password_hash -> Text,
        /// `user` or `admin`.
        role -> Text,
        is_active -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Purchasable booking codes.
    catalogue_items (id) {
        id -> Int4,
        title -> Text,
        booking_code -> Text,
        price -> Numeric,
        league -> Text,
        description -> Text,
        created_at -> Timestamptz,
        /// Set when an admin deletes the item; order lines keep the row.
        retired_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Staged codes awaiting curation.
    recovery_items (id) {
        id -> Int4,
        title -> Text,
        booking_code -> Text,
        price -> Numeric,
        league -> Text,
        description -> Text,
        approved -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Committed purchases, one per payment reference.
    orders (id) {
        id -> Int4,
        user_id -> Int4,
        total -> Numeric,
        payment_reference -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Cart lines belonging to an order.
    order_items (id) {
        id -> Int4,
        order_id -> Int4,
        catalogue_item_id -> Int4,
        quantity -> Int4,
    }
}

diesel::joinable!(orders -> users (user_id));
diesel::joinable!(order_items -> orders (order_id));
diesel::joinable!(order_items -> catalogue_items (catalogue_item_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    catalogue_items,
    recovery_items,
    orders,
    order_items,
);
