//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When a
//! migration changes a table, update the matching block here (the
//! `diesel print-schema` command generates them from a live database).

diesel::table! {
    /// Registered accounts. Soft-deleted rows keep their email reserved.
    users (id) {
        id -> Uuid,
        email -> Varchar,
        password_hash -> Text,
        full_name -> Varchar,
        phone -> Nullable<Varchar>,
        avatar_url -> Nullable<Text>,
        role -> Varchar,
        email_verified -> Bool,
        banned_at -> Nullable<Timestamptz>,
        ban_reason -> Nullable<Text>,
        deleted_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Hashed one-time codes for verification and password reset.
    otp_challenges (id) {
        id -> Uuid,
        user_id -> Uuid,
        purpose -> Varchar,
        code_hash -> Varchar,
        expires_at -> Timestamptz,
        attempts -> Int4,
        consumed_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    amenities (id) {
        id -> Uuid,
        name -> Varchar,
        icon -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Facilities listed by owners, moderated by admins.
    venues (id) {
        id -> Uuid,
        owner_id -> Uuid,
        name -> Varchar,
        description -> Text,
        address -> Text,
        city -> Varchar,
        latitude -> Float8,
        longitude -> Float8,
        photos -> Array<Text>,
        status -> Varchar,
        rejection_reason -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    venue_amenities (venue_id, amenity_id) {
        venue_id -> Uuid,
        amenity_id -> Uuid,
    }
}

diesel::table! {
    /// Bookable units. Hours are local to the venue timezone.
    courts (id) {
        id -> Uuid,
        venue_id -> Uuid,
        name -> Varchar,
        sport -> Varchar,
        price_per_hour_minor -> Int8,
        open_hour -> Int2,
        close_hour -> Int2,
        active -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Owner-declared windows that cannot be booked.
    blocked_slots (id) {
        id -> Uuid,
        court_id -> Uuid,
        slot_date -> Date,
        start_hour -> Int2,
        end_hour -> Int2,
        reason -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    bookings (id) {
        id -> Uuid,
        user_id -> Uuid,
        court_id -> Uuid,
        venue_id -> Uuid,
        slot_date -> Date,
        start_hour -> Int2,
        end_hour -> Int2,
        total_minor -> Int8,
        status -> Varchar,
        cancellation_reason -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// One gateway order per booking.
    payments (id) {
        id -> Uuid,
        booking_id -> Uuid,
        gateway_order_id -> Varchar,
        gateway_payment_id -> Nullable<Varchar>,
        amount_minor -> Int8,
        currency -> Varchar,
        status -> Varchar,
        failure_reason -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    refunds (id) {
        id -> Uuid,
        payment_id -> Uuid,
        gateway_refund_id -> Nullable<Varchar>,
        amount_minor -> Int8,
        status -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// One review per author and venue.
    reviews (id) {
        id -> Uuid,
        user_id -> Uuid,
        venue_id -> Uuid,
        rating -> Int2,
        comment -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    notifications (id) {
        id -> Uuid,
        user_id -> Uuid,
        kind -> Varchar,
        title -> Varchar,
        message -> Text,
        read_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Web push endpoints stored for a delivery worker.
    push_subscriptions (id) {
        id -> Uuid,
        user_id -> Uuid,
        endpoint -> Text,
        p256dh -> Text,
        auth -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    reports (id) {
        id -> Uuid,
        reporter_id -> Uuid,
        target_kind -> Varchar,
        target_id -> Uuid,
        reason -> Varchar,
        description -> Text,
        status -> Varchar,
        resolution_note -> Nullable<Text>,
        resolved_by -> Nullable<Uuid>,
        created_at -> Timestamptz,
        resolved_at -> Nullable<Timestamptz>,
    }
}

diesel::joinable!(otp_challenges -> users (user_id));
diesel::joinable!(venues -> users (owner_id));
diesel::joinable!(venue_amenities -> venues (venue_id));
diesel::joinable!(venue_amenities -> amenities (amenity_id));
diesel::joinable!(courts -> venues (venue_id));
diesel::joinable!(blocked_slots -> courts (court_id));
diesel::joinable!(bookings -> courts (court_id));
diesel::joinable!(bookings -> venues (venue_id));
diesel::joinable!(payments -> bookings (booking_id));
diesel::joinable!(refunds -> payments (payment_id));
diesel::joinable!(reviews -> users (user_id));
diesel::joinable!(notifications -> users (user_id));
diesel::joinable!(push_subscriptions -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    otp_challenges,
    amenities,
    venues,
    venue_amenities,
    courts,
    blocked_slots,
    bookings,
    payments,
    refunds,
    reviews,
    notifications,
    push_subscriptions,
    reports,
);
