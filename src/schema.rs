table! {
    notes (id) {
        id -> Varchar,
        content -> Text,
        iv -> Nullable<Varchar>,
        salt -> Nullable<Varchar>,
        is_encrypted -> Bool,
        created_at -> Timestamp,
        expires_at -> Nullable<Timestamp>,
        max_views -> Int4,
        view_count -> Int4,
        is_destroyed -> Bool,
    }
}
