/// User roles the analytics and plan-mapping logic understands. Anything
/// else still counts toward totals but never lands in a plan bucket.
pub const RECOGNIZED_ROLES: &[&str] = &["customer", "admin", "driver"];

/// Event types the activity feed surfaces.
pub const ACTIVITY_EVENT_TYPES: &[&str] = &["user_registered", "login", "purchase"];

/// Event types the ingestion endpoint accepts.
pub const INGEST_EVENT_TYPES: &[&str] = &[
    "user_registered",
    "login",
    "purchase",
    "page_view",
    "cart_updated",
];

pub mod windows {

    /// Window for "new users" and the activity feed.
    pub const NEW_USER_DAYS: i64 = 7;

    /// Window for "active users" (last login).
    pub const ACTIVE_USER_DAYS: i64 = 30;
}

pub mod limits {

    /// The activity feed is a fixed-size widget, not a scrollable list.
    pub const RECENT_ACTIVITY: u64 = 10;

    pub const DEFAULT_PAGE_SIZE: u64 = 10;

    pub const MAX_PAGE_SIZE: u64 = 100;
}
