pub mod prelude;

pub mod analytics_events;
pub mod users;
