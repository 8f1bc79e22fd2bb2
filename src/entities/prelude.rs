pub use super::analytics_events::Entity as AnalyticsEvents;
pub use super::users::Entity as Users;
