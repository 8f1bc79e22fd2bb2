pub mod analytics_service;
pub mod analytics_service_impl;
pub use analytics_service::{
    ActivityEntry, AnalyticsError, AnalyticsService, EventInput, PlanBreakdown, UserSummary,
};
pub use analytics_service_impl::SeaOrmAnalyticsService;

pub mod user_admin_service;
pub mod user_admin_service_impl;
pub use user_admin_service::{
    Pagination, StatusChange, UserAdminError, UserAdminService, UserListFilter, UserPage,
};
pub use user_admin_service_impl::SeaOrmUserAdminService;

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, CurrentUser, LoginResult};
pub use auth_service_impl::SeaOrmAuthService;

pub mod retention;
pub use retention::RetentionService;
