//! Maps service errors to skycast_core::AppError for consistent user-facing messages.

mod forecast;

pub use forecast::{to_app_error, user_message};
