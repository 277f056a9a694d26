//! CLI actions: read input, drive `AppState`, print results.

mod delete;
mod health;
mod list;
mod query;
mod upload;

pub use delete::delete;
pub use health::health;
pub use list::list;
pub use query::query;
pub use upload::upload;
