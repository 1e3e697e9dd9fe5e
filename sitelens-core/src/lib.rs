pub mod detail;
pub mod form;
pub mod format;
pub mod notify;
pub mod query;
pub mod selection;
pub mod store;

pub use detail::{DetailView, HeadingBar, LinkSlice, heading_chart, link_chart};
pub use form::{SubmissionForm, validate_url};
pub use notify::{Level, Notification, Notifications};
pub use query::{Pagination, QueryState, total_pages};
pub use selection::Selection;
pub use store::{ListTicket, Store};
