//! Voucher claim landing page: per-visit page sessions, the polling
//! controller that moves them through the campaign phases, and the view
//! rendering served to the browser.

pub mod poller;
pub mod query;
pub mod registry;
pub mod render;
pub mod session;
pub mod view;

pub use poller::{PollingController, ScheduledTask};
pub use query::LandingQuery;
pub use registry::SessionRegistry;
pub use render::PageRenderer;
pub use session::{PageState, PromoSession, SessionSnapshot};
pub use view::PromoView;
