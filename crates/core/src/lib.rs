pub mod clock;
pub mod config;
pub mod error;
pub mod phase;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::AppConfig;
pub use error::{PromoError, PromoResult};
pub use phase::derive_phase;
pub use types::{CampaignWindow, ErrorCode, NoticeMessage, PromoPhase};
