//! Wallet provider collaborator: the hosted service that owns campaigns,
//! vouchers and NFT issuance.

pub mod error;
pub mod http;
pub mod memory;
pub mod provider;

pub use error::WalletError;
pub use http::HttpWalletProvider;
pub use memory::InMemoryWalletProvider;
pub use provider::{CampaignDate, CampaignInfo, WalletProvider};
