pub mod holdings_service;
pub mod profit_service;
pub mod scrape_proxy;
pub mod user_service;

pub use holdings_service::{ GmgnHoldingsClient, Holding, HoldingsSnapshot, HoldingsSource, WalletPage };
pub use scrape_proxy::ScrapeProxy;
pub use user_service::{ NewUser, UserStore };
