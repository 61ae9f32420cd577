pub mod client;
pub mod constants;
pub mod data;
pub mod error;
pub mod forms;
pub mod locations;
pub mod menu;
pub mod region;
pub mod session;
pub mod testimonials;
mod util;

pub use client::WebhookClient;
pub use data::SiteData;
pub use region::Region;
pub use util::default_http_client;
