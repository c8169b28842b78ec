//! Configuration module

mod site;

pub use site::ColorMode;
pub use site::CopyButtonConfig;
pub use site::CopyVisibility;
pub use site::HighlightConfig;
pub use site::ListingConfig;
pub use site::ListingSource;
pub use site::SiteConfig;
