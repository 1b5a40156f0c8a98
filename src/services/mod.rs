pub mod image;
pub use image::ImageService;

pub mod sitemap;
pub use sitemap::SitemapService;

pub mod useragent;
pub use useragent::{ClientInfo, UserAgentClassifier};
