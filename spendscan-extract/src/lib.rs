//! spendscan-extract: the external collaborators — AI CLI extraction,
//! page-image discovery, and PDF rasterization.

pub mod extractor;
pub mod pages;
pub mod prompts;
pub mod rasterize;

pub use extractor::{ExtractError, OpencodeExtractor, PageExtractor};
pub use pages::{PageImage, discover_pages};
pub use rasterize::rasterize_dir;
