#![forbid(unsafe_code)]

pub mod cli;
pub mod collect;
pub mod crawl;
pub mod export;
pub mod extract;
pub mod fetch;
pub mod formats;
pub mod html;
pub mod landing;
pub mod logging;
pub mod merge;
pub mod paginate;
pub mod sql;
