mod crawler;
pub mod web;

pub use crawler::{Fetcher, Processor};
pub use web::WebDriverFetcher;
