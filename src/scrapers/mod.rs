//! News source scrapers.
//!
//! A scraper performs two steps:
//!
//! 1. **Fetching**: one GET for the listing page, failing on anything but `200 OK`
//! 2. **Extracting**: turn the page markup into [`crate::models::NewsEntry`] values
//!
//! | Source | Module | Method |
//! |--------|--------|--------|
//! | P2P Empire | [`p2pempire`] | HTML scraping of `/en/newsfeed` |

pub mod p2pempire;
