//! Site workflows that drive a browser to a list of search results.
//!
//! Each workflow follows the same pattern:
//!
//! 1. **Search**: open the site and submit the phrase through its own UI
//! 2. **Narrow**: apply the site's sort and filter controls
//! 3. **List**: return the result elements for the extraction engine
//!
//! # Supported Sources
//!
//! | Source | Module | Notes |
//! |--------|--------|-------|
//! | Los Angeles Times | [`latimes`] | Search, sort by newest, filter by topic |

pub mod latimes;
