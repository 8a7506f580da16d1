//! Report generation.
//!
//! # Submodules
//!
//! - [`xlsx`]: writes the scraped articles to a single-sheet workbook
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── news_data.xlsx      # the report, replaced on every run
//! ├── article_1.jpeg      # pictures, 1-based result position
//! ├── article_2.jpeg
//! └── la_times.log        # run log
//! ```

pub mod xlsx;
