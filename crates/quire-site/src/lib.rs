//! Page tree model for Quire.
//!
//! This crate provides:
//! - [`PageTree`]: directory discovery into an arena of [`Page`] nodes
//! - [`Asset`]: media and document files attached to pages
//! - [`VirtualPageProps`] and [`PageTree::add_virtual_page`] for runtime pages
//! - [`view`]: JSON views handed to templates
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use quire_config::Config;
//! use quire_site::{PageTree, SiteOptions, VirtualPageProps};
//!
//! let config = Config::default_with_base(Path::new("site"));
//! let Some(mut tree) = PageTree::from_directory(SiteOptions::from_config(&config))? else {
//!     return Ok(());
//! };
//!
//! let root = tree.root();
//! tree.add_virtual_page(root, VirtualPageProps::new("tags", "tags").with_index(9));
//!
//! if let Some(about) = tree.find_page_by_url("/about", None) {
//!     println!("{}", tree.page(about).url());
//! }
//! # Ok(())
//! # }
//! ```

mod asset;
mod error;
mod item;
pub mod naming;
pub mod natural;
mod options;
mod page;
mod scanner;
mod tree;
pub mod view;
mod virtual_page;

pub use asset::{Asset, AssetCategory, AssetKind};
pub use error::SiteError;
pub use item::{Record, camel_case, parse_record, read_record};
pub use options::{Permalink, SiteOptions};
pub use page::{Page, PageId, PageKind};
pub use tree::{PageRef, PageTree};
pub use virtual_page::VirtualPageProps;

#[cfg(test)]
pub(crate) mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    /// Formatted log lines captured by a thread-local subscriber.
    #[derive(Clone, Default)]
    pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        pub(crate) fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + 'static {
            let logs = self.clone();
            tracing_subscriber::fmt()
                .with_writer(move || logs.clone())
                .with_ansi(false)
                .with_max_level(tracing::Level::DEBUG)
                .finish()
        }

        pub(crate) fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}
