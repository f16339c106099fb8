//! The Store Handle / Config component: the single place a caller
//! configures where a persistent store lives and what page size its
//! queries default to.

use std::path::{Path, PathBuf};

use crate::query::DEFAULT_PAGE_SIZE;

/// Configuration used when opening a persistent [`crate::Graph`].
///
/// `Options` owns exactly two things: the on-disk path and the default
/// query page size. Environment variables and config files remain a
/// collaborator's concern, not this crate's.
#[derive(Debug, Clone)]
pub struct Options {
    path: PathBuf,
    default_page_size: usize,
}

impl Options {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Options {
            path: path.as_ref().to_owned(),
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_default_page_size(mut self, default_page_size: usize) -> Self {
        self.default_page_size = default_page_size;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn default_page_size(&self) -> usize {
        self.default_page_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_page_size_until_overridden() {
        let options = Options::new("/tmp/hexastore");
        assert_eq!(options.default_page_size(), DEFAULT_PAGE_SIZE);
        let options = options.with_default_page_size(50);
        assert_eq!(options.default_page_size(), 50);
    }
}
