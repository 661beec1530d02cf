//! Scan cursors.
//!
//! A [`Cursor`] is a lazy, finite, single-pass sequence of scan results. It
//! holds the underlying scan resource until it is exhausted, explicitly
//! closed, or dropped, whichever comes first. Release runs exactly once.

use swapledger_types::Result;

type Items<T> = Box<dyn Iterator<Item = Result<T>> + Send>;
type Release = Box<dyn FnOnce() + Send>;

/// Single-pass scan handle with guaranteed release.
pub struct Cursor<T> {
    items: Items<T>,
    release: Option<Release>,
}

impl<T: Send + 'static> Cursor<T> {
    /// Wrap an iterator of fallible results.
    pub fn new<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Result<T>>,
        I::IntoIter: Send + 'static,
    {
        Self {
            items: Box::new(items.into_iter()),
            release: None,
        }
    }

    /// Wrap already-materialized results.
    #[must_use]
    pub fn from_vec(items: Vec<T>) -> Self {
        Self::new(items.into_iter().map(Ok))
    }

    /// An exhausted cursor.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Attach the callback that releases the underlying scan.
    #[must_use]
    pub fn on_release(mut self, release: impl FnOnce() + Send + 'static) -> Self {
        self.release = Some(Box::new(release));
        self
    }

    /// Keep only the items for which `keep` returns `true`. Errors are
    /// always passed through. The release obligation moves to the new cursor.
    #[must_use]
    pub fn filter<P>(mut self, mut keep: P) -> Self
    where
        P: FnMut(&T) -> bool + Send + 'static,
    {
        let items = std::mem::replace(&mut self.items, Box::new(std::iter::empty()));
        let release = self.release.take();
        Self {
            items: Box::new(items.filter(move |item| match item {
                Ok(value) => keep(value),
                Err(_) => true,
            })),
            release,
        }
    }

    /// Drain every remaining item, stopping at the first error. The scan is
    /// released on both paths.
    pub fn collect_all(mut self) -> Result<Vec<T>> {
        let mut out = Vec::new();
        for item in self.by_ref() {
            out.push(item?);
        }
        Ok(out)
    }
}

impl<T> Cursor<T> {
    /// Release the scan without draining it.
    pub fn close(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl<T> Iterator for Cursor<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.items.next();
        if next.is_none() {
            self.release_now();
        }
        next
    }
}

impl<T> Drop for Cursor<T> {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl<T> std::fmt::Debug for Cursor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("open", &self.release.is_some())
            .finish_non_exhaustive()
    }
}
