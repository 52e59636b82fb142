/// The page behind the intro, as far as scrolling is concerned.
pub trait ScrollHost {
    /// Current vertical scroll offset.
    fn scroll_offset(&self) -> f64;
    /// Pin the page at `offset` and stop it from scrolling.
    fn lock_scroll(&mut self, offset: f64);
    /// Make the page scrollable again.
    fn unlock_scroll(&mut self);
    fn scroll_to(&mut self, offset: f64);
}

/// In-memory page scroll state, for hosts whose page lives in the same
/// process (egui, terminal) and for tests.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PageScroll {
    pub offset: f64,
    pub locked: bool,
}

impl PageScroll {
    pub fn at(offset: f64) -> Self {
        Self {
            offset,
            locked: false,
        }
    }

    /// Apply a scroll delta unless locked.
    pub fn scroll_by(&mut self, delta: f64) {
        if !self.locked {
            self.offset = (self.offset + delta).max(0.0);
        }
    }
}

impl ScrollHost for PageScroll {
    fn scroll_offset(&self) -> f64 {
        self.offset
    }

    fn lock_scroll(&mut self, offset: f64) {
        self.locked = true;
        self.offset = offset;
    }

    fn unlock_scroll(&mut self) {
        self.locked = false;
    }

    fn scroll_to(&mut self, offset: f64) {
        self.offset = offset;
    }
}

impl<T: ScrollHost + ?Sized> ScrollHost for &mut T {
    fn scroll_offset(&self) -> f64 {
        (**self).scroll_offset()
    }

    fn lock_scroll(&mut self, offset: f64) {
        (**self).lock_scroll(offset);
    }

    fn unlock_scroll(&mut self) {
        (**self).unlock_scroll();
    }

    fn scroll_to(&mut self, offset: f64) {
        (**self).scroll_to(offset);
    }
}

/// Remembers where the page was when the lock engaged.
#[derive(Debug, Default)]
pub(crate) struct ScrollLock {
    saved: Option<f64>,
}

impl ScrollLock {
    pub(crate) fn engage(&mut self, host: &mut impl ScrollHost) {
        if self.saved.is_some() {
            return;
        }
        let offset = host.scroll_offset();
        host.lock_scroll(offset);
        self.saved = Some(offset);
    }

    pub(crate) fn release(&mut self, host: &mut impl ScrollHost) {
        if let Some(offset) = self.saved.take() {
            host.unlock_scroll();
            host.scroll_to(offset);
        }
    }

    pub(crate) fn is_engaged(&self) -> bool {
        self.saved.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locked_page_ignores_scrolling() {
        let mut page = PageScroll::at(120.0);
        let mut lock = ScrollLock::default();
        lock.engage(&mut page);
        page.scroll_by(500.0);
        assert_eq!(page.offset, 120.0);
        assert!(lock.is_engaged());
    }

    #[test]
    fn release_restores_offset() {
        let mut page = PageScroll::at(300.0);
        let mut lock = ScrollLock::default();
        lock.engage(&mut page);
        page.offset = 0.0;
        lock.release(&mut page);
        assert!(!page.locked);
        assert_eq!(page.offset, 300.0);
    }

    #[test]
    fn release_without_engage_is_a_no_op() {
        let mut page = PageScroll::at(42.0);
        let mut lock = ScrollLock::default();
        lock.release(&mut page);
        assert_eq!(page, PageScroll::at(42.0));
    }
}
