use std::{future::Future, time::Duration};

/// Viewports at most this wide get the mobile layout
pub const DEFAULT_MOBILE_BREAKPOINT: u32 = 768;
/// Longest wait for the closing transition before the panel is hidden anyway
pub const TEARDOWN_DEADLINE: Duration = Duration::from_millis(350);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// Full-width panel over a backdrop mask, main sidebar collapsed
    Mobile,
    /// Slide-over next to the main sidebar, no mask
    Desktop,
}

impl LayoutMode {
    pub fn for_width(width_px: u32, breakpoint_px: u32) -> Self {
        if width_px <= breakpoint_px {
            LayoutMode::Mobile
        } else {
            LayoutMode::Desktop
        }
    }

    /// Class toggled on the panel to slide it in
    pub fn open_class(&self) -> &'static str {
        match self {
            LayoutMode::Mobile => "mobile-open",
            LayoutMode::Desktop => "open",
        }
    }
}

/// Handed out by [Overlay::close]; redeem it with [Overlay::finish_teardown] once settled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Teardown {
    generation: u64,
    pub deadline: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    Transitioned,
    TimedOut,
}

/// Waits for the visual transition to end, giving up after `deadline`
pub async fn settle<F>(transition_end: F, deadline: Duration) -> Settled
where
    F: Future<Output = ()>,
{
    match tokio::time::timeout(deadline, transition_end).await {
        Ok(()) => Settled::Transitioned,
        Err(_) => Settled::TimedOut,
    }
}

/// Visibility state of the settings overlay and the elements it affects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    breakpoint_px: u32,
    mode: LayoutMode,
    /// Panel takes part in layout at all
    displayed: bool,
    /// Slid in
    open: bool,
    mask_active: bool,
    sidebar_open: bool,
    generation: u64,
}

impl Default for Overlay {
    fn default() -> Self {
        Self::new(DEFAULT_MOBILE_BREAKPOINT)
    }
}

impl Overlay {
    pub fn new(breakpoint_px: u32) -> Self {
        Overlay {
            breakpoint_px,
            mode: LayoutMode::Desktop,
            displayed: false,
            open: false,
            mask_active: false,
            sidebar_open: false,
            generation: 0,
        }
    }

    /// Layout used by the last open or close
    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    /// Layout a viewport of `width_px` would get right now
    pub fn mode_for(&self, width_px: u32) -> LayoutMode {
        LayoutMode::for_width(width_px, self.breakpoint_px)
    }

    pub fn is_displayed(&self) -> bool {
        self.displayed
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_mask_active(&self) -> bool {
        self.mask_active
    }

    pub fn is_sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    /// Slides the main sidebar in or out, only meaningful on mobile
    pub fn set_sidebar_open(&mut self, open: bool) {
        self.sidebar_open = open;
    }

    pub fn open(&mut self, width_px: u32) {
        self.mode = LayoutMode::for_width(width_px, self.breakpoint_px);
        self.generation += 1;

        if self.mode == LayoutMode::Mobile {
            self.sidebar_open = false;
            self.mask_active = true;
        }
        self.displayed = true;
        self.open = true;

        tracing::debug!("settings overlay opened in {:?} layout", self.mode);
    }

    /// Slides the panel out. It stays displayed until the returned [Teardown] is finished.
    pub fn close(&mut self, width_px: u32) -> Teardown {
        self.mode = LayoutMode::for_width(width_px, self.breakpoint_px);
        self.open = false;
        // the mask may stem from a mobile open even if the viewport grew since
        self.mask_active = false;

        Teardown {
            generation: self.generation,
            deadline: TEARDOWN_DEADLINE,
        }
    }

    /// Hides the panel unless it was reopened after `teardown` was issued.
    /// Returns whether the panel got hidden.
    pub fn finish_teardown(&mut self, teardown: Teardown) -> bool {
        if self.open || teardown.generation != self.generation {
            return false;
        }

        self.displayed = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakpoint_is_inclusive() {
        assert_eq!(LayoutMode::for_width(768, 768), LayoutMode::Mobile);
        assert_eq!(LayoutMode::for_width(769, 768), LayoutMode::Desktop);
    }

    #[test]
    fn test_mobile_open_collapses_sidebar_and_masks() {
        let mut overlay = Overlay::default();
        overlay.set_sidebar_open(true);

        overlay.open(400);

        assert_eq!(overlay.mode(), LayoutMode::Mobile);
        assert!(overlay.is_displayed() && overlay.is_open());
        assert!(overlay.is_mask_active());
        assert!(!overlay.is_sidebar_open());
    }

    #[test]
    fn test_desktop_open_keeps_sidebar_without_mask() {
        let mut overlay = Overlay::default();
        overlay.set_sidebar_open(true);

        overlay.open(1280);

        assert_eq!(overlay.mode(), LayoutMode::Desktop);
        assert!(overlay.is_open());
        assert!(!overlay.is_mask_active());
        assert!(overlay.is_sidebar_open());
    }

    #[test]
    fn test_close_hides_only_after_teardown() {
        let mut overlay = Overlay::default();
        overlay.open(400);

        let teardown = overlay.close(400);

        assert!(!overlay.is_open());
        assert!(!overlay.is_mask_active());
        assert!(overlay.is_displayed());

        assert!(overlay.finish_teardown(teardown));
        assert!(!overlay.is_displayed());
    }

    #[test]
    fn test_close_after_growing_past_breakpoint_clears_mask() {
        let mut overlay = Overlay::default();
        overlay.open(400);

        let teardown = overlay.close(1280);
        assert!(overlay.finish_teardown(teardown));

        assert!(!overlay.is_displayed());
        assert!(!overlay.is_open());
        assert!(!overlay.is_mask_active());
    }

    #[test]
    fn test_reopen_cancels_pending_teardown() {
        let mut overlay = Overlay::default();
        overlay.open(1280);
        let stale = overlay.close(1280);

        overlay.open(1280);
        assert!(!overlay.finish_teardown(stale));
        assert!(overlay.is_displayed());

        // closing again after the reopen still leaves the stale token useless
        let fresh = overlay.close(1280);
        assert!(!overlay.finish_teardown(stale));
        assert!(overlay.finish_teardown(fresh));
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_on_transition_end() {
        let settled = settle(
            tokio::time::sleep(Duration::from_millis(200)),
            TEARDOWN_DEADLINE,
        )
        .await;

        assert_eq!(settled, Settled::Transitioned);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_falls_back_to_deadline() {
        let started = tokio::time::Instant::now();

        let settled = settle(std::future::pending(), TEARDOWN_DEADLINE).await;

        assert_eq!(settled, Settled::TimedOut);
        assert!(started.elapsed() >= TEARDOWN_DEADLINE);
    }
}
