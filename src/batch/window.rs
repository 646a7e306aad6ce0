//! # Batch window thresholds.
//!
//! [`BatchWindow`] controls when an accumulating window closes and flushes:
//! on reaching an item count, on an interval elapsing, or on whichever of the
//! two triggers first.
//!
//! ## Sentinel values
//! - `max_items = 0` → no count threshold (interval-only window)
//! - `interval = None` → no time threshold (count-only window)
//!
//! A window's interval is armed when the window's **first item** arrives, so
//! an idle consumer never flushes empty batches.

use std::time::Duration;

/// Flush thresholds for one batching consumer.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use hubcast::BatchWindow;
///
/// // Flush every 500 items, or 2 seconds after a window opens.
/// let window = BatchWindow::items_or_interval(500, Duration::from_secs(2));
/// assert_eq!(window.count_threshold(), Some(500));
///
/// // Defaults match the classic 1000 items / 1 second window.
/// let window = BatchWindow::default();
/// assert_eq!(window.count_threshold(), Some(1000));
/// assert_eq!(window.interval, Some(Duration::from_secs(1)));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct BatchWindow {
    /// Item-count threshold; `0` = no count threshold.
    pub max_items: usize,
    /// Time threshold, measured from the window's first item; `None` = no
    /// time threshold.
    pub interval: Option<Duration>,
}

impl Default for BatchWindow {
    /// 1000 items or 1 second, whichever triggers first.
    fn default() -> Self {
        Self {
            max_items: 1000,
            interval: Some(Duration::from_secs(1)),
        }
    }
}

impl BatchWindow {
    /// Count-only window: flush every `n` items (minimum 1).
    pub fn items(n: usize) -> Self {
        Self {
            max_items: n.max(1),
            interval: None,
        }
    }

    /// Interval-only window: flush whatever accumulated once `interval`
    /// elapses after a window opens.
    pub fn interval(interval: Duration) -> Self {
        Self {
            max_items: 0,
            interval: Some(interval),
        }
    }

    /// Both thresholds; whichever triggers first flushes the window.
    pub fn items_or_interval(n: usize, interval: Duration) -> Self {
        Self {
            max_items: n.max(1),
            interval: Some(interval),
        }
    }

    /// Returns the count threshold as an `Option` (sentinel-free).
    #[inline]
    pub fn count_threshold(&self) -> Option<usize> {
        if self.max_items == 0 {
            None
        } else {
            Some(self.max_items)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_the_right_thresholds() {
        let count_only = BatchWindow::items(100);
        assert_eq!(count_only.count_threshold(), Some(100));
        assert!(count_only.interval.is_none());

        let interval_only = BatchWindow::interval(Duration::from_millis(50));
        assert_eq!(interval_only.count_threshold(), None);
        assert_eq!(interval_only.interval, Some(Duration::from_millis(50)));

        let both = BatchWindow::items_or_interval(10, Duration::from_secs(1));
        assert_eq!(both.count_threshold(), Some(10));
        assert!(both.interval.is_some());
    }

    #[test]
    fn zero_item_count_is_clamped() {
        assert_eq!(BatchWindow::items(0).count_threshold(), Some(1));
        assert_eq!(
            BatchWindow::items_or_interval(0, Duration::from_secs(1)).count_threshold(),
            Some(1)
        );
    }
}
