//! Query scheduler: converts high-frequency viewport and input events into
//! a bounded rate of backend calls.
//!
//! Four independent debounce channels exist. Timers never preserve ordering
//! across channels, and the transport does not preserve response ordering
//! either; callers must check [`QueryScheduler::is_current`] before
//! applying a response.

use std::time::Instant;

use crate::debounce::DebounceChannel;
use crate::tuning::SyncTuning;

/// Logical query channels, each with its own debounce timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Bulk marker-projection fetch for the visible rectangle.
    Markers,
    /// Sidebar list fetch for the visible rectangle.
    List,
    /// Free-text name search.
    NameSearch,
    /// Free-text region search.
    RegionSearch,
}

#[derive(Debug, Default)]
pub struct QueryScheduler {
    markers: DebounceChannel,
    list: DebounceChannel,
    name: DebounceChannel,
    region: DebounceChannel,
}

impl QueryScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the bounds-driven channels (markers + list) after a drag
    /// settles. Uses the short settle window.
    pub fn arm_bounds(&mut self, now: Instant, tuning: &SyncTuning) {
        self.markers.arm(now, tuning.bounds_settle);
        self.list.arm(now, tuning.bounds_settle);
    }

    /// Arms the bounds-driven channels with the full debounce window, for
    /// center/zoom events that arrive faster than bounds settle.
    pub fn arm_nearby(&mut self, now: Instant, tuning: &SyncTuning) {
        self.markers.arm(now, tuning.debounce);
        self.list.arm(now, tuning.debounce);
    }

    /// Arms the name-search channel and disarms the region channel
    /// (mutually exclusive query state).
    pub fn arm_name_search(&mut self, now: Instant, tuning: &SyncTuning) {
        self.region.cancel();
        self.name.arm(now, tuning.debounce);
    }

    /// Arms the region-search channel and disarms the name channel.
    pub fn arm_region_search(&mut self, now: Instant, tuning: &SyncTuning) {
        self.name.cancel();
        self.region.arm(now, tuning.debounce);
    }

    /// Disarms the bounds-driven channels and invalidates anything they
    /// have in flight. Used when zoom drops below the fetch threshold.
    pub fn cancel_bounds(&mut self) {
        self.markers.cancel();
        self.list.cancel();
    }

    /// Disarms both search channels.
    pub fn cancel_searches(&mut self) {
        self.name.cancel();
        self.region.cancel();
    }

    /// Returns every channel whose deadline has passed, paired with the
    /// generation to attach to the request. Each fires at most once per arm.
    pub fn due(&mut self, now: Instant) -> Vec<(Channel, u64)> {
        let mut fired = Vec::new();
        if let Some(generation) = self.markers.fire(now) {
            fired.push((Channel::Markers, generation));
        }
        if let Some(generation) = self.list.fire(now) {
            fired.push((Channel::List, generation));
        }
        if let Some(generation) = self.name.fire(now) {
            fired.push((Channel::NameSearch, generation));
        }
        if let Some(generation) = self.region.fire(now) {
            fired.push((Channel::RegionSearch, generation));
        }
        fired
    }

    /// `true` if `generation` is still the latest issued on `channel`.
    #[must_use]
    pub fn is_current(&self, channel: Channel, generation: u64) -> bool {
        self.channel(channel).is_current(generation)
    }

    /// Issues a request on `channel` immediately, bypassing its debounce
    /// window. Used by the empty-search fallback to the nearby fetch.
    pub fn issue(&mut self, channel: Channel) -> u64 {
        self.channel_mut(channel).issue()
    }

    /// Earliest pending deadline across all channels, for driving a timer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        [&self.markers, &self.list, &self.name, &self.region]
            .into_iter()
            .filter_map(DebounceChannel::deadline)
            .min()
    }

    fn channel(&self, channel: Channel) -> &DebounceChannel {
        match channel {
            Channel::Markers => &self.markers,
            Channel::List => &self.list,
            Channel::NameSearch => &self.name,
            Channel::RegionSearch => &self.region,
        }
    }

    fn channel_mut(&mut self, channel: Channel) -> &mut DebounceChannel {
        match channel {
            Channel::Markers => &mut self.markers,
            Channel::List => &mut self.list,
            Channel::NameSearch => &mut self.name,
            Channel::RegionSearch => &mut self.region,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn tuning() -> SyncTuning {
        SyncTuning::default()
    }

    #[test]
    fn bounds_channels_fire_together_after_settle() {
        let t0 = Instant::now();
        let mut s = QueryScheduler::new();
        s.arm_bounds(t0, &tuning());
        assert!(s.due(t0).is_empty());
        let fired = s.due(t0 + Duration::from_millis(100));
        let channels: Vec<Channel> = fired.iter().map(|(c, _)| *c).collect();
        assert_eq!(channels, vec![Channel::Markers, Channel::List]);
    }

    #[test]
    fn rearming_one_channel_leaves_others_alone() {
        let t0 = Instant::now();
        let mut s = QueryScheduler::new();
        s.arm_bounds(t0, &tuning());
        s.arm_name_search(t0 + Duration::from_millis(50), &tuning());
        // Bounds channels still fire on their original settle deadline.
        let fired = s.due(t0 + Duration::from_millis(100));
        assert_eq!(fired.len(), 2);
        // Name search fires later, on its own timer.
        let fired = s.due(t0 + Duration::from_millis(550));
        assert_eq!(fired, vec![(Channel::NameSearch, 1)]);
    }

    #[test]
    fn name_and_region_searches_are_mutually_exclusive() {
        let t0 = Instant::now();
        let mut s = QueryScheduler::new();
        s.arm_name_search(t0, &tuning());
        s.arm_region_search(t0 + Duration::from_millis(10), &tuning());
        let fired = s.due(t0 + Duration::from_secs(1));
        assert_eq!(fired.len(), 1);
        assert!(matches!(fired[0], (Channel::RegionSearch, _)));
    }

    #[test]
    fn cancelled_bounds_generation_is_stale() {
        let t0 = Instant::now();
        let mut s = QueryScheduler::new();
        s.arm_bounds(t0, &tuning());
        let fired = s.due(t0 + Duration::from_millis(100));
        let (_, marker_generation) = fired[0];
        assert!(s.is_current(Channel::Markers, marker_generation));
        s.arm_bounds(t0 + Duration::from_millis(200), &tuning());
        s.cancel_bounds();
        assert!(!s.is_current(Channel::Markers, marker_generation));
    }

    #[test]
    fn next_deadline_is_the_minimum() {
        let t0 = Instant::now();
        let mut s = QueryScheduler::new();
        s.arm_name_search(t0, &tuning());
        s.arm_bounds(t0, &tuning());
        let deadline = s.next_deadline().unwrap();
        assert_eq!(deadline, t0 + Duration::from_millis(100));
    }
}
