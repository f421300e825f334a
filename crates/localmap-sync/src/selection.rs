//! Selection state machine.
//!
//! At most one store is selected at a time. A selection starts from a key
//! (marker click) or a partial record (list click), loads the full detail,
//! and then holds until explicitly cleared. Overlay visibility is a
//! derived, re-enterable function of (selection, viewport): leaving the
//! viewport's safe sub-region hides the overlay but keeps the selection,
//! and re-entering shows it again with the same content and no new fetch.

use localmap_core::geo::LatLngBounds;
use localmap_core::store::Store;

use crate::tuning::SyncTuning;

#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Unselected,
    /// A detail fetch for `key` is in flight; only a response carrying
    /// `generation` may complete it.
    DetailLoading { key: String, generation: u64 },
    Selected {
        store: Store,
        overlay_visible: bool,
    },
}

/// Overlay change requested by a bounds update, to be applied to the
/// surface by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayTransition {
    Hide,
    Show,
}

#[derive(Debug)]
pub struct SelectionController {
    state: Selection,
    generation: u64,
}

impl SelectionController {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Selection::Unselected,
            generation: 0,
        }
    }

    /// Begins selecting `key`, superseding any previous or in-flight
    /// selection (last wins). Returns the generation the caller must
    /// attach to the detail fetch.
    pub fn begin(&mut self, key: &str) -> u64 {
        self.generation += 1;
        self.state = Selection::DetailLoading {
            key: key.to_owned(),
            generation: self.generation,
        };
        self.generation
    }

    /// Completes a detail fetch. Returns `true` if the selection advanced
    /// to `Selected`; a stale generation (selection changed or cleared
    /// since the request was issued) is dropped.
    pub fn resolve(&mut self, generation: u64, store: Store) -> bool {
        match &self.state {
            Selection::DetailLoading { generation: g, .. } if *g == generation => {
                self.state = Selection::Selected {
                    store,
                    overlay_visible: true,
                };
                true
            }
            _ => {
                tracing::debug!(generation, "dropping stale detail response");
                false
            }
        }
    }

    /// Aborts the in-flight selection on a failed detail fetch. Stale
    /// failures are ignored the same way stale successes are.
    pub fn fail(&mut self, generation: u64) {
        if matches!(&self.state, Selection::DetailLoading { generation: g, .. } if *g == generation)
        {
            self.state = Selection::Unselected;
        }
    }

    /// Explicit deselection. Also invalidates any in-flight detail fetch.
    pub fn deselect(&mut self) {
        self.generation += 1;
        self.state = Selection::Unselected;
    }

    /// Key of the selected (or loading) store, for marker styling.
    #[must_use]
    pub fn selected_key(&self) -> Option<&str> {
        match &self.state {
            Selection::Unselected => None,
            Selection::DetailLoading { key, .. } => Some(key),
            Selection::Selected { store, .. } => Some(&store.key),
        }
    }

    #[must_use]
    pub fn selected_store(&self) -> Option<&Store> {
        match &self.state {
            Selection::Selected { store, .. } => Some(store),
            _ => None,
        }
    }

    #[must_use]
    pub fn state(&self) -> &Selection {
        &self.state
    }

    /// Re-evaluates overlay visibility against the safe sub-region of the
    /// new bounds. Returns the transition the surface should apply, if any.
    /// Selection itself is never cleared here.
    pub fn update_for_bounds(
        &mut self,
        bounds: &LatLngBounds,
        tuning: &SyncTuning,
    ) -> Option<OverlayTransition> {
        let Selection::Selected {
            store,
            overlay_visible,
        } = &mut self.state
        else {
            return None;
        };

        let safe = bounds.inset(tuning.safe_margin, tuning.safe_margin_top);
        let inside = safe.contains(store.position());
        if *overlay_visible && !inside {
            *overlay_visible = false;
            Some(OverlayTransition::Hide)
        } else if !*overlay_visible && inside {
            *overlay_visible = true;
            Some(OverlayTransition::Show)
        } else {
            None
        }
    }
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new()
    }
}
