//! Selection state machine
//!
//! Tracks which gallery item is active, fires the two one-shot pranks
//! (startle on the first-ever selection, bait on the second), and runs the
//! delayed reveal that opens a text panel or video once a selection settles.
//!
//! Both pranks are explicit latches, not inferences from the counter, so the
//! "exactly once" contract stays auditable.

use crate::config::{GalleryConfig, ItemId};
use crate::consts::{BAIT_SELECTION, REVEAL_DELAY};

/// What the settled selection currently reveals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevealKind {
    #[default]
    None,
    Text,
    Video,
}

/// Notifications for the host, in the order they occurred
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEvent {
    /// Active item changed (None on deselect)
    Changed(Option<ItemId>),
    /// First-ever selection: cue the full-screen jump scare
    Startle,
    /// Second selection: arm the miner popup
    Bait,
    /// Reveal the text panel for the active item
    RevealText(ItemId),
    /// Reveal the item's video
    RevealVideo(ItemId, String),
}

#[derive(Debug, Default)]
pub struct SelectionState {
    active: Option<ItemId>,
    /// Startle latch: set on the first non-null selection, never cleared
    has_ever_selected: bool,
    /// Bait latch: the miner arms at most once per scene
    bait_fired: bool,
    /// Count of non-null selection events (never decremented)
    selection_count: u32,
    reveal: RevealKind,
    /// Pending reveal deadline in simulated seconds; None = no timer
    reveal_at: Option<f64>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<ItemId> {
        self.active
    }

    pub fn reveal(&self) -> RevealKind {
        self.reveal
    }

    pub fn selection_count(&self) -> u32 {
        self.selection_count
    }

    /// Apply a selection event from the host (click or route change).
    ///
    /// `Some(id)` selects; re-selecting the active item or `None` (a pointer
    /// miss) deselects. Ids not present in the config are inert.
    pub fn select(
        &mut self,
        id: Option<ItemId>,
        config: &GalleryConfig,
        now: f64,
        events: &mut Vec<SelectionEvent>,
    ) {
        let id = match id {
            Some(id) if self.active == Some(id) => None,
            other => other,
        };

        match id {
            Some(id) => {
                // Unknown ids never corrupt state
                if config.get(id).is_none() {
                    log::warn!("ignoring selection of unknown item {:?}", id);
                    return;
                }

                self.active = Some(id);
                self.selection_count += 1;
                events.push(SelectionEvent::Changed(Some(id)));

                if !self.has_ever_selected {
                    self.has_ever_selected = true;
                    events.push(SelectionEvent::Startle);
                }
                if self.selection_count == BAIT_SELECTION && !self.bait_fired {
                    self.bait_fired = true;
                    events.push(SelectionEvent::Bait);
                }

                // A new selection supersedes any pending reveal
                self.reveal = RevealKind::None;
                self.reveal_at = Some(now + REVEAL_DELAY);
            }
            None => {
                if self.active.take().is_some() {
                    // Hide immediately; cancel the pending timer
                    self.reveal = RevealKind::None;
                    self.reveal_at = None;
                    events.push(SelectionEvent::Changed(None));
                }
            }
        }
    }

    /// Check the reveal deadline against the frame clock
    pub fn advance(&mut self, now: f64, config: &GalleryConfig, events: &mut Vec<SelectionEvent>) {
        let Some(deadline) = self.reveal_at else {
            return;
        };
        if now < deadline {
            return;
        }
        self.reveal_at = None;

        // The deadline is cleared on deselect, but check relevance anyway
        let Some(id) = self.active else { return };
        let Some(item) = config.get(id) else { return };

        match &item.video {
            Some(url) => {
                self.reveal = RevealKind::Video;
                events.push(SelectionEvent::RevealVideo(id, url.clone()));
            }
            None => {
                self.reveal = RevealKind::Text;
                events.push(SelectionEvent::RevealText(id));
            }
        }
    }
}
