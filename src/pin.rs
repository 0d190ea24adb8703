//! Temporary pin dropped where the user taps.
//!
//! At most one pin is live. Each pin gets a fresh [`PinGeneration`]; the
//! delayed removal carries the generation it was scheduled for and only
//! removes the pin if that generation is still current.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::geo::Coordinate;
use crate::orchestrator::{AnnotationId, MapWidget};

/// Identity of one dropped pin. Strictly increasing per controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PinGeneration(u64);

impl PinGeneration {
    pub fn value(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemporaryPin {
    pub generation: PinGeneration,
    pub coordinate: Coordinate,
    pub created_at: Instant,
}

impl TemporaryPin {
    pub fn annotation_id(&self) -> AnnotationId {
        AnnotationId::TemporaryPin(self.generation)
    }
}

/// What a tap did, so the caller can start the lookup and the timer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TapOutcome {
    pub replaced: Option<PinGeneration>,
    pub placed: TemporaryPin,
    pub expires_after: Duration,
}

#[derive(Debug, Clone)]
pub struct TemporaryPinController {
    current: Option<TemporaryPin>,
    next_generation: u64,
    removal_delay: Duration,
}

impl TemporaryPinController {
    pub fn new(removal_delay: Duration) -> Self {
        Self {
            current: None,
            next_generation: 1,
            removal_delay,
        }
    }

    pub fn current(&self) -> Option<&TemporaryPin> {
        self.current.as_ref()
    }

    pub fn is_current(&self, generation: PinGeneration) -> bool {
        self.current
            .is_some_and(|pin| pin.generation == generation)
    }

    /// Replace any live pin with a new one at `coordinate`.
    ///
    /// The old pin leaves the map before the new one is added.
    pub fn handle_tap<W: MapWidget + ?Sized>(
        &mut self,
        coordinate: Coordinate,
        widget: &mut W,
    ) -> TapOutcome {
        let replaced = self.current.take().map(|old| {
            widget.remove_annotation(old.annotation_id());
            old.generation
        });

        let pin = TemporaryPin {
            generation: PinGeneration(self.next_generation),
            coordinate,
            created_at: Instant::now(),
        };
        self.next_generation += 1;

        widget.add_annotation(pin.annotation_id(), coordinate);
        self.current = Some(pin);
        debug!("Dropped pin #{} at {}", pin.generation.value(), coordinate);

        TapOutcome {
            replaced,
            placed: pin,
            expires_after: self.removal_delay,
        }
    }

    /// Timed removal. Returns whether a pin was removed.
    pub fn expire<W: MapWidget + ?Sized>(
        &mut self,
        generation: PinGeneration,
        widget: &mut W,
    ) -> bool {
        if !self.is_current(generation) {
            debug!("Pin #{} already replaced, nothing to expire", generation.value());
            return false;
        }
        if let Some(pin) = self.current.take() {
            widget.remove_annotation(pin.annotation_id());
            debug!(
                "Removed pin #{} after {:.1}s",
                generation.value(),
                pin.created_at.elapsed().as_secs_f32()
            );
        }
        true
    }
}
