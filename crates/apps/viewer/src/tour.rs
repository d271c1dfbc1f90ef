use formats::records::{Tour, TourStep};
use scene::store::Collection;
use tracing::{debug, info};

/// What a tour call did, so the caller knows whether to touch the map.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TourTransition {
    /// Nothing changed.
    Ignored,
    /// Now showing the step at this index.
    Entered(usize),
    /// Back to idle.
    Ended,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct TourControls {
    pub end: bool,
    pub next: bool,
    pub previous: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct ActiveTour {
    tour: Tour,
    index: usize,
}

/// Idle, or Playing a tour with `0 <= index < steps.len()`.
///
/// Tours without steps never enter Playing.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TourPlayer {
    active: Option<ActiveTour>,
}

impl TourPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts `tour_id` at its first step, replacing any tour in progress.
    /// Unknown or empty tours are ignored.
    pub fn start(&mut self, tours: &Collection<Tour>, tour_id: &str) -> TourTransition {
        let Some(tour) = tours.get(tour_id) else {
            debug!(tour = tour_id, "unknown tour ignored");
            return TourTransition::Ignored;
        };
        if tour.steps.is_empty() {
            debug!(tour = tour_id, "tour without steps ignored");
            return TourTransition::Ignored;
        }
        info!(tour = tour_id, steps = tour.steps.len(), "tour started");
        self.active = Some(ActiveTour {
            tour: tour.clone(),
            index: 0,
        });
        TourTransition::Entered(0)
    }

    pub fn next(&mut self) -> TourTransition {
        match &mut self.active {
            Some(active) if active.index + 1 < active.tour.steps.len() => {
                active.index += 1;
                TourTransition::Entered(active.index)
            }
            _ => TourTransition::Ignored,
        }
    }

    pub fn previous(&mut self) -> TourTransition {
        match &mut self.active {
            Some(active) if active.index > 0 => {
                active.index -= 1;
                TourTransition::Entered(active.index)
            }
            _ => TourTransition::Ignored,
        }
    }

    pub fn end(&mut self) -> TourTransition {
        match self.active.take() {
            Some(active) => {
                info!(tour = %active.tour.id, "tour ended");
                TourTransition::Ended
            }
            None => TourTransition::Ignored,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.active.is_some()
    }

    pub fn tour(&self) -> Option<&Tour> {
        self.active.as_ref().map(|a| &a.tour)
    }

    pub fn index(&self) -> Option<usize> {
        self.active.as_ref().map(|a| a.index)
    }

    pub fn current_step(&self) -> Option<&TourStep> {
        self.active.as_ref().and_then(|a| a.tour.steps.get(a.index))
    }

    pub fn controls(&self) -> TourControls {
        match &self.active {
            Some(active) => TourControls {
                end: true,
                next: active.index + 1 < active.tour.steps.len(),
                previous: active.index > 0,
            },
            None => TourControls::default(),
        }
    }
}
