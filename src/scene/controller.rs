use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Identifies the navigation a data load was started for.
///
/// A completion whose ticket no longer matches the controller's generation
/// belongs to a scene that has since been torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoadTicket {
    pub scene: usize,
    pub generation: u64,
}

/// Cosmetic record of one navigation: fade-out, clear, render, fade-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneTransition {
    pub from: Option<usize>,
    pub to: usize,
    pub generation: u64,
    pub fade_out_ms: u32,
    pub fade_in_ms: u32,
}

/// Linear scene state machine over `0..scene_count`.
///
/// Every successful transition bumps the generation, which invalidates any
/// load still in flight for the previous scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneController {
    index: usize,
    scene_count: usize,
    generation: u64,
    fade_ms: u32,
}

impl SceneController {
    /// Starts at scene 0. `scene_count` is clamped to at least one scene.
    #[must_use]
    pub fn new(scene_count: usize, fade_ms: u32) -> Self {
        Self {
            index: 0,
            scene_count: scene_count.max(1),
            generation: 0,
            fade_ms,
        }
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn scene_count(&self) -> usize {
        self.scene_count
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn prev_enabled(&self) -> bool {
        self.index > 0
    }

    #[must_use]
    pub fn next_enabled(&self) -> bool {
        self.index + 1 < self.scene_count
    }

    /// "Slide N of M", 1-based.
    #[must_use]
    pub fn progress_label(&self) -> String {
        format!("Slide {} of {}", self.index + 1, self.scene_count)
    }

    /// Initial entry into the current scene (startup).
    pub fn enter_current(&mut self) -> SceneTransition {
        self.generation += 1;
        debug!(scene = self.index, generation = self.generation, "entering scene");
        SceneTransition {
            from: None,
            to: self.index,
            generation: self.generation,
            fade_out_ms: 0,
            fade_in_ms: self.fade_ms,
        }
    }

    /// Moves forward; `None` (no-op) on the last scene.
    pub fn next(&mut self) -> Option<SceneTransition> {
        if !self.next_enabled() {
            trace!(scene = self.index, "next ignored at last scene");
            return None;
        }
        Some(self.go_to(self.index + 1))
    }

    /// Moves back; `None` (no-op) on the first scene.
    pub fn prev(&mut self) -> Option<SceneTransition> {
        if !self.prev_enabled() {
            trace!(scene = self.index, "prev ignored at first scene");
            return None;
        }
        Some(self.go_to(self.index - 1))
    }

    fn go_to(&mut self, to: usize) -> SceneTransition {
        let from = self.index;
        self.index = to;
        self.generation += 1;
        debug!(from, to, generation = self.generation, "scene transition");
        SceneTransition {
            from: Some(from),
            to,
            generation: self.generation,
            fade_out_ms: self.fade_ms,
            fade_in_ms: self.fade_ms,
        }
    }

    /// Ticket for a load started now on behalf of the current scene.
    #[must_use]
    pub fn ticket(&self) -> LoadTicket {
        LoadTicket {
            scene: self.index,
            generation: self.generation,
        }
    }

    #[must_use]
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.generation == self.generation && ticket.scene == self.index
    }

    /// Accepts a completed load only if it still belongs to the active scene.
    pub fn accept(&self, ticket: LoadTicket) -> bool {
        let current = self.is_current(ticket);
        if !current {
            warn!(
                ticket_scene = ticket.scene,
                ticket_generation = ticket.generation,
                scene = self.index,
                generation = self.generation,
                "discarding stale scene load"
            );
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::SceneController;

    #[test]
    fn ticket_goes_stale_after_navigation() {
        let mut controller = SceneController::new(6, 300);
        controller.enter_current();
        let ticket = controller.ticket();
        assert!(controller.accept(ticket));

        controller.next().expect("forward");
        assert!(!controller.accept(ticket));

        // Coming back does not revive the old ticket.
        controller.prev().expect("back");
        assert_eq!(controller.index(), ticket.scene);
        assert!(!controller.accept(ticket));
    }
}
