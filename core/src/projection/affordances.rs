use serde::Serialize;

/// Named transport controls exposed to the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransportAction {
    Play,
    Pause,
    Reset,
    SkipToEnd,
}

impl TransportAction {
    pub fn name(&self) -> &'static str {
        match self {
            TransportAction::Play => "play",
            TransportAction::Pause => "pause",
            TransportAction::Reset => "reset",
            TransportAction::SkipToEnd => "skip-to-end",
        }
    }
}

/// Interaction affordances implied by the play state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Affordances {
    /// Scroll zoom and free panning; disabled while autoplay drives the view.
    pub free_navigation: bool,
    pub transport: Vec<TransportAction>,
}

impl Affordances {
    pub fn for_state(is_playing: bool) -> Self {
        let toggle = if is_playing {
            TransportAction::Pause
        } else {
            TransportAction::Play
        };
        Self {
            free_navigation: !is_playing,
            transport: vec![toggle, TransportAction::Reset, TransportAction::SkipToEnd],
        }
    }

    pub fn allows(&self, action: TransportAction) -> bool {
        self.transport.contains(&action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playing_swaps_play_for_pause_and_locks_navigation() {
        let playing = Affordances::for_state(true);
        assert!(!playing.free_navigation);
        assert!(playing.allows(TransportAction::Pause));
        assert!(!playing.allows(TransportAction::Play));

        let stopped = Affordances::for_state(false);
        assert!(stopped.free_navigation);
        assert_eq!(
            stopped.transport,
            vec![
                TransportAction::Play,
                TransportAction::Reset,
                TransportAction::SkipToEnd
            ]
        );
    }

    #[test]
    fn action_names_match_wire_form() {
        assert_eq!(TransportAction::SkipToEnd.name(), "skip-to-end");
        assert_eq!(
            serde_json::to_string(&TransportAction::SkipToEnd).unwrap(),
            "\"skip-to-end\""
        );
    }
}
