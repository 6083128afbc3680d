use crate::{AppState, CommandOutcome, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::StatusReceived(status) => {
            state.apply_status(status);
            Vec::new()
        }
        Msg::StatusUnavailable { .. } => {
            state.mark_stale();
            Vec::new()
        }
        Msg::StartClicked => {
            if state.intent().busy {
                Vec::new()
            } else {
                state.begin_command();
                vec![Effect::StartJob {
                    visual_mode: state.intent().desired_visual_mode,
                }]
            }
        }
        Msg::StopClicked => {
            if state.intent().busy {
                Vec::new()
            } else {
                state.begin_command();
                vec![Effect::StopJob]
            }
        }
        Msg::VisualModeToggled(requested) => toggle_visual_mode(&mut state, requested),
        Msg::DownloadClicked => {
            if state.download_available() {
                vec![Effect::Download]
            } else {
                Vec::new()
            }
        }
        Msg::StartFinished(outcome) | Msg::StopFinished(outcome) => {
            // Whatever the server did, the next snapshot is the truth.
            state.finish_command(outcome);
            vec![Effect::RefreshStatus]
        }
        Msg::ModeChangeFinished(outcome) => {
            if outcome.is_success() {
                state.commit_mode_change();
                state.finish_command(CommandOutcome::Succeeded);
                vec![Effect::RefreshStatus]
            } else {
                // The rollback is the correction; no re-poll.
                state.revert_mode_change();
                state.finish_command(outcome);
                Vec::new()
            }
        }
    };

    (state, effects)
}

fn toggle_visual_mode(state: &mut AppState, requested: bool) -> Vec<Effect> {
    let intent = state.intent();
    if intent.busy || intent.desired_visual_mode == requested {
        return Vec::new();
    }

    if !state.remote().is_running() {
        // Idle: the mode is just the parameter of the next start.
        state.set_desired_visual_mode(requested);
        return Vec::new();
    }

    state.propose_mode_change(requested);
    state.begin_command();
    vec![Effect::SetJobMode {
        visual_mode: requested,
    }]
}
