use std::sync::Once;

use scraper_panel_core::{
    update, AppState, CommandOutcome, Effect, JobLabel, JobStatus, ModeLabel, Msg, RemoteStatus,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(panel_logging::initialize_for_tests);
}

fn status(is_running: bool, visual_mode: bool) -> JobStatus {
    JobStatus {
        is_running,
        current_id: 1000,
        total_records: 12,
        blank_count: 0,
        visual_mode,
    }
}

#[test]
fn starts_unknown_with_unchecked_mode() {
    init_logging();
    let state = AppState::new();
    let view = state.view();

    assert_eq!(state.remote(), RemoteStatus::Unknown);
    assert_eq!(view.job, JobLabel::Connecting);
    assert_eq!(view.mode, ModeLabel::Idle);
    assert!(!view.visual_mode_checked);
    assert!(!view.start_enabled);
    assert!(!view.stop_enabled);
    assert!(!view.download_enabled);
    assert_eq!(view.total_records, None);
}

#[test]
fn idle_status_overwrites_local_mode() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::VisualModeToggled(true));
    assert!(state.intent().desired_visual_mode);

    let (state, effects) = update(state, Msg::StatusReceived(status(false, false)));

    assert!(effects.is_empty());
    assert!(!state.intent().desired_visual_mode);
    assert_eq!(state.view().job, JobLabel::Stopped);
}

#[test]
fn running_status_leaves_local_mode_untouched() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::StatusReceived(status(true, false)));
    let (state, _) = update(state, Msg::VisualModeToggled(true));
    let (state, _) = update(state, Msg::ModeChangeFinished(CommandOutcome::Succeeded));

    // A stale running snapshot still reporting the old mode must not flip the checkbox.
    let (state, _) = update(state, Msg::StatusReceived(status(true, false)));

    assert!(state.intent().desired_visual_mode);
    assert_eq!(state.view().mode, ModeLabel::Fast);
}

#[test]
fn snapshots_replace_each_other_wholesale() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::StatusReceived(status(true, true)));
    let newer = JobStatus {
        is_running: false,
        current_id: 2000,
        total_records: 0,
        blank_count: 7,
        visual_mode: false,
    };
    let (state, _) = update(state, Msg::StatusReceived(newer));

    assert_eq!(state.remote(), RemoteStatus::Known(newer));
}

#[test]
fn out_of_order_responses_apply_in_arrival_order() {
    init_logging();
    let fresh = status(true, true);
    let stale = status(false, false);

    let (state, _) = update(AppState::new(), Msg::StatusReceived(fresh));
    let (state, _) = update(state, Msg::StatusReceived(stale));

    // Last to arrive wins until the next tick corrects it.
    assert_eq!(state.remote(), RemoteStatus::Known(stale));
    assert_eq!(state.view().job, JobLabel::Stopped);
}

#[test]
fn failed_fetch_keeps_last_status_and_marks_stale() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::StatusReceived(status(true, false)));
    let (mut state, _) = update(
        state,
        Msg::StatusUnavailable {
            reason: "network error".to_string(),
        },
    );

    assert_eq!(state.remote(), RemoteStatus::Known(status(true, false)));
    assert!(state.view().stale);
    assert!(state.consume_dirty());

    let (state, effects) = update(state, Msg::StatusReceived(status(true, false)));
    assert!(!state.view().stale);
    assert!(effects.is_empty());
}

#[test]
fn identical_snapshot_does_not_dirty_state() {
    init_logging();
    let (mut state, _) = update(AppState::new(), Msg::StatusReceived(status(false, false)));
    assert!(state.consume_dirty());

    let (mut state, _) = update(state, Msg::StatusReceived(status(false, false)));
    assert!(!state.consume_dirty());
}

/// Small deterministic generator so the sequence test needs no extra crates.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn flip(&mut self) -> bool {
        self.next() % 2 == 0
    }
}

#[test]
fn idle_mode_mirrors_latest_poll_until_operator_acts() {
    init_logging();
    for seed in 0..64 {
        let mut rng = Lcg(seed);
        let mut state = AppState::new();
        let mut latest: Option<JobStatus> = None;
        let mut toggled_since_poll = false;

        for _ in 0..200 {
            let msg = match rng.next() % 9 {
                0 | 1 => {
                    let polled = status(rng.flip(), rng.flip());
                    latest = Some(polled);
                    toggled_since_poll = false;
                    Msg::StatusReceived(polled)
                }
                2 => {
                    toggled_since_poll = true;
                    Msg::VisualModeToggled(rng.flip())
                }
                3 => Msg::StartClicked,
                4 => Msg::StopClicked,
                5 => Msg::StartFinished(CommandOutcome::Succeeded),
                6 => Msg::StopFinished(CommandOutcome::Failed("boom".to_string())),
                7 => Msg::ModeChangeFinished(CommandOutcome::Failed("boom".to_string())),
                _ => Msg::ModeChangeFinished(CommandOutcome::Succeeded),
            };
            let (next, effects) = update(state, msg);
            state = next;
            assert!(!effects.contains(&Effect::Download));

            if let Some(polled) = latest {
                if !polled.is_running && !toggled_since_poll {
                    assert_eq!(
                        state.intent().desired_visual_mode,
                        polled.visual_mode,
                        "seed {seed}"
                    );
                }
            }
        }
    }
}
