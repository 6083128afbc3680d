use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use panel_logging::{panel_info, panel_warn};
use scraper_panel_core::{update, AppState, Msg};
use scraper_panel_engine::{ApiSettings, JobApi, ReqwestJobApi, StatusPoller};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use super::config::PanelConfig;
use super::effects::{EffectRunner, MsgSink};
use super::logging;
use super::ui::input::{parse_command, OperatorCommand, HELP};
use super::ui::render::render;

pub fn run_app() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = PanelConfig::from_env();
    logging::initialize(config.log_destination);
    for warning in &config.warnings {
        panel_warn!("{}", warning);
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(run(config));
    // The stdin reader sits in a blocking read that never finishes on its own.
    runtime.shutdown_timeout(Duration::from_millis(100));
    result
}

async fn run(config: PanelConfig) -> anyhow::Result<()> {
    let settings = ApiSettings::with_base_url(&config.base_url)?;
    let api: Arc<dyn JobApi> = Arc::new(ReqwestJobApi::new(settings)?);
    panel_info!(
        "Watching {} every {:?}",
        config.base_url,
        config.poll_interval
    );

    let (msg_tx, mut msg_rx) = mpsc::unbounded_channel::<Msg>();
    let poller = StatusPoller::new(api.clone(), Arc::new(MsgSink::new(msg_tx.clone())));
    let runner = EffectRunner::new(api, poller.clone(), msg_tx, config.output_dir.clone());

    let mut panel = Panel::new(runner, std::io::stdout());
    panel.render_now();
    panel.notice("Type `help` for commands.");

    let poll_handle = poller.start(config.poll_interval);

    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<OperatorCommand>();
    tokio::spawn(read_operator_input(cmd_tx));
    let mut input_open = true;

    loop {
        tokio::select! {
            Some(msg) = msg_rx.recv() => panel.dispatch(msg),
            command = cmd_rx.recv(), if input_open => match command {
                Some(OperatorCommand::Quit) => break,
                Some(command) => panel.handle_command(command),
                // Stdin closed; keep watching until Ctrl-C.
                None => input_open = false,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    poll_handle.shutdown().await;
    panel_info!("Panel closed");
    Ok(())
}

async fn read_operator_input(cmd_tx: mpsc::UnboundedSender<OperatorCommand>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if let Some(command) = parse_command(&line) {
                    if cmd_tx.send(command).is_err() {
                        break;
                    }
                }
            }
            Ok(None) => break,
            Err(err) => {
                panel_warn!("Failed to read operator input: {}", err);
                break;
            }
        }
    }
}

/// Single owner of the panel state. Every mutation goes through `update`.
struct Panel<W: Write> {
    state: AppState,
    runner: EffectRunner,
    out: W,
}

impl<W: Write> Panel<W> {
    fn new(runner: EffectRunner, out: W) -> Self {
        Self {
            state: AppState::new(),
            runner,
            out,
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;
        self.runner.enqueue(effects);
        if was_dirty {
            self.render_now();
        }
    }

    /// Applies the same enablement rules the rendered panel shows.
    fn handle_command(&mut self, command: OperatorCommand) {
        let view = self.state.view();
        match command {
            OperatorCommand::Start if view.start_enabled => self.dispatch(Msg::StartClicked),
            OperatorCommand::Stop if view.stop_enabled => self.dispatch(Msg::StopClicked),
            OperatorCommand::SetVisualMode(visual_mode) if view.checkbox_enabled => {
                self.dispatch(Msg::VisualModeToggled(visual_mode))
            }
            OperatorCommand::ToggleVisualMode if view.checkbox_enabled => {
                self.dispatch(Msg::VisualModeToggled(!view.visual_mode_checked))
            }
            OperatorCommand::Download if view.download_enabled => {
                self.dispatch(Msg::DownloadClicked)
            }
            OperatorCommand::Download => self.notice("Nothing to download yet."),
            OperatorCommand::Start
            | OperatorCommand::Stop
            | OperatorCommand::SetVisualMode(_)
            | OperatorCommand::ToggleVisualMode => {
                self.notice("That action is not available right now.")
            }
            OperatorCommand::Refresh => self.render_now(),
            OperatorCommand::Help => self.notice(HELP),
            OperatorCommand::Unknown(input) => {
                self.notice(&format!("Unknown command {input:?}; type `help`."))
            }
            OperatorCommand::Quit => {}
        }
    }

    fn render_now(&mut self) {
        let text = render(&self.state.view(), &Local::now().format("%H:%M:%S").to_string());
        self.notice(&format!("\n{text}"));
    }

    fn notice(&mut self, text: &str) {
        if let Err(err) = writeln!(self.out, "{text}").and_then(|()| self.out.flush()) {
            panel_warn!("Failed to write to the terminal: {}", err);
        }
    }
}
