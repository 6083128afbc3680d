/// One line of operator input, already interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorCommand {
    Start,
    Stop,
    SetVisualMode(bool),
    ToggleVisualMode,
    Download,
    Refresh,
    Help,
    Quit,
    Unknown(String),
}

pub const HELP: &str = "\
Commands:
  start             start the scraper with the selected mode
  stop              stop the scraper
  visual on|off     select visual verification mode (fast when off)
  toggle            flip the visual mode checkbox
  download          save the export to the download directory
  status            redraw the panel
  help              show this list
  quit              leave the panel";

/// Blank lines yield `None`.
pub fn parse_command(line: &str) -> Option<OperatorCommand> {
    let words: Vec<String> = line
        .split_whitespace()
        .map(str::to_ascii_lowercase)
        .collect();
    let words: Vec<&str> = words.iter().map(String::as_str).collect();

    let command = match words.as_slice() {
        [] => return None,
        ["start"] => OperatorCommand::Start,
        ["stop"] => OperatorCommand::Stop,
        ["visual", "on"] | ["visual", "true"] => OperatorCommand::SetVisualMode(true),
        ["visual", "off"] | ["visual", "false"] | ["fast"] => {
            OperatorCommand::SetVisualMode(false)
        }
        ["visual"] | ["toggle"] => OperatorCommand::ToggleVisualMode,
        ["download"] | ["dl"] => OperatorCommand::Download,
        ["status"] | ["refresh"] => OperatorCommand::Refresh,
        ["help"] | ["?"] => OperatorCommand::Help,
        ["quit"] | ["exit"] | ["q"] => OperatorCommand::Quit,
        _ => OperatorCommand::Unknown(line.trim().to_string()),
    };
    Some(command)
}
