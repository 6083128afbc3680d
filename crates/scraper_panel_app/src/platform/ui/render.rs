use scraper_panel_core::PanelViewModel;

pub fn render(view: &PanelViewModel, timestamp: &str) -> String {
    let mut lines = Vec::with_capacity(12);

    lines.push(format!("==== Invoice Scraper Dashboard ({timestamp}) ===="));
    lines.push(format!("Status:              {}", view.job.as_str()));
    lines.push(format!("Mode:                {}", view.mode.as_str()));
    lines.push(format!("Current Invoice ID:  {}", counter(view.current_id)));
    lines.push(format!("Total Records:       {}", counter(view.total_records)));
    lines.push(format!("Consecutive Blanks:  {}", counter(view.blank_count)));

    let checkbox = if view.visual_mode_checked { "[x]" } else { "[ ]" };
    let locked = if view.checkbox_enabled { "" } else { " (locked)" };
    lines.push(format!("{checkbox} Visual verification mode{locked}"));

    let mut actions = Vec::new();
    if view.start_enabled {
        actions.push("start");
    }
    if view.stop_enabled {
        actions.push("stop");
    }
    if view.checkbox_enabled {
        actions.push("visual on|off");
    }
    if view.download_enabled {
        actions.push("download");
    }
    let busy = if view.busy { "  (working...)" } else { "" };
    if actions.is_empty() {
        lines.push(format!("Actions: none{busy}"));
    } else {
        lines.push(format!("Actions: {}{busy}", actions.join(", ")));
    }

    if view.stale {
        lines.push("(last refresh failed; figures may be out of date)".to_string());
    }
    if let Some(error) = &view.last_error {
        lines.push(format!("! {error}"));
    }

    lines.join("\n")
}

fn counter(value: Option<u64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
