mod app;
mod config;
mod effects;
mod logging;
#[cfg(test)]
mod test_support;
mod ui;

pub use app::run_app;
