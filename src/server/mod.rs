mod app;
mod state;

pub use app::create_app;
pub use state::AppState;

#[cfg(test)]
pub(crate) use state::test_settings;
