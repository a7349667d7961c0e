pub mod app_settings;
pub mod app_state;
pub mod league_form;
pub mod messages;
pub mod network;
pub mod schedule_view;
