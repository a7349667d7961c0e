use crate::app::{App, MenuItem};
use crate::state::messages::NetworkRequest;
use ff_schedule_api::client::GENERIC_FAILURE;
use log::error;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;

    // While a text field is being edited every printable key is input.
    if guard.state.league.is_editing() {
        match (key_event.code, key_event.modifiers) {
            (Char('c'), KeyModifiers::CONTROL) => {
                crate::cleanup_terminal();
                std::process::exit(0);
            }
            (KeyCode::Enter, _) => guard.state.league.commit_edit(),
            (KeyCode::Esc, _) => guard.state.league.cancel_edit(),
            (KeyCode::Backspace, _) => guard.state.league.pop_char(),
            (Char(c), _) => guard.state.league.push_char(c),
            _ => {}
        }
        return;
    }

    let mut submission = None;

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::League),
        (_, Char('2'), _) => guard.update_tab(MenuItem::Schedule),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // League form
        (MenuItem::League, Char('j') | KeyCode::Down | KeyCode::Tab, _) => {
            guard.state.league.move_down()
        }
        (MenuItem::League, Char('k') | KeyCode::Up | KeyCode::BackTab, _) => {
            guard.state.league.move_up()
        }
        (MenuItem::League, KeyCode::Enter | Char(' '), _) => {
            submission = guard.activate_league_row();
        }
        (MenuItem::League, Char('a'), _) => guard.state.league.add_in_section(),
        (MenuItem::League, Char('d') | KeyCode::Delete, _) => {
            guard.state.league.remove_current();
        }
        (MenuItem::League, Char('>') | Char('l') | KeyCode::Right, _) => {
            guard.state.league.cycle_division(true)
        }
        (MenuItem::League, Char('<') | Char('h') | KeyCode::Left, _) => {
            guard.state.league.cycle_division(false)
        }

        // Schedule view
        (MenuItem::Schedule, Char('l') | KeyCode::Right, _) => guard.schedule_next_week(),
        (MenuItem::Schedule, Char('h') | KeyCode::Left, _) => guard.schedule_prev_week(),
        (MenuItem::Schedule, Char('e'), _) => guard.export_schedule(),
        (MenuItem::Schedule, KeyCode::Esc, _) => guard.update_tab(MenuItem::League),

        // Global
        (_, Char('g'), _) => submission = guard.begin_submit(),
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }

    if let Some((seq, request)) = submission {
        drop(guard);
        if let Err(e) = network_requests
            .send(NetworkRequest::GenerateSchedule { seq, request })
            .await
        {
            error!("network worker is gone, submission #{seq} not sent: {e}");
            app.lock().await.on_submit_failed(seq, GENERIC_FAILURE.to_string());
        }
    }
}
