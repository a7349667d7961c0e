use log::error;
use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Tabs};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::state::league_form::FormRow;
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;

static TABS: &[&str; 2] = &["League", "Schedule"];

const LEAGUE_KEYS: &str =
    "Keys: j/k=move  Enter=edit/toggle  a=add  d=remove  </>=division  g=generate  ?=help  q=quit";
const SCHEDULE_KEYS: &str = "Keys: h/l=week  e=export csv  g=regenerate  Esc=league  ?=help  q=quit";
const WEEK_TAB_WIDTH: usize = 10;

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::League => draw_league(f, layout.main, app),
            MenuItem::Schedule => draw_schedule(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main),
        }

        if app.state.show_logs {
            draw_logs(f, layout.logs);
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });
    if let Err(e) = result {
        error!("draw failed: {e:?}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::League => 0,
        MenuItem::Schedule => 1,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

// ---------------------------------------------------------------------------
// League form
// ---------------------------------------------------------------------------

fn draw_league(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Fantasy Football Schedule Generator ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width == 0 || inner.height < 3 {
        return;
    }

    let [form_area, message_area, legend_area] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    let (lines, selected_line) = form_lines(app);
    let height = form_area.height as usize;
    let offset = (selected_line + 1).saturating_sub(height) as u16;
    f.render_widget(Paragraph::new(lines).scroll((offset, 0)), form_area);

    draw_message(f, message_area, app);
    f.render_widget(
        Paragraph::new(LEAGUE_KEYS).style(Style::default().fg(Color::DarkGray)),
        legend_area,
    );
}

/// The form as text lines plus the index of the line the cursor is on.
fn form_lines(app: &App) -> (Vec<Line<'static>>, usize) {
    let editor = &app.state.league;
    let form = &editor.form;
    let current = editor.current_row();
    let header = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let muted = Style::default().fg(Color::DarkGray);

    let mut lines = Vec::new();
    let mut selected_line = 0;

    for row in form.rows() {
        match row {
            FormRow::Division(0) | FormRow::AddDivision if lines.is_empty() => {
                lines.push(Line::styled("Divisions", header));
            }
            FormRow::InDivisionTwice => {
                lines.push(Line::from(""));
                lines.push(Line::styled("Options", header));
            }
            FormRow::Team(0) => {
                lines.push(Line::from(""));
                lines.push(Line::styled("Teams", header));
            }
            FormRow::AddTeam if form.teams.is_empty() => {
                lines.push(Line::from(""));
                lines.push(Line::styled("Teams", header));
            }
            FormRow::Generate => lines.push(Line::from("")),
            _ => {}
        }

        let selected = row == current;
        let editing = editor.edit.as_ref().filter(|e| e.row == row).map(|e| e.buffer.as_str());
        let text_field = |value: &str, placeholder: &str| -> Span<'static> {
            match editing {
                Some(buffer) => Span::styled(format!("{buffer}_"), Style::default().fg(Color::Yellow)),
                None if value.is_empty() => Span::styled(placeholder.to_string(), muted),
                None => Span::raw(value.to_string()),
            }
        };

        let mut spans = vec![Span::raw(if selected { "> " } else { "  " })];
        match row {
            FormRow::Division(index) => {
                let division = &form.divisions[index];
                spans.push(text_field(&division.name, "Division name"));
                spans.push(Span::styled(format!("  (id {})", division.id), muted));
            }
            FormRow::AddDivision => spans.push(Span::styled("[+] Add Division", muted)),
            FormRow::InDivisionTwice => spans.push(Span::raw(format!(
                "{} Play teams in division twice",
                checkbox(form.options.in_division_play_twice)
            ))),
            FormRow::OutOfDivisionOnce => spans.push(Span::raw(format!(
                "{} Play teams out of division once",
                checkbox(form.options.out_of_division_play_once)
            ))),
            FormRow::NumWeeks => {
                spans.push(Span::raw("Number of weeks: "));
                spans.push(text_field(&form.num_weeks().to_string(), ""));
            }
            FormRow::Team(index) => {
                let team = &form.teams[index];
                spans.push(text_field(&team.name, "Team name"));
                spans.push(Span::styled(
                    format!("  < {} >", form.division_label(team.division_id)),
                    muted,
                ));
            }
            FormRow::AddTeam => spans.push(Span::styled("[+] Add Team", muted)),
            FormRow::Generate => {
                let label = if app.is_generating() {
                    "[ Generating... ]"
                } else {
                    "[ Generate Schedule ]"
                };
                spans.push(Span::styled(label, Style::default().add_modifier(Modifier::BOLD)));
            }
        }

        if selected {
            selected_line = lines.len();
        }
        let line = Line::from(spans);
        lines.push(if selected {
            line.style(Style::default().fg(Color::Yellow))
        } else {
            line
        });
    }

    (lines, selected_line)
}

fn checkbox(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

fn draw_schedule(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Schedule ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width == 0 || inner.height < 4 {
        return;
    }

    let view = &app.state.schedule;
    if view.week_count() == 0 {
        let msg = match app.state.last_error.as_deref() {
            Some(err) => format!("Schedule generation failed:\n{err}"),
            None if app.is_generating() => "Generating...".to_string(),
            None if view.schedule.is_some() => {
                "The generated schedule has no weeks. Press g to try again.".to_string()
            }
            None => "No schedule yet. Fill in the league and press g to generate.".to_string(),
        };
        f.render_widget(
            Paragraph::new(msg)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let [weeks_area, matchups_area, message_area, legend_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    let labels = view.week_labels();
    let window = view.week_window((weeks_area.width as usize / WEEK_TAB_WIDTH).max(1));
    let titles: Vec<Line> = labels[window.clone()]
        .iter()
        .map(|label| Line::from(label.clone()))
        .collect();
    let tabs = Tabs::new(titles)
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::UNDERLINED))
        .select(view.selected_week.saturating_sub(window.start));
    f.render_widget(tabs, weeks_area);

    let matchups = view.selected_matchups();
    let body: Vec<Line> = if matchups.is_empty() {
        vec![Line::styled("No matchups this week", Style::default().fg(Color::DarkGray))]
    } else {
        matchups
            .into_iter()
            .enumerate()
            .map(|(i, m)| Line::from(format!("{:>3}. {m}", i + 1)))
            .collect()
    };
    f.render_widget(Paragraph::new(body), matchups_area);

    draw_message(f, message_area, app);
    f.render_widget(
        Paragraph::new(SCHEDULE_KEYS).style(Style::default().fg(Color::DarkGray)),
        legend_area,
    );
}

/// Error wins over status; nothing when neither is set.
fn draw_message(f: &mut Frame, area: Rect, app: &App) {
    let line = if let Some(err) = app.state.last_error.as_deref() {
        Line::styled(err.to_string(), Style::default().fg(Color::Red))
    } else if let Some(status) = app.state.status.as_deref() {
        Line::styled(status.to_string(), Style::default().fg(Color::Green))
    } else {
        return;
    };
    f.render_widget(Paragraph::new(line), area);
}

// ---------------------------------------------------------------------------
// Help, logs, spinner
// ---------------------------------------------------------------------------

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::DarkGray).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let text = "\
1 / 2        switch between League and Schedule
g            generate a schedule from the current league
\"            show/hide the log pane
f            toggle full screen
q, Ctrl-C    quit

League:   j/k move, Enter edits a name or toggles an option,
          a adds a division or team, d removes it (removing a
          division removes its teams), < and > change a team's division.
          While editing: Enter saves, Esc cancels.
Schedule: h/l step through weeks, e writes schedule.csv.

About the scheduler
The schedule itself is built by the upstream service:
  - every team plays every week
  - no repeat matchups within any 4 week span
  - out-of-division games are avoided in the last two weeks when possible";
    f.render_widget(Paragraph::new(text), inner);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray));
    f.render_widget(logs, area);
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
