pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::{resolve_theme, ThemeColors};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};

const TICK_RATE_MS: u64 = 250;

pub async fn run_tui(mut app: App) -> anyhow::Result<()> {
    // Buffer stderr while TUI is active to prevent output corrupting the display
    crate::stderr_buffer::activate();

    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();
    let mut events = EventHandler::new(TICK_RATE_MS);

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    // Restore terminal
    ratatui::restore();

    // Flush buffered stderr messages now that the terminal is restored
    for msg in crate::stderr_buffer::drain() {
        eprintln!("{}", msg);
    }

    result
}

async fn run_loop(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    events: &mut EventHandler,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        match events.next().await {
            Some(Event::Key(key)) => handle_key_event(app, key),
            Some(Event::Tick) => app.update_flash(),
            None => {
                tracing::debug!("terminal input closed");
                break;
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        app::InputMode::Normal => {
            match key.code {
                // Quit
                KeyCode::Char('q') => app.should_quit = true,

                // Tab switching
                KeyCode::Tab => app.next_view(),
                KeyCode::BackTab => app.previous_view(),
                KeyCode::Char(c @ '1'..='3') => {
                    let index = c as usize - '1' as usize;
                    app.select_view(app::View::ALL[index]);
                }

                // Navigation
                KeyCode::Char('j') | KeyCode::Down => app.next_row(),
                KeyCode::Char('k') | KeyCode::Up => app.previous_row(),

                // Score entry
                KeyCode::Char('a') => app.start_entry(),

                // Reload from disk
                KeyCode::Char('r') => app.reload(),

                // Export is offered on the data tab
                KeyCode::Char('e') if app.current_view == app::View::Data => app.export(),

                // Help
                KeyCode::Char('?') => app.show_help(),

                _ => {}
            }
        }
        app::InputMode::Entry => {
            match key.code {
                KeyCode::Enter => app.submit_entry(),
                KeyCode::Esc => app.cancel_entry(),
                KeyCode::Tab | KeyCode::Down => app.entry.next_field(),
                KeyCode::BackTab | KeyCode::Up => app.entry.previous_field(),
                KeyCode::Backspace => app.entry.backspace(),
                KeyCode::Char(c) => app.entry.push_char(c),

                // Ignore all other keys (don't propagate to Normal mode)
                _ => {}
            }
        }
        app::InputMode::Help => {
            // Any key exits help
            app.dismiss_help();
        }
    }
}
