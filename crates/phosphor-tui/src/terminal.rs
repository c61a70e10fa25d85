//! Terminal setup, teardown, and the frame loop.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::*;

use crate::app::App;
use crate::view;

/// Frame budget: ~30fps keeps the typewriter and countdown smooth without
/// spinning the CPU.
const FRAME: Duration = Duration::from_millis(33);

/// Launch the application and run until quit.
pub fn run(mut app: App) -> Result<(), String> {
    enable_raw_mode().map_err(|e| format!("terminal error: {e}"))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| format!("terminal error: {e}"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| format!("terminal error: {e}"))?;

    let result = run_loop(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

/// Tick-driven frame loop. Animations advance by wall-clock `dt`, so a slow
/// draw never shortens a countdown.
fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), String> {
    let mut last_tick = Instant::now();
    loop {
        terminal
            .draw(|frame| view::draw(frame, app))
            .map_err(|e| format!("draw error: {e}"))?;

        if app.should_quit {
            return Ok(());
        }

        let timeout = FRAME.saturating_sub(last_tick.elapsed());
        if event::poll(timeout).map_err(|e| format!("event error: {e}"))? {
            let event = event::read().map_err(|e| format!("event error: {e}"))?;
            if let Event::Key(key) = event
                && key.kind == KeyEventKind::Press
            {
                app.handle_key(key);
            }
        }

        let now = Instant::now();
        let dt = now.duration_since(last_tick).as_secs_f32();
        last_tick = now;
        app.tick(dt);
    }
}
