//! Terminal front end
//!
//! One loop owns the terminal and multiplexes three sources: key presses,
//! a redraw interval, and the active response stream.

mod app;
mod keys;
mod view;

pub use app::App;

use crate::conversation::StreamProgress;
use app::Flow;
use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use std::io;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Redraw period; keeps the stopwatch and loading dots moving
const FRAME_PERIOD: Duration = Duration::from_millis(33);

enum Step {
    Frame,
    Input(Option<io::Result<Event>>),
    Progress(StreamProgress),
}

/// Take over the terminal and run until the user quits.
pub async fn run(mut app: App) -> io::Result<()> {
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut app).await;
    app.shutdown();
    ratatui::restore();
    result
}

async fn event_loop(terminal: &mut DefaultTerminal, app: &mut App) -> io::Result<()> {
    let mut events = EventStream::new();
    let mut frames = tokio::time::interval(FRAME_PERIOD);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        terminal.draw(|frame| view::draw(frame, app))?;

        let busy = app.controller().is_busy();
        let step = tokio::select! {
            _ = frames.tick() => Step::Frame,
            event = events.next() => Step::Input(event),
            Some(progress) = app.pump(), if busy => Step::Progress(progress),
        };

        match step {
            Step::Frame => app.on_frame(),
            Step::Progress(progress) => app.on_progress(progress),
            Step::Input(Some(Ok(Event::Key(key)))) => {
                if let Some(action) = keys::map_key(key) {
                    if app.apply(action) == Flow::Quit {
                        tracing::info!("Quit requested");
                        return Ok(());
                    }
                }
            }
            // Resize and focus changes only need the redraw at the top.
            Step::Input(Some(Ok(_))) => {}
            Step::Input(Some(Err(e))) => return Err(e),
            Step::Input(None) => return Ok(()),
        }
    }
}
