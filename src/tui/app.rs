//! UI state wrapped around the conversation controller

use super::keys::Action;
use super::view::RenderCache;
use crate::conversation::{ConversationController, StreamProgress, Submission};
use crate::stopwatch::StopwatchTimer;

const SCROLL_STEP: u16 = 3;

/// Whether the event loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App {
    controller: ConversationController<StopwatchTimer>,
    /// Lines scrolled up from the bottom; 0 follows new output
    scroll_back: u16,
    max_scroll: u16,
    frame: usize,
    status: Option<String>,
    rendered: RenderCache,
}

impl App {
    pub fn new(controller: ConversationController<StopwatchTimer>) -> Self {
        Self {
            controller,
            scroll_back: 0,
            max_scroll: 0,
            frame: 0,
            status: None,
            rendered: RenderCache::default(),
        }
    }

    pub fn controller(&self) -> &ConversationController<StopwatchTimer> {
        &self.controller
    }

    pub fn scroll_back(&self) -> u16 {
        self.scroll_back
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// The controller alongside the cache of rendered message bodies.
    pub fn transcript_parts(&mut self) -> (&ConversationController<StopwatchTimer>, &mut RenderCache) {
        (&self.controller, &mut self.rendered)
    }

    /// Record how far the transcript can scroll at the current size.
    pub fn set_max_scroll(&mut self, max: u16) {
        self.max_scroll = max;
        self.scroll_back = self.scroll_back.min(max);
    }

    pub fn apply(&mut self, action: Action) -> Flow {
        let busy = self.controller.is_busy();
        match action {
            Action::Quit => return Flow::Quit,
            Action::Insert(c) => self.controller.input_mut().push(c),
            Action::Backspace => {
                self.controller.input_mut().pop();
            }
            // The next question can be drafted while a reply streams in.
            Action::Submit if busy => {}
            Action::Submit => self.submit(),
            Action::ToggleTimer => self.controller.timer_mut().start_stop(),
            Action::ResetTimer => self.controller.timer_mut().reset(),
            Action::Cancel => {
                self.controller.cancel();
            }
            Action::ScrollUp => {
                self.scroll_back = self
                    .scroll_back
                    .saturating_add(SCROLL_STEP)
                    .min(self.max_scroll);
            }
            Action::ScrollDown => self.scroll_back = self.scroll_back.saturating_sub(SCROLL_STEP),
        }
        Flow::Continue
    }

    fn submit(&mut self) {
        match self.controller.submit_input() {
            Submission::Streaming => {
                self.scroll_back = 0;
                self.status = None;
            }
            Submission::Failed(e) => {
                self.scroll_back = 0;
                self.status = Some(e.to_string());
            }
            Submission::Ignored | Submission::Busy => {}
        }
    }

    /// Next step of the active response, if any.
    pub async fn pump(&mut self) -> Option<StreamProgress> {
        self.controller.pump().await
    }

    pub fn on_progress(&mut self, progress: StreamProgress) {
        if let StreamProgress::Failed(e) = progress {
            self.status = Some(e.to_string());
        }
    }

    pub fn on_frame(&mut self) {
        self.frame = self.frame.wrapping_add(1);
    }

    /// Stop any in-flight response before the terminal is released.
    pub fn shutdown(&mut self) {
        if self.controller.cancel() {
            tracing::info!("Cancelled in-flight response on exit");
        }
    }
}
