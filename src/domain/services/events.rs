use anyhow::Result;
use crossterm::event::Event as CrosstermEvent;
use crossterm::event::EventStream;
use crossterm::event::KeyCode;
use crossterm::event::KeyModifiers;
use crossterm::event::MouseEventKind;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time;

use crate::domain::models::Event;

/// Folds terminal input and session signals into a single event stream for
/// the view, with a periodic tick driving the pending animation.
pub struct EventsService {
    crossterm_events: EventStream,
    events: mpsc::UnboundedReceiver<Event>,
}

impl EventsService {
    pub fn new(events: mpsc::UnboundedReceiver<Event>) -> EventsService {
        return EventsService {
            crossterm_events: EventStream::new(),
            events,
        };
    }

    fn handle_crossterm(&self, event: CrosstermEvent) -> Option<Event> {
        match event {
            CrosstermEvent::Paste(text) => {
                return Some(Event::KeyboardPaste(text));
            }
            CrosstermEvent::Mouse(mouseevent) => {
                match mouseevent.kind {
                    MouseEventKind::ScrollUp => {
                        return Some(Event::KeyboardUp());
                    }
                    MouseEventKind::ScrollDown => {
                        return Some(Event::KeyboardDown());
                    }
                    _ => {
                        return None;
                    }
                }
            }
            CrosstermEvent::Key(keyevent) => {
                match keyevent.code {
                    KeyCode::Char('c') if keyevent.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Some(Event::KeyboardCTRLC());
                    }
                    KeyCode::Char('x') if keyevent.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Some(Event::KeyboardCTRLX());
                    }
                    KeyCode::Char('y') if keyevent.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Some(Event::KeyboardCTRLY());
                    }
                    KeyCode::Char('s') if keyevent.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Some(Event::KeyboardCTRLS());
                    }
                    KeyCode::Tab => {
                        return Some(Event::KeyboardTab());
                    }
                    KeyCode::BackTab => {
                        return Some(Event::KeyboardBackTab());
                    }
                    KeyCode::Enter => {
                        return Some(Event::KeyboardEnter());
                    }
                    KeyCode::Up => {
                        return Some(Event::KeyboardUp());
                    }
                    KeyCode::Down => {
                        return Some(Event::KeyboardDown());
                    }
                    KeyCode::Left => {
                        return Some(Event::KeyboardLeft());
                    }
                    KeyCode::Right => {
                        return Some(Event::KeyboardRight());
                    }
                    _ => {
                        return Some(Event::KeyboardCharInput(keyevent.into()));
                    }
                }
            }
            _ => return None,
        }
    }

    pub async fn next(&mut self) -> Result<Event> {
        loop {
            let evt = tokio::select! {
                event = self.events.recv() => event,
                event = self.crossterm_events.next() => match event {
                    Some(Ok(input)) => self.handle_crossterm(input),
                    Some(Err(_)) => None,
                    None => None
                },
                _ = time::sleep(time::Duration::from_millis(250)) => Some(Event::UITick())
            };

            if let Some(event) = evt {
                return Ok(event);
            }
        }
    }
}
