use tui_textarea::Input;

use super::Message;
use super::Settings;

/// Everything the view reacts to: session signals emitted by the session
/// manager, and keyboard/terminal input folded into the same stream.
pub enum Event {
    UserMessageAppended(Message),
    AssistantMessageAppended(Message),
    PendingStarted(),
    PendingEnded(),
    HistoryCleared(),
    HistoryRestored(Vec<Message>),
    SettingsUpdated(Settings),
    Notice(String),
    KeyboardCharInput(Input),
    KeyboardCTRLC(),
    KeyboardCTRLX(),
    KeyboardCTRLY(),
    KeyboardCTRLS(),
    KeyboardEnter(),
    KeyboardTab(),
    KeyboardBackTab(),
    KeyboardUp(),
    KeyboardDown(),
    KeyboardLeft(),
    KeyboardRight(),
    KeyboardPaste(String),
    UITick(),
}
