#[cfg(test)]
#[path = "ui_test.rs"]
mod tests;

use std::io;
use std::path;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::List;
use ratatui::widgets::ListItem;
use ratatui::widgets::ListState;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Tabs;
use ratatui::widgets::Wrap;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tui_textarea::TextArea;

use crate::domain::models::Action;
use crate::domain::models::DocSection;
use crate::domain::models::Event;
use crate::domain::models::Message;
use crate::domain::models::Role;
use crate::domain::models::Settings;
use crate::domain::models::SettingsField;
use crate::domain::models::GEMINI_MODELS;
use crate::domain::services::clipboard::ClipboardService;
use crate::domain::services::clipboard::CopyPayload;
use crate::domain::services::events::EventsService;
use crate::domain::services::Exports;

const NOTICE_TICKS: u8 = 16;
const MESSAGE_FILENAME: &str = "mr-dep-message.txt";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Tab {
    Chat,
    Gallery,
    Docs,
    Settings,
}

impl Tab {
    fn index(&self) -> usize {
        match self {
            Tab::Chat => return 0,
            Tab::Gallery => return 1,
            Tab::Docs => return 2,
            Tab::Settings => return 3,
        }
    }

    fn next(&self) -> Tab {
        match self {
            Tab::Chat => return Tab::Gallery,
            Tab::Gallery => return Tab::Docs,
            Tab::Docs => return Tab::Settings,
            Tab::Settings => return Tab::Chat,
        }
    }

    fn previous(&self) -> Tab {
        match self {
            Tab::Chat => return Tab::Settings,
            Tab::Gallery => return Tab::Chat,
            Tab::Docs => return Tab::Gallery,
            Tab::Settings => return Tab::Docs,
        }
    }
}

const SETTINGS_FIELDS: &[&str] = &["API key", "Model", "Temperature", "Max tokens"];

fn wrap_line(text: &str, line_max_width: usize) -> Vec<String> {
    let mut lines: Vec<String> = vec![];

    for full_line in text.split('\n') {
        if full_line.trim().is_empty() {
            lines.push(" ".to_string());
            continue;
        }

        let mut char_count = 0;
        let mut current_line: Vec<&str> = vec![];

        for word in full_line.split(' ') {
            if word.len() + char_count + 1 > line_max_width && !current_line.is_empty() {
                lines.push(current_line.join(" ").trim_end().to_string());
                current_line = vec![word];
                char_count = word.len() + 1;
            } else {
                current_line.push(word);
                char_count += word.len() + 1;
            }
        }
        if !current_line.is_empty() {
            lines.push(current_line.join(" ").trim_end().to_string());
        }
    }

    return lines;
}

struct View<'a> {
    tab: Tab,
    persona_name: String,
    messages: Vec<Message>,
    waiting: bool,
    tick: usize,
    notice: Option<String>,
    notice_ticks: u8,
    confirm_clear: bool,
    settings: Settings,
    gallery: Vec<path::PathBuf>,
    gallery_selected: usize,
    docs: Vec<DocSection>,
    docs_selected: usize,
    settings_selected: usize,
    scroll: usize,
    stick_to_bottom: bool,
    textarea: TextArea<'a>,
    key_input: TextArea<'a>,
    exports: Exports,
}

impl<'a> View<'a> {
    fn new(persona_name: String, gallery: Vec<path::PathBuf>, docs: Vec<DocSection>) -> View<'a> {
        return View {
            tab: Tab::Chat,
            persona_name,
            messages: vec![],
            waiting: false,
            tick: 0,
            notice: None,
            notice_ticks: 0,
            confirm_clear: false,
            settings: Settings::default(),
            gallery,
            gallery_selected: 0,
            docs,
            docs_selected: 0,
            settings_selected: 0,
            scroll: 0,
            stick_to_bottom: true,
            textarea: TextArea::default(),
            key_input: TextArea::default(),
            exports: Exports::default(),
        };
    }

    fn set_notice(&mut self, text: &str) {
        self.notice = Some(text.to_string());
        self.notice_ticks = NOTICE_TICKS;
    }

    fn on_tick(&mut self) {
        self.tick += 1;
        if self.notice_ticks > 0 {
            self.notice_ticks -= 1;
            if self.notice_ticks == 0 {
                self.notice = None;
                self.confirm_clear = false;
            }
        }
    }

    /// The message the chat copy/save actions act on: the most recent
    /// assistant reply, never a user turn.
    fn latest_reply(&self) -> Option<&Message> {
        return self.messages.iter().rev().find(|message| {
            return message.role == Role::Assistant;
        });
    }

    fn chat_lines(&self, width: usize) -> Vec<Line<'static>> {
        let mut lines: Vec<Line> = vec![];

        if self.messages.is_empty() && !self.waiting {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("Hi. I'm {}.", self.persona_name),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(
                "Ask your question and I'll help you come up with content ideas.",
            ));
            return lines;
        }

        for message in &self.messages {
            let label = match message.role {
                Role::User => Span::styled("You", Style::default().fg(Color::Cyan)),
                Role::Assistant => Span::styled(
                    self.persona_name.to_string(),
                    Style::default().fg(Color::Yellow),
                ),
            };
            lines.push(Line::from(label));

            for line in wrap_line(&message.content, width) {
                lines.push(Line::from(line));
            }
            lines.push(Line::from(""));
        }

        if self.waiting {
            let dots = ".".repeat(self.tick % 4);
            lines.push(Line::from(Span::styled(
                format!("{} is thinking{dots}", self.persona_name),
                Style::default().fg(Color::DarkGray),
            )));
        }

        return lines;
    }

    fn bottom_title(&self) -> String {
        if let Some(notice) = &self.notice {
            return notice.to_string();
        }

        match self.tab {
            Tab::Chat => {
                return "Enter: send | Ctrl+Y/Ctrl+S: copy/save reply | Ctrl+X: clear | Ctrl+C: quit"
                    .to_string()
            }
            Tab::Gallery => {
                return "c: copy path | s: save to downloads | Tab: switch | Ctrl+C: quit"
                    .to_string()
            }
            Tab::Docs => {
                return "c: copy card | s: save to downloads | Tab: switch | Ctrl+C: quit"
                    .to_string()
            }
            Tab::Settings => {
                return "Up/Down: field | Left/Right: adjust | Enter: save key | Tab: switch"
                    .to_string()
            }
        }
    }

    fn render<B: Backend>(&mut self, frame: &mut Frame<'_, B>) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(4),
            ])
            .split(frame.size());

        let titles = vec![
            Line::from("Chat"),
            Line::from("Gallery"),
            Line::from("Docs"),
            Line::from("Settings"),
        ];
        let tabs = Tabs::new(titles)
            .select(self.tab.index())
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, layout[0]);

        match self.tab {
            Tab::Chat => self.render_chat(frame, layout[1]),
            Tab::Gallery => self.render_gallery(frame, layout[1]),
            Tab::Docs => self.render_docs(frame, layout[1]),
            Tab::Settings => self.render_settings(frame, layout[1]),
        }

        let bottom_block = Block::default()
            .borders(Borders::ALL)
            .title(self.bottom_title());
        if self.tab == Tab::Chat {
            self.textarea.set_block(bottom_block);
            frame.render_widget(self.textarea.widget(), layout[2]);
        } else {
            frame.render_widget(Paragraph::new("").block(bottom_block), layout[2]);
        }
    }

    fn render_chat<B: Backend>(&mut self, frame: &mut Frame<'_, B>, area: Rect) {
        let width = area.width.saturating_sub(2).max(10) as usize;
        let height = area.height.saturating_sub(2) as usize;
        let lines = self.chat_lines(width);

        let max_scroll = lines.len().saturating_sub(height);
        if self.stick_to_bottom || self.scroll > max_scroll {
            self.scroll = max_scroll;
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Chat"))
            .scroll((self.scroll as u16, 0));
        frame.render_widget(paragraph, area);
    }

    fn render_gallery<B: Backend>(&mut self, frame: &mut Frame<'_, B>, area: Rect) {
        if self.gallery.is_empty() {
            let paragraph = Paragraph::new("Add images to the gallery directory to see them here.")
                .block(Block::default().borders(Borders::ALL).title("Gallery"))
                .wrap(Wrap { trim: false });
            frame.render_widget(paragraph, area);
            return;
        }

        let items = self
            .gallery
            .iter()
            .map(|image| {
                let name = image
                    .file_name()
                    .and_then(|name| {
                        return name.to_str();
                    })
                    .unwrap_or("?");
                return ListItem::new(name.to_string());
            })
            .collect::<Vec<ListItem>>();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Gallery"))
            .highlight_symbol(">> ")
            .highlight_style(Style::default().fg(Color::Yellow));

        let mut state = ListState::default();
        state.select(Some(self.gallery_selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn render_docs<B: Backend>(&mut self, frame: &mut Frame<'_, B>, area: Rect) {
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Percentage(30), Constraint::Percentage(70)])
            .split(area);

        let items = self
            .docs
            .iter()
            .map(|section| {
                return ListItem::new(section.title.to_string());
            })
            .collect::<Vec<ListItem>>();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Docs"))
            .highlight_symbol(">> ")
            .highlight_style(Style::default().fg(Color::Yellow));

        let mut state = ListState::default();
        state.select(Some(self.docs_selected));
        frame.render_stateful_widget(list, layout[0], &mut state);

        let body = match self.docs.get(self.docs_selected) {
            Some(section) => section.plain_text(),
            None => "".to_string(),
        };
        let paragraph = Paragraph::new(body)
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, layout[1]);
    }

    fn render_settings<B: Backend>(&mut self, frame: &mut Frame<'_, B>, area: Rect) {
        let masked_key = if self.settings.api_key.is_empty() {
            "(not set)".to_string()
        } else {
            "•".repeat(8)
        };
        let values = vec![
            masked_key,
            self.settings.model.to_string(),
            format!("{:.1}", self.settings.temperature),
            self.settings.max_tokens.to_string(),
        ];

        let mut lines: Vec<Line> = vec![];
        for (idx, field) in SETTINGS_FIELDS.iter().enumerate() {
            let marker = if idx == self.settings_selected {
                "> "
            } else {
                "  "
            };
            let style = if idx == self.settings_selected {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            lines.push(Line::from(Span::styled(
                format!("{marker}{field}: {}", values[idx]),
                style,
            )));
        }
        lines.push(Line::from(""));

        if self.settings_selected == 0 {
            lines.push(Line::from("Type the new API key and press Enter:"));
            lines.push(Line::from(self.key_input.lines().join("")));
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Settings"))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }
}

pub fn destruct_terminal_for_panic() {
    disable_raw_mode().unwrap();
    crossterm::execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture).unwrap();
    crossterm::execute!(io::stdout(), cursor::Show).unwrap();
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    view: &mut View<'_>,
    tx: mpsc::UnboundedSender<Action>,
    events: &mut EventsService,
) -> Result<()> {
    loop {
        terminal.draw(|frame| {
            view.render(frame);
        })?;

        match events.next().await? {
            Event::UserMessageAppended(message) => {
                view.messages.push(message);
                view.stick_to_bottom = true;
            }
            Event::AssistantMessageAppended(message) => {
                view.messages.push(message);
                view.stick_to_bottom = true;
            }
            Event::PendingStarted() => {
                view.waiting = true;
                view.stick_to_bottom = true;
            }
            Event::PendingEnded() => {
                view.waiting = false;
            }
            Event::HistoryCleared() => {
                view.messages = vec![];
                view.scroll = 0;
                view.stick_to_bottom = true;
                view.set_notice("Chat history cleared.");
            }
            Event::HistoryRestored(messages) => {
                view.messages = messages;
                view.stick_to_bottom = true;
            }
            Event::SettingsUpdated(settings) => {
                view.settings = settings;
            }
            Event::Notice(text) => {
                view.set_notice(&text);
            }
            Event::UITick() => {
                view.on_tick();
            }
            Event::KeyboardCTRLC() => {
                break;
            }
            Event::KeyboardCTRLX() => {
                if view.tab != Tab::Chat {
                    continue;
                }
                if view.confirm_clear {
                    view.confirm_clear = false;
                    tx.send(Action::ClearHistory())?;
                } else {
                    view.confirm_clear = true;
                    view.set_notice("Press Ctrl+X again to clear the chat history.");
                }
            }
            Event::KeyboardCTRLY() => {
                if view.tab != Tab::Chat {
                    continue;
                }
                let reply = match view.latest_reply() {
                    Some(message) => message.content.to_string(),
                    None => continue,
                };
                if ClipboardService::copy(CopyPayload::ChatReply(reply)).is_ok() {
                    view.set_notice("Copied!");
                } else {
                    view.set_notice("Clipboard is unavailable.");
                }
            }
            Event::KeyboardCTRLS() => {
                if view.tab != Tab::Chat {
                    continue;
                }
                let reply = match view.latest_reply() {
                    Some(message) => message.content.to_string(),
                    None => continue,
                };
                match view.exports.save_text(MESSAGE_FILENAME, &reply).await {
                    Ok(target) => view.set_notice(&format!("Saved to {}", target.display())),
                    Err(err) => view.set_notice(&format!("Save failed: {err}")),
                }
            }
            Event::KeyboardTab() => {
                view.tab = view.tab.next();
                view.confirm_clear = false;
            }
            Event::KeyboardBackTab() => {
                view.tab = view.tab.previous();
                view.confirm_clear = false;
            }
            Event::KeyboardEnter() => {
                view.confirm_clear = false;
                match view.tab {
                    Tab::Chat => {
                        if view.waiting {
                            continue;
                        }
                        let input_str = view.textarea.lines().join("\n");
                        if input_str.trim().is_empty() {
                            continue;
                        }
                        view.textarea = TextArea::default();
                        tx.send(Action::SubmitPrompt(input_str))?;
                    }
                    Tab::Settings => {
                        if view.settings_selected == 0 {
                            let api_key = view.key_input.lines().join("");
                            view.key_input = TextArea::default();
                            tx.send(Action::UpdateSetting(SettingsField::ApiKey(api_key)))?;
                        }
                    }
                    _ => {}
                }
            }
            Event::KeyboardUp() => {
                view.confirm_clear = false;
                match view.tab {
                    Tab::Chat => {
                        view.scroll = view.scroll.saturating_sub(1);
                        view.stick_to_bottom = false;
                    }
                    Tab::Gallery => {
                        view.gallery_selected = view.gallery_selected.saturating_sub(1);
                    }
                    Tab::Docs => {
                        view.docs_selected = view.docs_selected.saturating_sub(1);
                    }
                    Tab::Settings => {
                        view.settings_selected = view.settings_selected.saturating_sub(1);
                    }
                }
            }
            Event::KeyboardDown() => {
                view.confirm_clear = false;
                match view.tab {
                    Tab::Chat => {
                        view.scroll += 1;
                    }
                    Tab::Gallery => {
                        if view.gallery_selected + 1 < view.gallery.len() {
                            view.gallery_selected += 1;
                        }
                    }
                    Tab::Docs => {
                        if view.docs_selected + 1 < view.docs.len() {
                            view.docs_selected += 1;
                        }
                    }
                    Tab::Settings => {
                        if view.settings_selected + 1 < SETTINGS_FIELDS.len() {
                            view.settings_selected += 1;
                        }
                    }
                }
            }
            Event::KeyboardLeft() => {
                handle_settings_adjust(view, &tx, false)?;
            }
            Event::KeyboardRight() => {
                handle_settings_adjust(view, &tx, true)?;
            }
            Event::KeyboardPaste(text) => {
                if view.tab == Tab::Chat {
                    view.textarea.insert_str(&text.replace('\r', "\n"));
                } else if view.tab == Tab::Settings && view.settings_selected == 0 {
                    view.key_input.insert_str(&text);
                }
            }
            Event::KeyboardCharInput(input) => {
                view.confirm_clear = false;
                match view.tab {
                    Tab::Chat => {
                        view.textarea.input(input);
                    }
                    Tab::Settings => {
                        if view.settings_selected == 0 {
                            view.key_input.input(input);
                        }
                    }
                    Tab::Gallery => {
                        handle_list_action(view, input, true).await?;
                    }
                    Tab::Docs => {
                        handle_list_action(view, input, false).await?;
                    }
                }
            }
        }
    }

    return Ok(());
}

fn handle_settings_adjust(
    view: &mut View<'_>,
    tx: &mpsc::UnboundedSender<Action>,
    increase: bool,
) -> Result<()> {
    if view.tab != Tab::Settings {
        return Ok(());
    }

    match view.settings_selected {
        1 => {
            let current = GEMINI_MODELS
                .iter()
                .position(|model| {
                    return *model == view.settings.model;
                })
                .unwrap_or(0);
            let next = if increase {
                (current + 1) % GEMINI_MODELS.len()
            } else {
                (current + GEMINI_MODELS.len() - 1) % GEMINI_MODELS.len()
            };
            tx.send(Action::UpdateSetting(SettingsField::Model(
                GEMINI_MODELS[next].to_string(),
            )))?;
        }
        2 => {
            let delta = if increase { 0.1 } else { -0.1 };
            tx.send(Action::UpdateSetting(SettingsField::Temperature(
                view.settings.temperature + delta,
            )))?;
        }
        3 => {
            let next = if increase {
                view.settings.max_tokens.saturating_add(256)
            } else {
                view.settings.max_tokens.saturating_sub(256)
            };
            tx.send(Action::UpdateSetting(SettingsField::MaxTokens(next)))?;
        }
        _ => {}
    }

    return Ok(());
}

async fn handle_list_action(
    view: &mut View<'_>,
    input: tui_textarea::Input,
    is_gallery: bool,
) -> Result<()> {
    let key = match input.key {
        tui_textarea::Key::Char(key) => key,
        _ => return Ok(()),
    };

    if is_gallery {
        let image = match view.gallery.get(view.gallery_selected) {
            Some(image) => image.clone(),
            None => return Ok(()),
        };

        if key == 'c' {
            if ClipboardService::copy(CopyPayload::ImagePath(image)).is_ok() {
                view.set_notice("Copied!");
            } else {
                view.set_notice("Clipboard is unavailable.");
            }
        } else if key == 's' {
            match view.exports.save_file(&image).await {
                Ok(target) => view.set_notice(&format!("Saved to {}", target.display())),
                Err(err) => view.set_notice(&format!("Save failed: {err}")),
            }
        }

        return Ok(());
    }

    let section = match view.docs.get(view.docs_selected) {
        Some(section) => section.clone(),
        None => return Ok(()),
    };

    if key == 'c' {
        if ClipboardService::copy(CopyPayload::DocCard(section.plain_text())).is_ok() {
            view.set_notice("Copied!");
        } else {
            view.set_notice("Clipboard is unavailable.");
        }
    } else if key == 's' {
        match view
            .exports
            .save_text(&section.filename(), &section.plain_text())
            .await
        {
            Ok(target) => view.set_notice(&format!("Saved to {}", target.display())),
            Err(err) => view.set_notice(&format!("Save failed: {err}")),
        }
    }

    return Ok(());
}

pub async fn start(
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
    persona_name: String,
    gallery: Vec<path::PathBuf>,
    docs: Vec<DocSection>,
) -> Result<()> {
    enable_raw_mode()?;
    crossterm::execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let mut events = EventsService::new(rx);
    let mut view = View::new(persona_name, gallery, docs);

    let res = start_loop(&mut terminal, &mut view, tx, &mut events).await;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    return res;
}
