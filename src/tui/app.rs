//! Main application state and rendering

use crate::data::{Direction as Heading, Severity};
use crate::game::{CaseSummary, Decision, GameMessage, GamePhase, Offer, Session};
use crate::tui::widgets::{AlertIndicator, DramaticBox, EvidenceMeter};
use crate::tui::{centered_rect, severity_color, styled_block, Theme, HELP_TEXT, SMALL_LOGO};
use crate::tui::{create_content_layout, create_main_area_layout, create_main_layout};
use crate::{GameError, VERSION};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};
use std::time::Duration;
use tracing::error;

/// Application state
pub struct App {
    pub session: Session,
    pub theme: Theme,
    pub running: bool,
    pub show_help: bool,
    pub current_screen: Screen,
    /// The accusation currently on the table
    pub pending_offer: Option<Offer>,
    /// Filled when the player leaves
    pub summary: Option<CaseSummary>,
}

/// Current screen being displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Exploring,
    AccusationPrompt,
    ReplayPrompt,
    Summary,
}

impl App {
    /// Wrap a fresh session and look around the entrance hall.
    pub fn new(mut session: Session) -> crate::Result<Self> {
        session.enter_current_room()?;
        Ok(Self {
            session,
            theme: Theme::default(),
            running: true,
            show_help: false,
            current_screen: Screen::Exploring,
            pending_offer: None,
            summary: None,
        })
    }

    /// Handle keyboard input
    pub fn handle_input(&mut self) -> std::io::Result<bool> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key.code);
                }
            }
        }
        Ok(self.running)
    }

    /// Apply one key press to the current screen.
    pub fn handle_key(&mut self, code: KeyCode) {
        if self.show_help {
            if matches!(code, KeyCode::Esc | KeyCode::Char('?')) {
                self.show_help = false;
            }
            return;
        }

        let key = match code {
            KeyCode::Char('?') => {
                self.show_help = true;
                return;
            }
            KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
            other => other,
        };

        let result = match self.current_screen {
            Screen::Exploring => self.handle_exploring(key),
            Screen::AccusationPrompt => self.handle_accusation(key),
            Screen::ReplayPrompt => self.handle_replay(key),
            Screen::Summary => {
                self.running = false;
                Ok(())
            }
        };

        if let Err(e) = result {
            self.report_error(e);
        }
    }

    fn handle_exploring(&mut self, key: KeyCode) -> crate::Result<()> {
        let heading = match key {
            KeyCode::Char('e') => Heading::Left,
            KeyCode::Char('d') => Heading::Right,
            KeyCode::Char('s') => {
                self.summary = Some(self.session.finish());
                self.current_screen = Screen::Summary;
                return Ok(());
            }
            _ => {
                self.invalid_key("Invalid option. Use e (left), d (right) or s (stop).");
                return Ok(());
            }
        };

        let report = self.session.explore(heading)?;
        if self.session.phase() == GamePhase::AwaitingVerdict {
            self.pending_offer = report.evaluation.and_then(|e| e.offer);
            self.current_screen = Screen::AccusationPrompt;
        }
        Ok(())
    }

    fn handle_accusation(&mut self, key: KeyCode) -> crate::Result<()> {
        let decision = match key {
            KeyCode::Char('s') => Decision::Accuse,
            KeyCode::Char('n') => Decision::Decline,
            _ => {
                self.invalid_key("Invalid option. Answer s (accuse) or n (keep looking).");
                return Ok(());
            }
        };

        self.session.resolve_accusation(decision)?;
        self.pending_offer = None;
        self.current_screen = match self.session.phase() {
            GamePhase::CaseClosed => Screen::ReplayPrompt,
            _ => Screen::Exploring,
        };
        Ok(())
    }

    fn handle_replay(&mut self, key: KeyCode) -> crate::Result<()> {
        match key {
            KeyCode::Char('s') => {
                self.session.play_again(true)?;
                self.session.enter_current_room()?;
                self.current_screen = Screen::Exploring;
            }
            KeyCode::Char('n') => {
                self.session.play_again(false)?;
                self.summary = Some(self.session.summary());
                self.current_screen = Screen::Summary;
            }
            _ => self.invalid_key("Invalid option. Answer s (new case) or n (leave)."),
        }
        Ok(())
    }

    fn invalid_key(&mut self, text: &str) {
        self.session
            .add_message(GameMessage::alert(Severity::Warning, "Input", text));
    }

    fn report_error(&mut self, e: GameError) {
        error!(error = %e, screen = ?self.current_screen, "action failed");
        self.session
            .add_message(GameMessage::alert(Severity::Critical, "System", &e.to_string()));
    }

    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame) {
        match self.current_screen {
            Screen::Summary => self.render_summary(frame),
            Screen::Exploring => self.render_game(frame),
            Screen::AccusationPrompt => {
                self.render_game(frame);
                self.render_accusation_prompt(frame);
            }
            Screen::ReplayPrompt => {
                self.render_game(frame);
                self.render_replay_prompt(frame);
            }
        }

        // Overlay help if showing
        if self.show_help {
            self.render_help_overlay(frame);
        }
    }

    fn render_game(&self, frame: &mut Frame) {
        let layout = create_main_layout(frame.area());
        self.render_header(frame, layout[0]);

        let content_layout = create_content_layout(layout[1]);
        self.render_side_panel(frame, content_layout[0]);

        let main_layout = create_main_area_layout(content_layout[1]);
        self.render_messages(frame, main_layout[0]);
        self.render_notebook(frame, main_layout[1]);

        self.render_status_bar(frame, layout[2]);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let header_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(19),
                Constraint::Min(20),
                Constraint::Length(24),
            ])
            .split(area);

        let border = Style::default().fg(self.theme.border);

        let logo = Paragraph::new(SMALL_LOGO)
            .style(Style::default().fg(self.theme.accent).add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL).border_style(border));
        frame.render_widget(logo, header_layout[0]);

        let room = Paragraph::new(self.session.current_room().name().to_string())
            .style(Style::default().fg(self.theme.warning))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(border));
        frame.render_widget(room, header_layout[1]);

        let case = Paragraph::new(format!(" Case #{} ", self.session.stats.cases_opened))
            .style(Style::default().fg(self.theme.fg))
            .alignment(Alignment::Right)
            .block(Block::default().borders(Borders::ALL).border_style(border));
        frame.render_widget(case, header_layout[2]);
    }

    fn render_side_panel(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(6),  // Location
                Constraint::Length(7),  // Actions
                Constraint::Min(3),     // Suspects
            ])
            .split(area);

        let map = self.session.map();
        let room = self.session.current_room();
        let exit = |heading: Heading| -> String {
            room.child(heading)
                .map(|id| map.room(id).name().to_string())
                .unwrap_or_else(|| "dead end".to_string())
        };
        let depth = map.depth(self.session.current_room_id()).unwrap_or(0);

        let location = vec![
            Line::from(vec![
                Span::raw("Floor depth: "),
                Span::styled(depth.to_string(), Style::default().fg(self.theme.accent)),
            ]),
            Line::from(vec![
                Span::raw("Left:  "),
                Span::styled(exit(Heading::Left), Style::default().fg(self.theme.fg)),
            ]),
            Line::from(vec![
                Span::raw("Right: "),
                Span::styled(exit(Heading::Right), Style::default().fg(self.theme.fg)),
            ]),
        ];
        let location = Paragraph::new(location).block(styled_block("Location", &self.theme));
        frame.render_widget(location, chunks[0]);

        let actions = vec![
            ListItem::new("  [E] Go left"),
            ListItem::new("  [D] Go right"),
            ListItem::new("  [S] Stop and review"),
            ListItem::new("  ────────────────"),
            ListItem::new("  [?] Help"),
        ];
        let action_list = List::new(actions).block(styled_block("Actions", &self.theme));
        frame.render_widget(action_list, chunks[1]);

        let block = styled_block("Suspects", &self.theme);
        let inner = block.inner(chunks[2]);
        frame.render_widget(block, chunks[2]);

        let threshold = self.session.engine().threshold();
        let tallies = self.session.ledger().tally(self.session.clues());
        let implicated = tallies.iter().filter(|t| t.clues > 0);
        for (row, tally) in implicated.take(usize::from(inner.height)).enumerate() {
            let line = Rect::new(inner.x, inner.y + row as u16, inner.width, 1);
            let meter = EvidenceMeter::new(tally.suspect.as_str(), tally.clues, threshold)
                .color(self.theme.warning)
                .ready_color(self.theme.alert);
            frame.render_widget(meter, line);
        }
    }

    fn render_messages(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // Log
                Constraint::Length(1), // Latest alert
            ])
            .split(area);

        let log = &self.session.message_log;
        let visible_lines = chunks[0].height.saturating_sub(2) as usize;
        let start = log.len().saturating_sub(visible_lines);
        let lines: Vec<Line> = log[start..]
            .iter()
            .map(|m| {
                let mut style = Style::default().fg(severity_color(&m.severity));
                if m.severity >= Severity::Warning {
                    style = style.add_modifier(Modifier::BOLD);
                }
                Line::from(vec![
                    Span::styled(
                        format!("{} ", m.timestamp.format("%H:%M:%S")),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(format!("[{}] ", m.source.to_uppercase()), style),
                    Span::styled(m.message.as_str(), style),
                ])
            })
            .collect();

        let messages = Paragraph::new(lines)
            .block(styled_block("Investigation", &self.theme))
            .wrap(Wrap { trim: false });
        frame.render_widget(messages, chunks[0]);

        if let Some(alert) = log.iter().rev().find(|m| m.severity >= Severity::Warning) {
            frame.render_widget(AlertIndicator::new(&alert.message, alert.severity), chunks[1]);
        }
    }

    fn render_notebook(&self, frame: &mut Frame, area: Rect) {
        let clues: Vec<ListItem> = self
            .session
            .clues()
            .in_order()
            .map(|clue| ListItem::new(format!(" • {}", clue)))
            .collect();

        let title = format!("Notebook ({} clues)", self.session.clues().len());
        let notebook = List::new(clues).block(styled_block(&title, &self.theme));
        frame.render_widget(notebook, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let status_text = format!(" {} | Press ? for help ", self.session.check_status());
        let status = Paragraph::new(status_text)
            .style(Style::default().fg(self.theme.fg).bg(Color::DarkGray));
        frame.render_widget(status, area);
    }

    fn render_accusation_prompt(&self, frame: &mut Frame) {
        let Some(offer) = &self.pending_offer else {
            return;
        };

        let mut lines = vec![
            format!("{} clues point at {}.", offer.evidence_count, offer.suspect),
            String::new(),
            "Clues found so far:".to_string(),
        ];
        lines.extend(offer.discovered.iter().map(|c| format!("  - {}", c)));
        lines.push(String::new());
        lines.push(format!("Accuse {}?  [s] yes   [n] keep looking", offer.suspect));

        let height = lines.len() as u16 + 2;
        let area = centered_rect(70, height, frame.area());
        frame.render_widget(Clear, area);
        frame.render_widget(
            DramaticBox::new("ACCUSATION")
                .content(lines)
                .border_color(self.theme.alert),
            area,
        );
    }

    fn render_replay_prompt(&self, frame: &mut Frame) {
        let lines = vec![
            "The investigation was conclusive.".to_string(),
            format!("{} is the culprit.", self.session.culprit()),
            String::new(),
            "Take another case?  [s] yes   [n] leave".to_string(),
        ];

        let area = centered_rect(50, 6, frame.area());
        frame.render_widget(Clear, area);
        frame.render_widget(
            DramaticBox::new("CASE CLOSED")
                .content(lines)
                .border_color(self.theme.success),
            area,
        );
    }

    fn render_help_overlay(&self, frame: &mut Frame) {
        let popup_area = centered_rect(55, 22, frame.area());
        frame.render_widget(Clear, popup_area);

        let help = Paragraph::new(HELP_TEXT)
            .style(Style::default().fg(self.theme.fg))
            .block(
                Block::default()
                    .title(format!(" Detective Quest v{} ", VERSION))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.accent)),
            );
        frame.render_widget(help, popup_area);
    }

    fn render_summary(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Clear, area);

        let mut text: Vec<Line> = vec![
            Line::from(Span::styled(
                "CASE FILE",
                Style::default().fg(self.theme.header).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        if let Some(summary) = &self.summary {
            text.extend(summary.to_string().lines().map(|l| Line::from(l.to_string())));
        }
        text.push(Line::from(""));
        text.push(Line::from(format!(
            "Cases solved: {}   Wrong accusations: {}",
            self.session.stats.games_won, self.session.stats.wrong_accusations
        )));
        text.push(Line::from(""));
        text.push(Line::from(Span::styled(
            "Press any key to leave the mansion",
            Style::default().fg(Color::DarkGray),
        )));

        let summary = Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .block(styled_block("Summary", &self.theme));
        frame.render_widget(summary, area);
    }
}
