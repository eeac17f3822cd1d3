//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation (form <-> results)
//! - Input event handling
//! - Synchronous assessment on submit

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use crate::adapters::model::{DigestPolicy, JsonClassifier};
use crate::application::AssessmentService;
use crate::config::Settings;
use crate::tui::styles::MedicalTheme;

use super::ui::{
    form::{render_patient_form, PatientFormState},
    guide::{render_feature_descriptions, render_how_to},
    render_disclaimer,
    result::{render_result, ResultState},
};

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Form,
    Result,
}

/// Main application state
pub struct App {
    /// Current screen
    screen: Screen,

    /// Whether the app should quit
    should_quit: bool,

    /// Assessment service over the loaded model
    service: AssessmentService<JsonClassifier>,

    /// Cached model description for the sidebar
    model_summary: String,

    /// Patient form state
    form_state: PatientFormState,

    /// Result state
    result_state: ResultState,

    /// Whether the feature descriptions panel is open
    show_descriptions: bool,
}

impl App {
    /// Create a new application, loading the model named by `settings`.
    ///
    /// # Errors
    /// Returns error if the model cannot be found, verified or parsed.
    pub fn new(settings: &Settings) -> Result<Self> {
        let model_path = &settings.model_path;
        if !model_path.exists() {
            return Err(anyhow!(
                "Model path not found at {:?}. Set HEARTRISK_MODEL_PATH to a directory containing model.json.",
                model_path
            ));
        }

        // Refuse to start if the model cannot be loaded or verified.
        let classifier = JsonClassifier::load(model_path, &DigestPolicy::from_settings(settings))
            .map_err(|e| anyhow!("Failed to load model from {:?}: {}", model_path, e))?;

        let service = AssessmentService::new(Arc::new(classifier))?;
        Ok(Self::with_service(service))
    }

    /// Create application around an existing service.
    #[must_use]
    pub fn with_service(service: AssessmentService<JsonClassifier>) -> Self {
        Self {
            screen: Screen::Form,
            should_quit: false,
            model_summary: service.model_summary(),
            service,
            form_state: PatientFormState::default(),
            result_state: ResultState::default(),
            show_descriptions: false,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;

            if event::poll(Duration::from_millis(250))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn draw(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Content
                Constraint::Length(2), // Disclaimer
            ])
            .split(f.area());

        render_header(f, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(30), Constraint::Min(0)])
            .split(chunks[1]);

        render_how_to(f, body[0], &self.model_summary);

        let main_area = if self.show_descriptions {
            let split = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(11)])
                .split(body[1]);
            render_feature_descriptions(f, split[1]);
            split[0]
        } else {
            body[1]
        };

        match self.screen {
            Screen::Form => render_patient_form(f, main_area, &self.form_state),
            Screen::Result => render_result(f, main_area, &self.result_state),
        }

        render_disclaimer(f, chunks[2]);
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key, KeyCode::Char('q') | KeyCode::Char('c'))
        {
            self.should_quit = true;
            return;
        }

        if key == KeyCode::Char('?') {
            self.show_descriptions = !self.show_descriptions;
            return;
        }

        match self.screen {
            Screen::Form => self.handle_form_key(key),
            Screen::Result => self.handle_result_key(key),
        }
    }

    fn handle_form_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Up | KeyCode::BackTab => {
                self.form_state.prev_field();
            }
            KeyCode::Down | KeyCode::Tab => {
                self.form_state.next_field();
            }
            KeyCode::Left => {
                self.form_state.cycle_choice(false);
            }
            KeyCode::Right => {
                self.form_state.cycle_choice(true);
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.form_state.reset();
            }
            KeyCode::Char(c) => {
                self.form_state.input_char(c);
            }
            KeyCode::Backspace => {
                self.form_state.delete_char();
            }
            KeyCode::Delete => {
                self.form_state.clear_field();
            }
            KeyCode::Enter => {
                self.submit_form();
            }
            _ => {}
        }
    }

    fn handle_result_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter | KeyCode::Esc => {
                self.screen = Screen::Form;
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.form_state.reset();
                self.result_state = ResultState::Idle;
                self.screen = Screen::Form;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        let features = match self.form_state.to_features() {
            Ok(features) => features,
            Err(e) => {
                self.form_state.error_message = Some(e);
                return;
            }
        };

        self.result_state = match self.service.assess(&features) {
            Ok(assessment) => ResultState::Complete { assessment },
            Err(crate::HeartRiskError::Validation(message)) => {
                self.form_state.error_message = Some(message);
                return;
            }
            Err(e) => {
                tracing::error!("Assessment failed: {}", e);
                ResultState::Error {
                    message: e.to_string(),
                }
            }
        };
        self.screen = Screen::Result;
    }
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ♥ ", MedicalTheme::danger()),
        Span::styled("Welcome to Heart Disease Prediction!", MedicalTheme::title()),
        Span::styled(" │ ", MedicalTheme::text_muted()),
        Span::styled("Clinical risk assessment", MedicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use std::path::Path;

    fn test_app() -> App {
        let settings = Settings {
            model_path: Path::new(env!("CARGO_MANIFEST_DIR")).join("models"),
            ..Settings::default()
        };
        App::new(&settings).expect("App should start with bundled model")
    }

    fn press(app: &mut App, key: KeyCode) {
        app.handle_key(key, KeyModifiers::NONE);
    }

    #[test]
    fn test_missing_model_path_fails() {
        let settings = Settings {
            model_path: "/nonexistent/heartrisk-model".into(),
            ..Settings::default()
        };
        assert!(App::new(&settings).is_err());
    }

    #[test]
    fn test_submit_defaults_shows_result() {
        let mut app = test_app();
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen, Screen::Result);
        match &app.result_state {
            ResultState::Complete { assessment } => assert_eq!(assessment.level, 0),
            other => panic!("unexpected state {other:?}"),
        }

        // Returning keeps the entered values.
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, Screen::Form);
        assert_eq!(app.form_state.fields[0].value, "45");
    }

    #[test]
    fn test_invalid_input_stays_on_form() {
        let mut app = test_app();
        press(&mut app, KeyCode::Delete);
        press(&mut app, KeyCode::Char('0'));
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen, Screen::Form);
        assert!(app.form_state.error_message.is_some());
    }

    #[test]
    fn test_new_patient_resets_form() {
        let mut app = test_app();
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.form_state.fields[1].value, "1");

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.screen, Screen::Form);
        assert_eq!(app.form_state.fields[1].value, "0");
        assert!(matches!(app.result_state, ResultState::Idle));
    }

    #[test]
    fn test_quit_keys() {
        let mut app = test_app();
        app.handle_key(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(app.should_quit);

        let mut app = test_app();
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[test]
    fn test_descriptions_toggle_and_draw() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_descriptions);

        let mut terminal = Terminal::new(TestBackend::new(140, 45)).expect("terminal");
        terminal.draw(|f| app.draw(f)).expect("draw form");
        press(&mut app, KeyCode::Enter);
        terminal.draw(|f| app.draw(f)).expect("draw result");
    }
}
