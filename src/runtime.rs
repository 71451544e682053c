use std::cell::RefCell;
use std::io::{self, Stdout};
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde_json::Value;

use crate::{
    form::{FieldKind, FieldSpec, FormEngine, SubmitOutcome, ValidationRegistry, Values},
    ui::{self, UiContext},
};

const HELP_TEXT: &str = "Tab/Shift+Tab navigate • Space toggle • Enter submit • Ctrl+Q quit";
const READY_STATUS: &str = "Ready. Press Enter to submit.";

#[derive(Debug, Clone)]
pub struct UiOptions {
    pub auto_validate: bool,
    pub confirm_exit: bool,
    pub show_help: bool,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            auto_validate: false,
            confirm_exit: true,
            show_help: true,
        }
    }
}

/// Terminal front end for a [`FormEngine`]: binds keyboard input to the
/// engine's handlers and renders values and errors until the user submits
/// or quits.
pub struct FormUi {
    fields: Vec<FieldSpec>,
    validations: ValidationRegistry,
    title: Option<String>,
    options: UiOptions,
}

impl FormUi {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self {
            fields,
            validations: ValidationRegistry::new(),
            title: None,
            options: UiOptions::default(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_validations(mut self, validations: ValidationRegistry) -> Self {
        self.validations = validations;
        self
    }

    pub fn with_options(mut self, options: UiOptions) -> Self {
        self.options = options;
        self
    }

    /// Runs the form session. Returns the filtered submitted values, or
    /// `None` when the user quit without submitting.
    pub fn run(self) -> Result<Option<Values>> {
        let FormUi {
            fields,
            validations,
            title,
            options,
        } = self;

        let mut app = App::new(fields, validations, title, options);
        app.run()
    }
}

struct App {
    engine: FormEngine,
    submitted: Rc<RefCell<Option<Values>>>,
    focus: usize,
    status_message: String,
    dirty: bool,
    exit_armed: bool,
    should_quit: bool,
    title: Option<String>,
    options: UiOptions,
}

impl App {
    fn new(
        fields: Vec<FieldSpec>,
        validations: ValidationRegistry,
        title: Option<String>,
        options: UiOptions,
    ) -> Self {
        let submitted: Rc<RefCell<Option<Values>>> = Rc::new(RefCell::new(None));
        let sink = submitted.clone();
        let engine = FormEngine::new(fields)
            .with_validations(validations)
            .on_submit(move |values| *sink.borrow_mut() = Some(values.clone()));
        Self {
            engine,
            submitted,
            focus: 0,
            status_message: READY_STATUS.to_string(),
            dirty: false,
            exit_armed: false,
            should_quit: false,
            title,
            options,
        }
    }

    fn run(&mut self) -> Result<Option<Values>> {
        let mut terminal = TerminalGuard::new()?;
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            match event::read()? {
                Event::Key(key) => self.handle_key(key)?,
                Event::Resize(_, _) => {}
                Event::Mouse(_) => {}
                Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
            }
        }
        Ok(self.submitted.borrow_mut().take())
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let help = if self.options.show_help {
            Some(HELP_TEXT)
        } else {
            None
        };
        ui::draw(
            frame,
            UiContext {
                title: self.title.as_deref(),
                fields: self.engine.fields(),
                values: self.engine.values(),
                errors: self.engine.errors(),
                focused: self.focus,
                status_message: &self.status_message,
                dirty: self.dirty,
                help,
            },
        );
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('s') | KeyCode::Char('S') => {
                    self.on_submit();
                    return Ok(());
                }
                KeyCode::Char('q')
                | KeyCode::Char('Q')
                | KeyCode::Char('c')
                | KeyCode::Char('C') => {
                    self.on_exit();
                    return Ok(());
                }
                _ => {}
            }
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.focus_next(1);
                self.exit_armed = false;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus_next(-1);
                self.exit_armed = false;
            }
            KeyCode::Enter => self.on_submit(),
            KeyCode::Esc => self.on_exit(),
            _ => self.edit_focused(&key)?,
        }

        Ok(())
    }

    /// Moving focus off a field is the blur event: the whole form is
    /// revalidated so the vacated field's feedback is current.
    fn focus_next(&mut self, delta: i32) {
        let len = self.engine.fields().len();
        if len == 0 {
            return;
        }
        self.engine.revalidate();
        let next = (self.focus as i32 + delta).rem_euclid(len as i32);
        self.focus = next as usize;
    }

    fn edit_focused(&mut self, key: &KeyEvent) -> Result<()> {
        let Some(field) = self.engine.fields().get(self.focus) else {
            return Ok(());
        };
        let name = field.name.clone();
        let label = field.display_label().to_string();
        let kind = field.kind;

        match kind {
            FieldKind::Bool => {
                if key.code == KeyCode::Char(' ') {
                    let current = self
                        .engine
                        .values()
                        .get(&name)
                        .and_then(Value::as_bool)
                        .unwrap_or(false);
                    self.engine.set_field(&name, !current)?;
                    self.dirty = true;
                    self.exit_armed = false;
                    self.status_message = format!("Toggled {label}");
                }
            }
            FieldKind::Text | FieldKind::Secret => {
                let mut buffer = self
                    .engine
                    .values()
                    .get(&name)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                if handle_text_edit(&mut buffer, key) {
                    self.engine.commit_change(&name, buffer)?;
                    self.dirty = true;
                    self.exit_armed = false;
                    self.status_message = format!("Editing {label}");
                    if self.options.auto_validate {
                        self.engine.revalidate();
                    }
                }
            }
        }
        Ok(())
    }

    fn on_submit(&mut self) {
        self.exit_armed = false;
        match self.engine.submit() {
            SubmitOutcome::Accepted => {
                self.status_message = "Submitted".to_string();
                self.dirty = false;
                self.should_quit = true;
            }
            SubmitOutcome::Rejected { issues } => {
                self.status_message = format!("{issues} issue(s) remaining");
            }
        }
    }

    fn on_exit(&mut self) {
        if self.options.confirm_exit && self.dirty && !self.exit_armed {
            self.exit_armed = true;
            self.status_message =
                "Unsaved input. Press Ctrl+Q again to quit without submitting.".to_string();
            return;
        }
        self.should_quit = true;
    }
}

fn handle_text_edit(buffer: &mut String, key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char(ch) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return false;
            }
            buffer.push(ch);
            true
        }
        KeyCode::Backspace => {
            buffer.pop();
            true
        }
        KeyCode::Delete => {
            buffer.clear();
            true
        }
        _ => false,
    }
}

struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).context("failed to initialize terminal")?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

impl Deref for TerminalGuard {
    type Target = Terminal<CrosstermBackend<Stdout>>;

    fn deref(&self) -> &Self::Target {
        &self.terminal
    }
}

impl DerefMut for TerminalGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.terminal
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::form::{ValidationOutcome, validators};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    fn signup_app() -> App {
        let fields = vec![
            FieldSpec::text("email", "Email"),
            FieldSpec::secret("password", "Password"),
            FieldSpec::bool("subscribed", "Subscribed"),
        ];
        let validations = ValidationRegistry::new().rule("password", validators::min_length(8));
        App::new(fields, validations, None, UiOptions::default())
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(press(KeyCode::Char(ch))).unwrap();
        }
    }

    #[test]
    fn typing_commits_into_the_focused_field() {
        let mut app = signup_app();
        type_text(&mut app, "a@b.com");
        assert_eq!(app.engine.values().get("email"), Some(&json!("a@b.com")));
        assert!(app.dirty);
    }

    #[test]
    fn backspace_edits_the_committed_value() {
        let mut app = signup_app();
        type_text(&mut app, "ab");
        app.handle_key(press(KeyCode::Backspace)).unwrap();
        assert_eq!(app.engine.values().get("email"), Some(&json!("a")));
    }

    #[test]
    fn moving_focus_revalidates_the_form() {
        let mut app = signup_app();
        app.handle_key(press(KeyCode::Tab)).unwrap();
        type_text(&mut app, "short");
        assert!(app.engine.error("password").is_none(), "no blur yet");
        app.handle_key(press(KeyCode::Tab)).unwrap();
        assert!(app.engine.error("password").is_some(), "blur validates");
        assert_eq!(app.focus, 2);
    }

    #[test]
    fn focus_wraps_in_both_directions() {
        let mut app = signup_app();
        app.handle_key(press(KeyCode::BackTab)).unwrap();
        assert_eq!(app.focus, 2);
        app.handle_key(press(KeyCode::Down)).unwrap();
        assert_eq!(app.focus, 0);
    }

    #[test]
    fn space_toggles_a_bool_field_without_validation() {
        let fields = vec![FieldSpec::bool("subscribed", "Subscribed")];
        let validations =
            ValidationRegistry::new().rule("subscribed", |_| ValidationOutcome::invalid("nope"));
        let mut app = App::new(fields, validations, None, UiOptions::default());
        app.handle_key(press(KeyCode::Char(' '))).unwrap();
        assert_eq!(app.engine.values().get("subscribed"), Some(&json!(true)));
        assert!(app.engine.error("subscribed").is_none());
        app.handle_key(press(KeyCode::Char(' '))).unwrap();
        assert_eq!(app.engine.values().get("subscribed"), Some(&json!(false)));
    }

    #[test]
    fn submit_on_a_valid_form_stores_the_filtered_result_and_quits() {
        let mut app = signup_app();
        type_text(&mut app, "a@b.com");
        app.handle_key(press(KeyCode::Tab)).unwrap();
        type_text(&mut app, "long-enough");
        app.handle_key(press(KeyCode::Enter)).unwrap();
        assert!(app.should_quit);
        let values = app.submitted.borrow_mut().take().expect("submit stored");
        assert_eq!(values.get("email"), Some(&json!("a@b.com")));
        assert_eq!(values.get("subscribed"), Some(&json!(false)));
    }

    #[test]
    fn submit_on_an_invalid_form_stays_in_the_session() {
        let mut app = signup_app();
        app.handle_key(press(KeyCode::Tab)).unwrap();
        type_text(&mut app, "short");
        app.handle_key(ctrl('s')).unwrap();
        assert!(!app.should_quit);
        assert!(app.submitted.borrow().is_none());
        assert_eq!(app.status_message, "1 issue(s) remaining");
    }

    #[test]
    fn exit_without_submit_leaves_no_result() {
        let mut app = signup_app();
        app.handle_key(ctrl('q')).unwrap();
        assert!(app.should_quit);
        assert!(app.submitted.borrow().is_none());
    }

    #[test]
    fn dirty_exit_asks_for_confirmation_first() {
        let mut app = signup_app();
        type_text(&mut app, "a");
        app.handle_key(ctrl('q')).unwrap();
        assert!(!app.should_quit, "first Ctrl+Q only arms the exit");
        assert!(app.exit_armed);
        app.handle_key(ctrl('q')).unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn auto_validate_checks_on_every_edit() {
        let fields = vec![FieldSpec::text("email", "Email")];
        let validations = ValidationRegistry::new().rule("email", validators::min_length(3));
        let options = UiOptions {
            auto_validate: true,
            ..UiOptions::default()
        };
        let mut app = App::new(fields, validations, None, options);
        type_text(&mut app, "a");
        assert!(app.engine.error("email").is_some());
        type_text(&mut app, "bc");
        assert!(app.engine.error("email").is_none());
    }
}
