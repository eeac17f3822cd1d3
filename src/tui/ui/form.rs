//! Patient details input form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::{ClinicalFeatures, FeatureKind, FeatureSpec, FEATURE_SPECS};
use crate::tui::styles::MedicalTheme;

/// Longest accepted integer input.
const MAX_INPUT_LEN: usize = 4;

/// Fields shown per column.
const FIELDS_PER_COLUMN: usize = 3;

/// One form field bound to a feature.
#[derive(Debug, Clone)]
pub struct FormField {
    pub spec: &'static FeatureSpec,
    /// Typed text for integer fields, the option code for choice fields.
    pub value: String,
}

impl FormField {
    fn new(spec: &'static FeatureSpec) -> Self {
        Self {
            spec,
            value: spec.default.to_string(),
        }
    }

    fn is_choice(&self) -> bool {
        matches!(self.spec.kind, FeatureKind::Choice { .. })
    }

    /// Text shown inside the field box.
    #[must_use]
    pub fn display(&self) -> String {
        match self.spec.kind {
            FeatureKind::Choice { .. } => {
                let label = self
                    .value
                    .parse::<i64>()
                    .ok()
                    .and_then(|code| self.spec.option_label(code))
                    .unwrap_or("?");
                format!("◀ {} ({}) ▶", label, self.value)
            }
            FeatureKind::Integer { .. } => self.value.clone(),
        }
    }
}

/// Patient form state
pub struct PatientFormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub error_message: Option<String>,
}

impl Default for PatientFormState {
    fn default() -> Self {
        Self {
            fields: FEATURE_SPECS.iter().map(FormField::new).collect(),
            selected_field: 0,
            error_message: None,
        }
    }
}

impl Drop for PatientFormState {
    fn drop(&mut self) {
        self.clear_sensitive();
    }
}

impl PatientFormState {
    /// Move to the next field
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Add a digit to the current integer field
    pub fn input_char(&mut self, c: char) {
        let field = &mut self.fields[self.selected_field];
        if field.is_choice() {
            // Typing a valid option code selects it directly.
            if let Some(code) = c.to_digit(10) {
                if field.spec.option_label(i64::from(code)).is_some() {
                    field.value.zeroize();
                    field.value.push(c);
                    self.error_message = None;
                }
            }
            return;
        }
        if c.is_ascii_digit() && field.value.len() < MAX_INPUT_LEN {
            field.value.push(c);
            self.error_message = None;
        }
    }

    /// Delete the last character of an integer field
    pub fn delete_char(&mut self) {
        let field = &mut self.fields[self.selected_field];
        if !field.is_choice() {
            field.value.pop();
        }
    }

    /// Clear the current integer field
    pub fn clear_field(&mut self) {
        let field = &mut self.fields[self.selected_field];
        if !field.is_choice() {
            field.value.zeroize();
        }
    }

    /// Step the current choice field to the next (or previous) option.
    pub fn cycle_choice(&mut self, forward: bool) {
        let field = &mut self.fields[self.selected_field];
        let FeatureKind::Choice { options } = field.spec.kind else {
            return;
        };
        let current = field.value.parse::<i64>().ok();
        let pos = options
            .iter()
            .position(|(code, _)| Some(*code) == current)
            .unwrap_or(0);
        let next = if forward {
            (pos + 1) % options.len()
        } else {
            (pos + options.len() - 1) % options.len()
        };
        field.value.zeroize();
        field.value.push_str(&options[next].0.to_string());
        self.error_message = None;
    }

    /// Wipe all field buffers from memory.
    pub fn clear_sensitive(&mut self) {
        for field in self.fields.iter_mut() {
            field.value.zeroize();
        }
        self.error_message = None;
        self.selected_field = 0;
    }

    /// Wipe buffers and restore default values.
    pub fn reset(&mut self) {
        self.clear_sensitive();
        for field in self.fields.iter_mut() {
            field.value.push_str(&field.spec.default.to_string());
        }
    }

    /// Parse and validate into `ClinicalFeatures`.
    ///
    /// # Errors
    /// Returns every empty, unparsable or out-of-range field, joined with `; `.
    pub fn to_features(&self) -> Result<ClinicalFeatures, String> {
        let mut values = Vec::with_capacity(self.fields.len());
        let mut errors = Vec::new();

        for field in self.fields.iter() {
            match field.value.parse::<i64>() {
                Ok(value) => {
                    if let Err(e) = field.spec.check(value as f64) {
                        errors.push(e);
                    }
                    values.push(value as f64);
                }
                Err(_) => errors.push(format!("{}: Enter a whole number", field.spec.label)),
            }
        }

        if !errors.is_empty() {
            return Err(errors.join("; "));
        }
        ClinicalFeatures::from_vec(&values)
    }
}

/// Render the patient details form
pub fn render_patient_form(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Section title
            Constraint::Min(0),    // Fields
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    let title = Paragraph::new(Line::from(vec![
        Span::styled(" Enter Patient Details", MedicalTheme::subtitle()),
    ]));
    f.render_widget(title, chunks[0]);

    render_form_fields(f, chunks[1], state);
    render_form_footer(f, chunks[2], state);
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    for (col, fields) in state.fields.chunks(FIELDS_PER_COLUMN).enumerate() {
        render_field_column(
            f,
            columns[col],
            fields,
            col * FIELDS_PER_COLUMN,
            state.selected_field,
        );
    }
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    offset: usize,
    selected: usize,
) {
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = offset + i == selected;
        let (border_style, title_style) = if is_selected {
            (MedicalTheme::border_focused(), MedicalTheme::focused())
        } else {
            (MedicalTheme::border(), MedicalTheme::text_secondary())
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.spec.label), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let value_display = if field.value.is_empty() {
            Span::styled(field.spec.hint, MedicalTheme::text_muted())
        } else {
            Span::styled(field.display(), MedicalTheme::text())
        };

        let content = Paragraph::new(Line::from(vec![
            Span::raw(" "),
            value_display,
            if is_selected && !field.is_choice() {
                Span::styled("▌", MedicalTheme::cursor())
            } else {
                Span::raw("")
            },
        ]))
        .block(block);

        f.render_widget(content, chunks[i]);
    }
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", MedicalTheme::danger()),
            Span::styled(err.clone(), MedicalTheme::danger()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", MedicalTheme::key_hint()),
            Span::styled("Navigate ", MedicalTheme::key_desc()),
            Span::styled("[←→] ", MedicalTheme::key_hint()),
            Span::styled("Choose ", MedicalTheme::key_desc()),
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("Predict ", MedicalTheme::key_desc()),
            Span::styled("[R] ", MedicalTheme::key_hint()),
            Span::styled("Reset ", MedicalTheme::key_desc()),
            Span::styled("[?] ", MedicalTheme::key_hint()),
            Span::styled("Feature Descriptions ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Quit", MedicalTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(MedicalTheme::border()),
        );

    f.render_widget(footer, area);
}
