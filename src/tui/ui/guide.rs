//! Usage sidebar and feature descriptions panel.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::domain::FEATURE_SPECS;
use crate::tui::styles::MedicalTheme;

/// Render the "How to Use" sidebar.
pub fn render_how_to(f: &mut Frame, area: Rect, model_summary: &str) {
    let lines = vec![
        Line::from(vec![
            Span::styled("1. ", MedicalTheme::key_hint()),
            Span::styled("Enter the patient's details", MedicalTheme::text()),
        ]),
        Line::from(vec![
            Span::styled("2. ", MedicalTheme::key_hint()),
            Span::styled("Press Enter to predict the risk", MedicalTheme::text()),
        ]),
        Line::from(vec![
            Span::styled("3. ", MedicalTheme::key_hint()),
            Span::styled(
                "A trained ML model helps you make informed health decisions",
                MedicalTheme::text(),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled("DISCLAIMER!", MedicalTheme::warning())),
        Line::from(Span::styled(
            "Consult a doctor for more info!",
            MedicalTheme::text_secondary(),
        )),
        Line::from(""),
        Line::from(Span::styled("Model", MedicalTheme::text_secondary())),
        Line::from(Span::styled(model_summary.to_string(), MedicalTheme::text_muted())),
    ];

    let block = Block::default()
        .title(Span::styled(" How to Use ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    let p = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    f.render_widget(p, area);
}

/// Render the feature descriptions panel.
pub fn render_feature_descriptions(f: &mut Frame, area: Rect) {
    let lines: Vec<Line> = FEATURE_SPECS
        .iter()
        .map(|spec| {
            Line::from(vec![
                Span::styled(format!("• {}: ", spec.label), MedicalTheme::focused()),
                Span::styled(spec.description, MedicalTheme::text_secondary()),
            ])
        })
        .collect();

    let block = Block::default()
        .title(Span::styled(" ℹ Feature Descriptions ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border_focused());

    let p = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    f.render_widget(p, area);
}
