//! Prediction results view.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::emphasis_spans;
use crate::domain::Assessment;
use crate::tui::styles::MedicalTheme;

/// Result screen state
#[derive(Debug, Clone, Default)]
pub enum ResultState {
    /// Nothing predicted yet
    #[default]
    Idle,
    /// Prediction finished
    Complete { assessment: Assessment },
    /// Inference failed
    Error { message: String },
}

/// Render the prediction results
pub fn render_result(f: &mut Frame, area: Rect, state: &ResultState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Section title
            Constraint::Min(0),    // Content
            Constraint::Length(2), // Footer
        ])
        .split(area);

    let title = Paragraph::new(Line::from(Span::styled(
        " Prediction Results",
        MedicalTheme::subtitle(),
    )));
    f.render_widget(title, chunks[0]);

    match state {
        ResultState::Idle => render_idle(f, chunks[1]),
        ResultState::Complete { assessment } => render_assessment(f, chunks[1], assessment),
        ResultState::Error { message } => render_error(f, chunks[1], message),
    }

    render_result_footer(f, chunks[2], state);
}

fn render_idle(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "No prediction yet",
            MedicalTheme::text_secondary(),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(content, area);
}

fn render_assessment(f: &mut Frame, area: Rect, assessment: &Assessment) {
    let tier = assessment.tier();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Tier title
            Constraint::Length(3), // Message banner
            Constraint::Length(4), // Metrics
            Constraint::Length(4), // Recommendation
            Constraint::Length(3), // Risk indicator
            Constraint::Min(0),
        ])
        .margin(1)
        .split(area);

    let mut title_spans = vec![Span::styled(
        tier.title,
        MedicalTheme::alert(tier.alert).add_modifier(Modifier::BOLD),
    )];
    if assessment.celebrates() {
        title_spans.push(Span::styled("   🎈 🎈 🎈", MedicalTheme::text()));
    }
    f.render_widget(Paragraph::new(Line::from(title_spans)), chunks[0]);

    let banner_style = MedicalTheme::banner(assessment.banner());
    let banner = Paragraph::new(Line::from(emphasis_spans(
        &format!(" {}", tier.message),
        banner_style,
    )))
    .style(banner_style)
    .wrap(Wrap { trim: false });
    let banner_area = Rect {
        height: chunks[1].height.min(2),
        ..chunks[1]
    };
    f.render_widget(banner, banner_area);

    if assessment.fallback && chunks[1].height > 2 {
        let notice = Paragraph::new(Line::from(Span::styled(
            format!(
                " Model returned unrecognised code {}; showing the no-disease entry.",
                assessment.prediction
            ),
            MedicalTheme::danger(),
        )));
        let notice_area = Rect {
            y: chunks[1].y + 2,
            height: 1,
            ..chunks[1]
        };
        f.render_widget(notice, notice_area);
    }

    render_metrics(f, chunks[2], assessment);

    let recommendation = Paragraph::new(Line::from(vec![
        Span::styled("Recommendation: ", MedicalTheme::info().add_modifier(Modifier::BOLD)),
        Span::styled(tier.recommendation, MedicalTheme::text()),
    ]))
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::info()),
    );
    f.render_widget(recommendation, chunks[3]);

    let indicator = Paragraph::new(vec![
        Line::from(Span::styled(
            "Risk Level Indicator:",
            MedicalTheme::text_secondary().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::raw(tier.risk_bar())),
    ]);
    f.render_widget(indicator, chunks[4]);
}

fn render_metrics(f: &mut Frame, area: Rect, assessment: &Assessment) {
    let tier = assessment.tier();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let metrics = [
        ("Risk Severity Level", tier.severity.to_string()),
        ("Risk Score", assessment.score_label()),
    ];

    for (column, (label, value)) in columns.iter().zip(metrics) {
        let metric = Paragraph::new(vec![
            Line::from(Span::styled(label, MedicalTheme::text_secondary())),
            Line::from(Span::styled(
                value,
                MedicalTheme::alert(tier.alert).add_modifier(Modifier::BOLD),
            )),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        );
        f.render_widget(metric, *column);
    }
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("! Prediction failed", MedicalTheme::danger())),
        Line::from(""),
        Line::from(Span::styled(message, MedicalTheme::text())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::danger()),
    );

    f.render_widget(content, area);
}

fn render_result_footer(f: &mut Frame, area: Rect, state: &ResultState) {
    let content = match state {
        ResultState::Error { .. } => Line::from(vec![
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("Back to Form ", MedicalTheme::key_desc()),
            Span::styled("[Q] ", MedicalTheme::key_hint()),
            Span::styled("Quit", MedicalTheme::key_desc()),
        ]),
        _ => Line::from(vec![
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("Edit Details ", MedicalTheme::key_desc()),
            Span::styled("[N] ", MedicalTheme::key_hint()),
            Span::styled("New Patient ", MedicalTheme::key_desc()),
            Span::styled("[?] ", MedicalTheme::key_hint()),
            Span::styled("Feature Descriptions ", MedicalTheme::key_desc()),
            Span::styled("[Q] ", MedicalTheme::key_hint()),
            Span::styled("Quit", MedicalTheme::key_desc()),
        ]),
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn rendered_text(state: &ResultState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(110, 30)).expect("terminal");
        terminal
            .draw(|f| render_result(f, f.area(), state))
            .expect("draw");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_renders_complete_assessment() {
        let state = ResultState::Complete {
            assessment: Assessment::from_prediction(2),
        };
        let text = rendered_text(&state);
        assert!(text.contains("Prediction Results"));
        assert!(text.contains("Moderate Risk Detected"));
        assert!(text.contains("Risk Severity Level"));
        assert!(text.contains("2/4"));
        assert!(text.contains("Recommendation:"));
    }

    #[test]
    fn test_renders_unrecognised_code_with_notice() {
        let state = ResultState::Complete {
            assessment: Assessment::from_prediction(11),
        };
        let text = rendered_text(&state);
        assert!(text.contains("No Heart Disease Detected"));
        assert!(text.contains("11/4"));
        assert!(text.contains("unrecognised code 11"));
        assert!(!text.contains("🎈"));
    }

    #[test]
    fn test_no_notice_for_known_code() {
        let state = ResultState::Complete {
            assessment: Assessment::from_prediction(0),
        };
        let text = rendered_text(&state);
        assert!(text.contains("0/4"));
        assert!(!text.contains("unrecognised"));
    }

    #[test]
    fn test_renders_error() {
        let state = ResultState::Error {
            message: "model exploded".into(),
        };
        let text = rendered_text(&state);
        assert!(text.contains("Prediction failed"));
        assert!(text.contains("model exploded"));
    }
}
