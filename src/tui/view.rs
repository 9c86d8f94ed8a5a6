//! Screen rendering
//!
//! Pure functions of the application state. Nothing here mutates the wizard.

use chrono::{DateTime, Local};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use super::theme::Theme;
use crate::app::{App, Phase, RunOutcome};
use crate::error::InputError;
use crate::wizard::frame_rate::FrameRateStrategy;
use crate::wizard::pages::assemble::AssemblePhase;
use crate::wizard::pages::frame_rate::RatePhase;
use crate::wizard::pages::time_window::WindowPhase;
use crate::wizard::pages::{
    AssemblePage, FrameRatePage, InputFolderPage, OutputFilePage, SummaryPage, TimeWindowPage,
};
use crate::wizard::Step;

const SPINNER: [&str; 4] = ["∙∙∙", "●∙∙", "∙●∙", "∙∙●"];
const DATE_TIME: &str = "%Y-%m-%d %H:%M:%S";

pub fn draw(frame: &mut Frame<'_>, app: &App) {
    let theme = Theme::new();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let (heading, subtitle, help) = match app.phase() {
        Phase::Wizard => match (app.flow().current_step(), app.flow().progress()) {
            (Some(step), Some((number, total))) => (
                format!("Step {}/{}: {}", number, total, step.kind().title()),
                step.kind().description(),
                hints(step),
            ),
            _ => ("Timelapse".to_string(), "", "Esc quit"),
        },
        Phase::Rendering(_) => ("Rendering".to_string(), "", "Esc quit (rendering continues)"),
        Phase::Finished(_) => ("Done".to_string(), "", ""),
    };

    let mut heading = vec![Span::styled(heading, theme.title())];
    if !subtitle.is_empty() {
        heading.push(Span::styled(format!("   {}", subtitle), theme.muted()));
    }
    let header = Paragraph::new(Line::from(heading)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border()),
    );
    frame.render_widget(header, layout[0]);

    match app.phase() {
        Phase::Wizard => {
            if let Some(step) = app.flow().current_step() {
                draw_step(frame, layout[1], step, app, &theme);
            }
        }
        Phase::Rendering(job) => {
            let lines = vec![
                spinner_line(
                    app.ticks(),
                    &format!("Rendering {} images", job.images.len()),
                    &theme,
                ),
                Line::from(""),
                Line::from(format!("Output: {}", job.output_path.display())),
            ];
            frame.render_widget(panel(lines, "Encoder", &theme), layout[1]);
        }
        Phase::Finished(outcome) => {
            frame.render_widget(panel(vec![outcome_line(outcome, &theme)], "Result", &theme), layout[1]);
        }
    }

    let footer = Paragraph::new(Line::from(Span::styled(help, theme.muted()))).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border())
            .title(Span::styled("Help", theme.muted())),
    );
    frame.render_widget(footer, layout[2]);
}

fn hints(step: &Step) -> &'static str {
    match step {
        Step::SelectInputFolder(_) => "↑/↓ select, Enter confirm, r reload, Esc quit",
        Step::NameOutputFile(_) => "type a name, Enter confirm, Esc quit",
        Step::SelectTimeWindow(page) => match page.phase() {
            WindowPhase::Editing => "type HH:MM - HH:MM, Enter confirm, Esc quit",
            WindowPhase::Confirming(_) => "y accept, n edit again, Esc quit",
        },
        Step::AssembleAndOrderImages(_) => "please wait, Esc quit",
        Step::SelectFrameRate(page) => match page.phase() {
            RatePhase::ChoosingStrategy => "↑/↓ choose mode, Enter select, Esc quit",
            RatePhase::Editing => "Enter confirm, q back to mode selection, Esc quit",
            RatePhase::Confirming { .. } => "y accept, n start over, Esc quit",
        },
        Step::ConfirmSummary(_) => "Enter start rendering, Esc quit",
    }
}

fn draw_step(frame: &mut Frame<'_>, area: Rect, step: &Step, app: &App, theme: &Theme) {
    match step {
        Step::SelectInputFolder(page) => draw_input_folder(frame, area, page, app, theme),
        Step::NameOutputFile(page) => draw_output_file(frame, area, page, app, theme),
        Step::SelectTimeWindow(page) => draw_time_window(frame, area, page, theme),
        Step::AssembleAndOrderImages(page) => draw_assemble(frame, area, page, app, theme),
        Step::SelectFrameRate(page) => draw_frame_rate(frame, area, page, app, theme),
        Step::ConfirmSummary(page) => draw_summary(frame, area, page, theme),
    }
}

fn draw_input_folder(frame: &mut Frame<'_>, area: Rect, page: &InputFolderPage, app: &App, theme: &Theme) {
    let title = format!("Folders in {}", app.settings().input_root.display());

    if page.folders().is_empty() {
        let line = if page.is_scanning() {
            spinner_line(app.ticks(), "Analyzing input folders...", theme)
        } else {
            Line::from(Span::styled("No folders found. Press r to reload.", theme.muted()))
        };
        frame.render_widget(panel(vec![line], &title, theme), area);
        return;
    }

    let items: Vec<ListItem> = page
        .folders()
        .iter()
        .map(|folder| ListItem::new(Line::from(format!("{:<30} {:>8} files", folder.name, folder.file_count))))
        .collect();
    let mut state = ListState::default();
    state.select(Some(page.cursor()));

    let suffix = if page.is_scanning() { " (reloading)" } else { "" };
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border())
                .title(Span::styled(format!("{}{}", title, suffix), theme.title())),
        )
        .highlight_style(theme.emphasis())
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_output_file(frame: &mut Frame<'_>, area: Rect, page: &OutputFilePage, app: &App, theme: &Theme) {
    let settings = app.settings();
    let mut lines = vec![
        Line::from(format!("Videos are written to {}", settings.output_root.display())),
        Line::from(""),
        input_line("File name", page.input(), &format!(".{}", settings.output_extension), theme),
    ];
    push_error(&mut lines, page.error(), theme);
    frame.render_widget(panel(lines, "Output file", theme), area);
}

fn draw_time_window(frame: &mut Frame<'_>, area: Rect, page: &TimeWindowPage, theme: &Theme) {
    let lines = match page.phase() {
        WindowPhase::Editing => {
            let mut lines = vec![
                Line::from("Only images modified inside this daily window are used."),
                Line::from(""),
                input_line("Time range (HH:MM - HH:MM)", page.input(), "", theme),
            ];
            push_error(&mut lines, page.error(), theme);
            lines
        }
        WindowPhase::Confirming(window) => vec![
            Line::from("Will continue with this time range:"),
            Line::from(""),
            labeled("From", &format_time(&window.from()), theme),
            labeled("To", &format_time(&window.to()), theme),
            labeled("Span", &format_span(window.span()), theme),
            Line::from(""),
            Line::from("Continue? (y/n)"),
        ],
    };
    frame.render_widget(panel(lines, "Time window", theme), area);
}

fn draw_assemble(frame: &mut Frame<'_>, area: Rect, page: &AssemblePage, app: &App, theme: &Theme) {
    let label = match page.phase() {
        AssemblePhase::Collecting => "Collecting images inside the time window...".to_string(),
        AssemblePhase::Sorting { matched } => format!("Sorting {} images by capture time...", matched),
    };
    let mut lines = vec![spinner_line(app.ticks(), &label, theme)];
    if let Some(dir) = app.config().input_dir() {
        lines.push(Line::from(""));
        lines.push(Line::from(format!("Folder: {}", dir.display())));
    }
    frame.render_widget(panel(lines, "Assembling", theme), area);
}

fn draw_frame_rate(frame: &mut Frame<'_>, area: Rect, page: &FrameRatePage, app: &App, theme: &Theme) {
    let lines = match page.phase() {
        RatePhase::ChoosingStrategy => {
            let mut lines = vec![Line::from("Choose framerate selection mode:"), Line::from("")];
            for strategy in FrameRateStrategy::ALL {
                let style = if strategy == page.strategy() {
                    theme.emphasis()
                } else {
                    Style::default()
                };
                let marker = if strategy == page.strategy() { "> " } else { "  " };
                lines.push(Line::from(Span::styled(format!("{}{}", marker, strategy.name()), style)));
                lines.push(Line::from(Span::styled(
                    format!("    {}", strategy.description()),
                    theme.muted(),
                )));
            }
            lines
        }
        RatePhase::Editing => {
            let mut lines = vec![
                Line::from(format!(
                    "{} images selected.",
                    app.config().ordered_images().len()
                )),
                Line::from(""),
                input_line(page.strategy().prompt(), page.input(), "", theme),
            ];
            push_error(&mut lines, page.error(), theme);
            lines
        }
        RatePhase::Confirming { fps, duration } => vec![
            Line::from("Will continue with this config:"),
            Line::from(""),
            labeled("Framerate", &format!("{:.2}", fps), theme),
            labeled(
                "Approx. output video duration",
                &format_span(chrono::Duration::seconds(duration.as_secs() as i64)),
                theme,
            ),
            Line::from(""),
            Line::from("Continue? (y/n)"),
        ],
    };
    frame.render_widget(panel(lines, "Frame rate", theme), area);
}

fn draw_summary(frame: &mut Frame<'_>, area: Rect, page: &SummaryPage, theme: &Theme) {
    let Some(summary) = page.summary() else {
        return;
    };
    let duration = chrono::Duration::seconds(summary.predicted_duration.as_secs() as i64);
    let lines = vec![
        labeled("Input folder", &summary.input_dir.display().to_string(), theme),
        labeled("Output file", &summary.output_path.display().to_string(), theme),
        labeled("From", &format_time(&summary.window.from()), theme),
        labeled("To", &format_time(&summary.window.to()), theme),
        labeled("Span", &format_span(summary.window_span()), theme),
        labeled("Framerate", &format!("{:.2}", summary.frames_per_second), theme),
        labeled("Files", &summary.image_count.to_string(), theme),
        Line::from(""),
        labeled("Total approx. video length", &format_span(duration), theme),
        Line::from(""),
        Line::from(Span::styled("Press <ENTER> to start rendering", theme.emphasis())),
    ];
    frame.render_widget(panel(lines, "Summary", theme), area);
}

fn panel<'a>(lines: Vec<Line<'a>>, title: &str, theme: &Theme) -> Paragraph<'a> {
    Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border())
            .title(Span::styled(title.to_string(), theme.title())),
    )
}

fn spinner_line(ticks: usize, label: &str, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(SPINNER[ticks % SPINNER.len()], theme.emphasis()),
        Span::raw(format!(" {}", label)),
    ])
}

fn input_line(prompt: &str, value: &str, suffix: &str, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("{}: ", prompt)),
        Span::styled(value.to_string(), theme.emphasis()),
        Span::styled("_".to_string(), theme.muted()),
        Span::styled(suffix.to_string(), theme.muted()),
    ])
}

fn labeled(label: &str, value: &str, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("{:<14}", format!("{}:", label))),
        Span::styled(value.to_string(), theme.emphasis()),
    ])
}

fn push_error(lines: &mut Vec<Line<'static>>, error: Option<&InputError>, theme: &Theme) {
    if let Some(err) = error {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("ERROR", theme.error()),
            Span::raw(format!(": {}", err)),
        ]));
    }
}

fn outcome_line(outcome: &RunOutcome, theme: &Theme) -> Line<'static> {
    match outcome {
        RunOutcome::Rendered(report) => Line::from(Span::styled(
            format!("Wrote {}", report.output_path.display()),
            theme.success(),
        )),
        RunOutcome::Cancelled => Line::from(Span::styled("Cancelled", theme.muted())),
        RunOutcome::Failed(err) => Line::from(Span::styled(err.to_string(), theme.error())),
        RunOutcome::RenderFailed(err) => Line::from(Span::styled(err.to_string(), theme.error())),
    }
}

fn format_time(t: &DateTime<Local>) -> String {
    t.format(DATE_TIME).to_string()
}

/// `1h30m0s` style duration
pub fn format_span(span: chrono::Duration) -> String {
    let total = span.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.abs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{}{}h{}m{}s", sign, hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}{}m{}s", sign, minutes, seconds)
    } else {
        format!("{}{}s", sign, seconds)
    }
}
