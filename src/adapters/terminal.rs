use crate::core::loading::LOADING_MESSAGES;
use crate::domain::model::{InvalidField, Notification, NotificationKind, ResultView, Tone};
use crate::domain::ports::PresentationSurface;
use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

const BAR_WIDTH: usize = 20;

struct TerminalState<W> {
    writer: W,
    overlay: bool,
    progress: u8,
    message: &'static str,
    trigger_enabled: bool,
}

/// Presentation surface that prints to a terminal (or any writer).
pub struct TerminalSurface<W: Write + Send = io::Stdout> {
    state: Mutex<TerminalState<W>>,
}

impl TerminalSurface<io::Stdout> {
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl<W: Write + Send> TerminalSurface<W> {
    pub fn with_writer(writer: W) -> Self {
        Self {
            state: Mutex::new(TerminalState {
                writer,
                overlay: false,
                progress: 0,
                message: LOADING_MESSAGES[0],
                trigger_enabled: true,
            }),
        }
    }

    pub fn trigger_enabled(&self) -> bool {
        self.state().trigger_enabled
    }

    pub fn into_writer(self) -> W {
        self.state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .writer
    }

    fn state(&self) -> MutexGuard<'_, TerminalState<W>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write> TerminalState<W> {
    fn emit(&mut self, args: fmt::Arguments<'_>) {
        if let Err(e) = self
            .writer
            .write_fmt(args)
            .and_then(|_| self.writer.write_all(b"\n"))
            .and_then(|_| self.writer.flush())
        {
            tracing::warn!("Terminal write failed: {}", e);
        }
    }
}

fn progress_bar(progress: u8) -> String {
    let filled = (progress as usize * BAR_WIDTH / 100).min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), " ".repeat(BAR_WIDTH - filled))
}

fn notification_icon(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Success => "✅",
        NotificationKind::Danger => "❌",
        NotificationKind::Warning => "⚠️",
        NotificationKind::Info => "ℹ️",
    }
}

impl<W: Write + Send> PresentationSurface for TerminalSurface<W> {
    fn show_loading(&self) {
        let mut state = self.state();
        if state.overlay {
            return;
        }
        state.overlay = true;
        state.progress = 0;
        state.message = LOADING_MESSAGES[0];
        state.emit(format_args!("⏳ Processing..."));
    }

    fn update_loading(&self, progress: u8, message: &str) {
        let mut state = self.state();
        if !state.overlay {
            return;
        }
        let message_changed = state.message != message;
        let crossed_step = progress / 20 != state.progress / 20;
        state.progress = progress;
        if let Some(known) = LOADING_MESSAGES.iter().find(|m| **m == message) {
            state.message = *known;
        }
        if message_changed || crossed_step {
            let bar = progress_bar(progress);
            state.emit(format_args!("{} {:>3}% {}", bar, progress, message));
        }
    }

    fn hide_loading(&self) {
        let mut state = self.state();
        state.overlay = false;
        state.progress = 0;
        state.message = LOADING_MESSAGES[0];
    }

    fn overlay_active(&self) -> bool {
        self.state().overlay
    }

    fn set_trigger_enabled(&self, enabled: bool) {
        self.state().trigger_enabled = enabled;
    }

    fn mark_invalid(&self, fields: &[InvalidField]) {
        let mut state = self.state();
        for field in fields {
            state.emit(format_args!("  ✗ {}: {}", field.name, field.reason));
        }
    }

    fn render_result(&self, view: &ResultView) {
        let mut state = self.state();
        let marker = match view.tone {
            Tone::Success => "🙂",
            Tone::Warning => "⚠️",
        };
        state.emit(format_args!("{} {}", marker, view.headline));
        state.emit(format_args!(
            "   Benign    {} {}",
            progress_bar(view.benign_percent.clamp(0.0, 100.0) as u8),
            view.benign
        ));
        state.emit(format_args!(
            "   Malignant {} {}",
            progress_bar(view.malignant_percent.clamp(0.0, 100.0) as u8),
            view.malignant
        ));
        state.emit(format_args!("   Risk Level: {}", view.risk_level));
        state.emit(format_args!("   {}", view.advice));
    }

    fn clear_result(&self) {
        tracing::debug!("Results region cleared");
    }

    fn notify(&self, notification: &Notification) {
        let mut state = self.state();
        let icon = notification_icon(notification.kind);
        state.emit(format_args!("{} {}", icon, notification.message));
    }
}
