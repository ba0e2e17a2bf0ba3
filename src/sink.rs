//! Render Sink - The Host Drawing Surface
//!
//! The engine never mutates a document directly. Everything it produces
//! goes through this trait, strictly in sequence.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::symbol::{Bar, BarcodeSymbol, Label};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Font not available: {0}")]
    FontUnavailable(String),

    #[error("Text run not found: {0}")]
    UnknownRun(String),
}

pub trait RenderSink {
    /// Whether the label font can be used. Checked once per batch.
    fn font_available(&self, name: &str) -> bool;

    fn draw_bar(&mut self, bar: &Bar) -> Result<(), SinkError>;

    fn draw_label(&mut self, label: &Label) -> Result<(), SinkError>;

    /// Remove a source text run after all symbols are drawn.
    fn remove_text(&mut self, run_id: &str) -> Result<(), SinkError>;

    /// Draw a symbol as one group. Bars first, then labels.
    fn draw_symbol(&mut self, symbol: &BarcodeSymbol) -> Result<(), SinkError> {
        for bar in &symbol.bars {
            self.draw_bar(bar)?;
        }
        for label in &symbol.labels {
            self.draw_label(label)?;
        }
        Ok(())
    }
}

/// Recorded sink operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Bar(Bar),
    Label(Label),
    RemoveText { id: String },
}

/// Sink that records every call, in order.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    fonts: BTreeSet<String>,
    pub commands: Vec<DrawCommand>,
}

impl MemorySink {
    pub fn with_fonts<I, S>(fonts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fonts: fonts.into_iter().map(Into::into).collect(),
            commands: vec![],
        }
    }

    pub fn bars(&self) -> impl Iterator<Item = &Bar> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Bar(b) => Some(b),
            _ => None,
        })
    }

    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Label(l) => Some(l),
            _ => None,
        })
    }

    pub fn removed(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::RemoveText { id } => Some(id.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl RenderSink for MemorySink {
    fn font_available(&self, name: &str) -> bool {
        self.fonts.contains(name)
    }

    fn draw_bar(&mut self, bar: &Bar) -> Result<(), SinkError> {
        self.commands.push(DrawCommand::Bar(bar.clone()));
        Ok(())
    }

    fn draw_label(&mut self, label: &Label) -> Result<(), SinkError> {
        if !self.font_available(&label.font_name) {
            return Err(SinkError::FontUnavailable(label.font_name.clone()));
        }
        self.commands.push(DrawCommand::Label(label.clone()));
        Ok(())
    }

    fn remove_text(&mut self, run_id: &str) -> Result<(), SinkError> {
        self.commands.push(DrawCommand::RemoveText { id: run_id.to_string() });
        Ok(())
    }
}
