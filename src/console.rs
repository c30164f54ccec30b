//! Human-readable console lines
//!
//! Stdout carries these lines for the user. Diagnostics go through
//! `tracing` instead.

use crate::{error::ProviderError, types::PriceData};
use std::fmt::Arguments;
use std::io::{self, Write};
use std::time::Duration;

/// Writes console lines to any `io::Write`
///
/// Write failures are logged and dropped so that printing never stops the
/// polling loop.
pub struct Console<W: Write = io::Stdout> {
    out: W,
}

impl Console<io::Stdout> {
    /// Console on the process stdout
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Borrows the underlying writer
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn banner(&mut self) {
        self.line(format_args!(
            "Starting real-time Bitcoin price fetcher. Press Ctrl+C to stop."
        ));
    }

    pub fn price(&mut self, price: &PriceData) {
        self.line(format_args!("Bitcoin Price: ${}", price.price));
    }

    pub fn price_unavailable(&mut self) {
        self.line(format_args!(
            "Failed to fetch Bitcoin price. Retrying in 1 minute."
        ));
    }

    pub fn rate_limited(&mut self, wait: Duration) {
        self.line(format_args!(
            "Rate limit hit. Retrying in {} seconds.",
            wait.as_secs()
        ));
    }

    pub fn fetch_error(&mut self, error: &ProviderError) {
        self.line(format_args!("Error fetching data: {}", error));
    }

    pub fn shutdown(&mut self) {
        self.line(format_args!("\nProgram terminated by user."));
    }

    fn line(&mut self, args: Arguments<'_>) {
        if let Err(e) = self.try_line(args) {
            tracing::warn!(error = %e, "Failed to write console line");
        }
    }

    fn try_line(&mut self, args: Arguments<'_>) -> io::Result<()> {
        self.out.write_fmt(args)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}
