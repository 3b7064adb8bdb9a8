//! Console drivers: feed input to the unit and decide when to resume.

use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use coolavg_core::{
    parse_sample, AverageUnit, ConfigError, CooldownViolation, InputSource, IterSource,
    MonotonicClock, StepOutcome, UnitConfig,
};
use log::debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// How a driver run ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunEnd {
    Finished,
    Violated(CooldownViolation),
}

/// Prompts for a number and reads lines until one holds a token; the rest of
/// that line after the first token is discarded.
struct PromptSource<'a, R, W> {
    input: &'a RefCell<R>,
    out: &'a RefCell<W>,
}

impl<R: BufRead, W: Write> InputSource for PromptSource<'_, R, W> {
    fn next_value(&mut self) -> Option<f64> {
        {
            let mut out = self.out.borrow_mut();
            if let Err(e) = write!(out, "\nEnter number: ").and_then(|_| out.flush()) {
                debug!("prompt write failed: {e}");
            }
        }
        let mut input = self.input.borrow_mut();
        let mut line = String::new();
        loop {
            line.clear();
            match input.read_line(&mut line) {
                Ok(0) | Err(_) => return None,
                Ok(_) => {}
            }
            if let Some(token) = line.split_whitespace().next() {
                return parse_sample(token).ok();
            }
        }
    }
}

pub fn print_banner<W: Write>(out: &mut W, cfg: &UnitConfig) -> io::Result<()> {
    writeln!(out, "--- Coolavg: Manual Control ---")?;
    writeln!(out, "1. Enter numbers to update the average of the last {}.", cfg.window_size)?;
    writeln!(out, "2. Entering '0' pauses the unit for {} ms.", cfg.cooldown_ms)?;
    writeln!(out, "3. YOU decide when to resume it by pressing ENTER.")?;
    writeln!(out)
}

fn report_end<W: Write>(out: &mut W, outcome: &StepOutcome) -> io::Result<Option<RunEnd>> {
    let end = match outcome {
        StepOutcome::Violated(v) => {
            writeln!(
                out,
                "\n[VIOLATION] Resumed too fast ({} ms < {} ms)! Logic check failed.",
                v.elapsed.as_millis(),
                v.required.as_millis()
            )?;
            RunEnd::Violated(*v)
        }
        StepOutcome::Finished | StepOutcome::Inactive(_) => RunEnd::Finished,
        StepOutcome::Published(_) | StepOutcome::CooldownArmed(_) => return Ok(None),
    };
    writeln!(out, "Unit finished (or terminated due to violation).")?;
    Ok(Some(end))
}

/// Interactive loop: one number per step, ENTER to request the next resume.
pub fn run_interactive<R: BufRead, W: Write>(
    cfg: UnitConfig,
    input: R,
    out: W,
) -> Result<RunEnd, CliError> {
    let input = RefCell::new(input);
    let out = RefCell::new(out);
    print_banner(&mut *out.borrow_mut(), &cfg)?;

    let source = PromptSource { input: &input, out: &out };
    let mut unit = AverageUnit::with_config(cfg, source, MonotonicClock);

    let mut outcome = unit.advance();
    loop {
        let mut w = out.borrow_mut();
        if let Some(elapsed) = unit.cooldown_cleared() {
            writeln!(w, "[OK] Time passed ({} ms). Resumed work.", elapsed.as_millis())?;
        }
        if let Some(end) = report_end(&mut *w, &outcome)? {
            return Ok(end);
        }
        if let StepOutcome::CooldownArmed(_) = outcome {
            writeln!(w, "-> Zero detected. Cooldown {} ms activated.", unit.config().cooldown_ms)?;
        }
        writeln!(w, " -> Yielded Average: {}", unit.last_result())?;
        write!(
            w,
            ">>> Press ENTER to attempt resume (wait {} ms if previous was 0)...",
            unit.config().cooldown_ms
        )?;
        w.flush()?;
        drop(w);

        let mut line = String::new();
        input.borrow_mut().read_line(&mut line)?;
        outcome = unit.advance();
    }
}

/// Feed `values` in order, sleeping `wait` before every resume after the first.
pub fn run_batch<W: Write>(
    cfg: UnitConfig,
    values: Vec<f64>,
    wait: Duration,
    json: bool,
    out: &mut W,
) -> Result<RunEnd, CliError> {
    let mut unit = AverageUnit::with_config(cfg, IterSource::new(values), MonotonicClock);
    let mut first = true;
    loop {
        if !first && !wait.is_zero() {
            thread::sleep(wait);
        }
        first = false;

        let outcome = unit.advance();
        if json {
            serde_json::to_writer(&mut *out, &unit.snapshot())?;
            writeln!(out)?;
        } else {
            match outcome {
                StepOutcome::Published(avg) => writeln!(out, "average {avg}")?,
                StepOutcome::CooldownArmed(avg) => writeln!(out, "average {avg} (cooldown armed)")?,
                _ => {}
            }
        }
        if !outcome.is_active() {
            if json {
                return Ok(match outcome {
                    StepOutcome::Violated(v) => RunEnd::Violated(v),
                    _ => RunEnd::Finished,
                });
            }
            // report_end only returns None for active outcomes
            return Ok(report_end(out, &outcome)?.unwrap_or(RunEnd::Finished));
        }
    }
}
