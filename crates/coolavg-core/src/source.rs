//! Input collaborators feeding the unit one sample per request.

use std::collections::VecDeque;
use std::io::BufRead;

use log::debug;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("not a number: {0:?}")]
    Malformed(String),
    #[error("non-finite sample: {0}")]
    NonFinite(f64),
}

/// Supplies one value per request, or `None` once it has nothing more to give.
pub trait InputSource {
    fn next_value(&mut self) -> Option<f64>;
}

impl<S: InputSource + ?Sized> InputSource for &mut S {
    fn next_value(&mut self) -> Option<f64> {
        (**self).next_value()
    }
}

impl<S: InputSource + ?Sized> InputSource for Box<S> {
    fn next_value(&mut self) -> Option<f64> {
        (**self).next_value()
    }
}

/// Reject NaN/Inf before it reaches the window.
pub fn validate_sample(value: f64) -> Result<f64, InputError> {
    if !value.is_finite() {
        return Err(InputError::NonFinite(value));
    }
    Ok(value)
}

/// Parse a single token as a finite sample.
pub fn parse_sample(token: &str) -> Result<f64, InputError> {
    let value: f64 = token
        .trim()
        .parse()
        .map_err(|_| InputError::Malformed(token.to_string()))?;
    validate_sample(value)
}

/// Adapts any `f64` iterator.
#[derive(Debug, Clone)]
pub struct IterSource<I> {
    inner: I,
}

impl<I: Iterator<Item = f64>> IterSource<I> {
    pub fn new(inner: impl IntoIterator<IntoIter = I, Item = f64>) -> Self {
        Self { inner: inner.into_iter() }
    }
}

impl<I: Iterator<Item = f64>> InputSource for IterSource<I> {
    fn next_value(&mut self) -> Option<f64> {
        self.inner.next()
    }
}

/// Whitespace-separated tokens from a reader.
///
/// End of stream, an I/O error, or a token that is not a finite number all
/// exhaust the source for good.
#[derive(Debug)]
pub struct TokenSource<R> {
    reader: R,
    pending: VecDeque<String>,
    exhausted: bool,
}

impl<R: BufRead> TokenSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
            exhausted: false,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    fn next_token(&mut self) -> Option<String> {
        while self.pending.is_empty() {
            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => self
                    .pending
                    .extend(line.split_whitespace().map(str::to_owned)),
                Err(e) => {
                    debug!("input read failed: {e}");
                    return None;
                }
            }
        }
        self.pending.pop_front()
    }
}

impl<R: BufRead> InputSource for TokenSource<R> {
    fn next_value(&mut self) -> Option<f64> {
        if self.exhausted {
            return None;
        }
        let parsed = match self.next_token() {
            Some(token) => parse_sample(&token),
            None => {
                debug!("input stream ended");
                self.exhausted = true;
                return None;
            }
        };
        match parsed {
            Ok(v) => Some(v),
            Err(e) => {
                debug!("rejecting input: {e}");
                self.exhausted = true;
                None
            }
        }
    }
}
