use std::io::{self, BufRead, BufReader, Read};
use std::time::{Duration, Instant};

use reqwest::blocking::{Client, Response};

use crate::config::UpstreamConfig;
use crate::error::{Context, FetchError, Result};
use crate::fetch::request::{build_quote_url, RequestContext};

/// Lines at the top of every response that carry metadata only.
pub const HEADER_LINE_COUNT: usize = 7;

/// Prefix of the metadata line that may appear anywhere after the header.
pub const TIMEZONE_OFFSET_PREFIX: &str = "TIMEZONE_OFFSET";

/// Anything able to produce the raw record line for an instrument.
pub trait QuoteSource: Send + Sync {
    fn fetch(&self, symbol: &str, exchange: &str) -> std::result::Result<String, FetchError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// 1-indexed position within the response body.
    pub number: usize,
    pub text: String,
}

/// Forward-only line iterator over a response body.
///
/// Owns the underlying reader, so dropping the iterator (exhausted or not)
/// closes the stream. Once the optional deadline has passed, the next item is
/// a `TimedOut` error and nothing more is read.
pub struct RawLines<R> {
    lines: io::Lines<BufReader<R>>,
    line_number: usize,
    deadline: Option<Instant>,
}

impl<R: Read> RawLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
            line_number: 0,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    fn check_deadline(&self) -> io::Result<()> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(io::Error::new(
                io::ErrorKind::TimedOut,
                "response body not received before the request deadline",
            )),
            _ => Ok(()),
        }
    }
}

impl<R: Read> Iterator for RawLines<R> {
    type Item = io::Result<RawLine>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Err(err) = self.check_deadline() {
            return Some(Err(err));
        }
        let text = match self.lines.next()? {
            Ok(text) => text,
            Err(err) => return Some(Err(err)),
        };
        // A line that arrived late still counts against the deadline.
        if let Err(err) = self.check_deadline() {
            return Some(Err(err));
        }
        self.line_number += 1;
        Some(Ok(RawLine {
            number: self.line_number,
            text,
        }))
    }
}

/// Apply the header/sentinel skip protocol and return the first record line.
///
/// Reading stops as soon as the record is found; the rest of the stream is
/// never touched.
pub fn select_record_line<R: Read>(
    lines: RawLines<R>,
    url: &str,
) -> std::result::Result<String, FetchError> {
    for line in lines {
        let line = line.map_err(|err| FetchError::from_io(url, err))?;
        if line.number <= HEADER_LINE_COUNT {
            continue;
        }
        if line.text.starts_with(TIMEZONE_OFFSET_PREFIX) {
            continue;
        }
        return Ok(line.text);
    }

    Err(FetchError::NoRecordFound {
        url: url.to_string(),
    })
}

/// Blocking HTTP fetcher for the configured quote endpoint.
pub struct QuoteFetcher {
    client: Client,
    url_template: String,
    timeout: Duration,
}

impl QuoteFetcher {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to construct quote HTTP client")?;

        Ok(Self {
            client,
            url_template: config.url_template.clone(),
            timeout,
        })
    }

    pub fn quote_url(
        &self,
        symbol: &str,
        exchange: &str,
    ) -> std::result::Result<String, FetchError> {
        build_quote_url(&self.url_template, RequestContext { symbol, exchange }).map_err(|err| {
            FetchError::Transport {
                url: self.url_template.clone(),
                reason: err.to_string(),
            }
        })
    }

    /// Issue the GET and expose the body as a lazy line sequence.
    ///
    /// The client timeout restarts on every body read, so the lines also carry
    /// a deadline that bounds the whole exchange.
    pub fn open(
        &self,
        symbol: &str,
        exchange: &str,
    ) -> std::result::Result<(String, RawLines<Response>), FetchError> {
        let url = self.quote_url(symbol, exchange)?;
        let deadline = Instant::now() + self.timeout;

        let response = self
            .client
            .get(&url)
            .send()
            .and_then(Response::error_for_status)
            .map_err(|err| FetchError::from_reqwest(&url, err))?;

        Ok((url, RawLines::new(response).with_deadline(deadline)))
    }
}

impl QuoteSource for QuoteFetcher {
    fn fetch(&self, symbol: &str, exchange: &str) -> std::result::Result<String, FetchError> {
        let (url, lines) = self.open(symbol, exchange)?;
        select_record_line(lines, &url)
    }
}
