use crate::error::{Error, Result};
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

/// Scans a log file, yielding the capture groups of every line matching a pattern.
/// Lines that do not match are skipped.
///
/// Group 0 is the whole line, unmatched optional groups are empty strings.
pub struct LogParser {
    reader: BufReader<File>,
    re: Regex,
}

impl LogParser {
    pub fn new<P: AsRef<Path>>(file_path: P, re_pattern: &str) -> Result<Self> {
        let re = Regex::new(re_pattern).map_err(|e| Error::Config(e.to_string()))?;
        let f = File::open(file_path)?;
        Ok(Self { reader: BufReader::new(f), re })
    }

    pub fn lines(self) -> LogParserLineIter {
        LogParserLineIter { lines: self.reader.lines(), re: self.re }
    }
}

pub struct LogParserLineIter {
    re: Regex,
    lines: Lines<BufReader<File>>,
}

impl Iterator for LogParserLineIter {
    type Item = Result<Vec<String>>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            if let Some(caps) = self.re.captures(&line) {
                let fields = caps
                    .iter()
                    .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
                    .collect();
                return Some(Ok(fields));
            }
        }
    }
}

/// Collect every matching line of `file_path`.
pub fn parse_log<P: AsRef<Path>>(file_path: P, re_pattern: &str) -> Result<Vec<Vec<String>>> {
    LogParser::new(file_path, re_pattern)?.lines().collect()
}
