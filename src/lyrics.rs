use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

/// `[MM:SS.FF]` with a two or three digit fraction. ASCII digits only.
static TIME_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([0-9]{2}):([0-9]{2})\.([0-9]{2,3})\]").expect("valid tag regex"));

#[derive(Debug, Clone, PartialEq)]
pub struct TimedLine {
    /// Playback second at which the line becomes active.
    pub time: f64,
    pub text: String,
}

/// Sorted, immutable lyric lines for one song.
///
/// Cloning shares the underlying lines; a song change replaces the whole
/// timeline instead of editing it.
#[derive(Debug, Clone)]
pub struct Timeline {
    lines: Arc<[TimedLine]>,
}

impl Default for Timeline {
    fn default() -> Self {
        Self {
            lines: Arc::from(Vec::new()),
        }
    }
}

impl Timeline {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses LRC text. Untagged lines and tags without lyric text are
    /// skipped, so the worst case is an empty timeline.
    pub fn parse(source: &str) -> Self {
        Self::from_unsorted(source.lines().filter_map(parse_line).collect())
    }

    /// Invalid UTF-8 is replaced rather than rejected, so a stray byte only
    /// affects the line it sits on.
    pub fn from_reader<R: Read>(mut reader: R) -> std::io::Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(Self::parse(&String::from_utf8_lossy(&bytes)))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::from_reader(BufReader::new(file))?)
    }

    /// A single line shown from the start of the track.
    pub fn placeholder(message: impl Into<String>) -> Self {
        Self {
            lines: Arc::from(vec![TimedLine {
                time: 0.0,
                text: message.into(),
            }]),
        }
    }

    fn from_unsorted(mut lines: Vec<TimedLine>) -> Self {
        // Stable: equal timestamps keep their source order.
        lines.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self {
            lines: Arc::from(lines),
        }
    }

    pub fn lines(&self) -> &[TimedLine] {
        &self.lines
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimedLine> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TimedLine> {
        self.lines.get(index)
    }

    pub fn first(&self) -> Option<&TimedLine> {
        self.lines.first()
    }

    /// Index of the last line whose time is `<= time`, or `None` before the
    /// first line. NaN matches nothing.
    pub fn active_index(&self, time: f64) -> Option<usize> {
        active_index(&self.lines, time)
    }

    /// Same result as [`Timeline::active_index`], but answers without a
    /// search when `hint` is still the active line or the one right after
    /// it, which is the common case between playback ticks.
    pub fn active_index_from(&self, hint: Option<usize>, time: f64) -> Option<usize> {
        let lines = &self.lines;
        match hint {
            Some(i) if i < lines.len() && lines[i].time <= time => {
                let next = i + 1;
                match lines.get(next) {
                    None => return Some(i),
                    Some(line) if line.time > time => return Some(i),
                    Some(_) => {
                        if lines.get(next + 1).map_or(true, |line| line.time > time) {
                            return Some(next);
                        }
                    }
                }
            }
            None => {
                if lines.first().map_or(true, |line| line.time > time) {
                    return None;
                }
            }
            Some(_) => {}
        }
        active_index(lines, time)
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a TimedLine;
    type IntoIter = std::slice::Iter<'a, TimedLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

/// Largest `i` with `lines[i].time <= time`. `lines` must be sorted.
pub fn active_index(lines: &[TimedLine], time: f64) -> Option<usize> {
    lines.partition_point(|line| line.time <= time).checked_sub(1)
}

fn parse_line(line: &str) -> Option<TimedLine> {
    let captures = TIME_TAG.captures(line)?;
    let minutes: u32 = captures.get(1)?.as_str().parse().ok()?;
    let seconds: u32 = captures.get(2)?.as_str().parse().ok()?;
    // Hundredths even when three digits are present: "[01:00.500]" is 65s.
    let fraction: u32 = captures.get(3)?.as_str().parse().ok()?;

    // A byte order mark counts as whitespace here.
    let text = TIME_TAG
        .replace(line, "")
        .trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
        .to_string();
    if text.is_empty() {
        return None;
    }

    let time = minutes as f64 * 60.0 + seconds as f64 + fraction as f64 / 100.0;
    Some(TimedLine { time, text })
}
