//! Reader for GloVe text files: one `word v1 v2 … vN` entry per line.

use crate::error::Result;
use std::io::BufRead;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GloveStats {
    pub lines: usize,
    pub accepted: usize,
    pub skipped: usize,
}

/// Streams `(word, vector)` pairs into `sink` until the input ends or `sink`
/// returns `false`.
///
/// Lines with an unparsable number or the wrong number of components are
/// logged and skipped.
pub fn read_glove<R, F>(reader: R, dimension: usize, mut sink: F) -> Result<GloveStats>
where
    R: BufRead,
    F: FnMut(String, Vec<f32>) -> bool,
{
    let mut stats = GloveStats::default();
    for line in reader.lines() {
        let line = line?;
        stats.lines += 1;
        let Some((word, vector)) = parse_line(&line, dimension) else {
            stats.skipped += 1;
            continue;
        };
        stats.accepted += 1;
        if !sink(word, vector) {
            break;
        }
    }
    Ok(stats)
}

fn parse_line(line: &str, dimension: usize) -> Option<(String, Vec<f32>)> {
    let mut parts = line.split_whitespace();
    let word = parts.next()?;
    let mut vector = Vec::with_capacity(dimension);
    for part in parts {
        match part.parse::<f32>() {
            Ok(v) => vector.push(v),
            Err(_) => {
                log::warn!("Bad vector for {word:?}. Skipping");
                return None;
            }
        }
    }
    if vector.len() != dimension {
        log::warn!("Bad vector length for {word:?}. Skipping");
        return None;
    }
    Some((word.to_string(), vector))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn skips_malformed_rows() {
        let input = "the 0.1 0.2 0.3\nbroken 0.1 x 0.3\nshort 0.1 0.2\n, -0.5 0.5 1e-2\n";
        let mut rows = Vec::new();
        let stats = read_glove(input.as_bytes(), 3, |word, vector| {
            rows.push((word, vector));
            true
        })
        .unwrap();

        assert_eq!(
            stats,
            GloveStats {
                lines: 4,
                accepted: 2,
                skipped: 2
            }
        );
        assert_eq!(rows[0].0, "the");
        assert_eq!(rows[1].0, ",");
        assert_eq!(rows[1].1, vec![-0.5, 0.5, 0.01]);
    }

    #[test]
    fn sink_can_stop_early() {
        let input = "a 1\nb 2\nc 3\n";
        let mut seen = 0;
        let stats = read_glove(input.as_bytes(), 1, |_, _| {
            seen += 1;
            seen < 2
        })
        .unwrap();
        assert_eq!(seen, 2);
        assert_eq!(stats.lines, 2);
    }
}
