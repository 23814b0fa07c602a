use std::path::Path;

use itertools::Itertools;
use nom::{
    bytes::complete::{take_till, take_till1},
    character::complete::{satisfy, space0, space1},
    combinator::{all_consuming, map, map_opt},
    sequence::{separated_pair, terminated, tuple},
    Finish, IResult,
};

use crate::bqueue::BoundedQueue;
use crate::chemical::Chemical;
use crate::error::SetupError;
use crate::flasks::Flasks;

pub const QUEUE_CAPACITY: usize = 4;

/// Decoded contents of a puzzle file: the header counts and the setup script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setup {
    pub flask_count: usize,
    /// Number of distinct chemicals the file claims to use. Only checked, never needed.
    pub chemical_count: usize,
    pub script: Vec<String>,
}

#[derive(Debug, PartialEq, Eq)]
struct Directive {
    count: usize,
    dest: usize,
}

fn parse_header(s: &str) -> IResult<&str, (usize, usize)> {
    map(
        all_consuming(terminated(
            separated_pair(
                nom::character::complete::u64,
                space1,
                nom::character::complete::u64,
            ),
            space0,
        )),
        |(flasks, chemicals)| (flasks as usize, chemicals as usize),
    )(s)
}

/// `<count> <anything> <flask>`, where only the first character of the first token is
/// the count.
fn parse_directive(s: &str) -> IResult<&str, Directive> {
    map_opt(
        all_consuming(terminated(
            tuple((
                satisfy(|c| c.is_ascii_digit()),
                take_till(char::is_whitespace),
                space1,
                take_till1(char::is_whitespace),
                space1,
                nom::character::complete::u64,
            )),
            space0,
        )),
        |(count, _, _, _, _, dest)| {
            Some(Directive {
                count: count.to_digit(10)? as usize,
                dest: usize::try_from(dest).ok()?,
            })
        },
    )(s)
}

fn malformed<S: Into<String>>(line: usize, reason: S) -> SetupError {
    SetupError::MalformedDirective {
        line,
        reason: reason.into(),
    }
}

/// Runs a setup script against `flasks`. Chemical lines are staged in a FIFO queue of
/// `QUEUE_CAPACITY`; a line starting with a digit moves that many staged chemicals onto
/// the named flask. Returns whatever is left in the queue.
pub fn fill_flasks<I, S>(
    flasks: &mut Flasks,
    script: I,
) -> Result<BoundedQueue<Chemical>, SetupError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut queue = BoundedQueue::new(QUEUE_CAPACITY);
    for (offset, line) in script.into_iter().enumerate() {
        let line = line.as_ref().trim();
        let line_no = offset + 1;
        if line.is_empty() {
            log::debug!("skipping blank script line {}", line_no);
            continue;
        }
        if line.starts_with(|c: char| c.is_ascii_digit()) {
            let (_, directive) = parse_directive(line).finish().map_err(|e| {
                malformed(line_no, format!("cannot parse {:?} ({:?})", line, e.code))
            })?;
            let flask = flasks.get_mut(directive.dest).ok_or_else(|| {
                malformed(line_no, format!("there is no flask {}", directive.dest))
            })?;
            for _ in 0..directive.count {
                let unit = queue
                    .dequeue()
                    .map_err(|_| malformed(line_no, "ran out of staged chemicals"))?;
                log::debug!("placing {} in flask {}", unit, directive.dest);
                flask.push(unit)?;
            }
        } else if !queue.enqueue(Chemical::from(line)) {
            log::warn!("staging queue is full, dropping {:?} on line {}", line, line_no);
        }
    }
    Ok(queue)
}

impl Setup {
    pub fn parse(input: &str) -> Result<Self, SetupError> {
        let mut lines = input.lines();
        let header = lines.next().unwrap_or_default().trim();
        let (_, (flask_count, chemical_count)) =
            parse_header(header).finish().map_err(|_| SetupError::MalformedHeader {
                header: header.to_owned(),
            })?;
        let script = lines.map(|line| line.trim().to_owned()).collect();
        Ok(Self {
            flask_count,
            chemical_count,
            script,
        })
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, SetupError> {
        let input = std::fs::read_to_string(path)?;
        Self::parse(&input)
    }

    /// Creates `flask_count` empty flasks of `capacity` and runs the script over them.
    pub fn build(&self, capacity: usize) -> Result<Flasks, SetupError> {
        let mut flasks = Flasks::new(self.flask_count, capacity);
        let leftover = fill_flasks(&mut flasks, &self.script)?;
        if !leftover.is_empty() {
            log::debug!(
                "{} chemicals left in the staging queue: {}",
                leftover.size(),
                leftover.iter().join(" ")
            );
        }
        let distinct = flasks
            .iter()
            .flat_map(|flask| flask.elements())
            .unique()
            .count();
        if distinct != self.chemical_count {
            log::warn!(
                "setup declares {} chemicals but placed {}",
                self.chemical_count,
                distinct
            );
        }
        Ok(flasks)
    }
}

#[cfg(test)]
mod tests {
    use super::{fill_flasks, parse_directive, Directive, Setup};
    use crate::chemical::Chemical;
    use crate::error::{ContainerError, SetupError};
    use crate::flasks::Flasks;

    fn codes(flasks: &Flasks, index: usize) -> Vec<String> {
        flasks
            .get(index)
            .unwrap()
            .elements()
            .iter()
            .map(|c| c.code().to_owned())
            .collect()
    }

    #[test]
    fn test_parse_directive() {
        assert_eq!(
            parse_directive("2 to 1").unwrap().1,
            Directive { count: 2, dest: 1 }
        );
        assert_eq!(
            parse_directive("3 into 12  ").unwrap().1,
            Directive { count: 3, dest: 12 }
        );
        assert!(parse_directive("2 to").is_err());
        assert!(parse_directive("2 to x").is_err());
        assert!(parse_directive("2 to 1 extra").is_err());
    }

    #[test]
    fn test_fill_in_fifo_order() {
        let mut flasks = Flasks::new(2, 4);
        let leftover = fill_flasks(&mut flasks, ["A", "B", "C", "D", "2 to 1", "1 to 2"]).unwrap();
        assert_eq!(codes(&flasks, 1), vec!["A", "B"]);
        assert_eq!(codes(&flasks, 2), vec!["C"]);
        assert_eq!(leftover.iter().collect::<Vec<_>>(), vec![&Chemical::from("D")]);
    }

    #[test]
    fn test_overflowing_tokens_are_dropped() {
        let mut flasks = Flasks::new(1, 4);
        let leftover = fill_flasks(&mut flasks, ["A", "B", "C", "D", "E", "4 to 1"]).unwrap();
        assert_eq!(codes(&flasks, 1), vec!["A", "B", "C", "D"]);
        assert!(leftover.is_empty());
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let mut flasks = Flasks::new(1, 4);
        fill_flasks(&mut flasks, ["A", "", "1 to 1"]).unwrap();
        assert_eq!(codes(&flasks, 1), vec!["A"]);
    }

    #[test]
    fn test_padded_lines_are_trimmed() {
        let mut flasks = Flasks::new(1, 4);
        let leftover = fill_flasks(&mut flasks, ["  A ", "B\t", " 1 to 1 "]).unwrap();
        assert_eq!(codes(&flasks, 1), vec!["A"]);
        assert_eq!(leftover.iter().collect::<Vec<_>>(), vec![&Chemical::from("B")]);
    }

    #[test]
    fn test_bad_directives() {
        let mut flasks = Flasks::new(2, 4);
        assert!(matches!(
            fill_flasks(&mut flasks, ["A", "1 to 3"]),
            Err(SetupError::MalformedDirective { line: 2, .. })
        ));
        assert!(matches!(
            fill_flasks(&mut flasks, ["A", "1 to 0"]),
            Err(SetupError::MalformedDirective { line: 2, .. })
        ));
        assert!(matches!(
            fill_flasks(&mut flasks, ["A", "2 to 1"]),
            Err(SetupError::MalformedDirective { line: 2, .. })
        ));
        assert!(matches!(
            fill_flasks(&mut flasks, ["1 to"]),
            Err(SetupError::MalformedDirective { line: 1, .. })
        ));
    }

    #[test]
    fn test_overfilled_flask() {
        let mut flasks = Flasks::new(1, 2);
        assert!(matches!(
            fill_flasks(&mut flasks, ["A", "B", "C", "3 to 1"]),
            Err(SetupError::Container(ContainerError::CapacityExceeded { capacity: 2 }))
        ));
    }

    #[test]
    fn test_parse_setup() {
        let setup = Setup::parse("2 2\nAA\n  BB \nAA\n3 to 1\n").unwrap();
        assert_eq!(setup.flask_count, 2);
        assert_eq!(setup.chemical_count, 2);
        assert_eq!(setup.script, vec!["AA", "BB", "AA", "3 to 1"]);
        let flasks = setup.build(4).unwrap();
        assert_eq!(flasks.len(), 2);
        assert_eq!(codes(&flasks, 1), vec!["AA", "BB", "AA"]);
        assert!(flasks.get(2).unwrap().is_empty());
    }

    #[test]
    fn test_bad_header() {
        assert!(matches!(
            Setup::parse("four 3\nAA\n"),
            Err(SetupError::MalformedHeader { .. })
        ));
        assert!(matches!(
            Setup::parse(""),
            Err(SetupError::MalformedHeader { .. })
        ));
        assert!(Setup::parse("4 3 \r\nAA\r\n").is_ok());
    }

    #[test]
    fn test_bundled_puzzle() {
        let setup = Setup::parse(include_str!("../../data/4f3c.txt")).unwrap();
        let flasks = setup.build(4).unwrap();
        assert_eq!(flasks.len(), 4);
        let placed: usize = flasks.iter().map(|f| f.size()).sum();
        assert_eq!(placed, 9);
        assert!(!flasks.is_solved());
    }
}
