//! Operator menu for the LED blinking core.

use std::io::{self, BufRead, Write};

use colored::Colorize;

use crate::devices::{Direction, FrequencyIndex, LedBlinker};
use crate::err::BlinkError;
use crate::mems::PhysicalMemory;

const BANNER: &str = "-------------  MLHDLC LED Blinking IP:  --------------------";

/// One line of operator input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    Number(u32),
    Invalid,
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    Exit,
    Frequency,
    Direction,
}

impl TryFrom<u32> for MenuChoice {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MenuChoice::Exit),
            1 => Ok(MenuChoice::Frequency),
            2 => Ok(MenuChoice::Direction),
            other => Err(other),
        }
    }
}

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Run the menu until the operator picks exit or input ends.
    ///
    /// Register write failures are reported and the loop carries on; only
    /// I/O errors on the console itself end it early.
    pub fn run<M: PhysicalMemory>(&mut self, blinker: &LedBlinker<M>) -> io::Result<()> {
        loop {
            self.print_menu()?;

            let choice = match self.read_entry()? {
                Entry::Eof => break,
                Entry::Number(n) => MenuChoice::try_from(n).ok(),
                Entry::Invalid => None,
            };

            let outcome = match choice {
                Some(MenuChoice::Exit) => break,
                Some(MenuChoice::Frequency) => {
                    let Some(index) = self.prompt::<FrequencyIndex>(
                        "Please enter the frequency index [0:15]",
                        "### Invalid frequency index.",
                    )?
                    else {
                        break;
                    };
                    blinker.set_frequency(index)
                }
                Some(MenuChoice::Direction) => {
                    let Some(direction) = self.prompt::<Direction>(
                        "Please specify the blinking direction? (1 - up, 0 - down)",
                        "### Invalid input.",
                    )?
                    else {
                        break;
                    };
                    blinker.set_direction(direction)
                }
                None => {
                    writeln!(
                        self.output,
                        "\n\n {}",
                        "********* Invalid input, Please try Again ***********".yellow()
                    )?;
                    continue;
                }
            };

            self.report(outcome)?;
            writeln!(self.output, "\n\n Possible choices: 0, 1, 2")?;
        }

        writeln!(self.output, "\n <== BYE BYE ==>")?;
        self.output.flush()
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n{BANNER}\n")?;
        writeln!(self.output, "1 -> Change blinking frequency")?;
        writeln!(self.output, "2 -> Change blinking direction")?;
        writeln!(self.output, "0 -> Exit\n")?;
        write!(self.output, "\nEnter your choice :")?;
        self.output.flush()
    }

    /// Ask for a value until one in `T`'s domain is entered. `None` on end of
    /// input.
    fn prompt<T>(&mut self, question: &str, rejection: &str) -> io::Result<Option<T>>
    where
        T: TryFrom<u32>,
    {
        loop {
            writeln!(self.output, "{question}")?;
            self.output.flush()?;

            match self.read_entry()? {
                Entry::Eof => return Ok(None),
                Entry::Number(n) => {
                    if let Ok(value) = T::try_from(n) {
                        return Ok(Some(value));
                    }
                }
                Entry::Invalid => {}
            }
            writeln!(self.output, "{}", rejection.yellow())?;
        }
    }

    fn report(&mut self, outcome: Result<(), BlinkError>) -> io::Result<()> {
        if let Err(e) = outcome {
            log::error!("Register write failed: {e}");
            writeln!(self.output, "{}", format!("### {e}").red())?;
        }
        Ok(())
    }

    fn read_entry(&mut self) -> io::Result<Entry> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(Entry::Eof);
        }
        Ok(parse_entry(&line))
    }
}

fn parse_entry(line: &str) -> Entry {
    let trimmed = line.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Entry::Invalid;
    }
    trimmed.parse().map_or(Entry::Invalid, Entry::Number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DIRECTION_OFFSET, DeviceConfig, FREQUENCY_OFFSET};
    use crate::mems::fake::{FakeMemory, Op};
    use std::io::Cursor;

    const MAPPED_BASE: usize = 0x1000;

    fn session(input: &str, blinker: &LedBlinker<FakeMemory>) -> String {
        let mut console = Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        console.run(blinker).unwrap();
        String::from_utf8(console.into_output()).unwrap()
    }

    fn blinker() -> LedBlinker<FakeMemory> {
        LedBlinker::new(DeviceConfig::default(), FakeMemory::with_base(MAPPED_BASE)).unwrap()
    }

    #[test]
    fn test_parse_entry() {
        assert_eq!(parse_entry("7\n"), Entry::Number(7));
        assert_eq!(parse_entry("  12 \r\n"), Entry::Number(12));
        assert_eq!(parse_entry("\n"), Entry::Invalid);
        assert_eq!(parse_entry("-1\n"), Entry::Invalid);
        assert_eq!(parse_entry("1a\n"), Entry::Invalid);
        assert_eq!(parse_entry("99999999999999999999\n"), Entry::Invalid);
    }

    #[test]
    fn test_exit_immediately() {
        let blinker = blinker();
        let out = session("0\n", &blinker);
        assert!(out.contains("MLHDLC LED Blinking IP"));
        assert!(out.contains("<== BYE BYE ==>"));
        assert!(blinker_ops_empty(&blinker));
    }

    #[test]
    fn test_set_frequency() {
        let blinker = blinker();
        let out = session("1\n9\n0\n", &blinker);
        assert!(out.contains("Please enter the frequency index [0:15]"));
        assert!(out.contains("Possible choices: 0, 1, 2"));
        assert_eq!(
            stores(&blinker),
            vec![(MAPPED_BASE + FREQUENCY_OFFSET, 9)]
        );
    }

    #[test]
    fn test_frequency_reprompts_until_in_range() {
        let blinker = blinker();
        let out = session("1\n16\nabc\n15\n0\n", &blinker);
        assert_eq!(out.matches("Invalid frequency index").count(), 2);
        assert_eq!(
            stores(&blinker),
            vec![(MAPPED_BASE + FREQUENCY_OFFSET, 15)]
        );
    }

    #[test]
    fn test_set_direction_with_retry() {
        let blinker = blinker();
        let out = session("2\n2\n1\n0\n", &blinker);
        assert_eq!(out.matches("### Invalid input.").count(), 1);
        assert_eq!(
            stores(&blinker),
            vec![(MAPPED_BASE + DIRECTION_OFFSET, 1)]
        );
    }

    #[test]
    fn test_invalid_menu_choice() {
        let blinker = blinker();
        let out = session("5\nx\n0\n", &blinker);
        assert_eq!(out.matches("Invalid input, Please try Again").count(), 2);
        assert!(blinker_ops_empty(&blinker));
    }

    #[test]
    fn test_end_of_input_exits() {
        let blinker = blinker();
        let out = session("1\n", &blinker);
        assert!(out.contains("<== BYE BYE ==>"));
        assert!(blinker_ops_empty(&blinker));
    }

    #[test]
    fn test_mapping_failure_keeps_loop_running() {
        let blinker = blinker();
        blinker_mem(&blinker).fail_map(true);

        let out = session("1\n3\n2\n0\n0\n", &blinker);
        assert_eq!(out.matches("Mapping memory for absolute memory access failed").count(), 2);
        assert!(out.contains("<== BYE BYE ==>"));
        assert!(stores(&blinker).is_empty());
        assert_eq!(blinker_mem(&blinker).count(|op| matches!(op, Op::Close)), 2);
    }

    fn blinker_mem(blinker: &LedBlinker<FakeMemory>) -> &FakeMemory {
        blinker.memory()
    }

    fn stores(blinker: &LedBlinker<FakeMemory>) -> Vec<(usize, u32)> {
        blinker_mem(blinker).stores()
    }

    fn blinker_ops_empty(blinker: &LedBlinker<FakeMemory>) -> bool {
        blinker_mem(blinker).ops().is_empty()
    }
}
