//! Interactive prompts.
//!
//! [`Prompter`] is the seam the session talks to. On a terminal the binary
//! uses [`DialoguerPrompter`]; [`Console`] reads plain lines from any
//! `BufRead`, which covers piped stdin and scripted input in tests.

use colored::*;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use std::io::{self, BufRead, Stdin, StdinLock, Stdout, Write};
use thiserror::Error;

pub mod emoji {
    pub const INFO: &str = "ℹ️ ";
    pub const SUCCESS: &str = "✅";
    pub const ERROR: &str = "❌";
    pub const LOADING: &str = "⏳";
}

pub const BACK_WORD: &str = "back";
pub const SKIP_WORD: &str = "skip";

pub const MENU_TITLE: &str = "What would you like to do?";
pub const MENU_ITEMS: [&str; 2] = ["Stake R2USD", "Exit"];
pub const AMOUNT_PROMPT: &str = "Enter amount of R2USD to stake (or \"back\" to return to menu)";
pub const COUNT_PROMPT: &str =
    "Enter number of staking transactions to perform per wallet (or \"skip\" to return to menu)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Stake,
    Exit,
    Invalid,
}

impl MenuChoice {
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "1" => MenuChoice::Stake,
            "2" => MenuChoice::Exit,
            _ => MenuChoice::Invalid,
        }
    }

    fn from_index(index: usize) -> Self {
        match index {
            0 => MenuChoice::Stake,
            1 => MenuChoice::Exit,
            _ => MenuChoice::Invalid,
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    #[error("Invalid amount. Please enter a positive number.")]
    InvalidAmount,
    #[error("Invalid number. Please enter a positive integer.")]
    InvalidCount,
}

/// A prompt answer: either a value or the cancel word.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Entry<T> {
    Value(T),
    Cancel,
}

/// Length of the run of ASCII digits at the start of `bytes`.
fn digit_run(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Reads the longest decimal number at the start of `s` ("10abc" -> 10).
fn leading_decimal(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    let int_digits = digit_run(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digit_run(&bytes[end + 1..]);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = digit_run(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse().ok()
}

/// Reads the integer at the start of `s` ("2.5" -> 2, "3 tx" -> 3).
fn leading_integer(s: &str) -> Option<i64> {
    let bytes = s.as_bytes();
    let sign = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits = digit_run(&bytes[sign..]);
    if digits == 0 {
        return None;
    }
    // Too many digits for i64 is still a number, just far out of range
    Some(s[..sign + digits].parse().unwrap_or(i64::MAX))
}

pub fn parse_amount(line: &str) -> Result<Entry<f64>, InputError> {
    let line = line.trim();
    if line.eq_ignore_ascii_case(BACK_WORD) {
        return Ok(Entry::Cancel);
    }
    match leading_decimal(line) {
        Some(v) if v.is_finite() && v > 0.0 => Ok(Entry::Value(v)),
        _ => Err(InputError::InvalidAmount),
    }
}

pub fn parse_count(line: &str) -> Result<Entry<u32>, InputError> {
    let line = line.trim();
    if line.eq_ignore_ascii_case(SKIP_WORD) {
        return Ok(Entry::Cancel);
    }
    match leading_integer(line).map(u32::try_from) {
        Some(Ok(n)) if n > 0 => Ok(Entry::Value(n)),
        _ => Err(InputError::InvalidCount),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StakeRequest {
    pub amount: f64,
    pub count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StakePrompt {
    Ready(StakeRequest),
    /// `back` or `skip` was entered
    Cancelled,
    /// Input ended
    Closed,
}

/// Everything the menu loop needs from the user's terminal.
pub trait Prompter {
    /// Shows the menu and returns the pick. End of input counts as Exit.
    fn choose(&mut self) -> io::Result<MenuChoice>;

    /// Asks one free-text question. `None` at end of input.
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Prints one line.
    fn say(&mut self, text: &str) -> io::Result<()>;

    fn info(&mut self, text: &str) -> io::Result<()> {
        self.say(&format!("{} {}", emoji::INFO, text.green()))
    }

    fn error(&mut self, text: &str) -> io::Result<()> {
        self.say(&format!("{} {}", emoji::ERROR, text.red()))
    }

    /// Asks for the amount, then the count. Any invalid answer reports the
    /// error and starts over at the amount prompt.
    fn prompt_stake_params(&mut self) -> io::Result<StakePrompt> {
        loop {
            let Some(line) = self.ask(AMOUNT_PROMPT)? else {
                return Ok(StakePrompt::Closed);
            };
            let amount = match parse_amount(&line) {
                Ok(Entry::Value(amount)) => amount,
                Ok(Entry::Cancel) => return Ok(StakePrompt::Cancelled),
                Err(e) => {
                    self.error(&e.to_string())?;
                    continue;
                }
            };

            let Some(line) = self.ask(COUNT_PROMPT)? else {
                return Ok(StakePrompt::Closed);
            };
            match parse_count(&line) {
                Ok(Entry::Value(count)) => {
                    return Ok(StakePrompt::Ready(StakeRequest { amount, count }))
                }
                Ok(Entry::Cancel) => return Ok(StakePrompt::Cancelled),
                Err(e) => self.error(&e.to_string())?,
            }
        }
    }
}

/// Terminal prompts: arrow-key menu and themed text inputs.
pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for DialoguerPrompter {
    fn choose(&mut self) -> io::Result<MenuChoice> {
        println!();
        let selection = Select::with_theme(&self.theme)
            .with_prompt(MENU_TITLE)
            .items(&MENU_ITEMS)
            .default(0)
            .interact_opt()
            .map_err(|dialoguer::Error::IO(e)| e)?;

        // Esc / q leaves like Exit
        Ok(selection.map_or(MenuChoice::Exit, MenuChoice::from_index))
    }

    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let answer = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text();

        match answer.map_err(|dialoguer::Error::IO(e)| e) {
            Ok(line) => Ok(Some(line)),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn say(&mut self, text: &str) -> io::Result<()> {
        writeln!(io::stdout(), "{}", text)
    }
}

/// Line-oriented prompts over any reader/writer pair.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        let stdin: Stdin = io::stdin();
        Self::new(stdin.lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn show_menu(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n")?;
        writeln!(self.output, "{}", MENU_TITLE.cyan())?;
        for (i, item) in MENU_ITEMS.iter().enumerate() {
            writeln!(self.output, "{}", format!("{}. {}", i + 1, item).yellow())?;
        }
        Ok(())
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", format!("{}: ", prompt).white())?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

impl<R: BufRead, W: Write> Prompter for Console<R, W> {
    fn choose(&mut self) -> io::Result<MenuChoice> {
        self.show_menu()?;
        Ok(match self.read_line("Enter your choice")? {
            Some(line) => MenuChoice::parse(&line),
            None => MenuChoice::Exit,
        })
    }

    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.read_line(prompt)
    }

    fn say(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{}", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output_of(console: Console<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(console.into_output()).unwrap()
    }

    #[test]
    fn test_menu_choice_parsing() {
        assert_eq!(MenuChoice::parse("1"), MenuChoice::Stake);
        assert_eq!(MenuChoice::parse(" 2 \n"), MenuChoice::Exit);
        assert_eq!(MenuChoice::parse("3"), MenuChoice::Invalid);
        assert_eq!(MenuChoice::parse(""), MenuChoice::Invalid);
        assert_eq!(MenuChoice::from_index(0), MenuChoice::Stake);
        assert_eq!(MenuChoice::from_index(1), MenuChoice::Exit);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1.5"), Ok(Entry::Value(1.5)));
        assert_eq!(parse_amount(" 10 "), Ok(Entry::Value(10.0)));
        assert_eq!(parse_amount(".5"), Ok(Entry::Value(0.5)));
        assert_eq!(parse_amount("2e1"), Ok(Entry::Value(20.0)));
        assert_eq!(parse_amount("BACK"), Ok(Entry::Cancel));
        assert_eq!(parse_amount("abc"), Err(InputError::InvalidAmount));
        assert_eq!(parse_amount("0"), Err(InputError::InvalidAmount));
        assert_eq!(parse_amount("-2"), Err(InputError::InvalidAmount));
        assert_eq!(parse_amount("inf"), Err(InputError::InvalidAmount));
        assert_eq!(parse_amount("1e400"), Err(InputError::InvalidAmount));
        assert_eq!(parse_amount("."), Err(InputError::InvalidAmount));
        assert_eq!(parse_amount(""), Err(InputError::InvalidAmount));
    }

    #[test]
    fn test_parse_amount_takes_numeric_prefix() {
        assert_eq!(parse_amount("10abc"), Ok(Entry::Value(10.0)));
        assert_eq!(parse_amount("2.5 R2USD"), Ok(Entry::Value(2.5)));
        assert_eq!(parse_amount("3e"), Ok(Entry::Value(3.0)));
        assert_eq!(parse_amount("1.2.3"), Ok(Entry::Value(1.2)));
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("3"), Ok(Entry::Value(3)));
        assert_eq!(parse_count("Skip"), Ok(Entry::Cancel));
        assert_eq!(parse_count("0"), Err(InputError::InvalidCount));
        assert_eq!(parse_count("-1"), Err(InputError::InvalidCount));
        assert_eq!(parse_count("many"), Err(InputError::InvalidCount));
        assert_eq!(parse_count(".5"), Err(InputError::InvalidCount));
        assert_eq!(parse_count("99999999999"), Err(InputError::InvalidCount));
    }

    #[test]
    fn test_parse_count_takes_integer_prefix() {
        assert_eq!(parse_count("2.5"), Ok(Entry::Value(2)));
        assert_eq!(parse_count("3 tx"), Ok(Entry::Value(3)));
        assert_eq!(parse_count("+4"), Ok(Entry::Value(4)));
    }

    #[test]
    fn test_invalid_amount_reprompts() {
        let mut c = console("abc\n5\n2\n");
        let result = c.prompt_stake_params().unwrap();
        assert_eq!(
            result,
            StakePrompt::Ready(StakeRequest {
                amount: 5.0,
                count: 2
            })
        );
        let out = output_of(c);
        assert!(out.contains("Invalid amount. Please enter a positive number."));
        assert_eq!(out.matches("Enter amount of R2USD").count(), 2);
        assert_eq!(out.matches("Enter number of staking transactions").count(), 1);
    }

    #[test]
    fn test_invalid_count_restarts_at_amount() {
        let mut c = console("5\nzero\n7\n1\n");
        let result = c.prompt_stake_params().unwrap();
        assert_eq!(
            result,
            StakePrompt::Ready(StakeRequest {
                amount: 7.0,
                count: 1
            })
        );
        let out = output_of(c);
        assert!(out.contains("Invalid number. Please enter a positive integer."));
        assert_eq!(out.matches("Enter amount of R2USD").count(), 2);
    }

    #[test]
    fn test_lenient_answers_are_accepted_without_reprompt() {
        let mut c = console("10abc\n2.5\n");
        let result = c.prompt_stake_params().unwrap();
        assert_eq!(
            result,
            StakePrompt::Ready(StakeRequest {
                amount: 10.0,
                count: 2
            })
        );
        let out = output_of(c);
        assert!(!out.contains("Invalid"));
    }

    #[test]
    fn test_back_and_skip_cancel() {
        let mut c = console("back\n");
        assert_eq!(c.prompt_stake_params().unwrap(), StakePrompt::Cancelled);

        let mut c = console("5\nskip\n");
        assert_eq!(c.prompt_stake_params().unwrap(), StakePrompt::Cancelled);
    }

    #[test]
    fn test_end_of_input_closes() {
        let mut c = console("");
        assert_eq!(c.prompt_stake_params().unwrap(), StakePrompt::Closed);

        let mut c = console("5\n");
        assert_eq!(c.prompt_stake_params().unwrap(), StakePrompt::Closed);

        let mut c = console("");
        assert_eq!(c.choose().unwrap(), MenuChoice::Exit);
    }

    #[test]
    fn test_choose_shows_menu() {
        let mut c = console("1\n");
        assert_eq!(c.choose().unwrap(), MenuChoice::Stake);
        let out = output_of(c);
        assert!(out.contains("What would you like to do?"));
        assert!(out.contains("1. Stake R2USD"));
        assert!(out.contains("2. Exit"));
        assert!(out.contains("Enter your choice: "));
    }
}
