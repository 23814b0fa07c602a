use std::collections::HashMap;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor::{MoveTo, Show},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use itertools::Itertools;

use flasklib::error::{MoveError, TransferError};
use flasklib::{can_pour_from, can_pour_into, is_sealed, Chemical, Flasks, Setup, DEFAULT_CAPACITY};

const TITLE_ROW: u16 = 0;
const MESSAGE_ROW: u16 = 4;
const BOARD_ROW: u16 = 5;
const FLASKS_PER_BAND: usize = 4;
const CHEMICAL_COLORS: &[Color] = &[
    Color::Red,
    Color::Blue,
    Color::Green,
    Color::AnsiValue(202),
    Color::Yellow,
    Color::Magenta,
    Color::Cyan,
    Color::DarkRed,
    Color::DarkBlue,
    Color::DarkGreen,
];

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Puzzle file: a `<flasks> <chemicals>` header followed by the setup script
    #[arg(short, long, default_value = "data/4f3c.txt")]
    data_file: PathBuf,
    #[arg(short, long, value_parser, default_value_t = DEFAULT_CAPACITY)]
    capacity: usize,
    #[arg(short, long)]
    verbose: bool,
}

/// One answer typed at a prompt.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum Selection {
    Flask(usize),
    Exit,
}

impl FromStr for Selection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("exit") {
            return Ok(Selection::Exit);
        }
        if s.is_empty() || s.starts_with('0') || !s.chars().all(|c| c.is_ascii_digit()) {
            anyhow::bail!("invalid selection {:?}", s);
        }
        Ok(Selection::Flask(s.parse()?))
    }
}

#[derive(Debug, Clone, Copy)]
enum Prompt {
    Source,
    Destination,
}

impl Prompt {
    fn label(&self) -> &'static str {
        match self {
            Prompt::Source => "Select source flask:",
            Prompt::Destination => "Select destination flask:",
        }
    }

    fn row(&self) -> u16 {
        match self {
            Prompt::Source => 2,
            Prompt::Destination => 3,
        }
    }

    fn column(&self) -> u16 {
        self.label().len() as u16 + 1
    }

    fn accepts(&self, flasks: &Flasks, index: usize) -> Option<bool> {
        let flask = flasks.get(index)?;
        Some(match self {
            Prompt::Source => can_pour_from(flask),
            Prompt::Destination => can_pour_into(flask),
        })
    }

    fn rejection(&self) -> &'static str {
        match self {
            Prompt::Source => "Cannot pour from that flask. Try again.",
            Prompt::Destination => "Cannot pour into that flask. Try again.",
        }
    }
}

fn move_rejection(error: &TransferError) -> &'static str {
    match error {
        TransferError::Illegal(MoveError::SameFlask) => {
            "Cannot pour into the same flask. Try again."
        }
        TransferError::Illegal(MoveError::SourceInvalid { .. }) => Prompt::Source.rejection(),
        TransferError::Illegal(MoveError::DestinationInvalid { .. }) => {
            Prompt::Destination.rejection()
        }
        TransferError::Illegal(MoveError::NoSuchFlask { .. }) | TransferError::Container(_) => {
            "Invalid input, please try again!"
        }
    }
}

/// Background colors per chemical, handed out in order of first appearance.
#[derive(Debug)]
struct Palette {
    colors: HashMap<Chemical, Color>,
}

impl Palette {
    fn for_flasks(flasks: &Flasks) -> Self {
        let colors = flasks
            .iter()
            .flat_map(|flask| flask.elements())
            .unique()
            .zip(CHEMICAL_COLORS.iter().cycle())
            .map(|(chemical, color)| (chemical.clone(), *color))
            .collect();
        Self { colors }
    }

    fn color(&self, chemical: &Chemical) -> Color {
        self.colors.get(chemical).copied().unwrap_or(Color::Grey)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Solved,
    Quit,
}

struct Terminal<W: Write, I: Iterator<Item = std::io::Result<String>>> {
    out: W,
    input: I,
    palette: Palette,
}

impl<W: Write, I: Iterator<Item = std::io::Result<String>>> Terminal<W, I> {
    fn new(out: W, input: I, palette: Palette) -> Self {
        Self {
            out,
            input,
            palette,
        }
    }

    fn start(&mut self) -> anyhow::Result<()> {
        execute!(
            self.out,
            Clear(ClearType::All),
            MoveTo(0, TITLE_ROW),
            Print("Magical Flask Game")
        )?;
        for prompt in [Prompt::Source, Prompt::Destination] {
            queue!(self.out, MoveTo(0, prompt.row()), Print(prompt.label()))?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn message(&mut self, text: &str) -> anyhow::Result<()> {
        execute!(
            self.out,
            MoveTo(0, MESSAGE_ROW),
            Clear(ClearType::UntilNewLine),
            Print(text)
        )?;
        Ok(())
    }

    fn clear_answers(&mut self) -> anyhow::Result<()> {
        for prompt in [Prompt::Source, Prompt::Destination] {
            queue!(
                self.out,
                MoveTo(prompt.column(), prompt.row()),
                Clear(ClearType::UntilNewLine)
            )?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn board_height(flasks: &Flasks) -> u16 {
        let capacity = flasks.iter().map(|f| f.capacity()).max().unwrap_or(0);
        let bands = (flasks.len() + FLASKS_PER_BAND - 1) / FLASKS_PER_BAND;
        (bands * (capacity + 3)) as u16
    }

    fn footer(&mut self, flasks: &Flasks, text: &str) -> anyhow::Result<()> {
        let row = BOARD_ROW + Self::board_height(flasks);
        execute!(self.out, MoveTo(0, row), Print(text), Print("\n"))?;
        Ok(())
    }

    /// Draws every flask, four to a band, with the flask numbers underneath. The source
    /// and destination of `last_move` are highlighted.
    fn render(&mut self, flasks: &Flasks, last_move: Option<(usize, usize)>) -> anyhow::Result<()> {
        let capacity = flasks.iter().map(|f| f.capacity()).max().unwrap_or(0);
        let mut row = BOARD_ROW;
        for (band, chunk) in flasks.iter().chunks(FLASKS_PER_BAND).into_iter().enumerate() {
            let chunk = chunk.collect::<Vec<_>>();
            for level in 0..=capacity {
                queue!(self.out, MoveTo(0, row), Clear(ClearType::UntilNewLine))?;
                for flask in chunk.iter().copied() {
                    let sealed = is_sealed(flask);
                    if level == capacity || (level == 0 && sealed) {
                        queue!(self.out, Print(" +--+ "))?;
                        continue;
                    }
                    let slot = capacity - 1 - level;
                    match flask.elements().get(slot) {
                        Some(chemical) => queue!(
                            self.out,
                            Print(" |"),
                            SetBackgroundColor(self.palette.color(chemical)),
                            Print(format!("{:<2.2}", chemical.code())),
                            ResetColor,
                            Print("| ")
                        )?,
                        None if slot < flask.capacity() => queue!(self.out, Print(" |  | "))?,
                        None => queue!(self.out, Print("      "))?,
                    }
                }
                row += 1;
            }
            queue!(self.out, MoveTo(0, row), Clear(ClearType::UntilNewLine))?;
            for offset in 0..chunk.len() {
                let number = band * FLASKS_PER_BAND + offset + 1;
                let color = match last_move {
                    Some((source, _)) if source == number => Some(Color::Red),
                    Some((_, dest)) if dest == number => Some(Color::Green),
                    _ => None,
                };
                queue!(self.out, Print("  "))?;
                if let Some(color) = color {
                    queue!(self.out, SetForegroundColor(color))?;
                }
                queue!(self.out, Print(format!("{:<4}", number)), ResetColor)?;
            }
            row += 2;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Keeps asking until the player names a usable flask or exits. Running out of input
    /// counts as exiting.
    fn ask(&mut self, prompt: Prompt, flasks: &Flasks) -> anyhow::Result<Selection> {
        loop {
            execute!(
                self.out,
                MoveTo(prompt.column(), prompt.row()),
                Clear(ClearType::UntilNewLine)
            )?;
            let line = match self.input.next() {
                Some(line) => line?,
                None => return Ok(Selection::Exit),
            };
            self.message("")?;
            match line.parse::<Selection>() {
                Ok(Selection::Exit) => return Ok(Selection::Exit),
                Ok(Selection::Flask(index)) => match prompt.accepts(flasks, index) {
                    Some(true) => return Ok(Selection::Flask(index)),
                    Some(false) => self.message(prompt.rejection())?,
                    None => self.message("Invalid input, please try again!")?,
                },
                Err(e) => {
                    log::debug!("{}", e);
                    self.message("Invalid input, please try again!")?;
                }
            }
        }
    }

    fn play(&mut self, flasks: &mut Flasks) -> anyhow::Result<Outcome> {
        self.start()?;
        let mut last_move = None;
        let outcome = loop {
            self.render(flasks, last_move)?;
            if flasks.is_solved() {
                break Outcome::Solved;
            }
            let source = match self.ask(Prompt::Source, flasks)? {
                Selection::Flask(index) => index,
                Selection::Exit => break Outcome::Quit,
            };
            let dest = match self.ask(Prompt::Destination, flasks)? {
                Selection::Flask(index) => index,
                Selection::Exit => break Outcome::Quit,
            };
            match flasks.transfer(source, dest) {
                Ok(_) => last_move = Some((source, dest)),
                Err(e) if e.is_recoverable() => {
                    log::debug!("rejected move {} -> {}: {}", source, dest, e);
                    self.message(move_rejection(&e))?;
                    last_move = None;
                }
                Err(e) => return Err(e).context("flask contents are inconsistent"),
            }
            self.clear_answers()?;
        };
        match outcome {
            Outcome::Solved => self.footer(flasks, "You Win!")?,
            Outcome::Quit => self.footer(flasks, "Play again next time!")?,
        }
        Ok(outcome)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if args.capacity == 0 {
        anyhow::bail!("flask capacity must be at least 1");
    }
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::builder()
        .format_module_path(false)
        .format_timestamp_millis()
        .filter_level(log_level)
        .init();

    let setup = Setup::read(&args.data_file)
        .with_context(|| format!("loading {}", args.data_file.display()))?;
    log::debug!(
        "{} flasks, {} chemicals, {} script lines",
        setup.flask_count,
        setup.chemical_count,
        setup.script.len()
    );
    let mut flasks = setup
        .build(args.capacity)
        .with_context(|| format!("setting up {}", args.data_file.display()))?;

    ctrlc::set_handler(|| {
        let mut stdout = std::io::stdout();
        let _ = execute!(stdout, ResetColor, Show, Print("\n"));
        std::process::exit(130);
    })?;

    let stdout_r = std::io::stdout();
    let stdout = stdout_r.lock();
    let input = std::io::stdin().lock().lines();
    let palette = Palette::for_flasks(&flasks);
    let outcome = Terminal::new(stdout, input, palette).play(&mut flasks)?;
    log::info!("session ended: {:?}", outcome);
    Ok(())
}
