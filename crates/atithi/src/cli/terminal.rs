//! Line-oriented terminal front end for the profile screen.

use std::fmt::Write as _;
use std::io::{BufRead, Write};

use crate::error::Result;
use crate::profile::{FieldGroup, FieldId, FieldTable};
use crate::screen::{LeaveOutcome, ProfileScreen, Prompt, Prompter, Resolution, SaveOutcome};
use crate::storage::KeyValueStore;

const SHELL_HELP: &str = "\
Commands:
  show            show the profile
  open <field>    start editing a field
  type <text>     replace the text being edited
  commit          keep the edited text
  cancel          drop the edited text
  save            save the profile
  back            leave (asks about unsaved changes)
  help            show this help";

/// Render the field table grouped by section.
#[must_use]
pub fn render_profile(table: &FieldTable, placeholder: &str) -> String {
    let mut out = String::new();
    for (index, group) in FieldGroup::ALL.into_iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{}", group.title());
        for field in table.group(group) {
            let value = field.display_value(placeholder).replace('\n', "\n    ");
            let _ = writeln!(out, "  {:<20} {value}", field.label);
        }
    }
    out
}

/// A terminal: line input plus text output.
#[derive(Debug)]
pub struct Terminal<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    /// Wrap an input and an output stream.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consume the terminal, returning its output.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Print one line.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    /// Read one line without its terminator; `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

impl<R: BufRead, W: Write> Prompter for Terminal<R, W> {
    /// Choices are numbered from 1. End of input or an unreadable answer
    /// picks the first choice, which never writes or discards anything; a
    /// prompt without choices resolves to [`Resolution::KeepEditing`].
    fn choose(&mut self, prompt: &Prompt) -> Resolution {
        let _ = writeln!(self.output, "{}: {}", prompt.title, prompt.message);
        for (index, choice) in prompt.choices.iter().enumerate() {
            let _ = writeln!(self.output, "  {}) {}", index + 1, choice.label);
        }
        let _ = write!(self.output, "> ");
        let _ = self.output.flush();

        let fallback = prompt
            .choices
            .first()
            .map_or(Resolution::KeepEditing, |choice| choice.resolution);
        match self.read_line() {
            Ok(Some(answer)) => answer
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| prompt.choices.get(i))
                .map_or(fallback, |choice| choice.resolution),
            _ => fallback,
        }
    }
}

/// Run the interactive shell until the user leaves or input ends.
///
/// # Errors
///
/// Returns an error if the terminal cannot be read or written. Save
/// failures are reported to the user and the shell keeps running.
pub fn run_shell<S, R, W>(
    screen: &mut ProfileScreen<S>,
    terminal: &mut Terminal<R, W>,
    placeholder: &str,
) -> Result<()>
where
    S: KeyValueStore,
    R: BufRead,
    W: Write,
{
    terminal.say(&render_profile(screen.table(), placeholder))?;
    terminal.say("Type 'help' for commands.")?;

    while let Some(line) = terminal.read_line()? {
        let (command, rest) = line
            .trim_start()
            .split_once(' ')
            .unwrap_or((line.trim(), ""));

        match command {
            "" => {}
            "help" => terminal.say(SHELL_HELP)?,
            "show" => terminal.say(&render_profile(screen.table(), placeholder))?,
            "open" => match rest.trim().parse::<FieldId>() {
                Ok(field) => {
                    let session = screen.open_editor(field);
                    match session {
                        Ok(session) => {
                            let current = field.def();
                            let text = format!(
                                "Editing {} [{}], current value: {:?}",
                                current.label,
                                current.input_kind,
                                session.buffer()
                            );
                            terminal.say(&text)?;
                            let hint = screen.table().get(field).prompt_placeholder();
                            terminal.say(&hint)?;
                        }
                        Err(err) => terminal.say(&format!("Error: {err}"))?,
                    }
                }
                Err(err) => terminal.say(&format!("Error: {err}"))?,
            },
            "type" => {
                if let Err(err) = screen.stage(rest.replace("\\n", "\n")) {
                    terminal.say(&format!("Error: {err}"))?;
                }
            }
            "commit" => match screen.commit_edit() {
                Ok(true) => terminal.say("Updated.")?,
                Ok(false) => terminal.say("No change.")?,
                Err(err) => terminal.say(&format!("Error: {err}"))?,
            },
            "cancel" => {
                if screen.cancel_edit() {
                    terminal.say("Edit cancelled.")?;
                }
            }
            "save" => match screen.request_save(terminal) {
                Ok(SaveOutcome::Saved) => {
                    terminal.say("Profile Saved: Your profile information has been updated.")?;
                }
                Ok(SaveOutcome::Blocked(_)) => terminal.say("Not saved.")?,
                Ok(SaveOutcome::AlreadySaving) => terminal.say("A save is already running.")?,
                Err(err) => terminal.say(&format!("Error: {err}"))?,
            },
            "back" | "quit" | "exit" => match screen.request_leave(terminal) {
                Ok(LeaveOutcome::Stay) => {}
                Ok(_) => return Ok(()),
                Err(err) => terminal.say(&format!("Error: {err}"))?,
            },
            other => terminal.say(&format!("Unknown command '{other}'. Type 'help'."))?,
        }
    }

    if screen.is_dirty() {
        terminal.say("Input ended; unsaved changes were not saved.")?;
    }
    Ok(())
}
