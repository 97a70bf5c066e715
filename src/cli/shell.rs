use std::{
    borrow::Cow,
    io::{self, BufRead},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::io as cli_io;

/// Set to any value to read commands from stdin without prompts or colour.
pub const SCRIPT_ENV: &str = "SNAPBOOKS_CLI_SCRIPT";

/// What the reader produced for one turn of the loop.
enum Input {
    Line(String),
    Skip,
    Done,
}

pub fn run_cli() -> Result<(), CliError> {
    let mode = match std::env::var_os(SCRIPT_ENV) {
        Some(_) => CliMode::Script,
        None => CliMode::Interactive,
    };
    let mut context = ShellContext::new(mode)?;

    if mode == CliMode::Script {
        let mut lines = io::stdin().lock().lines();
        return drive(&mut context, |_| match lines.next() {
            Some(line) => Ok(Input::Line(line?)),
            None => Ok(Input::Done),
        });
    }

    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(context.command_names())));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
    cli_io::print_info("SnapBooks shell. Type `help` to list commands.");

    drive(&mut context, |context| match editor.readline(&context.prompt()) {
        Ok(line) => {
            let line = line.trim().to_string();
            if !line.is_empty() {
                editor.add_history_entry(line.as_str()).ok();
            }
            Ok(Input::Line(line))
        }
        Err(ReadlineError::Interrupted) if context.confirm_exit()? => Ok(Input::Done),
        Err(ReadlineError::Interrupted) => Ok(Input::Skip),
        Err(ReadlineError::Eof) => {
            cli_io::print_info("Exiting shell.");
            Ok(Input::Done)
        }
        Err(err) => Err(err.into()),
    })
}

/// Feeds lines from `read` to the dispatcher until input ends or a command exits.
fn drive<F>(context: &mut ShellContext, mut read: F) -> Result<(), CliError>
where
    F: FnMut(&mut ShellContext) -> Result<Input, CliError>,
{
    while context.running {
        let line = match read(context)? {
            Input::Line(line) => line,
            Input::Skip => continue,
            Input::Done => break,
        };
        match handle_line(context, &line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err),
        }
    }
    Ok(())
}

/// Tokenises and dispatches one input line. Blank lines and `#` comments are skipped.
pub(crate) fn handle_line(
    context: &mut ShellContext,
    line: &str,
) -> Result<LoopControl, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(LoopControl::Continue);
    }

    let tokens = match shell_words::split(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            cli_io::print_warning(format!("could not read `{line}`: {err}"));
            return Ok(LoopControl::Continue);
        }
    };
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };

    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    context.last_command = Some(line.to_string());

    let control = context.dispatch(&raw.to_lowercase(), raw, &args)?;
    if control == LoopControl::Exit {
        context.running = false;
    }
    Ok(control)
}

/// Tab and `?` completion for the command word.
struct CommandHelper {
    commands: Vec<&'static str>,
}

impl CommandHelper {
    fn new(mut commands: Vec<&'static str>) -> Self {
        commands.sort_unstable();
        commands.dedup();
        Self { commands }
    }

    fn candidates(&self, word: &str) -> Vec<Pair> {
        let word = word.to_ascii_lowercase();
        self.commands
            .iter()
            .filter(|name| name.starts_with(&word))
            .map(|name| Pair {
                display: name.to_string(),
                replacement: name.to_string(),
            })
            .collect()
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let before = &line[..pos];
        let word = before.trim_start();
        if word.contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        Ok((before.len() - word.len(), self.candidates(word)))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for CommandHelper {
    fn validate(&self, _ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_fields_stay_whole() {
        let tokens = shell_words::split("session add client=\"Ana Maria\" notes='two kids'")
            .expect("balanced quotes");
        assert_eq!(
            tokens,
            vec!["session", "add", "client=Ana Maria", "notes=two kids"]
        );
    }

    #[test]
    fn completion_matches_command_prefixes() {
        let helper = CommandHelper::new(vec!["session", "salary", "print", "session"]);
        let names: Vec<String> = helper
            .candidates("S")
            .into_iter()
            .map(|pair| pair.replacement)
            .collect();
        assert_eq!(names, vec!["salary", "session"]);
        assert!(helper.candidates("x").is_empty());
    }
}
