use std::{
    fmt,
    io::{self, BufRead},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;
use tracing::{debug, warn};

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::output::{info as output_info, section as output_section};
use crate::domain::Session;
use crate::utils::build_info;

/// When set, commands are read line by line from stdin without prompting.
pub const SCRIPT_ENV_VAR: &str = "DAIRY_CORE_CLI_SCRIPT";

const HISTORY_FILE: &str = "history.txt";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV_VAR).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    print_banner(context);
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(context.command_names())));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    let history = context.config_manager.base_dir().join(HISTORY_FILE);
    if editor.load_history(&history).is_err() {
        debug!(path = %history.display(), "no shell history yet");
    }

    while context.running {
        match editor.readline(&context.prompt()) {
            Ok(line) if line.trim().is_empty() => {}
            Ok(line) => {
                let line = line.trim();
                editor.add_history_entry(line).ok();
                match handle_line(context, line) {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Exit) => break,
                    Err(err) => context.report_error(err)?,
                }
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                output_info("Goodbye.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    if let Err(err) = editor.save_history(&history) {
        warn!(error = %err, "could not save shell history");
    }
    Ok(())
}

fn print_banner(context: &ShellContext) {
    output_section(format!(
        "{} · dairy_core {}",
        context.config.center_label,
        build_info::current().short()
    ));
    match &context.user {
        Some(user) => output_info(format!("Signed in as {}.", user.email)),
        None => output_info("Use `login <email>` to start, `help` for commands."),
    }
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        if !context.running {
            break;
        }
        let line = line?;
        match handle_line(context, &line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(())
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let tokens = match parse_command_line(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            crate::cli::io::print_warning(&err.message);
            return Ok(LoopControl::Continue);
        }
    };

    if tokens.is_empty() || tokens[0].starts_with('#') {
        return Ok(LoopControl::Continue);
    }

    let raw = &tokens[0];
    let command = raw.to_lowercase();
    let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();

    context.last_command = Some(line.trim().to_string());

    match context.dispatch(&command, raw, &args) {
        Ok(LoopControl::Exit) => {
            context.running = false;
            Ok(LoopControl::Exit)
        }
        other => other,
    }
}

/// Second-word completions for commands that take an action.
const ACTIONS: &[(&str, &[&str])] = &[
    ("backup", &["create", "list", "restore"]),
    ("center", &["show", "list", "add", "edit", "remove"]),
    ("config", &["show", "set", "backup", "backups", "restore"]),
    ("entries", &["today", "yesterday"]),
    ("farmer", &["list", "show", "add", "edit", "remove"]),
    ("message", &["receipt", "statement"]),
    ("statement", &["all"]),
    ("user", &["list", "role", "assign"]),
];

/// Tab completion for command names, their actions and collection sessions.
struct CommandHelper {
    commands: Vec<String>,
}

impl CommandHelper {
    fn new(names: Vec<&'static str>) -> Self {
        let mut commands: Vec<String> = names.into_iter().map(str::to_ascii_lowercase).collect();
        commands.sort();
        commands.dedup();
        Self { commands }
    }

    /// Words that may follow `previous` at the cursor.
    fn vocabulary(&self, previous: &[&str]) -> Vec<String> {
        match previous {
            [] => self.commands.clone(),
            [command] => ACTIONS
                .iter()
                .find(|(name, _)| command.eq_ignore_ascii_case(name))
                .map(|(_, actions)| actions.iter().map(|a| a.to_string()).collect())
                .unwrap_or_default(),
            [command, _farmer] if command.eq_ignore_ascii_case("collect") => Session::ALL
                .iter()
                .map(|session| session.as_str().to_string())
                .collect(),
            _ => Vec::new(),
        }
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
        let start = before
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let previous: Vec<&str> = before[..start].split_whitespace().collect();
        let needle = before[start..].to_ascii_lowercase();
        let candidates = self
            .vocabulary(&previous)
            .into_iter()
            .filter(|word| word.starts_with(&needle))
            .map(|word| Pair {
                display: word.clone(),
                replacement: word,
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {}

impl Validator for CommandHelper {}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_arguments_stay_together() {
        let tokens = parse_command_line(r#"farmer add "Ram Prasad" 9876543210"#).unwrap();
        assert_eq!(tokens, vec!["farmer", "add", "Ram Prasad", "9876543210"]);
    }

    #[test]
    fn unbalanced_quotes_are_reported() {
        assert!(parse_command_line(r#"farmer add "Ram"#).is_err());
    }

    #[test]
    fn completion_follows_the_command_word() {
        let helper = CommandHelper::new(vec!["today", "collect", "farmer", "collect"]);
        assert_eq!(helper.vocabulary(&[]), vec!["collect", "farmer", "today"]);
        assert!(helper.vocabulary(&["FARMER"]).contains(&"remove".to_string()));
        assert_eq!(
            helper.vocabulary(&["collect", "Ravi"]),
            vec!["morning", "evening"]
        );
        assert!(helper.vocabulary(&["today"]).is_empty());
    }
}
