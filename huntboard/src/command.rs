use crate::errors::HostError;

pub(crate) const HELP: &str = "\
commands:
  item <id>          select an item
  view <id>          select a view of the selected item
  sub <id>           select a sub-view of the selected view
  back               leave the deepest level
  list               return to the list
  wait <ms>          advance the clock
  width <px>         resize the viewport
  left <pct>         resize the list pane
  right <pct>        resize the view pane
  jobs <search-id>   browse a job search
  threads            browse conversations
  external <id|->    parent selects an id (- clears)
  create <title>     add an item to the collection
  delete <id>        remove an item
  say <text>         send a chat message in the open thread
  refresh            reload the collection
  show               print the panes
  quit               exit";

/// One line of host input.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    Item(String),
    View(String),
    SubView(String),
    Back,
    List,
    Wait(u64),
    Width(f32),
    Left(f32),
    Right(f32),
    Jobs(String),
    Threads,
    External(Option<String>),
    Create(String),
    Delete(String),
    Say(String),
    Refresh,
    Show,
    Help,
    Quit,
}

impl Command {
    /// Parse a line. Blank lines and `#` comments yield `None`.
    pub(crate) fn parse(line: &str) -> Result<Option<Self>, HostError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let command = match name {
            "item" => Command::Item(word(rest, "item", "an item id")?),
            "view" => Command::View(word(rest, "view", "a view id")?),
            "sub" => Command::SubView(word(rest, "sub", "a sub-view id")?),
            "back" => Command::Back,
            "list" => Command::List,
            "wait" => Command::Wait(number(rest, "wait", "milliseconds")?),
            "width" => Command::Width(number(rest, "width", "pixels")?),
            "left" => Command::Left(number(rest, "left", "a percentage")?),
            "right" => Command::Right(number(rest, "right", "a percentage")?),
            "jobs" => Command::Jobs(word(rest, "jobs", "a job search id")?),
            "threads" => Command::Threads,
            "external" => {
                let id = word(rest, "external", "an id or -")?;
                Command::External((id != "-").then_some(id))
            },
            "create" => Command::Create(word(rest, "create", "a title")?),
            "delete" => Command::Delete(word(rest, "delete", "an item id")?),
            "say" => Command::Say(word(rest, "say", "a message")?),
            "refresh" => Command::Refresh,
            "show" => Command::Show,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(HostError::UnknownCommand(other.to_string())),
        };

        Ok(Some(command))
    }
}

fn word(
    rest: &str,
    command: &'static str,
    argument: &'static str,
) -> Result<String, HostError> {
    if rest.is_empty() {
        return Err(HostError::MissingArgument { command, argument });
    }

    Ok(rest.to_string())
}

fn number<T: std::str::FromStr>(
    rest: &str,
    command: &'static str,
    what: &'static str,
) -> Result<T, HostError> {
    let raw = word(rest, command, what)?;
    raw.parse()
        .map_err(|_| HostError::InvalidNumber { value: raw, what })
}
