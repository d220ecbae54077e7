/// One line typed at the interactive prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    List,
    Filter(Option<String>),
    New,
    Edit(i64),
    Delete(i64),
    Stats,
    Help,
    Quit,
}

impl ShellCommand {
    pub const HELP: &'static str = "\
Commands:
  list               refresh and show pets
  filter [species]   filter by species (no argument clears)
  new                register a pet
  edit <id>          edit a pet
  delete <id>        delete a pet (asks for confirmation)
  stats              show the average age
  quit               leave";

    /// Parse a prompt line. Blank lines give `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let arg = words.next();

        let command = match verb.to_ascii_lowercase().as_str() {
            "list" | "ls" => ShellCommand::List,
            "filter" => ShellCommand::Filter(arg.map(str::to_string)),
            "new" | "add" => ShellCommand::New,
            "edit" => ShellCommand::Edit(parse_id(arg)?),
            "delete" | "rm" => ShellCommand::Delete(parse_id(arg)?),
            "stats" => ShellCommand::Stats,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" | "q" => ShellCommand::Quit,
            other => return Err(format!("Unknown command '{}'. Type 'help'.", other)),
        };
        Ok(Some(command))
    }
}

fn parse_id(arg: Option<&str>) -> Result<i64, String> {
    let arg = arg.ok_or_else(|| "Missing pet id".to_string())?;
    arg.trim_start_matches('#')
        .parse()
        .map_err(|_| format!("'{}' is not a pet id", arg))
}
