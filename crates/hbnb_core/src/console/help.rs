//! Built-in help text.

use super::command::Verb;

const INDEX_HEADER: &str = "Documented commands (type help <topic>):";

/// Usage text for one verb.
pub fn usage(verb: Verb) -> &'static str {
    match verb {
        Verb::Create => "Creates a new instance of a class, saves it and prints its id.\n\
                         Usage: create <class name>",
        Verb::Show => "Prints the string representation of an instance.\n\
                       Usage: show <class name> <id>\n       <class name>.show(<id>)",
        Verb::Destroy => "Deletes an instance and saves the change.\n\
                          Usage: destroy <class name> <id>\n       <class name>.destroy(<id>)",
        Verb::All => "Prints the string representation of every instance, \
                      optionally of one class.\n\
                      Usage: all [<class name>]\n       <class name>.all()",
        Verb::Update => "Sets an attribute of an instance and saves the change.\n\
                         Usage: update <class name> <id> <attribute name> \
                         \"<attribute value>\"\n       \
                         <class name>.update(<id>, <attribute name>, <attribute value>)\n       \
                         <class name>.update(<id>, <dictionary>)",
        Verb::Count => "Prints the number of instances of a class.\n\
                        Usage: count <class name>\n       <class name>.count()",
        Verb::Help => "Lists available commands, or prints the usage of one.\n\
                       Usage: help [<command>]",
        Verb::Quit => "Exits this application.\nUsage: quit",
        Verb::EndOfInput => "Exits this application.\nUsage: EOF",
    }
}

/// Lists every documented command.
pub fn index() -> String {
    let names: Vec<&str> = Verb::ALL.iter().map(|verb| verb.keyword()).collect();
    format!(
        "\n{INDEX_HEADER}\n{}\n{}\n",
        "=".repeat(INDEX_HEADER.len()),
        names.join("  ")
    )
}

/// Resolves a help topic to its text.
///
/// Returns `None` when the topic names no command.
pub fn lookup(topic: &str) -> Option<&'static str> {
    Verb::from_keyword(topic).map(usage)
}
