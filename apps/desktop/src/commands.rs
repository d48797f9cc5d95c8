//! Console command grammar.

use std::num::NonZeroU32;

use anyhow::{anyhow, bail, Context, Result};
use client_core::FilterPatch;
use shared::domain::{FreelancerId, RecordField};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Username,
    PhoneNumber,
    Email,
}

impl FilterField {
    fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "username" | "user" | "name" => Some(FilterField::Username),
            "phone" | "phonenumber" | "phone_number" => Some(FilterField::PhoneNumber),
            "email" | "mail" => Some(FilterField::Email),
            _ => None,
        }
    }

    pub fn patch(self, value: String) -> FilterPatch {
        match self {
            FilterField::Username => FilterPatch::username(value),
            FilterField::PhoneNumber => FilterPatch::phone_number(value),
            FilterField::Email => FilterPatch::email(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Refresh,
    Filter { field: FilterField, value: String },
    PageSize(NonZeroU32),
    Next,
    Prev,
    Add,
    Edit(FreelancerId),
    Set { field: RecordField, value: String },
    Save,
    Cancel,
    Delete(FreelancerId),
    Confirm,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  list | refresh                     show the current page / fetch it again
  filter <username|phone|email> [v]  set a filter (no value clears it)
  page-size <n>                      records per page
  next | prev                        move between pages
  add                                open the add user form
  edit <id>                          edit a user on the current page
  set <field> <value>                change a field of the open form
  save                               submit the open form
  cancel                             close the open form or confirmation
  delete <id>                        ask to delete a user
  confirm                            confirm the pending delete
  help | quit";

/// Parses one console line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "list" | "ls" => Command::List,
        "refresh" => Command::Refresh,
        "filter" => {
            let (name, value) = split_arg(rest);
            let field = FilterField::parse(name)
                .ok_or_else(|| anyhow!("unknown filter '{name}'; use username, phone or email"))?;
            Command::Filter {
                field,
                value: value.to_string(),
            }
        }
        "page-size" | "pagesize" => {
            let size = rest
                .parse::<NonZeroU32>()
                .with_context(|| format!("page size must be a positive integer, got '{rest}'"))?;
            Command::PageSize(size)
        }
        "next" => Command::Next,
        "prev" | "previous" => Command::Prev,
        "add" | "new" => Command::Add,
        "edit" => Command::Edit(parse_id(rest)?),
        "set" => {
            let (name, value) = split_arg(rest);
            let field = RecordField::parse(name).ok_or_else(|| anyhow!("unknown field '{name}'"))?;
            Command::Set {
                field,
                value: value.to_string(),
            }
        }
        "save" | "submit" => Command::Save,
        "cancel" | "close" => Command::Cancel,
        "delete" | "rm" => Command::Delete(parse_id(rest)?),
        "confirm" | "yes" => Command::Confirm,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => bail!("unknown command '{other}'; type 'help'"),
    };

    Ok(Some(command))
}

fn split_arg(rest: &str) -> (&str, &str) {
    match rest.split_once(char::is_whitespace) {
        Some((name, value)) => (name, value.trim()),
        None => (rest, ""),
    }
}

fn parse_id(raw: &str) -> Result<FreelancerId> {
    if raw.is_empty() {
        bail!("missing user id");
    }
    let id = raw
        .parse::<i64>()
        .with_context(|| format!("'{raw}' is not a user id"))?;
    Ok(FreelancerId(id))
}
