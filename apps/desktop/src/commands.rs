//! Console commands typed by the user and their mapping onto the controller.

use std::str::FromStr;

use client_core::{AppHandle, ControllerError, Settings};
use shared::{
    domain::{NotificationId, Region, Severity},
    protocol::RequestName,
};

#[derive(Debug, Clone, PartialEq)]
pub enum UiCommand {
    Tab(String),
    Game {
        name: RequestName,
        path_suffix: Option<String>,
    },
    Notify {
        severity: Severity,
        region: Region,
        message: String,
    },
    Dismiss {
        region: Region,
        id: NotificationId,
    },
    AutoClose(bool),
    NotifTimer(u64),
    Doc,
    Console,
    Help,
    Quit,
}

pub const USAGE: &str = "\
commands:
  tab <GAME|SETTINGS|HELP|DOC>
  start | state | rule <suffix> | over
  notify <info|success|warning|error> <region> <message>
  dismiss <region> <id>
  autoclose <true|false> | timer <ms>
  doc | console | help | quit";

impl FromStr for UiCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words
            .next()
            .ok_or_else(|| "empty command".to_string())?
            .to_ascii_lowercase();
        let rest: Vec<&str> = words.collect();

        let command = match verb.as_str() {
            "tab" => UiCommand::Tab(single(&rest, "tab <name>")?.to_string()),
            "start" => game(RequestName::Start, None),
            "state" => game(RequestName::GameState, None),
            "over" => game(RequestName::Over, None),
            "rule" => game(
                RequestName::ApplyRule,
                Some(single(&rest, "rule <suffix>")?.to_string()),
            ),
            "notify" => {
                if rest.len() < 3 {
                    return Err("usage: notify <severity> <region> <message>".into());
                }
                UiCommand::Notify {
                    severity: rest[0].parse().map_err(|err| format!("{err}"))?,
                    region: Region::new(rest[1]),
                    message: rest[2..].join(" "),
                }
            }
            "dismiss" => {
                let &[region, id] = rest.as_slice() else {
                    return Err("usage: dismiss <region> <id>".into());
                };
                let id = id
                    .trim_start_matches('#')
                    .parse::<u64>()
                    .map_err(|_| format!("invalid notification id '{id}'"))?;
                UiCommand::Dismiss {
                    region: Region::new(region),
                    id: NotificationId(id),
                }
            }
            "autoclose" => UiCommand::AutoClose(
                single(&rest, "autoclose <true|false>")?
                    .parse()
                    .map_err(|_| "autoclose expects true or false".to_string())?,
            ),
            "timer" => UiCommand::NotifTimer(
                single(&rest, "timer <ms>")?
                    .parse()
                    .map_err(|_| "timer expects milliseconds".to_string())?,
            ),
            "doc" => UiCommand::Doc,
            "console" => UiCommand::Console,
            "help" | "?" => UiCommand::Help,
            "quit" | "exit" => UiCommand::Quit,
            other => return Err(format!("unknown command '{other}'")),
        };
        Ok(command)
    }
}

fn game(name: RequestName, path_suffix: Option<String>) -> UiCommand {
    UiCommand::Game { name, path_suffix }
}

fn single<'a>(rest: &[&'a str], usage: &str) -> Result<&'a str, String> {
    match rest {
        [value] => Ok(*value),
        _ => Err(format!("usage: {usage}")),
    }
}

/// Forward a command to the controller. `settings` is the console's copy of
/// the preferences, edited locally and pushed as a whole.
pub fn dispatch_ui_command(
    handle: &AppHandle,
    command: UiCommand,
    settings: &mut Settings,
) -> Result<(), ControllerError> {
    match command {
        UiCommand::Tab(name) => handle.request_tab(name),
        UiCommand::Game { name, path_suffix } => handle.request_game(name, path_suffix),
        UiCommand::Notify {
            severity,
            region,
            message,
        } => handle.notify(region, message, severity),
        UiCommand::Dismiss { region, id } => handle.dismiss_notification(region, id),
        UiCommand::AutoClose(enabled) => {
            settings.auto_close_notif = enabled;
            handle.apply_settings(settings.clone())
        }
        UiCommand::NotifTimer(ms) => {
            settings.notif_timer_ms = ms;
            handle.apply_settings(settings.clone())
        }
        UiCommand::Doc => handle.display_doc(),
        UiCommand::Console => handle.toggle_console(),
        UiCommand::Help => {
            println!("{USAGE}");
            Ok(())
        }
        UiCommand::Quit => handle.shutdown(),
    }
}
