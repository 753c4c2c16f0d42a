mod command;
mod dataset;
mod errors;
mod host;
mod render;
mod settings;

use std::cell::RefCell;
use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use env_logger::Env;
use huntboard_nav::{JsonLayoutStore, LayoutStore};

use crate::command::{Command, HELP};
use crate::dataset::Dataset;
use crate::errors::HostError;
use crate::host::Host;
use crate::settings::{HostSettings, SettingsLoadStatus, load_settings};

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        },
    }
}

fn run() -> Result<(), HostError> {
    let mut settings = initial_settings();
    let dataset_path = parse_args(env::args().skip(1), &mut settings)?;
    let dataset = Dataset::load(&dataset_path)?;

    let store: Rc<RefCell<dyn LayoutStore>> = match &settings.layouts_path {
        Some(path) => Rc::new(RefCell::new(JsonLayoutStore::new(path))),
        None => Rc::new(RefCell::new(JsonLayoutStore::at_default_path())),
    };
    let mut host = Host::new(dataset, &settings, store);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    print_state(&mut out, &mut host)?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                writeln!(out, "error: {err}")?;
                continue;
            },
        };

        match command {
            Command::Quit => break,
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Show => print_state(&mut out, &mut host)?,
            command => {
                host.run(command);
                print_state(&mut out, &mut host)?;
            },
        }
    }

    Ok(())
}

fn initial_settings() -> HostSettings {
    let load = match load_settings() {
        Ok(load) => load,
        Err(err) => {
            log::warn!("failed to read settings: {err}");
            return HostSettings::default();
        },
    };

    let (settings, status) = load.into_parts();
    match status {
        SettingsLoadStatus::Loaded => log::info!("settings loaded"),
        SettingsLoadStatus::Missing => log::debug!("no settings file"),
        SettingsLoadStatus::Invalid(reason) => {
            log::warn!("settings file invalid, using defaults: {reason}");
        },
    }
    settings
}

/// `<dataset.json> [--width px] [--standalone]`, flags override settings.
fn parse_args(
    args: impl IntoIterator<Item = String>,
    settings: &mut HostSettings,
) -> Result<PathBuf, HostError> {
    let mut args = args.into_iter();
    let mut dataset = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--width" => {
                let raw = args.next().ok_or(HostError::Usage)?;
                settings.viewport_width =
                    raw.parse().map_err(|_| HostError::InvalidNumber {
                        value: raw,
                        what: "viewport width",
                    })?;
            },
            "--standalone" => settings.standalone = true,
            _ if dataset.is_none() && !arg.starts_with("--") => {
                dataset = Some(PathBuf::from(arg));
            },
            _ => return Err(HostError::Usage),
        }
    }

    dataset.ok_or(HostError::Usage)
}

fn print_state(out: &mut impl Write, host: &mut Host) -> Result<(), HostError> {
    for note in host.take_notes() {
        writeln!(out, "   * {note}")?;
    }
    writeln!(out, "t+{}ms", host.now().as_millis())?;
    write!(out, "{}", render::render(host.browser(), host.parent()))?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::parse_args;
    use crate::errors::HostError;
    use crate::settings::HostSettings;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn given_flags_when_parsing_args_then_settings_are_overridden() {
        let mut settings = HostSettings::default();

        let path = parse_args(
            args(&["data.json", "--width", "390", "--standalone"]),
            &mut settings,
        )
        .expect("args should parse");

        assert_eq!(path.to_string_lossy(), "data.json");
        assert_eq!(settings.viewport_width, 390.0);
        assert!(settings.standalone);
    }

    #[test]
    fn given_no_dataset_when_parsing_args_then_usage_is_reported() {
        let mut settings = HostSettings::default();

        let result = parse_args(args(&["--standalone"]), &mut settings);

        assert!(matches!(result, Err(HostError::Usage)));
    }
}
