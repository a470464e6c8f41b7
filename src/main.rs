mod app;
mod cli;
mod config;
mod ssh;
mod ui;

use std::{fs, io, process::ExitCode};

use clap::Parser;
use ftail::Ftail;
use log::error;

use app::App;
use cli::Cli;
use config::{Settings, load_settings, settings_path, ssh_config_path};
use ui::theme::Theme;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let settings = load_settings(&settings_path());
    init_logging(&settings);

    let theme = Theme::detect();
    match run(cli, settings, theme) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            eprintln!("{} {:#}", theme.error().paint("error:"), err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, settings: Settings, theme: Theme) -> anyhow::Result<()> {
    let config_path = match cli.file {
        Some(path) => path,
        None => ssh_config_path(&settings)?,
    };

    let app = App::new(config_path, settings, theme);
    app.run(cli.command, &mut io::stdout().lock())
}

/// A broken log location must not stop the editor from working.
fn init_logging(settings: &Settings) {
    let log_file = settings.log_file();
    if let Some(dir) = log_file.parent() {
        let _ = fs::create_dir_all(dir);
    }

    if let Err(err) = Ftail::new()
        .single_file(&log_file, true, settings.log_level())
        .init()
    {
        eprintln!("warning: logging disabled: {:?}", err);
    }
}
