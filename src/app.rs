use anyhow::{Context, Result, bail};
use log::{error, info};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use sshed_core::{Editor, ExportFormat, FileStore, HostFields};

use crate::{
    cli::{Command, export_format},
    config::Settings,
    ssh::ConnectionTest,
    ui::{
        table::{render_host_detail, render_host_table},
        theme::Theme,
    },
};

/// One CLI invocation against one config file.
pub struct App {
    editor: Editor<FileStore>,
    settings: Settings,
    theme: Theme,
}

impl App {
    pub fn new(config_path: PathBuf, settings: Settings, theme: Theme) -> Self {
        Self {
            editor: Editor::new(FileStore::new(config_path)),
            settings,
            theme,
        }
    }

    pub fn run(&self, command: Command, out: &mut dyn Write) -> Result<()> {
        match command {
            Command::List => self.list(out),
            Command::Add { name, fields } => self.add(&name, &fields.into(), out),
            Command::Show { name } => self.show(&name, out),
            Command::Edit { name, fields } => self.edit(&name, &fields.into(), out),
            Command::Remove { name } => self.remove(&name, out),
            Command::Copy { from, to } => self.copy(&from, &to, out),
            Command::Test { name } => self.test(&name, out),
            Command::Export {
                json,
                yaml,
                format,
                output,
            } => self.export(export_format(json, yaml, format), output, out),
            Command::Import { path } => self.import(&path, out),
            Command::Backup => self.backup(out),
        }
    }

    fn store(&self) -> &FileStore {
        self.editor.store()
    }

    fn list(&self, out: &mut dyn Write) -> Result<()> {
        let hosts = self.editor.hosts()?;
        write!(out, "{}", render_host_table(&hosts, &self.theme))?;
        Ok(())
    }

    fn show(&self, name: &str, out: &mut dyn Write) -> Result<()> {
        let Some(host) = self.editor.get(name)? else {
            bail!("host '{}' not found", name);
        };
        write!(out, "{}", render_host_detail(&host, &self.theme))?;
        Ok(())
    }

    fn add(&self, name: &str, fields: &HostFields, out: &mut dyn Write) -> Result<()> {
        let host = self.editor.add(name, fields)?;
        info!("added host {} to {}", host.name, self.store().path().display());
        self.done(out, &format!("Added host '{}'", host.name))
    }

    fn edit(&self, name: &str, fields: &HostFields, out: &mut dyn Write) -> Result<()> {
        if fields.is_empty() {
            bail!("nothing to change: pass --host, --user, --port or --identity");
        }
        let host = self.editor.edit(name, fields)?;
        info!("updated host {} ({:?})", host.name, fields);
        self.done(out, &format!("Updated host '{}'", host.name))
    }

    fn remove(&self, name: &str, out: &mut dyn Write) -> Result<()> {
        let host = self.editor.remove(name)?;
        info!("removed host {}", host.name);
        self.done(out, &format!("Removed host '{}'", host.name))
    }

    fn copy(&self, from: &str, to: &str, out: &mut dyn Write) -> Result<()> {
        let host = self.editor.copy(from, to)?;
        info!("copied host {} to {}", from, host.name);
        self.done(out, &format!("Copied host '{}' to '{}'", from, host.name))
    }

    fn test(&self, name: &str, out: &mut dyn Write) -> Result<()> {
        if self.editor.get(name)?.is_none() {
            bail!("host '{}' not found", name);
        }

        let check = ConnectionTest {
            binary: &self.settings.ssh.binary,
            config_path: self.store().path(),
            host: name,
            timeout_secs: self.settings.ssh.connect_timeout,
        };
        info!("testing {} with {:?}", name, check.ssh_args());
        writeln!(out, "Testing connection to '{}'...", name)?;

        let outcome = check.run()?;
        if outcome.success {
            info!("connection to {} succeeded", name);
            return self.done(out, "Connection OK");
        }

        error!("connection to {} failed: {}", name, outcome.stderr);
        if !outcome.stderr.is_empty() {
            writeln!(out, "{}", self.theme.dimmed().paint(&outcome.stderr))?;
        }
        match outcome.exit_code {
            Some(code) => bail!("connection to '{}' failed (exit code {})", name, code),
            None => bail!("connection to '{}' was interrupted", name),
        }
    }

    fn export(
        &self,
        format: ExportFormat,
        output: Option<PathBuf>,
        out: &mut dyn Write,
    ) -> Result<()> {
        let text = self.editor.export(format)?;
        match output {
            Some(path) => {
                fs::write(&path, text)
                    .with_context(|| format!("writing export to {}", path.display()))?;
                info!("exported {} config to {}", format, path.display());
                self.done(out, &format!("Exported to {}", path.display()))
            }
            None => {
                write!(out, "{}", text)?;
                Ok(())
            }
        }
    }

    fn import(&self, path: &Path, out: &mut dyn Write) -> Result<()> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading import file {}", path.display()))?;

        // Validate before touching anything, so a bad dump leaves no stray backup.
        sshed_core::import(&text)?;
        if self.store().exists() {
            let backup = self.store().backup()?;
            info!("backed up {} before import", backup.display());
            writeln!(out, "Previous config saved to {}", backup.display())?;
        }

        let hosts = self.editor.import(&text)?;
        info!("imported {} hosts from {}", hosts.len(), path.display());
        self.done(out, &format!("Imported {} host(s)", hosts.len()))
    }

    fn backup(&self, out: &mut dyn Write) -> Result<()> {
        let path = self.store().backup()?;
        info!("backup written to {}", path.display());
        self.done(out, &format!("Backup written to {}", path.display()))
    }

    fn done(&self, out: &mut dyn Write, message: &str) -> Result<()> {
        writeln!(out, "{}", self.theme.success().paint(message))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = "Host web
    HostName web.example.com
    User deploy

Host db
    HostName 10.0.0.5

";

    fn app(dir: &Path) -> App {
        let path = dir.join("config");
        fs::write(&path, CONFIG).unwrap();
        App::new(path, Settings::default(), Theme::plain())
    }

    fn run(app: &App, command: Command) -> Result<String> {
        let mut out = Vec::new();
        app.run(command, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn read(dir: &Path) -> String {
        fs::read_to_string(dir.join("config")).unwrap()
    }

    #[test]
    fn test_list() {
        let dir = tempfile::tempdir().unwrap();
        let output = run(&app(dir.path()), Command::List).unwrap();
        assert!(output.starts_with("NAME"));
        assert!(output.contains("web.example.com"));
        assert_eq!(output.lines().count(), 3);
    }

    #[test]
    fn test_add_then_show() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());

        let fields = crate::cli::FieldArgs {
            host: Some("cache.lan".into()),
            port: Some(6380),
            ..Default::default()
        };
        let output = run(&app, Command::Add { name: "cache".into(), fields }).unwrap();
        assert_eq!(output, "Added host 'cache'\n");
        assert!(read(dir.path()).ends_with("Host cache\n    HostName cache.lan\n    Port 6380\n\n"));

        let output = run(&app, Command::Show { name: "cache".into() }).unwrap();
        assert_eq!(output, "Host cache\n  HostName  cache.lan\n  Port      6380\n");
    }

    #[test]
    fn test_add_duplicate_fails() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());
        let err = run(
            &app,
            Command::Add { name: "web".into(), fields: Default::default() },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "host 'web' already exists");
        assert_eq!(read(dir.path()), CONFIG);
    }

    #[test]
    fn test_edit_requires_a_field() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());
        let command = Command::Edit { name: "web".into(), fields: Default::default() };
        assert!(run(&app, command).is_err());
        assert_eq!(read(dir.path()), CONFIG);
    }

    #[test]
    fn test_remove_and_copy() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());

        run(&app, Command::Copy { from: "web".into(), to: "web2".into() }).unwrap();
        let output = run(&app, Command::Remove { name: "web".into() }).unwrap();
        assert_eq!(output, "Removed host 'web'\n");
        assert_eq!(
            read(dir.path()),
            "Host db\n    HostName 10.0.0.5\n\nHost web2\n    HostName web.example.com\n    User deploy\n\n"
        );
    }

    #[test]
    fn test_show_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&app(dir.path()), Command::Show { name: "nope".into() }).unwrap_err();
        assert_eq!(err.to_string(), "host 'nope' not found");
    }

    #[test]
    fn test_export_to_stdout_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());

        let native = run(
            &app,
            Command::Export { json: false, yaml: false, format: None, output: None },
        )
        .unwrap();
        assert_eq!(native, CONFIG);

        let target = dir.path().join("hosts.json");
        run(
            &app,
            Command::Export { json: true, yaml: false, format: None, output: Some(target.clone()) },
        )
        .unwrap();
        let dump = fs::read_to_string(&target).unwrap();
        assert_eq!(sshed_core::import(&dump).unwrap().names(), vec!["web", "db"]);
    }

    #[test]
    fn test_yaml_export() {
        let dir = tempfile::tempdir().unwrap();
        let output = run(
            &app(dir.path()),
            Command::Export { json: false, yaml: true, format: None, output: None },
        )
        .unwrap();
        assert!(output.starts_with("web:\n  HostName: web.example.com\n  User: deploy\n"));
        assert!(output.contains("db:\n  HostName: "));
    }

    #[test]
    fn test_unwritable_names_and_values_change_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());
        for name in [" web ", ""] {
            let fields = crate::cli::FieldArgs { user: Some("root".into()), ..Default::default() };
            assert!(run(&app, Command::Add { name: name.into(), fields }).is_err());
        }
        let fields = crate::cli::FieldArgs { user: Some("x\ny".into()), ..Default::default() };
        assert!(run(&app, Command::Edit { name: "web".into(), fields }).is_err());
        assert_eq!(read(dir.path()), CONFIG);
    }

    #[test]
    fn test_import_backs_up_first() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());
        let dump = dir.path().join("dump.json");
        fs::write(&dump, r#"[{"name":"only","options":{"User":"me"}}]"#).unwrap();

        let output = run(&app, Command::Import { path: dump }).unwrap();

        assert!(output.contains("Previous config saved to"));
        assert!(output.ends_with("Imported 1 host(s)\n"));
        assert_eq!(read(dir.path()), "Host only\n    User me\n\n");

        let backups: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("config.backup."))
            .collect();
        assert_eq!(backups.len(), 1);
        assert_eq!(fs::read_to_string(backups[0].path()).unwrap(), CONFIG);
    }

    #[test]
    fn test_bad_import_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());
        let dump = dir.path().join("dump.json");
        fs::write(&dump, "not json").unwrap();

        assert!(run(&app, Command::Import { path: dump }).is_err());
        assert_eq!(read(dir.path()), CONFIG);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_backup_without_config() {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new(dir.path().join("config"), Settings::default(), Theme::plain());
        assert!(run(&app, Command::Backup).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_connection_test_uses_configured_binary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, CONFIG).unwrap();

        let mut settings = Settings::default();
        settings.ssh.binary = "true".into();
        let app = App::new(path.clone(), settings.clone(), Theme::plain());
        let output = run(&app, Command::Test { name: "web".into() }).unwrap();
        assert!(output.ends_with("Connection OK\n"));

        settings.ssh.binary = "false".into();
        let app = App::new(path, settings, Theme::plain());
        assert!(run(&app, Command::Test { name: "web".into() }).is_err());
        assert!(run(&app, Command::Test { name: "nope".into() }).is_err());
    }
}
