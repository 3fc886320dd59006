//! Command dispatch: settings, services, and terminal output

use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::CommandFactory;
use itertools::Itertools;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::services::{
    ClickOutcome, CsvSalesProvider, Delivery, VisualizationSession,
};
use crate::application::{ApplicationError, IoResultExt};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{snapshot, ChartUpdate, MediaAssets, TimelineEvent};
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::ServiceContainer;
use crate::tree_traits::TreeNodeConvert;

/// Execute the parsed command.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let project_dir = resolve_project_dir(cli.project_dir.as_deref())?;

    match &cli.command {
        Some(Commands::Completion { shell }) => cmd_completion(*shell),
        Some(Commands::Config { command }) => cmd_config(command, &project_dir),
        Some(cmd) => {
            let settings = Settings::load(Some(&project_dir))?;
            debug!("settings: {:?}", settings);
            let container = ServiceContainer::new(settings);
            match cmd {
                Commands::Tree { file } => cmd_tree(&container, file.as_deref()),
                Commands::Layout { file, json } => cmd_layout(&container, file.as_deref(), *json),
                Commands::Select {
                    name,
                    history,
                    sales,
                    timeline,
                    json,
                } => cmd_select(
                    &container,
                    name,
                    history.as_deref(),
                    sales.as_deref(),
                    timeline.as_deref(),
                    *json,
                ),
                Commands::Event { name, timeline } => {
                    cmd_event(&container, name, timeline.as_deref())
                }
                Commands::Completion { .. } | Commands::Config { .. } => Ok(()),
            }
        }
        None => Err(CliError::Usage(
            "no command given, see --help".to_string(),
        )),
    }
}

fn resolve_project_dir(project_dir: Option<&Path>) -> CliResult<PathBuf> {
    match project_dir {
        Some(dir) => Ok(dir.to_path_buf()),
        None => env::current_dir()
            .with_path_context("resolve current directory", Path::new("."))
            .map_err(CliError::from),
    }
}

fn history_or_default(container: &ServiceContainer, file: Option<&Path>) -> PathBuf {
    file.map(Path::to_path_buf)
        .unwrap_or_else(|| container.settings.history_path())
}

// ============================================================
// Tree commands
// ============================================================

#[instrument(level = "debug", skip(container))]
fn cmd_tree(container: &ServiceContainer, file: Option<&Path>) -> CliResult<()> {
    let path = history_or_default(container, file);
    let tree = container
        .lineage_service()
        .load_tree(&path, &container.settings.layout)?;

    output::info(&tree.to_tree_string());
    output::action(
        "Leaves",
        &format!("{} ({})", tree.leaf_nodes().len(), tree.leaf_nodes().iter().join(", ")),
    );
    output::action("Depth", &tree.depth());
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_layout(container: &ServiceContainer, file: Option<&Path>, json: bool) -> CliResult<()> {
    let path = history_or_default(container, file);
    let tree = container
        .lineage_service()
        .load_tree(&path, &container.settings.layout)?;
    let nodes = snapshot(&tree);

    if json {
        output::info(&to_json(&nodes)?);
        return Ok(());
    }

    output::header(&format!("Layout of {} nodes", nodes.len()));
    for node in &nodes {
        let line = format!(
            "{:>3}  L{}  {:>8.3}  [{:.3}, {:.3}]  {}",
            node.ordinal, node.level, node.position, node.allotment.0, node.allotment.1, node.name
        );
        if node.data_available {
            output::detail(&line);
        } else {
            output::muted(&line);
        }
    }
    Ok(())
}

// ============================================================
// Selection and chart
// ============================================================

/// Chart contents after a selection: the series plus the labelled timeline events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartReport {
    pub chart: ChartUpdate,
    pub events: Vec<TimelineEvent>,
}

impl ChartReport {
    /// Terminal rendering, one line per point or event.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.chart.has_data() {
            lines.extend(
                self.chart
                    .series
                    .points
                    .iter()
                    .map(|p| format!("{}  {:>10}", p.year, p.count)),
            );
            lines.push(format!("Y axis: 0..{}", self.chart.series.y_ceiling()));
        } else {
            lines.push("No purchase data available".to_string());
        }
        lines.extend(
            self.events
                .iter()
                .map(|e| format!("Event: {}  {}", e.year, e.short_text)),
        );
        lines
    }
}

/// Select `name` and collect what the chart would draw.
///
/// Returns `None` when the node has no data and the selection is ignored.
#[instrument(level = "debug", skip(container))]
pub fn select_report(
    container: &ServiceContainer,
    name: &str,
    history: Option<&Path>,
    sales: Option<&Path>,
    timeline: Option<&Path>,
) -> CliResult<Option<ChartReport>> {
    let mut session = match (history, sales) {
        (None, None) => container.session()?,
        _ => {
            let history = history_or_default(container, history);
            let tree = container
                .lineage_service()
                .load_tree(&history, &container.settings.layout)?;
            let sales = sales
                .map(Path::to_path_buf)
                .unwrap_or_else(|| container.settings.sales_path());
            let provider = Arc::new(CsvSalesProvider::new(Arc::clone(&container.fs), sales));
            VisualizationSession::new(tree, provider)
        }
    };

    let mut chart: Vec<ChartUpdate> = Vec::new();
    session.initial_chart(&mut chart);

    match session.click_name(name, &mut chart)? {
        ClickOutcome::Ignored => return Ok(None),
        ClickOutcome::Delivered => {}
        ClickOutcome::Pending(pending) => {
            let rows = session.fetch(&pending)?;
            if session.complete(&pending, &rows, &mut chart) == Delivery::Stale {
                debug!("select: result for {} superseded", pending.name);
            }
        }
    }

    let Some(update) = chart.pop() else {
        return Ok(None);
    };
    // Every chart refresh redraws the timeline strip
    let timeline_path = timeline
        .map(Path::to_path_buf)
        .unwrap_or_else(|| container.settings.timeline_path());
    let events = if container.fs.exists(&timeline_path) {
        let timeline = container.timeline_service().load(&timeline_path)?;
        timeline.visible().cloned().collect()
    } else {
        debug!("select: no timeline at {}", timeline_path.display());
        Vec::new()
    };

    Ok(Some(ChartReport {
        chart: update,
        events,
    }))
}

#[instrument(level = "debug", skip(container))]
fn cmd_select(
    container: &ServiceContainer,
    name: &str,
    history: Option<&Path>,
    sales: Option<&Path>,
    timeline: Option<&Path>,
    json: bool,
) -> CliResult<()> {
    let Some(report) = select_report(container, name, history, sales, timeline)? else {
        output::warning(&format!("'{name}' has no data and cannot be selected"));
        return Ok(());
    };
    if json {
        output::info(&to_json(&report)?);
        return Ok(());
    }

    output::header(&report.chart.name);
    for line in report.lines() {
        if report.chart.has_data() {
            output::detail(&line);
        } else {
            output::muted(&line);
        }
    }
    Ok(())
}

// ============================================================
// Timeline events
// ============================================================

#[instrument(level = "debug", skip(container))]
fn cmd_event(container: &ServiceContainer, name: &str, timeline: Option<&Path>) -> CliResult<()> {
    let path = timeline
        .map(Path::to_path_buf)
        .unwrap_or_else(|| container.settings.timeline_path());
    let timeline = container.timeline_service().load(&path)?;

    output::header(name);
    match timeline.find(name) {
        Some(event) => output::detail(&event.caption()),
        None => output::muted(&"No timeline event"),
    }

    let assets = MediaAssets::for_instrument(
        name,
        &container.settings.photos_dir,
        &container.settings.sounds_dir,
    );
    output::action("Photo", &assets.photo.display());
    match &assets.audio {
        Some(audio) => output::action("Audio", &audio.display()),
        None => output::muted(&"No sound sample"),
    }
    Ok(())
}

// ============================================================
// Config commands
// ============================================================

fn cmd_config(cmd: &ConfigCommands, project_dir: &Path) -> CliResult<()> {
    match cmd {
        ConfigCommands::Show => {
            let settings = Settings::load(Some(project_dir))?;
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => {
            let describe = |path: &Path| {
                let state = if path.exists() { "exists" } else { "not found" };
                format!("{} ({})", path.display(), state)
            };
            match global_config_path() {
                Some(global) => output::action("Global", &describe(&global)),
                None => output::muted(&"Global: no config directory on this platform"),
            }
            output::action("Local", &describe(&local_config_path(project_dir)));
            Ok(())
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| ApplicationError::Config {
                    message: "cannot determine global config directory".to_string(),
                })?
            } else {
                local_config_path(project_dir)
            };
            init_config(&RealFileSystem, &path)
        }
    }
}

fn init_config(fs: &dyn FileSystem, path: &Path) -> CliResult<()> {
    if fs.exists(path) {
        return Err(CliError::Usage(format!(
            "config already exists: {}",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        fs.create_dir_all(parent)
            .with_path_context("create config dir", parent)?;
    }
    fs.write(path, &Settings::template())
        .with_path_context("write config", path)?;
    output::action("Created", &path.display());
    Ok(())
}

// ============================================================
// Helpers
// ============================================================

fn cmd_completion(shell: clap_complete::Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| {
        CliError::from(ApplicationError::OperationFailed {
            context: "serialize output".to_string(),
            source: Box::new(e),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::domain::{SalesRow, SalesSeries};

    /// In-memory filesystem keyed by path.
    #[derive(Default)]
    struct MemoryFs {
        files: Mutex<HashMap<PathBuf, String>>,
        dirs: Mutex<Vec<PathBuf>>,
    }

    impl FileSystem for MemoryFs {
        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            self.files
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "missing"))
        }

        fn write(&self, path: &Path, content: &str) -> io::Result<()> {
            self.files
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), content.to_string());
            Ok(())
        }

        fn exists(&self, path: &Path) -> bool {
            self.files.lock().unwrap().contains_key(path)
        }

        fn create_dir_all(&self, path: &Path) -> io::Result<()> {
            self.dirs.lock().unwrap().push(path.to_path_buf());
            Ok(())
        }
    }

    #[test]
    fn given_no_config_when_init_then_template_written_through_filesystem() {
        let fs = MemoryFs::default();
        let path = Path::new("/cfg/pianoviz/pianoviz.toml");

        init_config(&fs, path).unwrap();

        assert_eq!(fs.read_to_string(path).unwrap(), Settings::template());
        assert_eq!(*fs.dirs.lock().unwrap(), vec![PathBuf::from("/cfg/pianoviz")]);
        let err = init_config(&fs, path).unwrap_err();
        assert_eq!(err.exit_code(), crate::exitcode::USAGE);
    }

    #[test]
    fn given_report_without_data_when_rendering_then_no_data_line_and_events() {
        let report = ChartReport {
            chart: ChartUpdate::no_data("Toy Piano"),
            events: vec![TimelineEvent {
                name: "Grand Piano".into(),
                text: "First grand".into(),
                short_text: "Grand".into(),
                year: 1700,
                show: true,
            }],
        };

        assert_eq!(
            report.lines(),
            vec!["No purchase data available", "Event: 1700  Grand"]
        );
    }

    #[test]
    fn given_report_with_series_when_rendering_then_points_and_ceiling() {
        let series = SalesSeries::from_rows(&[SalesRow::new(1990, "1,234")]);
        let report = ChartReport {
            chart: ChartUpdate::new("Grand Piano", series),
            events: Vec::new(),
        };

        assert_eq!(
            report.lines(),
            vec![format!("1990  {:>10}", 1234), "Y axis: 0..10000".to_string()]
        );
    }
}
