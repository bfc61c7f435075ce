//! Command dispatch

use std::io::{self, BufRead, Write};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::services::{LoadReport, SundialService};
use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::tree_traits::subtree;
use crate::domain::{Arc, DomainError, LayoutOutput, TreeNodeConvert};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::render::SnapshotRenderer;
use crate::infrastructure::svg::SvgRenderer;
use crate::infrastructure::traits::{NullRenderer, Renderer};
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see `sundial --help`".to_string(),
        ));
    };

    // completion needs no settings
    if let Commands::Completion { shell } = command {
        _completion(*shell);
        return Ok(());
    }

    let mut settings = Settings::load(cli.config.as_deref())?;
    if cli.strict {
        settings.hierarchy.strict = true;
    }
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Tree { file, focus } => _tree(&container, file, focus.as_deref()),
        Commands::Layout { file, focus, json } => _layout(&container, file, focus, *json),
        Commands::Svg {
            file,
            focus,
            output,
        } => _svg(&container, file, focus, output.as_deref()),
        Commands::Explore { file } => _explore(&container, file),
        Commands::Convert { input, output } => _convert(&container, input, output.as_deref()),
        Commands::Config { command } => _config(&container, cli.config.as_deref(), command),
        Commands::Completion { .. } => Ok(()),
    }
}

fn print_load_warnings(report: &LoadReport) {
    for w in report.warnings() {
        output::warning(&w);
    }
}

fn print_layout_warnings(layout: &LayoutOutput) {
    for w in &layout.warnings {
        output::warning(w);
    }
}

fn load<R: Renderer>(
    container: &ServiceContainer,
    file: &Path,
    renderer: R,
) -> CliResult<(SundialService<R>, LoadReport)> {
    let mut service = container.sundial_service(renderer);
    let report = service.load_file(file)?;
    print_load_warnings(&report);
    Ok((service, report))
}

fn focus_path<R: Renderer>(service: &mut SundialService<R>, focus: &[String]) -> CliResult<()> {
    for id in focus {
        service.request_focus(id)?;
    }
    Ok(())
}

#[instrument(skip(container))]
fn _tree(container: &ServiceContainer, file: &Path, focus: Option<&str>) -> CliResult<()> {
    let (service, report) = load(container, file, NullRenderer)?;
    let tree = service.tree().ok_or(ApplicationError::NotLoaded)?;

    match focus {
        Some(id) => {
            let start = tree
                .find(id)
                .ok_or_else(|| ApplicationError::from(DomainError::UnknownNode(id.to_string())))?;
            let ancestors = tree
                .path_to_root(start)
                .into_iter()
                .rev()
                .filter_map(|idx| tree.get_node(idx))
                .map(|node| node.id().to_string())
                .join(" > ");
            if !ancestors.is_empty() {
                output::detail(&format!("under {}", ancestors));
            }
            output::info(&subtree(tree, start));
            output::detail(&format!("{} arguments in this subtree", tree.iter_from(start).count()));
        }
        None => output::info(&tree.to_tree_string()),
    }

    output::detail(&format!(
        "{} records, {} arguments, {} reachable, {} leaves, depth {}",
        report.records,
        report.arguments,
        report.reachable,
        tree.leaf_nodes().len(),
        tree.depth()
    ));
    Ok(())
}

fn arc_row(arc: &Arc) -> String {
    format!(
        "{:<8} {:>2} {:>8.2} {:>8.2} {:>8.2} {:>8.2}  {} {}",
        arc.node_id,
        arc.depth,
        arc.start_angle.to_degrees(),
        arc.end_angle.to_degrees(),
        arc.inner_radius,
        arc.outer_radius,
        output::sentiment(arc.sentiment),
        arc.text
    )
}

#[instrument(skip(container))]
fn _layout(container: &ServiceContainer, file: &Path, focus: &[String], json: bool) -> CliResult<()> {
    let (mut service, _) = load(container, file, SnapshotRenderer::default())?;
    focus_path(&mut service, focus)?;
    let renderer = service.into_renderer();
    print_layout_warnings(&renderer.layout);

    if json {
        let text = serde_json::to_string_pretty(&renderer.layout.arcs).map_err(InfraError::from)?;
        output::info(&text);
        return Ok(());
    }

    if let Some(current) = &renderer.current {
        output::header(&format!("focus: {}", current));
    }
    output::info(&format!(
        "{:<8} {:>2} {:>8} {:>8} {:>8} {:>8}  text",
        "id", "d", "start°", "end°", "inner", "outer"
    ));
    for arc in &renderer.layout.arcs {
        output::info(&arc_row(arc));
    }
    Ok(())
}

#[instrument(skip(container))]
fn _svg(
    container: &ServiceContainer,
    file: &Path,
    focus: &[String],
    out: Option<&Path>,
) -> CliResult<()> {
    let settings = &container.settings;
    let renderer = SvgRenderer::new(settings.svg.clone(), settings.layout.max_radius);
    let (mut service, _) = load(container, file, renderer)?;
    focus_path(&mut service, focus)?;
    if let Some(layout) = service.last_layout() {
        print_layout_warnings(layout);
    }

    let document = service
        .renderer()
        .document()
        .ok_or(ApplicationError::NotLoaded)?
        .to_string();
    match out {
        Some(path) => {
            container
                .fs
                .write(path, &document)
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::action("Wrote", &path.display());
        }
        None => print!("{}", document),
    }
    Ok(())
}

#[instrument(skip(container))]
fn _explore(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let (mut service, report) = load(container, file, SnapshotRenderer::default())?;
    output::success(&format!(
        "loaded {} arguments ({} reachable)",
        report.arguments, report.reachable
    ));
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_explore(&mut service, stdin.lock(), stdout.lock())
}

fn write_view<W: Write>(service: &SundialService<SnapshotRenderer>, out: &mut W) -> io::Result<()> {
    let view = service.renderer();
    if let Some(current) = &view.current {
        writeln!(out, "focus: {}", current)?;
    }
    for w in &view.layout.warnings {
        writeln!(out, "  warning: {}", w)?;
    }
    let children = view
        .layout
        .top_level()
        .map(|arc| {
            let marker = if arc.has_children { "+" } else { "" };
            format!("{}{} ({})", arc.node_id, marker, arc.sentiment)
        })
        .join(", ");
    if children.is_empty() {
        writeln!(out, "  (no arguments below)")?;
    } else {
        writeln!(out, "  {}", children)?;
    }
    if view.can_go_back {
        writeln!(out, "  [back]")?;
    }
    Ok(())
}

/// Line-driven navigation: `ls`, `focus <id>`, `back`, `root`, `quit`.
pub fn run_explore<I: BufRead, W: Write>(
    service: &mut SundialService<SnapshotRenderer>,
    input: I,
    mut out: W,
) -> CliResult<()> {
    let io_err = |e: io::Error| InfraError::io("write explore output", e);
    write_view(service, &mut out).map_err(io_err)?;

    for line in input.lines() {
        let line = line.map_err(|e| InfraError::io("read explore input", e))?;
        let mut words = line.split_whitespace();
        let Some(cmd) = words.next() else {
            continue;
        };
        debug!("explore: {}", line);

        match (cmd, words.next()) {
            ("quit" | "q" | "exit", _) => break,
            ("ls", _) => write_view(service, &mut out).map_err(io_err)?,
            ("focus" | "f", Some(id)) => match service.request_focus(id) {
                Ok(()) => write_view(service, &mut out).map_err(io_err)?,
                Err(e) => writeln!(out, "error: {}", e).map_err(io_err)?,
            },
            ("back" | "b", _) => {
                if service.request_back()? {
                    write_view(service, &mut out).map_err(io_err)?;
                } else {
                    writeln!(out, "already at the first view").map_err(io_err)?;
                }
            }
            ("root", _) => {
                service.request_root()?;
                write_view(service, &mut out).map_err(io_err)?;
            }
            _ => writeln!(out, "commands: ls, focus <id>, back, root, quit").map_err(io_err)?,
        }
    }
    Ok(())
}

#[instrument(skip(container))]
fn _convert(container: &ServiceContainer, input: &Path, out: Option<&Path>) -> CliResult<()> {
    let service = container.convert_service();
    match out {
        Some(path) => {
            let count = service.convert_to(input, path)?;
            output::action("Converted", &format!("{} arguments to {}", count, path.display()));
        }
        None => print!("{}", service.convert_file(input)?),
    }
    Ok(())
}

fn _config(container: &ServiceContainer, local: Option<&Path>, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(p) => {
                    let state = if p.exists() { "" } else { " (not found)" };
                    output::action("Global", &format!("{}{}", p.display(), state));
                }
                None => output::action("Global", &"unavailable"),
            }
            if let Some(p) = local {
                output::action("Local", &p.display());
            }
        }
        ConfigCommands::Init { force } => {
            let path = global_config_path().ok_or_else(|| {
                CliError::Usage("cannot determine config directory".to_string())
            })?;
            if container.fs.exists(&path) && !force {
                return Err(CliError::Usage(format!(
                    "{} exists, use --force to overwrite",
                    path.display()
                )));
            }
            container
                .fs
                .write(&path, &Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::action("Created", &path.display());
        }
    }
    Ok(())
}

fn _completion(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
