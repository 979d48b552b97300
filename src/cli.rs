//! Minimal CLI: load named types → expand element trees (or list the types)
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use serde_json::Value;
use tracing::{debug, info};

use refract_expand::element::names;
use refract_expand::{Diagnostic, Element, Expander, Registry};

use crate::path_de::{elements_from_value, elements_from_value_in};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// expand named types and references in refract element trees
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    /// debug-level logging (RUST_LOG takes precedence)
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// expand element trees against the registered named types
    Expand(ExpandOut),
    /// list registered named types with their inheritance chains
    Types(TypesOut),
}

#[derive(Args, Debug, Clone)]
struct RegistrySettings {
    /// Files holding named-type definitions (one element or an array of them).
    /// May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1..)]
    registry: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// JSON Pointer to select a subnode in each document (e.g. /content/0)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document.
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct ExpandOut {
    #[command(flatten)]
    registry_settings: RegistrySettings,

    #[command(flatten)]
    input_settings: InputSettings,

    /// wrap each result in a `dataStructure` element
    #[arg(long, default_value_t = false)]
    data_structure: bool,

    /// skip expansion, only decode and re-emit
    #[arg(long, default_value_t = false)]
    no_expand: bool,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct TypesOut {
    #[command(flatten)]
    registry_settings: RegistrySettings,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl RegistrySettings {
    /// Registration phase: every definition is in place before anything
    /// expands.
    fn load(&self) -> Result<Registry> {
        let mut registry = Registry::new();
        let mut documents = Vec::<(PathBuf, Value)>::new();
        for source_path in resolve_file_path_patterns(&self.registry)? {
            let value = read_json(&source_path)?;
            let candidates = elements_from_value(value.clone())
                .map_err(|error| anyhow!("invalid named types in {}: {error}", source_path.display()))?;
            let offered = candidates.len();
            let stored = registry.register_named_types(candidates);
            if stored < offered {
                debug!(
                    path = %source_path.display(),
                    skipped = offered - stored,
                    "skipped definitions without an `id`"
                );
            }
            documents.push((source_path, value));
        }

        // derived definitions take their kind from the now registered bases
        let resolved = documents
            .iter()
            .map(|(source_path, value)| {
                elements_from_value_in(value, &registry)
                    .map_err(|error| anyhow!("invalid named types in {}: {error}", source_path.display()))
            })
            .collect::<Result<Vec<_>>>()?;
        for candidates in resolved {
            registry.register_named_types(candidates);
        }

        info!(types = registry.len(), "registry loaded");
        Ok(registry)
    }
}

impl InputSettings {
    fn load_process(&self, mut apply: impl FnMut(Value) -> Result<()>) -> Result<()> {
        let source_paths = resolve_file_path_patterns(&self.input)
            .context("failed to resolve input file paths")?;
        for source_path in source_paths {
            let source_path_str = source_path.to_string_lossy().to_string();
            let mut json_value = read_json(&source_path)?;
            if let Some(pointer) = self.json_pointer.as_ref() {
                json_value = json_value
                    .pointer(pointer)
                    .cloned()
                    .ok_or_else(|| anyhow!("JSON pointer {pointer} matched nothing in {source_path_str}"))?;
            }
            match self.jq_expr.as_ref() {
                None => apply(json_value)?,
                Some(jq_expr) => {
                    let result = crate::jq_exec::run_jaq(jq_expr, &json_value).with_context(|| {
                        format!("Failed to apply jq expression to source file ({source_path_str})")
                    })?;
                    for json_value in result {
                        apply(json_value)?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn verbose(&self) -> bool {
        self.verbose
    }
    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Expand(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                // 1) registration
                let registry = target.registry_settings.load()?;

                // 2) expansion
                let mut expander = Expander::new(&registry);
                let mut outputs = Vec::<Element>::new();
                target.input_settings.load_process(|value| {
                    let elements = elements_from_value_in(&value, &registry).map_err(|error| anyhow!(error))?;
                    for element in elements {
                        outputs.push(target.transform(&mut expander, &element)?);
                    }
                    Ok(())
                })?;
                report_diagnostics(expander.diagnostics());

                // 3) emit
                let out_value = match outputs.len() {
                    1 => serde_json::to_value(&outputs[0])?,
                    _ => serde_json::to_value(&outputs)?,
                };
                let out_src = serde_json::to_string_pretty(&out_value)?;
                write_output(target.out.as_deref(), &out_src)
            }
            Command::Types(target) => {
                let registry = target.registry_settings.load()?;
                for name in registry.names() {
                    println!("{}", describe_lineage(&registry, name)?);
                }
                Ok(())
            }
        }
    }
}

impl ExpandOut {
    fn transform(&self, expander: &mut Expander<'_>, element: &Element) -> Result<Element> {
        let expand = !self.no_expand;
        if self.data_structure {
            return Ok(expander.data_structure(element, expand)?);
        }
        if !expand {
            return Ok(element.clone());
        }
        Ok(expander.expand_or_clone(element)?)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// `Name → Parent → (base)`
fn describe_lineage(registry: &Registry, name: &str) -> Result<String> {
    let lineage = registry.lineage(name)?;
    let mut parts = lineage.iter().map(|(found, _)| found.bold().to_string()).collect::<Vec<_>>();
    let base = lineage.last().map_or(names::OBJECT, |(_, definition)| definition.type_name());
    parts.push(format!("({base})").dimmed().to_string());
    Ok(parts.join(" → "))
}

fn report_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("{} {diagnostic}", "warning:".yellow().bold());
    }
}

fn read_json(source_path: &Path) -> Result<Value> {
    let source_path_str = source_path.to_string_lossy();
    let source = std::fs::read_to_string(source_path)
        .with_context(|| format!("Failed to read source file ({source_path_str})"))?;
    serde_json::from_str::<Value>(&source)
        .with_context(|| format!("Failed to parse JSON source file ({source_path_str})"))
}

fn write_output(out: Option<&Path>, source: &str) -> Result<()> {
    let Some(out) = out else {
        println!("{source}");
        return Ok(());
    };
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(out, source).with_context(|| format!("failed to write {}", out.display()))
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                // an explicit glob that matched nothing is an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
