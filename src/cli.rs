use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::codegen::{CodeGenerator, GeneratorConfig};
use crate::highlight::Highlighter;
use crate::logging::{LoggingConfig, init_logging};
use crate::project::Project;
use crate::template::TemplateStore;
use crate::widget::FontCatalog;

#[derive(Debug, Parser)]
#[command(
    name = "guislice-codegen",
    about = "Generate GUIslice C source from a project description",
    version
)]
pub struct Cli {
    /// Increase log output (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate (or regenerate) the project's source file.
    Generate(GenerateArgs),

    /// List the templates in a library.
    Templates(TemplatesArgs),
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Project description (JSON).
    pub project: PathBuf,

    /// Template library to use instead of the bundled one.
    #[arg(long)]
    pub templates: Option<PathBuf>,

    /// Font catalog (JSON) to use instead of the bundled one.
    #[arg(long)]
    pub fonts: Option<PathBuf>,

    /// Skeleton source for a first run.
    #[arg(long)]
    pub skeleton: Option<PathBuf>,

    /// Output directory; defaults to the project file's directory.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Print the generated source instead of writing it.
    #[arg(long)]
    pub print: bool,

    /// Syntax highlight printed source.
    #[arg(long, requires = "print")]
    pub highlight: bool,

    /// Do not keep a `.bak` copy of the previous output.
    #[arg(long)]
    pub no_backup: bool,
}

#[derive(Debug, Args)]
pub struct TemplatesArgs {
    /// Library file; the bundled library when omitted.
    pub library: Option<PathBuf>,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    init_logging(LoggingConfig::with_verbosity(cli.verbose));
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Generate(args) => run_generate(args),
        Commands::Templates(args) => run_templates(args),
    }
}

fn load_store(path: Option<&Path>) -> Result<TemplateStore> {
    match path {
        Some(path) => TemplateStore::from_path(path)
            .with_context(|| format!("loading template library {}", path.display())),
        None => TemplateStore::builtin().context("parsing bundled template library"),
    }
}

fn run_generate(args: GenerateArgs) -> Result<()> {
    let project = Project::load(&args.project)
        .with_context(|| format!("loading project {}", args.project.display()))?;
    let store = load_store(args.templates.as_deref())?;
    let fonts = match &args.fonts {
        Some(path) => FontCatalog::from_path(path)
            .with_context(|| format!("loading font catalog {}", path.display()))?,
        None => FontCatalog::builtin(),
    };

    let config = GeneratorConfig {
        skeleton: args.skeleton,
        backup: !args.no_backup,
        ..GeneratorConfig::default()
    };
    let out_dir = match args.out {
        Some(dir) => dir,
        None => args
            .project
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };

    log::info!(
        "generating {} for {} ({} pages)",
        project.file_name(),
        project.target.display_name(),
        project.pages.len()
    );
    let generator = CodeGenerator::new(&project, &store, &fonts, config);

    if args.print {
        let source = generator.preview(&out_dir)?;
        let mut stdout = std::io::stdout().lock();
        if args.highlight {
            stdout.write_all(Highlighter::new().to_ansi(&source).as_bytes())?;
        } else {
            stdout.write_all(source.as_bytes())?;
        }
        return Ok(());
    }

    let path = generator.generate(&out_dir)?;
    println!("{}", path.display());
    Ok(())
}

fn run_templates(args: TemplatesArgs) -> Result<()> {
    let store = load_store(args.library.as_deref())?;
    let mut stdout = std::io::stdout().lock();
    for name in store.names() {
        writeln!(stdout, "{name}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_args_parse() {
        let cli = Cli::try_parse_from([
            "guislice-codegen",
            "-v",
            "generate",
            "demo.json",
            "--out",
            "build",
            "--print",
            "--highlight",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.project, PathBuf::from("demo.json"));
        assert_eq!(args.out, Some(PathBuf::from("build")));
        assert!(args.print && args.highlight && !args.no_backup);
    }

    #[test]
    fn highlight_requires_print() {
        let result = Cli::try_parse_from(["guislice-codegen", "generate", "demo.json", "--highlight"]);
        assert!(result.is_err());
    }

    #[test]
    fn generate_writes_next_to_project() {
        let dir = tempfile::tempdir().unwrap();
        let project_path = dir.path().join("demo.json");
        let project = Project {
            name: "demo".into(),
            ..Project::default()
        };
        std::fs::write(&project_path, serde_json::to_string(&project).unwrap()).unwrap();

        run(Cli {
            verbose: 0,
            command: Commands::Generate(GenerateArgs {
                project: project_path,
                templates: None,
                fonts: None,
                skeleton: None,
                out: None,
                print: false,
                highlight: false,
                no_backup: false,
            }),
        })
        .unwrap();

        let source = std::fs::read_to_string(dir.path().join("demo.ino")).unwrap();
        assert!(source.contains("gslc_SetPageCur(&m_gui,E_PG_MAIN);"));
    }

    #[test]
    fn missing_project_reports_context() {
        let err = run(Cli {
            verbose: 0,
            command: Commands::Generate(GenerateArgs {
                project: PathBuf::from("/nonexistent/demo.json"),
                templates: None,
                fonts: None,
                skeleton: None,
                out: None,
                print: false,
                highlight: false,
                no_backup: false,
            }),
        })
        .unwrap_err();
        assert!(format!("{err:#}").starts_with("loading project /nonexistent/demo.json"));
    }

    #[test]
    fn templates_lists_bundled_library() {
        assert!(run(Cli {
            verbose: 0,
            command: Commands::Templates(TemplatesArgs { library: None }),
        })
        .is_ok());
    }
}
