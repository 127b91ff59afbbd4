//! # cmaid CLI Entry Point
//!
//! Parses arguments with clap and routes them to the handlers in
//! [`cmaid::commands`].
//!
//! ## Command Structure
//!
//! - **Help**: `info`, `versions`, `help`, `generators`, `copyright`
//! - **Lists files**: `parse`, `scan`
//! - **Projects**: `project`, `configure`, `build`, `clean`, `dirty`
//! - **Housekeeping**: `cache`, `config`, `completion`

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use colored::*;
use std::path::PathBuf;

use cmaid::cache;
use cmaid::commands::{self, RunOptions, help::HelpQuery, project::SettingsUpdate};
use cmaid::config::CmaidConfig;

#[cfg(windows)]
#[link(name = "kernel32")]
unsafe extern "system" {
    fn SetConsoleOutputCP(wCodePageID: u32) -> i32;
}

#[cfg(windows)]
fn enable_utf8_console() {
    unsafe {
        SetConsoleOutputCP(65001);
    }
}

#[cfg(not(windows))]
fn enable_utf8_console() {}

#[derive(Parser)]
#[command(name = "cmaid")]
#[command(about = "Browse cmake help, parse CMakeLists.txt and drive cmake builds", version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
#[command(disable_help_subcommand = true)]
struct Cli {
    /// Print every command line that gets executed
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the configured cmake and where help data is cached
    Info,
    /// List cmake versions known to produce parseable help
    Versions,
    /// Browse cmake help: modules, commands, variables or properties
    Help {
        /// Topic (modules, commands, variables, properties)
        topic: String,
        /// Entry to show in full
        name: Option<String>,
        /// Only list entries matching *FILTER* (`*` and `?` allowed)
        #[arg(short, long)]
        filter: Option<String>,
        /// Scrape cmake again instead of using the cache
        #[arg(long)]
        reload: bool,
    },
    /// List the generators cmake supports
    Generators {
        #[arg(long)]
        reload: bool,
    },
    /// Print cmake's copyright notice
    Copyright {
        #[arg(long)]
        reload: bool,
    },
    /// Parse a CMakeLists.txt and list its commands
    Parse {
        /// File to parse
        #[arg(default_value = "CMakeLists.txt")]
        file: PathBuf,
        /// Only list variables defined with set() or option()
        #[arg(long)]
        vars: bool,
    },
    /// Parse every CMakeLists.txt under a directory and list their variables
    Scan {
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
    /// Manage per-project cmake settings (cmaid.json)
    Project {
        #[command(subcommand)]
        op: ProjectOp,
    },
    /// Run cmake for a project
    Configure {
        project: String,
        /// Build configuration
        #[arg(short, long, default_value = "Debug")]
        config: String,
        /// Print the command line instead of running it
        #[arg(long)]
        dry_run: bool,
    },
    /// Build a project in its cmake build directory
    Build {
        project: String,
        #[arg(short, long, default_value = "Debug")]
        config: String,
        /// Build only this project's target
        #[arg(long)]
        project_only: bool,
        #[arg(long)]
        dry_run: bool,
    },
    /// Run the clean target of a project
    Clean {
        project: String,
        #[arg(short, long, default_value = "Debug")]
        config: String,
        #[arg(long)]
        project_only: bool,
        #[arg(long)]
        dry_run: bool,
    },
    /// Force cmake to re-run on the next build
    Dirty {
        project: String,
        #[arg(short, long, default_value = "Debug")]
        config: String,
    },
    /// Manage the help cache
    Cache {
        #[command(subcommand)]
        op: CacheOp,
    },
    /// Show or change global configuration
    Config {
        #[command(subcommand)]
        op: ConfigOp,
    },
    /// Generate shell completion scripts
    Completion { shell: Shell },
}

#[derive(Subcommand)]
enum ProjectOp {
    /// List all projects and configurations
    List,
    /// Show settings of one configuration
    Show {
        project: String,
        #[arg(short, long, default_value = "Debug")]
        config: String,
    },
    /// Change settings of one configuration
    Set {
        project: String,
        #[arg(short, long, default_value = "Debug")]
        config: String,
        #[arg(long)]
        source_dir: Option<String>,
        #[arg(long)]
        build_dir: Option<String>,
        /// cmake generator, e.g. "Unix Makefiles"
        #[arg(long)]
        generator: Option<String>,
        /// CMAKE_BUILD_TYPE
        #[arg(long)]
        build_type: Option<String>,
        /// Extra configure arguments, replaces the current list (give it last)
        #[arg(long, num_args = 0.., allow_hyphen_values = true)]
        args: Option<Vec<String>>,
        /// Project whose cmake tree builds this one ("" to clear)
        #[arg(long)]
        parent: Option<String>,
    },
    /// Enable cmake for a configuration
    Enable {
        project: String,
        #[arg(short, long, default_value = "Debug")]
        config: String,
    },
    /// Disable cmake for a configuration
    Disable {
        project: String,
        #[arg(short, long, default_value = "Debug")]
        config: String,
    },
}

#[derive(Subcommand)]
enum CacheOp {
    /// Print the cache file path
    Path,
    /// Remove cached help data
    Clean,
}

#[derive(Subcommand)]
enum ConfigOp {
    /// Print the configuration
    Show,
    /// Set the cmake program
    SetCmake { path: String },
    /// Set the make program used for builds
    SetMake { program: String },
    /// Set where help comes from (auto, man, lists)
    SetSource { source: String },
}

fn main() {
    enable_utf8_console();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("{} {:#}", "x".red(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let verbose = cli.verbose;
    let config = CmaidConfig::load()?;
    let opts = |dry_run| RunOptions { verbose, dry_run };

    match cli.command {
        Commands::Info => commands::help::show_info(&config, verbose),
        Commands::Versions => commands::help::list_versions(),
        Commands::Help {
            topic,
            name,
            filter,
            reload,
        } => commands::help::show_help(
            &config,
            verbose,
            &HelpQuery {
                topic: &topic,
                name: name.as_deref(),
                filter: filter.as_deref(),
                reload,
            },
        ),
        Commands::Generators { reload } => commands::help::show_generators(&config, verbose, reload),
        Commands::Copyright { reload } => commands::help::show_copyright(&config, verbose, reload),
        Commands::Parse { file, vars } => commands::parse::parse_file(&file, vars),
        Commands::Scan { dir } => commands::parse::scan(&dir),
        Commands::Project { op } => match op {
            ProjectOp::List => commands::project::list(),
            ProjectOp::Show { project, config } => commands::project::show(&project, &config),
            ProjectOp::Set {
                project,
                config,
                source_dir,
                build_dir,
                generator,
                build_type,
                args,
                parent,
            } => commands::project::set(
                &project,
                &config,
                SettingsUpdate {
                    source_directory: source_dir,
                    build_directory: build_dir,
                    generator,
                    build_type,
                    arguments: args,
                    parent_project: parent,
                },
            ),
            ProjectOp::Enable { project, config } => {
                commands::project::set_enabled(&project, &config, true)
            }
            ProjectOp::Disable { project, config } => {
                commands::project::set_enabled(&project, &config, false)
            }
        },
        Commands::Configure {
            project,
            config: build_config,
            dry_run,
        } => commands::project::configure(&config, &project, &build_config, opts(dry_run)),
        Commands::Build {
            project,
            config: build_config,
            project_only,
            dry_run,
        } => commands::project::build(
            &config,
            &project,
            &build_config,
            "",
            project_only,
            opts(dry_run),
        ),
        Commands::Clean {
            project,
            config: build_config,
            project_only,
            dry_run,
        } => commands::project::build(
            &config,
            &project,
            &build_config,
            "clean",
            project_only,
            opts(dry_run),
        ),
        Commands::Dirty {
            project,
            config: build_config,
        } => commands::project::dirty(&project, &build_config),
        Commands::Cache { op } => match op {
            CacheOp::Path => cache::print_path(),
            CacheOp::Clean => cache::clean(),
        },
        Commands::Config { op } => match op {
            ConfigOp::Show => commands::config::show(&config),
            ConfigOp::SetCmake { path } => commands::config::set_cmake(config, &path),
            ConfigOp::SetMake { program } => commands::config::set_make(config, &program),
            ConfigOp::SetSource { source } => commands::config::set_source(config, &source),
        },
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
            Ok(())
        }
    }
}
