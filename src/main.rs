// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "camera-qc")]
#[command(about = "Camera access and inspection workflows for QC stations")]
#[command(version = env!("GIT_VERSION"))]
struct Cli {
    /// Station directory holding workflows/, resources/ and output/
    /// (overrides the config file)
    #[arg(short, long, global = true)]
    base: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available cameras
    List {
        /// Show every video device node instead of probing cameras
        #[arg(short, long)]
        all: bool,
    },

    /// Capture a single frame
    Capture {
        /// Camera index to use (from 'camera-qc list', default: last used)
        #[arg(short, long)]
        camera: Option<u32>,

        /// Read frames from an image file instead of a camera
        #[arg(short, long, conflicts_with = "camera")]
        source: Option<PathBuf>,

        /// Output file or directory (default: <base>/output/capture_TIMESTAMP.jpg)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Capture width
        #[arg(long, requires = "height")]
        width: Option<u32>,

        /// Capture height
        #[arg(long, requires = "width")]
        height: Option<u32>,

        /// Output format: jpeg or png
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Scan for QR codes
    Scan {
        /// Camera index to use (default: last used)
        #[arg(short, long)]
        camera: Option<u32>,

        /// Read frames from an image file instead of a camera
        #[arg(short, long, conflicts_with = "camera")]
        source: Option<PathBuf>,

        /// Keep scanning until a code is found (press Ctrl+C to stop)
        #[arg(short, long)]
        watch: bool,
    },

    /// List workflows
    Workflows {
        /// Only list one type: qc or maintenance
        #[arg(short = 't', long = "type")]
        workflow_type: Option<String>,
    },

    /// Print a workflow document
    Show {
        /// Workflow file path, name, or file stem
        workflow: String,

        /// Only search one type: qc or maintenance
        #[arg(short = 't', long = "type")]
        workflow_type: Option<String>,
    },

    /// Resolve a reference image path
    Reference {
        /// Workflow type: qc or maintenance
        workflow_type: String,

        /// Image file name
        image: String,
    },

    /// Check cameras, QR decoder and directory layout
    Check,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=camera_qc=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let mut config = camera_qc::Config::load();
    if let Some(base) = cli.base {
        config.base_path = Some(base);
    }

    match cli.command {
        Commands::List { all } => cli::list_cameras(&config, all),
        Commands::Capture {
            camera,
            source,
            output,
            width,
            height,
            format,
        } => cli::capture(
            &mut config,
            cli::CaptureArgs {
                camera,
                source,
                output,
                width,
                height,
                format,
            },
        ),
        Commands::Scan {
            camera,
            source,
            watch,
        } => cli::scan(&config, camera, source, watch),
        Commands::Workflows { workflow_type } => {
            cli::list_workflows(&config, workflow_type.as_deref())
        }
        Commands::Show {
            workflow,
            workflow_type,
        } => cli::show_workflow(&config, &workflow, workflow_type.as_deref()),
        Commands::Reference {
            workflow_type,
            image,
        } => cli::reference_image(&config, &workflow_type, &image),
        Commands::Check => cli::system_check(&config),
    }
}
