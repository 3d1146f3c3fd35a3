use crate::{Config, Pdf, PdfOptionsUpdate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "chrome-pdf")]
#[command(about = "Render files, URLs, markup or templates to PDF via headless Chrome")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, help = "Configuration file path (JSON)")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Chrome executable path")]
    pub chrome_binary: Option<String>,

    #[arg(long, help = "Navigation timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(long, help = "Security token sent as X-Security-Token header")]
    pub security_token: Option<String>,

    #[arg(long, help = "Enable verbose logging")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a URL
    Url {
        #[arg(help = "URL to render")]
        url: String,

        #[arg(short, long, help = "Output PDF path")]
        output: PathBuf,

        #[arg(long, help = "Emulate PhantomJS page sizing and User-Agent")]
        emulate_phantomjs: bool,

        #[arg(long, help = "Print options as JSON, e.g. '{\"margin_top\": 0.5}'")]
        options: Option<String>,
    },

    /// Render a local HTML file
    File {
        #[arg(help = "Path to the HTML file")]
        input: PathBuf,

        #[arg(short, long, help = "Output PDF path")]
        output: PathBuf,

        #[arg(long, help = "Emulate PhantomJS page sizing and User-Agent")]
        emulate_phantomjs: bool,

        #[arg(long, help = "Print options as JSON")]
        options: Option<String>,
    },

    /// Render raw markup read from a file, or stdin when omitted
    Html {
        #[arg(help = "Path to a markup file; reads stdin when omitted")]
        input: Option<PathBuf>,

        #[arg(short, long, help = "Output PDF path")]
        output: PathBuf,

        #[arg(long, help = "Print options as JSON")]
        options: Option<String>,
    },

    /// Render a template from the template directory
    View {
        #[arg(help = "Template name, e.g. invoice.html")]
        template: String,

        #[arg(short, long, help = "Output PDF path")]
        output: PathBuf,

        #[arg(long, help = "JSON file with template data")]
        data: Option<PathBuf>,

        #[arg(long, help = "Template directory override")]
        template_dir: Option<PathBuf>,

        #[arg(long, help = "Print options as JSON")]
        options: Option<String>,
    },
}

pub struct CliRunner {
    pub config: Config,
}

impl CliRunner {
    pub fn new(mut config: Config, args: &Cli) -> Self {
        // CLI args win over file and environment
        if let Some(chrome_binary) = &args.chrome_binary {
            config.chrome_binary = chrome_binary.clone();
        }
        if let Some(timeout) = args.timeout {
            config.timeout_secs = timeout;
        }
        if let Some(token) = &args.security_token {
            config.security_token = Some(token.clone());
        }

        Self { config }
    }

    pub async fn run(&self, command: Commands) -> anyhow::Result<()> {
        match command {
            Commands::Url {
                url,
                output,
                emulate_phantomjs,
                options,
            } => {
                let mut pdf = Pdf::with_config(self.config.clone()).load_url(&url);
                if emulate_phantomjs {
                    pdf = pdf.emulate_phantomjs();
                }
                pdf = apply_options(pdf, options.as_deref())?;
                self.save(pdf, &output).await
            }
            Commands::File {
                input,
                output,
                emulate_phantomjs,
                options,
            } => {
                let mut pdf = Pdf::with_config(self.config.clone()).load_file(&input);
                if emulate_phantomjs {
                    pdf = pdf.emulate_phantomjs();
                }
                pdf = apply_options(pdf, options.as_deref())?;
                self.save(pdf, &output).await
            }
            Commands::Html {
                input,
                output,
                options,
            } => {
                let markup = match input {
                    Some(path) => tokio::fs::read_to_string(&path).await?,
                    None => {
                        use tokio::io::AsyncReadExt;
                        let mut buffer = String::new();
                        tokio::io::stdin().read_to_string(&mut buffer).await?;
                        buffer
                    }
                };
                let pdf = apply_options(
                    Pdf::with_config(self.config.clone()).load_html(markup),
                    options.as_deref(),
                )?;
                self.save(pdf, &output).await
            }
            Commands::View {
                template,
                output,
                data,
                template_dir,
                options,
            } => {
                let data = match data {
                    Some(path) => {
                        let raw = tokio::fs::read_to_string(&path).await?;
                        serde_json::from_str(&raw)?
                    }
                    None => serde_json::json!({}),
                };
                let mut pdf = Pdf::with_config(self.config.clone()).load_view(&template, data);
                if let Some(dir) = template_dir {
                    pdf = pdf.set_template_dir(dir);
                }
                pdf = apply_options(pdf, options.as_deref())?;
                self.save(pdf, &output).await
            }
        }
    }

    async fn save(&self, mut pdf: Pdf, output: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        pdf.save(output).await?;
        info!("PDF written to {}", output.display());
        println!("PDF written to {}", output.display());
        Ok(())
    }
}

fn apply_options(pdf: Pdf, options: Option<&str>) -> anyhow::Result<Pdf> {
    match options {
        Some(raw) => {
            let update: PdfOptionsUpdate = serde_json::from_str(raw)?;
            Ok(pdf.set_options(update))
        }
        None => Ok(pdf),
    }
}

pub fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    Ok(())
}
