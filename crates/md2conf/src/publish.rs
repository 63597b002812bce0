//! Render and publish command.

use std::path::PathBuf;

use clap::Args;
use md2conf_config::{CliSettings, Config, NoticeMode, TocLayout};
use md2conf_confluence::{
    ConfluenceClient, ContentNormalizer, Document, PageRenderer, PublishOptions, PublishOutcome,
    PublishPlan, PublishRequest, Publisher,
};
use tracing::info;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for rendering and publishing a markdown file.
#[derive(Args)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct PublishArgs {
    /// Markdown file to convert.
    #[arg(short, long)]
    markdown_file: PathBuf,

    /// Path to configuration file (default: auto-discover md2conf.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Confluence space key.
    #[arg(short, long, env = "CONFLUENCE_SPACE")]
    space: Option<String>,

    /// Confluence username (full email address for API tokens).
    #[arg(short, long, env = "CONFLUENCE_USR")]
    username: Option<String>,

    /// Confluence password or API token.
    #[arg(short, long, env = "CONFLUENCE_PSW", hide_env_values = true)]
    password: Option<String>,

    /// Confluence URL, e.g. `https://example.atlassian.net/wiki`.
    #[arg(long, env = "CONFLUENCE_URL")]
    url: Option<String>,

    /// Parent page ID for new pages.
    #[arg(short, long)]
    ancestor_id: Option<String>,

    /// Page title (default: first heading of the markdown file).
    #[arg(long)]
    title: Option<String>,

    /// Add a table of contents.
    #[arg(long)]
    toc: bool,

    /// Table of contents layout: inline or sidebar.
    #[arg(long, value_name = "LAYOUT")]
    toc_layout: Option<TocLayout>,

    /// Always add the auto-generated notice, even without links.
    #[arg(long)]
    notice: bool,

    /// Never add the auto-generated notice.
    #[arg(long, conflicts_with = "notice")]
    no_notice: bool,

    /// Link to the CI job, shown in the notice.
    #[arg(long, env = "JOB_URL")]
    job_url: Option<String>,

    /// Link to the repository, shown in the notice.
    #[arg(long)]
    repo_url: Option<String>,

    /// Write the rendered page to a file instead of stdout.
    #[arg(short, long)]
    out_file: Option<PathBuf>,

    /// Publish to Confluence.
    #[arg(long)]
    publish: bool,

    /// Update the page even if its content is unchanged.
    #[arg(long)]
    force_update: bool,

    /// With --publish, show what publishing would do without writing.
    #[arg(long, requires = "publish")]
    dry_run: bool,
}

impl PublishArgs {
    /// Execute the command.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be read, configuration is invalid or
    /// publishing fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let notice = self.resolve_notice();
        let cli_settings = CliSettings {
            url: self.url,
            space: self.space,
            username: self.username,
            password: self.password,
            ancestor_id: self.ancestor_id,
            toc: self.toc.then_some(true),
            toc_layout: self.toc_layout,
            notice,
            job_url: self.job_url,
            repo_url: self.repo_url,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            info!("Using config {}", path.display());
        }

        let markdown = std::fs::read_to_string(&self.markdown_file).map_err(|source| {
            CliError::ReadMarkdown {
                path: self.markdown_file.clone(),
                source,
            }
        })?;

        let document = PageRenderer::new()
            .title(self.title.as_deref())
            .normalizer(ContentNormalizer::from_config(&config.render, &config.links))
            .render(&markdown);
        info!(
            "Rendered {} as '{}'",
            self.markdown_file.display(),
            document.title
        );

        if let Some(out_file) = &self.out_file {
            std::fs::write(out_file, &document.body)?;
            output.success(&format!("Wrote rendered page to {}", out_file.display()));
        }

        if !self.publish {
            if self.force_update {
                output.warning("--force-update has no effect without --publish");
            }
            if document.title.is_empty() {
                output.warning("No title found: add a heading or pass --title before publishing");
            }
            if self.out_file.is_none() {
                output.document(&document.body)?;
            }
            return Ok(());
        }

        Self::publish(&config, document, self.force_update, self.dry_run, &output)
    }

    /// `--no-notice` wins over the config file; `--notice` forces the panel.
    fn resolve_notice(&self) -> Option<NoticeMode> {
        self.no_notice
            .then_some(NoticeMode::Never)
            .or(self.notice.then_some(NoticeMode::Always))
    }

    fn publish(
        config: &Config,
        document: Document,
        force_update: bool,
        dry_run: bool,
        output: &Output,
    ) -> Result<(), CliError> {
        let settings = config.require_confluence()?;
        let client = ConfluenceClient::from_settings(&settings);
        info!("Confluence API: {}", client.api_url());

        let request = PublishRequest::new(&settings.space, document)
            .ancestor_id(settings.ancestor_id.as_deref())
            .force_update(force_update);
        let publisher = Publisher::new(
            &client,
            PublishOptions {
                server_normalize: settings.server_normalize,
            },
        );

        if dry_run {
            let plan = publisher.plan(&request)?;
            output.highlight(&describe_plan(&plan, &request));
            return Ok(());
        }

        match publisher.publish(&request)? {
            PublishOutcome::Created(page) => {
                output.success(&format!(
                    "Created page '{}' (id={}, version {})",
                    page.title, page.id, page.version
                ));
                if let Some(url) = page.web_url {
                    output.info(&url);
                }
            }
            PublishOutcome::Updated(page, previous_version) => {
                output.success(&format!(
                    "Updated page '{}' (id={}) from version {} to {}",
                    page.title, page.id, previous_version, page.version
                ));
                if let Some(url) = page.web_url {
                    output.info(&url);
                }
            }
            PublishOutcome::Skipped(page_id, reason) => {
                output.info(&format!(
                    "Skipped page {page_id}: {reason} (use --force-update to publish anyway)"
                ));
            }
        }

        Ok(())
    }
}

fn describe_plan(plan: &PublishPlan, request: &PublishRequest) -> String {
    match plan {
        PublishPlan::Create => format!(
            "Dry run: would create page '{}' in space {}",
            request.title, request.space_key
        ),
        PublishPlan::Update { page, forced } => format!(
            "Dry run: would update page '{}' (id={}) from version {} to {}{}",
            page.title,
            page.id,
            page.version,
            page.next_version().map_or_else(|| "?".to_owned(), |v| v.to_string()),
            if *forced { " (forced)" } else { "" }
        ),
        PublishPlan::Skip { page } => format!(
            "Dry run: page '{}' (id={}) is up to date",
            page.title, page.id
        ),
    }
}
