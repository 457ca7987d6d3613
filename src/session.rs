//! One CLI invocation: fetch, shape, print, render, and optionally keep
//! prompting for more URLs or new cutoffs.
//!
//! The session talks to the outside world only through [`RatingsSource`],
//! [`Renderer`] and the reader/writers it is handed, so the prompt loops can
//! be driven from tests.

use crate::aggregate;
use crate::api::{Fetched, RatingsSource};
use crate::config::RunConfig;
use crate::error::GrapherError;
use crate::models::BookRecord;
use crate::pipeline;
use crate::stats;
use crate::target::{Target, parse_targets};
use crate::viz::{self, ChartOptions, util::derive_caption};
use anyhow::{Context, Result, bail};
use log::{info, warn};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

pub const MORE_URLS_PROMPT: &str = "Enter some more urls separated by spaces (Enter to cancel): ";
pub const NEW_CUTOFF_PROMPT: &str = "New cut off number (Enter to cancel): ";

/// Where finished record lists go to become pictures.
pub trait Renderer {
    fn render(&mut self, records: &[BookRecord], path: &Path, opts: &ChartOptions) -> Result<()>;
}

/// Renders with plotters to SVG/PNG files.
#[derive(Debug, Default)]
pub struct PlottersRenderer;

impl Renderer for PlottersRenderer {
    fn render(&mut self, records: &[BookRecord], path: &Path, opts: &ChartOptions) -> Result<()> {
        viz::plot_ratings(records, path, opts)
    }
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub run: RunConfig,
    pub chart: ChartOptions,
    /// First chart of the session; later ones get `-2`, `-3`, … suffixes.
    pub plot_path: PathBuf,
    /// One chart per URL instead of one merged chart.
    pub per_url: bool,
    pub prompt_more_urls: bool,
    pub prompt_new_cutoff: bool,
    pub print_stats: bool,
    pub print_json: bool,
    /// Locale tag for thousands separators in stats output.
    pub locale: String,
}

impl SessionOptions {
    pub fn new(run: RunConfig, plot_path: impl Into<PathBuf>) -> Self {
        Self {
            run,
            chart: ChartOptions::default(),
            plot_path: plot_path.into(),
            per_url: false,
            prompt_more_urls: false,
            prompt_new_cutoff: false,
            print_stats: false,
            print_json: false,
            locale: "en".into(),
        }
    }
}

/// `true` when `err` must end the process even in interactive mode.
pub fn is_fatal(err: &anyhow::Error) -> bool {
    err.downcast_ref::<GrapherError>()
        .is_some_and(GrapherError::is_fatal)
}

/// `base` for the first chart, `<stem>-<n>.<ext>` next to it afterwards.
pub fn numbered_chart_path(base: &Path, n: usize) -> PathBuf {
    if n <= 1 {
        return base.to_path_buf();
    }
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "chart".to_string());
    let name = match base.extension() {
        Some(ext) => format!("{stem}-{n}.{}", ext.to_string_lossy()),
        None => format!("{stem}-{n}"),
    };
    base.with_file_name(name)
}

pub struct Session<'a> {
    source: &'a dyn RatingsSource,
    renderer: &'a mut dyn Renderer,
    input: &'a mut dyn BufRead,
    /// Prompts, progress and interactive error reports.
    prompts: &'a mut dyn Write,
    /// Stats and JSON.
    out: &'a mut dyn Write,
    opts: SessionOptions,
    written: Vec<PathBuf>,
}

impl<'a> Session<'a> {
    pub fn new(
        opts: SessionOptions,
        source: &'a dyn RatingsSource,
        renderer: &'a mut dyn Renderer,
        input: &'a mut dyn BufRead,
        prompts: &'a mut dyn Write,
        out: &'a mut dyn Write,
    ) -> Self {
        Self {
            source,
            renderer,
            input,
            prompts,
            out,
            opts,
            written: Vec::new(),
        }
    }

    /// Chart files written so far, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Process the initial URLs, then the "more URLs" loop if enabled.
    pub fn run(&mut self, urls: &[String]) -> Result<()> {
        let first = self.process(&urls.join(" "));
        self.settle(first)?;

        if self.opts.prompt_more_urls {
            while let Some(line) = self.prompt(MORE_URLS_PROMPT)? {
                if line.is_empty() {
                    break;
                }
                let res = self.process(&line);
                self.settle(res)?;
            }
        }
        Ok(())
    }

    // With a URL prompt to go back to, only auth failures end the session.
    fn settle(&mut self, res: Result<()>) -> Result<()> {
        match res {
            Ok(()) => Ok(()),
            Err(e) if self.opts.prompt_more_urls && !is_fatal(&e) => {
                warn!("{e:#}");
                writeln!(self.prompts, "error: {e:#}")?;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn process(&mut self, line: &str) -> Result<()> {
        let targets = parse_targets(line, self.opts.run.mode)?;
        if targets.is_empty() {
            bail!("no goodreads urls given");
        }
        if self.opts.per_url {
            return self.process_each(&targets);
        }

        let fetched = self.fetch_all(&targets)?;
        let labels: Vec<String> = fetched.iter().map(|f| f.label.clone()).collect();
        let records = aggregate::merge(fetched.into_iter().map(|f| f.records));
        self.chart_loop(&labels, &records)
    }

    // Every URL is its own run: a failing one is reported and the rest are
    // still charted. Auth failures stop immediately.
    fn process_each(&mut self, targets: &[Target]) -> Result<()> {
        let mut failed = 0usize;
        for t in targets {
            let res = self.fetch_one(t).and_then(|f| {
                self.chart_loop(&[f.label], &f.records)
                    .with_context(|| format!("chart {t}"))
            });
            match res {
                Ok(()) => {}
                Err(e) if is_fatal(&e) => return Err(e),
                Err(e) => {
                    failed += 1;
                    warn!("{e:#}");
                    writeln!(self.prompts, "error: {e:#}")?;
                }
            }
        }
        if failed > 0 {
            bail!("{failed} of {} urls failed", targets.len());
        }
        Ok(())
    }

    fn fetch_all(&mut self, targets: &[Target]) -> Result<Vec<Fetched>> {
        targets.iter().map(|t| self.fetch_one(t)).collect()
    }

    fn fetch_one(&mut self, target: &Target) -> Result<Fetched> {
        writeln!(self.prompts, "Fetching {target}…")?;
        self.source
            .fetch(target)
            .with_context(|| format!("fetch {target}"))
    }

    // Render once, then keep re-cutting the same records while the user asks.
    fn chart_loop(&mut self, labels: &[String], records: &[BookRecord]) -> Result<()> {
        let mut cfg = self.opts.run.clone();
        loop {
            let shaped = pipeline::run(records, &cfg);
            self.emit(labels, &shaped)?;
            if !self.opts.prompt_new_cutoff {
                return Ok(());
            }
            match self.prompt_cutoff()? {
                Some(n) => cfg = cfg.with_cutoff(Some(n)),
                None => return Ok(()),
            }
        }
    }

    fn prompt_cutoff(&mut self) -> Result<Option<usize>> {
        while let Some(line) = self.prompt(NEW_CUTOFF_PROMPT)? {
            if line.is_empty() {
                return Ok(None);
            }
            match line.parse::<usize>() {
                Ok(0) => return Ok(None),
                Ok(n) => return Ok(Some(n)),
                Err(_) => writeln!(self.prompts, "`{line}` is not a whole number")?,
            }
        }
        Ok(None)
    }

    fn emit(&mut self, labels: &[String], records: &[BookRecord]) -> Result<()> {
        if records.is_empty() {
            bail!("no books left to plot after filtering");
        }
        if self.opts.print_json {
            serde_json::to_writer_pretty(&mut *self.out, records)?;
            writeln!(self.out)?;
        }
        if self.opts.print_stats {
            if let Some(s) = stats::summarize(records) {
                let line = stats::format_summary(&s, stats::map_locale(&self.opts.locale));
                writeln!(self.out, "{}  {line}", labels.join(", "))?;
            }
        }

        let path = numbered_chart_path(&self.opts.plot_path, self.written.len() + 1);
        let mut chart = self.opts.chart.clone();
        if chart.title.is_none() {
            chart.title = Some(derive_caption(labels));
        }
        self.renderer
            .render(records, &path, &chart)
            .with_context(|| format!("render {}", path.display()))?;
        info!("wrote {} books to {}", records.len(), path.display());
        writeln!(self.prompts, "Wrote plot of {} books to {}", records.len(), path.display())?;
        self.written.push(path);
        Ok(())
    }

    /// `None` on end of input.
    fn prompt(&mut self, msg: &str) -> Result<Option<String>> {
        write!(self.prompts, "{msg}")?;
        self.prompts.flush()?;
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(buf.trim().to_string()))
    }
}
