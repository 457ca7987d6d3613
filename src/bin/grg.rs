use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, ValueEnum};
use grg_rs::session::{PlottersRenderer, Session, SessionOptions};
use grg_rs::viz::{ChartKind, ChartOptions};
use grg_rs::{Client, Credentials, Mode, RunConfig};
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "grg",
    version,
    about = "Graph the average ratings of a GoodReads author's books or a series",
    group(ArgGroup::new("mode").required(true).args(["author", "series"]))
)]
struct Cli {
    /// GoodReads client key, generate one at https://www.goodreads.com/api/keys
    #[arg(long, env = "GOODREADS_CLIENT_KEY", hide_env_values = true)]
    client_key: String,
    /// GoodReads client secret, generate one at https://www.goodreads.com/api/keys
    #[arg(long, env = "GOODREADS_CLIENT_SECRET", hide_env_values = true)]
    client_secret: String,
    /// Author mode: every URL is an author page
    #[arg(long)]
    author: bool,
    /// Series mode: every URL is a series page
    #[arg(long)]
    series: bool,
    /// GoodReads URLs (or numeric ids), all authors or all series
    #[arg(required = true, value_name = "URL")]
    urls: Vec<String>,
    /// Keep only the first N books, makes graphs more compact/legible (0 = all)
    #[arg(long = "cut-off", value_name = "N")]
    cut_off: Option<usize>,
    /// Minimum number of ratings for a book to be graphed (author mode only)
    #[arg(long, value_name = "N")]
    min_num_ratings: Option<u64>,
    /// Sort the graph by average rating, highest first
    #[arg(long, default_value_t = false)]
    sort_by_rating: bool,
    /// Drop books whose title already appeared (e.g. across overlapping series)
    #[arg(long, default_value_t = false)]
    dedup_titles: bool,
    /// After graphing, prompt for more URLs
    #[arg(long, default_value_t = false)]
    prompt_more_urls: bool,
    /// After each graph, prompt for a new cutoff
    #[arg(long, default_value_t = false)]
    prompt_new_cutoff: bool,
    /// One graph per URL instead of one merged graph
    #[arg(long, default_value_t = false)]
    per_url: bool,
    /// Chart path (.svg or .png); later charts of the session get -2, -3, … suffixes
    #[arg(long, default_value = "goodreads_ratings.svg")]
    plot: PathBuf,
    /// Chart kind
    #[arg(long, value_enum, default_value_t = KindArg::Scatter)]
    kind: KindArg,
    /// Width of the plot (default 1000).
    #[arg(long, default_value_t = 1000)]
    width: u32,
    /// Height of the plot (default 600).
    #[arg(long, default_value_t = 600)]
    height: u32,
    /// Chart title (derived from the author/series names if omitted)
    #[arg(long)]
    title: Option<String>,
    /// TTF/OTF font for chart text (system fonts are searched otherwise)
    #[arg(long, env = "GRG_FONT")]
    font: Option<PathBuf>,
    /// Print summary statistics to stdout
    #[arg(long, default_value_t = false)]
    stats: bool,
    /// Print the graphed books as JSON to stdout
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Locale for number formatting in stats (e.g., en, de, fr)
    #[arg(long, default_value = "en")]
    locale: String,
    /// GoodReads API host
    #[arg(long, env = "GRG_API_BASE", default_value = "https://www.goodreads.com")]
    api_base: String,
    /// More log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    Scatter,
    Bar,
    Line,
    LinePoints,
}

impl From<KindArg> for ChartKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Scatter => ChartKind::Scatter,
            KindArg::Bar => ChartKind::Bar,
            KindArg::Line => ChartKind::Line,
            KindArg::LinePoints => ChartKind::LinePoints,
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    // Credentials may live in a .env next to where grg runs.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mode = if cli.series { Mode::Series } else { Mode::Author };
    let credentials = Credentials::new(&cli.client_key, &cli.client_secret)?;
    let client = Client::new(credentials)
        .context("build http client")?
        .with_base_url(cli.api_base);

    let run = RunConfig {
        min_num_ratings: cli.min_num_ratings,
        sort_by_rating: cli.sort_by_rating,
        dedup_titles: cli.dedup_titles,
        ..RunConfig::new(mode)
    }
    .with_cutoff(cli.cut_off);

    let mut opts = SessionOptions::new(run, cli.plot);
    opts.chart = ChartOptions {
        width: cli.width,
        height: cli.height,
        kind: cli.kind.into(),
        title: cli.title,
        font: cli.font,
    };
    opts.per_url = cli.per_url;
    opts.prompt_more_urls = cli.prompt_more_urls;
    opts.prompt_new_cutoff = cli.prompt_new_cutoff;
    opts.print_stats = cli.stats;
    opts.print_json = cli.json;
    opts.locale = cli.locale;

    let mut renderer = PlottersRenderer;
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut prompts = io::stderr();
    let mut out = io::stdout().lock();
    let mut session = Session::new(
        opts,
        &client,
        &mut renderer,
        &mut input,
        &mut prompts,
        &mut out,
    );
    session.run(&cli.urls)
}
