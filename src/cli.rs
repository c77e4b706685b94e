use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Play audio in realtime
    #[arg(long, default_value_t = true, num_args = 0..=1, default_missing_value = "true")]
    pub play: bool,

    /// Write the soundtrack to a wav file
    #[arg(long)]
    pub wav: Option<String>,

    /// Path to config TOML
    #[arg(long, default_value = "config.toml")]
    pub config: String,

    /// Run with synthetic hand/video producers (no camera needed)
    #[arg(long, default_value_t = false)]
    pub demo: bool,

    /// Seed for the scene's random state (default: random)
    #[arg(long)]
    pub seed: Option<u64>,
}
