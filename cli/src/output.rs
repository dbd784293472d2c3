#[derive(Clone, Copy, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    /// Indented tree, one element per line
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}
