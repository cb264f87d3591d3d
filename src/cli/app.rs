use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "uspacy-import")]
#[command(about = "Update Uspacy entities from a CSV/XLSX file")]
#[command(
    long_about = "Update Uspacy entities from a CSV/XLSX file. The first row must contain \
                  field IDs as in Uspacy, and the first column is used to search entities \
                  unless --search-field says otherwise."
)]
pub struct Cli {
    /// Base URL like https://{domain}.uspacy.ua
    #[arg(long)]
    pub base_url: String,

    /// Entity name, e.g. companies or contacts
    #[arg(long)]
    pub entity: String,

    /// Path to CSV/XLSX file (first row is field IDs)
    #[arg(long)]
    pub file: PathBuf,

    /// Field ID for lookup (defaults to the first column in the file)
    #[arg(long)]
    pub search_field: Option<String>,

    /// Header name for webhook auth
    #[arg(long, default_value = "Authorization")]
    pub webhook_header: String,

    /// Token for webhook auth (default: env USPACY_WEBHOOK_TOKEN)
    #[arg(long)]
    pub webhook_token: Option<String>,

    /// Do not patch, only log what would be updated
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_flags_parse() {
        let cli = Cli::try_parse_from([
            "uspacy-import",
            "--base-url",
            "https://acme.uspacy.ua",
            "--entity",
            "companies",
            "--file",
            "input.csv",
        ])
        .unwrap();

        assert_eq!(cli.base_url, "https://acme.uspacy.ua");
        assert_eq!(cli.entity, "companies");
        assert_eq!(cli.file, PathBuf::from("input.csv"));
        assert_eq!(cli.search_field, None);
        assert_eq!(cli.webhook_header, "Authorization");
        assert!(!cli.dry_run);
    }

    #[test]
    fn missing_required_flag_is_an_error() {
        let result = Cli::try_parse_from(["uspacy-import", "--entity", "companies"]);
        assert!(result.is_err());
    }
}
