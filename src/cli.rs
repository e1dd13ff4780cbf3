use clap::Parser;
use std::path::PathBuf;

use crate::config::paths::expand_tilde;
use crate::config::{SearchConfig, DEFAULT_SORT_KEY};

const DISCUSSION: &str = "\
Query predicates use the comparison predicate syntax (AND, OR, NOT, CONTAINS[c],
BEGINSWITH, ENDSWITH, LIKE) and are rewritten for mdfind. Native mdfind queries
(&&, ||, \"*value*\"cd) are passed through as written.

Find PDF files:

  mdscriptfilter 'kMDItemContentType == \"com.adobe.pdf\"'

Find text files mentioning \"imagination\" (case-insensitive):

  mdscriptfilter 'kMDItemContentType == \"public.plain-text\" AND kMDItemTextContent CONTAINS[c] \"imagination\"'

Find screenshots on the Desktop, most recently added first:

  mdscriptfilter 'kMDItemIsScreenCapture == 1' --positive-scope ~/Desktop --sort-key 'kMDItemDateAdded'

Syntax reference:

  https://developer.apple.com/documentation/foundation/nspredicate
  https://developer.apple.com/library/archive/documentation/Carbon/Conceptual/SpotlightQuery/Concepts/QueryFormat.html
  https://developer.apple.com/documentation/coreservices/file_metadata/mditem/common_metadata_attribute_keys";

#[derive(Parser, Debug)]
#[command(
    name = "mdscriptfilter",
    version,
    about = "Search Spotlight database and output result as Script Filter (or Grid View) JSON for Alfred.",
    after_help = DISCUSSION
)]
pub struct CliArgs {
    /// The query predicate for the search.
    pub input_query: String,

    /// Restrict search to folder. Can be used multiple times.
    #[arg(long, value_name = "DIR")]
    pub positive_scope: Vec<String>,

    /// Exclude folder from results. Can be used multiple times.
    #[arg(long, value_name = "DIR")]
    pub negative_scope: Vec<String>,

    /// Exclude user Library folder from results.
    #[arg(long)]
    pub exclude_library: bool,

    /// Metadata field to use for sorting.
    #[arg(long, default_value = DEFAULT_SORT_KEY)]
    pub sort_key: String,

    /// Sort in ascending order.
    #[arg(long)]
    pub sort_ascending: bool,

    /// Preview images and PDFs for Grid View.
    #[arg(long)]
    pub display_images: bool,

    /// Do not show subtitles.
    #[arg(long)]
    pub hide_subtitle: bool,

    /// Use full path for filtering.
    #[arg(long)]
    pub match_path: bool,
}

impl CliArgs {
    /// Resolves the arguments against `home`, expanding `~` in scopes.
    pub fn into_config(self, home: Option<PathBuf>) -> SearchConfig {
        let expand = |scopes: &[String]| -> Vec<PathBuf> {
            scopes
                .iter()
                .map(|raw| expand_tilde(raw, home.as_deref()))
                .collect()
        };
        let positive_scopes = expand(&self.positive_scope);
        let negative_scopes = expand(&self.negative_scope);

        SearchConfig {
            predicate: self.input_query,
            positive_scopes,
            negative_scopes,
            exclude_library: self.exclude_library,
            sort_key: self.sort_key,
            sort_ascending: self.sort_ascending,
            display_images: self.display_images,
            hide_subtitle: self.hide_subtitle,
            match_path: self.match_path,
            home,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("mdscriptfilter").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["kMDItemFSName == '*.txt'"]).into_config(Some("/Users/me".into()));
        assert_eq!(config.predicate, "kMDItemFSName == '*.txt'");
        assert!(config.positive_scopes.is_empty());
        assert_eq!(config.effective_scopes(), vec![PathBuf::from("/Users/me")]);
        assert_eq!(config.sort_key, "kMDItemFSName");
        assert!(!config.sort_ascending);
        assert!(!config.exclude_library);
        assert!(!config.display_images);
        assert!(!config.hide_subtitle);
        assert!(!config.match_path);
    }

    #[test]
    fn test_repeated_scopes_and_flags() {
        let config = parse(&[
            "kMDItemIsScreenCapture == 1",
            "--positive-scope",
            "~/Desktop",
            "--positive-scope",
            "/Volumes/Shots",
            "--negative-scope",
            "~/Desktop/old",
            "--exclude-library",
            "--sort-key",
            "kMDItemDateAdded",
            "--sort-ascending",
            "--display-images",
            "--hide-subtitle",
            "--match-path",
        ])
        .into_config(Some("/Users/me".into()));

        assert_eq!(
            config.positive_scopes,
            vec![
                PathBuf::from("/Users/me/Desktop"),
                PathBuf::from("/Volumes/Shots")
            ]
        );
        assert_eq!(
            config.negative_scopes,
            vec![PathBuf::from("/Users/me/Desktop/old")]
        );
        assert_eq!(config.sort_key, "kMDItemDateAdded");
        assert!(config.exclude_library);
        assert!(config.sort_ascending);
        assert!(config.display_images);
        assert!(config.hide_subtitle);
        assert!(config.match_path);
    }

    #[test]
    fn test_help_examples_translate_for_mdfind() {
        let example = DISCUSSION
            .lines()
            .find(|line| line.trim_start().starts_with("mdscriptfilter") && line.contains("CONTAINS[c]"))
            .unwrap();
        let predicate = example.split('\'').nth(1).unwrap();
        assert_eq!(
            crate::core::to_mdfind_query(predicate),
            r#"kMDItemContentType == "public.plain-text" && kMDItemTextContent == "*imagination*"c"#
        );
    }

    #[test]
    fn test_missing_predicate_is_rejected() {
        assert!(CliArgs::try_parse_from(["mdscriptfilter"]).is_err());
    }
}
