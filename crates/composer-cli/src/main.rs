use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use composer_config::Config;
use composer_engine::merge_tags::{
    ALL_CATEGORIES, default_catalog, find_merge_tags, load_groups_from_path, resolve_with,
    token_path,
};
use composer_engine::{Editor, EditorMode, MergeTagCatalog, PreviewFormat, TextRange};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process;

/// Preview message templates and browse the merge tags they can use
#[derive(Parser, Debug)]
#[command(name = "template-composer", version, about, long_about = None)]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Merge-tag catalog (JSON), overriding the configured one
    #[arg(long, global = true, value_name = "PATH")]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a template against a data context and render the preview
    Preview {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// JSON data context
        #[arg(long, value_name = "PATH", conflicts_with = "example_data")]
        context: Option<PathBuf>,

        /// Fill tags with the catalog's example values
        #[arg(long)]
        example_data: bool,

        #[arg(long, value_enum)]
        format: Option<FormatArg>,

        /// Emit a sandboxed <iframe> instead of a bare document
        #[arg(long)]
        iframe: bool,
    },

    /// List merge tags, optionally searched or filtered by category
    Tags {
        #[arg(short, long, conflicts_with = "category")]
        search: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        /// Print the groups as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report tags the catalog does not offer and tags left unresolved
    Check {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[arg(long, value_name = "PATH")]
        context: Option<PathBuf>,
    },

    /// Print the template as the visual editor stores it
    Normalize {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Insert a merge tag into a template and print the result
    Insert {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Tag path or token, e.g. `resident.name` or `{{resident.name}}`
        #[arg(value_name = "TAG")]
        tag: String,

        /// Character offset in the markup; appends when omitted
        #[arg(long, value_name = "N")]
        at: Option<usize>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Html,
    Plain,
}

impl From<FormatArg> for PreviewFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Html => PreviewFormat::Html,
            FormatArg::Plain => PreviewFormat::Plain,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let catalog = load_catalog(cli.catalog.as_deref(), &config)?;

    match cli.command {
        Command::Preview {
            file,
            context,
            example_data,
            format,
            iframe,
        } => {
            let content = read_template(&file)?;
            let context = match context {
                Some(path) => read_context(&path)?,
                None if example_data => catalog.example_context(),
                None => Value::Null,
            };
            let format = format.map_or(config.preview.format, PreviewFormat::from);
            print!("{}", preview(&config, &content, &context, format, iframe));
        }
        Command::Tags {
            search,
            category,
            json,
        } => {
            let groups = match (search, category) {
                (Some(query), _) => catalog.search(&query),
                (None, Some(category)) => catalog.filter_by_category(&category),
                (None, None) => catalog.filter_by_category(ALL_CATEGORIES),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&groups)?);
            } else if groups.is_empty() {
                println!("No merge tags found");
            } else {
                for group in &groups {
                    println!("{} ({})", group.name, group.category);
                    for tag in &group.tags {
                        println!("  {:<32} {}", tag.tag, tag.name);
                    }
                }
            }
        }
        Command::Check { file, context } => {
            let content = read_template(&file)?;
            let context = match context {
                Some(path) => read_context(&path)?,
                None => catalog.example_context(),
            };
            let report = check(&catalog, &content, &context);
            for line in &report {
                println!("{line}");
            }
            if !report.is_empty() {
                process::exit(1);
            }
            println!("All {} tags resolve", find_merge_tags(&content).len());
        }
        Command::Normalize { file } => {
            let content = read_template(&file)?;
            let mut editor = Editor::with_mode(&content, config.editor.initial_mode);
            editor.switch_mode(EditorMode::Visual);
            println!("{}", editor.get_content());
        }
        Command::Insert { file, tag, at } => {
            let content = read_template(&file)?;
            let token = as_token(&tag);
            if catalog.find_by_tag(&token).is_none() {
                log::warn!("{token} is not in the merge tag catalog");
            }
            println!("{}", insert_tag(&content, &token, at));
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config_path = path.map_or_else(Config::config_path, Path::to_path_buf);
    log::debug!("Config path: {}", config_path.display());
    let config = Config::load_from_path(&config_path)
        .with_context(|| format!("Failed to load config file '{}'", config_path.display()))?;
    Ok(config.unwrap_or_default())
}

fn load_catalog(path: Option<&Path>, config: &Config) -> Result<MergeTagCatalog> {
    let Some(path) = path.or(config.catalog_path.as_deref()) else {
        return Ok(default_catalog());
    };
    let groups = load_groups_from_path(path)
        .with_context(|| format!("Failed to load merge tag catalog '{}'", path.display()))?;
    log::info!("Loaded {} merge tag groups from {}", groups.len(), path.display());
    Ok(MergeTagCatalog::from_groups(groups))
}

fn read_template(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read template '{}'", path.display()))
}

fn read_context(path: &Path) -> Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read data context '{}'", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Data context '{}' is not valid JSON", path.display()))
}

fn preview(
    config: &Config,
    content: &str,
    context: &Value,
    format: PreviewFormat,
    iframe: bool,
) -> String {
    let mut options = config.resolve_options();
    options.escape_html |= format == PreviewFormat::Html;
    let resolved = resolve_with(content, context, options);
    for tag in &resolved.unresolved_tags {
        log::warn!("unresolved merge tag {tag}");
    }

    let output = config.preview_pipeline().render(&resolved.text, format);
    if iframe {
        output.to_iframe()
    } else {
        output.to_document()
    }
}

fn check(catalog: &MergeTagCatalog, content: &str, context: &Value) -> Vec<String> {
    let mut report: Vec<String> = catalog
        .unknown_tags(content)
        .into_iter()
        .map(|tag| format!("unknown: {tag}"))
        .collect();
    let resolved = resolve_with(content, context, Default::default());
    report.extend(
        resolved
            .unresolved_tags
            .into_iter()
            .map(|tag| format!("unresolved: {tag}")),
    );
    report
}

/// `resident.name` becomes `{{resident.name}}`; tokens pass through.
fn as_token(tag: &str) -> String {
    let tag = tag.trim();
    if token_path(tag).is_some() {
        tag.to_string()
    } else {
        format!("{{{{{tag}}}}}")
    }
}

fn insert_tag(content: &str, token: &str, at: Option<usize>) -> String {
    let mut editor = Editor::with_mode(content, EditorMode::Source);
    if let Some(offset) = at {
        editor.select_source(TextRange::caret(offset));
    }
    editor.insert_at_cursor(token);
    editor.get_content()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_as_token() {
        assert_eq!(as_token("resident.name"), "{{resident.name}}");
        assert_eq!(as_token(" {{ resident.name }} "), "{{ resident.name }}");
    }

    #[test]
    fn test_insert_tag_at_offset_and_end() {
        assert_eq!(
            insert_tag("<p>Dear ,</p>", "{{resident.first_name}}", Some(8)),
            "<p>Dear {{resident.first_name}},</p>"
        );
        assert_eq!(insert_tag("AB", "{{date.today}}", None), "AB{{date.today}}");
    }

    #[test]
    fn test_check_reports_unknown_and_unresolved() {
        let catalog = default_catalog();
        let report = check(
            &catalog,
            "{{resident.name}} {{pool.hours}}",
            &json!({ "resident": { "name": "Ann" } }),
        );
        assert_eq!(report, vec!["unknown: {{pool.hours}}", "unresolved: {{pool.hours}}"]);
    }

    #[test]
    fn test_preview_escapes_values_for_html() {
        let config = Config::default();
        let document = preview(
            &config,
            "<p>{{resident.name}}</p>",
            &json!({ "resident": { "name": "<b>Ann</b>" } }),
            PreviewFormat::Html,
            false,
        );
        assert!(document.contains("<p>&lt;b&gt;Ann&lt;/b&gt;</p>"));
    }

    #[test]
    fn test_empty_template_previews_placeholder() {
        let mut config = Config::default();
        config.preview.placeholder = "Nothing here".to_string();
        let document = preview(&config, "  ", &Value::Null, PreviewFormat::Plain, false);
        assert!(document.contains("Nothing here"));
    }

    #[test]
    fn test_catalog_from_config_path() {
        let temp_dir = TempDir::new().unwrap();
        let catalog_file = temp_dir.path().join("tags.json");
        std::fs::write(
            &catalog_file,
            r#"[{"category":"pool","name":"Pool","tags":[{"id":"p1","tag":"{{pool.hours}}","name":"Pool Hours","category":"pool"}]}]"#,
        )
        .unwrap();
        let config = Config {
            catalog_path: Some(catalog_file),
            ..Config::default()
        };

        let catalog = load_catalog(None, &config).unwrap();
        assert!(catalog.find_by_tag("{{pool.hours}}").is_some());
        assert!(load_catalog(Some(Path::new("/nonexistent/tags.json")), &config).is_err());
    }
}
