use floatball::config::{self, AppConfig};
use floatball::content_filter::ContentFilter;
use floatball::engine::{self, EngineKind};
use floatball::settings::{self, EngineOrderDraft, EngineOrderEntry, SettingsStore, ThemeMode};
use floatball::webview::{LoadDecision, PageLoader};
use std::path::PathBuf;
use std::process::ExitCode;

const USAGE: &str = "usage: floatball [--config PATH] <command>

commands:
  engines [ai|search]        list known engines
  order                      show the engine order
  order add <name> [url]     append an engine (url required for unknown names)
  order move <from> <to>     move an engine in the order
  order remove <index>       remove an engine from the order
  order reset                restore the default order
  search <engine> <query..>  print the search URL for an engine
  open <input..>             resolve input with the first engine and filter it
  get <key>                  print a boolean setting
  set <key> <true|false>     write a boolean setting
  theme [system|light|dark]  show or change the theme
  api-key <engine> [key]     show or change an engine's API key";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (config_path, command) = match split_config_flag(&args) {
        Ok(parts) => parts,
        Err(e) => {
            eprintln!("[{}] {}\n\n{}", config::APP_NAME, e, USAGE);
            return ExitCode::from(2);
        }
    };

    let app_config = match &config_path {
        Some(path) => AppConfig::load_or_default(path),
        None => AppConfig::load(),
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(app_config.general.log_level.as_str()),
    )
    .init();

    log::info!("Starting {} v{}", config::APP_NAME, config::APP_VERSION);

    if command.is_empty() {
        eprintln!("{}", USAGE);
        return ExitCode::from(2);
    }

    let store = match settings::shared::global().get_or_open(&app_config) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("[{}] failed to open settings: {}", config::APP_NAME, e);
            return ExitCode::from(1);
        }
    };

    let result = run(&command, &store, &app_config);
    settings::shared::global().teardown();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[{}] {}", config::APP_NAME, e);
            ExitCode::from(1)
        }
    }
}

fn split_config_flag(args: &[String]) -> Result<(Option<PathBuf>, Vec<String>), String> {
    match args.first().map(String::as_str) {
        Some("--config") => match args.get(1) {
            Some(path) => Ok((Some(PathBuf::from(path)), args[2..].to_vec())),
            None => Err("--config needs a path".to_string()),
        },
        _ => Ok((None, args.to_vec())),
    }
}

fn parse_index(value: &str) -> Result<usize, String> {
    value
        .parse::<usize>()
        .map_err(|_| format!("'{}' is not a valid index", value))
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "1" | "yes" => Ok(true),
        "false" | "off" | "0" | "no" => Ok(false),
        _ => Err(format!("'{}' is not a boolean", value)),
    }
}

fn run(command: &[String], store: &SettingsStore, app_config: &AppConfig) -> Result<(), String> {
    let args: Vec<&str> = command.iter().map(String::as_str).collect();

    match args.as_slice() {
        ["engines"] => list_engines(None),
        ["engines", "ai"] => list_engines(Some(EngineKind::Ai)),
        ["engines", "search"] => list_engines(Some(EngineKind::Search)),

        ["order"] => {
            print_order(&store.engine_order());
            Ok(())
        }
        ["order", "add", name, rest @ ..] => {
            let entry = order_entry(name, rest.first().copied())?;
            edit_order(store, |draft| {
                draft.push(entry);
                Ok(())
            })
        }
        ["order", "move", from, to] => {
            let (from, to) = (parse_index(from)?, parse_index(to)?);
            edit_order(store, |draft| draft.move_entry(from, to).map_err(|e| e.to_string()))
        }
        ["order", "remove", index] => {
            let index = parse_index(index)?;
            edit_order(store, |draft| draft.remove(index).map(|_| ()).map_err(|e| e.to_string()))
        }
        ["order", "reset"] => edit_order(store, |draft| {
            draft.reset_to_default();
            Ok(())
        }),

        ["search", name, query @ ..] if !query.is_empty() => {
            let engine = engine::lookup_by_key(name)
                .or_else(|| {
                    store
                        .engine_order()
                        .into_iter()
                        .find(|entry| entry.name == *name)
                        .map(|entry| entry.to_engine())
                })
                .ok_or_else(|| format!("unknown engine '{}'", name))?;
            println!("{}", engine.build_query(&query.join(" ")));
            Ok(())
        }
        ["open", input @ ..] if !input.is_empty() => {
            let loader = PageLoader::new(
                ContentFilter::from_config(&app_config.content_filter),
                store.default_engine(),
            );
            match loader.load(&input.join(" ")) {
                LoadDecision::Load(url) => {
                    println!("{}", url);
                    Ok(())
                }
                LoadDecision::Blocked(url) => Err(format!("blocked by content filter: {}", url)),
                LoadDecision::Invalid(reason) => Err(format!("cannot open input: {}", reason)),
            }
        }

        ["get", key] => {
            println!("{}", store.get_bool(key, false));
            Ok(())
        }
        ["set", key, value] => {
            store.set_bool(key, parse_bool(value)?);
            Ok(())
        }

        ["theme"] => {
            println!("{}", store.theme_mode().as_str());
            Ok(())
        }
        ["theme", mode] => {
            let parsed = ThemeMode::parse(mode);
            if parsed.as_str() != mode.to_ascii_lowercase() {
                return Err(format!("unknown theme '{}'", mode));
            }
            store.set_theme_mode(parsed);
            Ok(())
        }

        ["api-key", name] => {
            println!("{}", store.api_key(name));
            Ok(())
        }
        ["api-key", name, key] => {
            store.set_api_key(name, key);
            Ok(())
        }

        _ => Err(format!("unrecognized command\n\n{}", USAGE)),
    }
}

fn list_engines(kind: Option<EngineKind>) -> Result<(), String> {
    for engine in engine::catalog().filter(|e| kind.map_or(true, |k| e.kind == k)) {
        let kind_label = match engine.kind {
            EngineKind::Ai => "ai",
            EngineKind::Search => "search",
        };
        println!("{:<8} {:<14} {}", kind_label, engine.name, engine.url_template);
    }
    Ok(())
}

fn print_order(entries: &[EngineOrderEntry]) {
    for (index, entry) in entries.iter().enumerate() {
        println!("{:>2}. {:<14} {}", index, entry.name, entry.url);
    }
}

/// Order entry for `name`, using the catalog's display name when it is known
fn order_entry(name: &str, url: Option<&str>) -> Result<EngineOrderEntry, String> {
    match (engine::lookup_by_key(name), url) {
        (Some(known), Some(url)) => Ok(EngineOrderEntry::new(&known.name, url)),
        (Some(known), None) => Ok(EngineOrderEntry::new(&known.name, &known.url_template)),
        (None, Some(url)) => Ok(EngineOrderEntry::new(name, url)),
        (None, None) => Err(format!("unknown engine '{}', give a URL", name)),
    }
}

/// Edit a draft of the engine order and commit it if the edit succeeds
fn edit_order<F>(store: &SettingsStore, edit: F) -> Result<(), String>
where
    F: FnOnce(&mut EngineOrderDraft) -> Result<(), String>,
{
    let mut draft = EngineOrderDraft::load(store);
    edit(&mut draft)?;
    if draft.is_dirty() {
        draft.commit(store);
    }
    print_order(draft.entries());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_entry_uses_catalog_name() {
        let entry = order_entry("brave_search", Some("https://search.brave.com/search?q={query}"))
            .unwrap();
        assert_eq!(entry.name, "Brave Search");
        assert_eq!(entry.to_engine().kind, EngineKind::Search);
        assert_eq!(entry.to_engine().name, "Brave Search");

        let entry = order_entry("kimi", None).unwrap();
        assert_eq!(entry, EngineOrderEntry::new("Kimi", "https://kimi.moonshot.cn"));
    }

    #[test]
    fn test_order_entry_custom() {
        let entry = order_entry("My Chat", Some("https://chat.example")).unwrap();
        assert_eq!(entry, EngineOrderEntry::new("My Chat", "https://chat.example"));
        assert!(order_entry("My Chat", None).is_err());
    }
}
